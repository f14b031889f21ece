use crate::backend::Backend;
use std::marker::PhantomData;

/// Backend-typed 1D tensor.
///
/// Wraps a backend's native 1D tensor representation (`B::Tensor1D`) while
/// carrying phantom type information about its originating backend, so
/// tensors from different backends cannot be mixed.
///
/// # Example
/// ```
/// use feature_prep::backend::{CpuBackend, Tensor1D};
///
/// let y: Tensor1D<CpuBackend> = Tensor1D::new(vec![0.0, 1.0, 1.0]);
/// assert_eq!(y.len(), 3);
/// assert_eq!(y.select(&[2, 0]).to_vec(), vec![1.0, 0.0]);
/// ```
#[derive(Clone)]
pub struct Tensor1D<B: Backend> {
    pub(crate) data: B::Tensor1D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor1D<B> {
    /// Creates a new 1D tensor from owned values.
    pub fn new(data: Vec<f64>) -> Self {
        Self::from_native(B::from_vec_1d(data))
    }

    /// Creates a 1D tensor filled with zeros of specified length.
    pub fn zeros(len: usize) -> Self {
        Self::from_native(B::zeros_1d(len))
    }

    pub(crate) fn from_native(data: B::Tensor1D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    /// Copies the values out into a `Vec<f64>`.
    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec_1d(&self.data)
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        B::len_1d(&self.data)
    }

    /// Returns `true` if the tensor has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gathers the elements at `indices`, in order.
    ///
    /// # Panics
    /// If any index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self::from_native(B::select_1d(&self.data, indices))
    }
}

impl<B: Backend> std::fmt::Debug for Tensor1D<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Tensor1D").field(&self.to_vec()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_zeros_and_len() {
        let t = Tensor1D::<CpuBackend>::zeros(4);
        assert_eq!(t.len(), 4);
        assert!(!t.is_empty());
        assert!(t.to_vec().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_empty() {
        let t = Tensor1D::<CpuBackend>::new(vec![]);
        assert!(t.is_empty());
    }
}
