use super::tensor1d::Tensor1D;
use crate::backend::Backend;
use crate::preprocessing::PreprocessingError;
use std::marker::PhantomData;

/// Backend-typed 2D tensor (rows = samples, columns = features).
///
/// # Example
/// ```
/// use feature_prep::backend::{CpuBackend, Tensor2D};
///
/// let x = Tensor2D::<CpuBackend>::from_rows(&[vec![0.0, 1.0], vec![1.0, 2.0]]);
/// assert_eq!(x.shape(), (2, 2));
/// assert_eq!(x.ravel(), vec![0.0, 1.0, 1.0, 2.0]);
/// ```
#[derive(Clone)]
pub struct Tensor2D<B: Backend> {
    pub(crate) data: B::Tensor2D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor2D<B> {
    /// Creates a tensor from row-major values.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        Self::from_native(B::from_vec_2d(data, rows, cols))
    }

    /// Creates a tensor from a slice of equally sized rows.
    ///
    /// # Panics
    /// If the rows have different lengths.
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        assert!(
            rows.iter().all(|r| r.len() == cols),
            "All rows must have same length"
        );
        let data = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Self::new(data, rows.len(), cols)
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_native(B::zeros_2d(rows, cols))
    }

    pub(crate) fn from_native(data: B::Tensor2D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        B::shape(&self.data)
    }

    pub fn nrows(&self) -> usize {
        self.shape().0
    }

    pub fn ncols(&self) -> usize {
        self.shape().1
    }

    /// Flattens the tensor into row-major values.
    pub fn ravel(&self) -> Vec<f64> {
        B::to_vec_2d(&self.data)
    }

    /// Copies out a single column.
    ///
    /// # Panics
    /// If `col` is out of bounds.
    pub fn column(&self, col: usize) -> Vec<f64> {
        B::to_vec_2d(&B::select_columns_2d(&self.data, &[col]))
    }

    pub fn select_columns(&self, columns: &[usize]) -> Self {
        Self::from_native(B::select_columns_2d(&self.data, columns))
    }

    pub fn select_rows(&self, rows: &[usize]) -> Self {
        Self::from_native(B::select_rows_2d(&self.data, rows))
    }

    /// Concatenates tensors along the column axis.
    pub fn hcat(tensors: &[Self]) -> Result<Self, PreprocessingError> {
        let native: Vec<B::Tensor2D> = tensors.iter().map(|t| t.data.clone()).collect();
        B::hcat_2d(&native).map(Self::from_native)
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self::from_native(B::mul_2d(&self.data, &other.data))
    }

    pub fn powi(&self, exponent: i32) -> Self {
        Self::from_native(B::powi_2d(&self.data, exponent))
    }

    pub fn ln_1p(&self) -> Self {
        Self::from_native(B::ln_1p_2d(&self.data))
    }

    pub fn exp(&self) -> Self {
        Self::from_native(B::exp_2d(&self.data))
    }

    pub fn col_mean(&self) -> Tensor1D<B> {
        Tensor1D::from_native(B::col_mean_2d(&self.data))
    }

    pub fn col_std(&self, ddof: usize) -> Tensor1D<B> {
        Tensor1D::from_native(B::col_std_2d(&self.data, ddof))
    }

    pub fn sub_row(&self, v: &Tensor1D<B>) -> Self {
        Self::from_native(B::broadcast_sub_1d_to_2d_rows(&self.data, &v.data))
    }

    pub fn div_row(&self, v: &Tensor1D<B>) -> Self {
        Self::from_native(B::broadcast_div_1d_to_2d_rows(&self.data, &v.data))
    }

    pub fn mul_row(&self, v: &Tensor1D<B>) -> Self {
        Self::from_native(B::broadcast_mul_1d_to_2d_rows(&self.data, &v.data))
    }

    pub fn add_row(&self, v: &Tensor1D<B>) -> Self {
        Self::from_native(B::broadcast_add_1d_to_2d_rows(&self.data, &v.data))
    }
}

impl<B: Backend> std::fmt::Debug for Tensor2D<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tensor2D")
            .field("shape", &self.shape())
            .field("data", &self.ravel())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_tensor2d_shape() {
        let t = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0], 3, 1);
        assert_eq!(t.shape(), (3, 1));

        let t2 = Tensor2D::<CpuBackend>::zeros(0, 5);
        assert_eq!(t2.shape(), (0, 5));
    }

    #[test]
    fn test_column_and_select() {
        let t = Tensor2D::<CpuBackend>::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(t.column(0), vec![1.0, 3.0]);
        assert_eq!(t.select_rows(&[1, 0]).ravel(), vec![3.0, 4.0, 1.0, 2.0]);
        assert_eq!(t.select_columns(&[1]).ravel(), vec![2.0, 4.0]);
    }

    #[test]
    fn test_standardize_by_rows() {
        let t = Tensor2D::<CpuBackend>::from_rows(&[vec![1.0, 10.0], vec![3.0, 30.0]]);
        let centered = t.sub_row(&t.col_mean());
        let scaled = centered.div_row(&t.col_std(0));
        assert_eq!(scaled.ravel(), vec![-1.0, -1.0, 1.0, 1.0]);

        let restored = scaled.mul_row(&t.col_std(0)).add_row(&t.col_mean());
        assert_eq!(restored.ravel(), t.ravel());
    }

    #[test]
    fn test_hcat() {
        let a = Tensor2D::<CpuBackend>::from_rows(&[vec![1.0], vec![2.0]]);
        let b = a.powi(2);
        let c = Tensor2D::hcat(&[a, b]).unwrap();
        assert_eq!(c.ravel(), vec![1.0, 1.0, 2.0, 4.0]);
    }
}
