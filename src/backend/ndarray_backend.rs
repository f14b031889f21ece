use super::Backend;
use crate::preprocessing::PreprocessingError;
use ndarray::{concatenate, Array1, Array2, ArrayView2, Axis};

/// Tensor backend implemented on top of the `ndarray` crate.
///
/// # Type mappings
/// - `Tensor1D`: `ndarray::Array1<f64>`
/// - `Tensor2D`: [`NdarrayTensor2D`] wrapper around `ndarray::Array2<f64>`
#[derive(Clone, Debug, Copy)]
pub struct NdarrayBackend;

/// Wrapper type for 2D tensors using ndarray's `Array2<f64>`.
///
/// # Example
/// ```
/// use feature_prep::backend::NdarrayTensor2D;
/// let tensor = NdarrayTensor2D::from(&[
///     vec![1.0f64, 2.0f64, 3.0f64],
///     vec![4.0f64, 5.0f64, 6.0f64],
/// ][..]);
/// assert_eq!(tensor.0.shape(), &[2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct NdarrayTensor2D(pub Array2<f64>);

impl From<&[Vec<f64>]> for NdarrayTensor2D {
    /// Converts a slice of row vectors into a 2D tensor.
    ///
    /// # Panics
    /// Panics if rows have inconsistent lengths.
    fn from(x: &[Vec<f64>]) -> Self {
        let rows = x.len();
        let cols = x.first().map_or(0, Vec::len);
        assert!(x.iter().all(|r| r.len() == cols), "All rows must have same length");
        let data: Vec<f64> = x.iter().flat_map(|r| r.iter()).copied().collect();
        NdarrayTensor2D::from(Array2::from_shape_fn((rows, cols), |(r, c)| data[r * cols + c]))
    }
}

impl From<Array2<f64>> for NdarrayTensor2D {
    fn from(a: Array2<f64>) -> Self {
        NdarrayTensor2D(a)
    }
}

impl Backend for NdarrayBackend {
    type Tensor1D = Array1<f64>;
    type Tensor2D = NdarrayTensor2D;

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        Array1::zeros(len)
    }

    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D {
        NdarrayTensor2D(Array2::zeros((rows, cols)))
    }

    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D {
        Array1::from_vec(data)
    }

    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        NdarrayTensor2D(Array2::from_shape_fn((rows, cols), |(r, c)| data[r * cols + c]))
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.to_vec()
    }

    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64> {
        t.0.iter().copied().collect()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        t.0.dim()
    }

    fn mul_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        assert_eq!(a.0.dim(), b.0.dim(), "Shape mismatch in mul_2d");
        NdarrayTensor2D(&a.0 * &b.0)
    }

    fn powi_2d(t: &Self::Tensor2D, exponent: i32) -> Self::Tensor2D {
        NdarrayTensor2D(t.0.mapv(|x| x.powi(exponent)))
    }

    fn ln_1p_2d(t: &Self::Tensor2D) -> Self::Tensor2D {
        NdarrayTensor2D(t.0.mapv(f64::ln_1p))
    }

    fn exp_2d(t: &Self::Tensor2D) -> Self::Tensor2D {
        NdarrayTensor2D(t.0.mapv(f64::exp))
    }

    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.0.mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::from_elem(t.0.ncols(), f64::NAN))
    }

    fn col_std_2d(t: &Self::Tensor2D, ddof: usize) -> Self::Tensor1D {
        if t.0.nrows() == 0 {
            return Array1::from_elem(t.0.ncols(), f64::NAN);
        }
        t.0.std_axis(Axis(0), ddof as f64)
    }

    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        NdarrayTensor2D(&t.0 - v)
    }

    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        NdarrayTensor2D(&t.0 / v)
    }

    fn broadcast_mul_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        NdarrayTensor2D(&t.0 * v)
    }

    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        NdarrayTensor2D(&t.0 + v)
    }

    fn hcat_2d(tensors: &[Self::Tensor2D]) -> Result<Self::Tensor2D, PreprocessingError> {
        let first = tensors.first().ok_or_else(|| {
            PreprocessingError::InvalidParameter(
                "Cannot horizontally concatenate empty slice of tensors".to_string(),
            )
        })?;
        let rows = first.0.nrows();

        for t in tensors {
            if t.0.nrows() != rows {
                return Err(PreprocessingError::InvalidShape {
                    expected: format!("({}, ?)", rows),
                    got: format!("({}, ?)", t.0.nrows()),
                });
            }
        }

        let views: Vec<ArrayView2<'_, f64>> = tensors.iter().map(|t| t.0.view()).collect();
        concatenate(Axis(1), &views)
            .map(NdarrayTensor2D)
            .map_err(|e| PreprocessingError::InvalidShape {
                expected: format!("({}, ?)", rows),
                got: e.to_string(),
            })
    }

    fn select_columns_2d(t: &Self::Tensor2D, columns: &[usize]) -> Self::Tensor2D {
        let ncols = t.0.ncols();
        for &col in columns {
            assert!(col < ncols, "Column index {} out of bounds ({} columns)", col, ncols);
        }
        NdarrayTensor2D(t.0.select(Axis(1), columns))
    }

    fn select_rows_2d(t: &Self::Tensor2D, rows: &[usize]) -> Self::Tensor2D {
        NdarrayTensor2D(t.0.select(Axis(0), rows))
    }

    fn select_1d(t: &Self::Tensor1D, indices: &[usize]) -> Self::Tensor1D {
        t.select(Axis(0), indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_roundtrip() {
        let t = NdarrayBackend::from_vec_2d(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        assert_eq!(t.0[[1, 0]], 4.0);
        assert_eq!(
            NdarrayBackend::to_vec_2d(&t),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
        );
    }

    #[test]
    fn test_col_std_matches_population_std() {
        let t = NdarrayBackend::from_vec_2d(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2);
        let std = NdarrayBackend::col_std_2d(&t, 0);
        let expected = (8.0f64 / 3.0).sqrt();
        assert!((std[0] - expected).abs() < 1e-12);
        assert!((std[1] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_hcat_with_zero_width_piece() {
        let a = NdarrayBackend::from_vec_2d(vec![1.0, 2.0], 2, 1);
        let empty = NdarrayBackend::zeros_2d(2, 0);
        let b = NdarrayBackend::from_vec_2d(vec![3.0, 4.0], 2, 1);
        let c = NdarrayBackend::hcat_2d(&[a, empty, b]).unwrap();
        assert_eq!(NdarrayBackend::to_vec_2d(&c), vec![1.0, 3.0, 2.0, 4.0]);
    }
}
