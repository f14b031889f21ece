use super::Backend;
use crate::preprocessing::PreprocessingError;

/// Pure-Rust backend storing 2D tensors as row-major `Vec<f64>`.
#[derive(Clone, Debug, Copy)]
pub struct CpuBackend;

/// Row-major 2D tensor: `(data, rows, cols)`.
#[derive(Debug, Clone)]
pub struct CpuTensor2D(pub Vec<f64>, pub usize, pub usize);

impl CpuTensor2D {
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        Self(data, rows, cols)
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        self.0[row * self.2 + col]
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        CpuTensor2D::new(self.0.iter().map(|&x| f(x)).collect(), self.1, self.2)
    }

    fn zip_rows(&self, v: &[f64], f: impl Fn(f64, f64) -> f64) -> Self {
        assert_eq!(v.len(), self.2, "Broadcast length must equal column count");
        let data = self
            .0
            .iter()
            .enumerate()
            .map(|(idx, &x)| f(x, v[idx % self.2]))
            .collect();
        CpuTensor2D::new(data, self.1, self.2)
    }
}

impl From<&[Vec<f64>]> for CpuTensor2D {
    fn from(x: &[Vec<f64>]) -> Self {
        if x.is_empty() {
            return CpuTensor2D::new(Vec::new(), 0, 0);
        }
        let rows = x.len();
        let cols = x[0].len();
        assert!(
            x.iter().all(|row| row.len() == cols),
            "All rows must have same length"
        );
        let data: Vec<f64> = x.iter().flat_map(|row| row.iter()).copied().collect();
        CpuTensor2D::new(data, rows, cols)
    }
}

impl Backend for CpuBackend {
    type Tensor1D = Vec<f64>;
    type Tensor2D = CpuTensor2D;

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        vec![0.; len]
    }

    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(vec![0.; rows * cols], rows, cols)
    }

    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D {
        data
    }

    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(data, rows, cols)
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.clone()
    }

    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64> {
        t.0.clone()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        (t.1, t.2)
    }

    fn mul_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        assert_eq!((a.1, a.2), (b.1, b.2), "Shape mismatch in mul_2d");
        CpuTensor2D::new(
            a.0.iter().zip(b.0.iter()).map(|(a, b)| a * b).collect(),
            a.1,
            a.2,
        )
    }

    fn powi_2d(t: &Self::Tensor2D, exponent: i32) -> Self::Tensor2D {
        t.map(|x| x.powi(exponent))
    }

    fn ln_1p_2d(t: &Self::Tensor2D) -> Self::Tensor2D {
        t.map(f64::ln_1p)
    }

    fn exp_2d(t: &Self::Tensor2D) -> Self::Tensor2D {
        t.map(f64::exp)
    }

    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        let (rows, cols) = (t.1, t.2);
        if rows == 0 {
            return vec![f64::NAN; cols];
        }
        (0..cols)
            .map(|c| (0..rows).map(|r| t.get(r, c)).sum::<f64>() / rows as f64)
            .collect()
    }

    fn col_std_2d(t: &Self::Tensor2D, ddof: usize) -> Self::Tensor1D {
        let (rows, cols) = (t.1, t.2);
        let means = Self::col_mean_2d(t);
        let divisor = rows.saturating_sub(ddof) as f64;
        (0..cols)
            .map(|c| {
                let var_sum: f64 = (0..rows)
                    .map(|r| {
                        let diff = t.get(r, c) - means[c];
                        diff * diff
                    })
                    .sum();
                (var_sum / divisor).sqrt()
            })
            .collect()
    }

    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.zip_rows(v, |x, m| x - m)
    }

    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.zip_rows(v, |x, s| x / s)
    }

    fn broadcast_mul_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.zip_rows(v, |x, s| x * s)
    }

    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.zip_rows(v, |x, m| x + m)
    }

    fn hcat_2d(tensors: &[Self::Tensor2D]) -> Result<Self::Tensor2D, PreprocessingError> {
        let first = tensors.first().ok_or_else(|| {
            PreprocessingError::InvalidParameter(
                "Cannot horizontally concatenate empty slice of tensors".to_string(),
            )
        })?;
        let rows = first.1;

        for t in tensors {
            if t.1 != rows {
                return Err(PreprocessingError::InvalidShape {
                    expected: format!("({}, ?)", rows),
                    got: format!("({}, ?)", t.1),
                });
            }
        }

        let total_cols: usize = tensors.iter().map(|t| t.2).sum();
        let mut data = Vec::with_capacity(rows * total_cols);
        for r in 0..rows {
            for t in tensors {
                data.extend_from_slice(&t.0[r * t.2..(r + 1) * t.2]);
            }
        }
        Ok(CpuTensor2D::new(data, rows, total_cols))
    }

    fn select_columns_2d(t: &Self::Tensor2D, columns: &[usize]) -> Self::Tensor2D {
        let (rows, cols) = (t.1, t.2);
        for &c in columns {
            assert!(c < cols, "Column index {} out of bounds ({} columns)", c, cols);
        }
        let mut data = Vec::with_capacity(rows * columns.len());
        for r in 0..rows {
            data.extend(columns.iter().map(|&c| t.get(r, c)));
        }
        CpuTensor2D::new(data, rows, columns.len())
    }

    fn select_rows_2d(t: &Self::Tensor2D, rows: &[usize]) -> Self::Tensor2D {
        let cols = t.2;
        let mut data = Vec::with_capacity(rows.len() * cols);
        for &r in rows {
            assert!(r < t.1, "Row index {} out of bounds ({} rows)", r, t.1);
            data.extend_from_slice(&t.0[r * cols..(r + 1) * cols]);
        }
        CpuTensor2D::new(data, rows.len(), cols)
    }

    fn select_1d(t: &Self::Tensor1D, indices: &[usize]) -> Self::Tensor1D {
        indices.iter().map(|&i| t[i]).collect()
    }
}
