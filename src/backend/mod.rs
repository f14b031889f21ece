//! # Backend Abstraction
//!
//! This module provides a trait-based abstraction over tensor storage so that
//! transformers can run on different array libraries without code changes.
//!
//! ## Design Philosophy
//!
//! - **Minimal trait surface**: Only the column-oriented operations needed by
//!   the preprocessing and model-selection code are exposed.
//! - **Zero-cost generics**: Backend selection happens at compile time via type
//!   parameters, avoiding runtime dispatch overhead.
//! - **Type-safe tensor handling**: Each backend defines its own tensor types
//!   that are wrapped by [`Tensor1D`] and [`Tensor2D`], so tensors from
//!   different backends cannot be mixed.
//! - **Feature-gated implementations**: Backends are enabled via Cargo features
//!   (`cpu`, `ndarray`).
//!
//! ## Available Backends
//!
//! | Backend          | Feature   | Use Case                          |
//! |------------------|-----------|-----------------------------------|
//! | `CpuBackend`     | `cpu`     | Default, pure-Rust implementation |
//! | `NdarrayBackend` | `ndarray` | Interop with `ndarray` ecosystem  |
//!
//! ## Example
//!
//! ```rust
//! use feature_prep::backend::{CpuBackend, Tensor2D};
//!
//! let x: Tensor2D<CpuBackend> = Tensor2D::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
//! assert_eq!(x.shape(), (2, 2));
//! assert_eq!(x.column(1), vec![2.0, 4.0]);
//! ```

use crate::preprocessing::PreprocessingError;

#[cfg(feature = "cpu")]
mod cpu;
#[cfg(feature = "cpu")]
/// Pure-Rust CPU backend implementation with zero external dependencies.
pub use cpu::{CpuBackend, CpuTensor2D};

#[cfg(feature = "ndarray")]
mod ndarray_backend;
#[cfg(feature = "ndarray")]
/// Backend backed by the `ndarray` crate for ecosystem interoperability.
pub use ndarray_backend::{NdarrayBackend, NdarrayTensor2D};

/// One-dimensional tensor abstraction.
pub mod tensor1d;
/// Two-dimensional tensor abstraction.
pub mod tensor2d;

pub use tensor1d::Tensor1D;
pub use tensor2d::Tensor2D;

/// Abstraction over tensor storage and the operations used by transformers.
///
/// All tensors hold `f64` values. 2D tensors are addressed in row-major order:
/// `from_vec_2d` and `to_vec_2d` use the flattened `rows * cols` layout.
///
/// # Panics
///
/// Element-wise and broadcasting operations panic on shape mismatch. Callers
/// inside this crate validate shapes first and surface
/// [`PreprocessingError`]s instead.
pub trait Backend: Clone + Copy + 'static {
    /// One-dimensional tensor type.
    type Tensor1D: Clone + Send + Sync;

    /// Two-dimensional tensor type.
    type Tensor2D: Clone + Send + Sync;

    // --- Constructors ---

    /// Creates a 1D tensor filled with zeros of given length.
    fn zeros_1d(len: usize) -> Self::Tensor1D;

    /// Creates a 2D tensor filled with zeros of given dimensions.
    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D;

    /// Constructs a 1D tensor from owned data.
    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D;

    /// Constructs a 2D tensor from row-major ordered data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D;

    // --- Data access ---

    /// Converts a 1D tensor to a Vec of f64 values.
    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64>;

    /// Flattens a 2D tensor into a row-major Vec of f64 values.
    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64>;

    /// Returns the number of elements in a 1D tensor.
    fn len_1d(t: &Self::Tensor1D) -> usize;

    /// Returns the shape of a 2D tensor as (rows, cols).
    fn shape(t: &Self::Tensor2D) -> (usize, usize);

    // --- Element-wise operations (2D) ---

    /// Element-wise multiplication of two 2D tensors.
    ///
    /// # Panics
    /// If tensors have different shapes.
    fn mul_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D;

    /// Raises every element to an integer power.
    fn powi_2d(t: &Self::Tensor2D, exponent: i32) -> Self::Tensor2D;

    /// Element-wise `ln(1 + x)`.
    ///
    /// Produces NaN or -inf for elements `<= -1`; domain checks are the
    /// caller's responsibility.
    fn ln_1p_2d(t: &Self::Tensor2D) -> Self::Tensor2D;

    /// Element-wise exponential function (e^x).
    fn exp_2d(t: &Self::Tensor2D) -> Self::Tensor2D;

    // --- Column-wise operations (for preprocessing) ---

    /// Computes the mean of each column in a 2D tensor.
    ///
    /// Returns a 1D tensor of length `cols`.
    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    /// Computes the standard deviation of each column in a 2D tensor.
    ///
    /// # Arguments
    /// * `t` - Input 2D tensor
    /// * `ddof` - Delta degrees of freedom (1 for sample std, 0 for population std)
    fn col_std_2d(t: &Self::Tensor2D, ddof: usize) -> Self::Tensor1D;

    // --- Broadcasting operations ---

    /// Result[i, j] = t[i, j] - v[j]
    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// Result[i, j] = t[i, j] / v[j]
    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// Result[i, j] = t[i, j] * v[j]
    fn broadcast_mul_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// Result[i, j] = t[i, j] + v[j]
    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    // --- Column and row manipulation ---

    /// Horizontally concatenate 2D tensors (stack columns side by side).
    ///
    /// All input tensors must have the same number of rows. Zero-width
    /// tensors are allowed and contribute no columns.
    ///
    /// # Example
    /// ```ignore
    /// // [[1, 2]] + [[3]] -> [[1, 2, 3]]
    /// let c = B::hcat_2d(&[a, b])?; // shape (1, 3)
    /// ```
    fn hcat_2d(tensors: &[Self::Tensor2D]) -> Result<Self::Tensor2D, PreprocessingError>;

    /// Extract specific columns from a 2D tensor, in the given order.
    ///
    /// # Panics
    /// Panics if any column index is out of bounds.
    fn select_columns_2d(t: &Self::Tensor2D, columns: &[usize]) -> Self::Tensor2D;

    /// Extract specific rows from a 2D tensor, in the given order.
    ///
    /// # Panics
    /// Panics if any row index is out of bounds.
    fn select_rows_2d(t: &Self::Tensor2D, rows: &[usize]) -> Self::Tensor2D;

    /// Extract specific elements from a 1D tensor, in the given order.
    ///
    /// # Panics
    /// Panics if any index is out of bounds.
    fn select_1d(t: &Self::Tensor1D, indices: &[usize]) -> Self::Tensor1D;
}
