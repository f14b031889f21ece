//! # feature-prep
//!
//! Column expansion and standardization with a fit/transform contract, plus
//! cross-validated learning curves and their charts.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: an unfitted [`FeaturePreparer`] can only be
//!   fitted; transforming needs the [`FittedFeaturePreparer`] that `fit`
//!   returns, so "transform before fit" does not compile.
//! - **Immutable learned state**: the non-boolean column mask, the raw column
//!   deviations and the scaler statistics are fixed once fitted.
//! - **Backend Agnosticism**: every transformer is generic over [`Backend`].
//!
//! ## Quick Start
//!
//! ```rust
//! use feature_prep::backend::{CpuBackend, Tensor2D};
//! use feature_prep::preprocessing::{FeaturePreparer, FittedTransformer, Power, Transformer};
//!
//! let x = Tensor2D::<CpuBackend>::from_rows(&[
//!     vec![0.0, 1.0],
//!     vec![1.0, 2.0],
//!     vec![0.0, 3.0],
//!     vec![1.0, 4.0],
//! ]);
//!
//! let preparer = FeaturePreparer::<CpuBackend>::with_powers([
//!     Power::Identity,
//!     Power::Exponent(2),
//!     Power::Log,
//! ]);
//! let fitted = preparer.fit(&x).unwrap();
//! let prepared = fitted.transform(&x).unwrap();
//!
//! assert_eq!(prepared.shape(), (4, 4));
//! assert_eq!(
//!     fitted.expand_column_names(&["flag", "value"]).unwrap(),
//!     vec!["flag", "value", "2_value", "log_value"]
//! );
//! ```
//!
//! ## Module Structure
//!
//! - `backend`: Tensor abstractions and computation primitives (`Tensor1D`, `Tensor2D`)
//! - `preprocessing`: `FeaturePreparer`, `StandardScaler` and the transformer traits
//! - `model_selection`: `Estimator` trait, K-fold splits, learning curves
//! - `visualization`: learning-curve charts rendered to SVG or JSON
//! - `serialization`: persistence of fitted parameters

pub mod backend;

/// Data preprocessing transformers.
pub mod preprocessing;

/// Cross-validation and learning curves.
pub mod model_selection;

/// Learning-curve charts.
pub mod visualization;

/// Model persistence and format conversion utilities.
pub mod serialization;

/// Re-export of core backend types for convenient usage.
pub use backend::{Backend, Tensor1D, Tensor2D};
#[cfg(feature = "cpu")]
pub use backend::CpuBackend;
pub use preprocessing::{
    FeaturePreparer, FittedFeaturePreparer, FittedTransformer, Power, PreprocessingError,
    Transformer,
};
