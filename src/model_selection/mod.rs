//! Cross-validated learning curves.
//!
//! [`learning_curve`] measures how an [`Estimator`] scores as its training
//! set grows, over the folds of a [`CvStrategy`]. It is independent of the
//! preprocessing module; estimators that prepare their own features can
//! surface preprocessing failures through [`ModelSelectionError::Preprocessing`].

pub mod error;
pub mod estimator;
pub mod learning_curve;
pub mod split;

pub use error::ModelSelectionError;
pub use estimator::{accuracy, Estimator};
pub use learning_curve::{learning_curve, LearningCurve, TrainSizes};
pub use split::{CvStrategy, KFold, Split};
