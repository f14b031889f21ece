//! Error types for model selection.

use crate::preprocessing::error::PreprocessingError;
use thiserror::Error;

/// Error type for cross-validation and learning curves.
#[derive(Debug, Error)]
pub enum ModelSelectionError {
    /// Invalid split, fold count or training size.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Features and targets (or predictions and targets) disagree in length.
    #[error("Shape mismatch: expected {expected} samples, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
    /// The estimator failed to fit or predict.
    #[error("Estimator error: {0}")]
    Estimator(String),
    /// A preprocessing step inside the estimator failed.
    #[error(transparent)]
    Preprocessing(#[from] PreprocessingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelSelectionError::ShapeMismatch {
            expected: 10,
            got: 9,
        };
        assert_eq!(err.to_string(), "Shape mismatch: expected 10 samples, got 9");
    }

    #[test]
    fn test_from_preprocessing_error() {
        let err: ModelSelectionError = PreprocessingError::EmptyData("no rows".to_string()).into();
        assert!(matches!(err, ModelSelectionError::Preprocessing(_)));
        assert_eq!(err.to_string(), "Empty data: no rows");
    }
}
