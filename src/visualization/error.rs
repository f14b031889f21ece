//! Error types for chart building and rendering.

use crate::model_selection::ModelSelectionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotError {
    /// Score matrices that cannot be drawn (empty, ragged, misaligned).
    #[error("Invalid plot data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Computing the learning curve failed.
    #[error(transparent)]
    ModelSelection(#[from] ModelSelectionError),
}
