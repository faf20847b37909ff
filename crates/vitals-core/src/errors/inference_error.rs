//! Training and prediction errors.

use super::error_code::{self, VitalsErrorCode};
use super::StoreError;

/// Errors that can occur while training or serving the verdict model.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("cannot train a verdict model on an empty catalog")]
    InsufficientData,

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The model produced no label for a well-formed query.
    #[error("verdict model is unusable: {0}")]
    ModelUnusable(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl VitalsErrorCode for InferenceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientData => error_code::INSUFFICIENT_DATA,
            Self::InvalidQuery(_) => error_code::INVALID_ARGUMENT,
            Self::ModelUnusable(_) => error_code::MODEL_UNUSABLE,
            Self::Store(e) => e.error_code(),
        }
    }
}
