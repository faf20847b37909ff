//! Top-level error for the service boundary.

use super::error_code::VitalsErrorCode;
use super::{ConfigError, InferenceError, StoreError};

/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum VitalsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),
}

impl VitalsErrorCode for VitalsError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Store(e) => e.error_code(),
            Self::Inference(e) => e.error_code(),
        }
    }
}

pub type VitalsResult<T> = Result<T, VitalsError>;
