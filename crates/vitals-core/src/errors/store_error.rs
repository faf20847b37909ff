//! Record store errors.

use super::error_code::{self, VitalsErrorCode};

/// Errors surfaced by the record store.
///
/// Corrupt or missing catalog documents are not errors: reads recover them
/// as an empty catalog. `StorageUnavailable` is only returned when a write
/// cannot complete (lock contention, unwritable directory).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("patient {id} does not exist")]
    NotFound { id: String },

    #[error("invalid {argument} '{value}': {reason}")]
    InvalidArgument {
        argument: String,
        value: String,
        reason: String,
    },

    #[error("storage unavailable at {path}: {message}")]
    StorageUnavailable { path: String, message: String },
}

impl StoreError {
    /// Shorthand for an `InvalidArgument` error.
    pub fn invalid_argument(
        argument: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a `StorageUnavailable` error.
    pub fn unavailable(path: &std::path::Path, message: impl ToString) -> Self {
        Self::StorageUnavailable {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }
}

impl VitalsErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_code::NOT_FOUND,
            Self::InvalidArgument { .. } => error_code::INVALID_ARGUMENT,
            Self::StorageUnavailable { .. } => error_code::STORAGE_UNAVAILABLE,
        }
    }
}
