//! VitalsErrorCode trait for boundary conversion.

/// Trait for mapping Vitals errors to stable error code strings.
/// Every error enum implements this so an outer layer (API, CLI) can
/// branch on the code instead of parsing messages.
pub trait VitalsErrorCode {
    /// Returns the error code string (e.g., "NOT_FOUND").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted boundary string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants for the boundary.
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
pub const INSUFFICIENT_DATA: &str = "INSUFFICIENT_DATA";
pub const STORAGE_UNAVAILABLE: &str = "STORAGE_UNAVAILABLE";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const MODEL_UNUSABLE: &str = "MODEL_UNUSABLE";
