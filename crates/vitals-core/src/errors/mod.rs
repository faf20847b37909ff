//! Error handling for Vitals.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod inference_error;
pub mod store_error;
pub mod vitals_error;

pub use config_error::ConfigError;
pub use error_code::VitalsErrorCode;
pub use inference_error::InferenceError;
pub use store_error::StoreError;
pub use vitals_error::{VitalsError, VitalsResult};
