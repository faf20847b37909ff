//! Configuration system for Vitals.
//! TOML-based, 4-layer resolution: CLI > env > project > user > defaults.

pub mod model_config;
pub mod storage_config;
pub mod vitals_config;

pub use model_config::ModelConfig;
pub use storage_config::StorageConfig;
pub use vitals_config::{CliOverrides, VitalsConfig};
