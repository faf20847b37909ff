//! Top-level Vitals configuration with 4-layer resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ModelConfig, StorageConfig};
use crate::errors::ConfigError;

/// Name of the project-level config file.
pub const PROJECT_CONFIG_FILE: &str = "vitals.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`VITALS_*`)
/// 3. Project config (`vitals.toml` in project root)
/// 4. User config (`~/.vitals/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VitalsConfig {
    pub storage: StorageConfig,
    pub model: ModelConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_dir: Option<String>,
    pub n_estimators: Option<u32>,
    pub seed: Option<u64>,
    pub retrain_on_catalog_change: Option<bool>,
}

impl VitalsConfig {
    /// Load configuration with 4-layer resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        // Unreadable user config is not fatal; continue with defaults.
                        ::tracing::warn!(error = %e, "ignoring user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &VitalsConfig) -> Result<(), ConfigError> {
        if config.model.n_estimators == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "model.n_estimators".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(split) = config.model.min_samples_split {
            if split < 2 {
                return Err(ConfigError::ValidationFailed {
                    field: "model.min_samples_split".to_string(),
                    message: "must be at least 2".to_string(),
                });
            }
        }
        if config.model.max_depth == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "model.max_depth".to_string(),
                message: "must be at least 1 when set".to_string(),
            });
        }
        if config.storage.lock_retries == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "storage.lock_retries".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(ref file) = config.storage.catalog_file {
            if file.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "storage.catalog_file".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        if let Some(ref file) = config.model.artifact_file {
            if file.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "model.artifact_file".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.vitals/config.toml`.
    fn user_config_path() -> Option<std::path::PathBuf> {
        home_dir().map(|h| h.join(".vitals").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut VitalsConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: VitalsConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a value.
    fn merge(base: &mut VitalsConfig, other: &VitalsConfig) {
        // Storage
        if other.storage.data_dir.is_some() {
            base.storage.data_dir = other.storage.data_dir.clone();
        }
        if other.storage.catalog_file.is_some() {
            base.storage.catalog_file = other.storage.catalog_file.clone();
        }
        if other.storage.lock_retries.is_some() {
            base.storage.lock_retries = other.storage.lock_retries;
        }
        if other.storage.lock_retry_delay_ms.is_some() {
            base.storage.lock_retry_delay_ms = other.storage.lock_retry_delay_ms;
        }

        // Model
        if other.model.artifact_file.is_some() {
            base.model.artifact_file = other.model.artifact_file.clone();
        }
        if other.model.n_estimators.is_some() {
            base.model.n_estimators = other.model.n_estimators;
        }
        if other.model.max_depth.is_some() {
            base.model.max_depth = other.model.max_depth;
        }
        if other.model.min_samples_split.is_some() {
            base.model.min_samples_split = other.model.min_samples_split;
        }
        if other.model.seed.is_some() {
            base.model.seed = other.model.seed;
        }
        if other.model.retrain_on_catalog_change.is_some() {
            base.model.retrain_on_catalog_change = other.model.retrain_on_catalog_change;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `VITALS_DATA_DIR`, `VITALS_MODEL_TREES`, etc.
    fn apply_env_overrides(config: &mut VitalsConfig) {
        if let Ok(val) = std::env::var("VITALS_DATA_DIR") {
            config.storage.data_dir = Some(val);
        }
        if let Ok(val) = std::env::var("VITALS_CATALOG_FILE") {
            config.storage.catalog_file = Some(val);
        }
        if let Ok(val) = std::env::var("VITALS_LOCK_RETRIES") {
            if let Ok(v) = val.parse::<u32>() {
                config.storage.lock_retries = Some(v);
            }
        }
        if let Ok(val) = std::env::var("VITALS_ARTIFACT_FILE") {
            config.model.artifact_file = Some(val);
        }
        if let Ok(val) = std::env::var("VITALS_MODEL_TREES") {
            if let Ok(v) = val.parse::<u32>() {
                config.model.n_estimators = Some(v);
            }
        }
        if let Ok(val) = std::env::var("VITALS_MODEL_SEED") {
            if let Ok(v) = val.parse::<u64>() {
                config.model.seed = Some(v);
            }
        }
        if let Ok(val) = std::env::var("VITALS_RETRAIN_ON_CHANGE") {
            if let Ok(v) = val.parse::<bool>() {
                config.model.retrain_on_catalog_change = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut VitalsConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.data_dir {
            config.storage.data_dir = Some(v.clone());
        }
        if let Some(v) = cli.n_estimators {
            config.model.n_estimators = Some(v);
        }
        if let Some(v) = cli.seed {
            config.model.seed = Some(v);
        }
        if let Some(v) = cli.retrain_on_catalog_change {
            config.model.retrain_on_catalog_change = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
}
