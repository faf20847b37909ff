//! Verdict model configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::storage_config::resolve;
use super::StorageConfig;
use crate::constants::{
    DEFAULT_ARTIFACT_FILE, DEFAULT_MIN_SAMPLES_SPLIT, DEFAULT_N_ESTIMATORS, DEFAULT_SEED,
};

/// Forest hyperparameters and artifact caching policy.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModelConfig {
    /// Artifact name inside the storage data dir. Default: `model.json`.
    pub artifact_file: Option<String>,
    /// Trees in the forest. Default: 10.
    pub n_estimators: Option<u32>,
    /// Maximum tree depth. Default: unbounded.
    pub max_depth: Option<u32>,
    /// Minimum node size eligible for a split. Default: 2.
    pub min_samples_split: Option<u32>,
    /// Sampling seed. Default: 42.
    pub seed: Option<u64>,
    /// Retrain when the catalog changed since the cached model was trained.
    /// With `false`, a model is only retrained when missing or unreadable.
    /// Default: true.
    pub retrain_on_catalog_change: Option<bool>,
}

impl ModelConfig {
    pub fn effective_artifact_file(&self) -> &str {
        self.artifact_file.as_deref().unwrap_or(DEFAULT_ARTIFACT_FILE)
    }

    /// Full path of the artifact, relative to the storage data dir.
    pub fn artifact_path(&self, storage: &StorageConfig) -> PathBuf {
        resolve(&storage.effective_data_dir(), self.effective_artifact_file())
    }

    pub fn effective_n_estimators(&self) -> u32 {
        self.n_estimators.unwrap_or(DEFAULT_N_ESTIMATORS)
    }

    pub fn effective_min_samples_split(&self) -> u32 {
        self.min_samples_split.unwrap_or(DEFAULT_MIN_SAMPLES_SPLIT)
    }

    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    pub fn effective_retrain_on_catalog_change(&self) -> bool {
        self.retrain_on_catalog_change.unwrap_or(true)
    }
}
