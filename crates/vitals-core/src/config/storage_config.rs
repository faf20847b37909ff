//! Record store configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CATALOG_FILE, DEFAULT_DATA_DIR, DEFAULT_LOCK_RETRIES, DEFAULT_LOCK_RETRY_DELAY_MS,
};

/// Where the catalog lives and how writers wait for the catalog lock.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the catalog and the model artifact. Default: `.`.
    pub data_dir: Option<String>,
    /// Catalog document name inside `data_dir`. Default: `patients.json`.
    pub catalog_file: Option<String>,
    /// Lock acquisition attempts before a write fails. Default: 50.
    pub lock_retries: Option<u32>,
    /// Pause between lock attempts in milliseconds. Default: 20.
    pub lock_retry_delay_ms: Option<u64>,
}

impl StorageConfig {
    pub fn effective_data_dir(&self) -> PathBuf {
        PathBuf::from(self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR))
    }

    pub fn effective_catalog_file(&self) -> &str {
        self.catalog_file.as_deref().unwrap_or(DEFAULT_CATALOG_FILE)
    }

    /// Full path of the catalog document.
    pub fn catalog_path(&self) -> PathBuf {
        resolve(&self.effective_data_dir(), self.effective_catalog_file())
    }

    pub fn effective_lock_retries(&self) -> u32 {
        self.lock_retries.unwrap_or(DEFAULT_LOCK_RETRIES)
    }

    pub fn effective_lock_retry_delay(&self) -> Duration {
        Duration::from_millis(
            self.lock_retry_delay_ms
                .unwrap_or(DEFAULT_LOCK_RETRY_DELAY_MS),
        )
    }
}

/// Join `file` onto `dir` unless `file` is already absolute.
pub(crate) fn resolve(dir: &Path, file: &str) -> PathBuf {
    let file = Path::new(file);
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        dir.join(file)
    }
}
