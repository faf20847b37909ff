//! Predicts a verdict for raw patient attributes.

use vitals_core::config::VitalsConfig;
use vitals_core::errors::InferenceError;
use vitals_core::features::encode;
use vitals_storage::RecordStore;

use crate::cache::ModelCache;

#[derive(Debug)]
pub struct VerdictPredictor {
    store: RecordStore,
    cache: ModelCache,
}

impl VerdictPredictor {
    pub fn new(store: RecordStore, cache: ModelCache) -> Self {
        Self { store, cache }
    }

    pub fn from_config(config: &VitalsConfig) -> Self {
        Self::new(
            RecordStore::open(&config.storage),
            ModelCache::from_config(config),
        )
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn cache(&self) -> &ModelCache {
        &self.cache
    }

    /// Predict a verdict from the current catalog.
    ///
    /// Gender is matched case-insensitively; unknown values encode like
    /// `male`. The returned label is always one present in the catalog.
    pub fn predict(
        &self,
        age: u32,
        gender: &str,
        height: f64,
        weight: f64,
        bmi: f64,
    ) -> Result<String, InferenceError> {
        let x = encode(age, gender, height, weight, bmi);
        if let Some(bad) = x.iter().find(|v| !v.is_finite()) {
            return Err(InferenceError::InvalidQuery(format!(
                "features must be finite, got {bad}"
            )));
        }

        let catalog = self.store.load_all();
        let artifact = self.cache.get_or_train(&catalog)?;
        artifact.verdict(&x).map(str::to_string)
    }
}
