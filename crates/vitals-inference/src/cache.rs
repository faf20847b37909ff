//! Lazily trained, process-wide verdict model.
//!
//! Lookup order on every request: in-memory model, then the artifact on
//! disk, then a fresh fit. A model is only reused when it is compatible
//! with the current encoder and, unless staleness checks are disabled, was
//! trained on the current catalog revision.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use vitals_core::config::VitalsConfig;
use vitals_core::errors::InferenceError;
use vitals_core::types::{Catalog, CatalogRevision};

use crate::artifact::{ArtifactStore, ModelArtifact};
use crate::trainer::Trainer;

/// What the cache currently holds in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Loaded {
        revision: CatalogRevision,
        trained_on: usize,
    },
}

#[derive(Debug)]
pub struct ModelCache {
    artifacts: ArtifactStore,
    trainer: Trainer,
    retrain_on_catalog_change: bool,
    current: Mutex<Option<Arc<ModelArtifact>>>,
}

impl ModelCache {
    pub fn new(artifacts: ArtifactStore, trainer: Trainer, retrain_on_catalog_change: bool) -> Self {
        Self {
            artifacts,
            trainer,
            retrain_on_catalog_change,
            current: Mutex::new(None),
        }
    }

    pub fn from_config(config: &VitalsConfig) -> Self {
        Self::new(
            ArtifactStore::new(config.model.artifact_path(&config.storage)),
            Trainer::from_config(&config.model),
            config.model.effective_retrain_on_catalog_change(),
        )
    }

    pub fn artifact_store(&self) -> &ArtifactStore {
        &self.artifacts
    }

    pub fn state(&self) -> CacheState {
        match self.slot().as_deref() {
            Some(artifact) => CacheState::Loaded {
                revision: artifact.catalog_revision.clone(),
                trained_on: artifact.trained_on,
            },
            None => CacheState::Empty,
        }
    }

    /// Drop the in-memory model. The artifact on disk is left alone.
    pub fn invalidate(&self) {
        *self.slot() = None;
    }

    /// A model usable for `catalog`, training one if needed.
    ///
    /// A freshly trained model that cannot be persisted is still served;
    /// the next process will simply train again.
    pub fn get_or_train(&self, catalog: &Catalog) -> Result<Arc<ModelArtifact>, InferenceError> {
        if catalog.is_empty() {
            return Err(InferenceError::InsufficientData);
        }
        let revision = catalog.revision();

        let mut slot = self.slot();
        if let Some(artifact) = slot.as_ref() {
            if self.is_usable(artifact, &revision) {
                return Ok(Arc::clone(artifact));
            }
            tracing::debug!("cached verdict model is stale");
        }

        if let Some(artifact) = self.artifacts.read() {
            if self.is_usable(&artifact, &revision) {
                tracing::debug!(path = %self.artifacts.path().display(), "loaded verdict model");
                let artifact = Arc::new(artifact);
                *slot = Some(Arc::clone(&artifact));
                return Ok(artifact);
            }
            tracing::info!(
                path = %self.artifacts.path().display(),
                "persisted verdict model is stale, retraining"
            );
        }

        let artifact = self.trainer.train(catalog)?;
        if let Err(e) = self.artifacts.write(&artifact) {
            tracing::warn!(error = %e, "could not persist verdict model, serving it from memory");
        }
        let artifact = Arc::new(artifact);
        *slot = Some(Arc::clone(&artifact));
        Ok(artifact)
    }

    /// Unconditionally fit a new model on `catalog` and persist it.
    pub fn retrain(&self, catalog: &Catalog) -> Result<Arc<ModelArtifact>, InferenceError> {
        let artifact = self.trainer.train(catalog)?;
        self.artifacts.write(&artifact)?;
        let artifact = Arc::new(artifact);
        *self.slot() = Some(Arc::clone(&artifact));
        Ok(artifact)
    }

    fn is_usable(&self, artifact: &ModelArtifact, revision: &CatalogRevision) -> bool {
        !self.retrain_on_catalog_change || artifact.is_fresh_for(revision)
    }

    fn slot(&self) -> MutexGuard<'_, Option<Arc<ModelArtifact>>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
