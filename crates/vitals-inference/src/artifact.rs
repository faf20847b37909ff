//! Persisted model artifact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vitals_core::constants::ARTIFACT_FORMAT_VERSION;
use vitals_core::errors::{InferenceError, StoreError};
use vitals_core::features::{FeatureSchema, FeatureVector};
use vitals_core::types::CatalogRevision;
use vitals_storage::write_atomic;

use crate::forest::RandomForest;

/// A trained forest plus everything needed to decide whether it can still
/// serve the current catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub schema: FeatureSchema,
    /// Revision of the catalog the forest was fit on.
    pub catalog_revision: CatalogRevision,
    /// Number of records in that catalog.
    pub trained_on: usize,
    /// Verdict labels, indexed by forest class.
    pub classes: Vec<String>,
    pub forest: RandomForest,
}

impl ModelArtifact {
    pub fn new(
        catalog_revision: CatalogRevision,
        trained_on: usize,
        classes: Vec<String>,
        forest: RandomForest,
    ) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            schema: FeatureSchema::current(),
            catalog_revision,
            trained_on,
            classes,
            forest,
        }
    }

    /// Verdict label for an encoded query.
    pub fn predict(&self, x: &FeatureVector) -> Option<&str> {
        let class = self.forest.predict(x)?;
        self.classes.get(class).map(String::as_str)
    }

    /// Verdict label for an encoded query, or `ModelUnusable` when the
    /// forest yields no class with a label.
    pub fn verdict(&self, x: &FeatureVector) -> Result<&str, InferenceError> {
        self.predict(x).ok_or_else(|| {
            InferenceError::ModelUnusable(format!(
                "{} trees over {} classes produced no label",
                self.forest.trees().len(),
                self.classes.len()
            ))
        })
    }

    /// Whether this artifact was produced by the current encoder and
    /// artifact format, and is structurally sound.
    pub fn is_compatible(&self) -> bool {
        self.format_version == ARTIFACT_FORMAT_VERSION
            && self.schema == FeatureSchema::current()
            && self.classes.len() == self.forest.n_classes()
            && self.forest.is_consistent()
    }

    /// Whether the artifact was trained on exactly this catalog revision.
    pub fn is_fresh_for(&self, revision: &CatalogRevision) -> bool {
        &self.catalog_revision == revision
    }
}

/// Reads and writes the artifact file.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    path: PathBuf,
}

impl ArtifactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the artifact. Missing, unparsable, and incompatible artifacts
    /// all read as `None`.
    pub fn read(&self) -> Option<ModelArtifact> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "model artifact is unreadable");
                return None;
            }
        };

        let artifact: ModelArtifact = match serde_json::from_slice(&bytes) {
            Ok(artifact) => artifact,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "model artifact is unparsable");
                return None;
            }
        };

        if !artifact.is_compatible() {
            tracing::warn!(
                path = %self.path.display(),
                format_version = artifact.format_version,
                schema_version = artifact.schema.version,
                "model artifact is incompatible with this build"
            );
            return None;
        }
        Some(artifact)
    }

    /// Replace the artifact atomically.
    pub fn write(&self, artifact: &ModelArtifact) -> Result<(), StoreError> {
        let bytes =
            serde_json::to_vec(artifact).map_err(|e| StoreError::unavailable(&self.path, e))?;
        write_atomic(&self.path, &bytes).map_err(|e| StoreError::unavailable(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::ForestParams;

    #[test]
    fn test_treeless_artifact_is_unusable_not_insufficient() {
        let forest = RandomForest::fit(&[], &[], 1, &ForestParams::default());
        let artifact = ModelArtifact::new(
            vitals_core::types::Catalog::new().revision(),
            0,
            vec!["Normal".to_string()],
            forest,
        );
        let err = artifact.verdict(&[30.0, 0.0, 1.75, 70.0, 22.86]).unwrap_err();
        assert!(matches!(err, InferenceError::ModelUnusable(_)));
        assert!(!artifact.is_compatible());
    }

    #[test]
    fn test_verdict_maps_class_to_label() {
        let forest = RandomForest::fit(
            &[[30.0, 0.0, 1.75, 70.0, 22.86]],
            &[0],
            1,
            &ForestParams::default(),
        );
        let artifact = ModelArtifact::new(
            vitals_core::types::Catalog::new().revision(),
            1,
            vec!["Normal".to_string()],
            forest,
        );
        assert_eq!(artifact.verdict(&[50.0, 1.0, 1.6, 90.0, 35.0]).unwrap(), "Normal");
    }
}
