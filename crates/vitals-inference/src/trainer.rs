//! Fits a verdict model on a catalog.

use std::collections::BTreeSet;

use vitals_core::config::ModelConfig;
use vitals_core::errors::InferenceError;
use vitals_core::features::FeatureVector;
use vitals_core::types::Catalog;

use crate::artifact::ModelArtifact;
use crate::forest::{ForestParams, RandomForest};

#[derive(Debug, Clone, Default)]
pub struct Trainer {
    params: ForestParams,
}

impl Trainer {
    pub fn new(params: ForestParams) -> Self {
        Self { params }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(ForestParams::from_config(config))
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    /// Fit a forest on every record in `catalog`.
    ///
    /// Classes are the distinct verdicts in lexicographic order, so the
    /// same catalog always yields the same class indices.
    pub fn train(&self, catalog: &Catalog) -> Result<ModelArtifact, InferenceError> {
        if catalog.is_empty() {
            return Err(InferenceError::InsufficientData);
        }

        let classes: Vec<String> = catalog
            .records()
            .map(|r| r.verdict.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut features: Vec<FeatureVector> = Vec::with_capacity(catalog.len());
        let mut labels: Vec<usize> = Vec::with_capacity(catalog.len());
        for record in catalog.records() {
            let label = classes
                .binary_search(&record.verdict)
                .map_err(|_| {
                    InferenceError::ModelUnusable(format!("verdict '{}' has no class", record.verdict))
                })?;
            features.push(record.features());
            labels.push(label);
        }

        let forest = RandomForest::fit(&features, &labels, classes.len(), &self.params);
        let revision = catalog.revision();
        tracing::info!(
            revision = %revision,
            records = catalog.len(),
            classes = classes.len(),
            trees = forest.trees().len(),
            "trained verdict model"
        );

        Ok(ModelArtifact::new(revision, catalog.len(), classes, forest))
    }
}
