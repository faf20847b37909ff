//! Bagged ensemble of decision trees.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use vitals_core::config::ModelConfig;
use vitals_core::constants::{
    DEFAULT_MIN_SAMPLES_SPLIT, DEFAULT_N_ESTIMATORS, DEFAULT_SEED, FEATURE_COUNT,
};
use vitals_core::features::FeatureVector;

use super::tree::{DecisionTree, TreeParams};

/// Forest hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: DEFAULT_N_ESTIMATORS as usize,
            max_depth: None,
            min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT as usize,
            seed: DEFAULT_SEED,
        }
    }
}

impl ForestParams {
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            n_estimators: config.effective_n_estimators() as usize,
            max_depth: config.max_depth.map(|d| d as usize),
            min_samples_split: config.effective_min_samples_split() as usize,
            seed: config.effective_seed(),
        }
    }

    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split.max(2),
            max_features: max_features(FEATURE_COUNT),
        }
    }
}

/// `floor(sqrt(n))`, at least one.
fn max_features(n: usize) -> usize {
    ((n as f64).sqrt() as usize).max(1)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    n_classes: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit `params.n_estimators` trees, each on a bootstrap sample of the
    /// rows. The same inputs and seed always produce the same forest.
    pub fn fit(
        features: &[FeatureVector],
        labels: &[usize],
        n_classes: usize,
        params: &ForestParams,
    ) -> Self {
        let n = features.len().min(labels.len());
        if n == 0 || n_classes == 0 {
            return Self {
                n_classes,
                trees: Vec::new(),
            };
        }

        let tree_params = params.tree_params();
        let mut rng = StdRng::seed_from_u64(params.seed);
        let trees = (0..params.n_estimators.max(1))
            .map(|_| {
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                DecisionTree::fit(features, labels, n_classes, sample, &tree_params, &mut rng)
            })
            .collect();

        Self { n_classes, trees }
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Mean of the per-tree class distributions.
    pub fn predict_proba(&self, x: &FeatureVector) -> Option<Vec<f64>> {
        if self.trees.is_empty() {
            return None;
        }
        let mut sum = vec![0.0; self.n_classes];
        for tree in &self.trees {
            let dist = tree.distribution(x)?;
            for (acc, p) in sum.iter_mut().zip(dist) {
                *acc += p;
            }
        }
        let count = self.trees.len() as f64;
        Some(sum.into_iter().map(|p| p / count).collect())
    }

    /// Index of the most probable class. Ties go to the lower index.
    pub fn predict(&self, x: &FeatureVector) -> Option<usize> {
        let proba = self.predict_proba(x)?;
        let mut best: Option<(usize, f64)> = None;
        for (class, p) in proba.into_iter().enumerate() {
            if best.map_or(true, |(_, b)| p > b) {
                best = Some((class, p));
            }
        }
        best.map(|(class, _)| class)
    }

    pub fn is_consistent(&self) -> bool {
        self.n_classes > 0
            && !self.trees.is_empty()
            && self.trees.iter().all(|t| t.is_consistent(self.n_classes))
    }
}
