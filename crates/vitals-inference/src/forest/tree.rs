//! CART decision tree with Gini impurity.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use vitals_core::constants::FEATURE_COUNT;
use vitals_core::features::FeatureVector;

/// A tree node. Traversal goes left when `x[feature] <= threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Class probabilities, indexed like the model's class list.
        distribution: Vec<f64>,
    },
}

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// Features examined per split before settling for the best found.
    pub max_features: usize,
}

/// Training set shared by every node of one tree.
struct TrainingSet<'a> {
    features: &'a [FeatureVector],
    labels: &'a [usize],
    n_classes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Grow a tree over `sample` (indices into `features`/`labels`,
    /// duplicates allowed for bootstrap samples).
    pub fn fit<R: Rng>(
        features: &[FeatureVector],
        labels: &[usize],
        n_classes: usize,
        sample: Vec<usize>,
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let data = TrainingSet {
            features,
            labels,
            n_classes,
        };
        let mut tree = Self { nodes: Vec::new() };
        tree.grow(&data, sample, 0, params, rng);
        tree
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Class distribution of the leaf `x` falls into.
    pub fn distribution(&self, x: &FeatureVector) -> Option<&[f64]> {
        let mut index = 0;
        loop {
            match self.nodes.get(index)? {
                Node::Leaf { distribution } => return Some(distribution),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = *x.get(*feature)?;
                    index = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Structural check for trees read from disk: children point forward,
    /// features are in range, leaves match the class count.
    pub fn is_consistent(&self, n_classes: usize) -> bool {
        !self.nodes.is_empty()
            && self.nodes.iter().enumerate().all(|(i, node)| match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    *feature < FEATURE_COUNT
                        && threshold.is_finite()
                        && *left > i
                        && *right > i
                        && *left < self.nodes.len()
                        && *right < self.nodes.len()
                }
                Node::Leaf { distribution } => distribution.len() == n_classes,
            })
    }

    /// Grow the subtree for `indices`, returning its root position.
    fn grow<R: Rng>(
        &mut self,
        data: &TrainingSet<'_>,
        indices: Vec<usize>,
        depth: usize,
        params: &TreeParams,
        rng: &mut R,
    ) -> usize {
        let counts = class_counts(data, &indices);
        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let too_small = indices.len() < params.min_samples_split;
        let too_deep = params.max_depth.is_some_and(|max| depth >= max);
        if pure || too_small || too_deep {
            return self.push_leaf(&counts, indices.len());
        }

        let Some((feature, threshold)) = best_split(data, &indices, &counts, params, rng) else {
            return self.push_leaf(&counts, indices.len());
        };

        let slot = self.nodes.len();
        self.nodes.push(Node::Leaf {
            distribution: Vec::new(),
        });

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| data.features[i][feature] <= threshold);
        let left = self.grow(data, left_indices, depth + 1, params, rng);
        let right = self.grow(data, right_indices, depth + 1, params, rng);

        self.nodes[slot] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        slot
    }

    fn push_leaf(&mut self, counts: &[usize], total: usize) -> usize {
        let total = total.max(1) as f64;
        self.nodes.push(Node::Leaf {
            distribution: counts.iter().map(|&c| c as f64 / total).collect(),
        });
        self.nodes.len() - 1
    }
}

fn class_counts(data: &TrainingSet<'_>, indices: &[usize]) -> Vec<usize> {
    let mut counts = vec![0; data.n_classes];
    for &i in indices {
        counts[data.labels[i]] += 1;
    }
    counts
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

/// Lowest weighted-Gini threshold over a random subset of features.
///
/// Features are visited in shuffled order; after `max_features` of them the
/// search stops as soon as any valid split exists, so constant features
/// never leave a splittable node as a leaf.
fn best_split<R: Rng>(
    data: &TrainingSet<'_>,
    indices: &[usize],
    counts: &[usize],
    params: &TreeParams,
    rng: &mut R,
) -> Option<(usize, f64)> {
    let n = indices.len();
    let mut order: Vec<usize> = (0..FEATURE_COUNT).collect();
    order.shuffle(rng);

    let mut best: Option<(f64, usize, f64)> = None;
    for (visited, &feature) in order.iter().enumerate() {
        if visited >= params.max_features && best.is_some() {
            break;
        }

        let mut column: Vec<(f64, usize)> = indices
            .iter()
            .map(|&i| (data.features[i][feature], data.labels[i]))
            .collect();
        column.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut left = vec![0usize; data.n_classes];
        let mut right = counts.to_vec();
        for k in 0..n - 1 {
            let (value, label) = column[k];
            left[label] += 1;
            right[label] -= 1;

            let next = column[k + 1].0;
            if next <= value {
                continue;
            }

            let n_left = k + 1;
            let n_right = n - n_left;
            let impurity = (n_left as f64 * gini(&left, n_left)
                + n_right as f64 * gini(&right, n_right))
                / n as f64;

            if best.map_or(true, |(b, _, _)| impurity < b) {
                let mut threshold = value + (next - value) / 2.0;
                if threshold >= next || !threshold.is_finite() {
                    threshold = value;
                }
                best = Some((impurity, feature, threshold));
            }
        }
    }
    best.map(|(_, feature, threshold)| (feature, threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params() -> TreeParams {
        TreeParams {
            max_depth: None,
            min_samples_split: 2,
            max_features: FEATURE_COUNT,
        }
    }

    fn row(bmi: f64) -> FeatureVector {
        [30.0, 0.0, 1.75, 70.0, bmi]
    }

    #[test]
    fn test_single_class_is_one_leaf() {
        let features = vec![row(20.0), row(22.0)];
        let labels = vec![0, 0];
        let mut rng = StdRng::seed_from_u64(1);
        let tree = DecisionTree::fit(&features, &labels, 1, vec![0, 1], &params(), &mut rng);
        assert_eq!(tree.nodes().len(), 1);
        assert_eq!(tree.distribution(&row(99.0)), Some(&[1.0][..]));
    }

    #[test]
    fn test_separable_data_is_learned_exactly() {
        let features = vec![row(17.0), row(18.0), row(24.0), row(25.0), row(31.0), row(35.0)];
        let labels = vec![0, 0, 1, 1, 2, 2];
        let mut rng = StdRng::seed_from_u64(7);
        let tree = DecisionTree::fit(
            &features,
            &labels,
            3,
            (0..features.len()).collect(),
            &params(),
            &mut rng,
        );
        assert!(tree.is_consistent(3));
        for (x, &label) in features.iter().zip(&labels) {
            let dist = tree.distribution(x).unwrap();
            assert_eq!(dist[label], 1.0);
        }
    }

    #[test]
    fn test_identical_rows_with_different_labels_stay_a_leaf() {
        let features = vec![row(22.0), row(22.0)];
        let labels = vec![0, 1];
        let mut rng = StdRng::seed_from_u64(3);
        let tree = DecisionTree::fit(&features, &labels, 2, vec![0, 1], &params(), &mut rng);
        assert_eq!(tree.nodes().len(), 1);
        assert_eq!(tree.distribution(&row(22.0)), Some(&[0.5, 0.5][..]));
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let features = vec![row(17.0), row(24.0), row(31.0)];
        let labels = vec![0, 1, 2];
        let mut rng = StdRng::seed_from_u64(5);
        let shallow = TreeParams {
            max_depth: Some(1),
            ..params()
        };
        let tree = DecisionTree::fit(&features, &labels, 3, vec![0, 1, 2], &shallow, &mut rng);
        assert_eq!(tree.nodes().len(), 3);
    }

    #[test]
    fn test_inconsistent_trees_are_detected() {
        let looping = DecisionTree {
            nodes: vec![Node::Split {
                feature: 0,
                threshold: 1.0,
                left: 0,
                right: 0,
            }],
        };
        assert!(!looping.is_consistent(1));

        let wrong_width = DecisionTree {
            nodes: vec![Node::Leaf {
                distribution: vec![1.0],
            }],
        };
        assert!(!wrong_width.is_consistent(2));
        assert!(!DecisionTree { nodes: vec![] }.is_consistent(1));
    }

    #[test]
    fn test_gini() {
        assert_eq!(gini(&[4, 0], 4), 0.0);
        assert!((gini(&[2, 2], 4) - 0.5).abs() < 1e-12);
        assert_eq!(gini(&[], 0), 0.0);
    }
}
