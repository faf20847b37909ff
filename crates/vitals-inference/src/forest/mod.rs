//! Random forest classifier over fixed-width feature vectors.
//!
//! Trees are stored as flat node arrays (children always follow their
//! parent), so a trained forest serializes to plain JSON and traversal is
//! an index walk. Leaves hold class distributions; the forest averages
//! them and picks the most probable class, lowest index on ties.

pub mod model;
pub mod tree;

pub use model::{ForestParams, RandomForest};
pub use tree::{DecisionTree, Node, TreeParams};
