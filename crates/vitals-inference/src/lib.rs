//! # vitals-inference
//!
//! Verdict inference pipeline: a seeded random forest trained on the whole
//! catalog, persisted as a versioned artifact, cached per process, and
//! served through [`VerdictPredictor`].
//!
//! ## Cache policy
//!
//! | Situation | Outcome |
//! |-----------|---------|
//! | No model in memory or on disk | train, persist, cache |
//! | Artifact unreadable / schema mismatch | treated as absent |
//! | Catalog revision differs from the model's | retrain (configurable) |
//! | Catalog empty | `InsufficientData`, nothing written |

pub mod artifact;
pub mod cache;
pub mod forest;
pub mod predictor;
pub mod trainer;

pub use artifact::{ArtifactStore, ModelArtifact};
pub use cache::{CacheState, ModelCache};
pub use forest::{ForestParams, RandomForest};
pub use predictor::VerdictPredictor;
pub use trainer::Trainer;
