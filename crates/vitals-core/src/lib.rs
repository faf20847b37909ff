//! # vitals-core
//!
//! Foundation crate for the Vitals verdict system.
//! Defines record types, the feature encoder, errors, config, tracing, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod features;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::VitalsConfig;
pub use errors::{ConfigError, InferenceError, StoreError, VitalsError, VitalsResult};
pub use features::{encode, FeatureSchema, FeatureVector};
pub use types::{
    bmi, Catalog, CatalogRevision, Gender, PatientId, PatientRecord, SortField, SortOrder,
};
