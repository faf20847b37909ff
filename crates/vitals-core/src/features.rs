//! Feature encoder shared by training and prediction.
//!
//! Both sides must produce vectors in the same order, so there is exactly
//! one encoder and the schema it implies is fingerprinted into every
//! persisted model artifact.

use serde::{Deserialize, Serialize};

use crate::constants::{FEATURE_COUNT, FEATURE_NAMES, FEATURE_SCHEMA_VERSION};
use crate::types::Gender;

/// `[age, gender_code, height, weight, bmi]`.
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Encode raw attributes into a feature vector.
///
/// Gender outside the vocabulary encodes like the first vocabulary entry.
pub fn encode(age: u32, gender: &str, height: f64, weight: f64, bmi: f64) -> FeatureVector {
    [f64::from(age), gender_code(gender), height, weight, bmi]
}

/// Numeric code for free-text gender input.
pub fn gender_code(raw: &str) -> f64 {
    Gender::parse(raw).unwrap_or_default().code()
}

/// Identity of the encoding a model was trained with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u32,
    /// blake3 over the version and the ordered feature names.
    pub fingerprint: String,
}

impl FeatureSchema {
    /// Schema produced by [`encode`].
    pub fn current() -> Self {
        Self {
            version: FEATURE_SCHEMA_VERSION,
            fingerprint: fingerprint(FEATURE_SCHEMA_VERSION, &FEATURE_NAMES),
        }
    }
}

fn fingerprint(version: u32, names: &[&str]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&version.to_le_bytes());
    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize().to_hex().to_string()
}
