//! Patient identifiers: `P` followed by a zero-padded sequence number.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{ID_PREFIX, ID_SEQUENCE_WIDTH};

/// Catalog key of a patient record, e.g. `P007`.
///
/// Sequences above 999 simply grow wider (`P1000`); the padding is a minimum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(String);

impl PatientId {
    /// Build the identifier for a 1-based sequence number.
    pub fn from_sequence(sequence: usize) -> Self {
        Self(format!(
            "{ID_PREFIX}{sequence:0width$}",
            width = ID_SEQUENCE_WIDTH
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PatientId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for PatientId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl PartialEq<str> for PatientId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PatientId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
