//! The patient record persisted in the catalog.

use serde::{Deserialize, Serialize};

use super::SortField;
use crate::constants::DEFAULT_CITY;
use crate::errors::StoreError;
use crate::features::{self, FeatureVector};

/// One catalog entry. The identifier is the catalog key, not a field.
///
/// Field order matches the persisted document:
/// `{name, city, age, gender, height, weight, bmi, verdict}`.
/// Measurements absent from a hand-edited document read as 0 so such
/// records still sort (at the bottom) instead of poisoning the whole load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub name: String,
    #[serde(default = "default_city")]
    pub city: String,
    pub age: u32,
    pub gender: String,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub bmi: f64,
    pub verdict: String,
}

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

impl PatientRecord {
    /// Encode this record with the shared feature encoder.
    pub fn features(&self) -> FeatureVector {
        features::encode(self.age, &self.gender, self.height, self.weight, self.bmi)
    }

    /// Value of a sortable measurement.
    pub fn field(&self, field: SortField) -> f64 {
        match field {
            SortField::Height => self.height,
            SortField::Weight => self.weight,
            SortField::Bmi => self.bmi,
        }
    }

    /// Check the record is complete enough to persist.
    ///
    /// BMI is not cross-checked against height and weight.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::invalid_argument(
                "name",
                &self.name,
                "must not be empty",
            ));
        }
        if self.age == 0 {
            return Err(StoreError::invalid_argument(
                "age",
                self.age,
                "must be a positive integer",
            ));
        }
        for (argument, value) in [
            ("height", self.height),
            ("weight", self.weight),
            ("bmi", self.bmi),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(StoreError::invalid_argument(
                    argument,
                    value,
                    "must be a positive number",
                ));
            }
        }
        if self.verdict.trim().is_empty() {
            return Err(StoreError::invalid_argument(
                "verdict",
                &self.verdict,
                "must not be empty",
            ));
        }
        Ok(())
    }
}

/// Body mass index: weight (kg) over height (m) squared.
pub fn bmi(height: f64, weight: f64) -> f64 {
    weight / (height * height)
}
