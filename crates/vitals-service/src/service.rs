//! Boundary operations over the store and the verdict model.

use serde::{Deserialize, Serialize};
use vitals_core::config::VitalsConfig;
use vitals_core::constants::DEFAULT_CITY;
use vitals_core::errors::VitalsResult;
use vitals_core::types::{Catalog, PatientId, PatientRecord};
use vitals_inference::VerdictPredictor;
use vitals_storage::RecordStore;

use crate::summary::CatalogSummary;

/// Fields a caller supplies to create a record. The caller computes `bmi`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    pub age: u32,
    pub gender: String,
    pub height: f64,
    pub weight: f64,
    pub bmi: f64,
    pub verdict: String,
}

impl NewPatient {
    pub fn into_record(self) -> PatientRecord {
        PatientRecord {
            name: self.name,
            city: self
                .city
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CITY.to_string()),
            age: self.age,
            gender: self.gender,
            height: self.height,
            weight: self.weight,
            bmi: self.bmi,
            verdict: self.verdict,
        }
    }
}

/// Outcome of an explicit retrain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub records: usize,
    pub classes: Vec<String>,
    pub revision: String,
}

#[derive(Debug)]
pub struct VitalsService {
    predictor: VerdictPredictor,
}

impl VitalsService {
    pub fn new(predictor: VerdictPredictor) -> Self {
        Self { predictor }
    }

    pub fn from_config(config: &VitalsConfig) -> Self {
        Self::new(VerdictPredictor::from_config(config))
    }

    fn store(&self) -> &RecordStore {
        self.predictor.store()
    }

    pub fn catalog_snapshot(&self) -> Catalog {
        self.store().load_all()
    }

    pub fn get_record(&self, id: &str) -> VitalsResult<PatientRecord> {
        Ok(self.store().lookup(id)?)
    }

    /// Every record ordered by `field` (`height`, `weight`, `bmi`) in
    /// `order` (`asc`, `desc`).
    pub fn get_sorted(&self, field: &str, order: &str) -> VitalsResult<Vec<PatientRecord>> {
        Ok(self.store().sorted_view(field, order)?)
    }

    pub fn predict_verdict(
        &self,
        age: u32,
        gender: &str,
        height: f64,
        weight: f64,
        bmi: f64,
    ) -> VitalsResult<String> {
        Ok(self.predictor.predict(age, gender, height, weight, bmi)?)
    }

    /// Persist a new record and return its identifier. The cached model
    /// becomes stale and is retrained on the next prediction.
    pub fn create_record(&self, patient: NewPatient) -> VitalsResult<PatientId> {
        Ok(self.store().append(patient.into_record())?)
    }

    /// Fit and persist a new model on the current catalog.
    pub fn retrain(&self) -> VitalsResult<TrainingReport> {
        let catalog = self.catalog_snapshot();
        let artifact = self.predictor.cache().retrain(&catalog)?;
        Ok(TrainingReport {
            records: artifact.trained_on,
            classes: artifact.classes.clone(),
            revision: artifact.catalog_revision.to_string(),
        })
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary::of(&self.catalog_snapshot())
    }
}
