//! Catalog summary metrics.

use std::collections::BTreeMap;

use serde::Serialize;
use vitals_core::types::Catalog;

/// Aggregate view of a catalog. Means are `None` for an empty catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSummary {
    pub total: usize,
    pub mean_bmi: Option<f64>,
    pub mean_age: Option<f64>,
    /// Record count per verdict label.
    pub verdicts: BTreeMap<String, usize>,
}

impl CatalogSummary {
    pub fn of(catalog: &Catalog) -> Self {
        let total = catalog.len();
        let mut bmi_sum = 0.0;
        let mut age_sum = 0.0;
        let mut verdicts = BTreeMap::new();
        for record in catalog.records() {
            bmi_sum += record.bmi;
            age_sum += f64::from(record.age);
            *verdicts.entry(record.verdict.clone()).or_insert(0) += 1;
        }

        let mean = |sum: f64| (total > 0).then(|| sum / total as f64);
        Self {
            total,
            mean_bmi: mean(bmi_sum),
            mean_age: mean(age_sum),
            verdicts,
        }
    }
}
