//! Property tests for the forest and trainer.

use proptest::prelude::*;
use vitals_core::types::{Catalog, PatientRecord};
use vitals_inference::Trainer;

const VERDICTS: [&str; 3] = ["Normal", "Obese", "Underweight"];

fn arb_record() -> impl Strategy<Value = PatientRecord> {
    (1u32..100, prop::bool::ANY, 1.2f64..2.1, 35.0f64..150.0, 0usize..3).prop_map(
        |(age, female, height, weight, verdict)| PatientRecord {
            name: "P".to_string(),
            city: "Unknown".to_string(),
            age,
            gender: if female { "female" } else { "male" }.to_string(),
            height,
            weight,
            bmi: vitals_core::bmi(height, weight),
            verdict: VERDICTS[verdict].to_string(),
        },
    )
}

fn catalog_of(records: &[PatientRecord]) -> Catalog {
    let mut catalog = Catalog::new();
    for record in records {
        catalog.append(record.clone());
    }
    catalog
}

proptest! {
    #[test]
    fn prediction_is_a_training_label(
        records in prop::collection::vec(arb_record(), 1..25),
        query in (1u32..100, 1.2f64..2.1, 35.0f64..150.0),
    ) {
        let catalog = catalog_of(&records);
        let artifact = Trainer::default().train(&catalog).unwrap();
        let (age, height, weight) = query;
        let x = vitals_core::encode(age, "female", height, weight, vitals_core::bmi(height, weight));
        let verdict = artifact.predict(&x).unwrap();
        prop_assert!(records.iter().any(|r| r.verdict == verdict));
    }

    #[test]
    fn training_is_reproducible(records in prop::collection::vec(arb_record(), 1..15)) {
        let catalog = catalog_of(&records);
        let trainer = Trainer::default();
        prop_assert_eq!(trainer.train(&catalog).unwrap(), trainer.train(&catalog).unwrap());
    }
}
