//! End-to-end prediction tests: catalog on disk, artifact on disk, cache in memory.

use std::fs;
use std::path::Path;

use tempfile::tempdir;
use vitals_core::config::VitalsConfig;
use vitals_core::errors::InferenceError;
use vitals_core::types::PatientRecord;
use vitals_inference::{CacheState, ModelArtifact, VerdictPredictor};

fn record(name: &str, age: u32, gender: &str, height: f64, weight: f64, verdict: &str) -> PatientRecord {
    PatientRecord {
        name: name.to_string(),
        city: "Unknown".to_string(),
        age,
        gender: gender.to_string(),
        height,
        weight,
        bmi: vitals_core::bmi(height, weight),
        verdict: verdict.to_string(),
    }
}

fn config_in(dir: &Path) -> VitalsConfig {
    let mut config = VitalsConfig::default();
    config.storage.data_dir = Some(dir.display().to_string());
    config
}

fn seed_catalog(predictor: &VerdictPredictor) {
    let rows = [
        record("Asha", 25, "female", 1.62, 44.0, "Underweight"),
        record("Ben", 33, "male", 1.85, 58.0, "Underweight"),
        record("Chen", 41, "male", 1.75, 70.0, "Normal"),
        record("Dana", 29, "female", 1.65, 60.0, "Normal"),
        record("Eli", 52, "male", 1.70, 98.0, "Obese"),
        record("Fay", 47, "female", 1.58, 88.0, "Obese"),
    ];
    for row in rows {
        predictor.store().append(row).unwrap();
    }
}

fn read_artifact(path: &Path) -> ModelArtifact {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// PREDICTION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn single_record_catalog_predicts_its_verdict() {
    let dir = tempdir().unwrap();
    let predictor = VerdictPredictor::from_config(&config_in(dir.path()));
    predictor
        .store()
        .append(record("A", 30, "Male", 1.75, 70.0, "Normal"))
        .unwrap();

    let verdict = predictor.predict(30, "male", 1.75, 70.0, 22.86).unwrap();
    assert_eq!(verdict, "Normal");
    assert!(dir.path().join("model.json").exists());
}

#[test]
fn verdict_is_always_a_catalog_label() {
    let dir = tempdir().unwrap();
    let predictor = VerdictPredictor::from_config(&config_in(dir.path()));
    seed_catalog(&predictor);

    for (age, gender, height, weight) in [
        (18, "female", 1.50, 40.0),
        (60, "MALE", 1.90, 120.0),
        (35, "other", 1.70, 65.0),
    ] {
        let bmi = vitals_core::bmi(height, weight);
        let verdict = predictor.predict(age, gender, height, weight, bmi).unwrap();
        assert!(["Underweight", "Normal", "Obese"].contains(&verdict.as_str()));
    }
}

#[test]
fn empty_catalog_is_insufficient_and_writes_nothing() {
    let dir = tempdir().unwrap();
    let predictor = VerdictPredictor::from_config(&config_in(dir.path()));

    let err = predictor.predict(30, "male", 1.75, 70.0, 22.86).unwrap_err();
    assert!(matches!(err, InferenceError::InsufficientData));
    assert!(!dir.path().join("model.json").exists());
}

#[test]
fn non_finite_query_is_rejected() {
    let dir = tempdir().unwrap();
    let predictor = VerdictPredictor::from_config(&config_in(dir.path()));
    seed_catalog(&predictor);

    let err = predictor.predict(30, "male", f64::NAN, 70.0, 22.0).unwrap_err();
    assert!(matches!(err, InferenceError::InvalidQuery(_)));
}

#[test]
fn repeated_predictions_are_identical() {
    let dir = tempdir().unwrap();
    let predictor = VerdictPredictor::from_config(&config_in(dir.path()));
    seed_catalog(&predictor);

    let first = predictor.predict(38, "female", 1.68, 64.0, 22.68).unwrap();
    let state = predictor.cache().state();
    for _ in 0..5 {
        assert_eq!(predictor.predict(38, "female", 1.68, 64.0, 22.68).unwrap(), first);
    }
    assert_eq!(predictor.cache().state(), state);
}

#[test]
fn training_is_deterministic_across_processes() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    for dir in [a.path(), b.path()] {
        let predictor = VerdictPredictor::from_config(&config_in(dir));
        seed_catalog(&predictor);
        predictor.predict(30, "male", 1.75, 70.0, 22.86).unwrap();
    }
    assert_eq!(
        fs::read(a.path().join("model.json")).unwrap(),
        fs::read(b.path().join("model.json")).unwrap()
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// ARTIFACT CACHE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn fresh_process_reuses_persisted_model() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    let first = VerdictPredictor::from_config(&config);
    seed_catalog(&first);
    first.predict(30, "male", 1.75, 70.0, 22.86).unwrap();

    // Mark the artifact so a reload is distinguishable from a retrain.
    let path = dir.path().join("model.json");
    let mut artifact = read_artifact(&path);
    artifact.trained_on = 999;
    fs::write(&path, serde_json::to_vec(&artifact).unwrap()).unwrap();

    let second = VerdictPredictor::from_config(&config);
    second.predict(30, "male", 1.75, 70.0, 22.86).unwrap();
    match second.cache().state() {
        CacheState::Loaded { trained_on, .. } => assert_eq!(trained_on, 999),
        CacheState::Empty => panic!("model was not cached"),
    }
}

#[test]
fn corrupt_artifact_triggers_silent_retrain() {
    let dir = tempdir().unwrap();
    let predictor = VerdictPredictor::from_config(&config_in(dir.path()));
    seed_catalog(&predictor);
    let path = dir.path().join("model.json");
    fs::write(&path, b"not a model").unwrap();

    predictor.predict(30, "male", 1.75, 70.0, 22.86).unwrap();
    let artifact = read_artifact(&path);
    assert!(artifact.is_compatible());
    assert_eq!(artifact.trained_on, 6);
}

#[test]
fn incompatible_artifact_is_treated_as_absent() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    let first = VerdictPredictor::from_config(&config);
    seed_catalog(&first);
    first.predict(30, "male", 1.75, 70.0, 22.86).unwrap();

    let path = dir.path().join("model.json");
    let mut raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    raw["schema"]["fingerprint"] = serde_json::Value::from("0000");
    raw["trained_on"] = serde_json::Value::from(999);
    fs::write(&path, serde_json::to_vec(&raw).unwrap()).unwrap();

    let second = VerdictPredictor::from_config(&config);
    second.predict(30, "male", 1.75, 70.0, 22.86).unwrap();
    let artifact = read_artifact(&path);
    assert!(artifact.is_compatible());
    assert_eq!(artifact.trained_on, 6);
}

#[test]
fn catalog_change_triggers_retrain() {
    let dir = tempdir().unwrap();
    let predictor = VerdictPredictor::from_config(&config_in(dir.path()));
    seed_catalog(&predictor);
    predictor.predict(30, "male", 1.75, 70.0, 22.86).unwrap();

    predictor
        .store()
        .append(record("Gus", 39, "male", 1.80, 90.0, "Overweight"))
        .unwrap();
    predictor.predict(30, "male", 1.75, 70.0, 22.86).unwrap();

    let catalog = predictor.store().load_all();
    assert_eq!(
        predictor.cache().state(),
        CacheState::Loaded {
            revision: catalog.revision(),
            trained_on: 7,
        }
    );
    assert!(read_artifact(&dir.path().join("model.json"))
        .classes
        .contains(&"Overweight".to_string()));
}

#[test]
fn staleness_check_can_be_disabled() {
    let dir = tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.model.retrain_on_catalog_change = Some(false);
    let predictor = VerdictPredictor::from_config(&config);
    seed_catalog(&predictor);
    predictor.predict(30, "male", 1.75, 70.0, 22.86).unwrap();

    predictor
        .store()
        .append(record("Gus", 39, "male", 1.80, 90.0, "Overweight"))
        .unwrap();
    predictor.predict(30, "male", 1.75, 70.0, 22.86).unwrap();

    match predictor.cache().state() {
        CacheState::Loaded { trained_on, .. } => assert_eq!(trained_on, 6),
        CacheState::Empty => panic!("model was not cached"),
    }
}

#[test]
fn unwritable_artifact_still_serves_predictions() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"").unwrap();

    let mut config = config_in(dir.path());
    config.model.artifact_file = Some(blocker.join("model.json").display().to_string());
    let predictor = VerdictPredictor::from_config(&config);
    seed_catalog(&predictor);

    assert!(predictor.predict(30, "male", 1.75, 70.0, 22.86).is_ok());

    let err = predictor
        .cache()
        .retrain(&predictor.store().load_all())
        .unwrap_err();
    assert!(matches!(err, InferenceError::Store(_)));
}

#[test]
fn invalidate_drops_only_the_in_memory_model() {
    let dir = tempdir().unwrap();
    let predictor = VerdictPredictor::from_config(&config_in(dir.path()));
    seed_catalog(&predictor);
    predictor.predict(30, "male", 1.75, 70.0, 22.86).unwrap();

    predictor.cache().invalidate();
    assert_eq!(predictor.cache().state(), CacheState::Empty);
    assert!(predictor.cache().artifact_store().read().is_some());
}
