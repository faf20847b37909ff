//! Shared constants for the Vitals verdict system.

/// Prefix of every generated patient identifier.
pub const ID_PREFIX: &str = "P";

/// Minimum digit count of the identifier sequence (`P007`).
pub const ID_SEQUENCE_WIDTH: usize = 3;

/// City recorded when the caller does not supply one.
pub const DEFAULT_CITY: &str = "Unknown";

/// Default directory holding the catalog and the model artifact.
pub const DEFAULT_DATA_DIR: &str = ".";

/// Default catalog document name.
pub const DEFAULT_CATALOG_FILE: &str = "patients.json";

/// Default model artifact name.
pub const DEFAULT_ARTIFACT_FILE: &str = "model.json";

/// Suffix of the sidecar file used for the catalog write lock.
pub const LOCK_FILE_SUFFIX: &str = "lock";

/// Suffix given to an unparsable catalog before it is overwritten.
pub const CORRUPT_FILE_SUFFIX: &str = "corrupt";

/// Default number of lock acquisition attempts before giving up.
pub const DEFAULT_LOCK_RETRIES: u32 = 50;

/// Default pause between lock acquisition attempts, in milliseconds.
pub const DEFAULT_LOCK_RETRY_DELAY_MS: u64 = 20;

// ---- Forest hyperparameters ----

/// Default number of trees in the verdict forest.
pub const DEFAULT_N_ESTIMATORS: u32 = 10;

/// Default minimum node size eligible for a split.
pub const DEFAULT_MIN_SAMPLES_SPLIT: u32 = 2;

/// Default sampling seed. Fixed so retraining the same catalog is reproducible.
pub const DEFAULT_SEED: u64 = 42;

// ---- Feature schema ----

/// Number of features in a feature vector.
pub const FEATURE_COUNT: usize = 5;

/// Feature names in encoding order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["age", "gender", "height", "weight", "bmi"];

/// Bump whenever the encoding of any feature changes.
pub const FEATURE_SCHEMA_VERSION: u32 = 1;

/// Version of the persisted artifact envelope.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;
