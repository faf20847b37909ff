//! Owns the persisted catalog document.
//!
//! Reads are lock-free and soft-fail: a missing, unreadable, or unparsable
//! document reads as an empty catalog. `append` runs the full
//! read-merge-write cycle under the exclusive catalog lock and replaces the
//! document atomically.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use vitals_core::config::StorageConfig;
use vitals_core::constants::{
    CORRUPT_FILE_SUFFIX, DEFAULT_LOCK_RETRIES, DEFAULT_LOCK_RETRY_DELAY_MS, LOCK_FILE_SUFFIX,
};
use vitals_core::errors::StoreError;
use vitals_core::types::{Catalog, PatientId, PatientRecord, SortField, SortOrder};

use crate::atomic::write_atomic;
use crate::lock::CatalogLock;

/// What a raw read of the catalog document found.
enum CatalogRead {
    Missing,
    Parsed(Catalog),
    Corrupt(String),
    Unreadable(std::io::Error),
}

/// File-backed catalog of patient records.
#[derive(Debug, Clone)]
pub struct RecordStore {
    catalog_path: PathBuf,
    lock: CatalogLock,
}

impl RecordStore {
    /// Open the store described by `config`. Nothing is touched on disk
    /// until the first read or write.
    pub fn open(config: &StorageConfig) -> Self {
        let catalog_path = config.catalog_path();
        let lock = CatalogLock::new(
            sidecar(&catalog_path, LOCK_FILE_SUFFIX),
            config.effective_lock_retries(),
            config.effective_lock_retry_delay(),
        );
        Self { catalog_path, lock }
    }

    /// Store at an explicit catalog path with default lock settings.
    pub fn at(catalog_path: impl Into<PathBuf>) -> Self {
        let catalog_path = catalog_path.into();
        let lock = CatalogLock::new(
            sidecar(&catalog_path, LOCK_FILE_SUFFIX),
            DEFAULT_LOCK_RETRIES,
            std::time::Duration::from_millis(DEFAULT_LOCK_RETRY_DELAY_MS),
        );
        Self { catalog_path, lock }
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    /// Path of the sidecar lock file.
    pub fn lock_path(&self) -> &Path {
        self.lock.path()
    }

    /// Read the whole catalog. Never fails: anything but a well-formed
    /// document yields an empty catalog, with a warning for corrupt or
    /// unreadable files.
    pub fn load_all(&self) -> Catalog {
        match self.read_catalog() {
            CatalogRead::Parsed(catalog) => catalog,
            CatalogRead::Missing => Catalog::new(),
            CatalogRead::Corrupt(reason) => {
                tracing::warn!(
                    path = %self.catalog_path.display(),
                    error = %reason,
                    "catalog document is unparsable, treating as empty"
                );
                Catalog::new()
            }
            CatalogRead::Unreadable(e) => {
                tracing::warn!(
                    path = %self.catalog_path.display(),
                    error = %e,
                    "catalog document is unreadable, treating as empty"
                );
                Catalog::new()
            }
        }
    }

    /// Exact-match lookup.
    pub fn lookup(&self, id: &str) -> Result<PatientRecord, StoreError> {
        self.load_all()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    /// Sorted view from raw request strings. Both arguments are validated
    /// before the catalog is read.
    pub fn sorted_view(&self, field: &str, order: &str) -> Result<Vec<PatientRecord>, StoreError> {
        let field: SortField = field.parse()?;
        let order: SortOrder = order.parse()?;
        Ok(self.sorted(field, order))
    }

    /// Every record ordered by `field`.
    pub fn sorted(&self, field: SortField, order: SortOrder) -> Vec<PatientRecord> {
        self.load_all().sorted_by(field, order)
    }

    /// Validate `record`, assign it the next identifier, and rewrite the
    /// catalog with it appended.
    ///
    /// An unparsable document is copied aside to `<catalog>.corrupt` and
    /// replaced by a catalog holding only the new record. A document that
    /// exists but cannot be read is never overwritten.
    pub fn append(&self, record: PatientRecord) -> Result<PatientId, StoreError> {
        record.validate()?;

        self.lock.with_exclusive(|| {
            let mut catalog = match self.read_catalog() {
                CatalogRead::Parsed(catalog) => catalog,
                CatalogRead::Missing => Catalog::new(),
                CatalogRead::Corrupt(reason) => {
                    self.preserve_corrupt(&reason);
                    Catalog::new()
                }
                CatalogRead::Unreadable(e) => {
                    return Err(StoreError::unavailable(&self.catalog_path, e));
                }
            };

            let id = catalog.append(record);
            let bytes = catalog
                .to_json_pretty()
                .map_err(|e| StoreError::unavailable(&self.catalog_path, e))?;
            write_atomic(&self.catalog_path, &bytes)
                .map_err(|e| StoreError::unavailable(&self.catalog_path, e))?;

            tracing::info!(
                patient_id = %id,
                records = catalog.len(),
                "appended patient record"
            );
            Ok(id)
        })
    }

    fn read_catalog(&self) -> CatalogRead {
        let bytes = match fs::read(&self.catalog_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return CatalogRead::Missing,
            Err(e) => return CatalogRead::Unreadable(e),
        };
        match Catalog::from_json(&bytes) {
            Ok(catalog) => CatalogRead::Parsed(catalog),
            Err(e) => CatalogRead::Corrupt(e.to_string()),
        }
    }

    /// Copy the unparsable document aside. Earlier copies are kept:
    /// `<catalog>.corrupt`, then `<catalog>.corrupt.1`, `.corrupt.2`, ...
    fn preserve_corrupt(&self, reason: &str) {
        let backup = free_backup_path(&sidecar(&self.catalog_path, CORRUPT_FILE_SUFFIX));
        match fs::copy(&self.catalog_path, &backup) {
            Ok(_) => tracing::warn!(
                path = %self.catalog_path.display(),
                backup = %backup.display(),
                error = %reason,
                "catalog document is unparsable, preserved a copy and starting empty"
            ),
            Err(e) => tracing::warn!(
                path = %self.catalog_path.display(),
                error = %e,
                "catalog document is unparsable and could not be preserved"
            ),
        }
    }
}

/// `<path>.<suffix>`, keeping the existing extension.
fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// `base` if nothing exists there, otherwise the first free `base.<n>`.
fn free_backup_path(base: &Path) -> PathBuf {
    if !base.exists() {
        return base.to_path_buf();
    }
    (1u32..)
        .map(|n| sidecar(base, &n.to_string()))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| base.to_path_buf())
}
