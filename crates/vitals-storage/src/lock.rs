//! Exclusive catalog lock held across a read-modify-write cycle.
//!
//! Backed by an advisory lock on a sidecar file (`<catalog>.lock`) so the
//! catalog itself can be replaced by rename while the lock is held.
//! Acquisition never blocks: it polls with a bounded number of attempts.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use fd_lock::RwLock;
use vitals_core::errors::StoreError;

/// Sidecar lock guarding catalog writes.
#[derive(Debug, Clone)]
pub struct CatalogLock {
    path: PathBuf,
    retries: u32,
    delay: Duration,
}

impl CatalogLock {
    pub fn new(path: PathBuf, retries: u32, delay: Duration) -> Self {
        Self {
            path,
            retries: retries.max(1),
            delay,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` while holding the exclusive lock.
    ///
    /// Fails with `StorageUnavailable` when the lock is still held by
    /// another writer after every attempt, or the lock file cannot be opened.
    pub fn with_exclusive<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce() -> Result<T, StoreError>,
    {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| StoreError::unavailable(parent, e))?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| StoreError::unavailable(&self.path, e))?;
        let mut lock = RwLock::new(file);

        let mut attempt = 0;
        loop {
            attempt += 1;
            match lock.try_write() {
                Ok(_guard) => return f(),
                Err(e) if e.kind() == ErrorKind::WouldBlock && attempt < self.retries => {
                    tracing::debug!(
                        path = %self.path.display(),
                        attempt,
                        "catalog lock busy, retrying"
                    );
                    thread::sleep(self.delay);
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    tracing::warn!(
                        path = %self.path.display(),
                        attempts = attempt,
                        "catalog lock still held, giving up"
                    );
                    return Err(StoreError::unavailable(
                        &self.path,
                        format!("lock still held after {attempt} attempts"),
                    ));
                }
                Err(e) => return Err(StoreError::unavailable(&self.path, e)),
            }
        }
    }
}
