//! # vitals-storage
//!
//! The record store. Owns the persisted catalog document and serializes
//! writers through an exclusive file lock; every write replaces the whole
//! document via temp-file + rename so readers never see a partial file.

pub mod atomic;
pub mod lock;
pub mod store;

pub use atomic::write_atomic;
pub use lock::CatalogLock;
pub use store::RecordStore;
