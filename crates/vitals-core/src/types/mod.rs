//! Record, identifier, and catalog types.

pub mod catalog;
pub mod gender;
pub mod identifier;
pub mod patient;
pub mod sort;

pub use catalog::{Catalog, CatalogRevision};
pub use gender::Gender;
pub use identifier::PatientId;
pub use patient::{bmi, PatientRecord};
pub use sort::{SortField, SortOrder};
