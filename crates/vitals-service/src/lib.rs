//! # vitals-service
//!
//! Boundary operations over the record store and the verdict model.
//! Front-ends (the `vitals` CLI, an HTTP layer) call [`VitalsService`] and
//! map [`VitalsError`](vitals_core::VitalsError) codes to their own
//! responses.

pub mod service;
pub mod summary;

pub use service::{NewPatient, TrainingReport, VitalsService};
pub use summary::CatalogSummary;
