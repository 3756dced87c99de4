//! Laundry service catalog.
//!
//! The catalog is fixed for the lifetime of the process: four services, each
//! with a display label and a per-load price.

pub mod catalog;

pub use catalog::{ServiceCatalogEntry, ServiceCode, entries, entry, lookup};
