//! Service layer modules.
//!
//! The catalog service owns persistence and pricing of the admin collections.

pub mod catalog;

pub use catalog::{CatalogError, CatalogResult, CatalogService, ProductRecord, RecomputeFailure, RecomputeReport};
