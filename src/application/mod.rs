//! Application layer: services and use cases
//!
//! This layer owns the session tree and orchestrates domain operations.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use services::{TaxonMatch, TaxonomyService, EXAMPLE_SPECIES};
