//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.

mod taxonomy;

pub use taxonomy::{ExampleSpecies, TaxonMatch, TaxonomyService, EXAMPLE_SPECIES};
