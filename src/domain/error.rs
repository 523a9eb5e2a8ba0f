//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::level::TaxonLevel;

/// Domain errors represent violations of the taxonomy tree's rules.
/// A failing operation never leaves the tree partially modified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("path must name exactly {expected} levels, got {actual}")]
    InvalidPathLength { expected: usize, actual: usize },

    #[error("tree already has Class '{existing}', cannot add Class '{requested}'")]
    ClassMismatch { existing: String, requested: String },

    #[error("'{name}' is a {level}, only Species can be changed")]
    NotSpeciesLevel { name: String, level: TaxonLevel },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("refusing to delete the root node: {0}")]
    RootDeletionRefused(String),

    #[error("{level} name must not be empty")]
    EmptyName { level: TaxonLevel },

    #[error("node handle no longer refers to a node in this tree")]
    StaleNode,
}

/// Result type for tree operations.
pub type DomainResult<T> = Result<T, DomainError>;
