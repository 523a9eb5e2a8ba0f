//! taxotree: an in-memory Class > Order > Family > Genus > Species taxonomy.
//!
//! The [`domain`] layer holds the tree and its rules, [`application`] owns one
//! session tree, and [`cli`] is the command-line surface around it.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{
    DomainError, DomainResult, InsertOutcome, NodeId, TaxonLevel, TaxonNode, TaxonomyTree,
};
