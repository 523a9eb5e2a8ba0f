//! Domain layer: the taxonomy tree and its rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod display;
pub mod error;
pub mod level;
pub mod traversal;

pub use arena::{InsertOutcome, NodeId, TaxonNode, TaxonomyTree};
pub use display::{node_label, DisplayOptions, TreeNodeConvert};
pub use error::{DomainError, DomainResult};
pub use level::{fold_name, names_match, TaxonLevel, REQUIRED_TAX_LEVELS, TAX_LEVELS};
pub use traversal::{LevelOrderIterator, PostOrderIterator, TraversalOrder, TreeIterator};
