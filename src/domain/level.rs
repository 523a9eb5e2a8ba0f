//! Fixed taxonomic ranks and name comparison shared by every tree operation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the five fixed ranks, ordered from most general to most specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaxonLevel {
    Class,
    Order,
    Family,
    Genus,
    Species,
}

/// All ranks in depth order: index == depth from the root.
pub const TAX_LEVELS: [TaxonLevel; 5] = [
    TaxonLevel::Class,
    TaxonLevel::Order,
    TaxonLevel::Family,
    TaxonLevel::Genus,
    TaxonLevel::Species,
];

/// Number of names a complete path must carry.
pub const REQUIRED_TAX_LEVELS: usize = TAX_LEVELS.len();

impl TaxonLevel {
    /// Rank for a node at `depth` below the root, `None` beyond Species.
    pub fn from_depth(depth: usize) -> Option<Self> {
        TAX_LEVELS.get(depth).copied()
    }

    pub fn depth(self) -> usize {
        self as usize
    }

    pub fn is_species(self) -> bool {
        self == TaxonLevel::Species
    }

    /// Rank one step more specific, `None` for Species.
    pub fn child(self) -> Option<Self> {
        Self::from_depth(self.depth() + 1)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaxonLevel::Class => "Class",
            TaxonLevel::Order => "Order",
            TaxonLevel::Family => "Family",
            TaxonLevel::Genus => "Genus",
            TaxonLevel::Species => "Species",
        }
    }
}

impl fmt::Display for TaxonLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxonLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TAX_LEVELS
            .iter()
            .copied()
            .find(|level| names_match(level.as_str(), s))
            .ok_or_else(|| format!("unknown taxonomic level: {s}"))
    }
}

/// Case-folded form of a name, used as the comparison key everywhere.
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// Case-insensitive exact comparison of two names.
pub fn names_match(a: &str, b: &str) -> bool {
    a == b || fold_name(a) == fold_name(b)
}
