//! Taxonomy session service
//!
//! Owns the single tree of one session and exposes the caller-facing
//! operations: add, find, update, delete, render and traverse.

use itertools::Itertools;
use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::{CatalogEntry, DisplayStyle, Settings};
use crate::domain::{
    DisplayOptions, DomainError, InsertOutcome, NodeId, TaxonLevel, TaxonNode, TaxonomyTree,
    TraversalOrder,
};

/// A species loaded into every session when `seed_examples` is enabled.
#[derive(Debug, Clone, Copy)]
pub struct ExampleSpecies {
    pub path: [&'static str; 5],
    pub common_name: &'static str,
    pub reference_link: &'static str,
}

pub const EXAMPLE_SPECIES: [ExampleSpecies; 2] = [
    ExampleSpecies {
        path: [
            "Chondrichthyes",
            "Lamniformes",
            "Lamnidae",
            "Carcharodon",
            "carcharias",
        ],
        common_name: "Great White Shark",
        reference_link: "https://en.wikipedia.org/wiki/Great_white_shark",
    },
    ExampleSpecies {
        path: [
            "Chondrichthyes",
            "Carcharhiniformes",
            "Carcharhinidae",
            "Galeocerdo",
            "cuvier",
        ],
        common_name: "Tiger Shark",
        reference_link: "https://en.wikipedia.org/wiki/Tiger_shark",
    },
];

/// Owned snapshot of a located node, detached from the tree borrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonMatch {
    pub id: NodeId,
    pub name: String,
    pub level: TaxonLevel,
    pub common_name: String,
    pub reference_link: String,
    /// Names from the Class down to this node, inclusive.
    pub lineage: Vec<String>,
    pub children: usize,
}

impl TaxonMatch {
    /// Lineage joined as `Class > Order > ...`.
    pub fn lineage_display(&self) -> String {
        self.lineage.iter().join(" > ")
    }

    pub fn reference_link(&self) -> Option<&str> {
        Some(self.reference_link.as_str()).filter(|link| !link.is_empty())
    }
}

/// Service holding one taxonomy tree for the lifetime of a session.
#[derive(Debug, Default)]
pub struct TaxonomyService {
    tree: TaxonomyTree,
}

impl TaxonomyService {
    /// Create a service around an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a session tree from settings: example species first, then the catalog.
    pub fn from_settings(settings: &Settings) -> ApplicationResult<Self> {
        let mut service = Self::new();
        if settings.seed_examples {
            service.seed_examples()?;
        }
        service.load_catalog(&settings.catalog)?;
        Ok(service)
    }

    /// Insert the built-in example sharks.
    pub fn seed_examples(&mut self) -> ApplicationResult<()> {
        for example in EXAMPLE_SPECIES.iter() {
            self.tree
                .insert_path(&example.path, example.common_name, example.reference_link)?;
        }
        debug!("seeded {} example species", EXAMPLE_SPECIES.len());
        Ok(())
    }

    /// Insert catalog entries in order; the first invalid entry aborts loading.
    pub fn load_catalog(&mut self, catalog: &[CatalogEntry]) -> ApplicationResult<()> {
        for (index, entry) in catalog.iter().enumerate() {
            self.tree
                .insert_path(entry.path.as_slice(), &entry.common_name, &entry.reference_link)
                .map_err(|source| ApplicationError::Catalog { index, source })?;
        }
        Ok(())
    }

    pub fn tree(&self) -> &TaxonomyTree {
        &self.tree
    }

    /// Insert or upsert a species path.
    #[instrument(level = "debug", skip(self))]
    pub fn add_species(
        &mut self,
        path: &[String],
        common_name: &str,
        reference_link: &str,
    ) -> ApplicationResult<InsertOutcome> {
        let outcome = self.tree.insert_path(path, common_name, reference_link)?;
        info!("add_species: {:?}", outcome);
        Ok(outcome)
    }

    /// Locate the first node named `query` (taxonomic or common name).
    #[instrument(level = "debug", skip(self))]
    pub fn find(&self, query: &str) -> ApplicationResult<TaxonMatch> {
        let id = self
            .tree
            .search(query)
            .ok_or_else(|| DomainError::NotFound(query.to_string()))?;
        self.snapshot(id)
    }

    /// Locate `query` and overwrite its common name and reference link.
    ///
    /// Fails with `NotSpeciesLevel` when the first match is an interior rank.
    #[instrument(level = "debug", skip(self))]
    pub fn update_species(
        &mut self,
        query: &str,
        common_name: &str,
        reference_link: &str,
    ) -> ApplicationResult<TaxonMatch> {
        let id = self
            .tree
            .search(query)
            .ok_or_else(|| DomainError::NotFound(query.to_string()))?;
        self.tree.update_species(id, common_name, reference_link)?;
        self.snapshot(id)
    }

    /// Check that `query` names a Species, then delete it.
    ///
    /// The level check runs before the tree is touched, so a query naming a
    /// Genus or higher is refused with `NotSpeciesLevel`.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_species(&mut self, query: &str) -> ApplicationResult<TaxonNode> {
        let target = self.find(query)?;
        if !target.level.is_species() {
            warn!("delete refused: '{}' is a {}", target.name, target.level);
            return Err(DomainError::NotSpeciesLevel {
                name: target.name,
                level: target.level,
            }
            .into());
        }
        let removed = self
            .tree
            .delete_species(query)?
            .ok_or_else(|| DomainError::NotFound(query.to_string()))?;
        info!("delete_species: removed '{}'", removed.name());
        Ok(removed)
    }

    /// Render the whole tree in the configured style.
    pub fn render(&self, style: DisplayStyle, options: DisplayOptions) -> String {
        match style {
            DisplayStyle::Indented => self.tree.display_with(options),
            DisplayStyle::Boxed if self.tree.is_empty() => String::new(),
            DisplayStyle::Boxed => self.tree.to_tree_string_with(options).to_string(),
        }
    }

    /// Snapshots of every node in the requested order.
    pub fn traverse(&self, order: TraversalOrder) -> ApplicationResult<Vec<TaxonMatch>> {
        self.tree
            .traverse(order)
            .into_iter()
            .map(|id| self.snapshot(id))
            .collect()
    }

    fn snapshot(&self, id: NodeId) -> ApplicationResult<TaxonMatch> {
        let node = self.tree.get(id).ok_or(DomainError::StaleNode)?;
        let lineage = self
            .tree
            .lineage(id)
            .ok_or(DomainError::StaleNode)?
            .into_iter()
            .filter_map(|ancestor| self.tree.get(ancestor))
            .map(|ancestor| ancestor.name().to_string())
            .collect();
        Ok(TaxonMatch {
            id,
            name: node.name().to_string(),
            level: node.level(),
            common_name: node.common_name().to_string(),
            reference_link: node.reference_link().to_string(),
            lineage,
            children: node.children().len(),
        })
    }

    /// End the session, releasing every node. Returns the number released.
    pub fn close(self) -> usize {
        self.tree.destroy()
    }
}
