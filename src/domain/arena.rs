use generational_arena::{Arena, Index};
use tracing::{debug, info, instrument, warn};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::level::{names_match, TaxonLevel, REQUIRED_TAX_LEVELS, TAX_LEVELS};
use crate::domain::traversal::{LevelOrderIterator, PostOrderIterator, TreeIterator};

/// Stable handle to a node in a [`TaxonomyTree`].
///
/// Handles go stale once their node is deleted; every lookup through a stale
/// handle yields `None` or [`DomainError::StaleNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

/// One taxon in the hierarchy.
///
/// The level is fixed at creation from the node's depth. Common name and
/// reference link stay empty on every level but Species.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonNode {
    name: String,
    level: TaxonLevel,
    common_name: String,
    reference_link: String,
    children: Vec<NodeId>,
}

impl TaxonNode {
    fn new(name: &str, level: TaxonLevel) -> Self {
        Self {
            name: name.to_string(),
            level,
            common_name: String::new(),
            reference_link: String::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> TaxonLevel {
        self.level
    }

    pub fn common_name(&self) -> &str {
        &self.common_name
    }

    /// External reference (usually a URL); empty when none was given.
    pub fn reference_link(&self) -> &str {
        &self.reference_link
    }

    pub fn has_reference_link(&self) -> bool {
        !self.reference_link.is_empty()
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Case-insensitive match against the taxonomic name or a non-empty common name.
    pub fn matches(&self, query: &str) -> bool {
        names_match(&self.name, query)
            || (!self.common_name.is_empty() && names_match(&self.common_name, query))
    }
}

/// What an accepted [`TaxonomyTree::insert_path`] did to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// At least one level along the path was new; `new_nodes` counts them.
    Created { species: NodeId, new_nodes: usize },
    /// The path existed and the Species details were overwritten.
    Updated { species: NodeId },
    /// The path existed with identical Species details.
    Unchanged { species: NodeId },
}

impl InsertOutcome {
    pub fn species(&self) -> NodeId {
        match *self {
            InsertOutcome::Created { species, .. }
            | InsertOutcome::Updated { species }
            | InsertOutcome::Unchanged { species } => species,
        }
    }
}

/// Arena-based single-root taxonomy (Class → Order → Family → Genus → Species).
///
/// Nodes live in a generational arena and reference their children by index.
/// No parent links are stored; operations that need the parent carry it
/// through the walk instead.
#[derive(Debug)]
pub struct TaxonomyTree {
    arena: Arena<TaxonNode>,
    root: Option<NodeId>,
}

impl Default for TaxonomyTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TaxonomyTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get(&self, id: NodeId) -> Option<&TaxonNode> {
        self.arena.get(id.0)
    }

    fn node(&self, id: NodeId) -> DomainResult<&TaxonNode> {
        self.arena.get(id.0).ok_or(DomainError::StaleNode)
    }

    fn node_mut(&mut self, id: NodeId) -> DomainResult<&mut TaxonNode> {
        self.arena.get_mut(id.0).ok_or(DomainError::StaleNode)
    }

    /// Number of live nodes across all levels.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn species_count(&self) -> usize {
        self.iter()
            .filter(|(_, node)| node.level.is_species())
            .count()
    }

    /// Inserts a full Class-to-Species path, reusing every level that already exists.
    ///
    /// Matching is case-insensitive per level, so re-inserting a known path only
    /// overwrites the Species node's common name and reference link. The path is
    /// validated before anything is created: a wrong length, a blank name, or a
    /// Class differing from the existing root leaves the tree untouched.
    #[instrument(level = "debug", skip(self, path))]
    pub fn insert_path<S: AsRef<str>>(
        &mut self,
        path: &[S],
        common_name: &str,
        reference_link: &str,
    ) -> DomainResult<InsertOutcome> {
        if path.len() != REQUIRED_TAX_LEVELS {
            return Err(DomainError::InvalidPathLength {
                expected: REQUIRED_TAX_LEVELS,
                actual: path.len(),
            });
        }
        let names: Vec<&str> = path.iter().map(|s| s.as_ref().trim()).collect();
        if let Some(depth) = names.iter().position(|name| name.is_empty()) {
            return Err(DomainError::EmptyName {
                level: TAX_LEVELS[depth],
            });
        }
        if let Some(root) = self.root {
            let existing = self.node(root)?;
            if !names_match(&existing.name, names[0]) {
                warn!("tree already has Class '{}', got '{}'", existing.name, names[0]);
                return Err(DomainError::ClassMismatch {
                    existing: existing.name.clone(),
                    requested: names[0].to_string(),
                });
            }
        }

        let mut new_nodes = 0;
        let mut current = match self.root {
            Some(root) => root,
            None => {
                let root = NodeId(self.arena.insert(TaxonNode::new(names[0], TaxonLevel::Class)));
                info!("inserting new {}: {}", TaxonLevel::Class, names[0]);
                self.root = Some(root);
                new_nodes += 1;
                root
            }
        };

        let mut level = TaxonLevel::Class;
        for name in names.iter().skip(1) {
            level = level.child().ok_or(DomainError::InvalidPathLength {
                expected: REQUIRED_TAX_LEVELS,
                actual: names.len(),
            })?;
            current = match self.find_child(current, name)? {
                Some(child) => child,
                None => {
                    let child = NodeId(self.arena.insert(TaxonNode::new(name, level)));
                    self.node_mut(current)?.children.push(child);
                    info!("inserting new {}: {}", level, name);
                    new_nodes += 1;
                    child
                }
            };
        }

        let species = self.node_mut(current)?;
        if new_nodes == 0
            && species.common_name == common_name
            && species.reference_link == reference_link
        {
            debug!("species '{}' already exists with the same details", species.name);
            return Ok(InsertOutcome::Unchanged { species: current });
        }
        species.common_name = common_name.to_string();
        species.reference_link = reference_link.to_string();

        if new_nodes == 0 {
            info!(
                "species '{}' already exists, updated common name to '{}'",
                species.name, common_name
            );
            Ok(InsertOutcome::Updated { species: current })
        } else {
            info!("added new species: {} ({})", common_name, species.name);
            Ok(InsertOutcome::Created {
                species: current,
                new_nodes,
            })
        }
    }

    fn find_child(&self, parent: NodeId, name: &str) -> DomainResult<Option<NodeId>> {
        let parent = self.node(parent)?;
        Ok(parent
            .children
            .iter()
            .copied()
            .find(|&child| self.get(child).is_some_and(|c| names_match(&c.name, name))))
    }

    /// Finds the first node, in pre-order, whose name or common name matches `query`.
    #[instrument(level = "debug", skip(self))]
    pub fn search(&self, query: &str) -> Option<NodeId> {
        let found = self
            .iter()
            .find(|(_, node)| node.matches(query))
            .map(|(id, _)| id);
        debug!("search '{}': found={}", query, found.is_some());
        found
    }

    /// Overwrites common name and reference link of a Species node.
    #[instrument(level = "debug", skip(self))]
    pub fn update_species(
        &mut self,
        id: NodeId,
        common_name: &str,
        reference_link: &str,
    ) -> DomainResult<()> {
        let node = self.node_mut(id)?;
        if !node.level.is_species() {
            return Err(DomainError::NotSpeciesLevel {
                name: node.name.clone(),
                level: node.level,
            });
        }
        node.common_name = common_name.to_string();
        node.reference_link = reference_link.to_string();
        info!("updated species '{}'", node.name);
        Ok(())
    }

    /// Removes the first Species node, in pre-order, whose name or common name matches `query`.
    ///
    /// Only Species nodes are candidates, so a query naming a Genus or any other
    /// interior rank never removes a subtree. Returns the detached node, or `None`
    /// when no Species matches. Ancestors stay in place even when left childless.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_species(&mut self, query: &str) -> DomainResult<Option<TaxonNode>> {
        let Some(root) = self.root else {
            return Ok(None);
        };
        let Some((parent, target)) = self.find_species_with_parent(root, None, query) else {
            debug!("delete '{}': no species matches", query);
            return Ok(None);
        };
        let Some(parent) = parent.filter(|_| target != root) else {
            let name = self.node(target)?.name.clone();
            warn!("refusing to delete root '{}'", name);
            return Err(DomainError::RootDeletionRefused(name));
        };

        self.node_mut(parent)?.children.retain(|&child| child != target);
        let removed = self.release_subtree(target);
        if let Some(node) = &removed {
            info!("deleted species '{}'", node.name);
        }
        Ok(removed)
    }

    fn find_species_with_parent(
        &self,
        id: NodeId,
        parent: Option<NodeId>,
        query: &str,
    ) -> Option<(Option<NodeId>, NodeId)> {
        let node = self.get(id)?;
        if node.level.is_species() && node.matches(query) {
            return Some((parent, id));
        }
        node.children
            .iter()
            .find_map(|&child| self.find_species_with_parent(child, Some(id), query))
    }

    /// Frees `id` and everything below it, children first.
    fn release_subtree(&mut self, id: NodeId) -> Option<TaxonNode> {
        let children = self.get(id)?.children.clone();
        for child in children {
            self.release_subtree(child);
        }
        let mut node = self.arena.remove(id.0)?;
        node.children.clear();
        Some(node)
    }

    /// Releases every node in post-order and consumes the tree.
    ///
    /// Returns the number of nodes released.
    #[instrument(level = "debug", skip(self))]
    pub fn destroy(mut self) -> usize {
        let order: Vec<NodeId> = self.iter_postorder().map(|(id, _)| id).collect();
        let released = order
            .into_iter()
            .filter(|id| self.arena.remove(id.0).is_some())
            .count();
        self.root = None;
        debug!("destroyed tree, released {} nodes", released);
        released
    }

    /// Node ids from the root down to `id`, inclusive; `None` if `id` is not in the tree.
    #[instrument(level = "trace", skip(self))]
    pub fn lineage(&self, id: NodeId) -> Option<Vec<NodeId>> {
        let root = self.root?;
        let mut path = Vec::new();
        if self.collect_path(root, id, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    fn collect_path(&self, current: NodeId, target: NodeId, path: &mut Vec<NodeId>) -> bool {
        path.push(current);
        if current == target {
            return true;
        }
        if let Some(node) = self.get(current) {
            for &child in &node.children {
                if self.collect_path(child, target, path) {
                    return true;
                }
            }
        }
        path.pop();
        false
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_levelorder(&self) -> LevelOrderIterator<'_> {
        LevelOrderIterator::new(self)
    }

    /// Number of levels on the longest root-to-leaf path, 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, id: NodeId) -> usize {
        if let Some(node) = self.get(id) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Names of all nodes without children, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.name.clone())
            .collect()
    }
}
