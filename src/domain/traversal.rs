//! Lazy traversals over a [`TaxonomyTree`].
//!
//! Each iterator starts from the current root when created, so calling
//! `iter()` again re-walks the tree from scratch. Children are visited in
//! insertion order.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use tracing::instrument;

use crate::domain::arena::{NodeId, TaxonNode, TaxonomyTree};
use crate::domain::level::names_match;

/// Classic traversal orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalOrder {
    #[default]
    Pre,
    Post,
    Level,
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TraversalOrder::Pre => "pre",
            TraversalOrder::Post => "post",
            TraversalOrder::Level => "level",
        })
    }
}

impl FromStr for TraversalOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [TraversalOrder::Pre, TraversalOrder::Post, TraversalOrder::Level]
            .into_iter()
            .find(|order| names_match(&order.to_string(), s))
            .ok_or_else(|| format!("unknown traversal order '{s}' (expected pre, post or level)"))
    }
}

impl TaxonomyTree {
    /// Node ids in the requested order.
    pub fn traverse(&self, order: TraversalOrder) -> Vec<NodeId> {
        match order {
            TraversalOrder::Pre => self.iter().map(|(id, _)| id).collect(),
            TraversalOrder::Post => self.iter_postorder().map(|(id, _)| id).collect(),
            TraversalOrder::Level => self.iter_levelorder().map(|(id, _)| id).collect(),
        }
    }
}

/// Pre-order (node before its children), depth-first.
pub struct TreeIterator<'a> {
    tree: &'a TaxonomyTree,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    #[instrument(level = "trace", skip(tree))]
    pub(crate) fn new(tree: &'a TaxonomyTree) -> Self {
        let stack = tree.root().into_iter().collect();
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a TaxonNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                // Reverse push keeps left-to-right order on pop
                self.stack.extend(node.children().iter().rev());
                return Some((current, node));
            }
        }
        None
    }
}

/// Post-order (children before their parent), depth-first.
pub struct PostOrderIterator<'a> {
    tree: &'a TaxonomyTree,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    #[instrument(level = "trace", skip(tree))]
    pub(crate) fn new(tree: &'a TaxonomyTree) -> Self {
        let stack = tree.root().map(|root| (root, false)).into_iter().collect();
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (NodeId, &'a TaxonNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                if visited {
                    return Some((current, node));
                }
                self.stack.push((current, true));
                for &child in node.children().iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

/// Level-order (breadth-first), FIFO over children.
pub struct LevelOrderIterator<'a> {
    tree: &'a TaxonomyTree,
    queue: VecDeque<NodeId>,
}

impl<'a> LevelOrderIterator<'a> {
    #[instrument(level = "trace", skip(tree))]
    pub(crate) fn new(tree: &'a TaxonomyTree) -> Self {
        let queue = tree.root().into_iter().collect();
        Self { tree, queue }
    }
}

impl<'a> Iterator for LevelOrderIterator<'a> {
    type Item = (NodeId, &'a TaxonNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.queue.pop_front() {
            if let Some(node) = self.tree.get(current) {
                self.queue.extend(node.children());
                return Some((current, node));
            }
        }
        None
    }
}
