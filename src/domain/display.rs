//! Rendering a [`TaxonomyTree`] as indented text.

use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{NodeId, TaxonNode, TaxonomyTree};

/// Which Species annotations to include when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    pub show_common_names: bool,
    pub show_link_marker: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_common_names: true,
            show_link_marker: true,
        }
    }
}

/// `(Level) name`, plus `[common name]` and `(link)` on Species nodes.
pub fn node_label(node: &TaxonNode, options: DisplayOptions) -> String {
    let mut label = format!("({}) {}", node.level(), node.name());
    if node.level().is_species() {
        if options.show_common_names && !node.common_name().is_empty() {
            label.push_str(&format!(" [{}]", node.common_name()));
        }
        if options.show_link_marker && node.has_reference_link() {
            label.push_str(" (link)");
        }
    }
    label
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for TaxonomyTree {
    fn to_tree_string(&self) -> Tree<String> {
        self.to_tree_string_with(DisplayOptions::default())
    }
}

impl TaxonomyTree {
    /// Box-drawing rendering via `termtree`.
    pub fn to_tree_string_with(&self, options: DisplayOptions) -> Tree<String> {
        fn build_tree(
            tree: &TaxonomyTree,
            id: NodeId,
            options: DisplayOptions,
        ) -> Option<Tree<String>> {
            let node = tree.get(id)?;
            let leaves = node
                .children()
                .iter()
                .filter_map(|&child| build_tree(tree, child, options));
            Some(Tree::new(node_label(node, options)).with_leaves(leaves))
        }

        self.root()
            .and_then(|root| build_tree(self, root, options))
            .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }

    /// Pre-order listing, one node per line, indented by depth.
    #[instrument(level = "debug", skip(self))]
    pub fn display(&self) -> String {
        self.display_with(DisplayOptions::default())
    }

    pub fn display_with(&self, options: DisplayOptions) -> String {
        let mut out = String::new();
        if let Some(root) = self.root() {
            self.write_node(root, 0, options, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, depth: usize, options: DisplayOptions, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        for i in 0..depth {
            out.push_str(if i + 1 == depth { "  |--" } else { "  |  " });
        }
        out.push_str(&node_label(node, options));
        out.push('\n');
        for &child in node.children() {
            self.write_node(child, depth + 1, options, out);
        }
    }
}
