//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::config::DisplayStyle;
use crate::domain::TraversalOrder;

/// In-memory five-level species taxonomy: Class > Order > Family > Genus > Species
#[derive(Parser, Debug)]
#[command(name = "taxotree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Start from an empty tree instead of the example sharks
    #[arg(long, global = true)]
    pub no_seed: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the full taxonomy tree
    Tree {
        /// Rendering style (default from config)
        #[arg(short, long)]
        style: Option<DisplayStyle>,
    },

    /// Find a node by taxonomic or common name (case-insensitive)
    Search {
        /// Taxonomic name or common name
        query: String,
    },

    /// List nodes in pre-, post- or level-order
    Traverse {
        /// pre, post or level
        #[arg(short, long, default_value_t = TraversalOrder::Pre)]
        order: TraversalOrder,
    },

    /// Add a species path; an existing path only gets its details updated
    Add {
        /// Class, Order, Family, Genus and Species names
        #[arg(required = true, num_args = 5, value_names = ["CLASS", "ORDER", "FAMILY", "GENUS", "SPECIES"])]
        path: Vec<String>,
        /// Common name of the species
        #[arg(long)]
        common: String,
        /// Reference link (e.g. a Wikipedia URL)
        #[arg(long, default_value = "", value_hint = ValueHint::Url)]
        link: String,
    },

    /// Change common name and reference link of a species
    Update {
        /// Taxonomic or common name of the species
        query: String,
        /// New common name
        #[arg(long)]
        common: String,
        /// New reference link (empty clears it)
        #[arg(long, default_value = "", value_hint = ValueHint::Url)]
        link: String,
    },

    /// Delete a species; its ancestors stay in place
    Delete {
        /// Taxonomic or common name of the species
        query: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show tree statistics and config location
    Info,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Create global config template
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}
