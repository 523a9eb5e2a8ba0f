//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/taxotree/taxotree.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `TAXOTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::DisplayOptions;

/// How `tree` renders the hierarchy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStyle {
    /// `  |--` indentation, one node per line
    #[default]
    Indented,
    /// Box-drawing tree
    Boxed,
}

impl std::str::FromStr for DisplayStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "indented" => Ok(DisplayStyle::Indented),
            "boxed" => Ok(DisplayStyle::Boxed),
            other => Err(format!("unknown display style: {other}")),
        }
    }
}

/// Tree rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    pub style: DisplayStyle,
    /// Append `[common name]` to Species lines
    pub show_common_names: bool,
    /// Append `(link)` to Species lines carrying a reference link
    pub show_link_marker: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            style: DisplayStyle::default(),
            show_common_names: true,
            show_link_marker: true,
        }
    }
}

impl DisplayConfig {
    pub fn options(&self) -> DisplayOptions {
        DisplayOptions {
            show_common_names: self.show_common_names,
            show_link_marker: self.show_link_marker,
        }
    }
}

/// A species to load at session start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Class, Order, Family, Genus, Species
    pub path: Vec<String>,
    pub common_name: String,
    #[serde(default)]
    pub reference_link: String,
}

/// Raw display config for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDisplayConfig {
    pub style: Option<DisplayStyle>,
    pub show_common_names: Option<bool>,
    pub show_link_marker: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub seed_examples: Option<bool>,
    pub display: RawDisplayConfig,
    pub catalog: Option<Vec<CatalogEntry>>,
}

impl DisplayConfig {
    fn merge(&self, overlay: &RawDisplayConfig) -> Self {
        Self {
            style: overlay.style.unwrap_or(self.style),
            show_common_names: overlay.show_common_names.unwrap_or(self.show_common_names),
            show_link_marker: overlay.show_link_marker.unwrap_or(self.show_link_marker),
        }
    }
}

/// Unified configuration for taxotree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Pre-insert the example sharks on session start (default: true)
    pub seed_examples: bool,
    pub display: DisplayConfig,
    /// Extra species inserted after the examples
    pub catalog: Vec<CatalogEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed_examples: true,
            display: DisplayConfig::default(),
            catalog: Vec::new(),
        }
    }
}

/// Get the XDG config directory for taxotree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "taxotree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("taxotree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Apply global config onto defaults: scalars override, catalog replaces.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            seed_examples: global.seed_examples.unwrap_or(self.seed_examples),
            display: self.display.merge(&global.display),
            catalog: global
                .catalog
                .clone()
                .unwrap_or_else(|| self.catalog.clone()),
        }
    }

    /// Merge an explicit config file: scalars override, catalog entries append.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let mut catalog = self.catalog.clone();
        if let Some(extra) = &overlay.catalog {
            catalog.extend(extra.iter().cloned());
        }
        Self {
            seed_examples: overlay.seed_examples.unwrap_or(self.seed_examples),
            display: self.display.merge(&overlay.display),
            catalog,
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist when given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        // 3. Explicit file
        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables
        Self::apply_env_overrides(current)
    }

    /// Apply TAXOTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TAXOTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_bool("seed_examples") {
            settings.seed_examples = val;
        }
        if let Ok(val) = config.get_string("display.style") {
            settings.display.style = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_bool("display.show_common_names") {
            settings.display.show_common_names = val;
        }
        if let Ok(val) = config.get_bool("display.show_link_marker") {
            settings.display.show_link_marker = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# taxotree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/taxotree/taxotree.toml
#   File:   taxotree --config <file>
#   Env:    TAXOTREE_* environment variables, e.g. TAXOTREE_DISPLAY__STYLE=boxed

# Pre-insert the Great White Shark and Tiger Shark examples
# seed_examples = true

[display]
# "indented" or "boxed"
# style = "indented"
# show_common_names = true
# show_link_marker = true

# Species loaded at start, after the examples.
# A global catalog replaces the default (empty) list; --config entries are appended.
# [[catalog]]
# path = ["Chondrichthyes", "Orectolobiformes", "Rhincodontidae", "Rhincodon", "typus"]
# common_name = "Whale Shark"
# reference_link = "https://en.wikipedia.org/wiki/Whale_shark"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
