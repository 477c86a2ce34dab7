use super::category::AssetCategory;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Static description of what a plugin contributes to the page.
///
/// The map and lists are ordered: asset directories are mounted in declaration
/// order and scripts/styles are linked in the order listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Unique, URL-safe name; first segment of every mount of this plugin.
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub assets: IndexMap<AssetCategory, PathBuf>,
    #[serde(default)]
    pub scripts: Vec<String>,
    #[serde(default)]
    pub styles: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

impl PluginDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            assets: IndexMap::new(),
            scripts: Vec::new(),
            styles: Vec::new(),
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_asset(mut self, category: impl Into<AssetCategory>, dir: impl Into<PathBuf>) -> Self {
        self.assets.insert(category.into(), dir.into());
        self
    }

    pub fn with_script(mut self, file: impl Into<String>) -> Self {
        self.scripts.push(file.into());
        self
    }

    pub fn with_style(mut self, file: impl Into<String>) -> Self {
        self.styles.push(file.into());
        self
    }
}
