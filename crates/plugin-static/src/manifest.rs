use crate::error::ManifestError;
use quarkboard_api::models::PluginDescriptor;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "plugin.json";

/// On-disk plugin description.
///
/// Everything a [`PluginDescriptor`] holds, plus an optional markup fragment
/// and the `id` of the element it is inserted into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(flatten)]
    pub descriptor: PluginDescriptor,
    /// Fragment file, relative to the plugin directory.
    #[serde(default)]
    pub markup: Option<PathBuf>,
    /// `id` of the element receiving the fragment; `<body>` when absent.
    #[serde(default)]
    pub target: Option<String>,
}

impl Manifest {
    /// Read `dir/plugin.json` and resolve its paths against `dir`.
    pub fn load(dir: &Path) -> Result<Self, ManifestError> {
        let path = dir.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path).map_err(|source| ManifestError::Read {
            path: path.clone(),
            source,
        })?;
        let mut manifest: Manifest = serde_json::from_str(&content)
            .map_err(|source| ManifestError::Parse { path, source })?;

        for directory in manifest.descriptor.assets.values_mut() {
            if directory.is_relative() {
                *directory = dir.join(&*directory);
            }
        }
        if let Some(markup) = manifest.markup.as_mut() {
            if markup.is_relative() {
                *markup = dir.join(&*markup);
            }
        }
        Ok(manifest)
    }
}
