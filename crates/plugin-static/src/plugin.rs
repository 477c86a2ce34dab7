use crate::error::{ManifestError, MarkupError};
use crate::manifest::Manifest;
use quarkboard_api::Document;
use quarkboard_api::models::PluginDescriptor;
use quarkboard_plugin::{BoxError, PagePlugin};
use std::path::Path;

/// A plugin whose whole contribution is declared in its manifest.
#[derive(Debug, Clone)]
pub struct StaticPlugin {
    descriptor: PluginDescriptor,
    fragment: Option<String>,
    target: Option<String>,
}

impl StaticPlugin {
    /// Load the manifest in `dir` and read its markup fragment, if any.
    pub fn load(dir: &Path) -> Result<Self, ManifestError> {
        let manifest = Manifest::load(dir)?;
        let fragment = match &manifest.markup {
            Some(path) => Some(std::fs::read_to_string(path).map_err(|source| {
                ManifestError::Read {
                    path: path.clone(),
                    source,
                }
            })?),
            None => None,
        };
        tracing::info!(
            "Loaded plugin '{}' from {} ({} scripts, {} styles, {} asset dirs)",
            manifest.descriptor.name,
            dir.display(),
            manifest.descriptor.scripts.len(),
            manifest.descriptor.styles.len(),
            manifest.descriptor.assets.len()
        );
        Ok(Self {
            descriptor: manifest.descriptor,
            fragment,
            target: manifest.target,
        })
    }

    pub fn new(descriptor: PluginDescriptor) -> Self {
        Self {
            descriptor,
            fragment: None,
            target: None,
        }
    }

    pub fn with_fragment(mut self, fragment: impl Into<String>, target: Option<String>) -> Self {
        self.fragment = Some(fragment.into());
        self.target = target;
        self
    }

    /// Force enablement regardless of what the manifest says.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.descriptor.enabled = enabled;
        self
    }

    fn insert_fragment(&self, fragment: &str, doc: &mut Document) -> Result<(), MarkupError> {
        let parsed = Document::parse(fragment)?;
        let parent = match &self.target {
            Some(id) => doc
                .element_by_id(id)
                .ok_or_else(|| MarkupError::MissingTarget(id.clone()))?,
            None => doc.ensure_body(),
        };
        doc.import_children(&parsed, parent)?;
        Ok(())
    }
}

impl PagePlugin for StaticPlugin {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    fn contribute_markup(&self, doc: &mut Document) -> Result<(), BoxError> {
        match &self.fragment {
            Some(fragment) => Ok(self.insert_fragment(fragment, doc)?),
            None => Ok(()),
        }
    }
}
