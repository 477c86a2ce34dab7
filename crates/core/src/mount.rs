//! Asset mount table: `/{plugin}/{category}` → directory.
//!
//! Built once at boot from the registry and read-only afterwards. Mounts are
//! created for every registered plugin, enabled or not, so a disabled plugin's
//! assets stay reachable. When two plugins resolve to the same prefix the
//! later registration wins and the earlier entry is kept in
//! [`MountTable::shadowed`].

use indexmap::IndexMap;
use quarkboard_api::models::AssetCategory;
use quarkboard_plugin::PluginRegistry;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub url_prefix: String,
    pub directory: PathBuf,
    pub plugin: String,
    pub category: AssetCategory,
}

#[derive(Debug, Default, Clone)]
pub struct MountTable {
    entries: IndexMap<String, MountEntry>,
    shadowed: Vec<MountEntry>,
}

/// URL prefix under which `plugin` serves files of `category`.
pub fn mount_prefix(plugin: &str, category: &AssetCategory) -> String {
    format!("/{}/{}", plugin, category)
}

impl MountTable {
    pub fn build(registry: &PluginRegistry) -> Self {
        let mut table = Self::default();
        for handle in registry.iter() {
            let descriptor = handle.descriptor();
            for (category, directory) in &descriptor.assets {
                table.insert(MountEntry {
                    url_prefix: mount_prefix(&descriptor.name, category),
                    directory: directory.clone(),
                    plugin: descriptor.name.clone(),
                    category: category.clone(),
                });
            }
        }
        tracing::info!(
            "Built mount table: {} mounts, {} shadowed",
            table.entries.len(),
            table.shadowed.len()
        );
        table
    }

    fn insert(&mut self, entry: MountEntry) {
        tracing::debug!(
            "Mounting {} -> {}",
            entry.url_prefix,
            entry.directory.display()
        );
        if let Some(previous) = self.entries.insert(entry.url_prefix.clone(), entry) {
            tracing::warn!(
                "Mount {} from plugin '{}' ({}) is shadowed by a later registration",
                previous.url_prefix,
                previous.plugin,
                previous.directory.display()
            );
            self.shadowed.push(previous);
        }
    }

    pub fn get(&self, url_prefix: &str) -> Option<&MountEntry> {
        self.entries.get(url_prefix)
    }

    /// Active mounts, ordered by the first registration of each prefix.
    pub fn entries(&self) -> impl Iterator<Item = &MountEntry> {
        self.entries.values()
    }

    /// Mounts overridden by a later plugin with the same prefix.
    pub fn shadowed(&self) -> &[MountEntry] {
        &self.shadowed
    }

    /// Map a request path onto a mount and the file path below its directory.
    ///
    /// Returns `None` when no mount matches or the remainder tries to leave
    /// the mounted directory.
    pub fn resolve(&self, path: &str) -> Option<(&MountEntry, PathBuf)> {
        let mut segments = path.trim_start_matches('/').splitn(3, '/');
        let plugin = segments.next()?;
        let category = segments.next()?;
        let rest = segments.next().unwrap_or("");

        let entry = self.entries.get(&format!("/{}/{}", plugin, category))?;
        let mut relative = PathBuf::new();
        for segment in rest.split('/').filter(|s| !s.is_empty() && *s != ".") {
            if segment == ".." || Path::new(segment).is_absolute() || segment.contains('\\') {
                return None;
            }
            relative.push(segment);
        }
        Some((entry, relative))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
