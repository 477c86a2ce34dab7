//! Explicit, ordered plugin registry.
//!
//! Registration order is the page's render order: markup contributions,
//! scripts and styles all follow it. The registry is assembled once at boot
//! and shared read-only afterwards.

use crate::error::{RegistryError, RegistryResult};
use crate::naming::{validate_asset_path, validate_segment};
use crate::plugin::{PagePlugin, PluginHandle};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Default, Clone)]
pub struct PluginRegistry {
    plugins: Vec<PluginHandle>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plugin after every plugin registered so far.
    ///
    /// Names and asset categories must be valid URL segments, and linked
    /// script/style files must be paths of such segments. Duplicate names are
    /// accepted; the later plugin's mounts shadow the earlier one's.
    pub fn register(&mut self, plugin: Arc<dyn PagePlugin>) -> RegistryResult<()> {
        let descriptor = plugin.descriptor();
        validate_segment(&descriptor.name).map_err(|reason| RegistryError::InvalidName {
            name: descriptor.name.clone(),
            reason,
        })?;
        for category in descriptor.assets.keys() {
            validate_segment(category.as_str()).map_err(|reason| {
                RegistryError::InvalidCategory {
                    plugin: descriptor.name.clone(),
                    category: category.to_string(),
                    reason,
                }
            })?;
        }
        for file in plugin.scripts().iter().chain(plugin.styles()) {
            validate_asset_path(file).map_err(|reason| RegistryError::InvalidAssetFile {
                plugin: descriptor.name.clone(),
                file: file.clone(),
                reason,
            })?;
        }

        if self.plugins.iter().any(|p| p.name() == descriptor.name) {
            tracing::warn!(
                "Plugin name '{}' is registered more than once; its asset mounts will be shadowed",
                descriptor.name
            );
        }
        tracing::debug!(
            "Registered plugin '{}' (enabled: {})",
            descriptor.name,
            descriptor.enabled
        );
        self.plugins.push(PluginHandle::new(plugin));
        Ok(())
    }

    /// Override enablement for every plugin called `name`. Returns how many matched.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> usize {
        let mut matched = 0;
        for handle in self.plugins.iter_mut().filter(|p| p.name() == name) {
            handle.enabled = enabled;
            matched += 1;
        }
        matched
    }

    /// All plugins in registration order, enabled or not.
    pub fn iter(&self) -> impl Iterator<Item = &PluginHandle> {
        self.plugins.iter()
    }

    /// Enabled plugins in registration order.
    pub fn enabled(&self) -> impl Iterator<Item = &PluginHandle> {
        self.plugins.iter().filter(|p| p.enabled)
    }

    /// The last plugin registered under `name`.
    pub fn get(&self, name: &str) -> Option<&PluginHandle> {
        self.plugins.iter().rev().find(|p| p.name() == name)
    }

    /// Names registered more than once, in order of first duplication.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for handle in &self.plugins {
            let name = handle.name();
            if !seen.insert(name) && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }
        duplicates
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarkboard_api::models::PluginDescriptor;

    struct Fixed(PluginDescriptor);

    impl PagePlugin for Fixed {
        fn descriptor(&self) -> &PluginDescriptor {
            &self.0
        }
    }

    fn plugin(desc: PluginDescriptor) -> Arc<dyn PagePlugin> {
        Arc::new(Fixed(desc))
    }

    #[test]
    fn test_registration_order_is_kept() {
        let mut registry = PluginRegistry::new();
        for name in ["b", "a", "c"] {
            registry.register(plugin(PluginDescriptor::new(name))).unwrap();
        }
        let names: Vec<_> = registry.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_enabled_filter_and_override() {
        let mut registry = PluginRegistry::new();
        registry.register(plugin(PluginDescriptor::new("on"))).unwrap();
        registry
            .register(plugin(PluginDescriptor::new("off").with_enabled(false)))
            .unwrap();
        registry.register(plugin(PluginDescriptor::new("later"))).unwrap();

        let enabled: Vec<_> = registry.enabled().map(|p| p.name()).collect();
        assert_eq!(enabled, vec!["on", "later"]);

        assert_eq!(registry.set_enabled("off", true), 1);
        assert_eq!(registry.set_enabled("on", false), 1);
        assert_eq!(registry.set_enabled("missing", true), 0);
        let enabled: Vec<_> = registry.enabled().map(|p| p.name()).collect();
        assert_eq!(enabled, vec!["off", "later"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        let mut registry = PluginRegistry::new();
        let err = registry
            .register(plugin(PluginDescriptor::new("bad/name")))
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidName { .. }));

        let err = registry
            .register(plugin(PluginDescriptor::new("ok").with_asset("j s", "dir")))
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidCategory { .. }));

        let err = registry
            .register(plugin(PluginDescriptor::new("ok").with_script("my script.js")))
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidAssetFile { .. }));
        let err = registry
            .register(plugin(PluginDescriptor::new("ok").with_style("theme.css?v=2")))
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidAssetFile { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicates_are_reported_and_last_wins_on_lookup() {
        let mut registry = PluginRegistry::new();
        registry
            .register(plugin(PluginDescriptor::new("dup").with_script("first.js")))
            .unwrap();
        registry.register(plugin(PluginDescriptor::new("solo"))).unwrap();
        registry
            .register(plugin(PluginDescriptor::new("dup").with_script("second.js")))
            .unwrap();

        assert_eq!(registry.duplicate_names(), vec!["dup"]);
        assert_eq!(registry.get("dup").unwrap().instance.scripts(), &["second.js".to_string()]);
        assert_eq!(registry.set_enabled("dup", false), 2);
    }
}
