use quarkboard_core::config::{AppConfig, PluginEntry, TlsMaterial};
use quarkboard_core::error::{ConfigError, TemplateError};
use quarkboard_core::{AppState, Emitter, MountTable, Server, Template, build_router};
use quarkboard_plugin::{PluginRegistry, RegistryError};
use quarkboard_static::{ManifestError, StaticPlugin};
use std::sync::Arc;

/// Anything that stops the process before it starts serving.
#[derive(Debug, thiserror::Error)]
pub enum BootError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Everything loaded at boot, ready to be turned into a server.
pub struct Boot {
    pub config: AppConfig,
    pub template: Template,
    pub registry: PluginRegistry,
    pub mounts: MountTable,
    pub tls: Option<TlsMaterial>,
}

/// Load every configured plugin directory, in order.
pub fn build_registry(plugins: &[PluginEntry]) -> Result<PluginRegistry, BootError> {
    let mut registry = PluginRegistry::new();
    for entry in plugins {
        let mut plugin = StaticPlugin::load(&entry.path)?;
        if let Some(enabled) = entry.enabled {
            plugin = plugin.with_enabled(enabled);
        }
        registry.register(Arc::new(plugin))?;
    }
    Ok(registry)
}

/// Load template, plugins, mounts and TLS material. Any error is fatal.
pub fn boot(config: AppConfig) -> Result<Boot, BootError> {
    let tls = TlsMaterial::load(&config.server)?;
    let template = Template::load(&config.server.template)?;
    let registry = build_registry(&config.plugins)?;
    let mounts = MountTable::build(&registry);
    tracing::info!(
        "Boot complete: {} plugins ({} enabled), {} mounts",
        registry.len(),
        registry.enabled().count(),
        mounts.len()
    );
    Ok(Boot {
        config,
        template,
        registry,
        mounts,
        tls,
    })
}

impl Boot {
    pub fn state(&self) -> AppState {
        AppState::new(
            self.template.clone(),
            self.registry.clone(),
            Emitter::new(self.config.provenance()),
        )
    }

    pub fn into_server(self) -> Server {
        let router = build_router(self.state(), &self.mounts);
        Server::new(self.config.server, router, self.tls)
    }
}

/// Initializes logging for one CLI component; see `quarkboard_core::logging`.
pub fn init_logging(component: &str, to_stderr: bool) -> impl Drop {
    let guard = quarkboard_core::logging::init_logging(component, to_stderr);
    tracing::debug!(
        "Logging '{}' to {}",
        component,
        quarkboard_core::logging::log_dir().display()
    );
    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write(dir: &Path, file: &str, content: &str) {
        let path = dir.join(file);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_boot_loads_everything_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.html", "<html><head></head><body></body></html>");
        write(
            dir.path(),
            "plugins/b/plugin.json",
            r#"{ "name": "b", "assets": { "js": "js" }, "scripts": ["b.js"] }"#,
        );
        write(
            dir.path(),
            "plugins/a/plugin.json",
            r#"{ "name": "a", "assets": { "js": "js" }, "scripts": ["a.js"] }"#,
        );
        write(
            dir.path(),
            "quarkboard.json",
            r#"{ "plugins": [ { "path": "plugins/b" }, { "path": "plugins/a", "enabled": false } ] }"#,
        );

        let config = AppConfig::load(dir.path().join("quarkboard.json")).unwrap();
        let boot = boot(config).unwrap();

        let names: Vec<_> = boot.registry.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["b", "a"]);
        let enabled: Vec<_> = boot.registry.enabled().map(|p| p.name()).collect();
        assert_eq!(enabled, vec!["b"]);
        assert_eq!(boot.mounts.len(), 2);
        assert!(boot.tls.is_none());
    }

    #[test]
    fn test_missing_template_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.server.template = dir.path().join("absent.html");
        assert!(matches!(
            boot(config),
            Err(BootError::Template(TemplateError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_https_without_key_is_fatal() {
        let mut config = AppConfig::default();
        config.server.https = true;
        assert!(matches!(
            boot(config),
            Err(BootError::Config(ConfigError::MissingTlsMaterial { .. }))
        ));
    }

    #[test]
    fn test_invalid_plugin_name_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bad/plugin.json", r#"{ "name": "no spaces" }"#);
        let err = build_registry(&[PluginEntry::new(dir.path().join("bad"))]).unwrap_err();
        assert!(matches!(err, BootError::Registry(RegistryError::InvalidName { .. })));
    }

    #[test]
    fn test_unsafe_script_file_in_manifest_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "clock/plugin.json",
            r#"{ "name": "clock", "scripts": ["tick tock.js"] }"#,
        );
        let err = build_registry(&[PluginEntry::new(dir.path().join("clock"))]).unwrap_err();
        assert!(matches!(
            err,
            BootError::Registry(RegistryError::InvalidAssetFile { .. })
        ));
    }
}
