//! Boot-time configuration.
//!
//! Values come from built-in defaults, then an optional JSON file, then
//! command-line overrides. Relative paths in the file are resolved against
//! the file's own directory.

use crate::emit::Provenance;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_HOSTNAME: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3074;
pub const DEFAULT_TEMPLATE: &str = "index.html";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub hostname: String,
    pub port: u16,
    pub https: bool,
    pub private_key: Option<PathBuf>,
    pub certificate: Option<PathBuf>,
    pub template: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: DEFAULT_HOSTNAME.to_string(),
            port: DEFAULT_PORT,
            https: false,
            private_key: None,
            certificate: None,
            template: PathBuf::from(DEFAULT_TEMPLATE),
        }
    }
}

impl ServerConfig {
    /// Reject settings that cannot start a server.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.https {
            if self.private_key.is_none() {
                return Err(ConfigError::MissingTlsMaterial {
                    missing: "private key",
                });
            }
            if self.certificate.is_none() {
                return Err(ConfigError::MissingTlsMaterial {
                    missing: "certificate",
                });
            }
        }
        Ok(())
    }

    /// `http://host:port/` or `https://host:port/`.
    pub fn url(&self) -> String {
        format!(
            "http{}://{}:{}/",
            if self.https { "s" } else { "" },
            self.hostname,
            self.port
        )
    }
}

/// One plugin directory to load, in page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginEntry {
    pub path: PathBuf,
    /// Overrides the manifest's own `enabled` flag when set.
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl PluginEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            enabled: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub plugins: Vec<PluginEntry>,
    pub provenance: Option<Provenance>,
}

impl AppConfig {
    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: AppConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, otherwise start from defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        let rebase = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        rebase(&mut self.server.template);
        if let Some(key) = self.server.private_key.as_mut() {
            rebase(key);
        }
        if let Some(cert) = self.server.certificate.as_mut() {
            rebase(cert);
        }
        for plugin in &mut self.plugins {
            rebase(&mut plugin.path);
        }
    }

    pub fn apply(&mut self, overrides: ServerOverrides) {
        overrides.apply_to(&mut self.server);
        self.plugins
            .extend(overrides.plugins.into_iter().map(PluginEntry::new));
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance.clone().unwrap_or_default()
    }
}

/// Settings given on the command line; `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct ServerOverrides {
    pub hostname: Option<String>,
    pub port: Option<u16>,
    pub https: Option<bool>,
    pub private_key: Option<PathBuf>,
    pub certificate: Option<PathBuf>,
    pub template: Option<PathBuf>,
    /// Extra plugin directories, appended after the configured ones.
    pub plugins: Vec<PathBuf>,
}

impl ServerOverrides {
    fn apply_to(&self, server: &mut ServerConfig) {
        if let Some(hostname) = &self.hostname {
            server.hostname = hostname.clone();
        }
        if let Some(port) = self.port {
            server.port = port;
        }
        if let Some(https) = self.https {
            server.https = https;
        }
        if let Some(key) = &self.private_key {
            server.private_key = Some(key.clone());
        }
        if let Some(cert) = &self.certificate {
            server.certificate = Some(cert.clone());
        }
        if let Some(template) = &self.template {
            server.template = template.clone();
        }
    }
}

/// PEM-encoded key and certificate read at boot.
#[derive(Clone)]
pub struct TlsMaterial {
    pub certificate: Vec<u8>,
    pub private_key: Vec<u8>,
}

impl std::fmt::Debug for TlsMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsMaterial")
            .field("certificate", &format_args!("{} bytes", self.certificate.len()))
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl TlsMaterial {
    /// Read key and certificate when HTTPS is on; `Ok(None)` for plain HTTP.
    pub fn load(server: &ServerConfig) -> Result<Option<Self>, ConfigError> {
        if !server.https {
            return Ok(None);
        }
        server.validate()?;
        let (Some(key_path), Some(cert_path)) = (&server.private_key, &server.certificate) else {
            return Ok(None);
        };
        let read = |kind: &'static str, path: &Path| {
            std::fs::read(path).map_err(|source| ConfigError::TlsRead {
                kind,
                path: path.to_path_buf(),
                source,
            })
        };
        Ok(Some(Self {
            private_key: read("private key", key_path)?,
            certificate: read("certificate", cert_path)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.hostname, "localhost");
        assert_eq!(config.server.port, 3074);
        assert!(!config.server.https);
        assert_eq!(config.server.template, PathBuf::from("index.html"));
        assert!(config.plugins.is_empty());
        assert_eq!(config.server.url(), "http://localhost:3074/");
    }

    #[test]
    fn test_load_partial_file_and_resolve_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quarkboard.json");
        std::fs::write(
            &path,
            r#"{
                "server": { "port": 8080, "template": "page.html" },
                "plugins": [ { "path": "plugins/clock" }, { "path": "/abs/news", "enabled": false } ],
                "provenance": { "version": "9.9.9", "repository": "repo" }
            }"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.hostname, "localhost");
        assert_eq!(config.server.template, dir.path().join("page.html"));
        assert_eq!(config.plugins[0].path, dir.path().join("plugins/clock"));
        assert_eq!(config.plugins[1].path, PathBuf::from("/abs/news"));
        assert_eq!(config.plugins[1].enabled, Some(false));
        assert_eq!(config.provenance().version, "9.9.9");
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            AppConfig::load(dir.path().join("missing.json")),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_overrides_win_and_plugins_append() {
        let mut config = AppConfig::default();
        config.plugins.push(PluginEntry::new("/from/file"));
        config.apply(ServerOverrides {
            hostname: Some("0.0.0.0".to_string()),
            port: Some(9000),
            https: Some(true),
            plugins: vec![PathBuf::from("/from/cli")],
            ..Default::default()
        });

        assert_eq!(config.server.hostname, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert!(config.server.https);
        assert_eq!(config.server.template, PathBuf::from("index.html"));
        let paths: Vec<_> = config.plugins.iter().map(|p| p.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("/from/file"), PathBuf::from("/from/cli")]);
    }

    #[test]
    fn test_https_requires_key_and_certificate() {
        let mut server = ServerConfig {
            https: true,
            ..Default::default()
        };
        assert!(matches!(
            server.validate(),
            Err(ConfigError::MissingTlsMaterial { missing: "private key" })
        ));
        server.private_key = Some(PathBuf::from("key.pem"));
        assert!(matches!(
            TlsMaterial::load(&server),
            Err(ConfigError::MissingTlsMaterial { missing: "certificate" })
        ));
    }

    #[test]
    fn test_tls_material_is_read_only_for_https() {
        let dir = tempfile::tempdir().unwrap();
        let key = dir.path().join("key.pem");
        let cert = dir.path().join("cert.pem");
        std::fs::write(&key, "KEY").unwrap();
        std::fs::write(&cert, "CERT").unwrap();

        let mut server = ServerConfig {
            private_key: Some(key),
            certificate: Some(dir.path().join("missing.pem")),
            ..Default::default()
        };
        assert!(TlsMaterial::load(&server).unwrap().is_none());

        server.https = true;
        assert!(matches!(
            TlsMaterial::load(&server),
            Err(ConfigError::TlsRead { kind: "certificate", .. })
        ));

        server.certificate = Some(cert);
        let material = TlsMaterial::load(&server).unwrap().unwrap();
        assert_eq!(material.private_key, b"KEY");
        assert_eq!(material.certificate, b"CERT");
    }
}
