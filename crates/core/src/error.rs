use quarkboard_api::{DomError, ParseError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("Failed to read template {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Malformed template: {0}")]
    MalformedTemplate(#[from] ParseError),
    #[error("Document error: {0}")]
    Dom(#[from] DomError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("HTTPS requires both a private key and a certificate (missing {missing})")]
    MissingTlsMaterial { missing: &'static str },
    #[error("Failed to read TLS {kind} {}: {source}", path.display())]
    TlsRead {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Could not resolve {host}:{port}")]
    Resolve { host: String, port: u16 },
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid TLS material: {0}")]
    Tls(#[source] std::io::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
