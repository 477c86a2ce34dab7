//! Base page template, read once at boot.

use crate::error::TemplateError;
use quarkboard_api::{Document, ParseError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Immutable template source shared by every request.
#[derive(Debug, Clone)]
pub struct Template {
    path: Option<PathBuf>,
    source: Arc<str>,
}

impl Template {
    /// Read the template file. Any failure here must stop the boot.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => TemplateError::NotFound {
                path: path.to_path_buf(),
            },
            _ => TemplateError::Read {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        tracing::info!("Loaded template from {} ({} bytes)", path.display(), source.len());
        Ok(Self {
            path: Some(path.to_path_buf()),
            source: Arc::from(source),
        })
    }

    pub fn from_source(source: impl Into<Arc<str>>) -> Self {
        Self {
            path: None,
            source: source.into(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Build a fresh, independently mutable tree from the template.
    pub fn parse(&self) -> Result<Document, ParseError> {
        Document::parse(&self.source)
    }
}
