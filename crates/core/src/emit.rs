//! Turning a composed document into a response body, plus provenance headers.

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use quarkboard_api::Document;
use serde::{Deserialize, Serialize};

pub const VERSION_HEADER: HeaderName = HeaderName::from_static("x-quarkboard-version");
pub const REPOSITORY_HEADER: HeaderName = HeaderName::from_static("x-quarkboard-repository");

/// Version and repository identifiers advertised on every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub version: String,
    pub repository: String,
}

impl Default for Provenance {
    /// Package metadata of this build.
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            repository: env!("CARGO_PKG_REPOSITORY").to_string(),
        }
    }
}

impl Provenance {
    pub fn new(version: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            repository: repository.into(),
        }
    }

    /// Set both provenance headers. Values that are not valid header text are skipped.
    pub fn apply(&self, headers: &mut HeaderMap) {
        for (name, value) in [
            (VERSION_HEADER, &self.version),
            (REPOSITORY_HEADER, &self.repository),
        ] {
            match HeaderValue::from_str(value) {
                Ok(v) => {
                    headers.insert(name, v);
                }
                Err(_) => tracing::warn!("Skipping {} header: invalid value {:?}", name, value),
            }
        }
    }
}

/// Serializes composed documents for the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct Emitter {
    provenance: Provenance,
}

impl Emitter {
    pub fn new(provenance: Provenance) -> Self {
        Self { provenance }
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Serialize the document. Text content is written as stored, never re-escaped.
    pub fn emit(&self, document: &Document) -> Bytes {
        Bytes::from(document.serialize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_provenance_comes_from_package() {
        let provenance = Provenance::default();
        assert_eq!(provenance.version, env!("CARGO_PKG_VERSION"));
        assert!(!provenance.repository.is_empty());
    }

    #[test]
    fn test_apply_sets_both_headers() {
        let mut headers = HeaderMap::new();
        Provenance::new("1.2.3", "https://example.com/repo").apply(&mut headers);
        assert_eq!(headers.get("X-Quarkboard-Version").unwrap(), "1.2.3");
        assert_eq!(
            headers.get("X-Quarkboard-Repository").unwrap(),
            "https://example.com/repo"
        );
    }

    #[test]
    fn test_invalid_header_value_is_skipped() {
        let mut headers = HeaderMap::new();
        Provenance::new("1.0\n", "repo").apply(&mut headers);
        assert!(headers.get(VERSION_HEADER).is_none());
        assert_eq!(headers.get(REPOSITORY_HEADER).unwrap(), "repo");
    }

    #[test]
    fn test_emit_serializes_document() {
        let doc = Document::parse("<p>Tom &amp; Jerry</p>").unwrap();
        let bytes = Emitter::default().emit(&doc);
        assert_eq!(&bytes[..], b"<p>Tom &amp; Jerry</p>");
    }
}
