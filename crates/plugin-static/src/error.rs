use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid manifest {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Why a static plugin could not insert its fragment into a page.
#[derive(Error, Debug)]
pub enum MarkupError {
    #[error("Malformed fragment: {0}")]
    Fragment(#[from] quarkboard_api::ParseError),
    #[error("No element with id '{0}' in the page")]
    MissingTarget(String),
    #[error(transparent)]
    Dom(#[from] quarkboard_api::DomError),
}
