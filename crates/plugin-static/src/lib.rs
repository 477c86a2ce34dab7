//! Plugins described by a `plugin.json` manifest on disk.

pub mod error;
pub mod manifest;
pub mod plugin;

pub use error::{ManifestError, MarkupError};
pub use manifest::{MANIFEST_FILE, Manifest};
pub use plugin::StaticPlugin;
