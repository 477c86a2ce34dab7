pub mod error;
pub mod naming;
pub mod plugin;
pub mod registry;

pub use error::{RegistryError, RegistryResult};
pub use naming::{validate_asset_path, validate_segment};
pub use plugin::{BoxError, PagePlugin, PluginHandle};
pub use registry::PluginRegistry;
