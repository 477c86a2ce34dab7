pub mod category;
pub mod plugin;

pub use category::AssetCategory;
pub use plugin::PluginDescriptor;
