#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Invalid plugin name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },
    #[error("Invalid asset category {category:?} for plugin {plugin}: {reason}")]
    InvalidCategory {
        plugin: String,
        category: String,
        reason: &'static str,
    },
    #[error("Invalid asset file {file:?} for plugin {plugin}: {reason}")]
    InvalidAssetFile {
        plugin: String,
        file: String,
        reason: &'static str,
    },
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
