use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::fmt;

/// Asset category of a plugin directory, used as the second URL segment of a mount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetCategory(Cow<'static, str>);

impl AssetCategory {
    /// Scripts, auto-linked into `<body>` by the composer.
    pub const JS: AssetCategory = AssetCategory(Cow::Borrowed("js"));
    /// Stylesheets, auto-linked into `<head>` by the composer.
    pub const CSS: AssetCategory = AssetCategory(Cow::Borrowed("css"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Whether the composer injects tags for files of this category.
    pub fn is_linked(&self) -> bool {
        *self == Self::JS || *self == Self::CSS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AssetCategory {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

impl From<String> for AssetCategory {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for AssetCategory {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for AssetCategory {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}
