use quarkboard_api::Document;
use quarkboard_api::models::PluginDescriptor;
use std::sync::Arc;

/// Error type returned by plugin contributions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The contract every page plugin implements.
///
/// Each contribution kind has its own method so the composer can drive all
/// plugins through the same fixed loop. Only [`PagePlugin::descriptor`] is
/// required; the rest default to what the descriptor declares.
pub trait PagePlugin: Send + Sync {
    /// Name, enablement, asset directories and linked files of this plugin.
    fn descriptor(&self) -> &PluginDescriptor;

    fn name(&self) -> &str {
        &self.descriptor().name
    }

    /// Script files to link, relative to the plugin's `js` mount.
    fn scripts(&self) -> &[String] {
        &self.descriptor().scripts
    }

    /// Stylesheets to link, relative to the plugin's `css` mount.
    fn styles(&self) -> &[String] {
        &self.descriptor().styles
    }

    /// Inject markup into the page being composed.
    ///
    /// The document is shared with every other plugin of the request; an error
    /// discards whatever this call changed.
    fn contribute_markup(&self, _doc: &mut Document) -> Result<(), BoxError> {
        Ok(())
    }
}

/// A registered plugin together with its effective enablement.
#[derive(Clone)]
pub struct PluginHandle {
    pub instance: Arc<dyn PagePlugin>,
    pub enabled: bool,
}

impl PluginHandle {
    pub fn new(instance: Arc<dyn PagePlugin>) -> Self {
        let enabled = instance.descriptor().enabled;
        Self { instance, enabled }
    }

    pub fn name(&self) -> &str {
        self.instance.name()
    }

    pub fn descriptor(&self) -> &PluginDescriptor {
        self.instance.descriptor()
    }
}

impl std::fmt::Debug for PluginHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginHandle")
            .field("name", &self.name())
            .field("enabled", &self.enabled)
            .finish()
    }
}
