//! Per-request page composition.
//!
//! Every request parses the template into its own document and walks the
//! enabled plugins in registration order. For each plugin the composer lets it
//! inject markup, then appends its `<script>` tags to `<body>` and its `<link>`
//! tags to `<head>`. A plugin whose markup step fails or panics is rolled back
//! and skipped; the rest of the page still renders.

use crate::error::ComposeError;
use crate::mount::mount_prefix;
use crate::template::Template;
use quarkboard_api::models::AssetCategory;
use quarkboard_api::{Document, DomResult};
use quarkboard_plugin::{PagePlugin, PluginRegistry};
use std::panic::{AssertUnwindSafe, catch_unwind};

pub const SCRIPT_TYPE: &str = "application/javascript";

/// A plugin that could not contribute to this composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginFailure {
    pub plugin: String,
    pub reason: String,
}

/// The composed document plus any plugin that was skipped on the way.
#[derive(Debug, Clone)]
pub struct Composition {
    pub document: Document,
    pub failures: Vec<PluginFailure>,
}

/// Build the page for one request.
pub fn compose(template: &Template, registry: &PluginRegistry) -> Result<Composition, ComposeError> {
    let mut document = template.parse()?;
    let mut failures = Vec::new();

    for handle in registry.enabled() {
        let plugin = handle.instance.as_ref();
        let name = handle.name();

        if let Err(reason) = contribute_isolated(plugin, &mut document) {
            tracing::warn!("Plugin '{}' failed to contribute markup: {}", name, reason);
            failures.push(PluginFailure {
                plugin: name.to_string(),
                reason,
            });
            continue;
        }

        for script in plugin.scripts() {
            append_script(&mut document, name, script)?;
        }
        for style in plugin.styles() {
            append_style(&mut document, name, style)?;
        }
    }

    Ok(Composition { document, failures })
}

/// Run the plugin's markup step, restoring the document if it fails.
fn contribute_isolated(plugin: &dyn PagePlugin, document: &mut Document) -> Result<(), String> {
    let snapshot = document.clone();
    let outcome = catch_unwind(AssertUnwindSafe(|| plugin.contribute_markup(document)));
    let reason = match outcome {
        Ok(Ok(())) => return Ok(()),
        Ok(Err(e)) => e.to_string(),
        Err(payload) => format!("panicked: {}", panic_message(payload)),
    };
    *document = snapshot;
    Err(reason)
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        return (*msg).to_string();
    }
    if let Some(msg) = payload.downcast_ref::<String>() {
        return msg.clone();
    }
    "non-string panic payload".to_string()
}

/// URL of a plugin asset file under its category mount.
pub fn asset_url(plugin: &str, category: &AssetCategory, file: &str) -> String {
    format!(
        "{}/{}",
        mount_prefix(plugin, category),
        file.trim_start_matches('/')
    )
}

fn append_script(document: &mut Document, plugin: &str, file: &str) -> DomResult<()> {
    let body = document.ensure_body();
    let script = document.create_element("script");
    document.set_attribute(script, "src", asset_url(plugin, &AssetCategory::JS, file))?;
    document.set_attribute(script, "type", SCRIPT_TYPE)?;
    document.append_child(body, script)
}

fn append_style(document: &mut Document, plugin: &str, file: &str) -> DomResult<()> {
    let head = document.ensure_head();
    let link = document.create_element("link");
    document.set_attribute(link, "href", asset_url(plugin, &AssetCategory::CSS, file))?;
    document.set_attribute(link, "rel", "stylesheet")?;
    document.append_child(head, link)
}
