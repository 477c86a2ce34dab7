//! Page assembly for Quarkboard: template loading, asset mounts, per-request
//! composition of plugin contributions, and the HTTP layer serving the result.

pub mod compose;
pub mod config;
pub mod emit;
pub mod error;
pub mod logging;
pub mod mount;
pub mod server;
pub mod template;

pub use compose::{Composition, PluginFailure, compose};
pub use emit::{Emitter, Provenance};
pub use mount::{MountEntry, MountTable};
pub use server::{AppState, Server, build_router};
pub use template::Template;
