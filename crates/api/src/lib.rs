//! Shared models for Quarkboard: plugin descriptors, asset categories and the
//! per-request document tree that plugins mutate.

pub mod dom;
pub mod error;
pub mod models;

pub use dom::{Attribute, Document, Element, Node, NodeData, NodeId};
pub use error::{DomError, DomResult, ParseError};
pub use models::*;
