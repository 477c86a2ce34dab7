use crate::dom::NodeId;

/// Structural errors raised while mutating a [`crate::dom::Document`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),
    #[error("Cannot insert {child} under {parent}: it would create a cycle")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),
    #[error("Void element <{tag}> cannot have children")]
    VoidElement { tag: String },
}

/// Errors produced while parsing markup into a document tree.
///
/// Offsets are byte positions into the parsed input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unterminated tag starting at byte {offset}")]
    UnterminatedTag { offset: usize },
    #[error("Unterminated comment starting at byte {offset}")]
    UnterminatedComment { offset: usize },
    #[error("Unterminated attribute value starting at byte {offset}")]
    UnterminatedAttributeValue { offset: usize },
    #[error("Missing </{tag}> for raw text element opened at byte {offset}")]
    UnterminatedRawText { tag: String, offset: usize },
    #[error("Closing tag </{tag}> at byte {offset} has no matching open element")]
    UnexpectedClosingTag { tag: String, offset: usize },
}

pub type DomResult<T> = std::result::Result<T, DomError>;
