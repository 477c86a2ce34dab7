//! Arena-backed document tree.
//!
//! A [`Document`] owns every node in a flat `Vec`; nodes refer to each other
//! through [`NodeId`] indices. Detached nodes stay in the arena but are no
//! longer reachable from the root, so they disappear from queries and from
//! serialization.

mod parser;
mod serialize;

use crate::error::{DomError, DomResult};
use std::fmt;

/// Elements that never have children or an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is read verbatim up to the matching end tag.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

/// Handle to a node inside one [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// `None` for boolean attributes such as `defer`.
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<Attribute>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_deref().unwrap_or(""))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Set or replace an attribute, keeping its original position when it already exists.
    pub fn set_attr(&mut self, name: &str, value: Option<String>) {
        let name = name.to_ascii_lowercase();
        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attrs.push(Attribute { name, value }),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<Attribute> {
        let index = self
            .attrs
            .iter()
            .position(|a| a.name.eq_ignore_ascii_case(name))?;
        Some(self.attrs.remove(index))
    }

    pub fn is_void(&self) -> bool {
        is_void_element(&self.tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Document,
    /// `<!DOCTYPE ...>` and other `<!...>`/`<?...>` markup, stored without the angle brackets.
    Declaration(String),
    Element(Element),
    /// Markup-ready text, written back verbatim.
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn as_element(&self) -> Option<&Element> {
        match &self.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    fn accepts_children(&self) -> bool {
        match &self.data {
            NodeData::Document => true,
            NodeData::Element(el) => !el.is_void(),
            _ => false,
        }
    }
}

/// Mutable document tree built fresh for every composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.nodes.get(id.0).ok_or(DomError::UnknownNode(id))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(data));
        id
    }

    // ---- Node creation ----

    /// Create a detached element. Tag names are lower-cased.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(Element::new(tag)))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Comment(text.into()))
    }

    pub fn create_declaration(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Declaration(text.into()))
    }

    // ---- Element access ----

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.get(id).and_then(Node::as_element)
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.data) {
            Some(NodeData::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attr(name))
    }

    /// Set an attribute to a literal value. A `"` in the value is escaped on output.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> DomResult<()> {
        self.node(id)?;
        let el = self.element_mut(id).ok_or(DomError::NotAnElement(id))?;
        el.set_attr(name, Some(value.into()));
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<Attribute>> {
        self.node(id)?;
        let el = self.element_mut(id).ok_or(DomError::NotAnElement(id))?;
        Ok(el.remove_attr(name))
    }

    // ---- Structure ----

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// True when `ancestor` is `node` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Move `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.insert_child(parent, child, None)
    }

    /// Move `child` to the front of `parent`'s children.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.insert_child(parent, child, Some(0))
    }

    fn insert_child(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) -> DomResult<()> {
        let parent_node = self.node(parent)?;
        self.node(child)?;
        if !parent_node.accepts_children() {
            return Err(match parent_node.as_element() {
                Some(el) => DomError::VoidElement { tag: el.tag.clone() },
                None => DomError::NotAnElement(parent),
            });
        }
        if child == self.root() || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child)?;
        let siblings = &mut self.nodes[parent.0].children;
        match index {
            Some(i) if i < siblings.len() => siblings.insert(i, child),
            _ => siblings.push(child),
        }
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    /// Remove `id` from its parent. The subtree stays in the arena, unreachable.
    pub fn detach(&mut self, id: NodeId) -> DomResult<()> {
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            self.nodes[parent.0].children.retain(|&c| c != id);
            self.nodes[id.0].parent = None;
        }
        Ok(())
    }

    /// Deep-copy the top-level nodes of `source` under `parent`, returning the new ids.
    pub fn import_children(&mut self, source: &Document, parent: NodeId) -> DomResult<Vec<NodeId>> {
        self.node(parent)?;
        let mut imported = Vec::new();
        for &child in source.children(source.root()) {
            let copy = self.copy_subtree(source, child);
            self.append_child(parent, copy)?;
            imported.push(copy);
        }
        Ok(imported)
    }

    fn copy_subtree(&mut self, source: &Document, id: NodeId) -> NodeId {
        let data = match source.get(id).map(Node::data) {
            Some(NodeData::Document) | None => NodeData::Text(String::new()),
            Some(data) => data.clone(),
        };
        let copy = self.push(data);
        for &child in source.children(id) {
            let child_copy = self.copy_subtree(source, child);
            self.nodes[child_copy.0].parent = Some(copy);
            self.nodes[copy.0].children.push(child_copy);
        }
        copy
    }

    // ---- Queries ----

    /// Pre-order traversal of the nodes below `id`, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// First element with the given tag in document order.
    pub fn find_element(&self, tag: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .find(|&id| self.element(id).is_some_and(|el| el.tag.eq_ignore_ascii_case(tag)))
    }

    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants(self.root())
            .filter(|&id| self.element(id).is_some_and(|el| el.tag.eq_ignore_ascii_case(tag)))
            .collect()
    }

    pub fn element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .find(|&id| self.attribute(id, "id") == Some(element_id))
    }

    pub fn html(&self) -> Option<NodeId> {
        self.find_element("html")
    }

    pub fn head(&self) -> Option<NodeId> {
        self.find_element("head")
    }

    pub fn body(&self) -> Option<NodeId> {
        self.find_element("body")
    }

    /// Return `<head>`, creating it as the first child of `<html>` when missing.
    pub fn ensure_head(&mut self) -> NodeId {
        if let Some(head) = self.head() {
            return head;
        }
        let head = self.create_element("head");
        let container = self.html().unwrap_or(self.root());
        // Keep a leading doctype in front of a synthesized head.
        let index = self
            .children(container)
            .iter()
            .take_while(|&&c| matches!(self.nodes[c.0].data, NodeData::Declaration(_)))
            .count();
        // Both nodes are fresh or attached, so insertion cannot fail.
        let _ = self.insert_child(container, head, Some(index));
        head
    }

    /// Return `<body>`, appending it to `<html>` when missing.
    pub fn ensure_body(&mut self) -> NodeId {
        if let Some(body) = self.body() {
            return body;
        }
        let body = self.create_element("body");
        let container = self.html().unwrap_or(self.root());
        let _ = self.append_child(container, body);
        body
    }

    /// Concatenated text of every text node below `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|n| match self.get(n).map(Node::data) {
                Some(NodeData::Text(t)) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}

pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}
