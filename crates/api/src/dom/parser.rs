//! Forgiving HTML tokenizer and tree builder.
//!
//! This is not a full HTML5 parser: there is no implied-element insertion and
//! no entity decoding of text. It accepts what hand-written page templates and
//! plugin fragments contain and reports structural damage as [`ParseError`].

use super::{Attribute, Document, Element, NodeData, NodeId, is_raw_text_element, is_void_element};
use crate::error::ParseError;

impl Document {
    /// Parse markup into a new document.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        Parser::new(source).run()
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    doc: Document,
    /// Open elements, innermost last.
    open: Vec<NodeId>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            doc: Document::new(),
            open: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Document, ParseError> {
        let src = self.src;
        while self.pos < src.len() {
            let rest = &src[self.pos..];
            let Some(lt) = rest.find('<') else {
                self.push_text(self.pos, src.len());
                break;
            };
            if lt > 0 {
                self.push_text(self.pos, self.pos + lt);
                self.pos += lt;
                continue;
            }

            let after = rest.as_bytes().get(1).copied();
            if rest.starts_with("<!--") {
                self.comment()?;
            } else if rest.starts_with("</") && rest.as_bytes().get(2).is_some_and(u8::is_ascii_alphabetic) {
                self.close_tag()?;
            } else if matches!(after, Some(b'!') | Some(b'?')) {
                self.declaration()?;
            } else if after.is_some_and(|b| b.is_ascii_alphabetic()) {
                self.open_tag()?;
            } else {
                // A lone '<' is plain text.
                self.push_text(self.pos, self.pos + 1);
                self.pos += 1;
            }
        }

        // Elements still open at the end of input are closed implicitly.
        Ok(self.doc)
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(self.doc.root())
    }

    fn attach(&mut self, node: NodeId) {
        let parent = self.current();
        // Parents on the open stack are never void and `node` is fresh.
        let _ = self.doc.append_child(parent, node);
    }

    fn push_text(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let text = &self.src[start..end];
        let parent = self.current();
        if let Some(&last) = self.doc.children(parent).last() {
            if let Some(node) = self.doc.nodes.get_mut(last.0) {
                if let NodeData::Text(existing) = &mut node.data {
                    existing.push_str(text);
                    return;
                }
            }
        }
        let node = self.doc.create_text(text);
        self.attach(node);
    }

    fn comment(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        let body_start = start + "<!--".len();
        let end = self.src[body_start..]
            .find("-->")
            .ok_or(ParseError::UnterminatedComment { offset: start })?;
        let node = self.doc.create_comment(&self.src[body_start..body_start + end]);
        self.attach(node);
        self.pos = body_start + end + "-->".len();
        Ok(())
    }

    fn declaration(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        let end = self.src[start..]
            .find('>')
            .ok_or(ParseError::UnterminatedTag { offset: start })?;
        let node = self.doc.create_declaration(&self.src[start + 1..start + end]);
        self.attach(node);
        self.pos = start + end + 1;
        Ok(())
    }

    fn close_tag(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos += 2;
        let tag = self.read_name().to_ascii_lowercase();
        let end = self.src[self.pos..]
            .find('>')
            .ok_or(ParseError::UnterminatedTag { offset: start })?;
        self.pos += end + 1;

        if is_void_element(&tag) {
            return Ok(());
        }
        let depth = self
            .open
            .iter()
            .rposition(|&id| self.doc.element(id).is_some_and(|el| el.tag == tag))
            .ok_or(ParseError::UnexpectedClosingTag { tag, offset: start })?;
        self.open.truncate(depth);
        Ok(())
    }

    fn open_tag(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos += 1;
        let mut element = Element::new(self.read_name());
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            let rest = &self.src[self.pos..];
            if rest.is_empty() {
                return Err(ParseError::UnterminatedTag { offset: start });
            }
            if rest.starts_with("/>") {
                self_closing = true;
                self.pos += 2;
                break;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break;
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }
            let attr = self.attribute(start)?;
            // First occurrence wins, as in browsers.
            if !element.has_attr(&attr.name) {
                element.attrs.push(attr);
            }
        }

        let tag = element.tag.clone();
        let node = self.doc.push(NodeData::Element(element));
        self.attach(node);

        if is_void_element(&tag) || self_closing {
            return Ok(());
        }
        if is_raw_text_element(&tag) {
            return self.raw_text(&tag, start, node);
        }
        self.open.push(node);
        Ok(())
    }

    fn attribute(&mut self, tag_start: usize) -> Result<Attribute, ParseError> {
        let name_start = self.pos;
        while let Some(&b) = self.src.as_bytes().get(self.pos) {
            if b.is_ascii_whitespace() || b == b'=' || b == b'>' || b == b'/' {
                break;
            }
            self.pos += 1;
        }
        // A stray '=' with no name still has to advance.
        if self.pos == name_start {
            self.pos += 1;
        }
        let name = self.src[name_start..self.pos].to_ascii_lowercase();

        self.skip_whitespace();
        if self.src.as_bytes().get(self.pos) != Some(&b'=') {
            return Ok(Attribute { name, value: None });
        }
        self.pos += 1;
        self.skip_whitespace();

        let value = match self.src.as_bytes().get(self.pos) {
            Some(&quote @ (b'"' | b'\'')) => {
                let open = self.pos;
                let len = self.src[open + 1..]
                    .find(quote as char)
                    .ok_or(ParseError::UnterminatedAttributeValue { offset: open })?;
                self.pos = open + 1 + len + 1;
                self.src[open + 1..open + 1 + len].replace("&quot;", "\"")
            }
            Some(_) => {
                let value_start = self.pos;
                while let Some(&b) = self.src.as_bytes().get(self.pos) {
                    if b.is_ascii_whitespace() || b == b'>' {
                        break;
                    }
                    self.pos += 1;
                }
                self.src[value_start..self.pos].to_string()
            }
            None => return Err(ParseError::UnterminatedTag { offset: tag_start }),
        };
        Ok(Attribute {
            name,
            value: Some(value),
        })
    }

    fn raw_text(&mut self, tag: &str, start: usize, node: NodeId) -> Result<(), ParseError> {
        let end = self
            .find_raw_close(tag)
            .ok_or_else(|| ParseError::UnterminatedRawText {
                tag: tag.to_string(),
                offset: start,
            })?;
        if end > 0 {
            let text = self.doc.create_text(&self.src[self.pos..self.pos + end]);
            let _ = self.doc.append_child(node, text);
        }
        let close_start = self.pos + end;
        let gt = self.src[close_start..]
            .find('>')
            .ok_or(ParseError::UnterminatedTag { offset: close_start })?;
        self.pos = close_start + gt + 1;
        Ok(())
    }

    /// Offset from `pos` of the `</tag` that ends a raw-text element. The tag
    /// name must be followed by `>`, `/`, whitespace or end of input.
    fn find_raw_close(&self, tag: &str) -> Option<usize> {
        let rest = &self.src.as_bytes()[self.pos..];
        let name = tag.as_bytes();
        let mut from = 0;
        while let Some(i) = rest[from..].windows(2).position(|w| w == b"</") {
            let at = from + i;
            let name_start = at + 2;
            let matches_name = rest
                .get(name_start..name_start + name.len())
                .is_some_and(|n| n.eq_ignore_ascii_case(name));
            if matches_name {
                match rest.get(name_start + name.len()).copied() {
                    None | Some(b'>' | b'/') => return Some(at),
                    Some(b) if b.is_ascii_whitespace() => return Some(at),
                    _ => {}
                }
            }
            from = at + 2;
        }
        None
    }

    fn read_name(&mut self) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while let Some(&b) = src.as_bytes().get(self.pos) {
            if b.is_ascii_whitespace() || b == b'/' || b == b'>' {
                break;
            }
            self.pos += 1;
        }
        &src[start..self.pos]
    }

    fn skip_whitespace(&mut self) {
        while self
            .src
            .as_bytes()
            .get(self.pos)
            .is_some_and(u8::is_ascii_whitespace)
        {
            self.pos += 1;
        }
    }
}
