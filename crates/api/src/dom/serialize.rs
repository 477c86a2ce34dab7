use super::{Document, NodeData, NodeId};
use std::fmt::{self, Write};

impl Document {
    /// Serialize the whole document back to markup.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        // Writing into a String never fails.
        let _ = self.write_children(&mut out, self.root());
        out
    }

    /// Serialize one node including its own tags.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        let _ = self.write_node(&mut out, id);
        out
    }

    fn write_children<W: Write>(&self, out: &mut W, id: NodeId) -> fmt::Result {
        for &child in self.children(id) {
            self.write_node(out, child)?;
        }
        Ok(())
    }

    fn write_node<W: Write>(&self, out: &mut W, id: NodeId) -> fmt::Result {
        let Some(node) = self.get(id) else {
            return Ok(());
        };
        match node.data() {
            NodeData::Document => self.write_children(out, id),
            NodeData::Declaration(text) => write!(out, "<{}>", text),
            NodeData::Comment(text) => write!(out, "<!--{}-->", text),
            NodeData::Text(text) => out.write_str(text),
            NodeData::Element(el) => {
                write!(out, "<{}", el.tag)?;
                for attr in &el.attrs {
                    write!(out, " {}", attr.name)?;
                    if let Some(value) = &attr.value {
                        write!(out, "=\"{}\"", value.replace('"', "&quot;"))?;
                    }
                }
                out.write_char('>')?;
                if el.is_void() {
                    return Ok(());
                }
                self.write_children(out, id)?;
                write!(out, "</{}>", el.tag)
            }
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_children(f, self.root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_tree_serializes() {
        let mut doc = Document::new();
        let html = doc.create_element("html");
        let body = doc.create_element("body");
        let script = doc.create_element("script");
        doc.append_child(doc.root(), html).unwrap();
        doc.append_child(html, body).unwrap();
        doc.append_child(body, script).unwrap();
        doc.set_attribute(script, "src", "/a/js/a.js").unwrap();
        doc.set_attribute(script, "type", "application/javascript").unwrap();

        let expected = "<html><body><script src=\"/a/js/a.js\" type=\"application/javascript\"></script></body></html>";
        assert_eq!(doc.serialize(), expected);
        assert_eq!(doc.to_string(), expected);
        assert_eq!(
            doc.outer_html(script),
            "<script src=\"/a/js/a.js\" type=\"application/javascript\"></script>"
        );
    }

    #[test]
    fn test_reparse_is_stable() {
        let first = Document::parse("<HTML><Head><LINK href=/x.css></head><body class=a>t</body></HTML>")
            .unwrap()
            .serialize();
        let second = Document::parse(&first).unwrap().serialize();
        assert_eq!(first, second);
        assert_eq!(
            first,
            "<html><head><link href=\"/x.css\"></head><body class=\"a\">t</body></html>"
        );
    }
}
