//! Text dump of a tree in the html5lib test format.
//!
//! ```text
//! | <!DOCTYPE html>
//! | <html>
//! |   <head>
//! |   <body>
//! |     <p>
//! |       class="x"
//! |       "hi"
//! ```

use std::fmt::Write;

use crate::{DomTree, Namespace, NodeId, NodeType};

impl DomTree {
    /// Render the subtree below `id` (exclusive) in the html5lib format.
    /// Each line is prefixed with `| ` and indented two spaces per level.
    #[must_use]
    pub fn dump_children(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.dump_node(child, 0, &mut out);
        }
        out
    }

    /// Render the whole document in the html5lib format.
    #[must_use]
    pub fn dump(&self) -> String {
        self.dump_children(NodeId::ROOT)
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        let indent = "  ".repeat(depth);
        // Writing into a String cannot fail.
        let _ = match &node.node_type {
            NodeType::Document => Ok(()),
            NodeType::Doctype(doctype) => {
                if doctype.public_id.is_empty() && doctype.system_id.is_empty() {
                    writeln!(out, "| {indent}<!DOCTYPE {}>", doctype.name)
                } else {
                    writeln!(
                        out,
                        "| {indent}<!DOCTYPE {} \"{}\" \"{}\">",
                        doctype.name, doctype.public_id, doctype.system_id
                    )
                }
            }
            NodeType::Element(data) => {
                let result = match data.namespace {
                    Namespace::Html => writeln!(out, "| {indent}<{}>", data.tag_name),
                    ns => writeln!(out, "| {indent}<{ns} {}>", data.tag_name),
                };
                for (name, value) in &data.attrs {
                    let _ = writeln!(out, "| {indent}  {}=\"{value}\"", name.replace(':', " "));
                }
                result
            }
            NodeType::Text(text) => writeln!(out, "| {indent}\"{text}\""),
            NodeType::Comment(text) => writeln!(out, "| {indent}<!-- {text} -->"),
        };
        for &child in self.children(id) {
            self.dump_node(child, depth + 1, out);
        }
    }
}
