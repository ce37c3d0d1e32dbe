//! A [`TreeHandler`] that builds a [`thicket_dom::DomTree`].
//!
//! The tree builder decides where every node goes; this sink only performs
//! the DOM operations it is told to, and collects the parse errors reported
//! along the way.

use serde::Serialize;
use thicket_dom::{AttributesMap, DoctypeData, DomTree, ElementData, NodeId, NodeType};

use crate::tokenizer::{AttributeList, Doctype, SourceRange};
use crate::tree_builder::{NewElement, Preposition, QuirksMode, TreeHandler};

/// A parse error, as recorded by [`DomBuilder`].
///
/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
/// "Parse errors are only errors with the content"; the document is still
/// built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseIssue {
    /// What went wrong.
    pub message: String,
    /// Byte offset into the normalized input.
    pub position: usize,
}

/// Materializes tree construction into an arena [`DomTree`].
#[derive(Debug, Default)]
pub struct DomBuilder {
    tree: DomTree,
    issues: Vec<ParseIssue>,
    quirks_mode: QuirksMode,
    doctype: Option<NodeId>,
}

impl DomBuilder {
    /// A builder over an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Parse errors in the order they were reported.
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// The quirks mode reported with the DOCTYPE. A document without one
    /// stays at the default here; the tree builder knows it is in quirks
    /// mode.
    #[must_use]
    pub const fn quirks_mode(&self) -> QuirksMode {
        self.quirks_mode
    }

    /// The doctype node, if the document had one.
    #[must_use]
    pub const fn doctype(&self) -> Option<NodeId> {
        self.doctype
    }

    /// Take the finished tree and issues.
    #[must_use]
    pub fn finish(self) -> (DomTree, Vec<ParseIssue>) {
        (self.tree, self.issues)
    }

    /// Attach `node` at `preposition`.
    fn place(&mut self, preposition: Preposition<'_, NodeId>, node: NodeId) {
        match preposition {
            Preposition::Root => self.tree.append_child(NodeId::ROOT, node),
            Preposition::Under(&parent) => self.tree.append_child(parent, node),
            Preposition::Before(&reference) => {
                let parent = self.tree.parent(reference).unwrap_or(NodeId::ROOT);
                self.tree.insert_before(parent, node, reference);
            }
        }
    }

    /// The text node that new text at `preposition` would merge into.
    ///
    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    /// "If there is a Text node immediately before the adjusted insertion
    /// location, then append data to that Text node's data."
    fn adjacent_text(&self, preposition: Preposition<'_, NodeId>) -> Option<NodeId> {
        let candidate = match preposition {
            Preposition::Root => self.tree.last_child(NodeId::ROOT),
            Preposition::Under(&parent) => self.tree.last_child(parent),
            Preposition::Before(&reference) => self.tree.prev_sibling(reference),
        }?;
        self.tree.as_text(candidate).map(|_| candidate)
    }
}

impl TreeHandler for DomBuilder {
    type Handle = NodeId;

    fn end_document(&mut self, pos: usize) {
        log::debug!(
            "dom builder: document finished at byte {pos}, {} nodes, {} issues",
            self.tree.len(),
            self.issues.len()
        );
    }

    fn characters(&mut self, preposition: Preposition<'_, NodeId>, text: &str, _source: SourceRange) {
        if let Some(existing) = self.adjacent_text(preposition)
            && let Some(node) = self.tree.get_mut(existing)
            && let NodeType::Text(data) = &mut node.node_type
        {
            data.push_str(text);
            return;
        }
        let node = self.tree.alloc(NodeType::Text(text.to_string()));
        self.place(preposition, node);
    }

    fn insert_element(
        &mut self,
        preposition: Preposition<'_, NodeId>,
        element: &NewElement<'_>,
        _void: bool,
        _source: SourceRange,
    ) -> NodeId {
        let attrs: AttributesMap = element
            .attributes
            .iter()
            .map(|attr| (attr.name.clone(), attr.value.clone()))
            .collect();
        let node = self.tree.alloc(NodeType::Element(ElementData {
            tag_name: element.name.to_string(),
            namespace: element.namespace,
            attrs,
        }));
        self.place(preposition, node);
        node
    }

    fn end_tag(&mut self, _element: &NodeId, _source: SourceRange) {}

    fn doctype(&mut self, doctype: &Doctype, quirks: QuirksMode, _source: SourceRange) {
        let node = self.tree.alloc(NodeType::Doctype(DoctypeData {
            name: doctype.name.clone().unwrap_or_default(),
            public_id: doctype.public_id.clone().unwrap_or_default(),
            system_id: doctype.system_id.clone().unwrap_or_default(),
        }));
        self.tree.append_child(NodeId::ROOT, node);
        self.doctype = Some(node);
        self.quirks_mode = quirks;
    }

    fn comment(&mut self, preposition: Preposition<'_, NodeId>, text: &str, _source: SourceRange) {
        let node = self.tree.alloc(NodeType::Comment(text.to_string()));
        self.place(preposition, node);
    }

    fn error(&mut self, message: &str, pos: usize) {
        self.issues.push(ParseIssue {
            message: message.to_string(),
            position: pos,
        });
    }

    fn merge_attributes(&mut self, element: &NodeId, attributes: &AttributeList, _source: SourceRange) {
        let Some(data) = self.tree.as_element_mut(*element) else {
            return;
        };
        for attr in attributes {
            let _ = data
                .attrs
                .entry(attr.name.clone())
                .or_insert_with(|| attr.value.clone());
        }
    }

    fn remove_node(&mut self, element: &NodeId, _source: SourceRange) {
        self.tree.detach(*element);
    }

    fn reparent_children(&mut self, from: &NodeId, to: &NodeId, _source: SourceRange) {
        self.tree.move_children(*from, *to);
    }

    fn reparent_node(&mut self, element: &NodeId, preposition: Preposition<'_, NodeId>, _source: SourceRange) {
        self.tree.detach(*element);
        self.place(preposition, *element);
    }
}
