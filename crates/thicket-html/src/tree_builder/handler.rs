use super::element::Namespace;
use super::quirks::QuirksMode;
use crate::tokenizer::{AttributeList, Doctype, SourceRange};

/// Where a node goes, relative to an existing node.
///
/// [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
/// "the appropriate place for inserting a node ... is always a position
/// inside an element (or the document), either at its end or immediately
/// before one of its children."
#[derive(Debug)]
pub enum Preposition<'a, H> {
    /// As the last child of the document.
    Root,
    /// Immediately before this node, as a child of its parent.
    Before(&'a H),
    /// As the last child of this node.
    Under(&'a H),
}

impl<H> Clone for Preposition<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for Preposition<'_, H> {}

/// What the sink needs to create an element.
#[derive(Debug, Clone, Copy)]
pub struct NewElement<'a> {
    /// Local name, already case-adjusted for SVG.
    pub name: &'a str,
    /// Element namespace.
    pub namespace: Namespace,
    /// Attributes, already adjusted for foreign content.
    pub attributes: &'a AttributeList,
}

/// The sink the tree builder materializes into.
///
/// The builder decides what goes where; the sink owns the nodes. Every
/// element the builder creates is identified afterwards by the
/// [`Handle`](Self::Handle) returned from
/// [`insert_element`](Self::insert_element).
pub trait TreeHandler {
    /// Opaque node reference, such as an arena index.
    type Handle: Clone;

    /// Called once before anything else.
    fn start_document(&mut self) {}

    /// Called once after the last element has been closed.
    fn end_document(&mut self, pos: usize);

    /// Insert text at `preposition`.
    fn characters(&mut self, preposition: Preposition<'_, Self::Handle>, text: &str, source: SourceRange);

    /// Create an element and insert it at `preposition`.
    ///
    /// `void` elements never receive children and never get an
    /// [`end_tag`](Self::end_tag) call.
    fn insert_element(
        &mut self,
        preposition: Preposition<'_, Self::Handle>,
        element: &NewElement<'_>,
        void: bool,
        source: SourceRange,
    ) -> Self::Handle;

    /// The element was popped off the stack of open elements. `source` is
    /// the token that closed it, possibly an empty range for implied ends.
    fn end_tag(&mut self, element: &Self::Handle, source: SourceRange);

    /// A DOCTYPE in the initial insertion mode, with the quirks mode it
    /// selected.
    fn doctype(&mut self, doctype: &Doctype, quirks: QuirksMode, source: SourceRange);

    /// Insert a comment at `preposition`.
    fn comment(&mut self, preposition: Preposition<'_, Self::Handle>, text: &str, source: SourceRange);

    /// A tree construction or tokenizer parse error.
    fn error(&mut self, message: &str, pos: usize);

    /// Add each attribute of `attributes` that `element` does not have yet.
    fn merge_attributes(&mut self, element: &Self::Handle, attributes: &AttributeList, source: SourceRange);

    /// Detach `element` from its parent.
    fn remove_node(&mut self, element: &Self::Handle, source: SourceRange);

    /// Move every child of `from` to the end of `to`, in order.
    fn reparent_children(&mut self, from: &Self::Handle, to: &Self::Handle, source: SourceRange);

    /// Detach `element` and insert it at `preposition`.
    fn reparent_node(
        &mut self,
        element: &Self::Handle,
        preposition: Preposition<'_, Self::Handle>,
        source: SourceRange,
    );
}
