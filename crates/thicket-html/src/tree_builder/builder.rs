use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::element::{Element, ElementRef, IMPLIED_END_TAGS, IMPLIED_END_TAGS_THOROUGH, Namespace};
use super::formatting::{ActiveFormattingElements, FormattingEntry};
use super::handler::{NewElement, Preposition, TreeHandler};
use super::quirks::QuirksMode;
use super::stack::{OpenElements, Scope};
use super::token::TagToken;
use crate::tokenizer::{AttributeList, SourceRange, TokenizerState};

/// Tree construction settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeBuilderOptions {
    /// [§ 13.2.2](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
    ///
    /// "The scripting flag is set to "enabled" if scripting was enabled for
    /// the Document with which the parser is associated when the parser was
    /// created, and "disabled" otherwise."
    ///
    /// Decides whether `<noscript>` content is raw text.
    pub scripting_enabled: bool,
    /// Do not report tree construction errors. Recovery is unchanged.
    pub ignore_errors: bool,
}

impl TreeBuilderOptions {
    /// Set [`scripting_enabled`](Self::scripting_enabled).
    #[must_use]
    pub const fn with_scripting_enabled(mut self, enabled: bool) -> Self {
        self.scripting_enabled = enabled;
        self
    }

    /// Set [`ignore_errors`](Self::ignore_errors).
    #[must_use]
    pub const fn with_ignore_errors(mut self, ignore: bool) -> Self {
        self.ignore_errors = ignore;
        self
    }
}

/// An insertion position that owns its reference element, so the sink can
/// be borrowed mutably while it is in use.
#[derive(Debug)]
pub enum InsertionPlace<H> {
    /// Last child of the document.
    Root,
    /// Immediately before this element.
    Before(ElementRef<H>),
    /// Last child of this element.
    Under(ElementRef<H>),
}

impl<H> InsertionPlace<H> {
    /// Borrow as the [`Preposition`] the sink expects.
    #[must_use]
    pub fn preposition(&self) -> Preposition<'_, H> {
        match self {
            Self::Root => Preposition::Root,
            Self::Before(element) => Preposition::Before(&element.handle),
            Self::Under(element) => Preposition::Under(&element.handle),
        }
    }
}

/// Maximum number of outer loop iterations of the adoption agency.
const ADOPTION_OUTER_LIMIT: usize = 8;

/// Inner loop iterations after which formatting entries are dropped.
const ADOPTION_INNER_LIMIT: usize = 3;

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The parser state shared by all insertion modes: the stack of open
/// elements, the list of active formatting elements, the element pointers
/// and the flags. Every change to the tree goes through the sink `S`.
pub struct TreeBuilder<S: TreeHandler> {
    /// The node sink.
    pub(crate) sink: S,
    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    pub(crate) open: OpenElements<S::Handle>,
    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    pub(crate) formatting: ActiveFormattingElements<S::Handle>,
    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    pub(crate) head: Option<ElementRef<S::Handle>>,
    /// "the form element pointer"
    pub(crate) form: Option<ElementRef<S::Handle>>,
    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    pub(crate) frameset_ok: bool,
    /// Quirks mode chosen in the initial insertion mode.
    pub(crate) quirks: QuirksMode,
    pub(crate) options: TreeBuilderOptions,
    /// "foster parenting" is on while "in table" anything-else is processed.
    pub(crate) foster_parenting: bool,
    /// Drop a leading newline from the next character token
    /// (after `<pre>`, `<listing>` and `<textarea>`).
    pub(crate) ignore_lf: bool,
    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#fragment-case)
    /// The context element when parsing a fragment.
    pub(crate) fragment_context: Option<ElementRef<S::Handle>>,
    /// Lexical state requested for the bytes after the current start tag.
    pub(crate) tokenizer_switch: Option<(TokenizerState, Option<String>)>,
}

impl<S: TreeHandler> TreeBuilder<S> {
    /// A builder with empty stacks.
    pub const fn new(sink: S, options: TreeBuilderOptions) -> Self {
        Self {
            sink,
            open: OpenElements::new(),
            formatting: ActiveFormattingElements::new(),
            head: None,
            form: None,
            frameset_ok: true,
            quirks: QuirksMode::NoQuirks,
            options,
            foster_parenting: false,
            ignore_lf: false,
            fragment_context: None,
            tokenizer_switch: None,
        }
    }

    /// The sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// The sink, mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Give back the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// The stack of open elements.
    pub const fn open_elements(&self) -> &OpenElements<S::Handle> {
        &self.open
    }

    /// The list of active formatting elements.
    pub const fn active_formatting_elements(&self) -> &ActiveFormattingElements<S::Handle> {
        &self.formatting
    }

    /// The document's quirks mode.
    pub const fn quirks_mode(&self) -> QuirksMode {
        self.quirks
    }

    /// Report a tree construction error unless errors are ignored.
    pub fn error(&mut self, message: &str, pos: usize) {
        if !self.options.ignore_errors {
            self.sink.error(message, pos);
        }
    }

    /// Ask the tokenizer to scan what follows the current start tag in
    /// `state`, ending at `</name>`.
    pub fn switch_tokenizer(&mut self, state: TokenizerState, name: &str) {
        self.tokenizer_switch = Some((state, Some(name.to_string())));
    }

    /// "The current node is the bottommost node in this stack of open elements."
    #[must_use]
    pub fn current(&self) -> Option<&ElementRef<S::Handle>> {
        self.open.current()
    }

    /// Whether the current node is an HTML element with this name.
    #[must_use]
    pub fn current_is(&self, name: &str) -> bool {
        self.open.current().is_some_and(|current| current.is_html(name))
    }

    /// Whether the current node is an HTML element named one of `names`.
    #[must_use]
    pub fn current_is_one_of(&self, names: &[&str]) -> bool {
        self.open
            .current()
            .is_some_and(|current| current.is_html_one_of(names))
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#adjusted-current-node)
    ///
    /// "The adjusted current node is the context element if the parser was
    /// created as part of the HTML fragment parsing algorithm and the stack
    /// of open elements has only one element in it (fragment case);
    /// otherwise, the adjusted current node is the current node."
    #[must_use]
    pub fn adjusted_current(&self) -> Option<&ElementRef<S::Handle>> {
        match &self.fragment_context {
            Some(context) if self.open.len() == 1 => Some(context),
            _ => self.open.current(),
        }
    }

    /// [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    pub fn appropriate_place(
        &self,
        override_target: Option<&ElementRef<S::Handle>>,
    ) -> InsertionPlace<S::Handle> {
        // STEP 1: "If there was an override target specified, then let target
        // be the override target. Otherwise, let target be the current node."
        let Some(target) = override_target.or_else(|| self.open.current()) else {
            return InsertionPlace::Root;
        };

        // STEP 2: "If foster parenting is enabled and target is a table,
        // tbody, tfoot, thead, or tr element"
        if self.foster_parenting
            && target.is_html_one_of(&["table", "tbody", "tfoot", "thead", "tr"])
        {
            let last_template = self.open.last_index_of_html("template");
            let last_table = self.open.last_index_of_html("table");

            // "If there is a last template and either there is no last
            // table, or there is one, but last template is lower (more
            // recently added) than last table in the stack of open elements,
            // then: let adjusted insertion location be inside last template's
            // template contents"
            if let Some(template) = last_template
                && last_table.is_none_or(|table| template > table)
                && let Some(element) = self.open.get(template)
            {
                return InsertionPlace::Under(Rc::clone(element));
            }

            return match last_table.and_then(|table| self.open.get(table)) {
                // "If there is no last table, then let adjusted insertion
                // location be inside the first element in the stack of open
                // elements (the html element), after its last child (if any)"
                None => match self.open.get(0) {
                    Some(html) => InsertionPlace::Under(Rc::clone(html)),
                    None => InsertionPlace::Root,
                },
                // "If last table has a parent node, then let adjusted
                // insertion location be inside last table's parent node,
                // immediately before last table"
                Some(table) => InsertionPlace::Before(Rc::clone(table)),
            };
        }

        // "Otherwise: Let adjusted insertion location be inside target,
        // after its last child (if any)."
        InsertionPlace::Under(Rc::clone(target))
    }

    /// Ask the sink to create an element at `place` and wrap the handle.
    /// The stack of open elements is not touched.
    pub fn create_element_at(
        &mut self,
        place: &InsertionPlace<S::Handle>,
        name: &str,
        namespace: Namespace,
        attributes: AttributeList,
        void: bool,
        source: SourceRange,
    ) -> ElementRef<S::Handle> {
        let handle = self.sink.insert_element(
            place.preposition(),
            &NewElement {
                name,
                namespace,
                attributes: &attributes,
            },
            void,
            source,
        );
        Rc::new(Element::new(name.to_string(), namespace, attributes, handle))
    }

    /// [§ 13.2.6.1 Insert a foreign element](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    ///
    /// Insert at the appropriate place and push onto the stack of open
    /// elements, unless `void`.
    pub fn insert_element(
        &mut self,
        name: &str,
        namespace: Namespace,
        attributes: AttributeList,
        void: bool,
        source: SourceRange,
    ) -> ElementRef<S::Handle> {
        let place = self.appropriate_place(None);
        let element = self.create_element_at(&place, name, namespace, attributes, void, source);
        if !void {
            self.open.push(Rc::clone(&element));
        }
        element
    }

    /// "Insert an HTML element for the token."
    pub fn insert_html_element(&mut self, tag: &TagToken) -> ElementRef<S::Handle> {
        self.insert_element(
            &tag.name,
            Namespace::Html,
            tag.attributes.clone(),
            false,
            tag.source,
        )
    }

    /// Insert an HTML element that is immediately popped: `void` elements
    /// never reach the stack.
    pub fn insert_void_element(&mut self, tag: &TagToken) -> ElementRef<S::Handle> {
        self.insert_element(
            &tag.name,
            Namespace::Html,
            tag.attributes.clone(),
            true,
            tag.source,
        )
    }

    /// Insert an HTML element with no attributes for an implied start tag.
    pub fn insert_implied(&mut self, name: &str, source: SourceRange) -> ElementRef<S::Handle> {
        self.insert_element(
            name,
            Namespace::Html,
            AttributeList::new(),
            false,
            SourceRange::empty_at(source.start),
        )
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    pub fn insert_characters(&mut self, text: &str, source: SourceRange) {
        if text.is_empty() {
            return;
        }
        // "If the adjusted insertion location is in a Document node, then
        // return."
        let place = self.appropriate_place(None);
        if matches!(place, InsertionPlace::Root) {
            return;
        }
        self.sink.characters(place.preposition(), text, source);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    pub fn insert_comment(&mut self, text: &str, source: SourceRange) {
        let place = self.appropriate_place(None);
        self.sink.comment(place.preposition(), text, source);
    }

    /// Insert a comment as the last child of the document.
    pub fn insert_comment_in_document(&mut self, text: &str, source: SourceRange) {
        self.sink.comment(Preposition::Root, text, source);
    }

    /// Insert a comment as the last child of the first open element (`html`).
    pub fn insert_comment_in_html(&mut self, text: &str, source: SourceRange) {
        match self.open.get(0).map(Rc::clone) {
            Some(html) => self.sink.comment(Preposition::Under(&html.handle), text, source),
            None => self.sink.comment(Preposition::Root, text, source),
        }
    }

    /// Pop the current node, telling the sink it ended.
    pub fn pop(&mut self, source: SourceRange) -> Option<ElementRef<S::Handle>> {
        let element = self.open.pop()?;
        self.sink.end_tag(&element.handle, source);
        Some(element)
    }

    /// Pop elements until an HTML element with this name has been popped.
    pub fn pop_until(&mut self, name: &str, source: SourceRange) {
        while let Some(element) = self.pop(source) {
            if element.is_html(name) {
                break;
            }
        }
    }

    /// Pop elements until an HTML element named one of `names` has been popped.
    pub fn pop_until_one_of(&mut self, names: &[&str], source: SourceRange) {
        while let Some(element) = self.pop(source) {
            if element.is_html_one_of(names) {
                break;
            }
        }
    }

    /// Pop elements until `target` has been popped.
    pub fn pop_until_element(&mut self, target: &ElementRef<S::Handle>, source: SourceRange) {
        while let Some(element) = self.pop(source) {
            if Rc::ptr_eq(&element, target) {
                break;
            }
        }
    }

    /// Remove `element` from the stack of open elements wherever it is.
    pub fn remove_from_stack(&mut self, element: &ElementRef<S::Handle>, source: SourceRange) {
        if self.open.remove(element) {
            self.sink.end_tag(&element.handle, source);
        }
    }

    /// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "while the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an
    /// rp element, an rt element, or an rtc element, the UA must pop the
    /// current node off the stack of open elements."
    pub fn generate_implied_end_tags(&mut self, except: Option<&str>, source: SourceRange) {
        while let Some(current) = self.open.current() {
            if !current.is_html_one_of(IMPLIED_END_TAGS)
                || except.is_some_and(|name| current.is_html(name))
            {
                break;
            }
            let _ = self.pop(source);
        }
    }

    /// "generate all implied end tags thoroughly"
    pub fn generate_all_implied_end_tags(&mut self, source: SourceRange) {
        while self.current_is_one_of(IMPLIED_END_TAGS_THOROUGH) {
            let _ = self.pop(source);
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "When the steps above say the user agent is to close a p element, it
    /// means that the user agent must generate implied end tags, except for
    /// p elements. If the current node is not a p element, then this is a
    /// parse error. Pop elements from the stack of open elements until a p
    /// element has been popped from the stack."
    pub fn close_p(&mut self, source: SourceRange) {
        self.generate_implied_end_tags(Some("p"), source);
        if !self.current_is("p") {
            self.error("unclosed elements inside p", source.start);
        }
        self.pop_until("p", source);
    }

    /// Close a `p` element if one is in button scope.
    pub fn close_p_in_button_scope(&mut self, source: SourceRange) {
        if self.open.has_in_scope("p", Scope::Button) {
            self.close_p(source);
        }
    }

    /// [§ 13.2.6.4.9](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    ///
    /// Pop until the current node is one of `names`, `template` or `html`.
    pub fn clear_stack_back_to(&mut self, names: &[&str], source: SourceRange) {
        while let Some(current) = self.open.current() {
            if current.is_html_one_of(names) || current.is_html_one_of(&["template", "html"]) {
                break;
            }
            let _ = self.pop(source);
        }
    }

    /// Push an element onto the list of active formatting elements.
    pub fn push_formatting(&mut self, element: ElementRef<S::Handle>) {
        self.formatting.push(element);
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// "When the steps below require the UA to reconstruct the active
    /// formatting elements, the UA must perform the following steps"
    pub fn reconstruct_formatting(&mut self, source: SourceRange) {
        // STEP 1: "If there are no entries in the list of active formatting
        // elements, then there is nothing to reconstruct; stop this algorithm."
        let len = self.formatting.len();
        if len == 0 {
            return;
        }

        // STEP 2: "If the last (most recently added) entry in the list of
        // active formatting elements is a marker, or if it is an element that
        // is in the stack of open elements, then there is nothing to
        // reconstruct; stop this algorithm."
        let is_settled = |entry: Option<&FormattingEntry<S::Handle>>, open: &OpenElements<S::Handle>| {
            match entry {
                None | Some(FormattingEntry::Marker) => true,
                Some(FormattingEntry::Formatting(element)) => open.contains(element),
            }
        };
        if is_settled(self.formatting.get(len - 1), &self.open) {
            return;
        }

        // STEP 4-6 "Rewind": walk back to just after the last marker or open
        // element.
        let mut index = len - 1;
        while index > 0 && !is_settled(self.formatting.get(index - 1), &self.open) {
            index -= 1;
        }

        // STEP 7-10 "Advance" and "Create": re-insert each element after the
        // rewind point and replace its entry.
        let source = SourceRange::empty_at(source.start);
        for position in index..len {
            let Some(FormattingEntry::Formatting(element)) = self.formatting.get(position) else {
                continue;
            };
            let element = Rc::clone(element);
            let new_element = self.insert_element(
                &element.name,
                element.namespace,
                element.attributes.clone(),
                false,
                source,
            );
            self.formatting.replace_at(position, new_element);
        }
    }

    /// [§ 13.2.6.4.7 Any other end tag](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub fn any_other_end_tag(&mut self, name: &str, source: SourceRange) {
        // STEP 1: "Initialize node to be the current node (the bottommost
        // node of the stack)."
        for index in (0..self.open.len()).rev() {
            let Some(node) = self.open.get(index).map(Rc::clone) else {
                break;
            };
            // STEP 2: "Loop: If node is an HTML element with the same tag
            // name as the token, then:"
            if node.is_html(name) {
                // "Generate implied end tags, except for HTML elements with
                // the same tag name as the token."
                self.generate_implied_end_tags(Some(name), source);
                // "If node is not the current node, then this is a parse error."
                if !self.open.current().is_some_and(|current| Rc::ptr_eq(current, &node)) {
                    self.error(&format!("unclosed elements before </{name}>"), source.start);
                }
                // "Pop all the nodes from the current node up to node,
                // including node, then stop these steps."
                self.pop_until_element(&node, source);
                return;
            }
            // STEP 3: "Otherwise, if node is in the special category, then
            // this is a parse error; ignore the token, and return."
            if node.is_special() {
                self.error(&format!("unexpected end tag </{name}>"), source.start);
                return;
            }
        }
    }

    /// [§ 13.2.6.4.7 Adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    ///
    /// Runs for the end tag `subject` and returns `false` when the caller
    /// should act as described in "any other end tag" instead.
    pub fn adoption_agency(&mut self, subject: &str, source: SourceRange) -> bool {
        // STEP 2: "If the current node is an HTML element whose tag name is
        // subject, and the current node is not in the list of active
        // formatting elements, then pop the current node off the stack of
        // open elements and return."
        if let Some(current) = self.open.current()
            && current.is_html(subject)
            && !self.formatting.contains(current)
        {
            let _ = self.pop(source);
            return true;
        }

        // STEP 3-4: "Let outer loop counter be 0. While true:"
        for _ in 0..ADOPTION_OUTER_LIMIT {
            // STEP 4.3: "Let formatting element be the last element in the
            // list of active formatting elements that: is between the end of
            // the list and the last marker in the list, if any, or the start
            // of the list otherwise, and has the tag name subject."
            // "If there is no such element, then return and instead act as
            // described in the "any other end tag" entry above."
            let Some((formatting_index, formatting_element)) =
                self.formatting.last_after_marker_named(subject)
            else {
                return false;
            };

            // STEP 4.4: "If formatting element is not in the stack of open
            // elements, then this is a parse error; remove the element from
            // the list, and return."
            let Some(formatting_stack_index) = self.open.index_of(&formatting_element) else {
                self.error(&format!("formatting element <{subject}> is not open"), source.start);
                self.formatting.remove_at(formatting_index);
                return true;
            };

            // STEP 4.5: "If formatting element is in the stack of open
            // elements, but the element is not in scope, then this is a
            // parse error; return."
            if !self.open.has_element_in_scope(&formatting_element, Scope::Default) {
                self.error(&format!("formatting element <{subject}> is not in scope"), source.start);
                return true;
            }

            // STEP 4.6: "If formatting element is not the current node, this
            // is a parse error. (But do not return.)"
            if !self
                .open
                .current()
                .is_some_and(|current| Rc::ptr_eq(current, &formatting_element))
            {
                self.error(&format!("misnested end tag </{subject}>"), source.start);
            }

            // STEP 4.7: "Let furthest block be the topmost node in the stack
            // of open elements that is lower in the stack than formatting
            // element, and is an element in the special category."
            let furthest = self
                .open
                .iter()
                .enumerate()
                .skip(formatting_stack_index + 1)
                .find(|(_, element)| element.is_special())
                .map(|(index, element)| (index, Rc::clone(element)));

            // STEP 4.8: "If there is no furthest block, then the UA must
            // first pop all the nodes from the bottom of the stack of open
            // elements, from the current node up to and including formatting
            // element, then remove formatting element from the list of active
            // formatting elements, and finally return."
            let Some((furthest_index, furthest_block)) = furthest else {
                self.pop_until_element(&formatting_element, source);
                self.formatting.remove(&formatting_element);
                return true;
            };

            // STEP 4.9: "Let common ancestor be the element immediately above
            // formatting element in the stack of open elements."
            let Some(common_ancestor) = formatting_stack_index
                .checked_sub(1)
                .and_then(|index| self.open.get(index))
                .map(Rc::clone)
            else {
                return true;
            };

            // STEP 4.10: "Let a bookmark note the position of formatting
            // element in the list of active formatting elements relative to
            // the elements on either side of it in the list."
            let mut bookmark = formatting_index;

            // STEP 4.11: "Let node and last node be furthest block."
            let mut node_index = furthest_index;
            let mut last_node = Rc::clone(&furthest_block);

            // STEP 4.13: "Inner loop"
            let mut inner_loop_counter = 0;
            loop {
                inner_loop_counter += 1;

                // STEP 4.13.3: "Let node be the element immediately above
                // node in the stack of open elements"
                node_index -= 1;
                let Some(node) = self.open.get(node_index).map(Rc::clone) else {
                    break;
                };

                // STEP 4.13.4: "If node is formatting element, then break."
                if Rc::ptr_eq(&node, &formatting_element) {
                    break;
                }

                // STEP 4.13.5: "If inner loop counter is greater than 3 and
                // node is in the list of active formatting elements, then
                // remove node from the list of active formatting elements."
                let mut node_formatting_index = self.formatting.index_of(&node);
                if inner_loop_counter > ADOPTION_INNER_LIMIT
                    && let Some(index) = node_formatting_index
                {
                    self.formatting.remove_at(index);
                    if index < bookmark {
                        bookmark -= 1;
                    }
                    node_formatting_index = None;
                }

                // STEP 4.13.6: "If node is not in the list of active
                // formatting elements, then remove node from the stack of
                // open elements and continue."
                let Some(node_formatting_index) = node_formatting_index else {
                    let removed = self.open.remove_at(node_index);
                    self.sink.end_tag(&removed.handle, source);
                    continue;
                };

                // STEP 4.13.7: "Create an element for the token for which
                // the element node was created, in the HTML namespace, with
                // common ancestor as the intended parent; replace the entry
                // for node in the list of active formatting elements with an
                // entry for the new element, replace the entry for node in
                // the stack of open elements with an entry for the new
                // element, and let node be the new element."
                let new_node = self.create_element_at(
                    &InsertionPlace::Under(Rc::clone(&common_ancestor)),
                    &node.name,
                    node.namespace,
                    node.attributes.clone(),
                    false,
                    source,
                );
                self.formatting
                    .replace_at(node_formatting_index, Rc::clone(&new_node));
                self.open.replace_at(node_index, Rc::clone(&new_node));

                // STEP 4.13.8: "If last node is furthest block, then move the
                // aforementioned bookmark to be immediately after the new
                // node in the list of active formatting elements."
                if Rc::ptr_eq(&last_node, &furthest_block) {
                    bookmark = node_formatting_index + 1;
                }

                // STEP 4.13.9: "Append last node to node."
                self.sink.reparent_node(
                    &last_node.handle,
                    Preposition::Under(&new_node.handle),
                    source,
                );

                // STEP 4.13.10: "Set last node to node."
                last_node = new_node;
            }

            // STEP 4.14: "Insert whatever last node ended up being in the
            // previous step at the appropriate place for inserting a node,
            // but using common ancestor as the override target."
            let place = self.appropriate_place(Some(&common_ancestor));
            self.sink
                .reparent_node(&last_node.handle, place.preposition(), source);

            // STEP 4.15: "Create an element for the token for which
            // formatting element was created, in the HTML namespace, with
            // furthest block as the intended parent."
            let new_element = self.create_element_at(
                &InsertionPlace::Under(Rc::clone(&common_ancestor)),
                &formatting_element.name,
                formatting_element.namespace,
                formatting_element.attributes.clone(),
                false,
                source,
            );

            // STEP 4.16: "Take all of the child nodes of furthest block and
            // append them to the element created in the last step."
            self.sink
                .reparent_children(&furthest_block.handle, &new_element.handle, source);

            // STEP 4.17: "Append that new element to furthest block."
            self.sink.reparent_node(
                &new_element.handle,
                Preposition::Under(&furthest_block.handle),
                source,
            );

            // STEP 4.18: "Remove formatting element from the list of active
            // formatting elements, and insert the new element into the list
            // of active formatting elements at the position of the
            // aforementioned bookmark."
            if let Some(index) = self.formatting.index_of(&formatting_element) {
                self.formatting.remove_at(index);
                if index < bookmark {
                    bookmark -= 1;
                }
            }
            self.formatting.insert(bookmark, Rc::clone(&new_element));

            // STEP 4.19: "Remove formatting element from the stack of open
            // elements, and insert the new element into the stack of open
            // elements immediately below the position of furthest block in
            // that stack."
            self.remove_from_stack(&formatting_element, source);
            let below = self
                .open
                .index_of(&furthest_block)
                .map_or(self.open.len(), |index| index + 1);
            self.open.insert(below, new_element);
        }
        true
    }

    /// [§ 13.2.6.5 Stop parsing](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    ///
    /// "Pop all the nodes off the stack of open elements."
    pub fn stop_parsing(&mut self, pos: usize) {
        let source = SourceRange::empty_at(pos);
        while self.pop(source).is_some() {}
        log::debug!("tree builder: stopped parsing at {pos}");
        self.sink.end_document(pos);
    }
}

impl<S: TreeHandler + std::fmt::Debug> std::fmt::Debug for TreeBuilder<S>
where
    S::Handle: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeBuilder")
            .field("sink", &self.sink)
            .field("open", &self.open)
            .field("quirks", &self.quirks)
            .field("frameset_ok", &self.frameset_ok)
            .finish_non_exhaustive()
    }
}
