use std::rc::Rc;

use strum_macros::Display;

use super::builder::{TreeBuilder, TreeBuilderOptions};
use super::element::{Element, ElementRef, Namespace};
use super::handler::TreeHandler;
use super::modes::{
    AfterAfterBody, AfterAfterFrameset, AfterBody, AfterFrameset, AfterHead, BeforeHead,
    BeforeHtml, InBody, InCaption, InCell, InColumnGroup, InForeignContent, InFrameset, InHead,
    InHeadNoscript, InRow, InSelect, InSelectInTable, InTable, InTableBody, InTableText,
    InTemplate, Initial, InsertionModeRules, Text,
};
use super::quirks::QuirksMode;
use super::token::TagToken;
use crate::tokenizer::{
    AttributeList, Attributes, Doctype, LexicalState, SourceRange, TokenHandler,
};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary
/// operation of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    #[strum(serialize = "initial")]
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    #[strum(serialize = "before html")]
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    #[strum(serialize = "before head")]
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    #[strum(serialize = "in head")]
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    #[strum(serialize = "in head noscript")]
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    #[strum(serialize = "after head")]
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    #[strum(serialize = "in body")]
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    #[strum(serialize = "text")]
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    #[strum(serialize = "in table")]
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    #[strum(serialize = "in table text")]
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    #[strum(serialize = "in caption")]
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    #[strum(serialize = "in column group")]
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    #[strum(serialize = "in table body")]
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    #[strum(serialize = "in row")]
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    #[strum(serialize = "in cell")]
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    #[strum(serialize = "in select")]
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    #[strum(serialize = "in select in table")]
    InSelectInTable,
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    #[strum(serialize = "in template")]
    InTemplate,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    #[strum(serialize = "after body")]
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    #[strum(serialize = "in frameset")]
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    #[strum(serialize = "after frameset")]
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    #[strum(serialize = "after after body")]
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    #[strum(serialize = "after after frameset")]
    AfterAfterFrameset,
}

/// Call `$method` on the rules of the dispatcher's current insertion mode.
macro_rules! route {
    ($dispatcher:ident, $method:ident ( $($arg:expr),* )) => {
        match $dispatcher.mode {
            InsertionMode::Initial => Initial::$method($dispatcher, $($arg),*),
            InsertionMode::BeforeHtml => BeforeHtml::$method($dispatcher, $($arg),*),
            InsertionMode::BeforeHead => BeforeHead::$method($dispatcher, $($arg),*),
            InsertionMode::InHead => InHead::$method($dispatcher, $($arg),*),
            InsertionMode::InHeadNoscript => InHeadNoscript::$method($dispatcher, $($arg),*),
            InsertionMode::AfterHead => AfterHead::$method($dispatcher, $($arg),*),
            InsertionMode::InBody => InBody::$method($dispatcher, $($arg),*),
            InsertionMode::Text => Text::$method($dispatcher, $($arg),*),
            InsertionMode::InTable => InTable::$method($dispatcher, $($arg),*),
            InsertionMode::InTableText => InTableText::$method($dispatcher, $($arg),*),
            InsertionMode::InCaption => InCaption::$method($dispatcher, $($arg),*),
            InsertionMode::InColumnGroup => InColumnGroup::$method($dispatcher, $($arg),*),
            InsertionMode::InTableBody => InTableBody::$method($dispatcher, $($arg),*),
            InsertionMode::InRow => InRow::$method($dispatcher, $($arg),*),
            InsertionMode::InCell => InCell::$method($dispatcher, $($arg),*),
            InsertionMode::InSelect => InSelect::$method($dispatcher, $($arg),*),
            InsertionMode::InSelectInTable => InSelectInTable::$method($dispatcher, $($arg),*),
            InsertionMode::InTemplate => InTemplate::$method($dispatcher, $($arg),*),
            InsertionMode::AfterBody => AfterBody::$method($dispatcher, $($arg),*),
            InsertionMode::InFrameset => InFrameset::$method($dispatcher, $($arg),*),
            InsertionMode::AfterFrameset => AfterFrameset::$method($dispatcher, $($arg),*),
            InsertionMode::AfterAfterBody => AfterAfterBody::$method($dispatcher, $($arg),*),
            InsertionMode::AfterAfterFrameset => AfterAfterFrameset::$method($dispatcher, $($arg),*),
        }
    };
}

/// What the tree construction dispatcher needs to know about a token to
/// choose between the current insertion mode and foreign content.
#[derive(Debug, Clone, Copy)]
enum TokenKind<'a> {
    Characters,
    StartTag(&'a TagToken),
    Other,
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
///
/// The tokenizer's [`TokenHandler`]. Holds the insertion mode state and
/// routes each token to the rules of the current mode, or to the rules for
/// foreign content.
pub struct Dispatcher<S: TreeHandler> {
    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    pub(crate) mode: InsertionMode,
    /// "the original insertion mode", restored when the text or in table
    /// text modes finish.
    pub(crate) original_mode: InsertionMode,
    /// "the stack of template insertion modes"
    pub(crate) template_modes: Vec<InsertionMode>,
    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    /// "the pending table character tokens"
    pub(crate) pending_table_text: Vec<(String, SourceRange)>,
    /// The shared tree construction state.
    pub(crate) builder: TreeBuilder<S>,
}

impl<S: TreeHandler> Dispatcher<S> {
    /// A dispatcher in the "initial" insertion mode.
    pub const fn new(sink: S, options: TreeBuilderOptions) -> Self {
        Self {
            mode: InsertionMode::Initial,
            original_mode: InsertionMode::Initial,
            template_modes: Vec::new(),
            pending_table_text: Vec::new(),
            builder: TreeBuilder::new(sink, options),
        }
    }

    /// [§ 13.5 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// Set up the fragment case for a context element. The sink receives a
    /// root `html` element whose children become the fragment.
    pub fn start_fragment(&mut self, name: &str, namespace: Namespace, attributes: AttributeList) {
        // STEP 8: "Let root be a new html element with no attributes."
        // STEP 9: "Append the element root to the Document node created above."
        // STEP 10: "Set up the parser's stack of open elements so that it
        // contains just the single element root."
        let root = self.builder.insert_element(
            "html",
            Namespace::Html,
            AttributeList::new(),
            false,
            SourceRange::default(),
        );
        let context: ElementRef<S::Handle> = Rc::new(Element::new(
            name.to_string(),
            namespace,
            attributes,
            root.handle.clone(),
        ));

        // STEP 11: "If the context element is a template element, then push
        // "in template" onto the stack of template insertion modes so that it
        // is the new current template insertion mode."
        if context.is_html("template") {
            self.template_modes.push(InsertionMode::InTemplate);
        }

        // STEP 14: "Set the parser's form element pointer to the nearest node
        // to the context element that is a form element (going straight up
        // the ancestor chain, and including the element itself, if it is a
        // form element), if any."
        if context.is_html("form") {
            self.builder.form = Some(Rc::clone(&context));
        }

        // STEP 13: "Reset the parser's insertion mode appropriately."
        self.builder.fragment_context = Some(context);
        self.reset_insertion_mode();
    }

    /// The current insertion mode.
    pub const fn mode(&self) -> InsertionMode {
        self.mode
    }

    /// The shared tree construction state.
    pub const fn builder(&self) -> &TreeBuilder<S> {
        &self.builder
    }

    /// The sink.
    pub const fn sink(&self) -> &S {
        self.builder.sink()
    }

    /// The document's quirks mode.
    pub const fn quirks_mode(&self) -> QuirksMode {
        self.builder.quirks_mode()
    }

    /// Give back the sink.
    pub fn into_sink(self) -> S {
        self.builder.into_sink()
    }

    /// Switch the insertion mode.
    pub fn set_mode(&mut self, mode: InsertionMode) {
        if mode != self.mode {
            log::debug!("tree builder: {} -> {mode}", self.mode);
        }
        self.mode = mode;
    }

    /// Remember the current mode and switch to "text".
    pub fn enter_text_mode(&mut self) {
        self.original_mode = self.mode;
        self.set_mode(InsertionMode::Text);
    }

    /// "the current template insertion mode"
    #[must_use]
    pub fn current_template_mode(&self) -> Option<InsertionMode> {
        self.template_modes.last().copied()
    }

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    pub fn reset_insertion_mode(&mut self) {
        let mode = self.appropriate_mode();
        self.set_mode(mode);
    }

    fn appropriate_mode(&self) -> InsertionMode {
        let open = &self.builder.open;
        // STEP 1: "Let last be false."
        // STEP 2: "Let node be the last node in the stack of open elements."
        for index in (0..open.len()).rev() {
            let Some(mut node) = open.get(index) else {
                break;
            };
            // STEP 3: "Loop: If node is the first node in the stack of open
            // elements, then set last to true, and, if the parser was created
            // as part of the HTML fragment parsing algorithm (fragment case),
            // set node to the context element passed to that algorithm."
            let last = index == 0;
            if last && let Some(context) = &self.builder.fragment_context {
                node = context;
            }

            if !node.in_html_namespace() {
                if last {
                    return InsertionMode::InBody;
                }
                continue;
            }
            match node.name.as_str() {
                // STEP 4: "If node is a select element, run these substeps"
                "select" => {
                    if !last {
                        for ancestor in open.iter().take(index).rev() {
                            if ancestor.is_html("template") {
                                break;
                            }
                            if ancestor.is_html("table") {
                                return InsertionMode::InSelectInTable;
                            }
                        }
                    }
                    return InsertionMode::InSelect;
                }
                // STEP 5: "If node is a td or th element and last is false,
                // then switch the insertion mode to "in cell" and return."
                "td" | "th" if !last => return InsertionMode::InCell,
                // STEP 6-10
                "tr" => return InsertionMode::InRow,
                "tbody" | "thead" | "tfoot" => return InsertionMode::InTableBody,
                "caption" => return InsertionMode::InCaption,
                "colgroup" => return InsertionMode::InColumnGroup,
                "table" => return InsertionMode::InTable,
                // STEP 11: "If node is a template element, then switch the
                // insertion mode to the current template insertion mode and
                // return."
                "template" => {
                    return self
                        .current_template_mode()
                        .unwrap_or(InsertionMode::InTemplate);
                }
                // STEP 12: "If node is a head element and last is false, then
                // switch the insertion mode to "in head" and return."
                "head" if !last => return InsertionMode::InHead,
                "body" => return InsertionMode::InBody,
                "frameset" => return InsertionMode::InFrameset,
                // STEP 15: "If node is an html element, run these substeps:
                // If the head element pointer is null, switch the insertion
                // mode to "before head" and return. Otherwise, the head
                // element pointer is not null, switch the insertion mode to
                // "after head" and return."
                "html" => {
                    return if self.builder.head.is_none() {
                        InsertionMode::BeforeHead
                    } else {
                        InsertionMode::AfterHead
                    };
                }
                // STEP 16: "If last is true, then switch the insertion mode
                // to "in body" and return."
                _ if last => return InsertionMode::InBody,
                _ => {}
            }
        }
        InsertionMode::InBody
    }

    /// [§ 13.2.6 Tree construction dispatcher](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// True when the token goes to the rules for parsing tokens in
    /// foreign content.
    fn in_foreign_content(&self, token: TokenKind<'_>) -> bool {
        // "If the stack of open elements is empty"
        // "If the adjusted current node is an element in the HTML namespace"
        let Some(node) = self.builder.adjusted_current() else {
            return false;
        };
        if node.in_html_namespace() {
            return false;
        }

        // "If the adjusted current node is a MathML text integration point
        // and the token is a start tag whose tag name is neither "mglyph" nor
        // "malignmark""
        // "If the adjusted current node is a MathML text integration point
        // and the token is a character token"
        if node.is_mathml_text_integration_point() {
            match token {
                TokenKind::StartTag(tag) if !tag.is_one_of(&["mglyph", "malignmark"]) => {
                    return false;
                }
                TokenKind::Characters => return false,
                _ => {}
            }
        }

        // "If the adjusted current node is a MathML annotation-xml element
        // and the token is a start tag whose tag name is "svg""
        if node.namespace == Namespace::MathMl
            && node.name == "annotation-xml"
            && matches!(token, TokenKind::StartTag(tag) if tag.name == "svg")
        {
            return false;
        }

        // "If the adjusted current node is an HTML integration point and the
        // token is a start tag"
        // "If the adjusted current node is an HTML integration point and the
        // token is a character token"
        !(node.is_html_integration_point()
            && matches!(token, TokenKind::StartTag(_) | TokenKind::Characters))
    }

    /// Process a character token, reprocessing included.
    pub fn process_characters(&mut self, text: &str, source: SourceRange) {
        log::trace!("tree builder: characters {text:?} in {}", self.mode);
        if self.in_foreign_content(TokenKind::Characters) {
            InForeignContent::characters(self, text, source);
        } else {
            route!(self, characters(text, source));
        }
    }

    /// Process a start tag token.
    pub fn process_start_tag(&mut self, tag: TagToken) {
        log::trace!("tree builder: <{}> in {}", tag.name, self.mode);
        if self.in_foreign_content(TokenKind::StartTag(&tag)) {
            InForeignContent::start_tag(self, tag);
        } else {
            route!(self, start_tag(tag));
        }
    }

    /// Process an end tag token.
    pub fn process_end_tag(&mut self, name: &str, source: SourceRange) {
        log::trace!("tree builder: </{name}> in {}", self.mode);
        if self.in_foreign_content(TokenKind::Other) {
            InForeignContent::end_tag(self, name, source);
        } else {
            route!(self, end_tag(name, source));
        }
    }

    /// Process a start tag with the rules of the current insertion mode,
    /// skipping the foreign content check.
    pub(crate) fn process_start_tag_in_mode(&mut self, tag: TagToken) {
        route!(self, start_tag(tag));
    }

    /// Process an end tag with the rules of the current insertion mode,
    /// skipping the foreign content check.
    pub(crate) fn process_end_tag_in_mode(&mut self, name: &str, source: SourceRange) {
        route!(self, end_tag(name, source));
    }

    /// Process a comment token.
    pub fn process_comment(&mut self, text: &str, source: SourceRange) {
        if self.in_foreign_content(TokenKind::Other) {
            InForeignContent::comment(self, text, source);
        } else {
            route!(self, comment(text, source));
        }
    }

    /// Process a DOCTYPE token.
    pub fn process_doctype(&mut self, doctype: &Doctype, source: SourceRange) {
        if self.in_foreign_content(TokenKind::Other) {
            InForeignContent::doctype(self, doctype, source);
        } else {
            route!(self, doctype(doctype, source));
        }
    }

    /// Process the end-of-file token.
    pub fn process_end_of_file(&mut self, pos: usize) {
        route!(self, end_of_file(pos));
    }
}

impl<S: TreeHandler> TokenHandler for Dispatcher<S> {
    fn start_document(&mut self) {
        self.builder.sink.start_document();
    }

    fn end_document(&mut self, pos: usize) {
        self.builder.ignore_lf = false;
        self.process_end_of_file(pos);
    }

    fn error(&mut self, message: &str, pos: usize) {
        self.builder.sink.error(message, pos);
    }

    fn characters(&mut self, text: &str, source: SourceRange) {
        let mut text = text;
        let mut source = source;
        // "If the next token is a U+000A LINE FEED (LF) character token, then
        // ignore that token and move on to the next one. (Newlines at the
        // start of pre blocks are ignored as an authoring convenience.)"
        if std::mem::take(&mut self.builder.ignore_lf)
            && let Some(rest) = text.strip_prefix('\n')
        {
            text = rest;
            source = SourceRange::new(source.start + 1, source.length.saturating_sub(1));
        }
        if !text.is_empty() {
            self.process_characters(text, source);
        }
    }

    fn start_tag(
        &mut self,
        name: &str,
        attributes: Attributes<'_>,
        self_closing: bool,
        source: SourceRange,
        lexer: &mut LexicalState,
    ) {
        self.builder.ignore_lf = false;
        for (message, pos) in attributes.errors() {
            self.builder.sink.error(message, *pos);
        }
        self.process_start_tag(TagToken::new(name, attributes.into_list(), self_closing, source));
        if let Some((state, end_tag)) = self.builder.tokenizer_switch.take() {
            lexer.switch_to(state, end_tag.as_deref());
        }
    }

    fn end_tag(&mut self, name: &str, source: SourceRange) {
        self.builder.ignore_lf = false;
        self.process_end_tag(name, source);
    }

    fn doctype(&mut self, doctype: Doctype, source: SourceRange) {
        self.builder.ignore_lf = false;
        self.process_doctype(&doctype, source);
    }

    fn comment(&mut self, text: &str, source: SourceRange) {
        self.builder.ignore_lf = false;
        self.process_comment(text, source);
    }
}

impl<S: TreeHandler + std::fmt::Debug> std::fmt::Debug for Dispatcher<S>
where
    S::Handle: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("mode", &self.mode)
            .field("original_mode", &self.original_mode)
            .field("template_modes", &self.template_modes)
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}
