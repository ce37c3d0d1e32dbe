use super::InsertionModeRules;
use crate::tokenizer::{Doctype, SourceRange};
use crate::tree_builder::dispatcher::{Dispatcher, InsertionMode};
use crate::tree_builder::handler::TreeHandler;
use crate::tree_builder::quirks::{QuirksMode, is_conforming_doctype, quirks_mode_for};
use crate::tree_builder::token::{TagToken, split_leading_space};

/// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
pub struct Initial;

impl Initial {
    /// "Anything else": "If the document is not an iframe srcdoc document,
    /// then this is a parse error; if the parser cannot change the mode flag
    /// is false, set the Document to quirks mode. In any case, switch the
    /// insertion mode to "before html", then reprocess the token."
    fn anything_else<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        d.builder.error("missing DOCTYPE", pos);
        d.builder.quirks = QuirksMode::Quirks;
        d.set_mode(InsertionMode::BeforeHtml);
    }
}

impl InsertionModeRules for Initial {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        // "A character token that is one of U+0009 CHARACTER TABULATION,
        // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
        // RETURN (CR), or U+0020 SPACE": "Ignore the token."
        let (_, (rest, rest_source)) = split_leading_space(text, source);
        if rest.is_empty() {
            return;
        }
        Self::anything_else(d, rest_source.start);
        d.process_characters(rest, rest_source);
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        Self::anything_else(d, tag.source.start);
        d.process_start_tag(tag);
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        Self::anything_else(d, source.start);
        d.process_end_tag(name, source);
    }

    /// "A comment token": "Insert a comment as the last child of the
    /// Document object."
    fn comment<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        d.builder.insert_comment_in_document(text, source);
    }

    /// "A DOCTYPE token"
    fn doctype<S: TreeHandler>(d: &mut Dispatcher<S>, doctype: &Doctype, source: SourceRange) {
        // "If the DOCTYPE token's name is not "html", or the token's public
        // identifier is not missing, or the token's system identifier is
        // neither missing nor "about:legacy-compat", then there is a parse
        // error."
        if !is_conforming_doctype(doctype) {
            d.builder.error("non-conforming DOCTYPE", source.start);
        }

        // "Append a DocumentType node to the Document node"
        // "Then, if the document is not an iframe srcdoc document, and the
        // parser cannot change the mode flag is false, and the DOCTYPE token
        // matches one of the conditions in the following list, then set the
        // Document to quirks mode"
        let quirks = quirks_mode_for(doctype);
        d.builder.quirks = quirks;
        d.builder.sink.doctype(doctype, quirks, source);

        // "Then, switch the insertion mode to "before html"."
        d.set_mode(InsertionMode::BeforeHtml);
    }

    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        Self::anything_else(d, pos);
        d.process_end_of_file(pos);
    }
}
