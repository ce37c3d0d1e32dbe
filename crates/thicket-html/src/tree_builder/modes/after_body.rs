use super::{InBody, InsertionModeRules};
use crate::tokenizer::{Doctype, SourceRange};
use crate::tree_builder::dispatcher::{Dispatcher, InsertionMode};
use crate::tree_builder::handler::TreeHandler;
use crate::tree_builder::token::{TagToken, split_leading_space};

/// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
pub struct AfterBody;

impl AfterBody {
    /// "Anything else": "Parse error. Switch the insertion mode to "in body"
    /// and reprocess the token."
    fn anything_else<S: TreeHandler>(d: &mut Dispatcher<S>, what: &str, pos: usize) {
        d.builder.error(&format!("{what} after body"), pos);
        d.set_mode(InsertionMode::InBody);
    }
}

impl InsertionModeRules for AfterBody {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        // "A character token that is one of U+0009 CHARACTER TABULATION, ...":
        // "Process the token using the rules for the "in body" insertion
        // mode."
        let ((space, space_source), (rest, rest_source)) = split_leading_space(text, source);
        if !space.is_empty() {
            InBody::characters(d, space, space_source);
        }
        if rest.is_empty() {
            return;
        }
        Self::anything_else(d, "text", rest_source.start);
        d.process_characters(rest, rest_source);
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        if tag.name == "html" {
            InBody::start_tag(d, tag);
            return;
        }
        Self::anything_else(d, &format!("<{}>", tag.name), tag.source.start);
        d.process_start_tag(tag);
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        // "An end tag whose tag name is "html"": "If the parser was created
        // as part of the HTML fragment parsing algorithm, this is a parse
        // error; ignore the token. (fragment case) Otherwise, switch the
        // insertion mode to "after after body"."
        if name == "html" {
            if d.builder.fragment_context.is_some() {
                d.builder.error("end tag </html> in fragment", source.start);
            } else {
                d.set_mode(InsertionMode::AfterAfterBody);
            }
            return;
        }
        Self::anything_else(d, &format!("end tag </{name}>"), source.start);
        d.process_end_tag(name, source);
    }

    /// "A comment token": "Insert a comment as the last child of the first
    /// element in the stack of open elements (the html element)."
    fn comment<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        d.builder.insert_comment_in_html(text, source);
    }

    /// "An end-of-file token": "Stop parsing."
    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        d.builder.stop_parsing(pos);
    }
}

/// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
pub struct AfterAfterBody;

impl AfterAfterBody {
    fn anything_else<S: TreeHandler>(d: &mut Dispatcher<S>, what: &str, pos: usize) {
        d.builder.error(&format!("{what} after end of document"), pos);
        d.set_mode(InsertionMode::InBody);
    }
}

impl InsertionModeRules for AfterAfterBody {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        let ((space, space_source), (rest, rest_source)) = split_leading_space(text, source);
        if !space.is_empty() {
            InBody::characters(d, space, space_source);
        }
        if rest.is_empty() {
            return;
        }
        Self::anything_else(d, "text", rest_source.start);
        d.process_characters(rest, rest_source);
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        if tag.name == "html" {
            InBody::start_tag(d, tag);
            return;
        }
        Self::anything_else(d, &format!("<{}>", tag.name), tag.source.start);
        d.process_start_tag(tag);
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        Self::anything_else(d, &format!("end tag </{name}>"), source.start);
        d.process_end_tag(name, source);
    }

    /// "A comment token": "Insert a comment as the last child of the
    /// Document object."
    fn comment<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        d.builder.insert_comment_in_document(text, source);
    }

    /// "A DOCTYPE token": "Process the token using the rules for the "in
    /// body" insertion mode."
    fn doctype<S: TreeHandler>(d: &mut Dispatcher<S>, doctype: &Doctype, source: SourceRange) {
        InBody::doctype(d, doctype, source);
    }

    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        d.builder.stop_parsing(pos);
    }
}
