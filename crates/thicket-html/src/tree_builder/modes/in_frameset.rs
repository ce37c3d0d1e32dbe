use super::{InBody, InHead, InsertionModeRules};
use crate::tokenizer::{Doctype, SourceRange};
use crate::tree_builder::dispatcher::{Dispatcher, InsertionMode};
use crate::tree_builder::handler::TreeHandler;
use crate::tree_builder::token::{TagToken, is_space};

/// Insert the whitespace of a character token and report the rest.
///
/// The frameset modes keep only whitespace characters: "Parse error.
/// Ignore the token." applies to every other character.
fn insert_space_only<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
    let space: String = text.chars().filter(|&c| is_space(c)).collect();
    if space.len() != text.len() {
        d.builder
            .error(&format!("unexpected text in {}", d.mode), source.start);
    }
    d.builder.insert_characters(&space, source);
}

/// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
pub struct InFrameset;

impl InsertionModeRules for InFrameset {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        insert_space_only(d, text, source);
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        match tag.name.as_str() {
            "html" => InBody::start_tag(d, tag),
            "frameset" => {
                let _ = d.builder.insert_html_element(&tag);
            }
            // "A start tag whose tag name is "frame"": "Insert an HTML element
            // for the token. Immediately pop the current node off the stack of
            // open elements. Acknowledge the token's self-closing flag, if it
            // is set."
            "frame" => {
                let _ = d.builder.insert_void_element(&tag);
            }
            "noframes" => InHead::start_tag(d, tag),
            _ => d
                .builder
                .error(&format!("unexpected <{}> in frameset", tag.name), tag.source.start),
        }
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        // "An end tag whose tag name is "frameset"": "If the current node is
        // the root html element, then this is a parse error; ignore the
        // token. (fragment case) Otherwise, pop the current node from the
        // stack of open elements. If the parser was not created as part of
        // the HTML fragment parsing algorithm (fragment case), and the current
        // node is no longer a frameset element, then switch the insertion
        // mode to "after frameset"."
        if name != "frameset" {
            d.builder
                .error(&format!("unexpected end tag </{name}> in frameset"), source.start);
            return;
        }
        if d.builder.open.len() <= 1 {
            d.builder.error("end tag </frameset> at root", source.start);
            return;
        }
        let _ = d.builder.pop(source);
        if d.builder.fragment_context.is_none() && !d.builder.current_is("frameset") {
            d.set_mode(InsertionMode::AfterFrameset);
        }
    }

    /// "An end-of-file token": "If the current node is not the root html
    /// element, then this is a parse error. Stop parsing."
    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        if d.builder.open.len() > 1 {
            d.builder.error("end of file inside frameset", pos);
        }
        d.builder.stop_parsing(pos);
    }
}

/// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
pub struct AfterFrameset;

impl InsertionModeRules for AfterFrameset {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        insert_space_only(d, text, source);
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        match tag.name.as_str() {
            "html" => InBody::start_tag(d, tag),
            "noframes" => InHead::start_tag(d, tag),
            _ => d.builder.error(
                &format!("unexpected <{}> after frameset", tag.name),
                tag.source.start,
            ),
        }
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        // "An end tag whose tag name is "html"": "Switch the insertion mode to
        // "after after frameset"."
        if name == "html" {
            d.set_mode(InsertionMode::AfterAfterFrameset);
            return;
        }
        d.builder
            .error(&format!("unexpected end tag </{name}> after frameset"), source.start);
    }

    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        d.builder.stop_parsing(pos);
    }
}

/// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
pub struct AfterAfterFrameset;

impl InsertionModeRules for AfterAfterFrameset {
    /// Whitespace is processed "using the rules for the "in body" insertion
    /// mode"; anything else is a parse error and ignored.
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        let space: String = text.chars().filter(|&c| is_space(c)).collect();
        if space.len() != text.len() {
            d.builder.error("text after end of document", source.start);
        }
        if !space.is_empty() {
            InBody::characters(d, &space, source);
        }
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        match tag.name.as_str() {
            "html" => InBody::start_tag(d, tag),
            "noframes" => InHead::start_tag(d, tag),
            _ => d.builder.error(
                &format!("unexpected <{}> after end of document", tag.name),
                tag.source.start,
            ),
        }
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        d.builder
            .error(&format!("unexpected end tag </{name}> after end of document"), source.start);
    }

    fn comment<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        d.builder.insert_comment_in_document(text, source);
    }

    fn doctype<S: TreeHandler>(d: &mut Dispatcher<S>, doctype: &Doctype, source: SourceRange) {
        InBody::doctype(d, doctype, source);
    }

    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        d.builder.stop_parsing(pos);
    }
}
