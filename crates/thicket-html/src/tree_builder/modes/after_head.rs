use std::rc::Rc;

use super::{InBody, InHead, InsertionModeRules};
use crate::tokenizer::SourceRange;
use crate::tree_builder::dispatcher::{Dispatcher, InsertionMode};
use crate::tree_builder::handler::TreeHandler;
use crate::tree_builder::token::{TagToken, split_leading_space};

/// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
pub struct AfterHead;

impl AfterHead {
    /// "Anything else": "Insert an HTML element for a "body" start tag token
    /// with no attributes. Switch the insertion mode to "in body".
    /// Reprocess the current token."
    fn anything_else<S: TreeHandler>(d: &mut Dispatcher<S>, source: SourceRange) {
        let _ = d.builder.insert_implied("body", source);
        d.set_mode(InsertionMode::InBody);
    }
}

impl InsertionModeRules for AfterHead {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        let ((space, space_source), (rest, rest_source)) = split_leading_space(text, source);
        d.builder.insert_characters(space, space_source);
        if rest.is_empty() {
            return;
        }
        Self::anything_else(d, rest_source);
        d.process_characters(rest, rest_source);
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        match tag.name.as_str() {
            "html" => InBody::start_tag(d, tag),
            // "A start tag whose tag name is "body"": "Insert an HTML element
            // for the token. Set the frameset-ok flag to "not ok". Switch the
            // insertion mode to "in body"."
            "body" => {
                let _ = d.builder.insert_html_element(&tag);
                d.builder.frameset_ok = false;
                d.set_mode(InsertionMode::InBody);
            }
            // "A start tag whose tag name is "frameset"": "Insert an HTML
            // element for the token. Switch the insertion mode to "in
            // frameset"."
            "frameset" => {
                let _ = d.builder.insert_html_element(&tag);
                d.set_mode(InsertionMode::InFrameset);
            }
            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title"": "Parse error. Push the node pointed to by
            // the head element pointer onto the stack of open elements.
            // Process the token using the rules for the "in head" insertion
            // mode. Remove the node pointed to by the head element pointer
            // from the stack of open elements. (It might not be the current
            // node at this point.)"
            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
            | "style" | "template" | "title" => {
                d.builder.error(
                    &format!("<{}> belongs in head", tag.name),
                    tag.source.start,
                );
                let Some(head) = d.builder.head.as_ref().map(Rc::clone) else {
                    InHead::start_tag(d, tag);
                    return;
                };
                d.builder.open.push(Rc::clone(&head));
                InHead::start_tag(d, tag);
                let _ = d.builder.open.remove(&head);
            }
            "head" => d.builder.error("unexpected <head> after head", tag.source.start),
            _ => {
                Self::anything_else(d, tag.source);
                d.process_start_tag(tag);
            }
        }
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        match name {
            "template" => InHead::end_tag(d, name, source),
            "body" | "html" | "br" => {
                Self::anything_else(d, source);
                d.process_end_tag(name, source);
            }
            _ => d
                .builder
                .error(&format!("unexpected end tag </{name}> after head"), source.start),
        }
    }

    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        Self::anything_else(d, SourceRange::empty_at(pos));
        d.process_end_of_file(pos);
    }
}
