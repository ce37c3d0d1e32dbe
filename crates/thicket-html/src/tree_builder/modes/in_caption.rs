use super::{InBody, InsertionModeRules};
use crate::tokenizer::SourceRange;
use crate::tree_builder::dispatcher::{Dispatcher, InsertionMode};
use crate::tree_builder::handler::TreeHandler;
use crate::tree_builder::stack::Scope;
use crate::tree_builder::token::TagToken;

/// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
pub struct InCaption;

impl InCaption {
    /// "An end tag whose tag name is "caption"". Returns false if the token
    /// was ignored.
    fn close_caption<S: TreeHandler>(d: &mut Dispatcher<S>, source: SourceRange) -> bool {
        // "If the stack of open elements does not have a caption element in
        // table scope, this is a parse error; ignore the token. (fragment
        // case)"
        if !d.builder.open.has_in_scope("caption", Scope::Table) {
            d.builder.error("end tag </caption> without open caption", source.start);
            return false;
        }
        // STEP 1: "Generate implied end tags."
        d.builder.generate_implied_end_tags(None, source);
        // STEP 2: "Now, if the current node is not a caption element, then
        // this is a parse error."
        if !d.builder.current_is("caption") {
            d.builder.error("unclosed elements inside caption", source.start);
        }
        // STEP 3: "Pop elements from this stack until a caption element has
        // been popped from the stack."
        d.builder.pop_until("caption", source);
        // STEP 4: "Clear the list of active formatting elements up to the last
        // marker."
        d.builder.formatting.clear_to_last_marker();
        // STEP 5: "Switch the insertion mode to "in table"."
        d.set_mode(InsertionMode::InTable);
        true
    }
}

impl InsertionModeRules for InCaption {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        InBody::characters(d, text, source);
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        // "A start tag whose tag name is one of: "caption", "col", "colgroup",
        // "tbody", "td", "tfoot", "th", "thead", "tr"": as the end tag, then
        // "Reprocess the token."
        if tag.is_one_of(&[
            "caption", "col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr",
        ]) {
            if Self::close_caption(d, SourceRange::empty_at(tag.source.start)) {
                d.process_start_tag(tag);
            }
            return;
        }
        InBody::start_tag(d, tag);
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        match name {
            "caption" => {
                let _ = Self::close_caption(d, source);
            }
            "table" => {
                if Self::close_caption(d, SourceRange::empty_at(source.start)) {
                    d.process_end_tag(name, source);
                }
            }
            // "An end tag whose tag name is one of: "body", "col", "colgroup",
            // "html", "tbody", "td", "tfoot", "th", "thead", "tr"": "Parse
            // error. Ignore the token."
            "body" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th" | "thead"
            | "tr" => d
                .builder
                .error(&format!("unexpected end tag </{name}> in caption"), source.start),
            _ => InBody::end_tag(d, name, source),
        }
    }

    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        InBody::end_of_file(d, pos);
    }
}
