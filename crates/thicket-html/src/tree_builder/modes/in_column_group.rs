use super::{InBody, InHead, InsertionModeRules};
use crate::tokenizer::SourceRange;
use crate::tree_builder::dispatcher::{Dispatcher, InsertionMode};
use crate::tree_builder::handler::TreeHandler;
use crate::tree_builder::token::{TagToken, split_leading_space};

/// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
pub struct InColumnGroup;

impl InColumnGroup {
    /// "Anything else": "If the current node is not a colgroup element, then
    /// this is a parse error; ignore the token. Otherwise, pop the current
    /// node from the stack of open elements. Switch the insertion mode to
    /// "in table". Reprocess the token."
    fn anything_else<S: TreeHandler>(d: &mut Dispatcher<S>, source: SourceRange) -> bool {
        if !d.builder.current_is("colgroup") {
            d.builder.error("unexpected content in column group", source.start);
            return false;
        }
        let _ = d.builder.pop(SourceRange::empty_at(source.start));
        d.set_mode(InsertionMode::InTable);
        true
    }
}

impl InsertionModeRules for InColumnGroup {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        let ((space, space_source), (rest, rest_source)) = split_leading_space(text, source);
        d.builder.insert_characters(space, space_source);
        if !rest.is_empty() && Self::anything_else(d, rest_source) {
            d.process_characters(rest, rest_source);
        }
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        match tag.name.as_str() {
            "html" => InBody::start_tag(d, tag),
            // "A start tag whose tag name is "col"": "Insert an HTML element
            // for the token. Immediately pop the current node off the stack of
            // open elements. Acknowledge the token's self-closing flag, if it
            // is set."
            "col" => {
                let _ = d.builder.insert_void_element(&tag);
            }
            "template" => InHead::start_tag(d, tag),
            _ => {
                if Self::anything_else(d, tag.source) {
                    d.process_start_tag(tag);
                }
            }
        }
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        match name {
            // "An end tag whose tag name is "colgroup"": "If the current node
            // is not a colgroup element, then this is a parse error; ignore
            // the token. Otherwise, pop the current node from the stack of
            // open elements. Switch the insertion mode to "in table"."
            "colgroup" => {
                let _ = Self::anything_else(d, source);
            }
            "col" => d.builder.error("unexpected end tag </col>", source.start),
            "template" => InHead::end_tag(d, name, source),
            _ => {
                if Self::anything_else(d, source) {
                    d.process_end_tag(name, source);
                }
            }
        }
    }

    /// "An end-of-file token": "Process the token using the rules for the
    /// "in body" insertion mode."
    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        InBody::end_of_file(d, pos);
    }
}
