use super::{InBody, InsertionModeRules};
use crate::tokenizer::SourceRange;
use crate::tree_builder::dispatcher::{Dispatcher, InsertionMode};
use crate::tree_builder::handler::TreeHandler;
use crate::tree_builder::stack::Scope;
use crate::tree_builder::token::TagToken;

/// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
pub struct InCell;

impl InCell {
    /// "Where the steps above say to close the cell, they mean to run the
    /// following algorithm"
    fn close_cell<S: TreeHandler>(d: &mut Dispatcher<S>, source: SourceRange) {
        // STEP 1: "Generate implied end tags."
        d.builder.generate_implied_end_tags(None, source);
        // STEP 2: "If the current node is not now a td element or a th
        // element, then this is a parse error."
        if !d.builder.current_is_one_of(&["td", "th"]) {
            d.builder.error("unclosed elements inside cell", source.start);
        }
        // STEP 3: "Pop elements from the stack of open elements stack until a
        // td element or a th element has been popped from the stack."
        d.builder.pop_until_one_of(&["td", "th"], source);
        // STEP 4: "Clear the list of active formatting elements up to the last
        // marker."
        d.builder.formatting.clear_to_last_marker();
        // STEP 5: "Switch the insertion mode to "in row"."
        d.set_mode(InsertionMode::InRow);
    }
}

impl InsertionModeRules for InCell {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        InBody::characters(d, text, source);
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        // "A start tag whose tag name is one of: "caption", "col", "colgroup",
        // "tbody", "td", "tfoot", "th", "thead", "tr"": "Assert: The stack of
        // open elements has a td or th element in table scope. Close the
        // cell (see below) and reprocess the token."
        if tag.is_one_of(&[
            "caption", "col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr",
        ]) {
            if !d.builder.open.has_any_in_scope(&["td", "th"], Scope::Table) {
                d.builder
                    .error(&format!("unexpected <{}> outside cell", tag.name), tag.source.start);
                return;
            }
            Self::close_cell(d, SourceRange::empty_at(tag.source.start));
            d.process_start_tag(tag);
            return;
        }
        InBody::start_tag(d, tag);
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        match name {
            // "An end tag whose tag name is one of: "td", "th"": "If the stack
            // of open elements does not have an element in table scope that is
            // an HTML element with the same tag name as that of the token,
            // then this is a parse error; ignore the token."
            "td" | "th" => {
                if !d.builder.open.has_in_scope(name, Scope::Table) {
                    d.builder
                        .error(&format!("end tag </{name}> without open cell"), source.start);
                    return;
                }
                d.builder.generate_implied_end_tags(None, source);
                if !d.builder.current_is(name) {
                    d.builder
                        .error(&format!("unclosed elements inside <{name}>"), source.start);
                }
                d.builder.pop_until(name, source);
                d.builder.formatting.clear_to_last_marker();
                d.set_mode(InsertionMode::InRow);
            }
            "body" | "caption" | "col" | "colgroup" | "html" => d
                .builder
                .error(&format!("unexpected end tag </{name}> in cell"), source.start),
            // "An end tag whose tag name is one of: "table", "tbody", "tfoot",
            // "thead", "tr"": "If the stack of open elements does not have an
            // element in table scope that is an HTML element with the same tag
            // name as that of the token, then this is a parse error; ignore
            // the token. Otherwise, close the cell (see below) and reprocess
            // the token."
            "table" | "tbody" | "tfoot" | "thead" | "tr" => {
                if !d.builder.open.has_in_scope(name, Scope::Table) {
                    d.builder
                        .error(&format!("end tag </{name}> without open {name}"), source.start);
                    return;
                }
                Self::close_cell(d, SourceRange::empty_at(source.start));
                d.process_end_tag(name, source);
            }
            _ => InBody::end_tag(d, name, source),
        }
    }

    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        InBody::end_of_file(d, pos);
    }
}
