use super::in_table::TABLE_SECTIONS;
use super::{InTable, InsertionModeRules};
use crate::tokenizer::SourceRange;
use crate::tree_builder::dispatcher::{Dispatcher, InsertionMode};
use crate::tree_builder::handler::TreeHandler;
use crate::tree_builder::stack::Scope;
use crate::tree_builder::token::TagToken;

/// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
pub struct InRow;

impl InRow {
    /// "An end tag whose tag name is "tr"": "If the stack of open elements
    /// does not have a tr element in table scope, this is a parse error;
    /// ignore the token. Otherwise: Clear the stack back to a table row
    /// context. Pop the current node (which will be a tr element) from the
    /// stack of open elements. Switch the insertion mode to "in table
    /// body"."
    pub(super) fn close_row<S: TreeHandler>(d: &mut Dispatcher<S>, source: SourceRange) -> bool {
        if !d.builder.open.has_in_scope("tr", Scope::Table) {
            d.builder.error("end tag </tr> without open row", source.start);
            return false;
        }
        d.builder
            .clear_stack_back_to(&["tr"], SourceRange::empty_at(source.start));
        let _ = d.builder.pop(source);
        d.set_mode(InsertionMode::InTableBody);
        true
    }
}

impl InsertionModeRules for InRow {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        InTable::characters(d, text, source);
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        match tag.name.as_str() {
            // "A start tag whose tag name is one of: "th", "td"": "Clear the
            // stack back to a table row context. Insert an HTML element for
            // the token, then switch the insertion mode to "in cell". Insert a
            // marker at the end of the list of active formatting elements."
            "th" | "td" => {
                d.builder
                    .clear_stack_back_to(&["tr"], SourceRange::empty_at(tag.source.start));
                let _ = d.builder.insert_html_element(&tag);
                d.set_mode(InsertionMode::InCell);
                d.builder.formatting.push_marker();
            }
            "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr" => {
                if Self::close_row(d, SourceRange::empty_at(tag.source.start)) {
                    d.process_start_tag(tag);
                }
            }
            _ => InTable::start_tag(d, tag),
        }
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        match name {
            "tr" => {
                let _ = Self::close_row(d, source);
            }
            "table" => {
                if Self::close_row(d, SourceRange::empty_at(source.start)) {
                    d.process_end_tag(name, source);
                }
            }
            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead"":
            // "If the stack of open elements does not have an element in table
            // scope that is an HTML element with the same tag name as the
            // token, this is a parse error; ignore the token."
            name if TABLE_SECTIONS.contains(&name) => {
                if !d.builder.open.has_in_scope(name, Scope::Table) {
                    d.builder
                        .error(&format!("end tag </{name}> without open {name}"), source.start);
                    return;
                }
                if Self::close_row(d, SourceRange::empty_at(source.start)) {
                    d.process_end_tag(name, source);
                }
            }
            "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" => d
                .builder
                .error(&format!("unexpected end tag </{name}> in row"), source.start),
            _ => InTable::end_tag(d, name, source),
        }
    }

    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        InTable::end_of_file(d, pos);
    }
}
