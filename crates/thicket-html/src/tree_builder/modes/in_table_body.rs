use super::in_table::TABLE_SECTIONS;
use super::{InTable, InsertionModeRules};
use crate::tokenizer::SourceRange;
use crate::tree_builder::dispatcher::{Dispatcher, InsertionMode};
use crate::tree_builder::handler::TreeHandler;
use crate::tree_builder::stack::Scope;
use crate::tree_builder::token::TagToken;

/// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
pub struct InTableBody;

impl InTableBody {
    /// "Clear the stack back to a table body context"
    fn clear_to_body_context<S: TreeHandler>(d: &mut Dispatcher<S>, source: SourceRange) {
        d.builder
            .clear_stack_back_to(TABLE_SECTIONS, SourceRange::empty_at(source.start));
    }

    /// "If the stack of open elements does not have a tbody, thead, or tfoot
    /// element in table scope, this is a parse error; ignore the token.
    /// Otherwise: Clear the stack back to a table body context. Pop the
    /// current node from the stack of open elements. Switch the insertion
    /// mode to "in table". Reprocess the token."
    fn close_section<S: TreeHandler>(d: &mut Dispatcher<S>, source: SourceRange) -> bool {
        if !d.builder.open.has_any_in_scope(TABLE_SECTIONS, Scope::Table) {
            d.builder.error("no open table section", source.start);
            return false;
        }
        Self::clear_to_body_context(d, source);
        let _ = d.builder.pop(SourceRange::empty_at(source.start));
        d.set_mode(InsertionMode::InTable);
        true
    }
}

impl InsertionModeRules for InTableBody {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        InTable::characters(d, text, source);
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        match tag.name.as_str() {
            // "A start tag whose tag name is "tr"": "Clear the stack back to a
            // table body context. Insert an HTML element for the token, then
            // switch the insertion mode to "in row"."
            "tr" => {
                Self::clear_to_body_context(d, tag.source);
                let _ = d.builder.insert_html_element(&tag);
                d.set_mode(InsertionMode::InRow);
            }
            // "A start tag whose tag name is one of: "th", "td"": "Parse
            // error. Clear the stack back to a table body context. Insert an
            // HTML element for a "tr" start tag token with no attributes, then
            // switch the insertion mode to "in row". Reprocess the current
            // token."
            "th" | "td" => {
                d.builder
                    .error(&format!("<{}> outside a row", tag.name), tag.source.start);
                Self::clear_to_body_context(d, tag.source);
                let _ = d.builder.insert_implied("tr", tag.source);
                d.set_mode(InsertionMode::InRow);
                d.process_start_tag(tag);
            }
            "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" => {
                if Self::close_section(d, tag.source) {
                    d.process_start_tag(tag);
                }
            }
            _ => InTable::start_tag(d, tag),
        }
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        match name {
            // "An end tag whose tag name is one of: "tbody", "tfoot",
            // "thead"": "If the stack of open elements does not have an
            // element in table scope that is an HTML element with the same
            // tag name as the token, this is a parse error; ignore the token.
            // Otherwise: Clear the stack back to a table body context. Pop the
            // current node from the stack of open elements. Switch the
            // insertion mode to "in table"."
            "tbody" | "tfoot" | "thead" => {
                if !d.builder.open.has_in_scope(name, Scope::Table) {
                    d.builder
                        .error(&format!("end tag </{name}> without open {name}"), source.start);
                    return;
                }
                Self::clear_to_body_context(d, source);
                let _ = d.builder.pop(source);
                d.set_mode(InsertionMode::InTable);
            }
            "table" => {
                if Self::close_section(d, source) {
                    d.process_end_tag(name, source);
                }
            }
            "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr" => d
                .builder
                .error(&format!("unexpected end tag </{name}> in table body"), source.start),
            _ => InTable::end_tag(d, name, source),
        }
    }

    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        InTable::end_of_file(d, pos);
    }
}
