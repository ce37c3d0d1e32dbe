use super::{InBody, InHead, InsertionModeRules};
use crate::tokenizer::SourceRange;
use crate::tree_builder::dispatcher::Dispatcher;
use crate::tree_builder::handler::TreeHandler;
use crate::tree_builder::stack::Scope;
use crate::tree_builder::token::{TagToken, null_positions, strip_nulls};

/// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
pub struct InSelect;

impl InSelect {
    /// Pop until a `select` has been popped and reset the insertion mode.
    /// Returns false (after reporting) when no `select` is in select scope.
    fn close_select<S: TreeHandler>(d: &mut Dispatcher<S>, source: SourceRange) -> bool {
        if !d.builder.open.has_in_scope("select", Scope::Select) {
            d.builder.error("no open select", source.start);
            return false;
        }
        d.builder.pop_until("select", source);
        d.reset_insertion_mode();
        true
    }

    fn pop_option<S: TreeHandler>(d: &mut Dispatcher<S>, source: SourceRange) {
        if d.builder.current_is("option") {
            let _ = d.builder.pop(SourceRange::empty_at(source.start));
        }
    }
}

impl InsertionModeRules for InSelect {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        // "A character token that is U+0000 NULL": "Parse error. Ignore the
        // token."
        for at in null_positions(text, source) {
            d.builder.error("unexpected null character", at);
        }
        // "Any other character token": "Insert the token's character."
        d.builder.insert_characters(&strip_nulls(text), source);
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        match tag.name.as_str() {
            "html" => InBody::start_tag(d, tag),
            // "A start tag whose tag name is "option"": "If the current node
            // is an option element, pop that node from the stack of open
            // elements. Insert an HTML element for the token."
            "option" => {
                Self::pop_option(d, tag.source);
                let _ = d.builder.insert_html_element(&tag);
            }
            // "A start tag whose tag name is "optgroup"" and "A start tag
            // whose tag name is "hr"": "If the current node is an option
            // element, pop that node from the stack of open elements. If the
            // current node is an optgroup element, pop that node from the
            // stack of open elements. Insert an HTML element for the token."
            "optgroup" | "hr" => {
                Self::pop_option(d, tag.source);
                if d.builder.current_is("optgroup") {
                    let _ = d.builder.pop(SourceRange::empty_at(tag.source.start));
                }
                if tag.name == "hr" {
                    let _ = d.builder.insert_void_element(&tag);
                } else {
                    let _ = d.builder.insert_html_element(&tag);
                }
            }
            // "A start tag whose tag name is "select"": "Parse error. If the
            // stack of open elements does not have a select element in select
            // scope, ignore the token. (fragment case) Otherwise: Pop elements
            // from the stack of open elements until a select element has been
            // popped from the stack. Reset the insertion mode appropriately."
            "select" => {
                d.builder.error("nested <select>", tag.source.start);
                let _ = Self::close_select(d, tag.source);
            }
            // "A start tag whose tag name is one of: "input", "keygen",
            // "textarea"": "Parse error. ... Reprocess the token."
            "input" | "keygen" | "textarea" => {
                d.builder
                    .error(&format!("<{}> inside select", tag.name), tag.source.start);
                if Self::close_select(d, SourceRange::empty_at(tag.source.start)) {
                    d.process_start_tag(tag);
                }
            }
            "script" | "template" => InHead::start_tag(d, tag),
            _ => d
                .builder
                .error(&format!("unexpected <{}> in select", tag.name), tag.source.start),
        }
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        match name {
            // "An end tag whose tag name is "optgroup"": "First, if the
            // current node is an option element, and the node immediately
            // before it in the stack of open elements is an optgroup element,
            // then pop the current node from the stack of open elements. If
            // the current node is an optgroup element, then pop that node from
            // the stack of open elements. Otherwise, this is a parse error;
            // ignore the token."
            "optgroup" => {
                let len = d.builder.open.len();
                let parent_is_optgroup = len >= 2
                    && d
                        .builder
                        .open
                        .get(len - 2)
                        .is_some_and(|parent| parent.is_html("optgroup"));
                if d.builder.current_is("option") && parent_is_optgroup {
                    let _ = d.builder.pop(source);
                }
                if d.builder.current_is("optgroup") {
                    let _ = d.builder.pop(source);
                } else {
                    d.builder.error("end tag </optgroup> without open optgroup", source.start);
                }
            }
            "option" => {
                if d.builder.current_is("option") {
                    let _ = d.builder.pop(source);
                } else {
                    d.builder.error("end tag </option> without open option", source.start);
                }
            }
            "select" => {
                let _ = Self::close_select(d, source);
            }
            "template" => InHead::end_tag(d, name, source),
            _ => d
                .builder
                .error(&format!("unexpected end tag </{name}> in select"), source.start),
        }
    }

    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        InBody::end_of_file(d, pos);
    }
}

/// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
pub struct InSelectInTable;

const TABLE_BREAKOUTS: &[&str] = &["caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th"];

impl InsertionModeRules for InSelectInTable {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        InSelect::characters(d, text, source);
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        // "A start tag whose tag name is one of: "caption", "table", "tbody",
        // "tfoot", "thead", "tr", "td", "th"": "Parse error. Pop elements from
        // the stack of open elements until a select element has been popped
        // from the stack. Reset the insertion mode appropriately. Reprocess
        // the token."
        if tag.is_one_of(TABLE_BREAKOUTS) {
            d.builder
                .error(&format!("<{}> inside select in table", tag.name), tag.source.start);
            d.builder
                .pop_until("select", SourceRange::empty_at(tag.source.start));
            d.reset_insertion_mode();
            d.process_start_tag(tag);
            return;
        }
        InSelect::start_tag(d, tag);
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        // "An end tag whose tag name is one of: "caption", "table", "tbody",
        // "tfoot", "thead", "tr", "td", "th"": "Parse error. If the stack of
        // open elements does not have an element in table scope that is an
        // HTML element with the same tag name as that of the token, then
        // ignore the token. Otherwise: Pop elements from the stack of open
        // elements until a select element has been popped from the stack.
        // Reset the insertion mode appropriately. Reprocess the token."
        if TABLE_BREAKOUTS.contains(&name) {
            d.builder
                .error(&format!("end tag </{name}> inside select in table"), source.start);
            if !d.builder.open.has_in_scope(name, Scope::Table) {
                return;
            }
            d.builder
                .pop_until("select", SourceRange::empty_at(source.start));
            d.reset_insertion_mode();
            d.process_end_tag(name, source);
            return;
        }
        InSelect::end_tag(d, name, source);
    }

    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        InSelect::end_of_file(d, pos);
    }
}
