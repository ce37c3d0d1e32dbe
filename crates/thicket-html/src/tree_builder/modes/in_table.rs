use super::{InBody, InHead, InsertionModeRules};
use crate::tokenizer::{Doctype, SourceRange};
use crate::tree_builder::dispatcher::{Dispatcher, InsertionMode};
use crate::tree_builder::handler::TreeHandler;
use crate::tree_builder::stack::Scope;
use crate::tree_builder::token::{TagToken, is_all_space, null_positions, strip_nulls};

/// Table sections that take a `<tr>` directly.
pub(super) const TABLE_SECTIONS: &[&str] = &["tbody", "tfoot", "thead"];

/// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
pub struct InTable;

impl InTable {
    /// "Anything else": "Parse error. Enable foster parenting, process the
    /// token using the rules for the "in body" insertion mode, and then
    /// disable foster parenting."
    fn foster_start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        d.builder
            .error(&format!("<{}> foster-parented out of table", tag.name), tag.source.start);
        d.builder.foster_parenting = true;
        InBody::start_tag(d, tag);
        d.builder.foster_parenting = false;
    }

    fn foster_end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        d.builder
            .error(&format!("end tag </{name}> in table"), source.start);
        d.builder.foster_parenting = true;
        InBody::end_tag(d, name, source);
        d.builder.foster_parenting = false;
    }

    pub(super) fn foster_characters<S: TreeHandler>(
        d: &mut Dispatcher<S>,
        text: &str,
        source: SourceRange,
    ) {
        d.builder.foster_parenting = true;
        InBody::characters(d, text, source);
        d.builder.foster_parenting = false;
    }

    /// "Clear the stack back to a table context"
    fn clear_to_table_context<S: TreeHandler>(d: &mut Dispatcher<S>, source: SourceRange) {
        d.builder
            .clear_stack_back_to(&["table"], SourceRange::empty_at(source.start));
    }

    /// "An end tag whose tag name is "table"". Returns false if the token
    /// was ignored.
    pub(super) fn close_table<S: TreeHandler>(d: &mut Dispatcher<S>, source: SourceRange) -> bool {
        // "If the stack of open elements does not have a table element in
        // table scope, this is a parse error; ignore the token."
        if !d.builder.open.has_in_scope("table", Scope::Table) {
            d.builder.error("end tag </table> without open table", source.start);
            return false;
        }
        // "Pop elements from this stack until a table element has been popped
        // from the stack."
        d.builder.pop_until("table", source);
        // "Reset the insertion mode appropriately."
        d.reset_insertion_mode();
        true
    }
}

impl InsertionModeRules for InTable {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        // "A character token, if the current node is table, tbody, template,
        // tfoot, thead, or tr element": "Let the pending table character
        // tokens be an empty list of tokens. Let the original insertion mode
        // be the current insertion mode. Switch the insertion mode to "in
        // table text" and reprocess the token."
        if d
            .builder
            .current_is_one_of(&["table", "tbody", "template", "tfoot", "thead", "tr"])
        {
            d.pending_table_text.clear();
            d.original_mode = d.mode;
            d.set_mode(InsertionMode::InTableText);
            d.process_characters(text, source);
            return;
        }
        d.builder.error("text foster-parented out of table", source.start);
        Self::foster_characters(d, text, source);
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        match tag.name.as_str() {
            // "A start tag whose tag name is "caption"": "Clear the stack
            // back to a table context. Insert a marker at the end of the list
            // of active formatting elements. Insert an HTML element for the
            // token, then switch the insertion mode to "in caption"."
            "caption" => {
                Self::clear_to_table_context(d, tag.source);
                d.builder.formatting.push_marker();
                let _ = d.builder.insert_html_element(&tag);
                d.set_mode(InsertionMode::InCaption);
            }
            "colgroup" => {
                Self::clear_to_table_context(d, tag.source);
                let _ = d.builder.insert_html_element(&tag);
                d.set_mode(InsertionMode::InColumnGroup);
            }
            // "A start tag whose tag name is "col"": "Clear the stack back to
            // a table context. Insert an HTML element for a "colgroup" start
            // tag token with no attributes, then switch the insertion mode to
            // "in column group". Reprocess the current token."
            "col" => {
                Self::clear_to_table_context(d, tag.source);
                let _ = d.builder.insert_implied("colgroup", tag.source);
                d.set_mode(InsertionMode::InColumnGroup);
                d.process_start_tag(tag);
            }
            name if TABLE_SECTIONS.contains(&name) => {
                Self::clear_to_table_context(d, tag.source);
                let _ = d.builder.insert_html_element(&tag);
                d.set_mode(InsertionMode::InTableBody);
            }
            "td" | "th" | "tr" => {
                Self::clear_to_table_context(d, tag.source);
                let _ = d.builder.insert_implied("tbody", tag.source);
                d.set_mode(InsertionMode::InTableBody);
                d.process_start_tag(tag);
            }
            // "A start tag whose tag name is "table"": "Parse error. If the
            // stack of open elements does not have a table element in table
            // scope, ignore the token. Otherwise: Pop elements from this
            // stack until a table element has been popped from the stack.
            // Reset the insertion mode appropriately. Reprocess the token."
            "table" => {
                d.builder.error("nested <table>", tag.source.start);
                if Self::close_table(d, SourceRange::empty_at(tag.source.start)) {
                    d.process_start_tag(tag);
                }
            }
            "style" | "script" | "template" => InHead::start_tag(d, tag),
            // "A start tag whose tag name is "input"": "If the token does not
            // have an attribute with the name "type", or if it does, but that
            // attribute's value is not an ASCII case-insensitive match for the
            // string "hidden", then: act as described in the "anything else"
            // entry below. Otherwise: Parse error. Insert an HTML element for
            // the token. Pop that input element off the stack of open
            // elements. Acknowledge the token's self-closing flag, if it is
            // set."
            "input"
                if tag
                    .attributes
                    .get("type")
                    .is_some_and(|kind| kind.eq_ignore_ascii_case("hidden")) =>
            {
                d.builder.error("hidden <input> in table", tag.source.start);
                let _ = d.builder.insert_void_element(&tag);
            }
            // "A start tag whose tag name is "form"": "Parse error. If there
            // is a template element on the stack of open elements, or if the
            // form element pointer is not null, ignore the token. Otherwise:
            // Insert an HTML element for the token, and set the form element
            // pointer to point to the element created. Pop that form element
            // off the stack of open elements."
            "form" => {
                d.builder.error("<form> in table", tag.source.start);
                if d.builder.open.contains_html("template") || d.builder.form.is_some() {
                    return;
                }
                let form = d.builder.insert_html_element(&tag);
                d.builder.form = Some(form);
                let _ = d.builder.pop(tag.source);
            }
            _ => Self::foster_start_tag(d, tag),
        }
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        match name {
            "table" => {
                let _ = Self::close_table(d, source);
            }
            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "tbody", "td", "tfoot", "th", "thead", "tr"":
            // "Parse error. Ignore the token."
            "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot"
            | "th" | "thead" | "tr" => d
                .builder
                .error(&format!("unexpected end tag </{name}> in table"), source.start),
            "template" => InHead::end_tag(d, name, source),
            _ => Self::foster_end_tag(d, name, source),
        }
    }

    /// "An end-of-file token": "Process the token using the rules for the
    /// "in body" insertion mode."
    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        InBody::end_of_file(d, pos);
    }
}

/// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
pub struct InTableText;

impl InTableText {
    /// "Anything else"
    fn flush<S: TreeHandler>(d: &mut Dispatcher<S>) {
        let pending = std::mem::take(&mut d.pending_table_text);
        // "If any of the tokens in the pending table character tokens list
        // are character tokens that are not ASCII whitespace, then this is a
        // parse error: reprocess the character tokens in the pending table
        // character tokens list using the rules given in the "anything else"
        // entry in the "in table" insertion mode."
        if pending.iter().any(|(text, _)| !is_all_space(text)) {
            if let Some((_, source)) = pending.first() {
                d.builder
                    .error("text foster-parented out of table", source.start);
            }
            for (text, source) in &pending {
                InTable::foster_characters(d, text, *source);
            }
        } else {
            // "Otherwise, insert the characters given by the pending table
            // character tokens list."
            for (text, source) in &pending {
                d.builder.insert_characters(text, *source);
            }
        }
        // "Switch the insertion mode to the original insertion mode and
        // reprocess the token."
        d.set_mode(d.original_mode);
    }
}

impl InsertionModeRules for InTableText {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        // "A character token that is U+0000 NULL": "Parse error. Ignore the
        // token."
        for at in null_positions(text, source) {
            d.builder.error("unexpected null character", at);
        }
        let text = strip_nulls(text);
        // "Any other character token": "Append the character token to the
        // pending table character tokens list."
        if !text.is_empty() {
            d.pending_table_text.push((text.into_owned(), source));
        }
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        Self::flush(d);
        d.process_start_tag(tag);
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        Self::flush(d);
        d.process_end_tag(name, source);
    }

    fn comment<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        Self::flush(d);
        d.process_comment(text, source);
    }

    fn doctype<S: TreeHandler>(d: &mut Dispatcher<S>, doctype: &Doctype, source: SourceRange) {
        Self::flush(d);
        d.process_doctype(doctype, source);
    }

    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        Self::flush(d);
        d.process_end_of_file(pos);
    }
}
