use super::{InBody, InHead, InsertionModeRules};
use crate::tokenizer::{Doctype, SourceRange};
use crate::tree_builder::dispatcher::{Dispatcher, InsertionMode};
use crate::tree_builder::handler::TreeHandler;
use crate::tree_builder::token::TagToken;

/// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
pub struct InTemplate;

impl InTemplate {
    /// "Pop the current template insertion mode off the stack of template
    /// insertion modes. Push `mode` onto the stack of template insertion
    /// modes so that it is the new current template insertion mode. Switch
    /// the insertion mode to `mode`, and reprocess the token."
    fn retarget<S: TreeHandler>(d: &mut Dispatcher<S>, mode: InsertionMode, tag: TagToken) {
        let _ = d.template_modes.pop();
        d.template_modes.push(mode);
        d.set_mode(mode);
        d.process_start_tag(tag);
    }
}

impl InsertionModeRules for InTemplate {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        InBody::characters(d, text, source);
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        match tag.name.as_str() {
            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
            | "style" | "template" | "title" => InHead::start_tag(d, tag),
            "caption" | "colgroup" | "tbody" | "tfoot" | "thead" => {
                Self::retarget(d, InsertionMode::InTable, tag);
            }
            "col" => Self::retarget(d, InsertionMode::InColumnGroup, tag),
            "tr" => Self::retarget(d, InsertionMode::InTableBody, tag),
            "td" | "th" => Self::retarget(d, InsertionMode::InRow, tag),
            _ => Self::retarget(d, InsertionMode::InBody, tag),
        }
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        if name == "template" {
            InHead::end_tag(d, name, source);
            return;
        }
        // "Any other end tag": "Parse error. Ignore the token."
        d.builder
            .error(&format!("unexpected end tag </{name}> in template"), source.start);
    }

    fn comment<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        InBody::comment(d, text, source);
    }

    fn doctype<S: TreeHandler>(d: &mut Dispatcher<S>, doctype: &Doctype, source: SourceRange) {
        InBody::doctype(d, doctype, source);
    }

    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        // "If there is no template element on the stack of open elements,
        // then stop parsing. (fragment case)"
        if !d.builder.open.contains_html("template") {
            d.builder.stop_parsing(pos);
            return;
        }
        // "Otherwise, this is a parse error."
        d.builder.error("end of file inside template", pos);
        let source = SourceRange::empty_at(pos);
        // "Pop elements from the stack of open elements until a template
        // element has been popped from the stack."
        d.builder.pop_until("template", source);
        // "Clear the list of active formatting elements up to the last
        // marker."
        d.builder.formatting.clear_to_last_marker();
        // "Pop the current template insertion mode off the stack of template
        // insertion modes."
        let _ = d.template_modes.pop();
        // "Reset the insertion mode appropriately."
        d.reset_insertion_mode();
        // "Reprocess the token."
        d.process_end_of_file(pos);
    }
}
