use thicket_common::warning::warn_once;

use super::{InBody, InsertionModeRules};
use crate::tokenizer::{SourceRange, TokenizerState};
use crate::tree_builder::dispatcher::{Dispatcher, InsertionMode};
use crate::tree_builder::handler::TreeHandler;
use crate::tree_builder::token::{TagToken, split_leading_space};

/// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
pub struct InHead;

/// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
///
/// "The generic raw text element parsing algorithm and the generic RCDATA
/// element parsing algorithm consist of the following steps."
pub(super) fn parse_text_element<S: TreeHandler>(
    d: &mut Dispatcher<S>,
    tag: &TagToken,
    state: TokenizerState,
) {
    // STEP 1: "Insert an HTML element for the token."
    let _ = d.builder.insert_html_element(tag);
    // STEP 2: "If the algorithm that was invoked is the generic raw text
    // element parsing algorithm, switch the tokenizer to the RAWTEXT state;
    // otherwise the algorithm invoked was the generic RCDATA element parsing
    // algorithm, switch the tokenizer to the RCDATA state."
    d.builder.switch_tokenizer(state, &tag.name);
    // STEP 3: "Set the original insertion mode to the current insertion mode."
    // STEP 4: "Then, switch the insertion mode to "text"."
    d.enter_text_mode();
}

impl InHead {
    /// "Anything else": "Pop the current node (which will be the head
    /// element) off the stack of open elements. Switch the insertion mode to
    /// "after head". Reprocess the token."
    fn anything_else<S: TreeHandler>(d: &mut Dispatcher<S>, source: SourceRange) {
        let _ = d.builder.pop(SourceRange::empty_at(source.start));
        d.set_mode(InsertionMode::AfterHead);
    }

    /// "A start tag whose tag name is "script""
    fn script<S: TreeHandler>(d: &mut Dispatcher<S>, tag: &TagToken) {
        warn_once("HTML Parser", "scripts are kept as text and never executed");
        // STEP 1-5: "Let the adjusted insertion location be the appropriate
        // place for inserting a node. Create an element for the token in the
        // HTML namespace, with the intended parent being the element in which
        // the adjusted insertion location finds itself. ... Insert the newly
        // created element at the adjusted insertion location."
        // STEP 6: "Push the element onto the stack of open elements so that it
        // is the new current node."
        let _ = d.builder.insert_html_element(tag);
        // STEP 7: "Switch the tokenizer to the script data state."
        d.builder.switch_tokenizer(TokenizerState::ScriptData, "script");
        // STEP 8-9: "Set the original insertion mode to the current insertion
        // mode. Switch the insertion mode to "text"."
        d.enter_text_mode();
    }

    /// "A start tag whose tag name is "template""
    fn template<S: TreeHandler>(d: &mut Dispatcher<S>, tag: &TagToken) {
        let _ = d.builder.insert_html_element(tag);
        // "Insert a marker at the end of the list of active formatting
        // elements."
        d.builder.formatting.push_marker();
        // "Set the frameset-ok flag to "not ok"."
        d.builder.frameset_ok = false;
        // "Switch the insertion mode to "in template"."
        // "Push "in template" onto the stack of template insertion modes so
        // that it is the new current template insertion mode."
        d.set_mode(InsertionMode::InTemplate);
        d.template_modes.push(InsertionMode::InTemplate);
    }

    /// "An end tag whose tag name is "template""
    pub(super) fn end_template<S: TreeHandler>(d: &mut Dispatcher<S>, source: SourceRange) {
        // "If there is no template element on the stack of open elements,
        // then this is a parse error; ignore the token."
        if !d.builder.open.contains_html("template") {
            d.builder.error("unexpected </template>", source.start);
            return;
        }
        // STEP 1: "Generate all implied end tags thoroughly."
        d.builder.generate_all_implied_end_tags(source);
        // STEP 2: "If the current node is not a template element, then this
        // is a parse error."
        if !d.builder.current_is("template") {
            d.builder.error("unclosed elements inside template", source.start);
        }
        // STEP 3: "Pop elements from the stack of open elements until a
        // template element has been popped from the stack."
        d.builder.pop_until("template", source);
        // STEP 4: "Clear the list of active formatting elements up to the last
        // marker."
        d.builder.formatting.clear_to_last_marker();
        // STEP 5: "Pop the current template insertion mode off the stack of
        // template insertion modes."
        let _ = d.template_modes.pop();
        // STEP 6: "Reset the insertion mode appropriately."
        d.reset_insertion_mode();
    }
}

impl InsertionModeRules for InHead {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        // "A character token that is one of U+0009 CHARACTER TABULATION,
        // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
        // RETURN (CR), or U+0020 SPACE": "Insert the character."
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
            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link"": "Insert an HTML element for the token.
            // Immediately pop the current node off the stack of open
            // elements. Acknowledge the token's self-closing flag, if it is
            // set."
            // "A start tag whose tag name is "meta"": same, the encoding
            // steps do not apply to string input.
            "base" | "basefont" | "bgsound" | "link" | "meta" => {
                let _ = d.builder.insert_void_element(&tag);
            }
            // "A start tag whose tag name is "title"": "Follow the generic
            // RCDATA element parsing algorithm."
            "title" => parse_text_element(d, &tag, TokenizerState::RcData),
            // "A start tag whose tag name is "noscript", if the scripting flag
            // is enabled"
            // "A start tag whose tag name is one of: "noframes", "style"":
            // "Follow the generic raw text element parsing algorithm."
            "noscript" if d.builder.options.scripting_enabled => {
                parse_text_element(d, &tag, TokenizerState::RawText);
            }
            "noframes" | "style" => parse_text_element(d, &tag, TokenizerState::RawText),
            // "A start tag whose tag name is "noscript", if the scripting flag
            // is disabled": "Insert an HTML element for the token. Switch the
            // insertion mode to "in head noscript"."
            "noscript" => {
                let _ = d.builder.insert_html_element(&tag);
                d.set_mode(InsertionMode::InHeadNoscript);
            }
            "script" => Self::script(d, &tag),
            "template" => Self::template(d, &tag),
            // "A start tag whose tag name is "head"": "Parse error. Ignore the
            // token."
            "head" => d.builder.error("unexpected <head> in head", tag.source.start),
            _ => {
                Self::anything_else(d, tag.source);
                d.process_start_tag(tag);
            }
        }
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        match name {
            // "An end tag whose tag name is "head"": "Pop the current node
            // (which will be the head element) off the stack of open
            // elements. Switch the insertion mode to "after head"."
            "head" => {
                let _ = d.builder.pop(source);
                d.set_mode(InsertionMode::AfterHead);
            }
            // "An end tag whose tag name is one of: "body", "html", "br"":
            // "Act as described in the "anything else" entry below."
            "body" | "html" | "br" => {
                Self::anything_else(d, source);
                d.process_end_tag(name, source);
            }
            "template" => Self::end_template(d, source),
            // "Any other end tag": "Parse error. Ignore the token."
            _ => d
                .builder
                .error(&format!("unexpected end tag </{name}> in head"), source.start),
        }
    }

    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        Self::anything_else(d, SourceRange::empty_at(pos));
        d.process_end_of_file(pos);
    }
}

/// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
pub struct InHeadNoscript;

impl InHeadNoscript {
    /// "Anything else": "Parse error. Pop the current node (which will be a
    /// noscript element) from the stack of open elements; the new current
    /// node will be a head element. Switch the insertion mode to "in head".
    /// Reprocess the token."
    fn anything_else<S: TreeHandler>(d: &mut Dispatcher<S>, source: SourceRange) {
        d.builder.error("unexpected content in noscript", source.start);
        let _ = d.builder.pop(SourceRange::empty_at(source.start));
        d.set_mode(InsertionMode::InHead);
    }
}

impl InsertionModeRules for InHeadNoscript {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        // "A character token that is one of U+0009 CHARACTER TABULATION, ...":
        // "Process the token using the rules for the "in head" insertion
        // mode."
        let ((space, space_source), (rest, rest_source)) = split_leading_space(text, source);
        if !space.is_empty() {
            InHead::characters(d, space, space_source);
        }
        if rest.is_empty() {
            return;
        }
        Self::anything_else(d, rest_source);
        d.process_characters(rest, rest_source);
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        match tag.name.as_str() {
            "html" => InBody::start_tag(d, tag),
            "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style" => {
                InHead::start_tag(d, tag);
            }
            "head" | "noscript" => d.builder.error(
                &format!("unexpected <{}> in noscript", tag.name),
                tag.source.start,
            ),
            _ => {
                Self::anything_else(d, tag.source);
                d.process_start_tag(tag);
            }
        }
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        match name {
            // "An end tag whose tag name is "noscript"": "Pop the current
            // node (which will be a noscript element) from the stack of open
            // elements; the new current node will be a head element. Switch
            // the insertion mode to "in head"."
            "noscript" => {
                let _ = d.builder.pop(source);
                d.set_mode(InsertionMode::InHead);
            }
            "br" => {
                Self::anything_else(d, source);
                d.process_end_tag(name, source);
            }
            _ => d
                .builder
                .error(&format!("unexpected end tag </{name}> in noscript"), source.start),
        }
    }

    /// "A comment token": "Process the token using the rules for the "in
    /// head" insertion mode."
    fn comment<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        InHead::comment(d, text, source);
    }

    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        Self::anything_else(d, SourceRange::empty_at(pos));
        d.process_end_of_file(pos);
    }
}
