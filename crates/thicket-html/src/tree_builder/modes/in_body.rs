use std::rc::Rc;

use super::foreign::insert_foreign_element;
use super::in_head::parse_text_element;
use super::{InHead, InTemplate, InsertionModeRules};
use crate::tokenizer::{AttributeList, SourceRange, TokenizerState};
use crate::tree_builder::dispatcher::{Dispatcher, InsertionMode};
use crate::tree_builder::element::{FORMATTING, Namespace};
use crate::tree_builder::handler::TreeHandler;
use crate::tree_builder::quirks::QuirksMode;
use crate::tree_builder::stack::Scope;
use crate::tree_builder::token::{TagToken, is_all_space, null_positions, strip_nulls};

/// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
pub struct InBody;

/// Start tags that close a `p` in button scope and open a plain block.
const BLOCK_STARTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div",
    "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "main", "menu",
    "nav", "ol", "p", "search", "section", "summary", "ul",
];

/// End tags that close a block in default scope.
const BLOCK_ENDS: &[&str] = &[
    "address", "article", "aside", "blockquote", "button", "center", "details", "dialog",
    "dir", "div", "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup",
    "listing", "main", "menu", "nav", "ol", "pre", "search", "section", "summary", "ul",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Elements that may still be open when the body ends without a parse
/// error.
///
/// "If there is a node in the stack of open elements that is not either a
/// dd element, a dt element, an li element, an optgroup element, an option
/// element, a p element, an rb element, an rp element, an rt element, an
/// rtc element, a tbody element, a td element, a tfoot element, a th
/// element, a thead element, a tr element, the body element, or the html
/// element, then this is a parse error."
const CLOSABLE_AT_END: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc", "tbody", "td",
    "tfoot", "th", "thead", "tr", "body", "html",
];

impl InBody {
    /// Report a parse error when elements other than [`CLOSABLE_AT_END`]
    /// are still open.
    fn check_unclosed<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        let unclosed = d
            .builder
            .open
            .iter()
            .any(|element| !element.is_html_one_of(CLOSABLE_AT_END));
        if unclosed {
            d.builder.error("unclosed elements at end of body", pos);
        }
    }

    /// Reconstruct formatting, insert, and push onto the formatting list.
    fn insert_formatting<S: TreeHandler>(d: &mut Dispatcher<S>, tag: &TagToken) {
        d.builder.reconstruct_formatting(tag.source);
        let element = d.builder.insert_html_element(tag);
        d.builder.push_formatting(element);
    }

    /// "A start tag whose tag name is one of: "area", "br", "embed", "img",
    /// "keygen", "wbr"": "Reconstruct the active formatting elements, if
    /// any. Insert an HTML element for the token. Immediately pop the current
    /// node off the stack of open elements. Acknowledge the token's
    /// self-closing flag, if it is set. Set the frameset-ok flag to "not ok"."
    fn insert_void_inline<S: TreeHandler>(d: &mut Dispatcher<S>, tag: &TagToken) {
        d.builder.reconstruct_formatting(tag.source);
        let _ = d.builder.insert_void_element(tag);
        d.builder.frameset_ok = false;
    }

    /// "A start tag whose tag name is "html""
    fn html_start<S: TreeHandler>(d: &mut Dispatcher<S>, tag: &TagToken) {
        // "Parse error."
        d.builder.error("unexpected <html> in body", tag.source.start);
        // "If there is a template element on the stack of open elements, then
        // ignore the token."
        if d.builder.open.contains_html("template") {
            return;
        }
        // "Otherwise, for each attribute on the token, check to see if the
        // attribute is already present on the top element of the stack of
        // open elements. If it is not, add the attribute and its
        // corresponding value to that element."
        if let Some(html) = d.builder.open.get(0).map(Rc::clone) {
            d.builder
                .sink
                .merge_attributes(&html.handle, &tag.attributes, tag.source);
        }
    }

    /// "A start tag whose tag name is "body""
    fn body_start<S: TreeHandler>(d: &mut Dispatcher<S>, tag: &TagToken) {
        // "Parse error."
        d.builder.error("unexpected <body> in body", tag.source.start);
        // "If the stack of open elements has only one node on it, if the
        // second element on the stack of open elements is not a body
        // element, or if there is a template element on the stack of open
        // elements, then ignore the token. (fragment case or there is a
        // template element on the stack)"
        let Some(body) = d.builder.open.get(1).map(Rc::clone) else {
            return;
        };
        if !body.is_html("body") || d.builder.open.contains_html("template") {
            return;
        }
        // "Otherwise, set the frameset-ok flag to "not ok"; then, for each
        // attribute on the token, check to see if the attribute is already
        // present on the body element (the second element) on the stack of
        // open elements, and if it is not, add the attribute and its
        // corresponding value to that element."
        d.builder.frameset_ok = false;
        d.builder
            .sink
            .merge_attributes(&body.handle, &tag.attributes, tag.source);
    }

    /// "A start tag whose tag name is "frameset""
    fn frameset_start<S: TreeHandler>(d: &mut Dispatcher<S>, tag: &TagToken) {
        // "Parse error."
        d.builder.error("unexpected <frameset> in body", tag.source.start);
        // "If the stack of open elements has only one node on it, or if the
        // second element on the stack of open elements is not a body
        // element, then ignore the token. (fragment case or there is a
        // template element on the stack)"
        // "If the frameset-ok flag is set to "not ok", ignore the token."
        let Some(body) = d.builder.open.get(1).map(Rc::clone) else {
            return;
        };
        if !body.is_html("body") || !d.builder.frameset_ok {
            return;
        }
        // STEP 1: "Remove the second element on the stack of open elements
        // from its parent node, if it has one."
        d.builder.sink.remove_node(&body.handle, tag.source);
        // STEP 2: "Pop all the nodes from the bottom of the stack of open
        // elements, from the current node up to, but not including, the root
        // html element."
        while d.builder.open.len() > 1 {
            let _ = d.builder.pop(tag.source);
        }
        // STEP 3: "Insert an HTML element for the token."
        let _ = d.builder.insert_html_element(tag);
        // STEP 4: "Switch the insertion mode to "in frameset"."
        d.set_mode(InsertionMode::InFrameset);
    }

    /// "A start tag whose tag name is "li"" and "A start tag whose tag name
    /// is one of: "dd", "dt"". `closes` are the names that an open item of
    /// the same kind may have.
    fn list_item_start<S: TreeHandler>(d: &mut Dispatcher<S>, tag: &TagToken, closes: &[&str]) {
        // STEP 1: "Set the frameset-ok flag to "not ok"."
        d.builder.frameset_ok = false;

        // STEP 2-5: "Initialize node to be the current node (the bottommost
        // node of the stack). Loop: ..."
        for index in (0..d.builder.open.len()).rev() {
            let Some(node) = d.builder.open.get(index).map(Rc::clone) else {
                break;
            };
            if node.is_html_one_of(closes) {
                // "Generate implied end tags, except for li elements. If the
                // current node is not an li element, then this is a parse
                // error. Pop elements from the stack of open elements until an
                // li element has been popped from the stack."
                d.builder.generate_implied_end_tags(Some(&node.name), tag.source);
                if !d.builder.current_is(&node.name) {
                    d.builder
                        .error(&format!("unclosed elements inside <{}>", node.name), tag.source.start);
                }
                d.builder.pop_until(&node.name, tag.source);
                break;
            }
            // "If node is in the special category, but is not an address, div,
            // or p element, then jump to the step labeled done below."
            if node.is_special() && !node.is_html_one_of(&["address", "div", "p"]) {
                break;
            }
        }

        // STEP 6: "Done: If the stack of open elements has a p element in
        // button scope, then close a p element."
        d.builder.close_p_in_button_scope(tag.source);
        // STEP 7: "Finally, insert an HTML element for the token."
        let _ = d.builder.insert_html_element(tag);
    }

    /// "A start tag whose tag name is "a""
    fn anchor_start<S: TreeHandler>(d: &mut Dispatcher<S>, tag: &TagToken) {
        // "If the list of active formatting elements contains an a element
        // between the end of the list and the last marker on the list (or
        // the start of the list if there is no marker on the list), then this
        // is a parse error; run the adoption agency algorithm for the token,
        // then remove that element from the list of active formatting
        // elements and the stack of open elements if the adoption agency
        // algorithm didn't already remove it (it might not have if the
        // element is not in table scope)."
        if let Some((_, anchor)) = d.builder.formatting.last_after_marker_named("a") {
            d.builder.error("nested <a>", tag.source.start);
            if !d.builder.adoption_agency("a", tag.source) {
                d.builder.any_other_end_tag("a", tag.source);
            }
            d.builder.formatting.remove(&anchor);
            d.builder.remove_from_stack(&anchor, tag.source);
        }
        Self::insert_formatting(d, tag);
    }

    /// "A start tag whose tag name is "nobr""
    fn nobr_start<S: TreeHandler>(d: &mut Dispatcher<S>, tag: &TagToken) {
        // "Reconstruct the active formatting elements, if any."
        d.builder.reconstruct_formatting(tag.source);
        // "If the stack of open elements has a nobr element in scope, then
        // this is a parse error; run the adoption agency algorithm for the
        // token, then once again reconstruct the active formatting elements,
        // if any."
        if d.builder.open.has_in_scope("nobr", Scope::Default) {
            d.builder.error("nested <nobr>", tag.source.start);
            if !d.builder.adoption_agency("nobr", tag.source) {
                d.builder.any_other_end_tag("nobr", tag.source);
            }
            d.builder.reconstruct_formatting(tag.source);
        }
        // "Insert an HTML element for the token. Push onto the list of active
        // formatting elements that element."
        let element = d.builder.insert_html_element(tag);
        d.builder.push_formatting(element);
    }

    /// "A start tag whose tag name is "select""
    fn select_start<S: TreeHandler>(d: &mut Dispatcher<S>, tag: &TagToken) {
        d.builder.reconstruct_formatting(tag.source);
        let _ = d.builder.insert_html_element(tag);
        d.builder.frameset_ok = false;
        // "If the insertion mode is one of "in table", "in caption", "in
        // table body", "in row", or "in cell", then switch the insertion mode
        // to "in select in table". Otherwise, switch the insertion mode to
        // "in select"."
        let mode = match d.mode {
            InsertionMode::InTable
            | InsertionMode::InCaption
            | InsertionMode::InTableBody
            | InsertionMode::InRow
            | InsertionMode::InCell => InsertionMode::InSelectInTable,
            _ => InsertionMode::InSelect,
        };
        d.set_mode(mode);
    }

    /// "An end tag whose tag name is "form""
    fn form_end<S: TreeHandler>(d: &mut Dispatcher<S>, source: SourceRange) {
        if d.builder.open.contains_html("template") {
            // "If there is a template element on the stack of open elements"
            if !d.builder.open.has_in_scope("form", Scope::Default) {
                d.builder.error("unexpected </form>", source.start);
                return;
            }
            d.builder.generate_implied_end_tags(None, source);
            if !d.builder.current_is("form") {
                d.builder.error("unclosed elements inside form", source.start);
            }
            d.builder.pop_until("form", source);
            return;
        }

        // STEP 1: "Let node be the element that the form element pointer is
        // set to, or null if it is not set to an element."
        // STEP 2: "Set the form element pointer to null."
        let node = d.builder.form.take();
        // STEP 3: "If node is null or if the stack of open elements does not
        // have node in scope, then this is a parse error; return and ignore
        // the token."
        let Some(node) =
            node.filter(|node| d.builder.open.has_element_in_scope(node, Scope::Default))
        else {
            d.builder.error("unexpected </form>", source.start);
            return;
        };
        // STEP 4: "Generate implied end tags."
        d.builder.generate_implied_end_tags(None, source);
        // STEP 5: "If the current node is not node, then this is a parse
        // error."
        if !d.builder.current().is_some_and(|current| Rc::ptr_eq(current, &node)) {
            d.builder.error("unclosed elements inside form", source.start);
        }
        // STEP 6: "Remove node from the stack of open elements."
        d.builder.remove_from_stack(&node, source);
    }

    /// Close a block element that is in scope, or report and ignore.
    fn close_in_scope<S: TreeHandler>(
        d: &mut Dispatcher<S>,
        name: &str,
        scope: Scope,
        source: SourceRange,
    ) -> bool {
        // "If the stack of open elements does not have an element in scope
        // that is an HTML element with the same tag name as that of the
        // token, then this is a parse error; ignore the token."
        if !d.builder.open.has_in_scope(name, scope) {
            d.builder
                .error(&format!("end tag </{name}> without open element"), source.start);
            return false;
        }
        // STEP 1: "Generate implied end tags."
        let except = matches!(name, "li" | "dd" | "dt").then_some(name);
        d.builder.generate_implied_end_tags(except, source);
        // STEP 2: "If the current node is not an HTML element with the same
        // tag name as that of the token, then this is a parse error."
        if !d.builder.current_is(name) {
            d.builder
                .error(&format!("unclosed elements inside <{name}>"), source.start);
        }
        // STEP 3: "Pop elements from the stack of open elements until an
        // HTML element with the same tag name as the token has been popped
        // from the stack."
        d.builder.pop_until(name, source);
        true
    }

    /// "An end tag whose tag name is "body"" (and the first half of "html").
    fn body_end<S: TreeHandler>(d: &mut Dispatcher<S>, source: SourceRange) -> bool {
        // "If the stack of open elements does not have a body element in
        // scope, this is a parse error; ignore the token."
        if !d.builder.open.has_in_scope("body", Scope::Default) {
            d.builder.error("end tag </body> without open body", source.start);
            return false;
        }
        Self::check_unclosed(d, source.start);
        // "Switch the insertion mode to "after body"."
        d.set_mode(InsertionMode::AfterBody);
        true
    }
}

impl InsertionModeRules for InBody {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        // "A character token that is U+0000 NULL": "Parse error. Ignore the
        // token."
        for at in null_positions(text, source) {
            d.builder.error("unexpected null character", at);
        }
        let text = strip_nulls(text);
        if text.is_empty() {
            return;
        }
        // "Reconstruct the active formatting elements, if any. Insert the
        // token's character."
        d.builder.reconstruct_formatting(source);
        d.builder.insert_characters(&text, source);
        // "Set the frameset-ok flag to "not ok"." (non-whitespace only)
        if !is_all_space(&text) {
            d.builder.frameset_ok = false;
        }
    }

    #[allow(clippy::too_many_lines)]
    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, mut tag: TagToken) {
        match tag.name.as_str() {
            "html" => Self::html_start(d, &tag),
            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
            | "style" | "template" | "title" => InHead::start_tag(d, tag),
            "body" => Self::body_start(d, &tag),
            "frameset" => Self::frameset_start(d, &tag),
            name if BLOCK_STARTS.contains(&name) => {
                d.builder.close_p_in_button_scope(tag.source);
                let _ = d.builder.insert_html_element(&tag);
            }
            name if HEADINGS.contains(&name) => {
                d.builder.close_p_in_button_scope(tag.source);
                // "If the current node is an HTML element whose tag name is
                // one of "h1", "h2", "h3", "h4", "h5", or "h6", then this is a
                // parse error; pop the current node off the stack of open
                // elements."
                if d.builder.current_is_one_of(HEADINGS) {
                    d.builder.error("nested heading", tag.source.start);
                    let _ = d.builder.pop(SourceRange::empty_at(tag.source.start));
                }
                let _ = d.builder.insert_html_element(&tag);
            }
            "pre" | "listing" => {
                d.builder.close_p_in_button_scope(tag.source);
                let _ = d.builder.insert_html_element(&tag);
                // "If the next token is a U+000A LINE FEED (LF) character
                // token, then ignore that token and move on to the next one."
                d.builder.ignore_lf = true;
                d.builder.frameset_ok = false;
            }
            "form" => {
                // "If the form element pointer is not null, and there is no
                // template element on the stack of open elements, then this
                // is a parse error; ignore the token."
                let in_template = d.builder.open.contains_html("template");
                if d.builder.form.is_some() && !in_template {
                    d.builder.error("nested <form>", tag.source.start);
                    return;
                }
                d.builder.close_p_in_button_scope(tag.source);
                let form = d.builder.insert_html_element(&tag);
                if !in_template {
                    d.builder.form = Some(form);
                }
            }
            "li" => Self::list_item_start(d, &tag, &["li"]),
            "dd" | "dt" => Self::list_item_start(d, &tag, &["dd", "dt"]),
            "plaintext" => {
                d.builder.close_p_in_button_scope(tag.source);
                let _ = d.builder.insert_html_element(&tag);
                // "Switch the tokenizer to the PLAINTEXT state."
                d.builder.tokenizer_switch = Some((TokenizerState::PlainText, None));
            }
            "button" => {
                // "If the stack of open elements has a button element in
                // scope, then run these substeps: Parse error. Generate
                // implied end tags. Pop elements from the stack of open
                // elements until a button element has been popped from the
                // stack."
                if d.builder.open.has_in_scope("button", Scope::Default) {
                    d.builder.error("nested <button>", tag.source.start);
                    d.builder.generate_implied_end_tags(None, tag.source);
                    d.builder.pop_until("button", tag.source);
                }
                d.builder.reconstruct_formatting(tag.source);
                let _ = d.builder.insert_html_element(&tag);
                d.builder.frameset_ok = false;
            }
            "a" => Self::anchor_start(d, &tag),
            "nobr" => Self::nobr_start(d, &tag),
            name if FORMATTING.contains(&name) => Self::insert_formatting(d, &tag),
            // "A start tag whose tag name is one of: "applet", "marquee",
            // "object"": "Reconstruct the active formatting elements, if any.
            // Insert an HTML element for the token. Insert a marker at the end
            // of the list of active formatting elements. Set the frameset-ok
            // flag to "not ok"."
            "applet" | "marquee" | "object" => {
                d.builder.reconstruct_formatting(tag.source);
                let _ = d.builder.insert_html_element(&tag);
                d.builder.formatting.push_marker();
                d.builder.frameset_ok = false;
            }
            // "A start tag whose tag name is "table"": "If the Document is not
            // set to quirks mode, and the stack of open elements has a p
            // element in button scope, then close a p element."
            "table" => {
                if d.builder.quirks != QuirksMode::Quirks {
                    d.builder.close_p_in_button_scope(tag.source);
                }
                let _ = d.builder.insert_html_element(&tag);
                d.builder.frameset_ok = false;
                d.set_mode(InsertionMode::InTable);
            }
            "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
                Self::insert_void_inline(d, &tag);
            }
            // "A start tag whose tag name is "input"": "If the token does not
            // have an attribute with the name "type", or if it does, but that
            // attribute's value is not an ASCII case-insensitive match for the
            // string "hidden", then: set the frameset-ok flag to "not ok"."
            "input" => {
                d.builder.reconstruct_formatting(tag.source);
                let _ = d.builder.insert_void_element(&tag);
                let hidden = tag
                    .attributes
                    .get("type")
                    .is_some_and(|kind| kind.eq_ignore_ascii_case("hidden"));
                if !hidden {
                    d.builder.frameset_ok = false;
                }
            }
            "param" | "source" | "track" => {
                let _ = d.builder.insert_void_element(&tag);
            }
            "hr" => {
                d.builder.close_p_in_button_scope(tag.source);
                let _ = d.builder.insert_void_element(&tag);
                d.builder.frameset_ok = false;
            }
            // "A start tag whose tag name is "image"": "Parse error. Change
            // the token's tag name to "img" and reprocess it. (Don't ask.)"
            "image" => {
                d.builder.error("<image> treated as <img>", tag.source.start);
                tag.name = "img".to_string();
                d.process_start_tag(tag);
            }
            "textarea" => {
                // STEP 1: "Insert an HTML element for the token."
                let _ = d.builder.insert_html_element(&tag);
                // STEP 2: "If the next token is a U+000A LINE FEED (LF)
                // character token, then ignore that token"
                d.builder.ignore_lf = true;
                // STEP 3: "Switch the tokenizer to the RCDATA state."
                d.builder.switch_tokenizer(TokenizerState::RcData, "textarea");
                // STEP 5: "Set the frameset-ok flag to "not ok"."
                d.builder.frameset_ok = false;
                // STEP 4, 6: original insertion mode, then "text".
                d.enter_text_mode();
            }
            "xmp" => {
                d.builder.close_p_in_button_scope(tag.source);
                d.builder.reconstruct_formatting(tag.source);
                d.builder.frameset_ok = false;
                parse_text_element(d, &tag, TokenizerState::RawText);
            }
            "iframe" => {
                d.builder.frameset_ok = false;
                parse_text_element(d, &tag, TokenizerState::RawText);
            }
            "noembed" => parse_text_element(d, &tag, TokenizerState::RawText),
            "noscript" if d.builder.options.scripting_enabled => {
                parse_text_element(d, &tag, TokenizerState::RawText);
            }
            "select" => Self::select_start(d, &tag),
            "optgroup" | "option" => {
                // "If the current node is an option element, then pop the
                // current node off the stack of open elements."
                if d.builder.current_is("option") {
                    let _ = d.builder.pop(SourceRange::empty_at(tag.source.start));
                }
                d.builder.reconstruct_formatting(tag.source);
                let _ = d.builder.insert_html_element(&tag);
            }
            "rb" | "rtc" => {
                if d.builder.open.has_in_scope("ruby", Scope::Default) {
                    d.builder.generate_implied_end_tags(None, tag.source);
                    if !d.builder.current_is("ruby") {
                        d.builder.error(&format!("<{}> outside ruby", tag.name), tag.source.start);
                    }
                }
                let _ = d.builder.insert_html_element(&tag);
            }
            "rp" | "rt" => {
                if d.builder.open.has_in_scope("ruby", Scope::Default) {
                    d.builder.generate_implied_end_tags(Some("rtc"), tag.source);
                    if !d.builder.current_is_one_of(&["rtc", "ruby"]) {
                        d.builder.error(&format!("<{}> outside ruby", tag.name), tag.source.start);
                    }
                }
                let _ = d.builder.insert_html_element(&tag);
            }
            "math" => {
                d.builder.reconstruct_formatting(tag.source);
                insert_foreign_element(d, tag, Namespace::MathMl);
            }
            "svg" => {
                d.builder.reconstruct_formatting(tag.source);
                insert_foreign_element(d, tag, Namespace::Svg);
            }
            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "frame", "head", "tbody", "td", "tfoot", "th",
            // "thead", "tr"": "Parse error. Ignore the token."
            "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td" | "tfoot"
            | "th" | "thead" | "tr" => d
                .builder
                .error(&format!("unexpected <{}> in body", tag.name), tag.source.start),
            // "Any other start tag": "Reconstruct the active formatting
            // elements, if any. Insert an HTML element for the token."
            _ => {
                d.builder.reconstruct_formatting(tag.source);
                let _ = d.builder.insert_html_element(&tag);
            }
        }
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        match name {
            "template" => InHead::end_tag(d, name, source),
            "body" => {
                let _ = Self::body_end(d, source);
            }
            // "An end tag whose tag name is "html"": "If the stack of open
            // elements does not have a body element in scope, this is a parse
            // error; ignore the token. Otherwise, ... Switch the insertion
            // mode to "after body". Reprocess the token."
            "html" => {
                if Self::body_end(d, source) {
                    d.process_end_tag(name, source);
                }
            }
            name if BLOCK_ENDS.contains(&name) => {
                let _ = Self::close_in_scope(d, name, Scope::Default, source);
            }
            "form" => Self::form_end(d, source),
            // "An end tag whose tag name is "p"": "If the stack of open
            // elements does not have a p element in button scope, then this is
            // a parse error; insert an HTML element for a "p" start tag token
            // with no attributes. Close a p element."
            "p" => {
                if !d.builder.open.has_in_scope("p", Scope::Button) {
                    d.builder.error("end tag </p> without open p", source.start);
                    let _ = d.builder.insert_implied("p", source);
                }
                d.builder.close_p(source);
            }
            "li" => {
                let _ = Self::close_in_scope(d, name, Scope::ListItem, source);
            }
            "dd" | "dt" => {
                let _ = Self::close_in_scope(d, name, Scope::Default, source);
            }
            name if HEADINGS.contains(&name) => {
                // "If the stack of open elements does not have an element in
                // scope that is an HTML element and whose tag name is one of
                // "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
                // error; ignore the token."
                if !d.builder.open.has_any_in_scope(HEADINGS, Scope::Default) {
                    d.builder
                        .error(&format!("end tag </{name}> without open heading"), source.start);
                    return;
                }
                d.builder.generate_implied_end_tags(None, source);
                if !d.builder.current_is(name) {
                    d.builder.error(&format!("misnested end tag </{name}>"), source.start);
                }
                d.builder.pop_until_one_of(HEADINGS, source);
            }
            name if FORMATTING.contains(&name) => {
                if !d.builder.adoption_agency(name, source) {
                    d.builder.any_other_end_tag(name, source);
                }
            }
            "applet" | "marquee" | "object" => {
                if Self::close_in_scope(d, name, Scope::Default, source) {
                    // "Clear the list of active formatting elements up to the
                    // last marker."
                    d.builder.formatting.clear_to_last_marker();
                }
            }
            // "An end tag whose tag name is "br"": "Parse error. Drop the
            // attributes from the token, and act as described in the next
            // entry; i.e. act as if this was a "br" start tag token with no
            // attributes, rather than the end tag token that it actually is."
            "br" => {
                d.builder.error("end tag </br> treated as <br>", source.start);
                let tag = TagToken::new("br", AttributeList::new(), false, source);
                Self::insert_void_inline(d, &tag);
            }
            _ => d.builder.any_other_end_tag(name, source),
        }
    }

    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        // "If the stack of template insertion modes is not empty, then process
        // the token using the rules for the "in template" insertion mode."
        if !d.template_modes.is_empty() {
            InTemplate::end_of_file(d, pos);
            return;
        }
        // "Otherwise, follow these steps: If there is a node in the stack of
        // open elements that is not either ... then this is a parse error.
        // Stop parsing."
        Self::check_unclosed(d, pos);
        d.builder.stop_parsing(pos);
    }
}
