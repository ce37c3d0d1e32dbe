use super::InsertionModeRules;
use crate::tokenizer::SourceRange;
use crate::tree_builder::dispatcher::{Dispatcher, InsertionMode};
use crate::tree_builder::handler::TreeHandler;
use crate::tree_builder::token::{TagToken, split_leading_space};

/// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
pub struct BeforeHtml;

impl BeforeHtml {
    /// "Anything else": "Create an html element whose node document is the
    /// Document object. Append it to the Document object. Put this element
    /// in the stack of open elements. Switch the insertion mode to "before
    /// head", then reprocess the token."
    fn anything_else<S: TreeHandler>(d: &mut Dispatcher<S>, source: SourceRange) {
        let _ = d.builder.insert_implied("html", source);
        d.set_mode(InsertionMode::BeforeHead);
    }
}

impl InsertionModeRules for BeforeHtml {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        // "A character token that is one of U+0009 CHARACTER TABULATION,
        // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
        // RETURN (CR), or U+0020 SPACE": "Ignore the token."
        let (_, (rest, rest_source)) = split_leading_space(text, source);
        if rest.is_empty() {
            return;
        }
        Self::anything_else(d, rest_source);
        d.process_characters(rest, rest_source);
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        // "A start tag whose tag name is "html"": "Create an element for the
        // token in the HTML namespace, with the Document as the intended
        // parent. Append it to the Document object. Put this element in the
        // stack of open elements. Switch the insertion mode to "before head"."
        if tag.name == "html" {
            let _ = d.builder.insert_html_element(&tag);
            d.set_mode(InsertionMode::BeforeHead);
            return;
        }
        Self::anything_else(d, tag.source);
        d.process_start_tag(tag);
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        // "An end tag whose tag name is one of: "head", "body", "html", "br"":
        // "Act as described in the "anything else" entry below."
        // "Any other end tag": "Parse error. Ignore the token."
        if !matches!(name, "head" | "body" | "html" | "br") {
            d.builder
                .error(&format!("end tag </{name}> not allowed before html"), source.start);
            return;
        }
        Self::anything_else(d, source);
        d.process_end_tag(name, source);
    }

    /// "A comment token": "Insert a comment as the last child of the
    /// Document object."
    fn comment<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        d.builder.insert_comment_in_document(text, source);
    }

    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        Self::anything_else(d, SourceRange::empty_at(pos));
        d.process_end_of_file(pos);
    }
}
