use super::{InBody, InsertionModeRules};
use crate::tokenizer::SourceRange;
use crate::tree_builder::dispatcher::{Dispatcher, InsertionMode};
use crate::tree_builder::handler::TreeHandler;
use crate::tree_builder::token::{TagToken, split_leading_space};

/// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
pub struct BeforeHead;

impl BeforeHead {
    /// "Anything else": "Insert an HTML element for a "head" start tag
    /// token with no attributes. Set the head element pointer to the newly
    /// created head element. Switch the insertion mode to "in head".
    /// Reprocess the current token."
    fn anything_else<S: TreeHandler>(d: &mut Dispatcher<S>, source: SourceRange) {
        let head = d.builder.insert_implied("head", source);
        d.builder.head = Some(head);
        d.set_mode(InsertionMode::InHead);
    }
}

impl InsertionModeRules for BeforeHead {
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
        match tag.name.as_str() {
            // "A start tag whose tag name is "html"": "Process the token
            // using the rules for the "in body" insertion mode."
            "html" => InBody::start_tag(d, tag),
            // "A start tag whose tag name is "head"": "Insert an HTML element
            // for the token. Set the head element pointer to the newly
            // created head element. Switch the insertion mode to "in head"."
            "head" => {
                let head = d.builder.insert_html_element(&tag);
                d.builder.head = Some(head);
                d.set_mode(InsertionMode::InHead);
            }
            _ => {
                Self::anything_else(d, tag.source);
                d.process_start_tag(tag);
            }
        }
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        // "An end tag whose tag name is one of: "head", "body", "html", "br"":
        // "Act as described in the "anything else" entry below."
        // "Any other end tag": "Parse error. Ignore the token."
        if !matches!(name, "head" | "body" | "html" | "br") {
            d.builder.error("end tag not allowed before head", source.start);
            return;
        }
        Self::anything_else(d, source);
        d.process_end_tag(name, source);
    }

    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        Self::anything_else(d, SourceRange::empty_at(pos));
        d.process_end_of_file(pos);
    }
}
