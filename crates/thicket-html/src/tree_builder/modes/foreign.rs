use std::borrow::Cow;

use super::InsertionModeRules;
use crate::tokenizer::{Doctype, SourceRange};
use crate::tree_builder::dispatcher::Dispatcher;
use crate::tree_builder::element::Namespace;
use crate::tree_builder::foreign_content::{
    adjust_foreign_attributes, adjust_mathml_attributes, adjust_svg_attributes,
    adjust_svg_tag_name, is_breakout_tag,
};
use crate::tree_builder::handler::TreeHandler;
use crate::tree_builder::token::{TagToken, is_all_space, null_positions};

/// [§ 13.2.6.1 Insert a foreign element](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
///
/// Adjust the token's attributes for `namespace`, insert it, and pop it
/// again if it was self-closing.
pub(super) fn insert_foreign_element<S: TreeHandler>(
    d: &mut Dispatcher<S>,
    mut tag: TagToken,
    namespace: Namespace,
) {
    match namespace {
        // "Adjust MathML attributes for the token. (This fixes the case of
        // MathML attributes that are not all lowercase.)"
        Namespace::MathMl => adjust_mathml_attributes(&mut tag.attributes),
        // "Adjust SVG attributes for the token. (This fixes the case of SVG
        // attributes that are not all lowercase.)"
        Namespace::Svg => adjust_svg_attributes(&mut tag.attributes),
        Namespace::Html => {}
    }
    // "Adjust foreign attributes for the token. (This fixes the use of
    // namespaced attributes, in particular XLink.)"
    adjust_foreign_attributes(&mut tag.attributes);

    let _ = d
        .builder
        .insert_element(&tag.name, namespace, tag.attributes, false, tag.source);

    // "If the token has its self-closing flag set, pop the current node off
    // the stack of open elements and acknowledge the token's self-closing
    // flag."
    if tag.self_closing {
        let _ = d.builder.pop(tag.source);
    }
}

/// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
///
/// Not an insertion mode: the dispatcher sends tokens here while the
/// adjusted current node is an SVG or MathML element, whatever the current
/// mode is.
pub struct InForeignContent;

impl InsertionModeRules for InForeignContent {
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        // "A character token that is U+0000 NULL": "Parse error. Insert a
        // U+FFFD REPLACEMENT CHARACTER character."
        let text = if text.contains('\0') {
            for at in null_positions(text, source) {
                d.builder.error("unexpected NULL character", at);
            }
            Cow::Owned(text.replace('\0', "\u{FFFD}"))
        } else {
            Cow::Borrowed(text)
        };
        // "Any other character token": "Insert the token's character. Set the
        // frameset-ok flag to "not ok"."
        if !is_all_space(&text) {
            d.builder.frameset_ok = false;
        }
        d.builder.insert_characters(&text, source);
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, mut tag: TagToken) {
        if is_breakout_tag(&tag.name, &tag.attributes) {
            // "Parse error."
            d.builder.error(
                &format!("<{}> breaks out of foreign content", tag.name),
                tag.source.start,
            );
            // "While the current node is not a MathML text integration point,
            // an HTML integration point, or an element in the HTML namespace,
            // pop elements from the stack of open elements."
            while let Some(current) = d.builder.current() {
                if current.in_html_namespace()
                    || current.is_mathml_text_integration_point()
                    || current.is_html_integration_point()
                {
                    break;
                }
                let _ = d.builder.pop(tag.source);
            }
            // "Reprocess the token according to the rules given in the section
            // corresponding to the current insertion mode in HTML content."
            d.process_start_tag_in_mode(tag);
            return;
        }

        // "Any other start tag"
        let namespace = d
            .builder
            .adjusted_current()
            .map_or(Namespace::Html, |node| node.namespace);
        // "If the adjusted current node is an element in the SVG namespace,
        // and the token's tag name is one of the ones in the first column of
        // the following table, change the tag name to the name given in the
        // corresponding cell in the second column."
        if namespace == Namespace::Svg {
            let adjusted = adjust_svg_tag_name(&tag.name);
            if adjusted != tag.name {
                tag.name = adjusted.to_string();
            }
        }
        // "Insert a foreign element for the token, with adjusted current
        // node's namespace and false."
        insert_foreign_element(d, tag, namespace);
    }

    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange) {
        // STEP 1: "Initialize node to be the current node (the bottommost
        // node of the stack)."
        let Some(mut index) = d.builder.open.len().checked_sub(1) else {
            return;
        };

        // STEP 2: "If node's tag name, converted to ASCII lowercase, is not the
        // same as the tag name of the token, then this is a parse error."
        if d.builder
            .open
            .get(index)
            .is_some_and(|node| !node.name.eq_ignore_ascii_case(name))
        {
            d.builder
                .error(&format!("unexpected end tag </{name}> in foreign content"), source.start);
        }

        loop {
            // STEP 3: "Loop: If node is the topmost element in the stack of
            // open elements, then return. (fragment case)"
            if index == 0 {
                return;
            }
            let Some(node) = d.builder.open.get(index).cloned() else {
                return;
            };

            // STEP 4: "If node's tag name, converted to ASCII lowercase, is the
            // same as the tag name of the token, pop elements from the stack
            // of open elements until node has been popped from the stack, and
            // then return."
            if node.name.eq_ignore_ascii_case(name) {
                d.builder.pop_until_element(&node, source);
                return;
            }

            // STEP 5: "Set node to the previous entry in the stack of open
            // elements."
            index -= 1;

            // STEP 6: "If node is not an element in the HTML namespace, return
            // to the step labeled loop."
            // STEP 7: "Otherwise, process the token according to the rules
            // given in the section corresponding to the current insertion mode
            // in HTML content."
            if d
                .builder
                .open
                .get(index)
                .is_some_and(|node| node.in_html_namespace())
            {
                d.process_end_tag_in_mode(name, source);
                return;
            }
        }
    }

    fn doctype<S: TreeHandler>(d: &mut Dispatcher<S>, _doctype: &Doctype, source: SourceRange) {
        d.builder.error("unexpected DOCTYPE in foreign content", source.start);
    }

    /// End of file is always processed in the current insertion mode.
    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        d.process_end_of_file(pos);
    }
}
