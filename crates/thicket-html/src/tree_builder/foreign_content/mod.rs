//! Foreign content parsing support for SVG and MathML.
//!
//! [§ 13.2.6.3 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

pub mod mathml;
pub mod svg;

pub use mathml::adjust_mathml_attributes;
pub use svg::{adjust_svg_attributes, adjust_svg_tag_name};

use crate::tokenizer::AttributeList;

const XLINK: &str = "http://www.w3.org/1999/xlink";
const XML: &str = "http://www.w3.org/XML/1998/namespace";
const XMLNS: &str = "http://www.w3.org/2000/xmlns/";

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// "if any of the attributes on the token match the strings given in the
/// first column of the following table, let the attribute be a namespaced
/// attribute, with the prefix being the string given in the corresponding
/// cell in the second column, the local name being the string given in the
/// corresponding cell in the third column, and the namespace being the
/// namespace given in the corresponding cell in the fourth column."
///
/// Format: (`attribute_name`, prefix, `local_name`, namespace)
const FOREIGN_ATTRIBUTE_ADJUSTMENTS: &[(&str, &str, &str, &str)] = &[
    ("xlink:actuate", "xlink", "actuate", XLINK),
    ("xlink:arcrole", "xlink", "arcrole", XLINK),
    ("xlink:href", "xlink", "href", XLINK),
    ("xlink:role", "xlink", "role", XLINK),
    ("xlink:show", "xlink", "show", XLINK),
    ("xlink:title", "xlink", "title", XLINK),
    ("xlink:type", "xlink", "type", XLINK),
    ("xml:lang", "xml", "lang", XML),
    ("xml:space", "xml", "space", XML),
    ("xmlns", "", "xmlns", XMLNS),
    ("xmlns:xlink", "xmlns", "xlink", XMLNS),
];

/// Namespace URL of an adjusted foreign attribute name, if it has one.
#[must_use]
pub fn foreign_attribute_namespace(name: &str) -> Option<&'static str> {
    FOREIGN_ATTRIBUTE_ADJUSTMENTS
        .iter()
        .find(|&&(from, ..)| from == name)
        .map(|&(.., namespace)| namespace)
}

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// Attribute names stay in their `prefix:local` form; sinks that track
/// attribute namespaces can recover the URL with
/// [`foreign_attribute_namespace`].
pub fn adjust_foreign_attributes(attributes: &mut AttributeList) {
    for attr in attributes.iter_mut() {
        if let Some(&(_, prefix, local_name, _)) = FOREIGN_ATTRIBUTE_ADJUSTMENTS
            .iter()
            .find(|&&(from, ..)| attr.name == from)
        {
            attr.name = if prefix.is_empty() {
                local_name.to_string()
            } else {
                format!("{prefix}:{local_name}")
            };
        }
    }
}

/// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
///
/// "A start tag whose tag name is one of: "b", "big", "blockquote", "body",
/// "br", "center", "code", "dd", "div", "dl", "dt", "em", "embed", "h1",
/// "h2", "h3", "h4", "h5", "h6", "head", "hr", "i", "img", "li", "listing",
/// "menu", "meta", "nobr", "ol", "p", "pre", "ruby", "s", "small", "span",
/// "strong", "strike", "sub", "sup", "table", "tt", "u", "ul", "var""
const BREAKOUT_ELEMENTS: &[&str] = &[
    "b", "big", "blockquote", "body", "br", "center", "code", "dd", "div", "dl", "dt", "em",
    "embed", "h1", "h2", "h3", "h4", "h5", "h6", "head", "hr", "i", "img", "li", "listing",
    "menu", "meta", "nobr", "ol", "p", "pre", "ruby", "s", "small", "span", "strong", "strike",
    "sub", "sup", "table", "tt", "u", "ul", "var",
];

/// Whether this start tag leaves foreign content: one of the HTML
/// breakout elements, or `font` with `color`, `face` or `size`.
#[must_use]
pub fn is_breakout_tag(name: &str, attributes: &AttributeList) -> bool {
    BREAKOUT_ELEMENTS.contains(&name)
        || (name == "font"
            && (attributes.contains("color")
                || attributes.contains("face")
                || attributes.contains("size")))
}
