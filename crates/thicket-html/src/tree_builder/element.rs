use std::rc::Rc;

pub use thicket_dom::Namespace;

use crate::tokenizer::AttributeList;

/// An element as the tree builder sees it.
///
/// Carries what the construction rules inspect (name, namespace and
/// attributes) plus the sink's handle for the node it created. The builder
/// never looks inside the handle; it only passes it back to the sink.
#[derive(Debug)]
pub struct Element<H> {
    /// Local name, lowercase for HTML elements.
    pub name: String,
    /// Element namespace.
    pub namespace: Namespace,
    /// Attributes from the start tag that created the element.
    pub attributes: AttributeList,
    /// The sink's node.
    pub handle: H,
}

/// Shared element reference. Identity is [`Rc::ptr_eq`].
pub type ElementRef<H> = Rc<Element<H>>;

/// HTML elements that get their own [`Scope`](super::Scope) boundary or
/// special treatment in the adoption agency.
///
/// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#special)
const SPECIAL_HTML: &[&str] = &[
    "address", "applet", "area", "article", "aside", "base", "basefont", "bgsound",
    "blockquote", "body", "br", "button", "caption", "center", "col", "colgroup", "dd",
    "details", "dir", "div", "dl", "dt", "embed", "fieldset", "figcaption", "figure", "footer",
    "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup",
    "hr", "html", "iframe", "img", "input", "keygen", "li", "link", "listing", "main",
    "marquee", "menu", "meta", "nav", "noembed", "noframes", "noscript", "object", "ol", "p",
    "param", "plaintext", "pre", "script", "search", "section", "select", "source", "style",
    "summary", "table", "tbody", "td", "template", "textarea", "tfoot", "th", "thead", "title",
    "tr", "track", "ul", "wbr", "xmp",
];

/// "The following elements have varying levels of special parsing rules:
/// ... Formatting: a, b, big, code, em, font, i, nobr, s, small, strike,
/// strong, tt, u"
pub const FORMATTING: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt",
    "u",
];

/// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
pub const IMPLIED_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// "generate all implied end tags thoroughly"
pub const IMPLIED_END_TAGS_THOROUGH: &[&str] = &[
    "caption", "colgroup", "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
    "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// Void elements: no end tag, never pushed on the stack.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

impl<H> Element<H> {
    /// Create an element record.
    pub const fn new(
        name: String,
        namespace: Namespace,
        attributes: AttributeList,
        handle: H,
    ) -> Self {
        Self {
            name,
            namespace,
            attributes,
            handle,
        }
    }

    /// An HTML element with this local name.
    #[must_use]
    pub fn is_html(&self, name: &str) -> bool {
        self.namespace == Namespace::Html && self.name == name
    }

    /// An HTML element whose name is in `names`.
    #[must_use]
    pub fn is_html_one_of(&self, names: &[&str]) -> bool {
        self.namespace == Namespace::Html && names.contains(&self.name.as_str())
    }

    /// In the HTML namespace at all.
    #[must_use]
    pub fn in_html_namespace(&self) -> bool {
        self.namespace == Namespace::Html
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#special)
    /// "Special" category.
    #[must_use]
    pub fn is_special(&self) -> bool {
        match self.namespace {
            Namespace::Html => SPECIAL_HTML.contains(&self.name.as_str()),
            Namespace::MathMl => matches!(
                self.name.as_str(),
                "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"
            ),
            Namespace::Svg => matches!(self.name.as_str(), "foreignObject" | "desc" | "title"),
        }
    }

    /// "Formatting" category.
    #[must_use]
    pub fn is_formatting(&self) -> bool {
        self.is_html_one_of(FORMATTING)
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#mathml-text-integration-point)
    ///
    /// "A node is a MathML text integration point if it is one of the
    /// following elements: A MathML mi element, A MathML mo element, A MathML
    /// mn element, A MathML ms element, A MathML mtext element"
    #[must_use]
    pub fn is_mathml_text_integration_point(&self) -> bool {
        self.namespace == Namespace::MathMl
            && matches!(self.name.as_str(), "mi" | "mo" | "mn" | "ms" | "mtext")
    }

    /// [§ 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
    ///
    /// "A MathML annotation-xml element whose start tag token had an
    /// attribute with the name "encoding" whose value was an ASCII
    /// case-insensitive match for the string "text/html" ... or
    /// "application/xhtml+xml"; An SVG foreignObject element; An SVG desc
    /// element; An SVG title element"
    #[must_use]
    pub fn is_html_integration_point(&self) -> bool {
        match self.namespace {
            Namespace::MathMl => {
                self.name == "annotation-xml"
                    && self.attributes.get("encoding").is_some_and(|encoding| {
                        encoding.eq_ignore_ascii_case("text/html")
                            || encoding.eq_ignore_ascii_case("application/xhtml+xml")
                    })
            }
            Namespace::Svg => matches!(self.name.as_str(), "foreignObject" | "desc" | "title"),
            Namespace::Html => false,
        }
    }

    /// Same tag name, namespace and attributes: the Noah's Ark comparison.
    #[must_use]
    pub fn same_formatting(&self, other: &Self) -> bool {
        self.name == other.name
            && self.namespace == other.namespace
            && self.attributes.same_set(&other.attributes)
    }
}
