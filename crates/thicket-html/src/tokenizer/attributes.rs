//! [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
//! through
//! [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-quoted-state)
//!
//! Attributes are scanned into byte ranges while the tag is tokenized and
//! only interpreted (null replacement, character references, duplicate
//! removal) the first time someone asks for them.

use std::borrow::Cow;
use std::cell::OnceCell;
use std::ops::Range;

use super::character_reference::decode_character_references;
use super::helpers::{
    ErrorSink, is_html_whitespace, replace_nulls, report_ascii_errors, report_nulls, span_until,
    span_whitespace,
};
use super::options::TokenizerOptions;
use super::token::{Attribute, AttributeList};

/// Bytes that may not appear in an unquoted attribute value.
const UNQUOTED_VALUE_ERRORS: &[u8] = b"\"'<=`";

/// Raw position of an attribute value.
#[derive(Debug, Clone)]
pub(crate) struct ValueCapture {
    range: Range<usize>,
    quoted: bool,
    closed: bool,
}

/// One thing found between a tag name and its closing bracket.
#[derive(Debug, Clone)]
pub(crate) enum AttributeCapture {
    /// A `/` that is not part of `/>`.
    BareSlash(usize),
    /// `name`, `name=value`, `name="value"` or `name='value'`.
    Attribute {
        name: Range<usize>,
        value: Option<ValueCapture>,
        /// Offset just past the attribute.
        end: usize,
    },
}

/// Scan attributes starting at `pos`.
///
/// Returns the captures and the offset of the first byte that is not part of
/// an attribute: `/>`, `>`, or the end of input.
pub(crate) fn scan_attributes(input: &str, pos: usize) -> (Vec<AttributeCapture>, usize) {
    let bytes = input.as_bytes();
    let mut captures = Vec::new();
    let mut cursor = pos;

    loop {
        let at = cursor + span_whitespace(bytes, cursor);
        let Some(&byte) = bytes.get(at) else {
            break;
        };
        if byte == b'>' || (byte == b'/' && bytes.get(at + 1) == Some(&b'>')) {
            break;
        }
        if byte == b'/' {
            captures.push(AttributeCapture::BareSlash(at));
            cursor = at + 1;
            continue;
        }

        // "Start a new attribute in the current tag token." The first
        // character may be "=", later ones may not.
        let name_end = at + 1 + span_until(bytes, at + 1, b"\t\n\x0C =/>");
        let after_name = name_end + span_whitespace(bytes, name_end);
        if bytes.get(after_name) != Some(&b'=') {
            captures.push(AttributeCapture::Attribute {
                name: at..name_end,
                value: None,
                end: name_end,
            });
            cursor = name_end;
            continue;
        }

        let value_at = after_name + 1 + span_whitespace(bytes, after_name + 1);
        let (value, end) = match bytes.get(value_at) {
            Some(&quote @ (b'"' | b'\'')) => {
                let start = value_at + 1;
                let value_end = start + span_until(bytes, start, &[quote]);
                let closed = value_end < bytes.len();
                let capture = ValueCapture {
                    range: start..value_end,
                    quoted: true,
                    closed,
                };
                (capture, if closed { value_end + 1 } else { value_end })
            }
            _ => {
                let value_end = value_at + span_until(bytes, value_at, b"\t\n\x0C >");
                let capture = ValueCapture {
                    range: value_at..value_end,
                    quoted: false,
                    closed: false,
                };
                (capture, value_end)
            }
        };
        captures.push(AttributeCapture::Attribute {
            name: at..name_end,
            value: Some(value),
            end,
        });
        cursor = end;
    }

    (captures, cursor + span_whitespace(bytes, cursor))
}

#[derive(Debug, Default)]
struct Interpreted {
    list: AttributeList,
    errors: Vec<(String, usize)>,
}

/// The attributes of one start tag.
///
/// Holds raw capture positions into the tokenizer input and decodes them at
/// most once, on first access to [`list`](Self::list) or
/// [`errors`](Self::errors).
#[derive(Debug)]
pub struct Attributes<'t> {
    input: &'t str,
    captures: Vec<AttributeCapture>,
    options: TokenizerOptions,
    interpreted: OnceCell<Interpreted>,
}

impl<'t> Attributes<'t> {
    pub(crate) const fn new(
        input: &'t str,
        captures: Vec<AttributeCapture>,
        options: TokenizerOptions,
    ) -> Self {
        Self {
            input,
            captures,
            options,
            interpreted: OnceCell::new(),
        }
    }

    /// An attribute set with nothing in it.
    #[must_use]
    pub const fn empty() -> Self {
        Self::new("", Vec::new(), TokenizerOptions {
            ignore_errors: true,
            ignore_char_refs: true,
            ignore_nulls: true,
            skip_preprocess: true,
        })
    }

    /// Number of distinct attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list().len()
    }

    /// True if the tag had no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self
            .captures
            .iter()
            .any(|capture| matches!(capture, AttributeCapture::Attribute { .. }))
    }

    /// The decoded attributes, first occurrence of each name.
    #[must_use]
    pub fn list(&self) -> &AttributeList {
        &self.interpret().list
    }

    /// Parse errors found while decoding, as `(message, position)`.
    #[must_use]
    pub fn errors(&self) -> &[(String, usize)] {
        &self.interpret().errors
    }

    /// Value of the named attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.list().get(name)
    }

    /// Take the decoded list.
    #[must_use]
    pub fn into_list(self) -> AttributeList {
        let _ = self.interpret();
        self.interpreted
            .into_inner()
            .map(|interpreted| interpreted.list)
            .unwrap_or_default()
    }

    fn interpret(&self) -> &Interpreted {
        self.interpreted.get_or_init(|| self.decode())
    }

    fn decode(&self) -> Interpreted {
        let mut list = AttributeList::new();
        let mut errors = Vec::new();
        let ignore_errors = self.options.ignore_errors;
        let mut report = |message: &str, pos: usize| {
            if !ignore_errors {
                errors.push((message.to_string(), pos));
            }
        };

        for capture in &self.captures {
            match capture {
                AttributeCapture::BareSlash(pos) => report("unexpected bare slash", *pos),
                AttributeCapture::Attribute { name, value, end } => {
                    let name_text = self.decode_name(name, &mut report);
                    let value_text = value
                        .as_ref()
                        .map(|value| self.decode_value(value, *end, &mut report))
                        .unwrap_or_default();
                    if !list.push(Attribute::new(name_text, value_text)) {
                        report("duplicate attribute", name.start);
                    }
                }
            }
        }

        Interpreted { list, errors }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "ASCII upper alpha: Append the lowercase version of the current input
    /// character ... U+0000 NULL: This is an unexpected-null-character parse
    /// error. Append a U+FFFD REPLACEMENT CHARACTER"
    fn decode_name(&self, range: &Range<usize>, report: &mut ErrorSink<'_>) -> String {
        let raw = &self.input[range.clone()];
        let name = if self.options.ignore_nulls {
            raw.into()
        } else {
            replace_nulls(raw, range.start, report)
        };
        name.to_ascii_lowercase()
    }

    fn decode_value(&self, value: &ValueCapture, end: usize, report: &mut ErrorSink<'_>) -> String {
        let start = value.range.start;
        let raw = &self.input[value.range.clone()];

        if value.quoted {
            // "After attribute value (quoted) state ... Anything else: This is
            // a missing-whitespace-between-attributes parse error."
            let next = self.input.as_bytes().get(end);
            if value.closed && next.is_some_and(|&b| !is_html_whitespace(b) && b != b'/' && b != b'>')
            {
                report("missing space between attributes", end);
            }
        } else {
            report_ascii_errors(raw, start, UNQUOTED_VALUE_ERRORS, report);
        }

        // NULs are reported against the raw value and replaced after decoding,
        // so reference errors keep their raw offsets.
        if !self.options.ignore_nulls {
            report_nulls(raw, start, report);
        }
        let text = if self.options.ignore_char_refs {
            Cow::Borrowed(raw)
        } else {
            decode_character_references(raw, start, true, report)
        };
        if self.options.ignore_nulls || !text.contains('\0') {
            text.into_owned()
        } else {
            text.replace('\0', "\u{FFFD}")
        }
    }
}
