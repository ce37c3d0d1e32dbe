use core::fmt;

/// Byte range of a token in the preprocessed input.
///
/// Every token and tree operation carries one so that errors can be mapped
/// back to the source and a sink can reproduce the original markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceRange {
    /// Offset of the first byte.
    pub start: usize,
    /// Number of bytes.
    pub length: usize,
}

impl SourceRange {
    /// Create a range from an offset and a length.
    #[must_use]
    pub const fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// A zero-length range, used for implied tokens such as an inserted `<head>`.
    #[must_use]
    pub const fn empty_at(start: usize) -> Self {
        Self { start, length: 0 }
    }

    /// Offset one past the last byte.
    #[must_use]
    pub const fn end(self) -> usize {
        self.start + self.length
    }
}

/// An attribute on a start tag token.
///
/// Per [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
/// "a list of attributes, each of which has a name and a value"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// "each of which has a name"
    pub name: String,
    /// "and a value"
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// Ordered attribute list in source order.
///
/// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
/// "if there is already an attribute on the token with the exact same name,
/// then this is a duplicate-attribute parse error and the new attribute must
/// be removed from the token."
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeList {
    attributes: Vec<Attribute>,
}

impl AttributeList {
    /// An empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            attributes: Vec::new(),
        }
    }

    /// Append an attribute unless one with the same name exists.
    /// Returns false (and drops the attribute) on a duplicate.
    pub fn push(&mut self, attribute: Attribute) -> bool {
        if self.contains(&attribute.name) {
            return false;
        }
        self.attributes.push(attribute);
        true
    }

    /// Value of the named attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Whether an attribute with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr.name == name)
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// True if there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterate in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.attributes.iter()
    }

    /// Mutable iteration, used to adjust foreign attribute names.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Attribute> {
        self.attributes.iter_mut()
    }

    /// Same names with the same values, ignoring order.
    ///
    /// This is the attribute comparison of the Noah's Ark clause.
    #[must_use]
    pub fn same_set(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .attributes
                .iter()
                .all(|attr| other.get(&attr.name) == Some(attr.value.as_str()))
    }
}

impl<'a> IntoIterator for &'a AttributeList {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for AttributeList {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut list = Self::new();
        for (name, value) in iter {
            let _ = list.push(Attribute::new(name.into(), value.into()));
        }
        list
    }
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "DOCTYPE tokens have a name, a public identifier, a system identifier,
/// and a force-quirks flag. When a DOCTYPE token is created, its name,
/// public identifier, and system identifier must be marked as missing
/// (which is a distinct state from the empty string)"
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Doctype {
    /// "a name"
    pub name: Option<String>,
    /// "a public identifier"
    pub public_id: Option<String>,
    /// "a system identifier"
    pub system_id: Option<String>,
    /// "a force-quirks flag"
    pub force_quirks: bool,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// A token as recorded by [`TokenCollector`](super::TokenCollector). The
/// tokenizer itself never builds these; it calls the listener directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A run of character data.
    Characters {
        /// Decoded text.
        text: String,
        /// Where the raw text came from.
        source: SourceRange,
    },

    /// "Start and end tag tokens have a tag name, a self-closing flag, and a
    /// list of attributes"
    StartTag {
        /// "a tag name"
        name: String,
        /// "a list of attributes"
        attributes: AttributeList,
        /// "a self-closing flag"
        self_closing: bool,
        /// Source of the whole tag.
        source: SourceRange,
    },

    /// End tag token. Attributes on end tags are reported and dropped.
    EndTag {
        /// "a tag name"
        name: String,
        /// Source of the whole tag.
        source: SourceRange,
    },

    /// "Comment and character tokens have data."
    Comment {
        /// "data"
        text: String,
        /// Source of the whole comment.
        source: SourceRange,
    },

    /// A DOCTYPE token.
    Doctype {
        /// Name, identifiers and force-quirks flag.
        doctype: Doctype,
        /// Source of the whole declaration.
        source: SourceRange,
    },

    /// End-of-file token signals the end of input.
    EndOfFile,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Characters { text, .. } => write!(f, "Characters({text:?})"),
            Self::StartTag {
                name,
                attributes,
                self_closing,
                ..
            } => {
                write!(f, "StartTag(<{name}")?;
                for attr in attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">)")
            }
            Self::EndTag { name, .. } => write!(f, "EndTag(</{name}>)"),
            Self::Comment { text, .. } => write!(f, "Comment({text:?})"),
            Self::Doctype { doctype, .. } => {
                write!(f, "Doctype(")?;
                match &doctype.name {
                    Some(name) => write!(f, "{name}")?,
                    None => write!(f, "<missing>")?,
                }
                if let Some(public_id) = &doctype.public_id {
                    write!(f, " PUBLIC {public_id:?}")?;
                }
                if let Some(system_id) = &doctype.system_id {
                    write!(f, " SYSTEM {system_id:?}")?;
                }
                if doctype.force_quirks {
                    write!(f, " force-quirks")?;
                }
                write!(f, ")")
            }
            Self::EndOfFile => write!(f, "EOF"),
        }
    }
}
