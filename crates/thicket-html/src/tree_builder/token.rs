use std::borrow::Cow;

use crate::tokenizer::{AttributeList, SourceRange};

/// A start tag as the insertion modes see it.
///
/// Owned, because "reprocess the token" hands the same tag to another
/// mode, and foreign content rewrites its name and attributes in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken {
    /// Lowercase tag name.
    pub name: String,
    /// Attributes after duplicate removal.
    pub attributes: AttributeList,
    /// "self-closing flag"
    pub self_closing: bool,
    /// Source range of the whole tag.
    pub source: SourceRange,
}

impl TagToken {
    /// A tag token.
    #[must_use]
    pub fn new(name: impl Into<String>, attributes: AttributeList, self_closing: bool, source: SourceRange) -> Self {
        Self {
            name: name.into(),
            attributes,
            self_closing,
            source,
        }
    }

    /// Whether the name is one of `names`.
    #[must_use]
    pub fn is_one_of(&self, names: &[&str]) -> bool {
        names.contains(&self.name.as_str())
    }
}

/// Tree construction whitespace: tab, LF, FF, CR and space.
#[must_use]
pub const fn is_space(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}

/// True if the text is empty or all whitespace.
#[must_use]
pub fn is_all_space(text: &str) -> bool {
    text.chars().all(is_space)
}

/// Split a character token into its leading whitespace and the rest.
///
/// Source ranges are split at the same byte count, clamped to the
/// original range; references decoded inside the text can make the rest's
/// range inexact.
#[must_use]
pub fn split_leading_space(
    text: &str,
    source: SourceRange,
) -> ((&str, SourceRange), (&str, SourceRange)) {
    let split = text.len() - text.trim_start_matches(is_space).len();
    let (space, rest) = text.split_at(split);
    let space_len = split.min(source.length);
    (
        (space, SourceRange::new(source.start, space_len)),
        (
            rest,
            SourceRange::new(source.start + space_len, source.length - space_len),
        ),
    )
}

/// Input offsets of the U+0000 characters in a character token, clamped to
/// the token's source range.
pub fn null_positions(text: &str, source: SourceRange) -> impl Iterator<Item = usize> + '_ {
    text.match_indices('\0')
        .map(move |(offset, _)| (source.start + offset).min(source.end().saturating_sub(1)))
}

/// Remove U+0000 characters.
pub fn strip_nulls(text: &str) -> Cow<'_, str> {
    if text.contains('\0') {
        Cow::Owned(text.replace('\0', ""))
    } else {
        Cow::Borrowed(text)
    }
}
