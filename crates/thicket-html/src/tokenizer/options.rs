use serde::{Deserialize, Serialize};

/// Switches that trade conformance checking for speed.
///
/// All default to `false`, which gives a fully conforming tokenizer that
/// reports every parse error it can detect. The struct deserializes from the
/// `tokenizer` table of a parser configuration file; missing keys keep their
/// defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct TokenizerOptions {
    /// Do not report parse errors to the listener.
    pub ignore_errors: bool,
    /// Leave `&name;` and `&#NN;` sequences undecoded.
    pub ignore_char_refs: bool,
    /// Leave NUL bytes in place instead of replacing them with U+FFFD.
    pub ignore_nulls: bool,
    /// Assume the input already has normalized newlines and no
    /// disallowed control characters.
    pub skip_preprocess: bool,
}

impl TokenizerOptions {
    /// Set [`ignore_errors`](Self::ignore_errors).
    #[must_use]
    pub const fn with_ignore_errors(mut self, value: bool) -> Self {
        self.ignore_errors = value;
        self
    }

    /// Set [`ignore_char_refs`](Self::ignore_char_refs).
    #[must_use]
    pub const fn with_ignore_char_refs(mut self, value: bool) -> Self {
        self.ignore_char_refs = value;
        self
    }

    /// Set [`ignore_nulls`](Self::ignore_nulls).
    #[must_use]
    pub const fn with_ignore_nulls(mut self, value: bool) -> Self {
        self.ignore_nulls = value;
        self
    }

    /// Set [`skip_preprocess`](Self::skip_preprocess).
    #[must_use]
    pub const fn with_skip_preprocess(mut self, value: bool) -> Self {
        self.skip_preprocess = value;
        self
    }
}
