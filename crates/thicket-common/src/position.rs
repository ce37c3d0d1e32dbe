//! Byte offset to line/column mapping.
//!
//! Parse errors carry byte offsets into the preprocessed input. Humans want
//! `line:column`, so [`LineIndex`] records where every line starts and answers
//! lookups with a binary search.

/// A 1-based line and column. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineColumn {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number, starting at 1.
    pub column: usize,
}

/// Line start table for a single input buffer.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// Build the index. Only `\n` starts a new line; the tokenizer has already
    /// folded CR and CRLF into LF by the time positions are reported.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, line_starts }
    }

    /// Number of lines in the buffer. An empty buffer has one (empty) line.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Resolve a byte offset. Offsets past the end clamp to the end of the buffer,
    /// and offsets inside a multi-byte character resolve to that character.
    #[must_use]
    pub fn locate(&self, offset: usize) -> LineColumn {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let column = self.text[start..]
            .char_indices()
            .take_while(|&(i, _)| start + i < offset)
            .count();
        LineColumn {
            line: line + 1,
            column: column + 1,
        }
    }
}
