use thiserror::Error;

/// A condition the tokenizer cannot recover from.
///
/// Parse errors are not faults; they go to
/// [`TokenHandler::error`](super::TokenHandler::error) and tokenizing continues.
/// A fault means the caller misused the API or the scanner reached a state
/// its patterns should make impossible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizerFault {
    /// `step` was called before `begin_stepping`.
    #[error("step() called without begin_stepping()")]
    NotStepping,

    /// `step` was called after the end of the document was reported.
    #[error("step() called after end of document")]
    AlreadyFinished,

    /// After a tag's attributes the scanner expected `>` or `/>`.
    #[error("expected end of tag at byte {pos}, found {found:?}")]
    MissingTagClose {
        /// Offset where the tag should have closed.
        pos: usize,
        /// The character found there.
        found: char,
    },
}
