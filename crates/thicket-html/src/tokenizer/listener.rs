use super::attributes::Attributes;
use super::core::LexicalState;
use super::token::{Doctype, SourceRange, Token};

/// Receiver of tokenizer events.
///
/// The tokenizer calls exactly one method per token, in source order, and
/// waits for it to return before scanning further. Parse errors arrive on the
/// same channel through [`error`](Self::error).
pub trait TokenHandler {
    /// Called once before the first token.
    fn start_document(&mut self) {}

    /// Called once after the last token. `pos` is the input length.
    fn end_document(&mut self, pos: usize);

    /// A parse error at byte offset `pos`.
    fn error(&mut self, message: &str, pos: usize);

    /// A run of decoded character data.
    fn characters(&mut self, text: &str, source: SourceRange);

    /// A start tag.
    ///
    /// `lexer` is the tokenizer's lexical state. A tree builder that needs
    /// the following bytes scanned as RCDATA, RAWTEXT, script data or
    /// PLAINTEXT calls [`LexicalState::switch_to`] before returning.
    fn start_tag(
        &mut self,
        name: &str,
        attributes: Attributes<'_>,
        self_closing: bool,
        source: SourceRange,
        lexer: &mut LexicalState,
    );

    /// An end tag.
    fn end_tag(&mut self, name: &str, source: SourceRange);

    /// A DOCTYPE declaration.
    fn doctype(&mut self, doctype: Doctype, source: SourceRange);

    /// A comment, including bogus comments.
    fn comment(&mut self, text: &str, source: SourceRange);
}

/// A [`TokenHandler`] that records everything it is given.
///
/// Used by tests and by the CLI's `--tokens` output. Start tag attributes
/// are materialized on arrival, so attribute errors show up in `errors`
/// right after the tokenizer's own errors for that tag.
#[derive(Debug, Default)]
pub struct TokenCollector {
    /// Tokens in emission order, ending with [`Token::EndOfFile`].
    pub tokens: Vec<Token>,
    /// `(message, position)` pairs in emission order.
    pub errors: Vec<(String, usize)>,
}

impl TokenCollector {
    /// An empty collector.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Just the error messages.
    #[must_use]
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|(message, _)| message.as_str()).collect()
    }
}

impl TokenHandler for TokenCollector {
    fn end_document(&mut self, _pos: usize) {
        self.tokens.push(Token::EndOfFile);
    }

    fn error(&mut self, message: &str, pos: usize) {
        self.errors.push((message.to_string(), pos));
    }

    fn characters(&mut self, text: &str, source: SourceRange) {
        // Adjacent runs are merged so that tests see one token per text run,
        // regardless of how the scanner split it.
        if let Some(Token::Characters {
            text: previous,
            source: previous_source,
        }) = self.tokens.last_mut()
        {
            if previous_source.end() == source.start {
                previous.push_str(text);
                previous_source.length += source.length;
                return;
            }
        }
        self.tokens.push(Token::Characters {
            text: text.to_string(),
            source,
        });
    }

    fn start_tag(
        &mut self,
        name: &str,
        attributes: Attributes<'_>,
        self_closing: bool,
        source: SourceRange,
        _lexer: &mut LexicalState,
    ) {
        self.errors.extend(attributes.errors().iter().cloned());
        self.tokens.push(Token::StartTag {
            name: name.to_string(),
            attributes: attributes.into_list(),
            self_closing,
            source,
        });
    }

    fn end_tag(&mut self, name: &str, source: SourceRange) {
        self.tokens.push(Token::EndTag {
            name: name.to_string(),
            source,
        });
    }

    fn doctype(&mut self, doctype: Doctype, source: SourceRange) {
        self.tokens.push(Token::Doctype { doctype, source });
    }

    fn comment(&mut self, text: &str, source: SourceRange) {
        self.tokens.push(Token::Comment {
            text: text.to_string(),
            source,
        });
    }
}
