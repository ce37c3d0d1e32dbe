use std::borrow::Cow;

use memchr::memchr;
use strum_macros::Display;

use super::attributes::{AttributeCapture, Attributes, scan_attributes};
use super::character_reference::decode_character_references;
use super::fault::TokenizerFault;
use super::helpers::{
    disallowed_positions, find_bytes, normalize_newlines, replace_nulls, report_ascii_errors, report_nulls,
    span_until, span_whitespace, starts_with_ignore_case,
};
use super::listener::TokenHandler;
use super::options::TokenizerOptions;
use super::token::{Doctype, SourceRange};

/// The lexical states the tokenizer can be driven from.
///
/// The character-level states of
/// [§ 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
/// are folded into pattern scans; only the states that the tree builder
/// can select remain visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// Nothing consumed yet; reports the start of the document.
    Start,
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    #[strum(serialize = "RCDATA")]
    RcData,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    #[strum(serialize = "RAWTEXT")]
    RawText,
    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    ScriptData,
    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    #[strum(serialize = "PLAINTEXT")]
    PlainText,
    /// All input consumed.
    #[strum(serialize = "EOF")]
    Eof,
}

/// The part of the tokenizer the tree builder is allowed to change.
///
/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
/// "The appropriate end tag token is an end tag token whose tag name matches
/// the tag name of the last start tag to have been emitted from this
/// tokenizer, if any."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalState {
    state: TokenizerState,
    appropriate_end_tag: Option<String>,
}

impl LexicalState {
    const fn new(state: TokenizerState) -> Self {
        Self {
            state,
            appropriate_end_tag: None,
        }
    }

    /// Switch the lexical state for the bytes after the current tag.
    ///
    /// `appropriate_end_tag` is the lowercase name that ends an RCDATA,
    /// RAWTEXT or script data region.
    pub fn switch_to(&mut self, state: TokenizerState, appropriate_end_tag: Option<&str>) {
        log::debug!(
            "tokenizer: switch to {state} (end tag {})",
            appropriate_end_tag.unwrap_or("-")
        );
        self.state = state;
        self.appropriate_end_tag = appropriate_end_tag.map(str::to_string);
    }

    /// Current lexical state.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Name that closes the current raw text region.
    #[must_use]
    pub fn appropriate_end_tag(&self) -> Option<&str> {
        self.appropriate_end_tag.as_deref()
    }
}

/// A construct found at a `<` in the data state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Markup {
    StartTag,
    EndTag,
    Comment,
    Doctype,
    CData,
    Bogus,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// Scans an input buffer and reports tokens to a [`TokenHandler`].
///
/// The tokenizer owns the (preprocessed) input and a cursor into it. Each
/// lexical state is a scan from the cursor to the next construct that state
/// cares about; text before it is decoded and reported, then the construct
/// itself is interpreted.
pub struct Tokenizer<H: TokenHandler> {
    pub(super) input: String,
    pub(super) pos: usize,
    pub(super) lexer: LexicalState,
    pub(super) options: TokenizerOptions,
    pub(super) handler: H,
    preprocessed: bool,
    stepping: bool,
    finished: bool,
}

impl<H: TokenHandler> Tokenizer<H> {
    /// Create a tokenizer over `input`. Nothing is scanned until
    /// [`execute`](Self::execute) or [`step`](Self::step) is called.
    pub fn new(input: impl Into<String>, options: TokenizerOptions, handler: H) -> Self {
        Self {
            input: input.into(),
            pos: 0,
            lexer: LexicalState::new(TokenizerState::Start),
            options,
            handler,
            preprocessed: false,
            stepping: false,
            finished: false,
        }
    }

    /// The listener.
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// The listener, mutably.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consume the tokenizer and return the listener.
    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Current lexical state.
    pub const fn lexical_state(&self) -> &LexicalState {
        &self.lexer
    }

    /// The input after newline normalization. Offsets in tokens and errors
    /// refer to this text.
    pub fn preprocessed_input(&self) -> &str {
        &self.input
    }

    /// Tokenize the whole input, starting in `state`.
    ///
    /// Starting in anything other than [`TokenizerState::Start`] skips the
    /// start-of-document notification; fragment parsing uses this with the
    /// state and end tag implied by the context element.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenizerFault`] if the scanner's internal invariants are
    /// violated. Malformed input is never a fault.
    pub fn execute(
        &mut self,
        state: TokenizerState,
        appropriate_end_tag: Option<&str>,
    ) -> Result<(), TokenizerFault> {
        self.preprocess();
        self.lexer.switch_to(state, appropriate_end_tag);
        let _ = self.run(true)?;
        Ok(())
    }

    /// Prepare for incremental tokenizing with [`step`](Self::step).
    pub fn begin_stepping(&mut self) {
        self.preprocess();
        self.stepping = true;
    }

    /// Tokenize up to the next token boundary.
    ///
    /// Returns `Ok(false)` once the end of the document has been reported.
    ///
    /// # Errors
    ///
    /// [`TokenizerFault::NotStepping`] if [`begin_stepping`](Self::begin_stepping)
    /// was not called, [`TokenizerFault::AlreadyFinished`] after the end of
    /// the document, or an internal scanner fault.
    pub fn step(&mut self) -> Result<bool, TokenizerFault> {
        if !self.stepping {
            return Err(TokenizerFault::NotStepping);
        }
        if self.finished {
            return Err(TokenizerFault::AlreadyFinished);
        }
        self.run(false)
    }

    /// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
    fn preprocess(&mut self) {
        if self.preprocessed || self.options.skip_preprocess {
            return;
        }
        self.preprocessed = true;

        if memchr(b'\r', self.input.as_bytes()).is_some() {
            self.input = normalize_newlines(&self.input).into_owned();
        }
        if !self.options.ignore_errors {
            for pos in disallowed_positions(&self.input) {
                self.handler.error("disallowed control character", pos);
            }
        }
    }

    fn run(&mut self, keep_going: bool) -> Result<bool, TokenizerFault> {
        loop {
            let next = match self.lexer.state {
                TokenizerState::Start => {
                    log::debug!("tokenizer: start of document");
                    self.handler.start_document();
                    TokenizerState::Data
                }
                TokenizerState::Data => self.data_state(keep_going)?,
                TokenizerState::RcData => self.text_element_state(false)?,
                TokenizerState::RawText => self.text_element_state(true)?,
                TokenizerState::ScriptData => self.script_data_state()?,
                TokenizerState::PlainText => self.plaintext_state(),
                TokenizerState::Eof => {
                    log::debug!("tokenizer: end of document at {}", self.input.len());
                    self.handler.end_document(self.input.len());
                    self.finished = true;
                    return Ok(false);
                }
            };
            self.lexer.state = next;
            if !keep_going && next != TokenizerState::Eof {
                return Ok(true);
            }
        }
    }

    pub(super) fn error(&mut self, message: &str, pos: usize) {
        if !self.options.ignore_errors {
            self.handler.error(message, pos);
        }
    }

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn data_state(&mut self, keep_going: bool) -> Result<TokenizerState, TokenizerFault> {
        loop {
            let Some((start, markup)) = self.find_markup(self.pos) else {
                self.emit_data_range(self.pos, self.input.len());
                self.pos = self.input.len();
                return Ok(TokenizerState::Eof);
            };
            self.emit_data_range(self.pos, start);
            self.pos = start;

            let next = match markup {
                Markup::StartTag | Markup::EndTag => {
                    if self.tag(start, markup == Markup::EndTag)? {
                        self.lexer.state
                    } else {
                        TokenizerState::Eof
                    }
                }
                Markup::Comment => {
                    self.comment(start);
                    TokenizerState::Data
                }
                Markup::Doctype => {
                    self.doctype(start);
                    TokenizerState::Data
                }
                Markup::CData => self.cdata(start),
                Markup::Bogus => {
                    self.bogus_comment(start);
                    TokenizerState::Data
                }
            };

            if next != TokenizerState::Data || !keep_going {
                return Ok(next);
            }
        }
    }

    /// Find the next `<` that starts a construct, in priority order: tag,
    /// comment, DOCTYPE, CDATA section, bogus comment. A `<` followed by
    /// anything else is text.
    fn find_markup(&self, from: usize) -> Option<(usize, Markup)> {
        let bytes = self.input.as_bytes();
        let mut cursor = from;
        while cursor < bytes.len() {
            let at = cursor + memchr(b'<', &bytes[cursor..])?;
            let rest = &bytes[at + 1..];
            let markup = match rest {
                [first, ..] if first.is_ascii_alphabetic() => Some(Markup::StartTag),
                [b'/', second, ..] if second.is_ascii_alphabetic() => Some(Markup::EndTag),
                [b'!', b'-', b'-', ..] => Some(Markup::Comment),
                [b'!', tail @ ..] if starts_with_ignore_case(tail, b"DOCTYPE") => {
                    Some(Markup::Doctype)
                }
                [b'!', b'[', b'C', b'D', b'A', b'T', b'A', b'[', ..] => Some(Markup::CData),
                [b'!' | b'?' | b'/', ..] => Some(Markup::Bogus),
                _ => None,
            };
            if let Some(markup) = markup {
                return Some((at, markup));
            }
            cursor = at + 1;
        }
        None
    }

    /// Report text in the data state: character references are decoded,
    /// NULs are kept.
    fn emit_data_range(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let text = &self.input[start..end];
        let ignore_errors = self.options.ignore_errors;
        let handler = &mut self.handler;
        let mut report = |message: &str, pos: usize| {
            if !ignore_errors {
                handler.error(message, pos);
            }
        };
        if !ignore_errors {
            // "U+0000 NULL: This is an unexpected-null-character parse error.
            // Emit the current input character as a character token."
            report_ascii_errors(text, start, b"<\0", &mut report);
        }
        let decoded = if self.options.ignore_char_refs {
            text.into()
        } else {
            decode_character_references(text, start, false, &mut report)
        };
        self.handler
            .characters(&decoded, SourceRange::new(start, end - start));
    }

    /// Report text of a raw text region: character references are decoded
    /// unless `ignore_char_refs`, NULs are replaced.
    pub(super) fn emit_raw_text_range(&mut self, ignore_char_refs: bool, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let text = &self.input[start..end];
        let ignore_errors = self.options.ignore_errors;
        let ignore_nulls = self.options.ignore_nulls;
        let handler = &mut self.handler;
        let mut report = |message: &str, pos: usize| {
            if !ignore_errors {
                handler.error(message, pos);
            }
        };
        if !ignore_nulls {
            report_nulls(text, start, &mut report);
        }
        let decoded = if ignore_char_refs {
            text.into()
        } else {
            decode_character_references(text, start, false, &mut report)
        };
        let decoded: Cow<'_, str> = if ignore_nulls || memchr(0, decoded.as_bytes()).is_none() {
            decoded
        } else {
            decoded.replace('\0', "\u{FFFD}").into()
        };
        self.handler
            .characters(&decoded, SourceRange::new(start, end - start));
    }

    /// NUL replacement for tag names, comment text and DOCTYPE fields.
    fn replace_nulls_at(&mut self, start: usize, end: usize) -> String {
        let text = &self.input[start..end];
        if self.options.ignore_nulls {
            return text.to_string();
        }
        let ignore_errors = self.options.ignore_errors;
        let handler = &mut self.handler;
        replace_nulls(text, start, &mut |message: &str, pos: usize| {
            if !ignore_errors {
                handler.error(message, pos);
            }
        })
        .into_owned()
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    ///
    /// `start` is the offset of the `<`. Returns false if the input ended
    /// inside the tag.
    fn tag(&mut self, start: usize, is_end: bool) -> Result<bool, TokenizerFault> {
        let name_start = start + if is_end { 2 } else { 1 };
        let bytes = self.input.as_bytes();
        let name_end = name_start + 1 + span_until(bytes, name_start + 1, b"\t\n\x0C />");
        // "ASCII upper alpha: Append the lowercase version of the current
        // input character"
        let name = self
            .replace_nulls_at(name_start, name_end)
            .to_ascii_lowercase();
        self.pos = name_end;
        self.consume_attributes_and_close(&name, is_end, start)
    }

    /// Scan attributes from the cursor, then close the tag.
    pub(super) fn consume_attributes_and_close(
        &mut self,
        name: &str,
        is_end: bool,
        start: usize,
    ) -> Result<bool, TokenizerFault> {
        let (captures, after) = scan_attributes(&self.input, self.pos);
        self.pos = after;
        self.close_tag(name, captures, is_end, start)
    }

    /// Shared tag closing: expects `/>` or `>` at the cursor.
    fn close_tag(
        &mut self,
        name: &str,
        captures: Vec<AttributeCapture>,
        is_end: bool,
        start: usize,
    ) -> Result<bool, TokenizerFault> {
        let pos = self.pos;
        let bytes = self.input.as_bytes();
        if pos >= bytes.len() {
            // "EOF: This is an eof-in-tag parse error. Emit an end-of-file token."
            self.error("unexpected end of file inside tag", pos);
            return Ok(false);
        }

        let self_closing = match (bytes[pos], bytes.get(pos + 1)) {
            (b'/', Some(b'>')) => true,
            (b'>', _) => false,
            _ => {
                return Err(TokenizerFault::MissingTagClose {
                    pos,
                    found: self.input[pos..].chars().next().unwrap_or_default(),
                });
            }
        };
        let has_attributes = captures
            .iter()
            .any(|capture| matches!(capture, AttributeCapture::Attribute { .. }));
        self.pos = pos + if self_closing { 2 } else { 1 };
        let source = SourceRange::new(start, self.pos - start);

        if is_end {
            if has_attributes {
                self.error("end tag has an attribute", pos);
            }
            if self_closing {
                self.error("self-closing end tag", pos);
            }
            self.handler.end_tag(name, source);
        } else {
            let attributes = Attributes::new(&self.input, captures, self.options);
            self.handler
                .start_tag(name, attributes, self_closing, source, &mut self.lexer);
        }
        Ok(true)
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    /// through
    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    fn comment(&mut self, start: usize) {
        let body_start = start + 4;
        let bytes = self.input.as_bytes();
        let rest = &bytes[body_start..];

        // "Comment start dash state ... U+003E GREATER-THAN SIGN (>): This
        // is an abrupt-closing-of-empty-comment parse error." A `>` directly
        // after `<!--` is handled as a bare close below.
        if rest.starts_with(b"->") {
            let end = body_start + 2;
            self.error("not enough dashes in empty comment", start);
            self.pos = end;
            self.handler
                .comment("", SourceRange::new(start, end - start));
            return;
        }

        let close = find_comment_close(bytes, body_start);
        let (body_end, end) = match close {
            Some((at, close)) => {
                let length = match close {
                    CommentClose::Dashes => 3,
                    CommentClose::Bang => {
                        self.error("invalid comment end bang", at);
                        4
                    }
                    CommentClose::Bare => {
                        self.error("comment ended without dashes", at);
                        1
                    }
                };
                (at, at + length)
            }
            None => {
                // "EOF: This is an eof-in-comment parse error. Emit the
                // comment token." Dashes seen in the comment end states are
                // not part of the data.
                let len = bytes.len();
                let trailing = bytes[body_start..]
                    .iter()
                    .rev()
                    .take(2)
                    .take_while(|&&b| b == b'-')
                    .count();
                self.error("EOF in comment", len);
                (len - trailing, len)
            }
        };

        self.report_comment_dashes(body_start, body_end);
        let text = self.replace_nulls_at(body_start, body_end);
        self.pos = end;
        self.handler
            .comment(&text, SourceRange::new(start, end - start));
    }

    /// Each dash before the closing `--` and each `--` elsewhere in the
    /// comment body is an error.
    fn report_comment_dashes(&mut self, body_start: usize, body_end: usize) {
        if self.options.ignore_errors {
            return;
        }
        let body = &self.input.as_bytes()[body_start..body_end];
        let trailing = body.iter().rev().take_while(|&&b| b == b'-').count();
        let mut errors = Vec::new();
        for offset in 0..trailing {
            errors.push(("invalid extra dash at comment end", body_end - trailing + offset));
        }
        let inner = &body[..body.len() - trailing];
        let mut cursor = 0;
        while let Some(found) = find_bytes(inner, cursor, b"--") {
            errors.push(("bare \"--\" found in comment", body_start + found));
            cursor = found + 2;
        }
        errors.sort_by_key(|&(_, pos)| pos);
        for (message, pos) in errors {
            self.handler.error(message, pos);
        }
    }

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    /// through
    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    fn doctype(&mut self, start: usize) {
        let keyword_end = start + "<!DOCTYPE".len();
        let mut cursor = keyword_end;
        let mut doctype = Doctype::default();

        let leading_space = span_whitespace(self.input.as_bytes(), cursor);
        cursor += leading_space;
        let name_start = cursor;
        cursor += span_until(self.input.as_bytes(), cursor, b"\t\n\x0C >");
        let name_end = cursor;
        if name_end > name_start {
            // "Set the token's name to the lowercase version of the current
            // input character."
            if leading_space == 0 {
                self.error("missing whitespace", keyword_end);
            }
            doctype.name = Some(self.replace_nulls_at(name_start, name_end).to_ascii_lowercase());
        }
        cursor += span_whitespace(self.input.as_bytes(), cursor);

        let rest = &self.input.as_bytes()[cursor..];
        if starts_with_ignore_case(rest, b"PUBLIC") {
            cursor = self.doctype_public(cursor + 6, &mut doctype);
        } else if starts_with_ignore_case(rest, b"SYSTEM") {
            cursor = self.doctype_system(cursor + 6, &mut doctype);
        }

        let bytes = self.input.as_bytes();
        cursor += span_whitespace(bytes, cursor);
        let bogus_start = cursor;
        cursor += span_until(bytes, cursor, b">");
        let has_bogus = cursor > bogus_start;
        let eof = cursor >= bytes.len();
        let end = if eof { cursor } else { cursor + 1 };

        if eof {
            // "EOF: This is an eof-in-doctype parse error. Set the current
            // DOCTYPE token's force-quirks flag to on."
            self.error("unterminated DOCTYPE", cursor);
            doctype.force_quirks = true;
        }
        if has_bogus {
            self.error("invalid DOCTYPE contents", bogus_start);
            doctype.force_quirks = true;
        }
        if doctype.name.is_none() {
            if !eof {
                self.error("missing DOCTYPE name", keyword_end);
            }
            doctype.force_quirks = true;
        }

        self.pos = end;
        self.handler
            .doctype(doctype, SourceRange::new(start, end - start));
    }

    /// After the `PUBLIC` keyword. Returns the cursor after the identifiers.
    fn doctype_public(&mut self, keyword_end: usize, doctype: &mut Doctype) -> usize {
        let bytes = self.input.as_bytes();
        let space = span_whitespace(bytes, keyword_end);
        let mut cursor = keyword_end + space;
        let at_eof = cursor >= bytes.len();
        if space == 0 && !at_eof && is_quote(bytes[cursor]) {
            self.error("missing whitespace", keyword_end);
        }

        match self.doctype_identifier(cursor) {
            Some((value, after, closed)) => {
                doctype.public_id = Some(value);
                cursor = after;
                if closed {
                    // "After DOCTYPE public identifier state"
                    let bytes = self.input.as_bytes();
                    let space = span_whitespace(bytes, cursor);
                    if bytes.get(cursor + space).copied().is_some_and(is_quote) {
                        if space == 0 {
                            self.error("missing whitespace", cursor);
                        }
                        if let Some((value, after, _)) = self.doctype_identifier(cursor + space) {
                            doctype.system_id = Some(value);
                            cursor = after;
                        }
                    }
                } else {
                    doctype.force_quirks = true;
                }
            }
            None => {
                if !at_eof {
                    self.error("missing public identifier", cursor);
                }
                doctype.force_quirks = true;
            }
        }
        cursor
    }

    /// After the `SYSTEM` keyword. Returns the cursor after the identifier.
    fn doctype_system(&mut self, keyword_end: usize, doctype: &mut Doctype) -> usize {
        let bytes = self.input.as_bytes();
        let space = span_whitespace(bytes, keyword_end);
        let cursor = keyword_end + space;
        let at_eof = cursor >= bytes.len();
        if space == 0 && !at_eof && is_quote(bytes[cursor]) {
            self.error("missing whitespace", keyword_end);
        }

        match self.doctype_identifier(cursor) {
            Some((value, after, closed)) => {
                doctype.system_id = Some(value);
                if !closed {
                    doctype.force_quirks = true;
                }
                after
            }
            None => {
                if !at_eof {
                    self.error("missing system identifier", cursor);
                }
                doctype.force_quirks = true;
                cursor
            }
        }
    }

    /// A quoted DOCTYPE identifier at `at`. Returns the value, the cursor
    /// after it and whether the closing quote was present.
    ///
    /// "DOCTYPE public identifier (double-quoted) state ... U+003E
    /// GREATER-THAN SIGN (>): This is an abrupt-doctype-public-identifier
    /// parse error. Set the current DOCTYPE token's force-quirks flag to on."
    fn doctype_identifier(&mut self, at: usize) -> Option<(String, usize, bool)> {
        let bytes = self.input.as_bytes();
        let quote = *bytes.get(at).filter(|&&b| is_quote(b))?;
        let value_start = at + 1;
        let value_end = value_start + span_until(bytes, value_start, &[quote, b'>']);
        let closed = bytes.get(value_end) == Some(&quote);
        if bytes.get(value_end) == Some(&b'>') {
            self.error("DOCTYPE identifier terminated by \">\"", value_end);
        }
        let value = self.replace_nulls_at(value_start, value_end);
        Some((value, if closed { value_end + 1 } else { value_end }, closed))
    }

    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    ///
    /// Only reached in foreign content in a browser; here CDATA text is
    /// reported as literal characters wherever it appears.
    fn cdata(&mut self, start: usize) -> TokenizerState {
        let text_start = start + "<![CDATA[".len();
        let bytes = self.input.as_bytes();
        if let Some(close) = find_bytes(bytes, text_start, b"]]>") {
            self.pos = close + 3;
            self.emit_cdata(text_start, close);
            TokenizerState::Data
        } else {
            let len = bytes.len();
            self.error("unterminated CDATA section", len);
            self.pos = len;
            self.emit_cdata(text_start, len);
            TokenizerState::Eof
        }
    }

    fn emit_cdata(&mut self, start: usize, end: usize) {
        if start < end {
            self.handler
                .characters(&self.input[start..end], SourceRange::new(start, end - start));
        }
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn bogus_comment(&mut self, start: usize) {
        let bytes = self.input.as_bytes();
        let lead = bytes[start + 1];
        let content_end = start + 1 + span_until(bytes, start + 1, b">");
        let closed = content_end < bytes.len();
        let end = if closed { content_end + 1 } else { content_end };
        self.pos = end;

        if lead == b'/' {
            if closed && content_end == start + 2 {
                // "</>": "This is a missing-end-tag-name parse error. Switch
                // to the data state."
                self.error("empty end tag", start);
                return;
            }
            if !closed && content_end == start + 2 {
                // "EOF: This is an eof-before-tag-name parse error. Emit a
                // U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS
                // character token and an end-of-file token."
                self.error("EOF in end tag", start);
                self.handler.characters("</", SourceRange::new(start, 2));
                return;
            }
        }

        self.error(
            &format!("unexpected <{} interpreted as bogus comment", char::from(lead)),
            start,
        );
        let text_start = if lead == b'?' { start + 1 } else { start + 2 };
        let text = self.replace_nulls_at(text_start, content_end);
        self.handler
            .comment(&text, SourceRange::new(start, end - start));
    }
}

const fn is_quote(byte: u8) -> bool {
    byte == b'"' || byte == b'\''
}

/// Where the comment body ends and how the comment was closed. The first `>` closes the comment: `-->`, `--!>`, or a bare `>`.
fn find_comment_close(bytes: &[u8], from: usize) -> Option<(usize, CommentClose)> {
    let gt = from + memchr(b'>', &bytes[from..])?;
    let body = &bytes[from..gt];
    if body.ends_with(b"--!") {
        Some((gt - 3, CommentClose::Bang))
    } else if body.ends_with(b"--") {
        Some((gt - 2, CommentClose::Dashes))
    } else {
        Some((gt, CommentClose::Bare))
    }
}

/// How a comment was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentClose {
    /// `-->`
    Dashes,
    /// `--!>`
    Bang,
    /// `>` without the dashes.
    Bare,
}
