//! Lexical states for elements whose content is not markup: RCDATA, RAWTEXT,
//! script data and PLAINTEXT.

use memchr::memchr;

use super::core::{Tokenizer, TokenizerState};
use super::fault::TokenizerFault;
use super::helpers::{
    find_bytes, find_ignore_case, is_html_whitespace, span_whitespace, starts_with_ignore_case,
};
use super::listener::TokenHandler;

impl<H: TokenHandler> Tokenizer<H> {
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    /// and [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    ///
    /// Text up to the appropriate end tag. RCDATA decodes character
    /// references, RAWTEXT does not.
    pub(super) fn text_element_state(
        &mut self,
        raw_text: bool,
    ) -> Result<TokenizerState, TokenizerFault> {
        let ignore_char_refs = raw_text || self.options.ignore_char_refs;
        let len = self.input.len();
        let Some(end_tag) = self.lexer.appropriate_end_tag().map(str::to_string) else {
            self.emit_raw_text_range(ignore_char_refs, self.pos, len);
            self.pos = len;
            return Ok(TokenizerState::Eof);
        };

        let needle = format!("</{end_tag}");
        let mut cursor = self.pos;
        loop {
            let bytes = self.input.as_bytes();
            let Some(at) = find_ignore_case(bytes, cursor, needle.as_bytes()) else {
                self.emit_raw_text_range(ignore_char_refs, self.pos, len);
                self.pos = len;
                return Ok(TokenizerState::Eof);
            };

            // "RCDATA end tag name state": the name must be followed by
            // whitespace, "/" or ">" to count as the appropriate end tag.
            let name_end = at + needle.len();
            let space = span_whitespace(bytes, name_end);
            let delimiter = name_end + space;
            let next = bytes.get(delimiter).copied();
            let after_slash = bytes.get(delimiter + 1).copied();

            match next {
                Some(b'/') if after_slash != Some(b'>') => {
                    self.emit_raw_text_range(ignore_char_refs, self.pos, at);
                    if after_slash.is_none() {
                        self.error("unclosed RCDATA/RAWTEXT element", delimiter);
                        self.pos = len;
                        return Ok(TokenizerState::Eof);
                    }
                    self.error("unexpected character", delimiter + 1);
                    self.pos = delimiter + 1;
                }
                Some(b'/' | b'>') => {
                    self.emit_raw_text_range(ignore_char_refs, self.pos, at);
                    self.pos = name_end;
                }
                _ if space > 0 => {
                    self.emit_raw_text_range(ignore_char_refs, self.pos, at);
                    self.pos = name_end;
                }
                _ => {
                    cursor = at + 1;
                    continue;
                }
            }

            return Ok(if self.consume_attributes_and_close(&end_tag, true, at)? {
                TokenizerState::Data
            } else {
                TokenizerState::Eof
            });
        }
    }

    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    /// and the escaped states that follow it.
    ///
    /// `<!--` opens an escape in which the appropriate end tag is plain text
    /// until `-->`. Inside an escape, `<script` opens a double escape that
    /// `</script` leaves. If the appropriate end tag never appears the text
    /// is dropped.
    pub(super) fn script_data_state(&mut self) -> Result<TokenizerState, TokenizerFault> {
        let len = self.input.len();
        let Some(end_tag) = self.lexer.appropriate_end_tag().map(str::to_string) else {
            self.pos = len;
            return Ok(TokenizerState::Eof);
        };

        let bytes = self.input.as_bytes();
        let mut cursor = self.pos;
        let close = loop {
            let Some(offset) = memchr(b'<', &bytes[cursor..]) else {
                break None;
            };
            let at = cursor + offset;
            if bytes[at..].starts_with(b"<!--") {
                match skip_script_escape(bytes, at + 4) {
                    Some(after) => {
                        cursor = after;
                        continue;
                    }
                    None => break None,
                }
            }
            if is_tag_open(bytes, at, b"</", end_tag.as_bytes()) {
                break Some(at);
            }
            cursor = at + 1;
        };

        let Some(at) = close else {
            log::debug!("tokenizer: script data at {} has no end tag", self.pos);
            self.pos = len;
            return Ok(TokenizerState::Eof);
        };

        self.emit_raw_text_range(true, self.pos, at);
        self.pos = at + 2 + end_tag.len();
        Ok(if self.consume_attributes_and_close(&end_tag, true, at)? {
            TokenizerState::Data
        } else {
            TokenizerState::Eof
        })
    }

    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    pub(super) fn plaintext_state(&mut self) -> TokenizerState {
        let len = self.input.len();
        self.emit_raw_text_range(true, self.pos, len);
        self.pos = len;
        TokenizerState::Eof
    }
}

/// True if `bytes[at..]` is `prefix`, then `name` in any case, then
/// whitespace, `/` or `>`.
fn is_tag_open(bytes: &[u8], at: usize, prefix: &[u8], name: &[u8]) -> bool {
    let rest = &bytes[at..];
    if !rest.starts_with(prefix) || !starts_with_ignore_case(&rest[prefix.len()..], name) {
        return false;
    }
    rest.get(prefix.len() + name.len())
        .is_some_and(|&b| is_html_whitespace(b) || b == b'/' || b == b'>')
}

/// First `prefix` + `script` tag opening at or after `from`.
fn find_script_tag(bytes: &[u8], from: usize, prefix: &[u8]) -> Option<usize> {
    let mut cursor = from;
    loop {
        let at = find_bytes(bytes, cursor, prefix)?;
        if is_tag_open(bytes, at, prefix, b"script") {
            return Some(at);
        }
        cursor = at + 1;
    }
}

/// Skip a script data escape whose `<!--` ends just before `from`.
/// Returns the offset after the closing `-->`, or `None` if the input ends
/// inside the escape.
fn skip_script_escape(bytes: &[u8], from: usize) -> Option<usize> {
    // "Script data escaped dash dash state ... U+003E GREATER-THAN SIGN (>):
    // Switch to the script data state."
    let dashes = bytes[from..].iter().take_while(|&&b| b == b'-').count();
    if bytes.get(from + dashes) == Some(&b'>') {
        return Some(from + dashes + 1);
    }

    let mut cursor = from;
    loop {
        let close = find_bytes(bytes, cursor, b"-->");
        let nested = find_script_tag(bytes, cursor, b"<");
        match (close, nested) {
            (Some(close), nested) if nested.is_none_or(|nested| close < nested) => {
                return Some(close + 3);
            }
            (_, Some(nested)) => {
                // "Script data double escaped state": ends at "-->" (back to
                // script data) or "</script" (back to escaped).
                let inner = nested + "<script".len();
                let close = find_bytes(bytes, inner, b"-->");
                let end = find_script_tag(bytes, inner, b"</");
                match (close, end) {
                    (Some(close), end) if end.is_none_or(|end| close < end) => {
                        return Some(close + 3);
                    }
                    (_, Some(end)) => cursor = end + "</script".len(),
                    _ => return None,
                }
            }
            _ => return None,
        }
    }
}
