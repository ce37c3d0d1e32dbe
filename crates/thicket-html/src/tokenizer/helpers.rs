//! Byte-level scanning primitives shared by the tokenizer states.

use std::borrow::Cow;

use memchr::{memchr, memmem};

/// Error sink used by the decoding helpers: `(message, position)`.
pub type ErrorSink<'a> = dyn FnMut(&str, usize) + 'a;

/// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
/// whitespace: "U+0009 CHARACTER TABULATION (tab), U+000A LINE FEED (LF),
/// U+000C FORM FEED (FF), U+0020 SPACE"
#[must_use]
pub const fn is_html_whitespace(byte: u8) -> bool {
    matches!(byte, b'\t' | b'\n' | 0x0C | b' ')
}

/// Number of whitespace bytes starting at `from`.
#[must_use]
pub fn span_whitespace(bytes: &[u8], from: usize) -> usize {
    bytes
        .get(from..)
        .map_or(0, |rest| rest.iter().take_while(|&&b| is_html_whitespace(b)).count())
}

/// Number of bytes starting at `from` that are not in `stop`.
#[must_use]
pub fn span_until(bytes: &[u8], from: usize, stop: &[u8]) -> usize {
    bytes
        .get(from..)
        .map_or(0, |rest| rest.iter().take_while(|b| !stop.contains(b)).count())
}

/// ASCII case-insensitive prefix test.
#[must_use]
pub fn starts_with_ignore_case(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack[..needle.len()].eq_ignore_ascii_case(needle)
}

/// First offset at or after `from` where `needle` occurs, ignoring ASCII case.
/// `needle` must start with a byte that has no case (such as `<`).
#[must_use]
pub fn find_ignore_case(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    let (&first, _) = needle.split_first()?;
    let mut cursor = from;
    while cursor < bytes.len() {
        let found = cursor + memchr(first, &bytes[cursor..])?;
        if starts_with_ignore_case(&bytes[found..], needle) {
            return Some(found);
        }
        cursor = found + 1;
    }
    None
}

/// First offset at or after `from` where `needle` occurs exactly.
#[must_use]
pub fn find_bytes(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    memmem::find(bytes.get(from..)?, needle).map(|found| from + found)
}

/// Replace every NUL in `text` with U+FFFD, reporting each one.
///
/// `base` is the offset of `text` in the input.
pub fn replace_nulls<'a>(text: &'a str, base: usize, report: &mut ErrorSink<'_>) -> Cow<'a, str> {
    if memchr(0, text.as_bytes()).is_none() {
        return Cow::Borrowed(text);
    }
    report_nulls(text, base, report);
    Cow::Owned(text.replace('\0', "\u{FFFD}"))
}

/// Report each NUL in `text` as replaced, without replacing it.
///
/// Used where references are decoded after the errors are reported, so that
/// offsets still refer to the raw text.
pub fn report_nulls(text: &str, base: usize, report: &mut ErrorSink<'_>) {
    for (offset, _) in text.match_indices('\0') {
        report("replaced null character", base + offset);
    }
}

/// Report an error for each byte of `text` found in `mask`.
///
/// Printable characters are quoted (`unexpected "<"`), the rest are shown as
/// code points (`unexpected U+0000`).
pub fn report_ascii_errors(text: &str, base: usize, mask: &[u8], report: &mut ErrorSink<'_>) {
    for (offset, &byte) in text.as_bytes().iter().enumerate() {
        if !mask.contains(&byte) {
            continue;
        }
        let message = if byte < 0x20 || byte >= 0x7F {
            format!("unexpected U+{byte:04X}")
        } else {
            format!("unexpected \"{}\"", char::from(byte))
        };
        report(&message, base + offset);
    }
}

/// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
///
/// "To normalize newlines in a string, replace every U+000D CR U+000A LF
/// code point pair with a single U+000A LF code point, and then replace
/// every remaining U+000D CR code point with a U+000A LF code point."
#[must_use]
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if memchr(b'\r', text.as_bytes()).is_none() {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// [§ 13.2.3.5](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
///
/// "Any occurrences of any characters in the ranges U+0001 to U+0008,
/// U+000E to U+001F, U+007F to U+009F, U+FDD0 to U+FDEF, and characters
/// U+000B, U+FFFE, U+FFFF, U+1FFFE, U+1FFFF, ... U+10FFFE, and U+10FFFF
/// are parse errors."
#[must_use]
pub const fn is_disallowed_code_point(code_point: u32) -> bool {
    matches!(code_point, 0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F..=0x9F | 0xFDD0..=0xFDEF)
        || code_point & 0xFFFE == 0xFFFE
}

/// Offsets of every disallowed character in `text`.
pub fn disallowed_positions(text: &str) -> impl Iterator<Item = usize> + '_ {
    text.char_indices()
        .filter(|&(_, c)| is_disallowed_code_point(c as u32))
        .map(|(offset, _)| offset)
}
