//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! Decoding of `&name;`, `&#NN;` and `&#xHH;` sequences inside a run of text
//! that the tokenizer has already delimited.

use std::borrow::Cow;

use memchr::memchr;

use super::helpers::ErrorSink;
use super::named_character_references::longest_match;

/// Decimal references longer than this (after leading zeros) are out of range.
const MAX_DECIMAL_DIGITS: usize = 7;
/// Hexadecimal references longer than this (after leading zeros) are out of range.
const MAX_HEX_DIGITS: usize = 6;

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// "If the number is one of the numbers in the first column of the following
/// table, then find the row with that number in the first column, and set
/// the character reference code to the number in the second column of that
/// row."
const LEGACY_REPLACEMENTS: [(u32, char); 27] = [
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

/// Windows-1252 character for a legacy C1 code point, if it has one.
#[must_use]
pub fn legacy_replacement(code_point: u32) -> Option<char> {
    LEGACY_REPLACEMENTS
        .binary_search_by_key(&code_point, |&(from, _)| from)
        .ok()
        .map(|index| LEGACY_REPLACEMENTS[index].1)
}

/// What one `&` turned into.
enum Replacement {
    Named(&'static str),
    Numeric(char),
}

/// Decode every character reference in `text`.
///
/// `base` is the offset of `text` in the input; errors are reported at the
/// offset of the `&` that started the reference. `in_attribute` enables the
/// attribute-value rule for named references without a semicolon.
///
/// Returns the input unchanged (borrowed) when nothing was decoded.
pub fn decode_character_references<'a>(
    text: &'a str,
    base: usize,
    in_attribute: bool,
    report: &mut ErrorSink<'_>,
) -> Cow<'a, str> {
    let bytes = text.as_bytes();
    let mut output = String::new();
    let mut copied = 0;
    let mut cursor = 0;
    let mut changed = false;

    while let Some(offset) = memchr(b'&', &bytes[cursor..]) {
        let amp = cursor + offset;
        let rest = &text[amp + 1..];
        let Some((consumed, replacement)) = consume_reference(rest, base + amp, in_attribute, report)
        else {
            cursor = amp + 1;
            continue;
        };
        output.push_str(&text[copied..amp]);
        match replacement {
            Replacement::Named(value) => output.push_str(value),
            Replacement::Numeric(c) => output.push(c),
        }
        copied = amp + 1 + consumed;
        cursor = copied;
        changed = true;
    }

    if !changed {
        return Cow::Borrowed(text);
    }
    output.push_str(&text[copied..]);
    Cow::Owned(output)
}

/// Interpret the reference whose `&` sits at `amp`. `rest` is the text after
/// the `&`. Returns the number of bytes of `rest` consumed, or `None` if the
/// `&` stays literal.
fn consume_reference(
    rest: &str,
    amp: usize,
    in_attribute: bool,
    report: &mut ErrorSink<'_>,
) -> Option<(usize, Replacement)> {
    match rest.as_bytes().first() {
        Some(b'#') => consume_numeric(&rest[1..], amp, report)
            .map(|(consumed, c)| (consumed + 1, Replacement::Numeric(c))),
        Some(byte) if byte.is_ascii_alphanumeric() => {
            consume_named(rest, amp, in_attribute, report)
                .map(|(consumed, value)| (consumed, Replacement::Named(value)))
        }
        _ => None,
    }
}

/// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
fn consume_named(
    rest: &str,
    amp: usize,
    in_attribute: bool,
    report: &mut ErrorSink<'_>,
) -> Option<(usize, &'static str)> {
    let Some((name, value)) = longest_match(rest) else {
        // "Otherwise ... Switch to the ambiguous ampersand state."
        report("invalid named reference", amp);
        return None;
    };

    if name.ends_with(';') {
        return Some((name.len(), value));
    }

    // "If the character reference was consumed as part of an attribute, and
    // the last character matched is not a U+003B SEMICOLON character (;), and
    // the next input character is either a U+003D EQUALS SIGN character (=)
    // or an ASCII alphanumeric, then, for historical reasons, flush code
    // points consumed as a character reference and switch to the return
    // state."
    if in_attribute {
        match rest.as_bytes().get(name.len()) {
            Some(b'=') => {
                report("invalid equals sign after named character reference", amp);
                return None;
            }
            Some(byte) if byte.is_ascii_alphanumeric() => return None,
            _ => {}
        }
    }

    report("character reference missing semicolon", amp);
    Some((name.len(), value))
}

/// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
///
/// `rest` starts after the `#`.
fn consume_numeric(rest: &str, amp: usize, report: &mut ErrorSink<'_>) -> Option<(usize, char)> {
    let bytes = rest.as_bytes();
    let hex = matches!(bytes.first(), Some(b'x' | b'X'));
    let digits_start = usize::from(hex);
    let digits = bytes[digits_start..]
        .iter()
        .take_while(|b| {
            if hex {
                b.is_ascii_hexdigit()
            } else {
                b.is_ascii_digit()
            }
        })
        .count();

    if digits == 0 {
        // "absence-of-digits-in-numeric-character-reference parse error ...
        // Flush code points consumed as a character reference."
        report("Expected digits after &#", amp);
        return None;
    }

    let digits_end = digits_start + digits;
    let has_semicolon = bytes.get(digits_end) == Some(&b';');
    let consumed = digits_end + usize::from(has_semicolon);
    if !has_semicolon {
        report("character reference missing semicolon", amp);
    }

    let significant = rest[digits_start..digits_end].trim_start_matches('0');
    let max_digits = if hex { MAX_HEX_DIGITS } else { MAX_DECIMAL_DIGITS };
    if significant.len() > max_digits {
        report("invalid numeric reference", amp);
        return Some((consumed, char::REPLACEMENT_CHARACTER));
    }

    let radix = if hex { 16 } else { 10 };
    let code_point = if significant.is_empty() {
        0
    } else {
        u32::from_str_radix(significant, radix).unwrap_or(u32::MAX)
    };
    Some((consumed, resolve_code_point(code_point, amp, report)))
}

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
fn resolve_code_point(code_point: u32, amp: usize, report: &mut ErrorSink<'_>) -> char {
    // "If the number is 0x00 ... greater than 0x10FFFF ... a surrogate ...
    // set the character reference code to 0xFFFD."
    if code_point == 0 || (0xD800..=0xDFFF).contains(&code_point) || code_point > 0x10FFFF {
        report("invalid numeric reference", amp);
        return char::REPLACEMENT_CHARACTER;
    }

    if let Some(c) = legacy_replacement(code_point) {
        report("invalid reference to non-ASCII control character", amp);
        return c;
    }

    // "If the number is a noncharacter ... If the number is 0x0D, or a
    // control that's not ASCII whitespace, then this is a
    // control-character-reference parse error."
    if is_disallowed_reference(code_point) {
        report("invalid numeric reference to control character", amp);
    }
    char::from_u32(code_point).unwrap_or(char::REPLACEMENT_CHARACTER)
}

const fn is_disallowed_reference(code_point: u32) -> bool {
    matches!(code_point, 0x01..=0x08 | 0x0B | 0x0D..=0x1F | 0x7F..=0x9F | 0xFDD0..=0xFDEF)
        || code_point & 0xFFFE == 0xFFFE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(text: &str, in_attribute: bool) -> (String, Vec<String>) {
        let mut errors = Vec::new();
        let decoded =
            decode_character_references(text, 0, in_attribute, &mut |message: &str, _| {
                errors.push(message.to_string());
            })
            .into_owned();
        (decoded, errors)
    }

    #[test]
    fn test_plain_text_is_borrowed() {
        let mut report = |_: &str, _: usize| {};
        assert!(matches!(
            decode_character_references("no references", 0, false, &mut report),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_legacy_table_lookup() {
        assert_eq!(legacy_replacement(0x80), Some('\u{20AC}'));
        assert_eq!(legacy_replacement(0x81), None);
        assert_eq!(legacy_replacement(0x9F), Some('\u{0178}'));
    }

    #[test]
    fn test_leading_zeros_do_not_count_towards_length() {
        let (text, errors) = decode("&#x00000041;", false);
        assert_eq!(text, "A");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_bare_ampersand_is_silent() {
        let (text, errors) = decode("a & b", false);
        assert_eq!(text, "a & b");
        assert!(errors.is_empty());
    }
}
