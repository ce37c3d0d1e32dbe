//! Integration tests for the HTML tokenizer.

use thicket_html::tokenizer::{
    Token, TokenCollector, Tokenizer, TokenizerFault, TokenizerOptions, TokenizerState,
};

/// Tokenize a string from the start of a document.
fn collect(input: &str) -> TokenCollector {
    collect_from(input, TokenizerState::Start, None, TokenizerOptions::default())
}

fn collect_from(
    input: &str,
    state: TokenizerState,
    end_tag: Option<&str>,
    options: TokenizerOptions,
) -> TokenCollector {
    let mut tokenizer = Tokenizer::new(input, options, TokenCollector::new());
    tokenizer
        .execute(state, end_tag)
        .expect("tokenizer fault");
    tokenizer.into_handler()
}

fn tokenize(input: &str) -> Vec<Token> {
    collect(input).tokens
}

/// Tokens rendered with their `Display` impl, without the trailing EOF.
fn render(input: &str) -> Vec<String> {
    let mut tokens = tokenize(input);
    assert_eq!(tokens.pop(), Some(Token::EndOfFile));
    tokens.iter().map(ToString::to_string).collect()
}

/// Text of the first token, which must be characters.
fn first_text(tokens: &[Token]) -> &str {
    match tokens.first() {
        Some(Token::Characters { text, .. }) => text,
        other => panic!("expected characters, got {other:?}"),
    }
}

fn errors(input: &str) -> Vec<String> {
    collect(input)
        .error_messages()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ========== Text and tags ==========

#[test]
fn test_plain_text() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::Characters { text, source } => {
            assert_eq!(text, "Hello");
            assert_eq!(source.start, 0);
            assert_eq!(source.length, 5);
        }
        other => panic!("expected characters, got {other}"),
    }
    assert_eq!(tokens[1], Token::EndOfFile);
}

#[test]
fn test_empty_input_is_just_eof() {
    assert_eq!(tokenize(""), vec![Token::EndOfFile]);
}

#[test]
fn test_start_and_end_tags() {
    assert_eq!(
        render("<div>text</div>"),
        ["StartTag(<div>)", "Characters(\"text\")", "EndTag(</div>)"]
    );
}

#[test]
fn test_tag_names_are_lowercased() {
    assert_eq!(render("<DiV></DIV>"), ["StartTag(<div>)", "EndTag(</div>)"]);
}

#[test]
fn test_self_closing_flag() {
    match &tokenize("<br/>")[0] {
        Token::StartTag {
            name, self_closing, ..
        } => {
            assert_eq!(name, "br");
            assert!(self_closing);
        }
        other => panic!("expected start tag, got {other}"),
    }
}

#[test]
fn test_tag_source_range_covers_whole_tag() {
    match &tokenize("ab<p class=x>")[1] {
        Token::StartTag { source, .. } => {
            assert_eq!(source.start, 2);
            assert_eq!(source.end(), 13);
        }
        other => panic!("expected start tag, got {other}"),
    }
}

#[test]
fn test_lone_less_than_is_text() {
    assert_eq!(render("a < b"), ["Characters(\"a < b\")"]);
    assert_eq!(errors("a < b"), ["unexpected \"<\""]);
}

#[test]
fn test_eof_inside_tag_drops_the_tag() {
    let collected = collect("text<div class=");
    assert_eq!(collected.tokens.len(), 2);
    assert_eq!(
        collected.error_messages(),
        ["unexpected end of file inside tag"]
    );
}

#[test]
fn test_end_tag_with_attributes_is_an_error() {
    assert_eq!(render("</p class=x>"), ["EndTag(</p>)"]);
    assert_eq!(errors("</p class=x>"), ["end tag has an attribute"]);
    assert_eq!(errors("</br/>"), ["self-closing end tag"]);
}

#[test]
fn test_empty_end_tag_is_dropped() {
    assert_eq!(render("a</>b"), ["Characters(\"a\")", "Characters(\"b\")"]);
    assert_eq!(errors("a</>b"), ["empty end tag"]);
}

#[test]
fn test_eof_after_end_tag_open_emits_text() {
    let collected = collect("</");
    assert_eq!(
        collected.tokens[0].to_string(),
        "Characters(\"</\")"
    );
    assert_eq!(collected.error_messages(), ["EOF in end tag"]);
}

// ========== Attributes ==========

#[test]
fn test_attribute_quoting_styles() {
    let tokens = tokenize(r#"<input type="text" name='q' value=plain disabled>"#);
    let Token::StartTag { attributes, .. } = &tokens[0] else {
        panic!("expected start tag");
    };
    assert_eq!(attributes.len(), 4);
    assert_eq!(attributes.get("type"), Some("text"));
    assert_eq!(attributes.get("name"), Some("q"));
    assert_eq!(attributes.get("value"), Some("plain"));
    assert_eq!(attributes.get("disabled"), Some(""));
}

#[test]
fn test_attribute_names_lowercased_and_ordered() {
    let tokens = tokenize("<a HREF=x Title=y>");
    let Token::StartTag { attributes, .. } = &tokens[0] else {
        panic!("expected start tag");
    };
    let names: Vec<&str> = attributes.iter().map(|attr| attr.name.as_str()).collect();
    assert_eq!(names, ["href", "title"]);
}

#[test]
fn test_whitespace_around_equals() {
    let tokens = tokenize("<a href = \"x\">");
    let Token::StartTag { attributes, .. } = &tokens[0] else {
        panic!("expected start tag");
    };
    assert_eq!(attributes.get("href"), Some("x"));
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let collected = collect("<a id=1 id=2>");
    let Token::StartTag { attributes, .. } = &collected.tokens[0] else {
        panic!("expected start tag");
    };
    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes.get("id"), Some("1"));
    assert_eq!(collected.errors, [("duplicate attribute".to_string(), 8)]);
}

#[test]
fn test_missing_space_between_attributes() {
    assert_eq!(
        errors(r#"<a b="1"c="2">"#),
        ["missing space between attributes"]
    );
}

#[test]
fn test_bare_slash_in_tag() {
    assert_eq!(errors("<a / b>"), ["unexpected bare slash"]);
}

#[test]
fn test_unquoted_value_with_quote_is_an_error() {
    assert_eq!(errors("<a b=c\"d>"), ["unexpected \"\"\""]);
}

#[test]
fn test_character_references_in_attribute_values() {
    let tokens = tokenize("<a href=\"?a=1&amp;b=2&copy=3\" title=\"&lt;\">");
    let Token::StartTag { attributes, .. } = &tokens[0] else {
        panic!("expected start tag");
    };
    // A legacy reference followed by "=" stays literal inside attributes.
    assert_eq!(attributes.get("href"), Some("?a=1&b=2&copy=3"));
    assert_eq!(attributes.get("title"), Some("<"));
}

#[test]
fn test_attribute_reference_errors_after_null_keep_raw_offsets() {
    let collected = collect("<a title=\"\0&#0;\">");
    let Token::StartTag { attributes, .. } = &collected.tokens[0] else {
        panic!("expected start tag");
    };
    assert_eq!(attributes.get("title"), Some("\u{fffd}\u{fffd}"));
    assert_eq!(
        collected.errors,
        [
            ("replaced null character".to_string(), 10),
            ("invalid numeric reference".to_string(), 11),
        ]
    );
}

// ========== Comments ==========

#[test]
fn test_simple_comment() {
    assert_eq!(render("<!-- hi -->"), ["Comment(\" hi \")"]);
    assert!(errors("<!-- hi -->").is_empty());
}

#[test]
fn test_abrupt_empty_comments() {
    assert_eq!(render("<!-->"), ["Comment(\"\")"]);
    assert_eq!(errors("<!-->"), ["comment ended without dashes"]);
    assert_eq!(render("<!--->"), ["Comment(\"\")"]);
    assert_eq!(errors("<!--->"), ["not enough dashes in empty comment"]);
}

#[test]
fn test_bare_greater_than_closes_comment() {
    assert_eq!(
        render("<!-- a > b -->"),
        ["Comment(\" a \")", "Characters(\" b -->\")"]
    );
    let collected = collect("<!-- a > b -->");
    assert_eq!(
        collected.errors,
        [("comment ended without dashes".to_string(), 7)]
    );
}

#[test]
fn test_single_dash_before_bare_close() {
    assert_eq!(render("<!--a->"), ["Comment(\"a-\")"]);
    let collected = collect("<!--a->");
    assert_eq!(
        collected.errors,
        [
            ("comment ended without dashes".to_string(), 6),
            ("invalid extra dash at comment end".to_string(), 5),
        ]
    );
}

#[test]
fn test_double_dash_inside_comment() {
    assert_eq!(render("<!--a--b-->"), ["Comment(\"a--b\")"]);
    assert_eq!(errors("<!--a--b-->"), ["bare \"--\" found in comment"]);
}

#[test]
fn test_comment_end_bang() {
    assert_eq!(render("<!--x--!>"), ["Comment(\"x\")"]);
    assert_eq!(errors("<!--x--!>"), ["invalid comment end bang"]);
}

#[test]
fn test_extra_dash_at_comment_end() {
    assert_eq!(render("<!--x--->"), ["Comment(\"x-\")"]);
    assert_eq!(errors("<!--x--->"), ["invalid extra dash at comment end"]);
}

#[test]
fn test_eof_in_comment() {
    assert_eq!(render("<!--abc--"), ["Comment(\"abc\")"]);
    assert_eq!(errors("<!--abc"), ["EOF in comment"]);
}

#[test]
fn test_bogus_comments() {
    assert_eq!(render("<?xml version?>"), ["Comment(\"?xml version?\")"]);
    assert_eq!(
        errors("<?xml?>"),
        ["unexpected <? interpreted as bogus comment"]
    );
    assert_eq!(render("</3>"), ["Comment(\"3\")"]);
    assert_eq!(render("<!x>"), ["Comment(\"x\")"]);
}

// ========== DOCTYPE ==========

#[test]
fn test_html5_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2);
    let Token::Doctype { doctype, .. } = &tokens[0] else {
        panic!("expected DOCTYPE");
    };
    assert_eq!(doctype.name.as_deref(), Some("html"));
    assert_eq!(doctype.public_id, None);
    assert_eq!(doctype.system_id, None);
    assert!(!doctype.force_quirks);
}

#[test]
fn test_doctype_keyword_is_case_insensitive() {
    assert_eq!(render("<!doctype HTML>"), ["Doctype(html)"]);
}

#[test]
fn test_doctype_with_identifiers() {
    let input = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#;
    let tokens = tokenize(input);
    let Token::Doctype { doctype, .. } = &tokens[0] else {
        panic!("expected DOCTYPE");
    };
    assert_eq!(doctype.public_id.as_deref(), Some("-//W3C//DTD HTML 4.01//EN"));
    assert_eq!(
        doctype.system_id.as_deref(),
        Some("http://www.w3.org/TR/html4/strict.dtd")
    );
    assert!(!doctype.force_quirks);
    assert!(errors(input).is_empty());
}

#[test]
fn test_doctype_system_only() {
    assert_eq!(
        render("<!DOCTYPE html SYSTEM 'about:legacy-compat'>"),
        ["Doctype(html SYSTEM \"about:legacy-compat\")"]
    );
}

#[test]
fn test_doctype_missing_name() {
    assert_eq!(render("<!DOCTYPE>"), ["Doctype(<missing> force-quirks)"]);
    assert_eq!(errors("<!DOCTYPE>"), ["missing DOCTYPE name"]);
}

#[test]
fn test_doctype_missing_whitespace() {
    assert_eq!(render("<!DOCTYPEhtml>"), ["Doctype(html)"]);
    assert_eq!(errors("<!DOCTYPEhtml>"), ["missing whitespace"]);
}

#[test]
fn test_doctype_keyword_without_identifier_forces_quirks() {
    assert_eq!(render("<!DOCTYPE html PUBLIC>"), ["Doctype(html force-quirks)"]);
}

#[test]
fn test_doctype_bogus_contents() {
    assert_eq!(render("<!DOCTYPE html junk>"), ["Doctype(html force-quirks)"]);
    assert_eq!(errors("<!DOCTYPE html junk>"), ["invalid DOCTYPE contents"]);
}

#[test]
fn test_unterminated_doctype() {
    assert_eq!(render("<!DOCTYPE html"), ["Doctype(html force-quirks)"]);
    assert_eq!(errors("<!DOCTYPE html"), ["unterminated DOCTYPE"]);
}

// ========== Character references ==========

#[test]
fn test_named_references_in_text() {
    assert_eq!(render("a &amp; b &lt;c&gt;"), ["Characters(\"a & b <c>\")"]);
}

#[test]
fn test_legacy_reference_without_semicolon() {
    assert_eq!(render("&copy 2024"), ["Characters(\"\u{a9} 2024\")"]);
    assert_eq!(errors("&copy 2024"), ["character reference missing semicolon"]);
}

#[test]
fn test_longest_prefix_match() {
    // "&notit;" is not an entity; "&not" is, without its semicolon.
    assert_eq!(render("&notit;"), ["Characters(\"\u{ac}it;\")"]);
}

#[test]
fn test_unknown_named_reference_stays_literal() {
    assert_eq!(render("&bogus;"), ["Characters(\"&bogus;\")"]);
    assert_eq!(errors("&bogus;"), ["invalid named reference"]);
}

#[test]
fn test_unknown_name_without_semicolon_stays_literal() {
    assert_eq!(render("text &foo"), ["Characters(\"text &foo\")"]);
    let collected = collect("text &foo");
    assert_eq!(
        collected.errors,
        [("invalid named reference".to_string(), 5)]
    );
}

#[test]
fn test_numeric_references() {
    assert_eq!(render("&#65;&#x42;&#X43;"), ["Characters(\"ABC\")"]);
    assert!(errors("&#65;&#x42;").is_empty());
}

#[test]
fn test_numeric_reference_errors() {
    assert_eq!(render("&#;"), ["Characters(\"&#;\")"]);
    assert_eq!(errors("&#;"), ["Expected digits after &#"]);

    assert_eq!(first_text(&tokenize("&#0;")), "\u{fffd}");
    assert_eq!(errors("&#0;"), ["invalid numeric reference"]);

    assert_eq!(first_text(&tokenize("&#x110000;")), "\u{fffd}");
    assert_eq!(first_text(&tokenize("&#xD800;")), "\u{fffd}");
}

#[test]
fn test_windows_1252_replacement() {
    assert_eq!(render("&#128;"), ["Characters(\"\u{20ac}\")"]);
    assert_eq!(
        errors("&#128;"),
        ["invalid reference to non-ASCII control character"]
    );
}

#[test]
fn test_ignore_char_refs_option() {
    let options = TokenizerOptions::default().with_ignore_char_refs(true);
    let collected = collect_from("&amp;", TokenizerState::Start, None, options);
    assert_eq!(collected.tokens[0].to_string(), "Characters(\"&amp;\")");
}

// ========== Raw text elements ==========

#[test]
fn test_rcdata_decodes_references_and_ignores_tags() {
    let collected = collect_from(
        "a &amp; <b>c</b></title>d",
        TokenizerState::RcData,
        Some("title"),
        TokenizerOptions::default(),
    );
    let rendered: Vec<String> = collected.tokens.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        [
            "Characters(\"a & <b>c</b>\")",
            "EndTag(</title>)",
            "Characters(\"d\")",
            "EOF"
        ]
    );
}

#[test]
fn test_rcdata_null_after_reference_keeps_raw_offset() {
    let collected = collect_from(
        "&#0;\0x",
        TokenizerState::RcData,
        Some("title"),
        TokenizerOptions::default(),
    );
    assert_eq!(first_text(&collected.tokens), "\u{fffd}\u{fffd}x");
    assert_eq!(
        collected.errors,
        [
            ("replaced null character".to_string(), 4),
            ("invalid numeric reference".to_string(), 0),
        ]
    );
}

#[test]
fn test_rawtext_keeps_references() {
    let collected = collect_from(
        "a &amp; b</STYLE>",
        TokenizerState::RawText,
        Some("style"),
        TokenizerOptions::default(),
    );
    assert_eq!(
        collected.tokens[0].to_string(),
        "Characters(\"a &amp; b\")"
    );
    assert_eq!(collected.tokens[1].to_string(), "EndTag(</style>)");
}

#[test]
fn test_rawtext_end_tag_must_be_delimited() {
    let collected = collect_from(
        "x</stylesheet></style>",
        TokenizerState::RawText,
        Some("style"),
        TokenizerOptions::default(),
    );
    assert_eq!(
        collected.tokens[0].to_string(),
        "Characters(\"x</stylesheet>\")"
    );
}

#[test]
fn test_raw_text_replaces_nulls() {
    let collected = collect_from(
        "a\0b",
        TokenizerState::RawText,
        Some("style"),
        TokenizerOptions::default(),
    );
    assert_eq!(first_text(&collected.tokens), "a\u{fffd}b");
    assert_eq!(collected.error_messages(), ["replaced null character"]);
}

#[test]
fn test_script_escape_hides_end_tag() {
    let collected = collect_from(
        "a<!--b</script>c-->d</script>e",
        TokenizerState::ScriptData,
        Some("script"),
        TokenizerOptions::default(),
    );
    let rendered: Vec<String> = collected.tokens.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        [
            "Characters(\"a<!--b</script>c-->d\")",
            "EndTag(</script>)",
            "Characters(\"e\")",
            "EOF"
        ]
    );
}

#[test]
fn test_script_end_tag_without_escape() {
    let collected = collect_from(
        "if (a < b) {}</script>",
        TokenizerState::ScriptData,
        Some("script"),
        TokenizerOptions::default(),
    );
    assert_eq!(
        collected.tokens[0].to_string(),
        "Characters(\"if (a < b) {}\")"
    );
}

#[test]
fn test_unterminated_script_is_discarded() {
    let collected = collect_from(
        "var x = 1;",
        TokenizerState::ScriptData,
        Some("script"),
        TokenizerOptions::default(),
    );
    assert_eq!(collected.tokens, vec![Token::EndOfFile]);
}

#[test]
fn test_plaintext_consumes_everything() {
    let collected = collect_from(
        "<b>&amp;</plaintext>",
        TokenizerState::PlainText,
        None,
        TokenizerOptions::default(),
    );
    assert_eq!(
        collected.tokens[0].to_string(),
        "Characters(\"<b>&amp;</plaintext>\")"
    );
}

// ========== CDATA and preprocessing ==========

#[test]
fn test_cdata_is_text() {
    assert_eq!(render("<![CDATA[x<y]]>"), ["Characters(\"x<y\")"]);
    assert_eq!(render("<![CDATA[open"), ["Characters(\"open\")"]);
    assert_eq!(errors("<![CDATA[open"), ["unterminated CDATA section"]);
}

#[test]
fn test_newlines_are_normalized() {
    assert_eq!(render("a\r\nb\rc"), ["Characters(\"a\\nb\\nc\")"]);
}

#[test]
fn test_control_characters_are_reported() {
    assert_eq!(errors("a\u{1}b"), ["disallowed control character"]);
}

#[test]
fn test_null_in_data_is_kept() {
    assert_eq!(render("a\0b"), ["Characters(\"a\\0b\")"]);
    assert_eq!(errors("a\0b"), ["unexpected U+0000"]);
}

#[test]
fn test_ignore_errors_option() {
    let options = TokenizerOptions::default().with_ignore_errors(true);
    let collected = collect_from(
        "<a id=1 id=2><!-- a--b -->&bogus;",
        TokenizerState::Start,
        None,
        options,
    );
    assert!(collected.errors.is_empty());
}

// ========== Stepping ==========

#[test]
fn test_step_requires_begin_stepping() {
    let mut tokenizer = Tokenizer::new("<p>", TokenizerOptions::default(), TokenCollector::new());
    assert_eq!(tokenizer.step(), Err(TokenizerFault::NotStepping));
}

#[test]
fn test_stepping_matches_execute() {
    let input = "<!DOCTYPE html><p class=a>one<!--c-->two</p>";
    let mut tokenizer = Tokenizer::new(input, TokenizerOptions::default(), TokenCollector::new());
    tokenizer.begin_stepping();
    let mut steps = 0;
    while tokenizer.step().expect("tokenizer fault") {
        steps += 1;
        assert!(steps < 100, "tokenizer did not finish");
    }
    assert_eq!(tokenizer.step(), Err(TokenizerFault::AlreadyFinished));
    assert_eq!(tokenizer.into_handler().tokens, tokenize(input));
}
