//! Integration tests for tree construction, checked through the html5lib
//! style dump of the resulting DOM.

use thicket_dom::{DomTree, NodeId, NodeType};
use thicket_html::{
    ParsedDocument, ParserOptions, QuirksMode, TokenizerOptions, parse_document, parse_fragment,
};

/// Helper to parse a document with default options.
fn parse(html: &str) -> ParsedDocument {
    parse_document(html, &ParserOptions::default()).expect("tokenizer fault")
}

/// Helper to parse and dump a document.
fn dump(html: &str) -> String {
    parse(html).tree.dump()
}

/// Helper to parse a fragment and dump its nodes.
fn dump_fragment(context: &str, html: &str) -> String {
    parse_fragment(context, html, &ParserOptions::default())
        .expect("tokenizer fault")
        .fragment_dump()
}

/// Expected dump from its lines.
fn tree(lines: &[&str]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn messages(parsed: &ParsedDocument) -> Vec<&str> {
    parsed
        .issues
        .iter()
        .map(|issue| issue.message.as_str())
        .collect()
}

fn has_issue(html: &str, message: &str) -> bool {
    parse(html).issues.iter().any(|issue| issue.message == message)
}

/// Helper to find every element with a tag name, depth-first.
fn find_all_elements(tree: &DomTree, from: NodeId, tag: &str) -> Vec<NodeId> {
    let mut result = Vec::new();
    if tree.as_element(from).is_some_and(|data| data.tag_name == tag) {
        result.push(from);
    }
    for &child in tree.children(from) {
        result.extend(find_all_elements(tree, child, tag));
    }
    result
}

// ========== Document structure ==========

#[test]
fn test_document_structure() {
    let parsed = parse("<!DOCTYPE html><html><head></head><body></body></html>");
    assert!(matches!(
        parsed.tree.get(NodeId::ROOT).map(|node| &node.node_type),
        Some(NodeType::Document)
    ));
    assert_eq!(
        parsed.tree.dump(),
        tree(&["| <!DOCTYPE html>", "| <html>", "|   <head>", "|   <body>"])
    );
    assert!(parsed.issues.is_empty(), "{:?}", parsed.issues);
    assert_eq!(parsed.quirks_mode, QuirksMode::NoQuirks);
}

#[test]
fn test_implied_html_head_and_body() {
    assert_eq!(
        dump("<p>hi"),
        tree(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|       \"hi\"",
        ])
    );
}

#[test]
fn test_empty_document() {
    assert_eq!(
        dump(""),
        tree(&["| <html>", "|   <head>", "|   <body>"])
    );
}

#[test]
fn test_head_elements_and_title() {
    assert_eq!(
        dump("<!DOCTYPE html><title>A &amp; B</title><meta charset=utf-8><p>x"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|     <title>",
            "|       \"A & B\"",
            "|     <meta>",
            "|       charset=\"utf-8\"",
            "|   <body>",
            "|     <p>",
            "|       \"x\"",
        ])
    );
}

#[test]
fn test_whitespace_after_head_is_kept() {
    assert_eq!(
        dump("<!DOCTYPE html>\n<html>\n<head></head>\n<body>x</body></html>"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   \"\\n\"",
            "|   <body>",
            "|     \"x\"",
        ])
        .replace("\\n", "\n")
    );
}

#[test]
fn test_adjacent_text_is_merged() {
    // The ignored end tag splits the character tokens, not the text node.
    let parsed = parse("<p>a</x>b");
    let p = parsed.tree.find_element(NodeId::ROOT, "p").expect("p");
    assert_eq!(parsed.tree.children(p).len(), 1);
    assert_eq!(parsed.tree.text_content(p), "ab");
}

#[test]
fn test_comments_everywhere() {
    assert_eq!(
        dump("<!--a--><!DOCTYPE html><!--b--><p>x</p></body><!--c--></html><!--d-->"),
        tree(&[
            "| <!-- a -->",
            "| <!DOCTYPE html>",
            "| <!-- b -->",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|       \"x\"",
            "|   <!-- c -->",
            "| <!-- d -->",
        ])
    );
}

#[test]
fn test_html_attributes_are_merged() {
    assert_eq!(
        dump("<html a=1><body><html b=2 a=3>"),
        tree(&[
            "| <html>",
            "|   a=\"1\"",
            "|   b=\"2\"",
            "|   <head>",
            "|   <body>",
        ])
    );
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let parsed = parse("<!DOCTYPE html><div id=a id=b></div>");
    let div = parsed.tree.find_element(NodeId::ROOT, "div").expect("div");
    let data = parsed.tree.as_element(div).expect("element");
    assert_eq!(data.attrs.get("id").map(String::as_str), Some("a"));
    assert_eq!(messages(&parsed), ["duplicate attribute"]);
}

#[test]
fn test_comment_closed_by_bare_greater_than() {
    let parsed = parse("<!-- a > b -->x");
    let dumped = parsed.tree.dump();
    assert!(dumped.starts_with("| <!--  a  -->\n"), "{dumped}");
    assert!(dumped.contains("\"b -->x\""), "{dumped}");
    assert!(
        parsed
            .issues
            .iter()
            .any(|issue| issue.message == "comment ended without dashes" && issue.position == 7)
    );
}

// ========== DOCTYPE and quirks ==========

#[test]
fn test_missing_doctype_is_quirks() {
    let parsed = parse("<p>hi");
    assert_eq!(parsed.quirks_mode, QuirksMode::Quirks);
    assert_eq!(parsed.issues[0].message, "missing DOCTYPE");
    assert_eq!(parsed.issues[0].position, 0);
}

#[test]
fn test_legacy_doctypes() {
    let transitional = r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN">"#;
    assert_eq!(parse(transitional).quirks_mode, QuirksMode::Quirks);

    let with_system = r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd">"#;
    assert_eq!(parse(with_system).quirks_mode, QuirksMode::LimitedQuirks);

    let xhtml = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">"#;
    assert_eq!(parse(xhtml).quirks_mode, QuirksMode::LimitedQuirks);
    assert!(has_issue(xhtml, "non-conforming DOCTYPE"));
}

#[test]
fn test_doctype_with_identifiers_in_dump() {
    assert_eq!(
        dump(r#"<!DOCTYPE html SYSTEM "about:legacy-compat">"#),
        tree(&[
            "| <!DOCTYPE html \"\" \"about:legacy-compat\">",
            "| <html>",
            "|   <head>",
            "|   <body>",
        ])
    );
}

#[test]
fn test_table_inside_paragraph_depends_on_quirks() {
    assert_eq!(
        dump("<p><table></table>"),
        tree(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|       <table>",
        ])
    );
    assert_eq!(
        dump("<!DOCTYPE html><p><table></table>"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|     <table>",
        ])
    );
}

// ========== In body ==========

#[test]
fn test_paragraphs_close_each_other() {
    assert_eq!(
        dump("<!DOCTYPE html><p>a<p>b<div>c</div>"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|       \"a\"",
            "|     <p>",
            "|       \"b\"",
            "|     <div>",
            "|       \"c\"",
        ])
    );
}

#[test]
fn test_list_items_close_each_other() {
    assert_eq!(
        dump("<!DOCTYPE html><ul><li>a<li>b</ul>"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <ul>",
            "|       <li>",
            "|         \"a\"",
            "|       <li>",
            "|         \"b\"",
        ])
    );
}

#[test]
fn test_nested_heading() {
    let html = "<!DOCTYPE html><h1>a<h2>b";
    assert_eq!(
        dump(html),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <h1>",
            "|       \"a\"",
            "|     <h2>",
            "|       \"b\"",
        ])
    );
    assert!(has_issue(html, "nested heading"));
}

#[test]
fn test_stray_br_end_tag() {
    assert_eq!(
        dump("<!DOCTYPE html><p>x</br>"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|       \"x\"",
            "|       <br>",
        ])
    );
}

#[test]
fn test_image_becomes_img() {
    assert_eq!(
        dump("<!DOCTYPE html><image src=a>"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <img>",
            "|       src=\"a\"",
        ])
    );
}

#[test]
fn test_leading_newline_in_pre_is_dropped() {
    let parsed = parse("<!DOCTYPE html><pre>\nx</pre><textarea>\ny</textarea>");
    let pre = parsed.tree.find_element(NodeId::ROOT, "pre").expect("pre");
    assert_eq!(parsed.tree.text_content(pre), "x");
    let textarea = parsed
        .tree
        .find_element(NodeId::ROOT, "textarea")
        .expect("textarea");
    assert_eq!(parsed.tree.text_content(textarea), "y");
}

#[test]
fn test_textarea_is_rcdata() {
    let parsed = parse("<!DOCTYPE html><textarea><b>&lt;</b></textarea>");
    let textarea = parsed
        .tree
        .find_element(NodeId::ROOT, "textarea")
        .expect("textarea");
    assert_eq!(parsed.tree.text_content(textarea), "<b><</b>");
}

#[test]
fn test_plaintext_swallows_the_rest() {
    let parsed = parse("<!DOCTYPE html><plaintext><b>x</plaintext>");
    let plaintext = parsed
        .tree
        .find_element(NodeId::ROOT, "plaintext")
        .expect("plaintext");
    assert_eq!(parsed.tree.text_content(plaintext), "<b>x</plaintext>");
}

#[test]
fn test_nested_form_is_ignored() {
    let parsed = parse("<!DOCTYPE html><form><form><input></form>");
    assert_eq!(find_all_elements(&parsed.tree, NodeId::ROOT, "form").len(), 1);
    assert!(messages(&parsed).contains(&"nested <form>"));
}

#[test]
fn test_select_options() {
    assert_eq!(
        dump("<!DOCTYPE html><select><option>a<option>b</select>"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <select>",
            "|       <option>",
            "|         \"a\"",
            "|       <option>",
            "|         \"b\"",
        ])
    );
}

#[test]
fn test_unclosed_elements_at_end_of_body() {
    assert!(has_issue(
        "<!DOCTYPE html><div>unclosed",
        "unclosed elements at end of body"
    ));
    assert!(!has_issue(
        "<!DOCTYPE html><p>still fine",
        "unclosed elements at end of body"
    ));
}

#[test]
fn test_null_in_body_reported_at_each_null() {
    let parsed = parse("<!DOCTYPE html><p>a\0b\0c");
    let positions: Vec<usize> = parsed
        .issues
        .iter()
        .filter(|issue| issue.message == "unexpected null character")
        .map(|issue| issue.position)
        .collect();
    assert_eq!(positions, [19, 21]);
    assert!(parsed.tree.dump().contains("\"abc\""));
}

// ========== Raw text and script ==========

#[test]
fn test_style_content_preserved() {
    let parsed = parse("<!DOCTYPE html><style>p > a { color: red; }</style>");
    let style = parsed.tree.find_element(NodeId::ROOT, "style").expect("style");
    assert_eq!(parsed.tree.text_content(style), "p > a { color: red; }");
}

#[test]
fn test_script_escape_boundary() {
    assert_eq!(
        dump("<script>a<!--b</script>c-->d</script>"),
        tree(&[
            "| <html>",
            "|   <head>",
            "|     <script>",
            "|       \"a<!--b</script>c-->d\"",
            "|   <body>",
        ])
    );
}

#[test]
fn test_unterminated_script_is_empty() {
    assert_eq!(
        dump("<!DOCTYPE html><script>alert(1)"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|     <script>",
            "|   <body>",
        ])
    );
}

// ========== Adoption agency and formatting ==========

#[test]
fn test_adoption_agency_furthest_block() {
    assert_eq!(
        dump("<!DOCTYPE html><b><p>x</b>y"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <b>",
            "|     <p>",
            "|       <b>",
            "|         \"x\"",
            "|       \"y\"",
        ])
    );
}

#[test]
fn test_adoption_agency_simple_misnesting() {
    assert_eq!(
        dump("<!DOCTYPE html><p><b>X<i>Y</b>Z</i></p>"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|       <b>",
            "|         \"X\"",
            "|         <i>",
            "|           \"Y\"",
            "|       <i>",
            "|         \"Z\"",
        ])
    );
}

#[test]
fn test_formatting_reconstruction_across_blocks() {
    assert_eq!(
        dump("<!DOCTYPE html><p><i>a</p><p>b"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|       <i>",
            "|         \"a\"",
            "|     <p>",
            "|       <i>",
            "|         \"b\"",
        ])
    );
}

#[test]
fn test_noahs_ark_limits_reconstruction() {
    assert_eq!(
        dump("<!DOCTYPE html><p><b><b><b><b>x</p><p>y"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|       <b>",
            "|         <b>",
            "|           <b>",
            "|             <b>",
            "|               \"x\"",
            "|     <p>",
            "|       <b>",
            "|         <b>",
            "|           <b>",
            "|             \"y\"",
        ])
    );
}

#[test]
fn test_noahs_ark_compares_attributes() {
    // Different attributes are different entries.
    let parsed = parse("<!DOCTYPE html><p><b class=a><b class=b><b class=c><b class=d>x</p><p>y");
    let second_p = find_all_elements(&parsed.tree, NodeId::ROOT, "p")[1];
    assert_eq!(find_all_elements(&parsed.tree, second_p, "b").len(), 4);
}

#[test]
fn test_nested_anchor_tags() {
    let html = "<!DOCTYPE html><a href=1>x<a href=2>y";
    assert_eq!(
        dump(html),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <a>",
            "|       href=\"1\"",
            "|       \"x\"",
            "|     <a>",
            "|       href=\"2\"",
            "|       \"y\"",
        ])
    );
    assert!(has_issue(html, "nested <a>"));
}

#[test]
fn test_any_other_end_tag_ignores_special() {
    assert_eq!(
        dump("<!DOCTYPE html><div><span>a</div>b"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <div>",
            "|       <span>",
            "|         \"a\"",
            "|     \"b\"",
        ])
    );
}

// ========== Tables ==========

#[test]
fn test_implied_table_sections() {
    assert_eq!(
        dump("<!DOCTYPE html><table><td>1<td>2</table>"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <table>",
            "|       <tbody>",
            "|         <tr>",
            "|           <td>",
            "|             \"1\"",
            "|           <td>",
            "|             \"2\"",
        ])
    );
}

#[test]
fn test_text_is_foster_parented() {
    let html = "<!DOCTYPE html><table>x<tr><td>y</td></tr></table>";
    assert_eq!(
        dump(html),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     \"x\"",
            "|     <table>",
            "|       <tbody>",
            "|         <tr>",
            "|           <td>",
            "|             \"y\"",
        ])
    );
    assert!(has_issue(html, "text foster-parented out of table"));
}

#[test]
fn test_whitespace_stays_in_table() {
    assert_eq!(
        dump("<!DOCTYPE html><table> <tr></tr></table>"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <table>",
            "|       \" \"",
            "|       <tbody>",
            "|         <tr>",
        ])
    );
}

#[test]
fn test_element_is_foster_parented() {
    assert_eq!(
        dump("<!DOCTYPE html><table><b>x</b><tr><td>y</table>"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <b>",
            "|       \"x\"",
            "|     <table>",
            "|       <tbody>",
            "|         <tr>",
            "|           <td>",
            "|             \"y\"",
        ])
    );
}

#[test]
fn test_caption_and_colgroup() {
    assert_eq!(
        dump("<!DOCTYPE html><table><caption>c</caption><col><tr><td>x</table>"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <table>",
            "|       <caption>",
            "|         \"c\"",
            "|       <colgroup>",
            "|         <col>",
            "|       <tbody>",
            "|         <tr>",
            "|           <td>",
            "|             \"x\"",
        ])
    );
}

// ========== Foreign content ==========

#[test]
fn test_svg_and_mathml_namespaces() {
    assert_eq!(
        dump("<!DOCTYPE html><svg viewbox=\"0 0 1 1\"><circle/></svg><math><mi>x</mi></math>"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <svg svg>",
            "|       viewBox=\"0 0 1 1\"",
            "|       <svg circle>",
            "|     <math math>",
            "|       <math mi>",
            "|         \"x\"",
        ])
    );
}

#[test]
fn test_svg_tag_names_are_adjusted() {
    assert_eq!(
        dump("<!DOCTYPE html><svg><foreignobject><div>a</div></foreignobject></svg>"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <svg svg>",
            "|       <svg foreignObject>",
            "|         <div>",
            "|           \"a\"",
        ])
    );
}

#[test]
fn test_html_breaks_out_of_foreign_content() {
    let html = "<!DOCTYPE html><svg><g><p>x";
    assert_eq!(
        dump(html),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <svg svg>",
            "|       <svg g>",
            "|     <p>",
            "|       \"x\"",
        ])
    );
    assert!(has_issue(html, "<p> breaks out of foreign content"));
}

#[test]
fn test_xlink_attributes_keep_prefix() {
    assert_eq!(
        dump("<!DOCTYPE html><svg><a xlink:href=\"#x\"></a></svg>"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <svg svg>",
            "|       <svg a>",
            "|         xlink href=\"#x\"",
        ])
    );
}

#[test]
fn test_cdata_in_svg_is_text() {
    let parsed = parse("<!DOCTYPE html><svg><![CDATA[a<b]]></svg>");
    let svg = parsed.tree.find_element(NodeId::ROOT, "svg").expect("svg");
    assert_eq!(parsed.tree.text_content(svg), "a<b");
}

// ========== Templates and framesets ==========

#[test]
fn test_template_contents_in_head() {
    assert_eq!(
        dump("<!DOCTYPE html><template><tr><td>x</td></tr></template>"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|     <template>",
            "|       <tr>",
            "|         <td>",
            "|           \"x\"",
            "|   <body>",
        ])
    );
}

#[test]
fn test_unclosed_template() {
    let html = "<!DOCTYPE html><template><div>x";
    assert!(has_issue(html, "end of file inside template"));
    let parsed = parse(html);
    let template = parsed
        .tree
        .find_element(NodeId::ROOT, "template")
        .expect("template");
    assert_eq!(parsed.tree.text_content(template), "x");
    assert!(parsed.tree.body().is_some());
}

#[test]
fn test_frameset_document() {
    assert_eq!(
        dump("<!DOCTYPE html><frameset><frame src=a></frameset><noframes>n</noframes>"),
        tree(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <frameset>",
            "|     <frame>",
            "|       src=\"a\"",
            "|   <noframes>",
            "|     \"n\"",
        ])
    );
}

// ========== Fragments ==========

#[test]
fn test_fragment_in_div() {
    assert_eq!(
        dump_fragment("div", "<p>a<b>c"),
        tree(&["| <p>", "|   \"a\"", "|   <b>", "|     \"c\""])
    );
}

#[test]
fn test_fragment_context_selects_rcdata() {
    assert_eq!(
        dump_fragment("title", "<b>x</b>"),
        tree(&["| \"<b>x</b>\""])
    );
}

#[test]
fn test_fragment_in_table_row() {
    assert_eq!(
        dump_fragment("tr", "<td>a<td>b"),
        tree(&["| <td>", "|   \"a\"", "| <td>", "|   \"b\""])
    );
}

#[test]
fn test_fragment_in_svg() {
    assert_eq!(
        dump_fragment("svg svg", "<path/><rect/>"),
        tree(&["| <svg path>", "| <svg rect>"])
    );
}

#[test]
fn test_fragment_has_no_doctype_error() {
    let parsed = parse_fragment("div", "text", &ParserOptions::default()).expect("tokenizer fault");
    assert!(parsed.issues.is_empty(), "{:?}", parsed.issues);
    assert_eq!(parsed.quirks_mode, QuirksMode::NoQuirks);
}

// ========== Options ==========

#[test]
fn test_options_from_json() {
    let options: ParserOptions =
        serde_json::from_str(r#"{ "tokenizer": { "ignore_errors": true } }"#).expect("json");
    assert_eq!(
        options.tokenizer,
        TokenizerOptions::default().with_ignore_errors(true)
    );
    let parsed = parse_document("<!DOCTYPE html><a id=1 id=2></a>", &options).expect("tokenizer fault");
    assert!(parsed.issues.is_empty(), "{:?}", parsed.issues);
}

#[test]
fn test_issues_serialize() {
    let parsed = parse("<p>");
    let json = serde_json::to_string(&parsed.issues).expect("json");
    assert!(json.contains("\"message\":\"missing DOCTYPE\""));
    assert!(json.contains("\"position\":0"));
}
