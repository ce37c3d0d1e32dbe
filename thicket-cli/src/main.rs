//! thicket CLI - HTML5 parsing and debugging tool
//!
//! Prints the html5lib-style tree dump of a document or fragment, its token
//! stream, or its parse errors, as text or JSON.

use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use serde_json::{Map, Value, json};
use thicket_common::position::LineIndex;
use thicket_dom::{DomTree, NodeId, NodeType};
use thicket_html::tokenizer::helpers::normalize_newlines;
use thicket_html::tokenizer::{
    Attributes, Doctype, LexicalState, SourceRange, Token, TokenCollector, TokenHandler,
    Tokenizer, TokenizerState,
};
use thicket_html::{ParseIssue, ParsedDocument, ParserOptions, parse_document, parse_fragment};

/// thicket - parse HTML the way a browser does and show the result
#[derive(Parser, Debug)]
#[command(name = "thicket")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Dump the tree of a file
    thicket page.html

    # Parse inline HTML and list its parse errors
    thicket --html '<p><b>x</p>' --errors

    # Parse a fragment in the context of a <tr>
    thicket --fragment tr --html '<td>a<td>b'

    # Fragment in an SVG context
    thicket --fragment 'svg svg' --html '<path/>'

    # Token stream as JSON
    thicket --html '<a href=x>y</a>' --tokens --json
"#)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse this HTML string instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Print the token stream instead of the tree
    #[arg(short, long)]
    tokens: bool,

    /// Print parse errors as line:col: message
    #[arg(short, long)]
    errors: bool,

    /// Emit JSON
    #[arg(short, long)]
    json: bool,

    /// Parse as a fragment of this context element (`td`, `svg svg`, ...)
    #[arg(short, long, value_name = "CONTEXT")]
    fragment: Option<String>,

    /// Load parser options from a JSON file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Do not report parse errors
    #[arg(long)]
    ignore_errors: bool,

    /// Leave character references undecoded
    #[arg(long)]
    ignore_char_refs: bool,

    /// Leave NUL characters in place
    #[arg(long)]
    ignore_nulls: bool,

    /// Skip newline normalization and control character checks
    #[arg(long)]
    skip_preprocess: bool,

    /// Parse as if scripting were enabled (`<noscript>` becomes raw text)
    #[arg(long)]
    scripting: bool,
}

impl Cli {
    /// Options from `--config`, with command line flags layered on top.
    fn options(&self) -> Result<ParserOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config '{}'", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config '{}'", path.display()))?
            }
            None => ParserOptions::default(),
        };
        let tokenizer = &mut options.tokenizer;
        tokenizer.ignore_errors |= self.ignore_errors;
        tokenizer.ignore_char_refs |= self.ignore_char_refs;
        tokenizer.ignore_nulls |= self.ignore_nulls;
        tokenizer.skip_preprocess |= self.skip_preprocess;
        options.tree_builder.ignore_errors |= self.ignore_errors;
        options.tree_builder.scripting_enabled |= self.scripting;
        log::debug!("parser options: {options:?}");
        Ok(options)
    }

    fn input(&self) -> Result<String> {
        if let Some(html) = &self.html {
            Ok(html.clone())
        } else if let Some(path) = &self.path {
            fs::read_to_string(path).with_context(|| format!("reading '{}'", path.display()))
        } else {
            anyhow::bail!("no input: pass a FILE or --html")
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let options = cli.options()?;
    let html = cli.input()?;

    if cli.tokens {
        let collected = tokenize(&html, &options)?;
        if cli.json {
            print_json(&tokens_to_json(&collected));
        } else {
            print_tokens(&collected);
        }
        return Ok(());
    }

    let parsed = match &cli.fragment {
        Some(context) => parse_fragment(context, &html, &options)?,
        None => parse_document(&html, &options)?,
    };

    // Issue offsets refer to the preprocessed input.
    let normalized: Cow<'_, str> = if options.tokenizer.skip_preprocess {
        html.as_str().into()
    } else {
        normalize_newlines(&html)
    };
    let index = LineIndex::new(&normalized);

    if cli.json {
        let mut document = Map::new();
        let _ = document.insert("quirksMode".to_string(), json!(parsed.quirks_mode.to_string()));
        let _ = document.insert("tree".to_string(), tree_to_json(&parsed));
        if cli.errors {
            let _ = document.insert("errors".to_string(), issues_to_json(&parsed.issues, &index));
        }
        print_json(&Value::Object(document));
        return Ok(());
    }

    if cli.errors {
        print_issues(&parsed.issues, &index);
    } else {
        print!("{}", if cli.fragment.is_some() {
            parsed.fragment_dump()
        } else {
            parsed.tree.dump()
        });
        if !parsed.issues.is_empty() {
            eprintln!(
                "{}",
                format!("{} parse errors (use --errors to list them)", parsed.issues.len())
                    .yellow()
            );
        }
    }
    Ok(())
}

/// Run only the tokenizer over `html`.
fn tokenize(html: &str, options: &ParserOptions) -> Result<TokenCollector> {
    let mut tokenizer = Tokenizer::new(html, options.tokenizer, RawTextSwitcher::default());
    tokenizer.execute(TokenizerState::Start, None)?;
    Ok(tokenizer.into_handler().collector)
}

/// Records tokens and switches into the raw text states a tree builder would
/// select, so that `<script>` and `<style>` bodies tokenize as text.
#[derive(Debug, Default)]
struct RawTextSwitcher {
    collector: TokenCollector,
}

impl TokenHandler for RawTextSwitcher {
    fn end_document(&mut self, pos: usize) {
        self.collector.end_document(pos);
    }

    fn error(&mut self, message: &str, pos: usize) {
        self.collector.error(message, pos);
    }

    fn characters(&mut self, text: &str, source: SourceRange) {
        self.collector.characters(text, source);
    }

    fn start_tag(
        &mut self,
        name: &str,
        attributes: Attributes<'_>,
        self_closing: bool,
        source: SourceRange,
        lexer: &mut LexicalState,
    ) {
        let state = match name {
            "title" | "textarea" => Some(TokenizerState::RcData),
            "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(TokenizerState::RawText),
            "script" => Some(TokenizerState::ScriptData),
            "plaintext" => Some(TokenizerState::PlainText),
            _ => None,
        };
        if let Some(state) = state
            && !self_closing
        {
            lexer.switch_to(state, Some(name));
        }
        self.collector
            .start_tag(name, attributes, self_closing, source, lexer);
    }

    fn end_tag(&mut self, name: &str, source: SourceRange) {
        self.collector.end_tag(name, source);
    }

    fn doctype(&mut self, doctype: Doctype, source: SourceRange) {
        self.collector.doctype(doctype, source);
    }

    fn comment(&mut self, text: &str, source: SourceRange) {
        self.collector.comment(text, source);
    }
}

fn print_tokens(collected: &TokenCollector) {
    println!("{}", format!("=== Tokens ({}) ===", collected.tokens.len()).bold());
    for (i, token) in collected.tokens.iter().enumerate() {
        println!("  {i:3}: {token}");
    }
    if !collected.errors.is_empty() {
        println!();
        println!("{}", format!("=== Errors ({}) ===", collected.errors.len()).bold());
        for (message, pos) in &collected.errors {
            println!("  @{pos}: {}", message.red());
        }
    }
}

fn print_issues(issues: &[ParseIssue], index: &LineIndex<'_>) {
    if issues.is_empty() {
        println!("{}", "no parse errors".green());
        return;
    }
    for issue in issues {
        let at = index.locate(issue.position);
        println!("{}:{}: {}", at.line, at.column, issue.message.red());
    }
}

fn print_json(value: &Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn issues_to_json(issues: &[ParseIssue], index: &LineIndex<'_>) -> Value {
    issues
        .iter()
        .map(|issue| {
            let at = index.locate(issue.position);
            json!({
                "message": issue.message,
                "position": issue.position,
                "line": at.line,
                "column": at.column,
            })
        })
        .collect()
}

fn tokens_to_json(collected: &TokenCollector) -> Value {
    let tokens: Vec<Value> = collected.tokens.iter().map(token_to_json).collect();
    let errors: Vec<Value> = collected
        .errors
        .iter()
        .map(|(message, pos)| json!({ "message": message, "position": pos }))
        .collect();
    json!({ "tokens": tokens, "errors": errors })
}

fn token_to_json(token: &Token) -> Value {
    match token {
        Token::Characters { text, .. } => json!({ "type": "characters", "data": text }),
        Token::StartTag {
            name,
            attributes,
            self_closing,
            ..
        } => {
            let attrs: Map<String, Value> = attributes
                .iter()
                .map(|attr| (attr.name.clone(), json!(attr.value)))
                .collect();
            json!({
                "type": "startTag",
                "name": name,
                "attributes": attrs,
                "selfClosing": self_closing,
            })
        }
        Token::EndTag { name, .. } => json!({ "type": "endTag", "name": name }),
        Token::Comment { text, .. } => json!({ "type": "comment", "data": text }),
        Token::Doctype { doctype, .. } => json!({
            "type": "doctype",
            "name": doctype.name,
            "publicId": doctype.public_id,
            "systemId": doctype.system_id,
            "forceQuirks": doctype.force_quirks,
        }),
        Token::EndOfFile => json!({ "type": "eof" }),
    }
}

/// The tree as JSON. For a fragment this is the root `html` element that
/// holds the fragment's nodes.
fn tree_to_json(parsed: &ParsedDocument) -> Value {
    node_to_json(&parsed.tree, NodeId::ROOT)
}

fn node_to_json(tree: &DomTree, id: NodeId) -> Value {
    let mut obj = Map::new();
    let Some(node) = tree.get(id) else {
        return Value::Null;
    };

    match &node.node_type {
        NodeType::Document => {
            let _ = obj.insert("type".to_string(), json!("document"));
        }
        NodeType::Doctype(doctype) => {
            let _ = obj.insert("type".to_string(), json!("doctype"));
            let _ = obj.insert("name".to_string(), json!(doctype.name));
            let _ = obj.insert("publicId".to_string(), json!(doctype.public_id));
            let _ = obj.insert("systemId".to_string(), json!(doctype.system_id));
        }
        NodeType::Element(data) => {
            let _ = obj.insert("type".to_string(), json!("element"));
            let _ = obj.insert("tagName".to_string(), json!(data.tag_name));
            let _ = obj.insert("namespace".to_string(), json!(data.namespace.url()));
            let attrs: Map<String, Value> = data
                .attrs
                .iter()
                .map(|(k, v)| (k.clone(), json!(v)))
                .collect();
            let _ = obj.insert("attributes".to_string(), Value::Object(attrs));
        }
        NodeType::Text(text) => {
            let _ = obj.insert("type".to_string(), json!("text"));
            let _ = obj.insert("content".to_string(), json!(text));
        }
        NodeType::Comment(text) => {
            let _ = obj.insert("type".to_string(), json!("comment"));
            let _ = obj.insert("content".to_string(), json!(text));
        }
    }

    let children = tree.children(id);
    if !children.is_empty() {
        let children: Vec<Value> = children
            .iter()
            .map(|&child| node_to_json(tree, child))
            .collect();
        let _ = obj.insert("children".to_string(), Value::Array(children));
    }

    Value::Object(obj)
}
