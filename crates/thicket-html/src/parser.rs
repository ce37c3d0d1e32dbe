//! One-call entry points: tokenizer, tree builder and [`DomBuilder`] wired
//! together.
//!
//! ```
//! use thicket_html::parser::{ParserOptions, parse_document};
//!
//! let parsed = parse_document("<p>Hello", &ParserOptions::default()).unwrap();
//! assert!(parsed.tree.dump().contains("\"Hello\""));
//! ```

use serde::{Deserialize, Serialize};
use thicket_dom::{DomTree, NodeId};

pub use crate::dom_builder::ParseIssue;
use crate::dom_builder::DomBuilder;
use crate::tokenizer::{AttributeList, Tokenizer, TokenizerFault, TokenizerOptions, TokenizerState};
use crate::tree_builder::{Dispatcher, Namespace, QuirksMode, TreeBuilderOptions};

/// Settings for both parsing stages.
///
/// Deserializes from a JSON object with optional `tokenizer` and
/// `tree_builder` tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Tokenizer switches.
    pub tokenizer: TokenizerOptions,
    /// Tree construction switches.
    pub tree_builder: TreeBuilderOptions,
}

/// A parsed document.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// The DOM.
    pub tree: DomTree,
    /// Tokenizer and tree construction errors, in the order reported.
    pub issues: Vec<ParseIssue>,
    /// The document's quirks mode.
    pub quirks_mode: QuirksMode,
}

impl ParsedDocument {
    /// The root `html` element. For a fragment, its children are the
    /// fragment's nodes.
    #[must_use]
    pub fn root_element(&self) -> Option<NodeId> {
        self.tree.document_element()
    }

    /// html5lib-style dump of the fragment's nodes: the children of the
    /// root element.
    #[must_use]
    pub fn fragment_dump(&self) -> String {
        self.root_element()
            .map(|root| self.tree.dump_children(root))
            .unwrap_or_default()
    }
}

/// [§ 13.2 Parsing HTML documents](https://html.spec.whatwg.org/multipage/parsing.html#parsing)
///
/// Parse a whole document.
///
/// # Errors
///
/// Returns a [`TokenizerFault`] if the tokenizer's internal invariants are
/// violated. Malformed markup is reported through
/// [`ParsedDocument::issues`], never as an error.
pub fn parse_document(html: &str, options: &ParserOptions) -> Result<ParsedDocument, TokenizerFault> {
    let dispatcher = Dispatcher::new(DomBuilder::new(), options.tree_builder);
    let mut tokenizer = Tokenizer::new(html, options.tokenizer, dispatcher);
    tokenizer.execute(TokenizerState::Start, None)?;
    Ok(finish(tokenizer))
}

/// [§ 13.5 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
///
/// Parse `html` as the contents of a `context` element.
///
/// `context` is an HTML tag name, or `svg name` / `math name` for a
/// foreign context element.
///
/// # Errors
///
/// As [`parse_document`].
pub fn parse_fragment(
    context: &str,
    html: &str,
    options: &ParserOptions,
) -> Result<ParsedDocument, TokenizerFault> {
    let (namespace, name) = split_context(context);

    let mut dispatcher = Dispatcher::new(DomBuilder::new(), options.tree_builder);
    dispatcher.start_fragment(&name, namespace, AttributeList::new());

    // STEP 4: "Set the state of the HTML parser's tokenization stage as
    // follows, switching on the context element"
    let state = if namespace == Namespace::Html {
        fragment_tokenizer_state(&name, options.tree_builder.scripting_enabled)
    } else {
        TokenizerState::Data
    };
    let end_tag = (state != TokenizerState::Data).then_some(name.as_str());

    log::debug!("parsing fragment in <{context}> starting in {state}");
    let mut tokenizer = Tokenizer::new(html, options.tokenizer, dispatcher);
    tokenizer.execute(state, end_tag)?;
    Ok(finish(tokenizer))
}

fn finish(tokenizer: Tokenizer<Dispatcher<DomBuilder>>) -> ParsedDocument {
    let dispatcher = tokenizer.into_handler();
    let quirks_mode = dispatcher.quirks_mode();
    let (tree, issues) = dispatcher.into_sink().finish();
    ParsedDocument {
        tree,
        issues,
        quirks_mode,
    }
}

/// Split `svg path` into its namespace and lowercase local name.
fn split_context(context: &str) -> (Namespace, String) {
    let context = context.trim();
    match context.split_once(' ') {
        Some(("svg", name)) => (Namespace::Svg, name.trim().to_string()),
        Some(("math", name)) => (Namespace::MathMl, name.trim().to_string()),
        _ => (Namespace::Html, context.to_ascii_lowercase()),
    }
}

/// The tokenizer state implied by an HTML context element.
fn fragment_tokenizer_state(name: &str, scripting_enabled: bool) -> TokenizerState {
    match name {
        // "title, textarea: Switch the tokenizer to the RCDATA state."
        "title" | "textarea" => TokenizerState::RcData,
        // "style, xmp, iframe, noembed, noframes: Switch the tokenizer to the
        // RAWTEXT state."
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => TokenizerState::RawText,
        // "script: Switch the tokenizer to the script data state."
        "script" => TokenizerState::ScriptData,
        // "noscript: If the scripting flag is enabled, switch the tokenizer to
        // the RAWTEXT state. Otherwise, leave the tokenizer in the data state."
        "noscript" if scripting_enabled => TokenizerState::RawText,
        // "plaintext: Switch the tokenizer to the PLAINTEXT state."
        "plaintext" => TokenizerState::PlainText,
        // "Any other element: Leave the tokenizer in the data state."
        _ => TokenizerState::Data,
    }
}
