//! HTML tokenizer and tree builder for the thicket parser.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Input preprocessing (newline normalization, disallowed code points)
//!   - Data, RCDATA, RAWTEXT, script data (with escapes) and PLAINTEXT states
//!   - Tags, lazily decoded attributes, comments, DOCTYPEs and CDATA sections
//!   - Named and numeric character references with the full entity table
//!
//! - **Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All insertion modes and the rules for foreign content
//!   - The adoption agency algorithm, foster parenting, and quirks mode
//!   - The fragment parsing algorithm
//!   - A sink contract ([`tree_builder::TreeHandler`]) so callers own the nodes
//!
//! - **DOM sink** ([`dom_builder::DomBuilder`]) and one-call entry points in
//!   [`parser`].
//!
//! # Not Implemented
//!
//! - Encoding sniffing; input is already a Rust string
//! - Script execution and `document.write`
//! - Template contents as a separate document fragment

/// A `TreeHandler` that builds a `thicket_dom::DomTree`.
pub mod dom_builder;
/// Document and fragment parsing entry points.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;
/// HTML tree construction.
pub mod tree_builder;

pub use dom_builder::DomBuilder;
pub use parser::{ParseIssue, ParsedDocument, ParserOptions, parse_document, parse_fragment};
pub use tokenizer::{Attribute, Token, Tokenizer, TokenizerFault, TokenizerOptions};
pub use tree_builder::{Dispatcher, InsertionMode, QuirksMode, TreeHandler};
