//! HTML tokenizer module.
//!
//! Implements [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! of the WHATWG HTML Living Standard.
//!
//! The tokenizer does not walk the specification's eighty character-level
//! states one code point at a time. Each lexical state scans ahead to the
//! next construct it cares about and interprets that construct as a whole,
//! reporting the same tokens and parse errors.

/// Lazy attribute capture and decoding.
pub mod attributes;
/// Character reference decoding per § 13.2.5.72.
pub mod character_reference;
/// Tokenizer state machine and the data state.
pub mod core;
/// Unrecoverable tokenizer conditions.
pub mod fault;
/// Byte scanning and text cleanup helpers.
pub mod helpers;
/// The token listener contract.
pub mod listener;
/// Named character reference lookup table per § 13.5.
pub mod named_character_references;
/// Tokenizer configuration.
pub mod options;
mod raw_text;
/// Token types.
pub mod token;

pub use attributes::Attributes;
pub use self::core::{LexicalState, Tokenizer, TokenizerState};
pub use fault::TokenizerFault;
pub use listener::{TokenCollector, TokenHandler};
pub use options::TokenizerOptions;
pub use token::{Attribute, AttributeList, Doctype, SourceRange, Token};
