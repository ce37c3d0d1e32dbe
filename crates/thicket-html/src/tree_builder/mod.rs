//! HTML tree construction.
//!
//! Implements [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//! on top of the tokenizer.
//!
//! The [`Dispatcher`] is the tokenizer's [`TokenHandler`](crate::tokenizer::TokenHandler).
//! It tracks the insertion mode and routes each token to the rules of that
//! mode, or to the rules for foreign content. The rules operate on a shared
//! [`TreeBuilder`], which owns the stack of open elements, the list of active
//! formatting elements and the element pointers, and which materializes
//! nodes through a caller supplied [`TreeHandler`].

/// Shared tree construction state and algorithms.
pub mod builder;
/// Insertion mode routing.
pub mod dispatcher;
/// Elements on the stack of open elements.
pub mod element;
/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
pub mod formatting;
/// SVG and MathML adjustments.
pub mod foreign_content;
/// The sink contract.
pub mod handler;
pub(crate) mod modes;
/// Quirks mode determination.
pub mod quirks;
/// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
pub mod stack;
/// Start tag tokens and character helpers.
pub mod token;

pub use builder::{TreeBuilder, TreeBuilderOptions};
pub use dispatcher::{Dispatcher, InsertionMode};
pub use element::{Element, ElementRef, Namespace};
pub use formatting::{ActiveFormattingElements, FormattingEntry};
pub use handler::{NewElement, Preposition, TreeHandler};
pub use quirks::QuirksMode;
pub use stack::{OpenElements, Scope};
pub use token::TagToken;
