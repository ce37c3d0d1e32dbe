//! [§ 13.2.6.4 The rules for parsing tokens in HTML content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhtml)
//!
//! One unit struct per insertion mode. The rules are stateless: all state
//! lives in the [`Dispatcher`]. "Process the token using the rules for X"
//! is a direct call to `X::method`, which leaves the current mode alone;
//! "reprocess the token" switches the mode and goes back through the
//! dispatcher.

mod after_body;
mod after_head;
mod before_head;
mod before_html;
mod foreign;
mod in_body;
mod in_caption;
mod in_cell;
mod in_column_group;
mod in_frameset;
mod in_head;
mod in_row;
mod in_select;
mod in_table;
mod in_table_body;
mod in_template;
mod initial;
mod text;

pub use after_body::{AfterAfterBody, AfterBody};
pub use after_head::AfterHead;
pub use before_head::BeforeHead;
pub use before_html::BeforeHtml;
pub use foreign::InForeignContent;
pub use in_body::InBody;
pub use in_caption::InCaption;
pub use in_cell::InCell;
pub use in_column_group::InColumnGroup;
pub use in_frameset::{AfterAfterFrameset, AfterFrameset, InFrameset};
pub use in_head::{InHead, InHeadNoscript};
pub use in_row::InRow;
pub use in_select::{InSelect, InSelectInTable};
pub use in_table::{InTable, InTableText};
pub use in_table_body::InTableBody;
pub use in_template::InTemplate;
pub use initial::Initial;
pub use text::Text;

use super::dispatcher::Dispatcher;
use super::handler::TreeHandler;
use super::token::TagToken;
use crate::tokenizer::{Doctype, SourceRange};

/// The token contract every insertion mode answers.
pub trait InsertionModeRules {
    /// A character token (a run of characters).
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange);

    /// A start tag token.
    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken);

    /// An end tag token.
    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, name: &str, source: SourceRange);

    /// A comment token. "Insert a comment." in most modes.
    fn comment<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        d.builder.insert_comment(text, source);
    }

    /// A DOCTYPE token. "Parse error. Ignore the token." in most modes.
    fn doctype<S: TreeHandler>(d: &mut Dispatcher<S>, _doctype: &Doctype, source: SourceRange) {
        d.builder.error(&format!("unexpected DOCTYPE in {}", d.mode), source.start);
    }

    /// The end-of-file token.
    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize);
}
