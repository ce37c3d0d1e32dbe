use super::InsertionModeRules;
use crate::tokenizer::SourceRange;
use crate::tree_builder::dispatcher::Dispatcher;
use crate::tree_builder::handler::TreeHandler;
use crate::tree_builder::token::TagToken;

/// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
///
/// Content of `script`, `style`, `title`, `textarea` and the other raw
/// text elements. The tokenizer only produces characters and the matching
/// end tag here.
pub struct Text;

impl Text {
    /// Pop the text element and go back to the original insertion mode.
    fn finish<S: TreeHandler>(d: &mut Dispatcher<S>, source: SourceRange) {
        let _ = d.builder.pop(source);
        d.set_mode(d.original_mode);
    }
}

impl InsertionModeRules for Text {
    /// "A character token": "Insert the token's character."
    fn characters<S: TreeHandler>(d: &mut Dispatcher<S>, text: &str, source: SourceRange) {
        d.builder.insert_characters(text, source);
    }

    fn start_tag<S: TreeHandler>(d: &mut Dispatcher<S>, tag: TagToken) {
        d.builder
            .error(&format!("unexpected <{}> in text", tag.name), tag.source.start);
    }

    /// "An end tag whose tag name is "script"" and "Any other end tag":
    /// "Pop the current node off the stack of open elements. Switch the
    /// insertion mode to the original insertion mode."
    fn end_tag<S: TreeHandler>(d: &mut Dispatcher<S>, _name: &str, source: SourceRange) {
        Self::finish(d, source);
    }

    /// "An end-of-file token": "Parse error. ... Pop the current node off the
    /// stack of open elements. Switch the insertion mode to the original
    /// insertion mode and reprocess the token."
    fn end_of_file<S: TreeHandler>(d: &mut Dispatcher<S>, pos: usize) {
        let name = d.builder.current().map(|current| current.name.clone()).unwrap_or_default();
        d.builder
            .error(&format!("end of file inside <{name}>"), pos);
        Self::finish(d, SourceRange::empty_at(pos));
        d.process_end_of_file(pos);
    }
}
