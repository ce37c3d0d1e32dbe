use std::rc::Rc;

use super::element::ElementRef;

/// Number of identical entries after the last marker that the list keeps.
const NOAHS_ARK_LIMIT: usize = 3;

/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
///
/// "The list contains elements in the formatting category, and markers."
#[derive(Debug)]
pub enum FormattingEntry<H> {
    /// "Markers are inserted when entering applet, object, marquee,
    /// template, td, th, and caption elements, and are used to prevent
    /// formatting from "leaking" into applet, object, marquee, template, td,
    /// th, and caption elements."
    Marker,
    /// A formatting element.
    Formatting(ElementRef<H>),
}

impl<H> Clone for FormattingEntry<H> {
    fn clone(&self) -> Self {
        match self {
            Self::Marker => Self::Marker,
            Self::Formatting(element) => Self::Formatting(Rc::clone(element)),
        }
    }
}

impl<H> FormattingEntry<H> {
    /// The element, unless this is a marker.
    #[must_use]
    pub const fn element(&self) -> Option<&ElementRef<H>> {
        match self {
            Self::Marker => None,
            Self::Formatting(element) => Some(element),
        }
    }
}

/// The list of active formatting elements.
#[derive(Debug)]
pub struct ActiveFormattingElements<H> {
    entries: Vec<FormattingEntry<H>>,
}

impl<H> Default for ActiveFormattingElements<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> ActiveFormattingElements<H> {
    /// An empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of entries, markers included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FormattingEntry<H>> {
        self.entries.get(index)
    }

    /// Iterate from the oldest entry.
    pub fn iter(&self) -> std::slice::Iter<'_, FormattingEntry<H>> {
        self.entries.iter()
    }

    /// "Insert a marker at the end of the list of active formatting elements."
    pub fn push_marker(&mut self) {
        self.entries.push(FormattingEntry::Marker);
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// "If there are already three elements in the list of active formatting
    /// elements after the last marker, if any, or anywhere in the list if
    /// there are no markers, that have the same tag name, namespace, and
    /// attributes as element, then remove the earliest such element from the
    /// list of active formatting elements."
    pub fn push(&mut self, element: ElementRef<H>) {
        let mut matches = Vec::new();
        for (index, entry) in self.entries.iter().enumerate().rev() {
            match entry {
                FormattingEntry::Marker => break,
                FormattingEntry::Formatting(existing) => {
                    if existing.same_formatting(&element) {
                        matches.push(index);
                    }
                }
            }
        }
        if matches.len() >= NOAHS_ARK_LIMIT {
            if let Some(&earliest) = matches.last() {
                let _ = self.entries.remove(earliest);
            }
        }
        self.entries.push(FormattingEntry::Formatting(element));
    }

    /// "Clear the list of active formatting elements up to the last marker"
    pub fn clear_to_last_marker(&mut self) {
        while let Some(entry) = self.entries.pop() {
            if matches!(entry, FormattingEntry::Marker) {
                break;
            }
        }
    }

    /// Position of `element` in the list.
    #[must_use]
    pub fn index_of(&self, element: &ElementRef<H>) -> Option<usize> {
        self.entries.iter().position(|entry| {
            entry
                .element()
                .is_some_and(|existing| Rc::ptr_eq(existing, element))
        })
    }

    /// Whether `element` is in the list.
    #[must_use]
    pub fn contains(&self, element: &ElementRef<H>) -> bool {
        self.index_of(element).is_some()
    }

    /// "the last element in the list of active formatting elements that is
    /// between the end of the list and the last marker in the list, if any,
    /// or the start of the list otherwise, and has the tag name subject"
    #[must_use]
    pub fn last_after_marker_named(&self, name: &str) -> Option<(usize, ElementRef<H>)> {
        for (index, entry) in self.entries.iter().enumerate().rev() {
            match entry {
                FormattingEntry::Marker => return None,
                FormattingEntry::Formatting(element) => {
                    if element.is_html(name) {
                        return Some((index, Rc::clone(element)));
                    }
                }
            }
        }
        None
    }

    /// Remove the entry at `index`.
    pub fn remove_at(&mut self, index: usize) {
        let _ = self.entries.remove(index);
    }

    /// Remove `element` if present.
    pub fn remove(&mut self, element: &ElementRef<H>) {
        if let Some(index) = self.index_of(element) {
            self.remove_at(index);
        }
    }

    /// Insert `element` at `index`.
    pub fn insert(&mut self, index: usize, element: ElementRef<H>) {
        self.entries
            .insert(index.min(self.entries.len()), FormattingEntry::Formatting(element));
    }

    /// Replace the entry at `index` with `element`.
    pub fn replace_at(&mut self, index: usize, element: ElementRef<H>) {
        self.entries[index] = FormattingEntry::Formatting(element);
    }
}
