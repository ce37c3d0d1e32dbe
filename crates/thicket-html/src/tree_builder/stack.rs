use std::rc::Rc;

use super::element::{ElementRef, Namespace};

/// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
///
/// The element types that bound a "has an element in scope" search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// "has an element in scope"
    Default,
    /// "has an element in list item scope": default plus `ol`, `ul`.
    ListItem,
    /// "has an element in button scope": default plus `button`.
    Button,
    /// "has an element in table scope": `html`, `table`, `template`.
    Table,
    /// "has an element in select scope": everything except `optgroup`
    /// and `option`.
    Select,
}

impl Scope {
    /// Whether an element with this namespace and name stops the search.
    fn is_boundary(self, namespace: Namespace, name: &str) -> bool {
        let html = namespace == Namespace::Html;
        let default = || match namespace {
            Namespace::Html => matches!(
                name,
                "applet" | "caption" | "html" | "table" | "td" | "th" | "marquee" | "object" | "template"
            ),
            Namespace::MathMl => matches!(name, "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"),
            Namespace::Svg => matches!(name, "foreignObject" | "desc" | "title"),
        };
        match self {
            Self::Default => default(),
            Self::ListItem => default() || (html && matches!(name, "ol" | "ul")),
            Self::Button => default() || (html && name == "button"),
            Self::Table => html && matches!(name, "html" | "table" | "template"),
            Self::Select => !(html && matches!(name, "optgroup" | "option")),
        }
    }
}

/// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
///
/// "Initially, the stack of open elements is empty. The stack grows
/// downwards; the topmost node on the stack is the first one added to the
/// stack, and the bottommost node of the stack is the most recently added
/// node in the stack"
///
/// Index 0 is the topmost node (normally `html`); the last entry is the
/// current node.
#[derive(Debug)]
pub struct OpenElements<H> {
    elements: Vec<ElementRef<H>>,
}

impl<H> Default for OpenElements<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> OpenElements<H> {
    /// An empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Push onto the bottom of the stack.
    pub fn push(&mut self, element: ElementRef<H>) {
        self.elements.push(element);
    }

    /// Pop the current node.
    pub fn pop(&mut self) -> Option<ElementRef<H>> {
        self.elements.pop()
    }

    /// "The current node is the bottommost node in this stack of open elements."
    #[must_use]
    pub fn current(&self) -> Option<&ElementRef<H>> {
        self.elements.last()
    }

    /// Element at `index`, counted from the top.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ElementRef<H>> {
        self.elements.get(index)
    }

    /// Number of open elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if no element is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate from the top (index 0) to the current node.
    pub fn iter(&self) -> std::slice::Iter<'_, ElementRef<H>> {
        self.elements.iter()
    }

    /// Position of `element` on the stack.
    #[must_use]
    pub fn index_of(&self, element: &ElementRef<H>) -> Option<usize> {
        self.elements.iter().position(|open| Rc::ptr_eq(open, element))
    }

    /// Whether `element` is on the stack.
    #[must_use]
    pub fn contains(&self, element: &ElementRef<H>) -> bool {
        self.index_of(element).is_some()
    }

    /// Whether an HTML element with this name is on the stack.
    #[must_use]
    pub fn contains_html(&self, name: &str) -> bool {
        self.elements.iter().any(|open| open.is_html(name))
    }

    /// Position of the last HTML element with this name.
    #[must_use]
    pub fn last_index_of_html(&self, name: &str) -> Option<usize> {
        self.elements.iter().rposition(|open| open.is_html(name))
    }

    /// Remove `element` wherever it is. Returns false if it was not open.
    pub fn remove(&mut self, element: &ElementRef<H>) -> bool {
        match self.index_of(element) {
            Some(index) => {
                let _ = self.elements.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove the element at `index`.
    pub fn remove_at(&mut self, index: usize) -> ElementRef<H> {
        self.elements.remove(index)
    }

    /// Insert at `index`, shifting later entries down.
    pub fn insert(&mut self, index: usize, element: ElementRef<H>) {
        self.elements.insert(index, element);
    }

    /// Replace the element at `index`.
    pub fn replace_at(&mut self, index: usize, element: ElementRef<H>) {
        self.elements[index] = element;
    }

    /// "The stack of open elements is said to have a particular element in
    /// a specific scope consisting of a list of element types list when the
    /// following algorithm terminates in a match state"
    ///
    /// Searches for an HTML element named `name`.
    #[must_use]
    pub fn has_in_scope(&self, name: &str, scope: Scope) -> bool {
        self.has_any_in_scope(&[name], scope)
    }

    /// Like [`has_in_scope`](Self::has_in_scope) for any of several names.
    #[must_use]
    pub fn has_any_in_scope(&self, names: &[&str], scope: Scope) -> bool {
        for node in self.elements.iter().rev() {
            // STEP 2: "If node is the target node, terminate in a match state."
            if node.is_html_one_of(names) {
                return true;
            }
            // STEP 3: "Otherwise, if node is one of the element types in list,
            // terminate in a failure state."
            if scope.is_boundary(node.namespace, &node.name) {
                return false;
            }
        }
        false
    }

    /// Scope search for a specific element rather than a tag name.
    #[must_use]
    pub fn has_element_in_scope(&self, target: &ElementRef<H>, scope: Scope) -> bool {
        for node in self.elements.iter().rev() {
            if Rc::ptr_eq(node, target) {
                return true;
            }
            if scope.is_boundary(node.namespace, &node.name) {
                return false;
            }
        }
        false
    }
}
