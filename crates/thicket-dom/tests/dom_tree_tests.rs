//! Tests for the arena DOM: mutation (append, insert_before, remove_child,
//! move_children) and the html5lib-style dump.

use thicket_dom::{DoctypeData, DomTree, ElementData, Namespace, NodeId, NodeType};

/// Helper to create an HTML element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::html(tag)))
}

/// Helper to build `div > [a, b, c]` under the document.
fn div_with_three(tree: &mut DomTree) -> (NodeId, NodeId, NodeId, NodeId) {
    let parent = alloc_element(tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let a = alloc_element(tree, "a");
    let b = alloc_element(tree, "b");
    let c = alloc_element(tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);
    (parent, a, b, c)
}

// ========== append_child ==========

#[test]
fn test_append_child_links_siblings() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = div_with_three(&mut tree);

    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_eq!(tree.prev_sibling(a), None);
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.next_sibling(c), None);
}

#[test]
fn test_append_child_moves_attached_node() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = div_with_three(&mut tree);
    let other = alloc_element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, other);

    tree.append_child(other, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.children(other), &[b]);
    assert_eq!(tree.parent(b), Some(other));
    assert_eq!(tree.next_sibling(a), Some(c));
}

// ========== remove_child ==========

#[test]
fn test_remove_child_middle() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = div_with_three(&mut tree);

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.parent(b), None);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(b), None);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

#[test]
fn test_remove_child_of_wrong_parent_is_noop() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = div_with_three(&mut tree);

    tree.remove_child(NodeId::ROOT, b);

    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_eq!(tree.parent(b), Some(parent));
}

// ========== insert_before ==========

#[test]
fn test_insert_before_first_child() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = div_with_three(&mut tree);
    let new_child = alloc_element(&mut tree, "x");

    tree.insert_before(parent, new_child, a);

    assert_eq!(tree.children(parent), &[new_child, a, b, c]);
    assert_eq!(tree.prev_sibling(a), Some(new_child));
    assert_eq!(tree.prev_sibling(new_child), None);
}

#[test]
fn test_insert_before_unknown_reference_appends() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = div_with_three(&mut tree);
    let stray = alloc_element(&mut tree, "stray");
    let new_child = alloc_element(&mut tree, "x");

    tree.insert_before(parent, new_child, stray);

    assert_eq!(tree.children(parent), &[a, b, c, new_child]);
}

// ========== move_children ==========

#[test]
fn test_move_children_appends_after_existing() {
    let mut tree = DomTree::new();
    let (from, a, b, c) = div_with_three(&mut tree);
    let to = alloc_element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, to);
    let existing = alloc_element(&mut tree, "x");
    tree.append_child(to, existing);

    tree.move_children(from, to);

    assert!(tree.children(from).is_empty());
    assert_eq!(tree.children(to), &[existing, a, b, c]);
    assert_eq!(tree.parent(a), Some(to));
    assert_eq!(tree.next_sibling(existing), Some(a));
    assert_eq!(tree.prev_sibling(a), Some(existing));
}

#[test]
fn test_move_children_empty_source() {
    let mut tree = DomTree::new();
    let from = alloc_element(&mut tree, "div");
    let to = alloc_element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, from);
    tree.append_child(NodeId::ROOT, to);

    tree.move_children(from, to);

    assert!(tree.children(from).is_empty());
    assert!(tree.children(to).is_empty());
}

// ========== queries ==========

#[test]
fn test_document_element_and_body() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let head = alloc_element(&mut tree, "head");
    let body = alloc_element(&mut tree, "body");
    tree.append_child(html, head);
    tree.append_child(html, body);

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.body(), Some(body));
    assert!(tree.is_descendant_of(body, NodeId::ROOT));
    assert_eq!(tree.ancestors(body).collect::<Vec<_>>(), vec![html, NodeId::ROOT]);
}

#[test]
fn test_text_content_concatenates_descendants() {
    let mut tree = DomTree::new();
    let p = alloc_element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, p);
    let hello = tree.alloc(NodeType::Text("Hello ".to_string()));
    tree.append_child(p, hello);
    let b = alloc_element(&mut tree, "b");
    tree.append_child(p, b);
    let world = tree.alloc(NodeType::Text("World".to_string()));
    tree.append_child(b, world);

    assert_eq!(tree.text_content(p), "Hello World");
}

// ========== dump ==========

#[test]
fn test_dump_html5lib_format() {
    let mut tree = DomTree::new();
    let doctype = tree.alloc(NodeType::Doctype(DoctypeData {
        name: "html".to_string(),
        ..DoctypeData::default()
    }));
    tree.append_child(NodeId::ROOT, doctype);
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let mut p_data = ElementData::html("p");
    let _ = p_data.attrs.insert("class".to_string(), "x".to_string());
    let p = tree.alloc(NodeType::Element(p_data));
    tree.append_child(html, p);
    let text = tree.alloc(NodeType::Text("hi".to_string()));
    tree.append_child(p, text);
    let comment = tree.alloc(NodeType::Comment("c".to_string()));
    tree.append_child(html, comment);

    let expected = "\
| <!DOCTYPE html>
| <html>
|   <p>
|     class=\"x\"
|     \"hi\"
|   <!-- c -->
";
    assert_eq!(tree.dump(), expected);
}

#[test]
fn test_dump_foreign_namespace_prefix() {
    let mut tree = DomTree::new();
    let svg = tree.alloc(NodeType::Element(ElementData {
        tag_name: "svg".to_string(),
        namespace: Namespace::Svg,
        attrs: Default::default(),
    }));
    tree.append_child(NodeId::ROOT, svg);

    assert_eq!(tree.dump(), "| <svg svg>\n");
}
