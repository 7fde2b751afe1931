//! Tests for tree construction and traversal helpers.

use marten_dom::{DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag)))
}

#[test]
fn test_append_child_sets_parent() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, div);
    let p = alloc_element(&mut tree, "p");
    tree.append_child(div, p);

    assert_eq!(tree.children(div), &[p]);
    assert_eq!(tree.parent(p), Some(div));
    assert_eq!(tree.ancestors(p).collect::<Vec<_>>(), vec![div, NodeId::ROOT]);
}

#[test]
fn test_descendants_are_document_order() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let body = tree.append_new(html, NodeType::Element(ElementData::new("body")));
    let a = tree.append_new(body, NodeType::Element(ElementData::new("a")));
    let t = tree.append_new(a, NodeType::Text("x".into()));
    let b = tree.append_new(body, NodeType::Element(ElementData::new("b")));

    let order: Vec<_> = tree.descendants(html).collect();
    assert_eq!(order, vec![html, body, a, t, b]);
    assert_eq!(tree.body(), Some(body));
    assert_eq!(tree.document_element(), Some(html));
}

#[test]
fn test_text_content_concatenates() {
    let mut tree = DomTree::new();
    let p = tree.append_new(NodeId::ROOT, NodeType::Element(ElementData::new("p")));
    let _ = tree.append_new(p, NodeType::Text("hello ".into()));
    let em = tree.append_new(p, NodeType::Element(ElementData::new("em")));
    let _ = tree.append_new(em, NodeType::Text("world".into()));
    let _ = tree.append_new(p, NodeType::Comment("ignored".into()));

    assert_eq!(tree.text_content(p), "hello world");
}

#[test]
fn test_classes_split_on_whitespace() {
    let data = ElementData::new("p")
        .with_attr("class", "  foo\tbar  baz ")
        .with_attr("id", "main");
    assert_eq!(data.classes(), vec!["foo", "bar", "baz"]);
    assert_eq!(data.id(), Some("main"));
    assert!(data.has_attr("class"));
    assert_eq!(data.attr("missing"), None);
}
