//! Tests for markup-to-tree construction.

use marten_dom::{DomTree, NodeId};
use marten_html::{dump_tree, parse};

fn tags(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .filter_map(|&c| tree.as_element(c).map(|e| e.tag_name.clone()))
        .collect()
}

#[test]
fn test_basic_document() {
    let tree = parse("<html><body><p class='a b'>Hi <b>there</b></p></body></html>").unwrap();
    let body = tree.body().unwrap();
    assert_eq!(tags(&tree, body), vec!["p"]);
    let p = tree.children(body)[0];
    assert_eq!(tree.as_element(p).unwrap().classes(), vec!["a", "b"]);
    assert_eq!(tree.text_content(p), "Hi there");
}

#[test]
fn test_tags_and_attributes_lowercased() {
    let tree = parse(r#"<DIV ID="x" Class="y">t</DIV>"#).unwrap();
    let div = tree.document_element().unwrap();
    let data = tree.as_element(div).unwrap();
    assert_eq!(data.tag_name, "div");
    assert_eq!(data.id(), Some("x"));
    assert_eq!(data.attr("class"), Some("y"));
}

#[test]
fn test_void_elements_do_not_nest() {
    let tree = parse("<p>a<br>b<img src=x.png alt=pic>c<input type=text name=q></p>").unwrap();
    let p = tree.document_element().unwrap();
    assert_eq!(tags(&tree, p), vec!["br", "img", "input"]);
    assert_eq!(tree.text_content(p), "abc");
    let img = tree.children(p)[3];
    assert_eq!(tree.as_element(img).unwrap().attr("src"), Some("x.png"));
}

#[test]
fn test_valueless_attribute() {
    let tree = parse("<input type=checkbox name=c checked>").unwrap();
    let input = tree.document_element().unwrap();
    assert!(tree.as_element(input).unwrap().has_attr("checked"));
}

#[test]
fn test_implied_end_tags() {
    let tree = parse(
        "<body><ul><li>one<li>two</ul><p>a<p>b<table><tr><td>1<td>2<tr><td>3</table></body>",
    )
    .unwrap();
    let body = tree.body().unwrap();
    assert_eq!(tags(&tree, body), vec!["ul", "p", "p", "table"]);
    let ul = tree.children(body)[0];
    assert_eq!(tags(&tree, ul), vec!["li", "li"]);
    let table = tree.children(body)[3];
    assert_eq!(tags(&tree, table), vec!["tr", "tr"]);
    let first_row = tree.children(table)[0];
    assert_eq!(tags(&tree, first_row), vec!["td", "td"]);
}

#[test]
fn test_character_references() {
    let tree = parse("<p>a&amp;b&nbsp;c&#33;</p>").unwrap();
    let p = tree.document_element().unwrap();
    assert_eq!(tree.text_content(p), "a&b\u{a0}c!");
}

#[test]
fn test_stray_end_tag_ignored() {
    let tree = parse("<div>x</span>y</div>").unwrap();
    let div = tree.document_element().unwrap();
    assert_eq!(tree.text_content(div), "xy");
}

#[test]
fn test_dump_tree_outline() {
    let tree = parse("<div id=a><p>text</p></div>").unwrap();
    let dump = dump_tree(&tree, NodeId::ROOT);
    assert_eq!(dump, "Document\n  <div id=\"a\">\n    <p>\n      \"text\"\n");
}
