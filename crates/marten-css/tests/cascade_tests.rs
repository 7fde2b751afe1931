//! Integration tests for selector matching and the cascade.

use marten_css::style::{Colour, DisplayType, FloatType, Length, Size, TextAlign};
use marten_css::{ComputedStyle, StyleMap, compute_styles, document_stylesheet, parse_stylesheet};
use marten_dom::{DomTree, ElementData, NodeId, NodeType};

fn alloc(tree: &mut DomTree, parent: NodeId, element: ElementData) -> NodeId {
    tree.append_new(parent, NodeType::Element(element))
}

fn style_of<'a>(styles: &'a StyleMap, id: NodeId) -> &'a ComputedStyle {
    styles.get(&id).expect("element has a style")
}

#[test]
fn test_class_beats_element_regardless_of_order() {
    for css in [
        "p { color: red } p.foo { color: blue }",
        "p.foo { color: blue } p { color: red }",
    ] {
        let mut tree = DomTree::new();
        let p = alloc(&mut tree, NodeId::ROOT, ElementData::new("p").with_attr("class", "foo"));
        let styles = compute_styles(&tree, &parse_stylesheet(css));
        assert_eq!(style_of(&styles, p).color, Colour(0x00_00ff), "{css}");
    }
}

#[test]
fn test_equal_specificity_later_rule_wins() {
    let mut tree = DomTree::new();
    let p = alloc(&mut tree, NodeId::ROOT, ElementData::new("p").with_attr("class", "a b"));
    let styles = compute_styles(
        &tree,
        &parse_stylesheet(".a { color: red } .b { color: green } .a { width: 5px }"),
    );
    assert_eq!(style_of(&styles, p).color, Colour(0x00_8000));

    let styles = compute_styles(&tree, &parse_stylesheet(".b { color: green } .a { color: red }"));
    assert_eq!(style_of(&styles, p).color, Colour(0xff_0000));
}

#[test]
fn test_id_beats_many_classes() {
    let mut tree = DomTree::new();
    let div = alloc(
        &mut tree,
        NodeId::ROOT,
        ElementData::new("div").with_attr("id", "x").with_attr("class", "a b c"),
    );
    let styles = compute_styles(
        &tree,
        &parse_stylesheet("#x { color: red } div.a.b.c { color: blue }"),
    );
    assert_eq!(style_of(&styles, div).color, Colour(0xff_0000));
}

#[test]
fn test_descendant_combinator_skips_levels() {
    let mut tree = DomTree::new();
    let ul = alloc(&mut tree, NodeId::ROOT, ElementData::new("ul").with_attr("class", "nav"));
    let li = alloc(&mut tree, ul, ElementData::new("li"));
    let span = alloc(&mut tree, li, ElementData::new("span"));
    let a = alloc(&mut tree, span, ElementData::new("a"));

    let styles = compute_styles(
        &tree,
        &parse_stylesheet("ul.nav a { color: lime } li ul a { color: red }"),
    );
    assert_eq!(style_of(&styles, a).color, Colour(0x00_ff00));
    // `ul.nav a` does not match the span itself, which inherits from li.
    assert_eq!(style_of(&styles, span).color, Colour::BLACK);
}

#[test]
fn test_inheritance_and_non_inherited_reset() {
    let mut tree = DomTree::new();
    let div = alloc(&mut tree, NodeId::ROOT, ElementData::new("div"));
    let span = alloc(&mut tree, div, ElementData::new("span"));
    let styles = compute_styles(
        &tree,
        &parse_stylesheet(
            "div { color: #123456; width: 50%; font-size: 20px; text-align: center; background-color: red }",
        ),
    );
    let span_style = style_of(&styles, span);
    assert_eq!(span_style.color, Colour(0x12_3456));
    assert!((span_style.font_size - 20.0).abs() < f32::EPSILON);
    assert_eq!(span_style.text_align, TextAlign::Center);
    assert_eq!(span_style.width, Size::Auto);
    assert!(span_style.background_color.is_transparent());
    assert_eq!(span_style.display, DisplayType::Inline);
}

#[test]
fn test_inherit_keyword_copies_parent() {
    let mut tree = DomTree::new();
    let div = alloc(&mut tree, NodeId::ROOT, ElementData::new("div"));
    let p = alloc(&mut tree, div, ElementData::new("p"));
    let styles = compute_styles(
        &tree,
        &parse_stylesheet("div { width: 30px; float: left } p { width: inherit; float: inherit }"),
    );
    let p_style = style_of(&styles, p);
    assert_eq!(p_style.width, Size::Length(Length::px(30.0)));
    assert_eq!(p_style.float, FloatType::Left);
}

#[test]
fn test_malformed_declarations_ignored() {
    let mut tree = DomTree::new();
    let p = alloc(&mut tree, NodeId::ROOT, ElementData::new("p"));
    let styles = compute_styles(
        &tree,
        &parse_stylesheet("p { color: green; color: notacolour; width: 10qq; display: sideways }"),
    );
    let style = style_of(&styles, p);
    assert_eq!(style.color, Colour(0x00_8000));
    assert_eq!(style.width, Size::Auto);
    // The UA sheet's `p { display: block }` survives.
    assert_eq!(style.display, DisplayType::Block);
}

#[test]
fn test_unsupported_selector_drops_rule_only() {
    let mut tree = DomTree::new();
    let p = alloc(&mut tree, NodeId::ROOT, ElementData::new("p"));
    let sheet = parse_stylesheet("div > p { color: red } p:first-child { color: red } p { color: navy }");
    assert_eq!(sheet.rules.len(), 1);
    let styles = compute_styles(&tree, &sheet);
    assert_eq!(style_of(&styles, p).color, Colour(0x00_0080));
}

#[test]
fn test_inline_style_and_important() {
    let mut tree = DomTree::new();
    let p = alloc(
        &mut tree,
        NodeId::ROOT,
        ElementData::new("p")
            .with_attr("id", "x")
            .with_attr("style", "color: red; width: 7px"),
    );
    let styles = compute_styles(
        &tree,
        &parse_stylesheet("#x { color: blue; width: 9px !important }"),
    );
    let style = style_of(&styles, p);
    assert_eq!(style.color, Colour(0xff_0000));
    assert_eq!(style.width, Size::Length(Length::px(9.0)));
}

#[test]
fn test_presentational_hints_lose_to_rules() {
    let mut tree = DomTree::new();
    let table = alloc(&mut tree, NodeId::ROOT, ElementData::new("table"));
    let tr = alloc(&mut tree, table, ElementData::new("tr"));
    let td = alloc(
        &mut tree,
        tr,
        ElementData::new("td").with_attr("width", "40").with_attr("bgcolor", "#00ff00"),
    );
    let styles = compute_styles(&tree, &parse_stylesheet("td { width: 60px }"));
    let style = style_of(&styles, td);
    assert_eq!(style.width, Size::Length(Length::px(60.0)));
    assert_eq!(style.background_color, Colour(0x00_ff00));
    assert_eq!(style.display, DisplayType::TableCell);
}

#[test]
fn test_document_stylesheet_from_style_elements() {
    let tree = marten_html::parse(
        "<html><head><style>p { color: red }</style><style>.x { width: 3px }</style></head>\
         <body><p class=x>t</p></body></html>",
    )
    .unwrap();
    let sheet = document_stylesheet(&tree);
    assert_eq!(sheet.rules.len(), 2);
    let styles = compute_styles(&tree, &sheet);
    let body = tree.body().unwrap();
    let p = tree.children(body)[0];
    assert_eq!(style_of(&styles, p).color, Colour(0xff_0000));
    assert_eq!(style_of(&styles, p).width, Size::Length(Length::px(3.0)));
}
