//! End-to-end layout tests: markup in, geometry out.

use marten_common::YieldPoint;
use marten_css::{compute_styles, document_stylesheet};
use marten_form::{FormSet, WrappedText};
use marten_layout::{
    ApproximateFontMetrics, BoxId, BoxTree, BoxType, LayoutContext, build_box_tree,
    layout_document, normalize,
};

fn build(html: &str) -> (BoxTree, FormSet) {
    let dom = marten_html::parse(html).unwrap();
    let styles = compute_styles(&dom, &document_stylesheet(&dom));
    let mut forms = FormSet::new();
    let mut tree = build_box_tree(&dom, &styles, &mut forms, &mut YieldPoint::none()).unwrap();
    let root = tree.root();
    normalize(&mut tree, root).unwrap();
    (tree, forms)
}

fn relayout(tree: &mut BoxTree, width: i32) {
    let metrics = ApproximateFontMetrics;
    let mut ctx = LayoutContext::new(&metrics);
    layout_document(tree, &mut ctx, width).unwrap();
}

fn lay_out(html: &str, width: i32) -> (BoxTree, FormSet) {
    let (mut tree, forms) = build(html);
    relayout(&mut tree, width);
    (tree, forms)
}

fn find_text(tree: &BoxTree, text: &str) -> BoxId {
    tree.descendants(tree.root())
        .into_iter()
        .find(|&id| tree[id].text.as_ref().is_some_and(|t| t.text == text))
        .unwrap_or_else(|| panic!("no box with text {text:?}"))
}

fn texts(tree: &BoxTree) -> Vec<String> {
    tree.descendants(tree.root())
        .into_iter()
        .filter_map(|id| tree[id].text.as_ref().map(|t| t.text.clone()))
        .collect()
}

fn of_type(tree: &BoxTree, box_type: BoxType) -> Vec<BoxId> {
    tree.descendants(tree.root())
        .into_iter()
        .filter(|&id| tree[id].box_type == box_type)
        .collect()
}

// ---------------------------------------------------------------------------
// Block flow
// ---------------------------------------------------------------------------

#[test]
fn test_body_margin_and_width() {
    let (tree, _) = lay_out("<html><body><div>x</div></body></html>", 300);
    let div = tree[find_text(&tree, "x")].parent.and_then(|c| tree[c].parent).unwrap();
    let body = tree[div].parent.unwrap();
    assert_eq!(tree[body].width, 284);
    assert_eq!((tree[body].x, tree[body].y), (8, 8));
    assert_eq!(tree[div].width, 284);
}

#[test]
fn test_sibling_margins_collapse() {
    let (tree, _) = lay_out(
        "<html><body><div style=\"margin-bottom:20px\">a</div>\
         <div style=\"margin-top:30px\">b</div></body></html>",
        400,
    );
    let first = tree[find_text(&tree, "a")].parent.and_then(|c| tree[c].parent).unwrap();
    let second = tree[find_text(&tree, "b")].parent.and_then(|c| tree[c].parent).unwrap();
    let first_bottom = tree[first].y + tree[first].height;
    assert_eq!(tree[second].y - first_bottom, 30);
}

#[test]
fn test_enormous_lengths_are_clamped() {
    let (tree, _) = lay_out(
        "<html><body style=\"margin:0\"><div style=\"width:3000000000px;padding-left:5px\">x</div></body></html>",
        800,
    );
    let div = tree[find_text(&tree, "x")].parent.and_then(|c| tree[c].parent).unwrap();
    assert_eq!(tree[div].width, 1_000_000);
    assert_eq!(tree[div].padding.left, 5);
    assert_eq!(tree[div].max_width, 1_000_005);
}

#[test]
fn test_inline_block_contents_laid_out_where_placed() {
    let (tree, _) = lay_out(
        "<html><body style=\"margin:0\"><p style=\"margin:0\">aaaa \
         <span style=\"display:inline-block\"><div>bb</div><div>cc</div></span></p></body></html>",
        44,
    );
    // 32px of text leaves no room for the 16px inline-block: it starts the
    // second line, with its two blocks stacked inside it.
    let block = of_type(&tree, BoxType::InlineBlock)[0];
    assert_eq!((tree[block].x, tree[block].y), (0, 21));
    assert_eq!(tree[block].width, 16);
    assert_eq!(tree[block].height, 42);
    let second = tree[find_text(&tree, "cc")].parent.and_then(|c| tree[c].parent).unwrap();
    assert_eq!(tree[second].y, 21);
}

#[test]
fn test_auto_margins_centre_fixed_width_block() {
    let (tree, _) = lay_out(
        "<html><body style=\"margin:0\"><div style=\"width:100px;margin:0 auto\">x</div></body></html>",
        300,
    );
    let div = tree[find_text(&tree, "x")].parent.and_then(|c| tree[c].parent).unwrap();
    assert_eq!(tree[div].width, 100);
    assert_eq!(tree[div].x, 100);
}

// ---------------------------------------------------------------------------
// Lines
// ---------------------------------------------------------------------------

#[test]
fn test_lines_break_at_spaces() {
    let (tree, _) = lay_out(
        "<html><body><p>one two three four five six seven eight</p></body></html>",
        100,
    );
    assert_eq!(
        texts(&tree),
        ["one two", "three four", "five six", "seven", "eight"]
    );
    let ys: Vec<i32> = texts(&tree)
        .iter()
        .map(|t| tree[find_text(&tree, t)].y)
        .collect();
    assert_eq!(ys, [0, 21, 42, 63, 84]);
}

#[test]
fn test_relayout_merges_continuations() {
    let (mut tree, _) = build("<html><body><p>one two three four five six seven eight</p></body></html>");
    relayout(&mut tree, 100);
    assert_eq!(texts(&tree).len(), 5);

    relayout(&mut tree, 2000);
    assert_eq!(texts(&tree), ["one two three four five six seven eight"]);
    let id = find_text(&tree, "one two three four five six seven eight");
    assert_eq!(tree[id].clone_of, None);
    let container = tree[id].parent.unwrap();
    assert_eq!(tree[container].height, 21);

    relayout(&mut tree, 100);
    assert_eq!(texts(&tree).len(), 5);
}

#[test]
fn test_overlong_word_overflows_rather_than_vanishing() {
    let (tree, _) = lay_out(
        "<html><body style=\"margin:0\"><p>incomprehensibilities ok</p></body></html>",
        50,
    );
    assert_eq!(texts(&tree), ["incomprehensibilities", "ok"]);
    assert_eq!(tree[find_text(&tree, "ok")].y, 21);
}

#[test]
fn test_text_align_right_and_center() {
    let (tree, _) = lay_out(
        "<html><body style=\"margin:0\"><div style=\"text-align:right\">abc</div>\
         <div style=\"text-align:center\">abcd</div></body></html>",
        200,
    );
    assert_eq!(tree[find_text(&tree, "abc")].x, 176);
    assert_eq!(tree[find_text(&tree, "abcd")].x, 84);
}

#[test]
fn test_nowrap_keeps_one_line() {
    let (tree, _) = lay_out(
        "<html><body style=\"margin:0\"><div style=\"white-space:nowrap\">a b c d e f g h</div></body></html>",
        40,
    );
    assert_eq!(texts(&tree), ["a b c d e f g h"]);
}

// ---------------------------------------------------------------------------
// Floats
// ---------------------------------------------------------------------------

#[test]
fn test_text_flows_beside_left_float_and_clear_moves_below() {
    let (tree, _) = lay_out(
        "<html><body><div style=\"width:300px\">\
         <div style=\"float:left;width:100px;height:50px\"></div>text text\
         <div style=\"clear:left\">after</div></div></body></html>",
        800,
    );
    let float = of_type(&tree, BoxType::FloatLeft)[0];
    assert_eq!((tree[float].width, tree[float].height), (100, 50));
    assert_eq!(tree[float].x, 0);

    assert_eq!(tree[find_text(&tree, "text text")].x, 100);

    let cleared = tree[find_text(&tree, "after")].parent.and_then(|c| tree[c].parent).unwrap();
    assert_eq!(tree[cleared].y, 50);
}

#[test]
fn test_right_float_narrows_line_from_the_right() {
    let (tree, _) = lay_out(
        "<html><body style=\"margin:0\"><div style=\"width:200px\">\
         <div style=\"float:right;width:130px;height:30px\"></div>\
         alpha beta gamma</div></body></html>",
        800,
    );
    let float = of_type(&tree, BoxType::FloatRight)[0];
    assert_eq!(tree[float].x, 70);
    // 70px beside the float holds "alpha" but not "alpha beta".
    assert_eq!(texts(&tree)[0], "alpha");
}

#[test]
fn test_root_grows_to_contain_floats() {
    let (tree, _) = lay_out(
        "<html><body style=\"margin:0\"><div style=\"float:left;width:10px;height:500px\"></div></body></html>",
        800,
    );
    assert!(tree[tree.root()].height >= 500);
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

#[test]
fn test_colspan_table_shares_fixed_width_over_its_columns() {
    let (tree, _) = lay_out(
        "<html><body><table><tr><td>a</td><td>b</td></tr>\
         <tr><td colspan=\"2\" style=\"width:100px\">c</td></tr></table></body></html>",
        300,
    );
    let table = of_type(&tree, BoxType::Table)[0];
    let widths: Vec<i32> = tree[table].col.iter().map(|c| c.used).collect();
    assert_eq!(widths, [51, 51]);
    assert_eq!(tree[table].width, 102);

    let spanning = tree[find_text(&tree, "c")].parent.and_then(|c| tree[c].parent).unwrap();
    assert_eq!(tree[spanning].width, 100);

    let rows = of_type(&tree, BoxType::TableRow);
    let heights: Vec<i32> = rows.iter().map(|&r| tree[r].height).collect();
    assert_eq!(heights, [23, 23]);
    assert_eq!(tree[table].height, heights.iter().sum::<i32>());
}

#[test]
fn test_row_span_height_lands_on_last_row() {
    let (tree, _) = lay_out(
        "<html><body><table><tr><td rowspan=\"2\" style=\"height:100px\">tall</td><td>a</td></tr>\
         <tr><td>b</td></tr></table></body></html>",
        300,
    );
    let table = of_type(&tree, BoxType::Table)[0];
    let rows = of_type(&tree, BoxType::TableRow);
    let heights: Vec<i32> = rows.iter().map(|&r| tree[r].height).collect();
    assert_eq!(heights[0], 23);
    assert_eq!(heights[0] + heights[1], 102);
    assert_eq!(tree[table].height, 102);

    let tall = tree[find_text(&tree, "tall")].parent.and_then(|c| tree[c].parent).unwrap();
    assert_eq!(tree[tall].height, 100);
}

#[test]
fn test_relayout_keeps_percent_and_fixed_columns() {
    let (mut tree, _) = build(
        "<html><body><table style=\"width:400px\"><tr><td style=\"width:25%\">a</td>\
         <td style=\"width:50px\">b</td><td>c</td></tr></table></body></html>",
    );
    let used = |tree: &BoxTree| -> Vec<i32> {
        let table = of_type(tree, BoxType::Table)[0];
        tree[table].col.iter().map(|c| c.used).collect()
    };

    relayout(&mut tree, 800);
    // 25% of 400, 50px plus 1px padding each side, the rest.
    assert_eq!(used(&tree), [100, 52, 248]);

    relayout(&mut tree, 800);
    assert_eq!(used(&tree), [100, 52, 248]);

    relayout(&mut tree, 300);
    assert_eq!(used(&tree), [100, 52, 248]);
}

#[test]
fn test_huge_rowspan_in_a_later_row() {
    let (tree, _) = lay_out(
        "<html><body><table><tr><td>a</td></tr>\
         <tr><td rowspan=\"18446744073709551615\">b</td></tr></table></body></html>",
        300,
    );
    let table = of_type(&tree, BoxType::Table)[0];
    let rows = of_type(&tree, BoxType::TableRow);
    let heights: Vec<i32> = rows.iter().map(|&r| tree[r].height).collect();
    assert_eq!(heights, [23, 23]);
    assert_eq!(tree[table].height, 46);
}

#[test]
fn test_explicit_table_width_is_conserved() {
    let (tree, _) = lay_out(
        "<html><body><table style=\"width:250px\"><tr><td>one</td><td>two two</td><td>3</td></tr></table></body></html>",
        600,
    );
    let table = of_type(&tree, BoxType::Table)[0];
    assert_eq!(tree[table].width, 250);
    assert_eq!(tree[table].col.iter().map(|c| c.used).sum::<i32>(), 250);
}

// ---------------------------------------------------------------------------
// Form gadgets
// ---------------------------------------------------------------------------

#[test]
fn test_textarea_wrapped_lines_follow_layout() {
    let (tree, forms) = lay_out(
        "<html><body><form><textarea name=\"t\" cols=\"10\" rows=\"2\">hello world foo</textarea></form></body></html>",
        800,
    );
    let control = &forms.controls()[0];
    let gadget = BoxId(control.layout_box.unwrap());
    assert_eq!(tree[gadget].width, 80);
    assert_eq!(tree[gadget].height, 40);
    assert_eq!(
        tree.wrapped_lines(control),
        Some(vec!["hello".to_string(), "world foo".to_string()])
    );
}

#[test]
fn test_inline_gadgets_share_a_line() {
    let (tree, forms) = lay_out(
        "<html><body><form><input type=\"checkbox\" name=\"a\"><input type=\"checkbox\" name=\"b\"></form></body></html>",
        800,
    );
    let boxes: Vec<BoxId> = forms
        .controls()
        .iter()
        .map(|c| BoxId(c.layout_box.unwrap()))
        .collect();
    assert_eq!(tree[boxes[0]].y, tree[boxes[1]].y);
    assert!(tree[boxes[1]].x >= tree[boxes[0]].x + tree[boxes[0]].width);
}
