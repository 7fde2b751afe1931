//! Properties of normalization, intrinsic widths and table layout over
//! arbitrary box trees.

use marten_css::ComputedStyle;
use marten_layout::{
    ApproximateFontMetrics, BoxId, BoxTree, BoxType, FontMetrics, LayoutBox, LayoutContext, StyleId,
    TextRun, calculate_widths, layout_document, normalize,
};
use quickcheck_macros::quickcheck;

const STRUCTURAL: [BoxType; 6] = [
    BoxType::Block,
    BoxType::Table,
    BoxType::TableRowGroup,
    BoxType::TableRow,
    BoxType::TableCell,
    BoxType::InlineContainer,
];

const WORDS: [&str; 5] = ["a", "bb", "ccc dd", "eeee f g", "hhhhhhhh"];

/// Grow a tree from `(parent, kind)` pairs. Inline containers get one text
/// run and never become parents.
fn arbitrary_tree(ops: &[(u8, u8)]) -> BoxTree {
    let mut tree = BoxTree::new(ComputedStyle::default());
    let mut parents = vec![tree.root()];
    for &(pick, kind) in ops.iter().take(40) {
        let parent = parents[usize::from(pick) % parents.len()];
        let kind = STRUCTURAL[usize::from(kind) % STRUCTURAL.len()];
        let id = tree.append_new(parent, LayoutBox::new(kind, StyleId(0)));
        if kind == BoxType::InlineContainer {
            let mut text = LayoutBox::new(BoxType::Inline, StyleId(0));
            text.text = Some(TextRun::new(WORDS[usize::from(pick) % WORDS.len()]));
            let _ = tree.append_new(id, text);
        } else {
            parents.push(id);
        }
    }
    tree
}

fn obeys_grammar(tree: &BoxTree) -> bool {
    tree.descendants(tree.root()).into_iter().all(|id| {
        let parent = tree[id].box_type;
        tree.children(id).iter().all(|&child| {
            let child = tree[child].box_type;
            match parent {
                BoxType::Block | BoxType::TableCell | BoxType::InlineBlock => matches!(
                    child,
                    BoxType::Block | BoxType::Table | BoxType::InlineContainer
                ),
                BoxType::Table => child == BoxType::TableRowGroup,
                BoxType::TableRowGroup => child == BoxType::TableRow,
                BoxType::TableRow => child == BoxType::TableCell,
                BoxType::InlineContainer => matches!(
                    child,
                    BoxType::Inline
                        | BoxType::InlineBlock
                        | BoxType::FloatLeft
                        | BoxType::FloatRight
                ),
                BoxType::FloatLeft | BoxType::FloatRight => {
                    matches!(child, BoxType::Block | BoxType::Table)
                }
                BoxType::Inline => false,
            }
        })
    })
}

fn shape(tree: &BoxTree, id: BoxId) -> String {
    let children: Vec<String> = tree
        .children(id)
        .iter()
        .map(|&child| shape(tree, child))
        .collect();
    format!("{:?}({})", tree[id].box_type, children.join(","))
}

fn normalized(ops: &[(u8, u8)]) -> BoxTree {
    let mut tree = arbitrary_tree(ops);
    let root = tree.root();
    normalize(&mut tree, root).unwrap();
    tree
}

#[quickcheck]
fn prop_normalized_trees_obey_the_grammar(ops: Vec<(u8, u8)>) -> bool {
    obeys_grammar(&normalized(&ops))
}

#[quickcheck]
fn prop_normalize_is_idempotent(ops: Vec<(u8, u8)>) -> bool {
    let mut tree = normalized(&ops);
    let root = tree.root();
    let before = shape(&tree, root);
    let count = tree.len();
    normalize(&mut tree, root).unwrap();
    shape(&tree, root) == before && tree.len() == count
}

#[quickcheck]
fn prop_min_width_never_exceeds_max_width(ops: Vec<(u8, u8)>) -> bool {
    let mut tree = normalized(&ops);
    let root = tree.root();
    calculate_widths(&mut tree, root, &ApproximateFontMetrics);
    tree.descendants(root)
        .into_iter()
        .all(|id| tree[id].min_width <= tree[id].max_width)
}

#[quickcheck]
fn prop_width_calculation_is_repeatable(ops: Vec<(u8, u8)>) -> bool {
    let mut tree = normalized(&ops);
    let root = tree.root();
    calculate_widths(&mut tree, root, &ApproximateFontMetrics);
    let first: Vec<(i32, i32)> = tree
        .descendants(root)
        .into_iter()
        .map(|id| (tree[id].min_width, tree[id].max_width))
        .collect();

    // Memoized: a second call changes nothing.
    calculate_widths(&mut tree, root, &ApproximateFontMetrics);
    let memoized: Vec<(i32, i32)> = tree
        .descendants(root)
        .into_iter()
        .map(|id| (tree[id].min_width, tree[id].max_width))
        .collect();

    tree.reset_widths();
    calculate_widths(&mut tree, root, &ApproximateFontMetrics);
    let recomputed: Vec<(i32, i32)> = tree
        .descendants(root)
        .into_iter()
        .map(|id| (tree[id].min_width, tree[id].max_width))
        .collect();
    first == memoized && first == recomputed
}

#[quickcheck]
fn prop_table_columns_fill_the_table(ops: Vec<(u8, u8)>, width: u16) -> bool {
    let mut tree = normalized(&ops);
    let metrics = ApproximateFontMetrics;
    let mut ctx = LayoutContext::new(&metrics);
    layout_document(&mut tree, &mut ctx, i32::from(width % 2000)).unwrap();
    let root = tree.root();
    tree.descendants(root)
        .into_iter()
        .filter(|&id| tree[id].box_type == BoxType::Table)
        .all(|table| tree[table].col.iter().map(|c| c.used).sum::<i32>() == tree[table].width)
}

#[quickcheck]
fn prop_rows_stack_without_gaps(ops: Vec<(u8, u8)>, width: u16) -> bool {
    let mut tree = normalized(&ops);
    let metrics = ApproximateFontMetrics;
    let mut ctx = LayoutContext::new(&metrics);
    layout_document(&mut tree, &mut ctx, i32::from(width % 2000)).unwrap();
    let root = tree.root();
    tree.descendants(root)
        .into_iter()
        .filter(|&id| tree[id].box_type == BoxType::Table)
        .all(|table| {
            let groups: i32 = tree
                .children(table)
                .iter()
                .map(|&g| tree[g].height)
                .sum();
            groups == tree[table].height
        })
}

/// Lay a run of words out at each width in turn and check that every line
/// ends between two words: the pieces rejoin into the run, and a piece
/// holding more than one word fits the line.
#[quickcheck]
fn prop_lines_break_only_between_words(lengths: Vec<u8>, widths: Vec<u16>) -> bool {
    if lengths.is_empty() {
        return true;
    }
    let text = lengths
        .iter()
        .take(30)
        .map(|&n| "x".repeat(1 + usize::from(n % 12)))
        .collect::<Vec<_>>()
        .join(" ");

    let mut tree = BoxTree::new(ComputedStyle::default());
    let root = tree.root();
    let cont = tree.append_new(root, LayoutBox::new(BoxType::InlineContainer, StyleId(0)));
    let mut run = LayoutBox::new(BoxType::Inline, StyleId(0));
    run.text = Some(TextRun::new(text.clone()));
    let _ = tree.append_new(cont, run);

    let metrics = ApproximateFontMetrics;
    let style = ComputedStyle::default();
    widths.iter().take(4).all(|&width| {
        let width = 1 + i32::from(width % 400);
        let mut ctx = LayoutContext::new(&metrics);
        layout_document(&mut tree, &mut ctx, width).unwrap();
        let pieces: Vec<String> = tree
            .descendants(tree.root())
            .into_iter()
            .filter_map(|id| tree[id].text.as_ref().map(|t| t.text.clone()))
            .collect();
        pieces.join(" ") == text
            && pieces.iter().all(|piece| {
                !piece.is_empty()
                    && !piece.starts_with(' ')
                    && !piece.ends_with(' ')
                    && (!piece.contains(' ') || metrics.text_width(piece, &style) <= width)
            })
    })
}

#[test]
fn test_misplaced_rows_gain_a_table_and_group() {
    let tree = normalized(&[(0, 3), (0, 3), (0, 0), (0, 4)]);
    let root = tree.root();
    assert_eq!(
        shape(&tree, root),
        "Block(Table(TableRowGroup(TableRow(),TableRow())),Block(),Table(TableRowGroup(TableRow(TableCell()))))"
    );
}
