//! Intrinsic widths.
//!
//! [§ 10.3.5 Floating, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#float-width)
//!
//! "Calculation of the shrink-to-fit width is similar to calculating the
//! width of a table cell using the automatic table layout algorithm.
//! Roughly: calculate the preferred width by formatting the content without
//! breaking lines other than where explicit line breaks occur, and also
//! calculate the preferred minimum width, e.g., by trying all possible line
//! breaks."
//!
//! Every box gets a `min_width` (the preferred minimum width) and a
//! `max_width` (the preferred width), both including the box's own
//! horizontal margins, borders and padding. The pass runs bottom-up and
//! skips boxes whose `max_width` is already known.

use marten_css::ComputedStyle;
use marten_css::style::{LengthOrPercent, Size};

use crate::box_tree::{BoxId, BoxTree, BoxType, Column, ColumnType, UNKNOWN_MAX_WIDTH};
use crate::font::FontMetrics;

/// Largest share of a box that percentage edges may claim.
const MAX_EXTRA_FRACTION: f32 = 0.9;

/// Calculate `min_width` and `max_width` for `id` and its descendants.
pub fn calculate_widths(tree: &mut BoxTree, id: BoxId, metrics: &dyn FontMetrics) {
    if tree[id].max_width != UNKNOWN_MAX_WIDTH {
        return;
    }
    let (min, max) = match tree[id].box_type {
        BoxType::Inline => inline_widths(tree, id, metrics),
        BoxType::InlineContainer => inline_container_widths(tree, id, metrics),
        BoxType::Table => table_widths(tree, id, metrics),
        BoxType::TableRowGroup | BoxType::TableRow => {
            let mut widths: (i32, i32) = (0, 0);
            for child in tree.children(id).to_vec() {
                calculate_widths(tree, child, metrics);
                widths.0 = widths.0.max(tree[child].min_width);
                widths.1 = widths.1.saturating_add(tree[child].max_width);
            }
            widths
        }
        BoxType::Block
        | BoxType::TableCell
        | BoxType::InlineBlock
        | BoxType::FloatLeft
        | BoxType::FloatRight => block_widths(tree, id, metrics),
    };
    let b = &mut tree[id];
    b.min_width = min;
    b.max_width = max.max(min);
}

/// Blocks: the widest child decides both widths, unless the box has a
/// fixed width of its own.
fn block_widths(tree: &mut BoxTree, id: BoxId, metrics: &dyn FontMetrics) -> (i32, i32) {
    let (mut min, mut max) = (0, 0);
    for child in tree.children(id).to_vec() {
        calculate_widths(tree, child, metrics);
        min = min.max(tree[child].min_width);
        max = max.max(tree[child].max_width);
    }
    let style = tree.box_style(id);
    // Cell widths are decided per column by the table pass.
    if tree[id].box_type != BoxType::TableCell
        && let Size::Length(width) = style.width
    {
        let width = width.to_px(style.font_size) as i32;
        min = width;
        max = width;
    }
    add_edges(style, min, max)
}

/// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
///
/// The preferred width is the whole run on one line; the minimum is the
/// widest item that cannot be broken.
fn inline_container_widths(tree: &mut BoxTree, id: BoxId, metrics: &dyn FontMetrics) -> (i32, i32) {
    let (mut min, mut line): (i32, i32) = (0, 0);
    for child in tree.children(id).to_vec() {
        calculate_widths(tree, child, metrics);
        min = min.max(tree[child].min_width);
        line = line.saturating_add(tree[child].max_width);
    }
    if tree.box_style(id).white_space.is_unbreakable() {
        min = line;
    }
    (min, line)
}

/// Text runs measure their words; objects and gadgets have fixed sizes.
fn inline_widths(tree: &BoxTree, id: BoxId, metrics: &dyn FontMetrics) -> (i32, i32) {
    let b = &tree[id];
    let style = tree.box_style(id);
    if b.object.is_some() || b.gadget.is_some() {
        return add_edges(style, b.width, b.width);
    }
    let Some(run) = &b.text else { return (0, 0) };
    let full = metrics.text_width(&run.text, style);
    let trailing = if run.space {
        metrics.space_width(style)
    } else {
        0
    };
    let min = if style.white_space.is_unbreakable() {
        full
    } else {
        run.text
            .split(' ')
            .map(|word| metrics.text_width(word, style))
            .max()
            .unwrap_or(0)
    };
    (min, full + trailing)
}

/// [§ 17.5.2.2 Automatic table layout](https://www.w3.org/TR/CSS2/tables.html#auto-table-layout)
///
/// "Calculate the minimum content width (MCW) of each cell ... Also,
/// calculate the "maximum" cell width of each cell"
///
/// "For each column, determine a maximum and minimum column width from the
/// cells that span only that column."
///
/// "For each cell that spans more than one column, increase the minimum
/// widths of the columns it spans so that together, they are at least as
/// wide as the cell. Do the same for the maximum widths."
fn table_widths(tree: &mut BoxTree, table: BoxId, metrics: &dyn FontMetrics) -> (i32, i32) {
    let cells = table_cells(tree, table);
    let mut col = vec![Column::default(); tree[table].columns];

    for &cell in &cells {
        calculate_widths(tree, cell, metrics);
        let b = &tree[cell];
        if b.columns != 1 {
            continue;
        }
        let Some(c) = col.get_mut(b.start_column) else {
            continue;
        };
        let style = tree.box_style(cell);
        match style.width {
            Size::Length(width) => {
                let width = (width.to_px(style.font_size) as i32).saturating_add(fixed_edges(style));
                c.kind = ColumnType::Fixed;
                c.width = c.width.max(width);
            }
            Size::Percent(percent) if c.kind != ColumnType::Fixed => {
                c.kind = ColumnType::Percent;
                c.width = c.width.max(percent as i32);
            }
            _ => {
                if c.kind == ColumnType::Unknown {
                    c.kind = ColumnType::Auto;
                }
            }
        }
        c.min = c.min.max(b.min_width);
        c.max = c.max.max(b.max_width);
    }
    for c in &mut col {
        if c.kind == ColumnType::Fixed {
            c.width = c.width.max(c.min);
            c.min = c.width;
            c.max = c.width;
        }
        c.max = c.max.max(c.min);
    }

    for &cell in &cells {
        let b = &tree[cell];
        if b.columns < 2 {
            continue;
        }
        // A fixed width on a spanning cell is a floor for its columns.
        let style = tree.box_style(cell);
        let fixed = match style.width {
            Size::Length(width) => (width.to_px(style.font_size) as i32).saturating_add(fixed_edges(style)),
            _ => 0,
        };
        let end = (b.start_column + b.columns).min(col.len());
        let Some(spanned) = col.get_mut(b.start_column..end) else {
            continue;
        };
        spread(spanned, b.min_width.max(fixed), |c| c.min, |c, v| c.min = v);
        spread(spanned, b.max_width.max(fixed), |c| c.max, |c, v| c.max = v);
        for c in spanned {
            c.max = c.max.max(c.min);
            if c.kind == ColumnType::Fixed {
                c.width = c.max;
            }
        }
    }
    for c in &mut col {
        if c.kind == ColumnType::Unknown {
            c.kind = ColumnType::Auto;
        }
    }

    let mut min = col.iter().fold(0_i32, |sum, c| sum.saturating_add(c.min));
    let mut max = col.iter().fold(0_i32, |sum, c| sum.saturating_add(c.max));
    for group in tree.children(table).to_vec() {
        for row in tree.children(group).to_vec() {
            tree[row].min_width = min;
            tree[row].max_width = max;
        }
        tree[group].min_width = min;
        tree[group].max_width = max;
    }
    tree[table].col = col;

    let style = tree.box_style(table);
    if let Size::Length(width) = style.width {
        let width = (width.to_px(style.font_size) as i32).max(min);
        min = width;
        max = width;
    }
    add_edges(style, min, max)
}

/// Grow the columns of a spanning cell until their sum reaches `needed`.
/// Columns without a fixed width take the growth evenly; fixed columns grow
/// only when every spanned column is fixed. Integer remainders go to the
/// last column grown.
fn spread(
    cols: &mut [Column],
    needed: i32,
    get: impl Fn(&Column) -> i32,
    set: impl Fn(&mut Column, i32),
) {
    let current = cols.iter().fold(0_i32, |sum, c| sum.saturating_add(get(c)));
    if needed <= current || cols.is_empty() {
        return;
    }
    let extra = needed - current;
    let mut targets: Vec<usize> = (0..cols.len())
        .filter(|&i| cols[i].kind != ColumnType::Fixed)
        .collect();
    if targets.is_empty() {
        targets = (0..cols.len()).collect();
    }
    let count = targets.len() as i32;
    let (share, remainder) = (extra / count, extra % count);
    for (k, &i) in targets.iter().enumerate() {
        let grow = if k + 1 == targets.len() {
            share + remainder
        } else {
            share
        };
        let value = get(&cols[i]).saturating_add(grow);
        set(&mut cols[i], value);
    }
}

/// Cells of a normalized table, row by row.
pub(crate) fn table_cells(tree: &BoxTree, table: BoxId) -> Vec<BoxId> {
    tree.children(table)
        .iter()
        .flat_map(|&group| tree.children(group))
        .flat_map(|&row| tree.children(row))
        .copied()
        .collect()
}

/// Fixed horizontal padding and border.
fn fixed_edges(style: &ComputedStyle) -> i32 {
    let fs = style.font_size;
    let padding = |p: LengthOrPercent| match p {
        LengthOrPercent::Length(l) => l.to_px(fs) as i32,
        LengthOrPercent::Percent(_) => 0,
    };
    padding(style.padding.left)
        .saturating_add(padding(style.padding.right))
        .saturating_add(style.border_width.left.to_px(fs) as i32)
        .saturating_add(style.border_width.right.to_px(fs) as i32)
}

/// Add horizontal margins, borders and padding to content widths.
///
/// Fixed edges add directly. Percentage edges are a share of the
/// containing block, which is unknown here, so the width is scaled up until
/// the share fits: `w / (1 - fraction)`, with the fraction capped.
fn add_edges(style: &ComputedStyle, min: i32, max: i32) -> (i32, i32) {
    let fs = style.font_size;
    let mut fixed = fixed_edges(style);
    let mut fraction = 0.0;
    for margin in [style.margin.left, style.margin.right] {
        match margin {
            Size::Length(l) => fixed = fixed.saturating_add(l.to_px(fs) as i32),
            Size::Percent(p) => fraction += p / 100.0,
            Size::Auto => {}
        }
    }
    for padding in [style.padding.left, style.padding.right] {
        if let LengthOrPercent::Percent(p) = padding {
            fraction += p / 100.0;
        }
    }
    let fraction = fraction.clamp(0.0, MAX_EXTRA_FRACTION);
    let scale = |w: i32| (w.saturating_add(fixed) as f32 / (1.0 - fraction)).round() as i32;
    let min = scale(min).max(0);
    (min, scale(max).max(min))
}

#[cfg(test)]
mod tests {
    use marten_css::parse_declarations;
    use marten_css::style::apply_declaration;

    use super::*;
    use crate::box_tree::{LayoutBox, StyleId, TextRun};
    use crate::font::ApproximateFontMetrics;

    fn styled(css: &str) -> ComputedStyle {
        let mut style = ComputedStyle::default();
        let parent = ComputedStyle::default();
        for decl in parse_declarations(css) {
            apply_declaration(&mut style, &decl, &parent);
        }
        style
    }

    fn text_box(tree: &mut BoxTree, container: BoxId, text: &str) -> BoxId {
        let mut b = LayoutBox::new(BoxType::Inline, StyleId(0));
        b.text = Some(TextRun::new(text));
        tree.append_new(container, b)
    }

    #[test]
    fn test_text_min_is_widest_word() {
        let mut tree = BoxTree::new(ComputedStyle::default());
        let root = tree.root();
        let container = tree.append_new(root, LayoutBox::new(BoxType::InlineContainer, StyleId(0)));
        let _ = text_box(&mut tree, container, "a bbbb cc");
        calculate_widths(&mut tree, root, &ApproximateFontMetrics);
        assert_eq!(tree[container].min_width, 32);
        assert_eq!(tree[container].max_width, 72);
        assert_eq!(tree[root].max_width, 72);
    }

    #[test]
    fn test_nowrap_min_equals_max() {
        let mut tree = BoxTree::new(ComputedStyle::default());
        let nowrap = tree.add_style(styled("white-space: nowrap"));
        let root = tree.root();
        let container = tree.append_new(root, LayoutBox::new(BoxType::InlineContainer, nowrap));
        let _ = text_box(&mut tree, container, "a bbbb cc");
        calculate_widths(&mut tree, root, &ApproximateFontMetrics);
        assert_eq!(tree[container].min_width, tree[container].max_width);
    }

    #[test]
    fn test_fixed_width_and_edges() {
        let mut tree = BoxTree::new(ComputedStyle::default());
        let fixed = tree.add_style(styled("width: 100px; padding: 5px; margin: 0 10px"));
        let root = tree.root();
        let block = tree.append_new(root, LayoutBox::new(BoxType::Block, fixed));
        calculate_widths(&mut tree, root, &ApproximateFontMetrics);
        assert_eq!(tree[block].min_width, 130);
        assert_eq!(tree[block].max_width, 130);
    }

    #[test]
    fn test_percentage_edges_scale_up() {
        let mut tree = BoxTree::new(ComputedStyle::default());
        let style = tree.add_style(styled("width: 90px; margin-left: 10%"));
        let root = tree.root();
        let block = tree.append_new(root, LayoutBox::new(BoxType::Block, style));
        calculate_widths(&mut tree, root, &ApproximateFontMetrics);
        assert_eq!(tree[block].max_width, 100);
    }

    #[test]
    fn test_extra_fraction_is_capped() {
        let mut tree = BoxTree::new(ComputedStyle::default());
        let style = tree.add_style(styled("width: 10px; margin: 0 80%"));
        let root = tree.root();
        let block = tree.append_new(root, LayoutBox::new(BoxType::Block, style));
        calculate_widths(&mut tree, root, &ApproximateFontMetrics);
        assert_eq!(tree[block].max_width, 100);
    }

    #[test]
    fn test_spread_prefers_flexible_columns() {
        let mut cols = vec![
            Column {
                kind: ColumnType::Fixed,
                min: 50,
                max: 50,
                width: 50,
                used: 0,
            },
            Column {
                kind: ColumnType::Auto,
                ..Column::default()
            },
            Column {
                kind: ColumnType::Auto,
                ..Column::default()
            },
        ];
        spread(&mut cols, 81, |c| c.min, |c, v| c.min = v);
        assert_eq!(cols[0].min, 50);
        assert_eq!(cols[1].min, 15);
        assert_eq!(cols[2].min, 16);
    }

    #[test]
    fn test_spread_falls_back_to_fixed_columns() {
        let mut cols = vec![
            Column {
                kind: ColumnType::Fixed,
                min: 10,
                max: 10,
                width: 10,
                used: 0,
            };
            2
        ];
        spread(&mut cols, 30, |c| c.max, |c, v| c.max = v);
        assert_eq!(cols[0].max + cols[1].max, 30);
    }
}
