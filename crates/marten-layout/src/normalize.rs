//! Box tree normalization.
//!
//! [§ 17.2.1 Anonymous table objects](https://www.w3.org/TR/CSS2/tables.html#anonymous-boxes)
//!
//! "Document languages other than HTML may not contain all the elements in
//! the CSS 2.1 table model. In these cases, the 'missing' elements must be
//! assumed in order for the table model to work."
//!
//! After normalization the tree obeys this grammar:
//!
//! | parent | children |
//! |---|---|
//! | block, cell, inline-block, float | block, table, inline container |
//! | table | row group |
//! | row group | row |
//! | row | cell |
//! | inline container | inline, inline-block, float |
//!
//! Each child list is rebuilt: a maximal run of misplaced children is
//! moved into one synthesized box of the type the parent expects, and the
//! new box is normalized in turn. Inline-level boxes outside an inline
//! container cannot come from the builder and are reported, not repaired.

use marten_css::ComputedStyle;
use marten_css::style::DisplayType;

use crate::box_tree::{BoxId, BoxTree, BoxTreeError, BoxType, LayoutBox};

/// How a child fits under its parent.
enum Fit {
    Allowed,
    /// Belongs inside a synthesized box of this type.
    Wrap(BoxType),
    Invalid,
}

fn fit(parent: BoxType, child: BoxType) -> Fit {
    use BoxType::{
        Block, FloatLeft, FloatRight, Inline, InlineBlock, InlineContainer, Table, TableCell,
        TableRow, TableRowGroup,
    };
    match (parent, child) {
        (InlineContainer, Inline | InlineBlock | FloatLeft | FloatRight) => Fit::Allowed,
        (_, Inline | InlineBlock | FloatLeft | FloatRight) | (InlineContainer | Inline, _) => {
            Fit::Invalid
        }
        (Table, TableRowGroup) | (TableRowGroup, TableRow) | (TableRow, TableCell) => Fit::Allowed,
        (Table, _) => Fit::Wrap(TableRowGroup),
        (TableRowGroup, _) => Fit::Wrap(TableRow),
        (TableRow, _) => Fit::Wrap(TableCell),
        (_, Block | Table | InlineContainer) => Fit::Allowed,
        (_, TableRowGroup | TableRow | TableCell) => Fit::Wrap(Table),
    }
}

/// Normalize the subtree under `id`.
///
/// # Errors
/// [`BoxTreeError::MisplacedBox`] for an inline-level box outside an inline
/// container, [`BoxTreeError::MalformedFloat`] for a float wrapper without
/// exactly one block or table.
pub fn normalize(tree: &mut BoxTree, id: BoxId) -> Result<(), BoxTreeError> {
    let parent_type = tree[id].box_type;
    if parent_type.is_float() {
        match tree.children(id) {
            [inner] if matches!(tree[*inner].box_type, BoxType::Block | BoxType::Table) => {}
            _ => return Err(BoxTreeError::MalformedFloat(id.0)),
        }
    }

    let children = std::mem::take(&mut tree[id].children);
    let mut normalized = Vec::with_capacity(children.len());
    let mut run: Vec<BoxId> = Vec::new();
    let mut run_type = None;

    for child in children {
        let child_type = tree[child].box_type;
        match fit(parent_type, child_type) {
            Fit::Allowed => {
                flush_run(tree, id, run_type.take(), &mut run, &mut normalized);
                normalized.push(child);
            }
            Fit::Wrap(wrapper) => {
                run_type = Some(wrapper);
                run.push(child);
            }
            Fit::Invalid => {
                return Err(BoxTreeError::MisplacedBox {
                    parent: parent_type,
                    parent_id: id.0,
                    child: child_type,
                    child_id: child.0,
                });
            }
        }
    }
    flush_run(tree, id, run_type, &mut run, &mut normalized);
    tree[id].children.clone_from(&normalized);

    for child in normalized {
        normalize(tree, child)?;
    }
    if parent_type == BoxType::Table {
        count_columns(tree, id);
    }
    Ok(())
}

/// Move `run` into a new box of `wrapper` type appended to `normalized`.
fn flush_run(
    tree: &mut BoxTree,
    parent: BoxId,
    wrapper: Option<BoxType>,
    run: &mut Vec<BoxId>,
    normalized: &mut Vec<BoxId>,
) {
    let Some(wrapper) = wrapper else { return };
    if run.is_empty() {
        return;
    }
    // Anonymous boxes get a fresh style inheriting from the parent.
    let mut style = ComputedStyle::inherit_from(tree.box_style(parent));
    style.display = match wrapper {
        BoxType::Table => DisplayType::Table,
        BoxType::TableRowGroup => DisplayType::TableRowGroup,
        BoxType::TableRow => DisplayType::TableRow,
        _ => DisplayType::TableCell,
    };
    let style = tree.add_style(style);
    let mut synthetic = LayoutBox::new(wrapper, style);
    synthetic.parent = Some(parent);
    let synthetic = tree.alloc(synthetic);
    for child in run.drain(..) {
        tree.append_child(synthetic, child);
    }
    normalized.push(synthetic);
}

/// [§ 11.2.6.1 Cells that span several rows or columns](https://www.w3.org/TR/html401/struct/tables.html#h-11.2.6.1)
///
/// Assign each cell its first column, skipping columns still covered by a
/// row span from an earlier row, and record the column and row counts on
/// the table.
fn count_columns(tree: &mut BoxTree, table: BoxId) {
    let mut row_span: Vec<usize> = Vec::new();
    let mut columns = 0;
    let mut rows = 0;
    let groups = tree.children(table).to_vec();
    for group in groups {
        for row in tree.children(group).to_vec() {
            rows += 1;
            let mut column = 0;
            for cell in tree.children(row).to_vec() {
                while row_span.get(column).is_some_and(|&r| r > 0) {
                    column += 1;
                }
                let (span, cell_rows) = (tree[cell].columns.max(1), tree[cell].rows.max(1));
                tree[cell].start_column = column;
                if row_span.len() < column + span {
                    row_span.resize(column + span, 0);
                }
                for covered in &mut row_span[column..column + span] {
                    *covered = cell_rows;
                }
                column += span;
                columns = columns.max(column);
            }
            for covered in &mut row_span {
                *covered = covered.saturating_sub(1);
            }
        }
    }
    tree[table].columns = columns;
    tree[table].rows = rows;
}
