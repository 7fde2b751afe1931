//! Table layout.
//!
//! [§ 17.5.2.2 Automatic table layout](https://www.w3.org/TR/CSS2/tables.html#auto-table-layout)
//!
//! "The column widths are determined as follows: ... If the used width is
//! greater than MIN, the extra width should be distributed over the
//! columns."
//!
//! Column minimums and maximums come from the intrinsic width pass. Here
//! the table's width is fixed, shared out over the columns so that the
//! columns add up to it exactly, and the rows are stacked with cells
//! spanning several rows stretched over them.

use marten_css::style::Size;

use super::{Edges, Layout};
use crate::box_tree::{BoxId, BoxTreeError, Column, ColumnType};

/// Share `table_width` out over `columns`.
///
/// A table too narrow for its percentage columns treats the percentages as
/// maximums; otherwise percentage columns get exactly their share. The
/// rest depends on where the width falls: at or below the minimums every
/// column takes its minimum, at or above the maximums every column takes
/// its maximum (`auto` tables) or the excess is shared out (fixed width
/// tables), and in between every column moves the same fraction of the
/// way from minimum to maximum. Whatever integer division leaves over goes
/// to the last column that can grow.
pub(crate) fn distribute_columns(columns: &[Column], table_width: i32, auto_width: bool) -> Vec<i32> {
    let mut cols = columns.to_vec();
    let percent_share = |c: &Column| ((table_width as f32 * c.width as f32 / 100.0) as i32).max(c.min);

    let required: i32 = cols
        .iter()
        .map(|c| match c.kind {
            ColumnType::Fixed => c.width,
            ColumnType::Percent => percent_share(c),
            ColumnType::Auto | ColumnType::Unknown => c.min,
        })
        .sum();
    for c in &mut cols {
        if c.kind != ColumnType::Percent {
            continue;
        }
        let share = percent_share(c);
        if table_width < required {
            c.max = share;
        } else {
            c.kind = ColumnType::Fixed;
            c.width = share;
            c.min = share;
            c.max = share;
        }
    }

    let total_min: i32 = cols.iter().map(|c| c.min).sum();
    let total_max: i32 = cols.iter().map(|c| c.max).sum();
    let mut widths: Vec<i32> = if table_width <= total_min {
        cols.iter().map(|c| c.min).collect()
    } else if total_max <= table_width {
        let mut widths: Vec<i32> = cols.iter().map(|c| c.max).collect();
        if !auto_width {
            let mut targets: Vec<usize> = (0..cols.len())
                .filter(|&i| cols[i].kind != ColumnType::Fixed)
                .collect();
            if targets.is_empty() {
                targets = (0..cols.len()).collect();
            }
            if let Ok(count) = i32::try_from(targets.len())
                && count > 0
            {
                let share = (table_width - total_max) / count;
                for &i in &targets {
                    widths[i] += share;
                }
            }
        }
        widths
    } else {
        let span = i64::from(total_max - total_min);
        let room = i64::from(table_width - total_min);
        cols.iter()
            .map(|c| c.min + (i64::from(c.max - c.min) * room / span) as i32)
            .collect()
    };

    let sum: i32 = widths.iter().sum();
    if sum < table_width {
        let last = (0..cols.len())
            .rev()
            .find(|&i| cols[i].kind != ColumnType::Fixed && cols[i].max > cols[i].min)
            .or_else(|| (0..cols.len()).rev().find(|&i| cols[i].kind != ColumnType::Fixed))
            .or_else(|| cols.len().checked_sub(1));
        if let Some(last) = last {
            widths[last] += table_width - sum;
        }
    }
    widths
}

impl Layout<'_, '_, '_> {
    /// Lay out a table in a containing block `available` pixels wide: fix
    /// its width and edges (`auto` margins as zero), its columns, and its
    /// rows and cells.
    pub(crate) fn layout_table(&mut self, table: BoxId, available: i32) -> Result<(), BoxTreeError> {
        #[cfg(feature = "layout-trace")]
        let _depth = super::trace_enter(self.tree, table, "table");

        let style = self.tree.box_style(table);
        let edges = Edges::resolve(style, available);
        let specified = style.width.resolve(available, style.font_size);
        let auto_width = style.width == Size::Auto;
        self.apply_edges(table, &edges);

        let columns = self.tree[table].col.clone();
        let total_min: i32 = columns.iter().map(|c| c.min).sum();
        let total_max: i32 = columns.iter().map(|c| c.max).sum();
        let width = match specified {
            Some(width) => width.max(total_min),
            None => {
                let outer = edges.margin_or_zero().horizontal() + edges.inner_horizontal();
                (available - outer).min(total_max).max(total_min)
            }
        };
        self.tree[table].width = width;

        let widths = distribute_columns(&columns, width, auto_width);
        let mut column_x = Vec::with_capacity(widths.len() + 1);
        let mut x = 0;
        column_x.push(x);
        for w in &widths {
            x += w;
            column_x.push(x);
        }
        for (c, w) in self.tree[table].col.iter_mut().zip(&widths) {
            c.used = *w;
        }

        self.layout_rows(table, width, &column_x)
    }

    /// Lay out every cell and stack the rows and row groups.
    fn layout_rows(&mut self, table: BoxId, width: i32, column_x: &[i32]) -> Result<(), BoxTreeError> {
        let columns = column_x.len().saturating_sub(1);
        let total_rows = self.tree[table].rows;
        // Rows a spanning cell still covers, and height it still needs,
        // indexed by the cell's first column.
        let mut row_span = vec![0_usize; columns];
        let mut excess_y = vec![0_i32; columns];
        let mut row_heights: Vec<i32> = Vec::with_capacity(total_rows);
        let mut placed: Vec<(BoxId, usize)> = Vec::new();
        let mut row_index = 0;

        let mut group_y = 0;
        for group in self.tree.children(table).to_vec() {
            let mut row_y = 0;
            for row in self.tree.children(group).to_vec() {
                self.ctx.yield_point.tick();
                let mut height = 0;
                for cell in self.tree.children(row).to_vec() {
                    let outer = self.layout_cell(cell, column_x)?;
                    let c = &self.tree[cell];
                    let (start, rows) = (c.start_column, c.rows.max(1));
                    if rows == 1 {
                        height = height.max(outer);
                    } else if start < columns {
                        row_span[start] = rows;
                        excess_y[start] = outer;
                    }
                    placed.push((cell, row_index));
                }

                let last_row = row_index + 1 >= total_rows;
                for (&span, &excess) in row_span.iter().zip(&excess_y) {
                    if span == 1 || (last_row && span > 0) {
                        height = height.max(excess);
                    }
                }
                for (span, excess) in row_span.iter_mut().zip(&mut excess_y) {
                    if *span > 0 {
                        *excess = (*excess - height).max(0);
                        *span -= 1;
                    }
                }

                let r = &mut self.tree[row];
                r.x = 0;
                r.y = row_y;
                r.width = width;
                r.height = height;
                row_heights.push(height);
                row_y += height;
                row_index += 1;
            }
            let g = &mut self.tree[group];
            g.x = 0;
            g.y = group_y;
            g.width = width;
            g.height = row_y;
            group_y += row_y;
        }

        // Stretch cells over the rows they cover.
        for (cell, first) in placed {
            let rows = self.tree[cell].rows.max(1);
            let end = first.saturating_add(rows).min(row_heights.len());
            let covered: i32 = row_heights.get(first..end).map_or(0, |h| h.iter().sum());
            let c = &mut self.tree[cell];
            let edges = c.padding.vertical() + c.border.vertical();
            c.height = c.height.max(covered - edges);
        }

        let t = &mut self.tree[table];
        t.height = group_y;
        let content = t.height;
        self.apply_fixed_height(table);
        let t = &mut self.tree[table];
        t.height = t.height.max(content);
        Ok(())
    }

    /// Lay out one cell at the width of the columns it spans and return its
    /// outer height.
    ///
    /// [§ 17.5.3 Table height algorithms](https://www.w3.org/TR/CSS2/tables.html#height-layout)
    ///
    /// "The height of a 'table-row' element's box is calculated once the
    /// user agent has all the cells in the row available: it is the maximum
    /// of the row's computed 'height', the computed 'height' of each cell in
    /// the row, and the minimum height (MIN) required by the cells."
    fn layout_cell(&mut self, cell: BoxId, column_x: &[i32]) -> Result<i32, BoxTreeError> {
        let columns = column_x.len().saturating_sub(1);
        let (start, span) = {
            let c = &self.tree[cell];
            (c.start_column.min(columns), c.columns.max(1))
        };
        let end = (start + span).min(columns);
        let left = column_x.get(start).copied().unwrap_or(0);
        let outer_width = column_x.get(end).copied().unwrap_or(left) - left;

        let edges = Edges::resolve(self.tree.box_style(cell), outer_width);
        self.apply_edges(cell, &edges);
        let c = &mut self.tree[cell];
        c.margin = c.margin.map(|_| 0);
        c.width = (outer_width - edges.inner_horizontal()).max(0);
        c.x = left + c.border.left + c.padding.left;
        c.y = c.border.top + c.padding.top;

        self.layout_block_context(cell)?;
        let content = self.tree[cell].height;
        self.apply_fixed_height(cell);
        let c = &mut self.tree[cell];
        c.height = c.height.max(content);
        Ok(c.height + c.padding.vertical() + c.border.vertical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(kind: ColumnType, min: i32, max: i32, width: i32) -> Column {
        Column {
            kind,
            min,
            max,
            width,
            used: 0,
        }
    }

    #[test]
    fn test_narrow_table_takes_minimums() {
        let cols = [column(ColumnType::Auto, 50, 200, 0), column(ColumnType::Auto, 30, 100, 0)];
        assert_eq!(distribute_columns(&cols, 80, true), [50, 30]);
    }

    #[test]
    fn test_auto_table_takes_maximums() {
        let cols = [column(ColumnType::Auto, 10, 40, 0), column(ColumnType::Auto, 10, 60, 0)];
        assert_eq!(distribute_columns(&cols, 100, true), [40, 60]);
    }

    #[test]
    fn test_fixed_table_shares_excess_over_auto_columns() {
        let cols = [
            column(ColumnType::Fixed, 50, 50, 50),
            column(ColumnType::Auto, 10, 40, 0),
            column(ColumnType::Auto, 10, 40, 0),
        ];
        assert_eq!(distribute_columns(&cols, 200, false), [50, 75, 75]);
    }

    #[test]
    fn test_interpolates_between_min_and_max() {
        let cols = [column(ColumnType::Auto, 0, 100, 0), column(ColumnType::Auto, 0, 300, 0)];
        let widths = distribute_columns(&cols, 200, true);
        assert_eq!(widths, [50, 150]);
    }

    #[test]
    fn test_percentage_column_is_exact_when_room() {
        let cols = [column(ColumnType::Percent, 10, 20, 25), column(ColumnType::Auto, 10, 500, 0)];
        let widths = distribute_columns(&cols, 400, false);
        assert_eq!(widths[0], 100);
        assert_eq!(widths.iter().sum::<i32>(), 400);
    }

    #[test]
    fn test_percentage_is_a_maximum_when_cramped() {
        let cols = [
            column(ColumnType::Percent, 10, 300, 50),
            column(ColumnType::Fixed, 180, 180, 180),
        ];
        // 50% of 200 plus 180 fixed exceeds 200: the percentage caps at 100.
        let widths = distribute_columns(&cols, 200, false);
        assert_eq!(widths, [20, 180]);
    }
}
