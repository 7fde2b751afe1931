//! Block formatting contexts.
//!
//! [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//!
//! "In a block formatting context, boxes are laid out one after the other,
//! vertically, beginning at the top of a containing block. The vertical
//! distance between two sibling boxes is determined by the 'margin'
//! properties."
//!
//! Margins collapse only between adjacent siblings: the previous box's
//! bottom margin against the next box's top margin. Margins of a parent and
//! its first or last child, and margins through empty boxes, stay separate.

use marten_css::style::{ClearType, Height};

use super::Layout;
use crate::box_tree::{BoxId, BoxTreeError, BoxType};

/// [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
///
/// "When two or more margins collapse, the resulting margin width is the
/// maximum of the collapsing margins' widths. In the case of negative
/// margins, the maximum of the absolute values of the negative adjoining
/// margins is deducted from the maximum of the positive adjoining margins.
/// If there are no positive margins, the maximum of the absolute values of
/// the adjoining margins is deducted from zero."
fn collapse_two_margins(a: i32, b: i32) -> i32 {
    if a >= 0 && b >= 0 {
        a.max(b)
    } else if a < 0 && b < 0 {
        a.min(b)
    } else {
        a + b
    }
}

impl Layout<'_, '_, '_> {
    /// Lay out a box that holds its own floats: the root, table cells,
    /// inline-blocks and the inner box of a float. Its width is already
    /// set.
    ///
    /// [§ 10.6.7 'Auto' heights for block formatting context roots](https://www.w3.org/TR/CSS2/visudet.html#root-height)
    ///
    /// "In addition, if the element has any floating descendants whose
    /// bottom margin edge is below the element's bottom content edge, then
    /// the height is increased to include those edges."
    pub(crate) fn layout_block_context(&mut self, root: BoxId) -> Result<(), BoxTreeError> {
        #[cfg(feature = "layout-trace")]
        let _depth = super::trace_enter(self.tree, root, "block-context");

        self.tree[root].float_children.clear();
        self.layout_block_children(root, root, 0, 0)?;
        if self.tree.box_style(root).height == Height::Auto
            && let Some(bottom) = self.float_bottom(root, ClearType::Both)
        {
            let b = &mut self.tree[root];
            b.height = b.height.max(bottom);
        }
        Ok(())
    }

    /// Stack the children of `block`, whose content edge sits at `(cx, cy)`
    /// in the coordinates of the context root `bfc`, and set its height.
    pub(crate) fn layout_block_children(
        &mut self,
        block: BoxId,
        bfc: BoxId,
        cx: i32,
        cy: i32,
    ) -> Result<(), BoxTreeError> {
        let width = self.tree[block].width;
        let mut y = 0;
        let mut previous_margin = 0;

        for child in self.tree.children(block).to_vec() {
            self.ctx.yield_point.tick();
            match self.tree[child].box_type {
                BoxType::Block => {
                    self.solve_block_width(child, width);
                    let top = self.block_top(child, bfc, cy, &mut y, previous_margin);
                    let c = &mut self.tree[child];
                    c.x = c.margin.left + c.border.left + c.padding.left;
                    c.y = top + c.border.top + c.padding.top;
                    let (x_off, y_off) = (c.x, c.y);
                    self.layout_block_children(child, bfc, cx + x_off, cy + y_off)?;
                    self.apply_fixed_height(child);
                    let c = &self.tree[child];
                    y = c.y + c.height + c.padding.bottom + c.border.bottom + c.margin.bottom;
                    previous_margin = c.margin.bottom;
                }
                BoxType::Table => {
                    self.layout_table(child, width)?;
                    let top = self.block_top(child, bfc, cy, &mut y, previous_margin);
                    self.place_table(child, bfc, cx, cy, top, width);
                    let c = &self.tree[child];
                    y = c.y + c.height + c.padding.bottom + c.border.bottom + c.margin.bottom;
                    previous_margin = c.margin.bottom;
                }
                BoxType::InlineContainer => {
                    let c = &mut self.tree[child];
                    c.x = 0;
                    c.y = y;
                    c.width = width;
                    self.layout_inline_container(child, bfc, cx, cy + y)?;
                    y += self.tree[child].height;
                    previous_margin = 0;
                }
                other => {
                    return Err(BoxTreeError::MisplacedBox {
                        parent: self.tree[block].box_type,
                        parent_id: block.0,
                        child: other,
                        child_id: child.0,
                    });
                }
            }
        }

        self.tree[block].height = y.max(0);
        self.apply_fixed_height(block);
        Ok(())
    }

    /// Border-edge top of a block-level child: the cursor after collapsing
    /// its top margin with the previous sibling's bottom margin, moved below
    /// floats when the child clears them. Advances `y` past the margin.
    fn block_top(
        &mut self,
        child: BoxId,
        bfc: BoxId,
        cy: i32,
        y: &mut i32,
        previous_margin: i32,
    ) -> i32 {
        let margin_top = self.tree[child].margin.top;
        *y += collapse_two_margins(previous_margin, margin_top) - previous_margin;
        let mut top = *y;

        // [§ 9.5.2 Controlling flow next to floats](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
        //
        // "The top border edge of the box is below the bottom outer edge of
        // any ... floating boxes"
        let clear = self.tree.box_style(child).clear;
        if clear != ClearType::None
            && let Some(bottom) = self.float_bottom(bfc, clear)
        {
            top = top.max(bottom - cy);
        }
        top
    }

    /// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
    ///
    /// "The border box of a table ... in the same block formatting context
    /// as the element itself must not overlap the margin box of any floats
    /// in the same block formatting context."
    ///
    /// Put the table in the first gap beside the floats that is wide enough,
    /// moving down past the float that ends first until one is found.
    /// `auto` side margins centre the table in its gap.
    fn place_table(&mut self, table: BoxId, bfc: BoxId, cx: i32, cy: i32, top: i32, width: i32) {
        let (outer_width, outer_height) = {
            let t = &self.tree[table];
            (
                t.width + t.border.horizontal() + t.padding.horizontal(),
                t.height + t.border.vertical() + t.padding.vertical(),
            )
        };
        let margin = super::Edges::resolve(self.tree.box_style(table), width).margin;
        let needed = outer_width + margin.left.unwrap_or(0) + margin.right.unwrap_or(0);

        let mut top = top;
        let band = loop {
            let band = self.find_sides(bfc, cx, cy + top, outer_height.max(1), width);
            if !band.intruded || band.right - band.left >= needed {
                break band;
            }
            match self.next_float_bottom(bfc, cy + top, cy + top + outer_height.max(1)) {
                Some(bottom) if bottom - cy > top => top = bottom - cy,
                _ => break band,
            }
        };

        let gap = band.right - band.left;
        let t = &mut self.tree[table];
        let (left, right) = match (margin.left, margin.right) {
            (None, None) => {
                let spare = (gap - outer_width).max(0);
                (spare / 2, spare - spare / 2)
            }
            (None, Some(right)) => ((gap - outer_width - right).max(0), right),
            (Some(left), right) => (left, right.unwrap_or(0)),
        };
        t.margin.left = left;
        t.margin.right = right;
        t.x = band.left + left + t.border.left + t.padding.left;
        t.y = top + t.border.top + t.padding.top;
    }
}
