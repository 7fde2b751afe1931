//! Inline formatting contexts.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block."
//!
//! "The rectangular area that contains the boxes that form a line is called
//! a line box. ... The width of a line box is determined by a containing
//! block and the presence of floats."
//!
//! An inline container is laid out one line at a time. A text box that
//! does not fit is split at a space: the box keeps the words that fit and a
//! continuation box sharing its style takes the rest, inserted right after
//! it in the container.

use marten_css::style::TextAlign;

use super::{Edges, Layout};
use crate::box_tree::{BoxId, BoxTreeError, BoxType, LayoutBox, TextRun, UNKNOWN_MAX_WIDTH};
use crate::intrinsic::calculate_widths;

/// Horizontal and vertical room an inline-level box takes on a line.
#[derive(Debug, Clone, Copy)]
struct Extent {
    /// Margin box width.
    width: i32,
    /// Margin box height.
    height: i32,
    /// Width plus any collapsible space after the box.
    advance: i32,
}

impl Layout<'_, '_, '_> {
    /// Lay out every line of `cont`, whose content edge is at `(cx, cy)` in
    /// the context root `bfc`, and set its height.
    pub(crate) fn layout_inline_container(
        &mut self,
        cont: BoxId,
        bfc: BoxId,
        cx: i32,
        cy: i32,
    ) -> Result<(), BoxTreeError> {
        #[cfg(feature = "layout-trace")]
        let _depth = super::trace_enter(self.tree, cont, "inline-container");

        let mut y = 0;
        let mut first_line = true;
        let mut next = (!self.tree.children(cont).is_empty()).then_some(0);
        while let Some(index) = next {
            self.ctx.yield_point.tick();
            next = self.layout_line(cont, index, &mut y, first_line, bfc, (cx, cy))?;
            first_line = false;
        }
        self.tree[cont].height = y;
        Ok(())
    }

    /// Size an inline-level box for a line in a container `available`
    /// pixels wide. An inline-block gets its width and any fixed height;
    /// its contents wait for [`Self::layout_placed`].
    fn size_inline(&mut self, id: BoxId, available: i32) {
        match self.tree[id].box_type {
            BoxType::InlineBlock => {
                self.solve_shrink_width(id, available);
                self.tree[id].height = 0;
                self.apply_fixed_height(id);
            }
            BoxType::Inline => {
                let b = &self.tree[id];
                let style = self.tree.box_style(id);
                if b.object.is_some() || b.gadget.is_some() {
                    let edges = Edges::resolve(style, available);
                    self.apply_edges(id, &edges);
                } else {
                    let width = b
                        .text
                        .as_ref()
                        .map_or(0, |run| self.ctx.metrics.text_width(&run.text, style));
                    let height = style.line_height_px();
                    let b = &mut self.tree[id];
                    b.width = width;
                    b.height = height;
                }
            }
            _ => {}
        }
    }

    /// Lay out the contents of an inline-block that has been given a place
    /// on the line.
    fn layout_placed(&mut self, id: BoxId) -> Result<(), BoxTreeError> {
        if self.tree[id].box_type == BoxType::InlineBlock {
            self.layout_block_context(id)?;
            self.apply_fixed_height(id);
        }
        Ok(())
    }

    fn extent(&self, id: BoxId) -> Extent {
        let b = &self.tree[id];
        let trailing = match &b.text {
            Some(run) if run.space && b.object.is_none() && b.gadget.is_none() => {
                self.ctx.metrics.space_width(self.tree.box_style(id))
            }
            _ => 0,
        };
        let width = b.margin_box_width();
        Extent {
            width,
            height: b.margin_box_height(),
            advance: width + trailing,
        }
    }

    /// Whether a box is text that may be broken at its spaces.
    fn is_breakable(&self, id: BoxId) -> bool {
        let b = &self.tree[id];
        b.text.is_some()
            && b.object.is_none()
            && b.gadget.is_none()
            && !self.tree.box_style(id).white_space.is_unbreakable()
    }

    /// [§ 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
    ///
    /// "When an inline box exceeds the width of a line box, it is split into
    /// several boxes and these boxes are distributed across several line
    /// boxes."
    ///
    /// Lay out one line of `cont` starting at child `start`, with the line
    /// top at `*y`. Advances `*y` past the line and returns the index of the
    /// first child not placed, if any.
    #[allow(clippy::too_many_arguments)]
    fn layout_line(
        &mut self,
        cont: BoxId,
        start: usize,
        y: &mut i32,
        first_line: bool,
        bfc: BoxId,
        (cx, cy): (i32, i32),
    ) -> Result<Option<usize>, BoxTreeError> {
        let width = self.tree[cont].width;
        let line_top = cy + *y;

        // Provisional pass: how tall is the line going to be?
        let band = self.find_sides(bfc, cx, line_top, 1, width);
        let room = band.right - band.left;
        let mut used = 0;
        let mut line_height = 0;
        for &child in &self.tree.children(cont)[start..].to_vec() {
            if self.tree[child].box_type.is_float() {
                continue;
            }
            self.size_inline(child, width);
            let extent = self.extent(child);
            if used > 0 && used + extent.width > room {
                break;
            }
            line_height = line_height.max(extent.height);
            used += extent.advance;
        }

        // Definitive pass against the floats beside the whole line.
        let band = self.find_sides(bfc, cx, line_top, line_height.max(1), width);
        let (mut x0, mut x1) = (band.left, band.right);
        let float_free = !band.intruded;
        if first_line {
            let style = self.tree.box_style(cont);
            x0 += style.text_indent.resolve(width, style.font_size);
        }

        let mut x = x0;
        let mut used_height = 0;
        let mut placed: Vec<BoxId> = Vec::new();
        let mut index = start;

        while let Some(&child) = self.tree.children(cont).get(index) {
            if self.tree[child].box_type.is_float() {
                self.layout_float(child, width)?;
                let fw = self.tree[child].width;
                let line_bottom = *y + used_height.max(line_height);
                if x + fw <= x1 {
                    // Beside the line: the band shrinks for the boxes after.
                    if self.tree[child].box_type == BoxType::FloatLeft {
                        for &p in &placed {
                            self.tree[p].x += fw;
                        }
                        self.link_float(child, bfc, x0, *y);
                        x0 += fw;
                        x += fw;
                    } else {
                        self.link_float(child, bfc, x1 - fw, *y);
                        x1 -= fw;
                    }
                } else {
                    self.place_float_below(child, cont, bfc, (cx, cy), line_bottom);
                }
                index += 1;
                continue;
            }

            self.size_inline(child, width);
            if x + self.extent(child).width <= x1 {
                self.layout_placed(child)?;
                let extent = self.extent(child);
                self.place_on_line(child, x, *y);
                x += extent.advance;
                used_height = used_height.max(extent.height);
                placed.push(child);
                index += 1;
                continue;
            }

            if self.is_breakable(child) {
                let style = self.tree.box_style(child);
                let text = self.tree[child]
                    .text
                    .as_ref()
                    .map(|run| run.text.as_str())
                    .unwrap_or_default();
                let (offset, _) = self.ctx.metrics.split_offset(text, style, x1 - x);
                if offset > 0 && offset < text.len() {
                    self.split_text(cont, index, offset);
                    let extent = self.extent(child);
                    self.place_on_line(child, x, *y);
                    used_height = used_height.max(extent.height);
                    placed.push(child);
                    index += 1;
                    break;
                }
            }
            if placed.is_empty() && float_free {
                // Nothing else could ever fit better: force the first word
                // onto the line even if it overflows.
                if self.is_breakable(child)
                    && let Some(space) = self.tree[child]
                        .text
                        .as_ref()
                        .and_then(|run| run.text.find(' '))
                {
                    self.split_text(cont, index, space);
                }
                self.layout_placed(child)?;
                let extent = self.extent(child);
                self.place_on_line(child, x, *y);
                used_height = used_height.max(extent.height);
                placed.push(child);
                index += 1;
            }
            // Whatever is left starts the next line.
            break;
        }

        // [§ 16.2 Alignment](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
        let right_edge = placed
            .last()
            .map_or(x0, |&last| {
                let b = &self.tree[last];
                b.x - b.left_edge() + self.extent(last).width
            });
        let spare = x1 - right_edge;
        let shift = match self.tree.box_style(cont).text_align {
            TextAlign::Right => spare,
            TextAlign::Center => spare / 2,
            TextAlign::Left | TextAlign::Justify => 0,
        };
        if shift > 0 {
            for &p in &placed {
                self.tree[p].x += shift;
            }
        }

        // A line with no room beside the floats moves below the first of
        // them to end.
        match self.next_float_bottom(bfc, line_top, line_top + line_height.max(1)) {
            Some(bottom) if placed.is_empty() && !float_free && bottom - cy > *y => {
                *y = bottom - cy;
            }
            _ => *y += used_height + 1,
        }
        Ok((index < self.tree.children(cont).len()).then_some(index))
    }

    /// Place an inline-level box with its margin edge at `(x, y)`.
    fn place_on_line(&mut self, id: BoxId, x: i32, y: i32) {
        let b = &mut self.tree[id];
        b.x = x + b.left_edge();
        b.y = y + b.top_edge();
    }

    /// Split the text of child `index` of `cont` at the space at byte
    /// `offset`. The box keeps the text before the space; a continuation box
    /// inserted after it takes the rest.
    fn split_text(&mut self, cont: BoxId, index: usize, offset: usize) {
        let id = self.tree[cont].children[index];
        let Some(run) = self.tree[id].text.clone() else {
            return;
        };
        let (head, tail) = run.text.split_at(offset);

        let origin = self.tree[id].clone_of.unwrap_or(id);
        let mut continuation = LayoutBox::new(BoxType::Inline, self.tree[id].style);
        continuation.text = Some(TextRun {
            text: tail.trim_start_matches(' ').to_string(),
            space: run.space,
        });
        continuation.href.clone_from(&self.tree[id].href);
        continuation.clone_of = Some(origin);
        continuation.parent = Some(cont);
        continuation.max_width = UNKNOWN_MAX_WIDTH;
        let continuation = self.tree.alloc(continuation);
        self.tree[cont].children.insert(index + 1, continuation);

        let style = self.tree.box_style(id);
        let head_width = self.ctx.metrics.text_width(head, style);
        let b = &mut self.tree[id];
        b.text = Some(TextRun {
            text: head.to_string(),
            space: true,
        });
        b.width = head_width;

        // Sized again when the next line is laid out.
        calculate_widths(self.tree, continuation, self.ctx.metrics);
    }
}
