//! The layout pass.
//!
//! [§ 9 Visual formatting model](https://www.w3.org/TR/CSS2/visuren.html)
//!
//! Top-down and recursive: a box's width is resolved against its
//! containing block before its children are laid out, and its height
//! follows from theirs. Intrinsic widths from [`crate::calculate_widths`]
//! must be available for shrink-to-fit boxes and tables, so
//! [`layout_document`] calculates them first.

mod block;
mod float;
mod inline;
mod table;

#[cfg(feature = "layout-trace")]
use std::cell::Cell;

use marten_css::ComputedStyle;
use marten_css::style::{Height, Sides};

use crate::box_tree::{BoxId, BoxTree, BoxTreeError};
use crate::context::LayoutContext;
use crate::intrinsic::calculate_widths;

#[cfg(feature = "layout-trace")]
thread_local! {
    static LAYOUT_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Lay out the whole tree at `viewport_width`.
///
/// The tree may be laid out again, at another width: continuation boxes
/// left by the previous line breaking are merged back into the boxes they
/// were split from first.
///
/// # Errors
/// [`BoxTreeError`] when the tree breaks the structure the normalizer
/// guarantees.
pub fn layout_document(
    tree: &mut BoxTree,
    ctx: &mut LayoutContext<'_>,
    viewport_width: i32,
) -> Result<(), BoxTreeError> {
    merge_continuations(tree);
    let root = tree.root();
    calculate_widths(tree, root, ctx.metrics);

    let b = &mut tree[root];
    b.x = 0;
    b.y = 0;
    b.width = viewport_width.max(0);
    b.margin = Sides::all(0);

    let mut layout = Layout { tree, ctx };
    layout.layout_block_context(root)
}

/// Fold every continuation box back into the box it was split from.
fn merge_continuations(tree: &mut BoxTree) {
    // Tree order keeps the tails of one run in reading order.
    let continuations: Vec<BoxId> = tree
        .descendants(tree.root())
        .into_iter()
        .filter(|&id| tree[id].clone_of.is_some())
        .collect();
    for id in continuations {
        let Some(origin) = tree.get(id).and_then(|b| b.clone_of) else {
            continue;
        };
        let tail = tree[id].text.take();
        if let Some(tail) = tail
            && let Some(run) = tree.get_mut(origin).and_then(|o| o.text.as_mut())
        {
            run.text.push(' ');
            run.text.push_str(&tail.text);
            run.space = tail.space;
        }
        tree.discard_subtree(id);
    }
}

/// One layout pass over a tree.
pub(crate) struct Layout<'t, 'c, 'a> {
    pub(crate) tree: &'t mut BoxTree,
    pub(crate) ctx: &'c mut LayoutContext<'a>,
}

/// Used edges of a box against a containing block width, with `auto`
/// margins left unresolved.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Edges {
    pub(crate) margin: Sides<Option<i32>>,
    pub(crate) padding: Sides<i32>,
    pub(crate) border: Sides<i32>,
}

impl Edges {
    /// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    ///
    /// "The percentage is calculated with respect to the width of the
    /// generated box's containing block. Note that this is true for
    /// 'margin-top' and 'margin-bottom' as well."
    pub(crate) fn resolve(style: &ComputedStyle, containing: i32) -> Self {
        let fs = style.font_size;
        Self {
            margin: style.margin.map(|m| m.resolve(containing, fs)),
            padding: style.padding.map(|p| p.resolve(containing, fs)),
            border: style.border_width.map(|b| b.to_px(fs) as i32),
        }
    }

    /// Padding plus border, left and right.
    pub(crate) const fn inner_horizontal(&self) -> i32 {
        self.padding.horizontal() + self.border.horizontal()
    }

    /// Margins with `auto` taken as zero.
    pub(crate) fn margin_or_zero(&self) -> Sides<i32> {
        self.margin.map(|m| m.unwrap_or(0))
    }
}

impl Layout<'_, '_, '_> {
    /// Store resolved edges on a box, `auto` margins as zero.
    pub(crate) fn apply_edges(&mut self, id: BoxId, edges: &Edges) {
        let b = &mut self.tree[id];
        b.margin = edges.margin_or_zero();
        b.padding = edges.padding;
        b.border = edges.border;
    }

    /// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
    ///
    /// "'margin-left' + 'border-left-width' + 'padding-left' + 'width' +
    /// 'padding-right' + 'border-right-width' + 'margin-right' = width of
    /// containing block"
    pub(crate) fn solve_block_width(&mut self, id: BoxId, available: i32) {
        let style = self.tree.box_style(id);
        let edges = Edges::resolve(style, available);
        let specified = style.width.resolve(available, style.font_size);
        let inner = edges.inner_horizontal();

        let (width, left, right) = match specified {
            // "If 'width' is set to 'auto', any other 'auto' values become
            // '0' and 'width' follows from the resulting equality."
            None => {
                let left = edges.margin.left.unwrap_or(0);
                let right = edges.margin.right.unwrap_or(0);
                (available - left - right - inner, left, right)
            }
            Some(width) => {
                let rest = available - width - inner;
                match (edges.margin.left, edges.margin.right) {
                    // "If both 'margin-left' and 'margin-right' are 'auto',
                    // their used values are equal."
                    (None, None) => {
                        let left = (rest / 2).max(0);
                        (width, left, (rest - left).max(0))
                    }
                    // "If there is exactly one value specified as 'auto',
                    // its used value follows from the equality."
                    (None, Some(right)) => (width, rest - right, right),
                    // Over-constrained: "the specified value of
                    // 'margin-right' is ignored".
                    (Some(left), _) => (width, left, rest - left),
                }
            }
        };

        self.apply_edges(id, &edges);
        let b = &mut self.tree[id];
        b.width = width.max(0);
        b.margin.left = left;
        b.margin.right = right;
    }

    /// [§ 10.3.5 Floating, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#float-width)
    ///
    /// "the shrink-to-fit width is: min(max(preferred minimum width,
    /// available width), preferred width)." Used for floats and
    /// inline-blocks; `auto` margins are zero.
    pub(crate) fn solve_shrink_width(&mut self, id: BoxId, available: i32) {
        let style = self.tree.box_style(id);
        let edges = Edges::resolve(style, available);
        let outer = edges.margin_or_zero().horizontal() + edges.inner_horizontal();
        let width = style
            .width
            .resolve(available, style.font_size)
            .unwrap_or_else(|| {
                let b = &self.tree[id];
                available.max(b.min_width).min(b.max_width) - outer
            });
        self.apply_edges(id, &edges);
        self.tree[id].width = width.max(0);
    }

    /// [§ 10.6.3 Block-level non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#normal-block)
    ///
    /// A fixed `height` replaces the content height.
    pub(crate) fn apply_fixed_height(&mut self, id: BoxId) {
        let style = self.tree.box_style(id);
        if let Height::Length(height) = style.height {
            let height = height.to_px(style.font_size) as i32;
            self.tree[id].height = height.max(0);
        }
    }
}

/// Print entry into a layout routine with `layout-trace` enabled.
#[cfg(feature = "layout-trace")]
pub(crate) fn trace_enter(tree: &BoxTree, id: BoxId, routine: &str) -> DepthGuard {
    let depth = LAYOUT_DEPTH.with(|d| {
        let current = d.get();
        d.set(current + 1);
        current
    });
    let b = &tree[id];
    eprintln!(
        "[LAYOUT DEPTH] depth={depth} {routine} box={} type={:?} width={} children={}",
        id.0,
        b.box_type,
        b.width,
        b.children.len()
    );
    DepthGuard
}

/// Decrements the trace depth on every return path.
#[cfg(feature = "layout-trace")]
pub(crate) struct DepthGuard;

#[cfg(feature = "layout-trace")]
impl Drop for DepthGuard {
    fn drop(&mut self) {
        LAYOUT_DEPTH.with(|d| d.set(d.get() - 1));
    }
}
