//! Floats.
//!
//! [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
//!
//! "A float is a box that is shifted to the left or right on the current
//! line. ... Content flows down the right side of a left-floated box and
//! down the left side of a right-floated box."
//!
//! Floats are linked newest first onto the `float_children` of their block
//! formatting context root. Queries walk that list and locate each float
//! through its ancestor chain, so positions are always in the root's
//! content coordinates.

use marten_css::style::ClearType;

use super::Layout;
use crate::box_tree::{BoxId, BoxTreeError, BoxType};

/// The horizontal space left free by floats in a band of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Band {
    /// Left edge, in the container's coordinates.
    pub(crate) left: i32,
    /// Right edge, in the container's coordinates.
    pub(crate) right: i32,
    /// Some float narrowed the band.
    pub(crate) intruded: bool,
}

impl Layout<'_, '_, '_> {
    /// Margin box of a float in the coordinates of `bfc`:
    /// `(x, y, width, height)`.
    fn float_rect(&self, float: BoxId, bfc: BoxId) -> (i32, i32, i32, i32) {
        let (x, y) = self.tree.offset_in(float, bfc);
        let f = &self.tree[float];
        (x, y, f.width, f.height)
    }

    /// Free band for a container of `width` whose content edge is at
    /// horizontal offset `cx` in `bfc`, over `height` pixels from `top`
    /// (in `bfc` coordinates).
    pub(crate) fn find_sides(&self, bfc: BoxId, cx: i32, top: i32, height: i32, width: i32) -> Band {
        let (mut left, mut right) = (cx, cx + width);
        let mut intruded = false;
        let bottom = top + height;
        for &float in &self.tree[bfc].float_children {
            let (fx, fy, fw, fh) = self.float_rect(float, bfc);
            if fy >= bottom || fy + fh <= top {
                continue;
            }
            match self.tree[float].box_type {
                BoxType::FloatLeft if fx + fw > left => {
                    left = fx + fw;
                    intruded = true;
                }
                BoxType::FloatRight if fx < right => {
                    right = fx;
                    intruded = true;
                }
                _ => {}
            }
        }
        Band {
            left: left - cx,
            right: right - cx,
            intruded,
        }
    }

    /// Bottom of the float that ends first among those overlapping
    /// `top..bottom`.
    pub(crate) fn next_float_bottom(&self, bfc: BoxId, top: i32, bottom: i32) -> Option<i32> {
        self.tree[bfc]
            .float_children
            .iter()
            .map(|&f| self.float_rect(f, bfc))
            .filter(|&(_, fy, _, fh)| fy < bottom && fy + fh > top)
            .map(|(_, fy, _, fh)| fy + fh)
            .min()
    }

    /// Lowest bottom edge among the floats a `clear` value refers to.
    pub(crate) fn float_bottom(&self, bfc: BoxId, clear: ClearType) -> Option<i32> {
        self.tree[bfc]
            .float_children
            .iter()
            .filter(|&&f| match clear {
                ClearType::None => false,
                ClearType::Left => self.tree[f].box_type == BoxType::FloatLeft,
                ClearType::Right => self.tree[f].box_type == BoxType::FloatRight,
                ClearType::Both => true,
            })
            .map(|&f| {
                let (_, fy, _, fh) = self.float_rect(f, bfc);
                fy + fh
            })
            .max()
    }

    /// [§ 10.3.5 Floating, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#float-width)
    ///
    /// Size a float wrapper for a container `available` pixels wide: the
    /// inner block takes its fixed or percentage width, or shrinks to fit,
    /// and the wrapper becomes the inner box's margin box.
    pub(crate) fn layout_float(&mut self, float: BoxId, available: i32) -> Result<(), BoxTreeError> {
        #[cfg(feature = "layout-trace")]
        let _depth = super::trace_enter(self.tree, float, "float");

        let inner = match self.tree.children(float) {
            [inner] => *inner,
            _ => return Err(BoxTreeError::MalformedFloat(float.0)),
        };
        if self.tree[inner].box_type == BoxType::Table {
            self.layout_table(inner, available)?;
        } else {
            self.solve_shrink_width(inner, available);
            self.layout_block_context(inner)?;
            self.apply_fixed_height(inner);
        }

        let i = &mut self.tree[inner];
        i.x = i.left_edge();
        i.y = i.top_edge();
        let (width, height) = (i.margin_box_width(), i.margin_box_height());
        let f = &mut self.tree[float];
        f.width = width;
        f.height = height;
        Ok(())
    }

    /// [§ 9.5.1 Positioning the float](https://www.w3.org/TR/CSS2/visuren.html#float-rules)
    ///
    /// "A floating box's outer top may not be higher than the top of any
    /// line-box containing a box generated by an element earlier in the
    /// source document."
    ///
    /// Position a sized float at or below `top` in container `cont` (whose
    /// content edge is at `(cx, cy)` in `bfc`), in the first band where it
    /// fits, and link it into the context root. The float's `x` and `y` end
    /// up relative to `cont`.
    pub(crate) fn place_float_below(
        &mut self,
        float: BoxId,
        cont: BoxId,
        bfc: BoxId,
        (cx, cy): (i32, i32),
        top: i32,
    ) {
        let width = self.tree[cont].width;
        let (fw, fh) = (self.tree[float].width, self.tree[float].height);
        let mut top = top;
        let band = loop {
            let band = self.find_sides(bfc, cx, cy + top, fh.max(1), width);
            if !band.intruded || band.right - band.left >= fw {
                break band;
            }
            match self.next_float_bottom(bfc, cy + top, cy + top + fh.max(1)) {
                Some(bottom) if bottom - cy > top => top = bottom - cy,
                _ => break band,
            }
        };
        let x = if self.tree[float].box_type == BoxType::FloatRight {
            band.right - fw
        } else {
            band.left
        };
        self.link_float(float, bfc, x, top);
    }

    /// Record a float's position in its container and add it to the
    /// context root.
    pub(crate) fn link_float(&mut self, float: BoxId, bfc: BoxId, x: i32, y: i32) {
        let f = &mut self.tree[float];
        f.x = x;
        f.y = y;
        self.tree[bfc].float_children.insert(0, float);
    }
}
