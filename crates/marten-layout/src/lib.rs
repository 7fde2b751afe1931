//! Box tree construction and layout for the Marten layout core.
//!
//! The pipeline, leaves first:
//!
//! 1. [`build_box_tree`] walks the element tree and the resolved styles and
//!    produces an unlaid-out [`BoxTree`], registering form controls.
//! 2. [`normalize`] synthesizes the table, row group, row and cell boxes
//!    missing from the builder's output.
//! 3. [`calculate_widths`] fills in the intrinsic `min_width` and
//!    `max_width` of every box, bottom-up.
//! 4. [`layout_document`] assigns `x`, `y`, `width` and `height`, top-down.
//!
//! # Scope
//!
//! - [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//! - [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//! - [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
//! - [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
//! - [§ 17.5.2 Automatic table layout](https://www.w3.org/TR/CSS2/tables.html#auto-table-layout)
//!
//! # Not Implemented
//!
//! - Positioning schemes other than normal flow and floats
//! - Vertical alignment within lines and cells
//! - Margin collapsing through parents and empty boxes

/// The box arena.
pub mod box_tree;
/// Element tree to box tree conversion.
pub mod builder;
/// Layout context shared by the passes.
pub mod context;
/// Serializable snapshot of a laid-out box tree.
pub mod dump;
/// Text measurement.
pub mod font;
/// Intrinsic width calculation.
pub mod intrinsic;
/// The layout passes.
pub mod layout;
/// Box tree normalization.
pub mod normalize;

pub use box_tree::{
    BoxId, BoxTree, BoxTreeError, BoxType, Column, ColumnType, LayoutBox, Object, StyleId,
    TextRun, UNKNOWN_MAX_WIDTH, UNKNOWN_WIDTH,
};
pub use builder::build_box_tree;
pub use context::LayoutContext;
pub use dump::{BoxDump, dump_box_tree};
pub use font::{ApproximateFontMetrics, FontMetrics};
pub use intrinsic::calculate_widths;
pub use layout::layout_document;
pub use normalize::normalize;
