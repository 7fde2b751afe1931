//! Layout boxes and the arena that owns them.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! Boxes are addressed by [`BoxId`] and own their children as an ordered
//! index vector. Styles live in a parallel arena so that continuation boxes
//! created by line breaking share the style of the box they were split from.

use std::ops::{Index, IndexMut};

use marten_css::ComputedStyle;
use marten_css::style::Sides;
use marten_dom::NodeId;
use marten_form::{ControlId, FormControl, WrappedText};
use serde::Serialize;
use thiserror::Error;

/// Width of a box that has not been sized yet.
pub const UNKNOWN_WIDTH: i32 = i32::MAX;

/// `max_width` of a box whose intrinsic widths have not been calculated.
pub const UNKNOWN_MAX_WIDTH: i32 = i32::MAX;

/// Index of a box in its [`BoxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BoxId(pub usize);

/// Index of a style in its [`BoxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StyleId(pub usize);

/// The kind of a box, which fixes the kinds of children it may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoxType {
    /// "A block-level box is also a block container box"
    Block,
    /// A piece of text, an image, or a form gadget on a line.
    Inline,
    /// Anonymous block holding a run of inline-level boxes.
    InlineContainer,
    /// "a block-level table"
    Table,
    /// "a row of cells"
    TableRow,
    /// "groups one or more rows"
    TableRowGroup,
    /// "a table cell"
    TableCell,
    /// Wrapper of a left-floated block or table.
    FloatLeft,
    /// Wrapper of a right-floated block or table.
    FloatRight,
    /// "an inline-level block container"
    InlineBlock,
}

impl BoxType {
    /// Boxes whose children are blocks, tables and inline containers.
    #[must_use]
    pub const fn is_block_container(self) -> bool {
        matches!(
            self,
            Self::Block | Self::TableCell | Self::InlineBlock | Self::FloatLeft | Self::FloatRight
        )
    }

    /// Either float wrapper.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::FloatLeft | Self::FloatRight)
    }
}

/// A run of text on a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextRun {
    /// Collapsed text with no leading or trailing space.
    pub text: String,
    /// A collapsible space follows the run.
    pub space: bool,
}

impl TextRun {
    /// A run with no trailing space.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            space: false,
        }
    }
}

/// An embedded object such as an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Object {
    /// The `src` attribute.
    pub src: String,
}

/// How a table column's width is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ColumnType {
    /// No cell has started in this column yet.
    #[default]
    Unknown,
    /// Only auto-width cells.
    Auto,
    /// A cell with a fixed width; `width` holds the pixels.
    Fixed,
    /// A cell with a percentage width; `width` holds the percentage.
    Percent,
}

/// Working state for one table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Column {
    /// How the width is determined.
    pub kind: ColumnType,
    /// Narrowest usable width.
    pub min: i32,
    /// Preferred width.
    pub max: i32,
    /// Fixed pixels or percentage, depending on `kind`.
    pub width: i32,
    /// Width given to the column by the last layout.
    pub used: i32,
}

/// One rectangular layout unit.
///
/// `x` and `y` locate the content edge relative to the parent's content
/// edge; `width` and `height` are the content size. For boxes in a float
/// wrapper, the wrapper has no edges of its own, so its content box is the
/// float's margin box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutBox {
    /// Box kind.
    pub box_type: BoxType,
    /// Style in the owning tree's style arena.
    pub style: StyleId,
    /// Element the box was generated for; `None` for anonymous boxes.
    pub node: Option<NodeId>,
    /// Content edge, horizontal.
    pub x: i32,
    /// Content edge, vertical.
    pub y: i32,
    /// Content width.
    pub width: i32,
    /// Content height.
    pub height: i32,
    /// Narrowest width the box can be laid out at, including edges.
    pub min_width: i32,
    /// Width the box takes with no line breaking, including edges.
    pub max_width: i32,
    /// Used margins.
    pub margin: Sides<i32>,
    /// Used padding.
    pub padding: Sides<i32>,
    /// Used border widths.
    pub border: Sides<i32>,
    /// Text, or the alternative text of an object.
    pub text: Option<TextRun>,
    /// Link target inherited from an enclosing anchor.
    pub href: Option<String>,
    /// Embedded object.
    pub object: Option<Object>,
    /// Form control drawn by this box.
    pub gadget: Option<ControlId>,
    /// Cells: the column span. Tables: the column count.
    pub columns: usize,
    /// Cells: the first column covered.
    pub start_column: usize,
    /// Cells: the row span. Tables: the row count.
    pub rows: usize,
    /// Tables: the column working set.
    pub col: Vec<Column>,
    /// Parent box; `None` for the root.
    pub parent: Option<BoxId>,
    /// Children in document order.
    pub children: Vec<BoxId>,
    /// Floats positioned in this block formatting context, newest first.
    pub float_children: Vec<BoxId>,
    /// Continuation boxes: the box this one was split from.
    pub clone_of: Option<BoxId>,
}

impl LayoutBox {
    /// An unsized box with no edges.
    #[must_use]
    pub const fn new(box_type: BoxType, style: StyleId) -> Self {
        Self {
            box_type,
            style,
            node: None,
            x: 0,
            y: 0,
            width: UNKNOWN_WIDTH,
            height: 0,
            min_width: 0,
            max_width: UNKNOWN_MAX_WIDTH,
            margin: Sides::all(0),
            padding: Sides::all(0),
            border: Sides::all(0),
            text: None,
            href: None,
            object: None,
            gadget: None,
            columns: 1,
            start_column: 0,
            rows: 1,
            col: Vec::new(),
            parent: None,
            children: Vec::new(),
            float_children: Vec::new(),
            clone_of: None,
        }
    }

    /// Left margin, border and padding.
    #[must_use]
    pub const fn left_edge(&self) -> i32 {
        self.margin.left + self.border.left + self.padding.left
    }

    /// Top margin, border and padding.
    #[must_use]
    pub const fn top_edge(&self) -> i32 {
        self.margin.top + self.border.top + self.padding.top
    }

    /// Width of the margin box.
    #[must_use]
    pub const fn margin_box_width(&self) -> i32 {
        self.width
            .saturating_add(self.margin.horizontal())
            .saturating_add(self.border.horizontal())
            .saturating_add(self.padding.horizontal())
    }

    /// Height of the margin box.
    #[must_use]
    pub const fn margin_box_height(&self) -> i32 {
        self.height
            .saturating_add(self.margin.vertical())
            .saturating_add(self.border.vertical())
            .saturating_add(self.padding.vertical())
    }
}

/// Structural errors in a box tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoxTreeError {
    /// An inline-level box directly under a box that only holds block-level
    /// or table boxes. The builder never produces one.
    #[error("{child:?} box {child_id} cannot be a child of {parent:?} box {parent_id}")]
    MisplacedBox {
        /// Parent kind.
        parent: BoxType,
        /// Parent index.
        parent_id: usize,
        /// Child kind.
        child: BoxType,
        /// Child index.
        child_id: usize,
    },
    /// A float wrapper without its single block or table child.
    #[error("float box {0} must hold exactly one block or table")]
    MalformedFloat(usize),
    /// A form control could not be registered.
    #[error(transparent)]
    Form(#[from] marten_form::FormError),
}

/// Arena of boxes and their styles.
#[derive(Debug, Clone, Serialize)]
pub struct BoxTree {
    boxes: Vec<Option<LayoutBox>>,
    #[serde(skip)]
    free: Vec<usize>,
    styles: Vec<ComputedStyle>,
    root: BoxId,
}

impl BoxTree {
    /// A tree holding one root block with `style`.
    #[must_use]
    pub fn new(style: ComputedStyle) -> Self {
        let mut tree = Self {
            boxes: Vec::new(),
            free: Vec::new(),
            styles: vec![style],
            root: BoxId(0),
        };
        tree.root = tree.alloc(LayoutBox::new(BoxType::Block, StyleId(0)));
        tree
    }

    /// The root block.
    #[must_use]
    pub const fn root(&self) -> BoxId {
        self.root
    }

    /// Register a style.
    pub fn add_style(&mut self, style: ComputedStyle) -> StyleId {
        self.styles.push(style);
        StyleId(self.styles.len() - 1)
    }

    /// Style by id.
    ///
    /// # Panics
    /// If `id` was not returned by this tree.
    #[must_use]
    pub fn style(&self, id: StyleId) -> &ComputedStyle {
        &self.styles[id.0]
    }

    /// Style of a box.
    #[must_use]
    pub fn box_style(&self, id: BoxId) -> &ComputedStyle {
        self.style(self[id].style)
    }

    /// Store a box, reusing a discarded slot when one is free.
    pub fn alloc(&mut self, layout_box: LayoutBox) -> BoxId {
        if let Some(slot) = self.free.pop() {
            self.boxes[slot] = Some(layout_box);
            BoxId(slot)
        } else {
            self.boxes.push(Some(layout_box));
            BoxId(self.boxes.len() - 1)
        }
    }

    /// Box by id, `None` once discarded.
    #[must_use]
    pub fn get(&self, id: BoxId) -> Option<&LayoutBox> {
        self.boxes.get(id.0).and_then(Option::as_ref)
    }

    /// Mutable box by id.
    pub fn get_mut(&mut self, id: BoxId) -> Option<&mut LayoutBox> {
        self.boxes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Number of live boxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.iter().filter(|b| b.is_some()).count()
    }

    /// Whether the tree holds no boxes. Never true for a tree from
    /// [`BoxTree::new`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of every live box, in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = BoxId> + '_ {
        self.boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_some())
            .map(|(i, _)| BoxId(i))
    }

    /// Children of a box.
    #[must_use]
    pub fn children(&self, id: BoxId) -> &[BoxId] {
        self.get(id).map_or(&[], |b| b.children.as_slice())
    }

    /// Append `child` to `parent`'s children.
    pub fn append_child(&mut self, parent: BoxId, child: BoxId) {
        self[child].parent = Some(parent);
        self[parent].children.push(child);
    }

    /// Allocate a box and append it to `parent`.
    pub fn append_new(&mut self, parent: BoxId, layout_box: LayoutBox) -> BoxId {
        let id = self.alloc(layout_box);
        self.append_child(parent, id);
        id
    }

    /// Pre-order walk of the subtree under `id`, `id` included.
    #[must_use]
    pub fn descendants(&self, id: BoxId) -> Vec<BoxId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Remove `id` from its parent and free it with its whole subtree.
    ///
    /// An explicit worklist keeps deep trees off the call stack.
    pub fn discard_subtree(&mut self, id: BoxId) {
        if let Some(parent) = self.get(id).and_then(|b| b.parent)
            && let Some(p) = self.get_mut(parent)
        {
            p.children.retain(|&c| c != id);
            p.float_children.retain(|&c| c != id);
        }
        let mut worklist = vec![id];
        while let Some(next) = worklist.pop() {
            if let Some(slot) = self.boxes.get_mut(next.0)
                && let Some(discarded) = slot.take()
            {
                worklist.extend(discarded.children);
                self.free.push(next.0);
            }
        }
    }

    /// Content edge of `id` in the coordinates of `ancestor`'s content box.
    #[must_use]
    pub fn offset_in(&self, id: BoxId, ancestor: BoxId) -> (i32, i32) {
        let (mut x, mut y) = (0, 0);
        let mut current = Some(id);
        while let Some(c) = current
            && c != ancestor
        {
            let Some(b) = self.get(c) else { break };
            x += b.x;
            y += b.y;
            current = b.parent;
        }
        (x, y)
    }

    /// Reset every box to the unsized state, keeping structure.
    pub fn reset_widths(&mut self) {
        for b in self.boxes.iter_mut().flatten() {
            b.min_width = 0;
            b.max_width = UNKNOWN_MAX_WIDTH;
            b.col.clear();
        }
    }
}

impl Index<BoxId> for BoxTree {
    type Output = LayoutBox;

    fn index(&self, id: BoxId) -> &LayoutBox {
        match self.get(id) {
            Some(b) => b,
            None => panic!("box {} has been discarded", id.0),
        }
    }
}

impl IndexMut<BoxId> for BoxTree {
    fn index_mut(&mut self, id: BoxId) -> &mut LayoutBox {
        match self.get_mut(id) {
            Some(b) => b,
            None => panic!("box {} has been discarded", id.0),
        }
    }
}

/// Textareas submit the lines they were wrapped into.
impl WrappedText for BoxTree {
    fn wrapped_lines(&self, control: &FormControl) -> Option<Vec<String>> {
        let gadget = BoxId(control.layout_box?);
        self.get(gadget)?;
        let mut lines = Vec::new();
        for &container in self.children(gadget) {
            let mut line: Option<(i32, String)> = None;
            let mut pending_space = false;
            for &child in self.children(container) {
                let b = &self[child];
                let Some(run) = &b.text else { continue };
                match &mut line {
                    Some((y, text)) if *y == b.y => {
                        if pending_space {
                            text.push(' ');
                        }
                        text.push_str(&run.text);
                    }
                    _ => {
                        if let Some((_, text)) = line.take() {
                            lines.push(text);
                        }
                        line = Some((b.y, run.text.clone()));
                    }
                }
                pending_space = run.space;
            }
            lines.push(line.map(|(_, text)| text).unwrap_or_default());
        }
        Some(lines)
    }
}
