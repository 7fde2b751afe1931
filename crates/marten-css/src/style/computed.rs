//! The resolved per-element style record.
//!
//! Every field is always populated. A cascade step starts from
//! [`ComputedStyle::inherit_from`] the parent and overwrites properties as
//! declarations apply, so a malformed declaration simply leaves the
//! previous value in place.

use serde::Serialize;
use strum_macros::{Display, EnumString};

use super::colour::Colour;
use super::values::{Height, Length, LengthOrPercent, LineHeight, MAX_PX, Sides, Size};

/// Default font size in pixels (the `medium` keyword).
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// [§ 9.2.4 The 'display' property](https://www.w3.org/TR/CSS2/visuren.html#display-prop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum DisplayType {
    /// "This value causes an element to generate one or more inline boxes."
    #[default]
    Inline,
    /// "This value causes an element to generate a block box."
    Block,
    /// "This value causes an element to generate a principal block box and a
    /// marker box."
    ListItem,
    /// "This value causes an element to generate an inline-level block
    /// container."
    InlineBlock,
    /// "Specifies that an element is a block-level table."
    Table,
    /// "Specifies that an element groups one or more rows."
    TableRowGroup,
    /// "Like 'table-row-group', but for visual formatting, the row group is
    /// always displayed before all other rows and row groups"
    TableHeaderGroup,
    /// "Like 'table-row-group', but ... always displayed after all other rows"
    TableFooterGroup,
    /// "Specifies that an element is a row of cells."
    TableRow,
    /// "Specifies that an element represents a table cell."
    TableCell,
    /// "This value causes an element to not appear in the formatting
    /// structure"
    None,
}

impl DisplayType {
    /// Block-level in the sense of breaking an inline run.
    #[must_use]
    pub const fn is_block_level(self) -> bool {
        matches!(
            self,
            Self::Block
                | Self::ListItem
                | Self::Table
                | Self::TableRowGroup
                | Self::TableHeaderGroup
                | Self::TableFooterGroup
                | Self::TableRow
                | Self::TableCell
        )
    }
}

/// [§ 9.5.1 Positioning the float](https://www.w3.org/TR/CSS2/visuren.html#float-position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FloatType {
    /// "The box is not floated."
    #[default]
    None,
    /// "The element generates a block box that is floated to the left."
    Left,
    /// "The element generates a block box that is floated to the right."
    Right,
}

/// [§ 9.5.2 Controlling flow next to floats](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ClearType {
    /// "No constraint on the box's position with respect to floats."
    #[default]
    None,
    /// "below the bottom outer edge of any left-floating boxes"
    Left,
    /// "below the bottom outer edge of any right-floating boxes"
    Right,
    /// "below the bottom outer edge of any right-floating and left-floating
    /// boxes"
    Both,
}

/// [§ 16.2 Alignment](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum TextAlign {
    /// Lines start at the left edge.
    #[default]
    Left,
    /// Lines end at the right edge.
    Right,
    /// Lines are centred.
    Center,
    /// Laid out as `left`; inter-word stretching is a painter concern.
    Justify,
}

/// [§ 15.4 Font styling](https://www.w3.org/TR/CSS2/fonts.html#font-styling)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// "a font that is classified as 'italic'"
    Italic,
    /// "a font that is classified as 'oblique'"
    Oblique,
}

/// [§ 16.6 White space](https://www.w3.org/TR/CSS2/text.html#white-space-prop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum WhiteSpace {
    /// "collapse sequences of white space, and break lines as necessary"
    #[default]
    Normal,
    /// "prevents user agents from collapsing sequences of white space.
    /// Lines are only broken at preserved newline characters."
    Pre,
    /// "collapses white space as for 'normal', but suppresses line breaks"
    Nowrap,
}

impl WhiteSpace {
    /// Whether lines may not wrap at spaces.
    #[must_use]
    pub const fn is_unbreakable(self) -> bool {
        matches!(self, Self::Pre | Self::Nowrap)
    }
}

/// Weight as a number, `400` normal and `700` bold.
pub type FontWeight = u16;

/// A fully resolved style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedStyle {
    /// "Inherited: no"
    pub display: DisplayType,
    /// "Inherited: no"
    pub float: FloatType,
    /// "Inherited: no"
    pub clear: ClearType,
    /// "Inherited: yes"
    pub color: Colour,
    /// "Inherited: no"
    pub background_color: Colour,
    /// Pixels. "Inherited: yes"
    pub font_size: f32,
    /// "Inherited: yes"
    pub font_weight: FontWeight,
    /// "Inherited: yes"
    pub font_style: FontStyle,
    /// "Inherited: yes"
    pub line_height: LineHeight,
    /// "Inherited: yes"
    pub text_align: TextAlign,
    /// "Inherited: yes"
    pub text_indent: LengthOrPercent,
    /// "Inherited: yes"
    pub white_space: WhiteSpace,
    /// "Inherited: no"
    pub width: Size,
    /// "Inherited: no"
    pub height: Height,
    /// "Inherited: no"
    pub margin: Sides<Size>,
    /// "Inherited: no"
    pub padding: Sides<LengthOrPercent>,
    /// Border widths. Border styles and colours are a painter concern.
    /// "Inherited: no"
    pub border_width: Sides<Length>,
}

impl Default for ComputedStyle {
    /// Initial values of every property.
    fn default() -> Self {
        Self {
            display: DisplayType::Inline,
            float: FloatType::None,
            clear: ClearType::None,
            color: Colour::BLACK,
            background_color: Colour::TRANSPARENT,
            font_size: DEFAULT_FONT_SIZE,
            font_weight: 400,
            font_style: FontStyle::Normal,
            line_height: LineHeight::Absolute(1.25),
            text_align: TextAlign::Left,
            text_indent: LengthOrPercent::Length(Length::ZERO),
            white_space: WhiteSpace::Normal,
            width: Size::Auto,
            height: Height::Auto,
            margin: Sides::all(Size::Length(Length::ZERO)),
            padding: Sides::all(LengthOrPercent::Length(Length::ZERO)),
            border_width: Sides::all(Length::ZERO),
        }
    }
}

impl ComputedStyle {
    /// [§ 6.2 Inheritance](https://www.w3.org/TR/CSS2/cascade.html#inheritance)
    ///
    /// "Some values are inherited by the children of an element in the
    /// document tree." Inherited properties copy the parent's value; the rest
    /// start from their initial value.
    #[must_use]
    pub fn inherit_from(parent: &Self) -> Self {
        Self {
            color: parent.color,
            font_size: parent.font_size,
            font_weight: parent.font_weight,
            font_style: parent.font_style,
            line_height: parent.line_height,
            text_align: parent.text_align,
            text_indent: parent.text_indent,
            white_space: parent.white_space,
            ..Self::default()
        }
    }

    /// Used line height in pixels.
    ///
    /// [§ 10.8.1](https://www.w3.org/TR/CSS2/visudet.html#propdef-line-height)
    #[must_use]
    pub fn line_height_px(&self) -> i32 {
        let px = match self.line_height {
            LineHeight::Absolute(factor) => factor * self.font_size,
            LineHeight::Length(len) => len.to_px(self.font_size),
        };
        px.clamp(0.0, MAX_PX) as i32
    }

    /// Whether this element should be laid out as a float.
    #[must_use]
    pub const fn is_floated(&self) -> bool {
        !matches!(self.float, FloatType::None)
    }
}
