//! Computed style representation.

pub mod colour;
pub mod computed;
pub mod properties;
pub mod values;

pub use colour::Colour;
pub use computed::{
    ClearType, ComputedStyle, DEFAULT_FONT_SIZE, DisplayType, FloatType, FontStyle, FontWeight,
    TextAlign, WhiteSpace,
};
pub use properties::apply_declaration;
pub use values::{Height, Length, LengthOrPercent, LengthUnit, LineHeight, MAX_PX, Sides, Size};
