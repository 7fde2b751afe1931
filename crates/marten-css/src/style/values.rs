//! Specified length and size values.
//!
//! [§ 4.3 Lengths](https://www.w3.org/TR/CSS2/syndata.html#length-units)
//!
//! "Lengths refer to horizontal or vertical measurements. The format of a
//! length value is a `<number>` immediately followed by a unit identifier."

use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::parser::ComponentValue;
use crate::tokenizer::CSSToken;

/// [§ 4.3.2 Lengths](https://www.w3.org/TR/CSS2/syndata.html#length-units)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LengthUnit {
    /// "pixel units — 1px is equal to 0.75pt"
    Px,
    /// "the 'font-size' of the relevant font"
    Em,
    /// "the 'x-height' of the relevant font"
    Ex,
    /// "inches — 1in is equal to 2.54cm"
    In,
    /// "centimeters"
    Cm,
    /// "millimeters"
    Mm,
    /// "points — the points used by CSS are equal to 1/72nd of 1in"
    Pt,
    /// "picas — 1pc is equal to 12pt"
    Pc,
}

/// Largest magnitude of a resolved length, in pixels. Sums of a few
/// resolved lengths stay well inside `i32`.
pub const MAX_PX: f32 = 1.0e6;

/// A number with a unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Length {
    /// Magnitude.
    pub value: f32,
    /// Unit identifier.
    pub unit: LengthUnit,
}

impl Length {
    /// Zero pixels.
    pub const ZERO: Self = Self::px(0.0);

    /// A length in pixels.
    #[must_use]
    pub const fn px(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Px,
        }
    }

    /// Convert to device pixels, with `em`/`ex` relative to `font_size`.
    ///
    /// Absolute units assume 96 pixels per inch; `ex` is taken as half an
    /// em since no font is consulted. The result is clamped to
    /// [`MAX_PX`] either way.
    #[must_use]
    pub fn to_px(self, font_size: f32) -> f32 {
        let v = self.value;
        let px = match self.unit {
            LengthUnit::Px => v,
            LengthUnit::Em => v * font_size,
            LengthUnit::Ex => v * font_size * 0.5,
            LengthUnit::In => v * 96.0,
            LengthUnit::Cm => v * 96.0 / 2.54,
            LengthUnit::Mm => v * 96.0 / 25.4,
            LengthUnit::Pt => v * 96.0 / 72.0,
            LengthUnit::Pc => v * 16.0,
        };
        px.clamp(-MAX_PX, MAX_PX)
    }

    /// Parse a `<length>`; a unitless zero is accepted.
    #[must_use]
    pub fn parse(value: &ComponentValue) -> Option<Self> {
        match value {
            ComponentValue::Token(CSSToken::Dimension { value, unit }) => {
                unit.parse::<LengthUnit>().ok().map(|unit| Self {
                    value: *value,
                    unit,
                })
            }
            ComponentValue::Token(CSSToken::Number(n)) if *n == 0.0 => Some(Self::ZERO),
            _ => None,
        }
    }
}

/// Width or margin: `auto | <length> | <percentage>`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Size {
    /// "auto"
    Auto,
    /// A fixed length.
    Length(Length),
    /// "a percentage of the width of the containing block"
    Percent(f32),
}

impl Size {
    /// Parse `auto`, a length, or a percentage.
    #[must_use]
    pub fn parse(value: &ComponentValue) -> Option<Self> {
        match value {
            ComponentValue::Token(CSSToken::Ident(s)) if s.eq_ignore_ascii_case("auto") => {
                Some(Self::Auto)
            }
            ComponentValue::Token(CSSToken::Percentage(p)) => Some(Self::Percent(*p)),
            other => Length::parse(other).map(Self::Length),
        }
    }

    /// Pixel value against `containing` width, `None` for auto.
    #[must_use]
    pub fn resolve(self, containing: i32, font_size: f32) -> Option<i32> {
        match self {
            Self::Auto => None,
            Self::Length(l) => Some(l.to_px(font_size) as i32),
            Self::Percent(p) => Some(percent_of(containing, p)),
        }
    }
}

/// `p` percent of `containing`, clamped like a length.
fn percent_of(containing: i32, p: f32) -> i32 {
    (containing as f32 * p / 100.0).clamp(-MAX_PX, MAX_PX) as i32
}

/// Padding or text-indent: `<length> | <percentage>`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LengthOrPercent {
    /// A fixed length.
    Length(Length),
    /// Percentage of the containing block width.
    Percent(f32),
}

impl LengthOrPercent {
    /// Parse a length or percentage.
    #[must_use]
    pub fn parse(value: &ComponentValue) -> Option<Self> {
        match value {
            ComponentValue::Token(CSSToken::Percentage(p)) => Some(Self::Percent(*p)),
            other => Length::parse(other).map(Self::Length),
        }
    }

    /// Pixel value against `containing` width.
    #[must_use]
    pub fn resolve(self, containing: i32, font_size: f32) -> i32 {
        match self {
            Self::Length(l) => l.to_px(font_size) as i32,
            Self::Percent(p) => percent_of(containing, p),
        }
    }
}

/// [§ 10.5 Content height](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
///
/// Percentage heights compute to `auto` here, so only lengths are kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Height {
    /// "The height depends on the values of other properties."
    Auto,
    /// A fixed length.
    Length(Length),
}

/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#propdef-line-height)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LineHeight {
    /// "`<number>`: The used value of the property is this number multiplied
    /// by the element's font size."
    Absolute(f32),
    /// A length, already converted to pixels when the declaration applied
    /// so descendants inherit the computed value.
    Length(Length),
}

/// A value per box side, in CSS order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Sides<T> {
    /// Top side.
    pub top: T,
    /// Right side.
    pub right: T,
    /// Bottom side.
    pub bottom: T,
    /// Left side.
    pub left: T,
}

impl<T: Copy> Sides<T> {
    /// The same value on every side.
    pub const fn all(value: T) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    ///
    /// "If there is only one component value, it applies to all sides. If
    /// there are two values, the top and bottom margins are set to the first
    /// value and the right and left margins are set to the second. If there
    /// are three values, the top is set to the first value, the left and
    /// right are set to the second, and the bottom is set to the third. If
    /// there are four values, they apply to the top, right, bottom, and left,
    /// respectively."
    #[must_use]
    pub fn from_shorthand(values: &[T]) -> Option<Self> {
        let (top, right, bottom, left) = match *values {
            [a] => (a, a, a, a),
            [a, b] => (a, b, a, b),
            [a, b, c] => (a, b, c, b),
            [a, b, c, d] => (a, b, c, d),
            _ => return None,
        };
        Some(Self {
            top,
            right,
            bottom,
            left,
        })
    }

    /// Apply `f` to every side.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Sides<U> {
        Sides {
            top: f(self.top),
            right: f(self.right),
            bottom: f(self.bottom),
            left: f(self.left),
        }
    }
}

impl Sides<i32> {
    /// Left plus right.
    #[must_use]
    pub const fn horizontal(&self) -> i32 {
        self.left.saturating_add(self.right)
    }

    /// Top plus bottom.
    #[must_use]
    pub const fn vertical(&self) -> i32 {
        self.top.saturating_add(self.bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_px_converts_units() {
        assert!((Length { value: 2.0, unit: LengthUnit::Em }.to_px(16.0) - 32.0).abs() < f32::EPSILON);
        assert!((Length { value: 1.0, unit: LengthUnit::In }.to_px(16.0) - 96.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_enormous_lengths_clamp() {
        assert!((Length::px(3.0e9).to_px(16.0) - MAX_PX).abs() < f32::EPSILON);
        assert!((Length::px(-3.0e9).to_px(16.0) + MAX_PX).abs() < f32::EPSILON);
        assert_eq!(Size::Percent(1.0e12).resolve(800, 16.0), Some(MAX_PX as i32));
        assert_eq!(LengthOrPercent::Percent(50.0).resolve(800, 16.0), 400);
    }
}
