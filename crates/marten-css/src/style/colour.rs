//! Colour values.
//!
//! [§ 4.3.6 Colors](https://www.w3.org/TR/CSS2/syndata.html#color-units)
//!
//! Colours are packed `0xRRGGBB` integers. Transparency is a single
//! out-of-range sentinel rather than an alpha channel.

use core::fmt;

use serde::Serialize;

use crate::parser::ComponentValue;
use crate::tokenizer::CSSToken;

/// A packed RGB colour or [`Colour::TRANSPARENT`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Colour(pub u32);

impl Colour {
    /// Black (#000000)
    pub const BLACK: Self = Self(0x00_0000);
    /// White (#ffffff)
    pub const WHITE: Self = Self(0xff_ffff);
    /// No colour; outside the 24-bit range so it never collides with RGB.
    pub const TRANSPARENT: Self = Self(0x100_0000);

    /// Pack three channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Whether this is the transparent sentinel.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.0 == Self::TRANSPARENT.0
    }

    /// "The format of an RGB value in hexadecimal notation is a '#'
    /// immediately followed by either three or six hexadecimal characters.
    /// The three-digit RGB notation (#rgb) is converted into six-digit form
    /// (#rrggbb) by replicating digits, not by adding zeros."
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let v = u32::from_str_radix(hex, 16).ok()?;
                let (r, g, b) = ((v >> 8) & 0xf, (v >> 4) & 0xf, v & 0xf);
                Some(Self((r * 0x11) << 16 | (g * 0x11) << 8 | b * 0x11))
            }
            6 => u32::from_str_radix(hex, 16).ok().map(Self),
            _ => None,
        }
    }

    /// Look up a colour keyword (case-insensitive).
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower == "transparent" {
            return Some(Self::TRANSPARENT);
        }
        COLOUR_TABLE
            .binary_search_by(|(n, _)| n.cmp(&lower.as_str()))
            .ok()
            .map(|i| Self(COLOUR_TABLE[i].1))
    }

    /// Parse a single colour component value: keyword, hash, or `rgb()`.
    #[must_use]
    pub fn parse(value: &ComponentValue) -> Option<Self> {
        match value {
            ComponentValue::Token(CSSToken::Ident(name)) => Self::from_named(name),
            ComponentValue::Token(CSSToken::Hash(hex)) => Self::from_hex(hex),
            ComponentValue::Function { name, args } if name == "rgb" => parse_rgb(args),
            _ => None,
        }
    }
}

impl fmt::Debug for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_transparent() {
            write!(f, "transparent")
        } else {
            write!(f, "#{:06x}", self.0)
        }
    }
}

/// "The format of an RGB value in the functional notation is 'rgb('
/// followed by a comma-separated list of three numerical values (either
/// three integer values or three percentage values) followed by ')'."
///
/// "Values outside the device gamut should be clipped."
fn parse_rgb(args: &[ComponentValue]) -> Option<Colour> {
    let channels: Vec<u8> = args
        .iter()
        .filter(|a| !matches!(a, ComponentValue::Token(CSSToken::Comma)))
        .map(|a| match a {
            ComponentValue::Token(CSSToken::Number(n)) => Some(n.clamp(0.0, 255.0) as u8),
            ComponentValue::Token(CSSToken::Percentage(p)) => {
                Some((p.clamp(0.0, 100.0) * 255.0 / 100.0).round() as u8)
            }
            _ => None,
        })
        .collect::<Option<_>>()?;
    match channels.as_slice() {
        [r, g, b] => Some(Colour::rgb(*r, *g, *b)),
        _ => None,
    }
}

/// [§ 4.3.6](https://www.w3.org/TR/CSS2/syndata.html#color-units) keywords
/// plus the common extended names, sorted for binary search.
const COLOUR_TABLE: &[(&str, u32)] = &[
    ("aqua", 0x00_ffff),
    ("black", 0x00_0000),
    ("blue", 0x00_00ff),
    ("brown", 0xa5_2a2a),
    ("cyan", 0x00_ffff),
    ("darkgray", 0xa9_a9a9),
    ("darkgrey", 0xa9_a9a9),
    ("fuchsia", 0xff_00ff),
    ("gold", 0xff_d700),
    ("gray", 0x80_8080),
    ("green", 0x00_8000),
    ("grey", 0x80_8080),
    ("lightgray", 0xd3_d3d3),
    ("lightgrey", 0xd3_d3d3),
    ("lime", 0x00_ff00),
    ("magenta", 0xff_00ff),
    ("maroon", 0x80_0000),
    ("navy", 0x00_0080),
    ("olive", 0x80_8000),
    ("orange", 0xff_a500),
    ("pink", 0xff_c0cb),
    ("purple", 0x80_0080),
    ("red", 0xff_0000),
    ("silver", 0xc0_c0c0),
    ("teal", 0x00_8080),
    ("white", 0xff_ffff),
    ("yellow", 0xff_ff00),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sorted() {
        assert!(COLOUR_TABLE.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_hex_forms() {
        assert_eq!(Colour::from_hex("#f00"), Some(Colour(0xff_0000)));
        assert_eq!(Colour::from_hex("123456"), Some(Colour(0x12_3456)));
        assert_eq!(Colour::from_hex("#12345"), None);
        assert_eq!(Colour::from_hex("#ggg"), None);
    }

    #[test]
    fn test_named_and_transparent() {
        assert_eq!(Colour::from_named("Navy"), Some(Colour(0x00_0080)));
        assert!(Colour::from_named("transparent").unwrap().is_transparent());
        assert_eq!(Colour::from_named("notacolour"), None);
    }

    #[test]
    fn test_rgb_function() {
        let args = vec![
            ComponentValue::Token(CSSToken::Number(255.0)),
            ComponentValue::Token(CSSToken::Comma),
            ComponentValue::Token(CSSToken::Percentage(50.0)),
            ComponentValue::Token(CSSToken::Comma),
            ComponentValue::Token(CSSToken::Number(300.0)),
        ];
        let value = ComponentValue::Function {
            name: "rgb".into(),
            args,
        };
        assert_eq!(Colour::parse(&value), Some(Colour(0xff_80ff)));
    }
}
