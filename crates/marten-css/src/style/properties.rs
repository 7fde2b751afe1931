//! Property handlers.
//!
//! Each supported property has an entry in a constant table sorted by
//! name. Applying a declaration is a binary search followed by a call to
//! the handler; a search miss or a handler rejecting the value leaves the
//! style untouched.

use std::str::FromStr;

use marten_common::warning::warn_once;

use super::colour::Colour;
use super::computed::{
    ClearType, ComputedStyle, DisplayType, FloatType, FontStyle, FontWeight, TextAlign,
    WhiteSpace,
};
use super::values::{Height, Length, LengthOrPercent, LineHeight, MAX_PX, Sides, Size};
use crate::parser::{ComponentValue, Declaration};
use crate::tokenizer::CSSToken;

/// Sets a property from its value; returns false for a malformed value.
type ApplyFn = fn(&mut ComputedStyle, &[ComponentValue], &ComputedStyle) -> bool;
/// Copies a property from the parent style for the `inherit` keyword.
type InheritFn = fn(&mut ComputedStyle, &ComputedStyle);

struct Property {
    name: &'static str,
    apply: ApplyFn,
    inherit: InheritFn,
}

/// All supported properties, sorted by name.
const PROPERTIES: &[Property] = &[
    Property {
        name: "background",
        apply: apply_background,
        inherit: |s, p| s.background_color = p.background_color,
    },
    Property {
        name: "background-color",
        apply: |s, v, _| set(&mut s.background_color, single(v).and_then(Colour::parse)),
        inherit: |s, p| s.background_color = p.background_color,
    },
    Property {
        name: "border",
        apply: apply_border,
        inherit: |s, p| s.border_width = p.border_width,
    },
    Property {
        name: "border-bottom-width",
        apply: |s, v, _| set(&mut s.border_width.bottom, single(v).and_then(border_width)),
        inherit: |s, p| s.border_width.bottom = p.border_width.bottom,
    },
    Property {
        name: "border-left-width",
        apply: |s, v, _| set(&mut s.border_width.left, single(v).and_then(border_width)),
        inherit: |s, p| s.border_width.left = p.border_width.left,
    },
    Property {
        name: "border-right-width",
        apply: |s, v, _| set(&mut s.border_width.right, single(v).and_then(border_width)),
        inherit: |s, p| s.border_width.right = p.border_width.right,
    },
    Property {
        name: "border-top-width",
        apply: |s, v, _| set(&mut s.border_width.top, single(v).and_then(border_width)),
        inherit: |s, p| s.border_width.top = p.border_width.top,
    },
    Property {
        name: "border-width",
        apply: |s, v, _| set(&mut s.border_width, shorthand(v, border_width)),
        inherit: |s, p| s.border_width = p.border_width,
    },
    Property {
        name: "clear",
        apply: |s, v, _| set(&mut s.clear, keyword::<ClearType>(v)),
        inherit: |s, p| s.clear = p.clear,
    },
    Property {
        name: "color",
        apply: |s, v, _| set(&mut s.color, single(v).and_then(Colour::parse)),
        inherit: |s, p| s.color = p.color,
    },
    Property {
        name: "display",
        apply: |s, v, _| set(&mut s.display, keyword::<DisplayType>(v)),
        inherit: |s, p| s.display = p.display,
    },
    Property {
        name: "float",
        apply: |s, v, _| set(&mut s.float, keyword::<FloatType>(v)),
        inherit: |s, p| s.float = p.float,
    },
    Property {
        name: "font-size",
        apply: |s, v, p| set(&mut s.font_size, single(v).and_then(|v| font_size(v, p.font_size))),
        inherit: |s, p| s.font_size = p.font_size,
    },
    Property {
        name: "font-style",
        apply: |s, v, _| set(&mut s.font_style, keyword::<FontStyle>(v)),
        inherit: |s, p| s.font_style = p.font_style,
    },
    Property {
        name: "font-weight",
        apply: |s, v, p| set(&mut s.font_weight, single(v).and_then(|v| font_weight(v, p.font_weight))),
        inherit: |s, p| s.font_weight = p.font_weight,
    },
    Property {
        name: "height",
        apply: |s, v, _| set(&mut s.height, single(v).and_then(height)),
        inherit: |s, p| s.height = p.height,
    },
    Property {
        name: "line-height",
        apply: |s, v, _| {
            let font_size = s.font_size;
            set(&mut s.line_height, single(v).and_then(|v| line_height(v, font_size)))
        },
        inherit: |s, p| s.line_height = p.line_height,
    },
    Property {
        name: "margin",
        apply: |s, v, _| set(&mut s.margin, shorthand(v, Size::parse)),
        inherit: |s, p| s.margin = p.margin,
    },
    Property {
        name: "margin-bottom",
        apply: |s, v, _| set(&mut s.margin.bottom, single(v).and_then(Size::parse)),
        inherit: |s, p| s.margin.bottom = p.margin.bottom,
    },
    Property {
        name: "margin-left",
        apply: |s, v, _| set(&mut s.margin.left, single(v).and_then(Size::parse)),
        inherit: |s, p| s.margin.left = p.margin.left,
    },
    Property {
        name: "margin-right",
        apply: |s, v, _| set(&mut s.margin.right, single(v).and_then(Size::parse)),
        inherit: |s, p| s.margin.right = p.margin.right,
    },
    Property {
        name: "margin-top",
        apply: |s, v, _| set(&mut s.margin.top, single(v).and_then(Size::parse)),
        inherit: |s, p| s.margin.top = p.margin.top,
    },
    Property {
        name: "padding",
        apply: |s, v, _| set(&mut s.padding, shorthand(v, padding)),
        inherit: |s, p| s.padding = p.padding,
    },
    Property {
        name: "padding-bottom",
        apply: |s, v, _| set(&mut s.padding.bottom, single(v).and_then(padding)),
        inherit: |s, p| s.padding.bottom = p.padding.bottom,
    },
    Property {
        name: "padding-left",
        apply: |s, v, _| set(&mut s.padding.left, single(v).and_then(padding)),
        inherit: |s, p| s.padding.left = p.padding.left,
    },
    Property {
        name: "padding-right",
        apply: |s, v, _| set(&mut s.padding.right, single(v).and_then(padding)),
        inherit: |s, p| s.padding.right = p.padding.right,
    },
    Property {
        name: "padding-top",
        apply: |s, v, _| set(&mut s.padding.top, single(v).and_then(padding)),
        inherit: |s, p| s.padding.top = p.padding.top,
    },
    Property {
        name: "text-align",
        apply: |s, v, _| set(&mut s.text_align, keyword::<TextAlign>(v)),
        inherit: |s, p| s.text_align = p.text_align,
    },
    Property {
        name: "text-indent",
        apply: |s, v, _| set(&mut s.text_indent, single(v).and_then(LengthOrPercent::parse)),
        inherit: |s, p| s.text_indent = p.text_indent,
    },
    Property {
        name: "white-space",
        apply: |s, v, _| set(&mut s.white_space, keyword::<WhiteSpace>(v)),
        inherit: |s, p| s.white_space = p.white_space,
    },
    Property {
        name: "width",
        apply: |s, v, _| set(&mut s.width, single(v).and_then(Size::parse)),
        inherit: |s, p| s.width = p.width,
    },
];

/// [§ 6.4 The cascade](https://www.w3.org/TR/CSS2/cascade.html#cascade)
///
/// Apply one declaration over `style`. `parent` supplies `inherit` values
/// and the base for relative font sizes.
pub fn apply_declaration(style: &mut ComputedStyle, decl: &Declaration, parent: &ComputedStyle) {
    let Ok(index) = PROPERTIES.binary_search_by(|p| p.name.cmp(decl.name.as_str())) else {
        warn_once("CSS", &format!("ignoring unsupported property '{}'", decl.name));
        return;
    };
    let property = &PROPERTIES[index];

    // [§ 6.2.1 The 'inherit' value](https://www.w3.org/TR/CSS2/cascade.html#value-def-inherit)
    if let [value] = decl.value.as_slice()
        && value
            .as_ident()
            .is_some_and(|s| s.eq_ignore_ascii_case("inherit"))
    {
        (property.inherit)(style, parent);
        return;
    }

    if !(property.apply)(style, &decl.value, parent) {
        let text: Vec<String> = decl.value.iter().map(describe).collect();
        warn_once(
            "CSS",
            &format!("ignoring invalid value '{}' for '{}'", text.join(" "), decl.name),
        );
    }
}

fn describe(value: &ComponentValue) -> String {
    match value {
        ComponentValue::Token(t) => t.to_string(),
        ComponentValue::Function { name, .. } => format!("{name}(...)"),
    }
}

/// Store `value` if it parsed.
fn set<T>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(v) => {
            *slot = v;
            true
        }
        None => false,
    }
}

/// The only component of a single-valued declaration.
fn single(values: &[ComponentValue]) -> Option<&ComponentValue> {
    match values {
        [v] => Some(v),
        _ => None,
    }
}

/// A keyword property parsed through its `FromStr` implementation.
fn keyword<T: FromStr>(values: &[ComponentValue]) -> Option<T> {
    single(values)?.as_ident()?.parse().ok()
}

/// One to four side values.
fn shorthand<T: Copy>(
    values: &[ComponentValue],
    parse: impl Fn(&ComponentValue) -> Option<T>,
) -> Option<Sides<T>> {
    let parsed: Vec<T> = values.iter().map(parse).collect::<Option<_>>()?;
    Sides::from_shorthand(&parsed)
}

/// "Negative values for padding properties are not allowed."
fn padding(value: &ComponentValue) -> Option<LengthOrPercent> {
    match LengthOrPercent::parse(value)? {
        LengthOrPercent::Length(l) if l.value < 0.0 => None,
        LengthOrPercent::Percent(p) if p < 0.0 => None,
        ok => Some(ok),
    }
}

/// [§ 8.5.1 Border width](https://www.w3.org/TR/CSS2/box.html#border-width-properties)
///
/// "thin, medium, thick ... The interpretation of the first three values
/// depends on the user agent."
fn border_width(value: &ComponentValue) -> Option<Length> {
    if let Some(word) = value.as_ident() {
        return match word.to_ascii_lowercase().as_str() {
            "thin" => Some(Length::px(1.0)),
            "medium" => Some(Length::px(3.0)),
            "thick" => Some(Length::px(5.0)),
            _ => None,
        };
    }
    Length::parse(value).filter(|l| l.value >= 0.0)
}

/// `border: <width> || <style> || <color>`; only the width is kept.
/// Without an explicit width the border is `medium`, or zero for the
/// `none` and `hidden` styles.
fn apply_border(style: &mut ComputedStyle, values: &[ComponentValue], _: &ComputedStyle) -> bool {
    if values.is_empty() {
        return false;
    }
    let width = values.iter().find_map(border_width).unwrap_or_else(|| {
        let hidden = values.iter().any(|v| {
            v.as_ident()
                .is_some_and(|s| s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("hidden"))
        });
        if hidden { Length::ZERO } else { Length::px(3.0) }
    });
    style.border_width = Sides::all(width);
    true
}

/// `background` shorthand: the first component that is a colour.
fn apply_background(
    style: &mut ComputedStyle,
    values: &[ComponentValue],
    _: &ComputedStyle,
) -> bool {
    set(&mut style.background_color, values.iter().find_map(Colour::parse))
}

/// [§ 10.5 Content height](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
fn height(value: &ComponentValue) -> Option<Height> {
    match value {
        ComponentValue::Token(CSSToken::Ident(s)) if s.eq_ignore_ascii_case("auto") => {
            Some(Height::Auto)
        }
        // "If the height of the containing block is not specified
        // explicitly, the value computes to 'auto'."
        ComponentValue::Token(CSSToken::Percentage(_)) => Some(Height::Auto),
        other => Length::parse(other)
            .filter(|l| l.value >= 0.0)
            .map(Height::Length),
    }
}

/// [§ 10.8.1](https://www.w3.org/TR/CSS2/visudet.html#propdef-line-height)
fn line_height(value: &ComponentValue, font_size: f32) -> Option<LineHeight> {
    match value {
        ComponentValue::Token(CSSToken::Ident(s)) if s.eq_ignore_ascii_case("normal") => {
            Some(LineHeight::Absolute(1.25))
        }
        ComponentValue::Token(CSSToken::Number(n)) if *n >= 0.0 => Some(LineHeight::Absolute(*n)),
        // "The computed value of the property is this percentage multiplied
        // by the element's computed font size."
        ComponentValue::Token(CSSToken::Percentage(p)) if *p >= 0.0 => {
            Some(LineHeight::Length(Length::px(p * font_size / 100.0)))
        }
        other => Length::parse(other)
            .filter(|l| l.value >= 0.0)
            .map(|l| LineHeight::Length(Length::px(l.to_px(font_size)))),
    }
}

/// [§ 15.7 Font size](https://www.w3.org/TR/CSS2/fonts.html#font-size-props)
///
/// Absolute keywords, sorted by name.
const FONT_SIZE_TABLE: &[(&str, f32)] = &[
    ("large", 18.0),
    ("medium", 16.0),
    ("small", 13.0),
    ("x-large", 24.0),
    ("x-small", 10.0),
    ("xx-large", 32.0),
    ("xx-small", 9.0),
];

/// "a scaling factor of 1.2 is suggested between adjacent indexes"
const FONT_SCALE: f32 = 1.2;

fn font_size(value: &ComponentValue, parent_size: f32) -> Option<f32> {
    if let Some(word) = value.as_ident() {
        let word = word.to_ascii_lowercase();
        return match word.as_str() {
            // "<relative-size>: interpreted relative to the table of font
            // sizes and the font size of the parent element."
            "larger" => Some((parent_size * FONT_SCALE).min(MAX_PX)),
            "smaller" => Some(parent_size / FONT_SCALE),
            _ => FONT_SIZE_TABLE
                .binary_search_by(|(n, _)| n.cmp(&word.as_str()))
                .ok()
                .map(|i| FONT_SIZE_TABLE[i].1),
        };
    }
    let px = match value {
        // "percentage values ... refer to the parent element's font size"
        ComponentValue::Token(CSSToken::Percentage(p)) => p * parent_size / 100.0,
        other => {
            // "the 'em' and 'ex' units refer to the font size of the parent
            // element" when used on font-size itself.
            Length::parse(other)?.to_px(parent_size)
        }
    };
    (px >= 0.0).then_some(px.min(MAX_PX))
}

/// [§ 15.6 Font boldness](https://www.w3.org/TR/CSS2/fonts.html#font-boldness)
fn font_weight(value: &ComponentValue, parent: FontWeight) -> Option<FontWeight> {
    match value {
        ComponentValue::Token(CSSToken::Ident(s)) => match s.to_ascii_lowercase().as_str() {
            "normal" => Some(400),
            "bold" => Some(700),
            "bolder" => Some((parent + 300).min(900)),
            "lighter" => Some(parent.saturating_sub(300).max(100)),
            _ => None,
        },
        ComponentValue::Token(CSSToken::Number(n))
            if (100.0..=900.0).contains(n) && n % 100.0 == 0.0 =>
        {
            Some(*n as FontWeight)
        }
        _ => None,
    }
}

/// Whether `name` is a property the resolver understands.
#[must_use]
pub fn is_supported(name: &str) -> bool {
    PROPERTIES
        .binary_search_by(|p| p.name.cmp(name))
        .is_ok()
}
