//! Presentational attributes.
//!
//! [§ 6.4.4 Precedence of non-CSS presentational hints](https://www.w3.org/TR/CSS2/cascade.html#preshint)
//!
//! "The UA may choose to honor presentational attributes in an HTML source
//! document. If so, these attributes are translated to the corresponding
//! CSS rules with specificity equal to 0, and are treated as if they were
//! inserted at the start of the author style sheet."

use std::fmt::Write as _;

use marten_dom::ElementData;

use crate::parser::{Declaration, parse_declarations};

/// Translate the presentational attributes of `element` into declarations.
#[must_use]
pub fn presentational_hints(element: &ElementData) -> Vec<Declaration> {
    let tag = element.tag_name.as_str();
    let mut css = String::new();

    if let Some(align) = element.attr("align") {
        let align = align.trim().to_ascii_lowercase();
        match (tag, align.as_str()) {
            ("img" | "table", side @ ("left" | "right")) => {
                let _ = write!(css, "float: {side};");
            }
            ("table", "center") => css.push_str("margin-left: auto; margin-right: auto;"),
            (_, a @ ("left" | "right" | "center" | "justify")) => {
                let _ = write!(css, "text-align: {a};");
            }
            _ => {}
        }
    }

    if let Some(colour) = element.attr("bgcolor").and_then(legacy_colour) {
        let _ = write!(css, "background-color: {colour};");
    }
    let text_colour = match tag {
        "body" => element.attr("text"),
        "font" => element.attr("color"),
        _ => None,
    };
    if let Some(colour) = text_colour.and_then(legacy_colour) {
        let _ = write!(css, "color: {colour};");
    }

    if matches!(tag, "table" | "td" | "th" | "img" | "hr" | "col")
        && let Some(width) = element.attr("width").and_then(dimension)
    {
        let _ = write!(css, "width: {width};");
    }
    if matches!(tag, "td" | "th" | "tr" | "img")
        && let Some(height) = element.attr("height").and_then(dimension)
    {
        let _ = write!(css, "height: {height};");
    }

    if matches!(tag, "td" | "th") && element.has_attr("nowrap") {
        css.push_str("white-space: nowrap;");
    }
    if matches!(tag, "table" | "img")
        && let Some(border) = element.attr("border")
        && let Ok(px) = border.trim().parse::<u32>()
    {
        let _ = write!(css, "border-width: {px}px;");
    }

    if css.is_empty() {
        Vec::new()
    } else {
        parse_declarations(&css)
    }
}

/// Attribute lengths: `"120"` is pixels, `"50%"` a percentage.
fn dimension(value: &str) -> Option<String> {
    let value = value.trim();
    if let Some(number) = value.strip_suffix('%') {
        let n: f32 = number.trim().parse().ok()?;
        return Some(format!("{n}%"));
    }
    let n: f32 = value.strip_suffix("px").unwrap_or(value).parse().ok()?;
    Some(format!("{n}px"))
}

/// Colour attributes accept bare hex digits as well as CSS colours.
fn legacy_colour(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if matches!(value.len(), 3 | 6) && value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Some(format!("#{value}"));
    }
    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(element: &ElementData) -> Vec<String> {
        presentational_hints(element)
            .into_iter()
            .map(|d| d.name)
            .collect()
    }

    #[test]
    fn test_cell_hints() {
        let td = ElementData::new("td")
            .with_attr("width", "50%")
            .with_attr("bgcolor", "ff0000")
            .with_attr("align", "center")
            .with_attr("nowrap", "");
        assert_eq!(
            names(&td),
            vec!["text-align", "background-color", "width", "white-space"]
        );
    }

    #[test]
    fn test_image_align_floats() {
        let img = ElementData::new("img").with_attr("align", "right");
        assert_eq!(names(&img), vec!["float"]);
    }

    #[test]
    fn test_width_ignored_on_paragraph() {
        let p = ElementData::new("p").with_attr("width", "100");
        assert!(presentational_hints(&p).is_empty());
    }

    #[test]
    fn test_dimension_forms() {
        assert_eq!(dimension(" 120 ").as_deref(), Some("120px"));
        assert_eq!(dimension("33%").as_deref(), Some("33%"));
        assert_eq!(dimension("wide"), None);
    }
}
