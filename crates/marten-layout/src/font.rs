//! Text measurement.
//!
//! Font loading and shaping belong to the embedder. Layout only asks how
//! wide a run is and where a run may be broken.

use marten_css::ComputedStyle;

/// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
///
/// "CSS assumes that every font has font metrics that specify a
/// characteristic height above the baseline and a depth below it."
///
/// Widths are in whole pixels for the font described by `style`.
pub trait FontMetrics {
    /// Advance width of `text`.
    fn text_width(&self, text: &str, style: &ComputedStyle) -> i32;

    /// Find where to break `text` so that the part before the break fits in
    /// `available` pixels.
    ///
    /// Returns `(offset, width)`: `offset` is `text.len()` when the whole
    /// run fits, otherwise the byte index of the last space whose prefix
    /// fits, or `0` when not even the first word fits. `width` is the width
    /// of `text[..offset]`.
    fn split_offset(&self, text: &str, style: &ComputedStyle, available: i32) -> (usize, i32) {
        let full = self.text_width(text, style);
        if full <= available {
            return (text.len(), full);
        }
        let mut best = (0, 0);
        for (index, _) in text.match_indices(' ') {
            let width = self.text_width(&text[..index], style);
            if width > available {
                break;
            }
            best = (index, width);
        }
        best
    }

    /// Width of one collapsible space.
    fn space_width(&self, style: &ComputedStyle) -> i32 {
        self.text_width(" ", style)
    }
}

/// Approximate font metrics using a fixed advance per character.
///
/// Without font data every glyph advances by half the font size, which is
/// also the `ex` unit used by the style resolver. Used when the embedder
/// has no fonts, and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateFontMetrics;

impl FontMetrics for ApproximateFontMetrics {
    fn text_width(&self, text: &str, style: &ComputedStyle) -> i32 {
        const CHAR_WIDTH_RATIO: f32 = 0.5;
        (text.chars().count() as f32 * style.font_size * CHAR_WIDTH_RATIO).ceil() as i32
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    #[test]
    fn test_approximate_width() {
        let style = ComputedStyle::default();
        assert_eq!(ApproximateFontMetrics.text_width("abcd", &style), 32);
        assert_eq!(ApproximateFontMetrics.space_width(&style), 8);
    }

    #[test]
    fn test_split_at_last_fitting_space() {
        let style = ComputedStyle::default();
        // "one two" is 56px, "one two three" is 104px.
        let (offset, width) = ApproximateFontMetrics.split_offset("one two three", &style, 60);
        assert_eq!(offset, 7);
        assert_eq!(width, 56);
    }

    #[test]
    fn test_split_nothing_fits() {
        let style = ComputedStyle::default();
        assert_eq!(
            ApproximateFontMetrics.split_offset("unbreakable", &style, 10),
            (0, 0)
        );
    }

    #[quickcheck]
    fn prop_split_offset_is_a_word_boundary(words: Vec<u8>, available: u16) -> bool {
        let text: String = words
            .iter()
            .map(|&w| if w % 4 == 0 { ' ' } else { char::from(b'a' + w % 26) })
            .collect();
        let style = ComputedStyle::default();
        let (offset, width) =
            ApproximateFontMetrics.split_offset(&text, &style, i32::from(available));
        let boundary = offset == 0 || offset == text.len() || text.as_bytes()[offset] == b' ';
        let fits = offset == 0 || width <= i32::from(available);
        boundary && fits
    }
}
