//! User agent stylesheet.
//!
//! [Appendix D. Default style sheet for HTML 4](https://www.w3.org/TR/CSS2/sample.html)
//!
//! Limited to the selectors and properties the resolver understands.

use std::sync::OnceLock;

use crate::parser::{Stylesheet, parse_stylesheet};

/// Default styles applied before any author stylesheet.
pub const UA_CSS: &str = r"
html, address, blockquote, body, center, dd, div, dl, dt, fieldset, form,
frame, frameset, h1, h2, h3, h4, h5, h6, noframes, ol, p, ul, menu, dir,
hr, pre, caption { display: block }
li { display: list-item }
head, script, style, title, meta, link, base, option, noscript, area, param,
map { display: none }
table { display: table }
tr { display: table-row }
thead { display: table-header-group }
tbody { display: table-row-group }
tfoot { display: table-footer-group }
td, th { display: table-cell; padding: 1px }
textarea { display: inline-block }

body { margin: 8px }
h1 { font-size: 2em; margin: 0.67em 0 }
h2 { font-size: 1.5em; margin: 0.75em 0 }
h3 { font-size: 1.17em; margin: 0.83em 0 }
h4, p, blockquote, ul, ol, dl, pre { margin: 1em 0 }
h5 { font-size: 0.83em; margin: 1.5em 0 }
h6 { font-size: 0.75em; margin: 1.67em 0 }
h1, h2, h3, h4, h5, h6, b, strong, th { font-weight: bold }
blockquote { margin-left: 40px; margin-right: 40px }
ul, ol, dir, menu { padding-left: 40px }
dd { margin-left: 40px }
i, cite, em, var, address { font-style: italic }
pre { white-space: pre }
nobr { white-space: nowrap }
big { font-size: larger }
small, sub, sup { font-size: smaller }
center, th { text-align: center }
a { color: #0000ee }
hr { border: 1px inset; margin: 0.5em 0 }
";

/// The parsed user agent stylesheet, parsed once per process.
pub fn ua_stylesheet() -> &'static Stylesheet {
    static SHEET: OnceLock<Stylesheet> = OnceLock::new();
    SHEET.get_or_init(|| parse_stylesheet(UA_CSS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ua_rules_all_parse() {
        // One rule per selector block above; a dropped block means an
        // unsupported selector slipped in.
        assert_eq!(ua_stylesheet().rules.len(), UA_CSS.matches('{').count());
        assert!(
            ua_stylesheet()
                .rules
                .iter()
                .all(|r| !r.declarations.is_empty())
        );
    }
}
