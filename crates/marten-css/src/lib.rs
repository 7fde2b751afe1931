//! CSS tokenizer, parser, selector matching and cascade for the Marten
//! layout core.
//!
//! # Scope
//!
//! - **Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//! - **Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing)):
//!   stylesheets, declaration lists, `!important`
//! - **Selectors** ([CSS 2.1 § 5](https://www.w3.org/TR/CSS2/selector.html)):
//!   type, universal, class, id, and the descendant combinator
//! - **Cascade** ([CSS 2.1 § 6](https://www.w3.org/TR/CSS2/cascade.html)):
//!   presentational hints, specificity ordering, inheritance
//! - **Computed styles**: a fully populated record per element
//!
//! # Not Implemented
//!
//! - Child, sibling and attribute selectors, pseudo-classes
//! - At-rules (skipped with a warning)

/// The cascade and whole-document style computation.
pub mod cascade;
/// Presentational attribute translation.
pub mod hints;
/// CSS parser.
pub mod parser;
/// Selector parsing and matching.
pub mod selector;
/// Computed style representation and property handlers.
pub mod style;
/// CSS tokenizer.
pub mod tokenizer;
/// User agent stylesheet.
pub mod ua_stylesheet;

pub use cascade::{StyleMap, StyleResolver, compute_styles, document_stylesheet};
pub use parser::{
    CSSParser, ComponentValue, Declaration, StyleRule, Stylesheet, parse_declarations,
    parse_stylesheet,
};
pub use selector::{CompoundSelector, Selector};
pub use style::ComputedStyle;
pub use tokenizer::{CSSToken, CSSTokenizer};
