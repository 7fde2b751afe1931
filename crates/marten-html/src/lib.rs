//! Markup reader for the Marten layout core.
//!
//! Markup parsing proper is outside the layout core; this crate is the thin
//! adapter that turns a document into a [`DomTree`]. It drives
//! `quick-xml`'s pull reader with end-name checking disabled and repairs
//! the handful of HTML habits an XML reader does not know about: void
//! elements, implied end tags for `p`, `li`, `option` and table parts, and
//! the common named character references.

mod entities;
mod parser;

pub use parser::{ParseError, dump_tree, parse};
