//! Document pipeline for the Marten layout core.
//!
//! # Scope
//!
//! This crate ties the layout core together:
//! - **Document Loading** - read and parse markup
//! - **Style Computation** - user agent, `style` element and `style`
//!   attribute cascade
//! - **Box Tree** - built, normalized and laid out at a viewport width
//! - **Forms** - controls registered while building, submitted against the
//!   laid-out textareas
//!
//! # Not Yet Implemented
//!
//! - Network loading and external stylesheets
//! - Painting

pub use marten_css as css;
pub use marten_dom as dom;
pub use marten_form as form;
pub use marten_html as html;
pub use marten_layout as layout;

use std::fs;

use marten_common::YieldPoint;
use marten_common::warning::clear_warnings;
use marten_css::{ComputedStyle, StyleMap, Stylesheet, compute_styles, document_stylesheet};
use marten_dom::DomTree;
use marten_form::{ControlId, FormError, FormId, FormSet, Submission};
use marten_html::ParseError;
use marten_layout::{
    ApproximateFontMetrics, BoxDump, BoxTree, BoxTreeError, FontMetrics, LayoutContext,
    build_box_tree, dump_box_tree, layout_document, normalize,
};
use serde::Serialize;
use thiserror::Error;

/// Viewport width used when none is given.
pub const DEFAULT_VIEWPORT_WIDTH: i32 = 800;

/// Runtime settings for a layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Width of the initial containing block, in pixels.
    pub viewport_width: i32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
        }
    }
}

/// Error type for document loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read the file.
    #[error("failed to read '{path}': {source}")]
    File {
        /// The path given.
        path: String,
        /// Why reading failed.
        #[source]
        source: std::io::Error,
    },
    /// The markup could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The box tree broke its structural rules.
    #[error(transparent)]
    BoxTree(#[from] BoxTreeError),
    /// A form query named something that does not exist.
    #[error(transparent)]
    Form(#[from] FormError),
}

/// A fully loaded and laid-out document.
#[derive(Debug)]
pub struct LoadedDocument {
    /// Original markup.
    pub html_source: String,
    /// Source path, empty for strings.
    pub source_path: String,
    /// Parsed element tree.
    pub dom: DomTree,
    /// Author rules from `style` elements.
    pub stylesheet: Stylesheet,
    /// Computed style of every element.
    pub styles: StyleMap,
    /// Forms and controls found while building boxes.
    pub forms: FormSet,
    /// The box tree, laid out at `options.viewport_width`.
    pub boxes: BoxTree,
    /// Settings of the last layout pass.
    pub options: LayoutOptions,
}

/// One element's computed style, for dumps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledElement {
    /// Element index in the document tree.
    pub node: usize,
    /// Tag name.
    pub tag: String,
    /// Resolved style.
    pub style: ComputedStyle,
}

/// Load and lay out a document from a file path.
///
/// # Errors
/// [`LoadError::File`] when the file cannot be read, otherwise as for
/// [`parse_html_string`].
pub fn load_document(path: &str, options: LayoutOptions) -> Result<LoadedDocument, LoadError> {
    let html = fs::read_to_string(path).map_err(|source| LoadError::File {
        path: path.to_string(),
        source,
    })?;
    let mut doc = parse_html_string(&html, options)?;
    doc.source_path = path.to_string();
    Ok(doc)
}

/// Parse, style, build and lay out a document held in memory.
///
/// # Errors
/// [`LoadError::Parse`] for markup the parser rejects,
/// [`LoadError::BoxTree`] when box construction fails.
pub fn parse_html_string(html: &str, options: LayoutOptions) -> Result<LoadedDocument, LoadError> {
    // Warnings are reported once per document.
    clear_warnings();

    let dom = marten_html::parse(html)?;
    let stylesheet = document_stylesheet(&dom);
    let styles = compute_styles(&dom, &stylesheet);

    let mut forms = FormSet::new();
    let mut boxes = build_box_tree(&dom, &styles, &mut forms, &mut YieldPoint::none())?;
    let root = boxes.root();
    normalize(&mut boxes, root)?;

    let mut doc = LoadedDocument {
        html_source: html.to_string(),
        source_path: String::new(),
        dom,
        stylesheet,
        styles,
        forms,
        boxes,
        options,
    };
    doc.relayout(options.viewport_width)?;
    Ok(doc)
}

impl LoadedDocument {
    /// Lay the document out again at `viewport_width` with approximate
    /// font metrics.
    ///
    /// # Errors
    /// [`LoadError::BoxTree`] if layout finds a malformed tree.
    pub fn relayout(&mut self, viewport_width: i32) -> Result<(), LoadError> {
        self.relayout_with(viewport_width, &ApproximateFontMetrics, YieldPoint::none())
    }

    /// Lay the document out again with the embedder's font metrics and
    /// yield point.
    ///
    /// # Errors
    /// [`LoadError::BoxTree`] if layout finds a malformed tree.
    pub fn relayout_with<'a>(
        &mut self,
        viewport_width: i32,
        metrics: &'a dyn FontMetrics,
        yield_point: YieldPoint<'a>,
    ) -> Result<(), LoadError> {
        let mut ctx = LayoutContext::new(metrics).with_yield_point(yield_point);
        layout_document(&mut self.boxes, &mut ctx, viewport_width)?;
        self.options.viewport_width = viewport_width;
        Ok(())
    }

    /// Nested snapshot of the laid-out boxes.
    #[must_use]
    pub fn box_dump(&self) -> BoxDump {
        dump_box_tree(&self.boxes, self.boxes.root())
    }

    /// Computed styles of every element, in document order.
    #[must_use]
    pub fn style_dump(&self) -> Vec<StyledElement> {
        self.dom
            .descendants(self.dom.root())
            .filter_map(|id| {
                let element = self.dom.as_element(id)?;
                let style = self.styles.get(&id)?;
                Some(StyledElement {
                    node: id.0,
                    tag: element.tag_name.clone(),
                    style: style.clone(),
                })
            })
            .collect()
    }

    /// Submit `form`, optionally through the button `submitter`. Textarea
    /// values are taken line by line as the current layout wrapped them.
    ///
    /// # Errors
    /// [`LoadError::Form`] for an unknown form or a submitter from another
    /// form.
    pub fn submit(&self, form: FormId, submitter: Option<ControlId>) -> Result<Submission, LoadError> {
        Ok(self.forms.submit(form, submitter, &self.boxes)?)
    }

    /// Submit every form in document order.
    ///
    /// # Errors
    /// As for [`LoadedDocument::submit`].
    pub fn submit_all(&self) -> Result<Vec<Submission>, LoadError> {
        (0..self.forms.forms().len())
            .map(|index| self.submit(FormId(index), None))
            .collect()
    }

    /// The box tree snapshot as pretty-printed JSON.
    ///
    /// # Errors
    /// Serialization failures from `serde_json`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.box_dump())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_reported() {
        let err = load_document("/nonexistent/marten-test.html", LayoutOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::File { .. }));
        assert!(err.to_string().contains("marten-test.html"));
    }

    #[test]
    fn test_relayout_records_width() {
        let mut doc =
            parse_html_string("<html><body><p>hi</p></body></html>", LayoutOptions::default())
                .unwrap();
        assert_eq!(doc.boxes[doc.boxes.root()].width, DEFAULT_VIEWPORT_WIDTH);
        doc.relayout(320).unwrap();
        assert_eq!(doc.options.viewport_width, 320);
        assert_eq!(doc.boxes[doc.boxes.root()].width, 320);
    }
}
