//! State shared by the width and layout passes.

use std::fmt;

use marten_common::YieldPoint;

use crate::font::FontMetrics;

/// The text measurer and the cooperative yield point for one layout.
///
/// Layout keeps no global state; everything it consults besides the box
/// tree arrives through this context.
pub struct LayoutContext<'a> {
    /// Text measurement.
    pub metrics: &'a dyn FontMetrics,
    /// Called once per box laid out.
    pub yield_point: YieldPoint<'a>,
}

impl<'a> LayoutContext<'a> {
    /// A context that never yields.
    #[must_use]
    pub fn new(metrics: &'a dyn FontMetrics) -> Self {
        Self {
            metrics,
            yield_point: YieldPoint::none(),
        }
    }

    /// Replace the yield point.
    #[must_use]
    pub fn with_yield_point(mut self, yield_point: YieldPoint<'a>) -> Self {
        self.yield_point = yield_point;
        self
    }
}

impl fmt::Debug for LayoutContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutContext")
            .field("yield_point", &self.yield_point)
            .finish_non_exhaustive()
    }
}
