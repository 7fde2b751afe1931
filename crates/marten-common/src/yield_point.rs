//! Cooperative yielding for long tree walks.
//!
//! Box building and layout are synchronous, single-threaded passes. An
//! embedding event loop that wants to service other work (input, network)
//! during a long pass injects a [`YieldPoint`]; the pass calls
//! [`YieldPoint::tick`] once per box visited and the callback fires every
//! `interval` ticks. The box tree is never touched by the callback.

use std::fmt;

/// A periodic callback invoked from inside build and layout passes.
pub struct YieldPoint<'a> {
    callback: Option<Box<dyn FnMut() + 'a>>,
    interval: u32,
    counter: u32,
}

impl<'a> YieldPoint<'a> {
    /// A yield point that never calls out.
    #[must_use]
    pub fn none() -> Self {
        Self {
            callback: None,
            interval: 0,
            counter: 0,
        }
    }

    /// Call `callback` once every `interval` ticks. An interval of zero is
    /// treated as one.
    pub fn every(interval: u32, callback: impl FnMut() + 'a) -> Self {
        Self {
            callback: Some(Box::new(callback)),
            interval: interval.max(1),
            counter: 0,
        }
    }

    /// Record one unit of work, yielding if the interval has elapsed.
    pub fn tick(&mut self) {
        let Some(callback) = self.callback.as_mut() else {
            return;
        };
        self.counter += 1;
        if self.counter >= self.interval {
            self.counter = 0;
            callback();
        }
    }
}

impl Default for YieldPoint<'_> {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for YieldPoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YieldPoint")
            .field("active", &self.callback.is_some())
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}
