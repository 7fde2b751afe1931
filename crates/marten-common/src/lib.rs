//! Common utilities for the Marten layout core.
//!
//! This crate provides shared infrastructure used by all components:
//! - **Warning System** - deduplicated, colored diagnostics for unsupported
//!   or malformed input
//! - **Yield Points** - cooperative yielding during long tree walks

pub mod warning;
pub mod yield_point;

pub use yield_point::YieldPoint;
