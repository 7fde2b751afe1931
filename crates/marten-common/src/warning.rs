//! Diagnostics with colored terminal output.
//!
//! Malformed style values and unsupported markup are never errors for the
//! caller; they are reported here once per unique message and otherwise
//! ignored.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use owo_colors::OwoColorize;

/// Messages already printed, keyed by `[component] message`.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

fn warned() -> MutexGuard<'static, Option<HashSet<String>>> {
    // A panic while holding the lock leaves the set intact, so keep using it.
    WARNED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Report an ignored or unsupported input (prints once per unique message).
///
/// # Example
/// ```
/// marten_common::warning::warn_once("CSS", "ignoring unknown property 'zoom'");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = warned().get_or_insert_with(HashSet::new).insert(key);

    if should_print {
        eprintln!("{}", format!("[Marten {component}] ⚠ {message}").yellow());
    }
}

/// Number of distinct warnings recorded since the last [`clear_warnings`].
#[must_use]
pub fn warning_count() -> usize {
    warned().as_ref().map_or(0, HashSet::len)
}

/// Forget all recorded warnings (call when loading a new document).
pub fn clear_warnings() {
    if let Some(set) = warned().as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_warnings_recorded_once() {
        warn_once("TEST", "dedup probe 7f3a");
        warn_once("TEST", "dedup probe 7f3a");
        // Other tests may warn concurrently, so only check our own key.
        let set = warned();
        let recorded = set
            .as_ref()
            .map_or(0, |s| s.iter().filter(|k| k.ends_with("dedup probe 7f3a")).count());
        assert_eq!(recorded, 1);
        drop(set);
        assert!(warning_count() >= 1);
    }
}
