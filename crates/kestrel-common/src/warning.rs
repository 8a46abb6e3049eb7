//! Parser warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the HTTP and HTML parsers to report input they tolerate rather
//! than reject.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about tolerated input (prints once per unique message).
///
/// # Example
/// ```
/// use kestrel_common::warning::warn_once;
///
/// warn_once("HTML Tokenizer", "unexpected '=' before attribute name");
/// ```
pub fn warn_once(component: &str, message: &str) {
    if first_occurrence(component, message) {
        eprintln!("{}", format!("[Kestrel {component}] ⚠ {message}").yellow());
    }
}

/// Record the warning; `true` if it had not been seen before.
fn first_occurrence(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key)
}

/// Whether `message` from `component` has been reported since the last
/// [`clear_warnings`].
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key))
}

/// Clear all recorded warnings (call when starting a new document).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_warning_is_suppressed() {
        let message = "duplicate suppression probe";
        warn_once("Test", message);
        assert!(has_warned("Test", message));
        assert!(!first_occurrence("Test", message));
    }

    #[test]
    fn test_distinct_components_are_reported_separately() {
        assert!(first_occurrence("Test A", "component separation probe"));
        assert!(first_occurrence("Test B", "component separation probe"));
    }
}
