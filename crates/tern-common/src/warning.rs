//! Engine warnings with de-duplication.
//!
//! Stylesheet parsing reports recoverable problems (unknown pseudo-classes,
//! skipped at-rules) here. Each distinct message is forwarded to the `log`
//! facade once; every occurrence is kept so hosts can surface them later.
//!
//! A [`WarningLog`] is an ordinary value owned by the host, so independent
//! stylesheets and trees living in one process never share warning state.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;

/// A single recorded warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// The engine component that raised the warning (e.g. `"selector"`).
    pub component: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.component, self.message)
    }
}

/// De-duplicating warning sink.
///
/// Interior mutability lets parsers hold a shared reference while recording.
/// The log is single-threaded, like the rest of the engine.
#[derive(Debug, Default)]
pub struct WarningLog {
    seen: RefCell<BTreeSet<String>>,
    entries: RefCell<Vec<Warning>>,
}

impl WarningLog {
    /// Create an empty warning log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning (emits through `log::warn!` once per unique message).
    ///
    /// Returns `true` if this was the first time the message was seen.
    ///
    /// # Example
    /// ```
    /// use tern_common::WarningLog;
    ///
    /// let log = WarningLog::new();
    /// assert!(log.warn_once("selector", "unknown pseudo-class ':hovr'"));
    /// assert!(!log.warn_once("selector", "unknown pseudo-class ':hovr'"));
    /// assert_eq!(log.len(), 2);
    /// ```
    #[must_use]
    pub fn warn_once(&self, component: &str, message: &str) -> bool {
        let warning = Warning {
            component: component.to_string(),
            message: message.to_string(),
        };
        let first = self.seen.borrow_mut().insert(warning.to_string());
        if first {
            log::warn!(target: "tern", "{warning}");
        }
        self.entries.borrow_mut().push(warning);
        first
    }

    /// All recorded warnings, in the order they were raised (duplicates included).
    #[must_use]
    pub fn warnings(&self) -> Vec<Warning> {
        self.entries.borrow().clone()
    }

    /// Unique warnings, in first-seen order.
    #[must_use]
    pub fn unique_warnings(&self) -> Vec<Warning> {
        let mut seen = BTreeSet::new();
        self.entries
            .borrow()
            .iter()
            .filter(|w| seen.insert(w.to_string()))
            .cloned()
            .collect()
    }

    /// Number of recorded warnings, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Forget all warnings (call before re-parsing a stylesheet).
    pub fn clear(&self) {
        self.seen.borrow_mut().clear();
        self.entries.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_are_recorded_but_reported_once() {
        let log = WarningLog::new();
        assert!(log.warn_once("css", "skipped @media"));
        assert!(!log.warn_once("css", "skipped @media"));
        assert!(log.warn_once("selector", "skipped @media"));

        assert_eq!(log.len(), 3);
        assert_eq!(log.unique_warnings().len(), 2);
        assert_eq!(log.warnings()[2].to_string(), "[selector] skipped @media");
    }

    #[test]
    fn test_clear_resets_dedup_state() {
        let log = WarningLog::new();
        let _ = log.warn_once("css", "a");
        log.clear();
        assert!(log.is_empty());
        assert!(log.warn_once("css", "a"));
    }

    #[test]
    fn test_independent_logs_do_not_share_state() {
        let first = WarningLog::new();
        let second = WarningLog::new();
        assert!(first.warn_once("css", "a"));
        assert!(second.warn_once("css", "a"));
    }
}
