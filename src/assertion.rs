//! Debug-only internal consistency checks.
//!
//! Checks in this module catch misuse of the library during development. They
//! are gated on `debug_assertions`: in release builds no sink is ever called
//! and lazy conditions are never evaluated.
//!
//! Violations are routed through an [`AssertionSink`] so that callers and tests
//! decide how loudly a violation surfaces. The default is [`PanicSink`].

use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// A programming error detected by a debug check.
///
/// This is the panic payload message used by [`PanicSink`]; it is not meant
/// to be handled as an ordinary failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("internal consistency violation: {message}")]
pub struct InternalConsistencyViolation {
    /// What went wrong.
    pub message: String,
}

impl InternalConsistencyViolation {
    /// Creates a new violation.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Receives internal consistency violations.
pub trait AssertionSink: Send + Sync {
    /// Called once per violated check.
    fn violation(&self, message: &str);
}

/// Logs the violation and then panics.
#[derive(Clone, Copy, Debug, Default)]
pub struct PanicSink;

impl AssertionSink for PanicSink {
    fn violation(&self, message: &str) {
        let violation = InternalConsistencyViolation::new(message);
        tracing::error!(%violation, "debug assertion failed");
        panic!("{}", violation);
    }
}

/// Logs the violation at error level and carries on.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl AssertionSink for LogSink {
    fn violation(&self, message: &str) {
        tracing::error!(
            violation = %InternalConsistencyViolation::new(message),
            "debug assertion failed"
        );
    }
}

/// Ignores violations.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl AssertionSink for NoopSink {
    fn violation(&self, _message: &str) {}
}

/// Collects violation messages for later inspection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every message recorded so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns true if no violation has been recorded.
    pub fn is_empty(&self) -> bool {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl AssertionSink for RecordingSink {
    fn violation(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

/// Reports `message` to `sink` when `condition` is false (debug builds only).
pub fn assert_debug(sink: &dyn AssertionSink, condition: bool, message: &str) {
    if cfg!(debug_assertions) && !condition {
        sink.violation(message);
    }
}

/// Like [`assert_debug`], but the condition is only evaluated in debug builds.
pub fn assert_debug_with<F>(sink: &dyn AssertionSink, condition: F, message: &str)
where
    F: FnOnce() -> bool,
{
    if cfg!(debug_assertions) && !condition() {
        sink.violation(message);
    }
}

/// Unconditionally reports `message` to `sink` (debug builds only).
pub fn fail_debug(sink: &dyn AssertionSink, message: &str) {
    if cfg!(debug_assertions) {
        sink.violation(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_violation_display() {
        let violation = InternalConsistencyViolation::new("bad state");
        assert_eq!(
            violation.to_string(),
            "internal consistency violation: bad state"
        );
    }

    #[test]
    fn test_passing_check_reports_nothing() {
        let sink = RecordingSink::new();
        assert_debug(&sink, true, "never");
        assert_debug_with(&sink, || true, "never");
        assert!(sink.is_empty());
    }

    #[test]
    fn test_noop_sink_swallows_violations() {
        assert_debug(&NoopSink, false, "ignored");
        fail_debug(&NoopSink, "ignored");
    }

    #[test]
    fn test_log_sink_does_not_panic() {
        assert_debug(&LogSink, false, "logged only");
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_failing_check_is_recorded() {
        let sink = RecordingSink::new();
        assert_debug(&sink, false, "first");
        assert_debug_with(&sink, || false, "second");
        fail_debug(&sink, "third");

        assert_eq!(sink.messages(), vec!["first", "second", "third"]);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "internal consistency violation: boom")]
    fn test_panic_sink_panics() {
        fail_debug(&PanicSink, "boom");
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn test_release_build_skips_checks() {
        let sink = RecordingSink::new();
        let evaluated = Cell::new(false);
        assert_debug(&sink, false, "first");
        assert_debug_with(
            &sink,
            || {
                evaluated.set(true);
                false
            },
            "second",
        );
        fail_debug(&PanicSink, "third");

        assert!(sink.is_empty());
        assert!(!evaluated.get());
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_lazy_condition_evaluated_in_debug() {
        let evaluated = Cell::new(false);
        assert_debug_with(
            &NoopSink,
            || {
                evaluated.set(true);
                true
            },
            "unused",
        );
        assert!(evaluated.get());
    }
}
