//! Fatal failure classification
//!
//! A failure is fatal when its effective kind, found by peeling every
//! boundary wrapper off the cause chain, is one of the fatal kinds. Classifying
//! the wrapper itself would always answer "not fatal".

use std::error::Error;

use super::{Failure, FailureKind, GuardedFatalFailure};

/// The verdict for a classified failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// The process must not continue; propagate or terminate.
    Fatal,
    /// Recoverable at the caller's discretion.
    Ordinary,
}

impl Severity {
    /// Returns true for [`Severity::Fatal`].
    pub fn is_fatal(&self) -> bool {
        matches!(self, Severity::Fatal)
    }
}

/// Follows causes through wrapper kinds to the innermost non-wrapper failure.
///
/// Stops at the first failure that is not a wrapper, or at a wrapper with no
/// cause. Returns `failure` itself when it is not a wrapper. Emits no events.
pub fn unwrap_failure(failure: &Failure) -> &Failure {
    let mut current = failure;
    while let (FailureKind::Wrapper, Some(cause)) = (current.kind(), current.cause()) {
        current = cause;
    }
    current
}

/// Returns true if the effective failure's kind is in the fatal kind set.
///
/// Only the kind participates: message text and cause presence do not.
pub fn is_fatal(failure: &Failure) -> bool {
    classify(failure).is_fatal()
}

/// Classifies `failure` into a [`Severity`].
pub fn classify(failure: &Failure) -> Severity {
    let effective = unwrap_failure(failure);
    match effective.kind() {
        FailureKind::Fatal(kind) => {
            tracing::debug!(kind = %kind, detail = effective.message(), "fatal failure");
            Severity::Fatal
        }
        FailureKind::Wrapper | FailureKind::Ordinary(_) => Severity::Ordinary,
    }
}

/// Classifies an arbitrary error.
///
/// [`Failure`] and [`GuardedFatalFailure`] values are classified as usual.
/// Any other error type is ordinary: the wrapper kind is the only one whose
/// cause is followed, and foreign errors are never wrappers.
pub fn is_fatal_error(err: &(dyn Error + 'static)) -> bool {
    if let Some(failure) = err.downcast_ref::<Failure>() {
        return is_fatal(failure);
    }
    if let Some(guarded) = err.downcast_ref::<GuardedFatalFailure>() {
        return is_fatal(guarded.as_failure());
    }
    false
}
