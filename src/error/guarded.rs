//! Deliberately raised fatal failures
//!
//! A [`GuardedFatalFailure`] introduces fatality. Building one around a cause
//! that is already fatal hides the real origin, so construction checks the
//! cause with a debug assertion.

use thiserror::Error;

use super::{is_fatal, Failure, FatalKind};
use crate::assertion::{assert_debug_with, AssertionSink, PanicSink};

const FATAL_CAUSE_MESSAGE: &str = "GuardedFatalFailure must not wrap a failure that is already fatal";

/// A failure of kind [`FatalKind::Raised`], always classified fatal.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error(transparent)]
pub struct GuardedFatalFailure(Failure);

impl GuardedFatalFailure {
    /// Creates a fatal failure with no cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self(Failure::fatal(FatalKind::Raised, message))
    }

    /// Creates a fatal failure around an optional cause.
    ///
    /// In debug builds a fatal `cause` is reported to [`PanicSink`]. Release
    /// builds store the cause unchecked.
    pub fn with_cause(message: impl Into<String>, cause: Option<Failure>) -> Self {
        Self::with_cause_in(message, cause, &PanicSink)
    }

    /// Like [`with_cause`](Self::with_cause), reporting violations to `sink`.
    pub fn with_cause_in(
        message: impl Into<String>,
        cause: Option<Failure>,
        sink: &dyn AssertionSink,
    ) -> Self {
        match cause {
            None => Self::new(message),
            Some(cause) => {
                assert_debug_with(sink, || !is_fatal(&cause), FATAL_CAUSE_MESSAGE);
                Self(Failure::with_cause(
                    FatalKind::Raised.into(),
                    message,
                    cause,
                ))
            }
        }
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        self.0.message()
    }

    /// Returns the cause this failure was raised from, if any.
    pub fn cause(&self) -> Option<&Failure> {
        self.0.cause()
    }

    /// Borrows the underlying failure record.
    pub fn as_failure(&self) -> &Failure {
        &self.0
    }

    /// Converts into the underlying failure record.
    pub fn into_failure(self) -> Failure {
        self.0
    }
}

impl From<GuardedFatalFailure> for Failure {
    fn from(guarded: GuardedFatalFailure) -> Self {
        guarded.0
    }
}
