//! Failure model and fatal classification
//!
//! This module defines the failure record, the closed set of failure kinds,
//! the classifier that decides whether a failure is fatal after unwrapping
//! boundary wrappers, and the guarded failure used to raise fatality on purpose.

pub mod classification;
pub mod classifier;
pub mod guarded;

// Re-export main types for convenient access
pub use classification::{Chain, Failure, FailureKind, FatalKind};
pub use classifier::{classify, is_fatal, is_fatal_error, unwrap_failure, Severity};
pub use guarded::GuardedFatalFailure;
