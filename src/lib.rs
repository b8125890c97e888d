//! Fatal Guard - fatal failure classification
//!
//! Decides whether a failure is fatal (the process must not continue) or
//! ordinary, after unwrapping boundary wrappers to the real cause. Also
//! provides a guarded fatal failure that refuses, in debug builds, to wrap a
//! cause that is already fatal.
//!
//! ```
//! use fatal_guard::error::{is_fatal, unwrap_failure, Failure, FatalKind};
//!
//! let oom = Failure::fatal(FatalKind::OutOfMemory, "allocation failed");
//! let wrapped = Failure::wrap("invocation failed", oom.clone());
//!
//! assert_eq!(unwrap_failure(&wrapped), &oom);
//! assert!(is_fatal(&wrapped));
//! ```

pub mod assertion;
pub mod codec;
pub mod config;
pub mod error;

pub use error::{
    classify, is_fatal, is_fatal_error, unwrap_failure, Failure, FailureKind, FatalKind,
    GuardedFatalFailure, Severity,
};
