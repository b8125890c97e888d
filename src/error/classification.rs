//! Failure types for the fatal classifier
//!
//! A [`Failure`] is an immutable record of a kind, a message and an optional
//! cause. Kinds are a closed set: one of the fatal kinds, the single wrapper
//! kind, or an ordinary catch-all carrying a free-form label.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Process-level unrecoverable failure kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FatalKind {
    /// Allocation failed.
    OutOfMemory,
    /// The call stack was exhausted.
    StackExhausted,
    /// A null or otherwise invalid reference was dereferenced.
    InvalidDereference,
    /// A thread of execution was terminated abnormally.
    ThreadAborted,
    /// A fault raised below the managed boundary (FFI, foreign runtime).
    InteropFault,
    /// A security check was violated.
    SecurityViolation,
    /// A fatal condition raised deliberately through [`GuardedFatalFailure`].
    ///
    /// [`GuardedFatalFailure`]: super::GuardedFatalFailure
    Raised,
}

impl FatalKind {
    /// The complete fatal kind set.
    pub const ALL: [FatalKind; 7] = [
        FatalKind::OutOfMemory,
        FatalKind::StackExhausted,
        FatalKind::InvalidDereference,
        FatalKind::ThreadAborted,
        FatalKind::InteropFault,
        FatalKind::SecurityViolation,
        FatalKind::Raised,
    ];

    /// Stable snake_case name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            FatalKind::OutOfMemory => "out_of_memory",
            FatalKind::StackExhausted => "stack_exhausted",
            FatalKind::InvalidDereference => "invalid_dereference",
            FatalKind::ThreadAborted => "thread_aborted",
            FatalKind::InteropFault => "interop_fault",
            FatalKind::SecurityViolation => "security_violation",
            FatalKind::Raised => "raised",
        }
    }
}

impl std::fmt::Display for FatalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The discriminant of a [`Failure`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// One of the fatal kinds.
    Fatal(FatalKind),
    /// Carries a cause across an invocation boundary. Never fatal itself.
    Wrapper,
    /// Anything else. The label is informational only.
    Ordinary(String),
}

impl FailureKind {
    /// Returns true if this kind is a member of the fatal kind set.
    ///
    /// This looks at the kind alone; use [`is_fatal`](super::is_fatal) to
    /// classify a failure whose wrappers have not been peeled yet.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FailureKind::Fatal(_))
    }

    /// Returns true if this is the wrapper kind.
    pub fn is_wrapper(&self) -> bool {
        matches!(self, FailureKind::Wrapper)
    }
}

impl From<FatalKind> for FailureKind {
    fn from(kind: FatalKind) -> Self {
        FailureKind::Fatal(kind)
    }
}

/// An immutable error value with a kind, a message and an optional cause.
///
/// Cloning, comparing, formatting and dropping walk the cause chain with a
/// loop, so arbitrarily deep chains never recurse on the stack.
#[derive(Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct Failure {
    kind: FailureKind,
    message: String,
    #[source]
    #[serde(default)]
    cause: Option<Box<Failure>>,
}

impl Failure {
    /// Creates a failure without a cause.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a failure wrapping `cause`.
    pub fn with_cause(kind: FailureKind, message: impl Into<String>, cause: Failure) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates a fatal failure of the given kind.
    pub fn fatal(kind: FatalKind, message: impl Into<String>) -> Self {
        Self::new(FailureKind::Fatal(kind), message)
    }

    /// Creates an ordinary failure with a descriptive label.
    pub fn ordinary(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(FailureKind::Ordinary(label.into()), message)
    }

    /// Wraps `cause` in the boundary wrapper kind.
    pub fn wrap(message: impl Into<String>, cause: Failure) -> Self {
        Self::with_cause(FailureKind::Wrapper, message, cause)
    }

    /// Returns the kind of this failure.
    pub fn kind(&self) -> &FailureKind {
        &self.kind
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the direct cause, if any.
    pub fn cause(&self) -> Option<&Failure> {
        self.cause.as_deref()
    }

    /// Iterates over this failure followed by each cause in turn.
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }
}

impl Clone for Failure {
    fn clone(&self) -> Self {
        // Rebuild from the innermost cause outwards.
        let causes: Vec<&Failure> = self.chain().skip(1).collect();
        let mut cause: Option<Box<Failure>> = None;
        for link in causes.into_iter().rev() {
            cause = Some(Box::new(Failure {
                kind: link.kind.clone(),
                message: link.message.clone(),
                cause,
            }));
        }
        Failure {
            kind: self.kind.clone(),
            message: self.message.clone(),
            cause,
        }
    }
}

impl PartialEq for Failure {
    fn eq(&self, other: &Self) -> bool {
        let mut left = self.chain();
        let mut right = other.chain();
        loop {
            match (left.next(), right.next()) {
                (Some(a), Some(b)) => {
                    if a.kind != b.kind || a.message != b.message {
                        return false;
                    }
                }
                (None, None) => return true,
                _ => return false,
            }
        }
    }
}

impl std::fmt::Debug for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Failure")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("causes", &Causes(self))
            .finish()
    }
}

impl Drop for Failure {
    fn drop(&mut self) {
        let mut next = self.cause.take();
        while let Some(mut failure) = next {
            next = failure.cause.take();
        }
    }
}

/// Debug view of every cause below a failure, flattened into a list.
struct Causes<'a>(&'a Failure);

impl std::fmt::Debug for Causes<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.0.chain().skip(1).map(Link))
            .finish()
    }
}

/// Debug view of a single failure without its cause.
struct Link<'a>(&'a Failure);

impl std::fmt::Debug for Link<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Failure")
            .field("kind", &self.0.kind)
            .field("message", &self.0.message)
            .finish()
    }
}

/// Iterator returned by [`Failure::chain`].
#[derive(Clone, Debug)]
pub struct Chain<'a> {
    next: Option<&'a Failure>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Failure;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.cause();
        Some(current)
    }
}

impl From<std::io::Error> for Failure {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::OutOfMemory => {
                Failure::fatal(FatalKind::OutOfMemory, err.to_string())
            }
            kind => Failure::ordinary(io_kind_label(kind), err.to_string()),
        }
    }
}

fn io_kind_label(kind: std::io::ErrorKind) -> String {
    // ErrorKind's Debug output is CamelCase; labels are snake_case.
    let name = format!("{:?}", kind);
    let mut label = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                label.push('_');
            }
            label.push(ch.to_ascii_lowercase());
        } else {
            label.push(ch);
        }
    }
    label
}
