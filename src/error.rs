//! Error types for the sanitizer.
//!
//! Per the error taxonomy this crate follows, almost nothing a caller can
//! hit is a `Result`-level failure: malformed lexemes, disallowed elements
//! and attributes, rejected values, and unknown entities are all recovered
//! in-band (the lexer never fails, the policy layer just drops things). The
//! one programmer-visible failure class is a sink raising an error while
//! the sanitizer is draining events into it.

use std::fmt;

/// An error raised by a [`Sink`](crate::sink::Sink) implementation.
///
/// The default [`StringSink`](crate::sink::StringSink) never constructs
/// one of these; it exists for callers who plug in their own renderer (for
/// example one that writes into a fallible `io::Write` or a bounded
/// buffer) and need to signal that the run must stop.
#[derive(Debug)]
pub struct SinkError {
    message: String,
    fatal: bool,
}

impl SinkError {
    /// Build a new sink error. `fatal` controls whether the default
    /// top-level handling re-raises it (`true`) or swallows it and
    /// continues with whatever output was produced so far (`false`).
    #[must_use]
    pub fn new(message: impl Into<String>, fatal: bool) -> Self {
        Self {
            message: message.into(),
            fatal,
        }
    }

    /// Whether this error should abort the sanitize call.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SinkError {}

/// Top-level error returned by [`PolicyFactory::sanitize`](crate::policy::PolicyFactory::sanitize)
/// and [`Policy::run`](crate::policy::Policy::run).
#[derive(Debug, thiserror::Error)]
pub enum SanitizeError {
    /// The sink raised a fatal error while receiving events.
    #[error("sink returned a fatal error: {0}")]
    Sink(#[from] SinkError),
}
