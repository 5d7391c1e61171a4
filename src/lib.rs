#![doc = include_str!("../README.md")]
//!
//! For an entry point to the library, check the docs of [`Sanitizers`] or [`clean`]
//!

#![forbid(rust_2018_idioms)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

#[doc(hidden)]
pub use ahash;

mod balancer;
mod css;
mod error;
mod lexer;
mod macros;
mod policy;
mod sanitizers;
mod sink;

pub use error::{SanitizeError, SinkError};
pub use policy::{AttrList, AttributePolicy, Builder, ElementAndAttributePolicies, ElementPolicy, Policy, PolicyFactory};
pub use sanitizers::Sanitizers;
pub use sink::{ChangeListener, ListeningSink, Sink, StringSink};

/// Clean provided HTML with the global [`Sanitizers::relaxed`] policy.
///
/// # Errors
///
/// See [`PolicyFactory::sanitize`] documentation.
#[inline]
pub fn clean(content: &str) -> Result<String, SanitizeError> {
    Sanitizers::relaxed().sanitize(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_uses_relaxed_policy() {
        let out = clean("<p>hi <script>alert(1)</script></p>").unwrap();
        assert_eq!(out, "<p>hi </p>");
    }
}
