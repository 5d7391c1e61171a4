//! The renderer sink (spec §6, "Renderer sink (output)").
//!
//! The core never produces a DOM; it drives a [`Sink`] with a stream of
//! `open_tag`/`close_tag`/`text` calls, bracketed by `open_document` and
//! `close_document`. The default [`StringSink`] renders that stream into an
//! HTML-escaped string, matching the teacher's `clean_text` escaping table.

use crate::error::SinkError;

/// Receives the balanced open/close/text event stream the core produces.
///
/// Implementors are expected to HTML-escape whatever they write out;
/// `attrs` is handed over as raw (already-sanitized) strings, not
/// pre-escaped, so the sink controls the final serialization.
///
/// `discarded_tag`/`discarded_attribute` are optional hooks a caller can
/// override to observe what the policy layer dropped (spec §6's "change
/// listener"); the default implementations do nothing.
pub trait Sink {
    /// Called once, before any other method.
    fn open_document(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Emit an open tag for the (already adjusted, canonical) element
    /// `name` with `attrs`, an alternating sequence of unique, lower-case
    /// `(name, value)` pairs.
    fn open_tag(&mut self, name: &str, attrs: &[(String, String)]) -> Result<(), SinkError>;

    /// Emit a close tag for `name`. Never called for a void element.
    fn close_tag(&mut self, name: &str) -> Result<(), SinkError>;

    /// Emit a run of text content.
    fn text(&mut self, chunk: &str) -> Result<(), SinkError>;

    /// Called once, after every other event, to close any elements still open.
    fn close_document(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Called when the policy layer drops an entire element (spec §7
    /// `DisallowedElement`). Default: ignored.
    fn discarded_tag(&mut self, _name: &str) {}

    /// Called when the policy layer drops a single attribute (spec §7
    /// `DisallowedAttribute`/`RejectedValue`). Default: ignored.
    fn discarded_attribute(&mut self, _tag: &str, _attr: &str) {}
}

/// HTML-escape a single chunk of text content.
///
/// Mirrors the teacher's `clean_text`: escapes the characters that matter
/// for breaking out of text/attribute context, plus a few extra (backtick,
/// `/`, `=`) that the teacher escapes defensively against quirky legacy
/// parsers that treat them as attribute delimiters in unquoted contexts.
fn escape_text(source: &str, out: &mut String) {
    out.reserve(source.len());
    for chr in source.chars() {
        let replacement = match chr {
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&quot;",
            '\'' => "&apos;",
            '`' => "&grave;",
            '/' => "&#47;",
            '&' => "&amp;",
            '=' => "&#61;",
            '\0' => "&#65533;",
            _ => {
                out.push(chr);
                continue;
            }
        };
        out.push_str(replacement);
    }
}

/// Escape a value for use inside a double-quoted attribute. Like
/// [`escape_text`] but doesn't bother escaping `'`/`` ` ``/`/` — those only
/// matter when the surrounding quote could be confused for them, and we
/// always emit attributes double-quoted.
fn escape_attr_value(source: &str, out: &mut String) {
    out.reserve(source.len());
    for chr in source.chars() {
        let replacement = match chr {
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&quot;",
            '&' => "&amp;",
            '\0' => "&#65533;",
            _ => {
                out.push(chr);
                continue;
            }
        };
        out.push_str(replacement);
    }
}

/// The default [`Sink`]: renders the event stream into a `String`.
///
/// This is what [`PolicyFactory::sanitize`](crate::policy::PolicyFactory::sanitize)
/// uses internally; callers who want a different output representation
/// (e.g. writing straight into a bounded buffer, or observing discarded
/// content) implement [`Sink`] themselves.
#[derive(Debug, Default)]
pub struct StringSink {
    buf: String,
    preserve_escaped: bool,
}

impl StringSink {
    /// Build an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Instead of silently dropping a disallowed tag (keeping only its
    /// content, the core's default), render it as HTML-escaped text
    /// (teacher's `BubbleBath::preserve_escaped`).
    #[must_use]
    pub fn with_preserve_escaped(mut self, preserve_escaped: bool) -> Self {
        self.preserve_escaped = preserve_escaped;
        self
    }

    /// Consume the sink, returning the accumulated output.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.buf
    }
}

impl Sink for StringSink {
    fn open_tag(&mut self, name: &str, attrs: &[(String, String)]) -> Result<(), SinkError> {
        self.buf.push('<');
        self.buf.push_str(name);
        for (attr_name, attr_value) in attrs {
            self.buf.push(' ');
            self.buf.push_str(attr_name);
            self.buf.push_str("=\"");
            escape_attr_value(attr_value, &mut self.buf);
            self.buf.push('"');
        }
        if crate::lexer::is_void_element(name) {
            self.buf.push_str(" />");
        } else {
            self.buf.push('>');
        }
        Ok(())
    }

    fn close_tag(&mut self, name: &str) -> Result<(), SinkError> {
        self.buf.push_str("</");
        self.buf.push_str(name);
        self.buf.push('>');
        Ok(())
    }

    fn text(&mut self, chunk: &str) -> Result<(), SinkError> {
        escape_text(chunk, &mut self.buf);
        Ok(())
    }

    fn discarded_tag(&mut self, name: &str) {
        if self.preserve_escaped {
            escape_text(&format!("<{name}>"), &mut self.buf);
        }
    }
}

/// A caller-installed observer of discarded content (spec §6 "Change
/// listener"), wrapped around an inner [`Sink`].
pub trait ChangeListener {
    /// An element was suppressed by the policy.
    fn discarded_tag(&mut self, name: &str);
    /// An attribute was removed by the policy.
    fn discarded_attribute(&mut self, tag: &str, attr: &str);
}

/// Adapts a [`Sink`] plus a [`ChangeListener`] into a single `Sink`,
/// forwarding rendering calls to the inner sink and discard notifications
/// to the listener.
pub struct ListeningSink<S, L> {
    inner: S,
    listener: L,
}

impl<S: Sink, L: ChangeListener> ListeningSink<S, L> {
    /// Wrap `inner` with `listener`.
    pub fn new(inner: S, listener: L) -> Self {
        Self { inner, listener }
    }

    /// Tear the wrapper back down into its parts.
    pub fn into_parts(self) -> (S, L) {
        (self.inner, self.listener)
    }
}

impl<S: Sink, L: ChangeListener> Sink for ListeningSink<S, L> {
    fn open_document(&mut self) -> Result<(), SinkError> {
        self.inner.open_document()
    }

    fn open_tag(&mut self, name: &str, attrs: &[(String, String)]) -> Result<(), SinkError> {
        self.inner.open_tag(name, attrs)
    }

    fn close_tag(&mut self, name: &str) -> Result<(), SinkError> {
        self.inner.close_tag(name)
    }

    fn text(&mut self, chunk: &str) -> Result<(), SinkError> {
        self.inner.text(chunk)
    }

    fn close_document(&mut self) -> Result<(), SinkError> {
        self.inner.close_document()
    }

    fn discarded_tag(&mut self, name: &str) {
        self.listener.discarded_tag(name);
    }

    fn discarded_attribute(&mut self, tag: &str, attr: &str) {
        self.listener.discarded_attribute(tag, attr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_text() {
        let mut sink = StringSink::new();
        sink.text("<script>").unwrap();
        assert_eq!(sink.into_inner(), "&lt;script&gt;");
    }

    #[test]
    fn renders_attrs_double_quoted_and_escaped() {
        let mut sink = StringSink::new();
        sink.open_tag(
            "a",
            &[("href".to_string(), "x\"y".to_string())],
        )
        .unwrap();
        assert_eq!(sink.into_inner(), r#"<a href="x&quot;y">"#);
    }

    #[test]
    fn void_elements_self_close() {
        let mut sink = StringSink::new();
        sink.open_tag("br", &[]).unwrap();
        assert_eq!(sink.into_inner(), "<br />");
    }

    #[test]
    fn preserve_escaped_renders_discarded_tag_as_text() {
        let mut sink = StringSink::new().with_preserve_escaped(true);
        sink.discarded_tag("script");
        assert_eq!(sink.into_inner(), "&lt;script&gt;");
    }

    #[test]
    fn discards_are_silent_by_default() {
        let mut sink = StringSink::new();
        sink.discarded_tag("script");
        assert_eq!(sink.into_inner(), "");
    }
}
