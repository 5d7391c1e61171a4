//! Tag-balancing event receiver (spec §4.6).
//!
//! Given a stream of open/close/text events from any source, emits a
//! balanced stream: closes optional-end-tag elements on peer open, forbids
//! misnestings, and never lets a close tag escape past an unrelated open
//! ancestor.

use crate::error::SinkError;
use crate::lexer::is_void_element;
use crate::sink::Sink;

/// Equivalence classes of elements that implicitly close one another when a
/// sibling opens (e.g. a bare `<li>` closes a previous sibling `<li>`).
///
/// Returns `None` for elements with no optional-end-tag behavior.
fn partition(name: &str) -> Option<&'static str> {
    match name {
        "p" => Some("p"),
        "li" => Some("li"),
        "dd" | "dt" => Some("dd-dt"),
        "td" | "th" => Some("td-th"),
        "tr" => Some("tr"),
        "tbody" | "thead" | "tfoot" => Some("table-section"),
        "option" => Some("option"),
        "colgroup" => Some("colgroup"),
        "body" => Some("body"),
        "head" => Some("head"),
        _ => None,
    }
}

/// Run-time state of the balancer: an ordered sequence of canonical element
/// names. Invariants: the top of stack is the deepest currently open
/// element; no VOID element ever appears on it.
pub struct Balancer<S: Sink> {
    stack: Vec<String>,
    sink: S,
}

impl<S: Sink> Balancer<S> {
    /// Build a balancer writing to `sink`, with an empty stack.
    pub fn new(sink: S) -> Self {
        Self {
            stack: Vec::new(),
            sink,
        }
    }

    /// Borrow the underlying sink, e.g. to call [`Sink::discarded_tag`]
    /// from a layer above the balancer.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the balancer, returning the sink (after
    /// [`Self::close_document`] has drained any remaining open elements).
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Emit an open tag for `name` with the given `attrs`, closing any
    /// optional-end-tag peers first (spec §4.6 rule 1), then pushing and
    /// emitting it (unless `name` is void, in which case it is never
    /// pushed — rule 2).
    pub fn open_tag(&mut self, name: &str, attrs: &[(String, String)]) -> Result<(), SinkError> {
        if let Some(class) = partition(name) {
            while let Some(top) = self.stack.last() {
                if partition(top) == Some(class) {
                    let closed = self.stack.pop().unwrap();
                    self.sink.close_tag(&closed)?;
                } else {
                    break;
                }
            }
        }

        self.sink.open_tag(name, attrs)?;
        if !is_void_element(name) {
            self.stack.push(name.to_string());
        }
        Ok(())
    }

    /// Close the topmost stack entry matching `name`, closing every
    /// intervening element first (rule: "ignore if absent" — a close tag
    /// with no matching open is silently dropped rather than emitted).
    pub fn close_tag(&mut self, name: &str) -> Result<(), SinkError> {
        let Some(pos) = self.stack.iter().rposition(|n| n == name) else {
            return Ok(());
        };

        while self.stack.len() > pos {
            let closed = self.stack.pop().unwrap();
            self.sink.close_tag(&closed)?;
        }
        Ok(())
    }

    /// Emit text through the underlying sink, unmodified.
    pub fn text(&mut self, chunk: &str) -> Result<(), SinkError> {
        self.sink.text(chunk)
    }

    /// Close every remaining stacked element in LIFO order. Called once,
    /// at end of input.
    pub fn close_document(&mut self) -> Result<(), SinkError> {
        while let Some(closed) = self.stack.pop() {
            self.sink.close_tag(&closed)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::StringSink;

    fn drive(events: &[Event]) -> String {
        let mut balancer = Balancer::new(StringSink::default());
        for event in events {
            match event {
                Event::Open(name) => balancer.open_tag(name, &[]).unwrap(),
                Event::Close(name) => balancer.close_tag(name).unwrap(),
                Event::Text(t) => balancer.text(t).unwrap(),
            }
        }
        balancer.close_document().unwrap();
        balancer.into_sink().into_inner()
    }

    enum Event {
        Open(&'static str),
        Close(&'static str),
        Text(&'static str),
    }

    #[test]
    fn closes_optional_end_tag_peers() {
        let out = drive(&[
            Event::Open("p"),
            Event::Text("1"),
            Event::Open("p"),
            Event::Text("2"),
        ]);
        assert_eq!(out, "<p>1</p><p>2</p>");
    }

    #[test]
    fn misnesting_is_repaired() {
        let out = drive(&[
            Event::Open("b"),
            Event::Open("i"),
            Event::Text("hello"),
            Event::Close("b"),
            Event::Close("i"),
        ]);
        assert_eq!(out, "<b><i>hello</i></b>");
    }

    #[test]
    fn void_elements_never_pushed() {
        let out = drive(&[Event::Open("br"), Event::Text("x")]);
        assert_eq!(out, "<br />x");
    }

    #[test]
    fn stray_close_is_ignored() {
        let out = drive(&[Event::Close("div"), Event::Text("x")]);
        assert_eq!(out, "x");
    }
}
