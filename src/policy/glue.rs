//! `Policy`: the stateful, single-use sanitizing pass over one document
//! (spec §4.5). Binds a [`PolicyFactory`] to a live [`Sink`] through a
//! [`Balancer`], driving the [`Lexer`] end to end.

use super::factory::PolicyFactory;
use super::styling;
use crate::balancer::Balancer;
use crate::error::{SanitizeError, SinkError};
use crate::lexer::{decode_entities, element_text_mode, is_void_element, ElementTextMode, Lexer, TokenKind};
use crate::sink::Sink;
use ahash::AHashSet;

/// One entry of the policy's own open-element stack, tracked separately
/// from the balancer's: the balancer only ever sees elements this layer
/// decided to emit, so its stack alone can't answer "what was the input
/// tag here", which the defer rule and close-tag matching both need.
struct StackEntry {
    input_name: String,
    /// `Some(adjusted_name)` if this entry was emitted to the balancer;
    /// `None` if it was suppressed (unknown element, rejected by policy,
    /// or skip-if-empty).
    adjusted_name: Option<String>,
}

/// A bound, stateful sanitizing pass. Build one with
/// [`PolicyFactory::apply`], drive it with [`Policy::run`], then recover
/// the sink with [`Policy::into_sink`].
pub struct Policy<'f, S: Sink> {
    factory: &'f PolicyFactory,
    balancer: Balancer<S>,
    open_stack: Vec<StackEntry>,
}

impl<'f, S: Sink> Policy<'f, S> {
    pub(crate) fn new(factory: &'f PolicyFactory, sink: S) -> Self {
        Self {
            factory,
            balancer: Balancer::new(sink),
            open_stack: Vec::new(),
        }
    }

    /// Consume the policy, returning the underlying sink. Call
    /// [`Self::run`] (which finishes the document) first.
    #[must_use]
    pub fn into_sink(self) -> S {
        self.balancer.into_sink()
    }

    /// Turn a [`SinkError`] into the outcome `run` should have: a
    /// non-fatal error is swallowed (the run continues with whatever the
    /// sink already produced); a fatal one aborts immediately.
    fn guard(result: Result<(), SinkError>) -> Result<(), SanitizeError> {
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.is_fatal() => Err(e.into()),
            Err(_) => Ok(()),
        }
    }

    /// Lex, decode, and sanitize `input` end to end, driving the bound
    /// sink. Calling this more than once on the same `Policy` re-parses
    /// into whatever was already open — callers should build one `Policy`
    /// per document, per [`PolicyFactory::sanitize`].
    ///
    /// # Errors
    ///
    /// Propagates a fatal error raised by the underlying [`Sink`]
    /// ([`SinkError::is_fatal`]); non-fatal sink errors are swallowed.
    pub fn run(&mut self, input: &str) -> Result<(), SanitizeError> {
        Self::guard(self.balancer.sink_mut().open_document())?;

        let mut lexer = Lexer::new(input);
        let mut pending_tag: Option<(String, bool)> = None;
        let mut pending_attrs: Vec<(String, String)> = Vec::new();
        let mut current_attr_name: Option<String> = None;

        while let Some(tok) = lexer.next() {
            match tok.kind {
                TokenKind::TagBegin => {
                    pending_tag = Some((tok.tag_name(input), tok.is_close_tag(input)));
                    pending_attrs.clear();
                    current_attr_name = None;
                }
                TokenKind::AttrName => {
                    if let Some(name) = current_attr_name.take() {
                        pending_attrs.push((name, String::new()));
                    }
                    current_attr_name = Some(tok.text(input).to_ascii_lowercase());
                }
                TokenKind::AttrValue => {
                    let decoded = decode_entities(tok.text(input));
                    if let Some(name) = current_attr_name.take() {
                        pending_attrs.push((name, decoded));
                    }
                }
                TokenKind::TagEnd => {
                    if let Some(name) = current_attr_name.take() {
                        pending_attrs.push((name, String::new()));
                    }
                    if let Some((name, is_close)) = pending_tag.take() {
                        if is_close {
                            self.close_tag(&name)?;
                        } else {
                            let attrs = std::mem::take(&mut pending_attrs);
                            self.open_tag(&name, attrs)?;
                        }
                    }
                }
                TokenKind::Text => {
                    let decoded = decode_entities(tok.text(input));
                    self.text(&decoded, false)?;
                }
                TokenKind::Unescaped => {
                    let raw = tok.text(input);
                    let mode = self
                        .open_stack
                        .last()
                        .map_or(ElementTextMode::Pcdata, |e| element_text_mode(&e.input_name));
                    let chunk = if mode == ElementTextMode::Rcdata {
                        decode_entities(raw)
                    } else {
                        raw.to_string()
                    };
                    self.text(&chunk, true)?;
                }
                TokenKind::Comment
                | TokenKind::Directive
                | TokenKind::QMarkMeta
                | TokenKind::ServerCode
                | TokenKind::QString
                | TokenKind::Ignorable => {}
            }
        }

        self.open_stack.clear();
        Self::guard(self.balancer.close_document())?;
        Self::guard(self.balancer.sink_mut().close_document())?;
        Ok(())
    }

    /// Apply the policy to one open-tag event (spec §4.5 steps 1-5):
    /// per-attribute filtering, de-duplication, the element policy, and
    /// skip-if-empty/styling's effect on whether the tag is emitted at
    /// all.
    fn open_tag(&mut self, name: &str, attrs: Vec<(String, String)>) -> Result<(), SanitizeError> {
        let is_void = is_void_element(name);

        let Some(bundle) = self.factory.element(name) else {
            self.balancer.sink_mut().discarded_tag(name);
            self.push_suppressed(name, is_void);
            return Ok(());
        };

        let mut filtered = Vec::with_capacity(attrs.len());
        for (attr_name, value) in attrs {
            let kept = bundle
                .attr_policies
                .get(&attr_name)
                .and_then(|policy| policy.apply(name, &attr_name, &value));
            match kept {
                Some(new_value) => filtered.push((attr_name, new_value)),
                None => self.balancer.sink_mut().discarded_attribute(name, &attr_name),
            }
        }

        let mut seen = AHashSet::default();
        filtered.retain(|(attr_name, _)| seen.insert(attr_name.clone()));

        let mut attrs = filtered;
        let Some(adjusted_name) = bundle.element_policy.apply(name, &mut attrs) else {
            self.balancer.sink_mut().discarded_tag(name);
            self.push_suppressed(name, is_void);
            return Ok(());
        };

        let font_attrs = if self.factory.allow_styling() {
            styling::extract_style(&mut attrs)
        } else {
            None
        };

        let should_emit = font_attrs.is_some() || !attrs.is_empty() || !bundle.skip_if_empty;
        if !should_emit {
            self.push_suppressed(name, is_void);
            return Ok(());
        }

        Self::guard(self.balancer.open_tag(&adjusted_name, &attrs))?;
        if !is_void {
            self.open_stack.push(StackEntry {
                input_name: name.to_string(),
                adjusted_name: Some(adjusted_name),
            });
        }

        // A void host never gets a close event to hang the synthesized
        // `<font>` child's close on (spec §4.9: "the balancer will close
        // the font tag when the host closes"), so there's nothing to
        // synthesize it against; drop it rather than leaking an unclosed
        // `<font>` that swallows everything up to the next coincidental
        // match or end of document.
        if !is_void {
            if let Some(font_attrs) = font_attrs {
                Self::guard(self.balancer.open_tag("font", &font_attrs))?;
                self.open_stack.push(StackEntry {
                    input_name: "font".to_string(),
                    adjusted_name: Some("font".to_string()),
                });
            }
        }

        Ok(())
    }

    fn push_suppressed(&mut self, name: &str, is_void: bool) {
        if !is_void {
            self.open_stack.push(StackEntry {
                input_name: name.to_string(),
                adjusted_name: None,
            });
        }
    }

    /// Close the nearest matching input tag, unwinding (and closing, for
    /// every emitted entry) everything nested inside it — mirrors
    /// [`Balancer::close_tag`] one level up, over the policy's own stack.
    fn close_tag(&mut self, name: &str) -> Result<(), SanitizeError> {
        let Some(pos) = self.open_stack.iter().rposition(|e| e.input_name == name) else {
            return Ok(());
        };

        while self.open_stack.len() > pos {
            let entry = self.open_stack.pop().expect("len > pos");
            if let Some(adjusted) = entry.adjusted_name {
                Self::guard(self.balancer.close_tag(&adjusted))?;
            }
        }
        Ok(())
    }

    /// Apply one text event (spec §4.5's defer rule). Ordinary (PCDATA)
    /// text always flows through, since suppressing a tag never needs to
    /// suppress the prose inside it. Raw (CDATA/RCDATA/PLAINTEXT) text is
    /// gated: it only survives, tag-stripped, when the nearest *emitted*
    /// ancestor is one of the caller's allowed text containers.
    fn text(&mut self, chunk: &str, is_raw: bool) -> Result<(), SanitizeError> {
        if chunk.is_empty() {
            return Ok(());
        }

        if !is_raw {
            return Self::guard(self.balancer.text(chunk));
        }

        let suppressed = matches!(self.open_stack.last(), Some(e) if e.adjusted_name.is_none());
        if !suppressed {
            return Self::guard(self.balancer.text(chunk));
        }

        let nearest_emitted = self
            .open_stack
            .iter()
            .rev()
            .find_map(|e| e.adjusted_name.as_deref());
        let allowed = nearest_emitted.is_some_and(|n| self.factory.allows_text_in(n));
        if !allowed {
            return Ok(());
        }

        let cleaned = strip_disallowed_tags(chunk, self.factory);
        Self::guard(self.balancer.text(&cleaned))
    }
}

/// The CDATA-in-text recovery scanner (spec §4.5): re-lexes a raw-text
/// chunk that leaked into an allowed text container and drops any tag
/// (with its balanced content) whose canonical name isn't in the policy.
/// Deliberately doesn't decode entities — this operates on the raw
/// characters of what was, from the lexer's point of view, inert content.
fn strip_disallowed_tags(chunk: &str, factory: &PolicyFactory) -> String {
    let mut lexer = Lexer::new(chunk);
    let mut out = String::new();
    let mut skip: Option<(String, usize)> = None;

    while let Some(tok) = lexer.next() {
        match tok.kind {
            TokenKind::TagBegin => {
                let name = tok.tag_name(chunk);
                let is_close = tok.is_close_tag(chunk);

                if let Some((skip_name, depth)) = skip.as_mut() {
                    if name == *skip_name {
                        if is_close {
                            if *depth == 0 {
                                skip = None;
                            } else {
                                *depth -= 1;
                            }
                        } else {
                            *depth += 1;
                        }
                    }
                    continue;
                }

                if factory.element(&name).is_none() {
                    if !is_close {
                        skip = Some((name, 0));
                    }
                } else {
                    out.push_str(tok.text(chunk));
                }
            }
            _ => {
                if skip.is_none() {
                    out.push_str(tok.text(chunk));
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{AttributePolicy, ElementPolicy};
    use crate::sink::StringSink;

    fn run(factory: &PolicyFactory, html: &str) -> String {
        let mut policy = factory.apply(StringSink::new());
        policy.run(html).unwrap();
        policy.into_sink().into_inner()
    }

    #[test]
    fn suppressed_tag_keeps_its_text() {
        let factory = PolicyFactory::builder().allow_element("b").build();
        let out = run(&factory, "<p>hello <b>there</b></p>");
        assert_eq!(out, "hello <b>there</b>");
    }

    #[test]
    fn skip_if_empty_drops_tag_but_keeps_text() {
        let factory = PolicyFactory::builder()
            .allow_element("a")
            .skip_if_empty("a", true)
            .allow_attribute("a", "href", AttributePolicy::url(["https"]))
            .build();
        let out = run(&factory, r#"<a href="javascript:alert(1)" onclick="x">click</a>"#);
        assert_eq!(out, "click");
    }

    #[test]
    fn unknown_tag_is_dropped_and_children_promoted() {
        let factory = PolicyFactory::builder().allow_element("b").build();
        let out = run(&factory, "<div><b>x</b></div>");
        assert_eq!(out, "<b>x</b>");
    }

    #[test]
    fn raw_text_gated_by_allowed_container() {
        let factory = PolicyFactory::builder()
            .allow_element("div")
            .allow_text_in("div")
            .build();
        let out = run(&factory, "<div><script>alert(1)</script></div>");
        assert_eq!(out, "<div>alert(1)</div>");
    }

    #[test]
    fn raw_text_dropped_without_allowed_container() {
        let factory = PolicyFactory::builder().allow_element("div").build();
        let out = run(&factory, "<div><script>alert(1)</script></div>");
        assert_eq!(out, "<div></div>");
    }

    #[test]
    fn strip_disallowed_tags_removes_balanced_content() {
        let factory = PolicyFactory::builder().allow_element("i").build();
        let cleaned = strip_disallowed_tags("a<b>bad<i>ok</i>bad</b>c", &factory);
        assert_eq!(cleaned, "a<i>ok</i>c");
    }

    #[test]
    fn rename_via_element_policy_is_reflected_in_close() {
        let factory = PolicyFactory::builder()
            .allow_element_with("strong", ElementPolicy::rename("b"))
            .build();
        let out = run(&factory, "<strong>hi</strong>");
        assert_eq!(out, "<b>hi</b>");
    }

    #[test]
    fn void_host_with_style_drops_synthesized_font_tag() {
        let factory = PolicyFactory::builder()
            .allow_element("img")
            .allow_attribute("img", "style", AttributePolicy::non_empty())
            .allow_styling()
            .build();
        let out = run(&factory, r#"<img style="color:red">hello"#);
        assert_eq!(out, "<img />hello");
    }
}
