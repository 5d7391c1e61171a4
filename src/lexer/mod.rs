//! The hand-rolled, attack-tolerant HTML lexer (spec §4.1).
//!
//! Converts an input string into a lazy, non-restartable sequence of
//! [`Token`]s. The lexer never fails: malformed input always maps to *some*
//! token sequence, recovering by emitting the longest reasonable token
//! rather than raising an error (spec §7, `MalformedLexeme`).

mod element_mode;
mod entity;
mod token;

pub use element_mode::{element_text_mode, is_void_element, ElementTextMode};
pub use entity::decode as decode_entities;
pub use token::{Token, TokenKind};

use std::borrow::Cow;

/// Elements inside which an `<!-- ... -->` escaping span can hide what
/// would otherwise look like the closing tag (spec §4.1 rule 5). Limited to
/// the CDATA-family elements a real browser would actually apply this quirk
/// to; RCDATA/PLAIN_TEXT elements don't get it.
fn honors_escaping_spans(mode: ElementTextMode) -> bool {
    matches!(mode, ElementTextMode::Cdata | ElementTextMode::CdataSometimes)
}

#[derive(Debug, Clone)]
enum State {
    /// Ordinary markup scanning: text, tags, comments, directives.
    Outside,
    /// Between a `TagBegin` and its `TagEnd`.
    InsideTag {
        /// True immediately after an `AttrName` whose value (`=...`) hasn't
        /// been consumed yet; the next token, if any, is that `AttrValue`.
        expect_value: bool,
    },
    /// Inside a CDATA/RCDATA/PLAIN_TEXT element's content.
    RawText {
        /// Canonical name of the close tag that ends this span (ignored for `plaintext`).
        close_name: String,
        /// Whether `<!-- ... -->` can hide a would-be closing tag.
        escaping_spans: bool,
        /// Runs to EOF; no closing tag is ever recognized.
        plaintext: bool,
    },
}

/// Produces a sequence of [`Token`]s from an input string.
///
/// Lexer, balancer, and policy instances are single-use per input (spec
/// §5); reusing one across overlapping calls is undefined.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    state: State,
    peeked: Option<Option<Token>>,
    /// Name/close-ness of the most recently emitted `TagBegin`, consulted
    /// when its matching `TagEnd` arrives to decide whether to enter
    /// [`State::RawText`].
    pending_tag: Option<(String, bool)>,
}

impl<'a> Lexer<'a> {
    /// Build a lexer over `input`, starting in outside-tag mode.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            state: State::Outside,
            peeked: None,
            pending_tag: None,
        }
    }

    /// Advance and return the next token, or `None` at EOF.
    pub fn next(&mut self) -> Option<Token> {
        if let Some(tok) = self.peeked.take() {
            return tok;
        }
        self.produce()
    }

    /// Return the next token without consuming it.
    pub fn peek(&mut self) -> Option<Token> {
        if self.peeked.is_none() {
            self.peeked = Some(self.produce());
        }
        self.peeked.clone().flatten()
    }

    /// True until EOF.
    pub fn has_next(&mut self) -> bool {
        self.peek().is_some()
    }

    /// The full input this lexer is scanning, for resolving token text.
    #[must_use]
    pub fn input(&self) -> &'a str {
        self.input
    }

    fn produce(&mut self) -> Option<Token> {
        match std::mem::replace(&mut self.state, State::Outside) {
            State::Outside => {
                if self.pos >= self.input.len() {
                    None
                } else {
                    self.produce_outside()
                }
            }
            // `InsideTag` synthesizes a closing token even past EOF (an
            // unterminated tag), so it does its own bounds check.
            State::InsideTag { expect_value } => self.produce_inside_tag(expect_value),
            State::RawText {
                close_name,
                escaping_spans,
                plaintext,
            } => {
                if self.pos >= self.input.len() {
                    None
                } else {
                    self.produce_raw_text(&close_name, escaping_spans, plaintext)
                }
            }
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    // ---- outside-tag mode -------------------------------------------------

    fn produce_outside(&mut self) -> Option<Token> {
        let start = self.pos;
        let bytes = self.input.as_bytes();

        if bytes[start] == b'<' {
            if self.rest().starts_with("<!--") {
                return Some(self.scan_comment());
            }
            if self.rest().starts_with("<?") {
                return Some(self.scan_qmark_meta());
            }
            if self.rest().starts_with("<%") {
                return Some(self.scan_server_code());
            }
            if self.rest().starts_with("<!") {
                return Some(self.scan_directive());
            }
            if is_tag_name_open(bytes, start) {
                return Some(self.scan_tag_begin());
            }
        }

        Some(self.scan_text())
    }

    fn scan_comment(&mut self) -> Token {
        let start = self.pos;
        let end = self.input[start + 4..]
            .find("-->")
            .map_or(self.input.len(), |i| start + 4 + i + 3);
        self.pos = end;
        self.state = State::Outside;
        Token::new(TokenKind::Comment, start, end)
    }

    fn scan_qmark_meta(&mut self) -> Token {
        let start = self.pos;
        let end = self.rest()[2..]
            .find('>')
            .map_or(self.input.len(), |i| start + 2 + i + 1);
        self.pos = end;
        self.state = State::Outside;
        Token::new(TokenKind::QMarkMeta, start, end)
    }

    fn scan_server_code(&mut self) -> Token {
        let start = self.pos;
        let end = self.input[start + 2..]
            .find("%>")
            .map_or(self.input.len(), |i| start + 2 + i + 2);
        self.pos = end;
        self.state = State::Outside;
        Token::new(TokenKind::ServerCode, start, end)
    }

    fn scan_directive(&mut self) -> Token {
        let start = self.pos;
        let end = self.rest()
            .find('>')
            .map_or(self.input.len(), |i| start + i + 1);
        self.pos = end;
        self.state = State::Outside;
        Token::new(TokenKind::Directive, start, end)
    }

    fn scan_tag_begin(&mut self) -> Token {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        let is_close = bytes.get(start + 1) == Some(&b'/');
        let name_start = start + if is_close { 2 } else { 1 };

        let mut end = name_start;
        for (i, c) in self.input[name_start..].char_indices() {
            if is_tag_name_char(c) {
                end = name_start + i + c.len_utf8();
            } else {
                break;
            }
        }

        let name = strip_nul(&self.input[name_start..end]).to_ascii_lowercase();
        self.pending_tag = Some((name, is_close));
        self.pos = end;
        self.state = State::InsideTag { expect_value: false };
        Token::new(TokenKind::TagBegin, start, end)
    }

    fn scan_text(&mut self) -> Token {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        // `<` is always a single UTF-8 byte that never occurs as a
        // continuation byte, so jumping straight to the next occurrence
        // (rather than stepping char by char) never lands mid-codepoint.
        let mut i = start;
        let end = loop {
            match memchr::memchr(b'<', &bytes[i..]) {
                Some(off) if is_recognized_construct(self.input, i + off) => break i + off,
                Some(off) => i += off + 1,
                None => break self.input.len(),
            }
        };

        self.pos = end;
        self.state = State::Outside;
        Token::new(TokenKind::Text, start, end)
    }

    // ---- inside-tag mode ----------------------------------------------

    fn produce_inside_tag(&mut self, expect_value: bool) -> Option<Token> {
        self.skip_inter_attr_noise();

        if self.pos >= self.input.len() {
            // Unterminated tag: synthesize a zero-width close so the caller
            // still sees a well-formed TagBegin/TagEnd pair.
            self.state = State::Outside;
            return Some(Token::new(TokenKind::TagEnd, self.pos, self.pos));
        }

        let bytes = self.input.as_bytes();
        if bytes[self.pos] == b'>' {
            let start = self.pos;
            self.pos += 1;
            self.enter_post_tag_state(false);
            return Some(Token::new(TokenKind::TagEnd, start, self.pos));
        }
        if bytes[self.pos] == b'/' && bytes.get(self.pos + 1) == Some(&b'>') {
            let start = self.pos;
            self.pos += 2;
            self.enter_post_tag_state(true);
            return Some(Token::new(TokenKind::TagEnd, start, self.pos));
        }

        if expect_value && bytes[self.pos] == b'=' {
            self.pos += 1;
            self.skip_ascii_whitespace();
            self.state = State::InsideTag { expect_value: false };
            return Some(self.scan_attr_value());
        }

        self.state = State::InsideTag { expect_value: false };
        Some(self.scan_attr_name())
    }

    /// Skip whitespace and "short-tag" separator slashes (spec §4.1 rule 6):
    /// a `/` not immediately followed by `>` is just a delimiter, not the
    /// start of self-closing syntax.
    fn skip_inter_attr_noise(&mut self) {
        loop {
            self.skip_ascii_whitespace();
            let bytes = self.input.as_bytes();
            if bytes.get(self.pos) == Some(&b'/') && bytes.get(self.pos + 1) != Some(&b'>') {
                self.pos += 1;
                continue;
            }
            break;
        }
    }

    fn skip_ascii_whitespace(&mut self) {
        let bytes = self.input.as_bytes();
        while matches!(bytes.get(self.pos), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn scan_attr_name(&mut self) -> Token {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        let mut i = start;
        while i < self.input.len() {
            let b = bytes[i];
            if b.is_ascii_whitespace() || b == b'=' || b == b'/' || b == b'>' {
                break;
            }
            i += 1;
        }
        self.pos = i;
        self.state = State::InsideTag { expect_value: true };
        Token::new(TokenKind::AttrName, start, i)
    }

    fn scan_attr_value(&mut self) -> Token {
        let bytes = self.input.as_bytes();
        if matches!(bytes.get(self.pos), Some(b'"' | b'\'')) {
            let quote = bytes[self.pos];
            self.pos += 1;
            let start = self.pos;
            let end = memchr::memchr(quote, &bytes[start..]).map_or(self.input.len(), |off| start + off);
            self.pos = if end < self.input.len() { end + 1 } else { end };
            return Token::new(TokenKind::AttrValue, start, end);
        }

        let start = self.pos;
        let mut i = start;
        while i < self.input.len() {
            let b = bytes[i];
            if b.is_ascii_whitespace() || b == b'>' {
                break;
            }
            i += 1;
        }
        self.pos = i;
        Token::new(TokenKind::AttrValue, start, i)
    }

    /// Decide the post-`TagEnd` state: raw-text mode for a non-void,
    /// non-PCDATA *open* tag, outside-tag mode otherwise.
    fn enter_post_tag_state(&mut self, self_closing: bool) {
        let Some((name, is_close)) = self.pending_tag.take() else {
            self.state = State::Outside;
            return;
        };

        if self_closing || is_close {
            self.state = State::Outside;
            return;
        }

        let mode = element_text_mode(&name);
        self.state = match mode {
            ElementTextMode::PlainText => State::RawText {
                close_name: name,
                escaping_spans: false,
                plaintext: true,
            },
            ElementTextMode::Cdata | ElementTextMode::CdataSometimes => State::RawText {
                close_name: name,
                escaping_spans: honors_escaping_spans(mode),
                plaintext: false,
            },
            ElementTextMode::Rcdata => State::RawText {
                close_name: name,
                escaping_spans: false,
                plaintext: false,
            },
            ElementTextMode::Pcdata | ElementTextMode::Void => State::Outside,
        };
    }

    // ---- raw-text mode --------------------------------------------------

    fn produce_raw_text(
        &mut self,
        close_name: &str,
        escaping_spans: bool,
        plaintext: bool,
    ) -> Option<Token> {
        let start = self.pos;

        if plaintext {
            self.pos = self.input.len();
            self.state = State::Outside;
            return Some(Token::new(TokenKind::Unescaped, start, self.pos));
        }

        let end = self.find_raw_text_end(close_name, escaping_spans);
        self.pos = end;
        self.state = State::Outside;

        if end == start {
            // No content before the close tag: fall straight through to
            // outside-tag scanning so the close `TagBegin` is emitted now
            // rather than an empty `Unescaped` token.
            return self.produce_outside();
        }
        Some(Token::new(TokenKind::Unescaped, start, end))
    }

    /// Find the byte offset where raw-text content ends (i.e. right before
    /// `</close_name` begins), honoring escaping spans if requested.
    fn find_raw_text_end(&self, close_name: &str, escaping_spans: bool) -> usize {
        let bytes = self.input.as_bytes();
        let mut i = self.pos;
        loop {
            let Some(off) = memchr::memchr(b'<', &bytes[i..]) else {
                return self.input.len();
            };
            i += off;

            if escaping_spans && self.input[i..].starts_with("<!--") {
                i = self.input[i + 4..]
                    .find("-->")
                    .map_or(self.input.len(), |off| i + 4 + off + 3);
                continue;
            }

            if self.matches_close_tag(i, close_name) {
                return i;
            }

            i += 1;
        }
    }

    fn matches_close_tag(&self, at: usize, name: &str) -> bool {
        let Some(rest) = self.input.get(at..) else {
            return false;
        };
        let Some(after_slash) = rest.strip_prefix("</") else {
            return false;
        };
        if after_slash.len() < name.len() || !after_slash.is_char_boundary(name.len()) {
            return false;
        }
        let (candidate, trailing) = after_slash.split_at(name.len());
        if !candidate.eq_ignore_ascii_case(name) {
            return false;
        }
        match trailing.chars().next() {
            None => true,
            Some(c) => c == '>' || c == '/' || c.is_whitespace(),
        }
    }
}

fn is_tag_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | ':' | '.' | '_')
}

fn is_tag_name_open(bytes: &[u8], at: usize) -> bool {
    match bytes.get(at + 1) {
        Some(b) if b.is_ascii_alphabetic() => true,
        Some(b'/') => matches!(bytes.get(at + 2), Some(b) if b.is_ascii_alphabetic()),
        _ => false,
    }
}

fn is_recognized_construct(input: &str, at: usize) -> bool {
    let rest = &input[at..];
    rest.starts_with("<!--")
        || rest.starts_with("<?")
        || rest.starts_with("<%")
        || rest.starts_with("<!")
        || is_tag_name_open(input.as_bytes(), at)
}

/// Drop NUL bytes from a tag/attribute name or value sequence (spec §4.1
/// rule 7). General text content is left untouched here; the sink layer is
/// responsible for escaping any NUL that survives into rendered text.
#[must_use]
pub fn strip_nul(s: &str) -> Cow<'_, str> {
    if s.contains('\0') {
        Cow::Owned(s.chars().filter(|&c| c != '\0').collect())
    } else {
        Cow::Borrowed(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str) -> Vec<(TokenKind, &str)> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        while let Some(tok) = lexer.next() {
            out.push((tok.kind, tok.text(input)));
        }
        out
    }

    #[test]
    fn simple_tag_and_text() {
        let toks = collect("<p>hi</p>");
        assert_eq!(
            toks,
            vec![
                (TokenKind::TagBegin, "<p"),
                (TokenKind::TagEnd, ">"),
                (TokenKind::Text, "hi"),
                (TokenKind::TagBegin, "</p"),
                (TokenKind::TagEnd, ">"),
            ]
        );
    }

    #[test]
    fn attributes() {
        let toks = collect(r#"<a href="x" target=_blank>"#);
        assert_eq!(
            toks,
            vec![
                (TokenKind::TagBegin, "<a"),
                (TokenKind::AttrName, "href"),
                (TokenKind::AttrValue, "x"),
                (TokenKind::AttrName, "target"),
                (TokenKind::AttrValue, "_blank"),
                (TokenKind::TagEnd, ">"),
            ]
        );
    }

    #[test]
    fn self_closing() {
        let toks = collect("<br/>");
        assert_eq!(
            toks,
            vec![(TokenKind::TagBegin, "<br"), (TokenKind::TagEnd, "/>")]
        );
    }

    #[test]
    fn script_is_raw_to_close_tag() {
        let toks = collect("<script>if (a < b) {}</script>");
        assert_eq!(
            toks,
            vec![
                (TokenKind::TagBegin, "<script"),
                (TokenKind::TagEnd, ">"),
                (TokenKind::Unescaped, "if (a < b) {}"),
                (TokenKind::TagBegin, "</script"),
                (TokenKind::TagEnd, ">"),
            ]
        );
    }

    #[test]
    fn short_tag_syntax_not_split() {
        let toks = collect("<p/b/>");
        assert_eq!(
            toks,
            vec![
                (TokenKind::TagBegin, "<p"),
                (TokenKind::AttrName, "b"),
                (TokenKind::TagEnd, "/>"),
            ]
        );
    }

    #[test]
    fn unterminated_comment_runs_to_eof() {
        let toks = collect("<!-- never closed");
        assert_eq!(toks, vec![(TokenKind::Comment, "<!-- never closed")]);
    }

    #[test]
    fn stray_lt_is_text() {
        let toks = collect("a < b");
        assert_eq!(toks, vec![(TokenKind::Text, "a < b")]);
    }

    #[test]
    fn plaintext_runs_to_eof() {
        let toks = collect("<plaintext>anything <b> goes </b>");
        assert_eq!(
            toks,
            vec![
                (TokenKind::TagBegin, "<plaintext"),
                (TokenKind::TagEnd, ">"),
                (TokenKind::Unescaped, "anything <b> goes </b>"),
            ]
        );
    }

    #[test]
    fn comment_hides_closing_tag_inside_style() {
        let toks = collect("<style><!-- </style> --></style>");
        assert_eq!(
            toks,
            vec![
                (TokenKind::TagBegin, "<style"),
                (TokenKind::TagEnd, ">"),
                (TokenKind::Unescaped, "<!-- </style> -->"),
                (TokenKind::TagBegin, "</style"),
                (TokenKind::TagEnd, ">"),
            ]
        );
    }

    #[test]
    fn unterminated_tag_synthesizes_end() {
        let toks = collect("<div a=\"1");
        assert_eq!(
            toks,
            vec![
                (TokenKind::TagBegin, "<div"),
                (TokenKind::AttrName, "a"),
                (TokenKind::AttrValue, "1"),
                (TokenKind::TagEnd, ""),
            ]
        );
    }
}
