//! The lexical atom produced by the [`Lexer`](super::Lexer).

/// Label on a lexical token.
///
/// `TagBegin` covers both `<name` and `</name` — whether a given `TagBegin`
/// is an opening or closing tag, and what its canonical name is, is derived
/// from the slice it spans (see [`Token::is_close_tag`] /
/// [`Token::tag_name`]), not encoded as a separate variant. Keeping the
/// enum this small mirrors how the lexer itself only ever needs to branch
/// on "what kind of lexeme did I just see", with the semantic follow-up
/// (name, value, decoding) left to callers that actually need it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `<name` or `</name`, up to but not including the attribute list / `>`.
    TagBegin,
    /// The `>` or `/>` that ends a tag.
    TagEnd,
    /// An attribute name inside a tag.
    AttrName,
    /// An attribute value (quoted or bare), still entity-encoded.
    AttrValue,
    /// A run of ordinary text, still entity-encoded.
    Text,
    /// A run of raw text inside a CDATA/RCDATA/PLAIN_TEXT element, not entity-decoded at this layer.
    Unescaped,
    /// `<!-- ... -->`.
    Comment,
    /// `<! ... >` that isn't a comment (e.g. a bogus doctype-like directive).
    Directive,
    /// `<? ... ?>` or `<? ... >`.
    QMarkMeta,
    /// A quoted string lexed standalone (reserved for embedding contexts; unused by the core tag lexer itself).
    QString,
    /// Content the lexer recognized but that carries no semantic value (e.g. stray NULs already stripped).
    Ignorable,
    /// Server-side code spans (e.g. `<% ... %>`) passed through as opaque text.
    ServerCode,
}

/// A lexical atom: a `kind` plus a half-open `[start, end)` byte range into
/// the original input.
///
/// Ranges never overlap and are non-decreasing across a single lexer's
/// output, by construction of [`Lexer::next`](super::Lexer::next).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// What kind of lexeme this is.
    pub kind: TokenKind,
    /// Start byte offset into the input, inclusive.
    pub start: usize,
    /// End byte offset into the input, exclusive.
    pub end: usize,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { kind, start, end }
    }

    /// The raw slice this token spans.
    #[must_use]
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start..self.end]
    }

    /// For a `TagBegin` token, whether it opens (`<name`) or closes (`</name`) a tag.
    #[must_use]
    pub fn is_close_tag(&self, input: &str) -> bool {
        debug_assert_eq!(self.kind, TokenKind::TagBegin);
        self.text(input).as_bytes().get(1) == Some(&b'/')
    }

    /// For a `TagBegin` token, the canonical (ASCII-lowercased, NUL-stripped) tag name.
    #[must_use]
    pub fn tag_name(&self, input: &str) -> String {
        debug_assert_eq!(self.kind, TokenKind::TagBegin);
        let raw = self.text(input);
        let name = raw.strip_prefix("</").or_else(|| raw.strip_prefix('<')).unwrap_or(raw);
        super::strip_nul(name).to_ascii_lowercase()
    }
}
