//! CSS tokenizer and property-group splitter (spec §4.3).
//!
//! Tokenizes a `style`-attribute value into the token grammar the schema
//! understands, then splits the token stream into `name ':' value* (';'|EOF|'}')`
//! runs for the property sanitizer to walk.

/// Label on a CSS token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssTokenKind {
    /// `-?` + nmstart + nmchar*, not immediately followed by `(`.
    Ident,
    /// An ident immediately followed by `(` — e.g. `rgb(`, `url(` is special-cased into [`CssTokenKind::UrlToken`] instead.
    FunctionStart,
    /// `#` + name.
    Hash,
    /// A number with an optional unit/ident suffix (`10px`, `50%`, `1.5em`, `-3`).
    Quantity,
    /// A single- or double-quoted string, `\…`-escaped.
    String,
    /// `url(` ws string-or-urlchars ws `)`, lexed as a single token.
    UrlToken,
    /// Punctuation: `{ } ( ) [ ] , : ; / + > ~= |= <!-- -->` and any otherwise-unrecognized character.
    Punctuation,
    /// A run of whitespace.
    Whitespace,
    /// `/* ... */`.
    Comment,
}

/// A CSS lexical token: `kind` plus the half-open byte range it spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CssToken {
    /// What kind of token this is.
    pub kind: CssTokenKind,
    /// Start byte offset, inclusive.
    pub start: usize,
    /// End byte offset, exclusive.
    pub end: usize,
}

impl CssToken {
    fn new(kind: CssTokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    /// The raw slice this token spans.
    #[must_use]
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start..self.end]
    }
}

fn is_nmstart(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_nmchar(c: char) -> bool {
    is_nmstart(c) || c.is_ascii_digit() || c == '-'
}

/// Tokenize a CSS property-value string (the contents of a `style`
/// attribute) into the grammar described in §4.3.
#[must_use]
pub fn tokenize(input: &str) -> Vec<CssToken> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            let mut end = start;
            while let Some(&(i, ch)) = chars.peek() {
                if !ch.is_whitespace() {
                    break;
                }
                end = i + ch.len_utf8();
                chars.next();
            }
            tokens.push(CssToken::new(CssTokenKind::Whitespace, start, end));
            continue;
        }

        if c == '/' && bytes.get(start + 1) == Some(&b'*') {
            let end = input[start + 2..]
                .find("*/")
                .map_or(input.len(), |i| start + 2 + i + 2);
            skip_to(&mut chars, end);
            tokens.push(CssToken::new(CssTokenKind::Comment, start, end));
            continue;
        }

        if input[start..].starts_with("<!--") {
            skip_to(&mut chars, start + 4);
            tokens.push(CssToken::new(CssTokenKind::Punctuation, start, start + 4));
            continue;
        }
        if input[start..].starts_with("-->") {
            skip_to(&mut chars, start + 3);
            tokens.push(CssToken::new(CssTokenKind::Punctuation, start, start + 3));
            continue;
        }
        if input[start..].starts_with("~=") || input[start..].starts_with("|=") {
            skip_to(&mut chars, start + 2);
            tokens.push(CssToken::new(CssTokenKind::Punctuation, start, start + 2));
            continue;
        }

        if c == '"' || c == '\'' {
            let end = scan_string(input, start);
            skip_to(&mut chars, end);
            tokens.push(CssToken::new(CssTokenKind::String, start, end));
            continue;
        }

        if c == '#' {
            chars.next();
            let mut end = start + 1;
            while let Some(&(i, ch)) = chars.peek() {
                if !is_nmchar(ch) {
                    break;
                }
                end = i + ch.len_utf8();
                chars.next();
            }
            tokens.push(CssToken::new(CssTokenKind::Hash, start, end));
            continue;
        }

        if c.is_ascii_digit()
            || ((c == '+' || c == '-' || c == '.')
                && matches!(bytes.get(start + 1), Some(b) if b.is_ascii_digit()))
        {
            let end = scan_quantity(input, start);
            skip_to(&mut chars, end);
            tokens.push(CssToken::new(CssTokenKind::Quantity, start, end));
            continue;
        }

        if is_nmstart(c) || c == '-' {
            let mut end = start + c.len_utf8();
            chars.next();
            while let Some(&(i, ch)) = chars.peek() {
                if !is_nmchar(ch) {
                    break;
                }
                end = i + ch.len_utf8();
                chars.next();
            }
            let name = &input[start..end];
            if bytes.get(end) == Some(&b'(') {
                if name.eq_ignore_ascii_case("url") {
                    let url_end = scan_url_token(input, end + 1);
                    skip_to(&mut chars, url_end);
                    tokens.push(CssToken::new(CssTokenKind::UrlToken, start, url_end));
                } else {
                    skip_to(&mut chars, end + 1);
                    tokens.push(CssToken::new(CssTokenKind::FunctionStart, start, end + 1));
                }
            } else {
                tokens.push(CssToken::new(CssTokenKind::Ident, start, end));
            }
            continue;
        }

        // Anything else (single-char punctuation, or an otherwise
        // unrecognized byte) is emitted as one punctuation token; the
        // tokenizer never fails.
        let end = start + c.len_utf8();
        chars.next();
        tokens.push(CssToken::new(CssTokenKind::Punctuation, start, end));
    }

    tokens
}

fn skip_to(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>, byte_pos: usize) {
    while let Some(&(i, _)) = chars.peek() {
        if i >= byte_pos {
            break;
        }
        chars.next();
    }
}

fn scan_string(input: &str, start: usize) -> usize {
    let quote = input.as_bytes()[start];
    let mut i = start + 1;
    let bytes = input.as_bytes();
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    input.len()
}

fn scan_quantity(input: &str, start: usize) -> usize {
    let bytes = input.as_bytes();
    let mut i = start;
    if matches!(bytes.get(i), Some(b'+' | b'-')) {
        i += 1;
    }
    while matches!(bytes.get(i), Some(b) if b.is_ascii_digit()) {
        i += 1;
    }
    if bytes.get(i) == Some(&b'.') && matches!(bytes.get(i + 1), Some(b) if b.is_ascii_digit()) {
        i += 1;
        while matches!(bytes.get(i), Some(b) if b.is_ascii_digit()) {
            i += 1;
        }
    }
    // optional unit/ident suffix (px, %, em, ...)
    let mut chars = input[i..].char_indices();
    if let Some((_, c)) = chars.next() {
        if c == '%' {
            return i + 1;
        }
        if is_nmstart(c) {
            let mut end = i + c.len_utf8();
            for (off, ch) in chars {
                if !is_nmchar(ch) {
                    break;
                }
                end = i + off + ch.len_utf8();
            }
            return end;
        }
    }
    i
}

fn scan_url_token(input: &str, mut i: usize) -> usize {
    let bytes = input.as_bytes();
    while matches!(bytes.get(i), Some(b) if b.is_ascii_whitespace()) {
        i += 1;
    }
    if matches!(bytes.get(i), Some(b'"' | b'\'')) {
        i = scan_string(input, i);
    } else {
        while i < bytes.len() && bytes[i] != b')' {
            i += 1;
        }
    }
    while matches!(bytes.get(i), Some(b) if b.is_ascii_whitespace()) {
        i += 1;
    }
    if bytes.get(i) == Some(&b')') {
        i += 1;
    }
    i
}

/// Decode the *content* of a token — string quotes and `\hhhh` escapes are
/// stripped/decoded; invalid hex escape sequences map to U+FFFD. Any other
/// token kind decodes to its literal text.
#[must_use]
pub fn css_content(token: &CssToken, input: &str) -> String {
    let raw = token.text(input);
    match token.kind {
        CssTokenKind::String => decode_css_escapes(strip_quotes(raw)),
        CssTokenKind::Ident | CssTokenKind::Hash => decode_css_escapes(raw),
        CssTokenKind::FunctionStart => {
            decode_css_escapes(raw.strip_suffix('(').unwrap_or(raw))
        }
        CssTokenKind::UrlToken => {
            let after_paren = raw.find('(').map_or(raw, |idx| &raw[idx + 1..]);
            let inner = after_paren.trim_end_matches(')').trim();
            decode_css_escapes(strip_quotes(inner))
        }
        _ => raw.to_string(),
    }
}

fn strip_quotes(s: &str) -> &str {
    if s.len() >= 2 {
        let bytes = s.as_bytes();
        if (bytes[0] == b'"' || bytes[0] == b'\'') && bytes[bytes.len() - 1] == bytes[0] {
            return &s[1..s.len() - 1];
        }
    }
    s
}

fn decode_css_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(&next) = chars.peek() else {
            break;
        };
        if next.is_ascii_hexdigit() {
            let mut hex = String::new();
            while hex.len() < 6 {
                match chars.peek() {
                    Some(h) if h.is_ascii_hexdigit() => {
                        hex.push(*h);
                        chars.next();
                    }
                    _ => break,
                }
            }
            // a single optional whitespace terminator is consumed per the CSS escape grammar
            if matches!(chars.peek(), Some(c) if c.is_whitespace()) {
                chars.next();
            }
            let code = u32::from_str_radix(&hex, 16).unwrap_or(0x110000);
            out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
        } else {
            out.push(next);
            chars.next();
        }
    }
    out
}

/// One `name: value` run produced by the property-group driver.
#[derive(Debug, Clone)]
pub struct PropertyRun {
    /// The lower-cased property name.
    pub name: String,
    /// The value tokens, excluding leading/trailing whitespace/comment noise.
    pub value: Vec<CssToken>,
}

/// Split a token stream into `ident ':' value* (';'|EOF|'}')` runs.
///
/// Anything that doesn't match this shape (stray punctuation, at-rules,
/// braces) is skipped over rather than causing a failure, matching the
/// forward-compatible parsing rule CSS itself specifies for style-attribute
/// content: an invalid token never terminates the whole declaration list,
/// it's just skipped looking for the next plausible declaration start.
#[must_use]
pub fn split_properties(input: &str, tokens: &[CssToken]) -> Vec<PropertyRun> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if matches!(
            tokens[i].kind,
            CssTokenKind::Whitespace | CssTokenKind::Comment
        ) {
            i += 1;
            continue;
        }

        if tokens[i].kind != CssTokenKind::Ident {
            if tokens[i].kind == CssTokenKind::Punctuation && tokens[i].text(input) == "{" {
                i = skip_block(input, tokens, i);
                continue;
            }
            if tokens[i].kind == CssTokenKind::Punctuation && tokens[i].text(input) == "@" {
                i = skip_at_rule(input, tokens, i);
                continue;
            }
            i += 1;
            continue;
        }

        let name = tokens[i].text(input).to_ascii_lowercase();
        let mut j = i + 1;
        while j < tokens.len()
            && matches!(
                tokens[j].kind,
                CssTokenKind::Whitespace | CssTokenKind::Comment
            )
        {
            j += 1;
        }

        if j >= tokens.len() || tokens[j].kind != CssTokenKind::Punctuation || tokens[j].text(input) != ":" {
            i += 1;
            continue;
        }
        j += 1;

        let mut value = Vec::new();
        let mut depth = 0i32;
        while j < tokens.len() {
            let t = &tokens[j];
            if t.kind == CssTokenKind::Punctuation {
                let text = t.text(input);
                if text == "(" {
                    depth += 1;
                } else if text == ")" {
                    depth -= 1;
                } else if depth <= 0 && (text == ";" || text == "}") {
                    break;
                }
            }
            if t.kind == CssTokenKind::FunctionStart {
                depth += 1;
            }
            value.push(*t);
            j += 1;
        }

        let had_semicolon = j < tokens.len() && tokens[j].text(input) == ";";
        if had_semicolon {
            j += 1;
        }

        // trim trailing whitespace/comment from the captured value
        while matches!(
            value.last(),
            Some(t) if matches!(t.kind, CssTokenKind::Whitespace | CssTokenKind::Comment)
        ) {
            value.pop();
        }

        runs.push(PropertyRun { name, value });
        i = j;
    }
    runs
}

fn skip_block(input: &str, tokens: &[CssToken], start: usize) -> usize {
    let mut depth = 1i32;
    let mut i = start + 1;
    while i < tokens.len() && depth > 0 {
        if tokens[i].kind == CssTokenKind::Punctuation {
            match tokens[i].text(input) {
                "{" => depth += 1,
                "}" => depth -= 1,
                _ => {}
            }
        }
        i += 1;
    }
    i
}

fn skip_at_rule(input: &str, tokens: &[CssToken], start: usize) -> usize {
    let mut i = start + 1;
    while i < tokens.len() {
        let t = &tokens[i];
        if t.kind == CssTokenKind::Punctuation {
            let text = t.text(input);
            if text == ";" {
                return i + 1;
            }
            if text == "{" {
                // consume a balanced brace block
                let mut depth = 1;
                i += 1;
                while i < tokens.len() && depth > 0 {
                    if tokens[i].kind == CssTokenKind::Punctuation {
                        match tokens[i].text(input) {
                            "{" => depth += 1,
                            "}" => depth -= 1,
                            _ => {}
                        }
                    }
                    i += 1;
                }
                return i;
            }
        }
        i += 1;
    }
    i
}
