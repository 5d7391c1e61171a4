//! CSS property sanitizer (spec §4.4): walks the CSS token stream against
//! the schema to produce a filtered, canonicalized property set.

use super::colors;
use super::schema::{self, bits, CssSchemaEntry};
use super::tokenizer::{css_content, split_properties, tokenize, CssToken, CssTokenKind};

/// Punctuation that's a legitimate structural separator inside a property
/// value (shorthand lists, `font` slash syntax) and is always passed
/// through once its surrounding tokens were accepted.
const ALLOWED_SEPARATORS: &[&str] = &[",", "/"];

/// Sanitize a `style` attribute's value against the CSS schema (spec §4.4).
///
/// Returns the canonical `name:value;name:value` string with no trailing
/// semicolon and no whitespace around `:`/`;`, or `None` if every
/// declaration was filtered out (the spec's "empty output → the attribute
/// is rejected" rule).
#[must_use]
pub fn sanitize_style(style: &str) -> Option<String> {
    let tokens = tokenize(style);
    let runs = split_properties(style, &tokens);

    let mut out = String::new();
    for run in &runs {
        let Some(entry) = schema::lookup(&run.name) else {
            continue;
        };
        let Some(value) = sanitize_value(style, &run.value, entry) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(';');
        }
        out.push_str(&run.name);
        out.push(':');
        out.push_str(&value);
    }

    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn sanitize_value(input: &str, value: &[CssToken], entry: &CssSchemaEntry) -> Option<String> {
    let mut out = String::new();
    let mut pending_space = false;
    let mut i = 0;

    while i < value.len() {
        let tok = &value[i];

        match tok.kind {
            CssTokenKind::Whitespace | CssTokenKind::Comment => {
                pending_space = true;
                i += 1;
                continue;
            }
            CssTokenKind::FunctionStart => {
                let key = tok.text(input).to_ascii_lowercase();
                let close = matching_close(input, value, i);
                if let Some(&schema_key) = entry.fn_keys.get(key.as_str()) {
                    if let Some(hex) = render_color_function(input, &value[i + 1..close], schema_key) {
                        push_token(&mut out, &mut pending_space, &hex);
                    }
                }
                i = close + 1;
                continue;
            }
            CssTokenKind::Punctuation => {
                let text = tok.text(input);
                if text == "(" {
                    // A bare parenthesized group the tokenizer didn't treat
                    // as a function call (whitespace intervened); treat it
                    // like an unknown function and drop the whole group.
                    let close = matching_close(input, value, i);
                    i = close + 1;
                    continue;
                }
                if ALLOWED_SEPARATORS.contains(&text) {
                    push_token(&mut out, &mut pending_space, text);
                }
                i += 1;
                continue;
            }
            _ => {}
        }

        if let Some(rendered) = render_simple_token(input, tok, entry) {
            push_token(&mut out, &mut pending_space, &rendered);
        }
        i += 1;
    }

    Some(out)
}

fn push_token(out: &mut String, pending_space: &mut bool, text: &str) {
    if text.is_empty() {
        return;
    }
    if *pending_space && !out.is_empty() {
        out.push(' ');
    }
    *pending_space = false;
    out.push_str(text);
}

/// Find the index of the `)` that closes the function/group starting at
/// `open` (a `FunctionStart` or a bare `(` token), tracking nested depth.
/// If the group is never closed, returns `tokens.len()` (consume to EOF).
fn matching_close(input: &str, tokens: &[CssToken], open: usize) -> usize {
    let mut depth = 1i32;
    let mut i = open + 1;
    while i < tokens.len() {
        match tokens[i].kind {
            CssTokenKind::FunctionStart => depth += 1,
            CssTokenKind::Punctuation => match tokens[i].text(input) {
                "(" => depth += 1,
                ")" => {
                    depth -= 1;
                    if depth == 0 {
                        return i;
                    }
                }
                _ => {}
            },
            _ => {}
        }
        i += 1;
    }
    tokens.len()
}

fn render_simple_token(input: &str, tok: &CssToken, entry: &CssSchemaEntry) -> Option<String> {
    match tok.kind {
        CssTokenKind::Ident => render_ident(input, tok, entry),
        CssTokenKind::Hash => render_hash(input, tok, entry),
        CssTokenKind::Quantity => render_quantity(input, tok, entry),
        CssTokenKind::String => render_string(input, tok, entry),
        CssTokenKind::UrlToken => render_url(input, tok, entry),
        _ => None,
    }
}

fn render_ident(input: &str, tok: &CssToken, entry: &CssSchemaEntry) -> Option<String> {
    let raw = css_content(tok, input);
    let lower = raw.to_ascii_lowercase();

    if let Some(hex) = colors::lookup(&lower) {
        if entry.literals.contains(lower.as_str()) {
            return Some(compress_hex(hex));
        }
    }
    if entry.literals.contains(lower.as_str()) {
        return Some(lower);
    }
    if entry.bits & bits::UNRESERVED_WORD != 0
        && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !raw.is_empty()
    {
        return Some(raw);
    }
    None
}

fn render_hash(input: &str, tok: &CssToken, entry: &CssSchemaEntry) -> Option<String> {
    if entry.bits & bits::HASH == 0 {
        return None;
    }
    let raw = tok.text(input);
    let digits = &raw[1..];
    if !(digits.len() == 3 || digits.len() == 6) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let hex6 = if digits.len() == 3 {
        digits
            .chars()
            .flat_map(|c| [c, c])
            .collect::<String>()
            .to_ascii_lowercase()
    } else {
        digits.to_ascii_lowercase()
    };
    Some(compress_hex(&format!("#{hex6}")))
}

fn render_quantity(input: &str, tok: &CssToken, entry: &CssSchemaEntry) -> Option<String> {
    if entry.bits & bits::QUANTITY == 0 {
        return None;
    }
    let raw = tok.text(input);
    if raw.starts_with('-') && entry.bits & bits::NEGATIVE == 0 {
        return None;
    }
    Some(raw.to_string())
}

fn render_string(input: &str, tok: &CssToken, entry: &CssSchemaEntry) -> Option<String> {
    if entry.bits & bits::STRING == 0 {
        return None;
    }
    let content = css_content(tok, input);
    // font-family-style quoted identifiers are re-emitted single-quoted and
    // alphanumeric-filtered (spec §4.4); other string-accepting properties
    // (e.g. `content`) keep the decoded text double-quoted.
    if entry.bits & bits::UNRESERVED_WORD != 0 {
        let filtered: String = content
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-')
            .collect();
        if filtered.trim().is_empty() {
            return None;
        }
        return Some(format!("'{}'", filtered.trim()));
    }
    Some(format!("\"{}\"", content.replace('"', "")))
}

fn render_url(input: &str, tok: &CssToken, entry: &CssSchemaEntry) -> Option<String> {
    if entry.bits & bits::URL == 0 {
        return None;
    }
    let content = css_content(tok, input);
    if content.to_ascii_lowercase().trim_start().starts_with("javascript:") {
        return None;
    }
    Some(format!("url(\"{}\")", content.replace('"', "")))
}

/// Convert the inner argument tokens of `rgb(`/`rgba(` into a canonical
/// `#rrggbb` hex string.
fn render_color_function(input: &str, args: &[CssToken], _schema_key: &str) -> Option<String> {
    let channels: Vec<&CssToken> = args
        .iter()
        .filter(|t| !matches!(t.kind, CssTokenKind::Whitespace | CssTokenKind::Comment))
        .filter(|t| !(t.kind == CssTokenKind::Punctuation && t.text(input) == ","))
        .collect();

    if channels.len() < 3 {
        return None;
    }

    let mut rgb = [0u8; 3];
    for (i, chan) in channels.iter().take(3).enumerate() {
        rgb[i] = parse_channel(chan.text(input))?;
    }
    // a 4th channel (alpha) is validated but not retained — the output
    // format is plain `#rrggbb`.
    if let Some(alpha) = channels.get(3) {
        parse_alpha(alpha.text(input))?;
    }

    Some(compress_hex(&format!(
        "#{:02x}{:02x}{:02x}",
        rgb[0], rgb[1], rgb[2]
    )))
}

fn parse_channel(raw: &str) -> Option<u8> {
    if let Some(pct) = raw.strip_suffix('%') {
        let v: f64 = pct.parse().ok()?;
        if !(0.0..=100.0).contains(&v) {
            return None;
        }
        return Some((v / 100.0 * 255.0).round() as u8);
    }
    let v: f64 = raw.parse().ok()?;
    if !(0.0..=255.0).contains(&v) {
        return None;
    }
    Some(v.round() as u8)
}

fn parse_alpha(raw: &str) -> Option<f64> {
    if let Some(pct) = raw.strip_suffix('%') {
        let v: f64 = pct.parse().ok()?;
        if (0.0..=100.0).contains(&v) {
            return Some(v / 100.0);
        }
        return None;
    }
    let v: f64 = raw.parse().ok()?;
    if (0.0..=1.0).contains(&v) {
        Some(v)
    } else {
        None
    }
}

/// Compress `#rrggbb` to `#rgb` when each channel's two hex digits repeat.
#[must_use]
pub fn compress_hex(hex6: &str) -> String {
    let bytes = hex6.as_bytes();
    if hex6.len() == 7 && bytes[0] == b'#' {
        let (r0, r1) = (bytes[1], bytes[2]);
        let (g0, g1) = (bytes[3], bytes[4]);
        let (b0, b1) = (bytes[5], bytes[6]);
        if r0 == r1 && g0 == g1 && b0 == b1 {
            return format!("#{}{}{}", r0 as char, g0 as char, b0 as char);
        }
    }
    hex6.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_declaration() {
        assert_eq!(
            sanitize_style("color: red"),
            Some("color:#f00".to_string())
        );
    }

    #[test]
    fn unknown_property_dropped() {
        assert_eq!(sanitize_style("behavior: url(evil.htc)"), None);
    }

    #[test]
    fn rejects_javascript_url() {
        assert_eq!(
            sanitize_style("background: url(javascript:alert(1))"),
            None
        );
    }

    #[test]
    fn rgb_to_hex() {
        assert_eq!(
            sanitize_style("color: rgb(255, 0, 0)"),
            Some("color:#f00".to_string())
        );
    }

    #[test]
    fn rgba_drops_alpha() {
        assert_eq!(
            sanitize_style("color: rgba(0, 0, 0, 0.5)"),
            Some("color:#000".to_string())
        );
    }

    #[test]
    fn multiple_declarations() {
        assert_eq!(
            sanitize_style("color: red; font-weight: bold"),
            Some("color:#f00;font-weight:bold".to_string())
        );
    }

    #[test]
    fn negative_margin_allowed_but_not_padding() {
        assert_eq!(
            sanitize_style("margin-left: -5px"),
            Some("margin-left:-5px".to_string())
        );
        assert_eq!(sanitize_style("padding-left: -5px"), None);
    }

    #[test]
    fn font_family_quoting() {
        assert_eq!(
            sanitize_style("font-family: 'Comic Sans MS'"),
            Some("font-family:'Comic Sans MS'".to_string())
        );
    }
}
