//! Entity decoder: named and numeric HTML character references.
//!
//! Decodes `&name;`, `&name` (trailing-semicolon-optional for the small set
//! of legacy references browsers still honor bare), `&#dd;`/`&#dd`, and
//! `&#xhh;`/`&#xhh`. Unknown references are left untouched — per the spec's
//! error taxonomy, an `UnknownEntity` is "passed through literally", not an
//! error.
//!
//! The named-reference table is, like the CSS color-keyword table, a data
//! table rather than a design surface: only a representative subset of the
//! ~2,200 names HTML5 defines is included here (the common accented
//! letters, punctuation, symbols and the handful that XSS payloads actually
//! lean on). Anything missing from the table simply falls through
//! unresolved, which is safe by construction — it can never *introduce* a
//! character that wasn't already literally present in the input.

use ahash::AHashMap;
use once_cell::sync::Lazy;

/// The handful of legacy named references HTML5 still allows without a
/// trailing `;` (matched ASCII-case-insensitively, per §4.2).
const LEGACY_NO_SEMICOLON: &[(&str, &str)] =
    &[("amp", "&"), ("lt", "<"), ("gt", ">"), ("quot", "\""), ("apos", "'")];

static NAMED_REFERENCES: Lazy<AHashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("amp", "&"), ("AMP", "&"), ("lt", "<"), ("LT", "<"), ("gt", ">"), ("GT", ">"),
        ("quot", "\""), ("QUOT", "\""), ("apos", "'"),
        ("nbsp", "\u{a0}"), ("copy", "\u{a9}"), ("COPY", "\u{a9}"), ("reg", "\u{ae}"),
        ("REG", "\u{ae}"), ("trade", "\u{2122}"), ("hellip", "\u{2026}"), ("mdash", "\u{2014}"),
        ("ndash", "\u{2013}"), ("lsquo", "\u{2018}"), ("rsquo", "\u{2019}"), ("sbquo", "\u{201a}"),
        ("ldquo", "\u{201c}"), ("rdquo", "\u{201d}"), ("bdquo", "\u{201e}"), ("laquo", "\u{ab}"),
        ("raquo", "\u{bb}"), ("sect", "\u{a7}"), ("para", "\u{b6}"), ("middot", "\u{b7}"),
        ("times", "\u{d7}"), ("divide", "\u{f7}"), ("plusmn", "\u{b1}"), ("sup1", "\u{b9}"),
        ("sup2", "\u{b2}"), ("sup3", "\u{b3}"), ("frac12", "\u{bd}"), ("frac14", "\u{bc}"),
        ("frac34", "\u{be}"), ("deg", "\u{b0}"), ("micro", "\u{b5}"), ("euro", "\u{20ac}"),
        ("pound", "\u{a3}"), ("yen", "\u{a5}"), ("cent", "\u{a2}"), ("curren", "\u{a4}"),
        ("brvbar", "\u{a6}"), ("uml", "\u{a8}"), ("ordf", "\u{aa}"), ("not", "\u{ac}"),
        ("shy", "\u{ad}"), ("macr", "\u{af}"), ("acute", "\u{b4}"), ("cedil", "\u{b8}"),
        ("ordm", "\u{ba}"), ("iquest", "\u{bf}"),
        ("Agrave", "\u{c0}"), ("Aacute", "\u{c1}"), ("Acirc", "\u{c2}"), ("Atilde", "\u{c3}"),
        ("Auml", "\u{c4}"), ("Aring", "\u{c5}"), ("AElig", "\u{c6}"), ("Ccedil", "\u{c7}"),
        ("Egrave", "\u{c8}"), ("Eacute", "\u{c9}"), ("Ecirc", "\u{ca}"), ("Euml", "\u{cb}"),
        ("Igrave", "\u{cc}"), ("Iacute", "\u{cd}"), ("Icirc", "\u{ce}"), ("Iuml", "\u{cf}"),
        ("ETH", "\u{d0}"), ("Ntilde", "\u{d1}"), ("Ograve", "\u{d2}"), ("Oacute", "\u{d3}"),
        ("Ocirc", "\u{d4}"), ("Otilde", "\u{d5}"), ("Ouml", "\u{d6}"), ("Oslash", "\u{d8}"),
        ("Ugrave", "\u{d9}"), ("Uacute", "\u{da}"), ("Ucirc", "\u{db}"), ("Uuml", "\u{dc}"),
        ("Yacute", "\u{dd}"), ("THORN", "\u{de}"), ("szlig", "\u{df}"),
        ("agrave", "\u{e0}"), ("aacute", "\u{e1}"), ("acirc", "\u{e2}"), ("atilde", "\u{e3}"),
        ("auml", "\u{e4}"), ("aring", "\u{e5}"), ("aelig", "\u{e6}"), ("ccedil", "\u{e7}"),
        ("egrave", "\u{e8}"), ("eacute", "\u{e9}"), ("ecirc", "\u{ea}"), ("euml", "\u{eb}"),
        ("igrave", "\u{ec}"), ("iacute", "\u{ed}"), ("icirc", "\u{ee}"), ("iuml", "\u{ef}"),
        ("eth", "\u{f0}"), ("ntilde", "\u{f1}"), ("ograve", "\u{f2}"), ("oacute", "\u{f3}"),
        ("ocirc", "\u{f4}"), ("otilde", "\u{f5}"), ("ouml", "\u{f6}"), ("oslash", "\u{f8}"),
        ("ugrave", "\u{f9}"), ("uacute", "\u{fa}"), ("ucirc", "\u{fb}"), ("uuml", "\u{fc}"),
        ("yacute", "\u{fd}"), ("thorn", "\u{fe}"), ("yuml", "\u{ff}"),
        ("alpha", "\u{3b1}"), ("beta", "\u{3b2}"), ("gamma", "\u{3b3}"), ("delta", "\u{3b4}"),
        ("epsilon", "\u{3b5}"), ("zeta", "\u{3b6}"), ("eta", "\u{3b7}"), ("theta", "\u{3b8}"),
        ("iota", "\u{3b9}"), ("kappa", "\u{3ba}"), ("lambda", "\u{3bb}"), ("mu", "\u{3bc}"),
        ("nu", "\u{3bd}"), ("xi", "\u{3be}"), ("omicron", "\u{3bf}"), ("pi", "\u{3c0}"),
        ("rho", "\u{3c1}"), ("sigma", "\u{3c3}"), ("tau", "\u{3c4}"), ("upsilon", "\u{3c5}"),
        ("phi", "\u{3c6}"), ("chi", "\u{3c7}"), ("psi", "\u{3c8}"), ("omega", "\u{3c9}"),
        ("Alpha", "\u{391}"), ("Beta", "\u{392}"), ("Gamma", "\u{393}"), ("Delta", "\u{394}"),
        ("Omega", "\u{3a9}"), ("Sigma", "\u{3a3}"), ("Pi", "\u{3a0}"), ("Theta", "\u{398}"),
        ("infin", "\u{221e}"), ("ne", "\u{2260}"), ("le", "\u{2264}"), ("ge", "\u{2265}"),
        ("larr", "\u{2190}"), ("uarr", "\u{2191}"), ("rarr", "\u{2192}"), ("darr", "\u{2193}"),
        ("harr", "\u{2194}"), ("bull", "\u{2022}"), ("dagger", "\u{2020}"), ("Dagger", "\u{2021}"),
        ("permil", "\u{2030}"), ("spades", "\u{2660}"), ("clubs", "\u{2663}"), ("hearts", "\u{2665}"),
        ("diams", "\u{2666}"), ("loz", "\u{25ca}"), ("oline", "\u{203e}"), ("frasl", "\u{2044}"),
        ("forall", "\u{2200}"), ("part", "\u{2202}"), ("exist", "\u{2203}"), ("empty", "\u{2205}"),
        ("nabla", "\u{2207}"), ("isin", "\u{2208}"), ("notin", "\u{2209}"), ("ni", "\u{220b}"),
        ("prod", "\u{220f}"), ("sum", "\u{2211}"), ("minus", "\u{2212}"), ("lowast", "\u{2217}"),
        ("radic", "\u{221a}"), ("prop", "\u{221d}"), ("ang", "\u{2220}"), ("and", "\u{2227}"),
        ("or", "\u{2228}"), ("cap", "\u{2229}"), ("cup", "\u{222a}"), ("int", "\u{222b}"),
        ("there4", "\u{2234}"), ("sim", "\u{223c}"), ("cong", "\u{2245}"), ("asymp", "\u{2248}"),
        ("equiv", "\u{2261}"), ("sub", "\u{2282}"), ("sup", "\u{2283}"), ("nsub", "\u{2284}"),
        ("sube", "\u{2286}"), ("supe", "\u{2287}"), ("oplus", "\u{2295}"), ("otimes", "\u{2297}"),
        ("perp", "\u{22a5}"), ("sdot", "\u{22c5}"), ("lceil", "\u{2308}"), ("rceil", "\u{2309}"),
        ("lfloor", "\u{230a}"), ("rfloor", "\u{230b}"), ("lang", "\u{27e8}"), ("rang", "\u{27e9}"),
        ("zwnj", "\u{200c}"), ("zwj", "\u{200d}"), ("lrm", "\u{200e}"), ("rlm", "\u{200f}"),
        ("ensp", "\u{2002}"), ("emsp", "\u{2003}"), ("thinsp", "\u{2009}"),
    ]
    .into_iter()
    .collect()
});

/// The Windows-1252 remapping HTML5 applies to numeric references in the
/// `0x80..=0x9F` range — a legacy quirk, but one real payloads rely on
/// (e.g. `&#128;` must decode to `€`, not the C1 control U+0080).
fn windows_1252_remap(code_point: u32) -> Option<char> {
    let table: &[char] = &[
        '\u{20ac}', '\u{81}', '\u{201a}', '\u{192}', '\u{201e}', '\u{2026}', '\u{2020}',
        '\u{2021}', '\u{2c6}', '\u{2030}', '\u{160}', '\u{2039}', '\u{152}', '\u{8d}', '\u{17d}',
        '\u{8f}', '\u{90}', '\u{2018}', '\u{2019}', '\u{201c}', '\u{201d}', '\u{2022}', '\u{2013}',
        '\u{2014}', '\u{2dc}', '\u{2122}', '\u{161}', '\u{203a}', '\u{153}', '\u{9d}', '\u{17e}',
        '\u{178}',
    ];
    table.get((code_point - 0x80) as usize).copied()
}

fn numeric_char(code_point: u32) -> char {
    if code_point == 0 {
        return '\u{fffd}';
    }
    if (0x80..=0x9f).contains(&code_point) {
        if let Some(remapped) = windows_1252_remap(code_point) {
            return remapped;
        }
    }
    char::from_u32(code_point).unwrap_or('\u{fffd}')
}

/// Decode HTML character references in `input`, returning the decoded text.
///
/// Unknown or malformed references are passed through literally (including
/// the leading `&`), matching the `UnknownEntity` row of the error
/// taxonomy.
#[must_use]
pub fn decode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '&' {
            out.push(c);
            continue;
        }

        let rest = &input[i + 1..];
        if let Some(body) = rest.strip_prefix('#') {
            if let Some((decoded, consumed)) = decode_numeric(body) {
                out.push(decoded);
                advance_chars(&mut chars, 1 + consumed);
                continue;
            }
        } else if let Some((decoded, consumed)) = decode_named(rest) {
            out.push_str(decoded);
            advance_chars(&mut chars, consumed);
            continue;
        }

        out.push('&');
    }

    out
}

/// Advance the peekable char iterator by `n` *characters* (not bytes),
/// since we already consumed the `&`/`#` ourselves via slicing above.
fn advance_chars(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>, n: usize) {
    for _ in 0..n {
        chars.next();
    }
}

/// Try to decode `&#...` given the text following `&#`. Returns the decoded
/// char and how many chars (of `body`) were consumed, *not* counting the
/// `&#` itself.
fn decode_numeric(body: &str) -> Option<(char, usize)> {
    let mut chars = body.chars().peekable();
    let hex = matches!(chars.peek(), Some('x' | 'X'));
    if hex {
        chars.next();
    }

    let digits: String = if hex {
        chars
            .by_ref()
            .take_while(|c| c.is_ascii_hexdigit())
            .collect()
    } else {
        chars.by_ref().take_while(|c| c.is_ascii_digit()).collect()
    };

    if digits.is_empty() {
        return None;
    }

    let code_point = u32::from_str_radix(&digits, if hex { 16 } else { 10 }).unwrap_or(0x110000);
    let mut consumed = digits.len() + usize::from(hex);
    if body.as_bytes().get(consumed) == Some(&b';') {
        consumed += 1;
    }
    Some((numeric_char(code_point), consumed))
}

/// Try to decode `&name...` given the text following `&`. Returns the
/// decoded string and how many chars of `body` (the name plus optional
/// `;`) were consumed.
fn decode_named(body: &str) -> Option<(&'static str, usize)> {
    let name_len = body
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .count();
    if name_len == 0 {
        return None;
    }

    let name = &body[..byte_len(body, name_len)];
    let has_semi = body.as_bytes().get(byte_len(body, name_len)) == Some(&b';');

    if let Some(value) = NAMED_REFERENCES.get(name) {
        if has_semi {
            return Some((value, name_len + 1));
        }
        // Trailing-semicolon-optional only for the browser-legacy subset.
        if LEGACY_NO_SEMICOLON.iter().any(|(n, _)| n.eq_ignore_ascii_case(name)) {
            return Some((value, name_len));
        }
        return None;
    }

    // Case-insensitive fallback for the five universally-recognized names,
    // covering variants like `&Amp;` that aren't literal table keys.
    let lower = name.to_ascii_lowercase();
    if let Some((_, value)) = LEGACY_NO_SEMICOLON.iter().find(|(n, _)| *n == lower) {
        let consumed = name_len + usize::from(has_semi);
        return Some((value, consumed));
    }

    None
}

fn byte_len(s: &str, char_count: usize) -> usize {
    s.char_indices()
        .nth(char_count)
        .map_or(s.len(), |(idx, _)| idx)
}
