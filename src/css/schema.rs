//! CSS schema: a constant map from property name to a bitmask of allowed
//! token kinds, a literal-string allow-list, and a map of allowed function
//! keys (spec §4.4).
//!
//! Like the color-keyword table, the *entries* here are data, not design —
//! this is a representative subset of the properties a rich-text editor's
//! `style` attribute realistically carries (AntiSamy's own `css-base.properties`
//! plays the same role upstream). The *shape* (`bits`/`literals`/`fn_keys`)
//! is what the specification actually constrains.

use ahash::{AHashMap, AHashSet};
use once_cell::sync::Lazy;

/// Bitmask of token kinds a CSS schema entry accepts for its property
/// value, independent of the literal allow-list.
pub mod bits {
    /// A bare number, optionally with a unit (`10px`, `1.5em`) or a percentage (`50%`).
    pub const QUANTITY: u16 = 1 << 0;
    /// A quantity may additionally be negative (e.g. negative margins).
    pub const NEGATIVE: u16 = 1 << 1;
    /// A `#rgb`/`#rrggbb` color.
    pub const HASH: u16 = 1 << 2;
    /// A quoted string (e.g. `content: "..."`, quoted font-family names).
    pub const STRING: u16 = 1 << 3;
    /// A `url(...)` token.
    pub const URL: u16 = 1 << 4;
    /// Any bare identifier made only of ASCII letters/digits/hyphens,
    /// regardless of the literal allow-list — used for open-ended
    /// identifier lists like custom font-family names.
    pub const UNRESERVED_WORD: u16 = 1 << 5;
    /// A `unicode-range`-style token (`U+0025-00FF`); accepted as a bare
    /// identifier/quantity pair, never produced by our tokenizer as its own
    /// kind, so schema entries combine this with `UNRESERVED_WORD`.
    pub const UNICODE_RANGE: u16 = 1 << 6;
}

/// Per-property whitelist entry.
pub struct CssSchemaEntry {
    /// Mask of [`bits`] this property's value tokens may use.
    pub bits: u16,
    /// Allowed lower-case literal tokens (keywords), beyond what `bits` allows.
    pub literals: AHashSet<&'static str>,
    /// Map from a function-name-with-paren (e.g. `"rgb("`) to the schema
    /// key to switch to while inside that function's argument list.
    pub fn_keys: AHashMap<&'static str, &'static str>,
}

const NONE: u16 = 0;

fn literal_set(values: &[&'static str]) -> AHashSet<&'static str> {
    values.iter().copied().collect()
}

fn fn_key_map(pairs: &[(&'static str, &'static str)]) -> AHashMap<&'static str, &'static str> {
    pairs.iter().copied().collect()
}

const COLOR_FN_KEYS: &[(&str, &str)] = &[("rgb(", "@color-args"), ("rgba(", "@color-args")];

const GLOBAL_KEYWORDS: &[&str] = &["inherit", "initial", "unset", "revert"];

fn with_globals(mut values: Vec<&'static str>) -> Vec<&'static str> {
    values.extend_from_slice(GLOBAL_KEYWORDS);
    values
}

/// The full CSS property schema, built once at process start.
pub static CSS_SCHEMA: Lazy<AHashMap<&'static str, CssSchemaEntry>> = Lazy::new(build_schema);

fn entry(bits: u16, literals: &[&'static str]) -> CssSchemaEntry {
    CssSchemaEntry {
        bits,
        literals: literal_set(literals),
        fn_keys: AHashMap::default(),
    }
}

fn color_entry() -> CssSchemaEntry {
    let mut literals = with_globals(super::colors::color_keywords());
    literals.push("transparent");
    literals.push("currentcolor");
    CssSchemaEntry {
        bits: bits::HASH,
        literals: literal_set(&literals),
        fn_keys: fn_key_map(COLOR_FN_KEYS),
    }
}

fn length_entry(extra_literals: &[&'static str]) -> CssSchemaEntry {
    entry(
        bits::QUANTITY | bits::NEGATIVE,
        &with_globals(extra_literals.to_vec()),
    )
}

fn unsigned_length_entry(extra_literals: &[&'static str]) -> CssSchemaEntry {
    entry(bits::QUANTITY, &with_globals(extra_literals.to_vec()))
}

#[allow(clippy::too_many_lines)]
fn build_schema() -> AHashMap<&'static str, CssSchemaEntry> {
    let mut m = AHashMap::default();

    m.insert("color", color_entry());
    m.insert("background-color", color_entry());
    m.insert("border-color", color_entry());
    m.insert("border-top-color", color_entry());
    m.insert("border-right-color", color_entry());
    m.insert("border-bottom-color", color_entry());
    m.insert("border-left-color", color_entry());
    m.insert("outline-color", color_entry());
    m.insert("text-decoration-color", color_entry());

    m.insert(
        "background",
        CssSchemaEntry {
            bits: bits::HASH | bits::URL | bits::QUANTITY,
            literals: literal_set(&with_globals(vec![
                "none", "repeat", "repeat-x", "repeat-y", "no-repeat", "fixed", "scroll",
                "transparent", "center", "top", "bottom", "left", "right", "auto",
            ])),
            fn_keys: fn_key_map(COLOR_FN_KEYS),
        },
    );

    for prop in [
        "margin",
        "margin-top",
        "margin-right",
        "margin-bottom",
        "margin-left",
    ] {
        m.insert(prop, length_entry(&["auto"]));
    }
    for prop in [
        "padding",
        "padding-top",
        "padding-right",
        "padding-bottom",
        "padding-left",
        "width",
        "height",
        "max-width",
        "max-height",
        "min-width",
        "min-height",
        "border-width",
        "border-top-width",
        "border-right-width",
        "border-bottom-width",
        "border-left-width",
        "outline-width",
    ] {
        m.insert(prop, unsigned_length_entry(&["auto", "thin", "medium", "thick"]));
    }

    m.insert(
        "font-size",
        unsigned_length_entry(&[
            "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large",
            "smaller", "larger",
        ]),
    );
    m.insert(
        "line-height",
        entry(
            bits::QUANTITY,
            &with_globals(vec!["normal"]),
        ),
    );
    m.insert(
        "letter-spacing",
        length_entry(&["normal"]),
    );
    m.insert("word-spacing", length_entry(&["normal"]));
    m.insert("text-indent", length_entry(&[]));

    m.insert(
        "font-family",
        CssSchemaEntry {
            bits: bits::STRING | bits::UNRESERVED_WORD,
            literals: literal_set(&with_globals(vec![
                "serif", "sans-serif", "monospace", "cursive", "fantasy", "system-ui",
            ])),
            fn_keys: AHashMap::default(),
        },
    );

    m.insert(
        "font-style",
        entry(NONE, &with_globals(vec!["normal", "italic", "oblique"])),
    );
    m.insert(
        "font-weight",
        entry(
            bits::QUANTITY,
            &with_globals(vec![
                "normal", "bold", "bolder", "lighter",
            ]),
        ),
    );
    m.insert(
        "font-variant",
        entry(NONE, &with_globals(vec!["normal", "small-caps"])),
    );
    m.insert(
        "font",
        CssSchemaEntry {
            bits: bits::QUANTITY | bits::STRING | bits::UNRESERVED_WORD,
            literals: literal_set(&with_globals(vec![
                "normal", "italic", "oblique", "small-caps", "bold", "bolder", "lighter",
                "serif", "sans-serif", "monospace", "cursive", "fantasy",
            ])),
            fn_keys: AHashMap::default(),
        },
    );

    m.insert(
        "text-align",
        entry(NONE, &with_globals(vec!["left", "right", "center", "justify"])),
    );
    m.insert(
        "text-decoration",
        entry(
            NONE,
            &with_globals(vec![
                "none", "underline", "overline", "line-through", "blink",
            ]),
        ),
    );
    m.insert(
        "text-transform",
        entry(
            NONE,
            &with_globals(vec!["none", "capitalize", "uppercase", "lowercase"]),
        ),
    );
    m.insert(
        "white-space",
        entry(
            NONE,
            &with_globals(vec!["normal", "nowrap", "pre", "pre-wrap", "pre-line"]),
        ),
    );
    m.insert(
        "vertical-align",
        length_entry(&[
            "baseline", "sub", "super", "top", "text-top", "middle", "bottom", "text-bottom",
        ]),
    );
    m.insert(
        "direction",
        entry(NONE, &with_globals(vec!["ltr", "rtl"])),
    );

    m.insert(
        "display",
        entry(
            NONE,
            &with_globals(vec![
                "inline", "block", "inline-block", "list-item", "none", "table",
                "table-row", "table-cell", "flex", "inline-flex", "grid", "inline-grid",
            ]),
        ),
    );
    m.insert("float", entry(NONE, &with_globals(vec!["left", "right", "none"])));
    m.insert(
        "clear",
        entry(NONE, &with_globals(vec!["left", "right", "both", "none"])),
    );
    m.insert(
        "visibility",
        entry(NONE, &with_globals(vec!["visible", "hidden", "collapse"])),
    );
    m.insert(
        "overflow",
        entry(
            NONE,
            &with_globals(vec!["visible", "hidden", "scroll", "auto"]),
        ),
    );
    m.insert(
        "position",
        // deliberately omits `absolute`/`fixed` — off-canvas positioning is
        // a classic rich-text clickjacking / overlay primitive.
        entry(NONE, &with_globals(vec!["static", "relative"])),
    );

    for (prop, values) in [
        ("border-style", &[
            "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge",
            "inset", "outset",
        ][..]),
        ("border-top-style", &["none", "solid", "dotted", "dashed"][..]),
        ("border-right-style", &["none", "solid", "dotted", "dashed"][..]),
        ("border-bottom-style", &["none", "solid", "dotted", "dashed"][..]),
        ("border-left-style", &["none", "solid", "dotted", "dashed"][..]),
        ("list-style-type", &[
            "none", "disc", "circle", "square", "decimal", "decimal-leading-zero",
            "lower-roman", "upper-roman", "lower-alpha", "upper-alpha",
        ][..]),
        ("list-style-position", &["inside", "outside"][..]),
    ] {
        m.insert(prop, entry(NONE, &with_globals(values.to_vec())));
    }

    m.insert(
        "list-style",
        entry(
            NONE,
            &with_globals(vec![
                "none", "disc", "circle", "square", "decimal", "inside", "outside",
            ]),
        ),
    );

    m.insert(
        "border",
        CssSchemaEntry {
            bits: bits::HASH | bits::QUANTITY,
            literals: literal_set(&with_globals(vec![
                "none", "hidden", "dotted", "dashed", "solid", "double", "thin", "medium",
                "thick",
            ])),
            fn_keys: fn_key_map(COLOR_FN_KEYS),
        },
    );

    m.insert(
        "@color-args",
        entry(bits::QUANTITY, &[]),
    );

    m
}

/// Look up a property's schema entry. Unknown properties are disallowed
/// (the spec's "unknown → `DISALLOWED`" rule).
#[must_use]
pub fn lookup(property: &str) -> Option<&'static CssSchemaEntry> {
    CSS_SCHEMA.get(property)
}
