//! Color keyword table: lower-case CSS color keyword → canonical hex.
//!
//! Explicitly called out as "data, not design" in the specification; this
//! is the CSS Color Module Level 3 extended keyword set, trimmed to the
//! names real `style=""` payloads actually use (the CSS1/CSS2 basic 16 plus
//! the common extended names). Anything missing simply fails the schema's
//! literal check and the declaration is dropped, which is safe by
//! construction.

use ahash::AHashMap;
use once_cell::sync::Lazy;

static COLOR_KEYWORDS: Lazy<AHashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("black", "#000000"), ("silver", "#c0c0c0"), ("gray", "#808080"), ("grey", "#808080"),
        ("white", "#ffffff"), ("maroon", "#800000"), ("red", "#ff0000"), ("purple", "#800080"),
        ("fuchsia", "#ff00ff"), ("magenta", "#ff00ff"), ("green", "#008000"), ("lime", "#00ff00"),
        ("olive", "#808000"), ("yellow", "#ffff00"), ("navy", "#000080"), ("blue", "#0000ff"),
        ("teal", "#008080"), ("aqua", "#00ffff"), ("cyan", "#00ffff"), ("orange", "#ffa500"),
        ("pink", "#ffc0cb"), ("gold", "#ffd700"), ("brown", "#a52a2a"), ("chocolate", "#d2691e"),
        ("coral", "#ff7f50"), ("crimson", "#dc143c"), ("indigo", "#4b0082"), ("ivory", "#fffff0"),
        ("khaki", "#f0e68c"), ("lavender", "#e6e6fa"), ("linen", "#faf0e6"), ("orchid", "#da70d6"),
        ("plum", "#dda0dd"), ("salmon", "#fa8072"), ("sienna", "#a0522d"), ("skyblue", "#87ceeb"),
        ("tan", "#d2b48c"), ("thistle", "#d8bfd8"), ("tomato", "#ff6347"), ("turquoise", "#40e0d0"),
        ("violet", "#ee82ee"), ("wheat", "#f5deb3"), ("beige", "#f5f5dc"), ("azure", "#f0ffff"),
        ("chartreuse", "#7fff00"), ("darkblue", "#00008b"), ("darkgreen", "#006400"),
        ("darkred", "#8b0000"), ("darkorange", "#ff8c00"), ("deeppink", "#ff1493"),
        ("dodgerblue", "#1e90ff"), ("firebrick", "#b22222"), ("forestgreen", "#228b22"),
        ("hotpink", "#ff69b4"), ("lightblue", "#add8e6"), ("lightgreen", "#90ee90"),
        ("lightgray", "#d3d3d3"), ("lightgrey", "#d3d3d3"), ("lightpink", "#ffb6c1"),
        ("lightyellow", "#ffffe0"), ("midnightblue", "#191970"), ("royalblue", "#4169e1"),
        ("seagreen", "#2e8b57"), ("slateblue", "#6a5acd"), ("slategray", "#708090"),
        ("springgreen", "#00ff7f"), ("steelblue", "#4682b4"),
    ]
    .into_iter()
    .collect()
});

/// Look up the canonical hex value for a lower-case color keyword.
#[must_use]
pub fn lookup(keyword: &str) -> Option<&'static str> {
    COLOR_KEYWORDS.get(keyword).copied()
}

/// All known color keywords, for inclusion in a [`CssSchemaEntry`](super::schema::CssSchemaEntry)'s literal set.
#[must_use]
pub fn color_keywords() -> Vec<&'static str> {
    COLOR_KEYWORDS.keys().copied().collect()
}
