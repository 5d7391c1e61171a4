//! Ready-made [`PolicyFactory`] presets (spec §8's concrete scenarios
//! reference these by name), mirroring the teacher's `GLOBAL_BUBBLE_BATH`
//! / `SELECT_ALL` `Lazy` statics (`src/macros.rs`, `src/lib.rs`).

use crate::policy::{AttributePolicy, ElementPolicy, PolicyFactory};
use once_cell::sync::Lazy;

/// Named, ready-to-use policies. Each is a `Lazy<PolicyFactory>`: built
/// once, shared (spec §5) across every call that uses it.
pub struct Sanitizers;

impl Sanitizers {
    /// Inline text formatting only: `b`, `i`, `em`, `strong`, `u`, `sub`,
    /// `sup`, `br`, `span` — no attributes beyond `title`.
    pub fn formatting() -> &'static PolicyFactory {
        &FORMATTING
    }

    /// Block-level structure: paragraphs, headings, lists, blockquotes,
    /// plus everything [`Self::formatting`] allows, nested inside them.
    pub fn blocks() -> &'static PolicyFactory {
        &BLOCKS
    }

    /// Anchors with a gated `href` and an injected `rel="nofollow"`; no
    /// `onclick` or other event-handler attributes are ever allowed, so
    /// an anchor with nothing left after filtering is dropped
    /// (`skip_if_empty`) while its text content still flows through.
    pub fn links() -> &'static PolicyFactory {
        &LINKS
    }

    /// `img`, with `src`/`alt`/`width`/`height`/`border`.
    pub fn images() -> &'static PolicyFactory {
        &IMAGES
    }

    /// [`Self::formatting`] plus [`Self::blocks`]'s elements with the
    /// styling variant (spec §4.9) turned on: a sanitized `style`
    /// attribute is converted into a synthesized `<font>` child.
    pub fn styles() -> &'static PolicyFactory {
        &STYLES
    }

    /// `table`/`thead`/`tbody`/`tfoot`/`tr`/`td`/`th`/`caption`.
    pub fn tables() -> &'static PolicyFactory {
        &TABLES
    }

    /// [`Self::formatting`]'s elements plus [`Self::links`]'s anchor: a
    /// conservative combination suitable for untrusted free-text fields.
    ///
    /// Built directly (not via [`PolicyFactory::and`], whose `and` is an
    /// intersection per spec §4.7): `formatting` and `links` allow
    /// disjoint element sets, so intersecting them would allow nothing.
    pub fn basic() -> &'static PolicyFactory {
        &BASIC
    }

    /// Everything this crate knows how to sanitize, allowed at once:
    /// formatting, block structure, links, images, and tables. Built
    /// independently rather than via [`PolicyFactory::and`], which
    /// intersects rather than unions.
    pub fn relaxed() -> &'static PolicyFactory {
        &RELAXED
    }

    /// Allows no elements at all: every tag is stripped, all text is
    /// kept. Useful as the identity element of [`PolicyFactory::and`]
    /// composition ergonomics, and for plain-text-only contexts.
    pub fn none() -> &'static PolicyFactory {
        &NONE
    }
}

fn global_attrs(builder: crate::policy::Builder) -> crate::policy::Builder {
    builder.allow_global_attribute("title", AttributePolicy::non_empty())
}

static FORMATTING: Lazy<PolicyFactory> = Lazy::new(|| {
    let mut builder = PolicyFactory::builder();
    for name in ["b", "i", "em", "strong", "u", "sub", "sup", "span"] {
        builder = builder.allow_element(name);
    }
    builder = builder.allow_element("br");
    builder = global_attrs(builder);
    builder.build()
});

static BLOCKS: Lazy<PolicyFactory> = Lazy::new(|| {
    let mut builder = PolicyFactory::builder();
    for name in [
        "b", "i", "em", "strong", "u", "sub", "sup", "span", "p", "h1", "h2", "h3", "h4", "h5",
        "h6", "ul", "ol", "li", "blockquote", "div",
    ] {
        builder = builder.allow_element(name);
    }
    builder = builder.allow_element("br");
    builder = global_attrs(builder);
    builder.build()
});

static LINKS: Lazy<PolicyFactory> = Lazy::new(|| {
    PolicyFactory::builder()
        .allow_element_with("a", ElementPolicy::rel_nofollow())
        .skip_if_empty("a", true)
        .allow_attribute(
            "a",
            "href",
            AttributePolicy::url(["http", "https", "mailto"]),
        )
        .allow_attribute("a", "title", AttributePolicy::non_empty())
        .build()
});

static IMAGES: Lazy<PolicyFactory> = Lazy::new(|| {
    PolicyFactory::builder()
        .allow_element("img")
        .allow_attribute(
            "img",
            "src",
            AttributePolicy::url(["http", "https"]),
        )
        .allow_attribute("img", "alt", AttributePolicy::non_empty())
        .allow_attribute("img", "width", AttributePolicy::numeric())
        .allow_attribute("img", "height", AttributePolicy::numeric())
        .allow_attribute("img", "border", AttributePolicy::numeric())
        .build()
});

static STYLES: Lazy<PolicyFactory> = Lazy::new(|| {
    let mut builder = PolicyFactory::builder();
    for name in [
        "b", "i", "em", "strong", "u", "sub", "sup", "span", "p", "h1", "h2", "h3", "h4", "h5",
        "h6", "ul", "ol", "li", "blockquote", "div", "font",
    ] {
        builder = builder.allow_element(name);
    }
    builder = builder.allow_element("br");
    for name in [
        "b", "i", "em", "strong", "u", "sub", "sup", "span", "p", "h1", "h2", "h3", "h4", "h5",
        "h6", "ul", "ol", "li", "blockquote", "div", "font",
    ] {
        builder = builder.allow_attribute(name, "style", AttributePolicy::non_empty());
    }
    builder = builder.allow_attribute("font", "face", AttributePolicy::non_empty());
    builder = builder.allow_attribute("font", "color", AttributePolicy::non_empty());
    builder = builder.allow_attribute("font", "size", AttributePolicy::non_empty());
    builder = builder.allow_attribute("font", "align", AttributePolicy::non_empty());
    builder = builder.allow_attribute("font", "dir", AttributePolicy::non_empty());
    builder = global_attrs(builder);
    builder.allow_styling().build()
});

static TABLES: Lazy<PolicyFactory> = Lazy::new(|| {
    let mut builder = PolicyFactory::builder();
    for name in [
        "table", "thead", "tbody", "tfoot", "tr", "td", "th", "caption",
    ] {
        builder = builder.allow_element(name);
    }
    builder = builder.allow_attribute("td", "colspan", AttributePolicy::numeric());
    builder = builder.allow_attribute("td", "rowspan", AttributePolicy::numeric());
    builder = builder.allow_attribute("th", "colspan", AttributePolicy::numeric());
    builder = builder.allow_attribute("th", "rowspan", AttributePolicy::numeric());
    builder = global_attrs(builder);
    builder.build()
});

static BASIC: Lazy<PolicyFactory> = Lazy::new(|| {
    let mut builder = PolicyFactory::builder();
    for name in ["b", "i", "em", "strong", "u", "sub", "sup", "span"] {
        builder = builder.allow_element(name);
    }
    builder = builder.allow_element("br");
    builder = builder.allow_element_with("a", ElementPolicy::rel_nofollow());
    builder = builder.skip_if_empty("a", true);
    builder = builder.allow_attribute(
        "a",
        "href",
        AttributePolicy::url(["http", "https", "mailto"]),
    );
    builder = builder.allow_attribute("a", "title", AttributePolicy::non_empty());
    builder = global_attrs(builder);
    builder.build()
});

static RELAXED: Lazy<PolicyFactory> = Lazy::new(|| {
    let mut builder = PolicyFactory::builder();
    for name in [
        "b", "i", "em", "strong", "u", "sub", "sup", "span", "p", "h1", "h2", "h3", "h4", "h5",
        "h6", "ul", "ol", "li", "blockquote", "div", "img", "table", "thead", "tbody", "tfoot",
        "tr", "td", "th", "caption",
    ] {
        builder = builder.allow_element(name);
    }
    builder = builder.allow_element("br");
    builder = builder.allow_element_with("a", ElementPolicy::rel_nofollow());
    builder = builder.skip_if_empty("a", true);
    builder = builder.allow_attribute(
        "a",
        "href",
        AttributePolicy::url(["http", "https", "mailto"]),
    );
    builder = builder.allow_attribute(
        "img",
        "src",
        AttributePolicy::url(["http", "https"]),
    );
    builder = builder.allow_attribute("img", "alt", AttributePolicy::non_empty());
    builder = builder.allow_attribute("img", "width", AttributePolicy::numeric());
    builder = builder.allow_attribute("img", "height", AttributePolicy::numeric());
    builder = builder.allow_attribute("td", "colspan", AttributePolicy::numeric());
    builder = builder.allow_attribute("td", "rowspan", AttributePolicy::numeric());
    builder = global_attrs(builder);
    builder.build()
});

static NONE: Lazy<PolicyFactory> = Lazy::new(|| PolicyFactory::builder().build());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_strips_onclick_keeps_tag() {
        let out = FORMATTING
            .sanitize("<p>Hello, <b onclick=alert(1337)>World</b>!</p>")
            .unwrap();
        assert_eq!(out, "Hello, <b>World</b>!");
    }

    #[test]
    fn blocks_strips_p_attrs() {
        let out = BLOCKS
            .sanitize("<p onclick=alert(1337)>Hello, <b>World</b>!</p>")
            .unwrap();
        assert_eq!(out, "<p>Hello, World!</p>");
    }

    #[test]
    fn links_drops_javascript_href_and_empty_anchor() {
        let out = LINKS
            .sanitize(r#"<a href="javascript:alert(1337).html" onclick="alert(1337)">Link text</a>"#)
            .unwrap();
        assert_eq!(out, "Link text");
    }

    #[test]
    fn images_keeps_numeric_and_url_attrs() {
        let out = IMAGES
            .sanitize(r#"<img src="x.gif" alt="y" width=96 height=64 border=0>"#)
            .unwrap();
        assert_eq!(
            out,
            r#"<img src="x.gif" alt="y" width="96" height="64" border="0" />"#
        );
    }

    #[test]
    fn none_strips_every_tag_keeps_text() {
        let out = NONE.sanitize("<p>hi <b>there</b></p>").unwrap();
        assert_eq!(out, "hi there");
    }

    #[test]
    fn basic_allows_both_formatting_and_links() {
        let out = BASIC
            .sanitize(r#"<b>bold</b> <a href="http://example.com">link</a>"#)
            .unwrap();
        assert_eq!(
            out,
            r#"<b>bold</b> <a href="http://example.com" rel="nofollow">link</a>"#
        );
    }
}
