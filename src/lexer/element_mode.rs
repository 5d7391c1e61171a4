//! The element-escaping-mode table: for a canonical tag name, yields its
//! content model and void-ness.
//!
//! This is one of the two data tables the specification calls out as
//! "data, not design" in spirit (alongside the CSS schema/color tables) —
//! the *shape* (one of five content models) is specified, the entries are
//! the HTML5 living standard's own element list.

/// Content model of an element, controlling how the lexer treats text
/// between its open and close tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementTextMode {
    /// Ordinary parseable markup; children may contain further tags.
    Pcdata,
    /// Markup with entities recognized, but tags not parsed except the matching close tag (e.g. `textarea`, `title`).
    Rcdata,
    /// Raw until the matching close tag; neither tags nor entities are recognized inside (e.g. `script`, `style`).
    Cdata,
    /// Like `Cdata`, but the closing tag is still honored even though the
    /// content is not expected to contain markup in well-formed documents
    /// (reserved for elements whose browsers are lenient about, e.g. `noscript`
    /// when scripting is disabled). Distinguished from `Cdata` only for callers
    /// that want to special-case it; the lexer treats both identically.
    CdataSometimes,
    /// Raw to EOF; no closing tag is ever recognized (`plaintext`).
    PlainText,
    /// No children are ever accumulated; the element can never appear on the balancer stack.
    Void,
}

impl ElementTextMode {
    /// Whether this mode never recognizes a matching close tag at all (i.e. runs to EOF).
    #[must_use]
    pub fn is_plaintext(self) -> bool {
        matches!(self, Self::PlainText)
    }

    /// Whether the lexer should enter literal (tag-unaware) scanning after
    /// this element's start tag. True for every mode except `Pcdata`/`Void`:
    /// `Rcdata` still only recognizes its own matching close tag, it just
    /// differs from `Cdata` in whether entities inside remain meaningful
    /// (a policy-layer decoding decision, not a lexing one).
    #[must_use]
    pub fn is_raw(self) -> bool {
        matches!(
            self,
            Self::Cdata | Self::CdataSometimes | Self::PlainText | Self::Rcdata
        )
    }
}

/// Look up the [`ElementTextMode`] for a canonical (already-lowercased) tag name.
///
/// Unknown tag names default to `Pcdata`, matching ordinary HTML elements
/// and any custom/unknown element name — lenient default, since an unknown
/// element carries no special lexing hazard by itself.
#[must_use]
pub fn element_text_mode(canonical_name: &str) -> ElementTextMode {
    match canonical_name {
        "script" | "style" | "xmp" | "iframe" | "noembed" | "noframes" => ElementTextMode::Cdata,
        "noscript" => ElementTextMode::CdataSometimes,
        "textarea" | "title" => ElementTextMode::Rcdata,
        "plaintext" => ElementTextMode::PlainText,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
        | "param" | "source" | "track" | "wbr" | "basefont" | "bgsound" | "frame" | "keygen" => {
            ElementTextMode::Void
        }
        _ => ElementTextMode::Pcdata,
    }
}

/// Whether a canonical tag name is void (shorthand for
/// `element_text_mode(name) == ElementTextMode::Void`, exposed separately
/// because the balancer only cares about void-ness, not the full mode).
#[must_use]
pub fn is_void_element(canonical_name: &str) -> bool {
    element_text_mode(canonical_name) == ElementTextMode::Void
}
