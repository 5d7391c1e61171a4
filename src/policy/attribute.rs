//! `AttributePolicy`: a pure, composable value filter (spec §3, §4.7).
//!
//! Modeled as a small tagged union rather than a trait-object hierarchy
//! (spec §9 "deep inheritance → interfaces + composition"): `Identity` and
//! `RejectAll` are the join identity/absorbing elements, `Fn` wraps a
//! caller-supplied closure, and `Joined` composes two policies left to
//! right.

use ahash::AHashSet;
use std::rc::Rc;

/// A pure mapping `(element_name, attr_name, value) -> value?|reject`.
///
/// Cloning is cheap: closures are held behind an `Rc`, and `Joined` only
/// clones its two `Rc`-backed children.
#[derive(Clone)]
pub enum AttributePolicy {
    /// Passes every value through unchanged. The join identity.
    Identity,
    /// Rejects every value. The join absorbing element.
    RejectAll,
    /// A caller-supplied filter/transform.
    Fn(Rc<dyn Fn(&str, &str, &str) -> Option<String>>),
    /// `a` then `b`, left to right, fail-fast (spec §4.7).
    Joined(Rc<AttributePolicy>, Rc<AttributePolicy>),
}

impl std::fmt::Debug for AttributePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identity => f.write_str("AttributePolicy::Identity"),
            Self::RejectAll => f.write_str("AttributePolicy::RejectAll"),
            Self::Fn(_) => f.write_str("AttributePolicy::Fn(..)"),
            Self::Joined(..) => f.write_str("AttributePolicy::Joined(..)"),
        }
    }
}

impl AttributePolicy {
    /// Build a policy from a plain closure.
    pub fn from_fn(f: impl Fn(&str, &str, &str) -> Option<String> + 'static) -> Self {
        Self::Fn(Rc::new(f))
    }

    /// Apply this policy to one attribute occurrence. Returns the
    /// (possibly rewritten) value, or `None` if the attribute should be
    /// dropped.
    #[must_use]
    pub fn apply(&self, element_name: &str, attr_name: &str, value: &str) -> Option<String> {
        match self {
            Self::Identity => Some(value.to_string()),
            Self::RejectAll => None,
            Self::Fn(f) => f(element_name, attr_name, value),
            Self::Joined(a, b) => {
                let mid = a.apply(element_name, attr_name, value)?;
                b.apply(element_name, attr_name, &mid)
            }
        }
    }

    /// Compose `a` then `b`, preserving identity/absorbing semantics
    /// (spec §4.7): `join(IDENTITY, x) == x`, `join(x, REJECT_ALL) ==
    /// REJECT_ALL`, `join(REJECT_ALL, x) == REJECT_ALL`.
    #[must_use]
    pub fn join(a: Self, b: Self) -> Self {
        match (a, b) {
            (Self::Identity, b) => b,
            (a, Self::Identity) => a,
            (Self::RejectAll, _) | (_, Self::RejectAll) => Self::RejectAll,
            (a, b) => Self::Joined(Rc::new(a), Rc::new(b)),
        }
    }

    /// Accept only values present (case-sensitively) in `allowed`.
    #[must_use]
    pub fn literal_allowlist(allowed: impl IntoIterator<Item = &'static str>) -> Self {
        let set: AHashSet<&'static str> = allowed.into_iter().collect();
        Self::from_fn(move |_elem, _attr, value| set.contains(value).then(|| value.to_string()))
    }

    /// Accept any non-empty value (a permissive catch-all for attributes
    /// like `alt`, `title` that are free text but must not be empty).
    #[must_use]
    pub fn non_empty() -> Self {
        Self::from_fn(|_elem, _attr, value| (!value.is_empty()).then(|| value.to_string()))
    }

    /// Accept any value matching one of the given `regex`-free prefixes,
    /// used for e.g. numeric attributes (`width="96"`).
    #[must_use]
    pub fn numeric() -> Self {
        Self::from_fn(|_elem, _attr, value| {
            value
                .trim()
                .parse::<i64>()
                .ok()
                .map(|n| n.to_string())
        })
    }

    /// The URL attribute policy (spec §4.8): find the first `:`/`/`/`#`/`?`
    /// in the value; if the first such character is `:`, the lower-cased
    /// prefix up to it must be in `allowed_protocols`, otherwise the value
    /// is treated as relative and accepted outright. Control characters are
    /// percent-encoded before the value is accepted.
    #[must_use]
    pub fn url(allowed_protocols: impl IntoIterator<Item = &'static str>) -> Self {
        let protocols: AHashSet<&'static str> = allowed_protocols.into_iter().collect();
        Self::from_fn(move |_elem, _attr, value| {
            let trimmed = value.trim();
            if let Some(protocol) = leading_protocol(trimmed) {
                if !protocols.contains(protocol.to_ascii_lowercase().as_str()) {
                    return None;
                }
            }
            Some(percent_encode_controls(trimmed))
        })
    }
}

/// Find the scheme prefix of a URL-like string per spec §4.8: scan for the
/// first of `:`, `/`, `#`, `?`; if it's `:`, return the prefix before it.
fn leading_protocol(value: &str) -> Option<&str> {
    let stop = value.find([':', '/', '#', '?'])?;
    (value.as_bytes()[stop] == b':').then(|| &value[..stop])
}

/// Percent-encode ASCII control characters (and space) so a URL attribute
/// value can't smuggle a newline/CR into a header-sensitive consumer.
fn percent_encode_controls(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_control() || byte == b' ' {
            out.push_str(&format!("%{byte:02X}"));
        } else {
            out.push(byte as char);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_join_identity() {
        let p = AttributePolicy::literal_allowlist(["x"]);
        let joined = AttributePolicy::join(AttributePolicy::Identity, p.clone());
        assert_eq!(joined.apply("a", "b", "x"), p.apply("a", "b", "x"));
    }

    #[test]
    fn reject_all_is_absorbing() {
        let p = AttributePolicy::literal_allowlist(["x"]);
        let joined = AttributePolicy::join(p, AttributePolicy::RejectAll);
        assert_eq!(joined.apply("a", "b", "x"), None);
    }

    #[test]
    fn url_allows_relative_and_gates_scheme() {
        let policy = AttributePolicy::url(["http", "https"]);
        assert_eq!(
            policy.apply("a", "href", "/relative"),
            Some("/relative".to_string())
        );
        assert_eq!(
            policy.apply("a", "href", "https://example.com"),
            Some("https://example.com".to_string())
        );
        assert_eq!(policy.apply("a", "href", "javascript:alert(1)"), None);
    }

    #[test]
    fn url_percent_encodes_controls() {
        let policy = AttributePolicy::url(["http"]);
        let result = policy.apply("a", "href", "http://x\ty").unwrap();
        assert_eq!(result, "http://x%09y");
    }

    #[test]
    fn url_percent_encodes_interior_spaces() {
        let policy = AttributePolicy::url(["http"]);
        let result = policy.apply("a", "href", "http://x y").unwrap();
        assert_eq!(result, "http://x%20y");
    }

    #[test]
    fn join_chains_fail_fast() {
        let never_b = AttributePolicy::from_fn(|_, _, _| None);
        let joined = AttributePolicy::join(AttributePolicy::Identity, never_b);
        assert_eq!(joined.apply("a", "b", "x"), None);
    }
}
