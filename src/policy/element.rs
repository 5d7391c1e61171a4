//! `ElementPolicy`: a composable tag rewrite (spec §3, §4.7).
//!
//! Same shape as [`AttributePolicy`](super::attribute::AttributePolicy):
//! `Identity`/`RejectAll` as join identity/absorbing element, a closure
//! variant, and left-to-right `Joined` composition. The closure may mutate
//! the attribute list in place (spec §9 "mutation of attribute lists") and
//! returns the adjusted element name, or `None` to reject the whole tag.

use std::rc::Rc;

/// The flat, alternating `(name, value)` attribute list an `ElementPolicy`
/// receives and may mutate.
pub type AttrList = Vec<(String, String)>;

/// `(element_name, &mut attrs) -> adjusted_name?|reject`.
#[derive(Clone)]
pub enum ElementPolicy {
    /// Keeps the element name and attribute list unchanged. The join identity.
    Identity,
    /// Rejects the element outright. The join absorbing element.
    RejectAll,
    /// A caller-supplied rewrite.
    Fn(Rc<dyn Fn(&str, &mut AttrList) -> Option<String>>),
    /// `a` then `b`, left to right (spec §4.7).
    Joined(Rc<ElementPolicy>, Rc<ElementPolicy>),
}

impl std::fmt::Debug for ElementPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identity => f.write_str("ElementPolicy::Identity"),
            Self::RejectAll => f.write_str("ElementPolicy::RejectAll"),
            Self::Fn(_) => f.write_str("ElementPolicy::Fn(..)"),
            Self::Joined(..) => f.write_str("ElementPolicy::Joined(..)"),
        }
    }
}

impl ElementPolicy {
    /// Build a policy from a plain closure.
    pub fn from_fn(f: impl Fn(&str, &mut AttrList) -> Option<String> + 'static) -> Self {
        Self::Fn(Rc::new(f))
    }

    /// Apply this policy, possibly mutating `attrs` in place. Returns the
    /// adjusted (already lower-case) element name, or `None` to reject.
    #[must_use]
    pub fn apply(&self, element_name: &str, attrs: &mut AttrList) -> Option<String> {
        match self {
            Self::Identity => Some(element_name.to_string()),
            Self::RejectAll => None,
            Self::Fn(f) => f(element_name, attrs).map(|name| name.to_ascii_lowercase()),
            Self::Joined(a, b) => {
                let adjusted = a.apply(element_name, attrs)?;
                b.apply(&adjusted, attrs)
            }
        }
    }

    /// Compose `a` then `b` (spec §4.7), with the same identity/absorbing
    /// shortcuts as [`AttributePolicy::join`](super::attribute::AttributePolicy::join).
    #[must_use]
    pub fn join(a: Self, b: Self) -> Self {
        match (a, b) {
            (Self::Identity, b) => b,
            (a, Self::Identity) => a,
            (Self::RejectAll, _) | (_, Self::RejectAll) => Self::RejectAll,
            (a, b) => Self::Joined(Rc::new(a), Rc::new(b)),
        }
    }

    /// Rename the element to `new_name`, leaving attributes untouched.
    #[must_use]
    pub fn rename(new_name: &'static str) -> Self {
        Self::from_fn(move |_name, _attrs| Some(new_name.to_string()))
    }

    /// Rel-nofollow rewrite (spec glossary): if the element carries an
    /// `href` attribute, ensure a `rel` attribute is present and includes
    /// `nofollow` (appending to an existing `rel` value rather than
    /// clobbering it).
    #[must_use]
    pub fn rel_nofollow() -> Self {
        Self::from_fn(|name, attrs| {
            let has_href = attrs.iter().any(|(k, _)| k == "href");
            if has_href {
                if let Some((_, rel)) = attrs.iter_mut().find(|(k, _)| k == "rel") {
                    if !rel.split_ascii_whitespace().any(|tok| tok == "nofollow") {
                        if rel.is_empty() {
                            *rel = "nofollow".to_string();
                        } else {
                            rel.push_str(" nofollow");
                        }
                    }
                } else {
                    attrs.push(("rel".to_string(), "nofollow".to_string()));
                }
            }
            Some(name.to_string())
        })
    }

    /// Unconditionally set an attribute to a fixed value, overwriting any
    /// existing occurrence (matches the teacher's `set_tag_attributes`).
    #[must_use]
    pub fn set_attribute(attr_name: &'static str, attr_value: &'static str) -> Self {
        Self::from_fn(move |name, attrs| {
            if let Some((_, v)) = attrs.iter_mut().find(|(k, _)| k == attr_name) {
                *v = attr_value.to_string();
            } else {
                attrs.push((attr_name.to_string(), attr_value.to_string()));
            }
            Some(name.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rel_nofollow_appends_to_existing_rel() {
        let policy = ElementPolicy::rel_nofollow();
        let mut attrs = vec![
            ("href".to_string(), "http://x".to_string()),
            ("rel".to_string(), "external".to_string()),
        ];
        let name = policy.apply("a", &mut attrs).unwrap();
        assert_eq!(name, "a");
        assert_eq!(
            attrs,
            vec![
                ("href".to_string(), "http://x".to_string()),
                ("rel".to_string(), "external nofollow".to_string()),
            ]
        );
    }

    #[test]
    fn rel_nofollow_skips_without_href() {
        let policy = ElementPolicy::rel_nofollow();
        let mut attrs = vec![("name".to_string(), "x".to_string())];
        policy.apply("a", &mut attrs).unwrap();
        assert_eq!(attrs, vec![("name".to_string(), "x".to_string())]);
    }

    #[test]
    fn join_composes_renames() {
        let policy = ElementPolicy::join(
            ElementPolicy::rename("b"),
            ElementPolicy::set_attribute("data-from", "rename"),
        );
        let mut attrs = vec![];
        let name = policy.apply("strong", &mut attrs).unwrap();
        assert_eq!(name, "b");
        assert_eq!(attrs, vec![("data-from".to_string(), "rename".to_string())]);
    }

    #[test]
    fn reject_all_absorbs() {
        let policy = ElementPolicy::join(ElementPolicy::rename("b"), ElementPolicy::RejectAll);
        let mut attrs = vec![];
        assert_eq!(policy.apply("strong", &mut attrs), None);
    }
}
