//! `ElementAndAttributePolicies` and `PolicyFactory` (spec §3, §4.7): the
//! per-tag bundle and the full, immutable, process-lifetime-shareable
//! policy they're collected into.

use super::attribute::AttributePolicy;
use super::element::ElementPolicy;
use crate::lexer::is_void_element;
use crate::sink::{Sink, StringSink};
use crate::{Policy, SanitizeError};
use ahash::{AHashMap, AHashSet};

/// Per-element bundle: its rewrite policy, its per-attribute policies, and
/// the `skip_if_empty` flag (spec glossary).
#[derive(Clone, Debug)]
pub struct ElementAndAttributePolicies {
    pub(crate) element_name: String,
    pub(crate) element_policy: ElementPolicy,
    pub(crate) attr_policies: AHashMap<String, AttributePolicy>,
    pub(crate) skip_if_empty: bool,
    pub(crate) is_void: bool,
}

/// A fully built, immutable sanitization policy (spec §3 `PolicyFactory`).
///
/// Safe to share across calls/threads once built (spec §5); `apply` and
/// `sanitize` are reentrant.
#[derive(Clone, Debug)]
pub struct PolicyFactory {
    pub(crate) elements: AHashMap<String, ElementAndAttributePolicies>,
    pub(crate) allow_styling: bool,
    pub(crate) allowed_text_containers: AHashSet<String>,
}

impl PolicyFactory {
    /// Start building a policy.
    #[must_use]
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Look up the bundle for a canonical element name.
    #[must_use]
    pub fn element(&self, name: &str) -> Option<&ElementAndAttributePolicies> {
        self.elements.get(name)
    }

    /// Whether `style` attributes are sanitized/converted (spec §4.9).
    #[must_use]
    pub fn allow_styling(&self) -> bool {
        self.allow_styling
    }

    /// Whether `name` is one of the caller-configured "allowed text
    /// container" elements (spec §4.5's CDATA-in-text recovery gate).
    #[must_use]
    pub fn allows_text_in(&self, name: &str) -> bool {
        self.allowed_text_containers.contains(name)
    }

    /// Bind this policy to a live `sink`, producing a stateful,
    /// single-use [`Policy`].
    #[must_use]
    pub fn apply<S: Sink>(&self, sink: S) -> Policy<'_, S> {
        Policy::new(self, sink)
    }

    /// Convenience: sanitize `html` into a `String` using an internal
    /// [`StringSink`].
    ///
    /// # Errors
    ///
    /// Returns [`SanitizeError`] only if the internal sink raised a fatal
    /// error, which [`StringSink`] never does — in practice this is
    /// infallible for the built-in sink, but the signature stays a
    /// `Result` so custom sinks compose through the same entry point.
    pub fn sanitize(&self, html: &str) -> Result<String, SanitizeError> {
        let mut policy = self.apply(StringSink::new());
        policy.run(html)?;
        Ok(policy.into_sink().into_inner())
    }

    /// Combine `self` and `other` by elementwise intersection (spec §4.7
    /// `PolicyFactory.and`): an element/attribute survives only if both
    /// factories allow it, with their policies joined; `skip_if_empty` is
    /// ANDed, `allow_styling` is ORed, and allowed-text-container sets are
    /// unioned.
    #[must_use]
    pub fn and(&self, other: &PolicyFactory) -> PolicyFactory {
        let mut elements = AHashMap::default();

        for (name, a) in &self.elements {
            let Some(b) = other.elements.get(name) else {
                continue;
            };

            let mut attr_policies = AHashMap::default();
            for (attr_name, pa) in &a.attr_policies {
                if let Some(pb) = b.attr_policies.get(attr_name) {
                    attr_policies.insert(
                        attr_name.clone(),
                        AttributePolicy::join(pa.clone(), pb.clone()),
                    );
                }
            }

            elements.insert(
                name.clone(),
                ElementAndAttributePolicies {
                    element_name: name.clone(),
                    element_policy: ElementPolicy::join(
                        a.element_policy.clone(),
                        b.element_policy.clone(),
                    ),
                    attr_policies,
                    skip_if_empty: a.skip_if_empty && b.skip_if_empty,
                    is_void: a.is_void,
                },
            );
        }

        PolicyFactory {
            elements,
            allow_styling: self.allow_styling || other.allow_styling,
            allowed_text_containers: self
                .allowed_text_containers
                .union(&other.allowed_text_containers)
                .cloned()
                .collect(),
        }
    }
}

/// Builder for a [`PolicyFactory`] (spec §9's minimal constructor surface
/// for the core; not a reimplementation of AntiSamy's fluent
/// `PolicyBuilder` syntactic sugar, which is explicitly out of scope).
#[derive(Default)]
pub struct Builder {
    elements: AHashMap<String, ElementAndAttributePolicies>,
    global_attrs: Vec<(String, AttributePolicy)>,
    allow_styling: bool,
    allowed_text_containers: AHashSet<String>,
}

impl Builder {
    /// Allow `name` through unchanged (`ElementPolicy::Identity`), with no
    /// attributes allowed yet — chain `attribute` calls to add some.
    #[must_use]
    pub fn allow_element(self, name: &str) -> Self {
        self.allow_element_with(name, ElementPolicy::Identity)
    }

    /// Allow `name`, rewritten by `element_policy`.
    #[must_use]
    pub fn allow_element_with(mut self, name: &str, element_policy: ElementPolicy) -> Self {
        let canonical = name.to_ascii_lowercase();
        self.elements
            .entry(canonical.clone())
            .or_insert_with(|| ElementAndAttributePolicies {
                element_name: canonical.clone(),
                element_policy: ElementPolicy::Identity,
                attr_policies: AHashMap::default(),
                skip_if_empty: false,
                is_void: is_void_element(&canonical),
            })
            .element_policy = element_policy;
        self
    }

    /// Set the `skip_if_empty` flag for a previously-allowed element (spec
    /// glossary "skip-if-empty").
    ///
    /// # Panics
    ///
    /// Panics if `name` hasn't been registered with [`Self::allow_element`]
    /// or [`Self::allow_element_with`] yet — this mirrors a builder-misuse
    /// programmer error, not a sanitization-time condition.
    #[must_use]
    pub fn skip_if_empty(mut self, name: &str, skip: bool) -> Self {
        let canonical = name.to_ascii_lowercase();
        self.elements
            .get_mut(&canonical)
            .unwrap_or_else(|| panic!("allow_element(\"{canonical}\") must precede skip_if_empty"))
            .skip_if_empty = skip;
        self
    }

    /// Allow `attr` on `element` (which must already have been registered),
    /// filtered by `policy`.
    ///
    /// # Panics
    ///
    /// Panics if `element` hasn't been registered yet.
    #[must_use]
    pub fn allow_attribute(mut self, element: &str, attr: &str, policy: AttributePolicy) -> Self {
        let canonical = element.to_ascii_lowercase();
        self.elements
            .get_mut(&canonical)
            .unwrap_or_else(|| panic!("allow_element(\"{canonical}\") must precede allow_attribute"))
            .attr_policies
            .insert(attr.to_ascii_lowercase(), policy);
        self
    }

    /// Allow `attr` on every element this builder ends up with (applied at
    /// [`Self::build`] time, so order relative to `allow_element` doesn't
    /// matter). A per-element policy for the same attribute name takes
    /// precedence over the global one.
    #[must_use]
    pub fn allow_global_attribute(mut self, attr: &str, policy: AttributePolicy) -> Self {
        self.global_attrs.push((attr.to_ascii_lowercase(), policy));
        self
    }

    /// Enable the styling variant (spec §4.9): `style` attributes are
    /// sanitized and, where configured, converted into a synthesized
    /// `<font>` child.
    #[must_use]
    pub fn allow_styling(mut self) -> Self {
        self.allow_styling = true;
        self
    }

    /// Mark `name` as an "allowed text container": raw CDATA/RCDATA text
    /// from a *disallowed* element nested immediately inside an emitted
    /// `name` is preserved (tag-stripped) rather than dropped outright
    /// (spec §4.5's CDATA-in-text recovery).
    #[must_use]
    pub fn allow_text_in(mut self, name: &str) -> Self {
        self.allowed_text_containers
            .insert(name.to_ascii_lowercase());
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(mut self) -> PolicyFactory {
        for bundle in self.elements.values_mut() {
            for (attr, policy) in &self.global_attrs {
                bundle
                    .attr_policies
                    .entry(attr.clone())
                    .or_insert_with(|| policy.clone());
            }
        }

        PolicyFactory {
            elements: self.elements,
            allow_styling: self.allow_styling,
            allowed_text_containers: self.allowed_text_containers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_round_trips_basic_element() {
        let factory = PolicyFactory::builder()
            .allow_element("b")
            .allow_global_attribute("title", AttributePolicy::non_empty())
            .build();
        let bundle = factory.element("b").unwrap();
        assert_eq!(bundle.element_name, "b");
        assert!(bundle.attr_policies.contains_key("title"));
    }

    #[test]
    fn and_intersects_elements_and_attrs() {
        let a = PolicyFactory::builder()
            .allow_element("a")
            .allow_attribute("a", "href", AttributePolicy::url(["http", "https"]))
            .allow_attribute("a", "title", AttributePolicy::non_empty())
            .allow_element("b")
            .build();
        let b = PolicyFactory::builder()
            .allow_element("a")
            .allow_attribute("a", "href", AttributePolicy::url(["https"]))
            .build();

        let combined = a.and(&b);
        assert!(combined.element("a").is_some());
        assert!(combined.element("b").is_none());
        let bundle = combined.element("a").unwrap();
        assert!(bundle.attr_policies.contains_key("href"));
        assert!(!bundle.attr_policies.contains_key("title"));
    }

    #[test]
    #[should_panic(expected = "allow_element")]
    fn attribute_without_element_panics() {
        let _ = PolicyFactory::builder().allow_attribute("b", "title", AttributePolicy::non_empty());
    }
}
