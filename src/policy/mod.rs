//! The policy engine: composable attribute/element filters (spec §3,
//! §4.7), the immutable [`PolicyFactory`] they're collected into, and the
//! stateful [`Policy`] that drives one sanitizing pass (spec §4.5).

mod attribute;
mod element;
mod factory;
mod glue;
mod styling;

pub use attribute::AttributePolicy;
pub use element::{AttrList, ElementPolicy};
pub use factory::{Builder, ElementAndAttributePolicies, PolicyFactory};
pub use glue::Policy;
