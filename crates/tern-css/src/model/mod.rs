//! The adapter between the engine and a host element tree.
//!
//! The engine never owns elements. Everything it needs to know about one is
//! asked through [`SelectorModel`], so any tree (a DOM, a scene graph, a
//! widget hierarchy) can be styled by implementing these few queries.
//!
//! Element handles are passed by reference and cloned when the engine needs
//! to hold on to one (for example the element a combinator matched), so
//! handles should be cheap to clone: an index, an `Rc`, a small id.

use std::borrow::Cow;

mod dom;

/// Queries the engine asks of a host element tree.
///
/// Only element nodes should ever be returned: `parent` and
/// `previous_sibling` skip (or stop at) non-element nodes, and `parent`
/// returns `None` at the top of the element tree.
pub trait SelectorModel<E> {
    /// The parent element, or `None` for a root element.
    fn parent(&self, element: &E) -> Option<E>;

    /// The nearest preceding sibling element, or `None` for a first child.
    fn previous_sibling(&self, element: &E) -> Option<E>;

    /// Child elements in document order. Used to walk subtrees; never
    /// consulted by selector matching itself.
    fn children(&self, element: &E) -> Vec<E>;

    /// The element's type name, compared case-sensitively with type
    /// selectors.
    fn type_name(&self, element: &E) -> Cow<'_, str>;

    /// Whether the element's id is `id`.
    fn has_id(&self, element: &E, id: &str) -> bool;

    /// Whether the element carries the style class `class`.
    fn has_style_class(&self, element: &E, class: &str) -> bool;

    /// Whether the element is currently in the pseudo state `state`.
    fn has_pseudo_state(&self, element: &E, state: &str) -> bool;

    /// The value of an attribute, or `None` if it is absent.
    ///
    /// Selectors never carry a namespace, so the engine always passes
    /// `None`; hosts with namespaced attributes may use it for their own
    /// lookups.
    fn attribute(&self, element: &E, namespace: Option<&str>, name: &str) -> Option<Cow<'_, str>>;

    /// Whether the attribute is present and starts with `prefix`.
    fn attribute_value_starts_with(
        &self,
        element: &E,
        namespace: Option<&str>,
        name: &str,
        prefix: &str,
    ) -> bool {
        self.attribute(element, namespace, name)
            .is_some_and(|value| value.starts_with(prefix))
    }

    /// Whether the attribute is present and ends with `suffix`.
    fn attribute_value_ends_with(
        &self,
        element: &E,
        namespace: Option<&str>,
        name: &str,
        suffix: &str,
    ) -> bool {
        self.attribute(element, namespace, name)
            .is_some_and(|value| value.ends_with(suffix))
    }

    /// Whether the attribute is present and contains `substring`.
    fn attribute_value_contains(
        &self,
        element: &E,
        namespace: Option<&str>,
        name: &str,
        substring: &str,
    ) -> bool {
        self.attribute(element, namespace, name)
            .is_some_and(|value| value.contains(substring))
    }
}
