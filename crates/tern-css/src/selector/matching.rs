//! Selector matching against a [`SelectorModel`].
//!
//! Matching walks a selector right to left: the right side of a combinator
//! is matched first, then the combinator moves from that element to the
//! related one (parent, ancestor, previous sibling) and tests the left
//! compound there.
//!
//! [`Selector::match_element`] returns the element where the left-most
//! compound matched, not the subject. For `A > B` matched on a `B` the
//! result is its parent `A`. Callers that only need a yes/no use
//! [`Selector::matches`].
//!
//! The descendant and general-sibling combinators take the nearest
//! qualifying element and do not backtrack: in `A B C`, once the nearest
//! `B` ancestor is found, `A` must be one of *its* ancestors.

use std::iter::successors;

use super::{
    AttributeSelector, CombinatorKind, CompoundSelector, Selector, SelectorGroup, SimpleSelector,
};
use crate::model::SelectorModel;

impl SimpleSelector {
    /// Whether `element` satisfies this simple selector.
    #[must_use]
    pub fn matches<E, M>(&self, model: &M, element: &E) -> bool
    where
        M: SelectorModel<E> + ?Sized,
    {
        match self {
            Self::Universal => true,
            Self::Type(name) => model.type_name(element) == name.as_str(),
            Self::Id(id) => model.has_id(element, id),
            Self::Class(class) => model.has_style_class(element, class),
            Self::PseudoClass(state) => model.has_pseudo_state(element, state),
            Self::Attribute(attr) => attr.matches(model, element),
        }
    }
}

impl AttributeSelector {
    /// Whether `element`'s attribute satisfies this test.
    #[must_use]
    pub fn matches<E, M>(&self, model: &M, element: &E) -> bool
    where
        M: SelectorModel<E> + ?Sized,
    {
        match self {
            Self::Exists(name) => model.attribute(element, None, name).is_some(),
            Self::Equals(name, value) => model
                .attribute(element, None, name)
                .is_some_and(|actual| actual == value.as_str()),
            Self::Prefix(name, prefix) => {
                model.attribute_value_starts_with(element, None, name, prefix)
            }
            Self::Suffix(name, suffix) => {
                model.attribute_value_ends_with(element, None, name, suffix)
            }
            Self::Substring(name, substring) => {
                model.attribute_value_contains(element, None, name, substring)
            }
            Self::Includes(name, word) => model
                .attribute(element, None, name)
                .is_some_and(|actual| actual.split_ascii_whitespace().any(|w| w == word)),
            Self::LangSubcode(name, value) => {
                model.attribute(element, None, name).is_some_and(|actual| {
                    actual == value.as_str()
                        || actual
                            .strip_prefix(value.as_str())
                            .is_some_and(|rest| rest.starts_with('-'))
                })
            }
        }
    }
}

impl CompoundSelector {
    /// Whether `element` satisfies every simple selector in the compound.
    #[must_use]
    pub fn matches<E, M>(&self, model: &M, element: &E) -> bool
    where
        M: SelectorModel<E> + ?Sized,
    {
        self.simple_selectors
            .iter()
            .all(|simple| simple.matches(model, element))
    }
}

impl Selector {
    /// Match against `element` and return the element where the left-most
    /// compound matched, or `None` if the selector does not match.
    ///
    /// For a plain compound that is `element` itself. For a combinator it is
    /// the related element the combinator found (the parent for `>`, the
    /// nearest matching ancestor for a descendant combinator, and so on).
    ///
    /// [§ 18.4 Match a selector against an element](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    #[must_use]
    pub fn match_element<E, M>(&self, model: &M, element: &E) -> Option<E>
    where
        E: Clone,
        M: SelectorModel<E> + ?Sized,
    {
        match self {
            Self::Compound(compound) => compound
                .matches(model, element)
                .then(|| element.clone()),
            Self::Combinator { kind, left, right } => {
                let matched = right.match_element(model, element)?;
                match kind {
                    CombinatorKind::Child => model
                        .parent(&matched)
                        .filter(|parent| left.matches(model, parent)),
                    CombinatorKind::Descendant => {
                        successors(model.parent(&matched), |e| model.parent(e))
                            .find(|ancestor| left.matches(model, ancestor))
                    }
                    CombinatorKind::AdjacentSibling => model
                        .previous_sibling(&matched)
                        .filter(|sibling| left.matches(model, sibling)),
                    CombinatorKind::GeneralSibling => {
                        successors(model.previous_sibling(&matched), |e| {
                            model.previous_sibling(e)
                        })
                        .find(|sibling| left.matches(model, sibling))
                    }
                }
            }
        }
    }

    /// Whether the selector matches `element`.
    #[must_use]
    pub fn matches<E, M>(&self, model: &M, element: &E) -> bool
    where
        E: Clone,
        M: SelectorModel<E> + ?Sized,
    {
        self.match_element(model, element).is_some()
    }
}

impl SelectorGroup {
    /// Return the first member selector that matches `element`, together
    /// with the element it matched (see [`Selector::match_element`]).
    #[must_use]
    pub fn match_element<E, M>(&self, model: &M, element: &E) -> Option<(&Selector, E)>
    where
        E: Clone,
        M: SelectorModel<E> + ?Sized,
    {
        self.selectors.iter().find_map(|selector| {
            selector
                .match_element(model, element)
                .map(|matched| (selector, matched))
        })
    }

    /// Whether any member selector matches `element`.
    #[must_use]
    pub fn matches<E, M>(&self, model: &M, element: &E) -> bool
    where
        E: Clone,
        M: SelectorModel<E> + ?Sized,
    {
        self.match_element(model, element).is_some()
    }
}
