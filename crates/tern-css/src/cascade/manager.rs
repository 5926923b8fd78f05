use std::cell::Cell;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::StyleError;
use crate::model::SelectorModel;
use crate::parser::{RuleSet, parse_declarations};
use crate::style::StyleableMap;

use super::cascade;

/// Applies a [`RuleSet`] to elements.
///
/// The rule set is shared behind an [`Arc`] and never mutated. Hosts swap
/// in a new one with [`replace_rules`](Self::replace_rules).
///
/// A manager is single-threaded. Starting a style pass from inside another
/// (for example from a model callback) fails with
/// [`StyleError::Reentrant`] instead of corrupting the pass in progress.
#[derive(Debug)]
pub struct StyleManager {
    rules: Arc<RuleSet>,
    inline_style_attribute: Option<String>,
    styling: Cell<bool>,
}

/// Clears the re-entrancy flag when a style pass ends, including by panic.
struct StylingGuard<'a>(&'a Cell<bool>);

impl Drop for StylingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl StyleManager {
    /// Create a manager for `rules`.
    #[must_use]
    pub fn new(rules: impl Into<Arc<RuleSet>>) -> Self {
        Self {
            rules: rules.into(),
            inline_style_attribute: None,
            styling: Cell::new(false),
        }
    }

    /// Read inline declarations from the attribute `name` of each element
    /// (typically `"style"`) and apply them at inline origin.
    #[must_use]
    pub fn with_inline_style_attribute(mut self, name: impl Into<String>) -> Self {
        self.inline_style_attribute = Some(name.into());
        self
    }

    /// The current rule set.
    #[must_use]
    pub const fn rules(&self) -> &Arc<RuleSet> {
        &self.rules
    }

    /// Swap in a new rule set, returning the old one.
    pub fn replace_rules(&mut self, rules: impl Into<Arc<RuleSet>>) -> Arc<RuleSet> {
        let rules = rules.into();
        log::debug!(target: "tern::cascade", "replacing rule set ({} rule(s))", rules.len());
        std::mem::replace(&mut self.rules, rules)
    }

    /// Whether a style pass is running.
    #[must_use]
    pub const fn is_styling(&self) -> bool {
        self.styling.get()
    }

    /// Compute the style of one element into `map`. Returns the names of the
    /// properties written.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::Reentrant`] if called during another pass.
    pub fn style_element<E, M>(
        &self,
        model: &M,
        element: &E,
        map: &mut StyleableMap<String, String>,
    ) -> Result<Vec<String>, StyleError>
    where
        E: Clone,
        M: SelectorModel<E> + ?Sized,
    {
        let _guard = self.enter()?;
        Ok(self.apply(model, element, map))
    }

    /// Style `root` and every element below it, depth first. Each element's
    /// map in `maps` is created if missing and updated in place. Returns the
    /// number of elements styled.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::Reentrant`] if called during another pass.
    pub fn style_subtree<E, M>(
        &self,
        model: &M,
        root: &E,
        maps: &mut HashMap<E, StyleableMap<String, String>>,
    ) -> Result<usize, StyleError>
    where
        E: Clone + Eq + Hash,
        M: SelectorModel<E> + ?Sized,
    {
        let _guard = self.enter()?;
        let mut stack = vec![root.clone()];
        let mut styled = 0;
        while let Some(element) = stack.pop() {
            let map = maps.entry(element.clone()).or_default();
            let _ = self.apply(model, &element, map);
            styled += 1;
            // Reversed so children are visited in document order.
            stack.extend(model.children(&element).into_iter().rev());
        }
        log::debug!(target: "tern::cascade", "styled {styled} element(s)");
        Ok(styled)
    }

    fn enter(&self) -> Result<StylingGuard<'_>, StyleError> {
        if self.styling.replace(true) {
            log::warn!(target: "tern::cascade", "re-entrant style pass rejected");
            return Err(StyleError::Reentrant);
        }
        Ok(StylingGuard(&self.styling))
    }

    fn apply<E, M>(
        &self,
        model: &M,
        element: &E,
        map: &mut StyleableMap<String, String>,
    ) -> Vec<String>
    where
        E: Clone,
        M: SelectorModel<E> + ?Sized,
    {
        let Some(attribute) = &self.inline_style_attribute else {
            return cascade(model, element, &self.rules, None, map);
        };
        let inline = match model.attribute(element, None, attribute) {
            Some(text) => {
                let (declarations, errors) = parse_declarations(&text);
                for error in &errors {
                    log::warn!(target: "tern::cascade", "inline style: {}", error.error);
                }
                declarations
            }
            None => Vec::new(),
        };
        cascade(model, element, &self.rules, Some(inline.as_slice()), map)
    }
}
