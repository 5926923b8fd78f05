use std::collections::BTreeSet;

use crate::error::UnknownSelectorKind;

/// The set of pseudo-class names a host understands.
///
/// The default registry is permissive and accepts every name. Once any name
/// is registered, the parser reports others as [`UnknownSelectorKind`]
/// warnings. The selector is still built and simply never matches unless
/// the model reports that state.
///
/// Each host owns its own registry, so two engines in one process can
/// recognise different names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorRegistry {
    pseudo_classes: Option<BTreeSet<String>>,
}

impl SelectorRegistry {
    /// A registry that accepts every pseudo-class name.
    #[must_use]
    pub fn permissive() -> Self {
        Self::default()
    }

    /// A registry that accepts exactly `names`.
    #[must_use]
    pub fn with_pseudo_classes<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pseudo_classes: Some(names.into_iter().map(Into::into).collect()),
        }
    }

    /// Add a known pseudo-class. A permissive registry becomes restrictive.
    pub fn register_pseudo_class(&mut self, name: impl Into<String>) -> &mut Self {
        let _ = self
            .pseudo_classes
            .get_or_insert_with(BTreeSet::new)
            .insert(name.into());
        self
    }

    /// Whether `name` is accepted.
    #[must_use]
    pub fn knows_pseudo_class(&self, name: &str) -> bool {
        self.pseudo_classes
            .as_ref()
            .is_none_or(|names| names.contains(name))
    }

    /// Whether the registry accepts every name.
    #[must_use]
    pub const fn is_permissive(&self) -> bool {
        self.pseudo_classes.is_none()
    }

    /// Check `name` (found at `offset`) against the registry.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownSelectorKind`] when the registry is restrictive and
    /// does not contain `name`.
    pub fn check_pseudo_class(&self, name: &str, offset: usize) -> Result<(), UnknownSelectorKind> {
        if self.knows_pseudo_class(name) {
            Ok(())
        } else {
            Err(UnknownSelectorKind {
                kind: "pseudo-class",
                name: name.to_string(),
                offset,
            })
        }
    }
}
