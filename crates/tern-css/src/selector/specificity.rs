use core::fmt;
use core::ops::Add;

use super::{CompoundSelector, Selector, SelectorGroup, SimpleSelector};

/// Selector specificity as `(ids, classes, types)`.
///
/// [§ 17 Calculating a selector's specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
///
/// Ids count in the first component. Classes, attribute tests and
/// pseudo-classes count in the second, and type selectors in the third. The
/// universal selector counts nowhere. Ordering is lexicographic, which the
/// derived [`Ord`] gives for free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a new specificity value.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }
}

impl Add for Specificity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(
            self.0.saturating_add(rhs.0),
            self.1.saturating_add(rhs.1),
            self.2.saturating_add(rhs.2),
        )
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.0, self.1, self.2)
    }
}

impl SimpleSelector {
    /// Specificity contributed by this simple selector alone.
    #[must_use]
    pub const fn specificity(&self) -> Specificity {
        match self {
            Self::Id(_) => Specificity(1, 0, 0),
            Self::Class(_) | Self::Attribute(_) | Self::PseudoClass(_) => Specificity(0, 1, 0),
            Self::Type(_) => Specificity(0, 0, 1),
            Self::Universal => Specificity(0, 0, 0),
        }
    }
}

impl CompoundSelector {
    /// Sum of the specificities of the simple selectors.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        self.simple_selectors
            .iter()
            .map(SimpleSelector::specificity)
            .fold(Specificity::default(), Add::add)
    }
}

impl Selector {
    /// Specificity of the whole selector: a combinator adds the specificity
    /// of its two sides.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        match self {
            Self::Compound(compound) => compound.specificity(),
            Self::Combinator { left, right, .. } => left.specificity() + right.specificity(),
        }
    }
}

impl SelectorGroup {
    /// The specificity of each member, in order. A group has no single
    /// specificity: the cascade uses the member that matched.
    #[must_use]
    pub fn specificities(&self) -> Vec<Specificity> {
        self.selectors.iter().map(Selector::specificity).collect()
    }
}
