//! Selector syntax tree, parsing, matching and specificity.
//!
//! A selector is either a single [`CompoundSelector`] or a combinator node
//! whose left side is a compound and whose right side is another selector.
//! `A > B C` therefore parses to
//! `Combinator(Child, A, Combinator(Descendant, B, Compound(C)))`:
//! the right-most compound is the subject and sits at the bottom of the
//! right spine.
//!
//! Every selector serializes (via [`Display`](core::fmt::Display)) to text
//! that parses back to an equal tree.

use core::fmt;

use strum_macros::{EnumIter, IntoStaticStr};

use crate::error::InvalidSelector;
use crate::tokenizer::{serialize_identifier, serialize_string};

mod matching;
mod parser;
mod registry;
mod specificity;

pub use parser::{SelectorParser, parse_selector, parse_selector_group};
pub use registry::SelectorRegistry;
pub use specificity::Specificity;

/// A single condition on an element.
///
/// [§ 3.1 Simple selector](https://www.w3.org/TR/selectors-4/#simple)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimpleSelector {
    /// `rect`: the element's type name equals the given name.
    ///
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    Type(String),
    /// `*`: matches every element.
    ///
    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    Universal,
    /// `#main`: the element has the given id.
    ///
    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    Id(String),
    /// `.selected`: the element carries the given style class.
    ///
    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    Class(String),
    /// `[attr...]`: a test on an attribute value.
    Attribute(AttributeSelector),
    /// `:hover`: the element is in the given pseudo state.
    ///
    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    PseudoClass(String),
}

impl SimpleSelector {
    /// Check that the selector can be written as text.
    fn validate(&self) -> Result<(), InvalidSelector> {
        match self {
            Self::Universal => Ok(()),
            Self::Type(name) | Self::Id(name) | Self::Class(name) | Self::PseudoClass(name) => {
                validate_name(name)
            }
            Self::Attribute(attr) => {
                validate_name(attr.name())?;
                if attr.value().is_some_and(|value| value.contains('\0')) {
                    return Err(InvalidSelector::NulCharacter);
                }
                Ok(())
            }
        }
    }

    const fn is_type_or_universal(&self) -> bool {
        matches!(self, Self::Type(_) | Self::Universal)
    }
}

fn validate_name(name: &str) -> Result<(), InvalidSelector> {
    if name.is_empty() {
        Err(InvalidSelector::EmptyName)
    } else if name.contains('\0') {
        Err(InvalidSelector::NulCharacter)
    } else {
        Ok(())
    }
}

/// Attribute tests per
/// [§ 6.1 Attribute presence and value selectors](https://www.w3.org/TR/selectors-4/#attribute-representation)
/// and [§ 6.2 Substring matching attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-substrings),
/// named after the operator they are written with.
///
/// Value comparisons are exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeSelector {
    /// [§ 6.1] `[name]`: the attribute is present.
    Exists(String),
    /// [§ 6.1] `[name=value]`: the attribute equals `value`.
    Equals(String, String),
    /// [§ 6.2] `[name^=value]`: the attribute starts with `value`.
    Prefix(String, String),
    /// [§ 6.2] `[name$=value]`: the attribute ends with `value`.
    Suffix(String, String),
    /// [§ 6.2] `[name*=value]`: the attribute contains `value`.
    Substring(String, String),
    /// [§ 6.1] `[name~=value]`: one of the attribute's whitespace-separated
    /// words is `value`.
    Includes(String, String),
    /// [§ 6.1] `[name|=value]`: the attribute is exactly `value` or starts
    /// with `value` followed by `-`.
    LangSubcode(String, String),
}

impl AttributeSelector {
    /// The attribute name being tested.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Exists(name)
            | Self::Equals(name, _)
            | Self::Prefix(name, _)
            | Self::Suffix(name, _)
            | Self::Substring(name, _)
            | Self::Includes(name, _)
            | Self::LangSubcode(name, _) => name,
        }
    }

    /// The operator as written in source, or `None` for [`Exists`](Self::Exists).
    #[must_use]
    pub const fn operator(&self) -> Option<&'static str> {
        match self {
            Self::Exists(_) => None,
            Self::Equals(..) => Some("="),
            Self::Prefix(..) => Some("^="),
            Self::Suffix(..) => Some("$="),
            Self::Substring(..) => Some("*="),
            Self::Includes(..) => Some("~="),
            Self::LangSubcode(..) => Some("|="),
        }
    }

    /// The comparison value, or `None` for [`Exists`](Self::Exists).
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Exists(_) => None,
            Self::Equals(_, value)
            | Self::Prefix(_, value)
            | Self::Suffix(_, value)
            | Self::Substring(_, value)
            | Self::Includes(_, value)
            | Self::LangSubcode(_, value) => Some(value),
        }
    }
}

/// A sequence of simple selectors with no combinator between them, all of
/// which must hold for the same element (`rect.selected:hover`).
///
/// [§ 3.1 Compound selector](https://www.w3.org/TR/selectors-4/#compound)
///
/// A compound is never empty, and a type or universal selector can only be
/// its first part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompoundSelector {
    simple_selectors: Vec<SimpleSelector>,
}

impl CompoundSelector {
    /// Create a compound selector from its parts, in source order.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidSelector`] if `simple_selectors` is empty, has a
    /// type or universal selector after the first position, or holds a name
    /// that could not be written as selector text.
    ///
    /// ```
    /// use tern_css::selector::{CompoundSelector, SimpleSelector};
    ///
    /// let ok = CompoundSelector::new(vec![
    ///     SimpleSelector::Type("rect".into()),
    ///     SimpleSelector::Class("a".into()),
    /// ]);
    /// assert_eq!(ok.unwrap().to_string(), "rect.a");
    ///
    /// let misplaced = CompoundSelector::new(vec![
    ///     SimpleSelector::Class("a".into()),
    ///     SimpleSelector::Type("rect".into()),
    /// ]);
    /// assert!(misplaced.is_err());
    /// ```
    pub fn new(simple_selectors: Vec<SimpleSelector>) -> Result<Self, InvalidSelector> {
        let Some((first, rest)) = simple_selectors.split_first() else {
            return Err(InvalidSelector::EmptyCompound);
        };
        if rest.iter().any(SimpleSelector::is_type_or_universal) {
            return Err(InvalidSelector::MisplacedTypeSelector);
        }
        first.validate()?;
        for simple in rest {
            simple.validate()?;
        }
        Ok(Self { simple_selectors })
    }

    /// The simple selectors, in source order.
    #[must_use]
    pub fn simple_selectors(&self) -> &[SimpleSelector] {
        &self.simple_selectors
    }
}

/// The relationship a combinator requires between two elements.
///
/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum CombinatorKind {
    /// `A > B`: A is the parent of B.
    ///
    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    Child,
    /// `A B`: A is an ancestor of B.
    ///
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    Descendant,
    /// `A + B`: A is the immediately preceding sibling of B.
    ///
    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    AdjacentSibling,
    /// `A ~ B`: A is some preceding sibling of B.
    ///
    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    GeneralSibling,
}

impl CombinatorKind {
    /// The combinator as it is written between two compounds.
    #[must_use]
    pub const fn separator(self) -> &'static str {
        match self {
            Self::Child => " > ",
            Self::Descendant => " ",
            Self::AdjacentSibling => " + ",
            Self::GeneralSibling => " ~ ",
        }
    }

    /// Map a combinator token lexeme (`>`, `+`, `~`) to its kind.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ">" => Some(Self::Child),
            "+" => Some(Self::AdjacentSibling),
            "~" => Some(Self::GeneralSibling),
            _ => None,
        }
    }
}

/// A complex selector: a compound, or a compound joined to the rest of the
/// selector by a combinator.
///
/// [§ 3.1 Complex selector](https://www.w3.org/TR/selectors-4/#complex)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// A selector without combinators.
    Compound(CompoundSelector),
    /// `left <kind> right`. The subject of the whole selector is found by
    /// following `right` down to its final compound.
    Combinator {
        /// How `left` relates to the element `right` matched.
        kind: CombinatorKind,
        /// The compound tested against the related element.
        left: CompoundSelector,
        /// The remainder of the selector, evaluated first.
        right: Box<Self>,
    },
}

impl Selector {
    /// Join `left` to `right` with a combinator.
    #[must_use]
    pub fn combinator(kind: CombinatorKind, left: CompoundSelector, right: Self) -> Self {
        Self::Combinator {
            kind,
            left,
            right: Box::new(right),
        }
    }

    /// The right-most compound, which the matched element itself must satisfy.
    #[must_use]
    pub fn subject(&self) -> &CompoundSelector {
        let mut selector = self;
        loop {
            match selector {
                Self::Compound(compound) => return compound,
                Self::Combinator { right, .. } => selector = right.as_ref(),
            }
        }
    }
}

/// A comma-separated list of selectors. An element matches the group if it
/// matches any member.
///
/// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectorGroup {
    selectors: Vec<Selector>,
}

impl SelectorGroup {
    /// Create a group from its members, in source order.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSelector::EmptyGroup`] if `selectors` is empty.
    pub fn new(selectors: Vec<Selector>) -> Result<Self, InvalidSelector> {
        if selectors.is_empty() {
            return Err(InvalidSelector::EmptyGroup);
        }
        Ok(Self { selectors })
    }

    /// The member selectors, in source order.
    #[must_use]
    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }
}

// ---- serialization ----

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", serialize_identifier(self.name()))?;
        if let (Some(op), Some(value)) = (self.operator(), self.value()) {
            write!(f, "{op}{}", serialize_string(value))?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => write!(f, "{}", serialize_identifier(name)),
            Self::Universal => write!(f, "*"),
            Self::Id(id) => write!(f, "#{}", serialize_identifier(id)),
            Self::Class(class) => write!(f, ".{}", serialize_identifier(class)),
            Self::Attribute(attr) => write!(f, "{attr}"),
            Self::PseudoClass(name) => write!(f, ":{}", serialize_identifier(name)),
        }
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for simple in &self.simple_selectors {
            write!(f, "{simple}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compound(compound) => write!(f, "{compound}"),
            Self::Combinator { kind, left, right } => {
                write!(f, "{left}{}{right}", kind.separator())
            }
        }
    }
}

impl fmt::Display for SelectorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}
