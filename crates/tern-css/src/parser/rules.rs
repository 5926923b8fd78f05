use std::collections::BTreeSet;

use crate::error::SyntaxError;
use crate::selector::SelectorGroup;
use crate::style::Origin;
use crate::tokenizer::{Token, TokenKind};

/// The value that stores an explicit "no value" for a property.
pub const UNSET_KEYWORD: &str = "unset";

/// A property declaration, e.g. `fill: #ff0000`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// The property name as written.
    pub name: String,
    /// The value tokens, with leading and trailing whitespace removed.
    /// Never empty.
    pub value: Vec<Token>,
}

impl Declaration {
    /// The value re-serialized as text. Runs of whitespace collapse to one
    /// space.
    #[must_use]
    pub fn value_text(&self) -> String {
        self.value.iter().map(Token::to_css).collect()
    }

    /// Whether the value is the single keyword `unset`, which clears the
    /// property for the declaring origin instead of giving it a value.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(
            self.value.as_slice(),
            [token] if token.kind == TokenKind::Ident && token.lexeme == UNSET_KEYWORD
        )
    }

    /// The value to store: `None` for `unset`, the value text otherwise.
    #[must_use]
    pub fn stored_value(&self) -> Option<String> {
        (!self.is_unset()).then(|| self.value_text())
    }
}

/// A selector group with its declaration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// The selectors that pick the elements this rule applies to.
    pub selectors: SelectorGroup,
    /// The declarations, in source order.
    pub declarations: Vec<Declaration>,
    /// The origin of the stylesheet the rule came from.
    pub origin: Origin,
    /// Position of the rule in source order. Later rules win ties.
    pub source_order: usize,
}

/// A syntax error tied to the rule it occurred in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleError {
    /// Index of the rule in its stylesheet, counting dropped rules.
    pub rule_index: usize,
    /// What went wrong.
    pub error: SyntaxError,
}

/// The result of parsing one stylesheet.
///
/// Parsing never fails as a whole: rules with errors are repaired or
/// dropped, and the errors are listed alongside the rules that survived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    /// The origin every rule in this sheet carries.
    pub origin: Origin,
    /// The rules that parsed, in source order.
    pub rules: Vec<StyleRule>,
    /// Every error found, in source order.
    pub errors: Vec<RuleError>,
}

impl Stylesheet {
    /// Whether the sheet parsed without errors.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// An immutable, ordered collection of rules from any number of
/// stylesheets.
///
/// Building a rule set renumbers source order so it strictly increases
/// across the sheets in the order given. To change the rules, build a new
/// set and swap it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<StyleRule>,
}

impl RuleSet {
    /// Combine stylesheets, earlier sheets first.
    #[must_use]
    pub fn new(stylesheets: impl IntoIterator<Item = Stylesheet>) -> Self {
        Self::from_rules(stylesheets.into_iter().flat_map(|sheet| sheet.rules))
    }

    /// Collect rules in the order given.
    #[must_use]
    pub fn from_rules(rules: impl IntoIterator<Item = StyleRule>) -> Self {
        let rules = rules
            .into_iter()
            .enumerate()
            .map(|(source_order, rule)| StyleRule {
                source_order,
                ..rule
            })
            .collect();
        Self { rules }
    }

    /// The rules, in source order.
    #[must_use]
    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    /// Iterate over the rules in source order.
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, StyleRule> {
        self.rules.iter()
    }

    /// The origins at least one rule comes from.
    #[must_use]
    pub fn origins(&self) -> BTreeSet<Origin> {
        self.rules.iter().map(|rule| rule.origin).collect()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a StyleRule;
    type IntoIter = std::slice::Iter<'a, StyleRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
