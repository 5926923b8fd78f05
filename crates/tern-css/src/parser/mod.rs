//! Stylesheet parser.
//!
//! A stylesheet is a list of style rules, each a selector group followed by
//! a `{}` block of `name: value` declarations. At-rules are recognised only
//! to be skipped.

mod rules;
mod stylesheet_parser;

pub use rules::{Declaration, RuleError, RuleSet, StyleRule, Stylesheet, UNSET_KEYWORD};
pub use stylesheet_parser::{
    StylesheetParser, parse_declarations, parse_stylesheet, parse_stylesheet_with,
};
