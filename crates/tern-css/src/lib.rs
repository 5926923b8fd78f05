//! Selector matching and style cascade for arbitrary element trees.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer**: identifiers, strings, numbers, hashes, punctuation and
//!   combinators, with escapes and comments
//!
//! - **Selectors**
//!   - Type, universal, id, class, attribute and pseudo-class selectors
//!   - Child, descendant, adjacent-sibling and general-sibling combinators
//!   - Comma-separated groups
//!   - Specificity
//!   - Matching through the [`SelectorModel`] adapter trait
//!
//! - **Stylesheets**: style rules with error recovery, declaration lists for
//!   inline styles
//!
//! - **Cascade**
//!   - Ranking by origin, specificity and source order
//!   - Per-origin storage in [`StyleableMap`], where an explicit null is
//!     distinct from an absent value
//!   - [`StyleManager`] for styling single elements or whole subtrees
//!
//! # Not Implemented
//!
//! - Pseudo-elements and functional pseudo-classes (`:not()`, `:nth-child()`)
//! - Namespaced selectors
//! - At-rules (they are skipped)
//! - Property value types: values are kept as text
//!
//! # Example
//! ```
//! use tern_css::{Origin, RuleSet, StyleManager, StyleableMap, parse_stylesheet};
//! use tern_dom::{DomTree, ElementData, NodeId};
//!
//! let mut tree = DomTree::new();
//! let g = tree.append_element(NodeId::ROOT, ElementData::new("g"));
//! let rect = tree.append_element(g, ElementData::new("rect").with_attr("class", "hot"));
//!
//! let sheet = parse_stylesheet("g rect { fill: black } .hot { fill: red }", Origin::Author);
//! let manager = StyleManager::new(RuleSet::new([sheet]));
//!
//! let mut style = StyleableMap::new();
//! manager.style_element(&tree, &rect, &mut style).unwrap();
//! assert_eq!(style.get("fill").map(String::as_str), Some("red"));
//! ```

/// The cascade and the style manager.
pub mod cascade;
/// Error types.
pub mod error;
/// The element tree adapter trait.
pub mod model;
/// Stylesheet parsing and rule collections.
pub mod parser;
/// Selector syntax tree, parser, matching and specificity.
pub mod selector;
/// Origins and per-origin style storage.
pub mod style;
/// Tokenizer.
pub mod tokenizer;

pub use cascade::{StyleManager, compute_style, compute_style_with_inline};
pub use error::{
    InvalidSelector, LexError, ParseError, StyleError, SyntaxError, UnknownSelectorKind,
};
pub use model::SelectorModel;
pub use parser::{
    Declaration, RuleError, RuleSet, StyleRule, Stylesheet, parse_declarations, parse_stylesheet,
    parse_stylesheet_with,
};
pub use selector::{
    Selector, SelectorGroup, SelectorRegistry, Specificity, parse_selector, parse_selector_group,
};
pub use style::{Origin, StyleableMap};
