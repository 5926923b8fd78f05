//! Error types for tokenizing, parsing and styling.
//!
//! Offsets are character offsets into the source text, the same unit the
//! tokenizer reports in [`Token::start`](crate::tokenizer::Token::start).

use thiserror::Error;

/// A lexical error: an unterminated string or comment, or a character the
/// tokenizer does not recognise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset}")]
pub struct LexError {
    /// Human-readable description.
    pub message: String,
    /// Character offset where the offending token starts.
    pub offset: usize,
}

impl LexError {
    /// Create a lexical error at `offset`.
    #[must_use]
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// A grammar error: the tokens are well formed but not in an accepted order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset} (expected {expected})")]
pub struct ParseError {
    /// Human-readable description.
    pub message: String,
    /// Character offset of the unexpected token.
    pub offset: usize,
    /// What the parser was looking for.
    pub expected: String,
}

impl ParseError {
    /// Create a parse error at `offset`.
    #[must_use]
    pub fn new(message: impl Into<String>, offset: usize, expected: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            offset,
            expected: expected.into(),
        }
    }
}

/// Either kind of syntax error, as returned by the selector and stylesheet
/// parsers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// The tokenizer rejected the input.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// The parser rejected the token sequence.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl SyntaxError {
    /// Character offset of the error.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::Lex(e) => e.offset,
            Self::Parse(e) => e.offset,
        }
    }

    /// Human-readable description without the offset.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Lex(e) => &e.message,
            Self::Parse(e) => &e.message,
        }
    }
}

/// A selector tree that could not be written as selector text.
///
/// Returned by the checked constructors in [`selector`](crate::selector),
/// which keep every tree serializable to text that parses back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidSelector {
    /// A compound selector with no simple selectors.
    #[error("a compound selector needs at least one simple selector")]
    EmptyCompound,
    /// A type or universal selector somewhere other than the start of its
    /// compound.
    #[error("a type or universal selector must come first in its compound")]
    MisplacedTypeSelector,
    /// An empty type, id, class, attribute or pseudo-class name.
    #[error("selector names cannot be empty")]
    EmptyName,
    /// A name or attribute value containing NUL, which cannot be written in
    /// selector text.
    #[error("selector names and values cannot contain NUL")]
    NulCharacter,
    /// A selector group with no members.
    #[error("a selector group needs at least one selector")]
    EmptyGroup,
}

/// A selector construct that parsed correctly but names something the
/// host's [`SelectorRegistry`](crate::selector::SelectorRegistry) does not
/// know. Reported as a warning; the selector is still built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{name}' at offset {offset}")]
pub struct UnknownSelectorKind {
    /// The category, e.g. `"pseudo-class"`.
    pub kind: &'static str,
    /// The unrecognised name.
    pub name: String,
    /// Character offset of the name.
    pub offset: usize,
}

/// Errors raised while applying styles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    /// A style pass was started while another was still running on the same
    /// manager, typically from a model callback.
    #[error("style computation re-entered while a style pass is already running")]
    Reentrant,
}
