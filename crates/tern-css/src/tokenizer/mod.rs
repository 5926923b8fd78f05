//! Tokenizer for selector and stylesheet text.
//!
//! Input is read as a sequence of characters; every [`Token`] records the
//! character offset it starts at so errors can point back into the source.

mod token;
#[allow(clippy::module_inception)]
mod tokenizer;

pub use token::{Token, TokenKind, serialize_identifier, serialize_string};
pub use tokenizer::Tokenizer;
