//! Token types produced by the [`Tokenizer`](super::Tokenizer).
//!
//! The token set is deliberately small: selectors and declaration values only
//! need identifiers, strings, numbers, hashes, punctuation and combinators.

use core::fmt;

/// The category of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// An identifier such as `rect`, `-x-shadow` or `\31 a`.
    Ident,
    /// A single- or double-quoted string. The lexeme holds the decoded value
    /// without quotes.
    String,
    /// A number, including any unit or `%` suffix (`12`, `1.5em`, `50%`).
    Number,
    /// `#name`. The lexeme holds `name` without the `#`.
    Hash,
    /// `@name`. The lexeme holds `name` without the `@`.
    AtKeyword,
    /// Punctuation: `{ } [ ] ( ) , : ; . * = ! / % # -` and the two-character
    /// attribute operators `^= $= *= |= ~=`.
    Delim,
    /// One of the combinator characters `>`, `+` or `~`.
    Combinator,
    /// A run of whitespace.
    Whitespace,
    /// End of input.
    Eof,
}

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// The decoded text of the token (escapes resolved, quotes stripped).
    pub lexeme: String,
    /// Character offset of the first character of the token.
    pub start: usize,
}

impl Token {
    /// Create a token.
    #[must_use]
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, start: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            start,
        }
    }

    /// Check if this is the end-of-input token.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Check if this is a whitespace token.
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }

    /// Check if this is the delimiter `delim`.
    #[must_use]
    pub fn is_delim(&self, delim: &str) -> bool {
        self.kind == TokenKind::Delim && self.lexeme == delim
    }

    /// Serialize the token back to source text that tokenizes to an
    /// equivalent token.
    #[must_use]
    pub fn to_css(&self) -> String {
        match self.kind {
            TokenKind::Ident => serialize_identifier(&self.lexeme),
            TokenKind::String => serialize_string(&self.lexeme),
            TokenKind::Hash => format!("#{}", serialize_identifier(&self.lexeme)),
            TokenKind::AtKeyword => format!("@{}", serialize_identifier(&self.lexeme)),
            TokenKind::Number | TokenKind::Delim | TokenKind::Combinator => self.lexeme.clone(),
            TokenKind::Whitespace => " ".to_string(),
            TokenKind::Eof => String::new(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::Whitespace => write!(f, "whitespace"),
            _ => write!(f, "'{}'", self.to_css()),
        }
    }
}

/// Whitespace as far as the tokenizer is concerned.
///
/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#whitespace)
pub(crate) const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{000C}')
}

/// [§ 4.2 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
pub(crate) const fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
pub(crate) const fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

/// Serialize `value` as an identifier, escaping whatever the tokenizer would
/// not read back as part of a single ident token.
///
/// [§ 2.1 Serialize an identifier](https://www.w3.org/TR/cssom-1/#serialize-an-identifier)
///
/// NUL has no escape that reads back as NUL, so it is written as U+FFFD,
/// which is also what the tokenizer turns `\0` into.
///
/// ```
/// use tern_css::tokenizer::serialize_identifier;
///
/// assert_eq!(serialize_identifier("rect"), "rect");
/// assert_eq!(serialize_identifier("a.b"), "a\\.b");
/// assert_eq!(serialize_identifier("1st"), "\\31 st");
/// ```
#[must_use]
pub fn serialize_identifier(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    if value == "-" {
        out.push_str("\\-");
        return out;
    }
    let leading_dash = value.starts_with('-');
    for (index, c) in value.chars().enumerate() {
        let leading_digit = c.is_ascii_digit() && (index == 0 || (index == 1 && leading_dash));
        if c == '\0' {
            out.push(char::REPLACEMENT_CHARACTER);
        } else if leading_digit || c.is_control() {
            out.push_str(&format!("\\{:x} ", u32::from(c)));
        } else if is_name_char(c) {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

/// Serialize `value` as a double-quoted string.
///
/// [§ 2.1 Serialize a string](https://www.w3.org/TR/cssom-1/#serialize-a-string)
///
/// As with [`serialize_identifier`], NUL becomes U+FFFD.
///
/// ```
/// use tern_css::tokenizer::serialize_string;
///
/// assert_eq!(serialize_string("a \"b\""), "\"a \\\"b\\\"\"");
/// ```
#[must_use]
pub fn serialize_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\0' => out.push(char::REPLACEMENT_CHARACTER),
            c if c.is_control() => out.push_str(&format!("\\{:x} ", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_identifier_escapes() {
        assert_eq!(serialize_identifier("fill-color"), "fill-color");
        assert_eq!(serialize_identifier("-x"), "-x");
        assert_eq!(serialize_identifier("-1"), "-\\31 ");
        assert_eq!(serialize_identifier("a b"), "a\\ b");
        assert_eq!(serialize_identifier("-"), "\\-");
    }

    #[test]
    fn test_nul_serializes_as_replacement_character() {
        assert_eq!(serialize_string("a\0b"), "\"a\u{FFFD}b\"");
        assert_eq!(serialize_identifier("a\0b"), "a\u{FFFD}b");
        assert_eq!(serialize_string("a\u{1}"), "\"a\\1 \"");
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Token::new(TokenKind::Hash, "main", 0).to_string(), "'#main'");
        assert_eq!(Token::new(TokenKind::Eof, "", 3).to_string(), "end of input");
    }
}
