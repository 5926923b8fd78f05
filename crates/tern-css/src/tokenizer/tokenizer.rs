use super::token::{Token, TokenKind, is_name_char, is_name_start, is_whitespace};
use crate::error::LexError;

/// The largest code point an escape may produce.
const MAX_CODE_POINT: u32 = 0x0010_FFFF;

/// Streaming tokenizer for selectors and stylesheets.
///
/// Tokens are produced on demand by [`next_token`](Self::next_token). One
/// token of push-back is supported, which is all the recursive-descent
/// parsers need.
///
/// Comments (`/* ... */`) are skipped. Errors carry the character offset
/// where the bad token starts, and the tokenizer always advances past the
/// offending input so callers can keep reading after an error.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// The input being tokenized
    input: Vec<char>,
    /// Index of the next unread character
    position: usize,
    /// The most recently returned token
    current: Option<Token>,
    /// Whether `current` should be returned again by the next call
    pushed_back: bool,
    /// Set once the iterator has yielded end of input
    exhausted: bool,
}

impl Tokenizer {
    /// Create a tokenizer over `input`.
    ///
    /// NUL is replaced by U+FFFD up front, as in
    /// [§ 3.3 Preprocessing the input stream](https://www.w3.org/TR/css-syntax-3/#input-preprocessing),
    /// so no token ever carries a NUL.
    #[must_use]
    pub fn new(input: impl AsRef<str>) -> Self {
        let input = input
            .as_ref()
            .chars()
            .map(|c| if c == '\0' { char::REPLACEMENT_CHARACTER } else { c })
            .collect();
        Self {
            input,
            position: 0,
            current: None,
            pushed_back: false,
            exhausted: false,
        }
    }

    /// Return the next token.
    ///
    /// After end of input every call returns another [`TokenKind::Eof`].
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] for an unterminated string or comment, an
    /// invalid escape, or an unrecognised character.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if self.pushed_back {
            self.pushed_back = false;
            if let Some(token) = &self.current {
                return Ok(token.clone());
            }
        }
        match self.consume_token() {
            Ok(token) => {
                self.current = Some(token.clone());
                Ok(token)
            }
            Err(error) => {
                self.current = None;
                Err(error)
            }
        }
    }

    /// Make the next call to [`next_token`](Self::next_token) return the
    /// current token again. Has no effect if there is no current token.
    pub fn push_back(&mut self) {
        if self.current.is_some() {
            self.pushed_back = true;
        }
    }

    /// Return the next token without consuming it.
    ///
    /// # Errors
    ///
    /// Same as [`next_token`](Self::next_token).
    pub fn peek_token(&mut self) -> Result<Token, LexError> {
        let token = self.next_token()?;
        self.push_back();
        Ok(token)
    }

    /// The most recently returned token.
    #[must_use]
    pub const fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    /// Character offset where the current token starts, or the read position
    /// if there is no current token.
    #[must_use]
    pub fn start_position(&self) -> usize {
        self.current.as_ref().map_or(self.position, |t| t.start)
    }

    /// Character offset of the next unread character.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> Result<Token, LexError> {
        self.consume_comments()?;

        let start = self.position;
        let Some(c) = self.consume() else {
            return Ok(Token::new(TokenKind::Eof, "", start));
        };

        match c {
            c if is_whitespace(c) => {
                self.consume_whitespace();
                Ok(Token::new(TokenKind::Whitespace, " ", start))
            }

            '"' | '\'' => self.consume_string(c, start),

            '#' => {
                if self.peek().is_some_and(is_name_char) || self.is_valid_escape(0) {
                    let name = self.consume_name();
                    Ok(Token::new(TokenKind::Hash, name, start))
                } else {
                    Ok(Token::new(TokenKind::Delim, "#", start))
                }
            }

            '@' => {
                if self.would_start_ident(0) {
                    let name = self.consume_name();
                    Ok(Token::new(TokenKind::AtKeyword, name, start))
                } else {
                    Err(LexError::new("expected a name after '@'", start))
                }
            }

            '+' if self.would_start_number(-1) => {
                self.reconsume();
                Ok(self.consume_number(start))
            }

            '~' | '^' | '$' | '*' | '|' if self.peek() == Some('=') => {
                self.position += 1;
                Ok(Token::new(TokenKind::Delim, format!("{c}="), start))
            }

            '>' | '+' | '~' => Ok(Token::new(TokenKind::Combinator, c.to_string(), start)),

            '-' => {
                if self.would_start_number(-1) {
                    self.reconsume();
                    Ok(self.consume_number(start))
                } else if self.would_start_ident(-1) {
                    self.reconsume();
                    let name = self.consume_name();
                    Ok(Token::new(TokenKind::Ident, name, start))
                } else {
                    Ok(Token::new(TokenKind::Delim, "-", start))
                }
            }

            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                self.reconsume();
                Ok(self.consume_number(start))
            }

            '\\' => {
                if self.is_valid_escape(-1) {
                    self.reconsume();
                    let name = self.consume_name();
                    Ok(Token::new(TokenKind::Ident, name, start))
                } else {
                    Err(LexError::new("invalid escape", start))
                }
            }

            '{' | '}' | '[' | ']' | '(' | ')' | ',' | ':' | ';' | '.' | '*' | '=' | '!' | '/'
            | '%' | '^' | '$' | '|' => Ok(Token::new(TokenKind::Delim, c.to_string(), start)),

            c if c.is_ascii_digit() => {
                self.reconsume();
                Ok(self.consume_number(start))
            }

            c if is_name_start(c) => {
                self.reconsume();
                let name = self.consume_name();
                Ok(Token::new(TokenKind::Ident, name, start))
            }

            c => Err(LexError::new(format!("unexpected character '{c}'"), start)),
        }
    }

    // ---- character helpers ----

    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    fn reconsume(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Look at the character `offset` places from the read position
    /// (`-1` is the character just consumed).
    fn peek_at(&self, offset: isize) -> Option<char> {
        self.position
            .checked_add_signed(offset)
            .and_then(|i| self.input.get(i).copied())
    }

    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.position += 1;
        }
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    fn consume_comments(&mut self) -> Result<(), LexError> {
        while self.peek() == Some('/') && self.peek_at(1) == Some('*') {
            let start = self.position;
            self.position += 2;
            loop {
                match self.consume() {
                    Some('*') if self.peek() == Some('/') => {
                        self.position += 1;
                        break;
                    }
                    Some(_) => {}
                    None => return Err(LexError::new("unterminated comment", start)),
                }
            }
        }
        Ok(())
    }

    // ---- lookahead checks ----

    /// Whether the two characters starting at `offset` are a backslash and
    /// something other than a newline or end of input.
    ///
    /// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-valid-escape)
    fn is_valid_escape(&self, offset: isize) -> bool {
        self.peek_at(offset) == Some('\\')
            && self.peek_at(offset + 1).is_some_and(|c| c != '\n')
    }

    /// Whether the characters starting at `offset` begin an identifier.
    ///
    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    fn would_start_ident(&self, offset: isize) -> bool {
        match self.peek_at(offset) {
            Some('-') => {
                self.peek_at(offset + 1)
                    .is_some_and(|c| is_name_start(c) || c == '-')
                    || self.is_valid_escape(offset + 1)
            }
            Some('\\') => self.is_valid_escape(offset),
            Some(c) => is_name_start(c),
            None => false,
        }
    }

    /// Whether the characters starting at `offset` begin a number.
    ///
    /// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    fn would_start_number(&self, offset: isize) -> bool {
        let digit = |o| self.peek_at(o).is_some_and(|c: char| c.is_ascii_digit());
        match self.peek_at(offset) {
            Some('+' | '-') => {
                digit(offset + 1) || (self.peek_at(offset + 1) == Some('.') && digit(offset + 2))
            }
            Some('.') => digit(offset + 1),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }

    // ---- token bodies ----

    /// Consume an identifier's characters, resolving escapes. The caller has
    /// checked that one starts here.
    ///
    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_name(&mut self) -> String {
        let mut name = String::new();
        loop {
            match self.peek() {
                Some(c) if is_name_char(c) => {
                    name.push(c);
                    self.position += 1;
                }
                Some('\\') if self.is_valid_escape(0) => {
                    self.position += 1;
                    name.push(self.consume_escape());
                }
                _ => return name,
            }
        }
    }

    /// Consume an escape body. The backslash has already been consumed.
    ///
    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// Zero, surrogates and values above U+10FFFF yield U+FFFD.
    fn consume_escape(&mut self) -> char {
        let Some(c) = self.consume() else {
            return char::REPLACEMENT_CHARACTER;
        };
        if !c.is_ascii_hexdigit() {
            return c;
        }
        let mut hex = String::from(c);
        while hex.len() < 6 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            if let Some(c) = self.consume() {
                hex.push(c);
            }
        }
        if self.peek().is_some_and(is_whitespace) {
            self.position += 1;
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .filter(|&cp| cp != 0 && cp <= MAX_CODE_POINT)
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    /// Consume a quoted string. The opening quote has been consumed.
    ///
    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string(&mut self, quote: char, start: usize) -> Result<Token, LexError> {
        let mut value = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => return Err(LexError::new("unterminated string", start)),
                Some(c) if c == quote => {
                    self.position += 1;
                    return Ok(Token::new(TokenKind::String, value, start));
                }
                Some('\\') => {
                    self.position += 1;
                    match self.peek() {
                        None => return Err(LexError::new("unterminated string", start)),
                        // Escaped newline continues the string.
                        Some('\n') => self.position += 1,
                        Some(_) => value.push(self.consume_escape()),
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.position += 1;
                }
            }
        }
    }

    /// Consume a number with its optional unit or percent sign.
    ///
    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    fn consume_number(&mut self, start: usize) -> Token {
        let mut text = String::new();
        if let Some(sign @ ('+' | '-')) = self.peek() {
            text.push(sign);
            self.position += 1;
        }
        self.consume_digits(&mut text);
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            text.push('.');
            self.position += 1;
            self.consume_digits(&mut text);
        }
        if self.would_start_ident(0) {
            text.push_str(&self.consume_name());
        } else if self.peek() == Some('%') {
            text.push('%');
            self.position += 1;
        }
        Token::new(TokenKind::Number, text, start)
    }

    fn consume_digits(&mut self, text: &mut String) {
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            text.push(c);
            self.position += 1;
        }
    }
}

impl Iterator for Tokenizer {
    type Item = Result<Token, LexError>;

    /// Yields tokens up to and including the first end-of-input token.
    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let result = self.next_token();
        if result.as_ref().is_ok_and(Token::is_eof) {
            self.exhausted = true;
        }
        Some(result)
    }
}
