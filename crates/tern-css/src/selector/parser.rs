//! Recursive-descent selector parser.
//!
//! ```text
//! group     := selector ( ',' selector )*
//! selector  := compound ( combinator compound )*
//! combinator:= '>' | '+' | '~' | whitespace
//! compound  := ( type | '*' )? ( '#id' | '.class' | attribute | ':pseudo' )*
//! attribute := '[' name ( op ( ident | string ) )? ']'
//! op        := '=' | '^=' | '$=' | '*=' | '|=' | '~='
//! ```
//!
//! Whitespace around `>`, `+`, `~` and `,` is insignificant. Elsewhere
//! between two compounds it is the descendant combinator.

use super::{
    AttributeSelector, CombinatorKind, CompoundSelector, Selector, SelectorGroup,
    SelectorRegistry, SimpleSelector,
};
use crate::error::{InvalidSelector, ParseError, SyntaxError, UnknownSelectorKind};
use crate::tokenizer::{Token, TokenKind, Tokenizer};

const EXPECTED_SIMPLE: &str = "a type, '*', '#id', '.class', '[attribute]' or ':pseudo-class'";
const EXPECTED_AFTER_COMPOUND: &str = "a combinator, ',' or '{'";

/// Parse a comma-separated selector group that makes up the whole of `text`.
///
/// Unknown pseudo-classes are not errors; use [`SelectorParser`] directly
/// to collect them as warnings.
///
/// # Errors
///
/// Returns the first [`SyntaxError`] found. The group is rejected as a
/// whole.
///
/// # Example
/// ```
/// use tern_css::selector::{SelectorRegistry, parse_selector_group};
///
/// let group = parse_selector_group("g > rect.a, #b", &SelectorRegistry::default()).unwrap();
/// assert_eq!(group.selectors().len(), 2);
/// assert_eq!(group.to_string(), "g > rect.a, #b");
/// ```
pub fn parse_selector_group(
    text: &str,
    registry: &SelectorRegistry,
) -> Result<SelectorGroup, SyntaxError> {
    let mut tokenizer = Tokenizer::new(text);
    let mut parser = SelectorParser::new(&mut tokenizer, registry);
    let group = parser.parse_group()?;
    parser.expect_end()?;
    Ok(group)
}

/// Parse a single selector (no commas) that makes up the whole of `text`,
/// accepting any pseudo-class name.
///
/// # Errors
///
/// Returns the first [`SyntaxError`] found.
pub fn parse_selector(text: &str) -> Result<Selector, SyntaxError> {
    let registry = SelectorRegistry::permissive();
    let mut tokenizer = Tokenizer::new(text);
    let mut parser = SelectorParser::new(&mut tokenizer, &registry);
    let selector = parser.parse_selector()?;
    parser.expect_end()?;
    Ok(selector)
}

/// Selector parser reading from a shared [`Tokenizer`].
///
/// The stylesheet parser hands its tokenizer to a `SelectorParser` for each
/// rule prelude and takes it back afterwards. Parsing stops in front of the
/// `{` that opens a declaration block, leaving it unread.
pub struct SelectorParser<'t, 'r> {
    tokenizer: &'t mut Tokenizer,
    registry: &'r SelectorRegistry,
    warnings: Vec<UnknownSelectorKind>,
}

impl<'t, 'r> SelectorParser<'t, 'r> {
    /// Create a parser reading from `tokenizer`.
    pub const fn new(tokenizer: &'t mut Tokenizer, registry: &'r SelectorRegistry) -> Self {
        Self {
            tokenizer,
            registry,
            warnings: Vec::new(),
        }
    }

    /// Unknown-name warnings collected so far.
    #[must_use]
    pub fn warnings(&self) -> &[UnknownSelectorKind] {
        &self.warnings
    }

    /// Consume the parser and return its warnings.
    #[must_use]
    pub fn into_warnings(self) -> Vec<UnknownSelectorKind> {
        self.warnings
    }

    /// Parse a selector group, stopping before `{` or end of input.
    ///
    /// # Errors
    ///
    /// Returns the first [`SyntaxError`] in any member.
    pub fn parse_group(&mut self) -> Result<SelectorGroup, SyntaxError> {
        let start = Tokenizer::position(self.tokenizer);
        let mut selectors = vec![self.parse_selector()?];
        while self.consume_comma()? {
            selectors.push(self.parse_selector()?);
        }
        SelectorGroup::new(selectors).map_err(|e| invalid(e, start))
    }

    /// Parse a selector group, skipping members that fail to parse.
    ///
    /// A failing member is skipped up to the next top-level `,` and its
    /// error recorded. Returns the group of the members that parsed (or
    /// `None` if none did) along with the errors. Stops before `{`, `}` or
    /// end of input.
    pub fn parse_group_recovering(&mut self) -> (Option<SelectorGroup>, Vec<SyntaxError>) {
        let mut selectors = Vec::new();
        let mut errors = Vec::new();
        loop {
            match self.parse_selector() {
                Ok(selector) => selectors.push(selector),
                Err(error) => {
                    log::debug!(target: "tern::selector", "skipping selector: {error}");
                    errors.push(error);
                    self.skip_member();
                }
            }
            match self.consume_comma() {
                Ok(true) => {}
                Ok(false) => break,
                Err(error) => {
                    errors.push(error);
                    self.skip_member();
                    if !matches!(self.consume_comma(), Ok(true)) {
                        break;
                    }
                }
            }
        }
        (SelectorGroup::new(selectors).ok(), errors)
    }

    /// Parse one complex selector, stopping before `,`, `{`, `}` or end of
    /// input.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] for malformed input.
    pub fn parse_selector(&mut self) -> Result<Selector, SyntaxError> {
        let _ = self.skip_whitespace()?;
        let mut subject = self.parse_compound()?;
        // Each compound to the left of the subject, with the combinator
        // that follows it.
        let mut lefts = Vec::new();

        loop {
            let saw_whitespace = self.skip_whitespace()?;
            let token = self.tokenizer.next_token()?;
            let kind = if token.kind == TokenKind::Combinator {
                let kind = CombinatorKind::from_symbol(&token.lexeme)
                    .ok_or_else(|| unexpected(&token, EXPECTED_AFTER_COMPOUND))?;
                let _ = self.skip_whitespace()?;
                kind
            } else if token.is_eof()
                || token.is_delim(",")
                || token.is_delim("{")
                || token.is_delim("}")
            {
                self.tokenizer.push_back();
                break;
            } else if saw_whitespace {
                self.tokenizer.push_back();
                CombinatorKind::Descendant
            } else {
                return Err(unexpected(&token, EXPECTED_AFTER_COMPOUND));
            };
            let next = self.parse_compound()?;
            lefts.push((std::mem::replace(&mut subject, next), kind));
        }

        // Fold right to left so the subject ends up at the bottom.
        let selector = lefts
            .into_iter()
            .rev()
            .fold(Selector::Compound(subject), |right, (left, kind)| {
                Selector::combinator(kind, left, right)
            });
        Ok(selector)
    }

    /// Fail unless only whitespace remains.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] naming the first leftover token.
    pub fn expect_end(&mut self) -> Result<(), SyntaxError> {
        let _ = self.skip_whitespace()?;
        let token = self.tokenizer.next_token()?;
        if token.is_eof() {
            Ok(())
        } else {
            Err(unexpected(&token, "end of input"))
        }
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SyntaxError> {
        let mut simple_selectors = Vec::new();

        let first = self.tokenizer.next_token()?;
        match first.kind {
            TokenKind::Ident => simple_selectors.push(SimpleSelector::Type(first.lexeme.clone())),
            TokenKind::Delim if first.lexeme == "*" => {
                simple_selectors.push(SimpleSelector::Universal);
            }
            _ => self.tokenizer.push_back(),
        }

        loop {
            let token = self.tokenizer.next_token()?;
            match token.kind {
                TokenKind::Hash => simple_selectors.push(SimpleSelector::Id(token.lexeme)),
                TokenKind::Delim if token.lexeme == "." => {
                    let class = self.expect_ident("a class name")?;
                    simple_selectors.push(SimpleSelector::Class(class.lexeme));
                }
                TokenKind::Delim if token.lexeme == "[" => {
                    simple_selectors.push(SimpleSelector::Attribute(self.parse_attribute()?));
                }
                TokenKind::Delim if token.lexeme == ":" => {
                    simple_selectors.push(self.parse_pseudo_class()?);
                }
                _ => {
                    self.tokenizer.push_back();
                    break;
                }
            }
        }

        if simple_selectors.is_empty() {
            return Err(unexpected(&first, EXPECTED_SIMPLE));
        }
        CompoundSelector::new(simple_selectors).map_err(|e| invalid(e, first.start))
    }

    /// Parse `name (op value)? ]`. The `[` has been consumed.
    fn parse_attribute(&mut self) -> Result<AttributeSelector, SyntaxError> {
        let _ = self.skip_whitespace()?;
        let name = self.expect_ident("an attribute name")?.lexeme;
        let _ = self.skip_whitespace()?;

        let op = self.tokenizer.next_token()?;
        if op.is_delim("]") {
            return Ok(AttributeSelector::Exists(name));
        }
        let build: fn(String, String) -> AttributeSelector = match (op.kind, op.lexeme.as_str()) {
            (TokenKind::Delim, "=") => AttributeSelector::Equals,
            (TokenKind::Delim, "^=") => AttributeSelector::Prefix,
            (TokenKind::Delim, "$=") => AttributeSelector::Suffix,
            (TokenKind::Delim, "*=") => AttributeSelector::Substring,
            (TokenKind::Delim, "~=") => AttributeSelector::Includes,
            (TokenKind::Delim, "|=") => AttributeSelector::LangSubcode,
            _ => {
                return Err(ParseError::new(
                    format!("unknown attribute operator {op}"),
                    op.start,
                    "']' or one of = ^= $= *= |= ~=",
                )
                .into());
            }
        };

        let _ = self.skip_whitespace()?;
        let value = self.tokenizer.next_token()?;
        if !matches!(value.kind, TokenKind::Ident | TokenKind::String) {
            return Err(unexpected(&value, "an attribute value (identifier or string)"));
        }
        let _ = self.skip_whitespace()?;
        let close = self.tokenizer.next_token()?;
        if !close.is_delim("]") {
            return Err(unexpected(&close, "']'"));
        }
        Ok(build(name, value.lexeme))
    }

    /// Parse a pseudo-class name. The `:` has been consumed.
    fn parse_pseudo_class(&mut self) -> Result<SimpleSelector, SyntaxError> {
        let token = self.tokenizer.next_token()?;
        if token.is_delim(":") {
            return Err(ParseError::new(
                "pseudo-elements are not supported",
                token.start,
                "a pseudo-class name",
            )
            .into());
        }
        if token.kind != TokenKind::Ident {
            return Err(unexpected(&token, "a pseudo-class name"));
        }
        if let Err(unknown) = self.registry.check_pseudo_class(&token.lexeme, token.start) {
            log::debug!(target: "tern::selector", "{unknown}");
            self.warnings.push(unknown);
        }
        Ok(SimpleSelector::PseudoClass(token.lexeme))
    }

    // ---- token helpers ----

    /// Consume whitespace tokens. Returns whether any were consumed.
    fn skip_whitespace(&mut self) -> Result<bool, SyntaxError> {
        let mut skipped = false;
        loop {
            let token = self.tokenizer.next_token()?;
            if !token.is_whitespace() {
                self.tokenizer.push_back();
                return Ok(skipped);
            }
            skipped = true;
        }
    }

    /// Consume a `,` (and surrounding whitespace) if one is next.
    fn consume_comma(&mut self) -> Result<bool, SyntaxError> {
        let _ = self.skip_whitespace()?;
        let token = self.tokenizer.next_token()?;
        if token.is_delim(",") {
            Ok(true)
        } else {
            self.tokenizer.push_back();
            Ok(false)
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<Token, SyntaxError> {
        let token = self.tokenizer.next_token()?;
        if token.kind == TokenKind::Ident {
            Ok(token)
        } else {
            Err(unexpected(&token, what))
        }
    }

    /// Skip the rest of a failed member: everything up to a `,` outside
    /// brackets, a `{` or `}`, or end of input. The stopping token is left
    /// unread.
    /// Lexical errors inside the skipped text are ignored.
    fn skip_member(&mut self) {
        let mut depth = 0usize;
        loop {
            let Ok(token) = self.tokenizer.next_token() else {
                continue;
            };
            if token.is_eof() {
                self.tokenizer.push_back();
                return;
            }
            if token.kind != TokenKind::Delim {
                continue;
            }
            match token.lexeme.as_str() {
                "[" | "(" => depth += 1,
                "]" | ")" => depth = depth.saturating_sub(1),
                "," if depth == 0 => {
                    self.tokenizer.push_back();
                    return;
                }
                "{" | "}" => {
                    self.tokenizer.push_back();
                    return;
                }
                _ => {}
            }
        }
    }
}

fn unexpected(token: &Token, expected: &str) -> SyntaxError {
    ParseError::new(format!("unexpected {token}"), token.start, expected).into()
}

fn invalid(error: InvalidSelector, offset: usize) -> SyntaxError {
    ParseError::new(error.to_string(), offset, "a selector that can be written back as text").into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_sel(name: &str) -> CompoundSelector {
        CompoundSelector::new(vec![SimpleSelector::Type(name.to_string())]).unwrap()
    }

    #[test]
    fn test_builds_right_recursive_tree() {
        let selector = parse_selector("a > b c").unwrap();
        let expected = Selector::combinator(
            CombinatorKind::Child,
            type_sel("a"),
            Selector::combinator(
                CombinatorKind::Descendant,
                type_sel("b"),
                Selector::Compound(type_sel("c")),
            ),
        );
        assert_eq!(selector, expected);
    }

    #[test]
    fn test_whitespace_around_combinators_is_insignificant() {
        assert_eq!(
            parse_selector("a>b").unwrap(),
            parse_selector("a  >\n b").unwrap()
        );
        assert_eq!(parse_selector("  a + b ").unwrap().to_string(), "a + b");
    }

    #[test]
    fn test_recovering_group_keeps_valid_members() {
        let registry = SelectorRegistry::default();
        let mut tokenizer = Tokenizer::new("a, b[x ?= y], c {");
        let mut parser = SelectorParser::new(&mut tokenizer, &registry);
        let (group, errors) = parser.parse_group_recovering();
        let group = group.unwrap();
        assert_eq!(group.to_string(), "a, c");
        assert_eq!(errors.len(), 1);
        assert!(tokenizer.next_token().unwrap().is_delim("{"));
    }

    #[test]
    fn test_unknown_pseudo_class_is_a_warning() {
        let registry = SelectorRegistry::with_pseudo_classes(["hover"]);
        let mut tokenizer = Tokenizer::new("rect:hover:armed");
        let mut parser = SelectorParser::new(&mut tokenizer, &registry);
        let selector = parser.parse_selector().unwrap();
        assert_eq!(selector.to_string(), "rect:hover:armed");
        let warnings = parser.into_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].name, "armed");
        assert_eq!(warnings[0].offset, 11);
    }
}
