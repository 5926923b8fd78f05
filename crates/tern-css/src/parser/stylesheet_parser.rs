use tern_common::WarningLog;

use super::rules::{Declaration, RuleError, StyleRule, Stylesheet};
use crate::error::{ParseError, SyntaxError};
use crate::selector::{SelectorGroup, SelectorParser, SelectorRegistry};
use crate::style::Origin;
use crate::tokenizer::{Token, TokenKind, Tokenizer};

/// Parse `text` as a stylesheet of `origin`, accepting every pseudo-class.
///
/// Errors never abort the parse. See [`StylesheetParser`] for how each kind
/// of error is recovered from.
///
/// # Example
/// ```
/// use tern_css::{Origin, parse_stylesheet};
///
/// let sheet = parse_stylesheet("rect { fill: red } ][ {} circle { r: 2 }", Origin::Author);
/// assert_eq!(sheet.rules.len(), 2);
/// assert_eq!(sheet.errors.len(), 1);
/// ```
#[must_use]
pub fn parse_stylesheet(text: &str, origin: Origin) -> Stylesheet {
    let registry = SelectorRegistry::permissive();
    let warnings = WarningLog::new();
    parse_stylesheet_with(text, origin, &registry, &warnings)
}

/// Parse `text` as a stylesheet of `origin`, checking pseudo-classes
/// against `registry` and reporting warnings to `warnings`.
#[must_use]
pub fn parse_stylesheet_with(
    text: &str,
    origin: Origin,
    registry: &SelectorRegistry,
    warnings: &WarningLog,
) -> Stylesheet {
    StylesheetParser::new(text, origin, registry, warnings).parse()
}

/// Parse a bare declaration list such as the contents of a `style`
/// attribute (`fill: red; stroke: none`).
///
/// Returns the declarations that parsed and the errors for those that did
/// not. Errors carry rule index `0`.
#[must_use]
pub fn parse_declarations(text: &str) -> (Vec<Declaration>, Vec<RuleError>) {
    let registry = SelectorRegistry::permissive();
    let warnings = WarningLog::new();
    let mut parser = StylesheetParser::new(text, Origin::Inline, &registry, &warnings);
    let declarations = parser.consume_declarations(0, BlockEnd::EndOfInput);
    (declarations, parser.errors)
}

/// How a declaration list ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockEnd {
    /// A `{}` block closed by `}`. Reaching end of input first is an error.
    Brace,
    /// A bare list, as in a `style` attribute, ended by end of input.
    EndOfInput,
}

/// Error-recovering stylesheet parser.
///
/// Recovery is scoped as tightly as possible:
///
/// - A member of a selector group that fails to parse is dropped up to the
///   next top-level `,`. The rule keeps its other members and is dropped
///   only when none remain.
/// - A declaration that fails to parse is dropped up to the next `;`. The
///   rest of the block is kept.
/// - At-rules are skipped (with a warning) up to their `;` or the end of
///   their block.
///
/// Every error is recorded with the index of the rule it occurred in.
pub struct StylesheetParser<'r> {
    tokenizer: Tokenizer,
    origin: Origin,
    registry: &'r SelectorRegistry,
    warnings: &'r WarningLog,
    rules: Vec<StyleRule>,
    errors: Vec<RuleError>,
    next_index: usize,
}

impl<'r> StylesheetParser<'r> {
    /// Create a parser for `text`.
    #[must_use]
    pub fn new(
        text: &str,
        origin: Origin,
        registry: &'r SelectorRegistry,
        warnings: &'r WarningLog,
    ) -> Self {
        Self {
            tokenizer: Tokenizer::new(text),
            origin,
            registry,
            warnings,
            rules: Vec::new(),
            errors: Vec::new(),
            next_index: 0,
        }
    }

    /// Parse the whole input.
    #[must_use]
    pub fn parse(mut self) -> Stylesheet {
        loop {
            let token = match self.tokenizer.next_token() {
                Ok(token) => token,
                Err(error) => {
                    // Stray bad input between rules belongs to the next one.
                    self.record(self.next_index, error.into());
                    continue;
                }
            };
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Whitespace => {}
                TokenKind::AtKeyword => self.skip_at_rule(&token),
                _ if token.is_delim("}") => {
                    self.record(self.next_index, unexpected(&token, "a selector").into());
                }
                _ => {
                    self.tokenizer.push_back();
                    self.consume_style_rule();
                }
            }
        }
        log::debug!(
            target: "tern::parser",
            "parsed {} {} rule(s) with {} error(s)",
            self.rules.len(),
            self.origin,
            self.errors.len()
        );
        Stylesheet {
            origin: self.origin,
            rules: self.rules,
            errors: self.errors,
        }
    }

    fn consume_style_rule(&mut self) {
        let index = self.next_index;
        self.next_index += 1;

        let mut selector_parser = SelectorParser::new(&mut self.tokenizer, self.registry);
        let (group, selector_errors) = selector_parser.parse_group_recovering();
        let unknown = selector_parser.into_warnings();
        for warning in unknown {
            let _ = self.warnings.warn_once("selector", &warning.to_string());
        }
        for error in selector_errors {
            self.record(index, error);
        }

        // The selector parser stops in front of `{`, `}` or end of input.
        let open = match self.tokenizer.next_token() {
            Ok(token) => token,
            Err(error) => {
                self.record(index, error.into());
                return;
            }
        };
        if !open.is_delim("{") {
            self.record(index, unexpected(&open, "'{'").into());
            return;
        }

        let declarations = self.consume_declarations(index, BlockEnd::Brace);
        if let Some(selectors) = group {
            self.push_rule(index, selectors, declarations);
        } else {
            log::debug!(target: "tern::parser", "dropping rule {index}: no valid selectors");
        }
    }

    fn push_rule(
        &mut self,
        index: usize,
        selectors: SelectorGroup,
        declarations: Vec<Declaration>,
    ) {
        log::trace!(
            target: "tern::parser",
            "rule {index}: {selectors} ({} declaration(s))",
            declarations.len()
        );
        self.rules.push(StyleRule {
            selectors,
            declarations,
            origin: self.origin,
            source_order: index,
        });
    }

    /// Consume declarations up to the closing `}` (which is consumed) or
    /// end of input.
    fn consume_declarations(&mut self, index: usize, end: BlockEnd) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        loop {
            let token = match self.tokenizer.next_token() {
                Ok(token) => token,
                Err(error) => {
                    self.record(index, error.into());
                    self.skip_declaration();
                    continue;
                }
            };
            match token.kind {
                TokenKind::Whitespace => {}
                TokenKind::Eof => {
                    if end == BlockEnd::Brace {
                        self.record(index, unexpected(&token, "'}'").into());
                    }
                    return declarations;
                }
                TokenKind::Ident => {
                    if let Some(declaration) = self.consume_declaration(index, token) {
                        declarations.push(declaration);
                    }
                }
                _ if token.is_delim(";") => {}
                _ if token.is_delim("}") && end == BlockEnd::Brace => return declarations,
                _ => {
                    self.record(index, unexpected(&token, "a property name").into());
                    self.skip_declaration();
                }
            }
        }
    }

    /// Consume `: value` after the property name `name`, up to `;`, `}` or
    /// end of input. The terminator is left unread unless it is `;`.
    fn consume_declaration(&mut self, index: usize, name: Token) -> Option<Declaration> {
        let colon = loop {
            match self.tokenizer.next_token() {
                Ok(token) if token.is_whitespace() => {}
                Ok(token) => break token,
                Err(error) => {
                    self.record(index, error.into());
                    self.skip_declaration();
                    return None;
                }
            }
        };
        if !colon.is_delim(":") {
            self.tokenizer.push_back();
            self.record(index, unexpected(&colon, "':'").into());
            self.skip_declaration();
            return None;
        }

        let mut value = Vec::new();
        let mut depth = 0usize;
        loop {
            let token = match self.tokenizer.next_token() {
                Ok(token) => token,
                Err(error) => {
                    self.record(index, error.into());
                    self.skip_declaration();
                    return None;
                }
            };
            if token.is_eof() || (depth == 0 && token.is_delim("}")) {
                self.tokenizer.push_back();
                break;
            }
            if depth == 0 && token.is_delim(";") {
                break;
            }
            if token.is_delim("(") || token.is_delim("[") {
                depth += 1;
            } else if token.is_delim(")") || token.is_delim("]") {
                depth = depth.saturating_sub(1);
            }
            value.push(token);
        }

        while value.last().is_some_and(Token::is_whitespace) {
            let _ = value.pop();
        }
        let leading = value.iter().take_while(|t| t.is_whitespace()).count();
        let _ = value.drain(..leading);

        if value.is_empty() {
            self.record(
                index,
                ParseError::new(
                    format!("empty value for property '{}'", name.lexeme),
                    name.start,
                    "a value",
                )
                .into(),
            );
            return None;
        }
        Some(Declaration {
            name: name.lexeme,
            value,
        })
    }

    /// Skip to the end of the current declaration: past the next `;`, or up
    /// to (not past) a `}` or end of input.
    fn skip_declaration(&mut self) {
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
                "(" | "[" | "{" => depth += 1,
                ")" | "]" => depth = depth.saturating_sub(1),
                "}" if depth > 0 => depth -= 1,
                "}" => {
                    self.tokenizer.push_back();
                    return;
                }
                ";" if depth == 0 => return,
                _ => {}
            }
        }
    }

    /// Skip an at-rule: up to its `;`, or past its `{}` block.
    fn skip_at_rule(&mut self, keyword: &Token) {
        let _ = self.warnings.warn_once(
            "css",
            &format!("skipped unsupported at-rule '@{}'", keyword.lexeme),
        );
        let mut depth = 0usize;
        loop {
            let Ok(token) = self.tokenizer.next_token() else {
                continue;
            };
            if token.is_eof() {
                return;
            }
            match token.lexeme.as_str() {
                _ if token.kind != TokenKind::Delim => {}
                ";" if depth == 0 => return,
                "{" => depth += 1,
                "}" => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    fn record(&mut self, rule_index: usize, error: SyntaxError) {
        log::debug!(target: "tern::parser", "rule {rule_index}: {error}");
        self.errors.push(RuleError { rule_index, error });
    }
}

fn unexpected(token: &Token, expected: &str) -> ParseError {
    ParseError::new(format!("unexpected {token}"), token.start, expected)
}
