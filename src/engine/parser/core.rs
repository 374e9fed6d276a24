use crate::{
    engine::{lexer::Token, parser::utils::describe},
    error::SyntaxError,
};

/// Result type used by the parser.
pub type ParseResult<T> = Result<T, SyntaxError>;

/// The bracket groups the parser can be inside of.
///
/// Newlines are statement and matrix-row separators, so they are
/// significant at the top level and inside `[...]`, but plain whitespace
/// inside `(...)` and `{...}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Group {
    Paren,
    Bracket,
    Brace,
}

/// A recursive-descent parser over the lexer's token list.
///
/// The parser is a cursor plus two pieces of context: the stack of bracket
/// groups it is inside of, which decides whether newlines are separators or
/// whitespace, and a flag saying whether a bare range like `1:5` is legal
/// at the current position. Ranges are only legal where a `:` cannot mean
/// anything else: whole statements, assignment values, subscripts and
/// matrix items.
pub struct Parser<'a> {
    pub(crate) tokens: &'a [(Token, usize)],
    pub(crate) pos: usize,
    pub(crate) groups: Vec<Group>,
    pub(crate) range_allowed: bool,
}

impl<'a> Parser<'a> {
    /// Creates a parser over a token list produced by the lexer.
    #[must_use]
    pub fn new(tokens: &'a [(Token, usize)]) -> Self {
        Self { tokens, pos: 0, groups: Vec::new(), range_allowed: false }
    }

    /// Returns the next significant token without consuming it.
    ///
    /// Inside parentheses and braces, newlines are skipped here, so every
    /// lookahead in the grammar sees through line breaks in those groups.
    pub(crate) fn peek(&mut self) -> Option<Token> {
        if matches!(self.groups.last(), Some(Group::Paren | Group::Brace)) {
            while matches!(self.tokens.get(self.pos), Some((Token::NewLine, _))) {
                self.pos += 1;
            }
        }
        self.tokens.get(self.pos).map(|(token, _)| token.clone())
    }

    /// Consumes and returns the next significant token and its line.
    pub(crate) fn advance(&mut self) -> Option<(Token, usize)> {
        self.peek()?;
        let entry = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        entry
    }

    /// Consumes the next token and returns its line. Call only after a
    /// `peek` has shown the token is there.
    pub(crate) fn bump(&mut self) -> usize {
        let fallback = self.line();
        self.advance().map_or(fallback, |(_, line)| line)
    }

    /// The line of the current token, or of the last token at end of input.
    pub(crate) fn line(&self) -> usize {
        match self.tokens.get(self.pos) {
            Some((_, line)) => *line,
            None => self.tokens.last().map_or(1, |(_, line)| *line),
        }
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Skips newline tokens unconditionally, regardless of group.
    pub(crate) fn skip_newlines(&mut self) {
        while matches!(self.tokens.get(self.pos), Some((Token::NewLine, _))) {
            self.pos += 1;
        }
    }

    /// Consumes one expected token, or fails with what was found instead.
    ///
    /// # Parameters
    /// - `token`: The exact token required next.
    /// - `expected`: How to name it in the error, e.g. `"')'"`.
    ///
    /// # Returns
    /// The line the token was found on.
    pub(crate) fn expect(&mut self, token: &Token, expected: &str) -> ParseResult<usize> {
        if self.peek().as_ref() == Some(token) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Builds the error for an unwanted token or a premature end of input.
    pub(crate) fn unexpected(&mut self, expected: &str) -> SyntaxError {
        match self.peek() {
            Some(token) => SyntaxError::UnexpectedToken {
                expected: expected.to_string(),
                found: describe(&token),
                line: self.line(),
            },
            None => SyntaxError::UnexpectedEndOfInput { line: self.line() },
        }
    }

    /// Runs a sub-parse with the range flag set to `allowed`, restoring the
    /// previous flag afterwards.
    pub(crate) fn with_range<T>(&mut self, allowed: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.range_allowed;
        self.range_allowed = allowed;
        let result = f(self);
        self.range_allowed = saved;
        result
    }
}
