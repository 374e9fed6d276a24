use logos::Logos;

use crate::error::SyntaxError;

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
///
/// Newlines are tokens rather than skipped whitespace: they separate
/// statements and matrix rows. All other whitespace is insignificant.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Numeric literal tokens, such as `3.14`, `.5`, `2.` or `2.1e-10`.
    #[regex(r"[0-9]+\.?[0-9]*([eE][+-]?[0-9]+)?", parse_number)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", parse_number)]
    Number(f64),
    /// Double-quoted string literal tokens, such as `"hello\n"`.
    #[regex(r#""([^"\\\n]|\\.)*""#, parse_string)]
    Str(String),
    /// Boolean literal tokens, such as `true`.
    #[token("true", parse_bool)]
    #[token("false", parse_bool)]
    Bool(bool),
    /// `mod`
    #[token("mod")]
    Mod,
    /// `and`
    #[token("and")]
    And,
    /// `or`
    #[token("or")]
    Or,
    /// `not`
    #[token("not")]
    Not,
    /// Identifier tokens; variable or function names such as `x` or `size`.
    #[regex(r"[\p{L}_][\p{L}0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `# Comments, skipped up to the end of the line.`
    #[regex(r"#[^\n\r]*", logos::skip)]
    Comment,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `^`
    #[token("^")]
    Caret,
    /// `!`
    #[token("!")]
    Bang,
    /// `'`
    #[token("'")]
    Quote,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `:`
    #[token(":")]
    Colon,
    /// `.`
    #[token(".")]
    Dot,
    /// `?`
    #[token("?")]
    Question,
    /// `=`
    #[token("=")]
    Equals,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `&`
    #[token("&")]
    Ampersand,
    /// `|`
    #[token("|")]
    Pipe,
    /// `^|`
    #[token("^|")]
    CaretPipe,
    /// `<<`
    #[token("<<")]
    LeftShift,
    /// `>>`
    #[token(">>")]
    RightShift,
    /// `>>>`
    #[token(">>>")]
    RightShiftLogical,
    /// `~`
    #[token("~")]
    Tilde,
    /// Statement and matrix row separator.
    #[token("\n", newline_callback)]
    NewLine,
    /// Tabs, carriage returns and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number and the byte offset of the line start, so
/// errors can report both a line and a column.
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
    /// Byte offset at which the current line begins.
    pub line_start: usize,
}

/// Tokenizes a complete source string in a single pass.
///
/// Each token is paired with the line it was found on. Tokens are plain data;
/// nothing downstream looks at the source text again.
///
/// # Parameters
/// - `source`: The expression text to tokenize.
///
/// # Returns
/// The token list, or the first `SyntaxError` met. There is no recovery: an
/// unrecognized character aborts the whole tokenization.
pub fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: 1, line_start: 0 });

    while let Some(token) = lexer.next() {
        match token {
            Ok(tok) => tokens.push((tok, lexer.extras.line)),
            Err(()) => {
                let slice = lexer.slice();
                let line = lexer.extras.line;
                // A multi-character failure starting with a quote is a string
                // literal whose escape sequence did not unescape.
                if slice.len() > 1 && slice.starts_with('"') {
                    return Err(SyntaxError::InvalidEscape { line });
                }
                let column = lexer.span().start - lexer.extras.line_start + 1;
                return Err(SyntaxError::UnexpectedCharacter {
                    character: slice.to_string(),
                    line,
                    column,
                });
            },
        }
    }

    Ok(tokens)
}

/// Parses a numeric literal from the current token slice.
fn parse_number(lex: &mut logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Parses a boolean literal from the current token slice (`true` or `false`).
fn parse_bool(lex: &mut logos::Lexer<Token>) -> Option<bool> {
    match lex.slice() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Unescapes a double-quoted string literal.
///
/// Supported escapes are `\n`, `\t`, `\r`, `\b`, `\f`, `\\`, `\"` and `\/`.
/// Returns `None` for any other escape, which surfaces as a lexing error.
fn parse_string(lex: &mut logos::Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '/' => out.push('/'),
            _ => return None,
        }
    }

    Some(out)
}

/// Advances the line bookkeeping when a newline token is produced.
fn newline_callback(lex: &mut logos::Lexer<Token>) {
    lex.extras.line += 1;
    lex.extras.line_start = lex.span().end;
}

#[cfg(test)]
mod tests {
    use super::{tokenize, Token};

    #[test]
    fn numbers_identifiers_and_operators() {
        let tokens = tokenize("2.5e3 + foo_1").unwrap();
        let kinds: Vec<_> = tokens.into_iter().map(|(t, _)| t).collect();
        assert_eq!(kinds, vec![
            Token::Number(2500.0),
            Token::Plus,
            Token::Identifier("foo_1".into()),
        ]);
    }

    #[test]
    fn newlines_carry_line_numbers() {
        let tokens = tokenize("1\n2").unwrap();
        assert_eq!(tokens[0].1, 1);
        assert_eq!(tokens[2].1, 2);
    }

    #[test]
    fn comments_are_skipped() {
        let tokens = tokenize("1 # the rest is ignored ]][").unwrap();
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn string_escapes() {
        let tokens = tokenize(r#""a\tb""#).unwrap();
        assert_eq!(tokens[0].0, Token::Str("a\tb".into()));
        assert!(tokenize(r#""a\qb""#).is_err());
    }

    #[test]
    fn unexpected_character_reports_position() {
        let err = tokenize("1 + \n  @2").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("line 2"), "{text}");
    }
}
