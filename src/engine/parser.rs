/// Binary operator parsing.
///
/// Implements the precedence chain from the conditional operator down to
/// ranges and multiplication.
pub mod binary;

/// Core parser state.
///
/// Holds the token cursor, the bracket-group stack and the shared helpers
/// the other parser modules build on.
pub mod core;

/// Statement parsing.
///
/// Splits a program into statements and recognizes assignments and function
/// definitions.
pub mod statement;

/// Unary, postfix and atom parsing.
///
/// Handles prefix operators, power, subscripts, calls, and the literal
/// forms: numbers, strings, matrices and objects.
pub mod unary;

/// Token descriptions for error messages.
pub mod utils;

use crate::{ast::Node, engine::lexer::tokenize, error::SyntaxError};

/// Parses a complete source string into an expression tree.
///
/// # Parameters
/// - `source`: The program text; one or more statements separated by
///   newlines or semicolons.
///
/// # Returns
/// The root node: the statement itself for a single-statement program,
/// a [`Node::Block`] otherwise.
///
/// # Errors
/// The first `SyntaxError` found, from the lexer or the parser.
pub fn parse(source: &str) -> Result<Node, SyntaxError> {
    let tokens = tokenize(source)?;
    core::Parser::new(&tokens).parse_program()
}
