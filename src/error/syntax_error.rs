#[derive(Debug)]
/// Represents all errors that can occur during tokenization or parsing.
pub enum SyntaxError {
    /// The lexer met a character that starts no token.
    UnexpectedCharacter {
        /// The offending character(s), as written in the source.
        character: String,
        /// The source line where the error occurred.
        line: usize,
        /// The one-based column where the character sits.
        column: usize,
    },
    /// A string literal contained an invalid escape sequence.
    InvalidEscape {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Found an unexpected token while parsing.
    UnexpectedToken {
        /// A description of what the parser was looking for.
        expected: String,
        /// The token actually found.
        found: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Reached the end of input unexpectedly.
    UnexpectedEndOfInput {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The left side of `=` is not something that can be assigned to.
    InvalidAssignmentTarget {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedCharacter { character, line, column } => {
                write!(f, "Error on line {line}: Unexpected character '{character}' at column {column}.")
            },

            Self::InvalidEscape { line } => {
                write!(f, "Error on line {line}: Invalid escape sequence in string literal.")
            },

            Self::UnexpectedToken { expected, found, line } => {
                write!(f, "Error on line {line}: Expected {expected}, found {found}.")
            },

            Self::UnexpectedEndOfInput { line } => {
                write!(f, "Error on line {line}: Unexpected end of input.")
            },

            Self::InvalidAssignmentTarget { line } => {
                write!(f, "Error on line {line}: Invalid left-hand side of assignment.")
            },
        }
    }
}

impl std::error::Error for SyntaxError {}
