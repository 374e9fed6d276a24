#[derive(Debug)]
/// Represents all errors that can occur while evaluating an expression.
pub enum EvalError {
    /// A symbol was neither in the scope nor in the namespace.
    UndefinedSymbol {
        /// The name of the symbol.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A function was called with the wrong number of arguments.
    ArgumentCount {
        /// The name of the function.
        name: String,
        /// A description of the accepted argument counts.
        expected: String,
        /// The number of arguments actually supplied.
        found: usize,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A value had a type an operation cannot work with.
    UnsupportedType {
        /// Details about the type mismatch.
        details: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Matrix rows (or a subset replacement) had mismatched sizes.
    Dimension {
        /// The size that was expected.
        expected: usize,
        /// The size actually found.
        found: usize,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An index pointed outside the container, reported as typed (one-based).
    IndexOutOfBounds {
        /// The index that was requested.
        index: i64,
        /// The number of elements in the indexed dimension.
        size: usize,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An object was asked for a property it does not have.
    UnknownProperty {
        /// The property name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An index value was not a positive integer (or selection of them).
    InvalidIndex {
        /// Details about why the index is invalid.
        details: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A range had a zero step or non-numeric bounds.
    InvalidRange {
        /// Details about why the range is invalid.
        details: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An integer was required but the number was fractional.
    IntegerExpected {
        /// Details about where the integer was needed.
        details: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A numeric value was too large to be represented safely.
    NumberTooLarge {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UndefinedSymbol { name, line } => {
                write!(f, "Error on line {line}: Undefined symbol '{name}'.")
            },

            Self::ArgumentCount { name, expected, found, line } => {
                write!(f, "Error on line {line}: Function '{name}' expects {expected} argument(s), but {found} were supplied.")
            },

            Self::UnsupportedType { details, line } => {
                write!(f, "Error on line {line}: Unsupported type: {details}.")
            },

            Self::Dimension { expected, found, line } => {
                write!(f, "Error on line {line}: Dimension mismatch. Expected size {expected}, found {found}.")
            },

            Self::IndexOutOfBounds { index, size, line } => {
                write!(f, "Error on line {line}: Index {index} is out of bounds for size {size}.")
            },

            Self::UnknownProperty { name, line } => {
                write!(f, "Error on line {line}: Unknown property '{name}'.")
            },

            Self::InvalidIndex { details, line } => {
                write!(f, "Error on line {line}: Invalid index: {details}.")
            },

            Self::InvalidRange { details, line } => {
                write!(f, "Error on line {line}: Invalid range: {details}.")
            },

            Self::IntegerExpected { details, line } => {
                write!(f, "Error on line {line}: Expected an integer: {details}.")
            },

            Self::NumberTooLarge { line } => {
                write!(f, "Error on line {line}: Number is too large to be represented safely.")
            },
        }
    }
}

impl std::error::Error for EvalError {}
