/// Errors raised while evaluating a compiled expression.
pub mod eval_error;
/// Errors raised while tokenizing or parsing source text.
pub mod syntax_error;

pub use eval_error::EvalError;
pub use syntax_error::SyntaxError;

/// Any error an evaluation entry point can produce.
///
/// The string-in entry points (`evaluate` and friends) run the whole
/// pipeline, so either phase can fail; this wrapper carries both.
#[derive(Debug)]
pub enum Error {
    /// The source text did not tokenize or parse.
    Syntax(SyntaxError),
    /// The expression failed while being evaluated.
    Eval(EvalError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax(e) => e.fmt(f),
            Self::Eval(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for Error {}

impl From<SyntaxError> for Error {
    fn from(e: SyntaxError) -> Self {
        Self::Syntax(e)
    }
}

impl From<EvalError> for Error {
    fn from(e: EvalError) -> Self {
        Self::Eval(e)
    }
}
