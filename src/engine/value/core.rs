use std::rc::Rc;

use indexmap::IndexMap;

use crate::{
    engine::{compiler::core::EvalResult, value::function::FunctionValue},
    error::EvalError,
};

/// Represents any value an expression can produce or a scope can hold.
///
/// Containers are reference-counted so values clone cheaply; mutation always
/// goes through copy-on-write in the subset kernels, never in place.
#[derive(Debug, Clone)]
pub enum Value {
    /// A floating-point number. The language has a single numeric type.
    Number(f64),
    /// A boolean.
    Bool(bool),
    /// A string.
    Str(String),
    /// An array; matrices are arrays of equally sized row arrays.
    Array(Rc<Vec<Value>>),
    /// An object with insertion-ordered properties.
    Object(Rc<IndexMap<String, Value>>),
    /// A callable value: a builtin or a user-defined function.
    Function(FunctionValue),
    /// The visible results of a multi-statement evaluation, in order.
    Results(Rc<Vec<Value>>),
    /// The absence of a result, e.g. a fully suppressed block.
    Null,
}

impl Value {
    /// Returns a short name for the value's type, for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Bool(_) => "boolean",
            Self::Str(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Function(_) => "function",
            Self::Results(_) => "result set",
            Self::Null => "null",
        }
    }

    /// Converts the value to a number. Booleans coerce to `1` and `0`.
    ///
    /// # Parameters
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// The numeric value, or `EvalError::UnsupportedType` for any other type.
    pub fn as_number(&self, line: usize) -> EvalResult<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Bool(b) => Ok(f64::from(*b)),
            other => Err(EvalError::UnsupportedType {
                details: format!("expected a number, found a {}", other.type_name()),
                line,
            }),
        }
    }

    /// Converts the value to a boolean. Only booleans qualify.
    pub fn as_bool(&self, line: usize) -> EvalResult<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(EvalError::UnsupportedType {
                details: format!("expected a boolean, found a {}", other.type_name()),
                line,
            }),
        }
    }

    /// Interprets the value as a condition: a boolean, or a number where
    /// any non-zero value counts as true.
    pub fn as_condition(&self, line: usize) -> EvalResult<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            Self::Number(n) => Ok(*n != 0.0),
            other => Err(EvalError::UnsupportedType {
                details: format!(
                    "expected a boolean or number condition, found a {}",
                    other.type_name()
                ),
                line,
            }),
        }
    }

    /// Borrows the value's items if it is an array.
    pub fn as_array(&self, line: usize) -> EvalResult<&[Value]> {
        match self {
            Self::Array(items) => Ok(items),
            other => Err(EvalError::UnsupportedType {
                details: format!("expected an array, found a {}", other.type_name()),
                line,
            }),
        }
    }
}

impl PartialEq for Value {
    /// Structural equality. Functions compare by identity; the language's
    /// `equal` builtin applies looser, coercing comparison instead.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Array(a), Self::Array(b)) | (Self::Results(a), Self::Results(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => a == b,
            (Self::Null, Self::Null) => true,
            _ => false,
        }
    }
}

/// Formats a number without a trailing `.0` when it is integral.
#[allow(clippy::cast_possible_truncation)]
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Formats a value as it appears inside a container, quoting strings.
fn format_nested(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
        other => other.to_string(),
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Array(items) => {
                let body = items.iter().map(format_nested).collect::<Vec<_>>().join(", ");
                write!(f, "[{body}]")
            },
            Self::Object(map) => {
                let body = map
                    .iter()
                    .map(|(k, v)| format!("{k}: {}", format_nested(v)))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{body}}}")
            },
            Self::Function(func) => write!(f, "<function {}>", func.name()),
            Self::Results(values) => {
                let body = values
                    .iter()
                    .map(Self::to_string)
                    .collect::<Vec<_>>()
                    .join("\n");
                write!(f, "{body}")
            },
            Self::Null => write!(f, "null"),
        }
    }
}
