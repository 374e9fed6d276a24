use crate::engine::{compiler::core::EvalResult, value::core::Value};

/// The numeric reading of a value, when it has one.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::Bool(b) => Some(f64::from(*b)),
        _ => None,
    }
}

/// The loose equality relation behind `==` and `!=`.
///
/// Numbers and booleans compare by numeric value, so `1 == true` holds.
/// Strings compare by content, arrays and objects element-wise with the
/// same relation, functions by identity. Values of unrelated types are
/// unequal, never an error.
#[must_use]
pub fn loose_equal(a: &Value, b: &Value) -> bool {
    if let (Some(x), Some(y)) = (numeric(a), numeric(b)) {
        return x == y;
    }
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| loose_equal(a, b))
        },
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter().all(|(key, a)| y.get(key).is_some_and(|b| loose_equal(a, b)))
        },
        (Value::Function(x), Value::Function(y)) => x == y,
        (Value::Null, Value::Null) => true,
        _ => false,
    }
}

pub fn equal(args: &[Value], _line: usize) -> EvalResult<Value> {
    Ok(Value::Bool(loose_equal(&args[0], &args[1])))
}

pub fn unequal(args: &[Value], _line: usize) -> EvalResult<Value> {
    Ok(Value::Bool(!loose_equal(&args[0], &args[1])))
}

/// Compares two operands: strings lexicographically, everything else as
/// numbers with the usual boolean coercion. Any comparison against NaN is
/// false.
fn compare(
    args: &[Value],
    line: usize,
    strings: impl Fn(&str, &str) -> bool,
    numbers: impl Fn(f64, f64) -> bool,
) -> EvalResult<Value> {
    if let (Value::Str(a), Value::Str(b)) = (&args[0], &args[1]) {
        return Ok(Value::Bool(strings(a, b)));
    }
    let a = args[0].as_number(line)?;
    let b = args[1].as_number(line)?;
    Ok(Value::Bool(numbers(a, b)))
}

pub fn smaller(args: &[Value], line: usize) -> EvalResult<Value> {
    compare(args, line, |a, b| a < b, |a, b| a < b)
}

pub fn larger(args: &[Value], line: usize) -> EvalResult<Value> {
    compare(args, line, |a, b| a > b, |a, b| a > b)
}

pub fn smaller_eq(args: &[Value], line: usize) -> EvalResult<Value> {
    compare(args, line, |a, b| a <= b, |a, b| a <= b)
}

pub fn larger_eq(args: &[Value], line: usize) -> EvalResult<Value> {
    compare(args, line, |a, b| a >= b, |a, b| a >= b)
}
