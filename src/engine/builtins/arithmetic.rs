use crate::{
    engine::{compiler::core::EvalResult, value::core::Value},
    error::EvalError,
    util::num::f64_to_i64_checked,
};

/// Adds two numbers, or concatenates two strings.
///
/// # Parameters
/// - `args`: The two operands.
/// - `line`: Line number for error reporting.
///
/// # Returns
/// The sum, or the concatenated string when both operands are strings.
pub fn add(args: &[Value], line: usize) -> EvalResult<Value> {
    if let (Value::Str(a), Value::Str(b)) = (&args[0], &args[1]) {
        return Ok(Value::Str(format!("{a}{b}")));
    }
    Ok(Value::Number(args[0].as_number(line)? + args[1].as_number(line)?))
}

pub fn subtract(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)? - args[1].as_number(line)?))
}

pub fn multiply(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)? * args[1].as_number(line)?))
}

/// Divides two numbers. Division by zero follows IEEE 754: the result is
/// an infinity or NaN, never an error.
pub fn divide(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)? / args[1].as_number(line)?))
}

/// The floored modulus: the result takes the sign of the divisor, so
/// `-7 mod 3` is `2`. A zero divisor returns the dividend unchanged.
pub fn modulo(args: &[Value], line: usize) -> EvalResult<Value> {
    let x = args[0].as_number(line)?;
    let y = args[1].as_number(line)?;
    if y == 0.0 {
        return Ok(Value::Number(x));
    }
    Ok(Value::Number(x - y * (x / y).floor()))
}

pub fn pow(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?.powf(args[1].as_number(line)?)))
}

pub fn unary_minus(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(-args[0].as_number(line)?))
}

/// Coerces to a number without changing the magnitude; `+true` is `1`.
pub fn unary_plus(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?))
}

pub fn abs(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?.abs()))
}

/// The square root. A negative operand yields NaN, following IEEE 754.
pub fn sqrt(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?.sqrt()))
}

pub fn floor(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?.floor()))
}

pub fn ceil(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(args[0].as_number(line)?.ceil()))
}

/// Rounds to the nearest integer, or with a second argument to that many
/// decimal places.
#[allow(clippy::cast_precision_loss)]
pub fn round(args: &[Value], line: usize) -> EvalResult<Value> {
    let x = args[0].as_number(line)?;
    if args.len() == 1 {
        return Ok(Value::Number(x.round()));
    }
    let decimals = f64_to_i64_checked(args[1].as_number(line)?, line)?;
    if !(0..=15).contains(&decimals) {
        return Err(EvalError::InvalidIndex {
            details: format!("cannot round to {decimals} decimals"),
            line,
        });
    }
    let factor = 10f64.powi(decimals as i32);
    Ok(Value::Number((x * factor).round() / factor))
}

pub fn min(args: &[Value], line: usize) -> EvalResult<Value> {
    let mut best = args[0].as_number(line)?;
    for arg in &args[1..] {
        best = best.min(arg.as_number(line)?);
    }
    Ok(Value::Number(best))
}

pub fn max(args: &[Value], line: usize) -> EvalResult<Value> {
    let mut best = args[0].as_number(line)?;
    for arg in &args[1..] {
        best = best.max(arg.as_number(line)?);
    }
    Ok(Value::Number(best))
}

/// The factorial of a non-negative integer.
///
/// # Errors
/// `UnsupportedType` for negatives, `IntegerExpected` for non-integers,
/// `NumberTooLarge` beyond 170, where the result leaves f64 range.
#[allow(clippy::cast_precision_loss)]
pub fn factorial(args: &[Value], line: usize) -> EvalResult<Value> {
    let n = f64_to_i64_checked(args[0].as_number(line)?, line)?;
    if n < 0 {
        return Err(EvalError::UnsupportedType {
            details: "factorial of a negative number".to_string(),
            line,
        });
    }
    if n > 170 {
        return Err(EvalError::NumberTooLarge { line });
    }
    let mut result = 1.0;
    for k in 2..=n {
        result *= k as f64;
    }
    Ok(Value::Number(result))
}
