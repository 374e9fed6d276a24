use crate::{
    engine::{compiler::core::EvalResult, value::core::Value},
    error::EvalError,
    util::num::{f64_to_i64_checked, i64_to_f64_checked},
};

/// Reads one operand as a 64-bit integer.
///
/// Bitwise operations are defined on safely-integral numbers only; a
/// fractional or out-of-range operand is an error rather than a silent
/// truncation.
fn operand(args: &[Value], position: usize, line: usize) -> EvalResult<i64> {
    f64_to_i64_checked(args[position].as_number(line)?, line)
}

/// Reads a shift count, which must lie in `0..64`.
fn shift_count(args: &[Value], line: usize) -> EvalResult<u32> {
    let count = operand(args, 1, line)?;
    u32::try_from(count)
        .ok()
        .filter(|&c| c < 64)
        .ok_or(EvalError::InvalidIndex {
            details: format!("shift count {count} is outside 0..64"),
            line,
        })
}

pub fn bit_and(args: &[Value], line: usize) -> EvalResult<Value> {
    let result = operand(args, 0, line)? & operand(args, 1, line)?;
    Ok(Value::Number(i64_to_f64_checked(result, line)?))
}

pub fn bit_or(args: &[Value], line: usize) -> EvalResult<Value> {
    let result = operand(args, 0, line)? | operand(args, 1, line)?;
    Ok(Value::Number(i64_to_f64_checked(result, line)?))
}

pub fn bit_xor(args: &[Value], line: usize) -> EvalResult<Value> {
    let result = operand(args, 0, line)? ^ operand(args, 1, line)?;
    Ok(Value::Number(i64_to_f64_checked(result, line)?))
}

pub fn bit_not(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Number(i64_to_f64_checked(!operand(args, 0, line)?, line)?))
}

pub fn left_shift(args: &[Value], line: usize) -> EvalResult<Value> {
    let result = operand(args, 0, line)? << shift_count(args, line)?;
    Ok(Value::Number(i64_to_f64_checked(result, line)?))
}

/// The arithmetic right shift; the sign bit fills in from the left.
pub fn right_shift(args: &[Value], line: usize) -> EvalResult<Value> {
    let result = operand(args, 0, line)? >> shift_count(args, line)?;
    Ok(Value::Number(i64_to_f64_checked(result, line)?))
}

/// The logical right shift: the operand's two's-complement bits are
/// reinterpreted as unsigned, so a negative number shifts in zeros.
#[allow(clippy::cast_sign_loss)]
pub fn right_shift_logical(args: &[Value], line: usize) -> EvalResult<Value> {
    let bits = operand(args, 0, line)? as u64;
    let shifted = bits >> shift_count(args, line)?;
    let result = i64::try_from(shifted).map_err(|_| EvalError::NumberTooLarge { line })?;
    Ok(Value::Number(i64_to_f64_checked(result, line)?))
}
