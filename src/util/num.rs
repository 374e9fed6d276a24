use crate::{engine::compiler::core::EvalResult, error::EvalError};

/// Largest integer magnitude exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_INT: u64 = 9_007_199_254_740_991;

/// Safely converts an `f64` to `i64` if the value is finite, within the safe
/// integer range, and not fractional.
///
/// # Parameters
/// - `value`: The floating-point value to convert.
/// - `line`: Source code line number for error reporting.
///
/// # Returns
/// - `Ok(i64)`: The converted value if it is safe.
/// - `Err(EvalError::UnsupportedType | NumberTooLarge | IntegerExpected)`:
///   If conversion would lose information.
///
/// # Example
/// ```
/// use mexpr::util::num::f64_to_i64_checked;
///
/// assert_eq!(f64_to_i64_checked(1000.0, 1).unwrap(), 1000);
/// assert!(f64_to_i64_checked(1.5, 1).is_err());
/// assert!(f64_to_i64_checked(1e20, 1).is_err());
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_checked(value: f64, line: usize) -> EvalResult<i64> {
    if !value.is_finite() {
        return Err(EvalError::UnsupportedType {
            details: format!("cannot convert non-finite value {value} to an integer"),
            line,
        });
    }
    if value.abs() > MAX_SAFE_INT as f64 {
        return Err(EvalError::NumberTooLarge { line });
    }
    if value.fract() != 0.0 {
        return Err(EvalError::IntegerExpected {
            details: format!("{value} is fractional"),
            line,
        });
    }
    Ok(value as i64)
}

/// Safely converts an `i64` to `f64` if and only if it is exactly
/// representable.
///
/// # Parameters
/// - `value`: The integer to convert.
/// - `line`: Source code line number for error reporting.
///
/// # Returns
/// - `Ok(f64)`: The converted value if it is safe.
/// - `Err(EvalError::NumberTooLarge { line })`: If the value is too large.
///
/// # Example
/// ```
/// use mexpr::util::num::i64_to_f64_checked;
///
/// assert_eq!(i64_to_f64_checked(42, 0).unwrap(), 42.0);
/// assert!(i64_to_f64_checked(i64::MAX, 0).is_err());
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn i64_to_f64_checked(value: i64, line: usize) -> EvalResult<f64> {
    if value.unsigned_abs() > MAX_SAFE_INT {
        return Err(EvalError::NumberTooLarge { line });
    }
    Ok(value as f64)
}

/// Safely converts a `usize` to `f64` if and only if it is exactly
/// representable.
///
/// # Parameters
/// - `value`: The value to convert.
/// - `line`: Source code line number for error reporting.
///
/// # Returns
/// - `Ok(f64)`: The converted value if it is safe.
/// - `Err(EvalError::NumberTooLarge { line })`: If the value is too large.
#[allow(clippy::cast_precision_loss)]
pub const fn usize_to_f64_checked(value: usize, line: usize) -> EvalResult<f64> {
    if value as u64 > MAX_SAFE_INT {
        return Err(EvalError::NumberTooLarge { line });
    }
    Ok(value as f64)
}
