use std::rc::Rc;

use crate::{
    engine::{compiler::core::EvalResult, value::core::Value},
    error::EvalError,
    util::num::{f64_to_i64_checked, usize_to_f64_checked},
};

/// The dimension sizes of a nested array, following first elements.
fn dims(value: &Value) -> Vec<usize> {
    let mut out = Vec::new();
    let mut current = value;
    while let Value::Array(items) = current {
        out.push(items.len());
        match items.first() {
            Some(first @ Value::Array(_)) => current = first,
            _ => break,
        }
    }
    out
}

/// Borrows a value as matrix rows; every item must itself be an array.
fn matrix_rows(value: &Value, line: usize) -> EvalResult<Vec<&[Value]>> {
    value
        .as_array(line)?
        .iter()
        .map(|row| match row {
            Value::Array(items) => Ok(items.as_slice()),
            other => Err(EvalError::UnsupportedType {
                details: format!("expected a matrix row, found a {}", other.type_name()),
                line,
            }),
        })
        .collect()
}

/// The shape of a value as an array of dimension sizes.
///
/// A matrix yields `[rows, columns]`, a vector `[length]`, a string its
/// character count, and a scalar the empty array.
pub fn size(args: &[Value], line: usize) -> EvalResult<Value> {
    let sizes = match &args[0] {
        Value::Str(text) => vec![text.chars().count()],
        other => dims(other),
    };
    let items = sizes
        .into_iter()
        .map(|n| Ok(Value::Number(usize_to_f64_checked(n, line)?)))
        .collect::<EvalResult<Vec<Value>>>()?;
    Ok(Value::Array(Rc::new(items)))
}

/// Transposes a matrix. Vectors and scalars come back unchanged.
///
/// # Errors
/// `Dimension` when the rows are not all the same length.
pub fn transpose(args: &[Value], line: usize) -> EvalResult<Value> {
    let value = &args[0];
    let Value::Array(items) = value else {
        return Ok(value.clone());
    };
    if !matches!(items.first(), Some(Value::Array(_))) {
        return Ok(value.clone());
    }

    let rows = matrix_rows(value, line)?;
    let cols = rows.first().map_or(0, |row| row.len());
    for row in &rows {
        if row.len() != cols {
            return Err(EvalError::Dimension { expected: cols, found: row.len(), line });
        }
    }

    let mut out = Vec::with_capacity(cols);
    for j in 0..cols {
        let column: Vec<Value> = rows.iter().map(|row| row[j].clone()).collect();
        out.push(Value::Array(Rc::new(column)));
    }
    Ok(Value::Array(Rc::new(out)))
}

/// Reads the index argument of `row` and `column`.
///
/// Zero-based here: this is the host-facing convention. Expression-side
/// calls go through the call-site transform, which renumbers the
/// language's one-based index before it reaches this table.
fn index_arg(args: &[Value], line: usize) -> EvalResult<i64> {
    f64_to_i64_checked(args[1].as_number(line)?, line)
}

/// One row of a matrix, as a fresh vector.
pub fn row(args: &[Value], line: usize) -> EvalResult<Value> {
    let rows = matrix_rows(&args[0], line)?;
    let index = index_arg(args, line)?;
    let picked = usize::try_from(index)
        .ok()
        .and_then(|i| rows.get(i))
        .ok_or(EvalError::IndexOutOfBounds { index: index + 1, size: rows.len(), line })?;
    Ok(Value::Array(Rc::new(picked.to_vec())))
}

/// One column of a matrix, as a fresh vector.
pub fn column(args: &[Value], line: usize) -> EvalResult<Value> {
    let rows = matrix_rows(&args[0], line)?;
    let index = index_arg(args, line)?;
    let mut out = Vec::with_capacity(rows.len());
    for items in &rows {
        let item = usize::try_from(index)
            .ok()
            .and_then(|j| items.get(j))
            .ok_or(EvalError::IndexOutOfBounds { index: index + 1, size: items.len(), line })?;
        out.push(item.clone());
    }
    Ok(Value::Array(Rc::new(out)))
}

/// Concatenates vectors or matrices along a dimension.
///
/// An optional trailing number picks the dimension, zero-based on this
/// side of the transform; without it the last dimension of the operands
/// is used, so vectors chain and matrices join side by side.
///
/// # Errors
/// `Dimension` when operand shapes disagree, `InvalidIndex` for a
/// dimension outside the operand shape, `UnsupportedType` for non-array
/// operands or more than two dimensions.
pub fn concat(args: &[Value], line: usize) -> EvalResult<Value> {
    let (arrays, picked_dim) = match args.split_last() {
        Some((Value::Number(n), rest)) if !rest.is_empty() => {
            (rest, Some(f64_to_i64_checked(*n, line)?))
        },
        _ => (args, None),
    };
    if arrays.is_empty() {
        return Err(EvalError::UnsupportedType {
            details: "concat needs at least one array".to_string(),
            line,
        });
    }

    let ndims = dims(&arrays[0]).len();
    if ndims == 0 || ndims > 2 {
        return Err(EvalError::UnsupportedType {
            details: format!("cannot concat a {}", arrays[0].type_name()),
            line,
        });
    }
    for value in arrays {
        let found = dims(value).len();
        if found != ndims {
            return Err(EvalError::Dimension { expected: ndims, found, line });
        }
    }

    let dim = match picked_dim {
        None => ndims - 1,
        Some(d) => usize::try_from(d).ok().filter(|&d| d < ndims).ok_or_else(|| {
            EvalError::InvalidIndex {
                details: format!("dimension {d} is outside the operand shape"),
                line,
            }
        })?,
    };

    if dim == 0 {
        if ndims == 2 {
            // stacking rows requires one column count across all operands
            let cols = matrix_rows(&arrays[0], line)?.first().map_or(0, |row| row.len());
            for value in arrays {
                for items in matrix_rows(value, line)? {
                    if items.len() != cols {
                        return Err(EvalError::Dimension {
                            expected: cols,
                            found: items.len(),
                            line,
                        });
                    }
                }
            }
        }
        let mut out = Vec::new();
        for value in arrays {
            out.extend(value.as_array(line)?.iter().cloned());
        }
        return Ok(Value::Array(Rc::new(out)));
    }

    // joining side by side requires one row count across all operands
    let mut out: Vec<Vec<Value>> = matrix_rows(&arrays[0], line)?
        .iter()
        .map(|items| items.to_vec())
        .collect();
    for value in &arrays[1..] {
        let rows = matrix_rows(value, line)?;
        if rows.len() != out.len() {
            return Err(EvalError::Dimension { expected: out.len(), found: rows.len(), line });
        }
        for (target, items) in out.iter_mut().zip(rows) {
            target.extend(items.iter().cloned());
        }
    }
    Ok(Value::Array(Rc::new(
        out.into_iter().map(|items| Value::Array(Rc::new(items))).collect(),
    )))
}
