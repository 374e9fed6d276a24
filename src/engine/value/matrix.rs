use std::rc::Rc;

use crate::{engine::compiler::core::EvalResult, engine::value::core::Value, error::EvalError};

/// One resolved subscript, already converted to the zero-based form the
/// kernels work in.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// A single element of a dimension.
    One(i64),
    /// Several elements of a dimension, e.g. from a range subscript.
    Many(Vec<i64>),
    /// An object property.
    Prop(String),
}

/// Checks that a freshly materialized array literal is rectangular.
///
/// An array whose items include arrays must be all arrays of equal length;
/// mixing rows and scalars, or rows of different lengths, is an error. This
/// runs when the literal materializes at evaluation time, never at parse
/// time, so a ragged literal parses fine and fails only if evaluated.
pub fn validate_rectangular(items: &[Value], line: usize) -> EvalResult<()> {
    let mut expected: Option<usize> = None;
    let mut scalars = false;

    for item in items {
        if let Value::Array(row) = item {
            match expected {
                None => expected = Some(row.len()),
                Some(len) if len != row.len() => {
                    return Err(EvalError::Dimension {
                        expected: len,
                        found: row.len(),
                        line,
                    });
                },
                Some(_) => {},
            }
        } else {
            scalars = true;
        }
    }

    if scalars && expected.is_some() {
        return Err(EvalError::UnsupportedType {
            details: "matrix rows and scalar items cannot be mixed".to_string(),
            line,
        });
    }
    Ok(())
}

/// Returns the size of dimension `depth` of a value, when it has one.
///
/// Dimension 0 of an array is its length and of an object its property
/// count; deeper dimensions follow the first element, which is sound for
/// validated (rectangular) matrices.
#[must_use]
pub fn axis_size(value: &Value, depth: usize) -> Option<usize> {
    match value {
        Value::Array(items) => {
            if depth == 0 {
                Some(items.len())
            } else {
                axis_size(items.first()?, depth - 1)
            }
        },
        Value::Object(map) => (depth == 0).then(|| map.len()),
        _ => None,
    }
}

/// Borrows one element of an array, reporting a one-based index on failure.
fn element(items: &[Value], index: i64, line: usize) -> EvalResult<&Value> {
    usize::try_from(index)
        .ok()
        .and_then(|i| items.get(i))
        .ok_or_else(|| EvalError::IndexOutOfBounds {
            index: index + 1,
            size: items.len(),
            line,
        })
}

/// Reads a subset of a value, one selection per dimension, applied jointly.
///
/// Single selections drill into the value; multi-selections produce an
/// array of the picked elements with any deeper selections applied to each.
pub fn get_subset(value: &Value, selections: &[Selection], line: usize) -> EvalResult<Value> {
    let Some((first, rest)) = selections.split_first() else {
        return Ok(value.clone());
    };

    match (value, first) {
        (Value::Array(items), Selection::One(index)) => {
            get_subset(element(items, *index, line)?, rest, line)
        },
        (Value::Array(items), Selection::Many(indices)) => {
            let picked = indices
                .iter()
                .map(|&index| get_subset(element(items, index, line)?, rest, line))
                .collect::<EvalResult<Vec<_>>>()?;
            Ok(Value::Array(Rc::new(picked)))
        },
        (Value::Object(map), Selection::Prop(name)) => {
            let inner = map.get(name).ok_or_else(|| EvalError::UnknownProperty {
                name: name.clone(),
                line,
            })?;
            get_subset(inner, rest, line)
        },
        (other, Selection::Prop(name)) => Err(EvalError::UnsupportedType {
            details: format!("cannot read property '{name}' of a {}", other.type_name()),
            line,
        }),
        (other, _) => Err(EvalError::UnsupportedType {
            details: format!("cannot index a {}", other.type_name()),
            line,
        }),
    }
}

/// Writes a subset of a value, returning the updated copy.
///
/// Containers are copied on write; the original value is untouched. Writing
/// one element past the end of an array grows it, filling the gap with
/// zeros; growth applies only at the final selection, an out-of-range index
/// in an intermediate position is still an error. A multi-selection write
/// requires a replacement array of matching length.
pub fn set_subset(
    value: &Value,
    selections: &[Selection],
    replacement: Value,
    line: usize,
) -> EvalResult<Value> {
    let Some((first, rest)) = selections.split_first() else {
        return Ok(replacement);
    };

    match (value, first) {
        (Value::Array(items), Selection::One(index)) => {
            let mut out = items.as_ref().clone();
            let in_range = usize::try_from(*index).ok().filter(|&i| i < out.len());
            match in_range {
                Some(i) => {
                    out[i] = set_subset(&out[i], rest, replacement, line)?;
                },
                None if rest.is_empty() && *index >= 0 => {
                    #[allow(clippy::cast_sign_loss)]
                    let i = *index as usize;
                    out.resize(i, Value::Number(0.0));
                    out.push(replacement);
                },
                None => {
                    return Err(EvalError::IndexOutOfBounds {
                        index: *index + 1,
                        size: out.len(),
                        line,
                    });
                },
            }
            Ok(Value::Array(Rc::new(out)))
        },
        (Value::Array(items), Selection::Many(indices)) => {
            let replacements = match &replacement {
                Value::Array(values) if values.len() == indices.len() => values.as_ref().clone(),
                Value::Array(values) => {
                    return Err(EvalError::Dimension {
                        expected: indices.len(),
                        found: values.len(),
                        line,
                    });
                },
                _ => {
                    return Err(EvalError::Dimension {
                        expected: indices.len(),
                        found: 1,
                        line,
                    });
                },
            };
            let mut out = items.as_ref().clone();
            for (&index, item) in indices.iter().zip(replacements) {
                let i = usize::try_from(index)
                    .ok()
                    .filter(|&i| i < out.len())
                    .ok_or_else(|| EvalError::IndexOutOfBounds {
                        index: index + 1,
                        size: out.len(),
                        line,
                    })?;
                out[i] = set_subset(&out[i], rest, item, line)?;
            }
            Ok(Value::Array(Rc::new(out)))
        },
        (Value::Object(map), Selection::Prop(name)) => {
            let mut out = map.as_ref().clone();
            let updated = match out.get(name) {
                Some(existing) => set_subset(existing, rest, replacement, line)?,
                None if rest.is_empty() => replacement,
                None => {
                    return Err(EvalError::UnknownProperty {
                        name: name.clone(),
                        line,
                    });
                },
            };
            out.insert(name.clone(), updated);
            Ok(Value::Object(Rc::new(out)))
        },
        (other, Selection::Prop(name)) => Err(EvalError::UnsupportedType {
            details: format!("cannot set property '{name}' on a {}", other.type_name()),
            line,
        }),
        (other, _) => Err(EvalError::UnsupportedType {
            details: format!("cannot index a {}", other.type_name()),
            line,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::{get_subset, set_subset, validate_rectangular, Selection};
    use crate::engine::value::core::Value;

    fn numbers(ns: &[f64]) -> Value {
        Value::Array(Rc::new(ns.iter().map(|&n| Value::Number(n)).collect()))
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = [numbers(&[1.0, 2.0]), numbers(&[3.0])];
        assert!(validate_rectangular(&rows, 1).is_err());
        let even = [numbers(&[1.0, 2.0]), numbers(&[3.0, 4.0])];
        assert!(validate_rectangular(&even, 1).is_ok());
    }

    #[test]
    fn get_is_zero_based_and_bounds_checked() {
        let v = numbers(&[10.0, 20.0, 30.0]);
        let got = get_subset(&v, &[Selection::One(1)], 1).unwrap();
        assert_eq!(got, Value::Number(20.0));
        assert!(get_subset(&v, &[Selection::One(3)], 1).is_err());
    }

    #[test]
    fn single_write_grows_with_zero_fill() {
        let v = numbers(&[1.0]);
        let grown = set_subset(&v, &[Selection::One(2)], Value::Number(7.0), 1).unwrap();
        assert_eq!(grown, numbers(&[1.0, 0.0, 7.0]));
    }

    #[test]
    fn many_write_requires_matching_length() {
        let v = numbers(&[1.0, 2.0, 3.0]);
        let sel = [Selection::Many(vec![0, 2])];
        let ok = set_subset(&v, &sel, numbers(&[8.0, 9.0]), 1).unwrap();
        assert_eq!(ok, numbers(&[8.0, 2.0, 9.0]));
        assert!(set_subset(&v, &sel, numbers(&[8.0]), 1).is_err());
    }
}
