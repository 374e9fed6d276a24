use crate::{
    ast::Node,
    engine::{
        compiler::core::{compile, CompileContext, CompiledExpression, EvalResult},
        scope::{ChildScope, Scope, ScopeRef},
        value::{
            core::Value,
            matrix::{self, Selection},
        },
    },
    error::EvalError,
    util::num::{f64_to_i64_checked, usize_to_f64_checked},
};

/// Compiles a subscript or property read.
pub(crate) fn compile_index(
    object: &Node,
    parts: &[Node],
    line: usize,
    ctx: &CompileContext,
) -> CompiledExpression {
    let object = compile(object, ctx);
    let parts: Vec<CompiledExpression> = parts.iter().map(|part| compile(part, ctx)).collect();
    CompiledExpression::new(move |scope| {
        let target = object.evaluate(scope)?;
        let selections = eval_selections(&target, &parts, scope, line)?;
        matrix::get_subset(&target, &selections, line)
    })
}

/// Evaluates subscript parts into zero-based selections.
///
/// Each part runs in a child scope in which `end` is bound to the size of
/// the dimension the part addresses, so `a[end - 1]` works. The binding
/// exists only while the part evaluates and only when the dimension has a
/// size.
pub(crate) fn eval_selections(
    target: &Value,
    parts: &[CompiledExpression],
    scope: &ScopeRef,
    line: usize,
) -> EvalResult<Vec<Selection>> {
    let mut selections = Vec::with_capacity(parts.len());
    for (depth, part) in parts.iter().enumerate() {
        let value = match matrix::axis_size(target, depth) {
            Some(size) => {
                let mut frame = ChildScope::new(scope);
                frame.set("end", Value::Number(usize_to_f64_checked(size, line)?));
                part.evaluate(&frame.into_ref())?
            },
            None => part.evaluate(scope)?,
        };
        selections.push(to_selection(value, line)?);
    }
    Ok(selections)
}

/// Converts an evaluated subscript to a selection, renumbering the
/// language's one-based inclusive indices to the kernels' zero-based form.
fn to_selection(value: Value, line: usize) -> EvalResult<Selection> {
    match value {
        Value::Str(name) => Ok(Selection::Prop(name)),
        Value::Number(n) => Ok(Selection::One(one_based(n, line)?)),
        Value::Array(items) => {
            let indices = items
                .iter()
                .map(|item| match item {
                    Value::Number(n) => one_based(*n, line),
                    other => Err(EvalError::InvalidIndex {
                        details: format!("selection contains a {}", other.type_name()),
                        line,
                    }),
                })
                .collect::<EvalResult<Vec<i64>>>()?;
            Ok(Selection::Many(indices))
        },
        other => Err(EvalError::InvalidIndex {
            details: format!("cannot index with a {}", other.type_name()),
            line,
        }),
    }
}

fn one_based(n: f64, line: usize) -> EvalResult<i64> {
    let typed = f64_to_i64_checked(n, line)?;
    if typed < 1 {
        return Err(EvalError::InvalidIndex {
            details: format!("index {typed} is not positive; indices start at 1"),
            line,
        });
    }
    Ok(typed - 1)
}

/// Compiles an assignment to a symbol or to an index chain.
pub(crate) fn compile_assignment(
    target: &Node,
    value: &Node,
    line: usize,
    ctx: &CompileContext,
) -> CompiledExpression {
    let value = compile(value, ctx);

    if let Node::Symbol { name, .. } = target {
        let name = name.clone();
        return CompiledExpression::new(move |scope| {
            let value = value.evaluate(scope)?;
            scope.borrow_mut().set(&name, value.clone());
            Ok(value)
        });
    }

    let Some((root, groups)) = flatten_target(target) else {
        // The parser never produces such a target; a hand-built tree can.
        return CompiledExpression::new(move |_| {
            Err(EvalError::UnsupportedType {
                details: "assignment target must be a symbol or an index chain".to_string(),
                line,
            })
        });
    };

    let groups: Vec<Vec<CompiledExpression>> = groups
        .iter()
        .map(|parts| parts.iter().map(|part| compile(part, ctx)).collect())
        .collect();
    CompiledExpression::new(move |scope| {
        let value = value.evaluate(scope)?;
        let current = scope
            .borrow()
            .get(&root)
            .ok_or_else(|| EvalError::UndefinedSymbol {
                name: root.clone(),
                line,
            })?;
        let updated = set_path(&current, &groups, value.clone(), scope, line)?;
        scope.borrow_mut().set(&root, updated);
        Ok(value)
    })
}

/// Flattens an index chain target into its root symbol and one group of
/// subscript parts per hop, outermost last.
fn flatten_target(target: &Node) -> Option<(String, Vec<&[Node]>)> {
    let mut groups = Vec::new();
    let mut node = target;
    loop {
        match node {
            Node::Index { object, parts, .. } => {
                groups.push(parts.as_slice());
                node = object;
            },
            Node::Parenthesis { inner, .. } => node = inner,
            Node::Symbol { name, .. } => {
                groups.reverse();
                return Some((name.clone(), groups));
            },
            _ => return None,
        }
    }
}

/// Applies a replacement through a chain of subset groups, copy-on-write
/// from the inside out.
fn set_path(
    current: &Value,
    groups: &[Vec<CompiledExpression>],
    replacement: Value,
    scope: &ScopeRef,
    line: usize,
) -> EvalResult<Value> {
    let Some((first, rest)) = groups.split_first() else {
        return Ok(replacement);
    };

    let selections = eval_selections(current, first, scope, line)?;
    if rest.is_empty() {
        matrix::set_subset(current, &selections, replacement, line)
    } else {
        let inner = matrix::get_subset(current, &selections, line)?;
        let updated = set_path(&inner, rest, replacement, scope, line)?;
        matrix::set_subset(current, &selections, updated, line)
    }
}
