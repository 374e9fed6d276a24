use crate::{
    ast::Node,
    engine::{
        compiler::core::{compile, CompileContext, EvalResult},
        namespace::Arity,
        scope::ScopeRef,
        value::core::Value,
    },
};

/// Logical negation via the truthiness rules: booleans as themselves,
/// numbers as `!= 0`.
pub fn not(args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Bool(!args[0].as_condition(line)?))
}

/// Short-circuiting conjunction.
///
/// A raw callable: it receives its operand expressions unevaluated and
/// compiles them on demand, so a false left side never touches the right.
///
/// # Parameters
/// - `args`: The two operand expressions.
/// - `scope`: The scope of the enclosing evaluation.
/// - `ctx`: The compile snapshot of the enclosing expression.
/// - `line`: Line number for error reporting.
pub fn and(
    args: &[Node],
    scope: &ScopeRef,
    ctx: &CompileContext,
    line: usize,
) -> EvalResult<Value> {
    Arity::Exact(2).check_call("and", args.len(), line)?;
    let left = compile(&args[0], ctx).evaluate(scope)?;
    if !left.as_condition(line)? {
        return Ok(Value::Bool(false));
    }
    let right = compile(&args[1], ctx).evaluate(scope)?;
    Ok(Value::Bool(right.as_condition(line)?))
}

/// Short-circuiting disjunction; the mirror of [`and`].
pub fn or(
    args: &[Node],
    scope: &ScopeRef,
    ctx: &CompileContext,
    line: usize,
) -> EvalResult<Value> {
    Arity::Exact(2).check_call("or", args.len(), line)?;
    let left = compile(&args[0], ctx).evaluate(scope)?;
    if left.as_condition(line)? {
        return Ok(Value::Bool(true));
    }
    let right = compile(&args[1], ctx).evaluate(scope)?;
    Ok(Value::Bool(right.as_condition(line)?))
}
