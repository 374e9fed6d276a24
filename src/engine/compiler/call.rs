use std::rc::Rc;

use crate::{
    ast::Node,
    engine::{
        compiler::core::{compile, CompileContext, CompiledExpression, EvalResult},
        namespace::{Callable, Entry},
        scope::ScopeRef,
        value::core::Value,
    },
    error::EvalError,
};

/// Resolves a function name against the snapshot, applying any registered
/// call-site transform. Returns `None` for missing names and constants.
pub(crate) fn resolve_callable(ctx: &CompileContext, name: &str) -> Option<Callable> {
    match ctx.namespace.get(name)? {
        Entry::Function(callable) => Some(ctx.transforms.apply(name, callable)),
        Entry::Constant(_) => None,
    }
}

/// Evaluates compiled arguments left to right.
pub(crate) fn eval_args(
    compiled: &[CompiledExpression],
    scope: &ScopeRef,
) -> EvalResult<Vec<Value>> {
    compiled.iter().map(|arg| arg.evaluate(scope)).collect()
}

/// Compiles an operator application.
///
/// Operators resolve against the namespace only; the callee is bound once,
/// here. A missing or non-function entry still compiles and raises when the
/// closure first runs, keeping compilation infallible.
pub(crate) fn compile_named_call(
    fn_name: &str,
    args: &[Node],
    line: usize,
    ctx: &CompileContext,
) -> CompiledExpression {
    match resolve_callable(ctx, fn_name) {
        Some(Callable::Evaluated { name, arity, f }) => {
            let compiled: Vec<CompiledExpression> =
                args.iter().map(|arg| compile(arg, ctx)).collect();
            CompiledExpression::new(move |scope| {
                arity.check_call(&name, compiled.len(), line)?;
                let values = eval_args(&compiled, scope)?;
                f(&values, line)
            })
        },
        Some(Callable::Raw { f, .. }) => compile_raw_call(&f, args, line, ctx),
        None => {
            let is_constant = matches!(ctx.namespace.get(fn_name), Some(Entry::Constant(_)));
            let name = fn_name.to_string();
            CompiledExpression::new(move |_| {
                if is_constant {
                    Err(EvalError::UnsupportedType {
                        details: format!("'{name}' is a constant, not a function"),
                        line,
                    })
                } else {
                    Err(EvalError::UndefinedSymbol {
                        name: name.clone(),
                        line,
                    })
                }
            })
        },
    }
}

/// Compiles a call to a raw callable: the argument expressions are handed
/// over unevaluated together with the scope and the snapshot, and the
/// callable decides what to evaluate and when.
fn compile_raw_call(
    f: &crate::engine::namespace::RawFn,
    args: &[Node],
    line: usize,
    ctx: &CompileContext,
) -> CompiledExpression {
    let f = Rc::clone(f);
    let nodes = args.to_vec();
    let ctx = ctx.clone();
    CompiledExpression::new(move |scope| f(&nodes, scope, &ctx, line))
}

/// Compiles an explicit function call.
///
/// A symbol callee binds its namespace callable at compile time, but the
/// scope gets the first word at every evaluation: a scope binding with the
/// same name shadows the namespace, which is how user-defined functions are
/// called. Any other callee is evaluated to a function value and invoked.
pub(crate) fn compile_function(
    callee: &Node,
    args: &[Node],
    line: usize,
    ctx: &CompileContext,
) -> CompiledExpression {
    let compiled: Vec<CompiledExpression> = args.iter().map(|arg| compile(arg, ctx)).collect();

    let Node::Symbol { name, .. } = callee else {
        let callee = compile(callee, ctx);
        return CompiledExpression::new(move |scope| {
            let target = callee.evaluate(scope)?;
            let Value::Function(function) = target else {
                return Err(EvalError::UnsupportedType {
                    details: format!("cannot call a {}", target.type_name()),
                    line,
                });
            };
            let values = eval_args(&compiled, scope)?;
            function.invoke(&values, line)
        });
    };

    let bound = resolve_callable(ctx, name);
    let is_constant = matches!(ctx.namespace.get(name), Some(Entry::Constant(_)));
    let nodes = args.to_vec();
    let ctx = ctx.clone();
    let name = name.clone();
    CompiledExpression::new(move |scope| {
        let shadow = scope.borrow().get(&name);
        if let Some(value) = shadow {
            let Value::Function(function) = value else {
                return Err(EvalError::UnsupportedType {
                    details: format!("'{name}' is a {} and cannot be called", value.type_name()),
                    line,
                });
            };
            let values = eval_args(&compiled, scope)?;
            return function.invoke(&values, line);
        }

        match &bound {
            Some(Callable::Evaluated { name, arity, f }) => {
                arity.check_call(name, compiled.len(), line)?;
                let values = eval_args(&compiled, scope)?;
                f(&values, line)
            },
            Some(Callable::Raw { f, .. }) => f(&nodes, scope, &ctx, line),
            None if is_constant => Err(EvalError::UnsupportedType {
                details: format!("'{name}' is a constant, not a function"),
                line,
            }),
            None => Err(EvalError::UndefinedSymbol {
                name: name.clone(),
                line,
            }),
        }
    })
}
