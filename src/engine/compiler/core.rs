use std::rc::Rc;

use indexmap::IndexMap;

use crate::{
    ast::Node,
    engine::{
        compiler::{access, call},
        namespace::{Callable, Entry, Namespace},
        scope::ScopeRef,
        transform::TransformTable,
        value::{
            core::Value,
            function::{FunctionValue, LambdaFunction},
            matrix,
        },
    },
    error::EvalError,
};

/// Shorthand for results produced while evaluating.
pub type EvalResult<T> = Result<T, EvalError>;

/// An expression folded into a reusable closure.
///
/// Compilation never fails; anything that can go wrong is deferred into the
/// closure and surfaces as an `EvalError` when it runs. A compiled
/// expression is stateless between calls except through the scope it is
/// given, and it retains no reference to any scope beyond a call.
#[derive(Clone)]
pub struct CompiledExpression {
    eval: Rc<dyn Fn(&ScopeRef) -> EvalResult<Value>>,
}

impl CompiledExpression {
    pub(crate) fn new(f: impl Fn(&ScopeRef) -> EvalResult<Value> + 'static) -> Self {
        Self { eval: Rc::new(f) }
    }

    /// Runs the expression against a scope.
    ///
    /// # Errors
    /// Whatever the expression raises: undefined symbols, argument count
    /// mismatches, dimension and index errors, unsupported types.
    pub fn evaluate(&self, scope: &ScopeRef) -> EvalResult<Value> {
        (self.eval)(scope)
    }
}

impl std::fmt::Debug for CompiledExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CompiledExpression")
    }
}

/// The table snapshot a compilation runs against.
///
/// Taken once per compile from the engine's namespace and transform table.
/// Compiled expressions hold the snapshot, so mutating any engine's tables
/// afterwards never changes what an already compiled expression does.
#[derive(Clone)]
pub struct CompileContext {
    /// The function and constant table.
    pub namespace: Rc<Namespace>,
    /// The call-site transform table.
    pub transforms: Rc<TransformTable>,
}

/// What a symbol falls back to when the scope has no binding for it.
enum SymbolFallback {
    /// A namespace constant, or a namespace function as a value.
    Value(Value),
    /// A raw namespace callable, which has no value form.
    Raw,
    /// Nothing; the symbol is undefined unless the scope binds it.
    Missing,
}

/// Compiles an expression tree into a closure.
///
/// Name resolution against the namespace happens here, once per call site;
/// scope lookups happen when the closure runs, so symbols bind late.
pub fn compile(node: &Node, ctx: &CompileContext) -> CompiledExpression {
    match node {
        Node::Constant { value, .. } => {
            let value = value.clone();
            CompiledExpression::new(move |_| Ok(value.clone()))
        },

        Node::Parenthesis { inner, .. } => compile(inner, ctx),

        Node::Symbol { name, line } => compile_symbol(name, *line, ctx),

        Node::Operator { fn_name, args, line, .. } => {
            call::compile_named_call(fn_name, args, *line, ctx)
        },

        Node::Function { callee, args, line } => call::compile_function(callee, args, *line, ctx),

        Node::Assignment { target, value, line } => {
            access::compile_assignment(target, value, *line, ctx)
        },

        Node::FunctionAssignment { name, params, body, line } => {
            compile_function_assignment(name, params, body, *line, ctx)
        },

        Node::Index { object, parts, line } => access::compile_index(object, parts, *line, ctx),

        Node::Range { start, end, step, line } => compile_range(start, end, step.as_deref(), *line, ctx),

        Node::Array { items, line } => compile_array(items, *line, ctx),

        Node::Object { properties, line } => compile_object(properties, *line, ctx),

        Node::Conditional { condition, truthy, falsy, line } => {
            let condition = compile(condition, ctx);
            let truthy = compile(truthy, ctx);
            let falsy = compile(falsy, ctx);
            let line = *line;
            CompiledExpression::new(move |scope| {
                // Only the taken branch runs; the other closure stays cold.
                if condition.evaluate(scope)?.as_condition(line)? {
                    truthy.evaluate(scope)
                } else {
                    falsy.evaluate(scope)
                }
            })
        },

        Node::Block { statements, .. } => {
            let compiled: Vec<(CompiledExpression, bool)> = statements
                .iter()
                .map(|statement| (compile(&statement.node, ctx), statement.visible))
                .collect();
            CompiledExpression::new(move |scope| {
                let mut results = Vec::new();
                for (statement, visible) in &compiled {
                    let value = statement.evaluate(scope)?;
                    if *visible {
                        results.push(value);
                    }
                }
                Ok(match results.len() {
                    0 => Value::Null,
                    1 => results.swap_remove(0),
                    _ => Value::Results(Rc::new(results)),
                })
            })
        },
    }
}

/// Compiles a symbol reference.
///
/// The namespace fallback is resolved against the snapshot now; the scope
/// is consulted first at every evaluation, so a later scope binding wins.
fn compile_symbol(name: &str, line: usize, ctx: &CompileContext) -> CompiledExpression {
    let fallback = match ctx.namespace.get(name) {
        Some(Entry::Constant(value)) => SymbolFallback::Value(value.clone()),
        Some(Entry::Function(Callable::Evaluated { name, arity, f })) => {
            SymbolFallback::Value(Value::Function(FunctionValue::Builtin {
                name: name.clone(),
                arity: *arity,
                f: Rc::clone(f),
            }))
        },
        Some(Entry::Function(Callable::Raw { .. })) => SymbolFallback::Raw,
        None => SymbolFallback::Missing,
    };

    let name = name.to_string();
    CompiledExpression::new(move |scope| {
        if let Some(value) = scope.borrow().get(&name) {
            return Ok(value);
        }
        match &fallback {
            SymbolFallback::Value(value) => Ok(value.clone()),
            SymbolFallback::Raw => Err(EvalError::UnsupportedType {
                details: format!("function '{name}' has no value form"),
                line,
            }),
            SymbolFallback::Missing => Err(EvalError::UndefinedSymbol {
                name: name.clone(),
                line,
            }),
        }
    })
}

/// Compiles a function definition.
///
/// The body is compiled here, once. Evaluating the definition captures the
/// scope it runs in, registers the function there under its name, and
/// yields the function value.
fn compile_function_assignment(
    name: &str,
    params: &[String],
    body: &Node,
    _line: usize,
    ctx: &CompileContext,
) -> CompiledExpression {
    let body = compile(body, ctx);
    let name = name.to_string();
    let params = params.to_vec();
    CompiledExpression::new(move |scope| {
        let lambda = LambdaFunction {
            name: name.clone(),
            params: params.clone(),
            body: body.clone(),
            scope: Rc::clone(scope),
        };
        let value = Value::Function(FunctionValue::Lambda(Rc::new(lambda)));
        scope.borrow_mut().set(&name, value.clone());
        Ok(value)
    })
}

fn compile_range(
    start: &Node,
    end: &Node,
    step: Option<&Node>,
    line: usize,
    ctx: &CompileContext,
) -> CompiledExpression {
    let start = compile(start, ctx);
    let end = compile(end, ctx);
    let step = step.map(|node| compile(node, ctx));
    CompiledExpression::new(move |scope| {
        let start = start.evaluate(scope)?.as_number(line)?;
        let end = end.evaluate(scope)?.as_number(line)?;
        let step = match &step {
            Some(step) => step.evaluate(scope)?.as_number(line)?,
            None => 1.0,
        };
        materialize_range(start, step, end, line)
    })
}

/// Materializes an inclusive range into an array of numbers.
pub(crate) fn materialize_range(start: f64, step: f64, end: f64, line: usize) -> EvalResult<Value> {
    if step == 0.0 {
        return Err(EvalError::InvalidRange {
            details: "step must not be zero".to_string(),
            line,
        });
    }
    if !start.is_finite() || !step.is_finite() || !end.is_finite() {
        return Err(EvalError::InvalidRange {
            details: "bounds must be finite".to_string(),
            line,
        });
    }

    let mut items = Vec::new();
    let mut current = start;
    if step > 0.0 {
        while current <= end {
            items.push(Value::Number(current));
            current += step;
        }
    } else {
        while current >= end {
            items.push(Value::Number(current));
            current += step;
        }
    }
    Ok(Value::Array(Rc::new(items)))
}

fn compile_array(items: &[Node], line: usize, ctx: &CompileContext) -> CompiledExpression {
    let items: Vec<CompiledExpression> = items.iter().map(|item| compile(item, ctx)).collect();
    CompiledExpression::new(move |scope| {
        let mut values = Vec::with_capacity(items.len());
        for item in &items {
            values.push(item.evaluate(scope)?);
        }
        matrix::validate_rectangular(&values, line)?;
        Ok(Value::Array(Rc::new(values)))
    })
}

fn compile_object(
    properties: &[(String, Node)],
    _line: usize,
    ctx: &CompileContext,
) -> CompiledExpression {
    let properties: Vec<(String, CompiledExpression)> = properties
        .iter()
        .map(|(key, value)| (key.clone(), compile(value, ctx)))
        .collect();
    CompiledExpression::new(move |scope| {
        let mut map = IndexMap::with_capacity(properties.len());
        for (key, value) in &properties {
            map.insert(key.clone(), value.evaluate(scope)?);
        }
        Ok(Value::Object(Rc::new(map)))
    })
}
