use std::rc::Rc;

use crate::{
    engine::{
        compiler::core::{CompiledExpression, EvalResult},
        namespace::Arity,
        scope::{ChildScope, Scope, ScopeRef},
    },
    error::EvalError,
    engine::value::core::Value,
};

/// The signature shared by all host-side functions: evaluated argument
/// values in, value out, with the call site's line for error reporting.
pub type HostFn = Rc<dyn Fn(&[Value], usize) -> EvalResult<Value>>;

/// A callable value.
#[derive(Clone)]
pub enum FunctionValue {
    /// A namespace function referenced as a first-class value.
    Builtin {
        /// The name the function was registered under.
        name: String,
        /// The accepted argument counts.
        arity: Arity,
        /// The host implementation.
        f: HostFn,
    },
    /// A function defined in the language with `f(x) = ...`.
    Lambda(Rc<LambdaFunction>),
}

/// A user-defined function: its compiled body plus the scope it closes over.
///
/// The body is compiled exactly once, when the definition is compiled; every
/// invocation reuses it against a fresh parameter frame.
pub struct LambdaFunction {
    /// The name the function was defined under.
    pub name: String,
    /// The parameter names, in order.
    pub params: Vec<String>,
    /// The compiled body expression.
    pub body: CompiledExpression,
    /// The scope the definition was evaluated in. Body reads that miss the
    /// parameter frame fall back here, at invocation time.
    ///
    /// The reference is strong, and the defining scope normally holds the
    /// function right back, so scope and function form an `Rc` cycle that
    /// outlives the host's own handle to the scope. The strong reference is
    /// what lets a function value extracted from a scope keep working after
    /// the scope handle is gone; a host that churns through many scopes
    /// should clear a scope's function bindings when it is done with it.
    pub scope: ScopeRef,
}

impl FunctionValue {
    /// Returns the function's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Builtin { name, .. } => name,
            Self::Lambda(lambda) => &lambda.name,
        }
    }

    /// Calls the function with already evaluated arguments.
    ///
    /// For a lambda this creates a child scope over the defining scope,
    /// binds the parameters there, and evaluates the compiled body. Writes
    /// made by the body stay in that frame.
    ///
    /// # Errors
    /// `EvalError::ArgumentCount` when the argument count does not match,
    /// or whatever the body or host implementation raises.
    pub fn invoke(&self, args: &[Value], line: usize) -> EvalResult<Value> {
        match self {
            Self::Builtin { name, arity, f } => {
                arity.check_call(name, args.len(), line)?;
                f(args, line)
            },
            Self::Lambda(lambda) => {
                if args.len() != lambda.params.len() {
                    return Err(EvalError::ArgumentCount {
                        name: lambda.name.clone(),
                        expected: format!("exactly {}", lambda.params.len()),
                        found: args.len(),
                        line,
                    });
                }
                let mut frame = ChildScope::new(&lambda.scope);
                for (param, value) in lambda.params.iter().zip(args) {
                    frame.set(param, value.clone());
                }
                lambda.body.evaluate(&frame.into_ref())
            },
        }
    }
}

impl PartialEq for FunctionValue {
    /// Identity comparison: two function values are equal only when they
    /// refer to the same underlying function.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Builtin { f: a, .. }, Self::Builtin { f: b, .. }) => {
                std::ptr::eq(Rc::as_ptr(a).cast::<u8>(), Rc::as_ptr(b).cast::<u8>())
            },
            (Self::Lambda(a), Self::Lambda(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl std::fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Builtin { name, .. } => write!(f, "Builtin({name})"),
            Self::Lambda(lambda) => {
                write!(f, "Lambda({}({}))", lambda.name, lambda.params.join(", "))
            },
        }
    }
}
