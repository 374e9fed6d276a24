use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::Node,
    engine::{
        compiler::core::{CompileContext, EvalResult},
        scope::ScopeRef,
        value::{core::Value, function::HostFn},
    },
    error::EvalError,
};

/// Specifies the allowed number of arguments for a namespace function.
#[derive(Clone, Copy, Debug)]
pub enum Arity {
    /// Exactly `n` arguments.
    Exact(usize),
    /// At least `n` arguments.
    AtLeast(usize),
    /// Any arity listed in the slice.
    OneOf(&'static [usize]),
}

impl Arity {
    /// Tests whether the given argument count satisfies this constraint.
    #[must_use]
    pub fn check(&self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == *m,
            Self::AtLeast(m) => n >= *m,
            Self::OneOf(counts) => counts.contains(&n),
        }
    }

    /// Describes the accepted counts for error messages, e.g. "exactly 2".
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Exact(m) => format!("exactly {m}"),
            Self::AtLeast(m) => format!("at least {m}"),
            Self::OneOf(counts) => counts
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }

    /// Verifies an actual argument count, building the error on mismatch.
    ///
    /// This is the single place argument counts are checked; every call
    /// path goes through it before dispatching to an implementation.
    pub fn check_call(&self, name: &str, found: usize, line: usize) -> EvalResult<()> {
        if self.check(found) {
            Ok(())
        } else {
            Err(EvalError::ArgumentCount {
                name: name.to_string(),
                expected: self.describe(),
                found,
                line,
            })
        }
    }
}

/// The signature of a raw callable.
///
/// A raw callable receives its argument expressions unevaluated, together
/// with the scope and the compile context, and controls its own evaluation
/// order. This is how `and` and `or` short-circuit without the compiler
/// special-casing them.
pub type RawFn = Rc<dyn Fn(&[Node], &ScopeRef, &CompileContext, usize) -> EvalResult<Value>>;

/// A function the namespace can hold.
#[derive(Clone)]
pub enum Callable {
    /// An ordinary function: arguments are evaluated left to right first.
    Evaluated {
        /// The registered name.
        name: String,
        /// The accepted argument counts.
        arity: Arity,
        /// The host implementation.
        f: HostFn,
    },
    /// A callable that receives unevaluated argument expressions.
    Raw {
        /// The registered name.
        name: String,
        /// The host implementation.
        f: RawFn,
    },
}

impl Callable {
    /// Returns the registered name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Evaluated { name, .. } | Self::Raw { name, .. } => name,
        }
    }

    /// Calls the function with already evaluated arguments.
    ///
    /// # Errors
    /// `EvalError::ArgumentCount` on a count mismatch, and
    /// `EvalError::UnsupportedType` for a raw callable, which has no
    /// evaluated-arguments form.
    pub fn call(&self, args: &[Value], line: usize) -> EvalResult<Value> {
        match self {
            Self::Evaluated { name, arity, f } => {
                arity.check_call(name, args.len(), line)?;
                f(args, line)
            },
            Self::Raw { name, .. } => Err(EvalError::UnsupportedType {
                details: format!("function '{name}' cannot take evaluated arguments"),
                line,
            }),
        }
    }
}

/// What a namespace name resolves to.
#[derive(Clone)]
pub enum Entry {
    /// A constant value, such as `pi`.
    Constant(Value),
    /// A function.
    Function(Callable),
}

/// The function and constant table an engine compiles against.
///
/// Each engine owns one; there is no global registry. Callers implement
/// security policy by inserting, replacing or removing entries before
/// compiling; the engine itself adds no sandboxing beyond this table.
#[derive(Clone, Default)]
pub struct Namespace {
    entries: HashMap<String, Entry>,
}

impl Namespace {
    /// Creates an empty namespace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constant value.
    pub fn insert_constant(&mut self, name: &str, value: Value) {
        self.entries.insert(name.to_string(), Entry::Constant(value));
    }

    /// Registers an ordinary function with its arity.
    pub fn insert_fn(
        &mut self,
        name: &str,
        arity: Arity,
        f: impl Fn(&[Value], usize) -> EvalResult<Value> + 'static,
    ) {
        self.entries.insert(
            name.to_string(),
            Entry::Function(Callable::Evaluated {
                name: name.to_string(),
                arity,
                f: Rc::new(f),
            }),
        );
    }

    /// Registers a raw callable.
    pub fn insert_raw(
        &mut self,
        name: &str,
        f: impl Fn(&[Node], &ScopeRef, &CompileContext, usize) -> EvalResult<Value> + 'static,
    ) {
        self.entries.insert(
            name.to_string(),
            Entry::Function(Callable::Raw {
                name: name.to_string(),
                f: Rc::new(f),
            }),
        );
    }

    /// Removes an entry, returning it if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Entry> {
        self.entries.remove(name)
    }

    /// Looks up an entry.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Tests whether a name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterates over the registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
