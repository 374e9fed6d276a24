use std::{collections::HashMap, rc::Rc};

use crate::{
    engine::{namespace::Callable, value::core::Value},
    error::EvalError,
    util::num::f64_to_i64_checked,
};

/// Builds the expression-facing variant of a namespace callable.
pub type TransformFactory = Rc<dyn Fn(&Callable) -> Callable>;

/// The per-engine table of call-site transforms.
///
/// When an expression calls a function by name and the table has an entry
/// for that name, the compiler binds the factory's wrapped callable instead
/// of the namespace's own. The lookup happens once per call site during
/// compilation, never per evaluation. Direct host calls bypass the table
/// entirely, which is how the same function can be one-based in expressions
/// and zero-based from the host.
#[derive(Clone, Default)]
pub struct TransformTable {
    entries: HashMap<String, TransformFactory>,
}

impl TransformTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a transform for a function name, replacing any previous.
    pub fn register(&mut self, name: &str, factory: impl Fn(&Callable) -> Callable + 'static) {
        self.entries.insert(name.to_string(), Rc::new(factory));
    }

    /// Removes a transform, returning whether one was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Looks up the factory registered for a name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&TransformFactory> {
        self.entries.get(name)
    }

    /// Applies the registered transform to a callable, or returns it as is.
    #[must_use]
    pub fn apply(&self, name: &str, callable: &Callable) -> Callable {
        match self.entries.get(name) {
            Some(factory) => factory(callable),
            None => callable.clone(),
        }
    }
}

/// The transforms shipped by default: the index-remapping adapters for the
/// functions that take dimension arguments.
#[must_use]
pub fn default_transforms() -> TransformTable {
    let mut table = TransformTable::new();
    table.register("row", |callable| remap_index_argument(callable, Slot::At(1)));
    table.register("column", |callable| remap_index_argument(callable, Slot::At(1)));
    table.register("concat", |callable| {
        remap_index_argument(callable, Slot::TrailingNumber)
    });
    table
}

/// Which argument of a call carries the dimension to renumber.
#[derive(Clone, Copy)]
enum Slot {
    /// A fixed position.
    At(usize),
    /// The last argument, only when it is numeric.
    TrailingNumber,
}

/// Wraps an evaluated callable so one numeric argument is renumbered from
/// the language's one-based convention to the host's zero-based one before
/// delegating. Arity and return value are untouched. Raw callables pass
/// through unchanged.
#[allow(clippy::cast_precision_loss)]
fn remap_index_argument(callable: &Callable, slot: Slot) -> Callable {
    let Callable::Evaluated { name, arity, f } = callable else {
        return callable.clone();
    };

    let inner = Rc::clone(f);
    Callable::Evaluated {
        name: name.clone(),
        arity: *arity,
        f: Rc::new(move |args, line| {
            let position = match slot {
                Slot::At(position) => (position < args.len()).then_some(position),
                Slot::TrailingNumber => match args.last() {
                    Some(Value::Number(_)) => Some(args.len() - 1),
                    _ => None,
                },
            };
            match position {
                None => inner(args, line),
                Some(position) => {
                    let typed = f64_to_i64_checked(args[position].as_number(line)?, line)?;
                    if typed < 1 {
                        return Err(EvalError::InvalidIndex {
                            details: format!("index {typed} is not positive; indices start at 1"),
                            line,
                        });
                    }
                    let mut args = args.to_vec();
                    args[position] = Value::Number((typed - 1) as f64);
                    inner(&args, line)
                },
            }
        }),
    }
}
