use std::rc::Rc;

use crate::{
    ast::Node,
    engine::{
        builtins::default_namespace,
        compiler::{compile, CompileContext, CompiledExpression},
        namespace::Namespace,
        scope::{new_scope, ScopeRef},
        transform::{default_transforms, TransformTable},
        value::core::Value,
    },
    error::Error,
};

/// The default function and constant library.
///
/// Implements every operator kernel the parser can emit plus the small
/// function set (rounding, min/max, shape helpers) and assembles them into
/// the default namespace.
pub mod builtins;

/// Turns expression trees into reusable closures.
///
/// Name resolution happens here, once per call site, against a snapshot of
/// the engine's tables; scope lookups are deferred to evaluation.
pub mod compiler;

/// Converts source text into tokens.
///
/// Built on a derived `logos` lexer; newlines are tokens because they
/// separate statements and matrix rows.
pub mod lexer;

/// The per-engine function and constant table.
pub mod namespace;

/// Converts the token stream into an expression tree.
///
/// A recursive-descent parser with one function per precedence level.
pub mod parser;

/// The variable store protocol compiled expressions read and write.
pub mod scope;

/// Call-site transforms, such as the one-based index remapping.
pub mod transform;

/// Runtime values and the shape/index kernels.
pub mod value;

/// An isolated expression evaluator.
///
/// Each engine owns its namespace and transform table; there is no global
/// registry. `compile` snapshots both tables, so expressions compiled
/// earlier are unaffected by later table edits, here or in any other
/// engine.
///
/// ## Usage
///
/// An `Engine` is created once and reused. The typical flow is
/// `parse` → `compile` → `evaluate` against a scope, or one of the
/// `evaluate*` shortcuts that do all three.
pub struct Engine {
    namespace: Namespace,
    transforms: TransformTable,
}

impl Engine {
    /// Creates an engine with the default function library and transforms.
    #[must_use]
    pub fn new() -> Self {
        Self {
            namespace: default_namespace(),
            transforms: default_transforms(),
        }
    }

    /// Creates an engine with empty tables.
    ///
    /// Nothing resolves until the caller inserts entries, which makes this
    /// the starting point for sandboxed configurations.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            namespace: Namespace::new(),
            transforms: TransformTable::new(),
        }
    }

    /// The engine's namespace.
    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The engine's namespace, for inserting and removing entries.
    pub fn namespace_mut(&mut self) -> &mut Namespace {
        &mut self.namespace
    }

    /// The engine's transform table.
    #[must_use]
    pub fn transforms(&self) -> &TransformTable {
        &self.transforms
    }

    /// The engine's transform table, for registering and removing entries.
    pub fn transforms_mut(&mut self) -> &mut TransformTable {
        &mut self.transforms
    }

    /// Parses source text into an expression tree.
    ///
    /// Parsing needs nothing from the engine's tables; the method exists so
    /// callers can hold one handle for the whole pipeline.
    ///
    /// # Errors
    /// The first `SyntaxError` in the source.
    pub fn parse(&self, source: &str) -> Result<Node, crate::error::SyntaxError> {
        parser::parse(source)
    }

    /// Compiles an expression tree against this engine's tables.
    ///
    /// Compilation never fails; unresolved names become closures that raise
    /// when evaluated.
    #[must_use]
    pub fn compile(&self, node: &Node) -> CompiledExpression {
        compile(node, &self.snapshot())
    }

    /// Parses, compiles and evaluates source against a fresh scope.
    ///
    /// # Errors
    /// A `SyntaxError` from parsing or an `EvalError` from evaluation,
    /// under the common [`Error`] type.
    pub fn evaluate(&self, source: &str) -> Result<Value, Error> {
        self.evaluate_with_scope(source, &new_scope())
    }

    /// Parses, compiles and evaluates source against a caller's scope.
    ///
    /// Assignments land in `scope` and stay visible to later evaluations
    /// against the same scope.
    ///
    /// # Errors
    /// A `SyntaxError` from parsing or an `EvalError` from evaluation.
    pub fn evaluate_with_scope(&self, source: &str, scope: &ScopeRef) -> Result<Value, Error> {
        let node = parser::parse(source)?;
        let compiled = self.compile(&node);
        Ok(compiled.evaluate(scope)?)
    }

    /// Evaluates several sources in order against one shared scope.
    ///
    /// Returns one value per source. Later sources see the bindings of
    /// earlier ones, which is how function definitions pick up variables
    /// defined between definition and call.
    ///
    /// # Errors
    /// The first error met; earlier sources will already have run.
    pub fn evaluate_all(&self, sources: &[&str], scope: &ScopeRef) -> Result<Vec<Value>, Error> {
        sources
            .iter()
            .map(|source| self.evaluate_with_scope(source, scope))
            .collect()
    }

    /// The table snapshot a compilation runs against.
    fn snapshot(&self) -> CompileContext {
        CompileContext {
            namespace: Rc::new(self.namespace.clone()),
            transforms: Rc::new(self.transforms.clone()),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
