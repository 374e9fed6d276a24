//! # mexpr
//!
//! mexpr is an embeddable math expression language written in Rust.
//! It parses expression text into a tree, compiles the tree into a reusable
//! closure against a per-engine function table, and evaluates the closure
//! against a variable scope supplied by the host.
//!
//! ```
//! use mexpr::evaluate;
//!
//! let result = evaluate("2 + 3 * 4").unwrap();
//! assert_eq!(result.to_string(), "14");
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

/// Defines the structure of parsed expressions.
///
/// This module declares the `Node` enum that represents expression text as
/// a tree. Nodes are built by the parser, carry source lines for error
/// reporting, and print back as parseable text.
pub mod ast;
/// Orchestrates the whole pipeline.
///
/// Ties together the lexer, parser, compiler, values, scopes, namespaces
/// and transforms, and exposes the `Engine` type that owns a configuration
/// of all of them.
pub mod engine;
/// Provides unified error types for parsing and evaluation.
///
/// Syntax and evaluation errors are separate enums under one `Error`
/// umbrella; every variant carries the source line it refers to.
pub mod error;
/// General utilities for safe numeric conversion.
pub mod util;

pub use crate::{
    ast::Node,
    engine::{
        compiler::CompiledExpression,
        scope::{new_scope, ChildScope, Scope, ScopeRef},
        value::core::Value,
        Engine,
    },
    error::{Error, EvalError, SyntaxError},
};

/// Parses source text into an expression tree.
///
/// # Errors
/// The first `SyntaxError` in the source.
///
/// # Examples
/// ```
/// let node = mexpr::parse("2 + 3 * 4").unwrap();
/// assert_eq!(node.to_string(), "(2 + (3 * 4))");
/// ```
pub fn parse(source: &str) -> Result<Node, SyntaxError> {
    engine::parser::parse(source)
}

/// Evaluates source text against a default engine and a fresh scope.
///
/// # Errors
/// A `SyntaxError` or `EvalError`, under the common [`Error`] type.
///
/// # Examples
/// ```
/// use mexpr::{evaluate, Value};
///
/// assert_eq!(evaluate("2^3^2").unwrap(), Value::Number(512.0));
/// assert!(evaluate("q + 1").is_err()); // 'q' is not defined
/// ```
pub fn evaluate(source: &str) -> Result<Value, Error> {
    Engine::new().evaluate(source)
}

/// Evaluates source text against a default engine and the given scope.
///
/// Assignments in the source land in `scope` and remain visible to later
/// calls with the same scope.
///
/// # Errors
/// A `SyntaxError` or `EvalError`, under the common [`Error`] type.
///
/// # Examples
/// ```
/// use mexpr::{evaluate_with_scope, new_scope, Value};
///
/// let scope = new_scope();
/// evaluate_with_scope("x = 3", &scope).unwrap();
/// assert_eq!(evaluate_with_scope("2x^2", &scope).unwrap(), Value::Number(18.0));
/// ```
pub fn evaluate_with_scope(source: &str, scope: &ScopeRef) -> Result<Value, Error> {
    Engine::new().evaluate_with_scope(source, scope)
}
