/// Index reads, assignments and the `end` binding.
pub(crate) mod access;
/// Call-site binding for operators and function calls.
pub(crate) mod call;
/// The compile dispatch and `CompiledExpression`.
pub mod core;

pub use core::{compile, CompileContext, CompiledExpression, EvalResult};
