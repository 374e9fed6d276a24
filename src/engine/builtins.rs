/// Scalar arithmetic: the operator kernels and the rounding family.
pub mod arithmetic;

/// Bitwise operations over safely-integral numbers.
pub mod bitwise;

/// Comparison kernels and the loose equality relation.
pub mod comparison;

/// The default namespace table.
///
/// Assembles every builtin with its arity and registers the constants.
pub mod core;

/// Logical operators, including the short-circuiting raw callables.
pub mod logic;

/// Shape and matrix helpers: size, transpose, row, column and concat.
pub mod matrix_fns;

pub use core::default_namespace;
