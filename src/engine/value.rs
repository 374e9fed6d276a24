/// The dynamic value type and its checked accessors.
pub mod core;
/// Function values: builtins as first-class values, and user definitions.
pub mod function;
/// Shape validation and subset access for arrays and objects.
///
/// The kernels here are zero-based; the compiler converts the language's
/// one-based indices before calling in.
pub mod matrix;
