use std::f64::consts;

use crate::engine::{
    builtins::{arithmetic, bitwise, comparison, logic, matrix_fns},
    namespace::{Arity, Namespace},
    value::core::Value,
};

/// Registers builtin functions on a namespace.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - a function implementing the builtin.
///
/// Arities declared here are the only argument-count contract; the
/// implementations index their argument slices on the strength of it.
macro_rules! builtin_functions {
    (
        $ns:ident,
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        $(
            $ns.insert_fn($name, $arity, $func);
        )*
    };
}

/// Builds the namespace a default engine compiles against.
///
/// The table covers the operator kernels, the small function library and
/// the constants `pi`, `e` and `tau`. `and` and `or` are raw callables so
/// they can short-circuit.
#[must_use]
pub fn default_namespace() -> Namespace {
    let mut ns = Namespace::new();

    builtin_functions! { ns,
        "add"                 => { arity: Arity::Exact(2),   func: arithmetic::add },
        "subtract"            => { arity: Arity::Exact(2),   func: arithmetic::subtract },
        "multiply"            => { arity: Arity::Exact(2),   func: arithmetic::multiply },
        "divide"              => { arity: Arity::Exact(2),   func: arithmetic::divide },
        "mod"                 => { arity: Arity::Exact(2),   func: arithmetic::modulo },
        "pow"                 => { arity: Arity::Exact(2),   func: arithmetic::pow },
        "unary_minus"         => { arity: Arity::Exact(1),   func: arithmetic::unary_minus },
        "unary_plus"          => { arity: Arity::Exact(1),   func: arithmetic::unary_plus },
        "abs"                 => { arity: Arity::Exact(1),   func: arithmetic::abs },
        "sqrt"                => { arity: Arity::Exact(1),   func: arithmetic::sqrt },
        "floor"               => { arity: Arity::Exact(1),   func: arithmetic::floor },
        "ceil"                => { arity: Arity::Exact(1),   func: arithmetic::ceil },
        "round"               => { arity: Arity::OneOf(&[1, 2]), func: arithmetic::round },
        "min"                 => { arity: Arity::AtLeast(1), func: arithmetic::min },
        "max"                 => { arity: Arity::AtLeast(1), func: arithmetic::max },
        "factorial"           => { arity: Arity::Exact(1),   func: arithmetic::factorial },
        "equal"               => { arity: Arity::Exact(2),   func: comparison::equal },
        "unequal"             => { arity: Arity::Exact(2),   func: comparison::unequal },
        "smaller"             => { arity: Arity::Exact(2),   func: comparison::smaller },
        "larger"              => { arity: Arity::Exact(2),   func: comparison::larger },
        "smaller_eq"          => { arity: Arity::Exact(2),   func: comparison::smaller_eq },
        "larger_eq"           => { arity: Arity::Exact(2),   func: comparison::larger_eq },
        "not"                 => { arity: Arity::Exact(1),   func: logic::not },
        "bit_and"             => { arity: Arity::Exact(2),   func: bitwise::bit_and },
        "bit_or"              => { arity: Arity::Exact(2),   func: bitwise::bit_or },
        "bit_xor"             => { arity: Arity::Exact(2),   func: bitwise::bit_xor },
        "bit_not"             => { arity: Arity::Exact(1),   func: bitwise::bit_not },
        "left_shift"          => { arity: Arity::Exact(2),   func: bitwise::left_shift },
        "right_shift"         => { arity: Arity::Exact(2),   func: bitwise::right_shift },
        "right_shift_logical" => { arity: Arity::Exact(2),   func: bitwise::right_shift_logical },
        "size"                => { arity: Arity::Exact(1),   func: matrix_fns::size },
        "transpose"           => { arity: Arity::Exact(1),   func: matrix_fns::transpose },
        "row"                 => { arity: Arity::Exact(2),   func: matrix_fns::row },
        "column"              => { arity: Arity::Exact(2),   func: matrix_fns::column },
        "concat"              => { arity: Arity::AtLeast(1), func: matrix_fns::concat },
    }

    ns.insert_raw("and", logic::and);
    ns.insert_raw("or", logic::or);

    ns.insert_constant("pi", Value::Number(consts::PI));
    ns.insert_constant("e", Value::Number(consts::E));
    ns.insert_constant("tau", Value::Number(consts::TAU));

    ns
}
