use std::{cell::Cell, rc::Rc};

use mexpr::{
    engine::namespace::{Arity, Entry},
    evaluate, evaluate_with_scope, new_scope, parse, Engine, Value,
};

fn eval_number(src: &str) -> f64 {
    match evaluate(src) {
        Ok(Value::Number(n)) => n,
        other => panic!("expected a number from {src:?}, got {other:?}"),
    }
}

fn eval_bool(src: &str) -> bool {
    match evaluate(src) {
        Ok(Value::Bool(b)) => b,
        other => panic!("expected a boolean from {src:?}, got {other:?}"),
    }
}

fn assert_failure(src: &str) {
    assert!(evaluate(src).is_err(), "expected {src:?} to fail");
}

fn numbers(ns: &[f64]) -> Value {
    Value::Array(Rc::new(ns.iter().map(|&n| Value::Number(n)).collect()))
}

#[test]
fn operator_precedence() {
    assert_eq!(eval_number("2 + 3 * 4"), 14.0);
    assert_eq!(eval_number("(2 + 3) * 4"), 20.0);
    assert_eq!(eval_number("7 % 3"), 1.0);
}

#[test]
fn power_is_right_associative_and_tighter_than_unary() {
    assert_eq!(eval_number("2^3^2"), 512.0);
    assert_eq!(eval_number("-2^2"), -4.0);
    assert_eq!(eval_number("2^-2"), 0.25);
}

#[test]
fn relational_operators_share_one_level() {
    // (2 < 3) is true, which coerces to 1, and 1 < 1 is false
    assert!(!eval_bool("2 < 3 < 1"));
    assert!(eval_bool("2 < 3 < 2"));
}

#[test]
fn booleans_coerce_in_arithmetic() {
    assert_eq!(eval_number("true + true"), 2.0);
    assert_eq!(eval_number("+true"), 1.0);
}

#[test]
fn implicit_multiplication() {
    let scope = new_scope();
    evaluate_with_scope("x = 2", &scope).unwrap();
    assert_eq!(evaluate_with_scope("6 / 3x", &scope).unwrap(), Value::Number(1.0));
    assert_eq!(eval_number("2(3 + 4)"), 14.0);
    assert_eq!(eval_number("(1 + 2)(3 + 4)"), 21.0);
}

#[test]
fn implicit_multiplication_binds_looser_than_power() {
    let scope = new_scope();
    evaluate_with_scope("x = 3", &scope).unwrap();
    assert_eq!(evaluate_with_scope("2x^2", &scope).unwrap(), Value::Number(18.0));
}

#[test]
fn division_by_zero_is_infinity() {
    assert!(eval_number("1 / 0").is_infinite());
}

#[test]
fn floored_modulus() {
    assert_eq!(eval_number("7 mod 3"), 1.0);
    assert_eq!(eval_number("-7 mod 3"), 2.0);
    assert_eq!(eval_number("7 mod 0"), 7.0);
}

#[test]
fn bitwise_operators() {
    assert_eq!(eval_number("5 & 3"), 1.0);
    assert_eq!(eval_number("5 | 3"), 7.0);
    assert_eq!(eval_number("5 ^| 3"), 6.0);
    assert_eq!(eval_number("1 << 3"), 8.0);
    assert_eq!(eval_number("-16 >> 2"), -4.0);
    assert_eq!(eval_number("-8 >>> 60"), 15.0);
    assert_eq!(eval_number("~0"), -1.0);
    assert_failure("1.5 & 2");
}

#[test]
fn string_literals_and_operators() {
    assert_eq!(evaluate("\"ab\" + \"cd\"").unwrap(), Value::Str("abcd".to_string()));
    assert!(eval_bool("\"apple\" < \"banana\""));
    assert!(eval_bool("\"x\" == \"x\""));
}

#[test]
fn factorial_and_transpose_are_postfix() {
    assert_eq!(eval_number("5!"), 120.0);
    assert_eq!(eval_number("3! + 1"), 7.0);
    let transposed = evaluate("[[1, 2], [3, 4]]'").unwrap();
    let expected = Value::Array(Rc::new(vec![numbers(&[1.0, 3.0]), numbers(&[2.0, 4.0])]));
    assert_eq!(transposed, expected);
}

#[test]
fn short_circuit_never_touches_the_other_side() {
    let hit = Rc::new(Cell::new(false));
    let mut engine = Engine::new();
    let flag = Rc::clone(&hit);
    engine.namespace_mut().insert_fn("hit", Arity::Exact(0), move |_, _| {
        flag.set(true);
        Ok(Value::Bool(true))
    });

    assert_eq!(engine.evaluate("false and hit()").unwrap(), Value::Bool(false));
    assert!(!hit.get(), "right operand of a false `and` must not run");

    assert_eq!(engine.evaluate("true or hit()").unwrap(), Value::Bool(true));
    assert!(!hit.get(), "right operand of a true `or` must not run");

    assert_eq!(engine.evaluate("true and hit()").unwrap(), Value::Bool(true));
    assert!(hit.get());
}

#[test]
fn conditional_only_runs_the_taken_branch() {
    // `boom` does not exist, but the branch holding it is never evaluated
    assert_eq!(eval_number("true ? 1 : boom()"), 1.0);
    assert_failure("false ? 1 : boom()");
}

#[test]
fn undefined_symbols_name_the_symbol() {
    let err = evaluate("q + 1").unwrap_err();
    let text = err.to_string();
    assert!(text.contains('q'), "{text}");
    assert!(text.contains("line 1"), "{text}");
}

#[test]
fn error_messages_render_the_transpose_quote_readably() {
    let text = parse("2 + '").unwrap_err().to_string();
    assert!(text.contains("\"'\""), "{text}");
    assert!(!text.contains("'''"), "{text}");
}

#[test]
fn scope_persists_across_evaluations() {
    let scope = new_scope();
    let results = Engine::new().evaluate_all(&["a = 2", "b = 3", "a + b"], &scope).unwrap();
    assert_eq!(results, vec![Value::Number(2.0), Value::Number(3.0), Value::Number(5.0)]);
    assert_eq!(scope.borrow().get("a"), Some(Value::Number(2.0)));
}

#[test]
fn user_functions_bind_late_and_keep_parameters_local() {
    let scope = new_scope();
    let results = Engine::new()
        .evaluate_all(&["f(x) = x + y", "y = 3", "f(2)"], &scope)
        .unwrap();
    // `y` was defined after `f`, yet the call sees it
    assert_eq!(results[2], Value::Number(5.0));
    // the parameter lived in the invocation frame, not the shared scope
    assert!(!scope.borrow().has("x"));
    assert!(scope.borrow().has("f"));
}

#[test]
fn user_functions_check_their_arity() {
    let scope = new_scope();
    let engine = Engine::new();
    engine.evaluate_with_scope("f(x) = x * 2", &scope).unwrap();
    assert!(engine.evaluate_with_scope("f(1, 2)", &scope).is_err());
    assert_failure("sqrt(1, 2)");
}

#[test]
fn function_values_outlive_their_scope_handle() {
    let value = {
        let scope = new_scope();
        let engine = Engine::new();
        engine.evaluate_with_scope("y = 4", &scope).unwrap();
        engine.evaluate_with_scope("f(x) = x + y", &scope).unwrap()
    };
    // the host's scope handle is gone; the function keeps the frame alive
    let Value::Function(f) = value else {
        panic!("defining a function should yield the function value");
    };
    assert_eq!(f.invoke(&[Value::Number(1.0)], 1).unwrap(), Value::Number(5.0));
}

#[test]
fn recursion_works() {
    let scope = new_scope();
    let results = Engine::new()
        .evaluate_all(&["fib(n) = n < 2 ? n : fib(n - 1) + fib(n - 2)", "fib(10)"], &scope)
        .unwrap();
    assert_eq!(results[1], Value::Number(55.0));
}

#[test]
fn ranges_materialize_inclusively() {
    assert_eq!(evaluate("1:5").unwrap(), numbers(&[1.0, 2.0, 3.0, 4.0, 5.0]));
    assert_eq!(evaluate("0:2:10").unwrap(), numbers(&[0.0, 2.0, 4.0, 6.0, 8.0, 10.0]));
    assert_eq!(evaluate("5:-2:1").unwrap(), numbers(&[5.0, 3.0, 1.0]));
}

#[test]
fn ranges_are_position_restricted() {
    assert!(parse("(1:3)").is_err());
    assert!(parse("x = 1:3").is_ok());
    assert!(parse("[1:3]").is_ok());
    let scope = new_scope();
    evaluate_with_scope("x = 1:3", &scope).unwrap();
    assert_eq!(scope.borrow().get("x"), Some(numbers(&[1.0, 2.0, 3.0])));
}

#[test]
fn ranges_cannot_be_operator_operands() {
    // a bare range is the whole statement or nothing
    assert!(parse("1:2 == 3").is_err());
    assert!(parse("x = 1:2 & 3").is_err());
    assert!(parse("a[1:2 == 3]").is_err());
    // the bounds themselves still take full additive expressions
    assert_eq!(evaluate("1:2 + 2").unwrap(), numbers(&[1.0, 2.0, 3.0, 4.0]));
}

#[test]
fn indexing_is_one_based_with_end() {
    assert_eq!(eval_number("a = [10, 20, 30]; a[1]"), 10.0);
    assert_eq!(eval_number("a = [10, 20, 30]; a[end]"), 30.0);
    assert_eq!(eval_number("a = [10, 20, 30]; a[end - 1]"), 20.0);
    assert_eq!(eval_number("m = [[1, 2], [3, 4]]; m[2, 1]"), 3.0);
    assert_failure("a = [10, 20, 30]; a[0]");
    assert_failure("a = [10, 20, 30]; a[4]");
}

#[test]
fn range_subscripts_select_many() {
    assert_eq!(evaluate("a = [10, 20, 30, 40]; a[2:3]").unwrap(), numbers(&[20.0, 30.0]));
    assert_eq!(evaluate("a = [10, 20, 30, 40]; a[2:end]").unwrap(), numbers(&[20.0, 30.0, 40.0]));
}

#[test]
fn indexed_assignment_copies_on_write_and_grows() {
    assert_eq!(evaluate("a = [1, 2, 3]; a[2] = 9; a").unwrap(), numbers(&[1.0, 9.0, 3.0]));
    assert_eq!(evaluate("a = [1]; a[3] = 7; a").unwrap(), numbers(&[1.0, 0.0, 7.0]));
    assert_failure("a = [1, 2]; a[9, 1] = 5");
}

#[test]
fn objects_and_property_access() {
    assert_eq!(eval_number("obj = {x: 1, y: 2}; obj.y"), 2.0);
    assert_eq!(eval_number("obj = {x: 1}; obj.y = 5; obj.y"), 5.0);
    assert_failure("obj = {x: 1}; obj.missing");
}

#[test]
fn matrix_literals_must_be_rectangular() {
    // ragged literals parse fine and fail when they materialize
    let node = parse("[[1, 2], [3]]").unwrap();
    assert!(Engine::new().compile(&node).evaluate(&new_scope()).is_err());
    assert_failure("[[1, 2], 3]");
}

#[test]
fn statement_results_follow_the_block_policy() {
    assert_eq!(evaluate("x = 5;").unwrap(), Value::Null);
    assert_eq!(evaluate("a = 2; b = 3; a + b").unwrap(), Value::Number(5.0));
    let results = evaluate("a = 2\nb = 3").unwrap();
    assert_eq!(results.to_string(), "2\n3");
}

#[test]
fn assignment_is_statement_only() {
    assert!(parse("a = b = 2").is_err());
    assert!(parse("2 = 3").is_err());
    assert!(parse("a + b = 3").is_err());
    assert!(parse("1 + (a = 2)").is_err());
}

#[test]
fn expression_indices_are_one_based_host_indices_are_not() {
    let engine = Engine::new();
    assert_eq!(engine.evaluate("row([[1, 2], [3, 4]], 1)").unwrap(), numbers(&[1.0, 2.0]));
    assert_eq!(engine.evaluate("column([[1, 2], [3, 4]], 2)").unwrap(), numbers(&[2.0, 4.0]));

    // the same namespace entry called directly takes zero-based indices
    let matrix = Value::Array(Rc::new(vec![numbers(&[1.0, 2.0]), numbers(&[3.0, 4.0])]));
    let Some(Entry::Function(callable)) = engine.namespace().get("row") else {
        panic!("row is not registered");
    };
    let direct = callable.call(&[matrix, Value::Number(0.0)], 1).unwrap();
    assert_eq!(direct, numbers(&[1.0, 2.0]));
}

#[test]
fn concat_joins_along_the_last_dimension_by_default() {
    assert_eq!(evaluate("concat([1, 2], [3])").unwrap(), numbers(&[1.0, 2.0, 3.0]));
    let side_by_side = evaluate("concat([[1], [3]], [[2], [4]])").unwrap();
    let expected = Value::Array(Rc::new(vec![numbers(&[1.0, 2.0]), numbers(&[3.0, 4.0])]));
    assert_eq!(side_by_side, expected);
    // an explicit dimension is one-based in expressions
    let stacked = evaluate("concat([[1, 2]], [[3, 4]], 1)").unwrap();
    let expected = Value::Array(Rc::new(vec![numbers(&[1.0, 2.0]), numbers(&[3.0, 4.0])]));
    assert_eq!(stacked, expected);
}

#[test]
fn size_reports_shape() {
    assert_eq!(evaluate("size([[1, 2, 3], [4, 5, 6]])").unwrap(), numbers(&[2.0, 3.0]));
    assert_eq!(evaluate("size(\"abc\")").unwrap(), numbers(&[3.0]));
    assert_eq!(evaluate("size(5)").unwrap(), numbers(&[]));
}

#[test]
fn compiled_expressions_keep_their_snapshot() {
    let mut engine = Engine::new();
    let node = engine.parse("1 + 2").unwrap();
    let compiled = engine.compile(&node);
    engine.namespace_mut().remove("add");

    // the compiled closure still holds the old table
    assert_eq!(compiled.evaluate(&new_scope()).unwrap(), Value::Number(3.0));
    // a fresh compile sees the edited table
    assert!(engine.evaluate("1 + 2").is_err());
    // other engines are untouched
    assert_eq!(Engine::new().evaluate("1 + 2").unwrap(), Value::Number(3.0));
}

#[test]
fn empty_engines_resolve_nothing() {
    let engine = Engine::empty();
    assert!(engine.evaluate("1 + 2").is_err());
    assert!(engine.evaluate("pi").is_err());
}

#[test]
fn scope_shadows_the_namespace() {
    let scope = new_scope();
    let engine = Engine::new();
    engine.evaluate_with_scope("pi = 3", &scope).unwrap();
    assert_eq!(engine.evaluate_with_scope("pi", &scope).unwrap(), Value::Number(3.0));
    // a fresh scope sees the constant again
    let fresh = engine.evaluate("pi").unwrap();
    assert_eq!(fresh, Value::Number(std::f64::consts::PI));
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let source = "# setup\n\na = 2 # two\n\na * 3";
    let results = evaluate(source).unwrap();
    assert_eq!(results.to_string(), "2\n6");
}

#[test]
fn printed_nodes_evaluate_the_same() {
    for source in ["2 + 3 * 4", "2^3^2", "-2^2", "2 < 3 < 1", "5!", "7 mod 3", "1:5", "0:2:10"] {
        let node = parse(source).unwrap();
        let reprinted = evaluate(&node.to_string()).unwrap();
        assert_eq!(reprinted, evaluate(source).unwrap(), "{source}");
    }
}
