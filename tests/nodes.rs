use mexpr::{parse, Node};

#[test]
fn display_is_fully_parenthesized() {
    assert_eq!(parse("2 + 3 * 4").unwrap().to_string(), "(2 + (3 * 4))");
    assert_eq!(parse("2^3^2").unwrap().to_string(), "(2 ^ (3 ^ 2))");
    assert_eq!(parse("a.b").unwrap().to_string(), "a.b");
    assert_eq!(parse("1:2:10").unwrap().to_string(), "1:2:10");
    assert_eq!(parse("x = 2").unwrap().to_string(), "x = 2");
    assert_eq!(parse("f(x) = x + 1").unwrap().to_string(), "f(x) = (x + 1)");
}

#[test]
fn relational_chains_associate_left() {
    let node = parse("1 < 2 < 3").unwrap();
    let Node::Operator { op, args, .. } = &node else {
        panic!("expected an operator, got {node:?}");
    };
    assert_eq!(op, "<");
    assert!(matches!(&args[0], Node::Operator { op, .. } if op == "<"));
    assert!(matches!(&args[1], Node::Constant { .. }));
}

#[test]
fn implicit_multiplication_is_marked() {
    let node = parse("2x").unwrap();
    assert!(matches!(node, Node::Operator { implicit: true, .. }));
    let node = parse("2 * x").unwrap();
    assert!(matches!(node, Node::Operator { implicit: false, .. }));
}

#[test]
fn for_each_child_visits_in_source_order() {
    let node = parse("f(1, 2) + 3").unwrap();
    let mut seen = Vec::new();
    node.for_each_child(&mut |child| seen.push(child.to_string()));
    assert_eq!(seen, vec!["f(1, 2)".to_string(), "3".to_string()]);
}

#[test]
fn map_children_rebuilds_without_mutating() {
    let node = parse("1 + 2").unwrap();
    let doubled = node.map_children(&mut |child| match child {
        Node::Constant { value, line } => Node::Constant {
            value: mexpr::Value::Number(value.as_number(*line).unwrap() * 2.0),
            line: *line,
        },
        other => other.clone(),
    });
    assert_eq!(node.to_string(), "(1 + 2)");
    assert_eq!(doubled.to_string(), "(2 + 4)");
}

#[test]
fn nodes_carry_their_source_line() {
    let node = parse("1\n2 + 3").unwrap();
    let Node::Block { statements, .. } = &node else {
        panic!("expected a block, got {node:?}");
    };
    assert_eq!(statements[0].node.line(), 1);
    assert_eq!(statements[1].node.line(), 2);
}
