use std::fmt;

use crate::engine::value::core::Value;

/// Represents a node of the expression tree built by the parser.
///
/// Nodes are immutable after construction: the traversal helpers visit or
/// rebuild, they never mutate in place. Every variant carries the source
/// line it came from, which follows the value through compilation so that
/// evaluation errors can point back at the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A literal value, such as `2.5`, `"text"` or `true`.
    Constant {
        /// The materialized literal.
        value: Value,
        /// The source line of the literal.
        line: usize,
    },
    /// A name to be resolved against the scope (then the namespace) when the
    /// compiled expression runs, never earlier.
    Symbol {
        /// The symbol name.
        name: String,
        /// The source line of the symbol.
        line: usize,
    },
    /// An operator application, such as `a + b` or `x!`.
    Operator {
        /// The operator as written, e.g. `+`.
        op: String,
        /// The namespace function the operator resolves to, e.g. `add`.
        fn_name: String,
        /// The operand expressions.
        args: Vec<Node>,
        /// Whether this is an implicit multiplication such as `2x`.
        implicit: bool,
        /// The source line of the operator.
        line: usize,
    },
    /// An explicit function call, such as `max(1, 2)`.
    Function {
        /// The callee expression; a symbol for ordinary calls.
        callee: Box<Node>,
        /// The argument expressions.
        args: Vec<Node>,
        /// The source line of the call.
        line: usize,
    },
    /// A parenthesized expression, kept so the printed form round-trips.
    Parenthesis {
        /// The inner expression.
        inner: Box<Node>,
        /// The source line of the group.
        line: usize,
    },
    /// An array or matrix literal. Matrix rows are nested `Array` nodes;
    /// rectangularity is not checked here but when the literal materializes.
    Array {
        /// The item expressions.
        items: Vec<Node>,
        /// The source line of the literal.
        line: usize,
    },
    /// An object literal, such as `{a: 1, b: 2}`. Property order is kept.
    Object {
        /// The properties in source order.
        properties: Vec<(String, Node)>,
        /// The source line of the literal.
        line: usize,
    },
    /// An assignment, such as `a = 2` or `a[2] = 7`.
    Assignment {
        /// The target: a symbol or an index chain rooted at a symbol.
        target: Box<Node>,
        /// The value expression.
        value: Box<Node>,
        /// The source line of the assignment.
        line: usize,
    },
    /// A function definition, such as `f(x, y) = x + y`.
    FunctionAssignment {
        /// The function name.
        name: String,
        /// The parameter names.
        params: Vec<String>,
        /// The body expression.
        body: Box<Node>,
        /// The source line of the definition.
        line: usize,
    },
    /// A subscript or property access, such as `a[1, 2]` or `obj.key`.
    /// Property access stores the key as a string constant part.
    Index {
        /// The expression being indexed.
        object: Box<Node>,
        /// One part per dimension, applied jointly.
        parts: Vec<Node>,
        /// The source line of the access.
        line: usize,
    },
    /// An inclusive range, written `start:end` or `start:step:end`.
    Range {
        /// The first value of the range.
        start: Box<Node>,
        /// The last value of the range (inclusive).
        end: Box<Node>,
        /// The step between values; `None` means 1.
        step: Option<Box<Node>>,
        /// The source line of the range.
        line: usize,
    },
    /// A ternary conditional, such as `a > 0 ? a : -a`.
    Conditional {
        /// The condition expression.
        condition: Box<Node>,
        /// The branch taken when the condition holds.
        truthy: Box<Node>,
        /// The branch taken otherwise.
        falsy: Box<Node>,
        /// The source line of the conditional.
        line: usize,
    },
    /// A multi-statement program. Statements terminated by `;` have their
    /// result suppressed.
    Block {
        /// The statements in source order.
        statements: Vec<BlockStatement>,
        /// The source line the block starts on.
        line: usize,
    },
}

/// A single statement inside a [`Node::Block`].
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    /// The statement expression.
    pub node: Node,
    /// `false` when the statement was terminated by `;`.
    pub visible: bool,
}

impl Node {
    /// Returns the source line this node came from.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::Constant { line, .. }
            | Self::Symbol { line, .. }
            | Self::Operator { line, .. }
            | Self::Function { line, .. }
            | Self::Parenthesis { line, .. }
            | Self::Array { line, .. }
            | Self::Object { line, .. }
            | Self::Assignment { line, .. }
            | Self::FunctionAssignment { line, .. }
            | Self::Index { line, .. }
            | Self::Range { line, .. }
            | Self::Conditional { line, .. }
            | Self::Block { line, .. } => *line,
        }
    }

    /// Visits the direct children of this node in source order.
    pub fn for_each_child(&self, f: &mut impl FnMut(&Self)) {
        match self {
            Self::Constant { .. } | Self::Symbol { .. } => {},
            Self::Operator { args, .. } => args.iter().for_each(f),
            Self::Function { callee, args, .. } => {
                f(callee);
                args.iter().for_each(f);
            },
            Self::Parenthesis { inner, .. } => f(inner),
            Self::Array { items, .. } => items.iter().for_each(f),
            Self::Object { properties, .. } => properties.iter().for_each(|(_, v)| f(v)),
            Self::Assignment { target, value, .. } => {
                f(target);
                f(value);
            },
            Self::FunctionAssignment { body, .. } => f(body),
            Self::Index { object, parts, .. } => {
                f(object);
                parts.iter().for_each(f);
            },
            Self::Range { start, end, step, .. } => {
                f(start);
                if let Some(step) = step {
                    f(step);
                }
                f(end);
            },
            Self::Conditional { condition, truthy, falsy, .. } => {
                f(condition);
                f(truthy);
                f(falsy);
            },
            Self::Block { statements, .. } => statements.iter().for_each(|s| f(&s.node)),
        }
    }

    /// Builds a copy of this node with every direct child replaced by
    /// `f(child)`. The node itself and all non-child fields are preserved;
    /// children are visited in source order. The original is untouched.
    #[must_use]
    pub fn map_children(&self, f: &mut impl FnMut(&Self) -> Self) -> Self {
        fn replace(slot: &mut Node, f: &mut impl FnMut(&Node) -> Node) {
            let mapped = f(slot);
            *slot = mapped;
        }

        let mut node = self.clone();
        match &mut node {
            Self::Constant { .. } | Self::Symbol { .. } => {},
            Self::Operator { args, .. } => {
                for arg in args {
                    replace(arg, f);
                }
            },
            Self::Function { callee, args, .. } => {
                replace(callee, f);
                for arg in args {
                    replace(arg, f);
                }
            },
            Self::Parenthesis { inner, .. } => replace(inner, f),
            Self::Array { items, .. } => {
                for item in items {
                    replace(item, f);
                }
            },
            Self::Object { properties, .. } => {
                for (_, value) in properties {
                    replace(value, f);
                }
            },
            Self::Assignment { target, value, .. } => {
                replace(target, f);
                replace(value, f);
            },
            Self::FunctionAssignment { body, .. } => replace(body, f),
            Self::Index { object, parts, .. } => {
                replace(object, f);
                for part in parts {
                    replace(part, f);
                }
            },
            Self::Range { start, end, step, .. } => {
                replace(start, f);
                if let Some(step) = step {
                    replace(step, f);
                }
                replace(end, f);
            },
            Self::Conditional { condition, truthy, falsy, .. } => {
                replace(condition, f);
                replace(truthy, f);
                replace(falsy, f);
            },
            Self::Block { statements, .. } => {
                for statement in statements {
                    replace(&mut statement.node, f);
                }
            },
        }
        node
    }
}

/// Tests whether a string can be written as a bare identifier.
fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    let body_well = chars.all(|c| c.is_alphanumeric() || c == '_');
    let reserved = matches!(s, "mod" | "and" | "or" | "not" | "true" | "false");
    starts_well && body_well && !reserved
}

/// Quotes and escapes a string for display as a literal.
fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Wraps prefix-operator operands that would rebind under a postfix operator.
fn postfix_operand(node: &Node) -> String {
    match node {
        Node::Operator { args, .. } if args.len() == 1 => format!("({node})"),
        _ => node.to_string(),
    }
}

fn join(nodes: &[Node], separator: &str) -> String {
    nodes
        .iter()
        .map(Node::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

impl fmt::Display for Node {
    /// Formats the node as expression text that parses back to an expression
    /// with identical evaluation. Binary operands are fully parenthesized, so
    /// the output is unambiguous regardless of precedence.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant { value, .. } => match value {
                Value::Str(s) => write!(f, "{}", quote_string(s)),
                other => write!(f, "{other}"),
            },
            Self::Symbol { name, .. } => write!(f, "{name}"),
            Self::Operator { op, args, .. } => match args.len() {
                1 if op == "!" || op == "'" => write!(f, "{}{op}", postfix_operand(&args[0])),
                1 if op == "not" => write!(f, "not {}", args[0]),
                1 => write!(f, "{op}{}", args[0]),
                2 => write!(f, "({} {op} {})", args[0], args[1]),
                _ => write!(f, "{op}({})", join(args, ", ")),
            },
            Self::Function { callee, args, .. } => {
                write!(f, "{callee}({})", join(args, ", "))
            },
            Self::Parenthesis { inner, .. } => write!(f, "({inner})"),
            Self::Array { items, .. } => write!(f, "[{}]", join(items, ", ")),
            Self::Object { properties, .. } => {
                let body = properties
                    .iter()
                    .map(|(key, value)| {
                        if is_plain_identifier(key) {
                            format!("{key}: {value}")
                        } else {
                            format!("{}: {value}", quote_string(key))
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{body}}}")
            },
            Self::Assignment { target, value, .. } => write!(f, "{target} = {value}"),
            Self::FunctionAssignment { name, params, body, .. } => {
                write!(f, "{name}({}) = {body}", params.join(", "))
            },
            Self::Index { object, parts, .. } => {
                if let [Node::Constant { value: Value::Str(key), .. }] = parts.as_slice() {
                    if is_plain_identifier(key) {
                        return write!(f, "{object}.{key}");
                    }
                }
                write!(f, "{object}[{}]", join(parts, ", "))
            },
            Self::Range { start, end, step, .. } => match step {
                Some(step) => write!(f, "{start}:{step}:{end}"),
                None => write!(f, "{start}:{end}"),
            },
            Self::Conditional { condition, truthy, falsy, .. } => {
                write!(f, "{condition} ? {truthy} : {falsy}")
            },
            Self::Block { statements, .. } => {
                let lines = statements
                    .iter()
                    .map(|s| {
                        if s.visible {
                            s.node.to_string()
                        } else {
                            format!("{};", s.node)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                write!(f, "{lines}")
            },
        }
    }
}
