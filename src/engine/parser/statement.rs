use crate::{
    ast::{BlockStatement, Node},
    engine::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
    },
    error::SyntaxError,
};

impl Parser<'_> {
    /// Parses a whole program.
    ///
    /// Grammar: `program := statement ((";" | newline) statement)*`
    ///
    /// A statement terminated by `;` has its result suppressed. A program
    /// of exactly one visible statement parses to that statement's node;
    /// anything else becomes a [`Node::Block`].
    ///
    /// # Returns
    /// The root node of the program.
    ///
    /// # Errors
    /// `UnexpectedEndOfInput` for an empty program, `UnexpectedToken` when
    /// a statement is not followed by a separator, and anything the
    /// statements themselves raise.
    pub fn parse_program(&mut self) -> ParseResult<Node> {
        self.skip_newlines();
        if self.at_end() {
            return Err(SyntaxError::UnexpectedEndOfInput { line: self.line() });
        }

        let first_line = self.line();
        let mut statements = Vec::new();
        while !self.at_end() {
            self.skip_newlines();
            if self.at_end() {
                break;
            }
            let node = self.parse_statement()?;
            let visible = match self.peek() {
                Some(Token::Semicolon) => {
                    self.bump();
                    false
                },
                Some(Token::NewLine) | None => true,
                Some(_) => return Err(self.unexpected("a statement separator")),
            };
            statements.push(BlockStatement { node, visible });
        }

        if statements.len() == 1 && statements[0].visible {
            return Ok(statements.swap_remove(0).node);
        }
        Ok(Node::Block { statements, line: first_line })
    }

    /// Parses one statement: an expression, optionally followed by `=` and
    /// a value, which turns it into an assignment or function definition.
    ///
    /// Grammar: `statement := expression ("=" expression)?`
    ///
    /// Assignment is not an expression: the `=` is only recognized here, so
    /// chained forms like `a = b = 2` fail on the second `=` at the
    /// separator check.
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Node> {
        let expr = self.with_range(true, Self::parse_expression)?;
        if self.peek() != Some(Token::Equals) {
            return Ok(expr);
        }
        let line = self.bump();
        self.parse_assignment_rhs(expr, line)
    }

    /// Turns an already-parsed left-hand side and the upcoming value into
    /// the proper assignment node.
    ///
    /// A symbol or an index chain rooted at a symbol becomes
    /// [`Node::Assignment`]. A call whose callee is a symbol and whose
    /// arguments are all symbols becomes [`Node::FunctionAssignment`].
    /// Every other shape is an invalid target.
    fn parse_assignment_rhs(&mut self, target: Node, line: usize) -> ParseResult<Node> {
        let value = self.with_range(true, Self::parse_expression)?;

        match target {
            Node::Symbol { .. } => Ok(Node::Assignment {
                target: Box::new(target),
                value: Box::new(value),
                line,
            }),
            Node::Index { .. } if indexed_symbol_root(&target) => Ok(Node::Assignment {
                target: Box::new(target),
                value: Box::new(value),
                line,
            }),
            Node::Function { callee, args, .. } => {
                let Node::Symbol { name, .. } = *callee else {
                    return Err(SyntaxError::InvalidAssignmentTarget { line });
                };
                let params = args
                    .into_iter()
                    .map(|arg| match arg {
                        Node::Symbol { name, .. } => Ok(name),
                        _ => Err(SyntaxError::InvalidAssignmentTarget { line }),
                    })
                    .collect::<ParseResult<Vec<String>>>()?;
                Ok(Node::FunctionAssignment {
                    name,
                    params,
                    body: Box::new(value),
                    line,
                })
            },
            _ => Err(SyntaxError::InvalidAssignmentTarget { line }),
        }
    }
}

/// Tests whether an index chain bottoms out at a symbol, looking through
/// parentheses.
fn indexed_symbol_root(node: &Node) -> bool {
    match node {
        Node::Symbol { .. } => true,
        Node::Index { object, .. } => indexed_symbol_root(object),
        Node::Parenthesis { inner, .. } => indexed_symbol_root(inner),
        _ => false,
    }
}
