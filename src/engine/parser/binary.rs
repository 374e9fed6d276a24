use crate::{
    ast::Node,
    engine::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
    },
};

/// Builds a binary operator node.
fn binary(op: &str, fn_name: &str, left: Node, right: Node, line: usize) -> Node {
    Node::Operator {
        op: op.to_string(),
        fn_name: fn_name.to_string(),
        args: vec![left, right],
        implicit: false,
        line,
    }
}

impl Parser<'_> {
    /// Parses a full expression.
    ///
    /// This is the entry point for expression parsing. At the positions
    /// that allow ranges — whole statements, assignment values, subscripts
    /// and matrix items — it begins at the range level; everywhere else it
    /// begins at the conditional operator and recursively descends through
    /// the precedence hierarchy. A bare range is therefore always the
    /// whole production at its position, never the operand of another
    /// operator.
    ///
    /// Grammar: `expression := range | conditional`
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Node> {
        if self.range_allowed {
            self.parse_range()
        } else {
            self.parse_conditional()
        }
    }

    /// Parses a ternary conditional.
    ///
    /// Grammar: `conditional := logical_or ("?" conditional ":" conditional)?`
    ///
    /// The branches parse with ranges disabled, so the branch-separating
    /// `:` is unambiguous; a range in a branch needs brackets around it.
    fn parse_conditional(&mut self) -> ParseResult<Node> {
        let condition = self.parse_logical_or()?;
        if self.peek() != Some(Token::Question) {
            return Ok(condition);
        }
        let line = self.bump();
        let truthy = self.with_range(false, Self::parse_conditional)?;
        self.expect(&Token::Colon, "':'")?;
        let falsy = self.with_range(false, Self::parse_conditional)?;
        Ok(Node::Conditional {
            condition: Box::new(condition),
            truthy: Box::new(truthy),
            falsy: Box::new(falsy),
            line,
        })
    }

    /// Grammar: `logical_or := logical_and ("or" logical_and)*`
    fn parse_logical_or(&mut self) -> ParseResult<Node> {
        let mut node = self.parse_logical_and()?;
        while self.peek() == Some(Token::Or) {
            let line = self.bump();
            let right = self.parse_logical_and()?;
            node = binary("or", "or", node, right, line);
        }
        Ok(node)
    }

    /// Grammar: `logical_and := bitwise_or ("and" bitwise_or)*`
    fn parse_logical_and(&mut self) -> ParseResult<Node> {
        let mut node = self.parse_bitwise_or()?;
        while self.peek() == Some(Token::And) {
            let line = self.bump();
            let right = self.parse_bitwise_or()?;
            node = binary("and", "and", node, right, line);
        }
        Ok(node)
    }

    /// Grammar: `bitwise_or := bitwise_xor ("|" bitwise_xor)*`
    fn parse_bitwise_or(&mut self) -> ParseResult<Node> {
        let mut node = self.parse_bitwise_xor()?;
        while self.peek() == Some(Token::Pipe) {
            let line = self.bump();
            let right = self.parse_bitwise_xor()?;
            node = binary("|", "bit_or", node, right, line);
        }
        Ok(node)
    }

    /// Grammar: `bitwise_xor := bitwise_and ("^|" bitwise_and)*`
    fn parse_bitwise_xor(&mut self) -> ParseResult<Node> {
        let mut node = self.parse_bitwise_and()?;
        while self.peek() == Some(Token::CaretPipe) {
            let line = self.bump();
            let right = self.parse_bitwise_and()?;
            node = binary("^|", "bit_xor", node, right, line);
        }
        Ok(node)
    }

    /// Grammar: `bitwise_and := relational ("&" relational)*`
    fn parse_bitwise_and(&mut self) -> ParseResult<Node> {
        let mut node = self.parse_relational()?;
        while self.peek() == Some(Token::Ampersand) {
            let line = self.bump();
            let right = self.parse_relational()?;
            node = binary("&", "bit_and", node, right, line);
        }
        Ok(node)
    }

    /// Parses comparisons.
    ///
    /// Grammar: `relational := shift (("==" | "!=" | "<" | ">" | "<=" | ">=") shift)*`
    ///
    /// All six comparison operators share one level and associate left, so
    /// `2 < 3 < 1` is `(2 < 3) < 1`.
    fn parse_relational(&mut self) -> ParseResult<Node> {
        let mut node = self.parse_shift()?;
        loop {
            let (op, fn_name) = match self.peek() {
                Some(Token::EqualEqual) => ("==", "equal"),
                Some(Token::BangEqual) => ("!=", "unequal"),
                Some(Token::Less) => ("<", "smaller"),
                Some(Token::Greater) => (">", "larger"),
                Some(Token::LessEqual) => ("<=", "smaller_eq"),
                Some(Token::GreaterEqual) => (">=", "larger_eq"),
                _ => return Ok(node),
            };
            let line = self.bump();
            let right = self.parse_shift()?;
            node = binary(op, fn_name, node, right, line);
        }
    }

    /// Grammar: `shift := additive (("<<" | ">>" | ">>>") additive)*`
    fn parse_shift(&mut self) -> ParseResult<Node> {
        let mut node = self.parse_additive()?;
        loop {
            let (op, fn_name) = match self.peek() {
                Some(Token::LeftShift) => ("<<", "left_shift"),
                Some(Token::RightShift) => (">>", "right_shift"),
                Some(Token::RightShiftLogical) => (">>>", "right_shift_logical"),
                _ => return Ok(node),
            };
            let line = self.bump();
            let right = self.parse_additive()?;
            node = binary(op, fn_name, node, right, line);
        }
    }

    /// Parses a range at one of the positions that allow them.
    ///
    /// Grammar: `range := conditional (":" additive (":" additive)?)?`
    ///
    /// The two-colon form is `start:step:end`. The descent into the bounds
    /// disables ranges again, so a range never nests in another range or
    /// operator expression without brackets; combining a bare range with a
    /// binary operator, as in `1:2 == 3`, fails at the separator check
    /// rather than producing a node whose printed form cannot re-parse.
    fn parse_range(&mut self) -> ParseResult<Node> {
        let start = self.with_range(false, Self::parse_conditional)?;
        if self.peek() != Some(Token::Colon) {
            return Ok(start);
        }
        let line = self.bump();
        let second = self.with_range(false, Self::parse_additive)?;
        if self.peek() != Some(Token::Colon) {
            return Ok(Node::Range {
                start: Box::new(start),
                end: Box::new(second),
                step: None,
                line,
            });
        }
        self.bump();
        let end = self.with_range(false, Self::parse_additive)?;
        Ok(Node::Range {
            start: Box::new(start),
            end: Box::new(end),
            step: Some(Box::new(second)),
            line,
        })
    }

    /// Grammar: `additive := multiplicative (("+" | "-") multiplicative)*`
    fn parse_additive(&mut self) -> ParseResult<Node> {
        let mut node = self.parse_multiplicative()?;
        loop {
            let (op, fn_name) = match self.peek() {
                Some(Token::Plus) => ("+", "add"),
                Some(Token::Minus) => ("-", "subtract"),
                _ => return Ok(node),
            };
            let line = self.bump();
            let right = self.parse_multiplicative()?;
            node = binary(op, fn_name, node, right, line);
        }
    }

    /// Grammar: `multiplicative := implicit (("*" | "/" | "%" | "mod") implicit)*`
    fn parse_multiplicative(&mut self) -> ParseResult<Node> {
        let mut node = self.parse_implicit()?;
        loop {
            let (op, fn_name) = match self.peek() {
                Some(Token::Star) => ("*", "multiply"),
                Some(Token::Slash) => ("/", "divide"),
                Some(Token::Percent) => ("%", "mod"),
                Some(Token::Mod) => ("mod", "mod"),
                _ => return Ok(node),
            };
            let line = self.bump();
            let right = self.parse_implicit()?;
            node = binary(op, fn_name, node, right, line);
        }
    }

    /// Parses implicit multiplication by adjacency, as in `2x`, `2(3+4)`
    /// or `(1+2)(3+4)`.
    ///
    /// Grammar: `implicit := unary (unary)*` where the following unary
    /// starts with an identifier or `(`.
    ///
    /// Sitting between `*` and the unary operators makes `6/3x` parse as
    /// `6/(3x)` while `2x^2` stays `2*(x^2)`. A `(` directly after a
    /// symbol or a subscript is a call, which the postfix parser has
    /// already taken by the time this loop looks.
    fn parse_implicit(&mut self) -> ParseResult<Node> {
        let mut node = self.parse_unary()?;
        while matches!(self.peek(), Some(Token::Identifier(_) | Token::LParen)) {
            let line = node.line();
            let right = self.parse_unary()?;
            node = Node::Operator {
                op: "*".to_string(),
                fn_name: "multiply".to_string(),
                args: vec![node, right],
                implicit: true,
                line,
            };
        }
        Ok(node)
    }
}
