use crate::{
    ast::Node,
    engine::{
        lexer::Token,
        parser::core::{Group, ParseResult, Parser},
        value::core::Value,
    },
    error::SyntaxError,
};

impl Parser<'_> {
    /// Parses prefix operators.
    ///
    /// Grammar: `unary := ("-" | "+" | "not" | "~") unary | power`
    ///
    /// Prefix operators bind looser than power, so `-2^2` is `-(2^2)`.
    pub(crate) fn parse_unary(&mut self) -> ParseResult<Node> {
        let (op, fn_name) = match self.peek() {
            Some(Token::Minus) => ("-", "unary_minus"),
            Some(Token::Plus) => ("+", "unary_plus"),
            Some(Token::Not) => ("not", "not"),
            Some(Token::Tilde) => ("~", "bit_not"),
            _ => return self.parse_power(),
        };
        let line = self.bump();
        let arg = self.parse_unary()?;
        Ok(Node::Operator {
            op: op.to_string(),
            fn_name: fn_name.to_string(),
            args: vec![arg],
            implicit: false,
            line,
        })
    }

    /// Parses exponentiation.
    ///
    /// Grammar: `power := postfix ("^" unary)?`
    ///
    /// The exponent re-enters at `unary`, which makes power right
    /// associative (`2^3^2` is `2^(3^2)`) and lets exponents carry a sign
    /// (`2^-2`).
    fn parse_power(&mut self) -> ParseResult<Node> {
        let base = self.parse_postfix()?;
        if self.peek() != Some(Token::Caret) {
            return Ok(base);
        }
        let line = self.bump();
        let exponent = self.parse_unary()?;
        Ok(Node::Operator {
            op: "^".to_string(),
            fn_name: "pow".to_string(),
            args: vec![base, exponent],
            implicit: false,
            line,
        })
    }

    /// Parses postfix operators, subscripts, property access and calls.
    ///
    /// Grammar: `postfix := atom ("!" | "'" | "." name | "[" parts "]" | "(" args ")")*`
    ///
    /// A `(` continues the chain as a call only after a symbol or a
    /// subscript; after anything else it is left for implicit
    /// multiplication.
    fn parse_postfix(&mut self) -> ParseResult<Node> {
        let mut node = self.parse_atom()?;
        loop {
            match self.peek() {
                Some(Token::Bang) => {
                    let line = self.bump();
                    node = Node::Operator {
                        op: "!".to_string(),
                        fn_name: "factorial".to_string(),
                        args: vec![node],
                        implicit: false,
                        line,
                    };
                },
                Some(Token::Quote) => {
                    let line = self.bump();
                    node = Node::Operator {
                        op: "'".to_string(),
                        fn_name: "transpose".to_string(),
                        args: vec![node],
                        implicit: false,
                        line,
                    };
                },
                Some(Token::Dot) => {
                    let line = self.bump();
                    let Some(Token::Identifier(key)) = self.peek() else {
                        return Err(self.unexpected("a property name"));
                    };
                    self.bump();
                    node = Node::Index {
                        object: Box::new(node),
                        parts: vec![Node::Constant { value: Value::Str(key), line }],
                        line,
                    };
                },
                Some(Token::LBracket) => {
                    let line = self.bump();
                    self.groups.push(Group::Bracket);
                    let parts = self.with_range(true, Self::parse_index_parts)?;
                    self.groups.pop();
                    node = Node::Index { object: Box::new(node), parts, line };
                },
                Some(Token::LParen)
                    if matches!(node, Node::Symbol { .. } | Node::Index { .. }) =>
                {
                    let line = self.bump();
                    self.groups.push(Group::Paren);
                    let args = self.with_range(false, Self::parse_call_args)?;
                    self.groups.pop();
                    node = Node::Function { callee: Box::new(node), args, line };
                },
                _ => return Ok(node),
            }
        }
    }

    /// Parses the primary forms.
    ///
    /// Grammar: `atom := number | string | boolean | identifier
    ///                 | "(" expression ")" | matrix | object`
    fn parse_atom(&mut self) -> ParseResult<Node> {
        match self.peek() {
            Some(Token::Number(value)) => {
                let line = self.bump();
                Ok(Node::Constant { value: Value::Number(value), line })
            },
            Some(Token::Str(value)) => {
                let line = self.bump();
                Ok(Node::Constant { value: Value::Str(value), line })
            },
            Some(Token::Bool(value)) => {
                let line = self.bump();
                Ok(Node::Constant { value: Value::Bool(value), line })
            },
            Some(Token::Identifier(name)) => {
                let line = self.bump();
                Ok(Node::Symbol { name, line })
            },
            Some(Token::LParen) => {
                let line = self.bump();
                self.groups.push(Group::Paren);
                let inner = self.with_range(false, Self::parse_expression)?;
                self.expect(&Token::RParen, "')'")?;
                self.groups.pop();
                Ok(Node::Parenthesis { inner: Box::new(inner), line })
            },
            Some(Token::LBracket) => self.parse_matrix(),
            Some(Token::LBrace) => self.parse_object(),
            Some(_) => Err(self.unexpected("an expression")),
            None => Err(SyntaxError::UnexpectedEndOfInput { line: self.line() }),
        }
    }

    /// Parses the subscript parts of an index, including the closing `]`.
    ///
    /// Grammar: `parts := expression ("," expression)*`
    ///
    /// An empty subscript is an error. Ranges are enabled, so `a[2:end]`
    /// works without extra brackets.
    fn parse_index_parts(&mut self) -> ParseResult<Vec<Node>> {
        if self.peek() == Some(Token::RBracket) {
            return Err(self.unexpected("an index expression"));
        }
        let mut parts = vec![self.parse_expression()?];
        while self.peek() == Some(Token::Comma) {
            self.bump();
            parts.push(self.parse_expression()?);
        }
        self.expect(&Token::RBracket, "']'")?;
        Ok(parts)
    }

    /// Parses call arguments, including the closing `)`.
    ///
    /// Grammar: `args := (expression ("," expression)*)?`
    fn parse_call_args(&mut self) -> ParseResult<Vec<Node>> {
        let mut args = Vec::new();
        if self.peek() == Some(Token::RParen) {
            self.bump();
            return Ok(args);
        }
        args.push(self.parse_expression()?);
        while self.peek() == Some(Token::Comma) {
            self.bump();
            args.push(self.parse_expression()?);
        }
        self.expect(&Token::RParen, "')'")?;
        Ok(args)
    }

    /// Parses an array or matrix literal.
    ///
    /// Grammar: `matrix := "[" (row ((";" | newline) row)*)? "]"`
    /// with `row := item ("," item)*`.
    ///
    /// One row yields a flat array; several rows yield an array of row
    /// arrays. Rectangularity is not checked here.
    fn parse_matrix(&mut self) -> ParseResult<Node> {
        let line = self.bump();
        self.groups.push(Group::Bracket);
        self.skip_newlines();

        if self.peek() == Some(Token::RBracket) {
            self.bump();
            self.groups.pop();
            return Ok(Node::Array { items: Vec::new(), line });
        }

        let mut rows = vec![self.parse_matrix_row()?];
        loop {
            match self.peek() {
                Some(Token::Semicolon | Token::NewLine) => {
                    self.skip_row_separators();
                    if self.peek() == Some(Token::RBracket) {
                        break;
                    }
                    rows.push(self.parse_matrix_row()?);
                },
                Some(Token::RBracket) => break,
                _ => return Err(self.unexpected("',', ';' or ']'")),
            }
        }
        self.bump();
        self.groups.pop();

        if rows.len() == 1 {
            return Ok(Node::Array { items: rows.swap_remove(0), line });
        }
        let items = rows
            .into_iter()
            .map(|items| {
                let row_line = items.first().map_or(line, Node::line);
                Node::Array { items, line: row_line }
            })
            .collect();
        Ok(Node::Array { items, line })
    }

    /// Parses one matrix row. Ranges are item-level legal, so `[1:3]` is
    /// the materialized range.
    fn parse_matrix_row(&mut self) -> ParseResult<Vec<Node>> {
        let mut items = vec![self.with_range(true, Self::parse_expression)?];
        while self.peek() == Some(Token::Comma) {
            self.bump();
            // a row may wrap to the next line after a comma
            self.skip_newlines();
            items.push(self.with_range(true, Self::parse_expression)?);
        }
        Ok(items)
    }

    /// Skips over any run of row separators inside a matrix literal.
    fn skip_row_separators(&mut self) {
        while matches!(
            self.tokens.get(self.pos),
            Some((Token::Semicolon | Token::NewLine, _))
        ) {
            self.pos += 1;
        }
    }

    /// Parses an object literal.
    ///
    /// Grammar: `object := "{" (pair ("," pair)*)? "}"`
    /// with `pair := (identifier | string) ":" expression`.
    fn parse_object(&mut self) -> ParseResult<Node> {
        let line = self.bump();
        self.groups.push(Group::Brace);

        let mut properties = Vec::new();
        if self.peek() == Some(Token::RBrace) {
            self.bump();
            self.groups.pop();
            return Ok(Node::Object { properties, line });
        }

        loop {
            let key = match self.peek() {
                Some(Token::Identifier(name)) => {
                    self.bump();
                    name
                },
                Some(Token::Str(text)) => {
                    self.bump();
                    text
                },
                _ => return Err(self.unexpected("a property key")),
            };
            self.expect(&Token::Colon, "':'")?;
            let value = self.with_range(false, Self::parse_expression)?;
            properties.push((key, value));

            match self.peek() {
                Some(Token::Comma) => {
                    self.bump();
                },
                Some(Token::RBrace) => break,
                _ => return Err(self.unexpected("',' or '}'")),
            }
        }
        self.bump();
        self.groups.pop();
        Ok(Node::Object { properties, line })
    }
}
