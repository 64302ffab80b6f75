use crate::ast::{
    BinaryOperator, Block, ClassDecl, Expression, FunctionDecl, Program, Statement, UnaryOperator,
};
use crate::lexer::{Span, Token, TokenKind};

mod error;

pub use error::ParseError;

type ParseResult<T> = Result<T, ParseError>;

/// Recursive-descent parser over an eagerly lexed token stream.
///
/// Precedence, lowest first: assignment, equality (reserved, currently a
/// pass-through), comparison, addition, multiplication, call/member, primary.
/// All binary levels are left-associative.
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(mut tokens: Vec<Token<'a>>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let span = tokens.last().map(|token| token.span).unwrap_or_default();
            tokens.push(Token::new(TokenKind::EOF, "", span));
        }
        Self { tokens, pos: 0 }
    }

    pub fn parse_program(mut self) -> ParseResult<Program> {
        let mut statements = Vec::new();
        while !self.current().is_eof() {
            if self.consume(TokenKind::Semicolon) {
                continue;
            }
            statements.push(self.parse_declaration()?);
        }
        Ok(Program { statements })
    }

    fn parse_declaration(&mut self) -> ParseResult<Statement> {
        match self.current().kind {
            TokenKind::Class => self.parse_class(),
            TokenKind::Function => Ok(Statement::Function(self.parse_function()?)),
            _ => self.parse_statement(),
        }
    }

    fn parse_class(&mut self) -> ParseResult<Statement> {
        self.advance(); // class
        let name = self.expect_identifier("class name after 'class'")?;
        let base = if self.consume(TokenKind::Extends) {
            Some(self.expect_identifier("base class name after 'extends'")?)
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(Statement::Class(ClassDecl { name, base, body }))
    }

    fn parse_function(&mut self) -> ParseResult<FunctionDecl> {
        self.advance(); // function
        let name = self.expect_identifier("function name after 'function'")?;
        self.expect(TokenKind::LParen, "'(' after function name")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                params.push(self.expect_identifier("parameter name")?);
                if !self.consume(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')' after parameters")?;
        let body = self.parse_block()?;
        Ok(FunctionDecl { name, params, body })
    }

    fn parse_block(&mut self) -> ParseResult<Block> {
        self.expect(TokenKind::LBrace, "'{' to start block")?;
        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.current().is_eof() {
            if self.consume(TokenKind::Semicolon) {
                continue;
            }
            statements.push(self.parse_declaration()?);
        }
        self.expect(TokenKind::RBrace, "'}' after block")?;
        Ok(Block { statements })
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        match self.current().kind {
            TokenKind::Let => self.parse_let(),
            TokenKind::Print => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::Semicolon, "';' after print statement")?;
                Ok(Statement::Print(expr))
            }
            TokenKind::Return => {
                self.advance();
                let value = if self.check(TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.expect(TokenKind::Semicolon, "';' after return statement")?;
                Ok(Statement::Return(value))
            }
            TokenKind::If => self.parse_if(),
            TokenKind::While => {
                self.advance();
                self.expect(TokenKind::LParen, "'(' after 'while'")?;
                let condition = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')' after while condition")?;
                let body = self.parse_block()?;
                Ok(Statement::While { condition, body })
            }
            _ => {
                let expr = self.parse_expression()?;
                self.expect(TokenKind::Semicolon, "';' after expression")?;
                Ok(Statement::Expr(expr))
            }
        }
    }

    fn parse_let(&mut self) -> ParseResult<Statement> {
        self.advance(); // let
        let name = self.expect_identifier("identifier in variable declaration")?;
        self.expect(TokenKind::Equal, "'=' in variable declaration")?;
        let value = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "';' after variable declaration")?;
        Ok(Statement::Let { name, value })
    }

    fn parse_if(&mut self) -> ParseResult<Statement> {
        self.advance(); // if
        self.expect(TokenKind::LParen, "'(' after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen, "')' after if condition")?;
        let then_branch = self.parse_block()?;
        let else_branch = if self.consume(TokenKind::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Statement::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> ParseResult<Expression> {
        let target = self.parse_equality()?;
        if !self.check(TokenKind::Equal) {
            return Ok(target);
        }
        let equal_span = self.advance().span;
        let value = self.parse_assignment()?;
        match target {
            Expression::Identifier(name) => Ok(Expression::Assign {
                name,
                value: Box::new(value),
            }),
            _ => Err(ParseError::InvalidAssignmentTarget {
                line: equal_span.line,
                column: equal_span.column,
            }),
        }
    }

    fn parse_equality(&mut self) -> ParseResult<Expression> {
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_addition()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Less => BinaryOperator::Less,
                TokenKind::LessEqual => BinaryOperator::LessEqual,
                TokenKind::Greater => BinaryOperator::Greater,
                TokenKind::GreaterEqual => BinaryOperator::GreaterEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_addition()?;
            expr = binary(expr, op, right);
        }
        Ok(expr)
    }

    fn parse_addition(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_multiplication()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplication()?;
            expr = binary(expr, op, right);
        }
        Ok(expr)
    }

    fn parse_multiplication(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_call()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinaryOperator::Mul,
                TokenKind::Slash => BinaryOperator::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_call()?;
            expr = binary(expr, op, right);
        }
        Ok(expr)
    }

    fn parse_call(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.consume(TokenKind::LParen) {
                let args = self.parse_arguments("')' after arguments")?;
                expr = Expression::Call {
                    callee: Box::new(expr),
                    args,
                };
            } else if self.consume(TokenKind::Dot) {
                let member = self.expect_identifier("property name after '.'")?;
                expr = Expression::Member {
                    object: Box::new(expr),
                    member,
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    /// Parses a comma-separated argument list; the opening `(` is already consumed.
    fn parse_arguments(&mut self, closing: &str) -> ParseResult<Vec<Expression>> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.consume(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, closing)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Number(value) => {
                self.advance();
                Ok(Expression::Number(value))
            }
            TokenKind::String => {
                self.advance();
                Ok(Expression::String(token.lexeme.to_string()))
            }
            TokenKind::Identifier => {
                self.advance();
                Ok(Expression::Identifier(token.lexeme.to_string()))
            }
            TokenKind::New => {
                self.advance();
                let class_name = self.expect_identifier("class name after 'new'")?;
                self.expect(
                    TokenKind::LParen,
                    "'(' after class name in new expression",
                )?;
                let args = self.parse_arguments("')' after arguments in new expression")?;
                Ok(Expression::New { class_name, args })
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(expr)
            }
            TokenKind::Minus => {
                // Binds to a single primary: `-a.b` negates `a` before the member access.
                self.advance();
                let operand = self.parse_primary()?;
                Ok(Expression::Unary {
                    op: UnaryOperator::Negate,
                    operand: Box::new(operand),
                })
            }
            _ => Err(ParseError::unexpected("expression", &token)),
        }
    }

    fn current(&self) -> &Token<'a> {
        // `new` guarantees a trailing EOF, and `advance` never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token<'a> {
        let token = self.current().clone();
        if !token.is_eof() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> ParseResult<Span> {
        if self.check(kind) {
            Ok(self.advance().span)
        } else {
            Err(ParseError::unexpected(expected, self.current()))
        }
    }

    fn expect_identifier(&mut self, expected: &str) -> ParseResult<String> {
        if self.check(TokenKind::Identifier) {
            Ok(self.advance().lexeme.to_string())
        } else {
            Err(ParseError::unexpected(expected, self.current()))
        }
    }
}

fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Expression {
    Expression::Binary {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse_tokens(tokens: Vec<Token<'_>>) -> Result<Program, ParseError> {
    let program = Parser::new(tokens).parse_program()?;
    tracing::debug!(statements = program.statements.len(), "parsed program");
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use indoc::indoc;

    fn parse(input: &str) -> Result<Program, ParseError> {
        parse_tokens(tokenize(input).expect("tokenize failed"))
    }

    fn parse_expr(input: &str) -> Expression {
        let program = parse(&format!("{input};")).expect("parse failed");
        match program.statements.into_iter().next() {
            Some(Statement::Expr(expr)) => expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    fn num(value: f64) -> Expression {
        Expression::Number(value)
    }

    fn identifier(name: &str) -> Expression {
        Expression::Identifier(name.to_string())
    }

    #[test]
    fn parses_function_and_call() {
        let input = indoc! {"
            function square(n) {
                return n * n;
            }
            print square(4);
        "};
        let program = parse(input).expect("parse failed");

        let expected = Program {
            statements: vec![
                Statement::Function(FunctionDecl {
                    name: "square".to_string(),
                    params: vec!["n".to_string()],
                    body: Block {
                        statements: vec![Statement::Return(Some(binary(
                            identifier("n"),
                            BinaryOperator::Mul,
                            identifier("n"),
                        )))],
                    },
                }),
                Statement::Print(Expression::Call {
                    callee: Box::new(identifier("square")),
                    args: vec![num(4.0)],
                }),
            ],
        };

        assert_eq!(program, expected);
    }

    #[test]
    fn subtraction_is_left_associative() {
        assert_eq!(
            parse_expr("8 - 3 - 2"),
            binary(
                binary(num(8.0), BinaryOperator::Sub, num(3.0)),
                BinaryOperator::Sub,
                num(2.0)
            )
        );
    }

    #[test]
    fn division_is_left_associative() {
        assert_eq!(
            parse_expr("8 / 4 * 2"),
            binary(
                binary(num(8.0), BinaryOperator::Div, num(4.0)),
                BinaryOperator::Mul,
                num(2.0)
            )
        );
    }

    #[test]
    fn multiplication_binds_tighter_than_addition_and_comparison() {
        assert_eq!(
            parse_expr("1 + 2 * 3 <= 7"),
            binary(
                binary(
                    num(1.0),
                    BinaryOperator::Add,
                    binary(num(2.0), BinaryOperator::Mul, num(3.0))
                ),
                BinaryOperator::LessEqual,
                num(7.0)
            )
        );
    }

    #[test]
    fn assignment_is_right_associative() {
        assert_eq!(
            parse_expr("a = b = 1"),
            Expression::Assign {
                name: "a".to_string(),
                value: Box::new(Expression::Assign {
                    name: "b".to_string(),
                    value: Box::new(num(1.0)),
                }),
            }
        );
    }

    #[test]
    fn rejects_invalid_assignment_target() {
        let err = parse("1 = 2;").expect_err("expected parse failure");
        assert_eq!(
            err,
            ParseError::InvalidAssignmentTarget { line: 1, column: 2 }
        );
        assert!(matches!(
            parse("a.b = 2;"),
            Err(ParseError::InvalidAssignmentTarget { .. })
        ));
    }

    #[test]
    fn chains_calls_and_member_access() {
        assert_eq!(
            parse_expr("a.b(1).c"),
            Expression::Member {
                object: Box::new(Expression::Call {
                    callee: Box::new(Expression::Member {
                        object: Box::new(identifier("a")),
                        member: "b".to_string(),
                    }),
                    args: vec![num(1.0)],
                }),
                member: "c".to_string(),
            }
        );
    }

    #[test]
    fn unary_minus_binds_to_primary_only() {
        assert_eq!(
            parse_expr("-f(2)"),
            Expression::Call {
                callee: Box::new(Expression::Unary {
                    op: UnaryOperator::Negate,
                    operand: Box::new(identifier("f")),
                }),
                args: vec![num(2.0)],
            }
        );
        assert_eq!(
            parse_expr("-(1 + 2)"),
            Expression::Unary {
                op: UnaryOperator::Negate,
                operand: Box::new(binary(num(1.0), BinaryOperator::Add, num(2.0))),
            }
        );
    }

    #[test]
    fn parses_new_expression() {
        assert_eq!(
            parse_expr("new Dog(\"Rex\", 3)"),
            Expression::New {
                class_name: "Dog".to_string(),
                args: vec![Expression::String("Rex".to_string()), num(3.0)],
            }
        );
        assert_eq!(
            parse_expr("new Empty()"),
            Expression::New {
                class_name: "Empty".to_string(),
                args: vec![],
            }
        );
    }

    #[test]
    fn parses_class_with_base_and_members() {
        let input = indoc! {r#"
            class Dog extends Animal {
                let sound = "Woof";
                function bark() { return sound; }
            }
        "#};
        let program = parse(input).expect("parse failed");
        let Statement::Class(class) = &program.statements[0] else {
            panic!("expected class declaration");
        };
        assert_eq!(class.name, "Dog");
        assert_eq!(class.base.as_deref(), Some("Animal"));
        assert_eq!(class.body.statements.len(), 2);
        assert!(matches!(class.body.statements[1], Statement::Function(_)));
    }

    #[test]
    fn class_body_accepts_any_statement_syntactically() {
        let program = parse("class A { print 1; }").expect("parse failed");
        let Statement::Class(class) = &program.statements[0] else {
            panic!("expected class declaration");
        };
        assert!(matches!(class.body.statements[0], Statement::Print(_)));
    }

    #[test]
    fn parses_if_else_and_while() {
        let input = indoc! {"
            if (x < 1) { print 1; } else { print 2; }
            while (x) { x = x - 1; }
        "};
        let program = parse(input).expect("parse failed");
        assert!(matches!(
            &program.statements[0],
            Statement::If {
                else_branch: Some(_),
                ..
            }
        ));
        assert!(matches!(&program.statements[1], Statement::While { .. }));
    }

    #[test]
    fn bare_return_has_no_value() {
        let program = parse("function f() { return; }").expect("parse failed");
        let Statement::Function(function) = &program.statements[0] else {
            panic!("expected function declaration");
        };
        assert_eq!(function.body.statements, vec![Statement::Return(None)]);
    }

    #[test]
    fn skips_stray_semicolons() {
        let program = parse(";; let x = 1;; function f() { ; print x; ; } ;").expect("parse failed");
        assert_eq!(program.statements.len(), 2);
        let Statement::Function(function) = &program.statements[1] else {
            panic!("expected function declaration");
        };
        assert_eq!(function.body.statements.len(), 1);
    }

    #[test]
    fn rejects_bare_block_statement() {
        let err = parse("{ print 1; }").expect_err("expected parse failure");
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: "expression".to_string(),
                found: "'{'".to_string(),
                line: 1,
                column: 0,
            }
        );
    }

    #[test]
    fn rejects_non_ascii_identifier() {
        let err = parse("let é = 1;").expect_err("expected parse failure");
        assert!(
            err.to_string()
                .starts_with("Expected identifier in variable declaration, got 'é'")
        );
    }

    #[test]
    fn reports_missing_semicolon() {
        let err = parse("let x = 1\nprint x;").expect_err("expected parse failure");
        assert_eq!(
            err.to_string(),
            "Expected ';' after variable declaration, got 'print' at line 2, column 0"
        );
    }

    #[test]
    fn reports_missing_closing_brace() {
        let err = parse("function f() { print 1;").expect_err("expected parse failure");
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: "'}' after block".to_string(),
                found: "end of input".to_string(),
                line: 1,
                column: 23,
            }
        );
    }

    #[test]
    fn let_requires_initializer() {
        let err = parse("let x;").expect_err("expected parse failure");
        assert!(err.to_string().contains("Expected '=' in variable declaration"));
    }

    #[test]
    fn rejects_unknown_tokens_and_this() {
        let err = parse("print 1 @ 2;").expect_err("expected parse failure");
        assert!(err.to_string().contains("got '@'"));
        let err = parse("print this;").expect_err("expected parse failure");
        assert!(err.to_string().contains("Expected expression, got 'this'"));
    }

    #[test]
    fn tolerates_missing_eof_sentinel() {
        let mut tokens = tokenize("print 1;").expect("tokenize failed");
        tokens.pop();
        let program = parse_tokens(tokens).expect("parse failed");
        assert_eq!(program.statements, vec![Statement::Print(num(1.0))]);
    }
}
