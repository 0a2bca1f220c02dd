use crate::diagnostic::{Diagnostics, Location, SyntaxError};
use crate::expr::*;
use crate::statement::Stmt;
use crate::token::*;

use tracing::{debug, trace};

type ParseResult<T> = Result<T, SyntaxError>;
type ExprResult = ParseResult<ExprRef>;

pub struct Parser<'a> {
    /// Always ends with an `Eof` token.
    tokens: &'a [Token],
    index: usize,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], diagnostics: &'a mut Diagnostics) -> Parser<'a> {
        Parser {
            tokens,
            index: 0,
            diagnostics,
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek().map_or(true, Token::is_eof)
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.index)
    }

    // The token errors are reported at; falls back to the last token so an
    // unterminated stream still reports "at end".
    fn current(&self) -> Option<&'a Token> {
        self.peek().or_else(|| self.tokens.last())
    }

    fn previous(&self) -> Option<&'a Token> {
        self.index.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    fn advance(&mut self) -> Option<&'a Token> {
        if !self.is_at_end() {
            self.index += 1;
        }
        self.previous()
    }

    fn check(&self, tok: &TokenType) -> bool {
        !self.is_at_end() && self.peek().map(|x| &x.data) == Some(tok)
    }

    fn match_next_lits<const N: usize>(&mut self, ttypes: [TokenType; N]) -> Option<&'a Token> {
        if ttypes.iter().any(|x| self.check(x)) {
            self.advance()
        } else {
            None
        }
    }

    /// Consumes the next token if it is one of the operator tokens in `ops`.
    fn match_op<T: Copy>(&mut self, ops: &[(TokenType, T)]) -> Option<(T, &'a Token)> {
        let (_, op) = ops.iter().find(|(tok, _)| self.check(tok))?;
        Some((*op, self.advance()?))
    }

    fn error(&self, message: &'static str) -> SyntaxError {
        match self.current() {
            Some(tok) => SyntaxError::at(tok, message),
            None => SyntaxError {
                line: 1,
                location: Location::End,
                message: message.into(),
            },
        }
    }

    fn consume(&mut self, tok: &TokenType, message: &'static str) -> ParseResult<&'a Token> {
        if self.check(tok) {
            if let Some(tok) = self.advance() {
                return Ok(tok);
            }
        }
        Err(self.error(message))
    }

    fn consume_identifier(&mut self, message: &'static str) -> ParseResult<Token> {
        match self.peek() {
            Some(tok @ Token { data: TokenType::Identifier(_), .. }) => {
                self.index += 1;
                Ok(tok.clone())
            }
            _ => Err(self.error(message)),
        }
    }

    /// Skips tokens up to the next statement boundary: just past a `;`, or
    /// right before a keyword that starts a statement.
    fn synchronize(&mut self) {
        let from = self.index;
        self.advance();

        while !self.is_at_end() {
            if self.previous().is_some_and(|t| t.data == TokenType::Semicolon) {
                break;
            }
            if self.peek().is_some_and(|t| t.data.starts_statement()) {
                break;
            }
            self.advance();
        }
        trace!(skipped = self.index - from, "synchronized");
    }

    // Parsing the actual grammar.
    /// Parses every declaration in the token stream. Declarations with syntax
    /// errors are reported and left out of the result.
    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut res = vec![];
        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                res.push(stmt);
            }
        }
        debug!(statements = res.len(), had_error = self.diagnostics.had_error(), "parsed");
        res
    }

    fn declaration(&mut self) -> Option<Stmt> {
        let res = if self.match_next_lits([TokenType::Var]).is_some() {
            self.var_declaration()
        } else {
            self.statement()
        };

        match res {
            Ok(stmt) => Some(stmt),
            Err(err) => {
                self.diagnostics.syntax(err);
                self.synchronize();
                None
            }
        }
    }

    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let id = self.consume_identifier("Expect variable name.")?;
        let init = if self.match_next_lits([TokenType::Equal]).is_some() {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(&TokenType::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::Declare(id, init))
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        if self.match_next_lits([TokenType::Print]).is_some() {
            self.print_statement()
        } else if self.match_next_lits([TokenType::LeftBrace]).is_some() {
            Ok(Stmt::Block(self.block()?))
        } else {
            self.expression_statement()
        }
    }

    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut res = vec![];
        while !self.is_at_end() && !self.check(&TokenType::RightBrace) {
            if let Some(stmt) = self.declaration() {
                res.push(stmt);
            }
        }
        self.consume(&TokenType::RightBrace, "Expect '}' after block.")?;
        Ok(res)
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let res = self.expression()?;
        self.consume(&TokenType::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(res))
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let res = self.expression()?;
        self.consume(&TokenType::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expr(res))
    }

    pub fn expression(&mut self) -> ExprResult {
        self.assignment()
    }

    fn assignment(&mut self) -> ExprResult {
        let expr = self.equality()?;
        if let Some(equals) = self.match_next_lits([TokenType::Equal]) {
            let val = self.assignment()?;
            return match *expr {
                Expr::Variable(name) => Ok(Box::new(Expr::Assignment(name, val))),
                target => {
                    // Reported, but the parser is still in a sane state.
                    self.diagnostics
                        .syntax(SyntaxError::at(equals, "Invalid assignment target."));
                    Ok(Box::new(target))
                }
            };
        }
        Ok(expr)
    }

    fn binary_level(
        &mut self,
        ops: &[(TokenType, BinaryOp)],
        operand: fn(&mut Self) -> ExprResult,
    ) -> ExprResult {
        let mut expr = operand(self)?;
        while let Some((op, tok)) = self.match_op(ops) {
            let right = operand(self)?;
            expr = Box::new(Expr::Binary(expr, op, tok.clone(), right));
        }
        Ok(expr)
    }

    fn equality(&mut self) -> ExprResult {
        self.binary_level(
            &[
                (TokenType::BangEqual, BinaryOp::NotEqual),
                (TokenType::EqualEqual, BinaryOp::Equal),
            ],
            Self::comparison,
        )
    }

    fn comparison(&mut self) -> ExprResult {
        self.binary_level(
            &[
                (TokenType::Greater, BinaryOp::Greater),
                (TokenType::GreaterEqual, BinaryOp::GreaterEqual),
                (TokenType::Less, BinaryOp::Less),
                (TokenType::LessEqual, BinaryOp::LessEqual),
            ],
            Self::term,
        )
    }

    fn term(&mut self) -> ExprResult {
        self.binary_level(
            &[
                (TokenType::Minus, BinaryOp::Subtract),
                (TokenType::Plus, BinaryOp::Add),
            ],
            Self::factor,
        )
    }

    fn factor(&mut self) -> ExprResult {
        self.binary_level(
            &[
                (TokenType::Slash, BinaryOp::Divide),
                (TokenType::Star, BinaryOp::Multiply),
            ],
            Self::unary,
        )
    }

    fn unary(&mut self) -> ExprResult {
        let ops = [(TokenType::Bang, UnaryOp::Not), (TokenType::Minus, UnaryOp::Negate)];
        if let Some((op, tok)) = self.match_op(&ops) {
            Ok(Box::new(Expr::Unary(op, tok.clone(), self.unary()?)))
        } else {
            self.primary()
        }
    }

    fn primary(&mut self) -> ExprResult {
        let Some(tok) = self.peek().filter(|t| !t.is_eof()) else {
            return Err(self.error("Expect Expression."));
        };
        let res = match &tok.data {
            TokenType::True => Expr::Literal(Val::Bool(true)),
            TokenType::False => Expr::Literal(Val::Bool(false)),
            TokenType::Nil => Expr::Literal(Val::Nil),
            TokenType::Number(x) => Expr::Literal(Val::Num(*x)),
            TokenType::String(x) => Expr::Literal(Val::String(x.clone())),
            TokenType::Identifier(_) => Expr::Variable(tok.clone()),
            TokenType::LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume(&TokenType::RightParen, "Expect ')' after expression.")?;
                return Ok(Box::new(Expr::Grouping(expr)));
            }
            _ => return Err(self.error("Expect Expression.")),
        };
        self.advance();

        Ok(Box::new(res))
    }
}
