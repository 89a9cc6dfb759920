//! Recursive-descent parser for function expressions.

use super::ast::{BinaryOp, Constant, Expr, Function};
use super::lexer::{Lexer, Token, TokenKind};
use crate::arith::Decimal;
use crate::error::{Result, RootError};

/// Parser for function expressions.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the entire expression.
    pub fn parse(&mut self) -> Result<Expr> {
        if self.current.kind == TokenKind::Eof {
            return Err(RootError::parse(self.current.column, "empty expression"));
        }
        let expr = self.parse_sum()?;
        if self.current.kind != TokenKind::Eof {
            return Err(RootError::parse(
                self.current.column,
                format!("unexpected token '{}'", self.current.text),
            ));
        }
        Ok(expr)
    }

    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            self.advance()
        } else {
            Err(RootError::parse(
                self.current.column,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    // sum = product { ('+' | '-') product }
    fn parse_sum(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_product()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance()?;
            let rhs = self.parse_product()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    // product = unary { ('*' | '/') unary }
    fn parse_product(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.advance()?;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    // unary = ('-' | '+') unary | power
    fn parse_unary(&mut self) -> Result<Expr> {
        match self.current.kind {
            TokenKind::Minus => {
                self.advance()?;
                Ok(Expr::Negate(Box::new(self.parse_unary()?)))
            }
            TokenKind::Plus => {
                self.advance()?;
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    // power = primary [ '^' unary ], so -x^2 = -(x^2) and 2^-x = 2^(-x)
    fn parse_power(&mut self) -> Result<Expr> {
        let base = self.parse_primary()?;
        if self.current.kind == TokenKind::Caret {
            self.advance()?;
            let exponent = self.parse_unary()?;
            return Ok(Expr::Binary(
                BinaryOp::Pow,
                Box::new(base),
                Box::new(exponent),
            ));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.current.kind {
            TokenKind::Number => {
                let tok = self.advance()?;
                parse_number(&tok.text)
                    .map(Expr::Number)
                    .ok_or_else(|| {
                        RootError::parse(tok.column, format!("invalid number: {}", tok.text))
                    })
            }
            TokenKind::Identifier => {
                let tok = self.advance()?;
                self.parse_identifier(tok)
            }
            TokenKind::OpenParen => {
                self.advance()?;
                let inner = self.parse_sum()?;
                self.expect(TokenKind::CloseParen)?;
                Ok(inner)
            }
            TokenKind::Eof => Err(RootError::parse(
                self.current.column,
                "unexpected end of expression",
            )),
            _ => Err(RootError::parse(
                self.current.column,
                format!("unexpected token '{}'", self.current.text),
            )),
        }
    }

    fn parse_identifier(&mut self, tok: Token) -> Result<Expr> {
        if let Some(function) = Function::from_name(&tok.text) {
            self.expect(TokenKind::OpenParen)?;
            let arg = self.parse_sum()?;
            self.expect(TokenKind::CloseParen)?;
            return Ok(Expr::Call(function, Box::new(arg)));
        }

        if let Some(constant) = Constant::from_name(&tok.text) {
            return Ok(Expr::Constant(constant));
        }

        match tok.text.as_str() {
            "x" => Ok(Expr::Variable),
            _ => Err(RootError::parse(
                tok.column,
                format!("unknown identifier '{}'", tok.text),
            )),
        }
    }
}

fn parse_number(text: &str) -> Option<Decimal> {
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Expr> {
        Parser::new(Lexer::new(input))?.parse()
    }

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn eval(input: &str, x: &str) -> Decimal {
        parse(input).unwrap().eval(&d(x), 20).unwrap()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("1 + 2 * 3", "0"), d("7"));
        assert_eq!(eval("(1 + 2) * 3", "0"), d("9"));
        assert_eq!(eval("10 - 4 - 3", "0"), d("3"));
        assert_eq!(eval("12 / 3 / 2", "0"), d("2"));
    }

    #[test]
    fn test_power_binds_tighter_than_negation() {
        assert_eq!(eval("-x^2", "3"), d("-9"));
        assert_eq!(eval("2^3^2", "0"), d("512"));
        assert_eq!(eval("2^-1", "0"), d("0.5"));
    }

    #[test]
    fn test_functions_and_constants() {
        assert_eq!(eval("abs(x - 5)", "2"), d("3"));
        assert_eq!(eval("cos(0)", "0"), d("1"));
        assert_eq!(eval("pi", "0"), d("3.14159265358979323846"));
        assert_eq!(parse("e").unwrap(), Expr::Constant(Constant::E));
    }

    #[test]
    fn test_scientific_literal() {
        assert_eq!(eval("1.5e2 * x", "2"), d("300"));
        assert_eq!(eval("x * 1E-3", "5"), d("0.005"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse(""), Err(RootError::ParseError { .. })));
        assert!(matches!(parse("x +"), Err(RootError::ParseError { .. })));
        assert!(matches!(parse("(x"), Err(RootError::ParseError { .. })));
        assert!(matches!(parse("y + 1"), Err(RootError::ParseError { column: 1, .. })));
        assert!(matches!(parse("x x"), Err(RootError::ParseError { column: 3, .. })));
        assert!(matches!(parse("sin x"), Err(RootError::ParseError { .. })));
    }
}
