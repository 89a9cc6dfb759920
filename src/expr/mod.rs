//! Function expressions in one free variable.
//!
//! This is the evaluator the engines call for every f(x). An expression is
//! compiled once by [`Fx::parse`] and evaluated many times.
//!
//! # Grammar Overview
//!
//! ```text
//! sum      = product { ('+' | '-') product }
//! product  = unary { ('*' | '/') unary }
//! unary    = ('-' | '+') unary | power
//! power    = primary [ '^' unary ]
//! primary  = number | 'x' | constant | function '(' sum ')' | '(' sum ')'
//!
//! constant = "pi" | "e"
//! function = "exp" | "ln" | "log" | "log10" | "sqrt" | "abs" | "sin" | "cos" | "tan"
//! number   = digit+ ['.' digit*] [('e'|'E') ['-'|'+'] digit+]
//! ```
//!
//! # Example
//!
//! ```
//! use rootsolve_core::{Decimal, Fx, RoundingMode};
//!
//! let f = Fx::parse("x^2 - 2").unwrap();
//! let y = f.calculate(&Decimal::from(3), 4, RoundingMode::HalfEven).unwrap();
//! assert_eq!(y.to_string(), "7.0000");
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::{BinaryOp, Constant, Expr, Function};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;

use std::fmt;
use std::str::FromStr;

use crate::arith::functions::GUARD_DIGITS;
use crate::arith::{self, Decimal, RoundingMode};
use crate::error::{Result, RootError};

/// An immutable expression `f(x)`; its identity is its source text.
#[derive(Debug, Clone)]
pub struct Fx {
    source: String,
    ast: Expr,
}

impl Fx {
    /// Compile an expression.
    pub fn parse(source: &str) -> Result<Self> {
        let mut parser = Parser::new(Lexer::new(source))?;
        let ast = parser.parse()?;
        Ok(Self {
            source: source.trim().to_string(),
            ast,
        })
    }

    /// The expression as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Evaluate at `x` with at least `scale` correct fractional digits.
    ///
    /// The expression is worked out [`GUARD_DIGITS`] finer than `scale`, and
    /// the value is returned at that finer scale.
    pub fn evaluate(&self, x: &Decimal, scale: u32) -> Result<Decimal> {
        self.ast
            .eval(x, scale.saturating_add(GUARD_DIGITS))
            .map_err(|reason| RootError::Evaluation {
                expression: self.source.clone(),
                x: x.clone(),
                reason,
            })
    }

    /// Evaluate at `x` and round the result to `scale`.
    pub fn calculate(&self, x: &Decimal, scale: u32, rounding: RoundingMode) -> Result<Decimal> {
        Ok(arith::round(&self.evaluate(x, scale)?, scale, rounding))
    }
}

impl PartialEq for Fx {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Fx {}

impl FromStr for Fx {
    type Err = RootError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Fx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
