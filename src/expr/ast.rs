//! Abstract syntax tree for function expressions and its evaluation.

use crate::arith::{functions, Decimal, RoundingMode};

/// A parsed expression in the single free variable `x`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal
    Number(Decimal),
    /// `pi` or `e`, expanded to the working scale on evaluation
    Constant(Constant),
    /// The free variable `x`
    Variable,
    /// Prefix negation
    Negate(Box<Expr>),
    /// Infix operator
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// Single-argument function call
    Call(Function, Box<Expr>),
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Named constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pi" => Some(Constant::Pi),
            "e" => Some(Constant::E),
            _ => None,
        }
    }

    fn value(self, scale: u32) -> Result<Decimal, String> {
        match self {
            Constant::Pi => Ok(functions::pi(scale)),
            Constant::E => functions::exp(&Decimal::one(), scale),
        }
    }
}

/// Built-in functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Exp,
    /// Natural logarithm (`ln` or `log`)
    Ln,
    Log10,
    Sqrt,
    Abs,
    Sin,
    Cos,
    Tan,
}

impl Function {
    /// Look up a function by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "exp" => Some(Function::Exp),
            "ln" | "log" => Some(Function::Ln),
            "log10" => Some(Function::Log10),
            "sqrt" => Some(Function::Sqrt),
            "abs" => Some(Function::Abs),
            "sin" => Some(Function::Sin),
            "cos" => Some(Function::Cos),
            "tan" => Some(Function::Tan),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Exp => "exp",
            Function::Ln => "ln",
            Function::Log10 => "log10",
            Function::Sqrt => "sqrt",
            Function::Abs => "abs",
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
        }
    }

    fn apply(self, arg: &Decimal, scale: u32) -> Result<Decimal, String> {
        match self {
            Function::Exp => functions::exp(arg, scale),
            Function::Ln => functions::ln(arg, scale),
            Function::Log10 => functions::log10(arg, scale),
            Function::Sqrt => functions::sqrt(arg, scale),
            Function::Abs => Ok(arg.abs()),
            Function::Sin => Ok(functions::sin(arg, scale)),
            Function::Cos => Ok(functions::cos(arg, scale)),
            Function::Tan => functions::tan(arg, scale),
        }
    }
}

impl Expr {
    /// Evaluate at `x`, carrying `scale` fractional digits.
    ///
    /// Sums and differences are exact; products, quotients, powers, constants
    /// and function values are rounded half-even to `scale`. The error string
    /// describes why the expression is undefined there (division by zero, a
    /// logarithm of a non-positive value, an argument out of range).
    pub fn eval(&self, x: &Decimal, scale: u32) -> Result<Decimal, String> {
        match self {
            Expr::Number(value) => Ok(value.clone()),
            Expr::Constant(constant) => constant.value(scale),
            Expr::Variable => Ok(x.clone()),
            Expr::Negate(inner) => Ok(-inner.eval(x, scale)?),
            Expr::Call(function, arg) => function.apply(&arg.eval(x, scale)?, scale),
            Expr::Binary(op, lhs, rhs) => {
                let a = lhs.eval(x, scale)?;
                let b = rhs.eval(x, scale)?;
                match op {
                    BinaryOp::Add => Ok(a + b),
                    BinaryOp::Sub => Ok(a - b),
                    BinaryOp::Mul => Ok((a * b).round(scale, RoundingMode::HalfEven)),
                    BinaryOp::Div => a
                        .div_round(&b, scale, RoundingMode::HalfEven)
                        .ok_or_else(|| format!("division by zero in {} / {}", a, b)),
                    BinaryOp::Pow => functions::pow(&a, &b, scale),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn bin(op: BinaryOp, a: Expr, b: Expr) -> Expr {
        Expr::Binary(op, Box::new(a), Box::new(b))
    }

    #[test]
    fn test_eval_arithmetic() {
        // 2 * x + 1
        let e = bin(
            BinaryOp::Add,
            bin(BinaryOp::Mul, Expr::Number(d("2")), Expr::Variable),
            Expr::Number(d("1")),
        );
        assert_eq!(e.eval(&d("3"), 10).unwrap(), d("7"));
    }

    #[test]
    fn test_eval_division_by_zero() {
        let e = bin(BinaryOp::Div, Expr::Number(d("1")), Expr::Variable);
        assert!(e.eval(&Decimal::zero(), 10).is_err());
        assert_eq!(e.eval(&d("4"), 10).unwrap(), d("0.25"));
    }

    #[test]
    fn test_division_carries_the_requested_scale() {
        let e = bin(BinaryOp::Div, Expr::Number(d("2")), Expr::Number(d("3")));
        let value = e.eval(&Decimal::zero(), 30).unwrap();
        assert_eq!(value.scale(), 30);
        assert_eq!(value.to_string(), format!("0.{}7", "6".repeat(29)));
    }

    #[test]
    fn test_constants_follow_the_scale() {
        let pi = Expr::Constant(Constant::Pi).eval(&Decimal::zero(), 40).unwrap();
        assert_eq!(pi.to_string(), "3.1415926535897932384626433832795028841972");
        let e = Expr::Constant(Constant::E).eval(&Decimal::zero(), 5).unwrap();
        assert_eq!(e, d("2.71828"));
    }

    #[test]
    fn test_products_do_not_overflow() {
        // (2^64)^2 is past any fixed-width decimal
        let e = bin(BinaryOp::Mul, Expr::Variable, Expr::Variable);
        let value = e.eval(&d("18446744073709551616"), 10).unwrap();
        assert_eq!(value, d("340282366920938463463374607431768211456"));
    }

    #[test]
    fn test_function_domains() {
        assert!(Function::Ln.apply(&d("0"), 10).is_err());
        assert!(Function::Ln.apply(&d("-1"), 10).is_err());
        assert!(Function::Ln.apply(&d("1"), 10).unwrap().is_zero());
        assert!(Function::Sqrt.apply(&d("-4"), 10).is_err());
        assert_eq!(Function::Abs.apply(&d("-4.5"), 10).unwrap(), d("4.5"));
    }
}
