//! Iteration histories returned by the engines.
//!
//! A run produces one [`IterationResult`]: the ordered [`Iteration`] records,
//! the expression(s) it ran on, the method, and the [`TerminationCause`].
//! Records are created at the output scale and never change afterwards.
//!
//! - [`table`] renders a result as the comma-separated table
//! - [`writer`] persists that table once a run has finished

pub mod table;
pub mod writer;

pub use writer::write_result;

use crate::arith::Decimal;
use crate::expr::Fx;
use crate::solver::{Method, TerminationCause};

/// Method-specific values of one pass, already at the output scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterationDetail {
    /// Bisection and false position
    Bracket {
        x_l: Decimal,
        x_r: Decimal,
        y_l: Decimal,
        y_r: Decimal,
        y_new: Decimal,
    },
    /// Fixed point
    FixedPoint { x_old: Decimal },
    /// Newton-Raphson
    NewtonRaphson {
        x_old: Decimal,
        fx_old: Decimal,
        dfx_old: Decimal,
    },
    /// Secant
    Secant {
        x_a: Decimal,
        x_b: Decimal,
        fx_a: Decimal,
        fx_b: Decimal,
    },
}

/// One pass of an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iteration {
    /// 1-based position in the history
    pub index: usize,
    /// New approximation at the output scale
    pub x_new: Decimal,
    /// Percentage error against the previous approximation; absent on the first pass
    pub error: Option<Decimal>,
    pub detail: IterationDetail,
}

/// Finalized history of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationResult {
    method: Method,
    expression: Fx,
    derivative: Option<Fx>,
    iterations: Vec<Iteration>,
    termination: TerminationCause,
}

impl IterationResult {
    pub(crate) fn new(
        method: Method,
        expression: Fx,
        derivative: Option<Fx>,
        iterations: Vec<Iteration>,
        termination: TerminationCause,
    ) -> Self {
        Self {
            method,
            expression,
            derivative,
            iterations,
            termination,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// The expression the method ran on (`g(x)` for fixed point).
    pub fn expression(&self) -> &Fx {
        &self.expression
    }

    /// The derivative supplied to Newton-Raphson.
    pub fn derivative(&self) -> Option<&Fx> {
        self.derivative.as_ref()
    }

    pub fn iterations(&self) -> &[Iteration] {
        &self.iterations
    }

    pub fn termination(&self) -> TerminationCause {
        self.termination
    }

    /// Last approximation, or `None` when the run recorded no iterations.
    pub fn root(&self) -> Option<Decimal> {
        self.iterations.last().map(|it| it.x_new.clone())
    }

    /// Equation being solved, e.g. `x - cos(x) = 0` or `x = cos(x)`.
    pub fn equation(&self) -> String {
        match self.method {
            Method::FixedPoint => format!("x = {}", self.expression),
            _ => format!("{} = 0", self.expression),
        }
    }

    /// One-line console summary.
    pub fn summary(&self) -> String {
        match self.root() {
            Some(root) => format!(
                "{}: x ≈ {} for {}",
                self.method.display_name(),
                root,
                self.equation()
            ),
            None => format!(
                "{}: no iterations performed for {}",
                self.method.display_name(),
                self.equation()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn result(method: Method, iterations: Vec<Iteration>) -> IterationResult {
        IterationResult::new(
            method,
            Fx::parse("cos(x)").unwrap(),
            None,
            iterations,
            TerminationCause::MaxIterationsReached,
        )
    }

    #[test]
    fn test_equation_per_method() {
        assert_eq!(result(Method::FixedPoint, vec![]).equation(), "x = cos(x)");
        assert_eq!(result(Method::Secant, vec![]).equation(), "cos(x) = 0");
    }

    #[test]
    fn test_summary_uses_last_approximation() {
        let it = |index, x_new| Iteration {
            index,
            x_new,
            error: None,
            detail: IterationDetail::FixedPoint { x_old: d("0") },
        };
        let r = result(Method::FixedPoint, vec![it(1, d("1.000000")), it(2, d("0.540302"))]);
        assert_eq!(r.root(), Some(d("0.540302")));
        assert_eq!(r.summary(), "Fixed Point: x ≈ 0.540302 for x = cos(x)");
    }

    #[test]
    fn test_empty_history_has_no_root() {
        let r = result(Method::Bisection, vec![]);
        assert_eq!(r.root(), None);
        assert!(r.summary().contains("no iterations"));
    }
}
