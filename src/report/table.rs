//! Comma-separated rendering of an iteration history.
//!
//! ```text
//! i, xL, xR, yL, yR, xNew, yNew, error
//! 1, 0.000000, 1.000000, -1.000000, 0.459698, 0.500000, -0.377583, N/A
//! 2, 0.500000, 1.000000, -0.377583, 0.459698, 0.750000, 0.018311, 33.333333%
//! ...
//! Terminated because the error reached 0%
//! ```

use std::fmt::{self, Write};

use super::{Iteration, IterationDetail, IterationResult};
use crate::arith::Decimal;
use crate::solver::Method;

/// Field separator.
pub const SEPARATOR: &str = ", ";

/// Placeholder for an absent error.
pub const NOT_AVAILABLE: &str = "N/A";

/// Column names for a method.
pub fn header(method: Method) -> &'static [&'static str] {
    match method {
        Method::Bisection | Method::FalsePosition => {
            &["i", "xL", "xR", "yL", "yR", "xNew", "yNew", "error"]
        }
        Method::FixedPoint => &["i", "xOld", "xNew", "error"],
        Method::NewtonRaphson => &["i", "xOld", "fxOld", "fPrimeXOld", "xNew", "error"],
        Method::Secant => &["i", "xA", "xB", "fxA", "fxB", "xNew", "error"],
    }
}

/// Render an error cell.
pub fn format_error(error: Option<&Decimal>) -> String {
    match error {
        Some(e) => format!("{}%", e),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Cells of one data row, index first.
pub fn row(iteration: &Iteration) -> Vec<String> {
    let mut cells = vec![iteration.index.to_string()];
    match &iteration.detail {
        IterationDetail::Bracket {
            x_l,
            x_r,
            y_l,
            y_r,
            y_new,
        } => {
            cells.extend([x_l, x_r, y_l, y_r, &iteration.x_new, y_new].map(Decimal::to_string));
        }
        IterationDetail::FixedPoint { x_old } => {
            cells.extend([x_old, &iteration.x_new].map(Decimal::to_string));
        }
        IterationDetail::NewtonRaphson {
            x_old,
            fx_old,
            dfx_old,
        } => {
            cells.extend([x_old, fx_old, dfx_old, &iteration.x_new].map(Decimal::to_string));
        }
        IterationDetail::Secant {
            x_a,
            x_b,
            fx_a,
            fx_b,
        } => {
            cells.extend([x_a, x_b, fx_a, fx_b, &iteration.x_new].map(Decimal::to_string));
        }
    }
    cells.push(format_error(iteration.error.as_ref()));
    cells
}

impl IterationResult {
    /// The full table: header, one row per iteration, termination message.
    pub fn to_table(&self) -> String {
        let mut out = String::new();
        out.push_str(&header(self.method()).join(SEPARATOR));
        out.push('\n');
        for iteration in self.iterations() {
            out.push_str(&row(iteration).join(SEPARATOR));
            out.push('\n');
        }
        out.push_str(self.termination().message());
        out
    }
}

impl fmt::Display for IterationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_table())?;
        f.write_char('\n')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Fx;
    use crate::solver::TerminationCause;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_secant_table() {
        let iterations = vec![
            Iteration {
                index: 1,
                x_new: d("0.6127"),
                error: None,
                detail: IterationDetail::Secant {
                    x_a: d("0.0000"),
                    x_b: d("1.0000"),
                    fx_a: d("1.0000"),
                    fx_b: d("-0.6321"),
                },
            },
            Iteration {
                index: 2,
                x_new: d("0.5638"),
                error: Some(d("8.6733")),
                detail: IterationDetail::Secant {
                    x_a: d("1.0000"),
                    x_b: d("0.6127"),
                    fx_a: d("-0.6321"),
                    fx_b: d("-0.0708"),
                },
            },
        ];
        let result = IterationResult::new(
            Method::Secant,
            Fx::parse("exp(-x) - x").unwrap(),
            None,
            iterations,
            TerminationCause::MaxIterationsReached,
        );

        let expected = "i, xA, xB, fxA, fxB, xNew, error\n\
                        1, 0.0000, 1.0000, 1.0000, -0.6321, 0.6127, N/A\n\
                        2, 1.0000, 0.6127, -0.6321, -0.0708, 0.5638, 8.6733%\n\
                        Terminated because the maximum number of iterations was reached";
        assert_eq!(result.to_table(), expected);
    }

    #[test]
    fn test_empty_table_has_header_and_message() {
        let result = IterationResult::new(
            Method::Bisection,
            Fx::parse("x").unwrap(),
            None,
            vec![],
            TerminationCause::MaxIterationsReached,
        );
        let table = result.to_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "i, xL, xR, yL, yR, xNew, yNew, error");
        assert_eq!(lines.len(), 2);
    }
}
