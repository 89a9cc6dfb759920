//! Bracketing engine: bisection and false position.

use tracing::{debug, info, warn};

use super::runner::{iterate, Step};
use super::Method;
use crate::arith::{self, zero_between, Decimal};
use crate::config::RunConfig;
use crate::error::{Result, RootError};
use crate::expr::Fx;
use crate::report::{IterationDetail, IterationResult};

/// A closed interval expected to contain a sign change of f.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bracket {
    pub x_l: Decimal,
    pub x_r: Decimal,
}

impl Bracket {
    pub fn new(x_l: Decimal, x_r: Decimal) -> Self {
        Self { x_l, x_r }
    }

    /// Width `|xR - xL|`.
    pub fn width(&self) -> Decimal {
        (&self.x_r - &self.x_l).abs()
    }
}

impl From<(Decimal, Decimal)> for Bracket {
    fn from((x_l, x_r): (Decimal, Decimal)) -> Self {
        Self::new(x_l, x_r)
    }
}

/// How a bracketing method picks the next candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Formula {
    /// `(xL + xR) / 2`
    Midpoint,
    /// `xL + (xR - xL) * yL / (yL - yR)`
    FalsePosition,
}

impl Formula {
    fn next_x(
        self,
        x_l: &Decimal,
        x_r: &Decimal,
        y_l: &Decimal,
        y_r: &Decimal,
        config: &RunConfig,
    ) -> Result<Decimal> {
        let scale = config.calculation_scale;
        let rounding = config.rounding;
        match self {
            Formula::Midpoint => arith::divide(&(x_l + x_r), &Decimal::from(2), scale, rounding),
            Formula::FalsePosition => {
                let ratio = arith::divide(y_l, &(y_l - y_r), scale, rounding)?;
                let step = (x_r - x_l) * ratio;
                Ok(arith::round(&(x_l + &step), scale, rounding))
            }
        }
    }
}

/// Approximate a root of `fx` with the bisection method.
///
/// When `bracket` is `None` one is found with [`find_interval`].
///
/// # Errors
///
/// - [`RootError::NoZeroInBracket`] if any pass starts with f(xL) and f(xR)
///   on the same side of zero
/// - evaluation failures of `fx`, and configuration errors
pub fn bisection(fx: &Fx, bracket: Option<Bracket>, config: &RunConfig) -> Result<IterationResult> {
    run_bracketing(Method::Bisection, Formula::Midpoint, fx, bracket, config)
}

/// Approximate a root of `fx` with the false-position (regula falsi) method.
///
/// Same contract as [`bisection`]; additionally fails with
/// [`RootError::DivisionByZero`] when f(xL) - f(xR) rounds to zero.
pub fn false_position(
    fx: &Fx,
    bracket: Option<Bracket>,
    config: &RunConfig,
) -> Result<IterationResult> {
    run_bracketing(Method::FalsePosition, Formula::FalsePosition, fx, bracket, config)
}

fn run_bracketing(
    method: Method,
    formula: Formula,
    fx: &Fx,
    bracket: Option<Bracket>,
    config: &RunConfig,
) -> Result<IterationResult> {
    config.validate()?;

    let mut bracket = match bracket {
        Some(b) => b,
        None => find_interval(fx, config)?,
    };

    let scale = config.calculation_scale;
    let out = config.output_scale;
    let rounding = config.rounding;
    let to_out = |v: &Decimal| arith::round(v, out, rounding);

    let (iterations, termination) = iterate(method, config, || {
        let y_l = fx.calculate(&bracket.x_l, scale, rounding)?;
        let y_r = fx.calculate(&bracket.x_r, scale, rounding)?;

        if !zero_between(&y_l, &y_r) {
            return Err(RootError::NoZeroInBracket {
                x_l: bracket.x_l.clone(),
                x_r: bracket.x_r.clone(),
                y_l,
                y_r,
            });
        }

        let x_new = formula.next_x(&bracket.x_l, &bracket.x_r, &y_l, &y_r, config)?;
        let y_new = fx.calculate(&x_new, scale, rounding)?;

        let detail = IterationDetail::Bracket {
            x_l: to_out(&bracket.x_l),
            x_r: to_out(&bracket.x_r),
            y_l: to_out(&y_l),
            y_r: to_out(&y_r),
            y_new: to_out(&y_new),
        };

        // Keep the half whose endpoint values still straddle zero
        if zero_between(&y_l, &y_new) {
            bracket.x_r = x_new.clone();
        } else {
            bracket.x_l = x_new.clone();
        }

        Ok(Step { x_new, detail })
    })?;

    Ok(IterationResult::new(
        method,
        fx.clone(),
        None,
        iterations,
        termination,
    ))
}

/// Scan integers outward from zero for a unit interval with a sign change.
///
/// If f(0) >= 0 the scan walks left until f turns negative, otherwise it
/// walks right until f turns non-negative, so the returned bracket always
/// has f(xL) < 0 <= f(xR).
///
/// This is a weak heuristic: a function that never changes sign on the
/// walked side (or changes sign between integers twice) is not found. The
/// scan stops with [`RootError::IntervalNotFound`] after
/// `config.max_scan_steps` steps.
pub fn find_interval(fx: &Fx, config: &RunConfig) -> Result<Bracket> {
    let scale = config.calculation_scale;
    let rounding = config.rounding;

    let zero = Decimal::zero();
    let y0 = fx.calculate(&zero, scale, rounding)?;
    let walk_left = y0 >= zero;
    let step = if walk_left {
        Decimal::from(-1)
    } else {
        Decimal::one()
    };

    let mut x = zero.clone();
    for _ in 0..config.max_scan_steps {
        let next = &x + &step;
        let y = fx.calculate(&next, scale, rounding)?;
        debug!(expression = %fx, x = %next, y = %y, "bracket scan");

        let found = match (walk_left, y < zero) {
            (true, true) => Some(Bracket::new(next.clone(), x.clone())),
            (false, false) => Some(Bracket::new(x.clone(), next.clone())),
            _ => None,
        };
        if let Some(bracket) = found {
            info!(expression = %fx, x_l = %bracket.x_l, x_r = %bracket.x_r, "bracket found by scan");
            return Ok(bracket);
        }
        x = next;
    }

    warn!(expression = %fx, steps = config.max_scan_steps, "bracket scan gave up");
    Err(RootError::IntervalNotFound {
        expression: fx.to_string(),
        steps: config.max_scan_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::TerminationCause;

    fn fx(s: &str) -> Fx {
        Fx::parse(s).unwrap()
    }

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn bracket(x_l: &str, x_r: &str) -> Option<Bracket> {
        Some(Bracket::new(d(x_l), d(x_r)))
    }

    #[test]
    fn test_find_interval_walks_right() {
        // f(0) = -1 < 0, f(1) > 0
        let b = find_interval(&fx("x * exp(x) - cos(x)"), &RunConfig::new()).unwrap();
        assert_eq!(b, Bracket::new(d("0"), d("1")));
    }

    #[test]
    fn test_find_interval_walks_left() {
        // f(0) = 3.5 >= 0, first negative value at -4
        let b = find_interval(&fx("x + 3.5"), &RunConfig::new()).unwrap();
        assert_eq!(b, Bracket::new(d("-4"), d("-3")));
    }

    #[test]
    fn test_find_interval_gives_up() {
        let cfg = RunConfig::new().with_max_scan_steps(20);
        let err = find_interval(&fx("x^2 + 1"), &cfg).unwrap_err();
        assert!(matches!(err, RootError::IntervalNotFound { steps: 20, .. }));
    }

    #[test]
    fn test_bisection_first_passes() {
        let cfg = RunConfig::new().with_max_iterations(3);
        let result = bisection(&fx("x^2 - 2"), bracket("1", "2"), &cfg).unwrap();
        let its = result.iterations();
        assert_eq!(its.len(), 3);
        assert_eq!(its[0].x_new, d("1.5"));
        assert_eq!(its[1].x_new, d("1.25"));
        assert_eq!(its[2].x_new, d("1.375"));
        assert_eq!(its[0].error, None);
        assert_eq!(its[1].error, Some(d("20")));
        assert_eq!(result.termination(), TerminationCause::MaxIterationsReached);
    }

    #[test]
    fn test_same_sign_bracket_fails_on_first_pass() {
        let err = bisection(&fx("x^2 - 2"), bracket("2", "3"), &RunConfig::new()).unwrap_err();
        match err {
            RootError::NoZeroInBracket { x_l, x_r, y_l, y_r } => {
                assert_eq!((x_l, x_r), (d("2"), d("3")));
                assert_eq!((y_l, y_r), (d("2"), d("7")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reversed_bracket_is_accepted() {
        let cfg = RunConfig::new().with_max_iterations(1);
        let result = bisection(&fx("x^2 - 2"), bracket("2", "1"), &cfg).unwrap();
        assert_eq!(result.root(), Some(d("1.5")));
    }

    #[test]
    fn test_endpoint_root_is_accepted() {
        let cfg = RunConfig::new().with_max_iterations(1);
        let result = bisection(&fx("x - 1"), bracket("1", "3"), &cfg).unwrap();
        assert_eq!(result.root(), Some(d("2")));
    }

    #[test]
    fn test_false_position_linear_function_lands_on_root() {
        // The chord of a line is the line itself, up to calculation-scale rounding
        let result = false_position(&fx("2 * x - 1"), bracket("0", "3"), &RunConfig::new()).unwrap();
        assert_eq!(result.iterations()[0].x_new, d("0.5"));
        assert_eq!(result.termination(), TerminationCause::ZeroErrorReached);
    }

    #[test]
    fn test_false_position_flat_bracket_fails() {
        // f(xL) = f(xR) = 0 passes the containment check but has no secant
        let err =
            false_position(&fx("x * (x - 1)"), bracket("0", "1"), &RunConfig::new()).unwrap_err();
        assert!(matches!(err, RootError::DivisionByZero { .. }));
    }

    #[test]
    fn test_bisection_beyond_machine_precision() {
        let cfg = RunConfig::new()
            .with_calculation_scale(50)
            .with_output_scale(40)
            .with_max_iterations(200);
        let result = bisection(&fx("x^2 - 2"), bracket("1", "2"), &cfg).unwrap();
        assert_eq!(result.termination(), TerminationCause::ZeroErrorReached);
        assert_eq!(
            result.root(),
            Some(d("1.4142135623730950488016887242096980785697"))
        );
    }
}
