//! Open engine: fixed point, Newton-Raphson and secant.
//!
//! None of these keep a bracket, so none of them is guaranteed to converge.
//! Divergence is not detected; a diverging run simply hits the iteration cap.

use super::guess::{guess_initial_x, guess_second_x};
use super::runner::{iterate, Step};
use super::Method;
use crate::arith::{self, Decimal};
use crate::config::RunConfig;
use crate::error::Result;
use crate::expr::Fx;
use crate::report::{IterationDetail, IterationResult};

/// Use the caller's starting point, or search one outward from zero.
fn starting_point(fx: &Fx, initial: Option<Decimal>, config: &RunConfig) -> Result<Decimal> {
    match initial {
        Some(x) => Ok(x),
        None => guess_initial_x(fx, Decimal::zero(), config),
    }
}

/// Fixed-point iteration `xNew = g(xOld)`.
///
/// `g` must already be the rearranged form `x = g(x)`, not `f(x) = 0`.
pub fn fixed_point(g: &Fx, initial: Option<Decimal>, config: &RunConfig) -> Result<IterationResult> {
    config.validate()?;

    let scale = config.calculation_scale;
    let rounding = config.rounding;
    let mut x = starting_point(g, initial, config)?;

    let (iterations, termination) = iterate(Method::FixedPoint, config, || {
        let x_new = g.calculate(&x, scale, rounding)?;
        let detail = IterationDetail::FixedPoint {
            x_old: arith::round(&x, config.output_scale, rounding),
        };
        x = x_new.clone();

        Ok(Step { x_new, detail })
    })?;

    Ok(IterationResult::new(
        Method::FixedPoint,
        g.clone(),
        None,
        iterations,
        termination,
    ))
}

/// Newton-Raphson iteration `xNew = xOld - f(xOld) / f'(xOld)`.
///
/// The derivative is supplied by the caller. A pass where `f'(xOld)` rounds
/// to zero at the calculation scale fails with
/// [`RootError::DivisionByZero`](crate::RootError::DivisionByZero).
pub fn newton_raphson(
    f: &Fx,
    df: &Fx,
    initial: Option<Decimal>,
    config: &RunConfig,
) -> Result<IterationResult> {
    config.validate()?;

    let scale = config.calculation_scale;
    let out = config.output_scale;
    let rounding = config.rounding;
    let mut x = starting_point(f, initial, config)?;

    let (iterations, termination) = iterate(Method::NewtonRaphson, config, || {
        let fx_old = f.calculate(&x, scale, rounding)?;
        let dfx_old = df.calculate(&x, scale, rounding)?;

        let ratio = arith::divide(&fx_old, &dfx_old, scale, rounding)?;
        let x_new = arith::round(&(&x - &ratio), scale, rounding);

        let detail = IterationDetail::NewtonRaphson {
            x_old: arith::round(&x, out, rounding),
            fx_old: arith::round(&fx_old, out, rounding),
            dfx_old: arith::round(&dfx_old, out, rounding),
        };
        x = x_new.clone();

        Ok(Step { x_new, detail })
    })?;

    Ok(IterationResult::new(
        Method::NewtonRaphson,
        f.clone(),
        Some(df.clone()),
        iterations,
        termination,
    ))
}

/// Secant iteration `xNew = xA - f(xA) * (xA - xB) / (f(xA) - f(xB))`.
///
/// After each pass the pair shifts: `xA <- xB`, `xB <- xNew`. A missing
/// `x_b` is searched one unit away from `x_a`. Fails with
/// [`RootError::DivisionByZero`](crate::RootError::DivisionByZero) when
/// `f(xA) - f(xB)` rounds to zero.
pub fn secant(
    f: &Fx,
    x_a: Option<Decimal>,
    x_b: Option<Decimal>,
    config: &RunConfig,
) -> Result<IterationResult> {
    config.validate()?;

    let scale = config.calculation_scale;
    let out = config.output_scale;
    let rounding = config.rounding;

    let mut a = starting_point(f, x_a, config)?;
    let mut b = match x_b {
        Some(b) => b,
        None => guess_second_x(f, &a, config)?,
    };

    let (iterations, termination) = iterate(Method::Secant, config, || {
        let fx_a = f.calculate(&a, scale, rounding)?;
        let fx_b = f.calculate(&b, scale, rounding)?;

        let slope_inv = arith::divide(&(&a - &b), &(&fx_a - &fx_b), scale, rounding)?;
        let x_new = arith::round(&(&a - &fx_a * &slope_inv), scale, rounding);

        let detail = IterationDetail::Secant {
            x_a: arith::round(&a, out, rounding),
            x_b: arith::round(&b, out, rounding),
            fx_a: arith::round(&fx_a, out, rounding),
            fx_b: arith::round(&fx_b, out, rounding),
        };
        a = std::mem::replace(&mut b, x_new.clone());

        Ok(Step { x_new, detail })
    })?;

    Ok(IterationResult::new(
        Method::Secant,
        f.clone(),
        None,
        iterations,
        termination,
    ))
}
