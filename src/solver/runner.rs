//! Loop skeleton shared by every method.

use tracing::{debug, info};

use super::metric::compute_error;
use super::termination::{TerminationCause, TerminationPolicy};
use super::Method;
use crate::arith::{self, Decimal};
use crate::config::RunConfig;
use crate::error::Result;
use crate::report::table::format_error;
use crate::report::{Iteration, IterationDetail};

/// Output of one method step.
pub(crate) struct Step {
    /// New approximation at the calculation scale
    pub x_new: Decimal,
    /// Method-specific record fields at the output scale
    pub detail: IterationDetail,
}

/// Drive `step` until the termination policy stops the run.
///
/// `step` owns the method state (bracket, single point or point pair) and
/// advances it by one pass. The runner adds what every method shares: the
/// error against the previous approximation, the 1-based index and the
/// rounding of `x_new` to the output scale.
pub(crate) fn iterate<F>(
    method: Method,
    config: &RunConfig,
    mut step: F,
) -> Result<(Vec<Iteration>, TerminationCause)>
where
    F: FnMut() -> Result<Step>,
{
    let policy = TerminationPolicy::from_config(config);
    let mut iterations: Vec<Iteration> = Vec::new();
    let mut x_prev: Option<Decimal> = None;
    let mut error: Option<Decimal> = None;

    loop {
        if let Some(cause) = policy.check(iterations.len(), error.as_ref()) {
            info!(
                method = %method,
                iterations = iterations.len(),
                cause = ?cause,
                "run finished"
            );
            return Ok((iterations, cause));
        }

        let Step { x_new, detail } = step()?;
        error = compute_error(x_prev.as_ref(), &x_new, config.output_scale, config.rounding)?;

        let index = iterations.len() + 1;
        let x_out = arith::round(&x_new, config.output_scale, config.rounding);
        debug!(
            method = %method,
            index,
            x_new = %x_out,
            error = %format_error(error.as_ref()),
            "iteration"
        );

        iterations.push(Iteration {
            index,
            x_new: x_out,
            error: error.clone(),
            detail,
        });
        x_prev = Some(x_new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn constant_steps(values: Vec<Decimal>) -> impl FnMut() -> Result<Step> {
        let mut it = values.into_iter();
        move || {
            let x_new = it.next().unwrap_or_else(Decimal::one);
            Ok(Step {
                x_new,
                detail: IterationDetail::FixedPoint {
                    x_old: Decimal::zero(),
                },
            })
        }
    }

    #[test]
    fn test_indices_and_first_error() {
        let cfg = RunConfig::new().with_max_iterations(3);
        let (its, cause) =
            iterate(Method::FixedPoint, &cfg, constant_steps(vec![d("1"), d("2"), d("4")]))
                .unwrap();
        assert_eq!(cause, TerminationCause::MaxIterationsReached);
        assert_eq!(its.iter().map(|i| i.index).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(its[0].error, None);
        assert_eq!(its[1].error, Some(d("50")));
        assert_eq!(its[2].error, Some(d("50")));
    }

    #[test]
    fn test_repeated_value_stops_with_zero_error() {
        let cfg = RunConfig::new();
        let (its, cause) =
            iterate(Method::FixedPoint, &cfg, constant_steps(vec![d("3"), d("2"), d("2")]))
                .unwrap();
        assert_eq!(cause, TerminationCause::ZeroErrorReached);
        assert_eq!(its.len(), 3);
    }

    #[test]
    fn test_min_iterations_keeps_going() {
        let cfg = RunConfig::new().with_min_iterations(5);
        let (its, cause) = iterate(Method::FixedPoint, &cfg, constant_steps(vec![])).unwrap();
        assert_eq!(cause, TerminationCause::ZeroErrorReached);
        assert_eq!(its.len(), 5);
    }

    #[test]
    fn test_zero_cap_records_nothing() {
        let cfg = RunConfig::new().with_max_iterations(0);
        let (its, cause) = iterate(Method::FixedPoint, &cfg, || {
            panic!("step must not run when the cap is zero")
        })
        .unwrap();
        assert!(its.is_empty());
        assert_eq!(cause, TerminationCause::MaxIterationsReached);
    }
}
