//! Starting-point search for the open methods.

use tracing::warn;

use crate::arith::Decimal;
use crate::config::RunConfig;
use crate::error::{Result, RootError};
use crate::expr::Fx;

/// Find an x near `start` where `fx` is defined.
///
/// Tries `start` first; whenever evaluation fails the candidate is perturbed,
/// positive candidates are negated and the rest become `-x + 1`, so a start of
/// 0 visits 0, 1, -1, 2, -2, ... This only promises a point where the
/// function evaluates, not one from which a method converges.
///
/// Only evaluation failures are retried. Gives up with
/// [`RootError::NoValidInitialGuess`] after `config.max_guess_attempts`
/// candidates.
pub fn guess_initial_x(fx: &Fx, start: Decimal, config: &RunConfig) -> Result<Decimal> {
    let mut guess = start;
    for attempt in 1..=config.max_guess_attempts {
        match fx.calculate(&guess, config.calculation_scale, config.rounding) {
            Ok(_) => return Ok(guess),
            Err(err) if err.is_evaluation_failure() => {
                let next = if guess.is_positive() {
                    -&guess
                } else {
                    Decimal::one() - &guess
                };
                warn!(expression = %fx, attempt, from = %guess, to = %next, "initial guess undefined, perturbing");
                if attempt == config.max_guess_attempts {
                    break;
                }
                guess = next;
            }
            Err(err) => return Err(err),
        }
    }

    Err(RootError::NoValidInitialGuess {
        expression: fx.to_string(),
        attempts: config.max_guess_attempts,
        last_guess: guess,
    })
}

/// Second secant seed: one unit from `x_a`, on the side of `x_a`'s sign.
pub(crate) fn guess_second_x(fx: &Fx, x_a: &Decimal, config: &RunConfig) -> Result<Decimal> {
    let start = if x_a.is_negative() {
        x_a - Decimal::one()
    } else {
        x_a + Decimal::one()
    };
    guess_initial_x(fx, start, config)
}
