//! When a run stops.

use std::fmt;

use crate::arith::{self, Decimal, RoundingMode};
use crate::config::RunConfig;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationCause {
    /// The iteration cap was reached
    MaxIterationsReached,
    /// Two successive approximations agreed to the output scale
    ZeroErrorReached,
}

impl TerminationCause {
    /// Message appended to result tables and printed after a run.
    pub const fn message(self) -> &'static str {
        match self {
            TerminationCause::MaxIterationsReached => {
                "Terminated because the maximum number of iterations was reached"
            }
            TerminationCause::ZeroErrorReached => "Terminated because the error reached 0%",
        }
    }
}

impl fmt::Display for TerminationCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Checks evaluated, in order, before every pass:
///
/// 1. `completed >= min_iterations` and the latest error is present and
///    rounds to zero at the output scale: [`TerminationCause::ZeroErrorReached`]
/// 2. `completed >= max_iterations`: [`TerminationCause::MaxIterationsReached`]
///
/// An absent error (first pass) never counts as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminationPolicy {
    pub min_iterations: usize,
    pub max_iterations: usize,
    pub output_scale: u32,
    pub rounding: RoundingMode,
}

impl TerminationPolicy {
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            min_iterations: config.min_iterations,
            max_iterations: config.max_iterations,
            output_scale: config.output_scale,
            rounding: config.rounding,
        }
    }

    /// `None` means keep iterating.
    pub fn check(&self, completed: usize, error: Option<&Decimal>) -> Option<TerminationCause> {
        let zero_error = error
            .map(|e| arith::round(e, self.output_scale, self.rounding).is_zero())
            .unwrap_or(false);

        if completed >= self.min_iterations && zero_error {
            Some(TerminationCause::ZeroErrorReached)
        } else if completed >= self.max_iterations {
            Some(TerminationCause::MaxIterationsReached)
        } else {
            None
        }
    }
}
