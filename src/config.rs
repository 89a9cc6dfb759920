//! Run configuration threaded through every engine call.

use serde::Deserialize;

use crate::arith::{RoundingMode, MAX_SCALE};
use crate::error::{Result, RootError};
use crate::solver::metric::ratio_scale;

/// Iterations that must complete before a zero error may stop a run.
pub const DEFAULT_MIN_ITERATIONS: usize = 0;

/// Upper bound on recorded iterations.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Fractional digits kept while iterating.
pub const DEFAULT_CALCULATION_SCALE: u32 = 64;

/// Fractional digits kept in records and used by the zero-error check.
pub const DEFAULT_OUTPUT_SCALE: u32 = 6;

/// Candidates tried by the initial-guess search before giving up.
pub const DEFAULT_MAX_GUESS_ATTEMPTS: usize = 64;

/// Integer steps the bracket scanner takes away from zero before giving up.
pub const DEFAULT_MAX_SCAN_STEPS: usize = 1000;

/// Configuration for a single method run.
///
/// Every field has a process-wide default; overrides apply only to the run
/// that receives this value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Iterations before the zero-error check is allowed to stop the run.
    pub min_iterations: usize,
    /// Hard cap on iterations; a run never records more than this.
    pub max_iterations: usize,
    /// Scale of every intermediate value.
    pub calculation_scale: u32,
    /// Scale of recorded values and of the error metric.
    pub output_scale: u32,
    /// Rounding applied whenever digits are discarded.
    pub rounding: RoundingMode,
    /// Bound on the initial-guess perturbation loop.
    pub max_guess_attempts: usize,
    /// Bound on the integer bracket scan.
    pub max_scan_steps: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            min_iterations: DEFAULT_MIN_ITERATIONS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            calculation_scale: DEFAULT_CALCULATION_SCALE,
            output_scale: DEFAULT_OUTPUT_SCALE,
            rounding: RoundingMode::default(),
            max_guess_attempts: DEFAULT_MAX_GUESS_ATTEMPTS,
            max_scan_steps: DEFAULT_MAX_SCAN_STEPS,
        }
    }
}

impl RunConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum number of iterations.
    pub fn with_min_iterations(mut self, min_iterations: usize) -> Self {
        self.min_iterations = min_iterations;
        self
    }

    /// Set the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the working scale.
    ///
    /// Higher scales reach zero error later but reproduce more digits of the
    /// true fixed point of the iteration.
    pub fn with_calculation_scale(mut self, scale: u32) -> Self {
        self.calculation_scale = scale;
        self
    }

    /// Set the output scale.
    pub fn with_output_scale(mut self, scale: u32) -> Self {
        self.output_scale = scale;
        self
    }

    /// Set the rounding mode.
    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    /// Set the bound on initial-guess attempts.
    pub fn with_max_guess_attempts(mut self, attempts: usize) -> Self {
        self.max_guess_attempts = attempts;
        self
    }

    /// Set the bound on bracket scan steps.
    pub fn with_max_scan_steps(mut self, steps: usize) -> Self {
        self.max_scan_steps = steps;
        self
    }

    /// Check the configuration before a run.
    pub fn validate(&self) -> Result<()> {
        if self.calculation_scale > MAX_SCALE {
            return Err(RootError::invalid_config(format!(
                "calculation scale {} exceeds the maximum of {}",
                self.calculation_scale, MAX_SCALE
            )));
        }
        if ratio_scale(self.output_scale)? > MAX_SCALE {
            return Err(RootError::invalid_config(format!(
                "output scale {} leaves no room for the error metric below the maximum of {}",
                self.output_scale, MAX_SCALE
            )));
        }
        if self.max_guess_attempts == 0 {
            return Err(RootError::invalid_config(
                "max guess attempts must be at least 1",
            ));
        }
        if self.max_scan_steps == 0 {
            return Err(RootError::invalid_config(
                "max scan steps must be at least 1",
            ));
        }
        Ok(())
    }
}
