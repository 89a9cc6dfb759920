//! Batch plans: several runs described in one TOML file.
//!
//! ```toml
//! output_dir = "output"
//! timestamped = true
//!
//! [config]
//! max_iterations = 100
//! output_scale = 6
//! rounding = "half-even"
//!
//! [[run]]
//! method = "bisection"
//! expression = "x - cos(x)"
//! interval = ["0", "1"]
//!
//! [[run]]
//! method = "newton-raphson"
//! expression = "exp(-x) - x"
//! derivative = "-exp(-x) - 1"
//! initial = "0"
//! ```
//!
//! Every run shares `[config]`. Results land in `output_dir`, inside a
//! subfolder named after the start time when `timestamped` is set, one file
//! per method.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::arith::Decimal;
use crate::config::RunConfig;
use crate::error::{Result, RootError};
use crate::expr::Fx;
use crate::report::writer::{self, DEFAULT_OUTPUT_DIR};
use crate::report::IterationResult;
use crate::solver::{self, Bracket, Method};

/// One entry of a plan.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSpec {
    pub method: Method,
    /// `f(x)`, or `g(x)` for fixed point
    pub expression: String,
    /// `f'(x)`, required for Newton-Raphson
    pub derivative: Option<String>,
    /// Starting x for the open methods (`xA` for secant)
    pub initial: Option<Decimal>,
    /// `xB` for secant
    pub second: Option<Decimal>,
    /// `[xL, xR]` for the bracketing methods
    pub interval: Option<[Decimal; 2]>,
}

impl RunSpec {
    /// Run this entry with `config`.
    ///
    /// # Errors
    ///
    /// [`RootError::InvalidConfig`] when the entry sets a starting value its
    /// method never reads: `interval` on an open method, `initial` or
    /// `second` on a bracketing one, or `second` on anything but secant.
    pub fn run(&self, config: &RunConfig) -> Result<IterationResult> {
        self.check_inputs()?;

        let fx = Fx::parse(&self.expression)?;
        let bracket = self
            .interval
            .as_ref()
            .map(|[x_l, x_r]| Bracket::new(x_l.clone(), x_r.clone()));
        let initial = self.initial.clone();

        match self.method {
            Method::Bisection => solver::bisection(&fx, bracket, config),
            Method::FalsePosition => solver::false_position(&fx, bracket, config),
            Method::FixedPoint => solver::fixed_point(&fx, initial, config),
            Method::NewtonRaphson => {
                let source = self.derivative.as_deref().ok_or_else(|| {
                    RootError::MissingDerivative {
                        expression: self.expression.clone(),
                    }
                })?;
                let df = Fx::parse(source)?;
                solver::newton_raphson(&fx, &df, initial, config)
            }
            Method::Secant => solver::secant(&fx, initial, self.second.clone(), config),
        }
    }

    fn check_inputs(&self) -> Result<()> {
        let unused = if self.method.is_bracketing() {
            if self.initial.is_some() {
                Some("initial")
            } else if self.second.is_some() {
                Some("second")
            } else {
                None
            }
        } else if self.interval.is_some() {
            Some("interval")
        } else if self.second.is_some() && self.method != Method::Secant {
            Some("second")
        } else {
            None
        };

        match unused {
            Some(field) => Err(RootError::invalid_config(format!(
                "'{}' is not used by {}; bracketing methods are {}",
                field,
                self.method,
                bracketing_names(),
            ))),
            None => Ok(()),
        }
    }
}

fn bracketing_names() -> String {
    Method::ALL
        .iter()
        .filter(|m| m.is_bracketing())
        .map(|m| m.display_name())
        .collect::<Vec<_>>()
        .join(" and ")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_timestamped() -> bool {
    true
}

/// A parsed plan.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchPlan {
    /// Base directory for result files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Write into a per-invocation subfolder of `output_dir`
    #[serde(default = "default_timestamped")]
    pub timestamped: bool,

    /// Configuration shared by every run
    #[serde(default)]
    pub config: RunConfig,

    #[serde(default, rename = "run")]
    pub runs: Vec<RunSpec>,
}

impl BatchPlan {
    /// Load a plan from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RootError::PlanReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content, path)
    }

    /// Parse a plan from TOML text; `origin` only labels errors.
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self> {
        let plan: Self = toml::from_str(content).map_err(|e| RootError::PlanParseError {
            path: origin.display().to_string(),
            message: e.to_string(),
        })?;
        plan.config.validate()?;
        Ok(plan)
    }

    /// Directory this invocation writes into.
    pub fn target_dir(&self) -> PathBuf {
        if self.timestamped {
            writer::timestamped_dir(&self.output_dir)
        } else {
            self.output_dir.clone()
        }
    }

    /// Run every entry in order and write each result.
    ///
    /// Stops at the first failing entry; results written before it stay on
    /// disk.
    pub fn execute(&self) -> Result<Vec<(IterationResult, PathBuf)>> {
        let dir = self.target_dir();
        info!(runs = self.runs.len(), dir = %dir.display(), "executing batch plan");

        self.runs
            .iter()
            .map(|entry| {
                let result = entry.run(&self.config)?;
                let path = writer::write_result(&result, &dir)?;
                Ok((result, path))
            })
            .collect()
    }
}
