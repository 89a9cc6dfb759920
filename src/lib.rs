//! # Rootsolve Core
//!
//! Arbitrary-precision root finding for single-variable functions.
//!
//! This library provides:
//! - A small expression language for `f(x)` (and `g(x)`, `f'(x)`)
//! - Bracketing methods: bisection and false position
//! - Open methods: fixed point, Newton-Raphson and secant
//! - Decimal arithmetic with an explicit calculation scale, output scale and
//!   rounding mode, so every run is reproducible digit for digit
//! - A per-iteration table for every run, written as comma-separated text
//!
//! ## Architecture
//!
//! - [`expr`] - Parser and evaluator for function expressions
//! - [`arith`] - Unbounded [`Decimal`], rounding, division and the elementary functions
//! - [`config`] - Run configuration shared by every method
//! - [`solver`] - The engines, error metric, termination policy and guess search
//! - [`report`] - Iteration records, table rendering and result files
//! - [`batch`] - TOML plans that run several methods in one go
//!
//! ## Usage
//!
//! ```
//! use rootsolve_core::{bisection, Bracket, Decimal, Fx, RunConfig};
//!
//! let f = Fx::parse("x^2 - 2").unwrap();
//! let bracket = Bracket::new(Decimal::from(1), Decimal::from(2));
//! let result = bisection(&f, Some(bracket), &RunConfig::new()).unwrap();
//!
//! assert_eq!(result.root().unwrap().to_string(), "1.414214");
//! ```
//!
//! ## Precision
//!
//! Values are unbounded in magnitude. Every intermediate value is rounded to
//! the calculation scale (64 digits by default) and every recorded value to
//! the output scale (6 digits by default). A run stops when the percentage error between two successive
//! approximations rounds to zero at the output scale, or when the iteration
//! cap is reached.

pub mod arith;
pub mod batch;
pub mod config;
pub mod error;
pub mod expr;
pub mod report;
pub mod solver;

// Re-export main types for convenience
pub use arith::{Decimal, RoundingMode};
pub use batch::BatchPlan;
pub use config::RunConfig;
pub use error::{Result, RootError};
pub use expr::Fx;
pub use report::{write_result, Iteration, IterationDetail, IterationResult};
pub use solver::{
    bisection, false_position, find_interval, fixed_point, guess_initial_x, newton_raphson,
    secant, Bracket, Method, TerminationCause,
};
