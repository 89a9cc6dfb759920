//! Iterative root-finding engines.
//!
//! Two engines share one loop skeleton ([`runner`]):
//!
//! - Bracketing ([`bisection`], [`false_position`]) keeps an interval
//!   `[xL, xR]` whose endpoint values straddle zero and shrinks it.
//! - Open ([`fixed_point`], [`newton_raphson`], [`secant`]) keeps one or
//!   two points and steps without a bracket.
//!
//! Each pass evaluates the expression, applies the method formula at the
//! calculation scale, computes the percentage error against the previous
//! approximation ([`compute_error`]) and records the pass at the output scale.
//! [`TerminationPolicy`] decides before every pass whether to stop.

mod bracketing;
mod guess;
pub(crate) mod metric;
mod open;
mod runner;
mod termination;

pub use bracketing::{bisection, false_position, find_interval, Bracket};
pub use guess::guess_initial_x;
pub use metric::compute_error;
pub use open::{fixed_point, newton_raphson, secant};
pub use termination::{TerminationCause, TerminationPolicy};

use std::fmt;

use serde::Deserialize;

/// The supported methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Method {
    Bisection,
    FalsePosition,
    FixedPoint,
    NewtonRaphson,
    Secant,
}

impl Method {
    /// All methods, in the order they are usually run.
    pub const ALL: [Method; 5] = [
        Method::Bisection,
        Method::FalsePosition,
        Method::FixedPoint,
        Method::NewtonRaphson,
        Method::Secant,
    ];

    /// Human-readable name used in summaries.
    pub const fn display_name(self) -> &'static str {
        match self {
            Method::Bisection => "Bisection",
            Method::FalsePosition => "False Position",
            Method::FixedPoint => "Fixed Point",
            Method::NewtonRaphson => "Newton Raphson",
            Method::Secant => "Secant",
        }
    }

    /// Stem of the result file written for this method.
    pub const fn file_name(self) -> &'static str {
        match self {
            Method::Bisection => "bisection",
            Method::FalsePosition => "false_position",
            Method::FixedPoint => "fixed_point",
            Method::NewtonRaphson => "newton_raphson",
            Method::Secant => "secant",
        }
    }

    /// Whether the method keeps a bracket.
    pub const fn is_bracketing(self) -> bool {
        matches!(self, Method::Bisection | Method::FalsePosition)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
