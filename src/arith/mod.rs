//! Arbitrary-precision arithmetic adapter.
//!
//! Every operation that can produce more fractional digits than wanted is
//! rounded explicitly to a caller-supplied scale with a caller-supplied
//! [`RoundingMode`]. Nothing here relies on the backend's implicit precision.
//!
//! Division refuses denominators that round to zero at the requested scale;
//! this is how "derivative vanished" and "f(xL) = f(xR)" surface from the
//! engines as [`RootError::DivisionByZero`].
//!
//! - [`decimal`] - the unbounded [`Decimal`] type itself
//! - [`functions`] - exp, ln, sqrt and trigonometry evaluated to a scale

pub mod decimal;
pub mod functions;

pub use decimal::{Decimal, ParseDecimalError};

use std::fmt;

use serde::Deserialize;

use crate::error::{Result, RootError};

/// Largest scale a run may ask for.
///
/// Values themselves are unbounded; this only keeps the cost of a single
/// transcendental evaluation reasonable.
pub const MAX_SCALE: u32 = 1000;

/// Rounding applied whenever digits have to be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum RoundingMode {
    /// Ties go to the neighbour with an even last digit
    #[default]
    HalfEven,
    /// Ties go away from zero
    HalfUp,
    /// Ties go toward zero
    HalfDown,
    /// Always away from zero
    Up,
    /// Always toward zero (truncation)
    Down,
    /// Toward positive infinity
    Ceiling,
    /// Toward negative infinity
    Floor,
}

impl RoundingMode {
    pub const fn name(self) -> &'static str {
        match self {
            RoundingMode::HalfEven => "half-even",
            RoundingMode::HalfUp => "half-up",
            RoundingMode::HalfDown => "half-down",
            RoundingMode::Up => "up",
            RoundingMode::Down => "down",
            RoundingMode::Ceiling => "ceiling",
            RoundingMode::Floor => "floor",
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Round `value` to exactly `scale` fractional digits.
///
/// The result always carries `scale` digits (trailing zeros included), so
/// its `Display` form is stable across runs: `round(1, 3, _)` prints `1.000`.
pub fn round(value: &Decimal, scale: u32, mode: RoundingMode) -> Decimal {
    value.round(scale, mode)
}

/// `a / b` rounded to `scale`.
///
/// Fails with [`RootError::DivisionByZero`] when `b` rounds to zero at
/// `scale`.
pub fn divide(a: &Decimal, b: &Decimal, scale: u32, mode: RoundingMode) -> Result<Decimal> {
    let quotient = if round(b, scale, mode).is_zero() {
        None
    } else {
        a.div_round(b, scale, mode)
    };
    quotient.ok_or_else(|| RootError::DivisionByZero {
        numerator: a.clone(),
        denominator: b.clone(),
        scale,
    })
}

/// `value * 100` rounded to `scale`.
pub fn to_percentage(value: &Decimal, scale: u32, mode: RoundingMode) -> Decimal {
    round(&(value * Decimal::from(100)), scale, mode)
}

/// Whether zero lies in `[min(a, b), max(a, b)]`.
pub(crate) fn zero_between(a: &Decimal, b: &Decimal) -> bool {
    let zero = Decimal::zero();
    a.min(b) <= &zero && &zero <= a.max(b)
}
