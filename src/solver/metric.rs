//! Absolute relative approximate error.

use crate::arith::{self, Decimal, RoundingMode};
use crate::error::{Result, RootError};

/// Digits a ratio gains when expressed as a percentage.
const PERCENT_DIGITS: u32 = 2;

/// Scale the ratio is divided at so that its percentage lands on `scale`.
pub(crate) fn ratio_scale(scale: u32) -> Result<u32> {
    scale.checked_add(PERCENT_DIGITS).ok_or_else(|| {
        RootError::invalid_config(format!("output scale {} is too large", scale))
    })
}

/// `|(x_old - x_new) / x_new| * 100`, rounded to `scale`.
///
/// Returns `None` when there is no previous approximation. The ratio is
/// divided at `scale + 2` so the percentage lands on `scale` exactly; a
/// `x_new` that rounds to zero there fails with
/// [`RootError::DivisionByZero`](crate::RootError::DivisionByZero).
pub fn compute_error(
    x_old: Option<&Decimal>,
    x_new: &Decimal,
    scale: u32,
    rounding: RoundingMode,
) -> Result<Option<Decimal>> {
    let Some(x_old) = x_old else {
        return Ok(None);
    };

    let ratio = arith::divide(&(x_old - x_new), x_new, ratio_scale(scale)?, rounding)?.abs();
    Ok(Some(arith::to_percentage(&ratio, scale, rounding)))
}
