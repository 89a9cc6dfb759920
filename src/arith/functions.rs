//! Elementary functions on [`Decimal`], evaluated to a requested scale.
//!
//! Every function works on fixed-point integers (`value * 10^p`) carrying
//! [`GUARD_DIGITS`] more digits than asked for, sums its series until the next
//! term vanishes at that precision, and rounds the sum half-even to the
//! requested scale.
//!
//! Domain errors come back as a human-readable reason, which the expression
//! evaluator turns into an evaluation failure.

use num_bigint::{BigInt, Sign};
use num_traits::{Signed, ToPrimitive, Zero};

use super::decimal::{decimal_digits, pow10};
use super::{Decimal, RoundingMode};

/// Extra digits carried while summing a series.
pub const GUARD_DIGITS: u32 = 10;

/// Largest argument accepted by [`exp`]; `e^23000` has about ten thousand
/// integer digits. Below `-EXP_ARGUMENT_LIMIT` the result is zero at any
/// allowed scale.
pub const EXP_ARGUMENT_LIMIT: i64 = 23_000;

/// Largest mantissa, in digits, an integer power may build.
const MAX_POWER_DIGITS: u64 = 2_000_000;

/// Fixed-point arithmetic with `digits` fractional digits.
struct Fixed {
    digits: u32,
    one: BigInt,
}

impl Fixed {
    fn new(digits: u32) -> Self {
        Self {
            digits,
            one: pow10(digits),
        }
    }

    fn from_decimal(&self, x: &Decimal) -> BigInt {
        x.round(self.digits, RoundingMode::HalfEven).mantissa().clone()
    }

    fn to_decimal(&self, value: BigInt, scale: u32) -> Decimal {
        Decimal::new(value, self.digits).round(scale, RoundingMode::HalfEven)
    }

    fn mul(&self, a: &BigInt, b: &BigInt) -> BigInt {
        a * b / &self.one
    }

    /// `b` must not be zero.
    fn div(&self, a: &BigInt, b: &BigInt) -> BigInt {
        a * &self.one / b
    }

    /// `e^y` for `0 <= y < 1`.
    fn exp_series(&self, y: &BigInt) -> BigInt {
        let mut sum = self.one.clone();
        let mut term = self.one.clone();
        let mut n = 1u64;
        loop {
            term = self.mul(&term, y) / BigInt::from(n);
            if term.is_zero() {
                return sum;
            }
            sum += &term;
            n += 1;
        }
    }

    /// `atanh(z)` for `|z| <= 1/3`.
    fn atanh(&self, z: &BigInt) -> BigInt {
        let z2 = self.mul(z, z);
        let mut sum = z.clone();
        let mut power = z.clone();
        let mut n = 3u64;
        loop {
            power = self.mul(&power, &z2);
            let term = &power / BigInt::from(n);
            if term.is_zero() {
                return sum;
            }
            sum += term;
            n += 2;
        }
    }

    /// `atan(1 / q)` for an integer `q > 1`.
    fn atan_inverse(&self, q: u32) -> BigInt {
        let z = &self.one / BigInt::from(q);
        let z2 = self.mul(&z, &z);
        let mut sum = z.clone();
        let mut power = z;
        let mut n = 3u64;
        let mut subtract = true;
        loop {
            power = self.mul(&power, &z2);
            let term = &power / BigInt::from(n);
            if term.is_zero() {
                return sum;
            }
            if subtract {
                sum -= term;
            } else {
                sum += term;
            }
            subtract = !subtract;
            n += 2;
        }
    }

    /// Machin: `pi = 16 atan(1/5) - 4 atan(1/239)`.
    fn pi(&self) -> BigInt {
        self.atan_inverse(5) * BigInt::from(16) - self.atan_inverse(239) * BigInt::from(4)
    }

    /// `ln 2 = 2 atanh(1/3)`.
    fn ln2(&self) -> BigInt {
        self.atanh(&(&self.one / BigInt::from(3))) * BigInt::from(2)
    }

    /// `ln 10 = 3 ln 2 + ln(5/4)`, with `ln(5/4) = 2 atanh(1/9)`.
    fn ln10(&self) -> BigInt {
        self.ln2() * BigInt::from(3) + self.atanh(&(&self.one / BigInt::from(9))) * BigInt::from(2)
    }

    /// `ln x` for `x > 0`.
    fn ln(&self, x: &Decimal) -> BigInt {
        // x = m * 10^k with 0.1 <= m < 1
        let digits = decimal_digits(x.mantissa());
        let k = i64::from(digits) - i64::from(x.scale());
        let mut m = Decimal::new(x.mantissa().clone(), digits);

        // then 0.5 <= m < 1, so (m - 1) / (m + 1) lies in [-1/3, 0)
        let half = Decimal::new(5, 1);
        let mut doublings = 0u32;
        while m < half {
            m = &m + &m;
            doublings += 1;
        }

        let m = self.from_decimal(&m);
        let z = self.div(&(&m - &self.one), &(&m + &self.one));
        let ln_m = self.atanh(&z) * BigInt::from(2);

        ln_m - self.ln2() * BigInt::from(doublings) + self.ln10() * BigInt::from(k)
    }

    /// Reduce an angle to `[-pi, pi]`.
    fn reduce_angle(&self, x: &BigInt) -> BigInt {
        let pi = self.pi();
        let two_pi = &pi * BigInt::from(2);
        let turns = x / &two_pi;
        let mut r = x - turns * &two_pi;
        if r > pi {
            r -= &two_pi;
        } else if r < -&pi {
            r += &two_pi;
        }
        r
    }

    /// `(sin r, cos r)` for `|r| <= pi`.
    fn sin_cos(&self, r: &BigInt) -> (BigInt, BigInt) {
        let r2 = self.mul(r, r);

        let mut sin = r.clone();
        let mut term = r.clone();
        let mut n = 1u64;
        loop {
            term = -self.mul(&term, &r2) / BigInt::from((2 * n) * (2 * n + 1));
            if term.is_zero() {
                break;
            }
            sin += &term;
            n += 1;
        }

        let mut cos = self.one.clone();
        let mut term = self.one.clone();
        let mut n = 1u64;
        loop {
            term = -self.mul(&term, &r2) / BigInt::from((2 * n - 1) * (2 * n));
            if term.is_zero() {
                break;
            }
            cos += &term;
            n += 1;
        }

        (sin, cos)
    }

    /// `(sin x, cos x)` for any `x` held at this precision.
    fn sin_cos_of(&self, x: &Decimal) -> (BigInt, BigInt) {
        self.sin_cos(&self.reduce_angle(&self.from_decimal(x)))
    }
}

/// Upper bound on the integer digits of `e^x`; zero when `x <= 0`.
fn exp_integer_digits(x: &Decimal) -> u32 {
    if !x.is_positive() {
        return 0;
    }
    let ceiling = x
        .round(0, RoundingMode::Ceiling)
        .to_integer()
        .and_then(|n| n.to_u64())
        .unwrap_or(EXP_ARGUMENT_LIMIT as u64);
    // log10(e) < 0.4343
    u32::try_from(ceiling * 4343 / 10_000 + 1).unwrap_or(u32::MAX)
}

/// Extra digits needed so that `k * ln 10` keeps full precision.
fn exponent_digits(x: &Decimal) -> u32 {
    let k = i64::from(decimal_digits(x.mantissa())) - i64::from(x.scale());
    decimal_digits(&BigInt::from(k)) + 1
}

/// `pi` to `scale` digits.
pub fn pi(scale: u32) -> Decimal {
    let fixed = Fixed::new(scale + GUARD_DIGITS);
    fixed.to_decimal(fixed.pi(), scale)
}

/// `e^x` to `scale` digits.
pub fn exp(x: &Decimal, scale: u32) -> Result<Decimal, String> {
    if x.is_zero() {
        return Ok(Decimal::one().round(scale, RoundingMode::HalfEven));
    }
    if x > &Decimal::from(EXP_ARGUMENT_LIMIT) {
        return Err(format!("exp({x}) is out of range"));
    }
    if x.is_negative() {
        if x < &Decimal::from(-EXP_ARGUMENT_LIMIT) {
            return Ok(Decimal::zero().round(scale, RoundingMode::HalfEven));
        }
        // e^x = 1 / e^|x|; the reciprocal of a value >= 1 loses no absolute precision
        let positive = exp(&x.abs(), scale + GUARD_DIGITS)?;
        return Decimal::one()
            .div_round(&positive, scale, RoundingMode::HalfEven)
            .ok_or_else(|| format!("exp({x}) is out of range"));
    }

    // Halve until below one so the series converges quickly, then square back
    let mut y = x.clone();
    let mut halvings = 0u32;
    while y >= Decimal::one() {
        y = y.half();
        halvings += 1;
    }

    let fixed = Fixed::new(scale + GUARD_DIGITS + exp_integer_digits(x) + halvings);
    let mut value = fixed.exp_series(&fixed.from_decimal(&y));
    for _ in 0..halvings {
        value = fixed.mul(&value, &value);
    }
    Ok(fixed.to_decimal(value, scale))
}

/// Natural logarithm to `scale` digits.
pub fn ln(x: &Decimal, scale: u32) -> Result<Decimal, String> {
    if !x.is_positive() {
        return Err(format!("ln({x}) is undefined"));
    }
    let fixed = Fixed::new(scale + GUARD_DIGITS + exponent_digits(x));
    Ok(fixed.to_decimal(fixed.ln(x), scale))
}

/// Base-10 logarithm to `scale` digits.
pub fn log10(x: &Decimal, scale: u32) -> Result<Decimal, String> {
    if !x.is_positive() {
        return Err(format!("log10({x}) is undefined"));
    }
    let fixed = Fixed::new(scale + GUARD_DIGITS + exponent_digits(x));
    let value = fixed.div(&fixed.ln(x), &fixed.ln10());
    Ok(fixed.to_decimal(value, scale))
}

/// Square root to `scale` digits.
pub fn sqrt(x: &Decimal, scale: u32) -> Result<Decimal, String> {
    if x.is_negative() {
        return Err(format!("sqrt({x}) is undefined"));
    }
    let digits = scale + GUARD_DIGITS;
    // floor(sqrt(x * 10^(2 * digits))) = sqrt(x) * 10^digits
    let radicand = x.round(2 * digits, RoundingMode::Down);
    let root = radicand.mantissa().sqrt();
    Ok(Decimal::new(root, digits).round(scale, RoundingMode::HalfEven))
}

/// Sine to `scale` digits.
pub fn sin(x: &Decimal, scale: u32) -> Decimal {
    let fixed = Fixed::new(scale + GUARD_DIGITS + x.integer_digits());
    let (sin, _) = fixed.sin_cos_of(x);
    fixed.to_decimal(sin, scale)
}

/// Cosine to `scale` digits.
pub fn cos(x: &Decimal, scale: u32) -> Decimal {
    let fixed = Fixed::new(scale + GUARD_DIGITS + x.integer_digits());
    let (_, cos) = fixed.sin_cos_of(x);
    fixed.to_decimal(cos, scale)
}

/// Tangent to `scale` digits; undefined where the cosine vanishes at the
/// working precision.
pub fn tan(x: &Decimal, scale: u32) -> Result<Decimal, String> {
    let fixed = Fixed::new(scale + GUARD_DIGITS + x.integer_digits());
    let (sin, cos) = fixed.sin_cos_of(x);
    if cos.is_zero() {
        return Err(format!("tan({x}) is undefined"));
    }
    Ok(fixed.to_decimal(fixed.div(&sin, &cos), scale))
}

/// `base ^ exponent` to `scale` digits.
///
/// Integer exponents are exact for any base (a negative exponent takes the
/// reciprocal); other exponents need a positive base and go through
/// `exp(exponent * ln(base))`.
pub fn pow(base: &Decimal, exponent: &Decimal, scale: u32) -> Result<Decimal, String> {
    let undefined = || format!("{base} ^ {exponent} is undefined");
    let out_of_range = || format!("{base} ^ {exponent} is out of range");

    if let Some(n) = exponent.to_integer() {
        if base.is_zero() {
            return match n.sign() {
                Sign::Minus => Err(undefined()),
                Sign::NoSign => Ok(Decimal::one().round(scale, RoundingMode::HalfEven)),
                Sign::Plus => Ok(Decimal::zero().round(scale, RoundingMode::HalfEven)),
            };
        }

        let n_abs = n.abs().to_u32().ok_or_else(out_of_range)?;
        let digits = u64::from(decimal_digits(base.mantissa())) * u64::from(n_abs);
        if digits > MAX_POWER_DIGITS {
            return Err(out_of_range());
        }
        let power_scale = base.scale().checked_mul(n_abs).ok_or_else(out_of_range)?;
        let power = Decimal::new(base.mantissa().pow(n_abs), power_scale);

        return if n.is_negative() {
            Decimal::one()
                .div_round(&power, scale, RoundingMode::HalfEven)
                .ok_or_else(undefined)
        } else {
            Ok(power.round(scale, RoundingMode::HalfEven))
        };
    }

    if base.is_negative() {
        return Err(undefined());
    }
    if base.is_zero() {
        return if exponent.is_positive() {
            Ok(Decimal::zero().round(scale, RoundingMode::HalfEven))
        } else {
            Err(undefined())
        };
    }

    // A rough pass sizes the precision the exact one needs
    let rough = exponent * ln(base, GUARD_DIGITS)?;
    if rough > Decimal::from(EXP_ARGUMENT_LIMIT) {
        return Err(out_of_range());
    }
    let ln_scale =
        scale + GUARD_DIGITS + exp_integer_digits(&rough) + exponent.integer_digits();
    let power = exponent * ln(base, ln_scale)?;
    exp(&power, scale)
}
