//! Exact decimal numbers of unbounded size.
//!
//! A [`Decimal`] is an integer mantissa together with a scale, the number of
//! digits after the decimal point: `Decimal::new(12345, 3)` is `12.345`.
//! Addition, subtraction, multiplication and negation are exact. Digits are
//! only ever dropped by [`Decimal::round`] and [`Decimal::div_round`], which
//! take the target scale and the [`RoundingMode`] explicitly.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use thiserror::Error;

use super::RoundingMode;

/// Largest exponent accepted in scientific literals such as `1e-30`.
const MAX_LITERAL_EXPONENT: i64 = 100_000;

/// `10^n`.
pub(crate) fn pow10(n: u32) -> BigInt {
    BigInt::from(10u32).pow(n)
}

/// Number of decimal digits of `|n|`; zero has one digit.
pub(crate) fn decimal_digits(n: &BigInt) -> u32 {
    n.magnitude().to_string().len() as u32
}

/// `numerator / denominator` rounded to an integer with `mode`.
///
/// `denominator` must not be zero.
pub(crate) fn div_rounded(numerator: &BigInt, denominator: &BigInt, mode: RoundingMode) -> BigInt {
    let (n, d) = if denominator.is_negative() {
        (-numerator, -denominator)
    } else {
        (numerator.clone(), denominator.clone())
    };

    // Truncates toward zero
    let q = &n / &d;
    let r = &n - &q * &d;
    if r.is_zero() {
        return q;
    }

    let positive = n.is_positive();
    let half = (r.abs() * BigInt::from(2)).cmp(&d);
    let away = match mode {
        RoundingMode::Up => true,
        RoundingMode::Down => false,
        RoundingMode::Ceiling => positive,
        RoundingMode::Floor => !positive,
        RoundingMode::HalfUp => half != Ordering::Less,
        RoundingMode::HalfDown => half == Ordering::Greater,
        RoundingMode::HalfEven => match half {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => !(&q % BigInt::from(2)).is_zero(),
        },
    };

    if !away {
        q
    } else if positive {
        q + BigInt::one()
    } else {
        q - BigInt::one()
    }
}

/// Failure to read a decimal literal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid decimal literal '{0}'")]
pub struct ParseDecimalError(String);

/// An exact base-10 number: `mantissa * 10^-scale`.
///
/// Equality and ordering are numeric, so `1.5` equals `1.500`; the scale only
/// matters for [`Display`](fmt::Display), which always prints exactly `scale`
/// fractional digits.
#[derive(Debug, Clone)]
pub struct Decimal {
    mantissa: BigInt,
    scale: u32,
}

impl Decimal {
    pub fn new(mantissa: impl Into<BigInt>, scale: u32) -> Self {
        Self {
            mantissa: mantissa.into(),
            scale,
        }
    }

    pub fn zero() -> Self {
        Self::new(0, 0)
    }

    pub fn one() -> Self {
        Self::new(1, 0)
    }

    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    /// Digits after the decimal point.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    pub fn is_positive(&self) -> bool {
        self.mantissa.is_positive()
    }

    pub fn abs(&self) -> Self {
        Self::new(self.mantissa.abs(), self.scale)
    }

    /// Mantissa of `self` expressed at a scale at least as fine as its own.
    fn mantissa_at(&self, scale: u32) -> BigInt {
        debug_assert!(scale >= self.scale);
        &self.mantissa * pow10(scale - self.scale)
    }

    /// Round to exactly `scale` fractional digits.
    ///
    /// The result always carries `scale` digits, trailing zeros included.
    pub fn round(&self, scale: u32, mode: RoundingMode) -> Self {
        if scale >= self.scale {
            return Self::new(self.mantissa_at(scale), scale);
        }
        let divisor = pow10(self.scale - scale);
        Self::new(div_rounded(&self.mantissa, &divisor, mode), scale)
    }

    /// `self / other` rounded to `scale`, or `None` when `other` is zero.
    pub fn div_round(&self, other: &Decimal, scale: u32, mode: RoundingMode) -> Option<Self> {
        if other.is_zero() {
            return None;
        }
        // (ma / 10^sa) / (mb / 10^sb) * 10^scale = ma * 10^(sb + scale) / (mb * 10^sa)
        let numerator = &self.mantissa * pow10(other.scale + scale);
        let denominator = &other.mantissa * pow10(self.scale);
        Some(Self::new(div_rounded(&numerator, &denominator, mode), scale))
    }

    /// The integer value, when there is no fractional part.
    pub fn to_integer(&self) -> Option<BigInt> {
        let divisor = pow10(self.scale);
        let q = &self.mantissa / &divisor;
        (&q * &divisor == self.mantissa).then_some(q)
    }

    /// Digits before the decimal point of `|self|`; zero when `|self| < 1`.
    pub fn integer_digits(&self) -> u32 {
        if self.is_zero() {
            return 0;
        }
        decimal_digits(&self.mantissa).saturating_sub(self.scale)
    }

    /// Nearest `f64`, for reporting and approximate comparisons only.
    pub fn to_f64(&self) -> Option<f64> {
        self.to_string().parse().ok()
    }

    /// Halve exactly: one more digit of scale.
    pub(crate) fn half(&self) -> Self {
        Self::new(&self.mantissa * BigInt::from(5), self.scale + 1)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.scale.cmp(&other.scale) {
            Ordering::Equal => self.mantissa.cmp(&other.mantissa),
            Ordering::Less => self.mantissa_at(other.scale).cmp(&other.mantissa),
            Ordering::Greater => self.mantissa.cmp(&other.mantissa_at(self.scale)),
        }
    }
}

impl<'a, 'b> Add<&'b Decimal> for &'a Decimal {
    type Output = Decimal;

    fn add(self, rhs: &Decimal) -> Decimal {
        let scale = self.scale.max(rhs.scale);
        Decimal::new(self.mantissa_at(scale) + rhs.mantissa_at(scale), scale)
    }
}

impl<'a, 'b> Sub<&'b Decimal> for &'a Decimal {
    type Output = Decimal;

    fn sub(self, rhs: &Decimal) -> Decimal {
        let scale = self.scale.max(rhs.scale);
        Decimal::new(self.mantissa_at(scale) - rhs.mantissa_at(scale), scale)
    }
}

impl<'a, 'b> Mul<&'b Decimal> for &'a Decimal {
    type Output = Decimal;

    fn mul(self, rhs: &Decimal) -> Decimal {
        Decimal::new(&self.mantissa * &rhs.mantissa, self.scale + rhs.scale)
    }
}

macro_rules! forward_binop {
    ($imp:ident, $method:ident) => {
        impl $imp<Decimal> for Decimal {
            type Output = Decimal;

            fn $method(self, rhs: Decimal) -> Decimal {
                (&self).$method(&rhs)
            }
        }

        impl<'a> $imp<&'a Decimal> for Decimal {
            type Output = Decimal;

            fn $method(self, rhs: &Decimal) -> Decimal {
                (&self).$method(rhs)
            }
        }

        impl<'a> $imp<Decimal> for &'a Decimal {
            type Output = Decimal;

            fn $method(self, rhs: Decimal) -> Decimal {
                self.$method(&rhs)
            }
        }
    };
}

forward_binop!(Add, add);
forward_binop!(Sub, sub);
forward_binop!(Mul, mul);

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal::new(-self.mantissa, self.scale)
    }
}

impl Neg for &Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal::new(-&self.mantissa, self.scale)
    }
}

impl From<BigInt> for Decimal {
    fn from(n: BigInt) -> Self {
        Self::new(n, 0)
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Decimal {
                fn from(n: $t) -> Self {
                    Self::new(n, 0)
                }
            }
        )*
    };
}

from_integer!(i32, i64, u32, u64, usize);

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    /// Reads `[+-]digits[.digits][(e|E)[+-]digits]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseDecimalError(s.to_string());

        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let (number, exponent) = match body.find(['e', 'E']) {
            Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
            None => (body, None),
        };
        let (int_part, frac_part) = number.split_once('.').unwrap_or((number, ""));

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty())
            || !all_digits(int_part)
            || !all_digits(frac_part)
        {
            return Err(invalid());
        }

        let exponent: i64 = match exponent {
            Some(text) => text.parse().map_err(|_| invalid())?,
            None => 0,
        };
        if exponent.abs() > MAX_LITERAL_EXPONENT {
            return Err(invalid());
        }

        let digits = format!("{int_part}{frac_part}");
        let mut mantissa: BigInt = digits.parse().map_err(|_| invalid())?;
        if negative {
            mantissa = -mantissa;
        }

        let scale = frac_part.len() as i64 - exponent;
        if scale >= 0 {
            let scale = u32::try_from(scale).map_err(|_| invalid())?;
            Ok(Self::new(mantissa, scale))
        } else {
            let shift = u32::try_from(-scale).map_err(|_| invalid())?;
            Ok(Self::new(mantissa * pow10(shift), 0))
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.magnitude().to_string();
        let scale = self.scale as usize;
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
        } else {
            digits
        };

        let sign = if self.is_negative() { "-" } else { "" };
        if scale == 0 {
            write!(f, "{sign}{padded}")
        } else {
            let (int_part, frac_part) = padded.split_at(padded.len() - scale);
            write!(f, "{sign}{int_part}.{frac_part}")
        }
    }
}

struct DecimalVisitor;

impl<'de> Visitor<'de> for DecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a decimal number or a string holding one")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
        // Shortest representation that reads back as the same float
        v.to_string().parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(d("1.250").to_string(), "1.250");
        assert_eq!(d("-0.05").to_string(), "-0.05");
        assert_eq!(d("+7").to_string(), "7");
        assert_eq!(d(".5").to_string(), "0.5");
        assert_eq!(d("1.5e2").to_string(), "150");
        assert_eq!(d("25E-3").to_string(), "0.025");
        assert_eq!(Decimal::new(-5, 3).to_string(), "-0.005");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "-", ".", "1.2.3", "1e", "abc", "1e999999999", "--1"] {
            assert!(bad.parse::<Decimal>().is_err(), "{bad}");
        }
    }

    #[test]
    fn test_equality_ignores_trailing_zeros() {
        assert_eq!(d("1.5"), d("1.500000"));
        assert!(d("-2") < d("-1.999"));
        assert!(d("0.1") > Decimal::zero());
    }

    #[test]
    fn test_exact_arithmetic_beyond_machine_range() {
        let big = d("79228162514264337593543950335");
        let doubled = &big * Decimal::from(2) + Decimal::one();
        assert_eq!(doubled.to_string(), "158456325028528675187087900671");
        assert_eq!(&doubled - &big - &big, Decimal::one());
    }

    #[test]
    fn test_round_keeps_every_requested_digit_for_large_values() {
        let v = d("123456789.12345678901234567890123");
        let r = v.round(20, RoundingMode::HalfEven);
        assert_eq!(r.to_string(), "123456789.12345678901234567890");
        assert_eq!(r.scale(), 20);
    }

    #[test]
    fn test_div_round() {
        let q = d("1").div_round(&d("3"), 6, RoundingMode::HalfEven).unwrap();
        assert_eq!(q.to_string(), "0.333333");
        let q = d("-2").div_round(&d("0.3"), 2, RoundingMode::Floor).unwrap();
        assert_eq!(q.to_string(), "-6.67");
        assert!(d("1").div_round(&Decimal::zero(), 6, RoundingMode::HalfEven).is_none());
    }

    #[test]
    fn test_to_integer() {
        assert_eq!(d("4.000").to_integer(), Some(BigInt::from(4)));
        assert_eq!(d("4.5").to_integer(), None);
        assert_eq!(d("-3.0").to_integer(), Some(BigInt::from(-3)));
    }

    #[test]
    fn test_deserialize_from_toml_strings_and_numbers() {
        #[derive(Deserialize)]
        struct Values {
            a: Decimal,
            b: Decimal,
            c: Decimal,
        }
        let v: Values = toml::from_str("a = \"0.1\"\nb = 2\nc = 0.25").unwrap();
        assert_eq!(v.a, d("0.1"));
        assert_eq!(v.b, d("2"));
        assert_eq!(v.c, d("0.25"));
    }
}
