//! Exact and approximate numbers.

use crate::{error::UndefinedArithmetic, primitive::{float, fraction, rational, PRECISION}};
use rug::{ops::Pow, Float, Integer, Rational};
use std::{cmp::Ordering, fmt, ops::Neg};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Exact powers whose result would need more than this many bits are not evaluated.
const MAX_EXACT_POW_BITS: u64 = 1 << 16;

/// A numeric value.
///
/// Arithmetic between two [`Number::Rational`]s is exact. As soon as one operand is a
/// [`Number::Float`], the result is a [`Number::Float`] computed with
/// [`PRECISION`](crate::primitive::PRECISION) bits.
///
/// The derived [`PartialEq`] is exact equality: `1` and `1.0` are different numbers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Number {
    /// An exact rational number, always stored in lowest terms.
    Rational(Rational),

    /// An approximate number.
    Float(Float),
}

impl Number {
    /// The exact number `0`.
    pub fn zero() -> Self {
        Self::Rational(Rational::new())
    }

    /// The exact number `1`.
    pub fn one() -> Self {
        Self::int(1)
    }

    /// An exact integer.
    pub fn int(n: i64) -> Self {
        Self::Rational(rational(n))
    }

    /// Returns true if the number is exact.
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Rational(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::Rational(r) => r.cmp0() == Ordering::Equal,
            Self::Float(f) => f.is_zero(),
        }
    }

    pub fn is_one(&self) -> bool {
        match self {
            Self::Rational(r) => *r == 1,
            Self::Float(f) => *f == 1,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Self::Rational(r) => r.cmp0() == Ordering::Less,
            Self::Float(f) => f.cmp0() == Some(Ordering::Less),
        }
    }

    /// Returns true if the number is an exact fraction that is not an integer, such as `1/2`.
    pub fn is_fraction(&self) -> bool {
        match self {
            Self::Rational(r) => *r.denom() != 1,
            Self::Float(_) => false,
        }
    }

    /// Returns the number as an [`Integer`] if it is an exact integer.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Rational(r) if *r.denom() == 1 => Some(r.numer()),
            _ => None,
        }
    }

    /// Returns the number as an [`i32`] if it is an exact integer that fits.
    pub fn to_i32(&self) -> Option<i32> {
        self.as_integer()?.to_i32()
    }

    /// Returns the absolute value of the number.
    pub fn abs(&self) -> Self {
        match self {
            Self::Rational(r) => Self::Rational(r.clone().abs()),
            Self::Float(f) => Self::Float(f.clone().abs()),
        }
    }

    /// Converts the number to a [`Float`].
    pub fn to_float(&self) -> Float {
        match self {
            Self::Rational(r) => float(r),
            Self::Float(f) => f.clone(),
        }
    }

    /// Adds `rhs` to `self`.
    ///
    /// Returns an error if an approximate result is not finite.
    pub fn checked_add(&self, rhs: &Self) -> Result<Self, UndefinedArithmetic> {
        match (self, rhs) {
            (Self::Rational(lhs), Self::Rational(rhs)) => Ok(Self::Rational(Rational::from(lhs + rhs))),
            _ => finite(Float::with_val(PRECISION, self.to_float() + rhs.to_float()), || {
                format!("{}+{}", self, rhs)
            }),
        }
    }

    /// Multiplies `self` by `rhs`.
    ///
    /// Returns an error if an approximate result is not finite.
    pub fn checked_mul(&self, rhs: &Self) -> Result<Self, UndefinedArithmetic> {
        match (self, rhs) {
            (Self::Rational(lhs), Self::Rational(rhs)) => Ok(Self::Rational(Rational::from(lhs * rhs))),
            _ => finite(Float::with_val(PRECISION, self.to_float() * rhs.to_float()), || {
                format!("{}*{}", self, rhs)
            }),
        }
    }

    /// Divides `self` by `rhs`.
    ///
    /// Returns an error if `rhs` is zero, or if an approximate result is not finite.
    pub fn checked_div(&self, rhs: &Self) -> Result<Self, UndefinedArithmetic> {
        if rhs.is_zero() {
            return Err(UndefinedArithmetic::new(format_args!("{}/{}", self, rhs)));
        }

        match (self, rhs) {
            (Self::Rational(lhs), Self::Rational(rhs)) => Ok(Self::Rational(Rational::from(lhs / rhs))),
            _ => finite(Float::with_val(PRECISION, self.to_float() / rhs.to_float()), || {
                format!("{}/{}", self, rhs)
            }),
        }
    }

    /// Raises `self` to an integer power.
    ///
    /// Returns an error when raising zero to a negative power.
    pub fn pow_int(&self, exp: i32) -> Result<Self, UndefinedArithmetic> {
        if exp < 0 && self.is_zero() {
            return Err(UndefinedArithmetic::new(format_args!("{}^({})", self, exp)));
        }

        match self {
            Self::Rational(r) => Ok(Self::Rational(Rational::from(r.pow(exp)))),
            Self::Float(f) => finite(Float::with_val(PRECISION, f.pow(exp)), || {
                format!("{}^({})", self, exp)
            }),
        }
    }

    /// Raises `self` to the power of `exp`, if the result can be represented as a [`Number`].
    ///
    /// An exact base raised to an exact integer is evaluated exactly. If either operand is
    /// approximate, the power is evaluated approximately and kept if the result is finite (a
    /// negative base raised to a fractional power is not). Returns `Ok(None)` if the power should
    /// be kept symbolic, such as `2^(1/2)`.
    pub fn try_pow(&self, exp: &Self) -> Result<Option<Self>, UndefinedArithmetic> {
        if exp.is_zero() {
            return Ok(Some(Self::one()));
        }

        if exp.is_negative() && self.is_zero() {
            return Err(UndefinedArithmetic::new(format_args!("{}^({})", self, exp)));
        }

        match (self, exp) {
            (Self::Rational(base), Self::Rational(_)) => {
                let Some(n) = exp.to_i32() else {
                    return Ok(None);
                };
                let bits = base.numer().significant_bits().max(base.denom().significant_bits());
                if u64::from(bits) * u64::from(n.unsigned_abs()) > MAX_EXACT_POW_BITS {
                    return Ok(None);
                }
                self.pow_int(n).map(Some)
            },
            _ => {
                let value = Float::with_val(PRECISION, self.to_float().pow(&exp.to_float()));
                if value.is_finite() {
                    Ok(Some(Self::Float(value)))
                } else {
                    Ok(None)
                }
            },
        }
    }
}

/// Returns the given float as a [`Number`] if it is finite.
fn finite(
    value: Float,
    expr: impl FnOnce() -> String,
) -> Result<Number, UndefinedArithmetic> {
    if value.is_finite() {
        Ok(Number::Float(value))
    } else {
        Err(UndefinedArithmetic::new(expr()))
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::int(n)
    }
}

impl From<Integer> for Number {
    fn from(n: Integer) -> Self {
        Self::Rational(Rational::from(n))
    }
}

impl From<Rational> for Number {
    fn from(n: Rational) -> Self {
        Self::Rational(n)
    }
}

impl From<Float> for Number {
    fn from(n: Float) -> Self {
        Self::Float(n)
    }
}

impl Neg for &Number {
    type Output = Number;

    fn neg(self) -> Number {
        match self {
            Number::Rational(r) => Number::Rational(Rational::from(-r)),
            Number::Float(f) => Number::Float(Float::with_val(PRECISION, -f)),
        }
    }
}

/// Exact numbers are rendered as integers or fractions (`-3/4`). Approximate numbers are rendered
/// through [`f64`].
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rational(r) if *r.denom() == 1 => write!(f, "{}", r.numer()),
            Self::Rational(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Self::Float(n) => write!(f, "{}", n.to_f64()),
        }
    }
}

/// Creates an exact [`Number`] from a numerator and denominator.
///
/// Panics if `denom` is zero.
pub fn frac(numer: i64, denom: i64) -> Number {
    Number::Rational(fraction(numer, denom))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn exact_arithmetic_stays_exact() {
        let sum = frac(1, 2).checked_add(&frac(1, 3)).unwrap();
        assert_eq!(sum, frac(5, 6));

        let product = frac(2, 3).checked_mul(&Number::int(3)).unwrap();
        assert_eq!(product, Number::int(2));
        assert_eq!(product.to_string(), "2");
    }

    #[test]
    fn mixing_with_floats_is_approximate() {
        let sum = Number::int(1).checked_add(&Number::Float(float(0.5))).unwrap();
        assert!(!sum.is_exact());
        assert_eq!(sum.to_string(), "1.5");
    }

    #[test]
    fn overflowing_floats_are_undefined() {
        let huge = Number::Float(Float::with_val(PRECISION, Float::i_exp(1, 1 << 29)));
        let err = huge.checked_mul(&huge).unwrap_err();
        assert!(err.expr.contains('*'));
        assert!(huge.checked_add(&huge).is_ok());
        assert!(huge.checked_mul(&Number::int(2)).is_ok());
    }

    #[test]
    fn division_by_zero() {
        let err = Number::int(1).checked_div(&Number::zero()).unwrap_err();
        assert_eq!(err.expr, "1/0");

        let err = Number::Float(float(2.5)).checked_div(&Number::zero()).unwrap_err();
        assert_eq!(err.expr, "2.5/0");
    }

    #[test]
    fn zero_to_negative_power() {
        let err = Number::zero().pow_int(-1).unwrap_err();
        assert_eq!(err.expr, "0^(-1)");
        assert!(Number::zero().try_pow(&Number::int(-2)).is_err());
    }

    #[test]
    fn exact_powers() {
        assert_eq!(frac(2, 3).pow_int(-2).unwrap(), frac(9, 4));
        assert_eq!(Number::int(2).try_pow(&Number::int(10)).unwrap(), Some(Number::int(1024)));
        assert_eq!(Number::int(5).try_pow(&Number::zero()).unwrap(), Some(Number::one()));
    }

    #[test]
    fn symbolic_powers_are_kept() {
        assert_eq!(Number::int(2).try_pow(&frac(1, 2)).unwrap(), None);
        assert_eq!(Number::int(2).try_pow(&Number::int(1 << 20)).unwrap(), None);
        assert_eq!(Number::Float(float(-8)).try_pow(&frac(1, 3)).unwrap(), None);
    }

    #[test]
    fn approximate_powers() {
        let root = Number::Float(float(4)).try_pow(&frac(1, 2)).unwrap().unwrap();
        assert_eq!(root.to_string(), "2");
    }

    #[test]
    fn predicates() {
        assert!(frac(-1, 2).is_negative());
        assert!(frac(-1, 2).is_fraction());
        assert!(!Number::int(4).is_fraction());
        assert_eq!(Number::int(-7).to_i32(), Some(-7));
        assert_eq!(frac(7, 2).to_i32(), None);
        assert!(Number::Float(float(1)).is_one());
        assert_eq!(frac(-3, 4).to_string(), "-3/4");
    }
}
