//! # Ordinary Fractions Module
//!
//! ## Purpose
//! Exact fraction arithmetic used by the balance matrix. All intermediate values of the
//! elimination are kept as fractions, so there is no floating point error at any step.
//!
//! ## Main Data Structures and Logic
//! - `Rational`: numerator/denominator pair always stored in lowest terms, sign on the numerator.
//!   Results of arithmetic never have `i64::MIN` as numerator, so negation and `abs` stay in range
//! - Arithmetic methods (`add`, `sub`, `mul`, `div`, `reciprocal`) change the receiver in place and
//!   return it, so a whole formula can be written as one chain:
//!   `a.mul(b)?.sub(c)?.div(p)?`
//! - Comparison methods never change either operand
//! - Products and sums are computed with 128-bit intermediates; a result that does not fit back
//!   into `i64` is reported as `RationalError::Overflow`
//!
//! ## Usage
//! ```rust
//! use KiStoich::Algebra::rational::Rational;
//! let mut x = Rational::new(1, 2).unwrap();
//! x.add(Rational::new(1, 3).unwrap()).unwrap().mul(6i64).unwrap();
//! assert_eq!(x, Rational::from(5i64));
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// error types of fraction arithmetic
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RationalError {
    #[error("denominator of a fraction must be non-zero")]
    ZeroDenominator,
    #[error("attempt to divide by zero")]
    DivisionByZero,
    #[error("fraction arithmetic overflow")]
    Overflow,
}

/// greatest common divisor of absolute values (Euclidean algorithm). gcd(0, 0) == 0.
/// The result is unsigned since gcd(i64::MIN, 0) == 2^63 does not fit into i64
pub fn gcd(a: i64, b: i64) -> u64 {
    let mut a = a.unsigned_abs();
    let mut b = b.unsigned_abs();
    while a != 0 && b != 0 {
        if a > b {
            a %= b;
        } else {
            b %= a;
        }
    }
    a + b
}

/// least common multiple of absolute values; lcm(x, 0) == 0
pub fn lcm(a: i64, b: i64) -> Result<i64, RationalError> {
    if a == 0 || b == 0 {
        return Ok(0);
    }
    let g = gcd(a, b) as i128;
    let value = (a as i128).abs() / g * (b as i128).abs();
    i64::try_from(value).map_err(|_| RationalError::Overflow)
}

fn gcd_wide(a: i128, b: i128) -> i128 {
    let mut a = a.abs();
    let mut b = b.abs();
    while a != 0 && b != 0 {
        if a > b {
            a %= b;
        } else {
            b %= a;
        }
    }
    a + b
}

/// Ordinary fraction `numerator / denominator`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rational {
    numerator: i64,
    denominator: i64,
}

impl Rational {
    /// Creates a reduced fraction. A zero denominator is a construction error.
    pub fn new(numerator: i64, denominator: i64) -> Result<Self, RationalError> {
        if denominator == 0 {
            return Err(RationalError::ZeroDenominator);
        }
        Self::from_wide(numerator as i128, denominator as i128)
    }

    pub fn zero() -> Self {
        Self {
            numerator: 0,
            denominator: 1,
        }
    }

    pub fn one() -> Self {
        Self {
            numerator: 1,
            denominator: 1,
        }
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    pub fn is_integer(&self) -> bool {
        self.denominator == 1
    }

    pub fn is_negative(&self) -> bool {
        self.numerator < 0
    }

    /// absolute value as a new fraction
    pub fn abs(&self) -> Result<Self, RationalError> {
        Ok(Self {
            numerator: self.numerator.checked_abs().ok_or(RationalError::Overflow)?,
            denominator: self.denominator,
        })
    }

    // reduces a wide pair and narrows it back into i64
    fn from_wide(numerator: i128, denominator: i128) -> Result<Self, RationalError> {
        if denominator == 0 {
            return Err(RationalError::ZeroDenominator);
        }
        let g = gcd_wide(numerator, denominator);
        let (mut num, mut den) = (numerator / g, denominator / g);
        if den < 0 {
            num = -num;
            den = -den;
        }
        if num == 0 {
            den = 1;
        }
        Ok(Self {
            numerator: i64::try_from(num)
                .ok()
                .filter(|&n| n != i64::MIN)
                .ok_or(RationalError::Overflow)?,
            denominator: i64::try_from(den).map_err(|_| RationalError::Overflow)?,
        })
    }

    fn assign_wide(&mut self, numerator: i128, denominator: i128) -> Result<&mut Self, RationalError> {
        *self = Self::from_wide(numerator, denominator)?;
        Ok(self)
    }

    /// Brings the fraction to lowest terms: divides by gcd, keeps the denominator positive and
    /// the zero non-negative.
    pub fn reduce(&mut self) -> &mut Self {
        // the denominator is positive and not greater than i64::MAX, so is the gcd
        let g = gcd(self.numerator, self.denominator) as i64;
        if g > 1 {
            self.numerator /= g;
            self.denominator /= g;
        }
        if self.denominator < 0 {
            self.numerator = -self.numerator;
            self.denominator = -self.denominator;
        }
        if self.numerator == 0 {
            self.denominator = 1;
        }
        self
    }

    /// self += other
    pub fn add(&mut self, other: impl Into<Rational>) -> Result<&mut Self, RationalError> {
        let other = other.into();
        let (d1, d2) = (self.denominator as i128, other.denominator as i128);
        let common = d1 / gcd_wide(d1, d2) * d2;
        let num = (common / d1) * self.numerator as i128 + (common / d2) * other.numerator as i128;
        self.assign_wide(num, common)
    }

    /// self -= other
    pub fn sub(&mut self, other: impl Into<Rational>) -> Result<&mut Self, RationalError> {
        let other = other.into();
        let (d1, d2) = (self.denominator as i128, other.denominator as i128);
        let common = d1 / gcd_wide(d1, d2) * d2;
        let num = (common / d1) * self.numerator as i128 - (common / d2) * other.numerator as i128;
        self.assign_wide(num, common)
    }

    /// self *= other
    pub fn mul(&mut self, other: impl Into<Rational>) -> Result<&mut Self, RationalError> {
        let other = other.into();
        let num = self.numerator as i128 * other.numerator as i128;
        let den = self.denominator as i128 * other.denominator as i128;
        self.assign_wide(num, den)
    }

    /// self /= other
    pub fn div(&mut self, other: impl Into<Rational>) -> Result<&mut Self, RationalError> {
        let mut inverse = other.into();
        if inverse.is_zero() {
            return Err(RationalError::DivisionByZero);
        }
        inverse.reciprocal()?;
        self.mul(inverse)
    }

    /// self = 1 / self
    pub fn reciprocal(&mut self) -> Result<&mut Self, RationalError> {
        if self.numerator == 0 {
            return Err(RationalError::DivisionByZero);
        }
        let (num, den) = (self.denominator as i128, self.numerator as i128);
        self.assign_wide(num, den)
    }

    // sign of (self - other), evaluated on scratch values so neither operand changes
    fn sign_of_difference(&self, other: &Rational) -> Ordering {
        let left = self.numerator as i128 * other.denominator as i128;
        let right = other.numerator as i128 * self.denominator as i128;
        left.cmp(&right)
    }

    pub fn equals(&self, other: impl Into<Rational>) -> bool {
        self.sign_of_difference(&other.into()) == Ordering::Equal
    }

    pub fn greater_than(&self, other: impl Into<Rational>) -> bool {
        self.sign_of_difference(&other.into()) == Ordering::Greater
    }

    pub fn less_than(&self, other: impl Into<Rational>) -> bool {
        self.sign_of_difference(&other.into()) == Ordering::Less
    }

    pub fn greater_or_equal(&self, other: impl Into<Rational>) -> bool {
        self.sign_of_difference(&other.into()) != Ordering::Less
    }

    pub fn less_or_equal(&self, other: impl Into<Rational>) -> bool {
        self.sign_of_difference(&other.into()) != Ordering::Greater
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Self {
            numerator: value,
            denominator: 1,
        }
    }
}

impl From<&Rational> for Rational {
    fn from(value: &Rational) -> Self {
        *value
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sign_of_difference(other)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    #[test]
    fn test_new_reduces_and_normalizes_sign() {
        let r = frac(6, -8);
        assert_eq!(r.numerator(), -3);
        assert_eq!(r.denominator(), 4);

        let z = frac(0, -7);
        assert_eq!(z.numerator(), 0);
        assert_eq!(z.denominator(), 1);

        assert_eq!(Rational::new(1, 0), Err(RationalError::ZeroDenominator));
    }

    #[test]
    fn test_gcd_lcm() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(-12, 18), 6);
        assert_eq!(gcd(0, 5), 5);
        assert_eq!(gcd(0, 0), 0);
        assert_eq!(lcm(4, 6).unwrap(), 12);
        assert_eq!(lcm(-4, 6).unwrap(), 12);
        assert_eq!(lcm(0, 6).unwrap(), 0);
    }

    #[test]
    fn test_chained_arithmetic() {
        let mut x = frac(1, 2);
        x.add(frac(1, 3)).unwrap();
        assert_eq!(x, frac(5, 6));
        x.sub(1i64).unwrap();
        assert_eq!(x, frac(-1, 6));
        x.mul(frac(-3, 1)).unwrap().div(frac(1, 4)).unwrap();
        assert_eq!(x, frac(2, 1));
        assert!(x.is_integer());
    }

    #[test]
    fn test_division_by_zero() {
        let mut x = frac(3, 5);
        assert_eq!(x.div(0i64).unwrap_err(), RationalError::DivisionByZero);
        assert_eq!(x.div(Rational::zero()).unwrap_err(), RationalError::DivisionByZero);
        // the receiver is untouched by a failed division
        assert_eq!(x, frac(3, 5));

        let mut z = Rational::zero();
        assert_eq!(z.reciprocal().unwrap_err(), RationalError::DivisionByZero);
    }

    #[test]
    fn test_reciprocal_keeps_sign_on_numerator() {
        let mut x = frac(-2, 7);
        x.reciprocal().unwrap();
        assert_eq!(x.numerator(), -7);
        assert_eq!(x.denominator(), 2);
    }

    #[test]
    fn test_product_with_inverse_is_one() {
        let mut a = frac(14, 9);
        a.mul(frac(9, 14)).unwrap();
        assert_eq!(a, Rational::one());
    }

    #[test]
    fn test_comparisons_have_no_side_effects() {
        let a = frac(1, 3);
        let b = frac(1, 2);
        assert!(a.less_than(b));
        assert!(b.greater_than(a));
        assert!(a.less_or_equal(a));
        assert!(a.greater_or_equal(frac(2, 6)));
        assert!(a.equals(frac(2, 6)));
        assert!(!a.equals(0i64));
        assert_eq!(a, frac(1, 3));
        assert_eq!(b, frac(1, 2));
        assert!(a < b);
    }

    #[test]
    fn test_overflow_is_reported() {
        let mut big = Rational::from(i64::MAX);
        assert_eq!(big.mul(2i64).unwrap_err(), RationalError::Overflow);
    }

    #[test]
    fn test_min_numerator_is_overflow() {
        assert_eq!(Rational::new(i64::MIN, 1), Err(RationalError::Overflow));
        assert_eq!(Rational::new(i64::MIN, -1), Err(RationalError::Overflow));
        assert_eq!(Rational::new(i64::MIN, 2).unwrap(), Rational::from(i64::MIN / 2));

        let mut half = Rational::from(i64::MIN / 2);
        assert_eq!(half.mul(2i64).unwrap_err(), RationalError::Overflow);

        let min = Rational::from(i64::MIN);
        assert_eq!(min.abs().unwrap_err(), RationalError::Overflow);
        let mut min = Rational::from(i64::MIN);
        assert_eq!(min.reciprocal().unwrap_err(), RationalError::Overflow);
    }

    #[test]
    fn test_gcd_of_min() {
        assert_eq!(gcd(i64::MIN, 0), 1u64 << 63);
        assert_eq!(gcd(i64::MIN, i64::MIN), 1u64 << 63);
        assert_eq!(gcd(i64::MIN, 6), 2);
        assert_eq!(lcm(i64::MIN, 3).unwrap_err(), RationalError::Overflow);
    }

    #[test]
    fn test_abs_and_display() {
        let x = frac(-5, 10);
        assert!(x.is_negative());
        assert_eq!(x.abs().unwrap(), frac(1, 2));
        assert_eq!(x.to_string(), "-1/2");
        assert_eq!(Rational::from(3i64).to_string(), "3/1");
    }
}
