//! Exact decimal arithmetic for quantities and adjustment factors.
//!
//! Legacy accounting systems truncate decimal quantities instead of rounding
//! them, so the difference between "close enough" and "equal" is the whole
//! problem. Every value in this crate is therefore an exact decimal: an
//! arbitrary-precision integer mantissa paired with a fractional-digit count.
//! Nothing is ever constructed from or round-tripped through binary floating
//! point.
//!
//! Addition, subtraction and multiplication are exact at any magnitude.
//! Division is the one operation that can require unbounded digits, so it is
//! performed through a [`PrecisionContext`] that guarantees a minimum number
//! of significant digits and truncates (toward zero) beyond them.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_traits::{One, Signed, Zero};

use super::error::DomainError;

/// Floor for the working precision of any [`PrecisionContext`].
///
/// Fifty significant digits is far beyond anything a downstream transaction
/// system stores, which is the point: the only place digits may be dropped is
/// the final, intentional truncation step.
pub const MIN_PRECISION_DIGITS: u32 = 50;

/// An exact decimal number: `mantissa * 10^-scale`.
///
/// The representation is not normalized. `1.50` keeps mantissa `150` and
/// scale `2`; equality and ordering compare numeric value, not
/// representation. Use [`Numeric::normalized`] to drop trailing fractional
/// zeros for display.
#[derive(Debug, Clone)]
pub struct Numeric {
    mantissa: BigInt,
    scale: u32,
}

impl Numeric {
    /// Build from an unscaled mantissa and a fractional-digit count.
    #[must_use]
    pub const fn new(mantissa: BigInt, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    /// The value `0`.
    #[must_use]
    pub fn zero() -> Self {
        Self::new(BigInt::zero(), 0)
    }

    /// The value `1`.
    #[must_use]
    pub fn one() -> Self {
        Self::new(BigInt::one(), 0)
    }

    /// Number of fractional digits in this representation.
    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// The unscaled integer mantissa.
    #[must_use]
    pub const fn unscaled(&self) -> &BigInt {
        &self.mantissa
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// True for values strictly below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    /// True for values strictly above zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.mantissa.is_positive()
    }

    /// Drop all fractional digits beyond `scale`, toward zero.
    ///
    /// This mirrors the truncation performed by the downstream systems being
    /// reconciled: `1.019` at scale 2 becomes `1.01`, and `-1.019` becomes
    /// `-1.01` (magnitude truncation, not floor). A value already at or
    /// below the target scale is returned unchanged in value.
    #[must_use]
    pub fn truncate(&self, scale: u32) -> Self {
        if self.scale <= scale {
            return self.clone();
        }
        // BigInt division truncates toward zero for either sign.
        let divisor = pow10(self.scale - scale);
        Self::new(&self.mantissa / divisor, scale)
    }

    /// Round up (toward positive infinity) to a multiple of `10^-scale`.
    ///
    /// Used by the solver to snap a candidate percentage onto the step
    /// lattice. A value that is already a lattice multiple is returned
    /// unchanged in value.
    #[must_use]
    pub fn ceil_to_scale(&self, scale: u32) -> Self {
        if self.scale <= scale {
            // Already a multiple of a coarser grid; widen the representation.
            let mantissa = &self.mantissa * pow10(scale - self.scale);
            return Self::new(mantissa, scale);
        }
        let divisor = pow10(self.scale - scale);
        let quotient = &self.mantissa / &divisor;
        let remainder = &self.mantissa % &divisor;
        // Truncated division already ceils negative values; positive values
        // with a nonzero remainder need one more step up.
        let mantissa = if remainder.is_positive() {
            quotient + BigInt::one()
        } else {
            quotient
        };
        Self::new(mantissa, scale)
    }

    /// Smallest equivalent representation: trailing fractional zeros removed.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut mantissa = self.mantissa.clone();
        let mut scale = self.scale;
        let ten = BigInt::from(10u8);
        while scale > 0 && (&mantissa % &ten).is_zero() {
            mantissa /= &ten;
            scale -= 1;
        }
        Self::new(mantissa, scale)
    }

    /// Position of the most significant digit relative to the decimal point.
    ///
    /// `123.4` yields 3, `0.005` yields -2. Zero yields 0.
    fn magnitude_exponent(&self) -> i64 {
        if self.is_zero() {
            return 0;
        }
        let digits = self.mantissa.magnitude().to_string().len() as i64;
        digits - i64::from(self.scale)
    }

    /// Both mantissas rescaled to the larger of the two scales.
    fn aligned(&self, other: &Self) -> (BigInt, BigInt, u32) {
        let scale = self.scale.max(other.scale);
        let lhs = &self.mantissa * pow10(scale - self.scale);
        let rhs = &other.mantissa * pow10(scale - other.scale);
        (lhs, rhs, scale)
    }
}

fn pow10(exp: u32) -> BigInt {
    BigInt::from(10u8).pow(exp)
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Numeric {}

impl PartialOrd for Numeric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Numeric {
    fn cmp(&self, other: &Self) -> Ordering {
        let (lhs, rhs, _) = self.aligned(other);
        lhs.cmp(&rhs)
    }
}

impl Add for &Numeric {
    type Output = Numeric;

    fn add(self, rhs: &Numeric) -> Numeric {
        let (lhs, rhs, scale) = self.aligned(rhs);
        Numeric::new(lhs + rhs, scale)
    }
}

impl Sub for &Numeric {
    type Output = Numeric;

    fn sub(self, rhs: &Numeric) -> Numeric {
        let (lhs, rhs, scale) = self.aligned(rhs);
        Numeric::new(lhs - rhs, scale)
    }
}

impl Mul for &Numeric {
    type Output = Numeric;

    fn mul(self, rhs: &Numeric) -> Numeric {
        Numeric::new(&self.mantissa * &rhs.mantissa, self.scale + rhs.scale)
    }
}

impl Neg for &Numeric {
    type Output = Numeric;

    fn neg(self) -> Numeric {
        Numeric::new(-&self.mantissa, self.scale)
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Self::new(BigInt::from(value), 0)
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.mantissa.sign() == Sign::Minus {
            "-"
        } else {
            ""
        };
        let digits = self.mantissa.magnitude().to_string();
        if self.scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let width = self.scale as usize + 1;
        let padded = if digits.len() < width {
            format!("{digits:0>width$}")
        } else {
            digits
        };
        let split = padded.len() - self.scale as usize;
        write!(f, "{sign}{}.{}", &padded[..split], &padded[split..])
    }
}

/// Exponent bound for parsed scientific notation. Spreadsheet exports use
/// small exponents; anything past this is a malformed cell, not a quantity.
const MAX_PARSE_EXPONENT: i32 = 10_000;

impl FromStr for Numeric {
    type Err = DomainError;

    /// Parse a decimal string: optional sign, digits with an optional
    /// fractional part, and an optional exponent (`1.23e+15` style cells
    /// appear in spreadsheet exports of large positions).
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let parse_err = || DomainError::ParseNumeric {
            text: text.to_string(),
        };

        let trimmed = text.trim();
        let (body, exponent) = match trimmed.find(['e', 'E']) {
            Some(at) => {
                let exp: i32 = trimmed[at + 1..].parse().map_err(|_| parse_err())?;
                if exp.checked_abs().map_or(true, |a| a > MAX_PARSE_EXPONENT) {
                    return Err(parse_err());
                }
                (&trimmed[..at], exp)
            }
            None => (trimmed, 0),
        };

        let (sign, unsigned) = match body.as_bytes().first() {
            Some(b'-') => (Sign::Minus, &body[1..]),
            Some(b'+') => (Sign::Plus, &body[1..]),
            Some(_) => (Sign::Plus, body),
            None => return Err(parse_err()),
        };

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, f),
            None => (unsigned, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(parse_err());
        }
        let digits: String = [int_part, frac_part].concat();
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(parse_err());
        }

        let magnitude = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(parse_err)?;
        let mut mantissa = match sign {
            Sign::Minus => -magnitude,
            _ => magnitude,
        };

        // Fold the exponent into the scale, keeping the scale non-negative.
        let scale = i64::from(frac_part.len() as u32) - i64::from(exponent);
        let scale = if scale < 0 {
            mantissa *= pow10((-scale) as u32);
            0
        } else {
            u32::try_from(scale).map_err(|_| parse_err())?
        };

        Ok(Self::new(mantissa, scale))
    }
}

/// Immutable arithmetic context: the guaranteed number of significant digits
/// carried by division.
///
/// The context is a plain value passed to whoever needs to divide. It is
/// deliberately not ambient global state, so independent solves stay
/// independently testable and safe to run in parallel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecisionContext {
    digits: u32,
}

impl PrecisionContext {
    /// Create a context with at least [`MIN_PRECISION_DIGITS`] significant
    /// digits. Smaller requests are raised to the floor.
    #[must_use]
    pub fn new(digits: u32) -> Self {
        Self {
            digits: digits.max(MIN_PRECISION_DIGITS),
        }
    }

    /// Significant digits carried by this context.
    #[must_use]
    pub const fn digits(&self) -> u32 {
        self.digits
    }

    /// Exact quotient truncated toward zero after at least `digits`
    /// significant digits. Returns `None` for a zero divisor.
    ///
    /// Truncating (rather than rounding) matters to the solver: the computed
    /// ratio never exceeds the true ratio in magnitude, so the step search
    /// only ever has to move in one direction.
    #[must_use]
    pub fn div(&self, dividend: &Numeric, divisor: &Numeric) -> Option<Numeric> {
        if divisor.is_zero() {
            return None;
        }
        if dividend.is_zero() {
            return Some(Numeric::zero());
        }

        // Widen the result scale when the divisor dwarfs the dividend, plus
        // one guard digit so magnitude-boundary quotients keep the minimum.
        let widen = (divisor.magnitude_exponent() - dividend.magnitude_exponent()).max(0);
        let result_scale = self.digits + widen as u32 + 1;

        let shift =
            i64::from(result_scale) + i64::from(divisor.scale()) - i64::from(dividend.scale());
        let (numerator, denominator) = if shift >= 0 {
            (
                dividend.unscaled() * pow10(shift as u32),
                divisor.unscaled().clone(),
            )
        } else {
            (
                dividend.unscaled().clone(),
                divisor.unscaled() * pow10((-shift) as u32),
            )
        };

        Some(Numeric::new(numerator / denominator, result_scale))
    }
}

impl Default for PrecisionContext {
    fn default() -> Self {
        Self::new(MIN_PRECISION_DIGITS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(text: &str) -> Numeric {
        text.parse().expect("valid decimal literal")
    }

    #[test]
    fn parses_plain_and_signed_decimals() {
        assert_eq!(num("1.50").to_string(), "1.50");
        assert_eq!(num("-0.005").to_string(), "-0.005");
        assert_eq!(num("+42").to_string(), "42");
        assert_eq!(num("  7.25 ").to_string(), "7.25");
    }

    #[test]
    fn parses_scientific_notation_from_exports() {
        assert_eq!(num("1.23e+2").to_string(), "123");
        assert_eq!(num("5e3").to_string(), "5000");
        assert_eq!(num("1.5E-3"), num("0.0015"));
    }

    #[test]
    fn rejects_non_numeric_text() {
        for bad in ["", "abc", "1.2.3", "1,5", "--4", "1e999999", "."] {
            assert!(bad.parse::<Numeric>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn equality_ignores_representation() {
        assert_eq!(num("1.10"), num("1.1"));
        assert_eq!(num("100"), num("100.000"));
        assert!(num("1.01") > num("1.009"));
        assert!(num("-2") < num("-1.5"));
    }

    #[test]
    fn arithmetic_is_exact() {
        assert_eq!(&num("0.1") + &num("0.2"), num("0.3"));
        assert_eq!(&num("1000.00") * &num("1.00001"), num("1000.01"));
        assert_eq!(&num("1") - &num("0.999"), num("0.001"));
        assert_eq!(-&num("4.2"), num("-4.2"));
    }

    #[test]
    fn truncates_toward_zero_for_either_sign() {
        assert_eq!(num("1.019").truncate(2), num("1.01"));
        assert_eq!(num("-1.019").truncate(2), num("-1.01"));
        assert_eq!(num("3.999999").truncate(0), num("3"));
        assert_eq!(num("-3.999999").truncate(0), num("-3"));
        assert_eq!(num("5").truncate(2), num("5"));
    }

    #[test]
    fn ceil_snaps_up_to_the_lattice() {
        assert_eq!(num("0.12301").ceil_to_scale(3), num("0.124"));
        assert_eq!(num("0.123").ceil_to_scale(3), num("0.123"));
        assert_eq!(num("-0.12301").ceil_to_scale(3), num("-0.123"));
        assert_eq!(num("2").ceil_to_scale(2).to_string(), "2.00");
    }

    #[test]
    fn normalized_trims_trailing_zeros() {
        assert_eq!(num("1.2300").normalized().to_string(), "1.23");
        assert_eq!(num("100.000").normalized().to_string(), "100");
        assert_eq!(num("0.000").normalized().to_string(), "0");
    }

    #[test]
    fn context_enforces_the_precision_floor() {
        assert_eq!(PrecisionContext::new(10).digits(), MIN_PRECISION_DIGITS);
        assert_eq!(PrecisionContext::new(80).digits(), 80);
        assert_eq!(PrecisionContext::default().digits(), MIN_PRECISION_DIGITS);
    }

    #[test]
    fn division_truncates_toward_zero() {
        let ctx = PrecisionContext::default();
        let third = ctx.div(&num("1"), &num("3")).expect("nonzero divisor");
        let text = third.to_string();
        // 0.333... truncated, never rounded up.
        assert!(text.starts_with("0.333333333333"), "got {text}");
        assert!(!text.ends_with('4'));
        assert!(&third * &num("3") < num("1"));
    }

    #[test]
    fn division_keeps_significant_digits_for_small_quotients() {
        let ctx = PrecisionContext::default();
        let q = ctx
            .div(&num("1"), &num("1000000000"))
            .expect("nonzero divisor");
        assert_eq!(q, num("0.000000001"));

        let exact = ctx.div(&num("1000.01"), &num("1000.00")).expect("nonzero");
        assert_eq!(&exact * &num("1000.00"), num("1000.01"));
    }

    #[test]
    fn division_by_zero_is_none() {
        let ctx = PrecisionContext::default();
        assert!(ctx.div(&num("1"), &num("0")).is_none());
        assert!(ctx.div(&num("1"), &num("0.00")).is_none());
    }

    #[test]
    fn division_handles_signs() {
        let ctx = PrecisionContext::default();
        let q = ctx.div(&num("-4"), &num("-3")).expect("nonzero");
        assert!(q > num("1.3333333333"));
        assert!(q < num("1.3333333334"));

        let q = ctx.div(&num("4"), &num("-3")).expect("nonzero");
        assert!(q.is_negative());
        // Toward zero: magnitude never exceeds the true ratio.
        assert!(&q * &num("-3") <= num("4"));
    }
}
