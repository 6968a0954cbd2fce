//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The storefront API speaks decimal numbers:                             │
//! │    1299.99 × 3 = 3899.9700000000003  ❌ WRONG!                          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    129999 × 3 = 389997  (always exact)                                  │
//! │                                                                         │
//! │  Decimal text is converted ONCE, at the HTTP boundary, by parsing the   │
//! │  digits (never through f64 arithmetic).                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use medwear_core::money::Money;
//!
//! let price = Money::from_cents(249_900); // 2499.00
//! let line = price * 2u32;
//! assert_eq!(line.cents(), 499_800);
//!
//! let parsed = Money::parse_decimal("1299.5").unwrap();
//! assert_eq!(parsed.cents(), 129_950);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Percent;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paisa / cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: change can be negative while a customer is still short
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ```text
/// Product.price ──┬──► CartLine.unit_price ──► CartLine.line_total
///                 │                                  │
///                 │                                  ▼
///                 │                Cart.subtotal ──► Discount ──► Total ──► Change
///                 │
///                 └──► Deal.original_price (Σ price × qty)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use medwear_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole major units, saturating at the
    /// `i64` bounds.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major.saturating_mul(100))
    }

    /// Like [`Money::from_major`], but `None` when the amount does not fit.
    ///
    /// ## Example
    /// ```rust
    /// use medwear_core::money::Money;
    ///
    /// assert_eq!(Money::checked_from_major(12), Some(Money::from_cents(1200)));
    /// assert_eq!(Money::checked_from_major(i64::MAX / 10), None);
    /// ```
    #[inline]
    pub const fn checked_from_major(major: i64) -> Option<Self> {
        match major.checked_mul(100) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Clamps negative values to zero.
    ///
    /// ## Example
    /// ```rust
    /// use medwear_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-500).floor_zero(), Money::zero());
    /// assert_eq!(Money::from_cents(500).floor_zero().cents(), 500);
    /// ```
    #[inline]
    pub const fn floor_zero(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            Money(self.0)
        }
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use medwear_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Returns `rate` of this amount, rounding half up.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The +5000 provides the
    /// rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use medwear_core::money::Money;
    /// use medwear_core::types::Percent;
    ///
    /// let subtotal = Money::from_major(1000);
    /// let ten_percent = subtotal.percentage(Percent::from_bps(1000));
    /// assert_eq!(ten_percent, Money::from_major(100));
    /// ```
    pub fn percentage(&self, rate: Percent) -> Money {
        // i128 so large subtotals cannot overflow the intermediate product
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(cents.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Parses a decimal major-unit string ("1299", "1299.5", "-12.75").
    ///
    /// At most two fractional digits are accepted; anything else is rejected
    /// rather than rounded.
    ///
    /// ## Example
    /// ```rust
    /// use medwear_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("12.75").unwrap().cents(), 1275);
    /// assert_eq!(Money::parse_decimal("3").unwrap().cents(), 300);
    /// assert!(Money::parse_decimal("1.999").is_err());
    /// assert!(Money::parse_decimal("abc").is_err());
    /// ```
    pub fn parse_decimal(input: &str) -> Result<Money, ValidationError> {
        let cents = parse_fixed_point(input, 2, "amount")?;
        Ok(Money(cents))
    }

    /// Formats as a plain decimal string with two fractional digits ("1299.50").
    ///
    /// This is the wire representation; currency symbols are a display concern
    /// of the application layer.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

/// Parses an optionally signed decimal string into an integer scaled by
/// `10^scale`, rejecting more than `scale` fractional digits.
pub(crate) fn parse_fixed_point(
    input: &str,
    scale: u32,
    field: &str,
) -> Result<i64, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (whole, frac) = match digits.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (digits, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(invalid("not a number"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("not a number"));
    }
    if frac.len() > scale as usize {
        return Err(invalid(&format!("at most {scale} decimal places")));
    }

    let factor = 10_i64.pow(scale);
    let whole_value: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid("number too large"))?
    };
    let frac_value: i64 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = scale as usize);
        padded.parse().map_err(|_| invalid("not a number"))?
    };

    let value = whole_value
        .checked_mul(factor)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(|| invalid("number too large"))?;

    Ok(if negative { -value } else { value })
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Arithmetic saturates at the i64 bounds.

/// Debug-friendly display ("1299.50"). Use `ConfigState::format_currency`
/// in the application layer for the currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by a line quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::from_cents(-50)), "-0.50");
        assert_eq!(format!("{}", Money::zero()), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3u32;
        assert_eq!(result.cents(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        let amount = Money::from_cents(1000);
        assert_eq!(amount.percentage(Percent::from_bps(825)).cents(), 83);
        assert_eq!(amount.percentage(Percent::from_bps(1000)).cents(), 100);
        assert_eq!(amount.percentage(Percent::from_bps(0)).cents(), 0);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Money::parse_decimal("1299").unwrap().cents(), 129_900);
        assert_eq!(Money::parse_decimal("1299.5").unwrap().cents(), 129_950);
        assert_eq!(Money::parse_decimal("0.05").unwrap().cents(), 5);
        assert_eq!(Money::parse_decimal(".5").unwrap().cents(), 50);
        assert_eq!(Money::parse_decimal(" -12.75 ").unwrap().cents(), -1275);

        assert!(Money::parse_decimal("").is_err());
        assert!(Money::parse_decimal("-").is_err());
        assert!(Money::parse_decimal("1.234").is_err());
        assert!(Money::parse_decimal("12a").is_err());
        assert!(Money::parse_decimal("NaN").is_err());
        assert!(Money::parse_decimal("99999999999999999999").is_err());
    }

    #[test]
    fn test_decimal_string_round_trips_through_parse() {
        let m = Money::from_cents(-129_950);
        assert_eq!(Money::parse_decimal(&m.to_decimal_string()).unwrap(), m);
    }

    #[test]
    fn test_floor_zero() {
        assert!(Money::from_cents(-1).floor_zero().is_zero());
        assert_eq!(Money::from_cents(7).floor_zero().cents(), 7);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }

    #[test]
    fn test_huge_amounts_saturate() {
        assert_eq!(Money::checked_from_major(i64::MAX), None);
        assert_eq!(Money::from_major(i64::MAX).cents(), i64::MAX);

        let big = Money::from_cents(i64::MAX - 1);
        assert_eq!((big + big).cents(), i64::MAX);
        assert_eq!((big * 3u32).cents(), i64::MAX);
        assert_eq!(vec![big, big, big].into_iter().sum::<Money>().cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - big).cents(), i64::MIN);
    }
}
