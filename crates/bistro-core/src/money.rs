//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  Wages: 7h 20m at $17.35/h                                              │
//! │    float: 127.23333333... → rounding drifts across 30 shifts            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    1735 cents × 440 min / 60 = 12723.33 → 12723 cents                  │
//! │    Rounding happens ONCE, at a well-defined point                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bistro_core::money::Money;
//!
//! let price = Money::from_cents(450); // $4.50
//! let total = price * 3;              // $13.50
//! assert_eq!(total.cents(), 1350);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::quantity::Quantity;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: discrepancy costs and pay changes can be negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serde transparent**: serialized as a plain integer of cents
/// - **Saturating arithmetic**: totals clamp at `i64::MIN`/`i64::MAX`
///   instead of wrapping or panicking
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
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

    /// Pay for `minutes` of work at an hourly `rate`.
    ///
    /// ## Rounding
    /// Rounded half away from zero to the cent, once per call. The wage
    /// engine calls this once per employee and bucket (regular / overtime),
    /// never per shift, so rounding error does not accumulate.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// // 7h20m at $17.35/h = $127.2333... → $127.23
    /// let pay = Money::for_minutes(Money::from_cents(1735), 440);
    /// assert_eq!(pay.cents(), 12723);
    /// ```
    pub fn for_minutes(rate: Money, minutes: i64) -> Money {
        Money(narrow(div_round(rate.0 as i128 * minutes as i128, 60)))
    }

    /// Scales the amount by a basis-point factor (10000 = ×1.0).
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// let base = Money::from_cents(1001);
    /// assert_eq!(base.scale_bps(15_000).cents(), 1502); // ×1.5, 1501.5 rounds up
    /// ```
    pub fn scale_bps(&self, bps: i64) -> Money {
        Money(narrow(div_round(self.0 as i128 * bps as i128, 10_000)))
    }

    /// Multiplies a unit price by a fractional quantity.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    /// use bistro_core::quantity::Quantity;
    ///
    /// // 0.250 kg of coffee beans at $24.00/kg
    /// let cost = Money::from_cents(2400).times_quantity(Quantity::from_milli(250));
    /// assert_eq!(cost.cents(), 600);
    /// ```
    pub fn times_quantity(&self, quantity: Quantity) -> Money {
        Money(narrow(div_round(self.0 as i128 * quantity.milli() as i128, 1_000)))
    }
}

/// Integer division rounding half away from zero.
///
/// `d` must be positive.
pub(crate) fn div_round(n: i128, d: i128) -> i128 {
    let half = d / 2;
    if n >= 0 {
        (n + half) / d
    } else {
        (n - half) / d
    }
}

/// Clamps a wide intermediate into the `i64` range.
pub(crate) fn narrow(n: i128) -> i64 {
    n.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money as `$12.34` / `-$5.50`.
///
/// ## Note
/// Used in logs and error messages. Client-facing formatting is done by
/// the frontend so it can be localized.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
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

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

/// Multiplication by a count (sale quantity).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
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
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!((-a).cents(), -1000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_arithmetic_saturates_instead_of_overflowing() {
        let huge = Money::from_cents(4_000_000_000_000_000_000);

        assert_eq!((huge * 3).cents(), i64::MAX);
        assert_eq!((huge + huge + huge).cents(), i64::MAX);
        assert_eq!((-huge - huge - huge).cents(), i64::MIN);

        let total: Money = vec![huge, huge, huge].into_iter().sum();
        assert_eq!(total.cents(), i64::MAX);

        let mut acc = huge;
        acc += huge;
        acc += huge;
        assert_eq!(acc.cents(), i64::MAX);
    }

    #[test]
    fn test_scaling_clamps_to_i64_range() {
        let huge = Money::from_cents(i64::MAX / 2);

        assert_eq!(huge.scale_bps(30_000).cents(), i64::MAX);
        assert_eq!(huge.times_quantity(Quantity::from_milli(5_000)).cents(), i64::MAX);
        assert_eq!(Money::for_minutes(huge, 600).cents(), i64::MAX);
    }

    #[test]
    fn test_for_minutes_rounds_half_away_from_zero() {
        // $10.00/h for 1 minute = 16.666 → 17 cents
        assert_eq!(Money::for_minutes(Money::from_cents(1000), 1).cents(), 17);
        // $0.30/h for 1 minute = 0.5 → 1 cent
        assert_eq!(Money::for_minutes(Money::from_cents(30), 1).cents(), 1);
        // a full hour is exact
        assert_eq!(Money::for_minutes(Money::from_cents(1735), 60).cents(), 1735);
        assert_eq!(Money::for_minutes(Money::from_cents(1735), 0).cents(), 0);
    }

    #[test]
    fn test_scale_bps() {
        assert_eq!(Money::from_cents(2000).scale_bps(15_000).cents(), 3000);
        assert_eq!(Money::from_cents(-1001).scale_bps(15_000).cents(), -1502);
        assert_eq!(Money::from_cents(1234).scale_bps(10_000).cents(), 1234);
    }

    #[test]
    fn test_times_quantity() {
        // 1.5 liters of milk at $1.19/l = 178.5 → 179
        let cost = Money::from_cents(119).times_quantity(Quantity::from_milli(1500));
        assert_eq!(cost.cents(), 179);

        let negative = Money::from_cents(119).times_quantity(Quantity::from_milli(-1500));
        assert_eq!(negative.cents(), -179);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
        assert!(Money::from_cents(-1).is_negative());
        assert_eq!(Money::from_cents(-1).abs().cents(), 1);
    }

    #[test]
    fn test_serializes_as_plain_cents() {
        let json = serde_json::to_string(&Money::from_cents(1250)).unwrap();
        assert_eq!(json, "1250");
    }
}
