//! # Quantity Module
//!
//! Inventory quantities in thousandths of a unit.
//!
//! Inventory is counted in pieces, kilograms and liters. A bag of flour is
//! `2.5 kg`, an espresso uses `0.018 kg` of beans. Floats would make the
//! reconciliation math drift, so quantities follow the same rule as
//! [`Money`](crate::money::Money): integers in the smallest unit.
//!
//! ```text
//!   1 piece    = 1000 milli
//!   2.5 kg     = 2500 milli
//!   18 g beans =   18 milli (of a kilogram)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::money::div_round;

/// Milli-units per whole unit.
pub const MILLI_PER_UNIT: i64 = 1_000;

/// An inventory quantity in thousandths of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a quantity from thousandths of a unit.
    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    /// Creates a quantity from whole units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * MILLI_PER_UNIT)
    }

    /// Returns the raw value in thousandths.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Quantity(self.0.saturating_abs())
    }

    /// `self / other` in basis points, rounded half away from zero.
    ///
    /// Returns `None` when `other` is zero.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::quantity::Quantity;
    ///
    /// let missing = Quantity::from_milli(150);
    /// let expected = Quantity::from_units(2);
    /// assert_eq!(missing.ratio_bps(expected), Some(750)); // 7.5%
    /// assert_eq!(missing.ratio_bps(Quantity::zero()), None);
    /// ```
    pub fn ratio_bps(&self, other: Quantity) -> Option<i64> {
        if other.0 == 0 {
            return None;
        }
        let n = self.0 as i128 * 10_000;
        let d = other.0 as i128;
        // div_round wants a positive divisor
        let value = if d > 0 { div_round(n, d) } else { div_round(-n, -d) };
        Some(value as i64)
    }

    /// How many whole `per` amounts fit in `self`.
    ///
    /// Returns 0 when either side is zero or negative.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::quantity::Quantity;
    ///
    /// // 0.100 kg of beans left unexplained, 0.018 kg per espresso
    /// let fits = Quantity::from_milli(100).div_floor(Quantity::from_milli(18));
    /// assert_eq!(fits, 5);
    /// ```
    pub fn div_floor(&self, per: Quantity) -> i64 {
        if self.0 <= 0 || per.0 <= 0 {
            return 0;
        }
        self.0 / per.0
    }
}

/// Displays the quantity as a trimmed decimal: `1.25`, `-0.5`, `3`.
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        let whole = abs / MILLI_PER_UNIT;
        let frac = abs % MILLI_PER_UNIT;
        if frac == 0 {
            return write!(f, "{}{}", sign, whole);
        }
        let frac = format!("{:03}", frac);
        write!(f, "{}{}.{}", sign, whole, frac.trim_end_matches('0'))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::zero()
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Quantity {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Quantity {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Quantity(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Quantity {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Quantity {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Quantity(self.0.saturating_neg())
    }
}

/// Multiplication by a count (e.g. recipe amount × items sold).
impl Mul<i64> for Quantity {
    type Output = Self;

    #[inline]
    fn mul(self, count: i64) -> Self {
        Quantity(self.0.saturating_mul(count))
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Self {
        iter.fold(Quantity::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
