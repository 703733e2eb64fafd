//! # Money Module
//!
//! Provides the `Money` type for handling cart prices and totals safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing float prices drifts:                                           │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A cart total rounded "after summation" is only stable if the sum      │
//! │  itself is exact.                                                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Σ price × quantity is exact in cents, so the 2-decimal total        │
//! │    never depends on the order lines were added in.                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Cents stay inside Rust. At the JSON boundary `Money` is a 2-decimal
//! number (`10.5` is $10.50), which is what product payloads and saved
//! carts carry.
//!
//! ## Usage
//! ```rust
//! use kenzie_core::money::Money;
//!
//! let price = Money::from_cents(1099);  // $10.99
//! let line = price.multiply_quantity(2); // $21.98
//! assert_eq!(line.cents(), 2198);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Discount;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  CartItem.price ──► CartItem::line_total() ──► calculate_cart_total()  │
/// │                                                        │                │
/// │                                                        ▼                │
/// │                              apply_discount(promo) ──► CartState.total │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// Arithmetic saturates instead of overflowing; the facade's price and
/// quantity limits keep real carts far away from the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(try_from = "f64", into = "f64")]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Largest magnitude in cents an `f64` still represents exactly (2^53).
    pub const MAX_EXACT_CENTS: i64 = 9_007_199_254_740_992;

    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use kenzie_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from a decimal amount, rounding to the cent.
    ///
    /// ## Example
    /// ```rust
    /// use kenzie_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(10.5).unwrap().cents(), 1050);
    /// assert_eq!(Money::from_decimal(0.1).unwrap().cents(), 10);
    /// assert!(Money::from_decimal(f64::NAN).is_err());
    /// ```
    pub fn from_decimal(amount: f64) -> Result<Self, ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: "must be a finite number".to_string(),
            });
        }
        let cents = (amount * 100.0).round();
        if cents.abs() > Self::MAX_EXACT_CENTS as f64 {
            return Err(ValidationError::OutOfRange {
                field: "amount".to_string(),
                min: -Self::MAX_EXACT_CENTS / 100,
                max: Self::MAX_EXACT_CENTS / 100,
            });
        }
        Ok(Money(cents as i64))
    }

    /// Returns the value as a decimal amount (for JSON only).
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
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

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use kenzie_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Like [`Money::multiply_quantity`], but `None` when the result does
    /// not fit.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Returns the amount a discount takes off this value.
    ///
    /// Half a cent rounds up: `(amount × bps + 5000) / 10000`.
    pub fn discount_amount(&self, discount: Discount) -> Money {
        let off = (self.0 as i128 * discount.bps() as i128 + 5000) / 10000;
        Money::from_cents(off as i64)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Example
    /// ```rust
    /// use kenzie_core::money::Money;
    /// use kenzie_core::types::Discount;
    ///
    /// let subtotal = Money::from_cents(10000); // $100.00
    /// let discounted = subtotal.apply_discount(Discount::from_bps(1000)); // 10% off
    /// assert_eq!(discounted.cents(), 9000); // $90.00
    /// ```
    pub fn apply_discount(&self, discount: Discount) -> Money {
        *self - self.discount_amount(discount)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-oriented display ("$10.99"). The UI formats for the shopper's locale.
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

impl TryFrom<f64> for Money {
    type Error = ValidationError;

    fn try_from(amount: f64) -> Result<Self, Self::Error> {
        Money::from_decimal(amount)
    }
}

impl From<Money> for f64 {
    fn from(money: Money) -> f64 {
        money.to_decimal()
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

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
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
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_decimal_rounds_to_cents() {
        assert_eq!(Money::from_decimal(10.0).unwrap().cents(), 1000);
        assert_eq!(Money::from_decimal(19.99).unwrap().cents(), 1999);
        assert_eq!(Money::from_decimal(0.125).unwrap().cents(), 13);
        assert!(Money::from_decimal(f64::INFINITY).is_err());
        assert!(Money::from_decimal(1e17).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!(a.multiply_quantity(3).cents(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_apply_discount() {
        let subtotal = Money::from_cents(10000);
        assert_eq!(subtotal.apply_discount(Discount::from_bps(1000)).cents(), 9000);
        assert_eq!(subtotal.apply_discount(Discount::none()).cents(), 10000);
    }

    #[test]
    fn test_discount_rounds_half_cent_up() {
        // $0.05 at 10% = 0.5 cents off → 1 cent off
        let amount = Money::from_cents(5);
        assert_eq!(amount.discount_amount(Discount::from_bps(1000)).cents(), 1);
        assert_eq!(amount.apply_discount(Discount::from_bps(1000)).cents(), 4);

        // $19.99 at 15% = 299.85 cents off → 300
        let amount = Money::from_cents(1999);
        assert_eq!(amount.apply_discount(Discount::from_bps(1500)).cents(), 1699);
    }

    #[test]
    fn test_overflow_saturates_or_reports() {
        let huge = Money::from_cents(i64::MAX / 2);
        assert_eq!(huge.multiply_quantity(3).cents(), i64::MAX);
        assert_eq!(huge.checked_multiply_quantity(3), None);
        assert_eq!(huge.checked_add(huge), Some(Money::from_cents(i64::MAX - 1)));
        assert_eq!(huge.checked_add(Money::from_cents(i64::MAX)), None);
    }

    #[test]
    fn test_serializes_as_decimal() {
        let json = serde_json::to_string(&Money::from_cents(1234)).unwrap();
        assert_eq!(json, "12.34");

        let whole: Money = serde_json::from_str("10").unwrap();
        assert_eq!(whole.cents(), 1000);
        let fractional: Money = serde_json::from_str("10.5").unwrap();
        assert_eq!(fractional.cents(), 1050);
        assert!(serde_json::from_str::<Money>("\"10\"").is_err());
    }
}
