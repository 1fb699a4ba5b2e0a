//! # Money Module
//!
//! Provides the `Money` type for prices and the `PreciseMoney` type for
//! unrounded order totals.
//!
//! ## Why Two Types?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PRICES ARE WHOLE CENTS, TAX IS NOT                                     │
//! │                                                                         │
//! │  Book price:     Rs.25.50  ──► Money(2550)            exact             │
//! │  Tax @ 0.8%:     Rs.0.204  ──► PreciseMoney(204_000)   exact            │
//! │                                  (1 unit = 1/10,000 cent)               │
//! │                                                                         │
//! │  Rounding the tax to Rs.0.20 before adding shipping would compound the  │
//! │  error on every step. Instead, totals stay in PreciseMoney and are      │
//! │  rounded ONCE, when displayed:                                          │
//! │                                                                         │
//! │    25.50 + 0.204 + 350.00 = 375.704  ──► display "375.70"              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pahana_core::money::Money;
//! use pahana_core::types::TaxRate;
//!
//! let price = Money::from_cents(2550); // Rs.25.50
//! let tax = price.calculate_tax(TaxRate::from_bps(80));
//! assert_eq!(tax.round_to_cents().cents(), 20);
//!
//! // Floats never enter: amounts from outside are parsed as decimal text.
//! assert_eq!(Money::parse_decimal("10.5").unwrap().cents(), 1050);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::TaxRate;

/// Sub-units of a cent carried by [`PreciseMoney`].
///
/// Matches the basis-point denominator, so `cents × bps` is always exact.
pub const PRECISION_PER_CENT: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic stays closed under subtraction; the
///   boundary rejects negative prices before they reach a cart
/// - **Single field tuple struct**: zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// Book.price ──► LineItem.unit_price ──► LineItem::line_total()
///                                              │
///                                              ▼
///                         OrderTotals.subtotal / shipping_cost
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use pahana_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Rs.10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (rupees and cents).
    ///
    /// For negative amounts only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50, not -4.50.
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

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
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

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity, saturating at the `i64` bounds.
    ///
    /// Validated prices and quantities never get near saturation.
    ///
    /// ```rust
    /// use pahana_core::money::Money;
    ///
    /// let line_total = Money::from_cents(299).multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 897);
    /// assert_eq!(Money::from_cents(i64::MAX / 2 + 1).multiply_quantity(2).cents(), i64::MAX);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Calculates tax on this amount WITHOUT rounding.
    ///
    /// `cents × bps` is an exact count of 1/10,000 cents, so nothing is lost
    /// here. Call [`PreciseMoney::round_to_cents`] only for display.
    ///
    /// ```rust
    /// use pahana_core::money::Money;
    /// use pahana_core::types::TaxRate;
    ///
    /// // Rs.25.50 × 0.8% = Rs.0.204
    /// let tax = Money::from_cents(2550).calculate_tax(TaxRate::from_bps(80));
    /// assert_eq!(tax.units(), 204_000);
    /// assert_eq!(tax.round_to_cents().cents(), 20);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> PreciseMoney {
        // i128: large carts times any bps rate cannot overflow
        PreciseMoney(self.0 as i128 * rate.bps() as i128)
    }

    /// Parses a decimal amount such as `"10"`, `"10.5"` or `"10.50"`.
    ///
    /// ## Rules
    /// - Optional leading `-`, then digits, then at most two fractional digits
    /// - No exponent, no thousands separators, no currency symbol
    ///
    /// ```rust
    /// use pahana_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("350").unwrap().cents(), 35000);
    /// assert_eq!(Money::parse_decimal("0.05").unwrap().cents(), 5);
    /// assert!(Money::parse_decimal("1.005").is_err());
    /// assert!(Money::parse_decimal("").is_err());
    /// ```
    pub fn parse_decimal(text: &str) -> Result<Money, ValidationError> {
        let text = text.trim();
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let (whole, frac) = match body.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (body, ""),
        };

        let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if whole.is_empty() && frac.is_empty() {
            return Err(ValidationError::invalid_format("amount", "empty amount"));
        }
        if !digits_only(whole) || !digits_only(frac) {
            return Err(ValidationError::invalid_format(
                "amount",
                format!("'{text}' is not a decimal number"),
            ));
        }
        if frac.len() > 2 {
            return Err(ValidationError::invalid_format(
                "amount",
                "at most two decimal places are allowed",
            ));
        }

        let overflow = || ValidationError::invalid_format("amount", "amount is too large");
        let major: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let minor: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| overflow())? * 10,
            _ => frac.parse().map_err(|_| overflow())?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(overflow)?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Formats with a currency prefix, e.g. `Rs.12.34`.
    pub fn format_with(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}{}.{:02}", sign, symbol, self.major().abs(), self.minor())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain two-decimal form (`12.34`); the currency symbol is a display concern.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.format_with("").fmt(f)
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
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

/// Saturating, like [`Money::multiply_quantity`].
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| Money(acc.0.saturating_add(m.0)))
    }
}

// =============================================================================
// PreciseMoney Type
// =============================================================================

/// An unrounded amount in 1/10,000 of a cent.
///
/// Produced by tax calculation and used for every derived total. Rounded to
/// whole cents only through [`PreciseMoney::round_to_cents`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PreciseMoney(i128);

impl PreciseMoney {
    #[inline]
    pub const fn zero() -> Self {
        PreciseMoney(0)
    }

    /// Lifts whole cents into the precise domain (lossless).
    #[inline]
    pub const fn from_money(money: Money) -> Self {
        PreciseMoney(money.cents() as i128 * PRECISION_PER_CENT)
    }

    /// Raw count of 1/10,000 cents.
    #[inline]
    pub const fn units(&self) -> i128 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Rounds to whole cents, half away from zero. Amounts beyond the `i64`
    /// cent range clamp to `i64::MIN`/`i64::MAX` and keep their sign.
    ///
    /// ```rust
    /// use pahana_core::money::{Money, PreciseMoney};
    ///
    /// let exact = PreciseMoney::from_money(Money::from_cents(37570));
    /// assert_eq!(exact.round_to_cents().cents(), 37570);
    /// ```
    pub fn round_to_cents(&self) -> Money {
        let half = PRECISION_PER_CENT / 2;
        let magnitude = self.0.unsigned_abs().saturating_add(half as u128) / PRECISION_PER_CENT as u128;
        let cents = if self.0 < 0 {
            i64::try_from(magnitude).map(|m| -m).unwrap_or(i64::MIN)
        } else {
            i64::try_from(magnitude).unwrap_or(i64::MAX)
        };
        Money::from_cents(cents)
    }
}

impl From<Money> for PreciseMoney {
    fn from(money: Money) -> Self {
        PreciseMoney::from_money(money)
    }
}

impl Add for PreciseMoney {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        PreciseMoney(self.0 + other.0)
    }
}

impl Add<Money> for PreciseMoney {
    type Output = Self;

    #[inline]
    fn add(self, other: Money) -> Self {
        self + PreciseMoney::from_money(other)
    }
}

impl Sum for PreciseMoney {
    fn sum<I: Iterator<Item = PreciseMoney>>(iter: I) -> Self {
        iter.fold(PreciseMoney::zero(), Add::add)
    }
}

/// Displays the rounded two-decimal form.
impl fmt::Display for PreciseMoney {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.round_to_cents().fmt(f)
    }
}

// =============================================================================
// Serde Adapter
// =============================================================================

/// Serde adapter that writes `Money` as a decimal string (`"10.50"`).
///
/// Used for fields that travel to and from the storefront and the REST API,
/// where amounts are decimal rupees rather than cents. Reading accepts a
/// string or a JSON number, both parsed exactly.
pub mod decimal {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Money;

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(money)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        crate::validation::money_from_json("price", &value).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
