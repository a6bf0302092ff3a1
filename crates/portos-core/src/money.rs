//! # Money Module
//!
//! Provides the `Money` type for prices, line totals and GST.
//!
//! ## Integer Paise
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE API SPEAKS DECIMALS, THE CART SPEAKS PAISE                         │
//! │                                                                         │
//! │  Wire JSON:   { "price": 120.5 }                                        │
//! │                     │                                                   │
//! │                     ▼  money::serde_major (rounds once, at the edge)    │
//! │  In memory:   Money(12050)                                              │
//! │                     │                                                   │
//! │                     ▼  subtotal, GST 18%, line totals: integer math     │
//! │  Display:     ₹120.50                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use portos_core::money::{Money, TaxRate};
//!
//! let price = Money::from_minor(12050); // ₹120.50
//! let line = price * 3;                 // ₹361.50
//! let gst = line.calculate_tax(TaxRate::from_bps(1800));
//! assert_eq!(gst.minor(), 6507);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

/// Symbol used by `Display`.
pub const CURRENCY_SYMBOL: &str = "₹";

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so GST at 18% is `TaxRate::from_bps(1800)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in minor units (paise).
///
/// Signed so that a difference of two amounts is always representable.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ```rust
    /// use portos_core::money::Money;
    ///
    /// let price = Money::from_minor(1099); // ₹10.99
    /// assert_eq!(price.minor(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Converts a decimal amount from the API into minor units.
    ///
    /// Rounds half away from zero. Only used where JSON numbers enter the
    /// system; everything downstream stays in integers.
    pub fn from_major_f64(major: f64) -> Self {
        Money((major * 100.0).round() as i64)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the whole rupee portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Decimal form for JSON output.
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / 100.0
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

    /// Calculates tax on this amount.
    ///
    /// Integer math with half-up rounding: `(amount * bps + 5000) / 10000`,
    /// widened to i128 so large carts cannot overflow.
    ///
    /// ```rust
    /// use portos_core::money::{Money, TaxRate};
    ///
    /// let subtotal = Money::from_minor(100_000); // ₹1000.00
    /// let gst = subtotal.calculate_tax(TaxRate::from_bps(1800));
    /// assert_eq!(gst.minor(), 18_000);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_minor(tax as i64)
    }

    /// Multiplies a unit price by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Formats with an explicit currency symbol.
    pub fn format_with(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            self.major().abs(),
            self.minor_part()
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with(CURRENCY_SYMBOL))
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Wire Adapter
// =============================================================================

/// Serde adapter for prices that travel as decimal numbers.
///
/// Accepts `120.5`, `120` or `"120.50"` (some endpoints stringify decimals)
/// and emits a JSON number.
///
/// ```rust
/// use portos_core::money::Money;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Row {
///     #[serde(with = "portos_core::money::serde_major")]
///     price: Money,
/// }
///
/// let row: Row = serde_json::from_str(r#"{"price": 19.99}"#).unwrap();
/// assert_eq!(row.price.minor(), 1999);
/// ```
pub mod serde_major {
    use super::Money;
    use serde::de::{self, Deserializer};
    use serde::{Deserialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decimal {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.to_major_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        match Decimal::deserialize(deserializer)? {
            Decimal::Number(n) => Ok(Money::from_major_f64(n)),
            Decimal::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Money::from_major_f64)
                .map_err(|_| de::Error::custom(format!("invalid amount: {s:?}"))),
        }
    }

    /// Same as the parent module for `Option<Money>` fields.
    pub mod option {
        use super::super::Money;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<Money>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(m) => serializer.serialize_some(&m.to_major_f64()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Money>, D::Error> {
            #[derive(Deserialize)]
            struct Wrap(#[serde(with = "crate::money::serde_major")] Money);

            Ok(Option::<Wrap>::deserialize(deserializer)?.map(|Wrap(m)| m))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Serialize)]
    struct Priced {
        #[serde(with = "serde_major")]
        price: Money,
        #[serde(default, with = "serde_major::option")]
        mrp: Option<Money>,
    }

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(1099);
        assert_eq!(money.minor(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_display_uses_rupee_symbol() {
        assert_eq!(Money::from_minor(1099).to_string(), "₹10.99");
        assert_eq!(Money::from_minor(500).to_string(), "₹5.00");
        assert_eq!(Money::from_minor(-550).to_string(), "-₹5.50");
        assert_eq!(Money::from_minor(1099).format_with("Rs "), "Rs 10.99");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);
        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!((a * 3).minor(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.minor(), 2000);
    }

    #[test]
    fn test_gst_rounds_half_up() {
        // ₹0.25 at 18% = 4.5 paise → 5
        let tax = Money::from_minor(25).calculate_tax(TaxRate::from_bps(1800));
        assert_eq!(tax.minor(), 5);
    }

    #[test]
    fn test_from_major_rounds_float_noise() {
        // 0.1 + 0.2 in floating point is 0.30000000000000004
        assert_eq!(Money::from_major_f64(0.1 + 0.2).minor(), 30);
        assert_eq!(Money::from_major_f64(19.99).minor(), 1999);
    }

    #[test]
    fn test_serde_major_accepts_numbers_and_strings() {
        let row: Priced = serde_json::from_str(r#"{"price": 120.5}"#).unwrap();
        assert_eq!(row.price.minor(), 12050);
        assert_eq!(row.mrp, None);

        let row: Priced = serde_json::from_str(r#"{"price": "99.90", "mrp": 150}"#).unwrap();
        assert_eq!(row.price.minor(), 9990);
        assert_eq!(row.mrp, Some(Money::from_minor(15000)));

        assert!(serde_json::from_str::<Priced>(r#"{"price": "abc"}"#).is_err());
    }

    #[test]
    fn test_serde_major_writes_decimal() {
        let row = Priced {
            price: Money::from_minor(1999),
            mrp: None,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["price"], serde_json::json!(19.99));
        assert!(json["mrp"].is_null());
    }
}
