//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    111000 × 0.9 = 99900.00000000001   ❌ WRONG!                         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units + basis points                       │
//! │    (111000 × 1000 + 5000) / 10000 = 11100 discount                      │
//! │    111000 − 11100 = 99900                                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A "minor unit" is the smallest unit the store counts in. For a currency
//! without decimals (e.g. IDR) that is the whole unit; for USD it is cents.
//! [`CurrencyFormat`] knows how many decimals to show.
//!
//! ## Usage
//! ```rust
//! use till_core::money::Money;
//!
//! let price = Money::from_minor(18_000);
//! let line = price * 2_i64;
//! assert_eq!((line + Money::from_minor(75_000)).minor(), 111_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::{DiscountRate, TaxRate};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: change can be negative while payment is incomplete
/// - **Single field tuple struct**: zero-cost, serializes as a plain integer
/// - **Saturating arithmetic**: `+ - *` stop at the i64 bounds instead of
///   wrapping or panicking
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► LineItem.unit_price ──► LineItem.line_total
///                                               │
///          Totals.subtotal ◄────────────────────┘
///               │
///               ▼
///   discount ─► discounted ─► tax ─► total ─► change = tendered − total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// let price = Money::from_minor(75_000);
    /// assert_eq!(price.minor(), 75_000);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
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

    /// Returns `bps / 10000` of this amount, rounded half-up.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The +5000 provides
    /// rounding (5000/10000 = 0.5). i128 prevents overflow on large amounts.
    ///
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// // 8.25% of 1000 = 82.5 → 83
    /// assert_eq!(Money::from_minor(1000).portion_bps(825).minor(), 83);
    /// ```
    pub fn portion_bps(&self, bps: u32) -> Money {
        let portion = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_minor(portion.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Calculates tax on this amount.
    ///
    /// ```rust
    /// use till_core::money::Money;
    /// use till_core::types::TaxRate;
    ///
    /// let tax = Money::from_minor(99_900).calculate_tax(TaxRate::from_bps(1000));
    /// assert_eq!(tax.minor(), 9_990);
    /// ```
    #[inline]
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        self.portion_bps(rate.bps())
    }

    /// Returns the amount taken off by a percentage discount.
    #[inline]
    pub fn discount_amount(&self, rate: DiscountRate) -> Money {
        self.portion_bps(rate.bps())
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ```rust
    /// use till_core::money::Money;
    /// use till_core::types::DiscountRate;
    ///
    /// let subtotal = Money::from_minor(111_000);
    /// let discounted = subtotal.apply_discount(DiscountRate::from_percent(10));
    /// assert_eq!(discounted.minor(), 99_900);
    /// ```
    #[inline]
    pub fn apply_discount(&self, rate: DiscountRate) -> Money {
        *self - self.discount_amount(rate)
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the raw minor-unit amount. Use [`CurrencyFormat`] for display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
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
        *self = *self + other;
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
        *self = *self - other;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Currency Formatting
// =============================================================================

/// How money is shown to people: symbol, decimals and thousands separator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    /// Currency symbol (e.g. "Rp", "$").
    pub symbol: String,

    /// Number of decimal places held in the minor unit (0 for IDR, 2 for USD).
    pub decimals: u8,

    /// Grouping character for thousands, if any.
    pub thousands_separator: Option<char>,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat {
            symbol: "Rp".to_string(),
            decimals: 0,
            thousands_separator: Some('.'),
        }
    }
}

impl CurrencyFormat {
    /// Formats an amount with this currency's conventions.
    ///
    /// ```rust
    /// use till_core::money::{CurrencyFormat, Money};
    ///
    /// let idr = CurrencyFormat::default();
    /// assert_eq!(idr.format(Money::from_minor(111_000)), "Rp111.000");
    ///
    /// let usd = CurrencyFormat { symbol: "$".into(), decimals: 2, thousands_separator: None };
    /// assert_eq!(usd.format(Money::from_minor(-1234)), "-$12.34");
    /// ```
    pub fn format(&self, amount: Money) -> String {
        let minor = amount.minor();
        let divisor = 10_i64.pow(self.decimals as u32);
        let whole = (minor / divisor).abs();
        let frac = (minor % divisor).abs();

        let mut whole_str = whole.to_string();
        if let Some(sep) = self.thousands_separator {
            whole_str = group_thousands(&whole_str, sep);
        }

        let sign = if minor < 0 { "-" } else { "" };
        if self.decimals > 0 {
            format!(
                "{}{}{}.{:0width$}",
                sign,
                self.symbol,
                whole_str,
                frac,
                width = self.decimals as usize
            )
        } else {
            format!("{}{}{}", sign, self.symbol, whole_str)
        }
    }
}

fn group_thousands(digits: &str, sep: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}
