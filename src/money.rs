//! Currency amounts backed by `rust_decimal`.
//!
//! Values keep their full precision through arithmetic. Rounding to two
//! decimal places only happens on display, serialization, and when the
//! settlement planner emits a transfer.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Neg, Sub, SubAssign};
use std::str::FromStr;

/// A signed currency amount.
///
/// Wraps `rust_decimal::Decimal` so sums of bill amounts are exact and the
/// only inexact step is the equal-share division.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use bill_splitter::Money;
///
/// let amount = Money::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Number of decimal places used for display and settlement amounts.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Tolerance below which a balance or transfer counts as settled.
    ///
    /// Shared by the balance rules and the settlement planner.
    pub const EPSILON: Self = Money(Decimal::from_parts(1, 0, 0, false, 2));

    /// Largest amount a single bill may carry.
    pub const MAX_AMOUNT: Self = Money(Decimal::from_parts(1_000_000, 0, 0, false, 0));

    /// Whole currency units.
    pub fn from_units(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Minor units (cents), e.g. `from_cents(1050)` is `10.50`.
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, Self::SCALE))
    }

    /// The underlying decimal.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns `true` when `|self| <= EPSILON`.
    pub fn is_settled(&self) -> bool {
        self.abs() <= Self::EPSILON
    }

    /// Rounds half away from zero to two decimal places.
    pub fn round2(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Number of decimal places needed to represent this value exactly.
    pub fn decimal_places(&self) -> u32 {
        self.0.normalize().scale()
    }

    /// Splits the amount into `parts` equal shares without rounding.
    ///
    /// Returns `None` when `parts` is zero.
    pub fn split(&self, parts: usize) -> Option<Self> {
        if parts == 0 {
            return None;
        }
        Some(Money(self.0 / Decimal::from(parts)))
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed)?;
        Ok(Money(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round2().0;
        // "-0.00" reads as a debt; show settled dust as zero.
        if rounded.is_zero() {
            return write!(f, "{:.2}", Decimal::ZERO);
        }
        write!(f, "{:.2}", rounded)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Div<Decimal> for Money {
    type Output = Self;

    fn div(self, rhs: Decimal) -> Self::Output {
        Money(self.0 / rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
