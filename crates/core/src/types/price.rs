//! Type-safe price representation using decimal arithmetic.

use std::iter::Sum;
use std::ops::Mul;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A USD price.
///
/// Arithmetic stays in `Decimal`; on the wire the amount is a plain JSON
/// number (`49.99`), which is what the marketplace clients expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Returns the amount in dollars.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl Mul<u64> for Price {
    type Output = Self;

    fn mul(self, quantity: u64) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        assert_eq!(Price::from_cents(4999).amount(), Decimal::new(4999, 2));
        assert_eq!(Price::from_cents(4999).to_string(), "$49.99");
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&Price::from_cents(2999)).unwrap();
        assert_eq!(json, "29.99");
    }

    #[test]
    fn test_revenue_arithmetic_is_exact() {
        let total: Price = [Price::from_cents(1), Price::from_cents(2)]
            .into_iter()
            .map(|p| p * 10)
            .sum();
        assert_eq!(total, Price::from_cents(30));
    }
}
