//! Monetary amounts in the smallest currency unit.

use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// An amount of money in centavos.
///
/// Integer arithmetic keeps running totals exact, so adjusting a total by a
/// price delta always agrees with summing the prices from scratch.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_centavos(centavos: u64) -> Self {
        Self(centavos)
    }

    /// Whole currency units (e.g. `from_major(70)` is 70.00).
    pub const fn from_major(units: u64) -> Self {
        Self(units * 100)
    }

    /// Convert a user-entered amount, rounding to two decimals.
    ///
    /// Rejects NaN, infinities, zero, negatives, and anything that rounds
    /// to less than one centavo.
    pub fn try_from_amount(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(DomainError::validation("amount must be a positive number"));
        }

        let centavos = (amount * 100.0).round();
        if centavos < 1.0 {
            return Err(DomainError::validation("amount rounds to zero"));
        }
        if centavos >= u64::MAX as f64 {
            return Err(DomainError::validation("amount is too large"));
        }

        Ok(Self(centavos as u64))
    }

    pub fn centavos(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    pub fn saturating_add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }

    pub fn saturating_sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

/// Plain `u64` addition: overflows like `u64` does. Sums of catalog prices
/// stay far below the bound; use `checked_add` for caller-supplied amounts.
impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Parses text typed into an amount field (`"150"`, `" 99.5 "`).
impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount: f64 = s
            .trim()
            .parse()
            .map_err(|_| DomainError::validation(format!("not a number: {:?}", s.trim())))?;
        Self::try_from_amount(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn displays_two_decimals() {
        assert_eq!(Money::from_major(70).to_string(), "70.00");
        assert_eq!(Money::from_centavos(5).to_string(), "0.05");
        assert_eq!(Money::from_centavos(12_345).to_string(), "123.45");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn amounts_round_to_centavos() {
        assert_eq!(Money::try_from_amount(100.0).unwrap(), Money::from_major(100));
        assert_eq!(Money::try_from_amount(19.999).unwrap(), Money::from_major(20));
        assert_eq!(Money::try_from_amount(0.125).unwrap().centavos(), 13);
    }

    #[test]
    fn non_positive_and_non_finite_amounts_are_rejected() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.001] {
            match Money::try_from_amount(bad) {
                Err(DomainError::Validation(_)) => {}
                other => panic!("expected validation error for {bad}, got {other:?}"),
            }
        }
    }

    #[test]
    fn parses_typed_amounts() {
        assert_eq!("150".parse::<Money>().unwrap(), Money::from_major(150));
        assert_eq!(" 99.5 ".parse::<Money>().unwrap(), Money::from_centavos(9_950));
        assert!(matches!("abc".parse::<Money>(), Err(DomainError::Validation(_))));
        assert!(matches!("".parse::<Money>(), Err(DomainError::Validation(_))));
        assert!(matches!("-20".parse::<Money>(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn checked_and_saturating_add_stop_at_the_bound() {
        let max = Money::from_centavos(u64::MAX);
        assert_eq!(max.checked_add(Money::from_centavos(1)), None);
        assert_eq!(max.saturating_add(Money::from_major(70)), max);
        assert_eq!(
            Money::from_major(70).checked_add(Money::from_major(30)),
            Some(Money::from_major(100))
        );
    }

    #[test]
    fn serializes_as_centavos() {
        let json = serde_json::to_string(&Money::from_major(30)).unwrap();
        assert_eq!(json, "3000");
    }

    proptest! {
        /// Property: subtracting a price and adding another equals the sum
        /// recomputed with the price replaced.
        #[test]
        fn delta_update_matches_resum(
            prices in prop::collection::vec(0u64..1_000_000u64, 1..20),
            idx in any::<prop::sample::Index>(),
            replacement in 0u64..1_000_000u64,
        ) {
            let mut prices: Vec<Money> = prices.into_iter().map(Money::from_centavos).collect();
            let total: Money = prices.iter().sum();

            let i = idx.index(prices.len());
            let delta_total = total.saturating_sub(prices[i]) + Money::from_centavos(replacement);
            prices[i] = Money::from_centavos(replacement);

            prop_assert_eq!(delta_total, prices.iter().sum::<Money>());
        }
    }
}
