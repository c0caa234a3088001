//! Fixed-point monetary amounts.
//!
//! Charges and hourly rates are carried as [`rust_decimal::Decimal`] so that
//! multi-session aggregation never accumulates floating-point drift.

use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places kept on every stored amount.
pub const MONEY_SCALE: u32 = 2;

/// A non-negative monetary amount with two decimal places.
///
/// # Examples
///
/// ```
/// use fieldbook::Money;
///
/// let rate: Money = "35000".parse().unwrap();
/// assert_eq!(rate.to_string(), "35000.00");
///
/// // Negative amounts are rejected
/// assert!("-1".parse::<Money>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates an amount, rounding to [`MONEY_SCALE`] places.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative.
    pub fn new(amount: Decimal) -> Result<Self, InvalidMoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(InvalidMoneyError {
                value: amount.to_string(),
                reason: "amount must not be negative".into(),
            });
        }
        Ok(Self(
            amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero),
        ))
    }

    /// Creates an amount from a whole number of currency units.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldbook::Money;
    ///
    /// assert_eq!(Money::from_units(35_000).to_string(), "35000.00");
    /// ```
    #[must_use]
    pub fn from_units(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    /// Returns the underlying decimal amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Multiplies by a non-negative factor, rounding the result.
    ///
    /// # Errors
    ///
    /// Returns an error on overflow or if `factor` is negative.
    pub fn checked_mul(self, factor: Decimal) -> Result<Self, InvalidMoneyError> {
        let product = self.0.checked_mul(factor).ok_or_else(|| InvalidMoneyError {
            value: format!("{} x {factor}", self.0),
            reason: "amount overflow".into(),
        })?;
        Self::new(product)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = InvalidMoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl FromStr for Money {
    type Err = InvalidMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|e| InvalidMoneyError {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Self::new(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Error type for amounts that cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMoneyError {
    /// The offending value, as written.
    pub value: String,
    /// Why the value was rejected.
    pub reason: String,
}

impl fmt::Display for InvalidMoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid amount {}: {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidMoneyError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_rounds_to_two_places() {
        let m = Money::new(dec!(10.005)).unwrap();
        assert_eq!(m.amount(), dec!(10.01));
    }

    #[test]
    fn test_money_rejects_negative() {
        let err = Money::new(dec!(-0.01)).unwrap_err();
        assert!(err.reason.contains("negative"));
    }

    #[test]
    fn test_money_accepts_zero() {
        assert!(Money::new(Decimal::ZERO).unwrap().is_zero());
        assert!(Money::new(dec!(-0)).unwrap().is_zero());
    }

    #[test]
    fn test_money_parse() {
        let m: Money = " 35000.5 ".parse().unwrap();
        assert_eq!(m.amount(), dec!(35000.5));
        assert_eq!(m.to_string(), "35000.50");
        assert!("abc".parse::<Money>().is_err());
    }

    #[test]
    fn test_money_checked_mul() {
        let rate = Money::from_units(35_000);
        assert_eq!(rate.checked_mul(dec!(1.5)).unwrap().amount(), dec!(52500));
        assert!(rate.checked_mul(dec!(-1)).is_err());
        assert!(Money::new(Decimal::MAX)
            .unwrap()
            .checked_mul(dec!(2))
            .is_err());
    }

    #[test]
    fn test_money_add() {
        let total = Money::from_units(10) + Money::new(dec!(0.25)).unwrap();
        assert_eq!(total.to_string(), "10.25");
    }

    #[test]
    fn test_money_serde_as_string() {
        let m = Money::from_units(140_000);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"140000\"");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
        assert!(serde_json::from_str::<Money>("\"-5\"").is_err());
    }
}
