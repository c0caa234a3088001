//! Charge computation for bookings.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::money::Money;
use crate::recurrence::RecurrencePolicy;
use crate::window::TimeWindow;
use crate::Result;

/// Derives charges from an hourly rate, a duration and a recurrence flag.
///
/// # Examples
///
/// ```
/// use fieldbook::{Money, PricingCalculator};
/// use rust_decimal::Decimal;
///
/// let pricing = PricingCalculator::default();
/// let rate = Money::from_units(35_000);
///
/// assert_eq!(pricing.price(rate, Decimal::ONE, false).unwrap(), Money::from_units(35_000));
/// assert_eq!(pricing.price(rate, Decimal::ONE, true).unwrap(), Money::from_units(140_000));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingCalculator {
    policy: RecurrencePolicy,
}

/// The charges of one admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    /// Charge for a single session.
    pub base: Money,
    /// Charge for the whole booking, carried by session 0.
    pub aggregate: Money,
    /// Number of sessions the aggregate covers.
    pub sessions: u32,
}

impl PricingCalculator {
    /// Creates a calculator that multiplies recurring bookings by the
    /// policy's session count.
    #[must_use]
    pub const fn new(policy: RecurrencePolicy) -> Self {
        Self { policy }
    }

    /// Computes `rate * duration_hours * sessions`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMoney` if the product overflows or `duration_hours`
    /// is negative.
    pub fn price(&self, rate: Money, duration_hours: Decimal, recurring: bool) -> Result<Money> {
        let sessions = Decimal::from(self.policy.session_count(recurring));
        let hours = duration_hours
            .checked_mul(sessions)
            .ok_or_else(|| crate::Error::InvalidMoney {
                value: duration_hours.to_string(),
                reason: "duration overflow".into(),
            })?;
        Ok(rate.checked_mul(hours)?)
    }

    /// Computes the per-session and aggregate charges for `window`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMoney` if a product overflows.
    pub fn quote(&self, rate: Money, window: &TimeWindow, recurring: bool) -> Result<Quote> {
        let hours = window.duration_hours();
        Ok(Quote {
            base: self.price(rate, hours, false)?,
            aggregate: self.price(rate, hours, recurring)?,
            sessions: self.policy.session_count(recurring),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_single_booking_price() {
        let rate = Money::from_units(35_000);
        let charge = PricingCalculator::default()
            .price(rate, dec!(1), false)
            .unwrap();
        assert_eq!(charge, Money::from_units(35_000));
    }

    #[test]
    fn test_recurring_price_multiplies_by_sessions() {
        let rate = Money::from_units(35_000);
        let charge = PricingCalculator::default()
            .price(rate, dec!(1), true)
            .unwrap();
        assert_eq!(charge, Money::from_units(140_000));

        let two = PricingCalculator::new(RecurrencePolicy::new(2).unwrap());
        assert_eq!(two.price(rate, dec!(1.5), true).unwrap(), Money::from_units(105_000));
    }

    #[test]
    fn test_fractional_hours_are_exact() {
        let rate: Money = "120.50".parse().unwrap();
        let charge = PricingCalculator::default()
            .price(rate, dec!(0.25), false)
            .unwrap();
        // 30.125 rounds away from zero
        assert_eq!(charge.amount(), dec!(30.13));
    }

    #[test]
    fn test_quote_for_window() {
        let window = TimeWindow::from_unix_secs(0, 5_400).unwrap();
        let quote = PricingCalculator::default()
            .quote(Money::from_units(100), &window, true)
            .unwrap();
        assert_eq!(quote.base, Money::from_units(150));
        assert_eq!(quote.aggregate, Money::from_units(600));
        assert_eq!(quote.sessions, 4);
    }

    #[test]
    fn test_zero_rate() {
        let charge = PricingCalculator::default()
            .price(Money::ZERO, dec!(3), true)
            .unwrap();
        assert!(charge.is_zero());
    }

    #[test]
    fn test_negative_duration_rejected() {
        let result = PricingCalculator::default().price(Money::from_units(10), dec!(-1), false);
        assert!(matches!(result, Err(crate::Error::InvalidMoney { .. })));
    }

    proptest! {
        // Recurring charge is exactly session_count times the single charge
        #[test]
        fn recurring_price_is_linear(rate in 0_u64..1_000_000, minutes in 1_i64..600, sessions in 1_u32..=52) {
            let pricing = PricingCalculator::new(RecurrencePolicy::new(sessions).unwrap());
            let hours = Decimal::from(minutes) / Decimal::from(60);
            let rate = Money::from_units(rate);
            let single = pricing.price(rate, hours, false).unwrap();
            let recurring = pricing.price(rate, hours, true).unwrap();
            let expected = rate.checked_mul(hours * Decimal::from(sessions)).unwrap();
            prop_assert_eq!(recurring, expected);
            prop_assert!(recurring >= single);
        }
    }
}
