//! Property-based tests for reservation statuses and the builder.

use super::{BookingGroupId, RequesterId, Reservation, ReservationStatus, ResourceId};
use crate::{Money, TimeWindow};
use proptest::prelude::*;

fn status_strategy() -> impl Strategy<Value = ReservationStatus> {
    prop::sample::select(ReservationStatus::ALL.to_vec())
}

fn window_strategy() -> impl Strategy<Value = TimeWindow> {
    (0_i64..4_000_000_000, 1_i64..86_400)
        .prop_map(|(start, len)| TimeWindow::from_unix_secs(start, start + len).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    // Display and FromStr agree for every status, regardless of case
    #[test]
    fn status_roundtrip_any_case(status in status_strategy(), upper in any::<bool>()) {
        let text = if upper { status.as_str().to_uppercase() } else { status.as_str().to_string() };
        prop_assert_eq!(text.parse::<ReservationStatus>().unwrap(), status);
    }

    // Staying put is always allowed
    #[test]
    fn same_status_is_noop(status in status_strategy()) {
        prop_assert!(status.can_transition_to(status));
    }

    // Nothing ever returns to pending, and canceled/expired are terminal
    #[test]
    fn terminal_statuses(from in status_strategy(), to in status_strategy()) {
        if from != to {
            prop_assert!(!from.can_transition_to(ReservationStatus::Pending) || from == ReservationStatus::Pending);
            if matches!(from, ReservationStatus::Canceled | ReservationStatus::Expired) {
                prop_assert!(!from.can_transition_to(to));
            }
        }
    }

    // Only session 0 may carry a charge
    #[test]
    fn builder_enforces_payable_session(window in window_strategy(), index in 0_u32..52, units in 0_u64..1_000_000) {
        let result = Reservation::builder(ResourceId(1), RequesterId(1), window)
            .group(BookingGroupId::new(), index)
            .charge(Money::from_units(units))
            .build();
        prop_assert_eq!(result.is_ok(), index == 0 || units == 0);
    }
}
