//! Property-based tests for session expansion and window overlap.

use super::{RecurrenceExpander, RecurrencePolicy, MAX_SESSION_COUNT, SESSION_INTERVAL_DAYS};
use crate::TimeWindow;
use proptest::prelude::*;

// 2000-01-01 .. 2100-01-01 in unix seconds
fn start_strategy() -> impl Strategy<Value = i64> {
    946_684_800_i64..4_102_444_800_i64
}

// Up to one day long
fn length_strategy() -> impl Strategy<Value = i64> {
    1_i64..=86_400
}

fn window_strategy() -> impl Strategy<Value = TimeWindow> {
    (start_strategy(), length_strategy())
        .prop_map(|(start, len)| TimeWindow::from_unix_secs(start, start + len).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Overlap is symmetric
    #[test]
    fn overlap_is_symmetric(a in window_strategy(), b in window_strategy()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    // A window always overlaps itself
    #[test]
    fn overlap_is_reflexive(a in window_strategy()) {
        prop_assert!(a.overlaps(&a));
    }

    // Windows that only touch never overlap
    #[test]
    fn adjacent_windows_never_overlap(start in start_strategy(), l1 in length_strategy(), l2 in length_strategy()) {
        let first = TimeWindow::from_unix_secs(start, start + l1).unwrap();
        let second = TimeWindow::from_unix_secs(start + l1, start + l1 + l2).unwrap();
        prop_assert!(!first.overlaps(&second));
    }

    // Recurring expansion has the configured length, fixed spacing and equal durations
    #[test]
    fn recurring_expansion_shape(window in window_strategy(), sessions in 1..=MAX_SESSION_COUNT) {
        let expander = RecurrenceExpander::new(RecurrencePolicy::new(sessions).unwrap());
        let expanded: Vec<_> = expander.expand(window, true).unwrap().collect();

        prop_assert_eq!(expanded.len(), sessions as usize);
        prop_assert_eq!(expanded[0], window);
        for pair in expanded.windows(2) {
            let gap = pair[1].start() - pair[0].start();
            prop_assert_eq!(gap.num_days(), SESSION_INTERVAL_DAYS);
            prop_assert_eq!(pair[1].duration(), pair[0].duration());
        }
    }

    // Sessions shorter than the interval never overlap each other
    #[test]
    fn sessions_are_pairwise_disjoint(window in window_strategy()) {
        let expanded: Vec<_> = RecurrenceExpander::default().expand(window, true).unwrap().collect();
        for (i, a) in expanded.iter().enumerate() {
            for b in &expanded[i + 1..] {
                prop_assert!(!a.overlaps(b));
            }
        }
    }

    // Non-recurring expansion is the identity
    #[test]
    fn single_expansion_is_identity(window in window_strategy(), sessions in 1..=MAX_SESSION_COUNT) {
        let expander = RecurrenceExpander::new(RecurrencePolicy::new(sessions).unwrap());
        let expanded: Vec<_> = expander.expand(window, false).unwrap().collect();
        prop_assert_eq!(expanded, vec![window]);
    }
}
