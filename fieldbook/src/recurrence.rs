//! Expansion of recurring ("member") bookings into weekly sessions.

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::window::{InvalidWindowError, TimeWindow};

/// Number of sessions a recurring booking creates unless configured otherwise.
pub const DEFAULT_SESSION_COUNT: u32 = 4;

/// Upper bound on the configurable session count (one year of weeks).
pub const MAX_SESSION_COUNT: u32 = 52;

/// Days between consecutive sessions of a recurring booking.
pub const SESSION_INTERVAL_DAYS: i64 = 7;

/// How many weekly sessions a recurring booking expands into.
///
/// # Examples
///
/// ```
/// use fieldbook::RecurrencePolicy;
///
/// assert_eq!(RecurrencePolicy::default().sessions(), 4);
/// assert!(RecurrencePolicy::new(0).is_err());
/// assert!(RecurrencePolicy::new(53).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrencePolicy {
    sessions: u32,
}

impl RecurrencePolicy {
    /// Creates a policy with the given session count.
    ///
    /// # Errors
    ///
    /// Returns a validation error unless `1 <= sessions <= 52`.
    pub fn new(sessions: u32) -> Result<Self> {
        if !(1..=MAX_SESSION_COUNT).contains(&sessions) {
            return Err(Error::Validation {
                field: "recurrence.sessions".into(),
                message: format!("must be between 1 and {MAX_SESSION_COUNT}, got {sessions}"),
            });
        }
        Ok(Self { sessions })
    }

    /// Number of sessions of a recurring booking.
    #[must_use]
    pub const fn sessions(&self) -> u32 {
        self.sessions
    }

    /// Number of sessions for a request with the given recurrence flag.
    #[must_use]
    pub const fn session_count(&self, recurring: bool) -> u32 {
        if recurring {
            self.sessions
        } else {
            1
        }
    }
}

impl Default for RecurrencePolicy {
    fn default() -> Self {
        Self {
            sessions: DEFAULT_SESSION_COUNT,
        }
    }
}

/// Turns a booking window into the ordered list of session windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecurrenceExpander {
    policy: RecurrencePolicy,
}

impl RecurrenceExpander {
    /// Creates an expander for the given policy.
    #[must_use]
    pub const fn new(policy: RecurrencePolicy) -> Self {
        Self { policy }
    }

    /// Expands `window` into its sessions.
    ///
    /// A non-recurring request yields the window itself. A recurring request
    /// yields one window per configured session, session `i` shifted by
    /// `7 * i` days.
    ///
    /// # Errors
    ///
    /// Returns an error if the last session would fall outside the
    /// representable date range.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use fieldbook::{RecurrenceExpander, TimeWindow};
    ///
    /// let start = Utc.with_ymd_and_hms(2025, 3, 3, 18, 0, 0).unwrap();
    /// let end = Utc.with_ymd_and_hms(2025, 3, 3, 19, 0, 0).unwrap();
    /// let window = TimeWindow::new(start, end).unwrap();
    ///
    /// let sessions: Vec<_> = RecurrenceExpander::default().expand(window, true).unwrap().collect();
    /// assert_eq!(sessions.len(), 4);
    /// assert_eq!(sessions[3].start().format("%Y-%m-%d").to_string(), "2025-03-24");
    /// ```
    pub fn expand(
        &self,
        window: TimeWindow,
        recurring: bool,
    ) -> std::result::Result<Sessions, InvalidWindowError> {
        let count = self.policy.session_count(recurring);
        window.shifted_by_days(SESSION_INTERVAL_DAYS * i64::from(count - 1))?;
        Ok(Sessions {
            base: window,
            next: 0,
            count,
        })
    }
}

/// Lazy iterator over the session windows of one booking.
///
/// A clone iterates independently from the point it was taken, so cloning a
/// fresh `Sessions` replays the whole booking.
#[derive(Debug, Clone)]
pub struct Sessions {
    base: TimeWindow,
    next: u32,
    count: u32,
}

impl Sessions {
    /// Total number of sessions, independent of iteration progress.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.count
    }
}

impl Iterator for Sessions {
    type Item = TimeWindow;

    fn next(&mut self) -> Option<TimeWindow> {
        if self.next >= self.count {
            return None;
        }
        let offset = SESSION_INTERVAL_DAYS * i64::from(self.next);
        self.next += 1;
        // The last offset was range-checked in `expand`.
        self.base.shifted_by_days(offset).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Sessions {}

impl FusedIterator for Sessions {}

#[cfg(test)]
mod proptests;
