//! Half-open booking windows.
//!
//! A [`TimeWindow`] is the `[start, end)` interval a reservation occupies on a
//! field. Two windows that merely touch (one ends exactly when the other
//! starts) do not overlap.

use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: i64 = 3600;

/// A half-open `[start, end)` interval in UTC, at one-second resolution.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use fieldbook::TimeWindow;
///
/// let ten = Utc.with_ymd_and_hms(2025, 3, 3, 10, 0, 0).unwrap();
/// let eleven = Utc.with_ymd_and_hms(2025, 3, 3, 11, 0, 0).unwrap();
/// let noon = Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap();
///
/// let first = TimeWindow::new(ten, eleven).unwrap();
/// let second = TimeWindow::new(eleven, noon).unwrap();
/// assert!(!first.overlaps(&second));
///
/// // An empty window is rejected
/// assert!(TimeWindow::new(ten, ten).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawWindow> for TimeWindow {
    type Error = InvalidWindowError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeWindow {
    /// Creates a window, truncating both bounds to whole seconds.
    ///
    /// # Errors
    ///
    /// Returns an error unless `end` is strictly after `start` once truncated.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, InvalidWindowError> {
        let start = start.trunc_subsecs(0);
        let end = end.trunc_subsecs(0);
        if end <= start {
            return Err(InvalidWindowError {
                reason: format!("end {} must be after start {}", end.to_rfc3339(), start.to_rfc3339()),
            });
        }
        Ok(Self { start, end })
    }

    /// Creates a window from unix timestamps in seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if either timestamp is out of range or the window is
    /// empty.
    pub fn from_unix_secs(start: i64, end: i64) -> Result<Self, InvalidWindowError> {
        let to_datetime = |secs: i64| {
            DateTime::from_timestamp(secs, 0).ok_or_else(|| InvalidWindowError {
                reason: format!("timestamp {secs} is out of range"),
            })
        };
        Self::new(to_datetime(start)?, to_datetime(end)?)
    }

    /// Inclusive start of the window.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end of the window.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Calendar date (UTC) on which the window starts.
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Calendar date on which the window starts, as seen at `offset`.
    ///
    /// ```
    /// use chrono::{FixedOffset, NaiveDate};
    /// use fieldbook::TimeWindow;
    ///
    /// // 2030-03-04 23:00 UTC is already 2030-03-05 at +07:00
    /// let window = TimeWindow::from_unix_secs(1_898_895_600, 1_898_899_200).unwrap();
    /// let bangkok = FixedOffset::east_opt(7 * 3600).unwrap();
    /// assert_eq!(window.start_date(), NaiveDate::from_ymd_opt(2030, 3, 4).unwrap());
    /// assert_eq!(window.start_date_in(bangkok), NaiveDate::from_ymd_opt(2030, 3, 5).unwrap());
    /// ```
    #[must_use]
    pub fn start_date_in(&self, offset: FixedOffset) -> NaiveDate {
        self.start.with_timezone(&offset).date_naive()
    }

    /// Returns `true` if the two windows share any instant.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Length of the window.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Length of the window in hours, as an exact decimal where possible.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldbook::TimeWindow;
    /// use rust_decimal::Decimal;
    ///
    /// let window = TimeWindow::from_unix_secs(0, 5400).unwrap();
    /// assert_eq!(window.duration_hours(), Decimal::new(15, 1));
    /// ```
    #[must_use]
    pub fn duration_hours(&self) -> Decimal {
        Decimal::from(self.duration().num_seconds()) / Decimal::from(SECONDS_PER_HOUR)
    }

    /// Returns this window moved forward by `days` whole days.
    ///
    /// # Errors
    ///
    /// Returns an error if the shifted window falls outside chrono's range.
    pub fn shifted_by_days(&self, days: i64) -> Result<Self, InvalidWindowError> {
        let offset = Duration::try_days(days).ok_or_else(|| InvalidWindowError {
            reason: format!("cannot shift by {days} days"),
        })?;
        let shift = |t: DateTime<Utc>| {
            t.checked_add_signed(offset).ok_or_else(|| InvalidWindowError {
                reason: format!("shifting {} by {days} days overflows", t.to_rfc3339()),
            })
        };
        Ok(Self {
            start: shift(self.start)?,
            end: shift(self.end)?,
        })
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M")
        )
    }
}

/// Error type for windows that do not end after they start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidWindowError {
    /// Why the window was rejected.
    pub reason: String,
}

impl fmt::Display for InvalidWindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid time window: {}", self.reason)
    }
}

impl std::error::Error for InvalidWindowError {}
