//! Overlap detection against live reservations.

use chrono::{FixedOffset, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;

use crate::database::Database;
use crate::error::Result;
use crate::reservation::{Reservation, ResourceId};
use crate::window::TimeWindow;

/// One session of a request that collides with existing reservations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionConflict {
    /// Position of the session within the request.
    pub session_index: u32,
    /// The requested session window.
    pub window: TimeWindow,
    /// Local start date of the session in the requester's offset.
    pub date: NaiveDate,
    /// The live reservations it overlaps.
    pub existing: Vec<Reservation>,
}

impl SessionConflict {
    /// Calendar date of the conflicting session.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Decides whether a window is free on a field.
///
/// The checker reads through whatever connection it is given. Inside an
/// admission that is the admission's own transaction, so sessions inserted
/// earlier in the same admission are visible to later checks.
///
/// # Examples
///
/// ```no_run
/// use fieldbook::database::{Database, DatabaseConfig};
/// use fieldbook::operations::OverlapChecker;
/// use fieldbook::{ResourceId, TimeWindow};
///
/// let db = Database::open(DatabaseConfig::new("/tmp/fieldbook.db")).unwrap();
/// let window = TimeWindow::from_unix_secs(1_893_780_000, 1_893_783_600).unwrap();
/// let busy = OverlapChecker::new(db.connection())
///     .has_conflict(ResourceId(1), &window)
///     .unwrap();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OverlapChecker<'a> {
    conn: &'a Connection,
}

impl<'a> OverlapChecker<'a> {
    /// Creates a checker reading through `conn`.
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Returns `true` if a non-canceled, non-deleted reservation on
    /// `resource_id` satisfies `existing.start < window.end` and
    /// `existing.end > window.start`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    pub fn has_conflict(&self, resource_id: ResourceId, window: &TimeWindow) -> Result<bool> {
        Database::has_conflict(self.conn, resource_id, window)
    }

    /// Returns the reservations that make `window` unavailable.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    pub fn find_conflicts(
        &self,
        resource_id: ResourceId,
        window: &TimeWindow,
    ) -> Result<Vec<Reservation>> {
        Database::find_conflicts(self.conn, resource_id, window)
    }

    /// Checks every session and reports each one that is unavailable, dated
    /// in `offset`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if a query fails.
    pub fn conflicting_sessions<I>(
        &self,
        resource_id: ResourceId,
        sessions: I,
        offset: FixedOffset,
    ) -> Result<Vec<SessionConflict>>
    where
        I: IntoIterator<Item = TimeWindow>,
    {
        let mut conflicts = Vec::new();
        for (session_index, window) in (0_u32..).zip(sessions) {
            let existing = self.find_conflicts(resource_id, &window)?;
            if !existing.is_empty() {
                conflicts.push(SessionConflict {
                    session_index,
                    date: window.start_date_in(offset),
                    window,
                    existing,
                });
            }
        }
        Ok(conflicts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{
        create_test_database, create_test_resource, insert_test_reservation, window_at,
    };
    use crate::{RecurrenceExpander, ReservationStatus};

    #[test]
    fn test_boundary_sharing_is_not_a_conflict() {
        let mut db = create_test_database();
        let field = create_test_resource(&mut db, "A", 10);
        insert_test_reservation(&db, field.id(), window_at(10, 11));

        let checker = OverlapChecker::new(db.connection());
        assert!(!checker.has_conflict(field.id(), &window_at(11, 12)).unwrap());
        assert!(!checker.has_conflict(field.id(), &window_at(9, 10)).unwrap());
        assert!(checker.has_conflict(field.id(), &window_at(10, 11)).unwrap());
    }

    #[test]
    fn test_partial_overlap_is_a_conflict() {
        let mut db = create_test_database();
        let field = create_test_resource(&mut db, "A", 10);
        insert_test_reservation(&db, field.id(), window_at(10, 12));

        let half_past = crate::TimeWindow::new(
            window_at(10, 11).start() + chrono::Duration::minutes(30),
            window_at(11, 12).start() + chrono::Duration::minutes(30),
        )
        .unwrap();
        let checker = OverlapChecker::new(db.connection());
        assert!(checker.has_conflict(field.id(), &half_past).unwrap());
        assert_eq!(checker.find_conflicts(field.id(), &half_past).unwrap().len(), 1);
    }

    #[test]
    fn test_canceled_never_blocks() {
        let mut db = create_test_database();
        let field = create_test_resource(&mut db, "A", 10);
        let r = insert_test_reservation(&db, field.id(), window_at(10, 11));
        db.update_status(r.id().unwrap(), ReservationStatus::Canceled)
            .unwrap();

        let checker = OverlapChecker::new(db.connection());
        assert!(!checker.has_conflict(field.id(), &window_at(10, 11)).unwrap());
    }

    #[test]
    fn test_conflicting_sessions_reports_each_session() {
        let mut db = create_test_database();
        let field = create_test_resource(&mut db, "A", 10);
        let third_week = window_at(18, 19).shifted_by_days(14).unwrap();
        insert_test_reservation(&db, field.id(), third_week);

        let sessions = RecurrenceExpander::default()
            .expand(window_at(18, 19), true)
            .unwrap();
        let conflicts = OverlapChecker::new(db.connection())
            .conflicting_sessions(field.id(), sessions, FixedOffset::east_opt(0).unwrap())
            .unwrap();

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].session_index, 2);
        assert_eq!(conflicts[0].date(), third_week.start_date());
    }

    #[test]
    fn test_conflict_date_follows_offset() {
        let mut db = create_test_database();
        let field = create_test_resource(&mut db, "A", 10);
        insert_test_reservation(&db, field.id(), window_at(18, 19));

        // 18:00 UTC on the 4th is 01:00 on the 5th at +07:00
        let conflicts = OverlapChecker::new(db.connection())
            .conflicting_sessions(
                field.id(),
                [window_at(18, 19)],
                FixedOffset::east_opt(7 * 3600).unwrap(),
            )
            .unwrap();

        assert_eq!(conflicts[0].date(), NaiveDate::from_ymd_opt(2030, 3, 5).unwrap());
    }
}
