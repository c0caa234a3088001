//! Shared test utilities for database unit tests.

use chrono::{TimeZone, Utc};
use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};
use crate::{Money, RequesterId, Reservation, Resource, ResourceId, TimeWindow};

/// Creates a temporary test database that lives for the rest of the test run.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    db
}

/// Registers a field with a whole-unit hourly rate.
///
/// # Panics
///
/// Panics if the insert fails.
pub fn create_test_resource(db: &mut Database, name: &str, rate: u64) -> Resource {
    db.create_resource(name, Money::from_units(rate)).unwrap()
}

/// A window on Monday 2030-03-04 between two whole hours.
///
/// # Panics
///
/// Panics if `end_hour <= start_hour`.
#[must_use]
pub fn window_at(start_hour: u32, end_hour: u32) -> TimeWindow {
    TimeWindow::new(
        Utc.with_ymd_and_hms(2030, 3, 4, start_hour, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2030, 3, 4, end_hour, 0, 0).unwrap(),
    )
    .unwrap()
}

/// Inserts a pending zero-charge reservation directly, bypassing admission.
///
/// # Panics
///
/// Panics if the insert fails.
pub fn insert_test_reservation(db: &Database, resource: ResourceId, window: TimeWindow) -> Reservation {
    let r = Reservation::builder(resource, RequesterId(1), window)
        .build()
        .unwrap();
    Database::insert_reservation_simple(db.connection(), &r).unwrap()
}
