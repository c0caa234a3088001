//! Shared database test utilities.

use std::path::PathBuf;

use fieldbook::database::{Database, DatabaseConfig};
use fieldbook::{Money, Resource};

/// Creates a temporary test database that will live for the rest of the run.
#[allow(dead_code)]
pub fn create_test_database() -> Database {
    Database::open(DatabaseConfig::new(create_test_database_path())).unwrap()
}

/// Returns a database path inside a fresh temporary directory.
///
/// Several connections can be opened on the same path to simulate
/// independent writers.
#[allow(dead_code)]
pub fn create_test_database_path() -> PathBuf {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    path
}

/// Registers a field with a whole-unit hourly rate.
#[allow(dead_code)]
pub fn create_field(db: &mut Database, name: &str, rate: u64) -> Resource {
    db.create_resource(name, Money::from_units(rate)).unwrap()
}
