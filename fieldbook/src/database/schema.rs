//! Database schema definitions and SQL constants.
//!
//! This module contains all SQL table definitions, indices, triggers and
//! constants related to the database schema for fieldbook.

/// Current schema version for the database.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the database and the application.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Message raised by the overlap trigger.
pub const SLOT_CONFLICT_MESSAGE: &str = "slot conflict";

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the resources table.
///
/// Hourly rates are stored as decimal TEXT to avoid floating-point rounding.
pub const CREATE_RESOURCES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS resources (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        hourly_rate TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        deleted_at INTEGER
    )";

/// SQL statement to create the reservations table.
///
/// Times are unix seconds. `start_time`/`end_time` describe the half-open
/// window `[start_time, end_time)`.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        resource_id INTEGER NOT NULL REFERENCES resources(id),
        requester_id INTEGER NOT NULL,
        start_time INTEGER NOT NULL,
        end_time INTEGER NOT NULL,
        charge TEXT NOT NULL,
        status TEXT NOT NULL
            CHECK (status IN ('pending', 'paid', 'expired', 'canceled')),
        payment_proof_ref TEXT,
        group_id TEXT NOT NULL,
        session_index INTEGER NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL,
        deleted_at INTEGER,
        CHECK (end_time > start_time)
    )";

/// SQL statement to create the index used by overlap checks.
pub const CREATE_RESOURCE_WINDOW_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_reservations_resource_window ON reservations(resource_id, start_time, end_time)";

/// SQL statement to create an index on the requester column.
pub const CREATE_REQUESTER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_requester ON reservations(requester_id)";

/// SQL statement to create an index on the group column.
pub const CREATE_GROUP_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_group ON reservations(group_id, session_index)";

/// SQL statement to create an index used by the pending-expiry sweep.
pub const CREATE_STATUS_CREATED_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_status_created ON reservations(status, created_at)";

/// Trigger rejecting any live row that would overlap another live row on the
/// same resource. Raises `SLOT_CONFLICT_MESSAGE`.
pub const CREATE_OVERLAP_TRIGGER: &str = r"
    CREATE TRIGGER IF NOT EXISTS reservations_no_overlap
    BEFORE INSERT ON reservations
    WHEN NEW.status != 'canceled' AND NEW.deleted_at IS NULL
    BEGIN
        SELECT RAISE(ABORT, 'slot conflict')
        WHERE EXISTS (
            SELECT 1 FROM reservations
            WHERE resource_id = NEW.resource_id
              AND status != 'canceled'
              AND deleted_at IS NULL
              AND start_time < NEW.end_time
              AND end_time > NEW.start_time
        );
    END";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// Column list shared by every reservation SELECT, in `row_to_reservation`
/// order.
pub const RESERVATION_COLUMNS: &str = "id, resource_id, requester_id, start_time, end_time, charge, status, payment_proof_ref, group_id, session_index, created_at, updated_at";

/// SQL statement to insert a reservation.
pub const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations
    (resource_id, requester_id, start_time, end_time, charge, status,
     payment_proof_ref, group_id, session_index, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

/// SQL statement to insert a resource.
pub const INSERT_RESOURCE: &str =
    "INSERT INTO resources (name, hourly_rate, created_at) VALUES (?, ?, ?)";
