//! Database CRUD operations for reservations.
//!
//! Functions taking a `&Connection` run on whatever connection or transaction
//! the caller passes in and open no transaction of their own. Methods taking
//! `&mut self` wrap their work in an IMMEDIATE transaction.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection};

use crate::error::{Error, Result};
use crate::money::Money;
use crate::reservation::{
    BookingGroupId, Reservation, ReservationId, ReservationStatus, ResourceId, ValidationError,
};
use crate::window::TimeWindow;

use super::connection::Database;
use super::filter::ReservationFilter;
use super::schema::{INSERT_RESERVATION, RESERVATION_COLUMNS, SLOT_CONFLICT_MESSAGE};

/// Converts a timestamp to unix seconds for database storage.
pub(super) fn datetime_to_unix_secs(time: DateTime<Utc>) -> i64 {
    time.timestamp()
}

/// Converts unix seconds from the database back to a timestamp.
pub(super) fn unix_secs_to_datetime(idx: usize, secs: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, secs))
}

/// Wraps a domain parse error as a column conversion failure.
pub(super) fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

/// Returns `true` if the error was raised by the overlap trigger.
pub(super) fn is_trigger_conflict(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, Some(msg))
            if e.code == rusqlite::ErrorCode::ConstraintViolation && msg == SLOT_CONFLICT_MESSAGE
    )
}

fn now_secs() -> i64 {
    datetime_to_unix_secs(Utc::now())
}

/// Deserializes a reservation from a row selected with `RESERVATION_COLUMNS`.
fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let id: i64 = row.get(0)?;
    let resource_id: i64 = row.get(1)?;
    let requester_id: i64 = row.get(2)?;
    let start: i64 = row.get(3)?;
    let end: i64 = row.get(4)?;
    let charge: String = row.get(5)?;
    let status: String = row.get(6)?;
    let payment_proof_ref: Option<String> = row.get(7)?;
    let group_id: String = row.get(8)?;
    let session_index: u32 = row.get(9)?;
    let created_secs: i64 = row.get(10)?;
    let updated_secs: i64 = row.get(11)?;

    let window = TimeWindow::from_unix_secs(start, end).map_err(|e| conversion_error(3, e))?;
    let charge = Money::from_str(&charge).map_err(|e| conversion_error(5, e))?;
    let status = ReservationStatus::from_str(&status).map_err(|e| conversion_error(6, e))?;
    let group_id = BookingGroupId::from_str(&group_id).map_err(|e| conversion_error(8, e))?;

    Reservation::builder(ResourceId(resource_id), requester_id.into(), window)
        .id(ReservationId(id))
        .charge(charge)
        .status(status)
        .payment_proof_ref(payment_proof_ref)
        .group(group_id, session_index)
        .created_at(unix_secs_to_datetime(10, created_secs)?)
        .updated_at(unix_secs_to_datetime(11, updated_secs)?)
        .build()
        .map_err(|e| conversion_error(0, e))
}

fn collect_reservations(
    conn: &Connection,
    sql: &str,
    values: Vec<Value>,
) -> Result<Vec<Reservation>> {
    let mut stmt = conn.prepare(sql)?;
    let reservations = stmt
        .query_map(params_from_iter(values), row_to_reservation)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(reservations)
}

// SQL statements for CRUD operations
const UPDATE_STATUS: &str = r"
    UPDATE reservations
    SET status = ?, updated_at = ?
    WHERE id = ? AND deleted_at IS NULL
";

const UPDATE_PAYMENT_PROOF: &str = r"
    UPDATE reservations
    SET payment_proof_ref = ?, updated_at = ?
    WHERE id = ? AND deleted_at IS NULL
";

const SOFT_DELETE: &str = r"
    UPDATE reservations
    SET deleted_at = ?, updated_at = ?
    WHERE id = ? AND deleted_at IS NULL
";

const COUNT_LIVE: &str = "SELECT COUNT(*) FROM reservations WHERE deleted_at IS NULL";

const CONFLICT_PREDICATE: &str = r"
    resource_id = ?
    AND status != 'canceled'
    AND deleted_at IS NULL
    AND start_time < ?
    AND end_time > ?
";

/// Trims a payment-proof reference, rejecting one that ends up empty.
pub(crate) fn payment_proof_reference(reference: &str) -> Result<&str> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(ValidationError {
            field: "payment_proof_ref".into(),
            message: "payment proof reference must be non-empty after trimming whitespace".into(),
        }
        .into());
    }
    Ok(reference)
}

impl Database {
    /// Inserts a reservation using an existing connection or transaction.
    ///
    /// Returns the stored record with its assigned id. The overlap trigger
    /// rejects a row that would collide with a live reservation, which is
    /// reported as [`Error::SlotConflict`].
    ///
    /// # Errors
    ///
    /// Returns `SlotConflict` if the storage trigger fires, or a storage
    /// error if the insert fails for any other reason.
    pub fn insert_reservation_simple(
        conn: &Connection,
        reservation: &Reservation,
    ) -> Result<Reservation> {
        let window = reservation.window();
        let result = conn.execute(
            INSERT_RESERVATION,
            params![
                reservation.resource_id().value(),
                reservation.requester_id().value(),
                datetime_to_unix_secs(window.start()),
                datetime_to_unix_secs(window.end()),
                reservation.charge().amount().to_string(),
                reservation.status().as_str(),
                reservation.payment_proof_ref(),
                reservation.group_id().to_string(),
                reservation.session_index(),
                datetime_to_unix_secs(reservation.created_at()),
                datetime_to_unix_secs(reservation.updated_at()),
            ],
        );

        match result {
            Ok(_) => Ok(reservation
                .clone()
                .with_id(ReservationId(conn.last_insert_rowid()))),
            Err(e) if is_trigger_conflict(&e) => Err(Error::SlotConflict {
                date: window.start_date(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Retrieves a live reservation by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails (other than "not found").
    pub fn get_reservation(conn: &Connection, id: ReservationId) -> Result<Option<Reservation>> {
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = ? AND deleted_at IS NULL"
        );
        let mut stmt = conn.prepare_cached(&sql)?;
        let mut rows = stmt.query_map([id.value()], row_to_reservation)?;

        match rows.next() {
            Some(Ok(reservation)) => Ok(Some(reservation)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    /// Like [`Database::get_reservation`] but fails when the record is missing.
    ///
    /// # Errors
    ///
    /// Returns `ReservationNotFound` if no live reservation has this id.
    pub fn require_reservation(conn: &Connection, id: ReservationId) -> Result<Reservation> {
        Self::get_reservation(conn, id)?.ok_or(Error::ReservationNotFound { id })
    }

    /// Lists live reservations matching `filter`, ordered by start time.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fieldbook::database::{Database, DatabaseConfig, ReservationFilter};
    /// use fieldbook::ResourceId;
    ///
    /// let db = Database::open(DatabaseConfig::new("/tmp/fieldbook.db")).unwrap();
    /// let filter = ReservationFilter::new().resource(ResourceId(1)).blocking_only();
    /// for r in Database::list_reservations(db.connection(), &filter).unwrap() {
    ///     println!("{} {}", r.window(), r.status());
    /// }
    /// ```
    pub fn list_reservations(
        conn: &Connection,
        filter: &ReservationFilter,
    ) -> Result<Vec<Reservation>> {
        let mut sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE deleted_at IS NULL");
        let mut values: Vec<Value> = Vec::new();

        if let Some(id) = filter.resource_id {
            sql.push_str(" AND resource_id = ?");
            values.push(Value::Integer(id.value()));
        }
        if let Some(id) = filter.requester_id {
            sql.push_str(" AND requester_id = ?");
            values.push(Value::Integer(id.value()));
        }
        if let Some(status) = filter.status {
            sql.push_str(" AND status = ?");
            values.push(Value::Text(status.as_str().to_string()));
        }
        if filter.exclude_canceled {
            sql.push_str(" AND status != 'canceled'");
        }
        if let Some(from) = filter.from {
            sql.push_str(" AND end_time > ?");
            values.push(Value::Integer(datetime_to_unix_secs(from)));
        }
        if let Some(to) = filter.to {
            sql.push_str(" AND start_time < ?");
            values.push(Value::Integer(datetime_to_unix_secs(to)));
        }
        if let Some(group) = filter.group_id {
            sql.push_str(" AND group_id = ?");
            values.push(Value::Text(group.to_string()));
        }

        sql.push_str(" ORDER BY start_time, id");

        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            values.push(Value::Integer(i64::from(limit)));
        }

        collect_reservations(conn, &sql, values)
    }

    /// Lists the live sessions of one booking group, in session order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_group(conn: &Connection, group_id: BookingGroupId) -> Result<Vec<Reservation>> {
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations
             WHERE group_id = ? AND deleted_at IS NULL
             ORDER BY session_index"
        );
        collect_reservations(conn, &sql, vec![Value::Text(group_id.to_string())])
    }

    /// Returns `true` if a live, non-canceled reservation on `resource_id`
    /// overlaps `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn has_conflict(conn: &Connection, resource_id: ResourceId, window: &TimeWindow) -> Result<bool> {
        let sql = format!("SELECT EXISTS (SELECT 1 FROM reservations WHERE {CONFLICT_PREDICATE})");
        let exists: bool = conn.prepare_cached(&sql)?.query_row(
            params![
                resource_id.value(),
                datetime_to_unix_secs(window.end()),
                datetime_to_unix_secs(window.start()),
            ],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Returns every live, non-canceled reservation on `resource_id` that
    /// overlaps `window`, ordered by start time.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_conflicts(
        conn: &Connection,
        resource_id: ResourceId,
        window: &TimeWindow,
    ) -> Result<Vec<Reservation>> {
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE {CONFLICT_PREDICATE} ORDER BY start_time, id"
        );
        collect_reservations(
            conn,
            &sql,
            vec![
                Value::Integer(resource_id.value()),
                Value::Integer(datetime_to_unix_secs(window.end())),
                Value::Integer(datetime_to_unix_secs(window.start())),
            ],
        )
    }

    /// Lists `pending` reservations created before `cutoff`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_stale_pending(conn: &Connection, cutoff: DateTime<Utc>) -> Result<Vec<Reservation>> {
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations
             WHERE status = 'pending' AND deleted_at IS NULL AND created_at < ?
             ORDER BY created_at, id"
        );
        collect_reservations(conn, &sql, vec![Value::Integer(datetime_to_unix_secs(cutoff))])
    }

    /// Counts live reservations.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_reservations(conn: &Connection) -> Result<i64> {
        Ok(conn.query_row(COUNT_LIVE, [], |row| row.get(0))?)
    }

    /// Sets the status of a live reservation without any lifecycle checks.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_status_simple(
        conn: &Connection,
        id: ReservationId,
        status: ReservationStatus,
    ) -> Result<bool> {
        let rows = conn.execute(UPDATE_STATUS, params![status.as_str(), now_secs(), id.value()])?;
        Ok(rows > 0)
    }

    /// Moves a reservation to `status`, enforcing the lifecycle.
    ///
    /// Setting the current status again succeeds without writing.
    ///
    /// # Errors
    ///
    /// Returns `ReservationNotFound`, `InvalidStatusTransition`, or a
    /// storage error.
    pub fn update_status(
        &mut self,
        id: ReservationId,
        status: ReservationStatus,
    ) -> Result<Reservation> {
        self.in_immediate_transaction(|tx| {
            let current = Self::require_reservation(tx, id)?;
            if current.status() == status {
                return Ok(current);
            }
            if !current.status().can_transition_to(status) {
                return Err(Error::InvalidStatusTransition {
                    from: current.status(),
                    to: status,
                });
            }
            Self::update_status_simple(tx, id, status)?;
            Self::require_reservation(tx, id)
        })
    }

    /// Records a payment-proof reference without opening a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn attach_payment_proof_simple(
        conn: &Connection,
        id: ReservationId,
        reference: &str,
    ) -> Result<bool> {
        let rows = conn.execute(UPDATE_PAYMENT_PROOF, params![reference, now_secs(), id.value()])?;
        Ok(rows > 0)
    }

    /// Records a payment-proof reference on a live reservation.
    ///
    /// The reference is trimmed; an existing reference is replaced.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty reference, `ReservationNotFound`,
    /// or a storage error.
    pub fn attach_payment_proof(&mut self, id: ReservationId, reference: &str) -> Result<Reservation> {
        let reference = payment_proof_reference(reference)?;
        self.in_immediate_transaction(|tx| {
            if !Self::attach_payment_proof_simple(tx, id, reference)? {
                return Err(Error::ReservationNotFound { id });
            }
            Self::require_reservation(tx, id)
        })
    }

    /// Soft-deletes a reservation without opening a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn soft_delete_simple(conn: &Connection, id: ReservationId) -> Result<bool> {
        let now = now_secs();
        let rows = conn.execute(SOFT_DELETE, params![now, now, id.value()])?;
        Ok(rows > 0)
    }

    /// Soft-deletes a reservation. The row stays in the table but is hidden
    /// from every query and no longer blocks its slot.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if a live reservation was deleted
    /// - `Ok(false)` if no live reservation has this id
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or update fails.
    pub fn soft_delete(&mut self, id: ReservationId) -> Result<bool> {
        self.in_immediate_transaction(|tx| Self::soft_delete_simple(tx, id))
    }

    /// Verifies database integrity using PRAGMA `integrity_check`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseCorruption` if the check reports problems.
    pub fn verify_integrity(&self) -> Result<()> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

        if result == "ok" {
            Ok(())
        } else {
            Err(Error::DatabaseCorruption {
                details: format!("integrity check failed: {result}"),
            })
        }
    }
}
