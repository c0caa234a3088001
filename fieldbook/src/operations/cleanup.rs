//! Sweeping unpaid reservations into `expired`.
//!
//! A `pending` reservation that has not been paid within the configured
//! age is moved to `expired`. Expired reservations keep blocking their
//! slot; the sweep only records that payment never arrived.
//!
//! The whole sweep runs in one IMMEDIATE transaction, so either every
//! stale reservation found is expired or none is.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ExpiryConfig;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::{Reservation, ReservationStatus};

/// Number of seconds in an hour, used for expiration thresholds.
const SECONDS_PER_HOUR: u64 = 3600;

/// Result of an expiry sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpireResult {
    /// Number of reservations expired (or that would be in dry-run mode).
    pub expired_count: usize,
    /// Reservations that were (or would be) expired.
    pub expired_reservations: Vec<Reservation>,
    /// Pending reservations created before this instant were swept.
    pub cutoff: Option<DateTime<Utc>>,
}

impl ExpireResult {
    fn empty() -> Self {
        Self {
            expired_count: 0,
            expired_reservations: Vec::new(),
            cutoff: None,
        }
    }
}

/// Cleanup operations for unpaid reservations.
///
/// All operations are static methods that work on a database instance.
pub struct CleanupOperations;

impl CleanupOperations {
    /// Expires `pending` reservations created more than `max_age` ago.
    ///
    /// # Arguments
    ///
    /// * `db` - Database to operate on
    /// * `max_age` - How long a reservation may stay unpaid
    /// * `dry_run` - If true, report what would be expired without writing
    ///
    /// # Errors
    ///
    /// Returns `Validation` if `max_age` is out of range, or an error if
    /// database operations fail.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use fieldbook::database::{Database, DatabaseConfig};
    /// use fieldbook::operations::CleanupOperations;
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/fieldbook.db")).unwrap();
    ///
    /// // Preview what would be expired
    /// let preview = CleanupOperations::expire_stale_pending(
    ///     &mut db,
    ///     Duration::from_secs(24 * 3600),
    ///     true,
    /// )
    /// .unwrap();
    /// println!("Would expire {} reservations", preview.expired_count);
    /// ```
    pub fn expire_stale_pending(
        db: &mut Database,
        max_age: Duration,
        dry_run: bool,
    ) -> Result<ExpireResult> {
        let cutoff = chrono::Duration::from_std(max_age)
            .ok()
            .and_then(|age| Utc::now().checked_sub_signed(age))
            .ok_or_else(|| Error::Validation {
                field: "expiry.pending_max_age_hours".into(),
                message: format!("maximum age of {}s is out of range", max_age.as_secs()),
            })?;

        let expired = if dry_run {
            Database::find_stale_pending(db.connection(), cutoff)?
        } else {
            db.in_immediate_transaction(|tx| {
                let stale = Database::find_stale_pending(tx, cutoff)?;
                let mut expired = Vec::with_capacity(stale.len());
                for reservation in stale {
                    let Some(id) = reservation.id() else { continue };
                    Database::update_status_simple(tx, id, ReservationStatus::Expired)?;
                    expired.push(Database::require_reservation(tx, id)?);
                }
                Ok(expired)
            })?
        };

        if !dry_run && !expired.is_empty() {
            log::info!(
                "expired {} pending reservation(s) created before {cutoff}",
                expired.len()
            );
        }

        Ok(ExpireResult {
            expired_count: expired.len(),
            expired_reservations: expired,
            cutoff: Some(cutoff),
        })
    }

    /// Runs the expiry sweep using the configured threshold.
    ///
    /// Returns an empty result when no threshold is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if database operations fail.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fieldbook::config::ExpiryConfig;
    /// use fieldbook::database::{Database, DatabaseConfig};
    /// use fieldbook::operations::CleanupOperations;
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/fieldbook.db")).unwrap();
    /// let config = ExpiryConfig {
    ///     pending_max_age_hours: Some(48),
    /// };
    /// let result = CleanupOperations::expire(&mut db, &config, false).unwrap();
    /// println!("Expired {} reservations", result.expired_count);
    /// ```
    pub fn expire(db: &mut Database, config: &ExpiryConfig, dry_run: bool) -> Result<ExpireResult> {
        let Some(hours) = config.pending_max_age_hours else {
            return Ok(ExpireResult::empty());
        };

        let max_age = Duration::from_secs(u64::from(hours) * SECONDS_PER_HOUR);
        Self::expire_stale_pending(db, max_age, dry_run)
    }
}
