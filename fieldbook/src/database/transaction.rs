//! Transaction management utilities.
//!
//! Every write that must observe a consistent view of the reservations table
//! runs inside an IMMEDIATE transaction, which takes `SQLite`'s RESERVED lock
//! before the first read. Concurrent writers therefore queue on the lock
//! instead of racing between their overlap check and their insert.

use std::time::Duration;

use rusqlite::{Transaction, TransactionBehavior};

use crate::error::{Error, Result};

use super::connection::Database;

/// Rounds a busy timeout up to whole seconds for error reporting.
fn timeout_secs(timeout: Duration) -> u64 {
    timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0)
}

/// Returns `true` if a `SQLite` error means the lock was not obtained.
pub(crate) fn is_lock_error(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if matches!(e.code, rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked)
    )
}

/// Converts lock contention into [`Error::LockTimeout`], leaving other
/// errors untouched.
pub(crate) fn map_lock_error(err: Error, timeout: Duration) -> Error {
    match err {
        Error::Storage(ref e) if is_lock_error(e) => Error::LockTimeout {
            seconds: timeout_secs(timeout),
        },
        other => other,
    }
}

impl Database {
    /// Begins an IMMEDIATE transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockTimeout`] if another writer holds the lock past
    /// the busy timeout, or a storage error.
    pub fn immediate_transaction(&mut self) -> Result<Transaction<'_>> {
        let timeout = self.config.busy_timeout;
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| map_lock_error(e.into(), timeout))
    }

    /// Runs `f` inside an IMMEDIATE transaction.
    ///
    /// The transaction commits only if `f` returns `Ok`; on any error it is
    /// rolled back when dropped and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, a lock timeout, or a commit failure.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fieldbook::database::{Database, DatabaseConfig};
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/fieldbook.db")).unwrap();
    /// let count = db
    ///     .in_immediate_transaction(|tx| Database::count_reservations(tx))
    ///     .unwrap();
    /// ```
    pub fn in_immediate_transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let timeout = self.config.busy_timeout;
        let tx = self.immediate_transaction()?;
        let value = f(&tx).map_err(|e| map_lock_error(e, timeout))?;
        tx.commit().map_err(|e| map_lock_error(e.into(), timeout))?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, create_test_resource, window_at};
    use crate::database::DatabaseConfig;
    use crate::{RequesterId, Reservation};
    use tempfile::tempdir;

    #[test]
    fn test_timeout_secs_rounds_up() {
        assert_eq!(timeout_secs(Duration::from_millis(5000)), 5);
        assert_eq!(timeout_secs(Duration::from_millis(1500)), 2);
        assert_eq!(timeout_secs(Duration::from_millis(10)), 1);
    }

    #[test]
    fn test_transaction_commits_on_ok() {
        let mut db = create_test_database();
        let field = create_test_resource(&mut db, "A", 100);

        db.in_immediate_transaction(|tx| {
            let r = Reservation::builder(field.id(), RequesterId(1), window_at(10, 11))
                .build()?;
            Database::insert_reservation_simple(tx, &r)
        })
        .unwrap();

        assert_eq!(Database::count_reservations(db.connection()).unwrap(), 1);
    }

    #[test]
    fn test_transaction_rolls_back_on_err() {
        let mut db = create_test_database();
        let field = create_test_resource(&mut db, "A", 100);

        let result: Result<()> = db.in_immediate_transaction(|tx| {
            let r = Reservation::builder(field.id(), RequesterId(1), window_at(10, 11))
                .build()?;
            Database::insert_reservation_simple(tx, &r)?;
            Err(Error::Validation {
                field: "test".into(),
                message: "abort".into(),
            })
        });

        assert!(result.is_err());
        assert_eq!(Database::count_reservations(db.connection()).unwrap(), 0);
    }

    #[test]
    fn test_held_lock_maps_to_lock_timeout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let mut holder = Database::open(DatabaseConfig::new(&path)).unwrap();
        let mut waiter = Database::open(
            DatabaseConfig::new(&path).with_busy_timeout(Duration::from_millis(50)),
        )
        .unwrap();

        let _tx = holder.immediate_transaction().unwrap();
        let err = waiter.immediate_transaction().unwrap_err();
        assert!(matches!(err, Error::LockTimeout { seconds: 1 }));
        assert!(err.is_busy());
    }
}
