//! Error types for the fieldbook library.
//!
//! This module provides the error hierarchy for every operation in the
//! library, using `thiserror` for ergonomic error handling.

use chrono::NaiveDate;
use thiserror::Error;

use crate::reservation::{ReservationId, ReservationStatus, ResourceId};

/// Result type alias for operations that may fail with a fieldbook error.
///
/// # Examples
///
/// ```
/// use fieldbook::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(4)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the fieldbook library.
///
/// The first four variants form the admission taxonomy: a request is either
/// malformed (`InvalidWindow`), names an unknown field (`ResourceNotFound`),
/// collides with an existing booking (`SlotConflict`), or fails in storage
/// (`Storage`). Every admission error is terminal and leaves no partial group
/// behind.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested window does not end strictly after it starts.
    #[error("invalid time window: {reason}")]
    InvalidWindow {
        /// Why the window was rejected.
        reason: String,
    },

    /// The referenced resource (field) does not exist.
    #[error("field {id} not found")]
    ResourceNotFound {
        /// The missing resource id.
        id: ResourceId,
    },

    /// A session of the request overlaps an existing live reservation.
    #[error("slot on {} is already booked", date.format("%d-%m-%Y"))]
    SlotConflict {
        /// Local start date of the first conflicting session.
        date: NaiveDate,
    },

    /// A storage error occurred. The surrounding transaction is rolled back.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// The referenced reservation does not exist.
    #[error("reservation {id} not found")]
    ReservationNotFound {
        /// The missing reservation id.
        id: ReservationId,
    },

    /// A status change that the reservation lifecycle does not allow.
    #[error("cannot change reservation status from {from} to {to}")]
    InvalidStatusTransition {
        /// The current status.
        from: ReservationStatus,
        /// The requested status.
        to: ReservationStatus,
    },

    /// A monetary amount could not be represented.
    #[error("invalid amount {value}: {reason}")]
    InvalidMoney {
        /// The offending value, as written.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The write lock could not be acquired within the busy timeout.
    #[error("database lock timeout after {seconds}s")]
    LockTimeout {
        /// The number of seconds waited before timing out.
        seconds: u64,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: i32,
        /// The schema version found in the database.
        found: i32,
    },
}

impl From<crate::window::InvalidWindowError> for Error {
    fn from(err: crate::window::InvalidWindowError) -> Self {
        Self::InvalidWindow { reason: err.reason }
    }
}

impl From<crate::money::InvalidMoneyError> for Error {
    fn from(err: crate::money::InvalidMoneyError) -> Self {
        Self::InvalidMoney {
            value: err.value,
            reason: err.reason,
        }
    }
}

impl From<crate::reservation::ValidationError> for Error {
    fn from(err: crate::reservation::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl Error {
    /// Check if error is a slot conflict.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use fieldbook::Error;
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
    /// assert!(Error::SlotConflict { date }.is_slot_conflict());
    /// ```
    #[must_use]
    pub fn is_slot_conflict(&self) -> bool {
        matches!(self, Self::SlotConflict { .. })
    }

    /// Check if error means the database stayed locked past the busy timeout.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        match self {
            Self::LockTimeout { .. } => true,
            Self::Storage(rusqlite::Error::SqliteFailure(e, _)) => matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}
