//! Lifecycle changes on existing reservations.
//!
//! Allowed moves are `pending -> paid`, `pending -> canceled`,
//! `paid -> canceled` and `pending -> expired`. Requesting the current
//! status again is a no-op. Only `canceled` releases the slot.

use serde::Serialize;

use crate::database::{payment_proof_reference, Database};
use crate::error::{Error, Result};
use crate::reservation::{BookingGroupId, Reservation, ReservationId, ReservationStatus};

/// Result of canceling a whole booking group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupCancelResult {
    /// Sessions that moved to `canceled`.
    pub canceled: Vec<Reservation>,
    /// Sessions left alone because they were already canceled or expired.
    pub skipped: Vec<Reservation>,
}

impl GroupCancelResult {
    /// Returns `true` if the group had no live sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.canceled.is_empty() && self.skipped.is_empty()
    }
}

/// Status transitions for reservations.
///
/// All operations are static methods that work on a database instance.
///
/// # Examples
///
/// ```no_run
/// use fieldbook::database::{Database, DatabaseConfig};
/// use fieldbook::operations::StatusOperations;
/// use fieldbook::{ReservationId, ReservationStatus};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/fieldbook.db")).unwrap();
/// StatusOperations::attach_payment_proof(&mut db, ReservationId(1), "TRX-991").unwrap();
/// let paid = StatusOperations::mark_paid(&mut db, ReservationId(1)).unwrap();
/// assert_eq!(paid.status(), ReservationStatus::Paid);
/// ```
pub struct StatusOperations;

impl StatusOperations {
    /// Moves a reservation to `status`.
    ///
    /// # Errors
    ///
    /// Returns `ReservationNotFound`, `InvalidStatusTransition`, or a
    /// storage error.
    pub fn set_status(
        db: &mut Database,
        id: ReservationId,
        status: ReservationStatus,
    ) -> Result<Reservation> {
        let updated = db.update_status(id, status)?;
        log::debug!("reservation {id} is now {}", updated.status());
        Ok(updated)
    }

    /// Confirms payment of a pending reservation.
    ///
    /// # Errors
    ///
    /// See [`StatusOperations::set_status`].
    pub fn mark_paid(db: &mut Database, id: ReservationId) -> Result<Reservation> {
        Self::set_status(db, id, ReservationStatus::Paid)
    }

    /// Cancels a pending or paid reservation, freeing its slot.
    ///
    /// # Errors
    ///
    /// See [`StatusOperations::set_status`].
    pub fn cancel(db: &mut Database, id: ReservationId) -> Result<Reservation> {
        Self::set_status(db, id, ReservationStatus::Canceled)
    }

    /// Marks an unpaid reservation as expired. The slot stays taken.
    ///
    /// # Errors
    ///
    /// See [`StatusOperations::set_status`].
    pub fn expire(db: &mut Database, id: ReservationId) -> Result<Reservation> {
        Self::set_status(db, id, ReservationStatus::Expired)
    }

    /// Cancels every live session of a booking group in one transaction.
    ///
    /// Sessions that cannot move to `canceled` are reported as skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a query or update fails; nothing is changed in
    /// that case.
    pub fn cancel_group(db: &mut Database, group_id: BookingGroupId) -> Result<GroupCancelResult> {
        let result = db.in_immediate_transaction(|tx| {
            let mut result = GroupCancelResult::default();
            for session in Database::list_group(tx, group_id)? {
                if !session.status().can_transition_to(ReservationStatus::Canceled) {
                    result.skipped.push(session);
                    continue;
                }
                let Some(id) = session.id() else {
                    result.skipped.push(session);
                    continue;
                };
                Database::update_status_simple(tx, id, ReservationStatus::Canceled)?;
                result.canceled.push(Database::require_reservation(tx, id)?);
            }
            Ok(result)
        })?;

        log::info!(
            "group {group_id}: canceled {} session(s), skipped {}",
            result.canceled.len(),
            result.skipped.len()
        );
        Ok(result)
    }

    /// Records a payment-proof reference on a reservation.
    ///
    /// Only sessions that carry a charge accept a proof.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty reference or a zero-charge session,
    /// `ReservationNotFound`, or a storage error.
    pub fn attach_payment_proof(
        db: &mut Database,
        id: ReservationId,
        reference: &str,
    ) -> Result<Reservation> {
        let reference = payment_proof_reference(reference)?;
        db.in_immediate_transaction(|tx| {
            let current = Database::require_reservation(tx, id)?;
            if !current.is_payable() {
                return Err(Error::Validation {
                    field: "payment_proof_ref".into(),
                    message: format!(
                        "session {} of group {} carries no charge; attach the proof to session 0",
                        current.session_index(),
                        current.group_id()
                    ),
                });
            }
            Database::attach_payment_proof_simple(tx, id, reference)?;
            Database::require_reservation(tx, id)
        })
    }
}
