//! Reservation types for tracking field bookings.
//!
//! This module provides the identifiers, the status lifecycle and the
//! [`Reservation`] record with a builder for construction.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;
use crate::window::TimeWindow;

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Returns the raw integer value.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

integer_id!(
    /// Identifier of a stored reservation, assigned on insert.
    ReservationId
);

integer_id!(
    /// Identifier of a bookable field.
    ResourceId
);

integer_id!(
    /// Identifier of the user who requested a booking.
    RequesterId
);

/// Identifier shared by every session created by one admission.
///
/// # Examples
///
/// ```
/// use fieldbook::BookingGroupId;
///
/// let group = BookingGroupId::new();
/// let parsed: BookingGroupId = group.to_string().parse().unwrap();
/// assert_eq!(parsed, group);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingGroupId(Uuid);

impl BookingGroupId {
    /// Generates a fresh random group id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BookingGroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for BookingGroupId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for BookingGroupId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| ValidationError {
                field: "group_id".into(),
                message: e.to_string(),
            })
    }
}

impl fmt::Display for BookingGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Lifecycle state of a reservation.
///
/// Every reservation starts as `Pending`. The allowed moves are
/// `pending -> paid`, `pending -> canceled`, `paid -> canceled` and
/// `pending -> expired`.
///
/// # Examples
///
/// ```
/// use fieldbook::ReservationStatus;
///
/// let status: ReservationStatus = "paid".parse().unwrap();
/// assert!(status.can_transition_to(ReservationStatus::Canceled));
/// assert!(!status.can_transition_to(ReservationStatus::Pending));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Created, awaiting payment.
    Pending,
    /// Payment confirmed.
    Paid,
    /// Left unpaid past the expiry cut-off.
    Expired,
    /// Canceled administratively. The only status that frees the slot.
    Canceled,
}

impl ReservationStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Paid, Self::Expired, Self::Canceled];

    /// Returns the stored name of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Expired => "expired",
            Self::Canceled => "canceled",
        }
    }

    /// Returns `true` if a reservation in this status occupies its slot.
    #[must_use]
    pub const fn blocks_slot(self) -> bool {
        !matches!(self, Self::Canceled)
    }

    /// Returns `true` if moving from `self` to `to` is allowed.
    ///
    /// Staying in the same status is always allowed.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Pending | Self::Paid | Self::Canceled | Self::Expired)
                | (Self::Paid, Self::Paid | Self::Canceled)
                | (Self::Expired, Self::Expired)
                | (Self::Canceled, Self::Canceled)
        )
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "expired" => Ok(Self::Expired),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            other => Err(ValidationError {
                field: "status".into(),
                message: format!("unknown status '{other}'"),
            }),
        }
    }
}

/// A field booking.
///
/// Sessions created by one admission share a [`BookingGroupId`]; session 0
/// carries the charge for the whole group and later sessions carry zero.
///
/// # Examples
///
/// ```
/// use fieldbook::{Money, RequesterId, Reservation, ResourceId, TimeWindow};
///
/// let window = TimeWindow::from_unix_secs(1_741_024_800, 1_741_028_400).unwrap();
/// let reservation = Reservation::builder(ResourceId(1), RequesterId(9), window)
///     .charge(Money::from_units(35_000))
///     .build()
///     .unwrap();
///
/// assert_eq!(reservation.session_index(), 0);
/// assert!(reservation.id().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: Option<ReservationId>,
    resource_id: ResourceId,
    requester_id: RequesterId,
    window: TimeWindow,
    charge: Money,
    status: ReservationStatus,
    payment_proof_ref: Option<String>,
    group_id: BookingGroupId,
    session_index: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Creates a new reservation builder.
    #[must_use]
    pub fn builder(
        resource_id: ResourceId,
        requester_id: RequesterId,
        window: TimeWindow,
    ) -> ReservationBuilder {
        ReservationBuilder {
            id: None,
            resource_id,
            requester_id,
            window,
            charge: Money::ZERO,
            status: ReservationStatus::Pending,
            payment_proof_ref: None,
            group_id: None,
            session_index: 0,
            created_at: None,
            updated_at: None,
        }
    }

    /// Returns the storage id, or `None` before the record is inserted.
    #[must_use]
    pub const fn id(&self) -> Option<ReservationId> {
        self.id
    }

    /// Returns the booked field.
    #[must_use]
    pub const fn resource_id(&self) -> ResourceId {
        self.resource_id
    }

    /// Returns the requesting user.
    #[must_use]
    pub const fn requester_id(&self) -> RequesterId {
        self.requester_id
    }

    /// Returns the booked window.
    #[must_use]
    pub const fn window(&self) -> &TimeWindow {
        &self.window
    }

    /// Returns the charge attributed to this record.
    #[must_use]
    pub const fn charge(&self) -> Money {
        self.charge
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ReservationStatus {
        self.status
    }

    /// Returns the payment-proof reference, if one was attached.
    #[must_use]
    pub fn payment_proof_ref(&self) -> Option<&str> {
        self.payment_proof_ref.as_deref()
    }

    /// Returns the booking group this session belongs to.
    #[must_use]
    pub const fn group_id(&self) -> BookingGroupId {
        self.group_id
    }

    /// Returns the position of this session within its group.
    #[must_use]
    pub const fn session_index(&self) -> u32 {
        self.session_index
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` if this is the record that carries the group's charge.
    #[must_use]
    pub const fn is_payable(&self) -> bool {
        self.session_index == 0
    }

    /// Returns `true` if this reservation occupies its slot.
    #[must_use]
    pub const fn blocks_slot(&self) -> bool {
        self.status.blocks_slot()
    }

    /// Returns a copy carrying the storage id assigned on insert.
    #[must_use]
    pub(crate) fn with_id(mut self, id: ReservationId) -> Self {
        self.id = Some(id);
        self
    }
}

/// Builder for creating `Reservation` instances.
#[derive(Debug)]
pub struct ReservationBuilder {
    id: Option<ReservationId>,
    resource_id: ResourceId,
    requester_id: RequesterId,
    window: TimeWindow,
    charge: Money,
    status: ReservationStatus,
    payment_proof_ref: Option<String>,
    group_id: Option<BookingGroupId>,
    session_index: u32,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl ReservationBuilder {
    /// Sets the storage id. Used when loading stored records.
    #[must_use]
    pub const fn id(mut self, id: ReservationId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the charge.
    #[must_use]
    pub const fn charge(mut self, charge: Money) -> Self {
        self.charge = charge;
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn status(mut self, status: ReservationStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the payment-proof reference.
    ///
    /// The reference will be trimmed of leading/trailing whitespace.
    #[must_use]
    pub fn payment_proof_ref(mut self, reference: Option<String>) -> Self {
        self.payment_proof_ref = reference.map(|r| r.trim().to_string());
        self
    }

    /// Places this record in a booking group at the given position.
    #[must_use]
    pub const fn group(mut self, group_id: BookingGroupId, session_index: u32) -> Self {
        self.group_id = Some(group_id);
        self.session_index = session_index;
        self
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the last update timestamp.
    #[must_use]
    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Builds the reservation.
    ///
    /// A builder without an explicit group gets a fresh one.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The payment-proof reference is provided but is empty after trimming
    /// - A session other than the first carries a non-zero charge
    pub fn build(self) -> Result<Reservation, ValidationError> {
        if let Some(ref reference) = self.payment_proof_ref {
            if reference.is_empty() {
                return Err(ValidationError {
                    field: "payment_proof_ref".into(),
                    message: "payment proof reference must be non-empty after trimming whitespace"
                        .into(),
                });
            }
        }

        if self.session_index > 0 && !self.charge.is_zero() {
            return Err(ValidationError {
                field: "charge".into(),
                message: format!(
                    "session {} must carry a zero charge, only session 0 is payable",
                    self.session_index
                ),
            });
        }

        let now = Utc::now().trunc_subsecs(0);
        let created_at = self.created_at.unwrap_or(now);
        Ok(Reservation {
            id: self.id,
            resource_id: self.resource_id,
            requester_id: self.requester_id,
            window: self.window,
            charge: self.charge,
            status: self.status,
            payment_proof_ref: self.payment_proof_ref,
            group_id: self.group_id.unwrap_or_default(),
            session_index: self.session_index,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        })
    }
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod proptests;
