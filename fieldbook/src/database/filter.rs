//! Query filters for listing reservations.

use chrono::{DateTime, Utc};

use crate::reservation::{BookingGroupId, RequesterId, ReservationStatus, ResourceId};

/// Criteria for [`Database::list_reservations`](super::Database::list_reservations).
///
/// Every criterion is optional and they combine with AND. `from`/`to` select
/// reservations whose window intersects `[from, to)`.
///
/// # Examples
///
/// ```
/// use fieldbook::database::ReservationFilter;
/// use fieldbook::{ReservationStatus, ResourceId};
///
/// let filter = ReservationFilter::new()
///     .resource(ResourceId(1))
///     .status(ReservationStatus::Pending);
/// assert_eq!(filter.resource_id, Some(ResourceId(1)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationFilter {
    /// Only reservations on this field.
    pub resource_id: Option<ResourceId>,
    /// Only reservations made by this requester.
    pub requester_id: Option<RequesterId>,
    /// Only reservations in this status.
    pub status: Option<ReservationStatus>,
    /// Drop canceled reservations.
    pub exclude_canceled: bool,
    /// Only reservations ending after this instant.
    pub from: Option<DateTime<Utc>>,
    /// Only reservations starting before this instant.
    pub to: Option<DateTime<Utc>>,
    /// Only sessions of this booking group.
    pub group_id: Option<BookingGroupId>,
    /// Maximum number of rows returned.
    pub limit: Option<u32>,
}

impl ReservationFilter {
    /// Creates a filter matching every live reservation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one field.
    #[must_use]
    pub const fn resource(mut self, id: ResourceId) -> Self {
        self.resource_id = Some(id);
        self
    }

    /// Restricts to one requester.
    #[must_use]
    pub const fn requester(mut self, id: RequesterId) -> Self {
        self.requester_id = Some(id);
        self
    }

    /// Restricts to one status.
    #[must_use]
    pub const fn status(mut self, status: ReservationStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Drops canceled reservations, keeping only those that occupy a slot.
    #[must_use]
    pub const fn blocking_only(mut self) -> Self {
        self.exclude_canceled = true;
        self
    }

    /// Restricts to reservations intersecting `[from, to)`. Either bound may
    /// be left open.
    #[must_use]
    pub const fn between(mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Restricts to one booking group.
    #[must_use]
    pub const fn group(mut self, group_id: BookingGroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }

    /// Caps the number of rows returned.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}
