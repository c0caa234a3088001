//! Admission of new bookings.
//!
//! Admission turns a request into one reservation per session. The whole
//! booking is decided inside a single IMMEDIATE transaction: the field is
//! looked up, the charge is quoted, and every session is checked and
//! inserted before anything commits. A conflict on any session rolls the
//! booking back, so a recurring request is all-or-nothing.

use chrono::{FixedOffset, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::{Error, Result};
use crate::money::Money;
use crate::pricing::{PricingCalculator, Quote};
use crate::recurrence::{RecurrenceExpander, RecurrencePolicy};
use crate::reservation::{BookingGroupId, RequesterId, Reservation, ResourceId};
use crate::resource::Resource;
use crate::window::TimeWindow;

use super::overlap::{OverlapChecker, SessionConflict};

/// A request to book a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionRequest {
    /// The field to book.
    pub resource_id: ResourceId,
    /// Who is booking.
    pub requester_id: RequesterId,
    /// The first (or only) session.
    pub window: TimeWindow,
    /// Whether the booking repeats weekly.
    #[serde(default)]
    pub recurring: bool,
    /// The requester's UTC offset in seconds. Conflict dates are reported
    /// in this offset.
    #[serde(default)]
    pub utc_offset_secs: i32,
}

impl AdmissionRequest {
    /// Creates a single-session request.
    #[must_use]
    pub const fn new(resource_id: ResourceId, requester_id: RequesterId, window: TimeWindow) -> Self {
        Self {
            resource_id,
            requester_id,
            window,
            recurring: false,
            utc_offset_secs: 0,
        }
    }

    /// Marks the request as a weekly recurring booking.
    #[must_use]
    pub const fn with_recurring(mut self, recurring: bool) -> Self {
        self.recurring = recurring;
        self
    }

    /// Sets the offset the requester's local dates are expressed in.
    #[must_use]
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset_secs = offset.local_minus_utc();
        self
    }

    /// The requester's UTC offset.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the stored offset is a day or more.
    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_secs).ok_or_else(|| Error::Validation {
            field: "utc_offset_secs".into(),
            message: format!("{} seconds is not a valid UTC offset", self.utc_offset_secs),
        })
    }
}

/// What an admission would do, computed without writing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdmissionPlan {
    /// The field being booked.
    pub resource: Resource,
    /// The charges the booking would carry.
    pub quote: Quote,
    /// Every session window in order.
    pub sessions: Vec<TimeWindow>,
    /// Sessions that are already taken.
    pub conflicts: Vec<SessionConflict>,
}

impl AdmissionPlan {
    /// Returns `true` if every session is free.
    #[must_use]
    pub fn is_admissible(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Dates of the sessions that are already taken.
    #[must_use]
    pub fn conflict_dates(&self) -> Vec<NaiveDate> {
        self.conflicts.iter().map(SessionConflict::date).collect()
    }
}

/// A committed booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Admission {
    /// Identifier shared by every session.
    pub group_id: BookingGroupId,
    /// The charges that were recorded.
    pub quote: Quote,
    /// The stored sessions in order. Never empty.
    pub reservations: Vec<Reservation>,
}

impl Admission {
    /// The session that carries the charge.
    #[must_use]
    pub fn first(&self) -> Option<&Reservation> {
        self.reservations.first()
    }
}

/// Admits booking requests against a database.
///
/// # Examples
///
/// ```no_run
/// use chrono::{TimeZone, Utc};
/// use fieldbook::database::{Database, DatabaseConfig};
/// use fieldbook::operations::{AdmissionRequest, ReservationAdmitter};
/// use fieldbook::{Money, RequesterId, TimeWindow};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/fieldbook.db")).unwrap();
/// let field = db.create_resource("Field A", Money::from_units(35_000)).unwrap();
///
/// let window = TimeWindow::new(
///     Utc.with_ymd_and_hms(2030, 3, 4, 18, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2030, 3, 4, 19, 0, 0).unwrap(),
/// )
/// .unwrap();
/// let request = AdmissionRequest::new(field.id(), RequesterId(7), window).with_recurring(true);
///
/// let first = ReservationAdmitter::new(&mut db).create_reservation(&request).unwrap();
/// assert_eq!(first.charge(), Money::from_units(140_000));
/// ```
#[derive(Debug)]
pub struct ReservationAdmitter<'a> {
    db: &'a mut Database,
    policy: RecurrencePolicy,
}

impl<'a> ReservationAdmitter<'a> {
    /// Creates an admitter using the default recurrence policy.
    pub fn new(db: &'a mut Database) -> Self {
        Self {
            db,
            policy: RecurrencePolicy::default(),
        }
    }

    /// Replaces the recurrence policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: RecurrencePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The recurrence policy in effect.
    #[must_use]
    pub const fn policy(&self) -> RecurrencePolicy {
        self.policy
    }

    /// Admits a booking and returns its first session.
    ///
    /// Session 0 carries the whole charge; later sessions carry zero.
    ///
    /// # Errors
    ///
    /// - `InvalidWindow` if the window is empty or a session cannot be computed
    /// - `ResourceNotFound` if the field does not exist
    /// - `SlotConflict` with the date of the first taken session
    /// - `LockTimeout` if another writer holds the lock too long
    /// - `Storage` for any other database failure
    pub fn create_reservation(&mut self, request: &AdmissionRequest) -> Result<Reservation> {
        let admission = self.admit(request)?;
        admission
            .reservations
            .into_iter()
            .next()
            .ok_or_else(|| empty_booking(request.recurring))
    }

    /// Admits a booking and returns every stored session.
    ///
    /// # Errors
    ///
    /// Same as [`ReservationAdmitter::create_reservation`].
    pub fn admit(&mut self, request: &AdmissionRequest) -> Result<Admission> {
        let window = TimeWindow::new(request.window.start(), request.window.end())?;
        let offset = request.offset()?;
        let sessions = RecurrenceExpander::new(self.policy).expand(window, request.recurring)?;
        let pricing = PricingCalculator::new(self.policy);
        let resource_id = request.resource_id;
        let requester_id = request.requester_id;
        let recurring = request.recurring;

        let admission = self.db.in_immediate_transaction(|tx| {
            let resource = Database::require_resource(tx, resource_id)?;
            let quote = pricing.quote(resource.hourly_rate(), &window, recurring)?;
            let group_id = BookingGroupId::new();
            let now = Utc::now().trunc_subsecs(0);
            let checker = OverlapChecker::new(tx);

            let mut reservations = Vec::with_capacity(sessions.len());
            for (index, session) in (0_u32..).zip(sessions) {
                let date = session.start_date_in(offset);
                if checker.has_conflict(resource_id, &session)? {
                    log::warn!("field {resource_id} already booked on {date} ({session})");
                    return Err(Error::SlotConflict { date });
                }

                let charge = if index == 0 { quote.aggregate } else { Money::ZERO };
                let reservation = Reservation::builder(resource_id, requester_id, session)
                    .charge(charge)
                    .group(group_id, index)
                    .created_at(now)
                    .updated_at(now)
                    .build()?;
                let stored = Database::insert_reservation_simple(tx, &reservation).map_err(|e| {
                    if e.is_slot_conflict() {
                        Error::SlotConflict { date }
                    } else {
                        e
                    }
                })?;
                log::debug!("inserted session {index} of group {group_id}: {session}");
                reservations.push(stored);
            }

            if reservations.is_empty() {
                return Err(empty_booking(recurring));
            }

            Ok(Admission {
                group_id,
                quote,
                reservations,
            })
        })?;

        log::info!(
            "admitted {} session(s) on field {resource_id} for requester {requester_id}, charge {}",
            admission.reservations.len(),
            admission.quote.aggregate
        );
        Ok(admission)
    }

    /// Computes what [`ReservationAdmitter::admit`] would do, without writing.
    ///
    /// The result can be stale by the time it is acted on; only an actual
    /// admission is authoritative.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWindow`, `ResourceNotFound`, or a storage error.
    pub fn preview(&self, request: &AdmissionRequest) -> Result<AdmissionPlan> {
        let window = TimeWindow::new(request.window.start(), request.window.end())?;
        let offset = request.offset()?;
        let sessions: Vec<TimeWindow> = RecurrenceExpander::new(self.policy)
            .expand(window, request.recurring)?
            .collect();

        let conn = self.db.connection();
        let resource = Database::require_resource(conn, request.resource_id)?;
        let quote = PricingCalculator::new(self.policy).quote(
            resource.hourly_rate(),
            &window,
            request.recurring,
        )?;
        let conflicts = OverlapChecker::new(conn)
            .conflicting_sessions(request.resource_id, sessions.iter().copied(), offset)?;

        Ok(AdmissionPlan {
            resource,
            quote,
            sessions,
            conflicts,
        })
    }
}

fn empty_booking(recurring: bool) -> Error {
    Error::Validation {
        field: "recurrence.sessions".into(),
        message: format!("booking (recurring: {recurring}) expanded to no sessions"),
    }
}
