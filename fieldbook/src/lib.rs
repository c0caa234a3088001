#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # fieldbook
//!
//! A library for admitting time-slot reservations on bookable fields.
//!
//! A booking request names a field, a requester and a half-open time
//! window, optionally repeating weekly. Admission prices the booking,
//! checks every session against live reservations, and stores all of them
//! atomically, so two reservations on the same field never overlap.
//!
//! ## Core Types
//!
//! - [`TimeWindow`]: half-open `[start, end)` intervals
//! - [`Money`]: non-negative two-decimal amounts
//! - [`RecurrenceExpander`] and [`PricingCalculator`]: session and charge derivation
//! - [`Reservation`] and [`ReservationStatus`]: stored bookings and their lifecycle
//! - [`operations::ReservationAdmitter`]: the admission entry point
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use fieldbook::{Money, PricingCalculator, RecurrenceExpander, TimeWindow};
//!
//! let window = TimeWindow::new(
//!     Utc.with_ymd_and_hms(2030, 3, 4, 18, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2030, 3, 4, 19, 0, 0).unwrap(),
//! )
//! .unwrap();
//!
//! // A recurring booking covers four consecutive weeks
//! let sessions: Vec<TimeWindow> = RecurrenceExpander::default()
//!     .expand(window, true)
//!     .unwrap()
//!     .collect();
//! assert_eq!(sessions.len(), 4);
//!
//! // and is charged for all of them up front
//! let quote = PricingCalculator::default()
//!     .quote(Money::from_units(35_000), &window, true)
//!     .unwrap();
//! assert_eq!(quote.aggregate, Money::from_units(140_000));
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod money;
pub mod operations;
pub mod pricing;
pub mod recurrence;
pub mod reservation;
pub mod resource;
pub mod window;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig, ReservationFilter};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use money::{InvalidMoneyError, Money};
pub use operations::{
    Admission, AdmissionPlan, AdmissionRequest, CleanupOperations, ExpireResult,
    GroupCancelResult, OverlapChecker, ReservationAdmitter, SessionConflict, StatusOperations,
};
pub use pricing::{PricingCalculator, Quote};
pub use recurrence::{RecurrenceExpander, RecurrencePolicy, Sessions};
pub use reservation::{
    BookingGroupId, RequesterId, Reservation, ReservationBuilder, ReservationId,
    ReservationStatus, ResourceId, ValidationError,
};
pub use resource::Resource;
pub use window::{InvalidWindowError, TimeWindow};
