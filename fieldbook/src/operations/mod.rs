//! Booking operations built on top of the database layer.
//!
//! # Architecture
//!
//! - [`ReservationAdmitter`] decides whether a request fits, prices it, and
//!   writes all of its sessions in one IMMEDIATE transaction
//! - [`OverlapChecker`] answers "is this window free" for a field
//! - [`StatusOperations`] moves existing reservations through their lifecycle
//! - [`CleanupOperations`] sweeps unpaid reservations into `expired`
//! - [`init::init_database`] prepares a data directory
//!
//! Admission can also be previewed: [`ReservationAdmitter::preview`] builds
//! an [`AdmissionPlan`] without writing, which is what `--dry-run` shows.
//!
//! # Examples
//!
//! ```no_run
//! use chrono::{TimeZone, Utc};
//! use fieldbook::database::{Database, DatabaseConfig};
//! use fieldbook::operations::{AdmissionRequest, ReservationAdmitter, StatusOperations};
//! use fieldbook::{RequesterId, ResourceId, TimeWindow};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/fieldbook.db")).unwrap();
//! let window = TimeWindow::new(
//!     Utc.with_ymd_and_hms(2030, 3, 4, 18, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2030, 3, 4, 19, 0, 0).unwrap(),
//! )
//! .unwrap();
//! let request = AdmissionRequest::new(ResourceId(1), RequesterId(7), window);
//!
//! // Preview first
//! let plan = ReservationAdmitter::new(&mut db).preview(&request).unwrap();
//! if plan.is_admissible() {
//!     let r = ReservationAdmitter::new(&mut db).create_reservation(&request).unwrap();
//!     StatusOperations::mark_paid(&mut db, r.id().unwrap()).unwrap();
//! }
//! ```

pub mod admit;
pub mod cleanup;
pub mod init;
pub mod overlap;
pub mod status;

pub use admit::{Admission, AdmissionPlan, AdmissionRequest, ReservationAdmitter};
pub use cleanup::{CleanupOperations, ExpireResult};
pub use init::{init_database, InitOptions, InitResult};
pub use overlap::{OverlapChecker, SessionConflict};
pub use status::{GroupCancelResult, StatusOperations};
