//! Database layer for persistent storage of fields and reservations.
//!
//! This module provides a SQLite-based storage layer, including connection
//! management, schema versioning, the overlap trigger and CRUD operations.
//!
//! # Examples
//!
//! ```no_run
//! use fieldbook::database::{Database, DatabaseConfig, ReservationFilter};
//! use fieldbook::Money;
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/fieldbook.db")).unwrap();
//! let field = db.create_resource("Field A", Money::from_units(35_000)).unwrap();
//!
//! let filter = ReservationFilter::new().resource(field.id());
//! for reservation in Database::list_reservations(db.connection(), &filter).unwrap() {
//!     println!("{:?}", reservation);
//! }
//! ```

mod config;
mod connection;
mod filter;
pub mod migrations;
mod operations;
mod resources;
mod schema;
mod transaction;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE_NAME,
    DATA_DIR_ENV, DEFAULT_BUSY_TIMEOUT,
};
pub use connection::Database;
pub(crate) use operations::payment_proof_reference;
pub use filter::ReservationFilter;
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
pub use schema::CURRENT_SCHEMA_VERSION;
