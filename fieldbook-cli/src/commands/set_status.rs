//! Set-status command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use clap::Args;
use fieldbook::operations::StatusOperations;
use fieldbook::{ReservationId, ReservationStatus};

/// Change the status of a reservation.
///
/// Allowed moves: pending to paid, pending to canceled, paid to canceled
/// and pending to expired. Setting the current status again is a no-op.
#[derive(Args)]
pub struct SetStatusCommand {
    /// Reservation to update
    #[arg(value_name = "ID")]
    pub id: i64,

    /// New status (pending, paid, expired, canceled)
    #[arg(value_name = "STATUS")]
    pub status: ReservationStatus,
}

impl SetStatusCommand {
    /// Execute the set-status command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let updated = StatusOperations::set_status(&mut db, ReservationId(self.id), self.status)?;

        if !global.quiet {
            eprintln!("Reservation {} is now {}", self.id, updated.status());
        }

        Ok(())
    }
}
