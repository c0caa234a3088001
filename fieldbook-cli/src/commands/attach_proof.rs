//! Attach-proof command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use clap::Args;
use fieldbook::operations::StatusOperations;
use fieldbook::ReservationId;

/// Record a payment-proof reference on a reservation.
///
/// Only session 0 of a group carries a charge, so only it accepts a proof.
#[derive(Args)]
pub struct AttachProofCommand {
    /// Reservation to update
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Reference of the uploaded proof (transfer number, file name, ...)
    #[arg(value_name = "REFERENCE")]
    pub reference: String,
}

impl AttachProofCommand {
    /// Execute the attach-proof command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if self.reference.trim().is_empty() {
            return Err(CliError::InvalidArguments(
                "payment proof reference must not be empty".into(),
            ));
        }

        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        StatusOperations::attach_payment_proof(&mut db, ReservationId(self.id), &self.reference)?;

        if !global.quiet {
            eprintln!("Attached payment proof to reservation {}", self.id);
        }

        Ok(())
    }
}
