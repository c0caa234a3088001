//! Cancel-group command implementation.
//!
//! Cancels every live session of a booking group in one transaction.
//! Sessions that are already canceled or expired are reported and left
//! alone.

use crate::error::CliError;
use crate::utils::{format_timestamp, load_configuration, open_database, GlobalOptions};
use clap::Args;
use fieldbook::operations::StatusOperations;
use fieldbook::BookingGroupId;

/// Cancel every session of a booking group.
#[derive(Args)]
pub struct CancelGroupCommand {
    /// Booking group id, as printed by `list`
    #[arg(value_name = "UUID")]
    pub group: BookingGroupId,
}

impl CancelGroupCommand {
    /// Execute the cancel-group command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let result = StatusOperations::cancel_group(&mut db, self.group)?;
        if result.is_empty() {
            return Err(CliError::Refused(format!(
                "no reservations in group {}",
                self.group
            )));
        }

        if global.quiet {
            println!("{}", result.canceled.len());
        } else {
            eprintln!(
                "Canceled {} session(s) of group {}",
                result.canceled.len(),
                self.group
            );
            if global.verbose {
                for r in &result.canceled {
                    eprintln!(
                        "  - session {}: {}",
                        r.session_index(),
                        format_timestamp(r.window().start())
                    );
                }
            }
            for r in &result.skipped {
                eprintln!(
                    "  - session {} left as {}",
                    r.session_index(),
                    r.status()
                );
            }
        }

        Ok(())
    }
}
