//! Expire command implementation.
//!
//! This module implements the `expire` command, which moves unpaid
//! reservations older than a threshold to `expired`. Expired reservations
//! keep their slot.

use crate::error::CliError;
use crate::utils::{format_timestamp, load_configuration, open_database, GlobalOptions};
use clap::Args;
use fieldbook::operations::CleanupOperations;
use std::time::Duration;

const SECONDS_PER_HOUR: u64 = 3600;

/// Expire unpaid reservations older than a threshold.
#[derive(Args)]
pub struct ExpireCommand {
    /// Expire reservations left pending for N hours
    #[arg(long, value_name = "HOURS")]
    pub hours: Option<u32>,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl ExpireCommand {
    /// Execute the expire command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;

        let max_age_hours = self
            .hours
            .or_else(|| config.expiry_or_default().pending_max_age_hours);

        let Some(hours) = max_age_hours else {
            return Err(CliError::InvalidArguments(
                "No expiry threshold specified. Use --hours or configure expiry.pending_max_age_hours"
                    .into(),
            ));
        };
        if hours == 0 {
            return Err(CliError::InvalidArguments(
                "--hours must be greater than zero".into(),
            ));
        }

        if self.dry_run && !global.quiet {
            eprintln!("[DRY RUN] Scanning for reservations pending longer than {hours} hours...");
        }

        let mut db = open_database(global, &config)?;
        let max_age = Duration::from_secs(u64::from(hours) * SECONDS_PER_HOUR);
        let result = CleanupOperations::expire_stale_pending(&mut db, max_age, self.dry_run)?;

        if global.quiet {
            if result.expired_count > 0 {
                println!("{}", result.expired_count);
            }
            return Ok(());
        }

        let verb = if self.dry_run {
            "[DRY RUN] Would expire"
        } else {
            "Expired"
        };
        eprintln!(
            "{verb} {} reservation(s) pending longer than {hours} hours",
            result.expired_count
        );

        if global.verbose {
            for reservation in &result.expired_reservations {
                eprintln!(
                    "  - Reservation {}: field {}, {} (created {})",
                    reservation
                        .id()
                        .map_or_else(|| "-".to_string(), |id| id.to_string()),
                    reservation.resource_id(),
                    format_timestamp(reservation.window().start()),
                    format_timestamp(reservation.created_at())
                );
            }
        }

        Ok(())
    }
}
