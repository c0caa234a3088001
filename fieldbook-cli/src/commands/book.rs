//! Book command implementation.
//!
//! This module implements the `book` command, which admits a single or
//! weekly recurring booking. On success the id of every stored session is
//! printed on stdout, one per line, session 0 first.

use crate::error::CliError;
use crate::utils::{
    format_timestamp, hours_to_duration, load_configuration, open_database, parse_datetime,
    parse_local_datetime, GlobalOptions,
};
use chrono::{DateTime, Utc};
use clap::Args;
use fieldbook::operations::{AdmissionPlan, AdmissionRequest, ReservationAdmitter};
use fieldbook::{Config, RecurrencePolicy, RequesterId, ResourceId, TimeWindow};
use rust_decimal::Decimal;

/// Book a field for a time window.
#[derive(Args)]
pub struct BookCommand {
    /// Field to book
    #[arg(long, value_name = "ID")]
    pub field: i64,

    /// Who is booking
    #[arg(long, value_name = "ID")]
    pub requester: i64,

    /// Start of the (first) session, e.g. "2030-03-04 18:00" (UTC) or RFC 3339
    #[arg(long, value_name = "DATETIME")]
    pub start: String,

    /// End of the (first) session
    #[arg(
        long,
        value_name = "DATETIME",
        conflicts_with = "hours",
        required_unless_present = "hours"
    )]
    pub end: Option<String>,

    /// Length of each session in hours, instead of --end (e.g. 1.5)
    #[arg(long, value_name = "HOURS")]
    pub hours: Option<Decimal>,

    /// Repeat the booking weekly
    #[arg(long)]
    pub recurring: bool,

    /// Number of weekly sessions for a recurring booking
    #[arg(long, value_name = "N", requires = "recurring")]
    pub sessions: Option<u32>,

    /// Show what would be booked without writing
    #[arg(long)]
    pub dry_run: bool,
}

impl BookCommand {
    /// Execute the book command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let policy = self.recurrence_policy(&config)?;

        let local_start = parse_local_datetime(&self.start)?;
        let start = local_start.with_timezone(&Utc);
        let window = TimeWindow::new(start, self.end_time(start)?).map_err(fieldbook::Error::from)?;
        let request = AdmissionRequest::new(
            ResourceId(self.field),
            RequesterId(self.requester),
            window,
        )
        .with_recurring(self.recurring)
        .with_offset(*local_start.offset());

        let mut db = open_database(global, &config)?;
        let mut admitter = ReservationAdmitter::new(&mut db).with_policy(policy);

        if self.dry_run {
            let plan = admitter.preview(&request)?;
            return report_plan(&plan, global);
        }

        let admission = admitter.admit(&request)?;

        for reservation in &admission.reservations {
            if let Some(id) = reservation.id() {
                println!("{id}");
            }
        }

        if global.verbose {
            eprintln!(
                "Booked field {} in group {}:",
                self.field, admission.group_id
            );
            for reservation in &admission.reservations {
                eprintln!(
                    "  - session {}: {} to {}, charge {}",
                    reservation.session_index(),
                    format_timestamp(reservation.window().start()),
                    format_timestamp(reservation.window().end()),
                    reservation.charge()
                );
            }
        } else if !global.quiet {
            eprintln!(
                "Booked {} session(s) on field {}, total charge {}",
                admission.reservations.len(),
                self.field,
                admission.quote.aggregate
            );
        }

        Ok(())
    }

    /// `--sessions` wins over the configured policy.
    fn recurrence_policy(&self, config: &Config) -> Result<RecurrencePolicy, CliError> {
        match self.sessions {
            Some(sessions) => RecurrencePolicy::new(sessions)
                .map_err(|e| CliError::InvalidArguments(e.to_string())),
            None => config
                .recurrence_policy()
                .map_err(|e| CliError::Config(e.to_string())),
        }
    }

    fn end_time(&self, start: DateTime<Utc>) -> Result<DateTime<Utc>, CliError> {
        match (&self.end, self.hours) {
            (Some(end), _) => parse_datetime(end),
            (None, Some(hours)) => start
                .checked_add_signed(hours_to_duration(hours)?)
                .ok_or_else(|| CliError::InvalidArguments("session ends out of range".into())),
            (None, None) => Err(CliError::InvalidArguments(
                "either --end or --hours is required".into(),
            )),
        }
    }
}

/// Print a dry-run plan. A plan with taken sessions is a semantic failure.
fn report_plan(plan: &AdmissionPlan, global: &GlobalOptions) -> Result<(), CliError> {
    if !global.quiet {
        eprintln!(
            "[DRY RUN] Would book {} session(s) on field {} '{}', total charge {}",
            plan.sessions.len(),
            plan.resource.id(),
            plan.resource.name(),
            plan.quote.aggregate
        );
    }

    for (index, window) in plan.sessions.iter().enumerate() {
        let taken = plan
            .conflicts
            .iter()
            .any(|c| usize::try_from(c.session_index).is_ok_and(|i| i == index));
        println!(
            "{}\t{}\t{}",
            format_timestamp(window.start()),
            format_timestamp(window.end()),
            if taken { "taken" } else { "free" }
        );
    }

    if plan.is_admissible() {
        Ok(())
    } else {
        let dates: Vec<String> = plan
            .conflict_dates()
            .iter()
            .map(|d| d.format("%d-%m-%Y").to_string())
            .collect();
        Err(CliError::Refused(format!(
            "slot already booked on {}",
            dates.join(", ")
        )))
    }
}
