//! Schedule command implementation.
//!
//! Shows which windows of a field are taken, i.e. every reservation that
//! still blocks its slot. Requesters and charges are left out.

use crate::commands::list::{write_delimited, write_json};
use crate::error::CliError;
use crate::utils::{
    format_timestamp, load_configuration, open_database, parse_datetime, resolve_output_format,
    GlobalOptions,
};
use chrono::{Months, Utc};
use clap::Args;
use fieldbook::config::OutputFormat;
use fieldbook::database::ReservationFilter;
use fieldbook::{Database, Reservation, ReservationStatus, ResourceId};
use serde::Serialize;
use std::io::Write;

const COLUMN_HEADERS: [&str; 3] = ["start", "end", "status"];

/// Show the booked windows of a field.
#[derive(Args)]
pub struct ScheduleCommand {
    /// Field to show
    #[arg(long, value_name = "ID")]
    pub field: i64,

    /// Start of the range (default: now)
    #[arg(long, value_name = "DATETIME")]
    pub from: Option<String>,

    /// End of the range (default: one month after the start)
    #[arg(long, value_name = "DATETIME")]
    pub to: Option<String>,

    /// Output format (table, json, csv, tsv)
    #[arg(long, value_parser = OutputFormat::parse)]
    pub format: Option<OutputFormat>,
}

#[derive(Serialize)]
struct SlotRow {
    start: String,
    end: String,
    status: ReservationStatus,
}

impl From<&Reservation> for SlotRow {
    fn from(r: &Reservation) -> Self {
        Self {
            start: format_timestamp(r.window().start()),
            end: format_timestamp(r.window().end()),
            status: r.status(),
        }
    }
}

impl ScheduleCommand {
    /// Execute the schedule command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let from = match self.from.as_deref() {
            Some(value) => parse_datetime(value)?,
            None => Utc::now(),
        };
        let to = match self.to.as_deref() {
            Some(value) => parse_datetime(value)?,
            None => from
                .checked_add_months(Months::new(1))
                .ok_or_else(|| CliError::InvalidArguments("range ends out of bounds".into()))?,
        };
        if to <= from {
            return Err(CliError::InvalidArguments(
                "--to must be after --from".into(),
            ));
        }

        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let field = ResourceId(self.field);
        Database::require_resource(db.connection(), field)?;

        let filter = ReservationFilter::new()
            .resource(field)
            .blocking_only()
            .between(Some(from), Some(to));
        let reservations = Database::list_reservations(db.connection(), &filter)?;
        let rows: Vec<SlotRow> = reservations.iter().map(SlotRow::from).collect();

        match resolve_output_format(self.format, &config) {
            OutputFormat::Table => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                writeln!(handle, "START\tEND\tSTATUS")?;
                for row in &rows {
                    writeln!(handle, "{}\t{}\t{}", row.start, row.end, row.status)?;
                }
                Ok(())
            }
            OutputFormat::Json => write_json(&rows),
            OutputFormat::Csv => write_delimited(&COLUMN_HEADERS, &rows, b','),
            OutputFormat::Tsv => write_delimited(&COLUMN_HEADERS, &rows, b'\t'),
        }
    }
}
