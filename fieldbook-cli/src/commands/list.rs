//! List command implementation.
//!
//! This module implements the `list` command, which displays reservations
//! in various formats (table, JSON, CSV, TSV). The rendering helpers are
//! shared with `schedule`.

use crate::error::CliError;
use crate::utils::{
    format_timestamp, load_configuration, open_database, parse_datetime, resolve_output_format,
    GlobalOptions,
};
use clap::Args;
use fieldbook::config::OutputFormat;
use fieldbook::database::ReservationFilter;
use fieldbook::{BookingGroupId, Database, RequesterId, Reservation, ReservationStatus, ResourceId};
use serde::Serialize;
use std::io::Write;

/// Column headers for CSV/TSV output.
const COLUMN_HEADERS: [&str; 11] = [
    "id",
    "field",
    "requester",
    "start",
    "end",
    "status",
    "charge",
    "group",
    "session",
    "payment_proof",
    "created_at",
];

/// List reservations.
#[derive(Args)]
pub struct ListCommand {
    /// Output format (table, json, csv, tsv)
    #[arg(long, value_parser = OutputFormat::parse)]
    pub format: Option<OutputFormat>,

    /// Only reservations of this field
    #[arg(long, value_name = "ID")]
    pub field: Option<i64>,

    /// Only reservations made by this requester
    #[arg(long, value_name = "ID")]
    pub requester: Option<i64>,

    /// Only reservations in this status
    #[arg(long, value_name = "STATUS")]
    pub status: Option<ReservationStatus>,

    /// Only sessions of this booking group
    #[arg(long, value_name = "UUID")]
    pub group: Option<BookingGroupId>,

    /// Only sessions ending after this time
    #[arg(long, value_name = "DATETIME")]
    pub from: Option<String>,

    /// Only sessions starting before this time
    #[arg(long, value_name = "DATETIME")]
    pub to: Option<String>,

    /// Return at most this many reservations
    #[arg(long, value_name = "N")]
    pub limit: Option<u32>,
}

/// One reservation flattened for output.
#[derive(Serialize)]
pub(crate) struct ReservationRow {
    id: Option<i64>,
    field: i64,
    requester: i64,
    start: String,
    end: String,
    status: ReservationStatus,
    charge: String,
    group: String,
    session: u32,
    payment_proof: Option<String>,
    created_at: String,
}

impl From<&Reservation> for ReservationRow {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id().map(|id| id.value()),
            field: r.resource_id().value(),
            requester: r.requester_id().value(),
            start: format_timestamp(r.window().start()),
            end: format_timestamp(r.window().end()),
            status: r.status(),
            charge: r.charge().to_string(),
            group: r.group_id().to_string(),
            session: r.session_index(),
            payment_proof: r.payment_proof_ref().map(str::to_string),
            created_at: format_timestamp(r.created_at()),
        }
    }
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let mut filter = ReservationFilter::new();
        if let Some(field) = self.field {
            filter = filter.resource(ResourceId(field));
        }
        if let Some(requester) = self.requester {
            filter = filter.requester(RequesterId(requester));
        }
        if let Some(status) = self.status {
            filter = filter.status(status);
        }
        if let Some(group) = self.group {
            filter = filter.group(group);
        }
        if let Some(limit) = self.limit {
            filter = filter.limit(limit);
        }
        let from = self.from.as_deref().map(parse_datetime).transpose()?;
        let to = self.to.as_deref().map(parse_datetime).transpose()?;
        if from.is_some() || to.is_some() {
            filter = filter.between(from, to);
        }

        let reservations = Database::list_reservations(db.connection(), &filter)?;
        render_reservations(&reservations, resolve_output_format(self.format, &config))
    }
}

/// Write reservations to stdout in `format`.
pub(crate) fn render_reservations(
    reservations: &[Reservation],
    format: OutputFormat,
) -> Result<(), CliError> {
    let rows: Vec<ReservationRow> = reservations.iter().map(ReservationRow::from).collect();
    match format {
        OutputFormat::Table => format_as_table(&rows),
        OutputFormat::Json => write_json(&rows),
        OutputFormat::Csv => write_delimited(&COLUMN_HEADERS, &rows, b','),
        OutputFormat::Tsv => write_delimited(&COLUMN_HEADERS, &rows, b'\t'),
    }
}

/// Format reservations as a human-readable table.
fn format_as_table(rows: &[ReservationRow]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    // Print header (uppercase for table display)
    let header_line = COLUMN_HEADERS
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(handle, "{header_line}")?;

    for row in rows {
        writeln!(
            handle,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
            row.field,
            row.requester,
            row.start,
            row.end,
            row.status,
            row.charge,
            row.group,
            row.session,
            row.payment_proof.as_deref().unwrap_or("-"),
            row.created_at,
        )?;
    }

    Ok(())
}

/// Write any serializable rows as a pretty JSON array.
pub(crate) fn write_json<T: Serialize>(rows: &[T]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    serde_json::to_writer_pretty(&mut handle, rows).map_err(|e| CliError::Io(e.into()))?;
    writeln!(handle)?;

    Ok(())
}

/// Convert csv::Error to CliError.
fn csv_error(e: csv::Error) -> CliError {
    CliError::Io(std::io::Error::other(e))
}

/// Write serializable rows as CSV or TSV under `headers`.
///
/// The header row is written even when there are no rows.
pub(crate) fn write_delimited<T: Serialize>(
    headers: &[&str],
    rows: &[T],
    delimiter: u8,
) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let handle = stdout.lock();
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(handle);

    writer.write_record(headers).map_err(csv_error)?;
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }

    writer.flush()?;

    Ok(())
}
