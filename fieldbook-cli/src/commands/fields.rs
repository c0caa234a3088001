//! Fields command implementation.

use crate::commands::list::{write_delimited, write_json};
use crate::error::CliError;
use crate::utils::{load_configuration, open_database, resolve_output_format, GlobalOptions};
use clap::Args;
use fieldbook::config::OutputFormat;
use fieldbook::{Database, Resource};
use serde::Serialize;
use std::io::Write;

const COLUMN_HEADERS: [&str; 3] = ["id", "name", "hourly_rate"];

/// List fields.
#[derive(Args)]
pub struct FieldsCommand {
    /// Output format (table, json, csv, tsv)
    #[arg(long, value_parser = OutputFormat::parse)]
    pub format: Option<OutputFormat>,
}

#[derive(Serialize)]
struct FieldRow<'a> {
    id: i64,
    name: &'a str,
    hourly_rate: String,
}

impl<'a> From<&'a Resource> for FieldRow<'a> {
    fn from(resource: &'a Resource) -> Self {
        Self {
            id: resource.id().value(),
            name: resource.name(),
            hourly_rate: resource.hourly_rate().to_string(),
        }
    }
}

impl FieldsCommand {
    /// Execute the fields command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let resources = Database::list_resources(db.connection())?;
        let rows: Vec<FieldRow<'_>> = resources.iter().map(FieldRow::from).collect();

        match resolve_output_format(self.format, &config) {
            OutputFormat::Table => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                writeln!(handle, "ID\tNAME\tHOURLY_RATE")?;
                for row in &rows {
                    writeln!(handle, "{}\t{}\t{}", row.id, row.name, row.hourly_rate)?;
                }
                Ok(())
            }
            OutputFormat::Json => write_json(&rows),
            OutputFormat::Csv => write_delimited(&COLUMN_HEADERS, &rows, b','),
            OutputFormat::Tsv => write_delimited(&COLUMN_HEADERS, &rows, b'\t'),
        }
    }
}
