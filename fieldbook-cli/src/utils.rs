//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including data directory resolution, configuration loading, database
//! management, argument parsing and output formatting.

use crate::error::CliError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use fieldbook::config::OutputFormat;
use fieldbook::database::DATABASE_FILE_NAME;
use fieldbook::{Config, ConfigBuilder, Database, DatabaseConfig, Money};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Duration;

const SECONDS_PER_HOUR: i64 = 3600;

/// Accepted forms for a naive (UTC) date-time argument.
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,
}

/// Resolve the data directory.
///
/// Priority: `--data-dir` (or `FIELDBOOK_DATA_DIR` through clap) >
/// library resolution (`FIELDBOOK_DATA_DIR`, then `~/.fieldbook`).
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match global.data_dir {
        Some(ref dir) => Ok(dir.clone()),
        None => fieldbook::database::resolve_data_dir().map_err(|e| CliError::Config(e.to_string())),
    }
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Environment variables
/// 2. `config.yaml` in the data directory
/// 3. Built-in defaults (lowest priority)
///
/// Command-line flags are applied on top by each command.
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;

    ConfigBuilder::new()
        .with_data_dir(&data_dir)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Open database with configuration.
///
/// # Errors
///
/// Returns `NotInitialized` if the database doesn't exist and auto-init is
/// disabled by flag or configuration.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    let db_path = resolve_data_dir(global)?.join(DATABASE_FILE_NAME);
    let autoinit_disabled = global.disable_autoinit || config.disable_autoinit == Some(true);

    let mut db_config = DatabaseConfig::new(&db_path);
    if autoinit_disabled {
        if !db_path.exists() {
            return Err(CliError::NotInitialized(db_path));
        }
        db_config = db_config.without_auto_create();
    }

    if let Some(timeout_seconds) = global.busy_timeout {
        db_config = db_config.with_busy_timeout(Duration::from_secs(timeout_seconds.into()));
    } else if let Some(timeout) = config.busy_timeout() {
        db_config = db_config.with_busy_timeout(timeout);
    }

    Database::open(db_config).map_err(CliError::from)
}

/// Pick the output format: command flag, then configuration, then table.
pub fn resolve_output_format(flag: Option<OutputFormat>, config: &Config) -> OutputFormat {
    flag.or(config.output_format).unwrap_or_default()
}

/// Parse a date-time argument as UTC.
///
/// Accepts RFC 3339 (`2030-03-04T18:00:00-03:00`), `YYYY-MM-DD HH:MM`,
/// `YYYY-MM-DDTHH:MM`, `YYYY-MM-DD HH:MM:SS`, or a bare date (midnight).
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, CliError> {
    parse_local_datetime(value).map(|dt| dt.with_timezone(&Utc))
}

/// Parse a date-time argument, keeping the offset it was written in.
///
/// Forms without an offset are taken as UTC.
pub fn parse_local_datetime(value: &str) -> Result<DateTime<FixedOffset>, CliError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt);
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc().fixed_offset());
    }

    Err(CliError::InvalidArguments(format!(
        "cannot parse '{value}' as a date-time (expected YYYY-MM-DD HH:MM or RFC 3339)"
    )))
}

/// Parse an amount of money such as `35000` or `1250.50`.
pub fn parse_money(value: &str) -> Result<Money, CliError> {
    value
        .parse::<Money>()
        .map_err(|e| CliError::InvalidArguments(e.to_string()))
}

/// Turn a fractional hour count into a whole number of seconds.
pub fn hours_to_duration(hours: Decimal) -> Result<chrono::Duration, CliError> {
    let seconds = (hours * Decimal::from(SECONDS_PER_HOUR))
        .round()
        .to_i64()
        .filter(|s| *s > 0)
        .ok_or_else(|| {
            CliError::InvalidArguments(format!("duration must be a positive number of hours, got {hours}"))
        })?;
    Ok(chrono::Duration::seconds(seconds))
}

/// Format a timestamp for display.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_datetime_forms() {
        let expected = Utc.with_ymd_and_hms(2030, 3, 4, 18, 0, 0).unwrap();
        assert_eq!(parse_datetime("2030-03-04 18:00").unwrap(), expected);
        assert_eq!(parse_datetime("2030-03-04T18:00").unwrap(), expected);
        assert_eq!(parse_datetime("2030-03-04T18:00:00Z").unwrap(), expected);
        assert_eq!(parse_datetime("2030-03-04T15:00:00-03:00").unwrap(), expected);
    }

    #[test]
    fn test_parse_local_datetime_keeps_offset() {
        let local = parse_local_datetime("2030-03-05T06:00:00+07:00").unwrap();
        assert_eq!(local.offset().local_minus_utc(), 7 * 3600);
        assert_eq!(
            local.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2030, 3, 4, 23, 0, 0).unwrap()
        );
        assert_eq!(
            parse_local_datetime("2030-03-05 06:00").unwrap().offset().local_minus_utc(),
            0
        );
    }

    #[test]
    fn test_parse_bare_date() {
        let expected = Utc.with_ymd_and_hms(2030, 3, 4, 0, 0, 0).unwrap();
        assert_eq!(parse_datetime("2030-03-04").unwrap(), expected);
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        let err = parse_datetime("next monday").unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("35000").unwrap(), Money::from_units(35_000));
        assert!(parse_money("-1").is_err());
        assert!(parse_money("abc").is_err());
    }

    #[test]
    fn test_hours_to_duration() {
        let hours = Decimal::new(15, 1);
        assert_eq!(
            hours_to_duration(hours).unwrap(),
            chrono::Duration::minutes(90)
        );
        assert!(hours_to_duration(Decimal::ZERO).is_err());
        assert!(hours_to_duration(Decimal::NEGATIVE_ONE).is_err());
    }

    #[test]
    fn test_format_timestamp() {
        let ts = Utc.with_ymd_and_hms(2030, 3, 4, 18, 0, 0).unwrap();
        assert_eq!(format_timestamp(ts), "2030-03-04 18:00");
    }

    #[test]
    fn test_output_format_precedence() {
        let config = Config {
            output_format: Some(OutputFormat::Csv),
            ..Default::default()
        };
        assert_eq!(
            resolve_output_format(Some(OutputFormat::Json), &config),
            OutputFormat::Json
        );
        assert_eq!(resolve_output_format(None, &config), OutputFormat::Csv);
        assert_eq!(
            resolve_output_format(None, &Config::default()),
            OutputFormat::Table
        );
    }
}
