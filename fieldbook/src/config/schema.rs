//! Configuration schema definitions.
//!
//! This module defines the configuration structure for fieldbook: recurrence
//! length, the pending-expiry threshold, lock waiting and output defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::recurrence::RecurrencePolicy;

/// Complete configuration structure.
///
/// Every field is optional so that sources can be layered; unset values
/// fall back to built-in defaults.
///
/// # Examples
///
/// ```
/// use fieldbook::config::{Config, RecurrenceConfig};
///
/// let config = Config {
///     recurrence: Some(RecurrenceConfig { sessions: Some(6) }),
///     ..Default::default()
/// };
/// assert_eq!(config.recurrence_policy().unwrap().sessions(), 6);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Recurring booking settings.
    pub recurrence: Option<RecurrenceConfig>,

    /// Pending-expiry settings.
    pub expiry: Option<ExpiryConfig>,

    /// Maximum time to wait for database lock acquisition (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Output format for list commands.
    pub output_format: Option<OutputFormat>,

    /// Disable automatic database initialization.
    pub disable_autoinit: Option<bool>,
}

impl Config {
    /// The recurrence policy these settings describe.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the session count is out of range.
    pub fn recurrence_policy(&self) -> Result<RecurrencePolicy> {
        match self.recurrence.as_ref().and_then(|r| r.sessions) {
            Some(sessions) => RecurrencePolicy::new(sessions),
            None => Ok(RecurrencePolicy::default()),
        }
    }

    /// The configured lock wait, if any.
    #[must_use]
    pub fn busy_timeout(&self) -> Option<Duration> {
        self.maximum_lock_wait_seconds.map(Duration::from_secs)
    }

    /// The configured expiry settings, or an empty set.
    #[must_use]
    pub fn expiry_or_default(&self) -> ExpiryConfig {
        self.expiry.clone().unwrap_or_default()
    }
}

/// Recurring booking configuration.
///
/// # Examples
///
/// ```
/// use fieldbook::config::RecurrenceConfig;
///
/// let config = RecurrenceConfig { sessions: Some(4) };
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RecurrenceConfig {
    /// Number of weekly sessions a recurring booking expands to.
    pub sessions: Option<u32>,
}

/// Pending-expiry configuration.
///
/// # Examples
///
/// ```
/// use fieldbook::config::ExpiryConfig;
///
/// let config = ExpiryConfig {
///     pending_max_age_hours: Some(48),
/// };
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExpiryConfig {
    /// Hours a reservation may stay `pending` before the sweep expires it.
    pub pending_max_age_hours: Option<u32>,
}

/// Output format for list commands.
///
/// # Examples
///
/// ```
/// use fieldbook::config::OutputFormat;
///
/// let format = OutputFormat::Json;
/// assert_eq!(format.to_string(), "json");
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output format.
    Json,
    /// CSV output format.
    Csv,
    /// TSV output format.
    Tsv,
    /// Human-readable table format.
    #[default]
    Table,
}

impl OutputFormat {
    /// Parses a format name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns the offending input if it is not a known format.
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "table" => Ok(Self::Table),
            other => Err(format!(
                "unknown output format '{other}' (expected json, csv, tsv or table)"
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Tsv => write!(f, "tsv"),
            Self::Table => write!(f, "table"),
        }
    }
}
