//! Environment variable handling for configuration overrides.
//!
//! `FIELDBOOK_*` variables override values read from `config.yaml`.

use std::env;

use crate::config::schema::{Config, OutputFormat};
use crate::error::{Error, Result};

/// Number of weekly sessions for recurring bookings.
pub const RECURRING_SESSIONS_ENV: &str = "FIELDBOOK_RECURRING_SESSIONS";
/// Hours before an unpaid reservation is considered stale.
pub const PENDING_MAX_AGE_HOURS_ENV: &str = "FIELDBOOK_PENDING_MAX_AGE_HOURS";
/// Maximum seconds to wait on the database lock.
pub const MAXIMUM_LOCK_WAIT_SECONDS_ENV: &str = "FIELDBOOK_MAXIMUM_LOCK_WAIT_SECONDS";
/// Default output format of list commands.
pub const OUTPUT_FORMAT_ENV: &str = "FIELDBOOK_OUTPUT_FORMAT";
/// Disables automatic database creation.
pub const DISABLE_AUTOINIT_ENV: &str = "FIELDBOOK_DISABLE_AUTOINIT";

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use fieldbook::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// # Errors
    ///
    /// Returns an error if any environment variable value is invalid
    /// (e.g., non-numeric hours, invalid boolean).
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(sessions) = env::var(RECURRING_SESSIONS_ENV) {
            let sessions = Self::parse_number(RECURRING_SESSIONS_ENV, &sessions)?;
            config
                .recurrence
                .get_or_insert_with(Default::default)
                .sessions = Some(sessions);
        }

        if let Ok(hours) = env::var(PENDING_MAX_AGE_HOURS_ENV) {
            let hours = Self::parse_number(PENDING_MAX_AGE_HOURS_ENV, &hours)?;
            config
                .expiry
                .get_or_insert_with(Default::default)
                .pending_max_age_hours = Some(hours);
        }

        if let Ok(seconds) = env::var(MAXIMUM_LOCK_WAIT_SECONDS_ENV) {
            config.maximum_lock_wait_seconds =
                Some(Self::parse_number(MAXIMUM_LOCK_WAIT_SECONDS_ENV, &seconds)?);
        }

        if let Ok(format) = env::var(OUTPUT_FORMAT_ENV) {
            config.output_format =
                Some(OutputFormat::parse(&format).map_err(|message| Error::Validation {
                    field: OUTPUT_FORMAT_ENV.into(),
                    message,
                })?);
        }

        if let Ok(val) = env::var(DISABLE_AUTOINIT_ENV) {
            config.disable_autoinit = Some(Self::parse_bool(DISABLE_AUTOINIT_ENV, &val)?);
        }

        Ok(())
    }

    fn parse_number<T: std::str::FromStr>(var: &str, value: &str) -> Result<T> {
        value.trim().parse().map_err(|_| Error::Validation {
            field: var.into(),
            message: "Must be a positive integer".into(),
        })
    }

    /// Parse a boolean from an environment variable.
    ///
    /// Accepts: true/false, 1/0, yes/no, on/off (case-insensitive).
    fn parse_bool(var: &str, value: &str) -> Result<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: var.into(),
                message: format!("Invalid boolean value: {value}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ALL_VARS: [&str; 5] = [
        RECURRING_SESSIONS_ENV,
        PENDING_MAX_AGE_HOURS_ENV,
        MAXIMUM_LOCK_WAIT_SECONDS_ENV,
        OUTPUT_FORMAT_ENV,
        DISABLE_AUTOINIT_ENV,
    ];

    fn clear_env() {
        for var in ALL_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_parse_bool() {
        assert!(EnvironmentConfig::parse_bool("X", "Yes").unwrap());
        assert!(EnvironmentConfig::parse_bool("X", "1").unwrap());
        assert!(!EnvironmentConfig::parse_bool("X", "off").unwrap());
        assert!(EnvironmentConfig::parse_bool("X", "maybe").is_err());
    }

    #[test]
    #[serial]
    fn test_no_env_leaves_config_untouched() {
        clear_env();
        let mut config = Config::default();
        EnvironmentConfig::apply_overrides(&mut config).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var(RECURRING_SESSIONS_ENV, "8");
        env::set_var(PENDING_MAX_AGE_HOURS_ENV, "36");
        env::set_var(MAXIMUM_LOCK_WAIT_SECONDS_ENV, "3");
        env::set_var(OUTPUT_FORMAT_ENV, "JSON");
        env::set_var(DISABLE_AUTOINIT_ENV, "true");

        let mut config = Config::default();
        let result = EnvironmentConfig::apply_overrides(&mut config);
        clear_env();
        result.unwrap();

        assert_eq!(config.recurrence.unwrap().sessions, Some(8));
        assert_eq!(config.expiry.unwrap().pending_max_age_hours, Some(36));
        assert_eq!(config.maximum_lock_wait_seconds, Some(3));
        assert_eq!(config.output_format, Some(OutputFormat::Json));
        assert_eq!(config.disable_autoinit, Some(true));
    }

    #[test]
    #[serial]
    fn test_invalid_number_rejected() {
        clear_env();
        env::set_var(PENDING_MAX_AGE_HOURS_ENV, "soon");
        let mut config = Config::default();
        let result = EnvironmentConfig::apply_overrides(&mut config);
        clear_env();

        assert!(matches!(
            result,
            Err(Error::Validation { ref field, .. }) if field == PENDING_MAX_AGE_HOURS_ENV
        ));
    }
}
