//! Configuration validation.

use crate::config::schema::{Config, ExpiryConfig, RecurrenceConfig};
use crate::error::{Error, Result};
use crate::recurrence::MAX_SESSION_COUNT;

/// Validates configuration values.
///
/// # Examples
///
/// ```
/// use fieldbook::config::{Config, ConfigValidator};
///
/// let config = Config::default();
/// ConfigValidator::validate(&config).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref recurrence) = config.recurrence {
            Self::validate_recurrence(recurrence)?;
        }

        if let Some(ref expiry) = config.expiry {
            Self::validate_expiry(expiry)?;
        }

        if let Some(timeout) = config.maximum_lock_wait_seconds {
            if timeout == 0 {
                return Err(Error::Validation {
                    field: "maximum_lock_wait_seconds".into(),
                    message: "Timeout must be greater than 0".into(),
                });
            }
        }

        Ok(())
    }

    fn validate_recurrence(config: &RecurrenceConfig) -> Result<()> {
        if let Some(sessions) = config.sessions {
            if !(1..=MAX_SESSION_COUNT).contains(&sessions) {
                return Err(Error::Validation {
                    field: "recurrence.sessions".into(),
                    message: format!("must be between 1 and {MAX_SESSION_COUNT}, got {sessions}"),
                });
            }
        }
        Ok(())
    }

    fn validate_expiry(config: &ExpiryConfig) -> Result<()> {
        if config.pending_max_age_hours == Some(0) {
            return Err(Error::Validation {
                field: "expiry.pending_max_age_hours".into(),
                message: "must be greater than 0".into(),
            });
        }
        Ok(())
    }
}
