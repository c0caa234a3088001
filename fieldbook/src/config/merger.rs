//! Configuration merging and precedence handling.

use crate::config::schema::{Config, ExpiryConfig, RecurrenceConfig};

/// Merges configuration layers according to precedence rules.
///
/// # Examples
///
/// ```
/// use fieldbook::config::{Config, ConfigMerger};
///
/// let low = Config { maximum_lock_wait_seconds: Some(5), ..Default::default() };
/// let high = Config { maximum_lock_wait_seconds: Some(9), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.maximum_lock_wait_seconds, Some(9));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge layers into a final config.
    ///
    /// Layers are given from lowest to highest precedence.
    #[must_use]
    pub fn merge<'a, I>(layers: I) -> Config
    where
        I: IntoIterator<Item = &'a Config>,
    {
        let mut result = Config::default();
        for layer in layers {
            Self::merge_into(&mut result, layer);
        }
        result
    }

    /// Merge source config into target (source overwrites target).
    ///
    /// # Merging Rules
    ///
    /// - Simple fields: source overwrites if Some
    /// - Nested configs: field-by-field merge
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }

        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }

        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }

        if let Some(ref source_recurrence) = source.recurrence {
            target.recurrence = Some(match &target.recurrence {
                Some(existing) => RecurrenceConfig {
                    sessions: source_recurrence.sessions.or(existing.sessions),
                },
                None => source_recurrence.clone(),
            });
        }

        if let Some(ref source_expiry) = source.expiry {
            target.expiry = Some(match &target.expiry {
                Some(existing) => ExpiryConfig {
                    pending_max_age_hours: source_expiry
                        .pending_max_age_hours
                        .or(existing.pending_max_age_hours),
                },
                None => source_expiry.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn test_higher_layer_wins() {
        let low = Config {
            output_format: Some(OutputFormat::Csv),
            disable_autoinit: Some(false),
            ..Default::default()
        };
        let high = Config {
            output_format: Some(OutputFormat::Json),
            ..Default::default()
        };

        let merged = ConfigMerger::merge([&low, &high]);
        assert_eq!(merged.output_format, Some(OutputFormat::Json));
        assert_eq!(merged.disable_autoinit, Some(false));
    }

    #[test]
    fn test_nested_fields_merge_individually() {
        let mut target = Config {
            expiry: Some(ExpiryConfig {
                pending_max_age_hours: Some(24),
            }),
            recurrence: Some(RecurrenceConfig { sessions: Some(6) }),
            ..Default::default()
        };
        let source = Config {
            expiry: Some(ExpiryConfig {
                pending_max_age_hours: None,
            }),
            recurrence: Some(RecurrenceConfig { sessions: Some(8) }),
            ..Default::default()
        };

        ConfigMerger::merge_into(&mut target, &source);
        assert_eq!(target.expiry.unwrap().pending_max_age_hours, Some(24));
        assert_eq!(target.recurrence.unwrap().sessions, Some(8));
    }

    #[test]
    fn test_merge_nothing_is_default() {
        let merged = ConfigMerger::merge(std::iter::empty());
        assert_eq!(merged, Config::default());
    }
}
