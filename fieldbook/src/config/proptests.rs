//! Property-based tests for configuration system.

use super::merger::ConfigMerger;
use super::schema::{Config, ExpiryConfig, OutputFormat, RecurrenceConfig};
use super::validator::ConfigValidator;
use crate::recurrence::MAX_SESSION_COUNT;
use proptest::prelude::*;

fn output_format_strategy() -> impl Strategy<Value = OutputFormat> {
    prop_oneof![
        Just(OutputFormat::Json),
        Just(OutputFormat::Csv),
        Just(OutputFormat::Tsv),
        Just(OutputFormat::Table),
    ]
}

// Strategy for generating configs
fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(prop::option::of(0u32..=60)),
        prop::option::of(prop::option::of(0u32..=1000)),
        prop::option::of(0u64..=120),
        prop::option::of(output_format_strategy()),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(sessions, hours, lock, format, autoinit)| Config {
            recurrence: sessions.map(|sessions| RecurrenceConfig { sessions }),
            expiry: hours.map(|pending_max_age_hours| ExpiryConfig {
                pending_max_age_hours,
            }),
            maximum_lock_wait_seconds: lock,
            output_format: format,
            disable_autoinit: autoinit,
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Set values in the higher layer always survive the merge
    #[test]
    fn config_merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let merged = ConfigMerger::merge([&low, &high]);

        if high.maximum_lock_wait_seconds.is_some() {
            prop_assert_eq!(merged.maximum_lock_wait_seconds, high.maximum_lock_wait_seconds);
        } else {
            prop_assert_eq!(merged.maximum_lock_wait_seconds, low.maximum_lock_wait_seconds);
        }
        if high.output_format.is_some() {
            prop_assert_eq!(merged.output_format, high.output_format);
        }
        if let Some(sessions) = high.recurrence.as_ref().and_then(|r| r.sessions) {
            prop_assert_eq!(merged.recurrence.and_then(|r| r.sessions), Some(sessions));
        }
    }

    // Merging a config onto itself changes nothing
    #[test]
    fn config_merge_idempotent(config in config_strategy()) {
        let once = ConfigMerger::merge([&config]);
        let twice = ConfigMerger::merge([&config, &config]);
        prop_assert_eq!(once, twice);
    }

    // The validator and the recurrence policy agree on session bounds
    #[test]
    fn validator_matches_policy(sessions in 0u32..=60) {
        let config = Config {
            recurrence: Some(RecurrenceConfig { sessions: Some(sessions) }),
            ..Default::default()
        };
        let valid = (1..=MAX_SESSION_COUNT).contains(&sessions);
        prop_assert_eq!(ConfigValidator::validate(&config).is_ok(), valid);
        prop_assert_eq!(config.recurrence_policy().is_ok(), valid);
    }

    // Configs survive a YAML round trip
    #[test]
    fn config_yaml_roundtrip(config in config_strategy()) {
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        prop_assert_eq!(parsed, config);
    }
}
