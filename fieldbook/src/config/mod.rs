//! Configuration system for fieldbook.
//!
//! This module provides layered configuration with support for:
//! - A YAML configuration file (`<data_dir>/config.yaml`)
//! - Environment variable overrides
//! - Programmatic configuration via builder pattern
//! - Validation
//!
//! # Configuration Precedence
//!
//! Configuration is merged from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`FIELDBOOK_*`)
//! 3. `config.yaml` in the data directory
//! 4. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use fieldbook::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new().build().unwrap();
//! let policy = config.recurrence_policy().unwrap();
//! println!("recurring bookings span {} weeks", policy.sessions());
//! ```
//!
//! Programmatic configuration:
//!
//! ```
//! use fieldbook::config::{Config, ConfigBuilder, ExpiryConfig};
//!
//! let custom = Config {
//!     expiry: Some(ExpiryConfig {
//!         pending_max_age_hours: Some(48),
//!     }),
//!     ..Default::default()
//! };
//!
//! let config = ConfigBuilder::new()
//!     .skip_files()
//!     .skip_env()
//!     .with_config(custom)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.expiry_or_default().pending_max_age_hours, Some(48));
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod proptests;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource, CONFIG_FILE_NAME};
pub use merger::ConfigMerger;
pub use schema::{Config, ExpiryConfig, OutputFormat, RecurrenceConfig};
pub use validator::ConfigValidator;
