//! Library exports for fieldbook-cli.
//!
//! This module exports the CLI structure so it can be reused for
//! generated documentation.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::Cli;
