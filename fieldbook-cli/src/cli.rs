//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    AddFieldCommand, AttachProofCommand, BookCommand, CancelGroupCommand, CompletionsCommand,
    ExpireCommand, FieldsCommand, InitCommand, ListCommand, ScheduleCommand, SetStatusCommand,
    ShowDataDirCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for booking sports fields by the hour.
#[derive(Parser)]
#[command(name = "fieldbook")]
#[command(version, about = "Book sports fields by the hour", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "FIELDBOOK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(
        long,
        value_name = "SECONDS",
        global = true,
        env = "FIELDBOOK_BUSY_TIMEOUT"
    )]
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization
    #[arg(long, global = true, env = "FIELDBOOK_DISABLE_AUTOINIT")]
    pub disable_autoinit: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and database
    Init(InitCommand),

    /// Register a field with its hourly rate
    AddField(AddFieldCommand),

    /// List fields
    Fields(FieldsCommand),

    /// Book a field for a time window
    Book(BookCommand),

    /// List reservations
    List(ListCommand),

    /// Show the booked windows of a field
    Schedule(ScheduleCommand),

    /// Change the status of a reservation
    SetStatus(SetStatusCommand),

    /// Cancel every session of a booking group
    CancelGroup(CancelGroupCommand),

    /// Record a payment-proof reference on a reservation
    AttachProof(AttachProofCommand),

    /// Expire unpaid reservations older than a threshold
    Expire(ExpireCommand),

    /// Show the resolved data directory path
    ShowDataDir(ShowDataDirCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
