//! Failures of a `fieldbook` invocation and the exit status each one maps to.
//!
//! Scripts branch on the exit status, so the mapping is part of the CLI's
//! interface: a refused booking or transition is `1`, a held write lock is
//! `2`, a missing database with auto-init off is `3`, and bad input is `4`.

use fieldbook::Error as LibError;
use std::fmt;
use std::path::PathBuf;

/// Exit statuses returned by the `fieldbook` binary.
pub mod exit {
    /// The booking, transition or cancellation was refused.
    pub const REFUSED: i32 = 1;
    /// Another writer held the database past the busy timeout.
    pub const LOCK_TIMEOUT: i32 = 2;
    /// No database exists and auto-init is disabled.
    pub const NOT_INITIALIZED: i32 = 3;
    /// An argument could not be parsed or describes an empty window.
    pub const INVALID_ARGUMENTS: i32 = 4;
    /// Reading or writing outside the database failed.
    pub const IO: i32 = 5;
    /// Any other failure reported by the booking library.
    pub const BOOKING: i32 = 6;
    /// `config.yaml` or a `FIELDBOOK_*` variable is invalid.
    pub const CONFIG: i32 = 7;
}

/// Why a command failed.
#[derive(Debug)]
pub enum CliError {
    /// The booking library reported an error.
    Booking(LibError),

    /// A command-line value was rejected before reaching the library.
    InvalidArguments(String),

    /// Filesystem or stream failure.
    Io(std::io::Error),

    /// The database stayed locked by another booking past the busy timeout.
    LockTimeout,

    /// The database at this path does not exist and may not be created.
    NotInitialized(PathBuf),

    /// Configuration could not be loaded or failed validation.
    Config(String),

    /// The request was understood but cannot be honored, e.g. a dry run
    /// found a taken session or a group had nothing to cancel.
    Refused(String),
}

impl CliError {
    /// Exit status for this failure; see [`exit`].
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Refused(_) => exit::REFUSED,
            CliError::Booking(lib_err) => match lib_err {
                LibError::SlotConflict { .. } | LibError::InvalidStatusTransition { .. } => {
                    exit::REFUSED
                }
                LibError::InvalidWindow { .. } => exit::INVALID_ARGUMENTS,
                LibError::Configuration(_) => exit::CONFIG,
                _ => exit::BOOKING,
            },
            CliError::LockTimeout => exit::LOCK_TIMEOUT,
            CliError::NotInitialized(_) => exit::NOT_INITIALIZED,
            CliError::InvalidArguments(_) => exit::INVALID_ARGUMENTS,
            CliError::Io(_) => exit::IO,
            CliError::Config(_) => exit::CONFIG,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Booking(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::LockTimeout => write!(
                f,
                "Database is busy with another booking (raise --busy-timeout to wait longer)"
            ),
            CliError::NotInitialized(path) => write!(
                f,
                "No database at {} (run `fieldbook init` or drop --disable-autoinit)",
                path.display()
            ),
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
            CliError::Refused(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Booking(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        if e.is_busy() {
            CliError::LockTimeout
        } else {
            CliError::Booking(e)
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
