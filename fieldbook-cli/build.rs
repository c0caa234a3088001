//! Build script for fieldbook-cli.
//!
//! Generates the `fieldbook.1` man page into `OUT_DIR` with clap_mangen.
//!
//! The command tree is rebuilt here by hand because a build script cannot
//! depend on the crate it builds.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// Keep in sync with src/cli.rs.
fn build_cli() -> Command {
    Command::new("fieldbook")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Book sports fields by the hour")
        .long_about(
            "Admit single and weekly recurring bookings of sports fields, never letting two live bookings overlap",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("FIELDBOOK_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the default busy timeout (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("FIELDBOOK_BUSY_TIMEOUT"),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic database initialization")
                .global(true)
                .action(ArgAction::SetTrue)
                .env("FIELDBOOK_DISABLE_AUTOINIT"),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Initialize the data directory and database")
                .long_about("Create the data directory, the database and optionally a default config.yaml"),
            Command::new("add-field")
                .about("Register a field with its hourly rate"),
            Command::new("fields").about("List fields"),
            Command::new("book")
                .about("Book a field for a time window")
                .long_about(
                    "Admit a booking; with --recurring the same window is booked on consecutive weeks, all or nothing",
                ),
            Command::new("list")
                .about("List reservations")
                .long_about("List reservations filtered by field, requester, status, group or time range"),
            Command::new("schedule")
                .about("Show the booked windows of a field")
                .long_about("Show every window of a field that is taken, from now to one month ahead by default"),
            Command::new("set-status")
                .about("Change the status of a reservation"),
            Command::new("cancel-group")
                .about("Cancel every session of a booking group"),
            Command::new("attach-proof")
                .about("Record a payment-proof reference on a reservation"),
            Command::new("expire")
                .about("Expire unpaid reservations older than a threshold"),
            Command::new("show-data-dir").about("Show the resolved data directory path"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() -> std::io::Result<()> {
    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "OUT_DIR is not set")
    })?);
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;
    fs::write(man_dir.join("fieldbook.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
