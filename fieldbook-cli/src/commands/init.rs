//! Init command implementation.
//!
//! This module implements the `init` command for explicitly initializing
//! the fieldbook data directory and database.

use crate::error::CliError;
use crate::utils::{resolve_data_dir, GlobalOptions};
use clap::Args;
use fieldbook::config::CONFIG_FILE_NAME;
use fieldbook::database::DATABASE_FILE_NAME;
use fieldbook::operations::{init_database, InitOptions};
use std::path::PathBuf;

/// Initialize the data directory and database.
#[derive(Args)]
pub struct InitCommand {
    /// Data directory to initialize (defaults to the global one)
    #[arg(long = "path", value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Replace an existing database
    #[arg(long)]
    pub overwrite: bool,

    /// Create a commented default configuration file
    #[arg(long)]
    pub with_config: bool,

    /// Preview actions without executing
    #[arg(long)]
    pub dry_run: bool,
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// `--disable-autoinit` is ignored here: creating the database is the
    /// whole point of the command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let data_dir = match self.path {
            Some(ref path) => path.clone(),
            None => resolve_data_dir(global)?,
        };

        if self.dry_run {
            self.describe(&data_dir);
            return Ok(());
        }

        let options = InitOptions::new(data_dir)
            .with_overwrite(self.overwrite)
            .with_create_config(self.with_config);
        let result = init_database(&options)?;

        if global.quiet {
            return Ok(());
        }

        println!("Initialized fieldbook in: {}", result.data_dir.display());
        if result.data_dir_created {
            println!("  - Created data directory");
        }
        if result.database_created {
            if self.overwrite {
                println!("  - Recreated database");
            } else {
                println!("  - Created database");
            }
        }
        if result.config_created {
            println!("  - Created default configuration file");
        } else if self.with_config {
            println!("  - Configuration file already exists (not overwritten)");
        }

        Ok(())
    }

    fn describe(&self, data_dir: &std::path::Path) {
        println!("Dry-run mode: no changes will be made");
        println!();
        println!("Would initialize fieldbook in: {}", data_dir.display());

        if data_dir.exists() {
            println!("  - Data directory already exists: {}", data_dir.display());
        } else {
            println!("  - Create data directory: {}", data_dir.display());
        }

        let db_path = data_dir.join(DATABASE_FILE_NAME);
        if !db_path.exists() {
            println!("  - Create database: {}", db_path.display());
        } else if self.overwrite {
            println!("  - Remove existing database: {}", db_path.display());
            println!("  - Create new database: {}", db_path.display());
        } else {
            println!(
                "  - ERROR: Database already exists (use --overwrite to replace): {}",
                db_path.display()
            );
        }

        if self.with_config {
            let config_path = data_dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                println!(
                    "  - Configuration file already exists (will not overwrite): {}",
                    config_path.display()
                );
            } else {
                println!("  - Create configuration file: {}", config_path.display());
            }
        }
    }
}
