//! Add-field command implementation.
//!
//! Registers a bookable field. Prints the new field id on stdout.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, parse_money, GlobalOptions};
use clap::Args;

/// Register a field with its hourly rate.
#[derive(Args)]
pub struct AddFieldCommand {
    /// Display name of the field
    #[arg(long)]
    pub name: String,

    /// Price of one hour, e.g. 35000 or 1250.50
    #[arg(long, value_name = "AMOUNT")]
    pub rate: String,
}

impl AddFieldCommand {
    /// Execute the add-field command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CliError::InvalidArguments(
                "field name must not be empty".into(),
            ));
        }
        let rate = parse_money(&self.rate)?;

        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let resource = db.create_resource(name, rate)?;

        println!("{}", resource.id());
        if !global.quiet {
            eprintln!(
                "Added field {} '{}' at {} per hour",
                resource.id(),
                resource.name(),
                resource.hourly_rate()
            );
        }

        Ok(())
    }
}
