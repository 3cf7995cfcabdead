//! `pwvault list` — display all credentials in a table.

use crate::cli::output;
use crate::cli::Cli;
use crate::errors::Result;

use super::open_vault;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let manager = open_vault(cli)?;
    let entries = manager.load()?;

    let noun = if entries.len() == 1 { "entry" } else { "entries" };
    output::info(&format!("{} {noun}", entries.len()));
    output::print_entries_table(&entries);

    Ok(())
}
