//! `pwvault remove` — delete a credential.

use crate::cli::output;
use crate::cli::Cli;
use crate::errors::{Result, VaultError};

use super::open_vault;

/// Execute the `remove` command.
pub fn execute(cli: &Cli, site: &str, username: &str) -> Result<()> {
    let manager = open_vault(cli)?;
    let mut entries = manager.load()?;

    let before = entries.len();
    entries.retain(|e| !e.matches(site, username));
    if entries.len() == before {
        return Err(VaultError::EntryNotFound(format!("{username}@{site}")));
    }

    manager.save(&entries)?;
    output::success(&format!("Removed {username}@{site}"));
    Ok(())
}
