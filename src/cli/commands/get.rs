//! `pwvault get` — print a single credential's secret.

use crate::cli::Cli;
use crate::errors::{Result, VaultError};

use super::open_vault;

/// Execute the `get` command.
pub fn execute(cli: &Cli, site: &str, username: Option<&str>) -> Result<()> {
    let manager = open_vault(cli)?;
    let entries = manager.load()?;

    let mut matches = entries
        .iter()
        .filter(|e| e.site() == site && username.map_or(true, |u| e.username() == u));

    let entry = matches.next().ok_or_else(|| match username {
        Some(u) => VaultError::EntryNotFound(format!("{u}@{site}")),
        None => VaultError::EntryNotFound(site.to_string()),
    })?;
    if matches.next().is_some() {
        return Err(VaultError::CommandFailed(format!(
            "several accounts stored for '{site}', pass --username"
        )));
    }

    println!("{}", entry.secret());
    Ok(())
}
