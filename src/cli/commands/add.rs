//! `pwvault add` — store a new credential.

use crate::cli::output;
use crate::cli::{prompt_secret, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::PasswordEntry;

use super::open_vault;

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    site: &str,
    username: &str,
    secret: Option<&str>,
    notes: &str,
    tags: &[String],
) -> Result<()> {
    let manager = open_vault(cli)?;
    let mut entries = manager.load()?;

    if entries.iter().any(|e| e.matches(site, username)) {
        return Err(VaultError::EntryAlreadyExists(format!("{username}@{site}")));
    }

    let secret = match secret {
        Some(s) => zeroize::Zeroizing::new(s.to_string()),
        None => prompt_secret(site)?,
    };

    let entry = PasswordEntry::new(site, username, secret.as_str(), notes, tags.iter().cloned())?;
    entries.push(entry);
    manager.save(&entries)?;

    output::success(&format!("Added {username}@{site}"));
    Ok(())
}
