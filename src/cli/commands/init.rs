//! `pwvault init` — create a new, empty vault.

use crate::cli::output;
use crate::cli::{prompt_new_password, vault_path, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::VaultManager;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let path = vault_path(cli)?;

    if path.exists() {
        output::tip("Use `pwvault add` to add credentials to the existing vault.");
        return Err(VaultError::VaultAlreadyExists(path));
    }

    let password = prompt_new_password()?;
    let manager = VaultManager::create(&password, &path)?;
    manager.close();

    output::success(&format!("Vault created at {}", path.display()));
    output::tip("Run `pwvault add <SITE> <USERNAME>` to add a credential.");
    output::tip("Run `pwvault list` to see all credentials.");

    Ok(())
}
