//! One module per subcommand.

pub mod add;
pub mod export;
pub mod get;
pub mod init;
pub mod list;
pub mod remove;

use crate::cli::{prompt_password, vault_path, Cli};
use crate::errors::Result;
use crate::vault::VaultManager;

/// Open the vault named by the CLI arguments, prompting for the password.
fn open_vault(cli: &Cli) -> Result<VaultManager> {
    let path = vault_path(cli)?;
    let password = prompt_password()?;
    VaultManager::open(&password, path)
}
