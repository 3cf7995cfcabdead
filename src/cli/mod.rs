//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};

/// Minimum password length for new vaults.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable holding the vault password for scripted use.
const PASSWORD_ENV: &str = "PWVAULT_PASSWORD";

/// Environment variable holding the log filter.
const LOG_ENV: &str = "PWVAULT_LOG";

/// pwvault CLI: encrypted password vault.
#[derive(Parser)]
#[command(name = "pwvault", about = "Encrypted password vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file (default: `vault_file` from .pwvault.toml, else vault.pwv)
    #[arg(long, global = true)]
    pub vault: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new, empty vault
    Init,

    /// Add a credential
    Add {
        /// Site or service name (e.g. example.com)
        site: String,
        /// Account username
        username: String,
        /// Secret value (omit for interactive prompt)
        #[arg(long)]
        secret: Option<String>,
        /// Free-form notes
        #[arg(short, long, default_value = "")]
        notes: String,
        /// Tag to attach (repeatable)
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,
    },

    /// Remove a credential
    Remove {
        /// Site or service name
        site: String,
        /// Account username
        username: String,
    },

    /// List credentials (secrets are not shown)
    List,

    /// Print the secret for a site
    Get {
        /// Site or service name
        site: String,
        /// Account username (required when a site has several accounts)
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Export all credentials as JSON
    Export {
        /// Output file path (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Install the stderr log subscriber.
///
/// `PWVAULT_LOG` wins; otherwise `log_level` from `.pwvault.toml`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        let level = std::env::current_dir()
            .ok()
            .and_then(|cwd| Settings::load(&cwd).ok())
            .unwrap_or_default()
            .log_level;
        EnvFilter::new(level)
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Get the vault password from `PWVAULT_PASSWORD` or an interactive prompt.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter vault password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation (used during `init`).
///
/// Also respects `PWVAULT_PASSWORD`.  Enforces a minimum length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        if pw.len() < MIN_PASSWORD_LEN {
            return Err(VaultError::CommandFailed(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        return Ok(pw);
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose vault password")
            .with_confirmation(
                "Confirm vault password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;

        if password.len() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Prompt for an entry's secret without echoing it.
pub fn prompt_secret(site: &str) -> Result<Zeroizing<String>> {
    let secret = dialoguer::Password::new()
        .with_prompt(format!("Secret for {site}"))
        .allow_empty_password(true)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("secret prompt: {e}")))?;
    Ok(Zeroizing::new(secret))
}

fn password_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Resolve the vault file: `--vault`, else the configured `vault_file`.
pub fn vault_path(cli: &Cli) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    match &cli.vault {
        Some(path) => Ok(cwd.join(path)),
        None => Ok(Settings::load(&cwd)?.vault_path(&cwd)),
    }
}
