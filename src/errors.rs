use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in the password vault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Entry errors ---
    #[error("Invalid entry: {0}")]
    Validation(String),

    // --- Crypto errors ---
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Incorrect password or corrupted vault")]
    Authentication,

    // --- Format errors ---
    #[error("Corrupt vault contents: {0}")]
    CorruptData(String),

    #[error("Invalid vault format: {0}")]
    VaultFormat(String),

    // --- Vault file errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Key was not derived for the vault at {0}")]
    KeyMismatch(PathBuf),

    #[error("Refusing to overwrite unreadable vault at {0}")]
    OverwriteRefused(PathBuf),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("No entry for '{0}'")]
    EntryNotFound(String),

    #[error("Entry '{0}' already exists")]
    EntryAlreadyExists(String),
}

/// Convenience type alias for vault results.
pub type Result<T> = std::result::Result<T, VaultError>;
