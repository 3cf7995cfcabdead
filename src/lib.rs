pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod vault;

pub use errors::{Result, VaultError};
pub use vault::{create_key, open_key, PasswordEntry, TagSet, VaultManager};
