//! Vault module — encrypted credential storage.
//!
//! This module provides:
//! - `PasswordEntry` and `TagSet` (`entry`)
//! - Canonical byte encoding of entry collections (`codec`)
//! - Binary vault file envelope and format table (`format`)
//! - Locked, atomic file access (`store`)
//! - The `VaultManager` façade and key constructors (`manager`)

pub mod codec;
pub mod entry;
pub mod format;
pub mod manager;
pub mod store;

// Re-export the most commonly used items.
pub use entry::{PasswordEntry, TagSet};
pub use format::{Envelope, CURRENT_VERSION};
pub use manager::{create_key, open_key, VaultManager};
pub use store::{SaveMode, VaultState, VaultStore};
