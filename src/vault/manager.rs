//! `VaultManager`: the public façade over a single vault file.
//!
//! Two ways to get a key:
//! - `create_key` for a vault that does not exist yet (fresh salt, which
//!   the first `save` persists);
//! - `open_key` for an existing vault (salt read from the file first).
//!
//! The manager owns its `VaultKey` for its whole lifetime; the key bytes
//! are zeroed when the manager is closed or dropped.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::crypto::{VaultKey, SALT_LEN};
use crate::errors::{Result, VaultError};

use super::entry::PasswordEntry;
use super::format::CURRENT_VERSION;
use super::store::{SaveMode, VaultStore};

/// Derive a key for a brand-new vault.
pub fn create_key(password: &str) -> Result<VaultKey> {
    VaultKey::generate(password.as_bytes(), CURRENT_VERSION)
}

/// Derive the key for the existing vault at `path`, using its stored salt
/// and the KDF cost pinned by its format version.
pub fn open_key(password: &str, path: impl AsRef<Path>) -> Result<VaultKey> {
    let envelope = VaultStore::new(path.as_ref()).read_envelope()?;
    VaultKey::derive(password.as_bytes(), &envelope.salt, envelope.version)
}

/// Handle for saving and loading the entries of one vault file.
#[derive(Debug)]
pub struct VaultManager {
    key: VaultKey,
    store: VaultStore,
}

impl VaultManager {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Bind a key to a vault path.  Nothing is read or written yet.
    pub fn new(key: VaultKey, path: impl Into<PathBuf>) -> Self {
        Self {
            key,
            store: VaultStore::new(path),
        }
    }

    /// Create a new, empty vault at `path`.
    pub fn create(password: &str, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            return Err(VaultError::VaultAlreadyExists(path));
        }
        let manager = Self::new(create_key(password)?, path);
        manager.save(&[])?;
        Ok(manager)
    }

    /// Open the existing vault at `path`.
    ///
    /// Only the salt is read here; a wrong password surfaces on `load`.
    pub fn open(password: &str, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let key = open_key(password, &path)?;
        debug!(path = %path.display(), "derived key from stored salt");
        Ok(Self::new(key, path))
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Encrypt and atomically write `entries`, replacing the stored set.
    ///
    /// Refuses to replace a corrupt file (`OverwriteRefused`), a vault with
    /// a different salt (`KeyMismatch`) or one the key cannot decrypt
    /// (`Authentication`).
    pub fn save(&self, entries: &[PasswordEntry]) -> Result<()> {
        self.store.save(&self.key, entries, SaveMode::Safe)
    }

    /// Like `save`, but replaces whatever is at the path.
    pub fn overwrite(&self, entries: &[PasswordEntry]) -> Result<()> {
        self.store.save(&self.key, entries, SaveMode::Overwrite)
    }

    /// Read, decrypt and decode all entries, in save order.
    pub fn load(&self) -> Result<Vec<PasswordEntry>> {
        self.store.load(&self.key)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// The salt the manager's key was derived from.
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        self.key.salt()
    }

    /// Release the manager; the key is zeroed as it drops.
    pub fn close(self) {
        debug!(path = %self.store.path().display(), "closing vault manager");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_key_then_open_key_agree() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v.pwv");

        let key = create_key("correct horse").unwrap();
        let salt = *key.salt();
        let bytes = *key.as_bytes();
        VaultManager::new(key, &path).save(&[]).unwrap();

        let reopened = open_key("correct horse", &path).unwrap();
        assert_eq!(*reopened.salt(), salt);
        assert_eq!(*reopened.as_bytes(), bytes);
    }

    #[test]
    fn open_key_on_missing_vault_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = open_key("pw", dir.path().join("none.pwv")).unwrap_err();
        assert!(matches!(err, VaultError::VaultNotFound(_)));
    }

    #[test]
    fn create_refuses_existing_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v.pwv");
        VaultManager::create("pw", &path).unwrap().close();
        assert!(matches!(
            VaultManager::create("pw", &path),
            Err(VaultError::VaultAlreadyExists(_))
        ));
    }
}
