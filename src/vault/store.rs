//! On-disk vault file handling.
//!
//! `VaultStore` owns the vault path.  It detects which state the file is
//! in (absent, valid, corrupt), serializes access through an advisory
//! lock on a sidecar `.<name>.lock` file, and writes through a temp file
//! plus rename so the target is always a complete old or new version.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, info, warn};

use crate::crypto::{decrypt, encrypt, VaultKey, SALT_LEN};
use crate::errors::{Result, VaultError};

use super::codec;
use super::entry::PasswordEntry;
use super::format::Envelope;

/// What is currently at the vault path.
#[derive(Debug)]
pub enum VaultState {
    /// No file exists.
    Absent,
    /// The file parses as an envelope (its contents are not yet authenticated).
    Valid(Envelope),
    /// The file exists but is not a readable envelope.
    Corrupt(String),
}

/// How `save` treats an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// Refuse to replace a corrupt file or a vault the key does not open.
    Safe,
    /// Replace whatever is at the path.
    Overwrite,
}

/// Handle to a vault file path.
#[derive(Debug, Clone)]
pub struct VaultStore {
    path: PathBuf,
}

impl VaultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ------------------------------------------------------------------
    // Reading
    // ------------------------------------------------------------------

    /// Inspect the file under a shared lock.
    pub fn state(&self) -> Result<VaultState> {
        if !self.path.exists() {
            return Ok(VaultState::Absent);
        }
        let _lock = self.lock(false)?;
        self.state_unlocked()
    }

    /// Read the salt of an existing vault.
    pub fn read_salt(&self) -> Result<[u8; SALT_LEN]> {
        Ok(self.read_envelope()?.salt)
    }

    /// Read and parse the envelope under a shared lock.
    pub fn read_envelope(&self) -> Result<Envelope> {
        if !self.path.exists() {
            return Err(VaultError::VaultNotFound(self.path.clone()));
        }
        let _lock = self.lock(false)?;
        let data = read_existing(&self.path)?;
        Envelope::from_bytes(&data)
    }

    /// Read, authenticate and decode the stored entries.
    pub fn load(&self, key: &VaultKey) -> Result<Vec<PasswordEntry>> {
        let envelope = self.read_envelope()?;

        let aad = Envelope::aad(envelope.version, &envelope.salt);
        let plaintext = decrypt(key.as_bytes(), &envelope.sealed, &aad)?;
        let entries = codec::decode(&plaintext)?;

        info!(path = %self.path.display(), entries = entries.len(), "vault loaded");
        Ok(entries)
    }

    // ------------------------------------------------------------------
    // Writing
    // ------------------------------------------------------------------

    /// Encode, encrypt and atomically write `entries`.
    ///
    /// In `SaveMode::Safe` an existing vault must carry the key's salt and
    /// authenticate under the key, and a corrupt file is left untouched.
    pub fn save(&self, key: &VaultKey, entries: &[PasswordEntry], mode: SaveMode) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let _lock = self.lock(true)?;

        if mode == SaveMode::Safe {
            self.check_replaceable(key)?;
        }

        let plaintext = codec::encode(entries)?;
        let aad = Envelope::aad(key.version(), key.salt());
        let sealed = encrypt(key.as_bytes(), &plaintext, &aad)?;
        let envelope = Envelope {
            version: key.version(),
            salt: *key.salt(),
            sealed,
        };

        let tmp = stage(&self.path, &envelope.to_bytes())?;
        commit(&tmp, &self.path)?;

        info!(path = %self.path.display(), entries = entries.len(), "vault saved");
        Ok(())
    }

    /// Decide whether a safe save may replace the current file.
    fn check_replaceable(&self, key: &VaultKey) -> Result<()> {
        match self.state_unlocked()? {
            VaultState::Absent => {
                debug!(path = %self.path.display(), "no vault yet, creating");
                Ok(())
            }
            VaultState::Valid(existing) => {
                if existing.salt != *key.salt() {
                    warn!(path = %self.path.display(), "key salt differs from stored salt");
                    return Err(VaultError::KeyMismatch(self.path.clone()));
                }
                let aad = Envelope::aad(existing.version, &existing.salt);
                decrypt(key.as_bytes(), &existing.sealed, &aad)?;
                debug!(path = %self.path.display(), "replacing existing vault");
                Ok(())
            }
            VaultState::Corrupt(reason) => {
                warn!(path = %self.path.display(), %reason, "refusing to overwrite unreadable vault");
                Err(VaultError::OverwriteRefused(self.path.clone()))
            }
        }
    }

    /// Classify the file; caller holds the lock.
    fn state_unlocked(&self) -> Result<VaultState> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(VaultState::Absent),
            Err(e) => return Err(e.into()),
        };
        match Envelope::from_bytes(&data) {
            Ok(envelope) => Ok(VaultState::Valid(envelope)),
            Err(e) => Ok(VaultState::Corrupt(e.to_string())),
        }
    }

    // ------------------------------------------------------------------
    // Locking
    // ------------------------------------------------------------------

    fn lock(&self, exclusive: bool) -> Result<LockGuard> {
        let lock_path = sidecar_path(&self.path, "lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&lock_path)?;
        if exclusive {
            FileExt::lock_exclusive(&file)?;
        } else {
            FileExt::lock_shared(&file)?;
        }
        Ok(LockGuard { file })
    }
}

/// Holds an advisory lock until dropped.
struct LockGuard {
    file: File,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // Closing the descriptor releases the lock as well.
        let _ = FileExt::unlock(&self.file);
    }
}

/// `dir/.name.ext` next to the vault file.
fn sidecar_path(path: &Path, ext: &str) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.{ext}",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

fn read_existing(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => VaultError::VaultNotFound(path.to_path_buf()),
        _ => VaultError::Io(e),
    })
}

/// Write `bytes` to the temp file for `path` and flush it to disk.
///
/// The target itself is not touched; `commit` makes the write visible.
pub(crate) fn stage(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    let tmp_path = sidecar_path(path, "tmp");

    let written = (|| -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(tmp_path)
}

/// Atomically replace `path` with the staged temp file.
///
/// Once the rename succeeds the new vault is committed: the data was
/// fsynced in `stage`. A failure to fsync the directory afterwards only
/// weakens durability of the rename across power loss, so it is logged
/// rather than reported as a failed save.
pub(crate) fn commit(tmp_path: &Path, path: &Path) -> Result<()> {
    fs::rename(tmp_path, path)?;

    if let Err(e) = sync_parent_dir(path) {
        warn!(path = %path.display(), error = %e, "vault renamed but directory fsync failed");
    }
    Ok(())
}

/// Flush the directory entry of `path` to disk. No-op off unix.
fn sync_parent_dir(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        let parent = path.parent().unwrap_or(Path::new("."));
        let dir = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        File::open(dir)?.sync_all()?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
