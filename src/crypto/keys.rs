//! The derived vault key.
//!
//! A `VaultKey` owns the 32 key bytes together with the salt and the
//! vault format version they were derived for.  The version pins the KDF
//! cost, so the store can stamp it into the file and a later open picks
//! the same parameters.  Key bytes are zeroed when the value drops.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::kdf::{derive_key, generate_salt, Argon2Params, KEY_LEN, SALT_LEN};
use crate::errors::{Result, VaultError};
use crate::vault::format::kdf_params;

#[derive(Zeroize, ZeroizeOnDrop)]
pub struct VaultKey {
    bytes: [u8; KEY_LEN],
    salt: [u8; SALT_LEN],
    version: u16,
}

impl VaultKey {
    /// Derive a key for a brand-new vault of format `version` under a
    /// freshly generated salt.
    pub fn generate(password: &[u8], version: u16) -> Result<Self> {
        let params = kdf_params(version)?;
        Self::generate_with_params(password, &params, version)
    }

    /// Derive the key for an existing salt, with the cost of `version`.
    pub fn derive(password: &[u8], salt: &[u8], version: u16) -> Result<Self> {
        let params = kdf_params(version)?;
        Self::derive_with_params(password, salt, &params, version)
    }

    pub(crate) fn generate_with_params(
        password: &[u8],
        params: &Argon2Params,
        version: u16,
    ) -> Result<Self> {
        let salt = generate_salt();
        Self::derive_with_params(password, &salt, params, version)
    }

    pub(crate) fn derive_with_params(
        password: &[u8],
        salt: &[u8],
        params: &Argon2Params,
        version: u16,
    ) -> Result<Self> {
        let mut bytes = derive_key(password, salt, params)?;
        let salt: [u8; SALT_LEN] = salt
            .try_into()
            .map_err(|_| VaultError::KeyDerivation("salt length mismatch".into()))?;
        let key = Self {
            bytes,
            salt,
            version,
        };
        bytes.zeroize();
        Ok(key)
    }

    /// Access the raw key bytes (e.g. to pass to the cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// The salt this key was derived from.
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// The vault format version whose KDF cost produced this key.
    pub fn version(&self) -> u16 {
        self.version
    }
}

impl fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultKey")
            .field("bytes", &"<redacted>")
            .field("salt", &self.salt)
            .field("version", &self.version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: Argon2Params = Argon2Params {
        memory_kib: 8_192,
        iterations: 1,
        parallelism: 1,
    };

    #[test]
    fn generate_uses_fresh_salt_each_time() {
        let a = VaultKey::generate_with_params(b"password", &FAST, 1).unwrap();
        let b = VaultKey::generate_with_params(b"password", &FAST, 1).unwrap();
        assert_ne!(a.salt(), b.salt());
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn derive_with_same_salt_reproduces_key() {
        let a = VaultKey::generate_with_params(b"password", &FAST, 1).unwrap();
        let b = VaultKey::derive_with_params(b"password", a.salt(), &FAST, 1).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn zeroize_clears_key_bytes() {
        let mut key = VaultKey::derive_with_params(b"password", &[9u8; SALT_LEN], &FAST, 1).unwrap();
        key.zeroize();
        assert!(key.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn unknown_version_has_no_kdf_cost() {
        assert!(VaultKey::generate(b"password", 0).is_err());
        assert!(VaultKey::derive(b"password", &[9u8; SALT_LEN], 2).is_err());
    }

    #[test]
    fn public_derive_uses_the_version_cost() {
        let a = VaultKey::generate(b"password", 1).unwrap();
        let b = VaultKey::derive_with_params(b"password", a.salt(), &Argon2Params::V1, 1).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_eq!(a.version(), 1);
    }

    #[test]
    fn debug_does_not_print_key_bytes() {
        let key = VaultKey::derive_with_params(b"password", &[9u8; SALT_LEN], &FAST, 1).unwrap();
        let rendered = format!("{key:?}");
        assert!(rendered.contains("<redacted>"));
    }
}
