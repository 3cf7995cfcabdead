//! Binary vault file format.
//!
//! A vault file has this layout:
//!
//! ```text
//! [PWVT: 4 bytes][version: u16 LE][salt: N][nonce: M][tag: T][ciphertext: rest]
//! ```
//!
//! Format table:
//!
//! | version | N (salt) | M (nonce) | T (tag) | cipher      | KDF                       |
//! |---------|----------|-----------|---------|-------------|---------------------------|
//! | 1       | 32       | 12        | 16      | AES-256-GCM | Argon2id m=64MB t=3 p=4   |
//!
//! The magic, version and salt together form the associated data of the
//! AEAD, so any edit to them fails authentication.
//!
//! A `VaultKey` remembers the version whose KDF cost derived it, and a save
//! stamps that version into the header.

use crate::crypto::{Argon2Params, Sealed, NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::errors::{Result, VaultError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every vault file.
const MAGIC: &[u8; 4] = b"PWVT";

/// Current binary format version.
pub const CURRENT_VERSION: u16 = 1;

/// Magic + version.
const PREFIX_LEN: usize = 6;

/// Everything before the ciphertext.
pub const HEADER_LEN: usize = PREFIX_LEN + SALT_LEN + NONCE_LEN + TAG_LEN;

/// KDF cost pinned by a format version.
///
/// Every version listed here stays readable after `CURRENT_VERSION` moves on.
pub fn kdf_params(version: u16) -> Result<Argon2Params> {
    match version {
        1 => Ok(Argon2Params::V1),
        other => Err(VaultError::VaultFormat(format!(
            "unsupported version {other}, expected {CURRENT_VERSION}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Parsed contents of a vault file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub version: u16,
    pub salt: [u8; SALT_LEN],
    pub sealed: Sealed,
}

impl Envelope {
    /// Associated data bound into the AEAD tag.
    pub fn aad(version: u16, salt: &[u8; SALT_LEN]) -> Vec<u8> {
        let mut aad = Vec::with_capacity(PREFIX_LEN + SALT_LEN);
        aad.extend_from_slice(MAGIC);
        aad.extend_from_slice(&version.to_le_bytes());
        aad.extend_from_slice(salt);
        aad
    }

    /// Serialize to the on-disk byte layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + self.sealed.ciphertext.len());
        buf.extend_from_slice(MAGIC); // 4 bytes
        buf.extend_from_slice(&self.version.to_le_bytes()); // 2 bytes LE
        buf.extend_from_slice(&self.salt);
        buf.extend_from_slice(&self.sealed.nonce);
        buf.extend_from_slice(&self.sealed.tag);
        buf.extend_from_slice(&self.sealed.ciphertext);
        buf
    }

    /// Parse the on-disk byte layout.
    ///
    /// Fails with `VaultFormat` on wrong magic, a version without a
    /// `kdf_params` entry, or a file too short to hold the fixed header.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < PREFIX_LEN {
            return Err(VaultError::VaultFormat(
                "file too small to be a valid vault".into(),
            ));
        }

        if &data[0..4] != MAGIC {
            return Err(VaultError::VaultFormat("missing PWVT magic bytes".into()));
        }

        let version = u16::from_le_bytes([data[4], data[5]]);
        kdf_params(version)?;

        if data.len() < HEADER_LEN {
            return Err(VaultError::VaultFormat(format!(
                "truncated header: {} bytes, need {HEADER_LEN}",
                data.len()
            )));
        }

        let mut offset = PREFIX_LEN;
        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&data[offset..offset + SALT_LEN]);
        offset += SALT_LEN;
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&data[offset..offset + NONCE_LEN]);
        offset += NONCE_LEN;
        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&data[offset..offset + TAG_LEN]);
        offset += TAG_LEN;

        Ok(Self {
            version,
            salt,
            sealed: Sealed {
                nonce,
                ciphertext: data[offset..].to_vec(),
                tag,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        Envelope {
            version: CURRENT_VERSION,
            salt: [1u8; SALT_LEN],
            sealed: Sealed {
                nonce: [2u8; NONCE_LEN],
                ciphertext: vec![3u8; 10],
                tag: [4u8; TAG_LEN],
            },
        }
    }

    #[test]
    fn layout_places_fields_in_order() {
        let bytes = sample().to_bytes();
        assert_eq!(&bytes[0..4], b"PWVT");
        assert_eq!(&bytes[4..6], &[1, 0]);
        assert_eq!(bytes[6], 1);
        assert_eq!(bytes[6 + SALT_LEN], 2);
        assert_eq!(bytes[6 + SALT_LEN + NONCE_LEN], 4);
        assert_eq!(bytes.len(), HEADER_LEN + 10);
        assert_eq!(Envelope::from_bytes(&bytes).unwrap(), sample());
    }

    #[test]
    fn empty_ciphertext_parses() {
        let mut env = sample();
        env.sealed.ciphertext.clear();
        let bytes = env.to_bytes();
        assert_eq!(Envelope::from_bytes(&bytes).unwrap(), env);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = sample().to_bytes();
        bytes[0] = b'X';
        assert!(matches!(
            Envelope::from_bytes(&bytes),
            Err(VaultError::VaultFormat(_))
        ));
    }

    #[test]
    fn rejects_unknown_version() {
        let mut bytes = sample().to_bytes();
        bytes[4] = 9;
        assert!(matches!(
            Envelope::from_bytes(&bytes),
            Err(VaultError::VaultFormat(_))
        ));
        assert!(kdf_params(9).is_err());
        assert_eq!(kdf_params(CURRENT_VERSION).unwrap(), Argon2Params::V1);
    }

    #[test]
    fn rejects_truncated_header() {
        let bytes = sample().to_bytes();
        for cut in [0, 3, PREFIX_LEN, HEADER_LEN - 1] {
            assert!(matches!(
                Envelope::from_bytes(&bytes[..cut]),
                Err(VaultError::VaultFormat(_))
            ));
        }
    }

    #[test]
    fn aad_covers_magic_version_and_salt() {
        let aad = Envelope::aad(CURRENT_VERSION, &[5u8; SALT_LEN]);
        assert_eq!(aad.len(), PREFIX_LEN + SALT_LEN);
        assert_eq!(&aad[0..4], b"PWVT");
    }
}
