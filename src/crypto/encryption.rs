//! AES-256-GCM authenticated encryption with a detached tag.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce; there
//! is no way to pass one in, so a nonce can never be reused by a caller.
//! The nonce, ciphertext and 16-byte tag come back as separate parts
//! because the vault envelope stores them in separate slots.

use aes_gcm::aead::{AeadCore, AeadInPlace, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce, Tag};
use zeroize::Zeroizing;

use crate::errors::{Result, VaultError};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Output of `encrypt`: everything `decrypt` needs besides the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LEN],
}

/// Encrypt `plaintext` with a 32-byte `key`.
///
/// `aad` is authenticated but not encrypted; the vault passes its fixed
/// header here so header tampering fails decryption.
pub fn encrypt(key: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<Sealed> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| VaultError::Encryption(format!("invalid key length: {e}")))?;

    let generated = Aes256Gcm::generate_nonce(&mut OsRng);

    let mut ciphertext = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(&generated, aad, &mut ciphertext)
        .map_err(|e| VaultError::Encryption(format!("encryption error: {e}")))?;

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&generated);
    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(&tag);

    Ok(Sealed {
        nonce,
        ciphertext,
        tag: tag_bytes,
    })
}

/// Decrypt data that was produced by `encrypt`.
///
/// Any mismatch of key, nonce, ciphertext, tag or `aad` yields
/// `VaultError::Authentication`; no plaintext is returned in that case.
pub fn decrypt(key: &[u8], sealed: &Sealed, aad: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| VaultError::Authentication)?;

    let mut buffer = Zeroizing::new(sealed.ciphertext.clone());
    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(&sealed.nonce),
            aad,
            buffer.as_mut_slice(),
            Tag::from_slice(&sealed.tag),
        )
        .map_err(|_| VaultError::Authentication)?;

    Ok(buffer)
}
