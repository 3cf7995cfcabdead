//! Cryptographic primitives for the password vault.
//!
//! This module provides:
//! - Argon2id password-based key derivation (`kdf`)
//! - AES-256-GCM authenticated encryption with a detached tag (`encryption`)
//! - The owned, zeroize-on-drop `VaultKey` (`keys`)

pub mod encryption;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use encryption::{decrypt, encrypt, Sealed, NONCE_LEN, TAG_LEN};
pub use kdf::{derive_key, generate_salt, Argon2Params, KEY_LEN, SALT_LEN};
pub use keys::VaultKey;
