//! Password-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks.  Cost parameters are not user-tunable: each vault
//! format version pins one `Argon2Params` value (see `vault::format`),
//! so a future version can raise the cost without breaking old files.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

use crate::errors::{Result, VaultError};

/// Length of the salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of iterations.
    pub iterations: u32,
    /// Parallelism lanes.
    pub parallelism: u32,
}

impl Argon2Params {
    /// Parameters of format version 1: 64 MB, 3 iterations, 4 lanes.
    pub const V1: Self = Self {
        memory_kib: 65_536,
        iterations: 3,
        parallelism: 4,
    };
}

/// Derive a 32-byte key from a password and salt using Argon2id.
///
/// The same password + salt + params will always produce the same key.
/// Rejects salts of the wrong length and dangerously weak parameters.
pub fn derive_key(password: &[u8], salt: &[u8], argon2_params: &Argon2Params) -> Result<[u8; KEY_LEN]> {
    if salt.len() != SALT_LEN {
        return Err(VaultError::KeyDerivation(format!(
            "salt must be {SALT_LEN} bytes (got {})",
            salt.len()
        )));
    }
    if argon2_params.memory_kib < MIN_MEMORY_KIB {
        return Err(VaultError::KeyDerivation(format!(
            "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
            argon2_params.memory_kib
        )));
    }
    if argon2_params.iterations < 1 {
        return Err(VaultError::KeyDerivation(
            "Argon2 iterations must be at least 1".into(),
        ));
    }
    if argon2_params.parallelism < 1 {
        return Err(VaultError::KeyDerivation(
            "Argon2 parallelism must be at least 1".into(),
        ));
    }

    let params = Params::new(
        argon2_params.memory_kib,
        argon2_params.iterations,
        argon2_params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| VaultError::KeyDerivation(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(password, salt, &mut key)
        .map_err(|e| VaultError::KeyDerivation(format!("Argon2id hashing failed: {e}")))?;

    Ok(key)
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cheap parameters so the validation tests do not pay the V1 cost.
    const FAST: Argon2Params = Argon2Params {
        memory_kib: MIN_MEMORY_KIB,
        iterations: 1,
        parallelism: 1,
    };

    #[test]
    fn same_inputs_same_key() {
        let salt = [7u8; SALT_LEN];
        let a = derive_key(b"hunter22", &salt, &FAST).unwrap();
        let b = derive_key(b"hunter22", &salt, &FAST).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_salt_different_key() {
        let a = derive_key(b"hunter22", &[1u8; SALT_LEN], &FAST).unwrap();
        let b = derive_key(b"hunter22", &[2u8; SALT_LEN], &FAST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_short_salt() {
        let err = derive_key(b"pw", &[0u8; 16], &FAST).unwrap_err();
        assert!(matches!(err, VaultError::KeyDerivation(_)));
    }

    #[test]
    fn rejects_weak_params() {
        let salt = [0u8; SALT_LEN];
        let weak_memory = Argon2Params {
            memory_kib: 1024,
            ..FAST
        };
        let zero_iterations = Argon2Params {
            iterations: 0,
            ..FAST
        };
        let zero_lanes = Argon2Params {
            parallelism: 0,
            ..FAST
        };
        for params in [weak_memory, zero_iterations, zero_lanes] {
            assert!(matches!(
                derive_key(b"pw", &salt, &params),
                Err(VaultError::KeyDerivation(_))
            ));
        }
    }

    #[test]
    fn generated_salts_differ() {
        assert_ne!(generate_salt(), generate_salt());
    }
}
