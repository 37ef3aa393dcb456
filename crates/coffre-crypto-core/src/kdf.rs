//! PBKDF2-HMAC-SHA256 key derivation.
//!
//! This module provides:
//! - [`derive`] — derive a 256-bit key from a master secret + salt
//! - [`KeySalt`] — the 16-byte random salt persisted alongside the vault
//! - [`KdfParams`] — serializable iteration count
//!
//! The iteration count is a deliberate CPU-time cost against brute force:
//! derivation always runs to completion and is never cached across candidate
//! passwords. Only the salt is ever persisted — the derived key exists for
//! the session and is regenerated bit-for-bit from the same inputs.

use crate::error::CryptoError;
use crate::memory::{DerivedKey, MasterSecret, KEY_LEN};
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use zeroize::Zeroize;

/// Salt length in bytes. Fixed: the salt file format is exactly these bytes.
pub const SALT_LEN: usize = 16;

/// Production iteration count (OWASP-era floor for PBKDF2-SHA256 is 100k).
pub const DEFAULT_ITERATIONS: u32 = 100_000;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// PBKDF2 parameter set.
///
/// Not persisted — the salt file is the only KDF state on disk. Exists so
/// tests and future cost calibration can lower or raise the work factor
/// without touching call sites.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Number of PBKDF2 rounds. Must be at least 1.
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// The per-vault key salt.
///
/// Generated once at vault creation from the OS CSPRNG and immutable
/// afterwards. Losing it makes every encrypted record permanently
/// unrecoverable. The salt is public data (it is stored in plaintext),
/// so it carries no masking — only an exact-length guarantee.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KeySalt {
    bytes: [u8; SALT_LEN],
}

impl KeySalt {
    /// Generate a fresh random salt.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Reconstruct a salt from persisted bytes.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyMaterial` unless the slice is exactly
    /// [`SALT_LEN`] bytes — a short or long salt file means corruption, and
    /// deriving from it would silently produce an unusable key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SALT_LEN {
            return Err(CryptoError::InvalidKeyMaterial(format!(
                "salt must be exactly {SALT_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; SALT_LEN];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// The raw salt bytes, as written to the salt file.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for KeySalt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeySalt({SALT_LEN} bytes)")
    }
}

// ---------------------------------------------------------------------------
// Core KDF
// ---------------------------------------------------------------------------

/// Derive a 256-bit key from a master secret.
///
/// When `salt` is `None` a fresh random salt is generated; the salt actually
/// used is returned alongside the key so the caller can persist it.
///
/// Determinism invariant: for any (secret, salt, params), the returned key
/// is identical bit-for-bit on every call.
///
/// # Errors
///
/// Returns `CryptoError::KeyDerivation` if `params.iterations` is zero.
pub fn derive(
    secret: &MasterSecret,
    salt: Option<KeySalt>,
    params: &KdfParams,
) -> Result<(DerivedKey, KeySalt), CryptoError> {
    if params.iterations == 0 {
        return Err(CryptoError::KeyDerivation(
            "iteration count must be at least 1".into(),
        ));
    }

    let salt = salt.unwrap_or_else(KeySalt::generate);

    let mut output = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(
        secret.expose(),
        salt.as_bytes(),
        params.iterations,
        &mut output,
    );

    let key = DerivedKey::new(output);
    output.zeroize();
    Ok((key, salt))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Low-cost params for fast tests.
    const TEST_PARAMS: KdfParams = KdfParams { iterations: 1_000 };

    const TEST_SALT: [u8; SALT_LEN] = *b"0123456789abcdef";

    fn salt() -> KeySalt {
        KeySalt::from_bytes(&TEST_SALT).expect("test salt is exactly 16 bytes")
    }

    #[test]
    fn derive_produces_32_byte_key() {
        let secret = MasterSecret::from("password");
        let (key, _) = derive(&secret, Some(salt()), &TEST_PARAMS).expect("derive should succeed");
        assert_eq!(key.expose().len(), KEY_LEN);
    }

    #[test]
    fn derive_is_deterministic() {
        let secret = MasterSecret::from("password");
        let (a, _) = derive(&secret, Some(salt()), &TEST_PARAMS).expect("derive should succeed");
        let (b, _) = derive(&secret, Some(salt()), &TEST_PARAMS).expect("derive should succeed");
        assert_eq!(a.expose(), b.expose());
    }

    #[test]
    fn different_secrets_produce_different_keys() {
        let (a, _) = derive(&MasterSecret::from("secret_a"), Some(salt()), &TEST_PARAMS)
            .expect("derive should succeed");
        let (b, _) = derive(&MasterSecret::from("secret_b"), Some(salt()), &TEST_PARAMS)
            .expect("derive should succeed");
        assert_ne!(a.expose(), b.expose());
    }

    #[test]
    fn different_salts_produce_different_keys() {
        let secret = MasterSecret::from("password");
        let other = KeySalt::from_bytes(b"fedcba9876543210").expect("16 bytes");
        let (a, _) = derive(&secret, Some(salt()), &TEST_PARAMS).expect("derive should succeed");
        let (b, _) = derive(&secret, Some(other), &TEST_PARAMS).expect("derive should succeed");
        assert_ne!(a.expose(), b.expose());
    }

    #[test]
    fn missing_salt_generates_and_returns_one() {
        let secret = MasterSecret::from("password");
        let (key, generated) = derive(&secret, None, &TEST_PARAMS).expect("derive should succeed");

        // Re-deriving with the returned salt reproduces the key.
        let (again, _) =
            derive(&secret, Some(generated), &TEST_PARAMS).expect("derive should succeed");
        assert_eq!(key.expose(), again.expose());
    }

    #[test]
    fn generated_salts_are_unique() {
        assert_ne!(KeySalt::generate().as_bytes(), KeySalt::generate().as_bytes());
    }

    #[test]
    fn zero_iterations_rejected() {
        let secret = MasterSecret::from("password");
        let err = derive(&secret, Some(salt()), &KdfParams { iterations: 0 })
            .expect_err("zero iterations should be rejected");
        assert!(format!("{err}").contains("iteration count"));
    }

    #[test]
    fn salt_from_bytes_rejects_wrong_length() {
        assert!(KeySalt::from_bytes(b"short").is_err());
        assert!(KeySalt::from_bytes(&[0u8; 17]).is_err());
        assert!(KeySalt::from_bytes(&[0u8; 16]).is_ok());
    }

    #[test]
    fn kdf_params_serde_roundtrip() {
        let params = KdfParams {
            iterations: 250_000,
        };
        let json = serde_json::to_string(&params).expect("serialize should succeed");
        let back: KdfParams = serde_json::from_str(&json).expect("deserialize should succeed");
        assert_eq!(params, back);
    }

    #[test]
    fn default_params_meet_the_floor() {
        assert!(KdfParams::default().iterations >= 100_000);
    }
}
