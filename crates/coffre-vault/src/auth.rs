//! User-account registration and verification.
//!
//! This is the collaborator that produces the `(user_id, master secret)`
//! pair the vault core trusts. Account passwords are hashed with the same
//! PBKDF2 primitive the vault key derivation uses, under a fresh per-account
//! salt, and stored base64-encoded. Account hashing and vault key derivation
//! share an algorithm but never share a salt.

use coffre_crypto_core::kdf::{self, KdfParams, KeySalt};
use coffre_crypto_core::MasterSecret;
use data_encoding::BASE64;

use crate::error::VaultError;
use crate::sqlite::SqliteStore;

/// Minimum account password length, in characters.
const MIN_PASSWORD_CHARS: usize = 8;

/// Register a new user account and return its id.
///
/// # Errors
///
/// - [`VaultError::Validation`] if the username is empty, the password is
///   shorter than 8 characters, or the username is already taken — all
///   rejected before any hashing.
/// - [`VaultError::Database`] if the insert fails.
pub fn register_user(
    store: &SqliteStore,
    username: &str,
    password: &str,
) -> Result<i64, VaultError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(VaultError::Validation("username is required".into()));
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(VaultError::Validation(format!(
            "password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }

    let (hash, salt) = hash_password(password, None)?;
    store.create_user(username, &hash, &salt)
}

/// Verify a username/password pair.
///
/// Returns `Some(user_id)` on success, `None` for an unknown username or a
/// wrong password — the two are indistinguishable by design.
///
/// # Errors
///
/// - [`VaultError::Database`] if the lookup fails or the stored hash/salt is
///   not valid base64.
/// - [`VaultError::Crypto`] if the stored salt has the wrong length.
pub fn verify_user(
    store: &SqliteStore,
    username: &str,
    password: &str,
) -> Result<Option<i64>, VaultError> {
    let Some(account) = store.find_user(username.trim())? else {
        return Ok(None);
    };

    let salt_bytes = BASE64
        .decode(account.password_salt.as_bytes())
        .map_err(|_| VaultError::Database("stored password salt is not valid base64".into()))?;
    let salt = KeySalt::from_bytes(&salt_bytes)?;

    let (computed, _) = hash_password(password, Some(salt))?;

    if constant_time_eq(computed.as_bytes(), account.password_hash.as_bytes()) {
        Ok(Some(account.id))
    } else {
        Ok(None)
    }
}

/// Hash an account password; returns base64 (hash, salt).
///
/// A fresh salt is generated when none is supplied.
fn hash_password(password: &str, salt: Option<KeySalt>) -> Result<(String, String), VaultError> {
    let secret = MasterSecret::from(password);
    let (key, salt) = kdf::derive(&secret, salt, &KdfParams::default())?;
    Ok((BASE64.encode(key.expose()), BASE64.encode(salt.as_bytes())))
}

/// Constant-time comparison to prevent timing attacks on the hash check.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
