//! Vault error types for `coffre-vault`.
//!
//! Absent records are not errors: lookups return `Option`, and only
//! genuinely exceptional outcomes land here. Cryptographic and integrity
//! failures are never retried and never swallowed.

use coffre_crypto_core::CryptoError;
use thiserror::Error;

/// Errors produced by vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Cryptographic operation failed (delegated from crypto-core).
    /// `CryptoError::Decryption` inside this variant is the
    /// wrong-master-password signal — it must reach the caller.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The record store failed its structural check. Fatal to the current
    /// operation; no mutation has occurred.
    #[error("integrity check failed: {0}")]
    Integrity(String),

    /// `SQLite` database error.
    #[error("database error: {0}")]
    Database(String),

    /// Caller-supplied input violates a documented constraint. Rejected
    /// before any cryptographic work.
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O error on the salt file or vault directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for VaultError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}
