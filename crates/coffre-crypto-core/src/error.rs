//! Cryptographic error types for `coffre-crypto-core`.

use thiserror::Error;

/// Errors produced by cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key derivation failed (invalid salt length, invalid iteration count).
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Symmetric encryption failure (AES-256-GCM).
    #[error("encryption error: {0}")]
    Encryption(String),

    /// Authenticated decryption failed — wrong key, truncated token, or
    /// tampered ciphertext. Carries no detail: all failure causes are
    /// indistinguishable by contract.
    #[error("decryption failed: authentication tag mismatch")]
    Decryption,

    /// Invalid key material (wrong length, corrupted bytes).
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Secure memory operation failure (CSPRNG, rlimit).
    #[error("secure memory error: {0}")]
    SecureMemory(String),

    /// Password generation failure (invalid length or complexity level).
    #[error("password generation error: {0}")]
    PasswordGeneration(String),
}
