//! AES-256-GCM credential encryption.
//!
//! This module provides:
//! - [`CredentialCipher`] — authenticated encryption of credential fields
//!   under a session [`DerivedKey`]
//! - [`fingerprint`] — non-reversible SHA-256 digest of a password
//!
//! Token format: `base64url_nopad(nonce (12) ‖ ciphertext ‖ tag (16))`.
//! The nonce is drawn fresh from `OsRng` on every call, so encrypting the
//! same plaintext twice never yields the same token. Decryption fails as a
//! unit [`CryptoError::Decryption`] on a wrong key, a truncated token, or
//! any tampering — this failure is the primary wrong-master-password signal.

use crate::error::CryptoError;
use crate::memory::DerivedKey;
use data_encoding::BASE64URL_NOPAD;
use rand::rngs::OsRng;
use rand::RngCore;
use ring::aead;
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::Zeroize;

/// AES-256-GCM nonce length in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// AES-256-GCM authentication tag length in bytes (128 bits).
pub const TAG_LEN: usize = 16;

/// Minimum decoded token length: nonce + empty ciphertext + tag.
const MIN_TOKEN_LEN: usize = NONCE_LEN + TAG_LEN;

/// Domain separation tag, bound into every token as AAD.
const CREDENTIAL_AAD: &[u8] = b"coffre-credential-v1";

// ---------------------------------------------------------------------------
// CredentialCipher
// ---------------------------------------------------------------------------

/// Authenticated cipher for credential fields.
///
/// Owns the session's [`DerivedKey`]; dropping the cipher at logout zeroizes
/// the key. Records encrypted under one key are only ever decryptable with
/// the same key — a wrong master password yields [`CryptoError::Decryption`],
/// never garbage plaintext.
pub struct CredentialCipher {
    key: DerivedKey,
}

impl fmt::Debug for CredentialCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialCipher(***)")
    }
}

impl CredentialCipher {
    /// Wrap a derived key for the current session.
    #[must_use]
    pub const fn new(key: DerivedKey) -> Self {
        Self { key }
    }

    /// Encrypt a credential field into a string-safe token.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Encryption` if the underlying AEAD rejects the
    /// key or the seal operation fails.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let sealing_key = self.aead_key()?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = aead::Nonce::assume_unique_for_key(nonce_bytes);

        // Encrypt in place — the plaintext copy becomes ciphertext.
        let mut in_out = plaintext.as_bytes().to_vec();
        let Ok(tag) = sealing_key.seal_in_place_separate_tag(
            nonce,
            aead::Aad::from(CREDENTIAL_AAD),
            &mut in_out,
        ) else {
            in_out.zeroize();
            return Err(CryptoError::Encryption(
                "AES-256-GCM encryption failed".into(),
            ));
        };

        let capacity = MIN_TOKEN_LEN.saturating_add(in_out.len());
        let mut wire = Vec::with_capacity(capacity);
        wire.extend_from_slice(&nonce_bytes);
        wire.extend_from_slice(&in_out);
        wire.extend_from_slice(tag.as_ref());

        Ok(BASE64URL_NOPAD.encode(&wire))
    }

    /// Decrypt a token produced by [`encrypt`](Self::encrypt).
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Decryption` for every failure mode: malformed
    /// base64, truncation, authentication-tag mismatch (wrong key or
    /// tampering), or non-UTF-8 plaintext after authentication. The causes
    /// are deliberately indistinguishable.
    pub fn decrypt(&self, token: &str) -> Result<String, CryptoError> {
        let wire = BASE64URL_NOPAD
            .decode(token.as_bytes())
            .map_err(|_| CryptoError::Decryption)?;

        if wire.len() < MIN_TOKEN_LEN {
            return Err(CryptoError::Decryption);
        }

        let mut nonce_bytes = [0u8; NONCE_LEN];
        nonce_bytes.copy_from_slice(&wire[..NONCE_LEN]);
        let nonce = aead::Nonce::assume_unique_for_key(nonce_bytes);

        let opening_key = self.aead_key()?;
        let mut ct_tag = wire[NONCE_LEN..].to_vec();
        let plaintext = opening_key
            .open_in_place(nonce, aead::Aad::from(CREDENTIAL_AAD), &mut ct_tag)
            .map_err(|_| CryptoError::Decryption)?;

        let result = std::str::from_utf8(plaintext)
            .map(str::to_owned)
            .map_err(|_| CryptoError::Decryption);
        ct_tag.zeroize();
        result
    }

    /// Build the one-shot AEAD key for a single seal/open call.
    fn aead_key(&self) -> Result<aead::LessSafeKey, CryptoError> {
        let unbound = aead::UnboundKey::new(&aead::AES_256_GCM, self.key.expose())
            .map_err(|_| CryptoError::Encryption("failed to create AES-256-GCM key".into()))?;
        Ok(aead::LessSafeKey::new(unbound))
    }
}

// ---------------------------------------------------------------------------
// Password fingerprint
// ---------------------------------------------------------------------------

/// Non-reversible fingerprint of a password: lowercase-hex SHA-256 over the
/// UTF-8 bytes.
///
/// Stored alongside each encrypted credential as an advisory integrity
/// reference; retrieval never depends on it (authenticated decryption is
/// the authority).
#[must_use]
pub fn fingerprint(password: &str) -> String {
    encode_hex(&Sha256::digest(password.as_bytes()))
}

/// Encode a byte slice as a lowercase hex string.
///
/// Uses `std::fmt::Write` to avoid pulling in an external `hex` crate.
#[must_use]
fn encode_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut s = String::with_capacity(bytes.len().saturating_mul(2));
    for &b in bytes {
        // write! on a String is infallible — the only error source is
        // allocation, which would panic before returning Err.
        let _ = write!(s, "{b:02x}");
    }
    s
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
