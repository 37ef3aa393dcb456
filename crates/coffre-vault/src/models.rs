//! Data model for vault records and user accounts.

use serde::Serialize;

/// A stored credential row, exactly as persisted.
///
/// `website` is the plaintext lookup key. `encrypted_username` and
/// `encrypted_password` are cipher tokens, only decryptable under the
/// derived key that produced them. `password_fingerprint` is an advisory
/// SHA-256 hex digest of the plaintext password — written on save, never
/// required on the read path.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    /// Unique identifier, assigned by the store.
    pub id: i64,
    /// Owning user account.
    pub user_id: i64,
    /// Plaintext website key.
    pub website: String,
    /// Encrypted username token.
    pub encrypted_username: String,
    /// Advisory SHA-256 hex fingerprint of the plaintext password.
    pub password_fingerprint: String,
    /// Encrypted password token.
    pub encrypted_password: String,
}

/// Field set for inserting a new credential.
#[derive(Debug)]
pub struct NewCredentialRecord<'a> {
    /// Owning user account.
    pub user_id: i64,
    /// Plaintext website key.
    pub website: &'a str,
    /// Encrypted username token.
    pub encrypted_username: &'a str,
    /// Advisory password fingerprint.
    pub password_fingerprint: &'a str,
    /// Encrypted password token.
    pub encrypted_password: &'a str,
}

/// Metadata-only view for browsing — no decryption required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSummary {
    /// Record identifier, usable with `get_login_by_id`.
    pub id: i64,
    /// Plaintext website key.
    pub website: String,
}

/// A registered user account.
///
/// Owned by the authentication module; the vault core only ever sees the
/// `id`. Hash and salt are base64-encoded PBKDF2 material — unrelated to
/// the vault's own key salt.
#[derive(Debug, Clone)]
pub struct UserAccount {
    /// Unique identifier.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Base64 PBKDF2-HMAC-SHA256 hash of the account password.
    pub password_hash: String,
    /// Base64 16-byte per-account salt.
    pub password_salt: String,
}
