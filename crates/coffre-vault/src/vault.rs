//! Credential CRUD orchestration over the cipher and record store.
//!
//! The vault owns no cryptography and no SQL: it validates input, gates
//! mutations behind the store's integrity check, and delegates field
//! encryption to [`CredentialCipher`]. There are no partial-write states —
//! a save either fully succeeds or fails before the store mutates.

use coffre_crypto_core::{cipher, CredentialCipher};

use crate::error::VaultError;
use crate::models::{LoginSummary, NewCredentialRecord};
use crate::store::RecordStore;

/// One unlocked vault session for one user-facing store.
#[derive(Debug)]
pub struct Vault<S: RecordStore> {
    store: S,
    cipher: CredentialCipher,
}

impl<S: RecordStore> Vault<S> {
    /// Assemble a vault from an opened store and a session cipher.
    #[must_use]
    pub const fn new(store: S, cipher: CredentialCipher) -> Self {
        Self { store, cipher }
    }

    /// The underlying record store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Encrypt and persist a login; returns the assigned record id.
    ///
    /// # Errors
    ///
    /// - [`VaultError::Validation`] for an empty website, username, or
    ///   password — rejected before any cryptographic work
    /// - [`VaultError::Integrity`] if the store fails its structural check;
    ///   nothing is written
    /// - [`VaultError::Crypto`] if encryption fails
    /// - [`VaultError::Database`] if the insert fails
    pub fn save_login(
        &self,
        user_id: i64,
        website: &str,
        username: &str,
        password: &str,
    ) -> Result<i64, VaultError> {
        if website.trim().is_empty() {
            return Err(VaultError::Validation("website is required".into()));
        }
        if username.is_empty() {
            return Err(VaultError::Validation("username is required".into()));
        }
        if password.is_empty() {
            return Err(VaultError::Validation("password is required".into()));
        }

        self.ensure_integrity()?;

        let encrypted_username = self.cipher.encrypt(username)?;
        let encrypted_password = self.cipher.encrypt(password)?;
        let password_fingerprint = cipher::fingerprint(password);

        self.store.create_record(&NewCredentialRecord {
            user_id,
            website,
            encrypted_username: &encrypted_username,
            password_fingerprint: &password_fingerprint,
            encrypted_password: &encrypted_password,
        })
    }

    /// Retrieve `(username, password)` for `(user_id, website)`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Crypto`] with `CryptoError::Decryption` if a
    /// stored token does not open under the session key — wrong master
    /// password or corrupted record. Never folded into `Ok(None)`: that
    /// would mask a wrong-master-password condition as missing data.
    pub fn get_login(
        &self,
        user_id: i64,
        website: &str,
    ) -> Result<Option<(String, String)>, VaultError> {
        let Some(record) = self.store.query_by_user_and_website(user_id, website)? else {
            return Ok(None);
        };

        let username = self.cipher.decrypt(&record.encrypted_username)?;
        let password = self.cipher.decrypt(&record.encrypted_password)?;
        Ok(Some((username, password)))
    }

    /// Retrieve `(website, username, password)` by record id.
    ///
    /// # Errors
    ///
    /// Same decryption contract as [`get_login`](Self::get_login).
    pub fn get_login_by_id(
        &self,
        id: i64,
    ) -> Result<Option<(String, String, String)>, VaultError> {
        let Some(record) = self.store.query_by_id(id)? else {
            return Ok(None);
        };

        let username = self.cipher.decrypt(&record.encrypted_username)?;
        let password = self.cipher.decrypt(&record.encrypted_password)?;
        Ok(Some((record.website, username, password)))
    }

    /// Delete a login by record id. Deleting an absent id is a no-op.
    ///
    /// # Errors
    ///
    /// - [`VaultError::Integrity`] if the store fails its structural check
    /// - [`VaultError::Database`] if the delete fails
    pub fn delete_login(&self, id: i64) -> Result<(), VaultError> {
        self.ensure_integrity()?;
        self.store.delete_by_id(id)
    }

    /// Browse a user's logins: id + website only, no decryption.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the listing fails.
    pub fn list_logins(&self, user_id: i64) -> Result<Vec<LoginSummary>, VaultError> {
        let records = self.store.query_all_by_user(user_id)?;
        Ok(records
            .into_iter()
            .map(|record| LoginSummary {
                id: record.id,
                website: record.website,
            })
            .collect())
    }

    /// Gate for mutating operations.
    fn ensure_integrity(&self) -> Result<(), VaultError> {
        if !self.store.integrity_check()? {
            return Err(VaultError::Integrity(
                "record store failed its structural check".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
