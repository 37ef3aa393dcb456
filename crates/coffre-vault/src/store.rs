//! The narrow record-store interface consumed by the vault core.
//!
//! The core never issues raw queries beyond these six shapes; anything a
//! storage backend does beyond them (schema, locking, file layout) is its
//! own business.

use crate::error::VaultError;
use crate::models::{CredentialRecord, NewCredentialRecord};

/// A keyed credential record store.
pub trait RecordStore {
    /// Append a new record and return its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the insert fails.
    fn create_record(&self, record: &NewCredentialRecord<'_>) -> Result<i64, VaultError>;

    /// Look up the first record for `(user_id, website)`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the query fails. An absent record
    /// is `Ok(None)`, not an error.
    fn query_by_user_and_website(
        &self,
        user_id: i64,
        website: &str,
    ) -> Result<Option<CredentialRecord>, VaultError>;

    /// Look up a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the query fails.
    fn query_by_id(&self, id: i64) -> Result<Option<CredentialRecord>, VaultError>;

    /// All records owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the query fails.
    fn query_all_by_user(&self, user_id: i64) -> Result<Vec<CredentialRecord>, VaultError>;

    /// Remove a record by id. Removing an absent id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the delete fails.
    fn delete_by_id(&self, id: i64) -> Result<(), VaultError>;

    /// Structural health check. `false` means the store must not be
    /// written to.
    ///
    /// # Errors
    ///
    /// Reserved for failures to even attempt the check; a failing check is
    /// `Ok(false)`.
    fn integrity_check(&self) -> Result<bool, VaultError>;
}
