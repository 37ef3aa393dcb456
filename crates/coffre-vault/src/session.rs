//! Vault session lifecycle: configuration, salt-file handling, unlock.
//!
//! The unlock ceremony is single-path: read (or create, exactly once) the
//! persisted salt, derive the key, build the cipher and store. A wrong
//! master secret is not detected here — it surfaces as
//! `CryptoError::Decryption` on the first record read, which is the
//! designed signal.

use std::fs;
use std::path::{Path, PathBuf};

use coffre_crypto_core::kdf::{self, KdfParams, KeySalt, SALT_LEN};
use coffre_crypto_core::{CredentialCipher, MasterSecret};

use crate::error::VaultError;
use crate::sqlite::SqliteStore;
use crate::vault::Vault;

const SALT_FILE: &str = "vault.salt";
const DB_FILE: &str = "vault.db";

// ---------------------------------------------------------------------------
// VaultConfig
// ---------------------------------------------------------------------------

/// Explicit vault location, passed into every component at construction.
/// There is no process-global path state.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    data_dir: PathBuf,
}

impl VaultConfig {
    /// Configure a vault rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The vault directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the persisted key salt (raw bytes, owner-only).
    #[must_use]
    pub fn salt_path(&self) -> PathBuf {
        self.data_dir.join(SALT_FILE)
    }

    /// Path of the `SQLite` database file.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Create the vault directory with owner-only permissions (0700).
///
/// Idempotent: an existing directory is re-restricted, not an error.
///
/// # Errors
///
/// Returns [`VaultError::Io`] if the directory cannot be created or its
/// permissions cannot be set.
pub fn initialize(config: &VaultConfig) -> Result<(), VaultError> {
    fs::create_dir_all(config.data_dir())?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(config.data_dir(), fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

/// Load the persisted key salt, or generate and persist it exactly once.
///
/// The salt is immutable after creation: a salt file of the wrong length is
/// surfaced as [`VaultError::Integrity`] and left untouched — regenerating
/// it would make every existing record permanently unreadable.
fn load_or_create_salt(config: &VaultConfig) -> Result<KeySalt, VaultError> {
    let path = config.salt_path();

    if path.exists() {
        let bytes = fs::read(&path)?;
        return KeySalt::from_bytes(&bytes).map_err(|_| {
            VaultError::Integrity(format!(
                "salt file {} is corrupt: expected exactly {SALT_LEN} bytes, found {}",
                path.display(),
                bytes.len()
            ))
        });
    }

    let salt = KeySalt::generate();
    fs::write(&path, salt.as_bytes())?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(salt)
}

/// Unlock the vault with the production KDF cost.
///
/// # Errors
///
/// - [`VaultError::Io`] if the directory or salt file cannot be accessed
/// - [`VaultError::Integrity`] if the salt file is corrupt
/// - [`VaultError::Database`] if the store cannot be opened
pub fn unlock(
    config: &VaultConfig,
    secret: &MasterSecret,
) -> Result<Vault<SqliteStore>, VaultError> {
    unlock_with_params(config, secret, &KdfParams::default())
}

/// Unlock with an explicit KDF cost (tests and future calibration).
///
/// # Errors
///
/// Same as [`unlock`], plus [`VaultError::Crypto`] for invalid KDF params.
pub fn unlock_with_params(
    config: &VaultConfig,
    secret: &MasterSecret,
    params: &KdfParams,
) -> Result<Vault<SqliteStore>, VaultError> {
    initialize(config)?;
    let salt = load_or_create_salt(config)?;
    let (key, _) = kdf::derive(secret, Some(salt), params)?;
    let cipher = CredentialCipher::new(key);
    let store = SqliteStore::open(&config.db_path())?;
    Ok(Vault::new(store, cipher))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TEST_PARAMS: KdfParams = KdfParams { iterations: 100 };

    #[test]
    fn config_paths_derive_from_data_dir() {
        let config = VaultConfig::new("/tmp/some-vault");
        assert_eq!(config.salt_path(), Path::new("/tmp/some-vault/vault.salt"));
        assert_eq!(config.db_path(), Path::new("/tmp/some-vault/vault.db"));
    }

    #[test]
    fn initialize_creates_the_directory() {
        let dir = TempDir::new().unwrap();
        let config = VaultConfig::new(dir.path().join("vault"));

        initialize(&config).unwrap();
        assert!(config.data_dir().is_dir());

        // Second call is a no-op, not an error.
        initialize(&config).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn initialize_restricts_directory_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let config = VaultConfig::new(dir.path().join("vault"));
        initialize(&config).unwrap();

        let mode = fs::metadata(config.data_dir()).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o700, "vault directory should be owner-only");
    }

    #[test]
    fn salt_is_created_once_and_reused() {
        let dir = TempDir::new().unwrap();
        let config = VaultConfig::new(dir.path().join("vault"));
        initialize(&config).unwrap();

        let first = load_or_create_salt(&config).unwrap();
        let second = load_or_create_salt(&config).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());

        let on_disk = fs::read(config.salt_path()).unwrap();
        assert_eq!(on_disk, first.as_bytes());
    }

    #[cfg(unix)]
    #[test]
    fn salt_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let config = VaultConfig::new(dir.path().join("vault"));
        initialize(&config).unwrap();
        load_or_create_salt(&config).unwrap();

        let mode = fs::metadata(config.salt_path()).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "vault.salt should be owner-only");
    }

    #[test]
    fn corrupt_salt_file_is_integrity_error_and_untouched() {
        let dir = TempDir::new().unwrap();
        let config = VaultConfig::new(dir.path().join("vault"));
        initialize(&config).unwrap();
        fs::write(config.salt_path(), b"too short").unwrap();

        let err = load_or_create_salt(&config).unwrap_err();
        assert!(matches!(err, VaultError::Integrity(_)), "got: {err}");

        // The corrupt file must not have been overwritten.
        assert_eq!(fs::read(config.salt_path()).unwrap(), b"too short");
    }

    #[test]
    fn unlock_twice_reaches_the_same_key() {
        let dir = TempDir::new().unwrap();
        let config = VaultConfig::new(dir.path().join("vault"));
        let secret = MasterSecret::from("Sesame123!");

        let vault = unlock_with_params(&config, &secret, &TEST_PARAMS).unwrap();
        let token = vault.save_login(1, "example.com", "alice", "p@ssW0rd1").unwrap();

        // A second session with the same secret reads what the first wrote.
        let again = unlock_with_params(&config, &secret, &TEST_PARAMS).unwrap();
        let (username, password) = again
            .get_login(1, "example.com")
            .unwrap()
            .expect("record should exist");
        assert_eq!(username, "alice");
        assert_eq!(password, "p@ssW0rd1");
        let _ = token;
    }
}
