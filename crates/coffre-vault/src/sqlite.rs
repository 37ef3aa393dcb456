//! `SQLite`-backed record store.
//!
//! Connections are exclusive and short-lived: every operation opens the
//! database file, runs, and closes — no connection spans caller think-time.
//! The store holds only the database path.
//!
//! Mutating operations re-apply owner-only permissions (0600) to the
//! database file afterwards, so a world-readable file created by the
//! underlying engine never survives a write.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::VaultError;
use crate::models::{CredentialRecord, NewCredentialRecord, UserAccount};
use crate::store::RecordStore;

/// Schema, applied idempotently at open.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    password_salt TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS credentials (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    website TEXT NOT NULL,
    encrypted_username TEXT NOT NULL,
    password_fingerprint TEXT NOT NULL,
    encrypted_password TEXT NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users (id)
);
";

/// Tables the integrity check requires to exist.
const REQUIRED_TABLE_COUNT: i64 = 2;

// ---------------------------------------------------------------------------
// SqliteStore
// ---------------------------------------------------------------------------

/// Path-holding `SQLite` store. Cheap to clone; owns no connection.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) the store at `db_path`.
    ///
    /// Ensures the schema exists and restricts the file to owner-only
    /// permissions.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the file cannot be opened or the
    /// schema cannot be applied, [`VaultError::Io`] if hardening fails.
    pub fn open(db_path: &Path) -> Result<Self, VaultError> {
        let store = Self {
            db_path: db_path.to_path_buf(),
        };
        let conn = store.connect()?;
        conn.execute_batch(SCHEMA)?;
        drop(conn);
        store.harden()?;
        Ok(store)
    }

    /// The database file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Open a short-lived connection for one operation.
    ///
    /// The `user_id` foreign key is declarative only — the vault core
    /// trusts ids handed to it by the authentication collaborator and
    /// must accept records for users this store has never seen.
    fn connect(&self) -> Result<Connection, VaultError> {
        let conn = Connection::open(&self.db_path)?;
        // The bundled SQLite is compiled with SQLITE_DEFAULT_FOREIGN_KEYS=1,
        // which would enforce the declarative `user_id` foreign key. Restore
        // the standard SQLite default (enforcement off) so the store accepts
        // records for users it has never seen, as documented above.
        conn.execute_batch("PRAGMA foreign_keys = OFF;")?;
        Ok(conn)
    }

    /// Re-apply owner-only permissions to the database file.
    fn harden(&self) -> Result<(), VaultError> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if self.db_path.exists() {
                fs::set_permissions(&self.db_path, fs::Permissions::from_mode(0o600))?;
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // User accounts (authentication module only — not part of RecordStore)
    // -----------------------------------------------------------------------

    /// Insert a new user account and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Validation`] if the username is already taken,
    /// [`VaultError::Database`] for other failures.
    pub fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        password_salt: &str,
    ) -> Result<i64, VaultError> {
        let conn = self.connect()?;
        let result = conn.execute(
            "INSERT INTO users (username, password_hash, password_salt) VALUES (?1, ?2, ?3)",
            params![username, password_hash, password_salt],
        );

        if let Err(err) = result {
            if is_constraint_violation(&err) {
                return Err(VaultError::Validation(format!(
                    "username '{username}' already exists"
                )));
            }
            return Err(VaultError::Database(format!(
                "failed to insert user: {err}"
            )));
        }

        let id = conn.last_insert_rowid();
        drop(conn);
        self.harden()?;
        Ok(id)
    }

    /// Look up a user account by username.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the query fails.
    pub fn find_user(&self, username: &str) -> Result<Option<UserAccount>, VaultError> {
        let conn = self.connect()?;
        let account = conn
            .query_row(
                "SELECT id, username, password_hash, password_salt \
                 FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok(UserAccount {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password_hash: row.get(2)?,
                        password_salt: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(|e| VaultError::Database(format!("failed to query user: {e}")))?;
        Ok(account)
    }
}

/// SQLITE_CONSTRAINT (unique username collision).
fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(ffi_err, _)
            if ffi_err.code == rusqlite::ffi::ErrorCode::ConstraintViolation
    )
}

/// Map one `credentials` row.
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<CredentialRecord> {
    Ok(CredentialRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        website: row.get(2)?,
        encrypted_username: row.get(3)?,
        password_fingerprint: row.get(4)?,
        encrypted_password: row.get(5)?,
    })
}

const RECORD_COLUMNS: &str =
    "id, user_id, website, encrypted_username, password_fingerprint, encrypted_password";

impl RecordStore for SqliteStore {
    fn create_record(&self, record: &NewCredentialRecord<'_>) -> Result<i64, VaultError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO credentials \
             (user_id, website, encrypted_username, password_fingerprint, encrypted_password) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.user_id,
                record.website,
                record.encrypted_username,
                record.password_fingerprint,
                record.encrypted_password,
            ],
        )
        .map_err(|e| VaultError::Database(format!("failed to insert credential: {e}")))?;

        let id = conn.last_insert_rowid();
        drop(conn);
        self.harden()?;
        Ok(id)
    }

    fn query_by_user_and_website(
        &self,
        user_id: i64,
        website: &str,
    ) -> Result<Option<CredentialRecord>, VaultError> {
        let conn = self.connect()?;
        let record = conn
            .query_row(
                &format!(
                    "SELECT {RECORD_COLUMNS} FROM credentials \
                     WHERE user_id = ?1 AND website = ?2 ORDER BY id LIMIT 1"
                ),
                params![user_id, website],
                row_to_record,
            )
            .optional()
            .map_err(|e| VaultError::Database(format!("failed to query credential: {e}")))?;
        Ok(record)
    }

    fn query_by_id(&self, id: i64) -> Result<Option<CredentialRecord>, VaultError> {
        let conn = self.connect()?;
        let record = conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM credentials WHERE id = ?1"),
                params![id],
                row_to_record,
            )
            .optional()
            .map_err(|e| VaultError::Database(format!("failed to query credential: {e}")))?;
        Ok(record)
    }

    fn query_all_by_user(&self, user_id: i64) -> Result<Vec<CredentialRecord>, VaultError> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {RECORD_COLUMNS} FROM credentials \
                 WHERE user_id = ?1 ORDER BY website ASC, id ASC"
            ))
            .map_err(|e| VaultError::Database(format!("failed to prepare list query: {e}")))?;

        let records = stmt
            .query_map(params![user_id], row_to_record)
            .map_err(|e| VaultError::Database(format!("failed to list credentials: {e}")))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| VaultError::Database(format!("failed to read credential row: {e}")))?;
        Ok(records)
    }

    fn delete_by_id(&self, id: i64) -> Result<(), VaultError> {
        let conn = self.connect()?;
        conn.execute("DELETE FROM credentials WHERE id = ?1", params![id])
            .map_err(|e| VaultError::Database(format!("failed to delete credential: {e}")))?;
        drop(conn);
        self.harden()?;
        Ok(())
    }

    fn integrity_check(&self) -> Result<bool, VaultError> {
        // A store we cannot even open is failed, not errored — the caller's
        // contract is a structural verdict.
        let Ok(conn) = Connection::open(&self.db_path) else {
            return Ok(false);
        };

        let quick: Result<String, _> =
            conn.pragma_query_value(None, "integrity_check", |row| row.get(0));
        match quick {
            Ok(verdict) if verdict == "ok" => {}
            _ => return Ok(false),
        }

        let tables: i64 = match conn.query_row(
            "SELECT count(*) FROM sqlite_master \
             WHERE type = 'table' AND name IN ('users', 'credentials')",
            [],
            |row| row.get(0),
        ) {
            Ok(count) => count,
            Err(_) => return Ok(false),
        };

        Ok(tables == REQUIRED_TABLE_COUNT)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> SqliteStore {
        SqliteStore::open(&dir.path().join("vault.db")).expect("store should open")
    }

    fn sample_record(user_id: i64, website: &str) -> NewCredentialRecord<'_> {
        NewCredentialRecord {
            user_id,
            website,
            encrypted_username: "dXNlcg",
            password_fingerprint: "00ff00ff",
            encrypted_password: "cGFzcw",
        }
    }

    #[test]
    fn open_creates_schema_and_passes_integrity() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        assert!(store.integrity_check().unwrap());
    }

    #[test]
    fn open_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.db");
        let _first = SqliteStore::open(&path).unwrap();
        let second = SqliteStore::open(&path).unwrap();
        assert!(second.integrity_check().unwrap());
    }

    #[test]
    fn create_and_query_record_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let id = store.create_record(&sample_record(1, "example.com")).unwrap();
        let record = store
            .query_by_user_and_website(1, "example.com")
            .unwrap()
            .expect("record should exist");

        assert_eq!(record.id, id);
        assert_eq!(record.user_id, 1);
        assert_eq!(record.website, "example.com");
        assert_eq!(record.encrypted_username, "dXNlcg");
        assert_eq!(record.password_fingerprint, "00ff00ff");
        assert_eq!(record.encrypted_password, "cGFzcw");
    }

    #[test]
    fn query_by_id_finds_the_same_record() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let id = store.create_record(&sample_record(1, "example.com")).unwrap();
        let record = store.query_by_id(id).unwrap().expect("record should exist");
        assert_eq!(record.website, "example.com");
    }

    #[test]
    fn absent_lookups_return_none() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        assert!(store
            .query_by_user_and_website(1, "nowhere.example")
            .unwrap()
            .is_none());
        assert!(store.query_by_id(999).unwrap().is_none());
    }

    #[test]
    fn records_are_scoped_to_their_user() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.create_record(&sample_record(1, "example.com")).unwrap();
        assert!(store
            .query_by_user_and_website(2, "example.com")
            .unwrap()
            .is_none());
    }

    #[test]
    fn query_all_by_user_lists_in_website_order() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.create_record(&sample_record(1, "zebra.example")).unwrap();
        store.create_record(&sample_record(1, "alpha.example")).unwrap();
        store.create_record(&sample_record(2, "other.example")).unwrap();

        let records = store.query_all_by_user(1).unwrap();
        let websites: Vec<&str> = records.iter().map(|r| r.website.as_str()).collect();
        assert_eq!(websites, ["alpha.example", "zebra.example"]);
    }

    #[test]
    fn delete_removes_the_record_and_tolerates_absent_ids() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let id = store.create_record(&sample_record(1, "example.com")).unwrap();
        store.delete_by_id(id).unwrap();
        assert!(store.query_by_id(id).unwrap().is_none());

        // Absent id is a no-op, not an error.
        store.delete_by_id(id).unwrap();
    }

    #[test]
    fn integrity_check_fails_on_garbage_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.db");
        std::fs::write(&path, b"this is not a sqlite database at all").unwrap();

        let store = SqliteStore {
            db_path: path,
        };
        assert!(!store.integrity_check().unwrap());
    }

    #[test]
    fn integrity_check_fails_on_missing_tables() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.db");
        // Valid SQLite file, wrong schema.
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE unrelated (id INTEGER);").unwrap();
        drop(conn);

        let store = SqliteStore { db_path: path };
        assert!(!store.integrity_check().unwrap());
    }

    #[test]
    fn create_and_find_user_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let id = store.create_user("alice", "aGFzaA", "c2FsdA").unwrap();
        let account = store.find_user("alice").unwrap().expect("user should exist");
        assert_eq!(account.id, id);
        assert_eq!(account.username, "alice");
        assert_eq!(account.password_hash, "aGFzaA");
        assert_eq!(account.password_salt, "c2FsdA");
    }

    #[test]
    fn duplicate_username_is_a_validation_error() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.create_user("alice", "h1", "s1").unwrap();
        let err = store.create_user("alice", "h2", "s2").unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)), "got: {err}");
    }

    #[test]
    fn unknown_user_is_none() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        assert!(store.find_user("nobody").unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn mutations_leave_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        // Simulate the underlying engine loosening the mode.
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();
        store.create_record(&sample_record(1, "example.com")).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "vault.db should be owner-only after a write");
    }
}
