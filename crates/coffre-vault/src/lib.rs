//! `coffre-vault` — Vault business logic for COFFRE.
//!
//! Manages the salt-file lifecycle, `SQLite`-backed credential storage,
//! user-account authentication, and the [`Vault`] orchestration type.
//! All cryptography is delegated to `coffre-crypto-core`.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod models;

pub mod store;
pub mod sqlite;

pub mod auth;

pub mod session;

pub mod vault;

pub use auth::{register_user, verify_user};
pub use error::VaultError;
pub use models::{CredentialRecord, LoginSummary, NewCredentialRecord, UserAccount};
pub use session::{initialize, unlock, unlock_with_params, VaultConfig};
pub use sqlite::SqliteStore;
pub use store::RecordStore;
pub use vault::Vault;
