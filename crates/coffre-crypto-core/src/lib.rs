//! `coffre-crypto-core` — Pure cryptographic primitives for COFFRE.
//!
//! This crate is the audit target: zero storage, zero network, zero async.
//! Key derivation, credential encryption, password generation, and strength
//! scoring live here; everything that touches a file or a database lives in
//! `coffre-vault`.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod memory;

pub mod kdf;
pub mod cipher;

pub mod password;

pub mod strength;

pub use cipher::{fingerprint, CredentialCipher};
pub use error::CryptoError;
pub use kdf::{derive, KdfParams, KeySalt, DEFAULT_ITERATIONS, SALT_LEN};
pub use memory::{disable_core_dumps, DerivedKey, MasterSecret, KEY_LEN};
pub use password::{generate, Complexity, DEFAULT_PASSWORD_LENGTH};
pub use strength::{score, StrengthLabel, StrengthReport};
