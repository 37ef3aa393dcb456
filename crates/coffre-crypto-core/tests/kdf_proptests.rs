#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Property-based tests for PBKDF2 key derivation.

use coffre_crypto_core::kdf::{derive, KdfParams, KeySalt};
use coffre_crypto_core::memory::MasterSecret;
use proptest::prelude::*;

/// Low-cost params for fast property tests.
const PROP_PARAMS: KdfParams = KdfParams { iterations: 10 };

proptest! {
    /// The same (secret, salt) pair always reproduces the same key.
    #[test]
    fn derive_is_deterministic(
        secret in ".{1,64}",
        salt_bytes in proptest::collection::vec(any::<u8>(), 16),
    ) {
        let salt = KeySalt::from_bytes(&salt_bytes).unwrap();
        let master = MasterSecret::new(secret);

        let (a, _) = derive(&master, Some(salt), &PROP_PARAMS).unwrap();
        let (b, _) = derive(&master, Some(salt), &PROP_PARAMS).unwrap();

        prop_assert_eq!(a.expose(), b.expose());
    }

    /// Distinct secrets never collide under the same salt.
    #[test]
    fn different_secrets_different_keys(
        secret_a in "[a-z]{1,32}",
        secret_b in "[A-Z]{1,32}",
        salt_bytes in proptest::collection::vec(any::<u8>(), 16),
    ) {
        let salt = KeySalt::from_bytes(&salt_bytes).unwrap();

        let (a, _) = derive(&MasterSecret::new(secret_a), Some(salt), &PROP_PARAMS).unwrap();
        let (b, _) = derive(&MasterSecret::new(secret_b), Some(salt), &PROP_PARAMS).unwrap();

        prop_assert_ne!(a.expose(), b.expose());
    }

    /// A generated salt round-trips through its byte representation.
    #[test]
    fn salt_bytes_roundtrip(_dummy in 0u8..1) {
        let salt = KeySalt::generate();
        let restored = KeySalt::from_bytes(salt.as_bytes()).unwrap();
        prop_assert_eq!(restored.as_bytes(), salt.as_bytes());
    }
}
