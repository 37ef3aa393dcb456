#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Property-based tests for the vault against a real on-disk store.

use coffre_crypto_core::kdf::KdfParams;
use coffre_crypto_core::MasterSecret;
use coffre_vault::{unlock_with_params, VaultConfig};
use proptest::prelude::*;
use tempfile::TempDir;

/// Low-cost KDF for property tests.
const PROP_PARAMS: KdfParams = KdfParams { iterations: 10 };

proptest! {
    // Each case opens a real store; keep the case count modest.
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Arbitrary non-empty credentials survive a save/get roundtrip intact.
    #[test]
    fn save_get_roundtrip_preserves_fields(
        website in "[a-z0-9.-]{1,40}",
        username in ".{1,64}",
        password in ".{1,64}",
    ) {
        let dir = TempDir::new().unwrap();
        let config = VaultConfig::new(dir.path().join("vault"));
        let secret = MasterSecret::from("proptest master secret");
        let vault = unlock_with_params(&config, &secret, &PROP_PARAMS).unwrap();

        vault.save_login(1, &website, &username, &password).unwrap();
        let (got_username, got_password) = vault
            .get_login(1, &website)
            .unwrap()
            .expect("saved login should be found");

        prop_assert_eq!(got_username, username);
        prop_assert_eq!(got_password, password);
    }

    /// Record-id lookups agree with website lookups.
    #[test]
    fn id_and_website_lookups_agree(
        website in "[a-z0-9.-]{1,40}",
        username in ".{1,32}",
        password in ".{1,32}",
    ) {
        let dir = TempDir::new().unwrap();
        let config = VaultConfig::new(dir.path().join("vault"));
        let secret = MasterSecret::from("proptest master secret");
        let vault = unlock_with_params(&config, &secret, &PROP_PARAMS).unwrap();

        let id = vault.save_login(1, &website, &username, &password).unwrap();
        let by_website = vault.get_login(1, &website).unwrap().expect("found");
        let (got_website, got_username, got_password) =
            vault.get_login_by_id(id).unwrap().expect("found");

        prop_assert_eq!(got_website, website);
        prop_assert_eq!((got_username, got_password), by_website);
    }
}
