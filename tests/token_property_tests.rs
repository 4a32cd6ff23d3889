//! Property-based tests for token generation, hashing, and rotation.

use proptest::prelude::*;
use session_service::ledger::{MemoryTokenStore, RefreshTokenStore};
use session_service::token::{ClientInfo, RefreshTokenGenerator, RefreshTokenService};
use std::sync::Arc;
use std::time::Duration;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Hashing is a pure function: the same input always maps to the
    /// same digest, and the digest never echoes the input.
    #[test]
    fn prop_hash_deterministic_and_distinct(token in "[A-Za-z0-9_-]{20,64}") {
        let h1 = RefreshTokenGenerator::hash(&token);
        let h2 = RefreshTokenGenerator::hash(&token);
        prop_assert_eq!(&h1, &h2);
        prop_assert_ne!(&h1, &token);
        // SHA-256 digest, base64url without padding
        prop_assert_eq!(h1.len(), 43);
    }

    /// Different raw tokens map to different digests.
    #[test]
    fn prop_hash_injective_on_distinct_inputs(
        a in "[A-Za-z0-9_-]{20,64}",
        b in "[A-Za-z0-9_-]{20,64}",
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(
            RefreshTokenGenerator::hash(&a),
            RefreshTokenGenerator::hash(&b)
        );
    }

    /// Generated tokens are url-safe and never collide in a batch.
    #[test]
    fn prop_generated_tokens_unique(n in 2usize..16) {
        let tokens: Vec<String> = (0..n).map(|_| RefreshTokenGenerator::generate()).collect();
        for t in &tokens {
            prop_assert_eq!(t.len(), 43);
            prop_assert!(t.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        }
        let mut deduped = tokens.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), tokens.len());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Rotation always invalidates the consumed token, whatever the
    /// user id or client metadata.
    #[test]
    fn prop_rotation_invalidates_old_token(
        user_id in 1i64..1_000_000,
        ip in proptest::option::of("[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}"),
        agent in proptest::option::of("[a-zA-Z0-9/. ]{1,40}"),
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let store = Arc::new(MemoryTokenStore::new());
            let service = RefreshTokenService::new(
                Arc::clone(&store) as Arc<dyn RefreshTokenStore>,
                Duration::from_secs(3600),
            );
            let client = ClientInfo {
                ip_address: ip,
                user_agent: agent,
            };

            let issued = service.issue(user_id, &client).await.unwrap();
            let rotated = service.rotate(&issued.raw).await.unwrap();
            prop_assert_eq!(rotated.user_id, user_id);

            // Second use of the same raw token must fail
            prop_assert!(service.rotate(&issued.raw).await.is_err());

            // And the row is retained as revoked, not deleted
            let hash = RefreshTokenGenerator::hash(&issued.raw);
            let record = store.find_by_hash(&hash).await.unwrap().unwrap();
            prop_assert!(record.revoked);
            Ok(())
        })?;
    }
}
