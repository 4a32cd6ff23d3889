//! Service-layer lifecycle tests: login, rotation, revocation, and the
//! disabled/locked re-checks on refresh, all against the in-memory ledger.

use session_service::auth::AuthService;
use session_service::directory::{Identity, MemoryDirectory, PlainTextVerifier};
use session_service::error::AuthError;
use session_service::jwt::TokenSigner;
use session_service::ledger::{MemoryTokenStore, RefreshTokenStore};
use session_service::token::{ClientInfo, RefreshTokenGenerator, RefreshTokenService};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    auth: AuthService,
    store: Arc<MemoryTokenStore>,
    directory: Arc<MemoryDirectory>,
}

async fn harness() -> Harness {
    let directory = Arc::new(MemoryDirectory::new());
    directory
        .insert(Identity {
            id: 1,
            email: "user@example.com".to_string(),
            password_hash: "Secret123!".to_string(),
            roles: ["ROLE_USER", "ROLE_ADMIN"]
                .iter()
                .map(|s| s.to_string())
                .collect::<BTreeSet<_>>(),
            enabled: true,
            locked: false,
        })
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let signer = Arc::new(TokenSigner::new(
        "flow-test-secret-0123456789abcdefghij",
        "session-service",
        Duration::from_secs(3600),
    ));
    let tokens = RefreshTokenService::new(
        Arc::clone(&store) as Arc<dyn RefreshTokenStore>,
        Duration::from_secs(2_592_000),
    );
    let auth = AuthService::new(
        signer,
        tokens,
        Arc::clone(&directory) as _,
        Arc::new(PlainTextVerifier),
    );

    Harness {
        auth,
        store,
        directory,
    }
}

fn client() -> ClientInfo {
    ClientInfo {
        ip_address: Some("203.0.113.9".to_string()),
        user_agent: Some("flow-test".to_string()),
    }
}

#[tokio::test]
async fn test_login_persists_hashed_token_only() {
    let h = harness().await;
    let session = h
        .auth
        .login("user@example.com", "Secret123!", &client())
        .await
        .unwrap();

    // Only the digest is at rest; the raw value never matches a row
    let hash = RefreshTokenGenerator::hash(&session.refresh_token);
    assert!(h.store.find_by_hash(&hash).await.unwrap().is_some());
    assert!(h
        .store
        .find_by_hash(&session.refresh_token)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_refresh_preserves_identity_and_roles() {
    let h = harness().await;
    let first = h
        .auth
        .login("user@example.com", "Secret123!", &client())
        .await
        .unwrap();
    let second = h.auth.refresh(&first.refresh_token, &client()).await.unwrap();

    assert_eq!(second.user_id, first.user_id);
    assert_eq!(second.email, first.email);
    assert_eq!(second.roles, first.roles);
    assert_ne!(second.refresh_token, first.refresh_token);
}

#[tokio::test]
async fn test_rotation_revokes_rather_than_deletes() {
    let h = harness().await;
    let first = h
        .auth
        .login("user@example.com", "Secret123!", &client())
        .await
        .unwrap();
    h.auth.refresh(&first.refresh_token, &client()).await.unwrap();

    // The consumed token row remains for audit, marked revoked
    let hash = RefreshTokenGenerator::hash(&first.refresh_token);
    let record = h.store.find_by_hash(&hash).await.unwrap().unwrap();
    assert!(record.revoked);
    assert!(record.revoked_at.is_some());
}

#[tokio::test]
async fn test_refresh_on_disabled_account_looks_like_bad_token() {
    let h = harness().await;
    let session = h
        .auth
        .login("user@example.com", "Secret123!", &client())
        .await
        .unwrap();

    h.directory.set_enabled(1, false).await;

    // Refresh is unauthenticated; the response must not reveal that
    // the account was disabled rather than the token being bad
    let err = h
        .auth
        .refresh(&session.refresh_token, &client())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidRefreshToken));
    assert_eq!(err.code(), AuthError::InvalidRefreshToken.code());
}

#[tokio::test]
async fn test_refresh_on_locked_account_looks_like_bad_token() {
    let h = harness().await;
    let session = h
        .auth
        .login("user@example.com", "Secret123!", &client())
        .await
        .unwrap();

    h.directory.set_locked(1, true).await;

    let err = h
        .auth
        .refresh(&session.refresh_token, &client())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidRefreshToken));
}

#[tokio::test]
async fn test_logout_all_ends_every_session() {
    let h = harness().await;
    let a = h
        .auth
        .login("user@example.com", "Secret123!", &client())
        .await
        .unwrap();
    let b = h
        .auth
        .login("user@example.com", "Secret123!", &client())
        .await
        .unwrap();

    let deleted = h.auth.logout_all(a.user_id).await.unwrap();
    assert_eq!(deleted, 2);

    for raw in [a.refresh_token, b.refresh_token] {
        let err = h.auth.refresh(&raw, &client()).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken));
    }
}

#[tokio::test]
async fn test_logout_device_rejects_foreign_token() {
    let h = harness().await;
    let session = h
        .auth
        .login("user@example.com", "Secret123!", &client())
        .await
        .unwrap();

    // A different user id must not be able to delete this session
    let err = h
        .auth
        .logout_device(&session.refresh_token, 999)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized));

    // And the session survives the failed attempt
    assert!(h.auth.refresh(&session.refresh_token, &client()).await.is_ok());
}
