//! Refresh-token lifecycle orchestration against the ledger.
//!
//! Rotation-on-refresh is the rule here: every successful refresh
//! revokes the token that was presented, so a refresh token is
//! effectively single-use and reuse of a stolen-then-rotated token is
//! detectable (the old record is revoked, not merely expired).

use crate::error::AuthError;
use crate::ledger::record::{NewRefreshToken, RefreshTokenRecord};
use crate::ledger::store::RefreshTokenStore;
use crate::metrics;
use crate::token::generator::RefreshTokenGenerator;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Best-effort client metadata captured at login/refresh.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// A freshly issued refresh token.
///
/// `raw` is the only place the cleartext value ever exists server-side;
/// it goes back to the client and is never persisted.
pub struct IssuedRefreshToken {
    pub raw: String,
    pub record: RefreshTokenRecord,
}

pub struct RefreshTokenService {
    store: Arc<dyn RefreshTokenStore>,
    refresh_ttl: Duration,
}

impl RefreshTokenService {
    pub fn new(store: Arc<dyn RefreshTokenStore>, refresh_ttl: Duration) -> Self {
        RefreshTokenService { store, refresh_ttl }
    }

    pub fn store(&self) -> &Arc<dyn RefreshTokenStore> {
        &self.store
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Generate a raw token, persist its hash, return the raw value.
    pub async fn issue(
        &self,
        user_id: i64,
        client: &ClientInfo,
    ) -> Result<IssuedRefreshToken, AuthError> {
        let raw = RefreshTokenGenerator::generate();
        let now = Utc::now();

        let record = self
            .store
            .create(NewRefreshToken {
                user_id,
                token_hash: RefreshTokenGenerator::hash(&raw),
                issued_at: now,
                expires_at: now + chrono::Duration::seconds(self.refresh_ttl.as_secs() as i64),
                ip_address: client.ip_address.clone(),
                user_agent: client.user_agent.clone(),
            })
            .await?;

        metrics::TOKENS_ISSUED.with_label_values(&["refresh"]).inc();
        info!(user_id = %user_id, token_id = %record.id, "Issued refresh token");

        Ok(IssuedRefreshToken { raw, record })
    }

    /// Hash the presented value and check it against the ledger.
    ///
    /// Not-found, revoked and expired are logged distinctly but all
    /// surface as [`AuthError::InvalidRefreshToken`] so callers leak no
    /// oracle about which case occurred.
    pub async fn validate(&self, raw: &str) -> Result<RefreshTokenRecord, AuthError> {
        let token_hash = RefreshTokenGenerator::hash(raw);

        let Some(record) = self.store.find_by_hash(&token_hash).await? else {
            warn!("Refresh token not found");
            return Err(AuthError::InvalidRefreshToken);
        };

        if record.revoked {
            warn!(user_id = %record.user_id, "Attempted use of revoked refresh token");
            return Err(AuthError::InvalidRefreshToken);
        }

        if record.is_expired(Utc::now()) {
            warn!(user_id = %record.user_id, "Attempted use of expired refresh token");
            return Err(AuthError::InvalidRefreshToken);
        }

        Ok(record)
    }

    /// Validate and revoke the presented token, recording the use.
    ///
    /// The record is kept for audit, never deleted here. Returns the old
    /// record so the caller can issue a replacement for its owner. When
    /// two calls race on the same token the conditional revoke admits
    /// exactly one winner; the loser fails as invalid and its attempt is
    /// not counted as a use.
    pub async fn rotate(&self, raw: &str) -> Result<RefreshTokenRecord, AuthError> {
        let record = self.validate(raw).await?;
        let token_hash = RefreshTokenGenerator::hash(raw);

        if !self.store.mark_revoked(&token_hash).await? {
            warn!(
                user_id = %record.user_id,
                "Lost rotation race: token already revoked by a concurrent refresh"
            );
            metrics::TOKENS_ROTATED.with_label_values(&["conflict"]).inc();
            return Err(AuthError::InvalidRefreshToken);
        }

        self.store.mark_used(&token_hash).await?;

        metrics::TOKENS_ROTATED.with_label_values(&["success"]).inc();
        info!(user_id = %record.user_id, usage_count = record.usage_count + 1, "Rotated refresh token");

        Ok(record)
    }

    /// Revoke without deleting; the record stays for audit.
    ///
    /// Idempotent on an already-revoked token; an unknown token fails
    /// as invalid.
    pub async fn revoke_by_value(&self, raw: &str) -> Result<(), AuthError> {
        let token_hash = RefreshTokenGenerator::hash(raw);

        let Some(record) = self.store.find_by_hash(&token_hash).await? else {
            warn!("Attempted to revoke non-existent refresh token");
            return Err(AuthError::InvalidRefreshToken);
        };

        if self.store.mark_revoked(&token_hash).await? {
            metrics::TOKENS_REVOKED.with_label_values(&["explicit"]).inc();
            info!(user_id = %record.user_id, "Revoked refresh token");
        }
        Ok(())
    }

    /// Hard-delete one record after verifying the caller owns it.
    pub async fn delete_by_value_for_user(
        &self,
        raw: &str,
        user_id: i64,
    ) -> Result<(), AuthError> {
        let token_hash = RefreshTokenGenerator::hash(raw);

        let Some(record) = self.store.find_by_hash(&token_hash).await? else {
            warn!(user_id = %user_id, "Attempted to delete non-existent refresh token");
            return Err(AuthError::InvalidRefreshToken);
        };

        if record.user_id != user_id {
            warn!(
                acting_user = %user_id,
                owning_user = %record.user_id,
                "Security violation: refresh token deletion across users"
            );
            return Err(AuthError::Unauthorized);
        }

        self.store.delete_by_hash(&token_hash).await?;
        info!(user_id = %user_id, "Deleted refresh token (single device logout)");
        Ok(())
    }

    /// Hard-delete every record owned by the user.
    pub async fn delete_all_for_user(&self, user_id: i64) -> Result<u64, AuthError> {
        let deleted = self.store.delete_all_for_user(user_id).await?;
        info!(user_id = %user_id, count = %deleted, "Deleted all refresh tokens for user");
        Ok(deleted)
    }
}
