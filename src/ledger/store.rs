//! Persistence boundary for refresh-token records.
//!
//! Implementations do no business validation; expiry and revocation
//! checks belong to the token service. Every operation is atomic with
//! respect to a single record.

use crate::error::StoreError;
use crate::ledger::record::{NewRefreshToken, RefreshTokenRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Persist a new record. Fails with [`StoreError::HashCollision`] if
    /// the token hash already exists.
    async fn create(&self, new_token: NewRefreshToken)
        -> Result<RefreshTokenRecord, StoreError>;

    async fn find_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, StoreError>;

    /// Set `revoked = true, revoked_at = now` in a single write.
    ///
    /// Returns `true` when this call performed the transition, `false`
    /// when the record was already revoked or absent. Callers racing to
    /// rotate the same token use the return value to detect the loser.
    async fn mark_revoked(&self, token_hash: &str) -> Result<bool, StoreError>;

    /// Record a successful use: `last_used_at = now`, `usage_count + 1`.
    async fn mark_used(&self, token_hash: &str) -> Result<(), StoreError>;

    async fn delete_by_hash(&self, token_hash: &str) -> Result<u64, StoreError>;

    async fn delete_all_for_user(&self, user_id: i64) -> Result<u64, StoreError>;

    /// Bulk delete of records with `expires_at < now`.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;

    /// Bulk delete of revoked records with `revoked_at < cutoff`.
    async fn purge_revoked_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, StoreError>;
}
