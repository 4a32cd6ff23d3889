//! In-memory refresh-token ledger for tests and local runs.
//!
//! All mutation happens under a single write lock, mirroring the
//! record-level atomicity of the Postgres implementation.

use crate::error::StoreError;
use crate::ledger::record::{NewRefreshToken, RefreshTokenRecord};
use crate::ledger::store::RefreshTokenStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryTokenStore {
    records: RwLock<HashMap<String, RefreshTokenRecord>>,
    next_id: AtomicI64,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        MemoryTokenStore {
            records: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of live records, for test assertions.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryTokenStore {
    async fn create(
        &self,
        new_token: NewRefreshToken,
    ) -> Result<RefreshTokenRecord, StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&new_token.token_hash) {
            return Err(StoreError::HashCollision);
        }

        let record = RefreshTokenRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user_id: new_token.user_id,
            token_hash: new_token.token_hash.clone(),
            issued_at: new_token.issued_at,
            expires_at: new_token.expires_at,
            revoked: false,
            revoked_at: None,
            ip_address: new_token.ip_address,
            user_agent: new_token.user_agent,
            last_used_at: None,
            usage_count: 0,
        };
        records.insert(new_token.token_hash, record.clone());
        Ok(record)
    }

    async fn find_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, StoreError> {
        Ok(self.records.read().await.get(token_hash).cloned())
    }

    async fn mark_revoked(&self, token_hash: &str) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        match records.get_mut(token_hash) {
            Some(record) if !record.revoked => {
                record.revoked = true;
                record.revoked_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_used(&self, token_hash: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if let Some(record) = records.get_mut(token_hash) {
            record.last_used_at = Some(Utc::now());
            record.usage_count += 1;
        }
        Ok(())
    }

    async fn delete_by_hash(&self, token_hash: &str) -> Result<u64, StoreError> {
        let mut records = self.records.write().await;
        Ok(u64::from(records.remove(token_hash).is_some()))
    }

    async fn delete_all_for_user(&self, user_id: i64) -> Result<u64, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| r.user_id != user_id);
        Ok((before - records.len()) as u64)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| r.expires_at >= now);
        Ok((before - records.len()) as u64)
    }

    async fn purge_revoked_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| !(r.revoked && r.revoked_at.is_some_and(|at| at < cutoff)));
        Ok((before - records.len()) as u64)
    }
}
