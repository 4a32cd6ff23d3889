//! Postgres-backed refresh-token ledger.
//!
//! Each operation is a single statement, so record-level atomicity
//! comes from the database. The conditional UPDATE in `mark_revoked`
//! is what makes concurrent rotation of one token resolve to a single
//! winner.

use crate::error::StoreError;
use crate::ledger::record::{NewRefreshToken, RefreshTokenRecord};
use crate::ledger::store::RefreshTokenStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresTokenStore {
    pool: PgPool,
}

impl PostgresTokenStore {
    pub fn new(pool: PgPool) -> Self {
        PostgresTokenStore { pool }
    }
}

const RECORD_COLUMNS: &str = "id, user_id, token_hash, issued_at, expires_at, revoked, \
     revoked_at, ip_address, user_agent, last_used_at, usage_count";

#[async_trait]
impl RefreshTokenStore for PostgresTokenStore {
    async fn create(
        &self,
        new_token: NewRefreshToken,
    ) -> Result<RefreshTokenRecord, StoreError> {
        let sql = format!(
            "INSERT INTO refresh_tokens \
             (user_id, token_hash, issued_at, expires_at, revoked, ip_address, user_agent, usage_count) \
             VALUES ($1, $2, $3, $4, FALSE, $5, $6, 0) \
             RETURNING {RECORD_COLUMNS}"
        );

        sqlx::query_as::<_, RefreshTokenRecord>(&sql)
            .bind(new_token.user_id)
            .bind(&new_token.token_hash)
            .bind(new_token.issued_at)
            .bind(new_token.expires_at)
            .bind(&new_token.ip_address)
            .bind(&new_token.user_agent)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    StoreError::HashCollision
                }
                _ => StoreError::from(e),
            })
    }

    async fn find_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, StoreError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM refresh_tokens WHERE token_hash = $1");

        let record = sqlx::query_as::<_, RefreshTokenRecord>(&sql)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn mark_revoked(&self, token_hash: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens \
             SET revoked = TRUE, revoked_at = NOW() \
             WHERE token_hash = $1 AND revoked = FALSE",
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn mark_used(&self, token_hash: &str) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE refresh_tokens \
             SET last_used_at = NOW(), usage_count = usage_count + 1 \
             WHERE token_hash = $1",
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_by_hash(&self, token_hash: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_all_for_user(&self, user_id: i64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn purge_revoked_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "DELETE FROM refresh_tokens WHERE revoked = TRUE AND revoked_at < $1",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
