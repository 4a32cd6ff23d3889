//! Read-only Postgres adapter for the user directory tables.

use crate::directory::{Identity, UserDirectory};
use crate::error::DirectoryError;
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::BTreeSet;

pub struct PostgresDirectory {
    pool: PgPool,
}

impl PostgresDirectory {
    pub fn new(pool: PgPool) -> Self {
        PostgresDirectory { pool }
    }

    async fn roles_for(&self, user_id: i64) -> Result<BTreeSet<String>, DirectoryError> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT r.name FROM roles r \
             JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DirectoryError(e.to_string()))?;

        Ok(names.into_iter().collect())
    }

    async fn load(
        &self,
        row: Option<(i64, String, String, bool, bool)>,
    ) -> Result<Option<Identity>, DirectoryError> {
        let Some((id, email, password_hash, enabled, locked)) = row else {
            return Ok(None);
        };
        let roles = self.roles_for(id).await?;
        Ok(Some(Identity {
            id,
            email,
            password_hash,
            roles,
            enabled,
            locked,
        }))
    }
}

#[async_trait]
impl UserDirectory for PostgresDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, DirectoryError> {
        let row = sqlx::query_as::<_, (i64, String, String, bool, bool)>(
            "SELECT id, email, password_hash, enabled, locked \
             FROM users WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DirectoryError(e.to_string()))?;

        self.load(row).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Identity>, DirectoryError> {
        let row = sqlx::query_as::<_, (i64, String, String, bool, bool)>(
            "SELECT id, email, password_hash, enabled, locked FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DirectoryError(e.to_string()))?;

        self.load(row).await
    }
}
