use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Persisted record of one issued refresh token.
///
/// Only the SHA-256 digest of the raw token is ever stored; losing the
/// raw string makes the record unreachable by lookup.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshTokenRecord {
    pub id: i64,
    pub user_id: i64,
    pub token_hash: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub revoked_at: Option<DateTime<Utc>>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub usage_count: i32,
}

impl RefreshTokenRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Insert payload for a new ledger record.
///
/// Timestamps are fixed by the caller so the ledger stays a pure
/// persistence boundary.
#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub user_id: i64,
    pub token_hash: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_comparison() {
        let now = Utc::now();
        let record = RefreshTokenRecord {
            id: 1,
            user_id: 1,
            token_hash: "hash".to_string(),
            issued_at: now,
            expires_at: now + chrono::Duration::seconds(30),
            revoked: false,
            revoked_at: None,
            ip_address: None,
            user_agent: None,
            last_used_at: None,
            usage_count: 0,
        };

        assert!(!record.is_expired(now));
        assert!(!record.is_expired(now + chrono::Duration::seconds(29)));
        assert!(record.is_expired(now + chrono::Duration::seconds(31)));
    }
}
