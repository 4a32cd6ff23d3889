use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

/// Claims carried by a signed access token.
///
/// Never persisted; exists only inside the self-contained token. The
/// subject is the user's email, matching what the login flow issues.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessClaims {
    /// Issuer
    pub iss: String,
    /// Subject (email)
    pub sub: String,
    /// Issued-at, unix seconds
    pub iat: i64,
    /// Expiry, unix seconds
    pub exp: i64,
    /// Owning user id
    pub user_id: i64,
    /// Role names granted at issuance
    pub roles: BTreeSet<String>,
}

impl AccessClaims {
    pub fn new(
        issuer: impl Into<String>,
        email: impl Into<String>,
        user_id: i64,
        roles: BTreeSet<String>,
        ttl: Duration,
    ) -> Self {
        let now = chrono::Utc::now().timestamp();
        AccessClaims {
            iss: issuer.into(),
            sub: email.into(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
            user_id,
            roles,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.exp < chrono::Utc::now().timestamp()
    }
}
