//! Login, refresh and logout use cases.
//!
//! The session lifecycle is: login issues an access/refresh pair,
//! every refresh rotates the refresh token and re-signs access from the
//! current identity, logout deletes refresh tokens. Access tokens
//! already issued stay valid until natural expiry; that window is
//! bounded by the short access-token TTL.

use crate::directory::{Identity, PasswordVerifier, UserDirectory};
use crate::error::AuthError;
use crate::jwt::TokenSigner;
use crate::metrics;
use crate::token::{ClientInfo, RefreshTokenService};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Token pair plus identity metadata returned by login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user_id: i64,
    pub email: String,
    pub roles: BTreeSet<String>,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access-token lifetime in seconds
    pub expires_in: i64,
}

pub struct AuthService {
    signer: Arc<TokenSigner>,
    tokens: RefreshTokenService,
    directory: Arc<dyn UserDirectory>,
    passwords: Arc<dyn PasswordVerifier>,
}

impl AuthService {
    pub fn new(
        signer: Arc<TokenSigner>,
        tokens: RefreshTokenService,
        directory: Arc<dyn UserDirectory>,
        passwords: Arc<dyn PasswordVerifier>,
    ) -> Self {
        AuthService {
            signer,
            tokens,
            directory,
            passwords,
        }
    }

    pub fn tokens(&self) -> &RefreshTokenService {
        &self.tokens
    }

    /// Authenticate by email and password and issue a token pair.
    ///
    /// Unknown email and wrong password produce the identical error so
    /// login cannot be used to enumerate accounts. The enabled/locked
    /// flags are checked only after the password matches, so those
    /// responses are not a password oracle either.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        client: &ClientInfo,
    ) -> Result<AuthResponse, AuthError> {
        let Some(identity) = self.directory.find_by_email(email).await? else {
            warn!("Login failed: user not found");
            metrics::LOGIN_ATTEMPTS.with_label_values(&["failure"]).inc();
            return Err(AuthError::InvalidCredentials);
        };

        if !self.passwords.verify(password, &identity.password_hash) {
            warn!(user_id = %identity.id, "Login failed: invalid password");
            metrics::LOGIN_ATTEMPTS.with_label_values(&["failure"]).inc();
            return Err(AuthError::InvalidCredentials);
        }

        if !identity.enabled {
            warn!(user_id = %identity.id, "Login failed: account disabled");
            metrics::LOGIN_ATTEMPTS.with_label_values(&["failure"]).inc();
            return Err(AuthError::AccountDisabled);
        }

        if identity.locked {
            warn!(user_id = %identity.id, "Login failed: account locked");
            metrics::LOGIN_ATTEMPTS.with_label_values(&["failure"]).inc();
            return Err(AuthError::AccountLocked);
        }

        let response = self.issue_pair(&identity, client).await?;

        metrics::LOGIN_ATTEMPTS.with_label_values(&["success"]).inc();
        info!(user_id = %identity.id, "User logged in");
        Ok(response)
    }

    /// Exchange a refresh token for a new pair, rotating the old one.
    ///
    /// The identity is re-read from the directory so role changes take
    /// effect on the next refresh rather than being carried forward
    /// from the old token. A vanished, disabled or locked account fails
    /// with the same error as a bad token: refresh is unauthenticated,
    /// so it must not disclose account state.
    pub async fn refresh(
        &self,
        raw_refresh: &str,
        client: &ClientInfo,
    ) -> Result<AuthResponse, AuthError> {
        let old_record = self.tokens.rotate(raw_refresh).await?;

        let Some(identity) = self.directory.find_by_id(old_record.user_id).await? else {
            warn!(user_id = %old_record.user_id, "Refresh failed: user no longer exists");
            return Err(AuthError::InvalidRefreshToken);
        };

        if !identity.enabled {
            warn!(user_id = %identity.id, "Refresh denied: account disabled");
            return Err(AuthError::InvalidRefreshToken);
        }
        if identity.locked {
            warn!(user_id = %identity.id, "Refresh denied: account locked");
            return Err(AuthError::InvalidRefreshToken);
        }

        let response = self.issue_pair(&identity, client).await?;

        info!(user_id = %identity.id, "Refresh token rotated");
        Ok(response)
    }

    /// Delete every refresh token for the user (logout from all devices).
    pub async fn logout_all(&self, user_id: i64) -> Result<u64, AuthError> {
        let deleted = self.tokens.delete_all_for_user(user_id).await?;
        info!(user_id = %user_id, count = %deleted, "Logout: all sessions ended");
        Ok(deleted)
    }

    /// Delete exactly one refresh token, enforcing ownership.
    pub async fn logout_device(&self, raw_refresh: &str, user_id: i64) -> Result<(), AuthError> {
        self.tokens.delete_by_value_for_user(raw_refresh, user_id).await?;
        info!(user_id = %user_id, "Logout: single device session ended");
        Ok(())
    }

    async fn issue_pair(
        &self,
        identity: &Identity,
        client: &ClientInfo,
    ) -> Result<AuthResponse, AuthError> {
        let access_token =
            self.signer
                .sign_identity(identity.id, &identity.email, &identity.roles)?;
        metrics::TOKENS_ISSUED.with_label_values(&["access"]).inc();

        let issued = self.tokens.issue(identity.id, client).await?;

        Ok(AuthResponse {
            user_id: identity.id,
            email: identity.email.clone(),
            roles: identity.roles.clone(),
            access_token,
            refresh_token: issued.raw,
            token_type: "Bearer".to_string(),
            expires_in: self.signer.access_ttl().as_secs() as i64,
        })
    }
}
