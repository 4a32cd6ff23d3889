//! Per-request bearer-token authentication.
//!
//! Stateless by design: the gate only verifies the access token's
//! signature and expiry, it never touches the refresh-token ledger.
//! A missing token lets the request continue anonymously; downstream
//! guards decide whether anonymity is acceptable.

use crate::error::AuthError;
use crate::http::envelope::ApiError;
use crate::http::handlers::AppState;
use crate::jwt::AccessClaims;
use crate::metrics;
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::collections::BTreeSet;
use tracing::warn;

/// Request-scoped identity attached by the gate on successful
/// verification.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub email: String,
    pub roles: BTreeSet<String>,
}

impl AuthContext {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

impl From<AccessClaims> for AuthContext {
    fn from(claims: AccessClaims) -> Self {
        AuthContext {
            user_id: claims.user_id,
            email: claims.sub,
            roles: claims.roles,
        }
    }
}

pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = bearer_token(
        request.headers(),
        &state.config.auth_header,
        &state.config.auth_prefix,
    );

    let Some(token) = token else {
        return next.run(request).await;
    };

    match state.signer.verify(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(AuthContext::from(claims));
            next.run(request).await
        }
        Err(e) => {
            let err = AuthError::InvalidAccessToken(e);
            metrics::GATE_REJECTIONS.with_label_values(&[err.code()]).inc();
            warn!(code = err.code(), "Rejected bearer token");
            ApiError::new(err, request.uri().path()).into_response()
        }
    }
}

fn bearer_token(headers: &HeaderMap, header: &str, prefix: &str) -> Option<String> {
    let value = headers.get(header)?.to_str().ok()?;
    value
        .strip_prefix(prefix)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
