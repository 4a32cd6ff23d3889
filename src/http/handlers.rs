//! Auth endpoint handlers.

use crate::auth::{AuthResponse, AuthService};
use crate::config::Config;
use crate::error::AuthError;
use crate::http::authorize::{require_auth, RolePolicy};
use crate::http::envelope::{ApiError, ApiResponse};
use crate::http::gate::AuthContext;
use crate::jwt::TokenSigner;
use crate::metrics;
use crate::token::ClientInfo;
use axum::extract::{ConnectInfo, OriginalUri, Path, State};
use axum::http::HeaderMap;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub signer: Arc<TokenSigner>,
    pub auth: Arc<AuthService>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutDeviceRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutSummary {
    pub sessions_ended: u64,
}

pub async fn login(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    connect: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let path = uri.path().to_string();
    let timer = metrics::HTTP_LATENCY.with_label_values(&["login"]).start_timer();

    validate_login(&body).map_err(|e| ApiError::new(e, &path))?;

    let client = client_info(&headers, connect.map(|c| c.0));
    let response = state
        .auth
        .login(&body.email, &body.password, &client)
        .await
        .map_err(|e| ApiError::new(e, &path))?;

    timer.observe_duration();
    Ok(Json(ApiResponse::success(response)))
}

pub async fn refresh(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    connect: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let path = uri.path().to_string();
    let timer = metrics::HTTP_LATENCY.with_label_values(&["refresh"]).start_timer();

    if body.refresh_token.trim().is_empty() {
        return Err(ApiError::new(
            AuthError::Validation("refresh_token must not be empty".to_string()),
            &path,
        ));
    }

    let client = client_info(&headers, connect.map(|c| c.0));
    let response = state
        .auth
        .refresh(&body.refresh_token, &client)
        .await
        .map_err(|e| ApiError::new(e, &path))?;

    timer.observe_duration();
    Ok(Json(ApiResponse::success(response)))
}

pub async fn logout(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ctx: Option<Extension<AuthContext>>,
) -> Result<Json<ApiResponse<LogoutSummary>>, ApiError> {
    let path = uri.path().to_string();

    let identity = require_auth(ctx.as_ref().map(|ext| &ext.0))
        .map_err(|e| ApiError::new(e, &path))?;

    let count = state
        .auth
        .logout_all(identity.user_id)
        .await
        .map_err(|e| ApiError::new(e, &path))?;

    Ok(Json(ApiResponse::success_message(
        "Logged out from all devices",
        LogoutSummary {
            sessions_ended: count,
        },
    )))
}

pub async fn logout_device(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ctx: Option<Extension<AuthContext>>,
    Json(body): Json<LogoutDeviceRequest>,
) -> Result<Json<ApiResponse<LogoutSummary>>, ApiError> {
    let path = uri.path().to_string();

    let identity = require_auth(ctx.as_ref().map(|ext| &ext.0))
        .map_err(|e| ApiError::new(e, &path))?;

    state
        .auth
        .logout_device(&body.refresh_token, identity.user_id)
        .await
        .map_err(|e| ApiError::new(e, &path))?;

    Ok(Json(ApiResponse::success_message(
        "Logged out from this device",
        LogoutSummary { sessions_ended: 1 },
    )))
}

/// Force-logout every session of another user. Admin only.
pub async fn admin_logout_user(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ctx: Option<Extension<AuthContext>>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<LogoutSummary>>, ApiError> {
    let path = uri.path().to_string();

    let identity = require_auth(ctx.as_ref().map(|ext| &ext.0))
        .map_err(|e| ApiError::new(e, &path))?;
    RolePolicy::any(["ROLE_ADMIN"])
        .check(identity)
        .map_err(|e| ApiError::new(e, &path))?;

    let count = state
        .auth
        .logout_all(user_id)
        .await
        .map_err(|e| ApiError::new(e, &path))?;

    Ok(Json(ApiResponse::success_message(
        "All sessions ended for user",
        LogoutSummary {
            sessions_ended: count,
        },
    )))
}

pub async fn health() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(serde_json::json!({"status": "up"})))
}

pub async fn metrics_text() -> String {
    let metric_families = prometheus::gather();
    let mut buf = Vec::new();
    let encoder = prometheus::TextEncoder::new();
    if prometheus::Encoder::encode(&encoder, &metric_families, &mut buf).is_err() {
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}

fn validate_login(body: &LoginRequest) -> Result<(), AuthError> {
    if body.email.trim().is_empty() || !body.email.contains('@') {
        return Err(AuthError::Validation("email must be a valid address".to_string()));
    }
    if body.password.is_empty() {
        return Err(AuthError::Validation("password must not be empty".to_string()));
    }
    Ok(())
}

/// Best-effort client metadata: first X-Forwarded-For entry, then
/// X-Real-IP, then the peer address.
fn client_info(headers: &HeaderMap, peer: Option<SocketAddr>) -> ClientInfo {
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|hv| hv.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|hv| hv.to_str().ok())
                .map(|s| s.trim().to_string())
        })
        .or_else(|| peer.map(|addr| addr.ip().to_string()));

    let user_agent = headers
        .get("user-agent")
        .and_then(|hv| hv.to_str().ok())
        .map(|s| s.to_string());

    ClientInfo {
        ip_address,
        user_agent,
    }
}
