//! Uniform success/error envelope for every API response.

use crate::error::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub category: String,
    pub message: String,
    pub path: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            timestamp: Utc::now(),
            message: None,
            data: Some(data),
            error: None,
        }
    }

    pub fn success_message(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: true,
            timestamp: Utc::now(),
            message: Some(message.into()),
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: ErrorDetails) -> Self {
        ApiResponse {
            success: false,
            timestamp: Utc::now(),
            message: None,
            data: None,
            error: Some(error),
        }
    }
}

/// HTTP status for each domain error.
#[must_use]
pub fn status_for(err: &AuthError) -> StatusCode {
    match err {
        AuthError::Validation(_) => StatusCode::BAD_REQUEST,
        AuthError::InvalidCredentials
        | AuthError::AccountDisabled
        | AuthError::AccountLocked
        | AuthError::InvalidRefreshToken
        | AuthError::InvalidAccessToken(_)
        | AuthError::NotAuthenticated
        | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
        AuthError::AccessDenied => StatusCode::FORBIDDEN,
        AuthError::Directory(_)
        | AuthError::Store(_)
        | AuthError::Config(_)
        | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// A domain error bound to the request path it occurred on.
#[derive(Debug)]
pub struct ApiError {
    pub error: AuthError,
    pub path: String,
}

impl ApiError {
    pub fn new(error: AuthError, path: impl Into<String>) -> Self {
        ApiError {
            error,
            path: path.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.error);

        // Full detail stays server-side; clients get a generic message
        // for anything internal.
        let message = if self.error.is_internal() {
            error!(error = %self.error, path = %self.path, "Internal error");
            "Internal server error".to_string()
        } else {
            self.error.to_string()
        };

        let details = ErrorDetails {
            code: self.error.code().to_string(),
            category: self.error.category().to_string(),
            message,
            path: self.path,
        };

        (
            status,
            Json(ApiResponse::<serde_json::Value>::failure(details)),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SignerError, StoreError};

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&AuthError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_for(&AuthError::AccessDenied), StatusCode::FORBIDDEN);
        assert_eq!(
            status_for(&AuthError::Validation("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&AuthError::Store(StoreError::Database("down".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&AuthError::InvalidAccessToken(SignerError::Expired)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_envelope_shapes() {
        let ok = ApiResponse::success(serde_json::json!({"k": "v"}));
        assert!(ok.success);
        assert!(ok.error.is_none());

        let err = ApiResponse::<serde_json::Value>::failure(ErrorDetails {
            code: "AUTH_REFRESH".into(),
            category: "invalid_refresh_token".into(),
            message: "invalid refresh token".into(),
            path: "/api/v1/auth/refresh".into(),
        });
        assert!(!err.success);
        assert!(err.data.is_none());
    }
}
