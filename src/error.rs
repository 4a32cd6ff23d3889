use thiserror::Error;

/// Failures from access-token signing and verification.
///
/// Verification failures stay distinguishable so callers can react
/// differently to an expired token versus a tampered one, even though
/// the HTTP boundary merges them into one external category.
#[derive(Error, Debug)]
pub enum SignerError {
    #[error("token signature invalid")]
    InvalidSignature,

    #[error("token malformed")]
    Malformed,

    #[error("token expired")]
    Expired,

    #[error("token algorithm or format unsupported")]
    Unsupported,

    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Failures from the refresh-token ledger.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store error: {0}")]
    Database(String),

    #[error("token hash collision")]
    HashCollision,
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// Failures from the external user directory.
#[derive(Debug, Error)]
#[error("user directory error: {0}")]
pub struct DirectoryError(pub String);

/// Domain error taxonomy.
///
/// Raised at the point of detection and surfaced unchanged to the HTTP
/// boundary, which maps each variant to a status and stable code.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("account is disabled")]
    AccountDisabled,

    #[error("account is locked")]
    AccountLocked,

    #[error("invalid refresh token")]
    InvalidRefreshToken,

    #[error("invalid access token: {0}")]
    InvalidAccessToken(#[from] SignerError),

    #[error("authentication required")]
    NotAuthenticated,

    #[error("not authorized for this resource")]
    Unauthorized,

    #[error("access denied")]
    AccessDenied,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable machine-readable code for API responses.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => AUTH_CREDENTIALS,
            AuthError::AccountDisabled => AUTH_DISABLED,
            AuthError::AccountLocked => AUTH_LOCKED,
            AuthError::InvalidRefreshToken => AUTH_REFRESH,
            AuthError::InvalidAccessToken(inner) => match inner {
                SignerError::InvalidSignature => AUTH_SIGNATURE,
                SignerError::Malformed => AUTH_MALFORMED,
                SignerError::Expired => AUTH_EXPIRED,
                SignerError::Unsupported => AUTH_UNSUPPORTED,
                SignerError::Encoding(_) => SYS_INTERNAL,
            },
            AuthError::NotAuthenticated => AUTH_REQUIRED,
            AuthError::Unauthorized => AUTH_OWNERSHIP,
            AuthError::AccessDenied => AUTH_FORBIDDEN,
            AuthError::Validation(_) => VAL_INPUT,
            AuthError::Directory(_)
            | AuthError::Store(_)
            | AuthError::Config(_)
            | AuthError::Internal(_) => SYS_INTERNAL,
        }
    }

    /// Error category exposed to clients.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::AccountDisabled => "account_disabled",
            AuthError::AccountLocked => "account_locked",
            AuthError::InvalidRefreshToken => "invalid_refresh_token",
            AuthError::InvalidAccessToken(_) => "invalid_access_token",
            AuthError::NotAuthenticated => "unauthorized",
            AuthError::Unauthorized => "unauthorized",
            AuthError::AccessDenied => "access_denied",
            AuthError::Validation(_) => "validation_error",
            AuthError::Directory(_)
            | AuthError::Store(_)
            | AuthError::Config(_)
            | AuthError::Internal(_) => "internal",
        }
    }

    /// True for variants whose detail must never reach a client.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::Directory(_)
                | AuthError::Store(_)
                | AuthError::Config(_)
                | AuthError::Internal(_)
        ) || matches!(
            self,
            AuthError::InvalidAccessToken(SignerError::Encoding(_))
        )
    }
}

// Error codes for API responses
pub const AUTH_CREDENTIALS: &str = "AUTH_CREDENTIALS";
pub const AUTH_DISABLED: &str = "AUTH_DISABLED";
pub const AUTH_LOCKED: &str = "AUTH_LOCKED";
pub const AUTH_REFRESH: &str = "AUTH_REFRESH";
pub const AUTH_SIGNATURE: &str = "AUTH_SIGNATURE";
pub const AUTH_MALFORMED: &str = "AUTH_MALFORMED";
pub const AUTH_EXPIRED: &str = "AUTH_EXPIRED";
pub const AUTH_UNSUPPORTED: &str = "AUTH_UNSUPPORTED";
pub const AUTH_REQUIRED: &str = "AUTH_REQUIRED";
pub const AUTH_OWNERSHIP: &str = "AUTH_OWNERSHIP";
pub const AUTH_FORBIDDEN: &str = "AUTH_FORBIDDEN";
pub const VAL_INPUT: &str = "VAL_INPUT";
pub const SYS_INTERNAL: &str = "SYS_INTERNAL";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_codes_stay_distinguishable() {
        let cases = [
            (SignerError::InvalidSignature, AUTH_SIGNATURE),
            (SignerError::Malformed, AUTH_MALFORMED),
            (SignerError::Expired, AUTH_EXPIRED),
            (SignerError::Unsupported, AUTH_UNSUPPORTED),
        ];
        for (inner, code) in cases {
            let err = AuthError::InvalidAccessToken(inner);
            assert_eq!(err.code(), code);
            assert_eq!(err.category(), "invalid_access_token");
        }
    }

    #[test]
    fn test_internal_detail_is_flagged() {
        assert!(AuthError::Internal("boom".into()).is_internal());
        assert!(AuthError::Store(StoreError::Database("down".into())).is_internal());
        assert!(!AuthError::InvalidCredentials.is_internal());
    }

    #[test]
    fn test_refresh_failures_share_one_code() {
        assert_eq!(AuthError::InvalidRefreshToken.code(), AUTH_REFRESH);
    }
}
