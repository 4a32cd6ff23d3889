//! Centralized configuration for the Session Service.
//!
//! All configuration is loaded from environment variables and validated
//! at startup.

use crate::error::AuthError;
use std::env;
use std::time::Duration;

/// Session Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    // Server settings
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    // Persistence
    /// Postgres connection string
    pub database_url: String,

    // JWT settings
    /// Symmetric signing secret (>= 32 bytes)
    pub jwt_secret: String,
    /// JWT issuer claim
    pub jwt_issuer: String,
    /// Access token TTL
    pub access_token_ttl: Duration,
    /// Refresh token TTL
    pub refresh_token_ttl: Duration,

    // Bearer transport
    /// Header the gate reads the bearer token from
    pub auth_header: String,
    /// Prefix stripped from the header value
    pub auth_prefix: String,

    // Housekeeping
    /// How long revoked tokens are retained for audit before purging
    pub revoked_retention: Duration,
    /// Cadence of the in-process cleanup task
    pub cleanup_interval: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, AuthError> {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_env("PORT", 8080)?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| AuthError::Config("DATABASE_URL is required".to_string()))?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AuthError::Config("JWT_SECRET is required".to_string()))?;
        if jwt_secret.len() < 32 {
            return Err(AuthError::Config(
                "JWT_SECRET must be at least 32 bytes".to_string(),
            ));
        }
        let jwt_issuer =
            env::var("JWT_ISSUER").unwrap_or_else(|_| "session-service".to_string());

        let access_token_ttl = Duration::from_secs(parse_env("ACCESS_TOKEN_TTL", 3_600)?);
        let refresh_token_ttl =
            Duration::from_secs(parse_env("REFRESH_TOKEN_TTL", 2_592_000)?);

        let auth_header =
            env::var("AUTH_HEADER").unwrap_or_else(|_| "authorization".to_string());
        let auth_prefix = env::var("AUTH_PREFIX").unwrap_or_else(|_| "Bearer ".to_string());

        let revoked_retention =
            Duration::from_secs(parse_env("REVOKED_RETENTION", 2_592_000)?);
        let cleanup_interval = Duration::from_secs(parse_env("CLEANUP_INTERVAL", 86_400)?);

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            jwt_issuer,
            access_token_ttl,
            refresh_token_ttl,
            auth_header,
            auth_prefix,
            revoked_retention,
            cleanup_interval,
        })
    }
}

/// Parse environment variable with default value.
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, AuthError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val
            .parse()
            .map_err(|e| AuthError::Config(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default() {
        env::remove_var("SESSION_TEST_MISSING");
        let val: u64 = parse_env("SESSION_TEST_MISSING", 42).unwrap();
        assert_eq!(val, 42);
    }

    #[test]
    fn test_parse_env_invalid() {
        env::set_var("SESSION_TEST_BAD_PORT", "not-a-number");
        let res: Result<u16, _> = parse_env("SESSION_TEST_BAD_PORT", 8080);
        assert!(res.is_err());
        env::remove_var("SESSION_TEST_BAD_PORT");
    }

    #[test]
    fn test_short_secret_rejected() {
        env::set_var("DATABASE_URL", "postgres://localhost/session_test");
        env::set_var("JWT_SECRET", "short");
        let res = Config::from_env();
        assert!(matches!(res, Err(AuthError::Config(_))));
        env::remove_var("JWT_SECRET");
        env::remove_var("DATABASE_URL");
    }
}
