//! HMAC signing and verification of access tokens.

use crate::error::SignerError;
use crate::jwt::claims::AccessClaims;
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use std::collections::BTreeSet;
use std::time::Duration;

/// Stateless HMAC-SHA512 signer over [`AccessClaims`].
///
/// Holds no mutable state; safe for unbounded concurrent use behind an
/// `Arc`.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    access_ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &str, issuer: impl Into<String>, access_ttl: Duration) -> Self {
        TokenSigner {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            access_ttl,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Sign pre-built claims.
    pub fn sign(&self, claims: &AccessClaims) -> Result<String, SignerError> {
        encode(&Header::new(Algorithm::HS512), claims, &self.encoding)
            .map_err(|e| SignerError::Encoding(e.to_string()))
    }

    /// Build claims for an identity and sign them with the configured TTL.
    pub fn sign_identity(
        &self,
        user_id: i64,
        email: &str,
        roles: &BTreeSet<String>,
    ) -> Result<String, SignerError> {
        let claims = AccessClaims::new(
            self.issuer.clone(),
            email,
            user_id,
            roles.clone(),
            self.access_ttl,
        );
        self.sign(&claims)
    }

    /// Verify a token and return its claims.
    ///
    /// Expiry is checked against wall-clock time with no leeway, and
    /// the issuer claim must match this signer's.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, SignerError> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;
        validation.set_issuer(&[&self.issuer]);

        decode::<AccessClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    SignerError::InvalidSignature
                }
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SignerError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidAlgorithm
                | jsonwebtoken::errors::ErrorKind::InvalidAlgorithmName => {
                    SignerError::Unsupported
                }
                _ => SignerError::Malformed,
            })
    }
}
