//! Seam to the external user directory.
//!
//! The directory owns identity records and password hashes; this
//! service only reads them. Password hashing itself lives behind
//! [`PasswordVerifier`] so the core never touches hashing algorithms.

pub mod postgres;

use crate::error::DirectoryError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tokio::sync::RwLock;

pub use postgres::PostgresDirectory;

/// Identity as the core sees it: id, email, roles, account flags, and
/// the opaque password hash handed to the verifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub roles: BTreeSet<String>,
    pub enabled: bool,
    pub locked: bool,
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, DirectoryError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Identity>, DirectoryError>;
}

/// Checks a cleartext password against a stored hash.
pub trait PasswordVerifier: Send + Sync {
    fn verify(&self, password: &str, password_hash: &str) -> bool;
}

/// Bcrypt-backed verifier matching the directory's stored hashes.
pub struct BcryptVerifier;

impl PasswordVerifier for BcryptVerifier {
    fn verify(&self, password: &str, password_hash: &str) -> bool {
        bcrypt::verify(password, password_hash).unwrap_or(false)
    }
}

/// Plain-comparison verifier for tests and local development only.
pub struct PlainTextVerifier;

impl PasswordVerifier for PlainTextVerifier {
    fn verify(&self, password: &str, password_hash: &str) -> bool {
        password == password_hash
    }
}

/// In-memory directory for tests and local runs.
#[derive(Default)]
pub struct MemoryDirectory {
    users: RwLock<Vec<Identity>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, identity: Identity) {
        self.users.write().await.push(identity);
    }

    pub async fn set_enabled(&self, id: i64, enabled: bool) {
        if let Some(u) = self.users.write().await.iter_mut().find(|u| u.id == id) {
            u.enabled = enabled;
        }
    }

    pub async fn set_locked(&self, id: i64, locked: bool) {
        if let Some(u) = self.users.write().await.iter_mut().find(|u| u.id == id) {
            u.locked = locked;
        }
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, DirectoryError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Identity>, DirectoryError> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }
}
