//! Session Service library.
//!
//! Provides password login, stateless access-token signing and
//! verification, server-side refresh-token rotation with hashed-at-rest
//! storage, and the request authentication layer that consumes both.

#![forbid(unsafe_code)]

pub mod auth;
pub mod cleanup;
pub mod config;
pub mod directory;
pub mod error;
pub mod http;
pub mod jwt;
pub mod ledger;
pub mod metrics;
pub mod token;

// Re-exports for convenience
pub use config::Config;
pub use error::AuthError;
