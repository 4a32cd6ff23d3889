//! Ledger housekeeping.
//!
//! Expired records are deleted immediately; revoked records are kept
//! for an audit window and then deleted. `run_once` is callable by an
//! external scheduler; `spawn` drives it from an in-process interval
//! task. Both are plain bulk deletes and safe to run alongside live
//! traffic.

use crate::error::AuthError;
use crate::ledger::RefreshTokenStore;
use crate::metrics;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Purge expired tokens and revoked tokens past the retention window.
///
/// Returns (expired_deleted, revoked_deleted).
pub async fn run_once(
    store: &Arc<dyn RefreshTokenStore>,
    revoked_retention: Duration,
) -> Result<(u64, u64), AuthError> {
    let now = Utc::now();

    let expired = store.purge_expired(now).await?;
    metrics::TOKENS_PURGED
        .with_label_values(&["expired"])
        .inc_by(expired as f64);

    let cutoff = now - chrono::Duration::seconds(revoked_retention.as_secs() as i64);
    let revoked = store.purge_revoked_older_than(cutoff).await?;
    metrics::TOKENS_PURGED
        .with_label_values(&["revoked"])
        .inc_by(revoked as f64);

    info!(
        expired = %expired,
        revoked = %revoked,
        "Token cleanup completed"
    );
    Ok((expired, revoked))
}

/// Spawn the periodic cleanup task.
pub fn spawn(
    store: Arc<dyn RefreshTokenStore>,
    interval: Duration,
    revoked_retention: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // First tick completes immediately; skip it so startup does not
        // race a purge against warm-up traffic.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = run_once(&store, revoked_retention).await {
                error!(error = %e, "Token cleanup failed");
            }
        }
    })
}
