//! Prometheus metrics for the Session Service.

use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, register_histogram_vec, CounterVec, HistogramVec};

/// Login attempts counter.
pub static LOGIN_ATTEMPTS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "session_service_login_attempts_total",
        "Total number of login attempts",
        &["outcome"]
    )
    .expect("Failed to register login_attempts metric")
});

/// Tokens issued counter.
pub static TOKENS_ISSUED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "session_service_tokens_issued_total",
        "Total number of tokens issued",
        &["token_type"]
    )
    .expect("Failed to register tokens_issued metric")
});

/// Refresh rotations counter.
pub static TOKENS_ROTATED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "session_service_tokens_rotated_total",
        "Total number of refresh token rotations",
        &["status"]
    )
    .expect("Failed to register tokens_rotated metric")
});

/// Tokens revoked counter.
pub static TOKENS_REVOKED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "session_service_tokens_revoked_total",
        "Total number of tokens revoked",
        &["reason"]
    )
    .expect("Failed to register tokens_revoked metric")
});

/// Tokens purged by housekeeping counter.
pub static TOKENS_PURGED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "session_service_tokens_purged_total",
        "Total number of tokens deleted by housekeeping",
        &["reason"]
    )
    .expect("Failed to register tokens_purged metric")
});

/// Request gate rejections counter.
pub static GATE_REJECTIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "session_service_gate_rejections_total",
        "Total number of requests rejected by the authentication gate",
        &["code"]
    )
    .expect("Failed to register gate_rejections metric")
});

/// HTTP handler latency histogram.
pub static HTTP_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "session_service_http_latency_seconds",
        "HTTP handler latency in seconds",
        &["endpoint"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to register http_latency metric")
});
