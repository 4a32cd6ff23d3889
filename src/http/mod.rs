//! HTTP boundary: request authentication gate, role checks, uniform
//! response envelope, and the auth endpoints.

pub mod authorize;
pub mod envelope;
pub mod gate;
pub mod handlers;

pub use gate::AuthContext;
pub use handlers::AppState;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the service router.
///
/// Login, refresh and the health/metrics endpoints are public and
/// bypass the gate entirely; logout endpoints sit behind it.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/v1/auth/login", post(handlers::login))
        .route("/api/v1/auth/refresh", post(handlers::refresh))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics_text));

    let protected = Router::new()
        .route("/api/v1/auth/logout", post(handlers::logout))
        .route("/api/v1/auth/logout-device", post(handlers::logout_device))
        .route(
            "/api/v1/admin/users/:user_id/logout",
            post(handlers::admin_logout_user),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            gate::authenticate,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(state)
}
