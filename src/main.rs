use session_service::auth::AuthService;
use session_service::config::Config;
use session_service::directory::{BcryptVerifier, PostgresDirectory};
use session_service::http::{self, AppState};
use session_service::jwt::TokenSigner;
use session_service::ledger::{PostgresTokenStore, RefreshTokenStore};
use session_service::token::RefreshTokenService;
use session_service::{cleanup, AuthError};

use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    info!("Starting Session Service");

    let config = Arc::new(Config::from_env()?);

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    let store: Arc<dyn RefreshTokenStore> = Arc::new(PostgresTokenStore::new(pool.clone()));
    let directory = Arc::new(PostgresDirectory::new(pool));

    let signer = Arc::new(TokenSigner::new(
        &config.jwt_secret,
        config.jwt_issuer.clone(),
        config.access_token_ttl,
    ));
    let tokens = RefreshTokenService::new(Arc::clone(&store), config.refresh_token_ttl);
    let auth = Arc::new(AuthService::new(
        Arc::clone(&signer),
        tokens,
        directory,
        Arc::new(BcryptVerifier),
    ));

    cleanup::spawn(
        Arc::clone(&store),
        config.cleanup_interval,
        config.revoked_retention,
    );

    let app = http::router(AppState {
        config: Arc::clone(&config),
        signer,
        auth,
    });

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AuthError::Config(format!("Invalid bind address: {}", e)))?;

    info!("Session Service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
