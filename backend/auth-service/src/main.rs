/// Nova Auth Service - Main entry point
/// Username/password login issuing HS256 bearer tokens over REST
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use auth_service::{
    build_router, config::Config, telemetry, AppState, AuthService, InMemoryCredentialStore,
};
use crypto_core::PasswordHasher;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let config = Config::from_env()?;
    info!(
        token_ttl_secs = config.token_ttl_secs,
        hash_memory_kib = config.hash_memory_kib,
        hash_iterations = config.hash_iterations,
        "Configuration loaded"
    );

    let hasher = Arc::new(
        PasswordHasher::new(config.hash_cost()).context("Invalid password hash cost")?,
    );

    let bootstrap = config
        .bootstrap_user()
        .map(|(username, password)| (username.to_string(), password.to_string()));
    if bootstrap.is_none() {
        warn!("No BOOTSTRAP_USERNAME configured; every login will be rejected");
    }
    let secret = config.signing_secret();
    let token_ttl = config.token_ttl();

    // Argon2 work (bootstrap hash, placeholder hash) stays off the async workers
    let auth = tokio::task::spawn_blocking(move || -> Result<AuthService> {
        let store = match bootstrap {
            Some((username, password)) => InMemoryCredentialStore::new()
                .provision(&username, &password, &hasher)
                .context("Failed to provision bootstrap user")?,
            None => InMemoryCredentialStore::new(),
        };
        AuthService::from_secret(Arc::new(store), hasher, &secret, token_ttl)
            .context("Failed to initialize auth service")
    })
    .await
    .context("Auth service setup task failed")??;

    let app = build_router(AppState {
        auth: Arc::new(auth),
    });

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("REST API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("REST server failed")?;

    info!("Auth service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
