//! inkpress API server.
//!
//! Wires the authentication stack over in-memory stores and serves the
//! `/auth` routes plus a health endpoint. Persistence-backed stores plug
//! in through the same `AccountStore`/`IdentityProvider`/`RevocationStore`
//! interfaces without touching this bootstrap.

mod config;
mod logging;

use axum::{routing::get, Router};
use config::AppConfig;
use inkpress_api_auth::{auth_router, AuthState, InMemoryAccountStore};
use inkpress_auth::InMemoryRevocationStore;
use std::sync::Arc;

async fn health_check() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: {e}");
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.log_filter);

    let store = Arc::new(InMemoryAccountStore::new());
    let revocations = Arc::new(InMemoryRevocationStore::new());

    let state = match AuthState::new(
        config.jwt_secret.as_bytes(),
        config.issuer.clone(),
        store.clone(),
        store,
        revocations,
    ) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "failed to initialize auth stack");
            std::process::exit(1);
        }
    };

    let app = Router::new()
        .route("/health", get(health_check))
        .nest("/auth", auth_router(state));

    tracing::info!(
        addr = %config.bind_addr,
        environment = %config.environment,
        "starting inkpress API"
    );

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, addr = %config.bind_addr, "failed to bind");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
