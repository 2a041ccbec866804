//! Tasks Server
//!
//! A small HTTP service exposing CRUD operations over tasks. Handlers
//! translate requests into calls on a [`TaskStore`], whose backend is picked
//! once at startup.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod state;

use std::{net::SocketAddr, sync::Arc};

use auth::{JwtConfig, JwtManager};
use axum::Router;
use task_store::TaskStore;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::state::{AppState, create_shared_state};

/// Creates the application router with all routes configured.
pub fn create_app<S: TaskStore + 'static>(state: Arc<AppState<S>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::create_router(state.clone())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Creates the application state with the given configuration and store.
pub fn create_state<S: TaskStore>(config: Config, store: S) -> Arc<AppState<S>> {
    let jwt_manager = config.jwt_secret.as_ref().map(|secret| {
        let jwt_config = JwtConfig::new(secret)
            .with_issuer(&config.jwt_issuer)
            .with_expiration_hours(config.jwt_expiration_hours);
        JwtManager::new(jwt_config)
    });

    create_shared_state(config, store, jwt_manager)
}

/// Binds the configured address and serves requests until Ctrl-C.
pub async fn serve<S: TaskStore + 'static>(config: Config, store: S) -> anyhow::Result<()> {
    let addr: SocketAddr = config.server_addr().parse()?;
    let auth_enabled = config.auth_enabled();

    let state = create_state(config, store);
    let app = create_app(state);

    tracing::info!(addr = %addr, auth_enabled, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Initializes tracing with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
