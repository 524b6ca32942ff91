//! # warden-server
//!
//! HTTP transport for the warden authorization service.
//!
//! The transport is a thin adapter: it marshals requests into the
//! `warden-core` types, runs the decision or management operation, and
//! maps typed errors onto HTTP status codes.
//!
//! ## Modules
//!
//! - [`config`] - Environment-driven configuration
//! - [`state`] - Shared application state wiring core over PostgreSQL
//! - [`routes`] - Router assembly
//! - [`handlers`] - Decision, management and health handlers
//! - [`middleware`] - Request-id middleware and the admin-key guard
//! - [`error`] - Error-to-response mapping

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub use config::{AppConfig, ConfigError};
pub use error::ApiError;
pub use state::AppState;

/// Initializes the tracing subscriber with the given default filter.
///
/// `RUST_LOG` takes precedence over the configured filter.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connects to the store, ensures the schema, and serves the API until
/// the process is stopped.
///
/// # Errors
///
/// Returns an error if the pool cannot be created, the schema bootstrap
/// fails, or the listener cannot bind.
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    info!("starting warden authorization service");

    let pool = Arc::new(warden_postgres::connect(&config.database_url, config.pool_size).await?);
    warden_postgres::ensure_schema(&pool).await?;

    let state = AppState::new(pool, &config);
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(addr = %config.listen_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
