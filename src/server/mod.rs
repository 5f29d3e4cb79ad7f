//! HTTP gateway server

mod error;
pub mod routes;
pub mod state;

pub use state::AppState;

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::common::errors::{GatewayError, Result};
use crate::config::types::ServerConfig;

/// Assemble the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: &ServerConfig, state: Arc<AppState>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.bind, config.port)
        .parse()
        .map_err(|e| GatewayError::Configuration(format!("invalid bind address: {}", e)))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| GatewayError::Internal(format!("failed to bind {}: {}", addr, e)))?;
    info!("Price gateway listening on http://{}", addr);

    serve_on(listener, state, shutdown_signal()).await
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve_on<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| GatewayError::Internal(e.to_string()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, gracefully stopping");
}
