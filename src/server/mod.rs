// src/server/mod.rs
// =============================================================================
// HTTP endpoint exposing the probe service.
//
// Routes:
// - POST /api/check-url   {"url": "..."} -> ProbeResult JSON
// - GET  /health          {"status": "ok"}
//
// One URL per call; batching is the caller's job (see checker::RemoteProber).
//
// The server owns one Prober (and so one connection pool) for its whole
// life. Requests share it through an Arc; nothing else is shared.
//
// Rust concepts:
// - Arc<T>: shared ownership across the tasks axum spawns per request
// - Router::with_state: handlers receive the state through an extractor
// - Graceful shutdown: a future that completes when we should stop
// =============================================================================

mod handlers;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::checker::{Prober, CHECK_URL_PATH};
use crate::{Error, Result};

pub use handlers::{ERROR_INVALID_REQUEST, ERROR_INVALID_URL};

/// Shared state handed to every request.
///
/// axum clones the state for each request, so it must be cheap to clone;
/// cloning an Arc only bumps a counter.
#[derive(Clone)]
pub struct AppState {
    prober: Arc<Prober>,
}

impl AppState {
    pub fn new(prober: Prober) -> Self {
        Self {
            prober: Arc::new(prober),
        }
    }
}

/// Builds the route table. Unknown paths get axum's default 404.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(CHECK_URL_PATH, post(handlers::check_url))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Serves on an already bound listener until `shutdown` fires.
pub async fn serve(listener: TcpListener, prober: Prober, shutdown: CancellationToken) -> Result<()> {
    let addr = listener.local_addr()?;
    info!("Probe endpoint listening on http://{}{}", addr, CHECK_URL_PATH);

    // In-flight probes finish before serve() returns
    axum::serve(listener, router(AppState::new(prober)))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| Error::Server(format!("Probe endpoint error: {}", e)))?;

    info!("Probe endpoint stopped");
    Ok(())
}

/// Binds `bind` and serves until `shutdown` fires.
pub async fn bind_and_serve(bind: &str, prober: Prober, shutdown: CancellationToken) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .map_err(|e| Error::Server(format!("Failed to bind probe endpoint to {}: {}", bind, e)))?;
    serve(listener, prober, shutdown).await
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why take a TcpListener instead of an address in serve()?
//    - Tests bind "127.0.0.1:0" and read back the port the OS picked
//    - bind_and_serve() is the thin wrapper the CLI uses
//
// 2. What does `async move { shutdown.cancelled().await }` do?
//    - It is a future that completes once the token is cancelled
//    - axum stops accepting connections when it completes
// -----------------------------------------------------------------------------
