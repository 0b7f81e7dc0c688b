//! REST API around the estimation engine.
//!
//! Provides three endpoints:
//! - `POST /simulate`: initial estimate for a household
//! - `POST /recalculate`: what-if estimate derived from a previous input
//! - `GET /settings/defaults`: effective settings used for estimates

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::engine::Estimator;

pub use types::{ErrorResponse, RecalculateRequest, RecalculateResponse, SettingsResponse};

/// Immutable application state shared across all request handlers.
///
/// Settings are fetched once at startup and reused by every request; no
/// locks needed since estimates never write to it.
#[derive(Debug)]
pub struct AppState {
    pub estimator: Estimator,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/simulate", post(handlers::simulate))
        .route("/recalculate", post(handlers::recalculate))
        .route("/settings/defaults", get(handlers::get_settings))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
