//! API Routes
//!
//! Configures the Axum router with the cache diagnostics endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_all_handler, clear_namespace_handler, health_handler, invalidate_handler,
    stats_handler, AppState,
};

/// Creates the diagnostics router.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /stats` - Cache statistics with per-entry summaries
/// - `DELETE /cache` - Drop every entry and reset counters
/// - `DELETE /cache/:namespace` - Drop every entry in one namespace
/// - `POST /invalidate` - Drop every entry whose key matches a pattern
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/cache", delete(clear_all_handler))
        .route("/cache/:namespace", delete(clear_namespace_handler))
        .route("/invalidate", post(invalidate_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
