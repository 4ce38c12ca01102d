//! API Handlers
//!
//! HTTP request handlers for the cache diagnostics endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::cache::{Cache, CacheStats, Namespace};
use crate::error::{CacheError, Result};
use crate::models::{HealthResponse, InvalidateRequest, InvalidateResponse};

/// Application state shared across all handlers.
///
/// Holds the process-wide cache; every clone refers to the same entries.
#[derive(Clone)]
pub struct AppState {
    pub cache: Cache,
}

impl AppState {
    /// Creates a new AppState around the given cache.
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(Cache::from_config(config))
    }
}

/// Handler for GET /stats
///
/// Returns counters, memory estimate and per-entry summaries.
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.len()))
}

/// Handler for DELETE /cache
///
/// Drops every entry and resets all counters, reporting how many live
/// entries were dropped.
pub async fn clear_all_handler(State(state): State<AppState>) -> Json<InvalidateResponse> {
    let removed = state.cache.clear_all();
    info!(removed, "cache cleared");

    Json(InvalidateResponse::new("all", removed))
}

/// Handler for DELETE /cache/:namespace
pub async fn clear_namespace_handler(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Result<Json<InvalidateResponse>> {
    let namespace: Namespace = namespace.parse()?;
    let removed = state.cache.clear_namespace(namespace);
    info!(namespace = %namespace, removed, "namespace invalidated");

    Ok(Json(InvalidateResponse::new(namespace.prefix(), removed)))
}

/// Handler for POST /invalidate
///
/// Removes every key matching the given regular expression.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let removed = state.cache.invalidate_pattern(&req.pattern)?;
    info!(pattern = %req.pattern, removed, "pattern invalidated");

    Ok(Json(InvalidateResponse::new(req.pattern, removed)))
}
