//! API Module
//!
//! HTTP handlers and routing for the cache diagnostics surface. Cached
//! values themselves are never served over HTTP.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Cache statistics
//! - `DELETE /cache` - Clear everything
//! - `DELETE /cache/:namespace` - Clear one namespace
//! - `POST /invalidate` - Clear keys matching a pattern

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
