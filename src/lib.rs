//! Portal Cache - An in-process namespaced TTL cache
//!
//! Shields the portal's database from repeated reads with typed cache-aside
//! lookups, TTL expiration, LRU eviction and namespace-level invalidation.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{ttl, Cache, CacheStats, Namespace, NamespaceCache};
pub use cache::invalidation;
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::{spawn_stats_reporter, spawn_sweep_task};
