//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction, keyed by
//! namespace, identifier and optional parameters.

pub mod clock;
mod entry;
mod facade;
pub mod invalidation;
pub mod key;
mod lru;
mod stats;
mod store;
pub mod ttl;
mod value;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use facade::Cache;
pub use invalidation::NamespaceCache;
pub use key::{encode_key, Namespace};
pub use lru::LruTracker;
pub use stats::{CacheStats, EntrySummary};
pub use store::EntryStore;
