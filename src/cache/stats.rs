//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use serde::Serialize;

/// Fixed per-entry overhead added to the memory estimate.
pub const ENTRY_OVERHEAD_BYTES: usize = 64;

// == Counters ==
/// Cumulative operation counters kept by the entry store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    pub evictions: u64,
}

impl Counters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    pub fn record_deletes(&mut self, count: usize) {
        self.deletes += count as u64;
    }

    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }
}

// == Entry Summary ==
/// Per-entry view exposed on the diagnostics endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySummary {
    pub key: String,
    /// Estimated size of the serialized value in bytes
    pub size: usize,
    pub hits: u64,
    /// Milliseconds since the entry was written
    pub age: u64,
    /// Validity window in milliseconds
    pub ttl: u64,
    /// Milliseconds left before the entry expires
    pub ttl_remaining: u64,
}

impl EntrySummary {
    /// Rough footprint of this entry: UTF-16 sized key and value plus overhead.
    pub fn estimated_footprint(&self) -> usize {
        self.key.len() * 2 + self.size + ENTRY_OVERHEAD_BYTES
    }
}

// == Cache Stats ==
/// Snapshot of cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of writes
    pub sets: u64,
    /// Number of entries removed by delete, clear or invalidation
    pub deletes: u64,
    /// Number of entries removed by capacity pressure or expiry
    pub evictions: u64,
    /// Current number of entries in the cache
    pub size: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
    /// Approximate memory footprint in bytes
    pub memory_usage: usize,
    /// Per-entry summaries, empty unless requested
    pub entries: Vec<EntrySummary>,
}

impl CacheStats {
    // == Constructor ==
    /// Builds a snapshot from counters and the current entry count.
    pub fn new(counters: Counters, size: usize) -> Self {
        Self {
            hits: counters.hits,
            misses: counters.misses,
            sets: counters.sets,
            deletes: counters.deletes,
            evictions: counters.evictions,
            size,
            hit_rate: hit_rate(counters.hits, counters.misses),
            memory_usage: 0,
            entries: Vec::new(),
        }
    }

    // == With Entries ==
    /// Attaches per-entry summaries and derives the memory estimate from them.
    pub fn with_entries(mut self, entries: Vec<EntrySummary>) -> Self {
        self.memory_usage = entries.iter().map(EntrySummary::estimated_footprint).sum();
        self.entries = entries;
        self
    }

    /// Total lookups recorded.
    pub fn requests(&self) -> u64 {
        self.hits + self.misses
    }
}

// == Hit Rate ==
/// Returns hits / (hits + misses), or 0.0 if no requests have been made.
pub fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}
