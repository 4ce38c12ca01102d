//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

// == Cache Entry ==
/// A stored value plus the bookkeeping needed for expiry and eviction.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Write timestamp (Unix milliseconds)
    pub inserted_at: u64,
    /// Validity window in milliseconds
    pub ttl_ms: u64,
    /// Successful reads since the last write
    pub hit_count: u64,
    /// Last read or write timestamp (Unix milliseconds)
    pub last_accessed: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry written at `now` with the given TTL.
    pub fn new(value: V, ttl_ms: u64, now: u64) -> Self {
        Self {
            value,
            inserted_at: now,
            ttl_ms,
            hit_count: 0,
            last_accessed: now,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived its TTL at time `now`.
    ///
    /// An entry stays live while `now - inserted_at <= ttl_ms`, so it expires
    /// only once the window has been strictly exceeded.
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.age_ms(now) > self.ttl_ms
    }

    // == Age ==
    /// Milliseconds since the entry was written.
    pub fn age_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.inserted_at)
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self, now: u64) -> u64 {
        self.ttl_ms.saturating_sub(self.age_ms(now))
    }

    // == Record Hit ==
    /// Marks a successful read at `now`.
    pub fn record_hit(&mut self, now: u64) {
        self.hit_count += 1;
        self.last_accessed = now;
    }
}
