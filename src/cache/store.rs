//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::stats::{Counters, EntrySummary};
use crate::cache::{ttl, CacheEntry, CacheStats, LruTracker};

// == Entry Store ==
/// Bounded key/value storage with LRU eviction and TTL support.
///
/// No operation fails: a missing or expired key is reported as `None`.
#[derive(Debug)]
pub struct EntryStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Cumulative counters
    counters: Counters,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Time source for stamping and expiry
    clock: Arc<dyn Clock>,
}

impl<V> EntryStore<V> {
    // == Constructor ==
    /// Creates a new store with the given capacity, reading the system clock.
    pub fn new(max_entries: usize) -> Self {
        Self::with_clock(max_entries, Arc::new(SystemClock))
    }

    /// Creates a new store with the given capacity and time source.
    pub fn with_clock(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            counters: Counters::default(),
            max_entries,
            clock,
        }
    }

    // == Set ==
    /// Stores a value under `key` for `ttl`.
    ///
    /// An existing key is overwritten with a fresh timestamp and hit count.
    /// A new key arriving at capacity first evicts the least recently
    /// accessed entry. A zero TTL falls back to the medium tier. With a
    /// capacity of zero the call does nothing.
    pub fn set(&mut self, key: String, value: V, ttl: Duration) {
        if self.max_entries == 0 {
            debug!(key = %key, "cache capacity is zero, skipping set");
            return;
        }

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.evict_lru();
        }

        let ttl = if ttl.is_zero() { ttl::MEDIUM } else { ttl };
        let now = self.clock.now_ms();
        let entry = CacheEntry::new(value, ttl.as_millis() as u64, now);

        self.lru.touch(&key);
        self.entries.insert(key, entry);
        self.counters.record_set();
    }

    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// Expired entries are removed and counted as a miss and an eviction.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        self.get_matching(key, |_| true)
    }

    /// Retrieves a live value by key if `accept` takes it.
    ///
    /// A live value that `accept` rejects counts as a miss and leaves the
    /// entry's recency and hit count unchanged.
    pub fn get_matching<F>(&mut self, key: &str, accept: F) -> Option<&V>
    where
        F: FnOnce(&V) -> bool,
    {
        let now = self.clock.now_ms();

        let (expired, accepted) = match self.entries.get(key) {
            None => {
                self.counters.record_miss();
                return None;
            }
            Some(entry) if entry.is_expired_at(now) => (true, false),
            Some(entry) => (false, accept(&entry.value)),
        };

        if expired {
            self.entries.remove(key);
            self.lru.remove(key);
            self.counters.record_miss();
            self.counters.record_evictions(1);
            return None;
        }

        if !accepted {
            self.counters.record_miss();
            return None;
        }

        self.counters.record_hit();
        self.lru.touch(key);
        let entry = self.entries.get_mut(key)?;
        entry.record_hit(now);
        Some(&entry.value)
    }

    // == Peek ==
    /// Returns the entry for `key` without touching counters or recency.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    // == Delete ==
    /// Removes an entry by key, returning whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            self.counters.record_deletes(1);
            true
        } else {
            false
        }
    }

    // == Remove Where ==
    /// Removes every entry whose key satisfies `predicate`.
    ///
    /// Returns the number of entries removed; each counts as a delete.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        let doomed: Vec<String> = self
            .entries
            .keys()
            .filter(|key| predicate(key.as_str()))
            .cloned()
            .collect();

        for key in &doomed {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.counters.record_deletes(doomed.len());
        doomed.len()
    }

    // == Clear ==
    /// Removes all entries, counting each as a delete.
    ///
    /// Hit, miss, set and eviction counters are left untouched.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        self.counters.record_deletes(removed);
        removed
    }

    // == Reset ==
    /// Removes all entries and zeroes every counter.
    ///
    /// Returns the number of live entries dropped.
    pub fn reset(&mut self) -> usize {
        let now = self.clock.now_ms();
        let live = self
            .entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .count();

        self.entries.clear();
        self.lru.clear();
        self.counters = Counters::default();
        live
    }

    // == Sweep ==
    /// Removes every expired entry, counting each as an eviction.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.counters.record_evictions(expired.len());
        expired.len()
    }

    // == Stats ==
    /// Returns counters and size. Per-entry summaries are left empty.
    pub fn stats(&self) -> CacheStats {
        CacheStats::new(self.counters, self.entries.len())
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Entry Summaries ==
    /// Summarizes every stored entry for diagnostics, sizing each value
    /// with `value_size`.
    pub fn entry_summaries<F>(&self, value_size: F) -> Vec<EntrySummary>
    where
        F: Fn(&V) -> usize,
    {
        let now = self.clock.now_ms();
        self.entries
            .iter()
            .map(|(key, entry)| EntrySummary {
                key: key.clone(),
                size: value_size(&entry.value),
                hits: entry.hit_count,
                age: entry.age_ms(now),
                ttl: entry.ttl_ms,
                ttl_remaining: entry.ttl_remaining_ms(now),
            })
            .collect()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    fn evict_lru(&mut self) {
        if let Some(victim) = self.lru.evict_oldest() {
            self.entries.remove(&victim);
            self.counters.record_evictions(1);
            debug!(key = %victim, "evicted least recently used entry");
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::clock::ManualClock;

    const MINUTE: Duration = Duration::from_secs(60);

    fn store_with_clock(max_entries: usize) -> (EntryStore<String>, ManualClock) {
        let clock = ManualClock::new(1_000_000);
        let store = EntryStore::with_clock(max_entries, Arc::new(clock.clone()));
        (store, clock)
    }

    fn set(store: &mut EntryStore<String>, key: &str, value: &str) {
        store.set(key.to_string(), value.to_string(), MINUTE);
    }

    #[test]
    fn test_store_new() {
        let store: EntryStore<String> = EntryStore::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.max_entries(), 100);
    }

    #[test]
    fn test_store_set_and_get() {
        let (mut store, _) = store_with_clock(100);

        set(&mut store, "key1", "value1");

        assert_eq!(store.get("key1"), Some(&"value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (mut store, _) = store_with_clock(100);

        assert_eq!(store.get("nonexistent"), None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_delete() {
        let (mut store, _) = store_with_clock(100);

        set(&mut store, "key1", "value1");
        assert!(store.delete("key1"));

        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
        assert_eq!(store.stats().deletes, 1);
    }

    #[test]
    fn test_store_delete_nonexistent() {
        let (mut store, _) = store_with_clock(100);

        assert!(!store.delete("nonexistent"));
        assert_eq!(store.stats().deletes, 0);
    }

    #[test]
    fn test_store_overwrite_resets_entry() {
        let (mut store, clock) = store_with_clock(100);

        set(&mut store, "key1", "value1");
        store.get("key1");
        clock.advance(Duration::from_secs(30));
        set(&mut store, "key1", "value2");

        let entry = store.peek("key1").unwrap();
        assert_eq!(entry.value, "value2");
        assert_eq!(entry.hit_count, 0);
        assert_eq!(entry.inserted_at, 1_030_000);
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().sets, 2);
    }

    #[test]
    fn test_store_repeated_set_does_not_count_hits() {
        let (mut store, _) = store_with_clock(100);

        set(&mut store, "key1", "v");
        set(&mut store, "key1", "v");

        assert_eq!(store.get("key1"), Some(&"v".to_string()));
        assert_eq!(store.peek("key1").unwrap().hit_count, 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let (mut store, clock) = store_with_clock(100);

        store.set("key1".to_string(), "value1".to_string(), Duration::from_secs(1));
        assert!(store.get("key1").is_some());

        clock.advance(Duration::from_millis(1_001));

        assert_eq!(store.get("key1"), None);
        assert_eq!(store.len(), 0);

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
    }

    #[test]
    fn test_store_live_at_exact_ttl() {
        let (mut store, clock) = store_with_clock(100);

        store.set("key1".to_string(), "value1".to_string(), Duration::from_secs(1));
        clock.advance(Duration::from_secs(1));

        assert!(store.get("key1").is_some());
    }

    #[test]
    fn test_store_zero_ttl_uses_medium_tier() {
        let (mut store, _) = store_with_clock(100);

        store.set("key1".to_string(), "value1".to_string(), Duration::ZERO);

        assert_eq!(
            store.peek("key1").unwrap().ttl_ms,
            ttl::MEDIUM.as_millis() as u64
        );
    }

    #[test]
    fn test_store_lru_eviction() {
        let (mut store, _) = store_with_clock(3);

        set(&mut store, "key1", "value1");
        set(&mut store, "key2", "value2");
        set(&mut store, "key3", "value3");
        set(&mut store, "key4", "value4");

        assert_eq!(store.len(), 3);
        assert_eq!(store.stats().evictions, 1);
        assert!(store.peek("key1").is_none());
        assert!(store.peek("key2").is_some());
        assert!(store.peek("key4").is_some());
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let (mut store, _) = store_with_clock(3);

        set(&mut store, "key1", "value1");
        set(&mut store, "key2", "value2");
        set(&mut store, "key3", "value3");

        store.get("key1");
        set(&mut store, "key4", "value4");

        assert!(store.peek("key1").is_some());
        assert!(store.peek("key2").is_none());
    }

    #[test]
    fn test_store_overwrite_at_capacity_does_not_evict() {
        let (mut store, _) = store_with_clock(2);

        set(&mut store, "key1", "value1");
        set(&mut store, "key2", "value2");
        set(&mut store, "key1", "value3");

        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_store_zero_capacity_is_noop() {
        let (mut store, _) = store_with_clock(0);

        set(&mut store, "key1", "value1");

        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
        assert_eq!(store.stats().sets, 0);
    }

    #[test]
    fn test_store_stats() {
        let (mut store, _) = store_with_clock(100);

        set(&mut store, "key1", "value1");
        store.get("key1");
        store.get("nonexistent");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.sets, 1);
        assert_eq!(stats.size, 1);
        assert_eq!(stats.hit_rate, 0.5);
    }

    #[test]
    fn test_store_sweep() {
        let (mut store, clock) = store_with_clock(100);

        store.set("key1".to_string(), "value1".to_string(), Duration::from_secs(1));
        store.set("key2".to_string(), "value2".to_string(), Duration::from_secs(10));

        clock.advance(Duration::from_secs(2));

        assert_eq!(store.sweep(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().evictions, 1);
        assert!(store.get("key2").is_some());
    }

    #[test]
    fn test_store_clear_counts_removed_entries() {
        let (mut store, _) = store_with_clock(100);

        set(&mut store, "key1", "value1");
        set(&mut store, "key2", "value2");
        store.get("key1");

        assert_eq!(store.clear(), 2);

        let stats = store.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.deletes, 2);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.sets, 2);
    }

    #[test]
    fn test_store_reset_zeroes_counters() {
        let (mut store, _) = store_with_clock(100);

        set(&mut store, "key1", "value1");
        store.get("key1");
        store.get("missing");
        store.reset();

        let stats = store.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.sets, 0);
    }

    #[test]
    fn test_store_remove_where() {
        let (mut store, _) = store_with_clock(100);

        set(&mut store, "user:1", "a");
        set(&mut store, "user:2", "b");
        set(&mut store, "perm:1", "c");

        assert_eq!(store.remove_where(|key| key.starts_with("user:")), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().deletes, 2);

        // Removed keys no longer participate in eviction
        set(&mut store, "stats:1", "d");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_get_matching_rejection_is_a_miss() {
        let (mut store, _) = store_with_clock(3);

        set(&mut store, "key1", "value1");
        set(&mut store, "key2", "value2");
        set(&mut store, "key3", "value3");

        assert_eq!(store.get_matching("key1", |value| value.len() > 10), None);

        let stats = store.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 1);
        assert_eq!(store.peek("key1").unwrap().hit_count, 0);

        // A rejected read does not refresh recency
        set(&mut store, "key4", "value4");
        assert!(store.peek("key1").is_none());
    }

    #[test]
    fn test_store_reset_reports_live_entries() {
        let (mut store, clock) = store_with_clock(100);

        store.set("key1".to_string(), "v".to_string(), Duration::from_secs(1));
        set(&mut store, "key2", "v");
        clock.advance(Duration::from_secs(2));

        assert_eq!(store.reset(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_entry_summaries() {
        let (mut store, clock) = store_with_clock(100);

        set(&mut store, "user:1", "ann");
        store.get("user:1");
        clock.advance(Duration::from_millis(250));

        let summaries = store.entry_summaries(|value| value.len() * 2);
        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.key, "user:1");
        assert_eq!(summary.size, 6);
        assert_eq!(summary.hits, 1);
        assert_eq!(summary.age, 250);
        assert_eq!(summary.ttl, 60_000);
        assert_eq!(summary.ttl_remaining, 59_750);
    }
}
