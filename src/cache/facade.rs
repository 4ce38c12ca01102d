//! Cache Facade Module
//!
//! The typed entry point application code uses: namespaced keys, cache-aside
//! and namespace-level invalidation on top of the entry store.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::key::{encode_key, Namespace};
use crate::cache::value::CachedValue;
use crate::cache::{ttl, CacheStats, EntryStore};
use crate::config::Config;
use crate::error::Result;

/// Fetches slower than this are logged on a cache miss.
const SLOW_FETCH_THRESHOLD: Duration = Duration::from_millis(100);

// == Cache ==
/// Process-wide cache handle.
///
/// Cloning is cheap and every clone shares the same entries, so one `Cache`
/// built at startup can be handed to every consumer. Values are kept as the
/// caller stored them and read back by type.
#[derive(Debug, Clone)]
pub struct Cache {
    store: Arc<Mutex<EntryStore<CachedValue>>>,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache bounded at `max_entries`, reading the system clock.
    pub fn new(max_entries: usize) -> Self {
        Self::with_clock(max_entries, Arc::new(SystemClock))
    }

    /// Creates a cache with an explicit time source.
    pub fn with_clock(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(Mutex::new(EntryStore::with_clock(max_entries, clock))),
        }
    }

    /// Creates a cache sized from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_entries)
    }

    // == Get ==
    /// Returns a copy of the live value cached for the key, if any.
    ///
    /// A value stored as a type other than `T` is logged and reported as a
    /// miss.
    pub fn get<T>(&self, namespace: Namespace, identifier: &str, params: Option<&Value>) -> Option<T>
    where
        T: Clone + Any,
    {
        let key = encode_key(namespace, identifier, params);
        let mut store = self.store.lock();
        let cached = store.get_matching(&key, |cached| {
            let fits = cached.is::<T>();
            if !fits {
                warn!(
                    key = %key,
                    expected = std::any::type_name::<T>(),
                    "cached value has a different type"
                );
            }
            fits
        })?;

        cached.downcast_ref::<T>().cloned()
    }

    // == Set ==
    /// Caches `value` for `ttl`, or the medium tier when `ttl` is `None`.
    ///
    /// The value is stored as given. One whose JSON form cannot be produced
    /// is still cached and counts as size 0 in the memory estimate.
    pub fn set<T>(
        &self,
        namespace: Namespace,
        identifier: &str,
        value: T,
        ttl: Option<Duration>,
        params: Option<&Value>,
    ) where
        T: Serialize + Send + Sync + 'static,
    {
        let key = encode_key(namespace, identifier, params);
        let cached = CachedValue::new(&key, value);

        self.store
            .lock()
            .set(key, cached, ttl.unwrap_or(ttl::MEDIUM));
    }

    // == Delete ==
    /// Removes the entry for the key, returning whether one existed.
    pub fn delete(&self, namespace: Namespace, identifier: &str, params: Option<&Value>) -> bool {
        let key = encode_key(namespace, identifier, params);
        self.store.lock().delete(&key)
    }

    // == Has ==
    /// Whether a live entry exists, i.e. whether `get` with the stored type
    /// would return it. Counts as a lookup and drops the entry if it has
    /// expired.
    pub fn has(&self, namespace: Namespace, identifier: &str, params: Option<&Value>) -> bool {
        let key = encode_key(namespace, identifier, params);
        self.store.lock().get(&key).is_some()
    }

    // == Get Or Set ==
    /// Cache-aside lookup.
    ///
    /// On a hit the cached value is returned and `fetch` is never called. On a
    /// miss `fetch` runs; its error is returned unchanged and nothing is
    /// cached, while a successful result is cached for `ttl` (medium tier by
    /// default) and returned.
    ///
    /// The store is not locked while `fetch` runs, so concurrent misses on
    /// the same key each call their own `fetch` and the last one to finish
    /// wins.
    pub async fn get_or_set<T, E, F, Fut>(
        &self,
        namespace: Namespace,
        identifier: &str,
        fetch: F,
        ttl: Option<Duration>,
        params: Option<&Value>,
    ) -> std::result::Result<T, E>
    where
        T: Serialize + Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        if let Some(cached) = self.get(namespace, identifier, params) {
            return Ok(cached);
        }

        let started = Instant::now();
        let fetched = fetch().await;
        let elapsed = started.elapsed();

        if elapsed > SLOW_FETCH_THRESHOLD {
            warn!(
                namespace = %namespace,
                identifier = %identifier,
                elapsed_ms = elapsed.as_millis() as u64,
                "slow fetch on cache miss"
            );
        }

        let value = match fetched {
            Ok(value) => value,
            Err(err) => {
                debug!(namespace = %namespace, identifier = %identifier, "fetch failed, nothing cached");
                return Err(err);
            }
        };

        self.set(namespace, identifier, value.clone(), ttl, params);
        Ok(value)
    }

    // == Clear Namespace ==
    /// Removes every entry in `namespace`, returning how many were removed.
    pub fn clear_namespace(&self, namespace: Namespace) -> usize {
        let prefix = namespace.key_prefix();
        let removed = self.store.lock().remove_where(|key| key.starts_with(&prefix));
        debug!(namespace = %namespace, removed, "cleared namespace");
        removed
    }

    // == Invalidate Matching ==
    /// Removes every entry whose key matches `pattern`, in any namespace.
    pub fn invalidate_matching(&self, pattern: &Regex) -> usize {
        let removed = self.store.lock().remove_where(|key| pattern.is_match(key));
        debug!(pattern = %pattern, removed, "invalidated matching keys");
        removed
    }

    /// Compiles `pattern` and removes every entry whose key matches it.
    pub fn invalidate_pattern(&self, pattern: &str) -> Result<usize> {
        let pattern = Regex::new(pattern)?;
        Ok(self.invalidate_matching(&pattern))
    }

    // == Clear All ==
    /// Drops every entry and zeroes all counters, returning how many live
    /// entries were dropped.
    pub fn clear_all(&self) -> usize {
        self.store.lock().reset()
    }

    // == Sweep ==
    /// Removes expired entries without waiting for them to be read.
    pub fn sweep(&self) -> usize {
        self.store.lock().sweep()
    }

    // == Stats ==
    /// Sweeps expired entries, then reports counters, memory estimate and a
    /// summary of every remaining entry.
    pub fn stats(&self) -> CacheStats {
        let mut store = self.store.lock();
        store.sweep();
        store
            .stats()
            .with_entries(store.entry_summaries(CachedValue::size))
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
