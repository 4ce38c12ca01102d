//! Invalidation Helpers
//!
//! Per-namespace handles with each namespace's default TTL tier, and bulk
//! invalidation shortcuts for the portal's content types.

use std::any::Any;
use std::future::Future;
use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::cache::key::Namespace;
use crate::cache::Cache;

// == Namespace Cache ==
/// A view of the cache pinned to one namespace.
///
/// Writes without an explicit TTL use the namespace's default tier rather
/// than the facade-wide medium tier.
#[derive(Debug, Clone, Copy)]
pub struct NamespaceCache<'a> {
    cache: &'a Cache,
    namespace: Namespace,
}

impl<'a> NamespaceCache<'a> {
    pub fn new(cache: &'a Cache, namespace: Namespace) -> Self {
        Self { cache, namespace }
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn get<T: Clone + Any>(&self, identifier: &str, params: Option<&Value>) -> Option<T> {
        self.cache.get(self.namespace, identifier, params)
    }

    pub fn set<T>(&self, identifier: &str, value: T, ttl: Option<Duration>, params: Option<&Value>)
    where
        T: Serialize + Send + Sync + 'static,
    {
        let ttl = ttl.unwrap_or_else(|| self.namespace.default_ttl());
        self.cache
            .set(self.namespace, identifier, value, Some(ttl), params);
    }

    pub fn delete(&self, identifier: &str, params: Option<&Value>) -> bool {
        self.cache.delete(self.namespace, identifier, params)
    }

    pub fn has(&self, identifier: &str, params: Option<&Value>) -> bool {
        self.cache.has(self.namespace, identifier, params)
    }

    /// Cache-aside within this namespace, defaulting to its TTL tier.
    pub async fn get_or_set<T, E, F, Fut>(
        &self,
        identifier: &str,
        fetch: F,
        ttl: Option<Duration>,
        params: Option<&Value>,
    ) -> Result<T, E>
    where
        T: Serialize + Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let ttl = ttl.unwrap_or_else(|| self.namespace.default_ttl());
        self.cache
            .get_or_set(self.namespace, identifier, fetch, Some(ttl), params)
            .await
    }

    /// Removes every entry in this namespace.
    pub fn clear(&self) -> usize {
        self.cache.clear_namespace(self.namespace)
    }
}

impl Cache {
    /// Returns a handle scoped to `namespace`.
    pub fn namespace(&self, namespace: Namespace) -> NamespaceCache<'_> {
        NamespaceCache::new(self, namespace)
    }
}

// == Shortcuts ==
pub fn announcements(cache: &Cache) -> usize {
    cache.clear_namespace(Namespace::Announcements)
}

pub fn events(cache: &Cache) -> usize {
    cache.clear_namespace(Namespace::Events)
}

pub fn resources(cache: &Cache) -> usize {
    cache.clear_namespace(Namespace::Resources)
}

pub fn users(cache: &Cache) -> usize {
    cache.clear_namespace(Namespace::User)
}

pub fn communications(cache: &Cache) -> usize {
    cache.clear_namespace(Namespace::Communication)
}

pub fn permissions(cache: &Cache) -> usize {
    cache.clear_namespace(Namespace::Permission)
}

pub fn stats(cache: &Cache) -> usize {
    cache.clear_namespace(Namespace::Stats)
}

pub fn api_responses(cache: &Cache) -> usize {
    cache.clear_namespace(Namespace::Api)
}

/// Drops everything, counters included.
pub fn all(cache: &Cache) -> usize {
    cache.clear_all()
}

/// Removes every key that mentions `id` as a whole key segment, whichever
/// namespace cached it.
///
/// `entity(cache, "42")` clears `user:42` and `perm:42` but leaves `user:420`.
pub fn entity(cache: &Cache, id: &str) -> usize {
    let pattern = format!(r":{}(:|$)", regex::escape(id));
    match Regex::new(&pattern) {
        Ok(pattern) => cache.invalidate_matching(&pattern),
        // Escaped input always compiles; a size-limit failure clears nothing.
        Err(_) => 0,
    }
}
