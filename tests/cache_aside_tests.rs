//! Integration Tests for the Cache Facade
//!
//! Exercises the public library API the way route handlers and data-access
//! code use it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use portal_cache::cache::ManualClock;
use portal_cache::{invalidation, ttl, Cache, Namespace};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
struct User {
    id: String,
    name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Announcement {
    id: u32,
}

fn cache_with_clock(max_entries: usize) -> (Cache, ManualClock) {
    let clock = ManualClock::new(1_700_000_000_000);
    (Cache::with_clock(max_entries, Arc::new(clock.clone())), clock)
}

#[derive(Debug, PartialEq)]
struct DbError(&'static str);

#[tokio::test]
async fn test_set_get_then_clear_namespace() {
    let (cache, _) = cache_with_clock(100);
    let list = vec![Announcement { id: 1 }];

    cache.set(
        Namespace::Announcements,
        "list",
        list.clone(),
        Some(Duration::from_millis(60_000)),
        None,
    );
    assert_eq!(
        cache.get::<Vec<Announcement>>(Namespace::Announcements, "list", None),
        Some(list)
    );

    assert_eq!(cache.clear_namespace(Namespace::Announcements), 1);
    assert_eq!(
        cache.get::<Vec<Announcement>>(Namespace::Announcements, "list", None),
        None
    );
}

#[tokio::test]
async fn test_get_or_set_fetches_once_within_ttl() {
    let (cache, clock) = cache_with_clock(100);
    let calls = AtomicUsize::new(0);
    let fetch_user = || {
        calls.fetch_add(1, Ordering::SeqCst);
        async {
            Ok::<_, DbError>(User {
                id: "42".to_string(),
                name: "Ann".to_string(),
            })
        }
    };

    let first = cache
        .get_or_set(Namespace::User, "42", fetch_user, Some(Duration::from_millis(900_000)), None)
        .await
        .unwrap();
    assert_eq!(first.name, "Ann");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    clock.advance(Duration::from_secs(14 * 60));
    let second = cache
        .get_or_set(Namespace::User, "42", fetch_user, Some(Duration::from_millis(900_000)), None)
        .await
        .unwrap();

    assert_eq!(second, first);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Past the 15 minute window the fetch runs again
    clock.advance(Duration::from_secs(2 * 60));
    cache
        .get_or_set(Namespace::User, "42", fetch_user, Some(Duration::from_millis(900_000)), None)
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_get_or_set_propagates_error_and_stores_nothing() {
    let (cache, _) = cache_with_clock(100);

    let result: Result<User, DbError> = cache
        .get_or_set(
            Namespace::User,
            "42",
            || async { Err(DbError("connection refused")) },
            None,
            None,
        )
        .await;

    assert_eq!(result, Err(DbError("connection refused")));
    assert!(!cache.has(Namespace::User, "42", None));
    assert_eq!(cache.stats().size, 0);
}

#[tokio::test]
async fn test_concurrent_cold_misses_both_fetch() {
    let (cache, _) = cache_with_clock(100);
    let calls = Arc::new(AtomicUsize::new(0));

    let run = |cache: Cache, calls: Arc<AtomicUsize>| async move {
        cache
            .get_or_set(
                Namespace::Stats,
                "dashboard",
                || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Ok::<_, DbError>(json!({"visitors": 10}))
                },
                None,
                None,
            )
            .await
    };

    let (a, b) = tokio::join!(
        run(cache.clone(), calls.clone()),
        run(cache.clone(), calls.clone())
    );

    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_expired_entry_is_removed_on_read() {
    let (cache, clock) = cache_with_clock(100);
    cache.set(Namespace::Events, "upcoming", vec![1u32, 2], Some(ttl::SHORT), None);

    clock.advance(ttl::SHORT + Duration::from_millis(1));

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get::<Vec<u32>>(Namespace::Events, "upcoming", None), None);
    assert_eq!(cache.len(), 0);
    assert_eq!(cache.stats().size, 0);
}

#[tokio::test]
async fn test_capacity_evicts_least_recently_accessed() {
    let (cache, clock) = cache_with_clock(3);
    for id in ["1", "2", "3"] {
        cache.set(Namespace::User, id, id.to_string(), None, None);
        clock.advance(Duration::from_millis(10));
    }

    cache.get::<String>(Namespace::User, "1", None);
    cache.set(Namespace::User, "4", "4".to_string(), None, None);

    let stats = cache.stats();
    assert_eq!(stats.evictions, 1);
    assert_eq!(stats.size, 3);
    assert!(cache.has(Namespace::User, "1", None));
    assert!(!cache.has(Namespace::User, "2", None));
}

#[tokio::test]
async fn test_params_order_shares_entry() {
    let (cache, _) = cache_with_clock(100);
    let a = json!({"page": 1, "category": "news"});
    let b = json!({"category": "news", "page": 1});

    cache.set(Namespace::Api, "/api/announcements", json!({"total": 3}), None, Some(&a));

    assert_eq!(
        cache.get::<Value>(Namespace::Api, "/api/announcements", Some(&b)),
        Some(json!({"total": 3}))
    );
}

#[tokio::test]
async fn test_hit_rate_seven_of_ten() {
    let (cache, _) = cache_with_clock(100);
    cache.set(Namespace::Stats, "k", 1u32, None, None);
    for _ in 0..7 {
        cache.get::<u32>(Namespace::Stats, "k", None);
    }
    for _ in 0..3 {
        cache.get::<u32>(Namespace::Stats, "absent", None);
    }

    let stats = cache.stats();
    assert!((stats.hit_rate - 0.7).abs() < 1e-9);
}

#[tokio::test]
async fn test_entity_invalidation_crosses_namespaces() {
    let (cache, _) = cache_with_clock(100);
    let users = cache.namespace(Namespace::User);
    let perms = cache.namespace(Namespace::Permission);

    users.set("42", "ann", None, None);
    perms.set("42", ["read"], None, None);
    users.set("43", "bob", None, None);

    assert_eq!(invalidation::entity(&cache, "42"), 2);
    assert!(users.has("43", None));
}
