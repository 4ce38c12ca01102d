//! Stats Reporter Task
//!
//! Optional background task that logs a one-line cache summary at a fixed
//! interval.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::{Cache, CacheStats};

/// Spawns a task that logs cache statistics every `interval`.
///
/// Nothing is logged until the cache has served at least one lookup.
pub fn spawn_stats_reporter(cache: Cache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;

            let stats = cache.stats();
            if let Some(line) = summary_line(&stats) {
                info!("{}", line);
            }
        }
    })
}

/// Formats the report line, or `None` when there is nothing to report yet.
pub fn summary_line(stats: &CacheStats) -> Option<String> {
    if stats.requests() == 0 {
        return None;
    }

    Some(format!(
        "Cache stats: {}H/{}M ({:.1}% hit rate), size: {}, evictions: {}, ~{} bytes",
        stats.hits,
        stats.misses,
        stats.hit_rate * 100.0,
        stats.size,
        stats.evictions,
        stats.memory_usage
    ))
}
