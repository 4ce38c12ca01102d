//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries so that
//! keys which are written but never read again still release their memory.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::Cache;

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// Each pass holds the cache lock for a single scan of the entry set. The
/// returned handle is aborted during shutdown.
///
/// # Example
/// ```ignore
/// let cache = Cache::new(2000);
/// let sweep_handle = spawn_sweep_task(cache.clone(), Duration::from_secs(300));
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(cache: Cache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs_f64(),
            "Starting TTL sweep task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.sweep();

            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    })
}
