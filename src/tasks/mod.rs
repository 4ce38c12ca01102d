//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - TTL Sweep: Removes expired cache entries at configured intervals
//! - Stats Reporter: Logs hit/miss statistics when enabled

mod reporter;
mod sweep;

pub use reporter::{spawn_stats_reporter, summary_line};
pub use sweep::spawn_sweep_task;
