//! TTL Tiers
//!
//! Named validity windows that callers pick from instead of raw durations.

use std::time::Duration;

/// One minute. Fast-moving aggregates such as dashboard counters.
pub const SHORT: Duration = Duration::from_secs(60);

/// Five minutes. The default when no TTL is given.
pub const MEDIUM: Duration = Duration::from_secs(5 * 60);

/// Fifteen minutes.
pub const LONG: Duration = Duration::from_secs(15 * 60);

/// One hour.
pub const HOUR: Duration = Duration::from_secs(60 * 60);

/// One day. Effectively static content.
pub const DAY: Duration = Duration::from_secs(24 * 60 * 60);
