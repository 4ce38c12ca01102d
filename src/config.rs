//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

/// Cache and diagnostics server configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Interval in seconds between background sweeps of expired entries
    pub sweep_interval: u64,
    /// Diagnostics HTTP server port
    pub server_port: u16,
    /// Whether to log cache statistics periodically
    pub stats_reporting: bool,
    /// Interval in seconds between statistics reports
    pub stats_report_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 2000)
    /// - `SWEEP_INTERVAL` - Expired-entry sweep frequency in seconds (default: 300)
    /// - `SERVER_PORT` - Diagnostics server port (default: 3000)
    /// - `STATS_REPORTING` - `1`, `true` or `yes` enables stats logging (default: off)
    /// - `STATS_REPORT_INTERVAL` - Stats logging frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            sweep_interval: parse_var("SWEEP_INTERVAL").unwrap_or(defaults.sweep_interval),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            stats_reporting: env::var("STATS_REPORTING")
                .ok()
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.stats_reporting),
            stats_report_interval: parse_var("STATS_REPORT_INTERVAL")
                .unwrap_or(defaults.stats_report_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 2000,
            sweep_interval: 300,
            server_port: 3000,
            stats_reporting: false,
            stats_report_interval: 60,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
