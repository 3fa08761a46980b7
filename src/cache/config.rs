//! Cache configuration

use std::time::Duration;

/// Configuration for a [`RefreshingCache`](super::RefreshingCache)
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Interval between periodic loader invocations
    pub refresh_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(5 * 60),
        }
    }
}

impl CacheConfig {
    /// Set the refresh interval
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }
}
