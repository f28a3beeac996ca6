//! Resolver configuration.

use std::time::Duration;

/// Configuration parameters for station resolution.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Maximum number of train schedules fetched at once.
    /// Kept small to go easy on the upstream site.
    pub max_workers: usize,

    /// Upstream requests allowed in flight at once, across all queries.
    /// Waiting for a slot does not count against `fetch_timeout`.
    pub max_requests: usize,

    /// Time allowed for each upstream fetch. A fetch that exceeds it fails
    /// with a network error, and that failure is cached for its key.
    pub fetch_timeout: Duration,

    /// Only the first N listed trains are resolved, if set.
    pub train_limit: Option<usize>,
}

impl ResolverConfig {
    /// Set the number of concurrent schedule fetches (at least one).
    pub fn with_max_workers(mut self, n: usize) -> Self {
        self.max_workers = n.max(1);
        self
    }

    /// Set the process-wide request limit (at least one).
    pub fn with_max_requests(mut self, n: usize) -> Self {
        self.max_requests = n.max(1);
        self
    }

    /// Set the per-fetch timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set or clear the train limit.
    pub fn with_train_limit(mut self, limit: Option<usize>) -> Self {
        self.train_limit = limit;
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_workers: 2,
            max_requests: 4,
            fetch_timeout: Duration::from_secs(25),
            train_limit: Some(75),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ResolverConfig::default();
        assert_eq!(config.max_workers, 2);
        assert_eq!(config.max_requests, 4);
        assert_eq!(config.fetch_timeout, Duration::from_secs(25));
        assert_eq!(config.train_limit, Some(75));
    }

    #[test]
    fn builder_clamps_workers() {
        let config = ResolverConfig::default()
            .with_max_workers(0)
            .with_max_requests(0)
            .with_train_limit(None)
            .with_fetch_timeout(Duration::from_millis(500));
        assert_eq!(config.max_workers, 1);
        assert_eq!(config.max_requests, 1);
        assert_eq!(config.train_limit, None);
        assert_eq!(config.fetch_timeout, Duration::from_millis(500));
    }
}
