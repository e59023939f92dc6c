use crate::types::Platform;
use std::collections::HashMap;
use std::time::Duration;

/// Per-attempt request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const USER_AGENT: &str = concat!("repo-scraper/", env!("CARGO_PKG_VERSION"));

pub const ACCEPT: &str = "application/vnd.github.v3+json";

/// How the request executor retries.
///
/// Transient failures (transport errors, non rate-limit HTTP errors) and
/// rate-limit waits are counted separately; both are bounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts for transient failures, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after every failure.
    pub initial_backoff: Duration,
    /// Sleep after a rate-limit response before asking again.
    pub rate_limit_wait: Duration,
    /// Rate-limit responses tolerated before giving up.
    pub max_rate_limit_waits: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
            rate_limit_wait: Duration::from_secs(60),
            max_rate_limit_waits: 5,
        }
    }
}

impl RetryPolicy {
    /// No sleeping at all. Handy for tests and for callers that do their own pacing.
    pub fn immediate() -> Self {
        Self {
            initial_backoff: Duration::ZERO,
            rate_limit_wait: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Delay after failed attempt `attempt` (1-based): 1, 2, 4, ... times the initial backoff.
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_backoff.saturating_mul(1u32 << exponent)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScraperConfig {
    /// Sent as `Authorization: token <token>` on every request.
    pub token: Option<String>,
    pub timeout: Option<Duration>,
    pub retry: RetryPolicy,
    /// API base URL overrides, e.g. a GitHub Enterprise host or a test server.
    pub api_bases: HashMap<Platform, String>,
}

impl ScraperConfig {
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_api_base(mut self, platform: Platform, base: impl Into<String>) -> Self {
        self.api_bases.insert(platform, base.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_documented_limits() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.rate_limit_wait, Duration::from_secs(60));
        assert_eq!(policy.max_rate_limit_waits, 5);
    }

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_after(1), Duration::from_secs(1));
        assert_eq!(policy.backoff_after(2), Duration::from_secs(2));
        assert_eq!(policy.backoff_after(3), Duration::from_secs(4));
        assert_eq!(RetryPolicy::immediate().backoff_after(3), Duration::ZERO);
    }

    #[test]
    fn timeout_defaults_to_thirty_seconds() {
        assert_eq!(ScraperConfig::default().timeout(), DEFAULT_TIMEOUT);
        let config = ScraperConfig::default().with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }
}
