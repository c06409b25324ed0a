//! Per-run scraper session.
//!
//! A session bundles the mutable resilience state (circuit breaker, request
//! queue, run statistics) with the policy that drives it. One session is
//! built per run and passed explicitly to every fetch, so independent
//! sessions never share breaker or queue state.

use std::time::Duration;

use super::circuit_breaker::CircuitBreaker;
use super::queue::RequestQueue;
use crate::config::{Config, RETRY_JITTER_RATIO};
use crate::error_handling::ProcessingStats;

/// Retry, throttling and breaker parameters for one session.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// Base backoff delay; also the throttle between pages and entities
    pub initial_delay: Duration,
    /// Upper bound on a single backoff delay
    pub max_delay: Duration,
    /// Relative jitter band (0.3 = ±30%)
    pub jitter_ratio: f64,
    /// Failures that open the circuit
    pub failure_threshold: u32,
    /// Circuit breaker reset timeout
    pub reset_timeout: Duration,
    /// Simultaneous outbound requests
    pub max_concurrent: usize,
    /// Poll interval while waiting for a request slot
    pub queue_poll_interval: Duration,
    /// Consecutive listing page failures before the walk stops
    pub max_consecutive_page_errors: u32,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        FetchPolicy::from(&Config::default())
    }
}

impl From<&Config> for FetchPolicy {
    fn from(config: &Config) -> Self {
        FetchPolicy {
            max_retries: config.max_retries,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            jitter_ratio: RETRY_JITTER_RATIO,
            failure_threshold: config.failure_threshold,
            reset_timeout: Duration::from_secs(config.reset_timeout_secs),
            max_concurrent: config.max_concurrent,
            queue_poll_interval: Duration::from_millis(config.queue_poll_interval_ms),
            max_consecutive_page_errors: config.max_consecutive_page_errors,
        }
    }
}

/// Mutable resilience state for one scraping run.
pub struct ScraperSession {
    policy: FetchPolicy,
    circuit_breaker: CircuitBreaker,
    queue: RequestQueue,
    stats: ProcessingStats,
}

impl ScraperSession {
    pub fn new(policy: FetchPolicy) -> Self {
        ScraperSession {
            circuit_breaker: CircuitBreaker::new(policy.failure_threshold, policy.reset_timeout),
            queue: RequestQueue::new(policy.max_concurrent, policy.queue_poll_interval),
            stats: ProcessingStats::new(),
            policy,
        }
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    pub fn circuit_breaker(&self) -> &CircuitBreaker {
        &self.circuit_breaker
    }

    pub fn queue(&self) -> &RequestQueue {
        &self.queue
    }

    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    /// Shorthand for the breaker check done before every page and entity.
    pub async fn is_circuit_open(&self) -> bool {
        self.circuit_breaker.is_open().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_config() {
        let config = Config {
            max_retries: 2,
            initial_delay_ms: 10,
            max_delay_ms: 100,
            reset_timeout_secs: 5,
            max_concurrent: 4,
            ..Default::default()
        };
        let policy = FetchPolicy::from(&config);
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.initial_delay, Duration::from_millis(10));
        assert_eq!(policy.max_delay, Duration::from_millis(100));
        assert_eq!(policy.reset_timeout, Duration::from_secs(5));
        assert_eq!(policy.max_concurrent, 4);
        assert_eq!(policy.jitter_ratio, 0.3);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let policy = FetchPolicy {
            failure_threshold: 1,
            ..Default::default()
        };
        let first = ScraperSession::new(policy.clone());
        let second = ScraperSession::new(policy);

        first.circuit_breaker().record_failure().await;
        let _slot = first.queue().try_acquire();

        assert!(first.is_circuit_open().await);
        assert!(!second.is_circuit_open().await);
        assert_eq!(first.queue().pending(), 1);
        assert_eq!(second.queue().pending(), 0);
    }
}
