//! Circuit breaker for outbound listing and detail requests.
//!
//! Stops new requests once failures pile up inside the reset window. The
//! breaker closes again once the reset timeout has elapsed since it opened;
//! a failure arriving more than one reset timeout after the previous failure
//! starts a fresh window. Successes give back one failure of credit.

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Snapshot of the breaker's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CircuitBreakerState {
    /// Failures counted in the current window
    pub failure_count: u32,
    /// When the most recent failure was recorded
    pub last_failure: Option<Instant>,
    /// When the circuit last transitioned to open
    pub opened_at: Option<Instant>,
    /// Whether new requests are currently blocked
    pub is_open: bool,
}

/// Failure-counting circuit breaker owned by one scraper session.
pub struct CircuitBreaker {
    /// Failures within the window before the circuit opens
    failure_threshold: u32,
    /// Cooldown before an open circuit or a stale failure count resets
    reset_timeout: Duration,
    state: Mutex<CircuitBreakerState>,
}

impl CircuitBreaker {
    /// Creates a new circuit breaker.
    ///
    /// # Arguments
    ///
    /// * `failure_threshold` - Number of failures inside the window before opening circuit
    /// * `reset_timeout` - How long before an open circuit closes again
    pub fn new(failure_threshold: u32, reset_timeout: Duration) -> Self {
        CircuitBreaker {
            failure_threshold: failure_threshold.max(1),
            reset_timeout,
            state: Mutex::new(CircuitBreakerState::default()),
        }
    }

    /// Resets the state if the open period or the failure window has expired.
    fn expire(&self, state: &mut CircuitBreakerState, now: Instant) {
        let cooled_down = state.is_open
            && state
                .opened_at
                .is_some_and(|opened| now.duration_since(opened) >= self.reset_timeout);
        let window_expired = state
            .last_failure
            .is_some_and(|last| now.duration_since(last) > self.reset_timeout);

        if cooled_down {
            log::info!("Circuit breaker: reset timeout elapsed, closing circuit");
            *state = CircuitBreakerState::default();
        } else if window_expired && !state.is_open {
            *state = CircuitBreakerState::default();
        }
    }

    /// Records a failed request.
    ///
    /// Returns `true` if this failure opened the circuit.
    pub async fn record_failure(&self) -> bool {
        let now = Instant::now();
        let mut state = self.state.lock().await;
        self.expire(&mut state, now);

        state.failure_count += 1;
        state.last_failure = Some(now);

        if state.failure_count >= self.failure_threshold && !state.is_open {
            state.is_open = true;
            state.opened_at = Some(now);
            log::error!(
                "Circuit breaker opened after {} failures (reset in {}s)",
                state.failure_count,
                self.reset_timeout.as_secs()
            );
            return true;
        }
        false
    }

    /// Records a successful request: one failure of partial recovery credit.
    pub async fn record_success(&self) {
        let mut state = self.state.lock().await;
        state.failure_count = state.failure_count.saturating_sub(1);
    }

    /// Checks if the circuit is open (requests should be blocked).
    ///
    /// An open circuit whose reset timeout has elapsed is closed here.
    pub async fn is_open(&self) -> bool {
        let mut state = self.state.lock().await;
        self.expire(&mut state, Instant::now());
        state.is_open
    }

    /// Gets the current failure count (for monitoring).
    pub async fn failure_count(&self) -> u32 {
        self.state.lock().await.failure_count
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> CircuitBreakerState {
        *self.state.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_circuit_stays_closed_below_threshold() {
        let cb = CircuitBreaker::new(5, Duration::from_secs(3600));
        for _ in 0..4 {
            assert!(!cb.record_failure().await);
        }
        assert!(!cb.is_open().await);
        assert_eq!(cb.failure_count().await, 4);
    }

    #[tokio::test]
    async fn test_circuit_opens_at_threshold() {
        let cb = CircuitBreaker::new(5, Duration::from_secs(3600));
        for _ in 0..4 {
            cb.record_failure().await;
        }
        assert!(cb.record_failure().await, "fifth failure should open");
        assert!(cb.is_open().await);

        // Further failures keep it open without re-reporting the transition
        assert!(!cb.record_failure().await);
        assert!(cb.is_open().await);
        assert_eq!(cb.failure_count().await, 6);
    }

    #[tokio::test]
    async fn test_success_gives_partial_credit() {
        let cb = CircuitBreaker::new(5, Duration::from_secs(3600));
        for _ in 0..3 {
            cb.record_failure().await;
        }
        cb.record_success().await;
        assert_eq!(cb.failure_count().await, 2);

        cb.record_success().await;
        cb.record_success().await;
        cb.record_success().await;
        assert_eq!(cb.failure_count().await, 0, "credit is floored at zero");

        // Two more failures after recovery should not open a threshold-5 breaker
        cb.record_failure().await;
        cb.record_failure().await;
        assert!(!cb.is_open().await);
    }

    #[tokio::test]
    async fn test_circuit_closes_after_reset_timeout() {
        let cb = CircuitBreaker::new(2, Duration::from_millis(50));
        cb.record_failure().await;
        cb.record_failure().await;
        assert!(cb.is_open().await);

        sleep(Duration::from_millis(70)).await;

        assert!(!cb.is_open().await);
        let state = cb.snapshot().await;
        assert_eq!(state.failure_count, 0);
        assert!(state.opened_at.is_none());
    }

    #[tokio::test]
    async fn test_stale_failures_do_not_accumulate() {
        let cb = CircuitBreaker::new(3, Duration::from_millis(40));
        cb.record_failure().await;
        cb.record_failure().await;

        sleep(Duration::from_millis(60)).await;

        // Window expired: count restarts at 1 instead of reaching the threshold
        assert!(!cb.record_failure().await);
        assert_eq!(cb.failure_count().await, 1);
        assert!(!cb.is_open().await);
    }
}
