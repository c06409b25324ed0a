//! Retry classification and backoff delays.

use std::time::Duration;

use rand::Rng;

use super::session::FetchPolicy;
use crate::config::{
    HTTP_STATUS_TOO_MANY_REQUESTS, RATE_LIMITED_DELAY_FACTOR, SERVER_ERROR_DELAY_FACTOR,
};
use crate::error_handling::RequestFailure;

/// Decides whether a failed attempt should be retried.
///
/// Retries only while the retry budget lasts and the circuit is closed, and
/// only for transient failures: no response at all, 429, or any 5xx.
///
/// # Arguments
///
/// * `failure` - The failure of the attempt that just ended
/// * `retry_count` - Retries already made for this logical fetch
/// * `max_retries` - Retry budget
/// * `circuit_open` - Whether the session's circuit breaker is open
pub fn should_retry(
    failure: &RequestFailure,
    retry_count: u32,
    max_retries: u32,
    circuit_open: bool,
) -> bool {
    if retry_count >= max_retries || circuit_open {
        return false;
    }
    failure.is_retryable()
}

/// Backoff delay before retry number `retry_count + 1`, with random jitter.
pub fn backoff_delay(policy: &FetchPolicy, retry_count: u32, status: Option<u16>) -> Duration {
    let jitter_unit = rand::rng().random_range(-1.0..=1.0);
    backoff_delay_with_jitter(policy, retry_count, status, jitter_unit)
}

/// Deterministic core of [`backoff_delay`].
///
/// `initial_delay × 2^retry_count`, shifted by `jitter_unit × jitter_ratio`
/// of itself (`jitter_unit` in `[-1, 1]`), doubled after a 429, ×1.5 after a
/// 5xx, then clamped to `[0, max_delay]`.
pub fn backoff_delay_with_jitter(
    policy: &FetchPolicy,
    retry_count: u32,
    status: Option<u16>,
    jitter_unit: f64,
) -> Duration {
    let exponent = retry_count.min(30) as i32;
    let mut delay_ms = policy.initial_delay.as_millis() as f64 * 2f64.powi(exponent);
    delay_ms += delay_ms * policy.jitter_ratio * jitter_unit.clamp(-1.0, 1.0);

    match status {
        Some(HTTP_STATUS_TOO_MANY_REQUESTS) => delay_ms *= RATE_LIMITED_DELAY_FACTOR,
        Some(s) if s >= 500 => delay_ms *= SERVER_ERROR_DELAY_FACTOR,
        _ => {}
    }

    let max_ms = policy.max_delay.as_millis() as f64;
    Duration::from_millis(delay_ms.clamp(0.0, max_ms).round() as u64)
}
