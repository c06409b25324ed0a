//! Rate-limited, retrying HTTP fetch layer.
//!
//! This module provides:
//! - `RateLimitedFetcher`: one logical GET with retries, backoff and breaker checks
//! - `ScraperSession` / `FetchPolicy`: explicit per-run resilience state
//! - `CircuitBreaker` and `RequestQueue`: the two guards a session owns
//! - Retry classification (`should_retry`) and backoff (`backoff_delay`)

mod circuit_breaker;
mod queue;
mod request;
mod retry;
mod session;

use log::{debug, info, warn};
use tokio::time::sleep;

use crate::config::HTTP_STATUS_OK;
use crate::error_handling::{FetchError, InfoType, RequestFailure};
use request::RequestHeaders;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerState};
pub use queue::{QueueSlot, RequestQueue};
pub use retry::{backoff_delay, backoff_delay_with_jitter, should_retry};
pub use session::{FetchPolicy, ScraperSession};

/// Performs GETs under a session's concurrency cap, retry policy and breaker.
#[derive(Clone)]
pub struct RateLimitedFetcher {
    client: reqwest::Client,
}

impl RateLimitedFetcher {
    /// Wraps a configured client (timeout and User-Agent are set on the client).
    pub fn new(client: reqwest::Client) -> Self {
        RateLimitedFetcher { client }
    }

    /// Fetches `url` and returns the body of a 200 response.
    ///
    /// Each attempt holds one request-queue slot for the duration of the HTTP
    /// call only; the slot is released before any backoff sleep. Every failed
    /// attempt that reached the network is reported to the circuit breaker; a
    /// success gives back one failure of credit.
    ///
    /// # Errors
    ///
    /// - `FetchError::CircuitOpen` if the breaker is open before an attempt
    ///   (no request is sent)
    /// - `FetchError::Failed` with the last attempt's failure once the failure
    ///   is non-retryable, the retry budget is spent, or the breaker opened
    pub async fn fetch(&self, session: &ScraperSession, url: &str) -> Result<String, FetchError> {
        let policy = session.policy();
        let total_attempts = policy.max_retries + 1;
        let mut retry_count: u32 = 0;

        loop {
            if session.is_circuit_open().await {
                warn!("Circuit breaker is open, not requesting {}", url);
                return Err(FetchError::CircuitOpen {
                    url: url.to_string(),
                });
            }

            let outcome = {
                let _slot = session.queue().acquire().await;
                debug!(
                    "GET {} (attempt {}/{})",
                    url,
                    retry_count + 1,
                    total_attempts
                );
                self.attempt(url).await
            };

            let failure = match outcome {
                Ok(body) => {
                    session.circuit_breaker().record_success().await;
                    debug!("Fetched {} ({} bytes)", url, body.len());
                    return Ok(body);
                }
                Err(failure) => failure,
            };

            warn!(
                "Error fetching {} (attempt {}/{}): {}",
                url,
                retry_count + 1,
                total_attempts,
                failure
            );
            if failure.counts_toward_breaker() {
                session.circuit_breaker().record_failure().await;
            }
            let circuit_open = session.is_circuit_open().await;

            if !should_retry(&failure, retry_count, policy.max_retries, circuit_open) {
                return Err(FetchError::Failed {
                    url: url.to_string(),
                    attempts: retry_count + 1,
                    source: failure,
                });
            }

            let delay = backoff_delay(policy, retry_count, failure.status());
            info!(
                "Retrying {} in {:.1}s (retry {}/{})",
                url,
                delay.as_secs_f64(),
                retry_count + 1,
                policy.max_retries
            );
            session.stats().increment_info(InfoType::RetryScheduled);
            sleep(delay).await;
            retry_count += 1;
        }
    }

    /// One HTTP attempt. Anything but a 200 with a readable body is a failure.
    async fn attempt(&self, url: &str) -> Result<String, RequestFailure> {
        let response = RequestHeaders::apply_to_request_builder(self.client.get(url))
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    RequestFailure::InvalidRequest(e)
                } else {
                    RequestFailure::Transport(e)
                }
            })?;

        let status = response.status().as_u16();
        if status != HTTP_STATUS_OK {
            return Err(RequestFailure::from_status(status));
        }

        response.text().await.map_err(RequestFailure::Transport)
    }
}
