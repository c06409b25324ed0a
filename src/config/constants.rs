//! Configuration constants.
//!
//! This module defines the defaults used throughout the scraper: listing
//! location, request timeouts, retry budget, backoff bounds, circuit breaker
//! thresholds and throttling delays.

use std::time::Duration;

/// Fighter listing served by ufcstats.com. The `page` query parameter is
/// rewritten by the pagination walker.
pub const DEFAULT_LIST_URL: &str = "http://ufcstats.com/statistics/fighters/search?char=&page=1";

/// Path fragment that identifies a fighter detail link on the listing.
pub const DETAIL_LINK_MARKER: &str = "/fighter-details/";

pub const DB_PATH: &str = "./fightstats.db";

/// Per-request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 45;

/// Maximum simultaneous outbound requests held by a session's request queue
pub const MAX_CONCURRENT_REQUESTS: usize = 2;

/// How often a caller waiting on a full request queue re-checks for a free slot
pub const QUEUE_POLL_INTERVAL_MS: u64 = 1000;

/// Default User-Agent string for HTTP requests.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// Retry strategy
/// Maximum number of retries after the initial attempt
pub const RETRY_MAX_RETRIES: u32 = 8;
/// Base delay in milliseconds; doubled for every retry already made
pub const RETRY_INITIAL_DELAY_MS: u64 = 3000;
/// Upper bound for any single backoff delay in milliseconds
pub const RETRY_MAX_DELAY_MS: u64 = 60_000;
/// Relative jitter band applied to the exponential delay (0.3 = ±30%)
pub const RETRY_JITTER_RATIO: f64 = 0.3;
/// Multiplier applied to the delay after a 429 response
pub const RATE_LIMITED_DELAY_FACTOR: f64 = 2.0;
/// Multiplier applied to the delay after a 5xx response
pub const SERVER_ERROR_DELAY_FACTOR: f64 = 1.5;

// Circuit breaker
/// Failures inside the reset window before the circuit opens
pub const CIRCUIT_FAILURE_THRESHOLD: u32 = 5;
/// Cooldown after which an open circuit (or a stale failure count) resets
pub const CIRCUIT_RESET_TIMEOUT: Duration = Duration::from_secs(60 * 60);

// Pagination
/// Consecutive listing page failures tolerated before the walk stops
pub const MAX_CONSECUTIVE_PAGE_ERRORS: u32 = 3;

/// Progress is logged every this many processed entities
pub const LOGGING_INTERVAL: usize = 10;

// HTTP status codes (for clarity and consistency)
pub const HTTP_STATUS_OK: u16 = 200;
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;
