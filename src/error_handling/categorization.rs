//! Error categorization.
//!
//! Maps fetch and ingestion failures onto `ErrorType` counters so that the
//! end-of-run statistics group failures consistently.

use super::stats::ProcessingStats;
use super::types::{ErrorType, FetchError, IngestError, RequestFailure};

/// Categorizes a single failed HTTP attempt into an `ErrorType`.
pub fn categorize_request_failure(failure: &RequestFailure) -> ErrorType {
    match failure {
        RequestFailure::Transport(error) => {
            if error.is_timeout() {
                ErrorType::HttpRequestTimeoutError
            } else if error.is_connect() {
                ErrorType::HttpRequestConnectError
            } else if error.is_body() || error.is_decode() {
                ErrorType::HttpRequestBodyError
            } else {
                ErrorType::HttpRequestOtherError
            }
        }
        RequestFailure::InvalidRequest(_) => ErrorType::HttpRequestOtherError,
        RequestFailure::RateLimited => ErrorType::HttpRequestTooManyRequests,
        RequestFailure::Server(_) => ErrorType::HttpRequestServerError,
        RequestFailure::Client(404) => ErrorType::HttpRequestNotFound,
        RequestFailure::Client(_) => ErrorType::HttpRequestClientError,
        RequestFailure::UnexpectedStatus(_) => ErrorType::HttpRequestUnexpectedStatus,
    }
}

/// Categorizes a failed logical fetch by its last attempt.
pub fn categorize_fetch_error(error: &FetchError) -> ErrorType {
    match error {
        FetchError::CircuitOpen { .. } => ErrorType::CircuitOpen,
        FetchError::Failed { source, .. } => categorize_request_failure(source),
    }
}

/// Categorizes a per-entity ingestion failure.
pub fn categorize_ingest_error(error: &IngestError) -> ErrorType {
    match error {
        IngestError::Fetch(fetch) => categorize_fetch_error(fetch),
        IngestError::Storage(_) => ErrorType::StorageError,
    }
}

/// Records an ingestion failure in the run statistics.
pub fn update_error_stats(stats: &ProcessingStats, error: &IngestError) {
    stats.increment_error(categorize_ingest_error(error));
}
