//! Error type definitions.
//!
//! This module defines all error, warning, and info types used throughout the application.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// Outcome of a single failed HTTP attempt.
///
/// Success is HTTP 200 exactly; everything else lands here and is classified
/// for retry by [`RequestFailure::is_retryable`].
#[derive(Error, Debug)]
pub enum RequestFailure {
    /// No response was received (timeout, connection failure, body read error).
    #[error("transport error: {0}")]
    Transport(#[source] ReqwestError),

    /// The request could not be built (malformed URL, bad header).
    #[error("invalid request: {0}")]
    InvalidRequest(#[source] ReqwestError),

    /// HTTP 429.
    #[error("rate limited (HTTP 429)")]
    RateLimited,

    /// Any 5xx status.
    #[error("server error (HTTP {0})")]
    Server(u16),

    /// Any 4xx status other than 429.
    #[error("client error (HTTP {0})")]
    Client(u16),

    /// Any other status that is not 200 (1xx, other 2xx, 3xx).
    #[error("unexpected status (HTTP {0})")]
    UnexpectedStatus(u16),
}

impl RequestFailure {
    /// Maps a non-200 status code to its failure class.
    pub fn from_status(status: u16) -> Self {
        match status {
            crate::config::HTTP_STATUS_TOO_MANY_REQUESTS => RequestFailure::RateLimited,
            500..=599 => RequestFailure::Server(status),
            400..=499 => RequestFailure::Client(status),
            _ => RequestFailure::UnexpectedStatus(status),
        }
    }

    /// HTTP status carried by the failure, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestFailure::Transport(_) | RequestFailure::InvalidRequest(_) => None,
            RequestFailure::RateLimited => Some(crate::config::HTTP_STATUS_TOO_MANY_REQUESTS),
            RequestFailure::Server(s)
            | RequestFailure::Client(s)
            | RequestFailure::UnexpectedStatus(s) => Some(*s),
        }
    }

    /// Transport errors, 429 and 5xx are transient; everything else is permanent.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RequestFailure::Transport(_) | RequestFailure::RateLimited | RequestFailure::Server(_)
        )
    }

    /// Whether the failure says anything about the remote site's health.
    ///
    /// A request that could not be built never left the process, so it must
    /// not push the circuit breaker towards open.
    pub fn counts_toward_breaker(&self) -> bool {
        !matches!(self, RequestFailure::InvalidRequest(_))
    }
}

/// Error returned by a logical fetch (all attempts included).
#[derive(Error, Debug)]
pub enum FetchError {
    /// The session's circuit breaker is open; no request was sent.
    #[error("circuit breaker is open, request to {url} blocked")]
    CircuitOpen { url: String },

    /// Retries exhausted or a non-retryable failure was hit.
    #[error("failed to fetch {url} after {attempts} attempt(s): {source}")]
    Failed {
        url: String,
        attempts: u32,
        #[source]
        source: RequestFailure,
    },
}

impl FetchError {
    /// The last attempt's failure, if any request was made.
    pub fn last_failure(&self) -> Option<&RequestFailure> {
        match self {
            FetchError::CircuitOpen { .. } => None,
            FetchError::Failed { source, .. } => Some(source),
        }
    }
}

/// Error types for the external record store.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// SQL execution error.
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    /// The store refused the write.
    #[error("write rejected: {0}")]
    Rejected(String),
}

/// Per-entity failure inside an ingestion run. Counted, never propagated.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Failure to start walking a listing.
#[derive(Error, Debug)]
pub enum WalkError {
    /// The listing base URL could not be parsed.
    #[error("invalid listing URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Types of errors that can occur during a scraping run.
///
/// This enum categorizes failure conditions for tracking and reporting purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // Transport errors
    HttpRequestTimeoutError,
    HttpRequestConnectError,
    HttpRequestBodyError,
    HttpRequestOtherError,
    // Status errors
    HttpRequestTooManyRequests,
    HttpRequestNotFound,
    HttpRequestClientError,
    HttpRequestServerError,
    HttpRequestUnexpectedStatus,
    // Session guard
    CircuitOpen,
    // Persistence
    StorageError,
}

/// Types of warnings that can occur during extraction.
///
/// Warnings indicate data that degraded to a default without failing the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WarningType {
    MissingName,
    MissingRecord,
    DefaultedStatField,
    InvalidRound,
}

/// Informational events worth tracking during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    RetryScheduled,
    ListingPageFailed,
    FightHistoryRows,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::HttpRequestBodyError => "HTTP request body error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
            ErrorType::HttpRequestTooManyRequests => "Too many requests (429)",
            ErrorType::HttpRequestNotFound => "Not Found (404)",
            ErrorType::HttpRequestClientError => "Client error (4xx)",
            ErrorType::HttpRequestServerError => "Server error (5xx)",
            ErrorType::HttpRequestUnexpectedStatus => "Unexpected status",
            ErrorType::CircuitOpen => "Circuit breaker open",
            ErrorType::StorageError => "Storage error",
        }
    }
}

impl WarningType {
    /// Returns a human-readable string representation of the warning type.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::MissingName => "Missing fighter name",
            WarningType::MissingRecord => "Missing win/loss/draw record",
            WarningType::DefaultedStatField => "Stat field defaulted to 0",
            WarningType::InvalidRound => "Non-numeric fight round",
        }
    }
}

impl InfoType {
    /// Returns a human-readable string representation of the info type.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::RetryScheduled => "Retry scheduled",
            InfoType::ListingPageFailed => "Listing page failed",
            InfoType::FightHistoryRows => "Fight history rows extracted",
        }
    }
}
