//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::*;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Scraper configuration.
///
/// Parsed from the command line (with environment variable fallbacks) by the
/// binary, or constructed programmatically by library users.
///
/// # Examples
///
/// ```no_run
/// use fightstats_scrape::Config;
///
/// let config = Config {
///     max_retries: 3,
///     initial_delay_ms: 500,
///     ..Default::default()
/// };
/// ```
///
/// ```bash
/// # One run against the default listing
/// fightstats_scrape
///
/// # Re-run every 6 hours, storing into a custom database
/// fightstats_scrape --interval-hours 6 --db-path ./fighters.db
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fightstats_scrape",
    about = "Scrapes fighter profiles and statistics into a SQLite database."
)]
pub struct Config {
    /// Listing URL to paginate (its `page` query parameter is rewritten per page)
    #[arg(long, env = "FIGHTSTATS_LIST_URL", default_value = DEFAULT_LIST_URL)]
    pub list_url: String,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    #[arg(long, env = "FIGHTSTATS_DB_PATH", value_parser, default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Maximum simultaneous outbound requests
    #[arg(long, default_value_t = MAX_CONCURRENT_REQUESTS)]
    pub max_concurrent: usize,

    /// Retries after the initial attempt for retryable failures
    #[arg(long, default_value_t = RETRY_MAX_RETRIES)]
    pub max_retries: u32,

    /// Base backoff delay in milliseconds; also the throttle between pages and entities
    #[arg(long, default_value_t = RETRY_INITIAL_DELAY_MS)]
    pub initial_delay_ms: u64,

    /// Upper bound for a single backoff delay in milliseconds
    #[arg(long, default_value_t = RETRY_MAX_DELAY_MS)]
    pub max_delay_ms: u64,

    /// Failures within the reset window that open the circuit breaker
    #[arg(long, default_value_t = CIRCUIT_FAILURE_THRESHOLD)]
    pub failure_threshold: u32,

    /// Circuit breaker reset timeout in seconds
    #[arg(long, default_value_t = CIRCUIT_RESET_TIMEOUT.as_secs())]
    pub reset_timeout_secs: u64,

    /// Poll interval in milliseconds while waiting for a request slot
    #[arg(long, default_value_t = QUEUE_POLL_INTERVAL_MS)]
    pub queue_poll_interval_ms: u64,

    /// Consecutive listing page failures before pagination stops
    #[arg(long, default_value_t = MAX_CONSECUTIVE_PAGE_ERRORS)]
    pub max_consecutive_page_errors: u32,

    /// Repeat the run every N hours instead of exiting after one run
    #[arg(long, env = "FIGHTSTATS_INTERVAL_HOURS")]
    pub interval_hours: Option<u64>,

    /// Keep results in memory instead of writing to the database
    #[arg(long)]
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            list_url: DEFAULT_LIST_URL.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            db_path: PathBuf::from(DB_PATH),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: REQUEST_TIMEOUT_SECS,
            max_concurrent: MAX_CONCURRENT_REQUESTS,
            max_retries: RETRY_MAX_RETRIES,
            initial_delay_ms: RETRY_INITIAL_DELAY_MS,
            max_delay_ms: RETRY_MAX_DELAY_MS,
            failure_threshold: CIRCUIT_FAILURE_THRESHOLD,
            reset_timeout_secs: CIRCUIT_RESET_TIMEOUT.as_secs(),
            queue_poll_interval_ms: QUEUE_POLL_INTERVAL_MS,
            max_consecutive_page_errors: MAX_CONSECUTIVE_PAGE_ERRORS,
            interval_hours: None,
            dry_run: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.timeout_seconds, 45);
        assert_eq!(config.max_concurrent, 2);
        assert_eq!(config.max_retries, 8);
        assert_eq!(config.initial_delay_ms, 3000);
        assert_eq!(config.max_delay_ms, 60_000);
        assert_eq!(config.failure_threshold, 5);
        assert_eq!(config.reset_timeout_secs, 3600);
        assert_eq!(config.max_consecutive_page_errors, 3);
        assert!(config.interval_hours.is_none());
        assert!(!config.dry_run);
        assert_eq!(config.db_path, PathBuf::from("./fightstats.db"));
    }

    #[test]
    fn test_cli_defaults_match_default_impl() {
        let parsed = Config::try_parse_from(["fightstats_scrape"]).expect("defaults should parse");
        let default = Config::default();
        assert_eq!(parsed.max_retries, default.max_retries);
        assert_eq!(parsed.initial_delay_ms, default.initial_delay_ms);
        assert_eq!(parsed.reset_timeout_secs, default.reset_timeout_secs);
        assert_eq!(parsed.user_agent, default.user_agent);
    }

    #[test]
    fn test_cli_overrides() {
        let parsed = Config::try_parse_from([
            "fightstats_scrape",
            "--max-retries",
            "2",
            "--interval-hours",
            "6",
            "--dry-run",
            "--log-format",
            "json",
        ])
        .expect("flags should parse");
        assert_eq!(parsed.max_retries, 2);
        assert_eq!(parsed.interval_hours, Some(6));
        assert!(parsed.dry_run);
        assert!(matches!(parsed.log_format, LogFormat::Json));
    }
}
