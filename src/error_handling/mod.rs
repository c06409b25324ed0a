//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions (fetch failures, storage, initialization)
//! - Error categorization for run statistics
//! - Processing statistics tracking (errors, warnings, info metrics)
//!
//! Error types are categorized into:
//! - **Errors**: Failures that cost an entity or a listing page
//! - **Warnings**: Extraction fields that fell back to defaults
//! - **Info**: Informational metrics (retries, failed listing pages)

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{
    categorize_fetch_error, categorize_ingest_error, categorize_request_failure,
    update_error_stats,
};
pub use stats::ProcessingStats;
pub use types::{
    DatabaseError, ErrorType, FetchError, InfoType, IngestError, InitializationError,
    RepositoryError, RequestFailure, WalkError, WarningType,
};
