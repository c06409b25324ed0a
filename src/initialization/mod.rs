//! Process-level setup: logging and the shared HTTP client.

mod client;
mod logger;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;
