//! Shared helpers for HTML extraction.
//!
//! This module provides:
//! - CSS selector parsing utilities
//! - Static regex compilation

mod selector;

pub use selector::{compile_regex_unsafe, parse_selector_with_fallback};
