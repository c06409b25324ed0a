//! Processing statistics tracking.
//!
//! Thread-safe counters for errors, extraction warnings, and informational
//! events seen during one scraping run.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::info;
use strum::IntoEnumIterator;

use super::types::{ErrorType, InfoType, WarningType};

/// One atomic counter per variant of a strum-iterable enum.
struct Counters<K: Eq + Hash> {
    counts: HashMap<K, AtomicUsize>,
}

impl<K> Counters<K>
where
    K: IntoEnumIterator + Eq + Hash + Copy + std::fmt::Debug,
{
    fn new() -> Self {
        Counters {
            counts: K::iter().map(|k| (k, AtomicUsize::new(0))).collect(),
        }
    }

    fn increment(&self, key: K) {
        match self.counts.get(&key) {
            Some(counter) => {
                counter.fetch_add(1, Ordering::Relaxed);
            }
            None => log::error!(
                "Counter for {:?} missing from stats map; ProcessingStats was not built via new()",
                key
            ),
        }
    }

    fn get(&self, key: K) -> usize {
        self.counts
            .get(&key)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    fn total(&self) -> usize {
        K::iter().map(|k| self.get(k)).sum()
    }
}

/// Thread-safe processing statistics tracker.
///
/// # Categories
///
/// - **Errors**: failures that cost an entity or a listing page
/// - **Warnings**: fields that degraded to defaults during extraction
/// - **Info**: notable events (retries, failed listing pages)
///
/// Shareable across tasks behind an `Arc`.
pub struct ProcessingStats {
    errors: Counters<ErrorType>,
    warnings: Counters<WarningType>,
    info: Counters<InfoType>,
}

impl ProcessingStats {
    pub fn new() -> Self {
        ProcessingStats {
            errors: Counters::new(),
            warnings: Counters::new(),
            info: Counters::new(),
        }
    }

    pub fn increment_error(&self, error: ErrorType) {
        self.errors.increment(error);
    }

    pub fn increment_warning(&self, warning: WarningType) {
        self.warnings.increment(warning);
    }

    pub fn increment_info(&self, info_type: InfoType) {
        self.info.increment(info_type);
    }

    pub fn get_error_count(&self, error: ErrorType) -> usize {
        self.errors.get(error)
    }

    pub fn get_warning_count(&self, warning: WarningType) -> usize {
        self.warnings.get(warning)
    }

    pub fn get_info_count(&self, info_type: InfoType) -> usize {
        self.info.get(info_type)
    }

    pub fn total_errors(&self) -> usize {
        self.errors.total()
    }

    pub fn total_warnings(&self) -> usize {
        self.warnings.total()
    }

    pub fn total_info(&self) -> usize {
        self.info.total()
    }

    /// Logs every non-zero counter, grouped by category.
    pub fn log_summary(&self) {
        if self.total_errors() > 0 {
            info!("Error counts ({} total):", self.total_errors());
            for error in ErrorType::iter() {
                let count = self.get_error_count(error);
                if count > 0 {
                    info!("   {}: {}", error.as_str(), count);
                }
            }
        }
        if self.total_warnings() > 0 {
            info!("Extraction warnings ({} total):", self.total_warnings());
            for warning in WarningType::iter() {
                let count = self.get_warning_count(warning);
                if count > 0 {
                    info!("   {}: {}", warning.as_str(), count);
                }
            }
        }
        for info_type in InfoType::iter() {
            let count = self.get_info_count(info_type);
            if count > 0 {
                info!("   {}: {}", info_type.as_str(), count);
            }
        }
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}
