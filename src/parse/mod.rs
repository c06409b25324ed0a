//! HTML parsing and data extraction.
//!
//! This module turns fetched markup into typed records:
//! - Listing pages: detail-page links and whether a next page exists
//! - Detail pages: fighter profile, career stat block, fight history
//!
//! Extraction never fails. Missing or malformed fields fall back to defaults
//! and are reported in [`ParsedDetail::defaulted_fields`].
//!
//! All parsing is done using CSS selectors via the `scraper` crate.

mod fields;
mod history;
mod ufcstats;

use url::Url;

use crate::models::{FightHistoryEntry, FightStatsRecord, FighterRecord};

// Re-export public API
pub use fields::{
    labeled_value, parse_length_cm, parse_number, parse_percentage, parse_record, split_name,
    Extracted,
};
pub use history::{event_date, extract_history, parse_round, HistoryRows};
pub use ufcstats::UfcStatsParser;

/// Everything extracted from one detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDetail {
    pub fighter: FighterRecord,
    pub stats: FightStatsRecord,
    pub history: Vec<FightHistoryEntry>,
    /// History rows whose round was not a positive integer
    pub invalid_rounds: usize,
    /// Fields that fell back to their default value
    pub defaulted_fields: Vec<&'static str>,
}

impl ParsedDetail {
    pub fn is_defaulted(&self, field: &str) -> bool {
        self.defaulted_fields.contains(&field)
    }
}

/// Links found on one listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Absolute detail-page URLs in document order
    pub links: Vec<String>,
    /// An enabled "next page" control is present
    pub has_next: bool,
}

/// Extracts a detail page. Implementations must be pure.
pub trait DetailPageParser: Send + Sync {
    fn parse_detail(&self, html: &str) -> ParsedDetail;
}

/// Extracts detail links from a listing page, resolved against `page_url`.
pub trait ListingPageParser: Send + Sync {
    fn parse_listing(&self, html: &str, page_url: &Url) -> ListingPage;
}
