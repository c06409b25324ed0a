//! Parser for ufcstats.com listing and fighter-detail pages.

use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use scraper::{Html, Selector};
use url::Url;

use super::fields::{
    first_text, labeled_value, non_empty, parse_length_cm, parse_number, parse_percentage,
    parse_record, split_name, Extracted,
};
use super::history::extract_history;
use super::{DetailPageParser, ListingPage, ListingPageParser, ParsedDetail};
use crate::config::DETAIL_LINK_MARKER;
use crate::models::{FightStatsRecord, FighterRecord};
use crate::utils::parse_selector_with_fallback;

const NAME_SELECTOR_STR: &str = ".b-content__title-highlight";
const RECORD_SELECTOR_STR: &str = ".b-content__title-record";
const NICKNAME_SELECTOR_STR: &str = ".b-content__Nickname";
const LISTING_LINK_SELECTOR_STR: &str = "td.b-statistics__table-col a[href]";
const NEXT_PAGE_SELECTOR_STR: &str =
    ".b-statistics__pagination-item_next:not(.b-statistics__pagination-item_disabled)";

static NAME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback(NAME_SELECTOR_STR, "NAME_SELECTOR"));
static RECORD_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback(RECORD_SELECTOR_STR, "RECORD_SELECTOR"));
static NICKNAME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback(NICKNAME_SELECTOR_STR, "NICKNAME_SELECTOR"));
static LISTING_LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback(LISTING_LINK_SELECTOR_STR, "LISTING_LINK_SELECTOR"));
static NEXT_PAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback(NEXT_PAGE_SELECTOR_STR, "NEXT_PAGE_SELECTOR"));

const HEIGHT_LABELS: &[&str] = &["Height:"];
const REACH_LABELS: &[&str] = &["Reach:"];
const STANCE_LABELS: &[&str] = &["Stance:"];
const WEIGHT_CLASS_LABELS: &[&str] = &["Weight class:", "Division:"];

/// Stat-block fields: (field name, label aliases, is a percentage).
const STAT_FIELDS: [(&str, &[&str], bool); 8] = [
    ("strikes_per_min", &["Strikes Landed per Min.", "SLpM:"], false),
    ("strike_accuracy", &["Striking Accuracy", "Str. Acc.:"], true),
    (
        "strikes_absorbed_per_min",
        &["Strikes Absorbed per Min.", "SApM:"],
        false,
    ),
    ("strike_defense", &["Strike Defence", "Str. Def:"], true),
    ("takedown_avg", &["Takedowns Average/15 min.", "TD Avg.:"], false),
    ("takedown_accuracy", &["Takedown Accuracy", "TD Acc.:"], true),
    ("takedown_defense", &["Takedown Defense", "TD Def.:"], true),
    (
        "submission_avg",
        &["Submission Average/15 min.", "Sub. Avg.:"],
        false,
    ),
];

/// Extracts fighters from ufcstats.com markup.
///
/// History rows without a date in the event cell are stamped with the scrape
/// date, which defaults to today.
#[derive(Debug, Clone)]
pub struct UfcStatsParser {
    scrape_date: NaiveDate,
}

impl UfcStatsParser {
    pub fn new() -> Self {
        Self::with_scrape_date(Local::now().date_naive())
    }

    pub fn with_scrape_date(scrape_date: NaiveDate) -> Self {
        UfcStatsParser { scrape_date }
    }

    fn extract_stats(document: &Html, defaulted_fields: &mut Vec<&'static str>) -> FightStatsRecord {
        let mut values = [0.0_f64; STAT_FIELDS.len()];
        for (slot, (field, labels, is_percentage)) in values.iter_mut().zip(STAT_FIELDS) {
            let raw = labeled_value(document, labels);
            let extracted: Extracted<f64> = if is_percentage {
                parse_percentage(raw.as_deref())
            } else {
                parse_number(raw.as_deref())
            };
            if extracted.defaulted {
                defaulted_fields.push(field);
            }
            *slot = extracted.value;
        }

        let [
            strikes_per_min,
            strike_accuracy,
            strikes_absorbed_per_min,
            strike_defense,
            takedown_avg,
            takedown_accuracy,
            takedown_defense,
            submission_avg,
        ] = values;
        FightStatsRecord {
            strikes_per_min,
            strike_accuracy,
            strikes_absorbed_per_min,
            strike_defense,
            takedown_avg,
            takedown_accuracy,
            takedown_defense,
            submission_avg,
        }
    }
}

impl Default for UfcStatsParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailPageParser for UfcStatsParser {
    fn parse_detail(&self, html: &str) -> ParsedDetail {
        let document = Html::parse_document(html);
        let mut defaulted_fields = Vec::new();

        let name = first_text(&document, &NAME_SELECTOR);
        if name.is_empty() {
            defaulted_fields.push("name");
        }
        let (first_name, last_name) = split_name(&name);

        let record = parse_record(&first_text(&document, &RECORD_SELECTOR));
        if record.defaulted {
            defaulted_fields.push("record");
        }
        let (wins, losses, draws) = record.value;

        let weight_class = non_empty(labeled_value(&document, WEIGHT_CLASS_LABELS));
        if weight_class.is_none() {
            defaulted_fields.push("weight_class");
        }

        let fighter = FighterRecord {
            first_name,
            last_name,
            nickname: non_empty(Some(first_text(&document, &NICKNAME_SELECTOR))),
            height_cm: parse_length_cm(labeled_value(&document, HEIGHT_LABELS).as_deref()),
            reach_cm: parse_length_cm(labeled_value(&document, REACH_LABELS).as_deref()),
            stance: non_empty(labeled_value(&document, STANCE_LABELS)),
            weight_class: weight_class.unwrap_or_default(),
            wins,
            losses,
            draws,
        };

        let stats = Self::extract_stats(&document, &mut defaulted_fields);
        let history = extract_history(&document, self.scrape_date);

        ParsedDetail {
            fighter,
            stats,
            history: history.entries,
            invalid_rounds: history.invalid_rounds,
            defaulted_fields,
        }
    }
}

impl ListingPageParser for UfcStatsParser {
    fn parse_listing(&self, html: &str, page_url: &Url) -> ListingPage {
        let document = Html::parse_document(html);

        let links = document
            .select(&LISTING_LINK_SELECTOR)
            .filter_map(|anchor| anchor.value().attr("href"))
            .filter(|href| href.contains(DETAIL_LINK_MARKER))
            .filter_map(|href| page_url.join(href.trim()).ok())
            .map(String::from)
            .collect();

        let has_next = document.select(&NEXT_PAGE_SELECTOR).next().is_some();

        ListingPage { links, has_next }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A typo here would silently degrade to "nothing matches"
    #[test]
    fn test_site_selectors_parse_without_fallback() {
        for selector in [
            NAME_SELECTOR_STR,
            RECORD_SELECTOR_STR,
            NICKNAME_SELECTOR_STR,
            LISTING_LINK_SELECTOR_STR,
            NEXT_PAGE_SELECTOR_STR,
        ] {
            assert!(Selector::parse(selector).is_ok(), "{} should parse", selector);
        }
    }
}
