//! Field-level extraction helpers.
//!
//! Every numeric helper returns an [`Extracted`] value: the parsed number, or
//! the documented default together with `defaulted = true`. Nothing here
//! fails; malformed markup degrades to defaults.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::utils::{compile_regex_unsafe, parse_selector_with_fallback};

const LIST_ITEM_SELECTOR_STR: &str = "li.b-list__box-list-item";

static LIST_ITEM_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback(LIST_ITEM_SELECTOR_STR, "LIST_ITEM_SELECTOR"));

static LEADING_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)", "LEADING_NUMBER_RE")
});
static DIGIT_GROUP_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"\d+", "DIGIT_GROUP_RE"));
static FEET_INCHES_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(r#"^(\d+)\s*'\s*(\d+(?:\.\d+)?)?\s*"?$"#, "FEET_INCHES_RE")
});
static INCHES_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r#"^(\d+(?:\.\d+)?)\s*(?:"|in\.?)$"#, "INCHES_RE"));
static CENTIMETRES_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"^(\d+(?:\.\d+)?)\s*(?:cm)?$", "CENTIMETRES_RE"));

const CM_PER_INCH: f64 = 2.54;

/// A value pulled out of markup, flagged when it fell back to a default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extracted<T> {
    pub value: T,
    pub defaulted: bool,
}

impl<T> Extracted<T> {
    pub fn found(value: T) -> Self {
        Extracted {
            value,
            defaulted: false,
        }
    }

    pub fn defaulted(value: T) -> Self {
        Extracted {
            value,
            defaulted: true,
        }
    }
}

/// Collapses runs of whitespace (including newlines) to single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-collapsed text content of an element.
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Text of the first element matching `selector`, or an empty string.
pub fn first_text(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

/// Looks up a labelled list item (`<li>Label: value</li>`) and returns the
/// text after the label.
///
/// Labels are matched case-insensitively as a prefix of the item text; the
/// first label alias that matches any item wins.
pub fn labeled_value(document: &Html, labels: &[&str]) -> Option<String> {
    let items: Vec<String> = document
        .select(&LIST_ITEM_SELECTOR)
        .map(element_text)
        .collect();

    labels.iter().find_map(|label| {
        let label_lower = label.to_lowercase();
        items.iter().find_map(|text| {
            if text.to_lowercase().starts_with(&label_lower) {
                text.get(label.len()..).map(|rest| rest.trim().to_string())
            } else {
                None
            }
        })
    })
}

/// Parses the leading number of `raw` ("4.50", "12 wins"); 0 when absent.
pub fn parse_number(raw: Option<&str>) -> Extracted<f64> {
    let Some(text) = raw.map(str::trim) else {
        return Extracted::defaulted(0.0);
    };
    LEADING_NUMBER_RE
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .map(Extracted::found)
        .unwrap_or_else(|| Extracted::defaulted(0.0))
}

/// Parses a percentage ("47%") into a fraction (0.47); 0 when absent.
pub fn parse_percentage(raw: Option<&str>) -> Extracted<f64> {
    let stripped = raw.map(|text| text.trim().trim_end_matches('%').trim());
    let number = parse_number(stripped);
    Extracted {
        value: number.value / 100.0,
        defaulted: number.defaulted,
    }
}

/// Reads wins/losses/draws from a record blob ("Record: 22-6-0").
///
/// The first three digit groups are used; with fewer than three groups all
/// three counts default to 0.
pub fn parse_record(text: &str) -> Extracted<(u32, u32, u32)> {
    let groups: Vec<u32> = DIGIT_GROUP_RE
        .find_iter(text)
        .take(3)
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .collect();

    match groups.as_slice() {
        [wins, losses, draws] => Extracted::found((*wins, *losses, *draws)),
        _ => Extracted::defaulted((0, 0, 0)),
    }
}

/// Splits a display name: first token is the first name, the rest is the
/// last name. Single-token names leave the last name empty.
pub fn split_name(full_name: &str) -> (String, String) {
    let mut tokens = full_name.split_whitespace();
    let first = tokens.next().unwrap_or_default().to_string();
    let last = tokens.collect::<Vec<_>>().join(" ");
    (first, last)
}

/// Converts a height or reach value to whole centimetres.
///
/// Accepts `5' 11"`, `6'`, `74"`, `74 in`, `180`, `180 cm`. Placeholders such
/// as `--` and anything unrecognised give `None`.
pub fn parse_length_cm(raw: Option<&str>) -> Option<u32> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }

    let centimetres = if let Some(caps) = FEET_INCHES_RE.captures(text) {
        let feet: f64 = caps.get(1)?.as_str().parse().ok()?;
        let inches: f64 = caps
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0.0);
        (feet * 12.0 + inches) * CM_PER_INCH
    } else if let Some(caps) = INCHES_RE.captures(text) {
        let inches: f64 = caps.get(1)?.as_str().parse().ok()?;
        inches * CM_PER_INCH
    } else if let Some(caps) = CENTIMETRES_RE.captures(text) {
        caps.get(1)?.as_str().parse().ok()?
    } else {
        return None;
    };

    (centimetres > 0.0).then(|| centimetres.round() as u32)
}

/// Non-empty trimmed text, or `None`. Placeholders (`--`) count as empty.
pub fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty() && text != "--")
}
