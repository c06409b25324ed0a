//! Fight-history table extraction.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};

use super::fields::element_text;
use crate::models::FightHistoryEntry;
use crate::utils::{compile_regex_unsafe, parse_selector_with_fallback};

const HISTORY_ROW_SELECTOR_STR: &str = ".b-fight-details__table-body tr";
const CELL_SELECTOR_STR: &str = "td";

static HISTORY_ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback(HISTORY_ROW_SELECTOR_STR, "HISTORY_ROW_SELECTOR"));
static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback(CELL_SELECTOR_STR, "CELL_SELECTOR"));

// "Jul. 08, 2023" / "Jul 08, 2023" / "July 8, 2023"
static EVENT_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(
        r"\b([A-Z][a-z]{2})[a-z]*\.?\s+(\d{1,2}),\s+(\d{4})\b",
        "EVENT_DATE_RE",
    )
});

/// Result of reading the history table.
#[derive(Debug, Default)]
pub struct HistoryRows {
    pub entries: Vec<FightHistoryEntry>,
    /// Rows whose round cell was not a positive integer
    pub invalid_rounds: usize,
}

/// Reads every non-empty history row.
///
/// Columns map positionally to result, opponent, event, method, round and
/// time. Rows without cells (header rows) or with only blank cells are
/// skipped. `scrape_date` is used when the event cell carries no date.
pub fn extract_history(document: &Html, scrape_date: NaiveDate) -> HistoryRows {
    let mut rows = HistoryRows::default();

    for row in document.select(&HISTORY_ROW_SELECTOR) {
        let cells: Vec<String> = row.select(&CELL_SELECTOR).map(element_text).collect();
        if cells.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let cell = |index: usize| cells.get(index).cloned().unwrap_or_default();
        let round = parse_round(&cell(4));
        if round.is_none() {
            rows.invalid_rounds += 1;
        }
        let event = cell(2);
        let date = event_date(&event).unwrap_or(scrape_date);

        rows.entries.push(FightHistoryEntry {
            result: cell(0),
            opponent: cell(1),
            event,
            method: cell(3),
            round,
            time: cell(5),
            date,
        });
    }

    rows
}

/// Round number as a positive integer; anything else is `None`.
pub fn parse_round(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|round| *round >= 1)
}

/// First calendar date mentioned in an event cell, if any.
pub fn event_date(text: &str) -> Option<NaiveDate> {
    let caps = EVENT_DATE_RE.captures(text)?;
    let normalized = format!("{} {} {}", &caps[1], &caps[2], &caps[3]);
    NaiveDate::parse_from_str(&normalized, "%b %d %Y").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scrape_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
    }

    #[test]
    fn test_parse_round() {
        assert_eq!(parse_round("3"), Some(3));
        assert_eq!(parse_round(" 1 "), Some(1));
        assert_eq!(parse_round("0"), None);
        assert_eq!(parse_round("--"), None);
        assert_eq!(parse_round(""), None);
        assert_eq!(parse_round("-2"), None);
    }

    #[test]
    fn test_event_date() {
        assert_eq!(
            event_date("UFC 290: Volkanovski vs. Rodriguez Jul. 08, 2023"),
            NaiveDate::from_ymd_opt(2023, 7, 8)
        );
        assert_eq!(
            event_date("UFC Fight Night Sept. 16, 2023"),
            NaiveDate::from_ymd_opt(2023, 9, 16)
        );
        assert_eq!(event_date("UFC 290: Volkanovski vs. Rodriguez"), None);
    }

    #[test]
    fn test_extract_history_skips_header_and_blank_rows() {
        let document = Html::parse_document(
            r#"<table><tbody class="b-fight-details__table-body">
                <tr><th>W/L</th><th>Fighter</th></tr>
                <tr><td> </td><td></td><td></td><td></td><td></td><td></td></tr>
                <tr>
                    <td>win</td><td>Yoel Romero</td>
                    <td>UFC 248: Adesanya vs. Romero Mar. 07, 2020</td>
                    <td>U-DEC</td><td>5</td><td>5:00</td>
                </tr>
                <tr>
                    <td>next</td><td>Alex Pereira</td><td>UFC 305</td>
                    <td></td><td></td><td></td>
                </tr>
            </tbody></table>"#,
        );

        let rows = extract_history(&document, scrape_date());

        assert_eq!(rows.entries.len(), 2);
        assert_eq!(rows.invalid_rounds, 1);

        let first = &rows.entries[0];
        assert_eq!(first.result, "win");
        assert_eq!(first.opponent, "Yoel Romero");
        assert_eq!(first.method, "U-DEC");
        assert_eq!(first.round, Some(5));
        assert_eq!(first.time, "5:00");
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2020, 3, 7).unwrap());

        let second = &rows.entries[1];
        assert_eq!(second.round, None);
        assert_eq!(second.date, scrape_date());
    }

    #[test]
    fn test_extract_history_short_rows_fill_blanks() {
        let document = Html::parse_document(
            r#"<table><tbody class="b-fight-details__table-body">
                <tr><td>loss</td><td>Jon Jones</td></tr>
            </tbody></table>"#,
        );

        let rows = extract_history(&document, scrape_date());

        assert_eq!(rows.entries.len(), 1);
        assert_eq!(rows.entries[0].opponent, "Jon Jones");
        assert_eq!(rows.entries[0].event, "");
        assert_eq!(rows.entries[0].round, None);
    }
}
