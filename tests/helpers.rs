// Shared test helpers: database setup, session policies and HTML builders.
//
// Each integration test binary pulls this in with `mod helpers;`, so not every
// helper is used everywhere.

#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use sqlx::SqlitePool;

use fightstats_scrape::fetch::{FetchPolicy, RateLimitedFetcher, ScraperSession};
use fightstats_scrape::run_migrations;

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Opens (creating if needed) and migrates a file-backed test database.
pub async fn create_test_pool_with_path(db_path: &Path) -> SqlitePool {
    let pool = fightstats_scrape::storage::init_db_pool_with_path(db_path)
        .await
        .expect("Failed to create test database");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Fast policy for tests: millisecond delays, two retries, breaker at five.
pub fn test_policy() -> FetchPolicy {
    FetchPolicy {
        max_retries: 2,
        initial_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(50),
        jitter_ratio: 0.3,
        failure_threshold: 5,
        reset_timeout: Duration::from_secs(3600),
        max_concurrent: 2,
        queue_poll_interval: Duration::from_millis(5),
        max_consecutive_page_errors: 3,
    }
}

pub fn test_session() -> ScraperSession {
    ScraperSession::new(test_policy())
}

pub fn test_fetcher() -> RateLimitedFetcher {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .user_agent("fightstats_scrape_test/1.0")
        .build()
        .expect("Failed to build test client");
    RateLimitedFetcher::new(client)
}

/// Path of the listing endpoint served by mock servers.
pub const LISTING_PATH: &str = "/statistics/fighters/search";

/// Listing URL (page 1) on a mock server.
pub fn listing_url(server_uri: &str) -> String {
    format!("{}{}?char=&page=1", server_uri, LISTING_PATH)
}

/// A listing page linking to `detail_paths`, with an enabled or disabled
/// "next" control.
pub fn listing_page_html(detail_paths: &[&str], has_next: bool) -> String {
    let rows: String = detail_paths
        .iter()
        .map(|path| {
            format!(
                r#"<tr class="b-statistics__table-row">
                    <td class="b-statistics__table-col"><a href="{path}" class="b-link">First</a></td>
                    <td class="b-statistics__table-col"><a href="{path}" class="b-link">Last</a></td>
                </tr>"#
            )
        })
        .collect();
    let next_class = if has_next {
        "b-statistics__pagination-item_next"
    } else {
        "b-statistics__pagination-item_next b-statistics__pagination-item_disabled"
    };
    format!(
        r##"<html><body>
            <table class="b-statistics__table"><tbody>{rows}</tbody></table>
            <ul><li class="{next_class}"><a href="#">Next</a></li></ul>
        </body></html>"##
    )
}

/// A minimal fighter detail page.
pub fn detail_page_html(full_name: &str, wins: u32, losses: u32) -> String {
    format!(
        r#"<html><body>
            <span class="b-content__title-highlight">{full_name}</span>
            <span class="b-content__title-record">Record: {wins}-{losses}-0</span>
            <ul>
                <li class="b-list__box-list-item"><i>Height:</i> 5' 11"</li>
                <li class="b-list__box-list-item"><i>Weight class:</i> Lightweight</li>
                <li class="b-list__box-list-item"><i>SLpM:</i> 4.20</li>
                <li class="b-list__box-list-item"><i>Str. Acc.:</i> 50%</li>
            </ul>
            <table><tbody class="b-fight-details__table-body">
                <tr>
                    <td>win</td><td>Someone Else</td><td>UFC 300 Apr. 13, 2024</td>
                    <td>SUB</td><td>1</td><td>2:05</td>
                </tr>
                <tr>
                    <td>loss</td><td>Another One</td><td>UFC 299 Mar. 09, 2024</td>
                    <td>KO/TKO</td><td>3</td><td>0:45</td>
                </tr>
            </tbody></table>
        </body></html>"#
    )
}
