//! Paginated listing traversal.
//!
//! The walker fetches listing pages one after another, collecting detail-page
//! links until the listing is exhausted, the "next" control disappears, too
//! many consecutive pages fail, or the session's circuit breaker opens.

use std::collections::HashSet;

use log::{debug, info, warn};
use tokio::time::sleep;
use url::Url;

use crate::error_handling::{FetchError, InfoType, WalkError};
use crate::fetch::{backoff_delay, RateLimitedFetcher, ScraperSession};
use crate::parse::ListingPageParser;

const PAGE_QUERY_PARAM: &str = "page";

/// Walks a paginated listing and returns its detail-page links.
pub struct PaginationWalker<'a> {
    fetcher: &'a RateLimitedFetcher,
    parser: &'a dyn ListingPageParser,
}

impl<'a> PaginationWalker<'a> {
    pub fn new(fetcher: &'a RateLimitedFetcher, parser: &'a dyn ListingPageParser) -> Self {
        PaginationWalker { fetcher, parser }
    }

    /// Collects every detail link reachable from `base_list_url`.
    ///
    /// Page N is the base URL with its `page` query parameter set to N,
    /// starting at 1. Links are absolute, deduplicated, and kept in the order
    /// they were first seen.
    ///
    /// Page failures are soft: the walk retries the same page after a backoff
    /// and gives up after `max_consecutive_page_errors` failures in a row,
    /// returning whatever was collected so far.
    ///
    /// # Errors
    ///
    /// Returns `WalkError::InvalidBaseUrl` if `base_list_url` does not parse.
    /// No request is made in that case.
    pub async fn collect_links(
        &self,
        session: &ScraperSession,
        base_list_url: &str,
    ) -> Result<Vec<String>, WalkError> {
        let base = Url::parse(base_list_url).map_err(|source| WalkError::InvalidBaseUrl {
            url: base_list_url.to_string(),
            source,
        })?;
        let policy = session.policy();

        let mut links = Vec::new();
        let mut seen = HashSet::new();
        let mut page: u32 = 1;
        let mut consecutive_errors: u32 = 0;

        loop {
            if session.is_circuit_open().await {
                warn!("Circuit breaker is open, stopping listing walk at page {}", page);
                break;
            }

            let page_url = page_url(&base, page);
            info!("Fetching listing page {}...", page);

            let html = match self.fetcher.fetch(session, page_url.as_str()).await {
                Ok(html) => html,
                Err(FetchError::CircuitOpen { .. }) => {
                    warn!("Circuit breaker opened, stopping listing walk at page {}", page);
                    break;
                }
                Err(e) => {
                    consecutive_errors += 1;
                    session.stats().increment_info(InfoType::ListingPageFailed);
                    warn!("Error on listing page {}: {}", page, e);

                    if consecutive_errors >= policy.max_consecutive_page_errors {
                        warn!(
                            "Stopping listing walk after {} consecutive page errors",
                            consecutive_errors
                        );
                        break;
                    }
                    sleep(backoff_delay(policy, consecutive_errors, None)).await;
                    continue;
                }
            };
            consecutive_errors = 0;

            let listing = self.parser.parse_listing(&html, &page_url);
            if listing.links.is_empty() {
                info!("No detail links on page {}, end of listing", page);
                break;
            }

            let before = links.len();
            for link in listing.links {
                if seen.insert(link.clone()) {
                    links.push(link);
                }
            }
            debug!(
                "Page {} yielded {} new link(s), {} total",
                page,
                links.len() - before,
                links.len()
            );

            if !listing.has_next {
                info!("No next page after page {}", page);
                break;
            }

            page += 1;
            sleep(policy.initial_delay).await;
        }

        info!("Collected {} detail link(s)", links.len());
        Ok(links)
    }
}

/// `base` with its `page` query parameter set to `page` (appended if absent).
pub fn page_url(base: &Url, page: u32) -> Url {
    let pairs: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != PAGE_QUERY_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair(PAGE_QUERY_PARAM, &page.to_string());
    url
}
