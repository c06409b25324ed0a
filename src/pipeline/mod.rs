//! Ingestion pipeline: listing walk, then fetch, extract and upsert per fighter.
//!
//! A run never fails with an error. Per-fighter failures are logged, counted
//! and skipped; only a listing that cannot be walked at all yields an
//! unsuccessful [`RunOutcome`]. An open circuit breaker stops the loop and the
//! outcome reports partial completion.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, error, info, warn};
use tokio::time::sleep;

use crate::config::LOGGING_INTERVAL;
use crate::error_handling::{update_error_stats, IngestError, InfoType, WarningType};
use crate::fetch::{FetchPolicy, RateLimitedFetcher, ScraperSession};
use crate::models::{RunOutcome, StoredFighter};
use crate::parse::{DetailPageParser, ListingPageParser, ParsedDetail, UfcStatsParser};
use crate::storage::{Repository, FIGHTER_RUN_KIND};
use crate::walker::PaginationWalker;

const RECORD_FIELD: &str = "record";
const NAME_FIELD: &str = "name";
const WEIGHT_CLASS_FIELD: &str = "weight_class";

/// Drives one ingestion run per call to [`IngestionPipeline::run`].
pub struct IngestionPipeline {
    fetcher: RateLimitedFetcher,
    repository: Arc<dyn Repository>,
    detail_parser: Arc<dyn DetailPageParser>,
    listing_parser: Arc<dyn ListingPageParser>,
    policy: FetchPolicy,
    list_url: String,
}

impl IngestionPipeline {
    /// Builds a pipeline that parses ufcstats.com markup.
    pub fn new(
        fetcher: RateLimitedFetcher,
        repository: Arc<dyn Repository>,
        policy: FetchPolicy,
        list_url: impl Into<String>,
    ) -> Self {
        let parser = Arc::new(UfcStatsParser::new());
        IngestionPipeline {
            fetcher,
            repository,
            detail_parser: parser.clone(),
            listing_parser: parser,
            policy,
            list_url: list_url.into(),
        }
    }

    /// Replaces the site parser used for both listing and detail pages.
    pub fn with_parser<P>(mut self, parser: P) -> Self
    where
        P: DetailPageParser + ListingPageParser + 'static,
    {
        let parser = Arc::new(parser);
        self.detail_parser = parser.clone();
        self.listing_parser = parser;
        self
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// Runs with a fresh session built from the pipeline's policy.
    pub async fn run(&self) -> RunOutcome {
        let session = ScraperSession::new(self.policy.clone());
        self.run_with_session(&session).await
    }

    /// Runs against an existing session, so callers can inspect its breaker,
    /// queue and statistics afterwards.
    ///
    /// Run bookkeeping (`start_run` / `finish_run`) is best effort: failures
    /// are logged and never change the outcome.
    pub async fn run_with_session(&self, session: &ScraperSession) -> RunOutcome {
        let started = Instant::now();
        let run_id = match self.repository.start_run(FIGHTER_RUN_KIND).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("Failed to record run start: {}", e);
                None
            }
        };

        let outcome = self.ingest(session).await;

        if outcome.success {
            info!("{}", outcome.message);
        } else {
            error!("{}", outcome.message);
        }
        session.stats().log_summary();

        if let Some(run_id) = run_id {
            if let Err(e) = self
                .repository
                .finish_run(run_id, &outcome, started.elapsed())
                .await
            {
                warn!("Failed to record outcome of run {}: {}", run_id, e);
            }
        }

        outcome
    }

    async fn ingest(&self, session: &ScraperSession) -> RunOutcome {
        info!("Starting fighter database update...");
        let walker = PaginationWalker::new(&self.fetcher, self.listing_parser.as_ref());
        let links = match walker.collect_links(session, &self.list_url).await {
            Ok(links) => links,
            Err(e) => return RunOutcome::failed(format!("Failed to collect fighter links: {e}")),
        };

        let total = links.len();
        info!("Found {} fighters to process", total);

        let mut successful = 0usize;
        let mut errors = 0usize;

        for (index, link) in links.iter().enumerate() {
            if session.is_circuit_open().await {
                warn!("Circuit breaker is open, pausing processing");
                break;
            }
            if index > 0 {
                sleep(self.policy.initial_delay).await;
            }

            match self.ingest_one(session, link).await {
                Ok(fighter) => {
                    successful += 1;
                    debug!(
                        "Stored {} {} as fighter {}",
                        fighter.first_name, fighter.last_name, fighter.id
                    );
                }
                Err(e) => {
                    errors += 1;
                    update_error_stats(session.stats(), &e);
                    error!("Error processing fighter {}: {}", link, e);
                    if session.is_circuit_open().await {
                        warn!("Circuit breaker is open, pausing fighter processing");
                        break;
                    }
                }
            }

            let processed = successful + errors;
            if processed % LOGGING_INTERVAL == 0 {
                info!("Progress: {}/{} fighters processed", processed, total);
            }
        }

        let stopped_early = session.is_circuit_open().await;
        RunOutcome::completed(total, successful, errors, stopped_early)
    }

    /// Fetch, extract and store one fighter.
    async fn ingest_one(
        &self,
        session: &ScraperSession,
        url: &str,
    ) -> Result<StoredFighter, IngestError> {
        let html = self.fetcher.fetch(session, url).await?;
        let parsed = self.detail_parser.parse_detail(&html);
        record_extraction_warnings(session, &parsed);
        info!("Processing {}...", parsed.fighter.full_name());

        let stored = self.repository.upsert_fighter(&parsed.fighter).await?;
        self.repository
            .upsert_fight_stats(stored.id, &parsed.stats)
            .await?;
        self.repository
            .replace_fight_history(stored.id, &parsed.history)
            .await?;

        Ok(stored)
    }
}

/// Tallies fields that fell back to defaults.
fn record_extraction_warnings(session: &ScraperSession, parsed: &ParsedDetail) {
    let stats = session.stats();
    for field in &parsed.defaulted_fields {
        let warning = match *field {
            NAME_FIELD => WarningType::MissingName,
            RECORD_FIELD => WarningType::MissingRecord,
            WEIGHT_CLASS_FIELD => continue,
            _ => WarningType::DefaultedStatField,
        };
        stats.increment_warning(warning);
    }
    for _ in 0..parsed.invalid_rounds {
        stats.increment_warning(WarningType::InvalidRound);
    }
    for _ in 0..parsed.history.len() {
        stats.increment_info(InfoType::FightHistoryRows);
    }
}
