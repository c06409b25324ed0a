//! fightstats_scrape library: resilient fighter statistics scraping
//!
//! This library walks a paginated fighter listing, fetches every fighter's
//! detail page through a rate-limited, retrying, circuit-breaking HTTP layer,
//! extracts profile, career stats and fight history, and upserts the result
//! into a record store keyed by fighter name.
//!
//! # Example
//!
//! ```no_run
//! use fightstats_scrape::{run_scrape, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     dry_run: true,
//!     ..Default::default()
//! };
//!
//! let outcome = run_scrape(&config).await?;
//! println!("{}", outcome.message);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod config;
pub mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod models;
pub mod parse;
pub mod pipeline;
pub mod storage;
mod utils;
pub mod walker;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use models::RunOutcome;
pub use pipeline::IngestionPipeline;
pub use run::{build_pipeline, run_on_interval, run_scrape};
pub use storage::run_migrations;

// Wiring from configuration to a ready pipeline
mod run {
    use std::future::Future;
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::{Context, Result};
    use log::{info, warn};
    use tokio::time::{interval, MissedTickBehavior};

    use crate::config::Config;
    use crate::fetch::{FetchPolicy, RateLimitedFetcher};
    use crate::initialization::init_client;
    use crate::models::RunOutcome;
    use crate::pipeline::IngestionPipeline;
    use crate::storage::{
        init_db_pool_with_path, run_migrations, InMemoryRepository, Repository, SqliteRepository,
    };

    /// Builds a pipeline from configuration.
    ///
    /// With `dry_run` set the pipeline writes to an in-memory store; otherwise
    /// the SQLite database at `db_path` is opened (created if missing) and
    /// migrated.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The HTTP client cannot be built (e.g. an invalid User-Agent)
    /// - The database cannot be opened or migrated
    pub async fn build_pipeline(config: &Config) -> Result<IngestionPipeline> {
        let client = init_client(config).context("Failed to initialize HTTP client")?;

        let repository: Arc<dyn Repository> = if config.dry_run {
            info!("Dry run: results are kept in memory only");
            Arc::new(InMemoryRepository::new())
        } else {
            let pool = init_db_pool_with_path(&config.db_path)
                .await
                .context("Failed to initialize database pool")?;
            run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            info!("Writing results to {}", config.db_path.display());
            Arc::new(SqliteRepository::new(pool))
        };

        Ok(IngestionPipeline::new(
            RateLimitedFetcher::new(client),
            repository,
            FetchPolicy::from(config),
            config.list_url.clone(),
        ))
    }

    /// Builds a pipeline and performs a single run.
    ///
    /// Setup failures are returned as errors; everything that goes wrong
    /// during the run itself is reported through the [`RunOutcome`].
    pub async fn run_scrape(config: &Config) -> Result<RunOutcome> {
        let pipeline = build_pipeline(config).await?;
        Ok(pipeline.run().await)
    }

    /// Runs the pipeline immediately and then once per `period` until
    /// `shutdown` resolves. Returns the number of runs that finished.
    ///
    /// `shutdown` is raced against both the wait for the next tick and the
    /// run in progress. A run interrupted by shutdown is dropped at its
    /// current await point; its bookkeeping row stays in `started`.
    pub async fn run_on_interval<F>(
        pipeline: &IngestionPipeline,
        period: Duration,
        shutdown: F,
    ) -> usize
    where
        F: Future<Output = ()>,
    {
        // tokio's interval rejects a zero period
        let mut ticker = interval(period.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut completed = 0;
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = &mut shutdown => break,
            }

            tokio::select! {
                outcome = pipeline.run() => {
                    completed += 1;
                    if outcome.success {
                        info!("Scheduled run finished: {}", outcome.message);
                    } else {
                        warn!("Scheduled run failed: {}", outcome.message);
                    }
                }
                _ = &mut shutdown => {
                    warn!("Shutdown requested, abandoning the run in progress");
                    break;
                }
            }
        }

        info!("Scheduler stopped after {} completed run(s)", completed);
        completed
    }
}
