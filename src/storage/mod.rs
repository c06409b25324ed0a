//! Record storage.
//!
//! The pipeline writes through the [`Repository`] trait. Two implementations
//! are provided:
//! - [`SqliteRepository`]: sqlx-backed SQLite store with natural-key upserts
//! - [`InMemoryRepository`]: process-local store for dry runs and tests

mod memory;
mod migrations;
mod pool;
mod sqlite;

use std::time::Duration;

use async_trait::async_trait;

use crate::error_handling::RepositoryError;
use crate::models::{FightHistoryEntry, FightStatsRecord, FighterRecord, RunOutcome, StoredFighter};

pub use memory::{InMemoryRepository, RecordedRun};
pub use migrations::run_migrations;
pub use pool::init_db_pool_with_path;
pub use sqlite::SqliteRepository;

/// Run kind recorded for fighter ingestion runs.
pub const FIGHTER_RUN_KIND: &str = "fighters";

/// Write interface to the external record store.
///
/// Upserts are keyed on natural keys: `(first_name, last_name)` for fighters
/// and the owning fighter id for stat blocks. Running the same write twice
/// leaves the store unchanged.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Inserts or updates a fighter and returns its stored identity.
    async fn upsert_fighter(&self, fighter: &FighterRecord)
        -> Result<StoredFighter, RepositoryError>;

    /// Inserts or updates the stat block owned by `fighter_id`.
    async fn upsert_fight_stats(
        &self,
        fighter_id: i64,
        stats: &FightStatsRecord,
    ) -> Result<(), RepositoryError>;

    /// Replaces the whole fight history of `fighter_id` atomically.
    async fn replace_fight_history(
        &self,
        fighter_id: i64,
        entries: &[FightHistoryEntry],
    ) -> Result<(), RepositoryError>;

    /// Records the start of a run and returns its id.
    async fn start_run(&self, kind: &str) -> Result<i64, RepositoryError>;

    /// Records the outcome of a run started with [`Repository::start_run`].
    async fn finish_run(
        &self,
        run_id: i64,
        outcome: &RunOutcome,
        elapsed: Duration,
    ) -> Result<(), RepositoryError>;
}

/// Rejects fighters that cannot be keyed.
pub(crate) fn validate_fighter(fighter: &FighterRecord) -> Result<(), RepositoryError> {
    if fighter.first_name.trim().is_empty() {
        return Err(RepositoryError::Rejected(
            "fighter has no name".to_string(),
        ));
    }
    Ok(())
}
