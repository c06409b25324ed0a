//! In-memory repository for dry runs and tests.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{validate_fighter, Repository};
use crate::error_handling::RepositoryError;
use crate::models::{FightHistoryEntry, FightStatsRecord, FighterRecord, RunOutcome, StoredFighter};

/// A run as recorded by [`InMemoryRepository`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRun {
    pub id: i64,
    pub kind: String,
    pub outcome: Option<RunOutcome>,
    pub elapsed: Option<Duration>,
}

#[derive(Default)]
struct Tables {
    next_fighter_id: i64,
    fighter_ids: HashMap<(String, String), i64>,
    fighters: HashMap<i64, FighterRecord>,
    stats: HashMap<i64, FightStatsRecord>,
    history: HashMap<i64, Vec<FightHistoryEntry>>,
    runs: Vec<RecordedRun>,
    rejected_names: HashSet<String>,
}

/// Process-local store with the same upsert semantics as the SQLite store.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: Mutex<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later upsert of the fighter named `full_name` fail.
    pub async fn reject_fighter(&self, full_name: &str) {
        self.tables
            .lock()
            .await
            .rejected_names
            .insert(full_name.to_string());
    }

    /// Stored fighters ordered by id.
    pub async fn fighters(&self) -> Vec<StoredFighter> {
        let tables = self.tables.lock().await;
        let mut stored: Vec<StoredFighter> = tables
            .fighters
            .iter()
            .map(|(id, fighter)| StoredFighter {
                id: *id,
                first_name: fighter.first_name.clone(),
                last_name: fighter.last_name.clone(),
            })
            .collect();
        stored.sort_by_key(|fighter| fighter.id);
        stored
    }

    pub async fn fighter(&self, fighter_id: i64) -> Option<FighterRecord> {
        self.tables.lock().await.fighters.get(&fighter_id).cloned()
    }

    pub async fn fight_stats(&self, fighter_id: i64) -> Option<FightStatsRecord> {
        self.tables.lock().await.stats.get(&fighter_id).cloned()
    }

    pub async fn fight_history(&self, fighter_id: i64) -> Vec<FightHistoryEntry> {
        self.tables
            .lock()
            .await
            .history
            .get(&fighter_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn runs(&self) -> Vec<RecordedRun> {
        self.tables.lock().await.runs.clone()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn upsert_fighter(
        &self,
        fighter: &FighterRecord,
    ) -> Result<StoredFighter, RepositoryError> {
        validate_fighter(fighter)?;

        let mut tables = self.tables.lock().await;
        if tables.rejected_names.contains(&fighter.full_name()) {
            return Err(RepositoryError::Rejected(format!(
                "fighter {} rejected",
                fighter.full_name()
            )));
        }

        let key = (fighter.first_name.clone(), fighter.last_name.clone());
        let id = match tables.fighter_ids.get(&key) {
            Some(id) => *id,
            None => {
                tables.next_fighter_id += 1;
                let id = tables.next_fighter_id;
                tables.fighter_ids.insert(key, id);
                id
            }
        };
        tables.fighters.insert(id, fighter.clone());

        Ok(StoredFighter {
            id,
            first_name: fighter.first_name.clone(),
            last_name: fighter.last_name.clone(),
        })
    }

    async fn upsert_fight_stats(
        &self,
        fighter_id: i64,
        stats: &FightStatsRecord,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().await;
        if !tables.fighters.contains_key(&fighter_id) {
            return Err(RepositoryError::Rejected(format!(
                "unknown fighter id {fighter_id}"
            )));
        }
        tables.stats.insert(fighter_id, stats.clone());
        Ok(())
    }

    async fn replace_fight_history(
        &self,
        fighter_id: i64,
        entries: &[FightHistoryEntry],
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().await;
        if !tables.fighters.contains_key(&fighter_id) {
            return Err(RepositoryError::Rejected(format!(
                "unknown fighter id {fighter_id}"
            )));
        }
        tables.history.insert(fighter_id, entries.to_vec());
        Ok(())
    }

    async fn start_run(&self, kind: &str) -> Result<i64, RepositoryError> {
        let mut tables = self.tables.lock().await;
        let id = tables.runs.len() as i64 + 1;
        tables.runs.push(RecordedRun {
            id,
            kind: kind.to_string(),
            outcome: None,
            elapsed: None,
        });
        Ok(id)
    }

    async fn finish_run(
        &self,
        run_id: i64,
        outcome: &RunOutcome,
        elapsed: Duration,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().await;
        let run = tables
            .runs
            .iter_mut()
            .find(|run| run.id == run_id)
            .ok_or_else(|| RepositoryError::Rejected(format!("unknown run id {run_id}")))?;
        run.outcome = Some(outcome.clone());
        run.elapsed = Some(elapsed);
        Ok(())
    }
}
