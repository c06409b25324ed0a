//! SQLite-backed repository.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use log::debug;
use sqlx::{Row, SqlitePool};

use super::{validate_fighter, Repository};
use crate::error_handling::RepositoryError;
use crate::models::{FightHistoryEntry, FightStatsRecord, FighterRecord, RunOutcome, StoredFighter};

const HISTORY_DATE_FORMAT: &str = "%Y-%m-%d";

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Repository over a migrated SQLite pool (see `run_migrations`).
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteRepository { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn upsert_fighter(
        &self,
        fighter: &FighterRecord,
    ) -> Result<StoredFighter, RepositoryError> {
        validate_fighter(fighter)?;

        let row = sqlx::query(
            "INSERT INTO fighters (first_name, last_name, nickname, height_cm, reach_cm, stance,
                                   weight_class, wins, losses, draws, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(first_name, last_name) DO UPDATE SET
                 nickname=excluded.nickname,
                 height_cm=excluded.height_cm,
                 reach_cm=excluded.reach_cm,
                 stance=excluded.stance,
                 weight_class=excluded.weight_class,
                 wins=excluded.wins,
                 losses=excluded.losses,
                 draws=excluded.draws,
                 updated_at=excluded.updated_at
             RETURNING id",
        )
        .bind(&fighter.first_name)
        .bind(&fighter.last_name)
        .bind(&fighter.nickname)
        .bind(fighter.height_cm.map(i64::from))
        .bind(fighter.reach_cm.map(i64::from))
        .bind(&fighter.stance)
        .bind(&fighter.weight_class)
        .bind(i64::from(fighter.wins))
        .bind(i64::from(fighter.losses))
        .bind(i64::from(fighter.draws))
        .bind(now_timestamp())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = row.try_get("id")?;
        debug!("Upserted fighter {} as id {}", fighter.full_name(), id);

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
        sqlx::query(
            "INSERT INTO fight_stats (fighter_id, strikes_per_min, strike_accuracy,
                                      strikes_absorbed_per_min, strike_defense, takedown_avg,
                                      takedown_accuracy, takedown_defense, submission_avg, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(fighter_id) DO UPDATE SET
                 strikes_per_min=excluded.strikes_per_min,
                 strike_accuracy=excluded.strike_accuracy,
                 strikes_absorbed_per_min=excluded.strikes_absorbed_per_min,
                 strike_defense=excluded.strike_defense,
                 takedown_avg=excluded.takedown_avg,
                 takedown_accuracy=excluded.takedown_accuracy,
                 takedown_defense=excluded.takedown_defense,
                 submission_avg=excluded.submission_avg,
                 updated_at=excluded.updated_at",
        )
        .bind(fighter_id)
        .bind(stats.strikes_per_min)
        .bind(stats.strike_accuracy)
        .bind(stats.strikes_absorbed_per_min)
        .bind(stats.strike_defense)
        .bind(stats.takedown_avg)
        .bind(stats.takedown_accuracy)
        .bind(stats.takedown_defense)
        .bind(stats.submission_avg)
        .bind(now_timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn replace_fight_history(
        &self,
        fighter_id: i64,
        entries: &[FightHistoryEntry],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM fight_history WHERE fighter_id = ?")
            .bind(fighter_id)
            .execute(&mut *tx)
            .await?;

        for (position, entry) in entries.iter().enumerate() {
            sqlx::query(
                "INSERT INTO fight_history (fighter_id, position, result, opponent, event, method,
                                            round, time, fight_date)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(fighter_id)
            .bind(position as i64)
            .bind(&entry.result)
            .bind(&entry.opponent)
            .bind(&entry.event)
            .bind(&entry.method)
            .bind(entry.round.map(i64::from))
            .bind(&entry.time)
            .bind(entry.date.format(HISTORY_DATE_FORMAT).to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn start_run(&self, kind: &str) -> Result<i64, RepositoryError> {
        let row = sqlx::query(
            "INSERT INTO scraper_runs (kind, status, started_at)
             VALUES (?, 'started', ?)
             RETURNING id",
        )
        .bind(kind)
        .bind(now_timestamp())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("id")?)
    }

    async fn finish_run(
        &self,
        run_id: i64,
        outcome: &RunOutcome,
        elapsed: Duration,
    ) -> Result<(), RepositoryError> {
        let status = if outcome.success { "completed" } else { "failed" };

        let result = sqlx::query(
            "UPDATE scraper_runs
             SET status = ?, completed_at = ?, duration_seconds = ?, total = ?, processed = ?,
                 successful = ?, errors = ?, stopped_early = ?, message = ?
             WHERE id = ?",
        )
        .bind(status)
        .bind(now_timestamp())
        .bind(elapsed.as_secs_f64())
        .bind(outcome.total as i64)
        .bind(outcome.processed as i64)
        .bind(outcome.successful as i64)
        .bind(outcome.errors as i64)
        .bind(outcome.stopped_early)
        .bind(&outcome.message)
        .bind(run_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Rejected(format!("unknown run id {run_id}")));
        }
        Ok(())
    }
}
