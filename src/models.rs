//! Records produced by extraction and handed to the repository.

use chrono::NaiveDate;
use serde::Serialize;

/// Normalized fighter profile. Identity is `(first_name, last_name)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FighterRecord {
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    pub height_cm: Option<u32>,
    pub reach_cm: Option<u32>,
    pub stance: Option<String>,
    pub weight_class: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl FighterRecord {
    /// "First Last" as shown on the profile.
    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// Career stat block. Ratios are fractions in `[0, 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FightStatsRecord {
    pub strikes_per_min: f64,
    pub strike_accuracy: f64,
    pub strikes_absorbed_per_min: f64,
    pub strike_defense: f64,
    pub takedown_avg: f64,
    pub takedown_accuracy: f64,
    pub takedown_defense: f64,
    pub submission_avg: f64,
}

/// One row of a fighter's fight history.
#[derive(Debug, Clone, PartialEq)]
pub struct FightHistoryEntry {
    pub result: String,
    pub opponent: String,
    pub event: String,
    pub method: String,
    /// `None` when the round cell is not a positive integer
    pub round: Option<u32>,
    pub time: String,
    pub date: NaiveDate,
}

/// Fighter row as stored, with the identity generated by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFighter {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

/// Terminal summary of one ingestion run.
///
/// Serialized as one JSON object when the binary runs with `--log-format json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    /// `false` only when link collection itself failed
    pub success: bool,
    pub message: String,
    /// Detail links discovered
    pub total: usize,
    /// Links attempted (successes plus errors)
    pub processed: usize,
    pub successful: usize,
    pub errors: usize,
    /// The circuit breaker stopped the run before every link was attempted
    pub stopped_early: bool,
}

impl RunOutcome {
    /// Summary for a run that got as far as the entity loop.
    pub fn completed(
        total: usize,
        successful: usize,
        errors: usize,
        stopped_early: bool,
    ) -> Self {
        let processed = successful + errors;
        let mut message = format!(
            "Processed {}/{} fighters. {} successful, {} errors",
            processed, total, successful, errors
        );
        if stopped_early {
            message.push_str(" (stopped early due to circuit breaker)");
        }
        RunOutcome {
            success: true,
            message,
            total,
            processed,
            successful,
            errors,
            stopped_early,
        }
    }

    /// Summary for a run whose link collection failed.
    pub fn failed(message: impl Into<String>) -> Self {
        RunOutcome {
            success: false,
            message: message.into(),
            total: 0,
            processed: 0,
            successful: 0,
            errors: 0,
            stopped_early: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let mut fighter = FighterRecord {
            first_name: "Israel".into(),
            last_name: "Adesanya".into(),
            nickname: None,
            height_cm: None,
            reach_cm: None,
            stance: None,
            weight_class: String::new(),
            wins: 0,
            losses: 0,
            draws: 0,
        };
        assert_eq!(fighter.full_name(), "Israel Adesanya");
        fighter.last_name.clear();
        assert_eq!(fighter.full_name(), "Israel");
    }

    #[test]
    fn test_run_outcome_message() {
        let outcome = RunOutcome::completed(3, 2, 1, false);
        assert!(outcome.success);
        assert_eq!(outcome.processed, 3);
        assert_eq!(
            outcome.message,
            "Processed 3/3 fighters. 2 successful, 1 errors"
        );
    }

    #[test]
    fn test_run_outcome_stopped_early_message() {
        let outcome = RunOutcome::completed(10, 1, 5, true);
        assert_eq!(
            outcome.message,
            "Processed 6/10 fighters. 1 successful, 5 errors (stopped early due to circuit breaker)"
        );
        assert!(outcome.stopped_early);
    }

    #[test]
    fn test_run_outcome_serializes_all_counters() {
        let outcome = RunOutcome::completed(5, 2, 1, true);
        let json = serde_json::to_value(&outcome).expect("outcome should serialize");

        assert_eq!(json["success"], true);
        assert_eq!(json["total"], 5);
        assert_eq!(json["processed"], 3);
        assert_eq!(json["successful"], 2);
        assert_eq!(json["errors"], 1);
        assert_eq!(json["stopped_early"], true);
        assert_eq!(json["message"], outcome.message.as_str());
    }

    #[test]
    fn test_run_outcome_failed() {
        let outcome = RunOutcome::failed("invalid listing URL");
        assert!(!outcome.success);
        assert_eq!(outcome.total, 0);
    }
}
