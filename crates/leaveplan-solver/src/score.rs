//! Plan scoring
//!
//! Two whole-plan models plus the per-day heuristic the greedy search ranks
//! workdays with.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use leaveplan_core::DayRecord;
use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::segments::{day_index, inclusive_runs, longest_inclusive_run};

/// How candidate plans are ranked
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringModel {
    /// Days off per leave day spent, in percent
    #[default]
    Efficiency,
    /// Additive bonus model favouring long runs and holiday adjacency
    Weighted,
}

impl ScoringModel {
    pub fn score(self, leave: &BTreeSet<NaiveDate>, days: &[DayRecord], requested: u32) -> f64 {
        match self {
            ScoringModel::Efficiency => efficiency_score(leave, days, requested),
            ScoringModel::Weighted => weighted_score(leave, days),
        }
    }
}

impl std::fmt::Display for ScoringModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringModel::Efficiency => write!(f, "efficiency"),
            ScoringModel::Weighted => write!(f, "weighted"),
        }
    }
}

/// Longest inclusive run touching the plan / requested days × 100
pub fn efficiency_score(leave: &BTreeSet<NaiveDate>, days: &[DayRecord], requested: u32) -> f64 {
    if requested == 0 {
        return 0.0;
    }
    f64::from(longest_inclusive_run(leave, days)) / f64::from(requested) * 100.0
}

const BASE_PER_DAY: f64 = 10.0;
const RUN_FACTOR: f64 = 3.0;
const HOLIDAY_NEIGHBOUR: f64 = 25.0;
const WEEKEND_NEIGHBOUR: f64 = 15.0;
const LONG_RUN_BONUS: f64 = 50.0; // run of 5+
const EXTRA_LONG_RUN_BONUS: f64 = 100.0; // run of 7+

/// Bonus model: per-day base, superlinear run reward, neighbour bonuses
pub fn weighted_score(leave: &BTreeSet<NaiveDate>, days: &[DayRecord]) -> f64 {
    let mut score = leave.len() as f64 * BASE_PER_DAY;

    let runs = inclusive_runs(leave, days);
    score += runs
        .iter()
        .map(|run| f64::from(run.length).powf(1.5) * RUN_FACTOR)
        .sum::<f64>();

    for date in leave {
        let Some(idx) = day_index(days, *date) else {
            continue;
        };
        let neighbours = [idx.checked_sub(1), Some(idx + 1)];
        for day in neighbours.into_iter().flatten().filter_map(|i| days.get(i)) {
            if day.is_holiday {
                score += HOLIDAY_NEIGHBOUR;
            } else if day.is_weekend {
                score += WEEKEND_NEIGHBOUR;
            }
        }
    }

    let longest = runs.iter().map(|run| run.length).max().unwrap_or(0);
    if longest >= 5 {
        score += LONG_RUN_BONUS;
    }
    if longest >= 7 {
        score += EXTRA_LONG_RUN_BONUS;
    }

    score
}

/// Greedy ranking of a single workday by the days off around it
///
/// Each non-working day within the window adds its weight divided by the
/// distance. Make-up workdays get a flat bonus on top.
pub fn proximity_score(days: &[DayRecord], idx: usize, config: &PlannerConfig) -> f64 {
    let mut score = 0.0;
    if days[idx].is_makeup_workday() {
        score += config.makeup_bonus;
    }

    for distance in 1..=config.proximity_window {
        let neighbours = [idx.checked_sub(distance), Some(idx + distance)];
        for day in neighbours.into_iter().flatten().filter_map(|i| days.get(i)) {
            if !day.is_non_working() {
                continue;
            }
            let weight = if day.is_holiday {
                config.holiday_weight
            } else {
                config.weekend_weight
            };
            score += weight / distance as f64;
        }
    }

    score
}
