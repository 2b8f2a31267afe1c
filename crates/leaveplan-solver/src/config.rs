//! Tunables for classification and search

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::score::ScoringModel;

/// Planner configuration, deserializable from a `[planner]` TOML table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    /// Eligible pools up to this size are searched exhaustively
    pub exhaustive_threshold: usize,
    /// Shortest run of non-working days treated as a long holiday block
    pub long_block_min_len: usize,
    /// Days on either side a workday's greedy score looks at
    pub proximity_window: usize,
    pub holiday_weight: f64,
    pub weekend_weight: f64,
    /// Flat greedy bonus for make-up workdays
    pub makeup_bonus: f64,
    /// Most workdays a bridge between two blocks may take
    pub max_bridge_gap: usize,
    pub scoring: ScoringModel,
    /// Keep at most this many plans (all when unset)
    pub max_plans: Option<usize>,
    /// Per-lookup oracle timeout in milliseconds
    pub oracle_timeout_ms: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            exhaustive_threshold: 20,
            long_block_min_len: 3,
            proximity_window: 3,
            holiday_weight: 10.0,
            weekend_weight: 5.0,
            makeup_bonus: 20.0,
            max_bridge_gap: 3,
            scoring: ScoringModel::Efficiency,
            max_plans: None,
            oracle_timeout_ms: None,
        }
    }
}

impl PlannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scoring(mut self, scoring: ScoringModel) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn max_plans(mut self, max_plans: usize) -> Self {
        self.max_plans = Some(max_plans);
        self
    }

    pub fn exhaustive_threshold(mut self, threshold: usize) -> Self {
        self.exhaustive_threshold = threshold;
        self
    }

    pub fn oracle_timeout(mut self, timeout: Duration) -> Self {
        self.oracle_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn oracle_timeout_duration(&self) -> Option<Duration> {
        self.oracle_timeout_ms.map(Duration::from_millis)
    }
}
