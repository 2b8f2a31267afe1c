//! Suggestion facade
//!
//! Classifies the requested range once, runs the selection engine, and turns
//! the surviving candidates into `VacationPlan`s. Infeasible requests,
//! including an inverted range, come back as an empty plan list. Only
//! malformed date strings and cancellation are errors.

use chrono::NaiveDate;
use leaveplan_core::{
    parse_iso_date, DayRecord, HolidayOracle, PlanError, SuggestionResult, SuggestionSummary,
    VacationConstraints, VacationPlan,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::classify::{Classification, Classifier};
use crate::config::PlannerConfig;
use crate::segments::{describe, longest_inclusive_run};
use crate::select::{select, Candidate};

/// Entry point for plan computations over an injected holiday oracle
pub struct VacationPlanner<O> {
    oracle: O,
    config: PlannerConfig,
    cancel: Option<CancellationToken>,
}

impl<O: HolidayOracle> VacationPlanner<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            config: PlannerConfig::default(),
            cancel: None,
        }
    }

    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    /// Abort classification between dates once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    // ========================================================================
    // String entry points
    // ========================================================================

    /// Ranked plans for `requested` leave days in `[start, end]`
    pub async fn compute_plan(
        &self,
        start: &str,
        end: &str,
        requested: u32,
        constraints: Option<&VacationConstraints>,
    ) -> Result<Vec<VacationPlan>, PlanError> {
        let (start, end) = parse_range(start, end)?;
        self.plan_between(start, end, requested, constraints).await
    }

    /// Ranked plans plus range statistics and the constraint echo
    pub async fn compute_suggestions(
        &self,
        start: &str,
        end: &str,
        requested: u32,
        constraints: Option<&VacationConstraints>,
    ) -> Result<SuggestionResult, PlanError> {
        let (start, end) = parse_range(start, end)?;
        self.suggest_between(start, end, requested, constraints).await
    }

    // ========================================================================
    // Typed entry points
    // ========================================================================

    pub async fn plan_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        requested: u32,
        constraints: Option<&VacationConstraints>,
    ) -> Result<Vec<VacationPlan>, PlanError> {
        if requested == 0 || end < start {
            debug!(%start, %end, requested, "nothing to plan");
            return Ok(Vec::new());
        }

        let classification = self.classify_range(start, end).await?;
        Ok(self.plans_for(&classification.days, requested, constraints))
    }

    pub async fn suggest_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        requested: u32,
        constraints: Option<&VacationConstraints>,
    ) -> Result<SuggestionResult, PlanError> {
        let days = match self.classify_range(start, end).await {
            Ok(classification) => classification.days,
            Err(PlanError::InvalidRange { .. }) => Vec::new(),
            Err(err) => return Err(err),
        };

        let plans = self.plans_for(&days, requested, constraints);
        let summary = summarize(&days, requested, constraints);

        info!(
            %start,
            %end,
            requested,
            plans = plans.len(),
            workdays = summary.total_workdays,
            holidays = summary.total_holidays,
            weekends = summary.total_weekends,
            "suggestions computed"
        );

        Ok(SuggestionResult { plans, summary })
    }

    /// Day-by-day classification of `[start, end]`
    pub async fn classify_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Classification, PlanError> {
        Classifier::new()
            .with_timeout(self.config.oracle_timeout_duration())
            .with_cancellation(self.cancel.clone())
            .classify(&self.oracle, start, end)
            .await
    }

    fn plans_for(
        &self,
        days: &[DayRecord],
        requested: u32,
        constraints: Option<&VacationConstraints>,
    ) -> Vec<VacationPlan> {
        let unconstrained = VacationConstraints::default();
        let constraints = constraints.unwrap_or(&unconstrained);

        select(days, requested, constraints, &self.config)
            .into_iter()
            .map(|candidate| to_plan(candidate, days, requested))
            .collect()
    }
}

fn parse_range(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), PlanError> {
    Ok((parse_iso_date(start)?, parse_iso_date(end)?))
}

fn to_plan(candidate: Candidate, days: &[DayRecord], requested: u32) -> VacationPlan {
    VacationPlan {
        continuous_days: longest_inclusive_run(&candidate.dates, days),
        description: describe(&candidate.dates, days),
        dates: candidate.dates.into_iter().collect(),
        score: candidate.score,
        total_days: requested,
    }
}

/// Range-wide counts for a classified range
///
/// Weekend days that are also designated holidays count as holidays only.
pub fn summarize(
    days: &[DayRecord],
    requested: u32,
    constraints: Option<&VacationConstraints>,
) -> SuggestionSummary {
    SuggestionSummary {
        total_workdays: days.iter().filter(|d| d.is_working_day).count(),
        total_holidays: days.iter().filter(|d| d.is_holiday).count(),
        total_weekends: days
            .iter()
            .filter(|d| d.is_weekend && !d.is_holiday && !d.is_working_day)
            .count(),
        requested_days: requested,
        constraints: constraints.cloned(),
    }
}
