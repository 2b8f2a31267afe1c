//! Calendar classification
//!
//! Turns a date range into one `DayRecord` per day by asking the holiday
//! oracle three questions per date. A failed lookup never aborts the range:
//! the predicate is logged and treated as `false`, and a failed working-day
//! lookup falls back to "neither rest day nor holiday".

use std::future::Future;
use std::time::Duration;

use chrono::NaiveDate;
use leaveplan_core::{DayRecord, HolidayOracle, OracleError, PlanError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Day records for a range plus the number of lookups that had to be recovered
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    pub days: Vec<DayRecord>,
    pub recovered_failures: usize,
}

/// Classifier over an injected oracle
#[derive(Clone, Debug, Default)]
pub struct Classifier {
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-lookup time limit; an expired lookup counts as a failure
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Checked between dates
    pub fn with_cancellation(mut self, token: Option<CancellationToken>) -> Self {
        self.cancel = token;
        self
    }

    /// Classify `[start, end]` inclusive
    pub async fn classify<O>(
        &self,
        oracle: &O,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Classification, PlanError>
    where
        O: HolidayOracle + ?Sized,
    {
        if end < start {
            return Err(PlanError::InvalidRange { start, end });
        }

        let mut classification = Classification::default();

        for date in start.iter_days().take_while(|d| *d <= end) {
            if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
                debug!(%date, "classification cancelled");
                return Err(PlanError::Cancelled);
            }

            let (rest, holiday, working) = tokio::join!(
                self.lookup(date, "rest_day", oracle.is_rest_day(date)),
                self.lookup(date, "designated_holiday", oracle.is_designated_holiday(date)),
                self.lookup(date, "actual_working_day", oracle.is_actual_working_day(date)),
            );

            classification.recovered_failures += [rest, holiday, working]
                .iter()
                .filter(|answer| answer.is_none())
                .count();

            let is_weekend = rest.unwrap_or(false);
            let is_holiday = holiday.unwrap_or(false);
            let is_working_day = working.unwrap_or(!(is_weekend || is_holiday));

            classification
                .days
                .push(DayRecord::new(date, is_weekend, is_holiday, is_working_day));
        }

        debug!(
            %start,
            %end,
            days = classification.days.len(),
            recovered = classification.recovered_failures,
            "classified range"
        );

        Ok(classification)
    }

    async fn lookup<F>(&self, date: NaiveDate, predicate: &'static str, query: F) -> Option<bool>
    where
        F: Future<Output = Result<bool, OracleError>>,
    {
        let answer = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, query)
                .await
                .unwrap_or(Err(OracleError::Timeout(date))),
            None => query.await,
        };

        match answer {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(%date, predicate, error = %err, "holiday lookup failed, treating as false");
                None
            }
        }
    }
}

/// Designated holidays in a classified range
pub fn holidays_in_range(days: &[DayRecord]) -> Vec<NaiveDate> {
    days.iter().filter(|d| d.is_holiday).map(|d| d.date).collect()
}

/// Rest days that carry a work obligation
pub fn makeup_workdays_in_range(days: &[DayRecord]) -> Vec<NaiveDate> {
    days.iter()
        .filter(|d| d.is_makeup_workday())
        .map(|d| d.date)
        .collect()
}
