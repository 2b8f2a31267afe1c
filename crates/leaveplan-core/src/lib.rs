//! # leaveplan-core
//!
//! Core domain model for the leaveplan engine.
//!
//! This crate provides:
//! - Value types: `DayRecord`, `VacationConstraints`, `VacationPlan`, `SuggestionResult`
//! - The `HolidayOracle` capability the engine classifies days with
//! - A fixed holiday calendar provider (`HolidayCalendar`)
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use leaveplan_core::VacationConstraints;
//!
//! let date = |d| NaiveDate::from_ymd_opt(2025, 7, d).unwrap();
//! let constraints = VacationConstraints::new()
//!     .exclude(date(10))
//!     .require(date(14), date(25), 2)
//!     .max_continuous(3);
//!
//! assert!(constraints.is_excluded(date(10)));
//! assert_eq!(constraints.mandatory_ranges.len(), 1);
//! ```

pub mod calendar;

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use calendar::{Coverage, Holiday, HolidayCalendar};

/// Date format used on every string boundary of the engine
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`)
pub fn parse_iso_date(input: &str) -> Result<NaiveDate, PlanError> {
    NaiveDate::parse_from_str(input.trim(), ISO_DATE_FORMAT)
        .map_err(|_| PlanError::InvalidDate(input.to_string()))
}

// ============================================================================
// Day Classification
// ============================================================================

/// Classification of a single calendar day
///
/// `is_working_day` comes straight from the oracle and may contradict the
/// other two flags: a make-up workday is a weekend day with a work obligation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    /// Rest day under the base weekly pattern
    pub is_weekend: bool,
    /// Designated public holiday
    pub is_holiday: bool,
    /// Actual work obligation
    pub is_working_day: bool,
}

impl DayRecord {
    pub fn new(date: NaiveDate, is_weekend: bool, is_holiday: bool, is_working_day: bool) -> Self {
        Self {
            date,
            is_weekend,
            is_holiday,
            is_working_day,
        }
    }

    /// A day off without spending leave
    pub fn is_non_working(&self) -> bool {
        !self.is_working_day
    }

    /// Weekend day reclassified as a workday
    pub fn is_makeup_workday(&self) -> bool {
        self.is_weekend && self.is_working_day
    }
}

// ============================================================================
// Constraints
// ============================================================================

/// Minimum number of leave days that must fall inside a date window
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MandatoryRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub required_days: u32,
}

impl MandatoryRange {
    pub fn new(start: NaiveDate, end: NaiveDate, required_days: u32) -> Self {
        Self {
            start,
            end,
            required_days,
        }
    }

    /// Inclusive on both ends
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Optional restrictions on which workdays a plan may use
///
/// Sub-constraints are not checked against each other here. Conflicts show
/// up during search as an empty plan list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationConstraints {
    /// Dates that must never be taken as leave
    #[serde(default)]
    pub excluded_dates: BTreeSet<NaiveDate>,
    /// Per-window leave quotas, checked independently
    #[serde(default)]
    pub mandatory_ranges: Vec<MandatoryRange>,
    /// Longest allowed run of leave days (0 behaves like 1)
    #[serde(default)]
    pub max_continuous_days: Option<u32>,
}

impl VacationConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exclude(mut self, date: NaiveDate) -> Self {
        self.excluded_dates.insert(date);
        self
    }

    pub fn require(mut self, start: NaiveDate, end: NaiveDate, required_days: u32) -> Self {
        self.mandatory_ranges
            .push(MandatoryRange::new(start, end, required_days));
        self
    }

    pub fn max_continuous(mut self, days: u32) -> Self {
        self.max_continuous_days = Some(days);
        self
    }

    pub fn is_excluded(&self, date: NaiveDate) -> bool {
        self.excluded_dates.contains(&date)
    }

    pub fn is_empty(&self) -> bool {
        self.excluded_dates.is_empty()
            && self.mandatory_ranges.is_empty()
            && self.max_continuous_days.is_none()
    }
}

// ============================================================================
// Plans (Result)
// ============================================================================

/// One recommended set of leave days
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VacationPlan {
    /// Leave dates, ascending and unique
    pub dates: Vec<NaiveDate>,
    /// Non-negative, higher is better
    pub score: f64,
    /// Always equal to the requested day count
    pub total_days: u32,
    /// Longest inclusive run of days off touching a leave date
    pub continuous_days: u32,
    /// Run breakdown, e.g. `2025-07-01 至 2025-07-09 (9天)`
    pub description: String,
}

/// Range-wide counts reported next to the plans
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSummary {
    pub total_workdays: usize,
    pub total_holidays: usize,
    /// Weekend days that are not also designated holidays
    pub total_weekends: usize,
    pub requested_days: u32,
    /// Echo of the constraints the plans were computed under
    pub constraints: Option<VacationConstraints>,
}

/// Plans plus range statistics
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuggestionResult {
    /// Best first
    pub plans: Vec<VacationPlan>,
    pub summary: SuggestionSummary,
}

impl SuggestionResult {
    pub fn best(&self) -> Option<&VacationPlan> {
        self.plans.first()
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Authority on rest days, holidays and actual work obligations
///
/// The engine never derives a workday from the weekday itself; only
/// `is_actual_working_day` decides whether a day can be taken as leave.
#[async_trait]
pub trait HolidayOracle: Send + Sync {
    /// Rest day under the base weekly pattern, ignoring adjustments
    async fn is_rest_day(&self, date: NaiveDate) -> Result<bool, OracleError>;

    /// Official non-working calendar day
    async fn is_designated_holiday(&self, date: NaiveDate) -> Result<bool, OracleError>;

    /// Whether the day actually carries a work obligation
    async fn is_actual_working_day(&self, date: NaiveDate) -> Result<bool, OracleError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Failure of a single oracle lookup
///
/// Recovered by the classifier; never surfaces from a plan computation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OracleError {
    #[error("Date outside calendar coverage: {0}")]
    OutOfCoverage(NaiveDate),

    #[error("Oracle lookup timed out for {0}")]
    Timeout(NaiveDate),

    #[error("Oracle unavailable: {0}")]
    Unavailable(String),
}

/// Plan computation error
///
/// Infeasible requests are not errors; they produce an empty plan list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Invalid range: end {end} is before start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Computation cancelled")]
    Cancelled,
}

/// Holiday calendar loading error
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Calendar parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid calendar: {0}")]
    Invalid(String),
}

// ============================================================================
// Tests
// ============================================================================
