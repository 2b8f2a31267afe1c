//! # leaveplan-solver
//!
//! Leave-day planning engine.
//!
//! This crate provides:
//! - Calendar classification over an async holiday oracle, with failure recovery
//! - Constraint validation (exclusions, mandatory windows, run limits)
//! - Contiguous-run analysis and plan descriptions
//! - Exhaustive and heuristic leave-day selection
//! - The `VacationPlanner` facade with range statistics
//!
//! ## Example
//!
//! ```rust,ignore
//! use leaveplan_core::HolidayCalendar;
//! use leaveplan_solver::VacationPlanner;
//!
//! let planner = VacationPlanner::new(HolidayCalendar::china()?);
//! let result = planner
//!     .compute_suggestions("2025-09-01", "2025-10-31", 3, None)
//!     .await?;
//! println!("{}", result.best().map_or("-", |p| p.description.as_str()));
//! ```

pub mod classify;
pub mod config;
pub mod planner;
pub mod score;
pub mod segments;
pub mod select;
pub mod validate;

pub use classify::{holidays_in_range, makeup_workdays_in_range, Classification, Classifier};
pub use config::PlannerConfig;
pub use planner::{summarize, VacationPlanner};
pub use score::ScoringModel;
pub use select::{select, Candidate, SearchMode};
pub use validate::{validate, Violation};

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;
    use leaveplan_core::{DayRecord, HolidayCalendar};

    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    pub fn leave_set(dates: &[NaiveDate]) -> BTreeSet<NaiveDate> {
        dates.iter().copied().collect()
    }

    /// Classify synchronously, without the oracle round trip
    pub fn records(calendar: &HolidayCalendar, start: NaiveDate, end: NaiveDate) -> Vec<DayRecord> {
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|d| {
                DayRecord::new(
                    d,
                    calendar.rest_day(d),
                    calendar.designated_holiday(d),
                    calendar.working_day(d),
                )
            })
            .collect()
    }

    /// July 2025 with Tue Jul 1 - Sat Jul 5 as a holiday block
    pub fn july_with_holiday_block() -> Vec<DayRecord> {
        let calendar =
            HolidayCalendar::default().with_holiday("Block", date(2025, 7, 1), date(2025, 7, 5));
        records(&calendar, date(2025, 7, 1), date(2025, 7, 31))
    }
}
