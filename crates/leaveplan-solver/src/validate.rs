//! Constraint validation for candidate leave sets
//!
//! Runs in the inner loop of the search, so every check is a single pass over
//! the candidate set or the day sequence.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use leaveplan_core::{DayRecord, VacationConstraints};
use thiserror::Error;

use crate::segments::longest_leave_only_run;

/// First constraint a candidate breaks
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Violation {
    #[error("{0} is an excluded date")]
    ExcludedDate(NaiveDate),

    #[error("{start}..{end} needs {required} leave days, candidate has {found}")]
    MandatoryShortfall {
        start: NaiveDate,
        end: NaiveDate,
        required: u32,
        found: u32,
    },

    #[error("{longest} consecutive leave days exceed the limit of {limit}")]
    ContinuousLimit { longest: u32, limit: u32 },
}

/// Max-continuous limit as enforced; a limit of 0 behaves like 1
pub fn effective_run_limit(constraints: &VacationConstraints) -> Option<u32> {
    constraints.max_continuous_days.map(|limit| limit.max(1))
}

/// Check a candidate against every constraint
pub fn check(
    leave: &BTreeSet<NaiveDate>,
    days: &[DayRecord],
    constraints: &VacationConstraints,
) -> Result<(), Violation> {
    if let Some(date) = leave.iter().find(|d| constraints.is_excluded(**d)) {
        return Err(Violation::ExcludedDate(*date));
    }

    for range in &constraints.mandatory_ranges {
        let found = leave.iter().filter(|d| range.contains(**d)).count() as u32;
        if found < range.required_days {
            return Err(Violation::MandatoryShortfall {
                start: range.start,
                end: range.end,
                required: range.required_days,
                found,
            });
        }
    }

    check_run_limit(leave, days, constraints)
}

/// Only the max-continuous rule; used while a candidate is still growing
pub fn check_run_limit(
    leave: &BTreeSet<NaiveDate>,
    days: &[DayRecord],
    constraints: &VacationConstraints,
) -> Result<(), Violation> {
    if let Some(limit) = effective_run_limit(constraints) {
        let longest = longest_leave_only_run(leave, days);
        if longest > limit {
            return Err(Violation::ContinuousLimit { longest, limit });
        }
    }
    Ok(())
}

pub fn validate(
    leave: &BTreeSet<NaiveDate>,
    days: &[DayRecord],
    constraints: &VacationConstraints,
) -> bool {
    check(leave, days, constraints).is_ok()
}
