//! Contiguous-run analysis
//!
//! Two run definitions are in use and must not be mixed up:
//!
//! - **Inclusive runs** extend through every selected leave day and every
//!   non-working day. They measure the time off a plan actually yields and
//!   drive `continuous_days`, the efficiency score and the description.
//! - **Leave-only runs** count selected leave days only. A non-working day
//!   that is not selected is skipped: it neither extends nor breaks the run.
//!   Only an unselected working day ends a run. The max-continuous
//!   constraint is checked against these.

use std::collections::BTreeSet;
use std::ops::Range;

use chrono::NaiveDate;
use leaveplan_core::DayRecord;

/// A maximal inclusive run of days off
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Calendar days in the run
    pub length: u32,
    /// How many of them are selected leave days
    pub leave_days: u32,
}

impl Run {
    pub fn touches_leave(&self) -> bool {
        self.leave_days > 0
    }

    /// `2025-07-01` for single days, `2025-07-01 至 2025-07-09 (9天)` otherwise
    pub fn label(&self) -> String {
        if self.length == 1 {
            self.start.to_string()
        } else {
            format!("{} 至 {} ({}天)", self.start, self.end, self.length)
        }
    }
}

/// Position of `date` in a contiguous day sequence
pub fn day_index(days: &[DayRecord], date: NaiveDate) -> Option<usize> {
    let first = days.first()?.date;
    let offset = usize::try_from((date - first).num_days()).ok()?;
    (offset < days.len()).then_some(offset)
}

/// All inclusive runs in chronological order
pub fn inclusive_runs(leave: &BTreeSet<NaiveDate>, days: &[DayRecord]) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut current: Option<Run> = None;

    for day in days {
        let selected = leave.contains(&day.date);
        if selected || day.is_non_working() {
            let run = current.get_or_insert(Run {
                start: day.date,
                end: day.date,
                length: 0,
                leave_days: 0,
            });
            run.end = day.date;
            run.length += 1;
            if selected {
                run.leave_days += 1;
            }
        } else if let Some(run) = current.take() {
            runs.push(run);
        }
    }

    if let Some(run) = current {
        runs.push(run);
    }

    runs
}

/// Longest inclusive run containing at least one leave day
pub fn longest_inclusive_run(leave: &BTreeSet<NaiveDate>, days: &[DayRecord]) -> u32 {
    inclusive_runs(leave, days)
        .iter()
        .filter(|run| run.touches_leave())
        .map(|run| run.length)
        .max()
        .unwrap_or(0)
}

/// Lengths of all leave-only runs in chronological order
pub fn leave_only_runs(leave: &BTreeSet<NaiveDate>, days: &[DayRecord]) -> Vec<u32> {
    let mut runs = Vec::new();
    let mut current = 0u32;

    for day in days {
        if leave.contains(&day.date) {
            current += 1;
        } else if day.is_working_day {
            if current > 0 {
                runs.push(current);
            }
            current = 0;
        }
        // Unselected rest days are skipped
    }

    if current > 0 {
        runs.push(current);
    }

    runs
}

pub fn longest_leave_only_run(leave: &BTreeSet<NaiveDate>, days: &[DayRecord]) -> u32 {
    leave_only_runs(leave, days).into_iter().max().unwrap_or(0)
}

/// Human-readable breakdown of every inclusive run, joined by `", "`
pub fn describe(leave: &BTreeSet<NaiveDate>, days: &[DayRecord]) -> String {
    inclusive_runs(leave, days)
        .iter()
        .map(Run::label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Maximal runs of non-working days at least `min_len` long, as index ranges
pub fn non_working_blocks(days: &[DayRecord], min_len: usize) -> Vec<Range<usize>> {
    let mut blocks = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, day) in days.iter().enumerate() {
        match (day.is_non_working(), start) {
            (true, None) => start = Some(idx),
            (false, Some(s)) => {
                if idx - s >= min_len {
                    blocks.push(s..idx);
                }
                start = None;
            }
            _ => {}
        }
    }

    if let Some(s) = start {
        if days.len() - s >= min_len {
            blocks.push(s..days.len());
        }
    }

    blocks
}
