//! Text and JSON rendering for CLI output
//!
//! ## Exit Code Semantics
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | At least one plan found (or calendar printed) |
//! | 1 | Hard error: bad input, unreadable config |
//! | 2 | Usage error reported by clap |
//! | 3 | No plan satisfies the request |
//!
//! `--format=json` does not change exit codes.

use std::io::{self, Write};
use std::process;

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use leaveplan_core::{DayRecord, SuggestionResult, SuggestionSummary, VacationPlan};
use serde::Serialize;

// ============================================================================
// Exit Code
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    Failure = 1,
    /// The request was valid but nothing satisfies it
    NoPlan = 3,
}

impl ExitCode {
    pub fn for_plans(plans: &[VacationPlan]) -> Self {
        if plans.is_empty() {
            ExitCode::NoPlan
        } else {
            ExitCode::Success
        }
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code as u8)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const NO_PLAN_HINT: &str =
    "No plan satisfies the request. Try fewer days, a wider range or looser constraints.";

// ============================================================================
// Plans
// ============================================================================

pub fn render_plans<W: Write>(out: &mut W, plans: &[VacationPlan], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(out, plans),
        OutputFormat::Text => write_plans_text(out, plans),
    }
}

pub fn render_suggestions<W: Write>(
    out: &mut W,
    result: &SuggestionResult,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(out, result),
        OutputFormat::Text => {
            write_summary_text(out, &result.summary)?;
            writeln!(out)?;
            write_plans_text(out, &result.plans)
        }
    }
}

fn write_plans_text<W: Write>(out: &mut W, plans: &[VacationPlan]) -> io::Result<()> {
    if plans.is_empty() {
        return writeln!(out, "{NO_PLAN_HINT}");
    }

    for (rank, plan) in plans.iter().enumerate() {
        if rank > 0 {
            writeln!(out)?;
        }
        writeln!(
            out,
            "#{}  score {:.1}  {} leave days, {} days off in a row",
            rank + 1,
            plan.score,
            plan.total_days,
            plan.continuous_days
        )?;
        let dates: Vec<String> = plan.dates.iter().map(NaiveDate::to_string).collect();
        writeln!(out, "    leave: {}", dates.join(", "))?;
        writeln!(out, "    {}", plan.description)?;
    }
    Ok(())
}

fn write_summary_text<W: Write>(out: &mut W, summary: &SuggestionSummary) -> io::Result<()> {
    writeln!(
        out,
        "Range: {} workdays, {} holidays, {} weekend days; {} leave days requested",
        summary.total_workdays, summary.total_holidays, summary.total_weekends, summary.requested_days
    )?;

    let Some(constraints) = &summary.constraints else {
        return Ok(());
    };
    if !constraints.excluded_dates.is_empty() {
        let dates: Vec<String> = constraints.excluded_dates.iter().map(NaiveDate::to_string).collect();
        writeln!(out, "Excluded: {}", dates.join(", "))?;
    }
    for range in &constraints.mandatory_ranges {
        writeln!(
            out,
            "Mandatory: at least {} in {}..{}",
            range.required_days, range.start, range.end
        )?;
    }
    if let Some(limit) = constraints.max_continuous_days {
        writeln!(out, "Max continuous leave: {limit}")?;
    }
    Ok(())
}

// ============================================================================
// Calendar
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayKind {
    Workday,
    MakeupWorkday,
    Holiday,
    RestDay,
}

impl DayKind {
    pub fn of(record: &DayRecord) -> Self {
        match (record.is_working_day, record.is_weekend, record.is_holiday) {
            (true, true, _) => DayKind::MakeupWorkday,
            (true, false, _) => DayKind::Workday,
            (false, _, true) => DayKind::Holiday,
            (false, _, false) => DayKind::RestDay,
        }
    }

    fn label(self) -> &'static str {
        match self {
            DayKind::Workday => "workday",
            DayKind::MakeupWorkday => "make-up workday",
            DayKind::Holiday => "holiday",
            DayKind::RestDay => "rest day",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub kind: DayKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holiday: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarReport {
    pub calendar: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<CalendarDay>,
    pub holidays: Vec<NaiveDate>,
    pub makeup_workdays: Vec<NaiveDate>,
    /// Oracle lookups answered by fallback
    pub recovered_failures: usize,
}

pub fn render_calendar<W: Write>(out: &mut W, report: &CalendarReport, format: OutputFormat) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, report);
    }

    writeln!(out, "Calendar {}: {} to {}", report.calendar, report.start, report.end)?;
    for day in &report.days {
        match &day.holiday {
            Some(name) => writeln!(
                out,
                "{} {}  {} ({})",
                day.date,
                day.date.weekday(),
                day.kind.label(),
                name
            )?,
            None => writeln!(out, "{} {}  {}", day.date, day.date.weekday(), day.kind.label())?,
        }
    }
    writeln!(
        out,
        "{} holidays, {} make-up workdays",
        report.holidays.len(),
        report.makeup_workdays.len()
    )?;
    if report.recovered_failures > 0 {
        writeln!(
            out,
            "warning: {} oracle lookups failed and were treated as false",
            report.recovered_failures
        )?;
    }
    Ok(())
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}
