//! leaveplan CLI - Leave Day Planner
//!
//! Command-line interface for planning leave days around public holidays.

mod config;
mod output;

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use leaveplan_core::{parse_iso_date, HolidayCalendar, MandatoryRange, VacationConstraints};
use leaveplan_solver::{holidays_in_range, makeup_workdays_in_range, PlannerConfig, VacationPlanner};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::CliConfig;
use crate::output::{
    render_calendar, render_plans, render_suggestions, CalendarDay, CalendarReport, DayKind,
    ExitCode, OutputFormat,
};

#[derive(Parser)]
#[command(name = "leaveplan")]
#[command(author, version, about = "Leave day planner", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file with [planner] and [calendar] tables
    #[arg(short, long, global = true, env = "LEAVEPLAN_CONFIG")]
    config: Option<PathBuf>,

    /// Holiday calendar file, overriding [calendar]
    #[arg(long, global = true, value_name = "FILE")]
    calendar: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank leave plans for a date range
    Plan(PlanArgs),

    /// Rank leave plans and report range statistics
    Suggest(PlanArgs),

    /// Show how each day in a range is classified
    Calendar {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

#[derive(Args)]
struct PlanArgs {
    /// First day (YYYY-MM-DD)
    #[arg(long)]
    start: String,

    /// Last day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    end: String,

    /// Leave days to spend
    #[arg(short, long)]
    days: u32,

    /// Never take this date as leave (repeatable)
    #[arg(long, value_name = "DATE")]
    exclude: Vec<String>,

    /// Take at least N leave days in a window (repeatable)
    #[arg(long, value_name = "START..END:N")]
    mandatory: Vec<String>,

    /// Longest allowed run of leave days
    #[arg(long, value_name = "N")]
    max_continuous: Option<u32>,

    /// Show at most N plans
    #[arg(short, long, value_name = "N")]
    limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,
}

impl PlanArgs {
    fn constraints(&self) -> Result<Option<VacationConstraints>> {
        let mut constraints = VacationConstraints::new();
        for date in &self.exclude {
            constraints = constraints.exclude(parse_iso_date(date)?);
        }
        for arg in &self.mandatory {
            constraints.mandatory_ranges.push(parse_mandatory(arg)?);
        }
        constraints.max_continuous_days = self.max_continuous;

        Ok((!constraints.is_empty()).then_some(constraints))
    }
}

/// `2025-07-14..2025-07-25:2`
fn parse_mandatory(arg: &str) -> Result<MandatoryRange> {
    let (range, days) = arg
        .rsplit_once(':')
        .with_context(|| format!("Mandatory range '{arg}' must look like START..END:N"))?;
    let (start, end) = range
        .split_once("..")
        .with_context(|| format!("Mandatory range '{arg}' must look like START..END:N"))?;
    let required_days = days
        .trim()
        .parse::<u32>()
        .with_context(|| format!("Invalid day count in mandatory range '{arg}'"))?;

    let (start, end) = (parse_iso_date(start)?, parse_iso_date(end)?);
    if end < start {
        bail!("Mandatory range '{arg}' ends before it starts");
    }
    Ok(MandatoryRange::new(start, end, required_days))
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code.into(),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::Failure.into()
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    let calendar = config.resolve_calendar(cli.calendar.as_deref())?;
    debug!(calendar = %calendar.name, "calendar loaded");

    let mut planner_config = config.planner;
    match cli.command {
        Commands::Plan(args) => {
            if let Some(limit) = args.limit {
                planner_config = planner_config.max_plans(limit);
            }
            let constraints = args.constraints()?;
            let planner = VacationPlanner::new(calendar).with_config(planner_config);
            let plans = planner
                .compute_plan(&args.start, &args.end, args.days, constraints.as_ref())
                .await?;

            render_plans(&mut io::stdout().lock(), &plans, args.format)?;
            Ok(ExitCode::for_plans(&plans))
        }
        Commands::Suggest(args) => {
            if let Some(limit) = args.limit {
                planner_config = planner_config.max_plans(limit);
            }
            let constraints = args.constraints()?;
            let planner = VacationPlanner::new(calendar).with_config(planner_config);
            let result = planner
                .compute_suggestions(&args.start, &args.end, args.days, constraints.as_ref())
                .await?;

            render_suggestions(&mut io::stdout().lock(), &result, args.format)?;
            Ok(ExitCode::for_plans(&result.plans))
        }
        Commands::Calendar { start, end, format } => {
            let report = calendar_report(calendar, planner_config, &start, &end).await?;
            render_calendar(&mut io::stdout().lock(), &report, format)?;
            Ok(ExitCode::Success)
        }
    }
}

async fn calendar_report(
    calendar: HolidayCalendar,
    planner_config: PlannerConfig,
    start: &str,
    end: &str,
) -> Result<CalendarReport> {
    let (start, end) = (parse_iso_date(start)?, parse_iso_date(end)?);
    let planner = VacationPlanner::new(calendar).with_config(planner_config);
    let classification = planner.classify_range(start, end).await?;

    let calendar = planner.oracle();
    let days = classification
        .days
        .iter()
        .map(|record| CalendarDay {
            date: record.date,
            kind: DayKind::of(record),
            holiday: calendar.holiday_name(record.date).map(str::to_string),
        })
        .collect();

    Ok(CalendarReport {
        calendar: calendar.name.clone(),
        start,
        end,
        days,
        holidays: holidays_in_range(&classification.days),
        makeup_workdays: makeup_workdays_in_range(&classification.days),
        recovered_failures: classification.recovered_failures,
    })
}
