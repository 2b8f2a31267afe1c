//! Configuration file loading
//!
//! ```toml
//! [planner]
//! scoring = "weighted"
//! max_plans = 5
//! oracle_timeout_ms = 200
//!
//! [calendar]
//! name = "team"
//! adjusted_workdays = ["2025-01-26"]
//!
//! [[calendar.holidays]]
//! name = "Spring Festival"
//! start = "2025-01-28"
//! end = "2025-02-04"
//! ```
//!
//! Both tables are optional. Without `[calendar]` the built-in China
//! calendar is used.

use std::path::Path;

use anyhow::{Context, Result};
use leaveplan_core::HolidayCalendar;
use leaveplan_solver::PlannerConfig;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    #[serde(default)]
    pub planner: PlannerConfig,
    pub calendar: Option<HolidayCalendar>,
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let input = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&input).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)?;
        if let Some(calendar) = &config.calendar {
            calendar.validate()?;
        }
        Ok(config)
    }

    /// Calendar to plan against; an explicit calendar file wins over `[calendar]`
    pub fn resolve_calendar(&self, calendar_file: Option<&Path>) -> Result<HolidayCalendar> {
        if let Some(path) = calendar_file {
            return HolidayCalendar::load(path)
                .with_context(|| format!("Failed to load calendar {}", path.display()));
        }
        match &self.calendar {
            Some(calendar) => Ok(calendar.clone()),
            None => HolidayCalendar::china().context("Built-in calendar is corrupt"),
        }
    }
}
