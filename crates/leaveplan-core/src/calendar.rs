//! Fixed holiday calendar provider
//!
//! A `HolidayCalendar` answers the three oracle questions from static data:
//! a base weekly pattern, named holiday spans and adjusted (make-up) workdays.
//! Calendars are plain TOML:
//!
//! ```toml
//! name = "example"
//! working_days = [1, 2, 3, 4, 5]
//! adjusted_workdays = ["2025-01-26"]
//!
//! [[holidays]]
//! name = "Spring Festival"
//! start = "2025-01-28"
//! end = "2025-02-04"
//! ```
//!
//! Dates must be quoted strings.

use std::path::Path;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{CalendarError, HolidayOracle, OracleError};

const CHINA_CALENDAR: &str = include_str!("../data/china.toml");

fn default_working_days() -> Vec<u8> {
    vec![1, 2, 3, 4, 5] // Mon-Fri
}

/// Holiday definition
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Holiday {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Holiday {
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Dates a calendar has authoritative data for
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Coverage {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Static holiday/workday calendar
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HolidayCalendar {
    pub name: String,
    /// Working days of the base week (0 = Sunday, 6 = Saturday)
    #[serde(default = "default_working_days")]
    pub working_days: Vec<u8>,
    #[serde(default)]
    pub holidays: Vec<Holiday>,
    /// Rest days that carry a work obligation
    #[serde(default)]
    pub adjusted_workdays: Vec<NaiveDate>,
    /// Lookups outside this window fail with `OutOfCoverage`
    #[serde(default)]
    pub coverage: Option<Coverage>,
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        Self::new("default")
    }
}

impl HolidayCalendar {
    /// Mon-Fri calendar with no holidays and unlimited coverage
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            working_days: default_working_days(),
            holidays: Vec::new(),
            adjusted_workdays: Vec::new(),
            coverage: None,
        }
    }

    /// Built-in mainland China calendar (2024-2025)
    pub fn china() -> Result<Self, CalendarError> {
        Self::from_toml_str(CHINA_CALENDAR)
    }

    pub fn from_toml_str(input: &str) -> Result<Self, CalendarError> {
        let calendar: Self = toml::from_str(input)?;
        calendar.validate()?;
        Ok(calendar)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CalendarError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }

    pub fn with_holiday(mut self, name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        self.holidays.push(Holiday::new(name, start, end));
        self
    }

    pub fn with_adjusted_workday(mut self, date: NaiveDate) -> Self {
        self.adjusted_workdays.push(date);
        self
    }

    pub fn with_coverage(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.coverage = Some(Coverage { start, end });
        self
    }

    /// Reject spans and weekdays that cannot be meant literally
    pub fn validate(&self) -> Result<(), CalendarError> {
        if let Some(day) = self.working_days.iter().find(|d| **d > 6) {
            return Err(CalendarError::Invalid(format!(
                "working day {} out of range 0-6",
                day
            )));
        }
        if let Some(h) = self.holidays.iter().find(|h| h.end < h.start) {
            return Err(CalendarError::Invalid(format!(
                "holiday '{}' ends ({}) before it starts ({})",
                h.name, h.end, h.start
            )));
        }
        if let Some(c) = &self.coverage {
            if c.end < c.start {
                return Err(CalendarError::Invalid(format!(
                    "coverage ends ({}) before it starts ({})",
                    c.end, c.start
                )));
            }
        }
        Ok(())
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.coverage
            .as_ref()
            .map_or(true, |c| date >= c.start && date <= c.end)
    }

    /// Rest day under the base week
    pub fn rest_day(&self, date: NaiveDate) -> bool {
        let weekday = date.weekday().num_days_from_sunday() as u8;
        !self.working_days.contains(&weekday)
    }

    pub fn designated_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.iter().any(|h| h.contains(date))
    }

    pub fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        self.holidays
            .iter()
            .find(|h| h.contains(date))
            .map(|h| h.name.as_str())
    }

    /// Adjusted workdays win over both rest days and holidays
    pub fn working_day(&self, date: NaiveDate) -> bool {
        if self.adjusted_workdays.contains(&date) {
            return true;
        }
        !self.rest_day(date) && !self.designated_holiday(date)
    }

    fn check_coverage(&self, date: NaiveDate) -> Result<(), OracleError> {
        if self.covers(date) {
            Ok(())
        } else {
            Err(OracleError::OutOfCoverage(date))
        }
    }
}

#[async_trait]
impl HolidayOracle for HolidayCalendar {
    async fn is_rest_day(&self, date: NaiveDate) -> Result<bool, OracleError> {
        self.check_coverage(date)?;
        Ok(self.rest_day(date))
    }

    async fn is_designated_holiday(&self, date: NaiveDate) -> Result<bool, OracleError> {
        self.check_coverage(date)?;
        Ok(self.designated_holiday(date))
    }

    async fn is_actual_working_day(&self, date: NaiveDate) -> Result<bool, OracleError> {
        self.check_coverage(date)?;
        Ok(self.working_day(date))
    }
}
