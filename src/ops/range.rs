use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::config::{Settings, ViewMode};
use crate::parse::codeblock::parse_flexible_date;

/// Longest custom range, in days between start and end
pub const MAX_RANGE_DAYS: i64 = 365;

/// An inclusive span of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("end date ({end}) must be on or after start date ({start})")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("date range cannot exceed {MAX_RANGE_DAYS} days (got {0} days)")]
    TooLong(i64),
    #[error("invalid date \"{0}\" (expected YYYY-MM-DD or DD.MM.YYYY)")]
    InvalidDate(String),
    #[error("date range falls outside the supported calendar")]
    OutOfRange,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// First through last day of the month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        let start = date - Days::new(u64::from(date.day0()));
        // only the last month of the calendar has no successor
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        DateRange { start, end }
    }

    /// `months` whole months ending with the month containing `today`
    pub fn trailing_months(today: NaiveDate, months: u32) -> Result<Self, RangeError> {
        let current = DateRange::month_of(today);
        let start = current
            .start
            .checked_sub_months(Months::new(months.saturating_sub(1)))
            .ok_or(RangeError::OutOfRange)?;
        Ok(DateRange {
            start,
            end: current.end,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered, both ends included
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// The range of equal length immediately before this one
    pub fn previous(&self) -> Result<Self, RangeError> {
        self.shifted(false)
    }

    /// The range of equal length immediately after this one
    pub fn next(&self) -> Result<Self, RangeError> {
        self.shifted(true)
    }

    fn shifted(&self, forward: bool) -> Result<Self, RangeError> {
        let shift = Days::new(self.duration_days().max(1) as u64);
        let step = |date: NaiveDate| {
            if forward {
                date.checked_add_days(shift)
            } else {
                date.checked_sub_days(shift)
            }
        };
        match (step(self.start), step(self.end)) {
            (Some(start), Some(end)) => Ok(DateRange { start, end }),
            _ => Err(RangeError::OutOfRange),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// Check a user-chosen custom range: end not before start, at most a year.
pub fn validate_custom(start: NaiveDate, end: NaiveDate) -> Result<DateRange, RangeError> {
    if end < start {
        return Err(RangeError::EndBeforeStart { start, end });
    }
    let days = (end - start).num_days();
    if days > MAX_RANGE_DAYS {
        return Err(RangeError::TooLong(days));
    }
    Ok(DateRange { start, end })
}

/// Ranges relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuickRange {
    #[serde(rename = "last-7")]
    Last7Days,
    #[serde(rename = "last-30")]
    Last30Days,
    #[serde(rename = "this-week")]
    ThisWeek,
    #[serde(rename = "this-month")]
    ThisMonth,
    #[serde(rename = "last-3m")]
    Last3Months,
}

impl QuickRange {
    pub const ALL: [QuickRange; 5] = [
        QuickRange::Last7Days,
        QuickRange::Last30Days,
        QuickRange::ThisWeek,
        QuickRange::ThisMonth,
        QuickRange::Last3Months,
    ];

    /// Key used in config and codeblocks
    pub fn key(self) -> &'static str {
        match self {
            QuickRange::Last7Days => "last-7",
            QuickRange::Last30Days => "last-30",
            QuickRange::ThisWeek => "this-week",
            QuickRange::ThisMonth => "this-month",
            QuickRange::Last3Months => "last-3m",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuickRange::Last7Days => "Last 7 days",
            QuickRange::Last30Days => "Last 30 days",
            QuickRange::ThisWeek => "This week",
            QuickRange::ThisMonth => "This month",
            QuickRange::Last3Months => "Last 3 months",
        }
    }

    /// Resolve against `today`. Weeks start on Sunday.
    pub fn range(self, today: NaiveDate) -> DateRange {
        match self {
            QuickRange::Last7Days => DateRange::new(today - Days::new(6), today),
            QuickRange::Last30Days => DateRange::new(today - Days::new(29), today),
            QuickRange::ThisWeek => {
                let back = u64::from(today.weekday().num_days_from_sunday());
                let start = today - Days::new(back);
                DateRange::new(start, start + Days::new(6))
            }
            QuickRange::ThisMonth => DateRange::month_of(today),
            QuickRange::Last3Months => DateRange::new(today - Months::new(3), today),
        }
    }
}

impl FromStr for QuickRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuickRange::ALL
            .into_iter()
            .find(|q| q.key() == s)
            .ok_or_else(|| {
                format!(
                    "unknown preset '{}' (expected: last-7, last-30, this-week, this-month, last-3m)",
                    s
                )
            })
    }
}

/// The range shown when no range is requested explicitly, from `[view]`.
///
/// Month mode shows the trailing `default_range_months` months. Custom mode
/// uses `last_preset` unless it is `custom`, in which case the stored
/// `custom_start`/`custom_end` must form a valid range.
pub fn default_range(settings: &Settings, today: NaiveDate) -> Result<DateRange, RangeError> {
    match settings.view.mode {
        ViewMode::Month => {
            DateRange::trailing_months(today, settings.notes.default_range_months.max(1))
        }
        ViewMode::Custom => {
            if let Ok(preset) = settings.view.last_preset.parse::<QuickRange>() {
                return Ok(preset.range(today));
            }
            let start = parse_flexible_date(&settings.view.custom_start)
                .ok_or_else(|| RangeError::InvalidDate(settings.view.custom_start.clone()))?;
            let end = parse_flexible_date(&settings.view.custom_end)
                .ok_or_else(|| RangeError::InvalidDate(settings.view.custom_end.clone()))?;
            validate_custom(start, end)
        }
    }
}
