use chrono::NaiveDate;
use serde::Serialize;

use crate::model::config::ViewMode;
use crate::ops::range::{DateRange, MAX_RANGE_DAYS, QuickRange};

/// Settings of an embedded timeline block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeblockConfig {
    pub mode: ViewMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<QuickRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeblockError {
    #[error("invalid mode: \"{0}\". Must be \"month\" or \"custom\"")]
    InvalidMode(String),
    #[error(
        "invalid show preset: \"{0}\". Valid options: last-7, last-30, this-week, this-month, last-3m"
    )]
    InvalidPreset(String),
    #[error("missing required parameter: \"mode\". Must specify \"month\" or \"custom\"")]
    MissingMode,
    #[error("invalid startDate format: \"{0}\". Expected format: DD.MM.YYYY or YYYY-MM-DD")]
    InvalidStartDate(String),
    #[error("invalid endDate format: \"{0}\". Expected format: DD.MM.YYYY or YYYY-MM-DD")]
    InvalidEndDate(String),
    #[error("cannot use \"show\" together with startDate/endDate")]
    PresetWithDates,
    #[error("custom mode requires either \"show\" or both \"startDate\" and \"endDate\"")]
    MissingDates,
    #[error("endDate ({end}) must be after or equal to startDate ({start})")]
    EndBeforeStart { start: String, end: String },
    #[error("date range cannot exceed {MAX_RANGE_DAYS} days. Current range: {0} days")]
    RangeTooLong(i64),
}

/// Parse `DD.MM.YYYY` or `YYYY-MM-DD`. Impossible dates are rejected.
pub fn parse_flexible_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let (year, month, day) = if s.contains('.') {
        let [day, month, year] = split3(s, '.')?;
        (year, month, day)
    } else if s.contains('-') {
        let [year, month, day] = split3(s, '-')?;
        (year, month, day)
    } else {
        return None;
    };
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn split3(s: &str, sep: char) -> Option<[&str; 3]> {
    let mut parts = s.split(sep);
    let out = [parts.next()?, parts.next()?, parts.next()?];
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}

/// Parse the `key: value` body of a timeline block.
///
/// Blank lines, `#` comments, lines without a colon and unknown keys are
/// ignored. The first validation failure is returned.
pub fn parse_codeblock(source: &str) -> Result<CodeblockConfig, CodeblockError> {
    let mut mode = None;
    let mut start_raw: Option<String> = None;
    let mut end_raw: Option<String> = None;
    let mut show = None;

    for line in source.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "mode" => {
                mode = Some(match value {
                    "month" => ViewMode::Month,
                    "custom" => ViewMode::Custom,
                    _ => return Err(CodeblockError::InvalidMode(value.to_string())),
                });
            }
            "startDate" => start_raw = Some(value.to_string()),
            "endDate" => end_raw = Some(value.to_string()),
            "show" => {
                let preset = value
                    .parse::<QuickRange>()
                    .map_err(|_| CodeblockError::InvalidPreset(value.to_string()))?;
                show = Some(preset);
            }
            _ => {}
        }
    }

    let mode = mode.ok_or(CodeblockError::MissingMode)?;
    let start_raw = start_raw.filter(|s| !s.is_empty());
    let end_raw = end_raw.filter(|s| !s.is_empty());

    match mode {
        ViewMode::Month => {
            let start_date = match &start_raw {
                Some(raw) => Some(
                    parse_flexible_date(raw)
                        .ok_or_else(|| CodeblockError::InvalidStartDate(raw.clone()))?,
                ),
                None => None,
            };
            Ok(CodeblockConfig {
                mode,
                start_date,
                end_date: None,
                show,
            })
        }
        ViewMode::Custom => {
            if show.is_some() {
                if start_raw.is_some() || end_raw.is_some() {
                    return Err(CodeblockError::PresetWithDates);
                }
                return Ok(CodeblockConfig {
                    mode,
                    start_date: None,
                    end_date: None,
                    show,
                });
            }
            let (Some(start_raw), Some(end_raw)) = (start_raw, end_raw) else {
                return Err(CodeblockError::MissingDates);
            };
            let start = parse_flexible_date(&start_raw)
                .ok_or_else(|| CodeblockError::InvalidStartDate(start_raw.clone()))?;
            let end = parse_flexible_date(&end_raw)
                .ok_or_else(|| CodeblockError::InvalidEndDate(end_raw.clone()))?;
            if end < start {
                return Err(CodeblockError::EndBeforeStart {
                    start: start_raw,
                    end: end_raw,
                });
            }
            let days = (end - start).num_days();
            if days > MAX_RANGE_DAYS {
                return Err(CodeblockError::RangeTooLong(days));
            }
            Ok(CodeblockConfig {
                mode,
                start_date: Some(start),
                end_date: Some(end),
                show: None,
            })
        }
    }
}

impl CodeblockConfig {
    /// Resolve the block to concrete dates.
    ///
    /// Month mode shows the month of `startDate`, or the current month.
    /// Custom mode uses the preset if given, else the explicit dates.
    pub fn date_range(&self, today: NaiveDate) -> DateRange {
        match self.mode {
            ViewMode::Month => DateRange::month_of(self.start_date.unwrap_or(today)),
            ViewMode::Custom => match (self.show, self.start_date, self.end_date) {
                (Some(preset), _, _) => preset.range(today),
                (None, Some(start), Some(end)) => DateRange::new(start, end),
                _ => DateRange::month_of(today),
            },
        }
    }
}
