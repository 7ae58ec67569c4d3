use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Minutes in one calendar day; the full width of a day segment.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A wall-clock time within a day, minute precision.
///
/// Values are not range-checked on construction: the layout engine treats
/// out-of-range hours or minutes as geometry (a position past the end of the
/// segment) rather than as an error. Use [`TimeOfDay::from_str`] for checked
/// parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

impl TimeOfDay {
    pub const fn new(hour: u32, minute: u32) -> Self {
        TimeOfDay { hour, minute }
    }

    /// Minutes since midnight
    pub const fn minutes(self) -> u32 {
        self.hour * 60 + self.minute
    }

    /// Position of this time along the day axis, 0–100
    pub fn percent_of_day(self) -> f64 {
        minutes_to_percent(self.minutes() as f64)
    }
}

/// Convert a minute offset into a percentage of the day.
pub fn minutes_to_percent(minutes: f64) -> f64 {
    minutes / MINUTES_PER_DAY as f64 * 100.0
}

/// Convert a percentage of the day into pixels on a segment of the given width.
///
/// Multiplies by pixels per percent (`segment_width / 100`); spacing
/// thresholds are compared against this rounding.
pub fn percent_to_pixels(percent: f64, segment_width: f64) -> f64 {
    percent * (segment_width / 100.0)
}

/// Format fractional minutes as `HH:MM`, truncating both components.
///
/// 542.67 minutes formats as `09:02`, not `09:03`.
pub fn format_minutes(minutes: f64) -> String {
    let hour = (minutes / 60.0).floor() as u32;
    let minute = (minutes % 60.0).floor() as u32;
    format!("{:02}:{:02}", hour, minute)
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time \"{0}\" (expected HH:MM)")]
pub struct TimeParseError(pub String);

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || TimeParseError(s.to_string());
        let (h, m) = s.split_once(':').ok_or_else(err)?;
        if h.len() != 2 || m.len() != 2 {
            return Err(err());
        }
        if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let hour: u32 = h.parse().map_err(|_| err())?;
        let minute: u32 = m.parse().map_err(|_| err())?;
        if hour > 23 || minute > 59 {
            return Err(err());
        }
        Ok(TimeOfDay { hour, minute })
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
