use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::time::TimeOfDay;

/// A time-stamped task line extracted from a daily note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Checkbox marker content (`x`, ` `, `>`, anything but `]`)
    pub status: String,
    /// Start time, or the only time for a point task
    pub time: TimeOfDay,
    /// Display text, may contain tags, links and embeds
    pub content: String,
    /// Sub-bullets under the task, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_items: Vec<String>,
    /// Date of the note the task was found in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// First hashtag in the content (without `#`), used as a style key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_tag: Option<String>,
    /// Whether the content embeds a file (`![[...]]`)
    #[serde(default)]
    pub has_attachment: bool,
    /// Set for `*HH:MM-HH:MM*` tasks
    #[serde(default)]
    pub is_time_range: bool,
    /// End of the interval; a range task without one is laid out as a point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<TimeOfDay>,
}

impl TaskRecord {
    /// Create a point task with the given fields and no sub-items or styling
    pub fn new(status: impl Into<String>, time: TimeOfDay, content: impl Into<String>) -> Self {
        TaskRecord {
            status: status.into(),
            time,
            content: content.into(),
            sub_items: Vec::new(),
            date: None,
            first_tag: None,
            has_attachment: false,
            is_time_range: false,
            end: None,
        }
    }

    /// Create a range task spanning `time..end`
    pub fn range(
        status: impl Into<String>,
        time: TimeOfDay,
        end: TimeOfDay,
        content: impl Into<String>,
    ) -> Self {
        TaskRecord {
            is_time_range: true,
            end: Some(end),
            ..TaskRecord::new(status, time, content)
        }
    }

    /// Minutes since midnight of the start time
    pub fn start_minutes(&self) -> u32 {
        self.time.minutes()
    }

    /// The `(start, end)` interval in minutes, if this is a well-formed range task
    pub fn interval(&self) -> Option<(u32, u32)> {
        if !self.is_time_range {
            return None;
        }
        self.end.map(|end| (self.time.minutes(), end.minutes()))
    }

    /// True for range tasks that carry an end time
    pub fn is_range(&self) -> bool {
        self.interval().is_some()
    }

    /// The time label shown on the dot (`09:00` or `09:00-10:30`)
    pub fn time_label(&self) -> String {
        match (self.is_time_range, self.end) {
            (true, Some(end)) => format!("{}-{}", self.time, end),
            _ => self.time.to_string(),
        }
    }
}
