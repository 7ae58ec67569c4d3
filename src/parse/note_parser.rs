use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::model::task::TaskRecord;
use crate::model::time::TimeOfDay;
use crate::parse::content::{first_tag, has_attachment};

static TASK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^- \[([^\]]+)\]\s+\*(\d{2}:\d{2})(?:-(\d{2}:\d{2}))?\*\s+(.+)$")
        .expect("task line pattern is valid")
});

/// Extract the time-stamped tasks of one daily note.
///
/// Tasks are `- [s] *HH:MM* text` or `- [s] *HH:MM-HH:MM* text` at column 0.
/// Tab-indented `-` lines below a task are its sub-items. Any other
/// non-empty line that is not a bullet ends the current task.
pub fn parse_note_tasks(text: &str, date: Option<NaiveDate>) -> Vec<TaskRecord> {
    let mut tasks: Vec<TaskRecord> = Vec::new();
    let mut open = false;

    for line in text.lines() {
        if let Some(caps) = TASK_RE.captures(line) {
            open = false;
            let Some(time) = caps.get(2).and_then(|m| m.as_str().parse::<TimeOfDay>().ok())
            else {
                continue;
            };
            let content = caps.get(4).map_or("", |m| m.as_str()).trim();
            if content.is_empty() {
                continue;
            }
            let status = caps.get(1).map_or("", |m| m.as_str());

            let mut task = TaskRecord::new(status, time, content);
            if let Some(end) = caps.get(3) {
                task.is_time_range = true;
                task.end = end.as_str().parse::<TimeOfDay>().ok();
            }
            task.date = date;
            task.first_tag = first_tag(content);
            task.has_attachment = has_attachment(content);
            tasks.push(task);
            open = true;
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !trimmed.starts_with('-') {
            open = false;
            continue;
        }
        if open
            && line.contains('\t')
            && let Some(task) = tasks.last_mut()
        {
            task.sub_items.push(trimmed[1..].trim().to_string());
        }
    }

    tasks
}
