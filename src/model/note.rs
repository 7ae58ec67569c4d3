use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

use super::task::TaskRecord;

/// A daily note and the tasks found in it
#[derive(Debug, Clone, Serialize)]
pub struct DailyNote {
    pub date: NaiveDate,
    /// Path relative to the vault root
    pub path: PathBuf,
    pub tasks: Vec<TaskRecord>,
}
