use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("date pattern is valid"));

/// Date of a daily note from its file name.
///
/// With `YYYY-MM-DD` the first ISO-looking substring is used, so
/// `2025-01-15 Wednesday.md` works. Any other format takes the whole stem.
pub fn date_from_filename(file_name: &str, date_format: &str) -> Option<NaiveDate> {
    let stem = file_name.strip_suffix(".md").unwrap_or(file_name);
    let candidate = if date_format == "YYYY-MM-DD" {
        ISO_DATE_RE.find(stem)?.as_str()
    } else {
        stem
    };
    NaiveDate::parse_from_str(candidate, "%Y-%m-%d").ok()
}
