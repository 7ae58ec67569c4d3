use chrono::NaiveDate;
use serde::Serialize;

use crate::model::config::Settings;
use crate::model::layout::{LayoutItem, RangeLevel};
use crate::model::note::DailyNote;
use crate::model::task::TaskRecord;
use crate::ops::range::DateRange;
use crate::ops::timeline::{DayLayout, TimelineLayout};
use crate::parse::content::{ContentSpan, plain_text, tokenize_content};
use crate::util::unicode::{pad_to_width, truncate_to_width};

/// Widest content shown in one-line task listings
const CONTENT_CELLS: usize = 60;
/// Width of the date label left of a timeline strip
const LABEL_CELLS: usize = 11;

const EMPTY_CELL: char = '·';
const DOT_CELL: char = '●';
const RANGE_CELL: char = '━';

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TimelineJson<'a> {
    pub range: DateRange,
    pub zoom_label: String,
    #[serde(flatten)]
    pub layout: TimelineLayout<'a>,
}

#[derive(Serialize)]
pub struct OverlapsJson<'a> {
    pub date: NaiveDate,
    pub ranges: Vec<RangeLevel<'a>>,
}

#[derive(Serialize)]
pub struct MonthJson {
    pub year: i32,
    pub month: u32,
    pub label: String,
}

#[derive(Serialize)]
pub struct PreviewJson {
    pub date: NaiveDate,
    pub time: String,
    pub tasks: Vec<PreviewTaskJson>,
}

#[derive(Serialize)]
pub struct PreviewTaskJson {
    pub status: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    pub content: Vec<ContentSpan>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_items: Vec<Vec<ContentSpan>>,
}

pub fn preview_task_to_json(task: &TaskRecord, settings: &Settings) -> PreviewTaskJson {
    PreviewTaskJson {
        status: task.status.clone(),
        time: task.time_label(),
        emoji: task_emoji(task, settings).map(str::to_string),
        content: tokenize_content(&task.content),
        sub_items: task.sub_items.iter().map(|s| tokenize_content(s)).collect(),
    }
}

pub fn month_to_json(year: i32, month: u32) -> MonthJson {
    MonthJson {
        year,
        month,
        label: month_label(year, month),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

fn task_emoji<'s>(task: &TaskRecord, settings: &'s Settings) -> Option<&'s str> {
    settings
        .tag_style(task.first_tag.as_deref())
        .map(|s| s.emoji.as_str())
        .filter(|e| !e.is_empty())
}

/// `March 2025` style month label
pub fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", year, month))
}

/// `Sat 2025-03-01`
pub fn format_day_header(date: NaiveDate) -> String {
    date.format("%a %Y-%m-%d").to_string()
}

/// Format a single task as a one-line summary
pub fn format_task_line(task: &TaskRecord) -> String {
    let time = pad_to_width(&task.time_label(), 12);
    let subs = match task.sub_items.len() {
        0 => String::new(),
        1 => " (+1 item)".to_string(),
        n => format!(" (+{} items)", n),
    };
    format!(
        "[{}] {}{}{}",
        task.status,
        time,
        truncate_to_width(&plain_text(&task.content), CONTENT_CELLS),
        subs
    )
}

/// All tasks of a note, under a date header
pub fn format_note_tasks(note: &DailyNote) -> Vec<String> {
    let mut lines = vec![format!(
        "{}  {}",
        format_day_header(note.date),
        note.path.display()
    )];
    for task in &note.tasks {
        lines.push(format!("  {}", format_task_line(task)));
    }
    lines
}

/// Dots and range bars of one day, one per line
pub fn format_day_layout(day: &DayLayout<'_>) -> Vec<String> {
    let mut lines = vec![format!(
        "{}  segment {}px",
        format_day_header(day.date),
        day.segment_width
    )];

    for dot in &day.dots {
        let emojis = if dot.emojis.is_empty() {
            String::new()
        } else {
            format!(" {}", dot.emojis.concat())
        };
        match &dot.item {
            LayoutItem::Single { task, .. } => {
                lines.push(format!(
                    "  ● {:>6.2}%  {}{}",
                    dot.left_percent,
                    format_task_line(task),
                    emojis
                ));
            }
            LayoutItem::Cluster(cluster) => {
                lines.push(format!(
                    "  ◆ {:>6.2}%  {} ×{}{}",
                    dot.left_percent,
                    cluster.average_time,
                    cluster.tasks.len(),
                    emojis
                ));
                for task in &cluster.tasks {
                    lines.push(format!("      {}", format_task_line(task)));
                }
            }
        }
    }

    for bar in &day.ranges {
        lines.push(format!(
            "  ━ {:>6.2}%  L{}  {}",
            bar.left_percent,
            bar.overlap_level,
            format_task_line(bar.task)
        ));
    }
    lines
}

/// Range tasks with their stacking level, in start order
pub fn format_range_levels(levels: &[RangeLevel<'_>]) -> Vec<String> {
    if levels.is_empty() {
        return vec!["(no range tasks)".to_string()];
    }
    levels
        .iter()
        .map(|l| format!("L{}  {}", l.overlap_level, format_task_line(l.task)))
        .collect()
}

/// Hour marks above the strips
fn format_axis(width: usize) -> String {
    let mut cells = vec![' '; width];
    for (hour, label) in [(0, "00"), (6, "06"), (12, "12"), (18, "18")] {
        let col = hour * width / 24;
        for (i, c) in label.chars().enumerate() {
            if let Some(cell) = cells.get_mut(col + i) {
                *cell = c;
            }
        }
    }
    format!(
        "{} {}",
        " ".repeat(LABEL_CELLS),
        cells.into_iter().collect::<String>()
    )
}

fn column(percent: f64, width: usize) -> usize {
    let col = (percent / 100.0 * width as f64).floor();
    (col.max(0.0) as usize).min(width.saturating_sub(1))
}

/// Render a day as a strip of `width` cells: `●` single task, a digit for
/// a cluster of that size (`+` above 9), plus one bar row per range level.
pub fn render_day_strip(day: &DayLayout<'_>, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut dots = vec![EMPTY_CELL; width];
    for dot in &day.dots {
        let col = column(dot.left_percent, width);
        let mark = match &dot.item {
            LayoutItem::Single { .. } => DOT_CELL,
            LayoutItem::Cluster(c) => char::from_digit(c.tasks.len() as u32, 10).unwrap_or('+'),
        };
        dots[col] = if dots[col] == EMPTY_CELL { mark } else { '+' };
    }

    let label = pad_to_width(&day.date.format("%a %b %d").to_string(), LABEL_CELLS);
    let mut lines = vec![format!("{}|{}|", label, dots.into_iter().collect::<String>())];

    let max_level = day.ranges.iter().map(|r| r.overlap_level).max();
    if let Some(max_level) = max_level {
        for level in 0..=max_level {
            let bars: Vec<_> = day.ranges.iter().filter(|r| r.overlap_level == level).collect();
            if bars.is_empty() {
                continue;
            }
            let mut row = vec![' '; width];
            for bar in bars {
                let start = column(bar.left_percent, width);
                let span = (bar.width_percent / 100.0 * width as f64).round() as usize;
                let end = (start + span.max(1)).min(width);
                for cell in &mut row[start..end] {
                    *cell = RANGE_CELL;
                }
            }
            lines.push(format!(
                "{}|{}| L{}",
                " ".repeat(LABEL_CELLS),
                row.into_iter().collect::<String>(),
                level
            ));
        }
    }
    lines
}

/// The whole timeline: header, axis, one strip per day, legend
pub fn format_timeline(
    range: &DateRange,
    zoom_label: &str,
    timeline: &TimelineLayout<'_>,
    settings: &Settings,
    width: usize,
) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({} days, zoom {}, {} notes)",
        range,
        range.duration_days(),
        zoom_label,
        timeline.days.len()
    )];
    if timeline.days.is_empty() {
        lines.push("(no timed tasks in range)".to_string());
        return lines;
    }

    lines.push(format_axis(width));
    for day in &timeline.days {
        lines.extend(render_day_strip(day, width));
    }

    lines.push(String::new());
    lines.push(format!(
        "{} task  2-9 cluster size  {} range (L = stack level)",
        DOT_CELL, RANGE_CELL
    ));
    for (tag, style) in &settings.tag_styles {
        let mut entry = format!("  #{}", tag);
        if !style.emoji.is_empty() {
            entry.push_str(&format!(" {}", style.emoji));
        }
        if !style.color.is_empty() {
            entry.push_str(&format!(" {}", style.color));
        }
        lines.push(entry);
    }
    lines
}

/// Task content as plain text: links by display name, embeds as `[name]`
pub fn format_content(spans: &[ContentSpan]) -> String {
    spans
        .iter()
        .map(|span| match span {
            ContentSpan::Text(t) => t.clone(),
            ContentSpan::Tag(name) => format!("#{}", name),
            ContentSpan::Link { display, .. } => display.clone(),
            ContentSpan::Embed(name) => format!("[{}]", name),
        })
        .collect()
}

/// Hover preview: each task with emoji, content and sub-items
pub fn format_preview(preview: &PreviewJson) -> Vec<String> {
    let mut lines = vec![match preview.tasks.len() {
        1 => format!("{} {}", format_day_header(preview.date), preview.time),
        n => format!(
            "{} {} ({} tasks)",
            format_day_header(preview.date),
            preview.time,
            n
        ),
    }];
    for task in &preview.tasks {
        let emoji = task
            .emoji
            .as_deref()
            .map(|e| format!("{} ", e))
            .unwrap_or_default();
        lines.push(format!(
            "  [{}] {} {}{}",
            task.status,
            task.time,
            emoji,
            format_content(&task.content)
        ));
        for sub in &task.sub_items {
            lines.push(format!("        - {}", format_content(sub)));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::time::TimeOfDay;
    use crate::ops::timeline::layout_day;
    use crate::parse::note_parser::parse_note_tasks;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn note(text: &str) -> DailyNote {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        DailyNote {
            date,
            path: PathBuf::from("journal/2025-03-01.md"),
            tasks: parse_note_tasks(text, Some(date)),
        }
    }

    #[test]
    fn task_line() {
        let mut task = TaskRecord::range("x", TimeOfDay::new(9, 0), TimeOfDay::new(10, 30), "Focus");
        task.sub_items = vec!["a".into(), "b".into()];
        assert_eq!(format_task_line(&task), "[x] 09:00-10:30 Focus (+2 items)");
        let task = TaskRecord::new(" ", TimeOfDay::new(7, 5), "Run");
        assert_eq!(format_task_line(&task), "[ ] 07:05       Run");
        let task = TaskRecord::new("x", TimeOfDay::new(18, 0), "Dinner with [[Anna Berg|Anna]] ![[a.jpg]] #home");
        assert_eq!(format_task_line(&task), "[x] 18:00       Dinner with Anna #home");
    }

    #[test]
    fn strip_marks_dots_clusters_and_ranges() {
        let n = note(
            "- [x] *00:00* Wake\n\
             - [x] *12:00* Lunch\n\
             - [x] *12:05* Coffee\n\
             - [x] *06:00-12:00* Morning block",
        );
        let day = layout_day(&n, 0, 200.0, &Settings::default());
        let lines = render_day_strip(&day, 24);
        insta::assert_snapshot!(lines.join("\n"), @r"
        Sat Mar 01 |●···········2···········|
                   |      ━━━━━━            | L1
        ");
    }

    #[test]
    fn crowded_cell_shows_plus() {
        let n = note("- [x] *12:00* a\n- [x] *12:20* b");
        let mut settings = Settings::default();
        settings.layout.enable_grouping = false;
        let day = layout_day(&n, 0, 200.0, &settings);
        let lines = render_day_strip(&day, 24);
        assert_eq!(lines[0], "Sat Mar 01 |············+···········|");
    }

    #[test]
    fn zero_width_range_still_gets_a_cell() {
        let n = note("- [x] *22:00-00:00* Late");
        let day = layout_day(&n, 0, 200.0, &Settings::default());
        let lines = render_day_strip(&day, 24);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], format!("{}|{}━ | L0", " ".repeat(LABEL_CELLS), " ".repeat(22)));
    }

    #[test]
    fn axis_marks_quarters() {
        assert_eq!(
            format_axis(24),
            format!("{} 00    06    12    18    ", " ".repeat(LABEL_CELLS))
        );
    }

    #[test]
    fn preview_renders_spans() {
        let n = note("- [x] *09:00* Call [[Anna Berg|Anna]] ![[scan.png]] #work\n\t- bring [[Docs]]");
        let settings = Settings::default();
        let preview = PreviewJson {
            date: n.date,
            time: "09:00".into(),
            tasks: n.tasks.iter().map(|t| preview_task_to_json(t, &settings)).collect(),
        };
        assert_eq!(
            format_preview(&preview),
            vec![
                "Sat 2025-03-01 09:00",
                "  [x] 09:00 Call Anna [scan.png] #work",
                "        - bring Docs",
            ]
        );
    }

    #[test]
    fn month_labels() {
        assert_eq!(month_label(2025, 3), "March 2025");
        assert_eq!(month_label(2025, 13), "2025-13");
    }
}
