use chrono::NaiveDate;
use serde::Serialize;

use crate::model::config::Settings;
use crate::model::layout::{LayoutItem, MAX_DOT_PERCENT};
use crate::model::note::DailyNote;
use crate::model::task::TaskRecord;
use crate::model::time::{MINUTES_PER_DAY, minutes_to_percent};
use crate::ops::cluster::group_task_refs;
use crate::ops::overlap::detect_range_overlaps;
use crate::ops::zoom::ZoomState;

/// Shown on dots whose tasks embed a file but have no styled emoji
pub const ATTACHMENT_EMOJI: &str = "📸";

/// A dot ready to draw: clusterer output plus styling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dot<'a> {
    pub item: LayoutItem<'a>,
    /// Position within the day segment, capped at [`MAX_DOT_PERCENT`]
    pub left_percent: f64,
    pub label: String,
    /// Tag colour of a single task; clusters are drawn uncoloured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Unique emojis of the member tasks, in member order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub emojis: Vec<String>,
}

/// A range task drawn as a bar spanning its interval
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeBar<'a> {
    pub task: &'a TaskRecord,
    pub overlap_level: u32,
    pub left_percent: f64,
    pub width_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayLayout<'a> {
    pub date: NaiveDate,
    pub index: usize,
    /// Left edge of this day within the whole track, in pixels
    pub offset_px: f64,
    pub segment_width: f64,
    pub dots: Vec<Dot<'a>>,
    pub ranges: Vec<RangeBar<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineLayout<'a> {
    pub zoom: f64,
    pub segment_width: f64,
    pub total_width: f64,
    pub days: Vec<DayLayout<'a>>,
}

/// Lay out one day at position `index` on the track.
///
/// Range tasks with an end time become bars stacked by the leveler; every
/// other task goes through the clusterer.
pub fn layout_day<'a>(
    note: &'a DailyNote,
    index: usize,
    segment_width: f64,
    settings: &Settings,
) -> DayLayout<'a> {
    let points: Vec<&TaskRecord> = note.tasks.iter().filter(|t| !t.is_range()).collect();
    let items = group_task_refs(points, segment_width, &settings.layout);

    let dots = items
        .into_iter()
        .map(|item| {
            let (color, emojis) = match &item {
                LayoutItem::Single { task, .. } => (
                    style_color(task, settings),
                    emojis_for([*task].into_iter(), settings),
                ),
                LayoutItem::Cluster(cluster) => {
                    (None, emojis_for(cluster.tasks.iter().copied(), settings))
                }
            };
            Dot {
                left_percent: item.position_percent().min(MAX_DOT_PERCENT),
                label: item.label(),
                color,
                emojis,
                item,
            }
        })
        .collect();

    let ranges = detect_range_overlaps(&note.tasks)
        .into_iter()
        .filter_map(|level| {
            let (start, end) = level.task.interval()?;
            let width = (f64::from(end) - f64::from(start)) / f64::from(MINUTES_PER_DAY) * 100.0;
            Some(RangeBar {
                task: level.task,
                overlap_level: level.overlap_level,
                left_percent: minutes_to_percent(f64::from(start)),
                width_percent: width.max(0.0),
                color: style_color(level.task, settings),
            })
        })
        .collect();

    DayLayout {
        date: note.date,
        index,
        offset_px: segment_width * index as f64,
        segment_width,
        dots,
        ranges,
    }
}

/// Lay out consecutive day segments for `notes` at the given zoom
pub fn layout_timeline<'a>(
    notes: &'a [DailyNote],
    zoom: &ZoomState,
    settings: &Settings,
) -> TimelineLayout<'a> {
    let segment_width = zoom.segment_width(&settings.zoom);
    let days = notes
        .iter()
        .enumerate()
        .map(|(i, note)| layout_day(note, i, segment_width, settings))
        .collect();

    TimelineLayout {
        zoom: zoom.level,
        segment_width,
        total_width: segment_width * notes.len() as f64,
        days,
    }
}

fn style_color(task: &TaskRecord, settings: &Settings) -> Option<String> {
    settings
        .tag_style(task.first_tag.as_deref())
        .map(|s| s.color.clone())
        .filter(|c| !c.is_empty())
}

fn emojis_for<'t>(tasks: impl Iterator<Item = &'t TaskRecord>, settings: &Settings) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for task in tasks {
        let styled = settings
            .tag_style(task.first_tag.as_deref())
            .map(|s| s.emoji.as_str())
            .filter(|e| !e.is_empty());
        let emoji = match styled {
            Some(e) => e,
            None if task.has_attachment => ATTACHMENT_EMOJI,
            None => continue,
        };
        if !out.iter().any(|e| e == emoji) {
            out.push(emoji.to_string());
        }
    }
    out
}
