use crate::model::config::LayoutConfig;
use crate::model::layout::{LayoutItem, MAX_DOT_PERCENT, TaskCluster};
use crate::model::task::TaskRecord;
use crate::model::time::{format_minutes, minutes_to_percent, percent_to_pixels};

/// Merge point tasks that would render too close together on a day segment.
///
/// Tasks are walked in time order (stable on equal minutes). A task joins
/// the open group when it is closer than `min_spacing_pixels` to the task
/// before it AND closer than `max_group_span_pixels` to the group's first
/// task; otherwise the open group is emitted and the task starts a new one.
///
/// With grouping disabled every task comes back as a single, in input order.
pub fn group_overlapping_tasks<'a>(
    tasks: &'a [TaskRecord],
    segment_width: f64,
    config: &LayoutConfig,
) -> Vec<LayoutItem<'a>> {
    group_task_refs(tasks.iter().collect(), segment_width, config)
}

/// [`group_overlapping_tasks`] over an already-selected subset of a day's tasks
pub fn group_task_refs<'a>(
    mut tasks: Vec<&'a TaskRecord>,
    segment_width: f64,
    config: &LayoutConfig,
) -> Vec<LayoutItem<'a>> {
    if !config.enable_grouping {
        return tasks.into_iter().map(single).collect();
    }

    // sort_by_key is stable: equal minutes keep input order
    tasks.sort_by_key(|t| t.start_minutes());

    let Some((&first, rest)) = tasks.split_first() else {
        return Vec::new();
    };

    let mut items = Vec::new();
    let mut group: Vec<&TaskRecord> = vec![first];
    let mut prev = first;

    for &task in rest {
        let percent = task.time.percent_of_day();
        let distance = percent_to_pixels(percent - prev.time.percent_of_day(), segment_width).abs();
        let span = percent_to_pixels(percent - group[0].time.percent_of_day(), segment_width).abs();

        if distance < config.min_spacing_pixels && span < config.max_group_span_pixels {
            group.push(task);
        } else {
            items.push(close_group(std::mem::replace(&mut group, vec![task])));
        }
        prev = task;
    }
    items.push(close_group(group));

    items
}

fn single(task: &TaskRecord) -> LayoutItem<'_> {
    LayoutItem::Single {
        task,
        position_percent: task.time.percent_of_day().min(MAX_DOT_PERCENT),
    }
}

fn close_group<'a>(group: Vec<&'a TaskRecord>) -> LayoutItem<'a> {
    if let [task] = group.as_slice() {
        return single(*task);
    }
    let total: f64 = group.iter().map(|t| t.start_minutes() as f64).sum();
    let mean = total / group.len() as f64;
    LayoutItem::Cluster(TaskCluster {
        position_percent: minutes_to_percent(mean),
        average_time: format_minutes(mean),
        tasks: group,
    })
}
