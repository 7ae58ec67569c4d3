use serde::Serialize;

use super::task::TaskRecord;

/// Rightmost position a dot may take on a day segment, in percent.
/// Keeps late-evening dots from rendering past the segment edge.
pub const MAX_DOT_PERCENT: f64 = 96.0;

/// One renderable dot on a day segment, produced by the clusterer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutItem<'a> {
    /// An ungrouped task. `position_percent` is already capped at
    /// [`MAX_DOT_PERCENT`].
    Single {
        task: &'a TaskRecord,
        position_percent: f64,
    },
    /// Two or more tasks too close together to draw separately.
    Cluster(TaskCluster<'a>),
}

/// A merged group of point tasks.
///
/// `position_percent` is the mean of the member positions and is NOT capped;
/// the render layer clamps it (see `ops::timeline`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskCluster<'a> {
    pub tasks: Vec<&'a TaskRecord>,
    pub position_percent: f64,
    /// Mean member time, `HH:MM`, truncated
    pub average_time: String,
}

impl<'a> LayoutItem<'a> {
    /// Tasks represented by this item, in time order
    pub fn tasks(&self) -> Vec<&'a TaskRecord> {
        match self {
            LayoutItem::Single { task, .. } => vec![*task],
            LayoutItem::Cluster(c) => c.tasks.clone(),
        }
    }

    pub fn position_percent(&self) -> f64 {
        match self {
            LayoutItem::Single {
                position_percent, ..
            } => *position_percent,
            LayoutItem::Cluster(c) => c.position_percent,
        }
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self, LayoutItem::Cluster(_))
    }

    /// Label drawn on the dot: the task's time, or the cluster's mean time
    pub fn label(&self) -> String {
        match self {
            LayoutItem::Single { task, .. } => task.time_label(),
            LayoutItem::Cluster(c) => c.average_time.clone(),
        }
    }
}

/// Stack level of a range task. Level 0 means the range touches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeLevel<'a> {
    pub task: &'a TaskRecord,
    pub overlap_level: u32,
}
