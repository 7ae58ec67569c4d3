use crate::model::layout::RangeLevel;
use crate::model::task::TaskRecord;

/// Assign a stacking level to every range task of a day.
///
/// A range that contains a point task (inclusive on both ends) or overlaps
/// another range (half-open, touching endpoints do not count) is leveled;
/// one that touches nothing stays at level 0. Leveled ranges are then
/// stacked greedily in start order: each takes one more than the highest
/// level among earlier leveled ranges it overlaps.
///
/// Tasks flagged as ranges but missing an end time are treated as points.
/// The result is sorted by start minute, ties in input order.
pub fn detect_range_overlaps(tasks: &[TaskRecord]) -> Vec<RangeLevel<'_>> {
    let ranges: Vec<(&TaskRecord, (u32, u32))> = tasks
        .iter()
        .filter_map(|t| t.interval().map(|iv| (t, iv)))
        .collect();
    let points: Vec<u32> = tasks
        .iter()
        .filter(|t| !t.is_range())
        .map(|t| t.start_minutes())
        .collect();

    let mut leveled: Vec<(&TaskRecord, (u32, u32), u32)> = ranges
        .iter()
        .enumerate()
        .map(|(i, &(task, iv))| {
            let touches_point = points.iter().any(|&p| iv.0 <= p && p <= iv.1);
            let touches_range = || {
                ranges
                    .iter()
                    .enumerate()
                    .any(|(j, &(_, other))| i != j && ranges_overlap(iv, other))
            };
            let level = u32::from(touches_point || touches_range());
            (task, iv, level)
        })
        .collect();

    leveled.sort_by_key(|&(_, (start, _), _)| start);

    for i in 0..leveled.len() {
        if leveled[i].2 == 0 {
            continue;
        }
        let current = leveled[i].1;
        let below = leveled[..i]
            .iter()
            .filter(|&&(_, iv, level)| level > 0 && ranges_overlap(current, iv))
            .map(|&(_, _, level)| level)
            .max()
            .unwrap_or(0);
        leveled[i].2 = below + 1;
    }

    leveled
        .into_iter()
        .map(|(task, _, overlap_level)| RangeLevel {
            task,
            overlap_level,
        })
        .collect()
}

/// Half-open interval overlap: `[s1, e1)` and `[s2, e2)` share a minute.
pub fn ranges_overlap(a: (u32, u32), b: (u32, u32)) -> bool {
    a.0 < b.1 && b.0 < a.1
}
