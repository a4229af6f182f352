use crate::models::snapshot::BatchAggregate;
use crate::models::ticket::NormalizedRecord;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

const POINTS_EPSILON: f64 = 1e-6;

/// Totals feeding one history snapshot. Excluded records never count.
pub fn aggregate(records: &[NormalizedRecord]) -> BatchAggregate {
    records
        .iter()
        .filter(|r| !r.excluded)
        .fold(BatchAggregate::default(), |mut acc, r| {
            acc.total_remaining_days += r.remaining_days;
            if r.remaining_days > 0.0 {
                acc.remaining_task_count += 1;
            }
            if r.status.is_done() {
                acc.completed_task_count += 1;
            }
            acc
        })
}

/// Headline numbers of a sprint, in story-point days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SprintMetrics {
    pub total_stories: usize,
    pub total_points: f64,
    pub completed_points: f64,
    pub carry_over_points: f64,
}

/// Epics and sub-tasks are left out so points are not counted twice.
pub fn sprint_metrics(records: &[NormalizedRecord]) -> SprintMetrics {
    let mut m = SprintMetrics::default();

    for r in records.iter().filter(|r| !r.excluded && r.is_work_item()) {
        m.total_stories += 1;
        m.total_points += r.story_points_days;
        if r.status.is_done() {
            m.completed_points += r.story_points_days;
        }
    }

    m.carry_over_points = m.total_points - m.completed_points;
    m
}

/// A story whose sub-tasks do not add up to its own estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtaskMismatch {
    pub parent_key: String,
    pub parent_points: f64,
    pub subtask_points: f64,
}

/// Stories whose story points differ from the sum of their sub-tasks.
///
/// Stories without sub-tasks in the set, and sub-tasks whose parent is not a
/// story of the set, are ignored.
pub fn subtask_point_mismatches(records: &[NormalizedRecord]) -> Vec<SubtaskMismatch> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for r in records.iter().filter(|r| !r.excluded && r.is_subtask()) {
        if let Some(parent) = r.parent_key.as_deref() {
            *sums.entry(parent).or_default() += r.story_points_days;
        }
    }

    let stories: HashMap<&str, f64> = records
        .iter()
        .filter(|r| !r.excluded && r.is_story())
        .map(|r| (r.key.as_str(), r.story_points_days))
        .collect();

    sums.into_iter()
        .filter_map(|(parent, subtask_points)| {
            let parent_points = *stories.get(parent)?;
            ((parent_points - subtask_points).abs() > POINTS_EPSILON).then(|| SubtaskMismatch {
                parent_key: parent.to_string(),
                parent_points,
                subtask_points,
            })
        })
        .collect()
}
