//! Critical path extraction.

use crate::graph::TaskGraph;
use crate::models::TaskId;

use super::types::TaskTiming;

/// Ids of all critical tasks, ordered by earliest start.
///
/// The sort is stable, so tasks starting together keep input order.
pub fn extract_critical_path(graph: &TaskGraph, timings: &[TaskTiming]) -> Vec<TaskId> {
    let mut critical: Vec<usize> = (0..graph.len())
        .filter(|&idx| timings[idx].is_critical)
        .collect();
    critical.sort_by_key(|&idx| timings[idx].earliest_start);
    critical.into_iter().map(|idx| graph.index.id(idx)).collect()
}
