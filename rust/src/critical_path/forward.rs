//! Forward pass: earliest start and finish times.

use chrono::Duration;

use crate::error::EngineError;
use crate::graph::TaskGraph;

use super::types::TaskTiming;

/// Compute earliest times for every task.
///
/// `order` must be a topological order of `graph`, so each task's
/// dependencies are final by the time it is visited. A task starts at the
/// latest finish among its dependencies, or at the epoch if it has none.
/// Latest times and slack are left at zero for the backward pass.
///
/// # Errors
/// [`EngineError::TimeOverflow`] when a finish time leaves the range of
/// [`Duration`]. Every later offset is bounded by the largest finish, so the
/// backward pass cannot overflow once this succeeds.
pub fn forward_pass(
    graph: &TaskGraph,
    order: &[usize],
) -> Result<Vec<TaskTiming>, EngineError> {
    let mut timings = vec![TaskTiming::default(); graph.len()];

    for &idx in order {
        let earliest_start = graph.deps[idx]
            .iter()
            .map(|&dep| timings[dep].earliest_finish)
            .fold(Duration::zero(), std::cmp::max);

        let earliest_finish = earliest_start
            .checked_add(&graph.durations[idx])
            .ok_or_else(|| EngineError::TimeOverflow(graph.index.id(idx)))?;

        let timing = &mut timings[idx];
        timing.earliest_start = earliest_start;
        timing.earliest_finish = earliest_finish;
    }

    Ok(timings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineConfig, MAX_DURATION_DAYS};
    use crate::models::Task;
    use crate::sorting::topological_sort;

    fn run(tasks: &[Task]) -> (TaskGraph, Vec<TaskTiming>) {
        let graph = TaskGraph::from_tasks(tasks, &EngineConfig::default()).unwrap();
        let order = topological_sort(&graph).unwrap();
        let timings = forward_pass(&graph, &order).unwrap();
        (graph, timings)
    }

    #[test]
    fn test_roots_start_at_epoch() {
        let (_, timings) = run(&[Task::new(1, 2.0), Task::new(2, 0.5)]);

        assert_eq!(timings[0].earliest_start, Duration::zero());
        assert_eq!(timings[0].earliest_finish, Duration::days(2));
        assert_eq!(timings[1].earliest_finish, Duration::hours(12));
    }

    #[test]
    fn test_start_waits_for_slowest_dependency() {
        let tasks = vec![
            Task::new(1, 3.0),
            Task::new(2, 5.0).depends_on([1]),
            Task::new(3, 2.0).depends_on([1]),
            Task::new(4, 4.0).depends_on([2, 3]),
        ];
        let (graph, timings) = run(&tasks);
        let at = |id: i64| timings[graph.index.get(id.into()).unwrap()];

        assert_eq!(at(2).earliest_start, Duration::days(3));
        assert_eq!(at(3).earliest_finish, Duration::days(5));
        assert_eq!(at(4).earliest_start, Duration::days(8));
        assert_eq!(at(4).earliest_finish, Duration::days(12));
    }

    #[test]
    fn test_finish_is_start_plus_duration() {
        let tasks = vec![
            Task::new(1, 1.25),
            Task::new(2, 0.0).depends_on([1]),
            Task::new(3, 7.0).depends_on([2]),
        ];
        let (graph, timings) = run(&tasks);
        for (idx, timing) in timings.iter().enumerate() {
            assert_eq!(
                timing.earliest_finish,
                timing.earliest_start + graph.durations[idx]
            );
        }
    }

    #[test]
    fn test_finish_past_duration_range_is_an_error() {
        // Each task alone is valid; the chain sum exceeds chrono's range
        let tasks: Vec<Task> = (0..110_000)
            .map(|id| {
                let task = Task::new(id, MAX_DURATION_DAYS);
                if id == 0 {
                    task
                } else {
                    task.depends_on([id - 1])
                }
            })
            .collect();
        let graph = TaskGraph::from_tasks(&tasks, &EngineConfig::default()).unwrap();
        let order = topological_sort(&graph).unwrap();

        assert!(matches!(
            forward_pass(&graph, &order),
            Err(EngineError::TimeOverflow(_))
        ));
    }
}
