//! Backward pass: latest times, slack and criticality.
//!
//! Plain backward CPM misjudges tasks that have no edges at all, so every task
//! is first classified into a [`TaskRegime`] and each regime has its own rule:
//! - `Connected`: latest finish is the earliest latest-start among successors,
//!   or the project end for sinks. Critical when slack is zero.
//! - `Independent`: pinned to finish at the project end. Critical when its own
//!   finish reaches the project end.
//!
//! Every regime uses the same test: slack is zero when strictly inside the
//! tolerance, so a task exactly one tolerance short is not critical.
//! - `Disconnected` (no edges anywhere): only the longest task(s) are critical,
//!   the rest get slack equal to the difference in duration.

use chrono::Duration;

use crate::graph::TaskGraph;

use super::types::{is_zero_within, TaskRegime, TaskTiming};

/// Classify every task once, before the backward pass.
pub fn classify_tasks(graph: &TaskGraph) -> Vec<TaskRegime> {
    if !graph.has_edges() {
        return vec![TaskRegime::Disconnected; graph.len()];
    }
    (0..graph.len())
        .map(|idx| {
            if graph.deps[idx].is_empty() && graph.dependents[idx].is_empty() {
                TaskRegime::Independent
            } else {
                TaskRegime::Connected
            }
        })
        .collect()
}

/// Latest earliest-finish over all tasks; zero for an empty graph.
pub fn project_end(timings: &[TaskTiming]) -> Duration {
    timings
        .iter()
        .map(|t| t.earliest_finish)
        .fold(Duration::zero(), std::cmp::max)
}

/// Fill in latest times, slack and criticality.
///
/// `timings` must come from the forward pass over the same `order`, and
/// `regimes` from [`classify_tasks`].
pub fn backward_pass(
    graph: &TaskGraph,
    timings: &mut [TaskTiming],
    order: &[usize],
    regimes: &[TaskRegime],
    tolerance: Duration,
) {
    let end = project_end(timings);
    let longest = graph
        .durations
        .iter()
        .copied()
        .fold(Duration::zero(), std::cmp::max);

    // Reverse topological order: successors are final before their prerequisites.
    for &idx in order.iter().rev() {
        let duration = graph.durations[idx];
        match regimes[idx] {
            TaskRegime::Connected => {
                let latest_finish = graph.dependents[idx]
                    .iter()
                    .map(|&succ| timings[succ].latest_start)
                    .min()
                    .unwrap_or(end);
                schedule_connected(&mut timings[idx], duration, latest_finish, tolerance);
            }
            TaskRegime::Independent => {
                schedule_independent(&mut timings[idx], duration, end, tolerance);
            }
            TaskRegime::Disconnected => {
                schedule_disconnected(&mut timings[idx], duration, longest, tolerance);
            }
        }
    }
}

fn schedule_connected(
    timing: &mut TaskTiming,
    duration: Duration,
    latest_finish: Duration,
    tolerance: Duration,
) {
    timing.latest_finish = latest_finish;
    timing.latest_start = latest_finish - duration;
    timing.slack = timing.latest_start - timing.earliest_start;
    timing.is_critical = is_zero_within(timing.slack, tolerance);
}

fn schedule_independent(
    timing: &mut TaskTiming,
    duration: Duration,
    project_end: Duration,
    tolerance: Duration,
) {
    timing.latest_finish = project_end;
    timing.latest_start = project_end - duration;
    timing.slack = project_end - timing.earliest_finish;
    timing.is_critical = is_zero_within(timing.slack, tolerance);
}

fn schedule_disconnected(
    timing: &mut TaskTiming,
    duration: Duration,
    longest: Duration,
    tolerance: Duration,
) {
    let slack = longest - duration;
    timing.slack = slack;
    timing.latest_start = timing.earliest_start + slack;
    timing.latest_finish = timing.earliest_finish + slack;
    timing.is_critical = is_zero_within(slack, tolerance);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::critical_path::forward::forward_pass;
    use crate::models::{Task, TaskId};
    use crate::sorting::topological_sort;

    fn tolerance() -> Duration {
        Duration::milliseconds(1000)
    }

    /// Run both passes and return timings keyed by task id.
    fn run(tasks: &[Task]) -> impl Fn(i64) -> TaskTiming {
        let graph = TaskGraph::from_tasks(tasks, &EngineConfig::default()).unwrap();
        let order = topological_sort(&graph).unwrap();
        let mut timings = forward_pass(&graph, &order).unwrap();
        let regimes = classify_tasks(&graph);
        backward_pass(&graph, &mut timings, &order, &regimes, tolerance());
        move |id| timings[graph.index.get(TaskId(id)).unwrap()]
    }

    #[test]
    fn test_classify_all_disconnected() {
        let tasks = vec![Task::new(1, 2.0), Task::new(2, 5.0)];
        let graph = TaskGraph::from_tasks(&tasks, &EngineConfig::default()).unwrap();
        assert_eq!(
            classify_tasks(&graph),
            vec![TaskRegime::Disconnected, TaskRegime::Disconnected]
        );
    }

    #[test]
    fn test_classify_mixed() {
        let tasks = vec![
            Task::new(1, 2.0),
            Task::new(2, 3.0).depends_on([1]),
            Task::new(3, 1.0),
        ];
        let graph = TaskGraph::from_tasks(&tasks, &EngineConfig::default()).unwrap();
        assert_eq!(
            classify_tasks(&graph),
            vec![
                TaskRegime::Connected,
                TaskRegime::Connected,
                TaskRegime::Independent
            ]
        );
    }

    #[test]
    fn test_connected_rule_in_isolation() {
        let mut timing = TaskTiming {
            earliest_start: Duration::days(3),
            earliest_finish: Duration::days(5),
            ..TaskTiming::default()
        };
        schedule_connected(&mut timing, Duration::days(2), Duration::days(8), tolerance());

        assert_eq!(timing.latest_start, Duration::days(6));
        assert_eq!(timing.slack, Duration::days(3));
        assert!(!timing.is_critical);
    }

    #[test]
    fn test_independent_rule_in_isolation() {
        let mut short = TaskTiming {
            earliest_finish: Duration::days(1),
            ..TaskTiming::default()
        };
        schedule_independent(&mut short, Duration::days(1), Duration::days(4), tolerance());
        assert_eq!(short.slack, Duration::days(3));
        assert_eq!(short.latest_start, Duration::days(3));
        assert_eq!(short.latest_finish, Duration::days(4));
        assert!(!short.is_critical);

        // Half a second short of the project end still counts as reaching it
        let nearly = Duration::days(4) - Duration::milliseconds(500);
        let mut long = TaskTiming {
            earliest_finish: nearly,
            ..TaskTiming::default()
        };
        schedule_independent(&mut long, nearly, Duration::days(4), tolerance());
        assert!(long.is_critical);

        let boundary = Duration::days(4) - tolerance();
        let mut short_by_tolerance = TaskTiming {
            earliest_finish: boundary,
            ..TaskTiming::default()
        };
        schedule_independent(&mut short_by_tolerance, boundary, Duration::days(4), tolerance());
        assert_eq!(short_by_tolerance.slack, tolerance());
        assert!(!short_by_tolerance.is_critical);
    }

    #[test]
    fn test_independent_task_at_tolerance_boundary() {
        // Chain ends at 2 days; task 3 is one tolerance short, task 4 just inside
        let day_ms = 86_400_000.0;
        let at = run(&[
            Task::new(1, 1.0),
            Task::new(2, 1.0).depends_on([1]),
            Task::new(3, (2.0 * day_ms - 1000.0) / day_ms),
            Task::new(4, (2.0 * day_ms - 999.0) / day_ms),
        ]);
        assert_eq!(at(3).slack, tolerance());
        assert!(!at(3).is_critical);
        assert_eq!(at(4).slack, Duration::milliseconds(999));
        assert!(at(4).is_critical);
        assert!(at(2).is_critical);
    }

    #[test]
    fn test_disconnected_rule_in_isolation() {
        let mut timing = TaskTiming {
            earliest_finish: Duration::days(2),
            ..TaskTiming::default()
        };
        schedule_disconnected(&mut timing, Duration::days(2), Duration::days(5), tolerance());

        assert_eq!(timing.slack, Duration::days(3));
        assert_eq!(timing.latest_start, Duration::days(3));
        assert_eq!(timing.latest_finish, Duration::days(5));
        assert!(!timing.is_critical);
    }

    #[test]
    fn test_single_task() {
        let at = run(&[Task::new(1, 2.0)]);
        assert!(at(1).is_critical);
        assert_eq!(at(1).slack, Duration::zero());
        assert_eq!(at(1).latest_finish, Duration::days(2));
    }

    #[test]
    fn test_linear_chain_all_critical() {
        let at = run(&[
            Task::new(1, 2.0),
            Task::new(2, 3.0).depends_on([1]),
            Task::new(3, 1.0).depends_on([2]),
        ]);
        for id in 1..=3 {
            assert!(at(id).is_critical);
            assert_eq!(at(id).slack, Duration::zero());
        }
        assert_eq!(at(3).latest_finish, Duration::days(6));
    }

    #[test]
    fn test_diamond_slack() {
        let at = run(&[
            Task::new(1, 3.0),
            Task::new(2, 5.0).depends_on([1]),
            Task::new(3, 2.0).depends_on([1]),
            Task::new(4, 4.0).depends_on([2, 3]),
        ]);
        assert!(at(1).is_critical);
        assert!(at(2).is_critical);
        assert!(at(4).is_critical);
        assert!(!at(3).is_critical);
        assert_eq!(at(3).slack, Duration::days(3));
        assert_eq!(at(3).latest_start, Duration::days(6));
    }

    #[test]
    fn test_all_independent_longest_is_critical() {
        let at = run(&[Task::new(1, 2.0), Task::new(2, 5.0), Task::new(3, 3.0)]);
        assert!(at(2).is_critical);
        assert!(!at(1).is_critical);
        assert!(!at(3).is_critical);
        assert_eq!(at(1).slack, Duration::days(3));
        assert_eq!(at(3).slack, Duration::days(2));
    }

    #[test]
    fn test_all_independent_ties_share_criticality() {
        let at = run(&[Task::new(1, 4.0), Task::new(2, 4.0), Task::new(3, 1.0)]);
        assert!(at(1).is_critical);
        assert!(at(2).is_critical);
        assert!(!at(3).is_critical);
    }

    #[test]
    fn test_independent_task_longer_than_chain() {
        // Chain 1 -> 2 takes 5 days, standalone task 3 takes 6
        let at = run(&[
            Task::new(1, 2.0),
            Task::new(2, 3.0).depends_on([1]),
            Task::new(3, 6.0),
            Task::new(4, 1.0),
        ]);
        assert!(at(3).is_critical);
        assert!(!at(1).is_critical);
        assert!(!at(2).is_critical);
        assert_eq!(at(1).slack, Duration::days(1));
        assert_eq!(at(2).slack, Duration::days(1));
        assert!(!at(4).is_critical);
        assert_eq!(at(4).slack, Duration::days(5));
    }

    #[test]
    fn test_short_independent_task_beside_chain() {
        let at = run(&[
            Task::new(1, 2.0),
            Task::new(2, 3.0).depends_on([1]),
            Task::new(3, 1.0),
        ]);
        assert!(at(1).is_critical);
        assert!(at(2).is_critical);
        assert!(!at(3).is_critical);
        assert_eq!(at(3).slack, Duration::days(4));
        assert_eq!(at(3).latest_start, Duration::days(4));
    }

    #[test]
    fn test_parallel_critical_chains() {
        // Two separate 4-day chains feeding nothing: both are critical
        let at = run(&[
            Task::new(1, 1.0),
            Task::new(2, 3.0).depends_on([1]),
            Task::new(3, 2.0),
            Task::new(4, 2.0).depends_on([3]),
        ]);
        for id in 1..=4 {
            assert!(at(id).is_critical, "task {} should be critical", id);
        }
    }

    #[test]
    fn test_milestone_in_chain() {
        let at = run(&[
            Task::new(1, 2.0),
            Task::new(2, 0.0).depends_on([1]),
            Task::new(3, 1.0).depends_on([2]),
        ]);
        assert!(at(2).is_critical);
        assert_eq!(at(2).earliest_start, at(2).earliest_finish);
        assert_eq!(at(3).latest_finish, Duration::days(3));
    }
}
