//! Engine entry points.
//!
//! Pure functions over a task snapshot: no I/O, no shared state, safe to call
//! concurrently. Cycles come back as invalid results; only malformed input
//! produces an [`EngineError`].

use chrono::{Duration, NaiveDateTime};
use rustc_hash::FxHashMap;

use crate::config::{EngineConfig, MissingReferencePolicy};
use crate::critical_path::{
    backward_pass, classify_tasks, extract_critical_path, forward_pass, TaskTiming,
};
use crate::cycle::{find_cycle, would_create_cycle};
use crate::error::EngineError;
use crate::graph::{build_adjacency, TaskGraph};
use crate::models::{
    CircularDependency, CriticalPathResult, EdgeValidation, ScheduleEntry, Task, TaskId,
};
use crate::sorting::topological_sort_or_cycle;
use crate::{log_debug, log_passes, log_summary};

/// Compute the full CPM schedule for a task snapshot.
///
/// Times are placed relative to `epoch`. The result is all-or-nothing: either
/// every task has a [`ScheduleEntry`], or the result is invalid and carries
/// the first circular dependency found.
///
/// # Errors
/// Duplicate ids, invalid durations, dangling references under
/// [`MissingReferencePolicy::Reject`], and schedules that overflow the
/// representable time range.
pub fn calculate_critical_path(
    tasks: &[Task],
    epoch: NaiveDateTime,
    config: &EngineConfig,
) -> Result<CriticalPathResult, EngineError> {
    let verbosity = config.verbosity;
    let graph = TaskGraph::from_tasks(tasks, config)?;

    if let Some(cycle) = find_cycle(&build_adjacency(tasks)) {
        let cycle = CircularDependency::new(cycle);
        log_summary!(verbosity, "[cpm] {}", cycle);
        return Ok(CriticalPathResult::invalid(cycle, epoch));
    }

    let order = match topological_sort_or_cycle(&graph) {
        Ok(order) => order,
        Err(cycle) => {
            // Only reachable if traversal and sorting disagree on the same graph
            let cycle = CircularDependency::new(cycle);
            log_summary!(verbosity, "[cpm] topological sort stuck: {}", cycle);
            return Ok(CriticalPathResult::invalid(cycle, epoch));
        }
    };
    log_passes!(verbosity, "[cpm] sorted {} tasks", order.len());

    let mut timings = forward_pass(&graph, &order)?;
    let regimes = classify_tasks(&graph);
    backward_pass(&graph, &mut timings, &order, &regimes, config.tolerance);
    let critical_path = extract_critical_path(&graph, &timings);

    let mut schedule_data: FxHashMap<TaskId, ScheduleEntry> =
        FxHashMap::with_capacity_and_hasher(graph.len(), Default::default());
    let mut project_end = epoch;
    for (idx, timing) in timings.iter().enumerate() {
        let id = graph.index.id(idx);
        log_debug!(
            verbosity,
            "[cpm] task {} {:?}: es={} ef={} ls={} lf={} slack={} critical={}",
            id,
            regimes[idx],
            timing.earliest_start,
            timing.earliest_finish,
            timing.latest_start,
            timing.latest_finish,
            timing.slack,
            timing.is_critical
        );
        let entry = to_entry(id, timing, epoch)?;
        project_end = project_end.max(entry.earliest_finish);
        schedule_data.insert(id, entry);
    }

    log_summary!(
        verbosity,
        "[cpm] {} tasks scheduled, {} critical, project ends {}",
        schedule_data.len(),
        critical_path.len(),
        project_end
    );

    Ok(CriticalPathResult {
        is_valid: true,
        critical_path,
        schedule_data,
        circular_dependency: None,
        project_end,
    })
}

/// Check whether making `task_id` depend on `depends_on_id` keeps the graph acyclic.
///
/// The edge is never committed. A self-dependency is always rejected with the
/// one-element cycle `[task_id]`, even for ids absent from `tasks`.
///
/// # Errors
/// Under [`MissingReferencePolicy::Reject`], either id being absent from `tasks`.
pub fn validate_new_dependency(
    tasks: &[Task],
    task_id: TaskId,
    depends_on_id: TaskId,
    config: &EngineConfig,
) -> Result<EdgeValidation, EngineError> {
    if config.missing_reference == MissingReferencePolicy::Reject && task_id != depends_on_id {
        for id in [task_id, depends_on_id] {
            if !tasks.iter().any(|t| t.id == id) {
                return Err(EngineError::UnknownTask {
                    task: task_id,
                    missing: id,
                });
            }
        }
    }

    let adjacency = build_adjacency(tasks);
    match would_create_cycle(&adjacency, task_id, depends_on_id) {
        Some(cycle) => {
            let cycle = CircularDependency::new(cycle);
            log_summary!(
                config.verbosity,
                "[cpm] rejected edge {} -> {}: {}",
                task_id,
                depends_on_id,
                cycle
            );
            Ok(EdgeValidation::Cycle(cycle))
        }
        None => Ok(EdgeValidation::Ok),
    }
}

fn to_entry(
    id: TaskId,
    timing: &TaskTiming,
    epoch: NaiveDateTime,
) -> Result<ScheduleEntry, EngineError> {
    let at = |offset: Duration| {
        epoch
            .checked_add_signed(offset)
            .ok_or(EngineError::TimeOverflow(id))
    };
    Ok(ScheduleEntry {
        earliest_start: at(timing.earliest_start)?,
        earliest_finish: at(timing.earliest_finish)?,
        latest_start: at(timing.latest_start)?,
        latest_finish: at(timing.latest_finish)?,
        slack: timing.slack,
        is_on_critical_path: timing.is_critical,
    })
}
