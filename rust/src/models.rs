//! Core data types for the scheduling engine.

use chrono::{Duration, NaiveDateTime};
use rustc_hash::FxHashMap;
use std::fmt;

/// Integer identity of a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub i64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TaskId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A task to be scheduled.
#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    pub id: TaskId,
    /// Estimated duration in days. `None` falls back to the configured default.
    pub duration_days: Option<f64>,
    /// Informational only; the engine schedules completed tasks like any other.
    pub completed: bool,
    /// Tasks that must finish before this one starts.
    pub depends_on: Vec<TaskId>,
}

impl Task {
    /// Create an incomplete task with no dependencies.
    pub fn new(id: i64, duration_days: f64) -> Self {
        Self {
            id: TaskId(id),
            duration_days: Some(duration_days),
            completed: false,
            depends_on: Vec::new(),
        }
    }

    /// Builder-style helper adding prerequisites.
    pub fn depends_on(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.depends_on.extend(ids.into_iter().map(TaskId));
        self
    }
}

/// Computed timing for one task.
///
/// All instants share the epoch passed to the engine, so they are only
/// meaningful relative to each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub earliest_start: NaiveDateTime,
    pub earliest_finish: NaiveDateTime,
    pub latest_start: NaiveDateTime,
    pub latest_finish: NaiveDateTime,
    /// `latest_start - earliest_start`.
    pub slack: Duration,
    pub is_on_critical_path: bool,
}

/// A circular dependency reported back to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CircularDependency {
    /// Task ids along the cycle. For cycles found by traversal the first id
    /// is repeated at the end; a self-dependency is a single id.
    pub cycle: Vec<TaskId>,
    pub message: String,
}

impl CircularDependency {
    pub fn new(cycle: Vec<TaskId>) -> Self {
        let path = cycle
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(" → ");
        Self {
            message: format!("Circular dependency detected: {}", path),
            cycle,
        }
    }
}

impl fmt::Display for CircularDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of a full critical path computation.
#[derive(Clone, Debug, PartialEq)]
pub struct CriticalPathResult {
    pub is_valid: bool,
    /// Critical task ids ordered by earliest start. Empty when invalid.
    pub critical_path: Vec<TaskId>,
    /// Schedule for every task. Empty when invalid.
    pub schedule_data: FxHashMap<TaskId, ScheduleEntry>,
    pub circular_dependency: Option<CircularDependency>,
    /// Latest earliest-finish over all tasks (the epoch for empty input).
    pub project_end: NaiveDateTime,
}

impl CriticalPathResult {
    /// An invalid result carrying no schedule data.
    pub fn invalid(cycle: CircularDependency, epoch: NaiveDateTime) -> Self {
        Self {
            is_valid: false,
            critical_path: Vec::new(),
            schedule_data: FxHashMap::default(),
            circular_dependency: Some(cycle),
            project_end: epoch,
        }
    }

    pub fn entry(&self, id: TaskId) -> Option<&ScheduleEntry> {
        self.schedule_data.get(&id)
    }
}

/// Outcome of validating a single prospective edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EdgeValidation {
    Ok,
    Cycle(CircularDependency),
}

impl EdgeValidation {
    pub fn is_ok(&self) -> bool {
        matches!(self, EdgeValidation::Ok)
    }

    pub fn cycle(&self) -> Option<&[TaskId]> {
        match self {
            EdgeValidation::Ok => None,
            EdgeValidation::Cycle(c) => Some(c.cycle.as_slice()),
        }
    }
}
