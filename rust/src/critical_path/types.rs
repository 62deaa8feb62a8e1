//! Types for critical path calculation.

use chrono::Duration;

/// Per-task timing as offsets from the schedule epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskTiming {
    /// Earliest possible start (forward pass).
    pub earliest_start: Duration,
    /// Earliest possible finish (forward pass).
    pub earliest_finish: Duration,
    /// Latest allowable start (backward pass).
    pub latest_start: Duration,
    /// Latest allowable finish (backward pass).
    pub latest_finish: Duration,
    /// Slack = latest_start - earliest_start.
    pub slack: Duration,
    pub is_critical: bool,
}

impl Default for TaskTiming {
    fn default() -> Self {
        Self {
            earliest_start: Duration::zero(),
            earliest_finish: Duration::zero(),
            latest_start: Duration::zero(),
            latest_finish: Duration::zero(),
            slack: Duration::zero(),
            is_critical: false,
        }
    }
}

/// How the backward pass treats a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskRegime {
    /// Has a dependency or a dependent: standard reverse propagation.
    Connected,
    /// No edges at all, while other tasks do have edges: measured against
    /// the project end.
    Independent,
    /// No task in the graph has any edge: measured against the longest duration.
    Disconnected,
}

/// Whether a span is zero within `tolerance`.
pub fn is_zero_within(span: Duration, tolerance: Duration) -> bool {
    span.num_milliseconds().abs() < tolerance.num_milliseconds()
}
