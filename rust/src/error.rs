//! Errors for malformed engine input.
//!
//! Cycles are not errors; they come back as invalid results.

use thiserror::Error;

use crate::models::TaskId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Duplicate task id: {0}")]
    DuplicateTask(TaskId),
    #[error("Task {task} has invalid duration: {days} days")]
    InvalidDuration { task: TaskId, days: f64 },
    #[error("Task {task} depends on unknown task {missing}")]
    UnknownTask { task: TaskId, missing: TaskId },
    #[error("Schedule for task {0} falls outside the representable time range")]
    TimeOverflow(TaskId),
}
