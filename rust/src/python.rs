//! Python bindings for the engine entry points.

use chrono::{Duration, NaiveDateTime};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::config::{EngineConfig, MissingReferencePolicy};
use crate::engine;
use crate::models::{CriticalPathResult, EdgeValidation, ScheduleEntry, Task, TaskId};

/// A task to be scheduled (PyO3 wrapper).
#[pyclass(name = "Task")]
#[derive(Clone, Debug)]
pub struct PyTask {
    #[pyo3(get, set)]
    pub id: i64,
    #[pyo3(get, set)]
    pub duration_days: Option<f64>,
    #[pyo3(get, set)]
    pub completed: bool,
    #[pyo3(get, set)]
    pub depends_on: Vec<i64>,
}

#[pymethods]
impl PyTask {
    #[new]
    #[pyo3(signature = (id, duration_days=None, depends_on=None, completed=false))]
    fn new(
        id: i64,
        duration_days: Option<f64>,
        depends_on: Option<Vec<i64>>,
        completed: bool,
    ) -> Self {
        Self {
            id,
            duration_days,
            completed,
            depends_on: depends_on.unwrap_or_default(),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Task(id={}, duration_days={:?}, depends_on={:?})",
            self.id, self.duration_days, self.depends_on
        )
    }
}

impl From<&PyTask> for Task {
    fn from(task: &PyTask) -> Self {
        Task {
            id: TaskId(task.id),
            duration_days: task.duration_days,
            completed: task.completed,
            depends_on: task.depends_on.iter().copied().map(TaskId).collect(),
        }
    }
}

#[pyclass(name = "ScheduleEntry")]
#[derive(Clone, Debug)]
pub struct PyScheduleEntry {
    #[pyo3(get)]
    pub earliest_start: NaiveDateTime,
    #[pyo3(get)]
    pub earliest_finish: NaiveDateTime,
    #[pyo3(get)]
    pub latest_start: NaiveDateTime,
    #[pyo3(get)]
    pub latest_finish: NaiveDateTime,
    #[pyo3(get)]
    pub slack: Duration,
    #[pyo3(get)]
    pub is_on_critical_path: bool,
}

impl From<&ScheduleEntry> for PyScheduleEntry {
    fn from(entry: &ScheduleEntry) -> Self {
        Self {
            earliest_start: entry.earliest_start,
            earliest_finish: entry.earliest_finish,
            latest_start: entry.latest_start,
            latest_finish: entry.latest_finish,
            slack: entry.slack,
            is_on_critical_path: entry.is_on_critical_path,
        }
    }
}

#[pyclass(name = "CriticalPathResult")]
#[derive(Clone, Debug)]
pub struct PyCriticalPathResult {
    #[pyo3(get)]
    pub is_valid: bool,
    #[pyo3(get)]
    pub critical_path: Vec<i64>,
    #[pyo3(get)]
    pub schedule_data: HashMap<i64, PyScheduleEntry>,
    #[pyo3(get)]
    pub cycle: Option<Vec<i64>>,
    #[pyo3(get)]
    pub message: Option<String>,
    #[pyo3(get)]
    pub project_end: NaiveDateTime,
}

#[pymethods]
impl PyCriticalPathResult {
    fn __repr__(&self) -> String {
        format!(
            "CriticalPathResult(is_valid={}, critical_path={:?}, tasks={})",
            self.is_valid,
            self.critical_path,
            self.schedule_data.len()
        )
    }
}

impl From<CriticalPathResult> for PyCriticalPathResult {
    fn from(result: CriticalPathResult) -> Self {
        let (cycle, message) = match result.circular_dependency {
            Some(c) => (
                Some(c.cycle.iter().map(|id| id.0).collect()),
                Some(c.message),
            ),
            None => (None, None),
        };
        Self {
            is_valid: result.is_valid,
            critical_path: result.critical_path.iter().map(|id| id.0).collect(),
            schedule_data: result
                .schedule_data
                .iter()
                .map(|(id, entry)| (id.0, entry.into()))
                .collect(),
            cycle,
            message,
            project_end: result.project_end,
        }
    }
}

fn make_config(
    tolerance_ms: i64,
    default_duration_days: f64,
    ignore_missing: bool,
    verbosity: u8,
) -> EngineConfig {
    EngineConfig {
        tolerance: Duration::milliseconds(tolerance_ms),
        default_duration_days,
        missing_reference: if ignore_missing {
            MissingReferencePolicy::Ignore
        } else {
            MissingReferencePolicy::Reject
        },
        verbosity,
    }
}

/// Compute the critical path schedule.
///
/// # Raises
/// * ValueError on duplicate ids, invalid durations, unknown dependencies
///   (unless `ignore_missing`), or time overflow
#[pyfunction]
#[pyo3(
    name = "calculate_critical_path",
    signature = (tasks, epoch, tolerance_ms=1000, default_duration_days=1.0, ignore_missing=false, verbosity=0)
)]
fn py_calculate_critical_path(
    tasks: Vec<PyTask>,
    epoch: NaiveDateTime,
    tolerance_ms: i64,
    default_duration_days: f64,
    ignore_missing: bool,
    verbosity: u8,
) -> PyResult<PyCriticalPathResult> {
    let tasks: Vec<Task> = tasks.iter().map(Task::from).collect();
    let config = make_config(tolerance_ms, default_duration_days, ignore_missing, verbosity);

    engine::calculate_critical_path(&tasks, epoch, &config)
        .map(PyCriticalPathResult::from)
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Check a prospective dependency edge.
///
/// Returns `None` when the edge is safe, otherwise the cycle it would create.
#[pyfunction]
#[pyo3(
    name = "validate_new_dependency",
    signature = (tasks, task_id, depends_on_id, ignore_missing=false, verbosity=0)
)]
fn py_validate_new_dependency(
    tasks: Vec<PyTask>,
    task_id: i64,
    depends_on_id: i64,
    ignore_missing: bool,
    verbosity: u8,
) -> PyResult<Option<Vec<i64>>> {
    let tasks: Vec<Task> = tasks.iter().map(Task::from).collect();
    let config = make_config(1000, 1.0, ignore_missing, verbosity);

    match engine::validate_new_dependency(&tasks, TaskId(task_id), TaskId(depends_on_id), &config)
    {
        Ok(EdgeValidation::Ok) => Ok(None),
        Ok(EdgeValidation::Cycle(c)) => Ok(Some(c.cycle.iter().map(|id| id.0).collect())),
        Err(e) => Err(PyValueError::new_err(e.to_string())),
    }
}

/// The taskgraph.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTask>()?;
    m.add_class::<PyScheduleEntry>()?;
    m.add_class::<PyCriticalPathResult>()?;

    m.add_function(wrap_pyfunction!(py_calculate_critical_path, m)?)?;
    m.add_function(wrap_pyfunction!(py_validate_new_dependency, m)?)?;

    Ok(())
}
