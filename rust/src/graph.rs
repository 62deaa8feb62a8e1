//! Dependency graph construction.
//!
//! Two representations are built from the flat task list:
//! - [`AdjacencyMap`]: task id -> prerequisite ids, unvalidated, used by
//!   cycle detection (including for prospective edges).
//! - [`TaskGraph`]: validated, index-based graph with resolved durations and
//!   a reverse (dependents) adjacency, used by sorting and the CPM passes.

use chrono::Duration;
use rustc_hash::FxHashMap;

use crate::config::{EngineConfig, MissingReferencePolicy, MAX_DURATION_DAYS};
use crate::error::EngineError;
use crate::interner::TaskIndex;
use crate::models::{Task, TaskId};

const MS_PER_DAY: f64 = 86_400_000.0;

/// Convert a day count to a millisecond-resolution duration.
pub fn days_to_duration(days: f64) -> Duration {
    Duration::milliseconds((days * MS_PER_DAY).round() as i64)
}

/// Task id -> ids it depends on, keeping input order for deterministic traversal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdjacencyMap {
    order: Vec<TaskId>,
    edges: FxHashMap<TaskId, Vec<TaskId>>,
}

impl AdjacencyMap {
    /// Node ids in input order.
    pub fn nodes(&self) -> &[TaskId] {
        &self.order
    }

    /// Prerequisites of `id`; empty for ids with no entry.
    pub fn dependencies(&self, id: TaskId) -> &[TaskId] {
        self.edges.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.edges.contains_key(&id)
    }

    /// Record that `task` depends on `depends_on`, adding `task` as a node if needed.
    pub fn add_edge(&mut self, task: TaskId, depends_on: TaskId) {
        self.ensure_node(task).push(depends_on);
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn ensure_node(&mut self, id: TaskId) -> &mut Vec<TaskId> {
        if !self.edges.contains_key(&id) {
            self.order.push(id);
        }
        self.edges.entry(id).or_default()
    }
}

/// Build the adjacency map for a task list. No validation is performed;
/// repeated ids merge their dependency lists.
pub fn build_adjacency(tasks: &[Task]) -> AdjacencyMap {
    let mut adjacency = AdjacencyMap {
        order: Vec::with_capacity(tasks.len()),
        edges: FxHashMap::with_capacity_and_hasher(tasks.len(), Default::default()),
    };
    for task in tasks {
        adjacency
            .ensure_node(task.id)
            .extend(task.depends_on.iter().copied());
    }
    adjacency
}

/// Validated task graph. All lookups use direct vector indexing.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    pub index: TaskIndex,
    /// Resolved durations indexed by position.
    pub durations: Vec<Duration>,
    /// Prerequisites by position, deduplicated, in `depends_on` order.
    pub deps: Vec<Vec<usize>>,
    /// Reverse edges: tasks that depend on each position.
    pub dependents: Vec<Vec<usize>>,
}

impl TaskGraph {
    /// Build and validate the graph.
    ///
    /// Fails on duplicate ids, durations that are negative, non-finite or too
    /// large, and (under [`MissingReferencePolicy::Reject`]) dangling references.
    pub fn from_tasks(tasks: &[Task], config: &EngineConfig) -> Result<Self, EngineError> {
        let mut index = TaskIndex::with_capacity(tasks.len());
        let mut durations = Vec::with_capacity(tasks.len());

        for task in tasks {
            if index.insert(task.id).is_none() {
                return Err(EngineError::DuplicateTask(task.id));
            }
            let days = task.duration_days.unwrap_or(config.default_duration_days);
            if !days.is_finite() || !(0.0..=MAX_DURATION_DAYS).contains(&days) {
                return Err(EngineError::InvalidDuration {
                    task: task.id,
                    days,
                });
            }
            durations.push(days_to_duration(days));
        }

        let n = index.len();
        let mut deps: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];

        for (idx, task) in tasks.iter().enumerate() {
            for &dep_id in &task.depends_on {
                let Some(dep_idx) = index.get(dep_id) else {
                    match config.missing_reference {
                        MissingReferencePolicy::Reject => {
                            return Err(EngineError::UnknownTask {
                                task: task.id,
                                missing: dep_id,
                            });
                        }
                        MissingReferencePolicy::Ignore => continue,
                    }
                };
                if deps[idx].contains(&dep_idx) {
                    continue;
                }
                deps[idx].push(dep_idx);
                dependents[dep_idx].push(idx);
            }
        }

        Ok(Self {
            index,
            durations,
            deps,
            dependents,
        })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// True if at least one dependency edge survived validation.
    pub fn has_edges(&self) -> bool {
        self.deps.iter().any(|d| !d.is_empty())
    }
}
