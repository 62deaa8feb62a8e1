//! Persistence collaborator for the planner.
//!
//! The engine never touches storage; [`TaskStore`] is the narrow interface the
//! planner uses to read a snapshot, edit edges and commit computed schedules.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::models::{ScheduleEntry, Task, TaskId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),
    #[error("Task already exists: {0}")]
    DuplicateTask(TaskId),
}

pub trait TaskStore {
    /// All tasks with their dependencies, as one consistent snapshot.
    fn load_tasks(&self) -> Result<Vec<Task>, StoreError>;

    /// Counter bumped by every graph-mutating write.
    fn revision(&self) -> u64;

    /// Make `task` depend on `depends_on`. Adding an existing edge is a no-op.
    fn create_dependency(&mut self, task: TaskId, depends_on: TaskId) -> Result<(), StoreError>;

    /// Remove an edge, returning whether it existed.
    fn delete_dependency(&mut self, task: TaskId, depends_on: TaskId)
        -> Result<bool, StoreError>;

    /// Write computed schedules keyed by task id. All rows are written or none.
    fn commit_schedule(
        &mut self,
        schedule: &FxHashMap<TaskId, ScheduleEntry>,
    ) -> Result<(), StoreError>;
}

/// In-memory [`TaskStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: Vec<Task>,
    committed: FxHashMap<TaskId, ScheduleEntry>,
    revision: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for task in tasks {
            store.add_task(task)?;
        }
        Ok(store)
    }

    pub fn add_task(&mut self, task: Task) -> Result<(), StoreError> {
        if self.position(task.id).is_some() {
            return Err(StoreError::DuplicateTask(task.id));
        }
        self.tasks.push(task);
        self.revision += 1;
        Ok(())
    }

    /// Remove a task along with every edge pointing at it.
    pub fn remove_task(&mut self, id: TaskId) -> Result<Task, StoreError> {
        let pos = self.position(id).ok_or(StoreError::TaskNotFound(id))?;
        let removed = self.tasks.remove(pos);
        for task in &mut self.tasks {
            task.depends_on.retain(|&dep| dep != id);
        }
        self.committed.remove(&id);
        self.revision += 1;
        Ok(removed)
    }

    pub fn set_duration(&mut self, id: TaskId, duration_days: Option<f64>) -> Result<(), StoreError> {
        let pos = self.position(id).ok_or(StoreError::TaskNotFound(id))?;
        self.tasks[pos].duration_days = duration_days;
        self.revision += 1;
        Ok(())
    }

    /// Last committed schedule for a task.
    pub fn committed(&self, id: TaskId) -> Option<&ScheduleEntry> {
        self.committed.get(&id)
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }
}

impl TaskStore for MemoryStore {
    fn load_tasks(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.tasks.clone())
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn create_dependency(&mut self, task: TaskId, depends_on: TaskId) -> Result<(), StoreError> {
        if self.position(depends_on).is_none() {
            return Err(StoreError::TaskNotFound(depends_on));
        }
        let pos = self.position(task).ok_or(StoreError::TaskNotFound(task))?;
        let deps = &mut self.tasks[pos].depends_on;
        if !deps.contains(&depends_on) {
            deps.push(depends_on);
            self.revision += 1;
        }
        Ok(())
    }

    fn delete_dependency(
        &mut self,
        task: TaskId,
        depends_on: TaskId,
    ) -> Result<bool, StoreError> {
        let pos = self.position(task).ok_or(StoreError::TaskNotFound(task))?;
        let deps = &mut self.tasks[pos].depends_on;
        let before = deps.len();
        deps.retain(|&dep| dep != depends_on);
        let removed = deps.len() != before;
        if removed {
            self.revision += 1;
        }
        Ok(removed)
    }

    fn commit_schedule(
        &mut self,
        schedule: &FxHashMap<TaskId, ScheduleEntry>,
    ) -> Result<(), StoreError> {
        // Validate every row before writing any
        if let Some(&missing) = schedule.keys().find(|&&id| self.position(id).is_none()) {
            return Err(StoreError::TaskNotFound(missing));
        }
        self.committed
            .extend(schedule.iter().map(|(&id, &entry)| (id, entry)));
        Ok(())
    }
}
