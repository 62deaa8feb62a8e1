//! Dependency-edit and recompute workflow on top of a [`TaskStore`].
//!
//! The planner is the caller the engine expects: it reads one snapshot, runs
//! the engine, and commits the whole schedule in one batch. Prospective edges
//! are validated before they are written, and every graph mutation made
//! through the planner drops the cached schedule. Writes made directly on the
//! store are caught by the revision check in [`ScheduleCache`].

use chrono::NaiveDateTime;
use std::time::Instant;
use thiserror::Error;

use crate::config::{CacheConfig, EngineConfig};
use crate::critical_path::ScheduleCache;
use crate::engine::{calculate_critical_path, validate_new_dependency};
use crate::error::EngineError;
use crate::models::{CriticalPathResult, EdgeValidation, TaskId};
use crate::store::{StoreError, TaskStore};
use crate::{log_passes, log_summary};

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct Planner<S: TaskStore> {
    store: S,
    config: EngineConfig,
    epoch: NaiveDateTime,
    cache: ScheduleCache,
}

impl<S: TaskStore> Planner<S> {
    pub fn new(
        store: S,
        config: EngineConfig,
        cache_config: &CacheConfig,
        epoch: NaiveDateTime,
    ) -> Self {
        Self {
            store,
            config,
            epoch,
            cache: ScheduleCache::new(cache_config),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Move the schedule epoch. Cached results used the old epoch and are dropped.
    pub fn set_epoch(&mut self, epoch: NaiveDateTime) {
        self.epoch = epoch;
        self.cache.invalidate();
    }

    /// Add a dependency edge if it keeps the graph acyclic.
    ///
    /// A rejected edge is reported as [`EdgeValidation::Cycle`] and nothing is written.
    pub fn add_dependency(
        &mut self,
        task: TaskId,
        depends_on: TaskId,
    ) -> Result<EdgeValidation, PlannerError> {
        let tasks = self.store.load_tasks()?;
        let validation = validate_new_dependency(&tasks, task, depends_on, &self.config)?;
        if !validation.is_ok() {
            return Ok(validation);
        }

        self.store.create_dependency(task, depends_on)?;
        self.cache.invalidate();
        log_passes!(self.config.verbosity, "[planner] added edge {} -> {}", task, depends_on);
        Ok(validation)
    }

    /// Remove a dependency edge, returning whether it existed.
    pub fn remove_dependency(
        &mut self,
        task: TaskId,
        depends_on: TaskId,
    ) -> Result<bool, PlannerError> {
        let removed = self.store.delete_dependency(task, depends_on)?;
        if removed {
            self.cache.invalidate();
            log_passes!(self.config.verbosity, "[planner] removed edge {} -> {}", task, depends_on);
        }
        Ok(removed)
    }

    /// Current schedule, served from the cache while fresh.
    pub fn schedule(&mut self, now: Instant) -> Result<&CriticalPathResult, PlannerError> {
        let revision = self.store.revision();
        let verbosity = self.config.verbosity;
        let store = &self.store;
        let config = &self.config;
        let epoch = self.epoch;

        self.cache.get_or_compute(revision, now, || -> Result<_, PlannerError> {
            log_passes!(verbosity, "[planner] cache miss at revision {}", revision);
            let tasks = store.load_tasks()?;
            Ok(calculate_critical_path(&tasks, epoch, config)?)
        })
    }

    /// Compute a fresh schedule and, if valid, commit every entry in one batch.
    ///
    /// Invalid results are returned without writing anything.
    pub fn recompute_and_commit(
        &mut self,
        now: Instant,
    ) -> Result<CriticalPathResult, PlannerError> {
        let revision = self.store.revision();
        let tasks = self.store.load_tasks()?;
        let result = calculate_critical_path(&tasks, self.epoch, &self.config)?;

        if result.is_valid {
            self.store.commit_schedule(&result.schedule_data)?;
            log_summary!(
                self.config.verbosity,
                "[planner] committed {} entries at revision {}",
                result.schedule_data.len(),
                revision
            );
        }
        self.cache.insert(revision, now, result.clone());
        Ok(result)
    }
}
