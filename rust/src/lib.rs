//! Project scheduling engine: cycle detection, topological ordering and
//! Critical Path Method (CPM) timing over tasks with "depends-on" edges.
//!
//! The engine itself ([`calculate_critical_path`], [`validate_new_dependency`])
//! is pure and does no I/O. [`Planner`] layers the caller-side workflow on top:
//! validated edge edits, a short-lived schedule cache, and batch commits to a
//! [`TaskStore`].

// Allow clippy warning triggered by PyO3 macro expansion
#![cfg_attr(feature = "python", allow(clippy::useless_conversion))]

pub mod config;
pub mod critical_path;
pub mod cycle;
mod engine;
mod error;
pub mod graph;
mod interner;
pub mod logging;
mod models;
pub mod planner;
pub mod sorting;
pub mod store;

#[cfg(feature = "python")]
mod python;

pub use config::{CacheConfig, EngineConfig, MissingReferencePolicy, MAX_DURATION_DAYS};
pub use critical_path::ScheduleCache;
pub use cycle::{find_cycle, would_create_cycle};
pub use engine::{calculate_critical_path, validate_new_dependency};
pub use error::EngineError;
pub use graph::{build_adjacency, AdjacencyMap, TaskGraph};
pub use interner::TaskIndex;
pub use models::{
    CircularDependency, CriticalPathResult, EdgeValidation, ScheduleEntry, Task, TaskId,
};
pub use planner::{Planner, PlannerError};
pub use sorting::{topological_order, topological_sort, topological_sort_or_cycle};
pub use store::{MemoryStore, StoreError, TaskStore};
