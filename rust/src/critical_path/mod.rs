//! Critical Path Method passes.
//!
//! Forward pass for earliest times, backward pass for latest times and
//! slack, then extraction of the zero-slack tasks. All passes work on a
//! validated [`TaskGraph`](crate::graph::TaskGraph) and a topological order,
//! with times held as offsets from the schedule epoch.

mod backward;
mod cache;
mod extract;
mod forward;
mod types;

pub use backward::{backward_pass, classify_tasks, project_end};
pub use cache::ScheduleCache;
pub use extract::extract_critical_path;
pub use forward::forward_pass;
pub use types::{is_zero_within, TaskRegime, TaskTiming};
