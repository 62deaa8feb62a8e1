//! Short-lived cache of the last computed schedule.
//!
//! Holds at most one result, tagged with the graph revision it was computed
//! from. A lookup hits only while the revision is unchanged and the entry is
//! younger than the configured TTL, so a result computed from an older graph
//! is never served.

use std::time::{Duration, Instant};

use crate::config::CacheConfig;
use crate::models::CriticalPathResult;

struct CachedSchedule {
    revision: u64,
    computed_at: Instant,
    result: CriticalPathResult,
}

impl CachedSchedule {
    fn is_fresh(&self, revision: u64, now: Instant, ttl: Duration) -> bool {
        self.revision == revision && now.saturating_duration_since(self.computed_at) < ttl
    }
}

pub struct ScheduleCache {
    ttl: Duration,
    entry: Option<CachedSchedule>,
}

impl ScheduleCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            ttl: config.ttl,
            entry: None,
        }
    }

    /// The cached result, if it was computed from `revision` less than one TTL ago.
    pub fn get(&self, revision: u64, now: Instant) -> Option<&CriticalPathResult> {
        self.entry
            .as_ref()
            .filter(|cached| cached.is_fresh(revision, now, self.ttl))
            .map(|cached| &cached.result)
    }

    /// Replace the cached result.
    pub fn insert(
        &mut self,
        revision: u64,
        now: Instant,
        result: CriticalPathResult,
    ) -> &CriticalPathResult {
        &self
            .entry
            .insert(CachedSchedule {
                revision,
                computed_at: now,
                result,
            })
            .result
    }

    /// Serve a fresh entry or compute, store and return a new one.
    ///
    /// A failed computation leaves the cache empty.
    pub fn get_or_compute<E>(
        &mut self,
        revision: u64,
        now: Instant,
        compute: impl FnOnce() -> Result<CriticalPathResult, E>,
    ) -> Result<&CriticalPathResult, E> {
        match self.entry.take() {
            Some(cached) if cached.is_fresh(revision, now, self.ttl) => {
                Ok(&self.entry.insert(cached).result)
            }
            _ => {
                let result = compute()?;
                Ok(self.insert(revision, now, result))
            }
        }
    }

    /// Drop the cached result. Called on every graph-mutating write.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}
