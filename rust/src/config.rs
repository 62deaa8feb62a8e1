//! Configuration types for the scheduling engine.

use chrono::Duration;

/// Largest accepted task duration, in days.
pub const MAX_DURATION_DAYS: f64 = 1_000_000.0;

/// What to do with a `depends_on` id that names no task in the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MissingReferencePolicy {
    /// Fail with [`EngineError::UnknownTask`](crate::EngineError::UnknownTask).
    #[default]
    Reject,
    /// Drop the dangling edge and schedule the rest normally.
    Ignore,
}

/// Configuration for critical path computation.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Slack below this is treated as zero. Absorbs rounding only.
    pub tolerance: Duration,
    /// Duration used for tasks whose `duration_days` is unset.
    pub default_duration_days: f64,
    /// Handling of dangling dependency references.
    pub missing_reference: MissingReferencePolicy,
    /// Verbosity level: 0=silent, 1=summary, 2=passes, 3=debug.
    pub verbosity: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tolerance: Duration::milliseconds(1000),
            default_duration_days: 1.0,
            missing_reference: MissingReferencePolicy::Reject,
            verbosity: 0,
        }
    }
}

impl EngineConfig {
    pub fn with_missing_reference(mut self, policy: MissingReferencePolicy) -> Self {
        self.missing_reference = policy;
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }
}

/// Configuration for the short-lived result cache.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// How long a computed schedule may be served without recomputation.
    pub ttl: std::time::Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: std::time::Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.tolerance, Duration::milliseconds(1000));
        assert!((config.default_duration_days - 1.0).abs() < 1e-9);
        assert_eq!(config.missing_reference, MissingReferencePolicy::Reject);
        assert_eq!(config.verbosity, 0);

        assert_eq!(CacheConfig::default().ttl.as_secs(), 5);
    }

    #[test]
    fn test_builder_overrides() {
        let config = EngineConfig::default()
            .with_missing_reference(MissingReferencePolicy::Ignore)
            .with_verbosity(2);
        assert_eq!(config.missing_reference, MissingReferencePolicy::Ignore);
        assert_eq!(config.verbosity, 2);
    }
}
