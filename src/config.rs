// Executor configuration

use tracing::Level;

/// Configuration consumed by the executor.
///
/// Owned by the embedding layer (CLI, plan runner); the executor only reads
/// it. `log_level` is derived once from configuration plus the
/// orchestration-mode flag, never from ambient global state.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of node operations executing in parallel.
    pub concurrency: usize,
    /// Level the embedding layer should filter executor events at when it
    /// configures its `tracing` subscriber. The executor itself never reads
    /// this; events are emitted at fixed levels and filtering is the
    /// subscriber's job.
    pub log_level: Level,
    /// Dry-run flag, threaded opaquely into node actions.
    pub noop: bool,
}

impl ExecutorConfig {
    pub fn new(concurrency: usize) -> Self {
        ExecutorConfig {
            concurrency: concurrency.max(1),
            ..ExecutorConfig::default()
        }
    }

    pub fn with_log_level(mut self, level: Level) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_noop(mut self, noop: bool) -> Self {
        self.noop = noop;
        self
    }

    /// Default log level: quiet for ad hoc runs, escalated to INFO when
    /// driving an orchestration plan so per-node progress is visible.
    pub fn default_log_level(plan_mode: bool) -> Level {
        if plan_mode {
            Level::INFO
        } else {
            Level::WARN
        }
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        ExecutorConfig {
            concurrency: 100,
            log_level: Self::default_log_level(false),
            noop: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concurrency_is_always_positive() {
        assert_eq!(ExecutorConfig::new(0).concurrency, 1);
        assert_eq!(ExecutorConfig::new(7).concurrency, 7);
    }

    #[test]
    fn test_plan_mode_escalates_log_level() {
        assert_eq!(ExecutorConfig::default_log_level(true), Level::INFO);
        assert_eq!(ExecutorConfig::default_log_level(false), Level::WARN);
    }
}
