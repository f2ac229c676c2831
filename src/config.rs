//! Configuration types.

use std::time::Duration;

/// Worker manager configuration.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Number of priority buckets. Priority 0 is the highest by convention;
    /// each bucket gets its own dedicated task, list, and lock.
    pub priority_levels: usize,
    /// Initial sleep between run passes, applied to every bucket. Individual
    /// buckets can be retuned later with `set_poll_interval`.
    pub poll_interval: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            priority_levels: 10,
            poll_interval: Duration::from_millis(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let config = ManagerConfig::default();
        assert_eq!(config.priority_levels, 10);
        assert_eq!(config.poll_interval, Duration::from_millis(100));
    }
}
