//! Scheduler configuration.

use serde::{Deserialize, Serialize};

/// Scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Upper bound in seconds for a single dispatch to the action sink.
    /// A dispatch that exceeds it is treated as a failed fire.
    #[serde(default = "default_dispatch_timeout")]
    pub dispatch_timeout_secs: u64,
}

fn default_dispatch_timeout() -> u64 {
    30
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            dispatch_timeout_secs: default_dispatch_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.dispatch_timeout_secs, 30);
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: SchedulerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.dispatch_timeout_secs, 30);
    }
}
