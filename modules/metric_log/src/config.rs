use serde::{Deserialize, Serialize};

/// Configuration for the metric_log module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricLogConfig {
    /// Buffered change notifications per subscriber before the oldest are dropped.
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
    /// Rewrite parseable `date` strings to ISO 8601 on single inserts.
    #[serde(default = "default_normalize_dates")]
    pub normalize_dates: bool,
}

impl Default for MetricLogConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: default_broadcast_capacity(),
            normalize_dates: default_normalize_dates(),
        }
    }
}

fn default_broadcast_capacity() -> usize {
    256
}

fn default_normalize_dates() -> bool {
    true
}
