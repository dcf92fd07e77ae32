use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Transport-agnostic change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MetricEvent {
    EntryAdded {
        id: Uuid,
        metric_id: String,
        at: DateTime<Utc>,
    },
    BatchAdded {
        count: usize,
        /// Distinct metric ids touched by the batch, in first-seen order.
        metric_ids: Vec<String>,
        at: DateTime<Utc>,
    },
}

impl MetricEvent {
    /// Whether a subscriber watching `metric_id` should refresh.
    pub fn touches(&self, metric_id: &str) -> bool {
        match self {
            Self::EntryAdded { metric_id: m, .. } => m == metric_id,
            Self::BatchAdded { metric_ids, .. } => metric_ids.iter().any(|m| m == metric_id),
        }
    }
}
