use tokio::sync::broadcast;

use crate::contract::model::{MetricEntry, NewMetricEntry};
use crate::domain::events::MetricEvent;

/// Public API of the metric log that display code consumes.
///
/// None of the operations fail: malformed values are stored as given.
pub trait MetricLogApi: Send + Sync {
    /// Insert one entry, normalizing its date.
    fn add_one(&self, entry: NewMetricEntry) -> MetricEntry;

    /// Insert a batch at the front of the log, preserving batch order.
    fn add_many(&self, entries: Vec<NewMetricEntry>) -> Vec<MetricEntry>;

    /// Entries of one metric, newest first.
    fn query_by_metric(&self, metric_id: &str) -> Vec<MetricEntry>;

    /// Whether any entry exists for the metric.
    fn exists_for_metric(&self, metric_id: &str) -> bool;

    /// Newest entry of one metric.
    fn latest_for_metric(&self, metric_id: &str) -> Option<MetricEntry>;

    /// Distinct metric ids, sorted.
    fn metric_ids(&self) -> Vec<String>;

    /// Change notifications emitted after each successful insert.
    fn subscribe(&self) -> broadcast::Receiver<MetricEvent>;
}
