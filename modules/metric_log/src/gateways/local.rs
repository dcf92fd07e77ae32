use std::sync::Arc;
use tokio::sync::broadcast;

use crate::contract::{
    client::MetricLogApi,
    model::{MetricEntry, NewMetricEntry},
};
use crate::domain::events::MetricEvent;
use crate::domain::service::MetricStore;
use crate::infra::BroadcastPublisher;

/// In-process implementation of `MetricLogApi` delegating to the store.
pub struct MetricLogLocalClient {
    store: Arc<MetricStore>,
    events: BroadcastPublisher<MetricEvent>,
}

impl MetricLogLocalClient {
    pub fn new(store: Arc<MetricStore>, events: BroadcastPublisher<MetricEvent>) -> Self {
        Self { store, events }
    }
}

impl MetricLogApi for MetricLogLocalClient {
    fn add_one(&self, entry: NewMetricEntry) -> MetricEntry {
        self.store.add_one(entry)
    }

    fn add_many(&self, entries: Vec<NewMetricEntry>) -> Vec<MetricEntry> {
        self.store.add_many(entries)
    }

    fn query_by_metric(&self, metric_id: &str) -> Vec<MetricEntry> {
        self.store.query_by_metric(metric_id)
    }

    fn exists_for_metric(&self, metric_id: &str) -> bool {
        self.store.exists_for_metric(metric_id)
    }

    fn latest_for_metric(&self, metric_id: &str) -> Option<MetricEntry> {
        self.store.latest_for_metric(metric_id)
    }

    fn metric_ids(&self) -> Vec<String> {
        self.store.metric_ids()
    }

    fn subscribe(&self) -> broadcast::Receiver<MetricEvent> {
        self.events.subscribe()
    }
}
