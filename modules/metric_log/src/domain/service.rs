use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, instrument, trace};
use uuid::Uuid;

use crate::contract::model::{MetricEntry, NewMetricEntry};
use crate::domain::date;
use crate::domain::events::MetricEvent;
use crate::domain::ports::{Clock, EventPublisher};

/// Configuration for the store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub normalize_dates: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            normalize_dates: true,
        }
    }
}

/// In-memory metric log.
///
/// Entries are kept newest-first. Each insert call gets a timestamp strictly
/// greater than the previous call's, so ordering by timestamp matches
/// insertion order even when the clock does not advance between calls.
pub struct MetricStore {
    state: RwLock<StoreState>,
    events: Arc<dyn EventPublisher<MetricEvent>>,
    clock: Arc<dyn Clock>,
    config: StoreConfig,
}

#[derive(Default)]
struct StoreState {
    entries: VecDeque<MetricEntry>,
    last_timestamp: i64,
}

impl StoreState {
    fn next_timestamp(&mut self, now_ms: i64) -> i64 {
        let ts = now_ms.max(self.last_timestamp.saturating_add(1));
        self.last_timestamp = ts;
        ts
    }
}

impl MetricStore {
    pub fn new(
        events: Arc<dyn EventPublisher<MetricEvent>>,
        clock: Arc<dyn Clock>,
        config: StoreConfig,
    ) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            events,
            clock,
            config,
        }
    }

    #[instrument(
        name = "metric_log.store.add_one",
        skip(self, new_entry),
        fields(metric_id = %new_entry.metric_id)
    )]
    pub fn add_one(&self, new_entry: NewMetricEntry) -> MetricEntry {
        let now = self.clock.now();

        let date = if self.config.normalize_dates {
            date::normalize(&new_entry.date)
        } else {
            new_entry.date
        };

        let entry = {
            let mut state = self.state.write();
            let entry = MetricEntry {
                id: Uuid::new_v4(),
                metric_id: new_entry.metric_id,
                value: new_entry.value,
                unit: new_entry.unit,
                date,
                time: new_entry.time,
                timestamp: state.next_timestamp(now.timestamp_millis()),
            };
            state.entries.push_front(entry.clone());
            entry
        };

        self.events.publish(&MetricEvent::EntryAdded {
            id: entry.id,
            metric_id: entry.metric_id.clone(),
            at: now,
        });

        debug!(entry_id = %entry.id, timestamp = entry.timestamp, "Metric entry added");
        entry
    }

    /// Dates are stored exactly as given; only `add_one` normalizes.
    #[instrument(name = "metric_log.store.add_many", skip_all, fields(count = new_entries.len()))]
    pub fn add_many(&self, new_entries: Vec<NewMetricEntry>) -> Vec<MetricEntry> {
        if new_entries.is_empty() {
            trace!("Empty batch, nothing to insert");
            return Vec::new();
        }

        let now = self.clock.now();

        let created = {
            let mut state = self.state.write();
            let timestamp = state.next_timestamp(now.timestamp_millis());
            let created: Vec<MetricEntry> = new_entries
                .into_iter()
                .map(|e| MetricEntry {
                    id: Uuid::new_v4(),
                    metric_id: e.metric_id,
                    value: e.value,
                    unit: e.unit,
                    date: e.date,
                    time: e.time,
                    timestamp,
                })
                .collect();
            // Pushing in reverse keeps the batch's own order at the front.
            for entry in created.iter().rev() {
                state.entries.push_front(entry.clone());
            }
            created
        };

        let mut metric_ids: Vec<String> = Vec::new();
        for entry in &created {
            if !metric_ids.contains(&entry.metric_id) {
                metric_ids.push(entry.metric_id.clone());
            }
        }
        self.events.publish(&MetricEvent::BatchAdded {
            count: created.len(),
            metric_ids,
            at: now,
        });

        debug!("Metric batch added");
        created
    }

    #[instrument(name = "metric_log.store.query_by_metric", skip(self))]
    pub fn query_by_metric(&self, metric_id: &str) -> Vec<MetricEntry> {
        let mut matching: Vec<MetricEntry> = self
            .state
            .read()
            .entries
            .iter()
            .filter(|e| e.metric_id == metric_id)
            .cloned()
            .collect();
        // stable: equal timestamps keep collection order
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        trace!(found = matching.len(), "Queried metric entries");
        matching
    }

    pub fn exists_for_metric(&self, metric_id: &str) -> bool {
        self.state
            .read()
            .entries
            .iter()
            .any(|e| e.metric_id == metric_id)
    }

    pub fn latest_for_metric(&self, metric_id: &str) -> Option<MetricEntry> {
        self.query_by_metric(metric_id).into_iter().next()
    }

    pub fn metric_ids(&self) -> Vec<String> {
        self.state
            .read()
            .entries
            .iter()
            .map(|e| e.metric_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }
}
