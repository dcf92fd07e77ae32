use std::sync::Arc;

use tracing::{debug, info};

use crate::config::MetricLogConfig;
use crate::contract::client::MetricLogApi;
use crate::domain::events::MetricEvent;
use crate::domain::ports::Clock;
use crate::domain::service::{MetricStore, StoreConfig};
use crate::gateways::local::MetricLogLocalClient;
use crate::infra::{BroadcastPublisher, SystemClock};

/// Wires the store to its event fan-out and clock.
///
/// Construct once per process and hand out `api()` clones to consumers.
pub struct MetricLog {
    store: Arc<MetricStore>,
    events: BroadcastPublisher<MetricEvent>,
}

impl MetricLog {
    pub fn new(cfg: &MetricLogConfig) -> Self {
        Self::with_clock(cfg, Arc::new(SystemClock))
    }

    pub fn with_clock(cfg: &MetricLogConfig, clock: Arc<dyn Clock>) -> Self {
        info!("Initializing metric_log module");
        debug!(
            "Loaded metric_log config: broadcast_capacity={}, normalize_dates={}",
            cfg.broadcast_capacity, cfg.normalize_dates
        );

        let events = BroadcastPublisher::new(cfg.broadcast_capacity);
        let store = MetricStore::new(
            Arc::new(events.clone()),
            clock,
            StoreConfig {
                normalize_dates: cfg.normalize_dates,
            },
        );

        Self {
            store: Arc::new(store),
            events,
        }
    }

    pub fn store(&self) -> Arc<MetricStore> {
        self.store.clone()
    }

    pub fn api(&self) -> Arc<dyn MetricLogApi> {
        Arc::new(MetricLogLocalClient::new(
            self.store.clone(),
            self.events.clone(),
        ))
    }
}

impl Default for MetricLog {
    fn default() -> Self {
        Self::new(&MetricLogConfig::default())
    }
}
