use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One logged measurement.
///
/// `value` stays text so user-entered formatting ("70.0", "5'11") survives.
/// `timestamp` is the store's insertion clock in epoch milliseconds and only
/// drives ordering; `date`/`time` are what the user entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricEntry {
    pub id: Uuid,
    pub metric_id: String,
    pub value: String,
    pub unit: String,
    pub date: String,
    pub time: String,
    pub timestamp: i64,
}

/// Insert payload: an entry before the store assigns `id` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMetricEntry {
    pub metric_id: String,
    pub value: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
}

impl NewMetricEntry {
    pub fn new(
        metric_id: impl Into<String>,
        value: impl Into<String>,
        unit: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            metric_id: metric_id.into(),
            value: value.into(),
            unit: unit.into(),
            date: date.into(),
            time: String::new(),
        }
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }
}
