// === PUBLIC CONTRACT ===
// Consumers should depend on the contract module only.
pub mod contract;

pub use contract::{client, model};

// === MODULE WIRING ===
pub mod module;
pub use module::MetricLog;

// === INTERNAL MODULES ===
// Exposed for tests; not a stable API.
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
