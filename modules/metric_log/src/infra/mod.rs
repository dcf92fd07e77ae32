pub mod broadcast;
pub mod clock;

pub use broadcast::BroadcastPublisher;
pub use clock::SystemClock;
