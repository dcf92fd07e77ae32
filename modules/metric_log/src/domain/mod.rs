pub mod date;
pub mod events;
pub mod ports;
pub mod service;
