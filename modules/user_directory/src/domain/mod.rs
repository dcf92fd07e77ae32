pub mod decode;
pub mod filter;
pub mod mutation;
pub mod pagination;
pub mod ports;
pub mod service;
