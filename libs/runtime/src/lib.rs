//! Process-level plumbing shared by the FitTrack binaries:
//! layered configuration and tracing-based logging.

pub mod config;
pub mod logging;

pub use config::{
    default_logging_config, AppConfig, AppSection, CliArgs, LoggingConfig, Section,
};
