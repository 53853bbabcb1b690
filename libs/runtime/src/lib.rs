//! Process-level plumbing: layered configuration and logging setup.

pub mod config;
pub mod logging;

pub use config::{AppConfig, LoggingConfig, Section};
pub use logging::init_logging_from_config;

/// Install logging as configured, falling back to the built-in defaults.
pub fn init_logging(config: &AppConfig) {
    let defaults = config::default_logging_config();
    let logging = config.logging.as_ref().unwrap_or(&defaults);
    init_logging_from_config(logging, &config.log_base_dir());
}
