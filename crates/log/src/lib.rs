//! # tether-log
//!
//! Installs a global `tracing` subscriber for tether binaries: an
//! `EnvFilter` plus one pretty, compact or JSON formatting layer on stderr.
//!
//! ```no_run
//! let _guard = tether_log::init().expect("logger");
//! tracing::info!("ready");
//! ```

mod builder;
mod config;
mod error;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Format};
pub use error::{LogError, LogResult};

/// Initialize from the environment (`TETHER_LOG`, `RUST_LOG`,
/// `TETHER_LOG_FORMAT`).
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::from_env())
}

/// Initialize from an explicit configuration.
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}
