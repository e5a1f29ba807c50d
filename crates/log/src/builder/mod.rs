//! Logger builder implementation

use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, Format};
use crate::error::{LogError, LogResult};

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Guard returned once the global subscriber is installed.
///
/// Holds the configuration that was applied.
#[derive(Debug)]
pub struct LoggerGuard {
    config: Config,
}

impl LoggerGuard {
    /// Configuration the subscriber was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Install `Registry + filter + layer` as the global subscriber.
macro_rules! try_init_subscriber {
    ($filter:expr, $layer:expr) => {
        Registry::default()
            .with($filter)
            .with($layer)
            .try_init()
            .map_err(|e| LogError::AlreadyInit(e.to_string()))
    };
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Build and install the global subscriber.
    ///
    /// Events go to stderr so stdout stays free for program output.
    pub fn build(self) -> LogResult<LoggerGuard> {
        let filter = EnvFilter::try_new(&self.config.level)
            .map_err(|e| LogError::Filter(format!("{}: {e}", self.config.level)))?;
        let display = self.config.display;

        match self.config.format {
            Format::Pretty => {
                let layer = fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr)
                    .with_ansi(display.colors)
                    .with_target(display.target)
                    .with_file(display.source)
                    .with_line_number(display.source);
                try_init_subscriber!(filter, layer)?;
            }
            Format::Compact => {
                let layer = fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_ansi(display.colors)
                    .with_target(display.target)
                    .with_file(display.source)
                    .with_line_number(display.source);
                try_init_subscriber!(filter, layer)?;
            }
            Format::Json => {
                let layer = fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(display.target)
                    .with_file(display.source)
                    .with_line_number(display.source)
                    .with_current_span(true);
                try_init_subscriber!(filter, layer)?;
            }
        }

        tracing::debug!(level = %self.config.level, format = %self.config.format, "logger initialized");
        Ok(LoggerGuard {
            config: self.config,
        })
    }
}
