//! Layered settings: defaults, config file, `TETHER_*` environment, flags

use std::path::PathBuf;

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format as _, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tether_convert::{EnumType, ValueType};

use crate::cli::Cli;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "tether.toml";

/// Effective CLI settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log: tether_log::Config,
    /// Enumerations defined at runtime
    pub enums: Vec<EnumDecl>,
}

/// One `[[enums]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    pub variants: Vec<String>,
    /// Encode as declaration index instead of name
    #[serde(default)]
    pub ordinal: bool,
}

impl EnumDecl {
    pub fn value_type(&self) -> ValueType {
        EnumType::dynamic(self.name.as_str(), self.variants.iter().cloned(), self.ordinal).into()
    }
}

/// Sources that feed [`Settings`], in increasing precedence.
#[derive(Debug, Default)]
pub struct Sources {
    pub config: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<tether_log::Format>,
}

impl From<&Cli> for Sources {
    fn from(cli: &Cli) -> Self {
        Self {
            config: cli.config.clone(),
            log_level: cli.log_level.clone(),
            log_format: cli.log_format,
        }
    }
}

impl Sources {
    fn figment(&self) -> Figment {
        let defaults = Settings {
            log: tether_log::Config::from_env(),
            enums: Vec::new(),
        };
        let mut figment = Figment::from(Serialized::defaults(defaults));

        figment = match &self.config {
            Some(path) => figment.merge(Toml::file_exact(path)),
            None => figment.merge(Toml::file(DEFAULT_CONFIG_FILE)),
        };

        // `TETHER_LOG` and `TETHER_LOG_FORMAT` are read by `Config::from_env`.
        figment = figment.merge(
            Env::prefixed("TETHER_")
                .ignore(&["log", "log_format", "config"])
                .split("__"),
        );

        if let Some(level) = &self.log_level {
            figment = figment.merge(("log.level", level));
        }
        if let Some(format) = self.log_format {
            figment = figment.merge(("log.format", format));
        }
        figment
    }

    /// Resolve the effective settings.
    pub fn load(&self) -> anyhow::Result<Settings> {
        self.figment()
            .extract()
            .context("failed to load configuration")
    }
}
