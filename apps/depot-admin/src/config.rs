//! Layered application configuration.
//!
//! Precedence, lowest first: built-in defaults, the YAML file given with
//! `--config`, `DEPOT__`-prefixed environment variables (`__` separates
//! nesting levels, e.g. `DEPOT__RESOURCES__BASE_URL`), then CLI overrides.

use std::path::Path;

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use resources::ResourcesConfig;
use serde::{Deserialize, Serialize};

/// Output format of the log layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            level: "warn".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub resources: ResourcesConfig,
    pub logging: LoggingConfig,
}

/// Values taken from the command line, applied last.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliOverrides {
    pub verbose: u8,
}

impl CliOverrides {
    fn log_level(self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        }
    }
}

impl AppConfig {
    /// Build the effective configuration.
    ///
    /// # Errors
    /// Fails when the YAML file or an environment override does not match
    /// the config schema.
    pub fn load(path: Option<&Path>, overrides: CliOverrides) -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed("DEPOT__").split("__"));
        if let Some(level) = overrides.log_level() {
            figment = figment.merge(Serialized::default("logging.level", level));
        }

        figment
            .extract()
            .context("Failed to load configuration")
    }

    /// Render as YAML for `--print-config`.
    ///
    /// # Errors
    /// Fails only if serialization fails.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        serde_saphyr::to_string(self).context("Failed to serialize configuration to YAML")
    }
}
