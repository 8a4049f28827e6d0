//! Layered configuration for the plugin registry tooling.
//!
//! [`Config`] is assembled by `ortho_config` from, in increasing precedence:
//! built-in defaults, a configuration file, `PLUGIN_REGISTRY_*` environment
//! variables and command-line flags. It controls diagnostic logging and the
//! optional plugin document to load in place of the built-in dummy plugin.

mod defaults;
mod logging;


use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use self::defaults::{
    DEFAULT_LOG_FILTER, default_log_filter, default_log_filter_string, default_log_format,
};
pub use self::logging::{LogFormat, LogFormatParseError};

/// Resolved configuration shared by the plugin registry binaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PLUGIN_REGISTRY")]
pub struct Config {
    /// `tracing` filter expression, e.g. `info` or `plugin_registry=debug`.
    #[ortho_config(default = default_log_filter_string())]
    #[serde(default = "default_log_filter_string")]
    log_filter: String,
    /// Log output format.
    #[ortho_config(default = default_log_format())]
    #[serde(default = "default_log_format")]
    log_format: LogFormat,
    /// Plugin document to load instead of the built-in dummy plugin.
    #[serde(default)]
    manifest_path: Option<Utf8PathBuf>,
}

impl Config {
    /// Returns the log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the plugin document path, if one is configured.
    #[must_use]
    pub fn manifest_path(&self) -> Option<&Utf8Path> {
        self.manifest_path.as_deref()
    }

    /// Replaces the plugin document path.
    #[must_use]
    pub fn with_manifest_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            manifest_path: None,
        }
    }
}
