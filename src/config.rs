//! Guard configuration.
//!
//! Selects how debug assertion violations surface. Configuration is loaded
//! from a TOML file with environment variable overrides.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::assertion::{AssertionSink, LogSink, NoopSink, PanicSink};

/// How violated debug assertions are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssertionMode {
    /// Log, then panic
    #[default]
    Panic,
    /// Log at error level only
    Log,
    /// Ignore violations
    Off,
}

/// Errors that can occur when loading guard configuration.
#[derive(Debug, Error)]
pub enum GuardConfigError {
    /// The configuration file was not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(#[from] ConfigError),

    /// The TOML text could not be parsed.
    #[error("failed to parse TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    /// The configuration file path is invalid.
    #[error("invalid configuration path: {0}")]
    InvalidPath(String),
}

/// Root guard configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuardConfig {
    /// Reporting mode for debug assertions
    #[serde(default)]
    pub assertions: AssertionMode,
}

impl GuardConfig {
    /// Load guard configuration from a TOML file.
    ///
    /// Environment variables override file values using the format
    /// `FATAL_GUARD__<KEY>` (e.g. `FATAL_GUARD__ASSERTIONS=log`).
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not valid UTF-8, the file does not
    /// exist, or the contents cannot be deserialized.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GuardConfigError> {
        let path = path.as_ref();

        // The config crate takes sources by name, so the path must be UTF-8
        let path_str = path
            .to_str()
            .ok_or_else(|| GuardConfigError::InvalidPath(format!("{:?}", path)))?;

        if !path.exists() {
            return Err(GuardConfigError::FileNotFound(path_str.to_string()));
        }

        // File first, then FATAL_GUARD__* variables on top of it
        let config = Config::builder()
            .add_source(File::with_name(path_str))
            .add_source(
                Environment::with_prefix("FATAL_GUARD")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let guard_config: GuardConfig = config.try_deserialize()?;
        tracing::debug!(assertions = ?guard_config.assertions, "loaded guard configuration");

        Ok(guard_config)
    }

    /// Parse guard configuration from TOML text, without environment overrides.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, GuardConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Build the assertion sink selected by this configuration.
    pub fn sink(&self) -> Box<dyn AssertionSink> {
        match self.assertions {
            AssertionMode::Panic => Box::new(PanicSink),
            AssertionMode::Log => Box::new(LogSink),
            AssertionMode::Off => Box::new(NoopSink),
        }
    }
}
