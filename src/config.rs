//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every field carries a default, so the program runs without a config file
//! at all. The file is read-only: nothing is ever written back.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,

    #[serde(default)]
    pub cadence: CadenceConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

/// Loop cadence configuration
#[derive(Debug, Deserialize, Clone)]
pub struct CadenceConfig {
    /// Target loop rate in Hz. The loop sleeps for the full period after
    /// each iteration's work, so the actual rate is best-effort.
    #[serde(default = "default_rate_hz")]
    pub rate_hz: u32,
}

/// Telemetry JSONL logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub log_enabled: bool,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_max_records_per_file")]
    pub max_records_per_file: usize,

    #[serde(default = "default_max_files_to_keep")]
    pub max_files_to_keep: usize,
}

// Default value functions
fn default_baud_rate() -> u32 { 115_200 }
fn default_read_timeout_ms() -> u64 { 1000 }

fn default_rate_hz() -> u32 { 50 }

fn default_log_dir() -> String { "./logs".to_string() }
fn default_max_records_per_file() -> usize { 10000 }
fn default_max_files_to_keep() -> usize { 10 }

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: default_baud_rate(),
            read_timeout_ms: default_read_timeout_ms(),
        }
    }
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self { rate_hz: default_rate_hz() }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_enabled: false,
            log_dir: default_log_dir(),
            max_records_per_file: default_max_records_per_file(),
            max_files_to_keep: default_max_files_to_keep(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an optional path, falling back to defaults
    ///
    /// When `path` is `None` the built-in defaults are used; when it is
    /// `Some`, the file must exist and validate.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.serial.baud_rate == 0 {
            return Err(crate::error::JoyLinkError::Config(
                toml::de::Error::custom("baud_rate must be greater than 0"),
            ));
        }

        if self.serial.read_timeout_ms == 0 || self.serial.read_timeout_ms > 10000 {
            return Err(crate::error::JoyLinkError::Config(
                toml::de::Error::custom("read_timeout_ms must be between 1 and 10000"),
            ));
        }

        if self.cadence.rate_hz == 0 || self.cadence.rate_hz > 1000 {
            return Err(crate::error::JoyLinkError::Config(
                toml::de::Error::custom("rate_hz must be between 1 and 1000"),
            ));
        }

        if self.telemetry.log_enabled && self.telemetry.log_dir.is_empty() {
            return Err(crate::error::JoyLinkError::Config(
                toml::de::Error::custom("log_dir cannot be empty when log_enabled is set"),
            ));
        }

        if self.telemetry.max_records_per_file == 0 {
            return Err(crate::error::JoyLinkError::Config(
                toml::de::Error::custom("max_records_per_file must be greater than 0"),
            ));
        }

        if self.telemetry.max_files_to_keep == 0 {
            return Err(crate::error::JoyLinkError::Config(
                toml::de::Error::custom("max_files_to_keep must be greater than 0"),
            ));
        }

        Ok(())
    }

    /// Loop period derived from the configured rate
    pub fn loop_period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(1000 / self.cadence.rate_hz as u64)
    }

    /// Serial read timeout as a `Duration`
    pub fn read_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.serial.read_timeout_ms)
    }
}
