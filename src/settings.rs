//! # Settings Module
//!
//! ## Purpose
//! Persistent settings of the balancer front end: log level, log file, output format and
//! whether the balance matrix is printed together with the answer.
//!
//! ## Architecture
//! - **BalancerConfig**: serializable configuration structure
//! - **ConfigManager**: loads, updates and saves the configuration file
//! - **Configuration File**: JSON file (balancer_config.json by default)
//!
//! ## Configuration Format
//! ```json
//! {
//!   "log_level": "info",
//!   "log_file": null,
//!   "output_format": "Text",
//!   "show_matrix": false
//! }
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use KiStoich::settings::{ConfigManager, OutputFormat};
//!
//! let mut manager = ConfigManager::with_config_file("my_config.json");
//! manager.set_output_format(OutputFormat::Json).unwrap();
//! manager.reset_to_defaults().unwrap();
//! ```

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_CONFIG_FILE: &str = "balancer_config.json";

/// How balanced equations are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// the balanced equation only
    #[default]
    Text,
    /// `BalanceReport` as pretty JSON
    Json,
    /// table of substances and coefficients
    Table,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            other => Err(format!(
                "unknown output format '{}', expected text, json or table",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
        };
        write!(f, "{}", name)
    }
}

/// Configuration of the balancer.
///
/// # Fields
/// * `log_level` - one of off, error, warn, info, debug, trace
/// * `log_file` - optional file for the log in addition to the terminal
/// * `output_format` - how the results are printed
/// * `show_matrix` - print the balance matrix before the answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancerConfig {
    pub log_level: String,
    pub log_file: Option<String>,
    pub output_format: OutputFormat,
    pub show_matrix: bool,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: None,
            output_format: OutputFormat::Text,
            show_matrix: false,
        }
    }
}

impl BalancerConfig {
    /// log level as a filter for the logger; unknown names fall back to Info
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}

/// Loads, updates and saves `BalancerConfig`.
///
/// Every setter saves the configuration file immediately.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: BalancerConfig,
    config_file: String,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Loads the default configuration file from the current directory, or uses the defaults
    /// if the file does not exist or cannot be parsed
    pub fn new() -> Self {
        Self::with_config_file(DEFAULT_CONFIG_FILE)
    }

    pub fn with_config_file(config_file: &str) -> Self {
        let config = match Self::load_config(config_file) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("cannot read config '{}': {}, using defaults", config_file, e);
                BalancerConfig::default()
            }
        };
        Self {
            config,
            config_file: config_file.to_string(),
        }
    }

    fn load_config(config_file: &str) -> Result<BalancerConfig, Box<dyn std::error::Error>> {
        if Path::new(config_file).exists() {
            let content = fs::read_to_string(config_file)?;
            let config: BalancerConfig = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(BalancerConfig::default())
        }
    }

    pub fn save_config(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.config_file, content)?;
        Ok(())
    }

    pub fn get_config(&self) -> &BalancerConfig {
        &self.config
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    pub fn set_log_level(&mut self, level: &str) -> Result<(), Box<dyn std::error::Error>> {
        let level = level.trim().to_lowercase();
        if LevelFilter::from_str(&level).is_err() {
            return Err(format!("unknown log level: {}", level).into());
        }
        self.config.log_level = level;
        self.save_config()
    }

    /// empty path switches the log file off
    pub fn set_log_file(&mut self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let path = path.trim();
        self.config.log_file = if path.is_empty() {
            None
        } else {
            Some(path.to_string())
        };
        self.save_config()
    }

    pub fn set_output_format(
        &mut self,
        format: OutputFormat,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.config.output_format = format;
        self.save_config()
    }

    pub fn set_show_matrix(&mut self, show: bool) -> Result<(), Box<dyn std::error::Error>> {
        self.config.show_matrix = show;
        self.save_config()
    }

    pub fn reset_to_defaults(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.config = BalancerConfig::default();
        self.save_config()
    }
}
