//! Configuration management for the CLI
//!
//! Configuration is loaded from the first file found among:
//! - an explicit `--config` path (or `ERRTREE_CONFIG`)
//! - `.errtree.yaml` / `.errtree.json` in the current directory
//! - `errtree/config.yaml` / `errtree/config.json` in the user config directory
//!
//! Command-line flags take precedence over file values.

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::handlers::utils::is_yaml;
use errtree_core::Severity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Report settings
    pub report: ReportConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (human, json, json-pretty, yaml)
    pub format: String,

    /// Use colored output by default
    pub color: bool,
}

/// Report configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Lowest severity that makes `report` exit non-zero
    pub fail_on: Severity,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); verbosity flags win
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            fail_on: Severity::Critical,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".errtree.yaml"), PathBuf::from(".errtree.json")];

        if let Some(config_dir) = dirs::config_dir() {
            let errtree_dir = config_dir.join("errtree");
            paths.push(errtree_dir.join("config.yaml"));
            paths.push(errtree_dir.join("config.json"));
        }

        paths
    }

    /// Reject values that would otherwise be silently ignored
    fn validate(&self) -> Result<()> {
        if OutputFormat::from_name(&self.output.format).is_none() {
            return Err(Error::config(format!(
                "unknown output.format '{}' (expected human, json, json-pretty or yaml)",
                self.output.format
            )));
        }
        if let Some(format) = &self.logging.format {
            if !matches!(format.to_lowercase().as_str(), "compact" | "full" | "json") {
                return Err(Error::config(format!(
                    "unknown logging.format '{}' (expected compact, full or json)",
                    format
                )));
            }
        }
        Ok(())
    }

    /// Output format, with the command-line flag taking precedence
    pub fn output_format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or_else(|| OutputFormat::from_name(&self.output.format))
            .unwrap_or(OutputFormat::Human)
    }

    /// Failure threshold, with the command-line flag taking precedence
    pub fn fail_on(&self, flag: Option<Severity>) -> Severity {
        flag.unwrap_or(self.report.fail_on)
    }
}
