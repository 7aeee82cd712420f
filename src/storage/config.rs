//! Merge configuration.
//!
//! Loaded from TOML. Every field has a default so a missing or partial file
//! still produces a usable configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Power log parsing settings
    pub power_log: PowerLogSettings,
    /// Combined file settings
    pub output: OutputSettings,
}

/// Power log (CSV) settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerLogSettings {
    /// Rows starting with any of these are header/label rows
    pub header_markers: Vec<String>,
    /// Column holding the elapsed time key
    pub time_column: usize,
    /// Column holding the power reading
    pub power_column: usize,
    /// Warn and drop short rows instead of failing
    pub skip_malformed_rows: bool,
}

impl Default for PowerLogSettings {
    fn default() -> Self {
        Self {
            header_markers: vec![
                "Stages".to_string(),
                "English".to_string(),
                "Time".to_string(),
            ],
            time_column: 0,
            power_column: 3,
            skip_malformed_rows: false,
        }
    }
}

impl PowerLogSettings {
    /// Minimum number of columns a data row must have.
    pub fn required_columns(&self) -> usize {
        self.time_column.max(self.power_column) + 1
    }

    /// Whether the line is a header/label row.
    pub fn is_header(&self, line: &str) -> bool {
        self.header_markers
            .iter()
            .any(|marker| line.starts_with(marker.as_str()))
    }
}

/// Combined file settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Appended to the basename before `.tcx`
    pub suffix: String,
    /// Spaces per nesting level in the written XML
    pub indent: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            suffix: "-combined".to_string(),
            indent: 2,
        }
    }
}

/// Get the application config directory.
pub fn get_config_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "wattmerge", "WattMerge")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the default configuration file path.
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}

/// Load configuration.
///
/// An explicit path must exist. Without one, the default location is tried
/// and defaults are used when nothing is there.
pub fn load_config(path: Option<&Path>) -> Result<MergeConfig, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default_path = get_config_path();
            if !default_path.exists() {
                return Ok(MergeConfig::default());
            }
            default_path
        }
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

    parse_config(&content)
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<MergeConfig, ConfigError> {
    let config: MergeConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    if config.power_log.time_column == config.power_log.power_column {
        return Err(ConfigError::ParseError(
            "time_column and power_column must differ".to_string(),
        ));
    }

    Ok(config)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config IO error: {0}")]
    IoError(String),

    #[error("Config parse error: {0}")]
    ParseError(String),
}
