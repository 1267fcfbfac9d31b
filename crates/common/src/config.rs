//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LogomarkError, LogomarkResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where batch exports are written by default.
    pub output_dir: PathBuf,

    /// Default placement parameters for new sessions.
    #[serde(default)]
    pub placement: PlacementDefaults,

    /// Preview rendering settings.
    #[serde(default)]
    pub preview: PreviewConfig,

    /// Limits applied when reading source and logo files.
    #[serde(default)]
    pub acquisition: AcquisitionConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default placement parameters.
///
/// Stored as plain values; the layout model parses and clamps them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementDefaults {
    /// Anchor preset key (e.g. "bottom-right", "tl", "center").
    pub anchor: String,

    /// Margin from the anchored edges, in canvas pixels.
    pub margin: u32,

    /// Logo width as a percentage of canvas width (5-50).
    pub size_percent: u8,

    /// Logo opacity percentage (10-100).
    pub opacity: u8,

    /// Output size key ("native", a preset key, or "WIDTHxHEIGHT").
    pub output_size: String,
}

/// Preview rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Longest edge of the preview surface, in pixels.
    pub max_dimension: u32,
}

/// Limits for file acquisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    /// Largest accepted input file, in bytes.
    pub max_file_bytes: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "logomark=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: dirs_default_exports(),
            placement: PlacementDefaults::default(),
            preview: PreviewConfig::default(),
            acquisition: AcquisitionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for PlacementDefaults {
    fn default() -> Self {
        Self {
            anchor: "bottom-right".to_string(),
            margin: 20,
            size_percent: 15,
            opacity: 100,
            output_size: "native".to_string(),
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { max_dimension: 800 }
    }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 25 * 1024 * 1024,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Reject values no session can work with.
    pub fn validate(&self) -> LogomarkResult<()> {
        if self.preview.max_dimension == 0 {
            return Err(LogomarkError::config("preview.max_dimension must be at least 1"));
        }
        if self.acquisition.max_file_bytes == 0 {
            return Err(LogomarkError::config("acquisition.max_file_bytes must be at least 1"));
        }
        if self.placement.anchor.trim().is_empty() {
            return Err(LogomarkError::config("placement.anchor is empty"));
        }
        Ok(())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("logomark").join("config.json")
}

/// Default export directory.
fn dirs_default_exports() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("logomark").join("exports")
}
