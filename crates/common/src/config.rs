//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::CardResult;

/// File name used when no output path is given.
pub const DEFAULT_FILE_NAME: &str = "exif-card.jpg";

/// Global application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default card layout.
    #[serde(default)]
    pub layout: LayoutDefaults,

    /// How the source photo is scaled onto the card.
    #[serde(default)]
    pub scaling: ScalingDefaults,

    /// Output file settings.
    #[serde(default)]
    pub output: OutputDefaults,

    /// Font used for the metadata text.
    #[serde(default)]
    pub font: FontConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default layout parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDefaults {
    /// Padding around the photo in pixels (0-100).
    pub padding: u32,

    /// Whether metadata text is drawn at all.
    pub show_metadata: bool,

    /// Whether the "<make> <model>" line is drawn.
    pub show_camera: bool,

    /// Whether the exposure settings line is drawn.
    pub show_settings: bool,
}

/// Scaling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingDefaults {
    /// Bounding box width for fit-within scaling.
    pub max_width: u32,

    /// Bounding box height for fit-within scaling.
    pub max_height: u32,

    /// When set, scale by this fixed factor instead of fitting the box.
    #[serde(default)]
    pub fixed_factor: Option<f64>,
}

/// Output file parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDefaults {
    /// File name used when no output path is given.
    pub file_name: String,

    /// Encoded format ("jpeg" or "png").
    pub format: String,

    /// JPEG quality (1-100).
    pub quality: u8,
}

/// Font configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    /// TrueType font file. The built-in bitmap face is used when unset.
    pub path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "exifcard=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            layout: LayoutDefaults::default(),
            scaling: ScalingDefaults::default(),
            output: OutputDefaults::default(),
            font: FontConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LayoutDefaults {
    fn default() -> Self {
        Self {
            padding: 20,
            show_metadata: true,
            show_camera: true,
            show_settings: true,
        }
    }
}

impl Default for ScalingDefaults {
    fn default() -> Self {
        Self {
            max_width: 800,
            max_height: 800,
            fixed_factor: None,
        }
    }
}

impl Default for OutputDefaults {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            format: "jpeg".to_string(),
            quality: 100,
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
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match Self::from_json(&content) {
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

    /// Parse a config document. Missing sections take their defaults.
    pub fn from_json(content: &str) -> CardResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
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
    base.join("exifcard").join("config.json")
}
