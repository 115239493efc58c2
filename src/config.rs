//! Configuration file support.
//!
//! Settings are stored as a JSON document. Every section and field has a
//! default, so partial files are accepted; files written by a newer version
//! are rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BRUSH_SIZE, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_MAX_SCALE,
    DEFAULT_MIN_SCALE, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE,
};
use crate::keybindings::KeyBindings;

/// Verbosity of the `log` output. `RUST_LOG` still takes precedence in the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    /// Saves, loads and new shapes
    #[default]
    Info,
    /// Mode and selection changes
    Debug,
    /// Every pointer event
    Trace,
}

impl LogLevel {
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Matching filter for `env_logger`.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Config file format version; files with a higher version are refused.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// File format version, see [`CONFIG_VERSION`]
    pub version: u32,

    pub preferences: UserPreferences,

    pub keybindings: KeyBindings,
}

/// Editor and logging preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    /// Canvas size in pixels; larger images are shrunk to fit
    pub canvas_width: u32,
    pub canvas_height: u32,

    /// Initial brush radius in image pixels
    pub brush_size: u32,

    /// Zoom limits
    pub min_scale: f32,
    pub max_scale: f32,

    pub log_level: LogLevel,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            brush_size: DEFAULT_BRUSH_SIZE,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            log_level: LogLevel::default(),
        }
    }
}

impl UserPreferences {
    /// Reject values the editor cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ConfigError::invalid_value(format!(
                "canvas size {}x{} must be non-zero",
                self.canvas_width, self.canvas_height
            )));
        }
        if !(MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE).contains(&self.brush_size) {
            return Err(ConfigError::invalid_value(format!(
                "brush size {} outside {}..={}",
                self.brush_size, MIN_BRUSH_SIZE, MAX_BRUSH_SIZE
            )));
        }
        if !(self.min_scale.is_finite() && self.max_scale.is_finite())
            || self.min_scale <= 0.0
            || self.min_scale > self.max_scale
        {
            return Err(ConfigError::invalid_value(format!(
                "scale range {}..{} is invalid",
                self.min_scale, self.max_scale
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: UserPreferences::default(),
            keybindings: KeyBindings::default(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize and validate configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        config.preferences.validate()?;
        Ok(config)
    }

    /// Get the default filename for config files.
    pub fn default_filename() -> &'static str {
        "detlab-config.json"
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to a file, creating parent directories if needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from reading, parsing or writing a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// A setting is out of range
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Action;
    use crate::test_image::scratch_dir;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.preferences.canvas_width, 800);
        assert_eq!(config.preferences.canvas_height, 600);
        assert_eq!(config.preferences.brush_size, 20);
    }

    #[test]
    fn test_partial_preferences() {
        let config = AppConfig::from_json(
            r#"{"version": 1, "preferences": {"brush_size": 8, "log_level": "debug"}}"#,
        )
        .unwrap();
        assert_eq!(config.preferences.brush_size, 8);
        assert_eq!(config.preferences.log_level, LogLevel::Debug);
        assert_eq!(config.preferences.max_scale, DEFAULT_MAX_SCALE);
        assert_eq!(
            config.preferences.log_level.to_level_filter(),
            log::LevelFilter::Debug
        );
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = AppConfig::from_json(r#"{"version": 99}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::VersionTooNew {
                file_version: 99,
                supported_version: CONFIG_VERSION
            }
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        for json in [
            r#"{"preferences": {"brush_size": 0}}"#,
            r#"{"preferences": {"brush_size": 51}}"#,
            r#"{"preferences": {"canvas_width": 0}}"#,
            r#"{"preferences": {"min_scale": 2.0, "max_scale": 1.0}}"#,
            r#"{"preferences": {"min_scale": -1.0}}"#,
        ] {
            assert!(
                matches!(AppConfig::from_json(json), Err(ConfigError::InvalidValue(_))),
                "accepted {}",
                json
            );
        }
        assert!(matches!(
            AppConfig::from_json("{not json"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = scratch_dir("config");
        let path = dir.join("nested").join(AppConfig::default_filename());

        let mut config = AppConfig::new();
        config.preferences.canvas_width = 1024;
        config.keybindings.save = 'k';
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.keybindings.action_for_key('k'), Some(Action::Save));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = scratch_dir("config-missing");
        assert!(matches!(
            AppConfig::load(&dir.join("absent.json")),
            Err(ConfigError::IoError(_))
        ));
        std::fs::remove_dir_all(&dir).ok();
    }
}
