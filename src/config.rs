//! Application configuration, read from `motorsports-filter.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "motorsports-filter.json";

/// How the result area lays out visible readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Cards,
    Table,
}

/// Window and layout settings plus an optional readings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window_width: f32,
    pub window_height: f32,
    pub sidebar_width: f32,
    /// Minimum width of a result card; the grid fits as many columns as this allows.
    pub card_min_width: f32,
    pub default_view: ViewMode,
    /// Readings file loaded at startup instead of the built-in fixture.
    pub data_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_width: 1200.0,
            window_height: 800.0,
            sidebar_width: 250.0,
            card_min_width: 300.0,
            default_view: ViewMode::Cards,
            data_path: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content).map_err(ConfigError::Parse)?;
        Ok(config.validated())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Clamp sizes into usable ranges.
    pub fn validated(mut self) -> Self {
        self.window_width = self.window_width.max(400.0);
        self.window_height = self.window_height.max(300.0);
        self.sidebar_width = self.sidebar_width.max(150.0);
        self.card_min_width = self.card_min_width.max(120.0);
        self
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(serde_json::Error),
    #[error("config serialize error: {0}")]
    Serialize(serde_json::Error),
}
