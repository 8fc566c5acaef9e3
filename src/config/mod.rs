//! Configuration module for tweaklog-rs
//!
//! Settings are stored as TOML in the platform-appropriate config location:
//! - **Linux**: `~/.config/tweaklog-rs/config.toml`
//! - **macOS**: `~/Library/Application Support/tweaklog-rs/config.toml`
//! - **Windows**: `%APPDATA%\tweaklog-rs\config.toml`
//!
//! Every field has a serde default, so a partial file (or none at all) is
//! valid.
//!
//! # Example
//!
//! ```toml
//! [recorder]
//! coalesce_window_ms = 80
//!
//! [playback]
//! enabled = true
//! frame_rate_hz = 30
//!
//! [export]
//! default_format = "csv"
//! ```

pub mod settings;

pub use settings::*;

use crate::error::{Result, ResultExt, TweakLogError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for config directories
pub const APP_ID: &str = "tweaklog-rs";

/// Config filename
pub const CONFIG_FILE: &str = "config.toml";

/// Get the application config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Get the path to the default config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AutomationConfig {
    #[serde(default)]
    pub recorder: RecorderConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub export: ExportSettings,
}

impl AutomationConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Render configuration as TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| TweakLogError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let path = config_path().ok_or_else(|| {
            TweakLogError::Config("Could not determine config directory".to_string())
        })?;
        Self::load_from(path)
    }

    /// Load from `path` (or the default location), falling back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let result = match path {
            Some(p) => Self::load_from(p),
            None => match config_path() {
                Some(p) if p.exists() => Self::load_from(p),
                _ => return Self::default(),
            },
        };

        result.unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save configuration to an explicit path, creating parent directories
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory {}", parent.display())
                })?;
            }
        }

        let content = self.to_toml_string()?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let path = config_path().ok_or_else(|| {
            TweakLogError::Config("Could not determine config directory".to_string())
        })?;
        self.save_to(path)
    }
}
