//! Settings sections for the recorder, the player and exports
//!
//! # Main Types
//!
//! - [`RecorderConfig`] - Debounce window and capture limits
//! - [`PlaybackConfig`] - Playback enable flag and host frame rate
//! - [`ExportSettings`] - Default export format and output directory

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default debounce coalesce window in milliseconds
pub const DEFAULT_COALESCE_WINDOW_MS: u64 = 50;

/// Default host frame rate used for simulated replay
pub const DEFAULT_FRAME_RATE_HZ: u32 = 60;

/// Capture settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Repeated changes to the same key closer than this merge into one event
    #[serde(default = "default_coalesce_window_ms")]
    pub coalesce_window_ms: u64,

    /// Maximum number of stored events (0 = unlimited)
    #[serde(default)]
    pub max_events: usize,
}

fn default_coalesce_window_ms() -> u64 {
    DEFAULT_COALESCE_WINDOW_MS
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            coalesce_window_ms: DEFAULT_COALESCE_WINDOW_MS,
            max_events: 0,
        }
    }
}

impl RecorderConfig {
    pub fn coalesce_window(&self) -> Duration {
        Duration::from_millis(self.coalesce_window_ms)
    }

    /// Set the coalesce window
    pub fn with_coalesce_window_ms(mut self, window_ms: u64) -> Self {
        self.coalesce_window_ms = window_ms;
        self
    }

    /// Set the maximum number of stored events
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }
}

/// Playback settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Whether automation playback is enabled at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Frame rate of the host scheduler driving `tick()`
    #[serde(default = "default_frame_rate_hz")]
    pub frame_rate_hz: u32,
}

fn default_true() -> bool {
    true
}

fn default_frame_rate_hz() -> u32 {
    DEFAULT_FRAME_RATE_HZ
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            frame_rate_hz: DEFAULT_FRAME_RATE_HZ,
        }
    }
}

impl PlaybackConfig {
    /// Interval between host frames
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate_hz.max(1) as f64)
    }
}

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "JSON"),
            ExportFormat::Csv => write!(f, "CSV"),
        }
    }
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Format used when none is given explicitly
    #[serde(default)]
    pub default_format: ExportFormat,

    /// Directory for generated export files (current directory if unset)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}
