//! Error handling for tweaklog-rs
//!
//! This module defines the crate error type and a Result alias for use
//! throughout the library. Guarded no-ops (capturing while not recording,
//! playing while the transport is stopped) and clamped inputs (seek/trim
//! overshoot) are not errors and never surface here.

use thiserror::Error;

/// Main error type for tweaklog-rs operations
#[derive(Error, Debug)]
pub enum TweakLogError {
    /// Imported data is missing a field or has it with the wrong type
    #[error("Validation error in {}: {message}", location(.field, .index))]
    Validation {
        /// Offending field name
        field: String,
        /// Index of the offending event, if the problem is inside `events`
        index: Option<usize>,
        /// Human readable description
        message: String,
    },

    /// JSON parse/serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parse errors for configuration files
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<TweakLogError>,
    },
}

fn location(field: &str, index: &Option<usize>) -> String {
    match index {
        Some(i) => format!("events[{}].{}", i, field),
        None => field.to_string(),
    }
}

impl TweakLogError {
    /// Create a validation error for a top-level field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        TweakLogError::Validation {
            field: field.into(),
            index: None,
            message: message.into(),
        }
    }

    /// Create a validation error for a field of the event at `index`
    pub fn event_validation(
        index: usize,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        TweakLogError::Validation {
            field: field.into(),
            index: Some(index),
            message: message.into(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        TweakLogError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns true if this is (or wraps) a validation error
    pub fn is_validation(&self) -> bool {
        match self {
            TweakLogError::Validation { .. } => true,
            TweakLogError::WithContext { source, .. } => source.is_validation(),
            _ => false,
        }
    }
}

/// Result type alias for tweaklog-rs operations
pub type Result<T> = std::result::Result<T, TweakLogError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| TweakLogError::Io(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| TweakLogError::Io(e).with_context(f()))
    }
}
