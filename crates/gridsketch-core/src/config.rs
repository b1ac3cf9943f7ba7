//! Editor configuration.

use crate::camera::{MAX_ZOOM, MIN_ZOOM};
use crate::shapes::SerializableColor;
use crate::snap::GRID_SIZE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Tunable constants of the editor. Every field has a default, so a config
/// file only needs to list what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub title: String,
    /// Initial window (and view) width in pixels.
    pub window_width: u32,
    /// Initial window (and view) height in pixels.
    pub window_height: u32,
    /// Grid spacing in world units.
    pub grid_spacing: f64,
    /// Zoom factor change per wheel notch.
    pub zoom_speed: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Radius of grid and cursor dots.
    pub point_radius: f64,
    pub background_color: SerializableColor,
    pub grid_color: SerializableColor,
    pub cursor_color: SerializableColor,
    pub in_progress_color: SerializableColor,
    pub committed_color: SerializableColor,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            title: "GridSketch".to_string(),
            window_width: 1600,
            window_height: 960,
            grid_spacing: GRID_SIZE,
            zoom_speed: 0.1,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            point_radius: 3.0,
            background_color: SerializableColor::black(),
            grid_color: SerializableColor::rgb(0, 255, 0),
            cursor_color: SerializableColor::rgb(255, 0, 0),
            in_progress_color: SerializableColor::rgb(255, 255, 0),
            committed_color: SerializableColor::white(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
            }
        }

        positive("grid_spacing", self.grid_spacing)?;
        positive("zoom_speed", self.zoom_speed)?;
        positive("min_zoom", self.min_zoom)?;
        positive("max_zoom", self.max_zoom)?;
        positive("point_radius", self.point_radius)?;
        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "min_zoom ({}) is greater than max_zoom ({})",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero".to_string()));
        }
        Ok(())
    }
}
