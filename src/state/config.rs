use std::fs;
use std::path::Path;

use egui::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::command::DEFAULT_HISTORY_LIMIT;
use crate::input::KeyBindings;
use crate::style::{BrushSettings, StyleDefaults};
use crate::viewport::DEFAULT_PAN_NUDGE;

/// Errors raised while reading an editor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Side length of the square every dropped or loaded image is fitted into.
pub const DEFAULT_IMAGE_FOOTPRINT: f32 = 180.0;

/// Offset applied to duplicated elements.
pub const DEFAULT_DUPLICATE_OFFSET: Vec2 = Vec2::new(5.0, 5.0);

/// Settings of one editor instance. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Passed to the save callback alongside the serialized scene
    pub document_id: String,
    pub history_limit: usize,
    pub duplicate_offset: Vec2,
    pub zoom_pan_nudge: Vec2,
    pub image_footprint: f32,
    pub style: StyleDefaults,
    pub brush: BrushSettings,
    pub key_bindings: KeyBindings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            document_id: "default".to_owned(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            duplicate_offset: DEFAULT_DUPLICATE_OFFSET,
            zoom_pan_nudge: DEFAULT_PAN_NUDGE,
            image_footprint: DEFAULT_IMAGE_FOOTPRINT,
            style: StyleDefaults::default(),
            brush: BrushSettings::default(),
            key_bindings: KeyBindings::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded editor config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid("historyLimit must be at least 1".to_owned()));
        }
        if !(self.image_footprint.is_finite() && self.image_footprint > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "imageFootprint must be positive, got {}",
                self.image_footprint
            )));
        }
        Ok(())
    }
}
