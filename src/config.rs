//! Runtime configuration, loaded from `.json` or `.ron`.

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{DEFAULT_CARRY_CAPACITY, VIEW_DISTANCE};
use crate::logging::TracingConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("Unsupported config extension: {0}")]
    UnsupportedExtension(String),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RaidConfig {
    /// Master seed; `None` draws one from OS entropy at launch
    pub seed: Option<u64>,
    /// Nominal ticks per second
    pub tick_rate: u32,
    /// Largest tick scale applied after a frame hitch
    pub max_step: f32,
    /// Backpack budget in kg
    pub carry_capacity: f32,
    /// Fog radius in screen pixels
    pub view_distance: f32,
    /// Canvas resolution relative to the window, in (0, 1]
    pub render_scale: f32,
    pub tracing: TracingConfig,
}

impl Default for RaidConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tick_rate: 60,
            max_step: 3.0,
            carry_capacity: DEFAULT_CARRY_CAPACITY,
            view_distance: VIEW_DISTANCE,
            render_scale: 1.0,
            tracing: TracingConfig::default(),
        }
    }
}

impl RaidConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));
        if self.tick_rate == 0 {
            return invalid("tick_rate must be positive");
        }
        if !(self.max_step > 0.0) {
            return invalid("max_step must be positive");
        }
        if !(self.carry_capacity > 0.0) {
            return invalid("carry_capacity must be positive");
        }
        if !(self.view_distance > 0.0) {
            return invalid("view_distance must be positive");
        }
        if !(self.render_scale > 0.0 && self.render_scale <= 1.0) {
            return invalid("render_scale must be in (0, 1]");
        }
        Ok(())
    }

    /// Tick scale for a frame of `dt` seconds
    pub fn step_for(&self, dt: f32) -> f32 {
        (dt * self.tick_rate as f32).clamp(0.0, self.max_step)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: RaidConfig = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&text)?,
            Some("ron") => ron::from_str(&text)?,
            other => {
                return Err(ConfigError::UnsupportedExtension(
                    other.unwrap_or("").to_string(),
                ))
            }
        };
        config.validate()?;
        Ok(config)
    }
}
