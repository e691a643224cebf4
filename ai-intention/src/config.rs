//! Driver configuration, loaded from YAML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Timing and diagnostics knobs for the driving loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Seconds between bot updates.
    #[serde(default = "default_update_rate")]
    pub update_rate: f32,

    /// Seconds per server frame.
    #[serde(default = "default_tick_interval")]
    pub tick_interval: f32,

    /// Trace every action transition.
    pub debug_enabled: bool,
}

fn default_update_rate() -> f32 {
    0.06
}
fn default_tick_interval() -> f32 {
    1.0 / 60.0
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            update_rate: default_update_rate(),
            tick_interval: default_tick_interval(),
            debug_enabled: false,
        }
    }
}

impl DriverConfig {
    /// Parse and validate a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_interval.is_finite() && self.tick_interval > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tick_interval must be a positive number of seconds, got {}",
                self.tick_interval
            )));
        }
        if !(self.update_rate.is_finite() && self.update_rate >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "update_rate must be a non-negative number of seconds, got {}",
                self.update_rate
            )));
        }
        Ok(())
    }
}
