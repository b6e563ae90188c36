//! Configuration types for Volume Life simulation parameters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Pattern;

/// Largest axis size whose cell count `axis^3` fits in a `u32`.
///
/// Render frames and GPU buffers index cells with `u32`.
pub const MAX_AXIS_SIZE: usize = 1625;

fn default_axis_size() -> usize {
    64
}

fn default_time_between_updates() -> f32 {
    0.1
}

fn default_rule() -> String {
    "4/4/5".to_string()
}

/// Compute backend used for the transition step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Rayon-parallel CPU executor.
    #[default]
    Cpu,
    /// WebGPU compute shader executor.
    Gpu,
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Side length of the cubic grid in cells.
    #[serde(default = "default_axis_size")]
    pub axis_size: usize,
    /// Seconds of accumulated time between simulation steps.
    #[serde(default = "default_time_between_updates")]
    pub time_between_updates: f32,
    /// Rule text, `SURVIVE/BIRTH/STATES`.
    #[serde(default = "default_rule")]
    pub rule: String,
    /// Fixed RNG seed for the initial pattern. `None` derives one from the clock.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Compute backend.
    #[serde(default)]
    pub backend: Backend,
    /// Initial pattern.
    #[serde(default)]
    pub pattern: Pattern,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            axis_size: default_axis_size(),
            time_between_updates: default_time_between_updates(),
            rule: default_rule(),
            seed: None,
            backend: Backend::default(),
            pattern: Pattern::default(),
        }
    }
}

impl SimulationConfig {
    /// Get total grid size (axis_size^3), or `None` on overflow.
    #[inline]
    pub fn grid_size(&self) -> Option<usize> {
        self.axis_size
            .checked_mul(self.axis_size)?
            .checked_mul(self.axis_size)
    }

    /// Parse and validate configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.axis_size == 0 {
            return Err(ConfigError::InvalidAxisSize);
        }
        if self.axis_size > MAX_AXIS_SIZE {
            return Err(ConfigError::AxisSizeTooLarge(self.axis_size));
        }
        if !(self.time_between_updates.is_finite() && self.time_between_updates > 0.0) {
            return Err(ConfigError::InvalidUpdateInterval(self.time_between_updates));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Axis size must be non-zero")]
    InvalidAxisSize,
    #[error("Axis size {0} exceeds the maximum of {MAX_AXIS_SIZE}")]
    AxisSizeTooLarge(usize),
    #[error("Time between updates must be positive, got {0}")]
    InvalidUpdateInterval(f32),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
}
