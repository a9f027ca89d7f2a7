use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Shortest fixed step accepted, in seconds (10 kHz).
pub const MIN_FIXED_TIMESTEP_SECS: f32 = 1e-4;

/// Timing for the frame driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Length of one fixed-step tick in seconds.
    pub fixed_timestep_secs: f32,
    /// Upper bound on fixed steps run in a single frame; backlog beyond it is dropped.
    pub max_fixed_steps_per_frame: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_timestep_secs: 1.0 / 90.0,
            max_fixed_steps_per_frame: 4,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.fixed_timestep_secs.is_finite()
            || self.fixed_timestep_secs < MIN_FIXED_TIMESTEP_SECS
        {
            return Err(ConfigError::Invalid(format!(
                "fixed_timestep_secs must be a finite number of at least {}, got {}",
                MIN_FIXED_TIMESTEP_SECS, self.fixed_timestep_secs
            )));
        }
        if self.max_fixed_steps_per_frame == 0 {
            return Err(ConfigError::Invalid(
                "max_fixed_steps_per_frame must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
