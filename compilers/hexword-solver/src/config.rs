use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("max_passes must be at least 1")]
    NoPasses,
    #[error("{field} must be a finite, non-negative number of seconds, got {value}")]
    BadSeconds { field: &'static str, value: f64 },
}

/// Tuning knobs for [`crate::RuleEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on search/apply passes in one recompute.
    pub max_passes: usize,
    /// Simulated seconds between two undo hints.
    pub hint_cooldown_secs: f64,
    /// How long a hint stays on screen.
    pub hint_duration_secs: f64,
    pub undo_hint: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_passes: 8,
            hint_cooldown_secs: 20.0,
            hint_duration_secs: 5.0,
            undo_hint: "Press Z to undo".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_passes == 0 {
            return Err(ConfigError::NoPasses);
        }
        seconds("hint_cooldown_secs", self.hint_cooldown_secs)?;
        seconds("hint_duration_secs", self.hint_duration_secs)?;
        Ok(())
    }

    pub fn hint_cooldown(&self) -> Duration {
        Duration::try_from_secs_f64(self.hint_cooldown_secs).unwrap_or_default()
    }

    pub fn hint_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.hint_duration_secs).unwrap_or_default()
    }
}

fn seconds(field: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::BadSeconds { field, value })
}
