use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Fixed beats-per-minute value; always strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tempo {
    bpm: f64,
}

impl Tempo {
    pub fn new(bpm: f64) -> Result<Self, ConfigError> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(ConfigError::InvalidBpm(bpm));
        }
        Ok(Self { bpm })
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn beat_interval_ms(&self) -> f64 {
        60_000.0 / self.bpm
    }

    /// Beats that fall in `duration_secs` at this tempo; fractional on purpose.
    pub fn beats_in(&self, duration_secs: u32) -> f64 {
        duration_secs as f64 * (self.bpm / 60.0)
    }
}
