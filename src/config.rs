use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tempo::Tempo;

pub const DEFAULT_BPM: f64 = 110.0;
pub const DEFAULT_DURATION_SECS: u32 = 15;
pub const DEFAULT_TOLERANCE_MS: f64 = 150.0;
pub const DEFAULT_COUNTDOWN_SECS: u32 = 3;

/// Rejected tuning values. Raised before a session can exist.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidBpm(f64),
    ZeroDuration,
    ZeroCountdown,
    InvalidTolerance(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBpm(bpm) => write!(f, "bpm must be a positive number, got {}", bpm),
            ConfigError::ZeroDuration => write!(f, "session duration must be at least one second"),
            ConfigError::ZeroCountdown => write!(f, "countdown must be at least one second"),
            ConfigError::InvalidTolerance(t) => {
                write!(f, "hit tolerance must be a non-negative number of ms, got {}", t)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    pub bpm: f64,
    pub duration_secs: u32,
    pub tolerance_ms: f64,
    pub countdown_secs: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            duration_secs: DEFAULT_DURATION_SECS,
            tolerance_ms: DEFAULT_TOLERANCE_MS,
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tempo()?;
        if self.duration_secs == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if self.countdown_secs == 0 {
            return Err(ConfigError::ZeroCountdown);
        }
        if !self.tolerance_ms.is_finite() || self.tolerance_ms < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.tolerance_ms));
        }
        Ok(())
    }

    pub fn tempo(&self) -> Result<Tempo, ConfigError> {
        Tempo::new(self.bpm)
    }
}
