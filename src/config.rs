use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pacing {
    #[default]
    RealTime,
    // advance the simulated clock without sleeping
    Unthrottled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraneConfig {
    /// Grid cells per simulated second.
    pub move_speed: f64,
    /// Attach or detach operations per simulated second.
    pub attach_detach_speed: f64,
    pub frame_interval_ms: u64,
    pub pacing: Pacing,
}

impl Default for CraneConfig {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            attach_detach_speed: 1.0,
            frame_interval_ms: 16,
            pacing: Pacing::RealTime,
        }
    }
}

impl CraneConfig {
    pub fn unthrottled() -> Self {
        Self {
            pacing: Pacing::Unthrottled,
            ..Self::default()
        }
    }

    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let cfg: CraneConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_speed("move_speed", self.move_speed)?;
        check_speed("attach_detach_speed", self.attach_detach_speed)?;
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::InvalidFrameInterval);
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

// A speed is usable only if one cell or one operation takes a representable time.
fn check_speed(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 && Duration::try_from_secs_f64(1.0 / value).is_ok() {
        Ok(())
    } else {
        Err(ConfigError::InvalidSpeed { name, value })
    }
}
