//! Game settings
//!
//! Construction-time parameters for a session. Defaults come from
//! [`crate::consts`]; a JSON document may override any subset of them.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    // === Court ===
    pub court_width: f32,
    pub court_length: f32,

    // === Spawning ===
    /// Total OVOs for the session
    pub ovo_total: u32,
    /// Fraction of `ovo_total` that must be benign
    pub benign_ratio: f32,
    /// Timer cadence in milliseconds
    pub spawn_interval_ms: u64,

    // === Robot ===
    pub robot_body_width: f32,
    pub starting_energy: u32,
    pub hostile_damage: u32,
    pub benign_points: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            court_width: COURT_WIDTH,
            court_length: COURT_LENGTH,

            ovo_total: OVO_TOTAL,
            benign_ratio: BENIGN_RATIO,
            spawn_interval_ms: SPAWN_INTERVAL_MS,

            robot_body_width: ROBOT_BODY_WIDTH,
            starting_energy: MAX_ENERGY,
            hostile_damage: HOSTILE_DAMAGE,
            benign_points: BENIGN_POINTS,
        }
    }
}

impl GameSettings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every field is usable
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.court_width.is_finite() && self.court_width > 0.0) {
            return Err(SettingsError::Invalid {
                field: "court_width",
                reason: "must be positive",
            });
        }
        if !(self.court_length.is_finite() && self.court_length > 0.0) {
            return Err(SettingsError::Invalid {
                field: "court_length",
                reason: "must be positive",
            });
        }
        if !(0.0..=1.0).contains(&self.benign_ratio) {
            return Err(SettingsError::Invalid {
                field: "benign_ratio",
                reason: "must be within [0, 1]",
            });
        }
        if self.spawn_interval_ms == 0 {
            return Err(SettingsError::Invalid {
                field: "spawn_interval_ms",
                reason: "must be non-zero",
            });
        }
        if !(self.robot_body_width.is_finite() && self.robot_body_width > 0.0) {
            return Err(SettingsError::Invalid {
                field: "robot_body_width",
                reason: "must be positive",
            });
        }
        if self.starting_energy == 0 {
            return Err(SettingsError::Invalid {
                field: "starting_energy",
                reason: "must be non-zero",
            });
        }
        Ok(())
    }

    /// Number of OVOs that must be benign by the end of spawning
    pub fn benign_quota(&self) -> u32 {
        (self.ovo_total as f32 * self.benign_ratio).round() as u32
    }

    /// Spawn cadence as a duration
    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    /// Nearest-hit distance below which a ray hit counts as a collision
    pub fn collision_threshold(&self) -> f32 {
        crate::collision_threshold(self.robot_body_width)
    }
}
