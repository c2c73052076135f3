//! OVO Court - a robot dodging flying objects on a bounded court
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, difficulty, game state)
//! - `platform`: Collaborator interfaces for the presentation layer
//! - `settings`: Construction-time game settings

pub mod platform;
pub mod settings;
pub mod sim;

pub use platform::{Frontend, NullFrontend, RecordingFrontend};
pub use settings::{GameSettings, SettingsError};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Frame rate the orchestrator is driven at by the demo shell
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Court dimensions (centered at the origin, x = width, z = length)
    pub const COURT_WIDTH: f32 = 300.0;
    pub const COURT_LENGTH: f32 = 800.0;

    /// Total OVOs spawned in a session
    pub const OVO_TOTAL: u32 = 30;
    /// Fraction of OVOs that are benign
    pub const BENIGN_RATIO: f32 = 0.2;
    /// Probability of drawing a benign OVO while the quota is open
    pub const BENIGN_DRAW_CHANCE: f32 = 0.2;
    /// Spawn cadence (milliseconds)
    pub const SPAWN_INTERVAL_MS: u64 = 500;

    /// OVO collider radius
    pub const OVO_RADIUS: f32 = 5.0;
    /// OVO flight altitude above the court
    pub const OVO_ALTITUDE: f32 = 12.0;
    /// Distance from the far boundary where OVOs appear
    pub const OVO_SPAWN_INSET: f32 = 10.0;
    /// Base advance per frame at hardness 0
    pub const OVO_BASE_SPEED: f32 = 2.0;
    /// Random extra speed added on top of the base at spawn
    pub const OVO_SPEED_JITTER: f32 = 2.0;

    /// Robot body dimensions
    pub const ROBOT_BODY_WIDTH: f32 = 20.0;
    pub const ROBOT_BODY_HEIGHT: f32 = 14.0;
    /// Height of the body center above the court
    pub const ROBOT_BODY_ELEVATION: f32 = 12.0;
    /// Segments around the body silhouette
    pub const ROBOT_SILHOUETTE_SEGMENTS: usize = 16;
    /// Starting distance from the near boundary
    pub const ROBOT_START_INSET: f32 = 20.0;

    /// Energy at the start of a session (bar is drawn out of this)
    pub const MAX_ENERGY: u32 = 100;
    /// Energy lost per hostile hit
    pub const HOSTILE_DAMAGE: u32 = 10;
    /// Points gained per benign hit
    pub const BENIGN_POINTS: u32 = 1;

    /// Energy band thresholds
    pub const ENERGY_HIGH: u32 = 50;
    pub const ENERGY_MEDIUM: u32 = 30;
}

/// Nearest-hit threshold for a robot body of the given width.
#[inline]
pub fn collision_threshold(body_width: f32) -> f32 {
    1.0 + body_width / 2.0
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector on the court plane for a heading (0 = +z).
#[inline]
pub fn heading_to_dir(heading: f32) -> Vec3 {
    Vec3::new(heading.sin(), 0.0, heading.cos())
}

/// Hash a seed and counter into [0, 1).
#[inline]
pub fn hash_unit(seed: u32, counter: u32) -> f32 {
    let hash = seed
        .wrapping_mul(2654435761)
        .wrapping_add(counter.wrapping_mul(7919))
        .wrapping_mul(2654435761);
    (hash % 10_000) as f32 / 10_000.0
}
