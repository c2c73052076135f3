//! Flying objects (OVOs)
//!
//! An OVO appears at the far end of the court and flies toward the near end.
//! Once past the near boundary it is relocated to the far end at a new lane.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::difficulty::Hardness;
use super::state::Court;
use crate::consts::*;
use crate::hash_unit;

/// Benign OVOs score points, hostile ones drain energy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OvoKind {
    Benign,
    Hostile,
}

/// A flying object entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ovo {
    pub id: u32,
    pub kind: OvoKind,
    pub pos: Vec3,
    /// Advance per frame at hardness 0 (toward -z)
    pub base_speed: f32,
    pub radius: f32,
    /// Render opacity hint (lowered at high hardness)
    pub visibility: f32,
    /// Set exactly once, when this OVO resolves its collision
    collided: bool,
    /// Times this OVO has been relocated to the far end
    wraps: u32,
    /// Per-instance seed for relocation lanes
    lane_seed: u32,
}

impl Ovo {
    pub fn new(id: u32, kind: OvoKind, pos: Vec3, base_speed: f32, lane_seed: u32) -> Self {
        Self {
            id,
            kind,
            pos,
            base_speed,
            radius: OVO_RADIUS,
            visibility: 1.0,
            collided: false,
            wraps: 0,
            lane_seed,
        }
    }

    #[inline]
    pub fn collided(&self) -> bool {
        self.collided
    }

    #[inline]
    pub fn wraps(&self) -> u32 {
        self.wraps
    }

    /// Flag the OVO as resolved. Returns false if it already was.
    pub fn mark_collided(&mut self) -> bool {
        if self.collided {
            return false;
        }
        self.collided = true;
        true
    }

    /// Current advance per frame
    pub fn speed(&self, hardness: Hardness) -> f32 {
        self.base_speed * hardness.speed_factor()
    }

    /// Advance one frame. Deterministic in (self, hardness, court).
    pub fn animate(&mut self, hardness: Hardness, court: &Court) {
        self.pos.z -= self.speed(hardness);
        self.visibility = hardness.ovo_visibility();

        if self.pos.z < -court.half_length() {
            self.wraps += 1;
            self.pos.x = court.x_across(hash_unit(self.lane_seed, self.wraps));
            self.pos.z = court.spawn_z();
        }
    }
}
