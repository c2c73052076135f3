//! OVO spawning
//!
//! The spawner owns the benign/hostile quota. Type selection is a pure
//! function of the remaining slots, the remaining benign quota and one
//! uniform draw, so the quota is met exactly whatever the draws are.

use std::time::Duration;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ovo::{Ovo, OvoKind};
use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Pick the kind of the next OVO.
///
/// `draw` is uniform in [0, 1). Benign is forced once every remaining slot
/// is needed to fill the benign quota, and never chosen once it is met.
pub fn choose_kind(remaining_slots: u32, remaining_benign: u32, draw: f32) -> OvoKind {
    if remaining_benign == 0 {
        OvoKind::Hostile
    } else if remaining_slots <= remaining_benign || draw <= BENIGN_DRAW_CHANCE {
        OvoKind::Benign
    } else {
        OvoKind::Hostile
    }
}

/// Quota bookkeeping for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawner {
    total: u32,
    benign_quota: u32,
    benign_created: u32,
    hostile_created: u32,
}

impl Spawner {
    pub fn new(total: u32, benign_quota: u32) -> Self {
        Self {
            total,
            benign_quota: benign_quota.min(total),
            benign_created: 0,
            hostile_created: 0,
        }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn benign_quota(&self) -> u32 {
        self.benign_quota
    }

    pub fn benign_created(&self) -> u32 {
        self.benign_created
    }

    pub fn hostile_created(&self) -> u32 {
        self.hostile_created
    }

    pub fn created(&self) -> u32 {
        self.benign_created + self.hostile_created
    }

    pub fn remaining(&self) -> u32 {
        self.total - self.created()
    }

    pub fn is_exhausted(&self) -> bool {
        self.created() >= self.total
    }

    /// Claim the next slot, or None once the total is reached
    pub fn next_kind(&mut self, draw: f32) -> Option<OvoKind> {
        if self.is_exhausted() {
            return None;
        }
        let remaining_benign = self.benign_quota - self.benign_created;
        let kind = choose_kind(self.remaining(), remaining_benign, draw);
        match kind {
            OvoKind::Benign => self.benign_created += 1,
            OvoKind::Hostile => self.hostile_created += 1,
        }
        debug_assert!(self.created() <= self.total);
        debug_assert!(self.benign_created <= self.benign_quota);
        Some(kind)
    }
}

/// Fixed-interval spawn timer driven by elapsed frame time
#[derive(Debug, Clone)]
pub struct SpawnClock {
    interval: Duration,
    accumulator: Duration,
}

impl SpawnClock {
    pub fn new(interval: Duration) -> Self {
        debug_assert!(!interval.is_zero());
        Self {
            interval,
            accumulator: Duration::ZERO,
        }
    }

    /// Add elapsed time and return how many spawns are due
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;
        let mut due = 0;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            due += 1;
        }
        due
    }
}

impl GameState {
    /// Create the next OVO at the far end of the court and register its
    /// collider. Returns its id, or None once the total is reached or the
    /// game is not running.
    pub fn create_ovo(&mut self) -> Option<u32> {
        if self.phase != GamePhase::Running {
            return None;
        }
        let draw: f32 = self.rng().random();
        let kind = self.spawner.next_kind(draw)?;

        let lane: f32 = self.rng().random();
        let jitter: f32 = self.rng().random();
        let lane_seed: u32 = self.rng().random();
        let pos = Vec3::new(self.court.x_across(lane), OVO_ALTITUDE, self.court.spawn_z());
        let speed = OVO_BASE_SPEED + jitter * OVO_SPEED_JITTER;

        let id = self.next_entity_id();
        self.ovos.push(Ovo::new(id, kind, pos, speed, lane_seed));
        self.colliders.register(self.ovos.len() - 1, OVO_RADIUS);

        log::debug!(
            "Spawned OVO {} ({:?}) at x={:.1}, {}/{}",
            id,
            kind,
            pos.x,
            self.spawner.created(),
            self.spawner.total()
        );
        Some(id)
    }
}
