//! Difficulty tiers
//!
//! Hardness is recomputed once per frame: a frame that resolves a new
//! collision takes the tier for the robot's points, any other frame is Calm.

use serde::{Deserialize, Serialize};

use super::state::SPOTLIGHT_COUNT;
use crate::platform::Frontend;

/// Hardness tier, level 0..=4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Hardness {
    /// No new collision this frame
    #[default]
    Calm,
    /// Collision with fewer than 5 points
    Baseline,
    /// 5..10 points
    Brisk,
    /// 10..15 points, scene lights go dark
    Dark,
    /// 15+ points
    Frantic,
}

impl Hardness {
    /// Tier for a frame that resolved a collision
    pub fn for_points(points: u32) -> Self {
        match points {
            0..5 => Hardness::Baseline,
            5..10 => Hardness::Brisk,
            10..15 => Hardness::Dark,
            _ => Hardness::Frantic,
        }
    }

    pub fn level(self) -> u8 {
        self as u8
    }

    /// OVO speed multiplier
    pub fn speed_factor(self) -> f32 {
        match self {
            Hardness::Calm | Hardness::Baseline => 1.0,
            Hardness::Brisk => 1.5,
            Hardness::Dark => 1.75,
            Hardness::Frantic => 2.0,
        }
    }

    /// OVO opacity hint
    pub fn ovo_visibility(self) -> f32 {
        match self {
            Hardness::Frantic => 0.5,
            _ => 1.0,
        }
    }

    /// Whether this tier switches the scene spotlights off
    pub fn darkens_scene(self) -> bool {
        self >= Hardness::Dark
    }
}

/// Switch the spotlights off for dark tiers. Safe to repeat.
pub fn apply_lighting(
    hardness: Hardness,
    lights_visible: &mut [bool; SPOTLIGHT_COUNT],
    frontend: &mut impl Frontend,
) {
    if !hardness.darkens_scene() {
        return;
    }
    for (light, visible) in lights_visible.iter_mut().enumerate() {
        *visible = false;
        frontend.set_light_visible(light, false);
    }
}
