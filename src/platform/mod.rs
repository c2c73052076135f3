//! Platform abstraction layer
//!
//! The simulation never touches presentation directly. Everything the
//! renderer, HUD and lighting need is pushed through [`Frontend`]:
//! - Camera orbit-control updates and camera switches
//! - Spotlight visibility
//! - Energy/points/phase status and the end-of-game message

use crate::sim::{ActiveCamera, EnergyBand, GamePhase, Hardness};

/// Per-frame HUD values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudStatus {
    pub energy: u32,
    pub band: EnergyBand,
    pub points: u32,
    pub phase: GamePhase,
    pub hardness: Hardness,
}

/// Presentation-side collaborator. Every hook defaults to a no-op.
pub trait Frontend {
    /// Orbit controls of the third-person camera
    fn update_camera_controls(&mut self) {}

    fn camera_changed(&mut self, _camera: ActiveCamera) {}

    fn set_light_visible(&mut self, _light: usize, _visible: bool) {}

    fn show_status(&mut self, _status: &HudStatus) {}

    fn show_paused(&mut self, _paused: bool) {}

    fn show_game_over(&mut self, _points: u32) {}
}

/// Frontend that ignores everything (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFrontend;

impl Frontend for NullFrontend {}

/// Something the core asked the frontend to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrontendEvent {
    CameraControls,
    Camera(ActiveCamera),
    Light(usize, bool),
    Status(HudStatus),
    Paused(bool),
    GameOver { points: u32 },
}

/// Frontend that records every call, in order
#[derive(Debug, Clone, Default)]
pub struct RecordingFrontend {
    pub events: Vec<FrontendEvent>,
}

impl RecordingFrontend {
    pub fn last_status(&self) -> Option<HudStatus> {
        self.events.iter().rev().find_map(|e| match e {
            FrontendEvent::Status(status) => Some(*status),
            _ => None,
        })
    }
}

impl Frontend for RecordingFrontend {
    fn update_camera_controls(&mut self) {
        self.events.push(FrontendEvent::CameraControls);
    }

    fn camera_changed(&mut self, camera: ActiveCamera) {
        self.events.push(FrontendEvent::Camera(camera));
    }

    fn set_light_visible(&mut self, light: usize, visible: bool) {
        self.events.push(FrontendEvent::Light(light, visible));
    }

    fn show_status(&mut self, status: &HudStatus) {
        self.events.push(FrontendEvent::Status(*status));
    }

    fn show_paused(&mut self, paused: bool) {
        self.events.push(FrontendEvent::Paused(paused));
    }

    fn show_game_over(&mut self, points: u32) {
        self.events.push(FrontendEvent::GameOver { points });
    }
}
