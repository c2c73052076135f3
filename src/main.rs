//! OVO Court entry point
//!
//! Runs a headless demo session: the autopilot drives the robot while a
//! spawn clock feeds OVOs in, and a logging frontend prints HUD changes.

use std::time::Duration;

use ovo_court::consts::*;
use ovo_court::platform::{Frontend, HudStatus};
use ovo_court::sim::{ActiveCamera, GamePhase, GameState, SpawnClock, TickInput, tick};
use ovo_court::GameSettings;

/// Give up after this many frames (10 minutes at 60 Hz)
const MAX_FRAMES: u64 = 60 * 60 * 10;

/// Frontend that logs HUD changes instead of drawing them
#[derive(Default)]
struct LogFrontend {
    last: Option<HudStatus>,
}

impl Frontend for LogFrontend {
    fn camera_changed(&mut self, camera: ActiveCamera) {
        log::info!("Camera: {:?}", camera);
    }

    fn set_light_visible(&mut self, light: usize, visible: bool) {
        log::info!("Spotlight {} visible: {}", light, visible);
    }

    fn show_status(&mut self, status: &HudStatus) {
        let changed = self
            .last
            .is_none_or(|last| last.energy != status.energy || last.points != status.points);
        if changed {
            log::info!(
                "Energy {} ({:?}), points {}",
                status.energy,
                status.band,
                status.points
            );
        }
        self.last = Some(*status);
    }

    fn show_paused(&mut self, paused: bool) {
        log::info!("Paused: {}", paused);
    }

    fn show_game_over(&mut self, points: u32) {
        log::info!("End of the game. Points: {}", points);
    }
}

fn load_settings() -> GameSettings {
    let Some(path) = std::env::args().nth(1) else {
        return GameSettings::default();
    };
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Could not read settings file {}: {}", path, e);
            return GameSettings::default();
        }
    };
    match GameSettings::from_json(&json) {
        Ok(settings) => {
            log::info!("Loaded settings from {}", path);
            settings
        }
        Err(e) => {
            log::warn!("Ignoring settings file {}: {}", path, e);
            GameSettings::default()
        }
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("OVO Court (headless) starting...");

    let settings = load_settings();
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    log::info!("Game initialized with seed: {}", seed);

    let mut clock = SpawnClock::new(settings.spawn_interval());
    let mut state = GameState::with_settings(settings, seed);
    let mut frontend = LogFrontend::default();
    let frame_dt = Duration::from_secs_f32(FRAME_DT);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    while state.phase != GamePhase::Ended && state.frame < MAX_FRAMES {
        for _ in 0..clock.advance(frame_dt) {
            state.create_ovo();
        }
        tick(&mut state, &input, &mut frontend);
    }

    if state.phase != GamePhase::Ended {
        log::info!("Frame limit reached");
        state.end_game(&mut frontend);
    }
}
