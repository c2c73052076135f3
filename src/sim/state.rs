//! Game state and core simulation types
//!
//! Everything the frame orchestrator reads or mutates lives here.

use glam::{Quat, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{ColliderRegistry, silhouette_vertices};
use super::difficulty::Hardness;
use super::ovo::{Ovo, OvoKind};
use super::spawner::Spawner;
use crate::consts::*;
use crate::platform::Frontend;
use crate::settings::GameSettings;
use crate::{heading_to_dir, normalize_angle};

/// Number of scene spotlights the difficulty controller may switch off
pub const SPOTLIGHT_COUNT: usize = 2;

/// Top-level game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Frames advance obstacles, collisions and the robot
    Running,
    /// Everything is frozen until toggled back
    Paused,
    /// Terminal
    Ended,
}

/// Which camera the renderer should draw from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActiveCamera {
    /// Orbiting camera behind the court
    #[default]
    ThirdPerson,
    /// Camera mounted on the robot's head
    FirstPerson,
}

impl ActiveCamera {
    pub fn toggled(self) -> Self {
        match self {
            ActiveCamera::ThirdPerson => ActiveCamera::FirstPerson,
            ActiveCamera::FirstPerson => ActiveCamera::ThirdPerson,
        }
    }
}

/// Coarse energy classification used to color the energy bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyBand {
    High,
    Medium,
    Low,
}

impl EnergyBand {
    pub fn from_energy(energy: u32) -> Self {
        if energy >= ENERGY_HIGH {
            EnergyBand::High
        } else if energy >= ENERGY_MEDIUM {
            EnergyBand::Medium
        } else {
            EnergyBand::Low
        }
    }
}

/// The play area, a rectangle centered at the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Court {
    width: f32,
    length: f32,
}

impl Court {
    pub fn new(width: f32, length: f32) -> Self {
        debug_assert!(width > 0.0 && length > 0.0);
        Self { width, length }
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    #[inline]
    pub fn half_length(&self) -> f32 {
        self.length / 2.0
    }

    /// Boundary-inclusive containment on the court plane (y is ignored)
    pub fn contains(&self, pos: Vec3) -> bool {
        pos.x >= -self.half_width()
            && pos.x <= self.half_width()
            && pos.z >= -self.half_length()
            && pos.z <= self.half_length()
    }

    /// Map a unit value in [0, 1) across the court width
    pub fn x_across(&self, t: f32) -> f32 {
        -self.half_width() + t * self.width
    }

    /// Depth at which new OVOs appear
    pub fn spawn_z(&self) -> f32 {
        self.half_length() - OVO_SPAWN_INSET
    }
}

/// Decoded control input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RobotCommand {
    /// Distance to move along the current heading
    pub advance: f32,
    /// Heading change (radians)
    pub turn: f32,
    /// Head rotation change (radians)
    pub head_yaw: f32,
    /// Body lean change (radians)
    pub body_lean: f32,
}

/// Head can look at most this far to either side
pub const HEAD_YAW_LIMIT: f32 = std::f32::consts::FRAC_PI_2;
/// Body can lean at most this far forward or back
pub const BODY_LEAN_LIMIT: f32 = std::f32::consts::FRAC_PI_6;

/// The player's robot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Robot {
    /// Ground position
    pub position: Vec3,
    /// Heading around +y (0 = facing +z)
    pub heading: f32,
    pub head_yaw: f32,
    pub body_lean: f32,
    pub body_width: f32,
    /// Remaining energy, only lowered by hostile hits
    energy: u32,
    /// Accumulated points, only raised by benign hits
    points: u32,
}

impl Robot {
    pub fn new(position: Vec3, body_width: f32, energy: u32) -> Self {
        Self {
            position,
            heading: 0.0,
            head_yaw: 0.0,
            body_lean: 0.0,
            body_width,
            energy,
            points: 0,
        }
    }

    #[inline]
    pub fn energy(&self) -> u32 {
        self.energy
    }

    #[inline]
    pub fn points(&self) -> u32 {
        self.points
    }

    /// World-space center of the body
    pub fn body_origin(&self) -> Vec3 {
        self.position + Vec3::Y * ROBOT_BODY_ELEVATION
    }

    /// World-space orientation of the body
    pub fn body_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.heading) * Quat::from_rotation_x(self.body_lean)
    }

    /// Apply the energy/point delta for one resolved collision
    pub fn handle_collision(&mut self, kind: OvoKind, hostile_damage: u32, benign_points: u32) {
        match kind {
            OvoKind::Hostile => self.energy = self.energy.saturating_sub(hostile_damage),
            OvoKind::Benign => self.points = self.points.saturating_add(benign_points),
        }
    }

    /// Update pose from decoded control input
    pub fn apply_command(&mut self, command: &RobotCommand) {
        self.heading = normalize_angle(self.heading + command.turn);
        self.position += heading_to_dir(self.heading) * command.advance;
        self.head_yaw = (self.head_yaw + command.head_yaw).clamp(-HEAD_YAW_LIMIT, HEAD_YAW_LIMIT);
        self.body_lean =
            (self.body_lean + command.body_lean).clamp(-BODY_LEAN_LIMIT, BODY_LEAN_LIMIT);
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub settings: GameSettings,
    pub court: Court,
    pub robot: Robot,
    /// Body-local silhouette vertices used for ray casts
    pub silhouette: Vec<Vec3>,
    /// Every OVO created this session, in creation order
    pub ovos: Vec<Ovo>,
    pub colliders: ColliderRegistry,
    pub spawner: Spawner,
    pub hardness: Hardness,
    pub phase: GamePhase,
    pub camera: ActiveCamera,
    pub lights_visible: [bool; SPOTLIGHT_COUNT],
    /// Frames advanced while Running
    pub frame: u64,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with default settings
    pub fn new(seed: u64) -> Self {
        Self::with_settings(GameSettings::default(), seed)
    }

    /// Create a new game state from validated settings
    pub fn with_settings(settings: GameSettings, seed: u64) -> Self {
        debug_assert!(settings.validate().is_ok());
        let court = Court::new(settings.court_width, settings.court_length);
        let start = Vec3::new(0.0, 0.0, -court.half_length() + ROBOT_START_INSET);
        let robot = Robot::new(start, settings.robot_body_width, settings.starting_energy);
        let silhouette = silhouette_vertices(
            settings.robot_body_width,
            ROBOT_BODY_HEIGHT,
            ROBOT_SILHOUETTE_SEGMENTS,
        );
        let spawner = Spawner::new(settings.ovo_total, settings.benign_quota());

        Self {
            seed,
            settings,
            court,
            robot,
            silhouette,
            ovos: Vec::new(),
            colliders: ColliderRegistry::default(),
            spawner,
            hardness: Hardness::Calm,
            phase: GamePhase::Running,
            camera: ActiveCamera::default(),
            lights_visible: [true; SPOTLIGHT_COUNT],
            frame: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Flip Running and Paused. Has no effect once Ended.
    pub fn toggle_pause(&mut self, frontend: &mut impl Frontend) -> GamePhase {
        self.phase = match self.phase {
            GamePhase::Running => {
                log::info!("Game paused at frame {}", self.frame);
                frontend.show_paused(true);
                GamePhase::Paused
            }
            GamePhase::Paused => {
                log::info!("Game resumed at frame {}", self.frame);
                frontend.show_paused(false);
                GamePhase::Running
            }
            GamePhase::Ended => GamePhase::Ended,
        };
        self.phase
    }

    /// Force the terminal phase and report the final score. Idempotent.
    pub fn end_game(&mut self, frontend: &mut impl Frontend) {
        if self.phase == GamePhase::Ended {
            return;
        }
        self.phase = GamePhase::Ended;
        log::info!(
            "Game over at frame {}: {} points, {} energy left",
            self.frame,
            self.robot.points(),
            self.robot.energy()
        );
        frontend.show_game_over(self.robot.points());
    }

    /// Switch between the third- and first-person cameras
    pub fn toggle_camera(&mut self, frontend: &mut impl Frontend) -> ActiveCamera {
        self.camera = self.camera.toggled();
        frontend.camera_changed(self.camera);
        self.camera
    }

    pub fn robot_inside_court(&self) -> bool {
        self.court.contains(self.robot.position)
    }

    /// Out of energy or off the court
    pub fn should_end(&self) -> bool {
        self.robot.energy() == 0 || !self.robot_inside_court()
    }

    pub fn energy_band(&self) -> EnergyBand {
        EnergyBand::from_energy(self.robot.energy())
    }
}
