//! Per-frame orchestration
//!
//! One call to [`tick`] per rendered frame. While Running a frame advances
//! the OVOs, scans for collisions, checks for the end of the game, reports
//! the HUD status and finally moves the robot.

use glam::Vec3;

use super::collision::{CollisionEvent, scan_collisions};
use super::difficulty::{Hardness, apply_lighting};
use super::ovo::{Ovo, OvoKind};
use super::state::{ActiveCamera, GamePhase, GameState, RobotCommand};
use crate::normalize_angle;
use crate::platform::{Frontend, HudStatus};

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Decoded robot control
    pub command: RobotCommand,
    /// Pause toggle
    pub pause: bool,
    /// Camera toggle
    pub toggle_camera: bool,
    /// Demo mode - the robot drives itself and `command` is ignored
    pub autopilot: bool,
}

/// What happened during a frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    /// Collision resolved this frame, if any
    pub collision: Option<CollisionEvent>,
    /// The game ended during this frame
    pub ended: bool,
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput, frontend: &mut impl Frontend) -> FrameReport {
    if input.toggle_camera {
        state.toggle_camera(frontend);
    }
    if input.pause {
        state.toggle_pause(frontend);
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Running {
        return FrameReport::default();
    }

    state.frame += 1;

    if state.camera == ActiveCamera::ThirdPerson {
        frontend.update_camera_controls();
    }

    // Advance OVOs
    let hardness = state.hardness;
    let court = state.court;
    for ovo in &mut state.ovos {
        ovo.animate(hardness, &court);
    }

    let collision = state.search_collisions(frontend);

    if state.should_end() {
        state.end_game(frontend);
        // Final HUD values; nothing else moves this frame
        frontend.show_status(&state.hud_status());
        return FrameReport {
            collision,
            ended: true,
        };
    }

    frontend.show_status(&state.hud_status());

    let command = if input.autopilot {
        autopilot_command(state)
    } else {
        input.command
    };
    state.robot.apply_command(&command);

    FrameReport {
        collision,
        ended: false,
    }
}

impl GameState {
    /// Current HUD values
    pub fn hud_status(&self) -> HudStatus {
        HudStatus {
            energy: self.robot.energy(),
            band: self.energy_band(),
            points: self.robot.points(),
            phase: self.phase,
            hardness: self.hardness,
        }
    }

    /// Run the collision scan and resolve at most one new collision.
    ///
    /// Hardness is decided once for the whole frame: the tier for the
    /// robot's points after a new collision, Calm otherwise.
    pub fn search_collisions(&mut self, frontend: &mut impl Frontend) -> Option<CollisionEvent> {
        let threshold = self.settings.collision_threshold();
        let event = scan_collisions(
            &self.robot,
            &self.silhouette,
            &self.colliders,
            &mut self.ovos,
            threshold,
        );

        match event {
            Some(event) => {
                self.robot.handle_collision(
                    event.kind,
                    self.settings.hostile_damage,
                    self.settings.benign_points,
                );
                self.hardness = Hardness::for_points(self.robot.points());
                apply_lighting(self.hardness, &mut self.lights_visible, frontend);
                log::debug!(
                    "Frame {}: {:?} OVO {} hit at {:.2} (energy {}, points {}, hardness {})",
                    self.frame,
                    event.kind,
                    event.ovo_id,
                    event.distance,
                    self.robot.energy(),
                    self.robot.points(),
                    self.hardness.level()
                );
            }
            None => self.hardness = Hardness::Calm,
        }
        event
    }
}

/// Autopilot tuning
const AUTOPILOT_STEP: f32 = 1.5;
const AUTOPILOT_MAX_TURN: f32 = 0.08;
const AUTOPILOT_LOOKAHEAD: f32 = 120.0;
const AUTOPILOT_DODGE: f32 = 40.0;
const AUTOPILOT_CREEP: f32 = 15.0;
const AUTOPILOT_MARGIN: f32 = 50.0;

/// Steer away from the closest incoming hostile OVO, otherwise toward the
/// closest benign one, always creeping forward and staying off the edges.
fn autopilot_command(state: &GameState) -> RobotCommand {
    let robot = &state.robot;
    let pos = robot.position;

    let incoming = |ovo: &&Ovo| {
        !ovo.collided() && ovo.pos.z > pos.z && ovo.pos.z - pos.z < AUTOPILOT_LOOKAHEAD
    };
    let closest = |a: &&Ovo, b: &&Ovo| a.pos.z.total_cmp(&b.pos.z);

    let threat = state
        .ovos
        .iter()
        .filter(incoming)
        .filter(|o| o.kind == OvoKind::Hostile && (o.pos.x - pos.x).abs() < AUTOPILOT_DODGE)
        .min_by(closest);
    let prize = state
        .ovos
        .iter()
        .filter(incoming)
        .filter(|o| o.kind == OvoKind::Benign)
        .min_by(closest);

    let target_x = match (threat, prize) {
        (Some(threat), _) if threat.pos.x > pos.x => pos.x - AUTOPILOT_DODGE,
        (Some(_), _) => pos.x + AUTOPILOT_DODGE,
        (None, Some(prize)) => prize.pos.x,
        (None, None) => pos.x,
    };

    let limit_x = state.court.half_width() - AUTOPILOT_MARGIN;
    let limit_z = state.court.half_length() - AUTOPILOT_MARGIN;
    let target = Vec3::new(
        target_x.clamp(-limit_x, limit_x),
        0.0,
        (pos.z + AUTOPILOT_CREEP).clamp(-limit_z, limit_z),
    );

    let to_target = target - Vec3::new(pos.x, 0.0, pos.z);
    let dist = to_target.length();
    if dist < 1.0 {
        return RobotCommand::default();
    }

    let desired = to_target.x.atan2(to_target.z);
    let turn = normalize_angle(desired - robot.heading)
        .clamp(-AUTOPILOT_MAX_TURN, AUTOPILOT_MAX_TURN);
    RobotCommand {
        advance: AUTOPILOT_STEP.min(dist),
        turn,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::platform::{FrontendEvent, NullFrontend, RecordingFrontend};
    use crate::settings::GameSettings;
    use crate::sim::state::EnergyBand;
    use crate::sim::spawner::SpawnClock;
    use std::time::Duration;

    /// Far-away parked position for OVOs that should not interact
    const PARKED: Vec3 = Vec3::new(120.0, OVO_ALTITUDE, 300.0);

    /// Add a stationary OVO and register its collider
    fn place_ovo(state: &mut GameState, kind: OvoKind, pos: Vec3) -> usize {
        let id = state.next_entity_id();
        state.ovos.push(Ovo::new(id, kind, pos, 0.0, id));
        let index = state.ovos.len() - 1;
        state.colliders.register(index, OVO_RADIUS);
        index
    }

    /// Position 12 units straight ahead of the robot's body
    fn in_front(state: &GameState) -> Vec3 {
        state.robot.body_origin() + Vec3::Z * 12.0
    }

    fn state_with_filler() -> GameState {
        let mut state = GameState::new(42);
        place_ovo(&mut state, OvoKind::Hostile, PARKED);
        state
    }

    /// Run a frame with one fresh OVO in front of the robot, then park it
    fn hit_with(state: &mut GameState, kind: OvoKind, frontend: &mut impl Frontend) -> FrameReport {
        let pos = in_front(state);
        let index = place_ovo(state, kind, pos);
        let report = tick(state, &TickInput::default(), frontend);
        state.ovos[index].pos = PARKED;
        report
    }

    #[test]
    fn test_tick_increments_frame() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput::default(), &mut NullFrontend);
        tick(&mut state, &TickInput::default(), &mut NullFrontend);
        assert_eq!(state.frame, 2);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_tick_reports_status() {
        let mut state = GameState::new(1);
        let mut frontend = RecordingFrontend::default();
        tick(&mut state, &TickInput::default(), &mut frontend);
        assert_eq!(frontend.events[0], FrontendEvent::CameraControls);
        let status = frontend.last_status().unwrap();
        assert_eq!(status.energy, MAX_ENERGY);
        assert_eq!(status.points, 0);
        assert_eq!(status.phase, GamePhase::Running);
    }

    #[test]
    fn test_first_person_skips_camera_controls() {
        let mut state = GameState::new(1);
        let mut frontend = RecordingFrontend::default();
        let input = TickInput {
            toggle_camera: true,
            ..Default::default()
        };
        tick(&mut state, &input, &mut frontend);
        assert_eq!(state.camera, ActiveCamera::FirstPerson);
        assert!(!frontend.events.contains(&FrontendEvent::CameraControls));
    }

    #[test]
    fn test_tick_pause_freezes_everything() {
        let mut state = GameState::new(7);
        while state.create_ovo().is_some() {}
        tick(&mut state, &TickInput::default(), &mut NullFrontend);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, &mut NullFrontend);
        assert_eq!(state.phase, GamePhase::Paused);

        let frozen: Vec<Vec3> = state.ovos.iter().map(|o| o.pos).collect();
        let robot_before = state.robot.position;
        let frame_before = state.frame;
        let walk = TickInput {
            command: RobotCommand {
                advance: 5.0,
                ..Default::default()
            },
            ..Default::default()
        };
        for _ in 0..10 {
            let report = tick(&mut state, &walk, &mut NullFrontend);
            assert_eq!(report, FrameReport::default());
        }
        let after: Vec<Vec3> = state.ovos.iter().map(|o| o.pos).collect();
        assert_eq!(frozen, after);
        assert_eq!(state.robot.position, robot_before);
        assert_eq!(state.frame, frame_before);

        // Unpause
        tick(&mut state, &pause, &mut NullFrontend);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.frame, frame_before + 1);
    }

    #[test]
    fn test_collisions_frozen_while_paused() {
        let mut state = state_with_filler();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, &mut NullFrontend);
        let pos = in_front(&state);
        let index = place_ovo(&mut state, OvoKind::Hostile, pos);
        tick(&mut state, &TickInput::default(), &mut NullFrontend);
        assert!(!state.ovos[index].collided());
        assert_eq!(state.robot.energy(), MAX_ENERGY);

        let report = tick(&mut state, &pause, &mut NullFrontend);
        assert!(report.collision.is_some());
        assert!(state.ovos[index].collided());
    }

    #[test]
    fn test_hostile_then_benign_sequence() {
        let mut state = state_with_filler();
        for i in 1..=5 {
            let report = hit_with(&mut state, OvoKind::Hostile, &mut NullFrontend);
            assert_eq!(report.collision.unwrap().kind, OvoKind::Hostile);
            assert_eq!(state.robot.energy(), MAX_ENERGY - i * HOSTILE_DAMAGE);
            assert_eq!(state.robot.points(), 0);
            assert_eq!(state.hardness, Hardness::Baseline);
        }
        let report = hit_with(&mut state, OvoKind::Benign, &mut NullFrontend);
        assert_eq!(report.collision.unwrap().kind, OvoKind::Benign);
        assert_eq!(state.robot.energy(), 50);
        assert_eq!(state.robot.points(), 1);
        assert_eq!(state.hardness, Hardness::Baseline);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_hardness_tiers_follow_points() {
        let mut state = state_with_filler();
        let mut frontend = RecordingFrontend::default();
        for points in 1..=16u32 {
            hit_with(&mut state, OvoKind::Benign, &mut frontend);
            assert_eq!(state.robot.points(), points);
            let expected = match points {
                0..5 => Hardness::Baseline,
                5..10 => Hardness::Brisk,
                10..15 => Hardness::Dark,
                _ => Hardness::Frantic,
            };
            assert_eq!(state.hardness, expected, "points = {points}");
            assert_eq!(state.lights_visible, [points < 10, points < 10]);
        }
        assert!(frontend.events.contains(&FrontendEvent::Light(0, false)));
        assert!(frontend.events.contains(&FrontendEvent::Light(1, false)));
    }

    #[test]
    fn test_hardness_resets_without_collision() {
        let mut state = state_with_filler();
        for _ in 0..5 {
            hit_with(&mut state, OvoKind::Benign, &mut NullFrontend);
        }
        assert_eq!(state.hardness, Hardness::Brisk);
        tick(&mut state, &TickInput::default(), &mut NullFrontend);
        assert_eq!(state.hardness, Hardness::Calm);
    }

    #[test]
    fn test_collided_ovo_resolves_once() {
        let mut state = state_with_filler();
        let pos = in_front(&state);
        place_ovo(&mut state, OvoKind::Hostile, pos);
        let first = tick(&mut state, &TickInput::default(), &mut NullFrontend);
        assert!(first.collision.is_some());
        for _ in 0..20 {
            let report = tick(&mut state, &TickInput::default(), &mut NullFrontend);
            assert!(report.collision.is_none());
        }
        assert_eq!(state.robot.energy(), MAX_ENERGY - HOSTILE_DAMAGE);
    }

    #[test]
    fn test_energy_depletion_ends_game_same_frame() {
        let settings = GameSettings {
            starting_energy: HOSTILE_DAMAGE,
            ..Default::default()
        };
        let mut state = GameState::with_settings(settings, 3);
        place_ovo(&mut state, OvoKind::Hostile, PARKED);
        let mut frontend = RecordingFrontend::default();

        let report = hit_with(&mut state, OvoKind::Hostile, &mut frontend);
        assert!(report.ended);
        assert_eq!(state.robot.energy(), 0);
        assert_eq!(state.phase, GamePhase::Ended);
        assert!(frontend
            .events
            .contains(&FrontendEvent::GameOver { points: 0 }));

        // Nothing moves on the next frame
        let ovos: Vec<Vec3> = state.ovos.iter().map(|o| o.pos).collect();
        let robot = state.robot.position;
        let frame = state.frame;
        let walk = TickInput {
            command: RobotCommand {
                advance: 3.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let report = tick(&mut state, &walk, &mut frontend);
        assert_eq!(report, FrameReport::default());
        assert_eq!(state.ovos.iter().map(|o| o.pos).collect::<Vec<_>>(), ovos);
        assert_eq!(state.robot.position, robot);
        assert_eq!(state.frame, frame);
    }

    #[test]
    fn test_fatal_hit_reports_final_status() {
        let settings = GameSettings {
            starting_energy: 2 * HOSTILE_DAMAGE,
            ..Default::default()
        };
        let mut state = GameState::with_settings(settings, 3);
        place_ovo(&mut state, OvoKind::Hostile, PARKED);
        let mut frontend = RecordingFrontend::default();

        hit_with(&mut state, OvoKind::Hostile, &mut frontend);
        let status = frontend.last_status().unwrap();
        assert_eq!(status.energy, HOSTILE_DAMAGE);
        assert_eq!(status.phase, GamePhase::Running);

        let report = hit_with(&mut state, OvoKind::Hostile, &mut frontend);
        assert!(report.ended);
        let status = frontend.last_status().unwrap();
        assert_eq!(status.energy, 0);
        assert_eq!(status.band, EnergyBand::Low);
        assert_eq!(status.phase, GamePhase::Ended);

        // Game over is announced before the final status
        let game_over = frontend
            .events
            .iter()
            .position(|e| matches!(e, FrontendEvent::GameOver { .. }))
            .unwrap();
        assert!(matches!(
            frontend.events.last(),
            Some(FrontendEvent::Status(_))
        ));
        assert!(game_over < frontend.events.len() - 1);
    }

    #[test]
    fn test_robot_off_court_reports_ended_phase() {
        let mut state = GameState::new(1);
        state.robot.position.z = COURT_LENGTH;
        let mut frontend = RecordingFrontend::default();
        tick(&mut state, &TickInput::default(), &mut frontend);
        let status = frontend.last_status().unwrap();
        assert_eq!(status.phase, GamePhase::Ended);
        assert_eq!(status.energy, MAX_ENERGY);
    }

    #[test]
    fn test_robot_on_boundary_keeps_running() {
        let mut state = GameState::new(1);
        state.robot.position = Vec3::new(COURT_WIDTH / 2.0, 0.0, COURT_LENGTH / 2.0);
        let report = tick(&mut state, &TickInput::default(), &mut NullFrontend);
        assert!(!report.ended);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_robot_off_court_ends_game() {
        let mut state = GameState::new(1);
        state.robot.position = Vec3::new(COURT_WIDTH / 2.0 + 0.01, 0.0, 0.0);
        let report = tick(&mut state, &TickInput::default(), &mut NullFrontend);
        assert!(report.ended);
        assert_eq!(state.phase, GamePhase::Ended);
    }

    #[test]
    fn test_walking_off_court_ends_next_frame() {
        let mut state = GameState::new(1);
        let back = TickInput {
            command: RobotCommand {
                advance: -30.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(!tick(&mut state, &back, &mut NullFrontend).ended);
        assert!(!state.robot_inside_court());
        assert!(tick(&mut state, &TickInput::default(), &mut NullFrontend).ended);
    }

    #[test]
    fn test_pause_after_end_has_no_effect() {
        let mut state = GameState::new(1);
        state.robot.position.x = 1000.0;
        tick(&mut state, &TickInput::default(), &mut NullFrontend);
        assert_eq!(state.phase, GamePhase::Ended);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, &mut NullFrontend);
        tick(&mut state, &pause, &mut NullFrontend);
        assert_eq!(state.phase, GamePhase::Ended);
    }

    #[test]
    fn test_spawn_during_session_is_picked_up() {
        let mut state = state_with_filler();
        tick(&mut state, &TickInput::default(), &mut NullFrontend);
        // A spawn between frames lands in the registry for the next scan
        let pos = in_front(&state);
        place_ovo(&mut state, OvoKind::Benign, pos);
        let report = tick(&mut state, &TickInput::default(), &mut NullFrontend);
        assert_eq!(report.collision.map(|c| c.kind), Some(OvoKind::Benign));
    }

    #[test]
    fn test_autopilot_stays_on_court() {
        let mut state = GameState::new(31337);
        let mut clock = SpawnClock::new(state.settings.spawn_interval());
        let frame = Duration::from_secs_f32(FRAME_DT);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..3000 {
            for _ in 0..clock.advance(frame) {
                state.create_ovo();
            }
            tick(&mut state, &input, &mut NullFrontend);
            if state.phase == GamePhase::Ended {
                break;
            }
        }
        assert!(state.robot_inside_court());
        assert!(state.spawner.is_exhausted() || state.robot.energy() == 0);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };

        for frame in 0..600 {
            if frame % 30 == 0 {
                state1.create_ovo();
                state2.create_ovo();
            }
            tick(&mut state1, &input, &mut NullFrontend);
            tick(&mut state2, &input, &mut NullFrontend);
        }

        assert_eq!(state1.frame, state2.frame);
        assert_eq!(state1.ovos.len(), state2.ovos.len());
        assert_eq!(state1.robot.position, state2.robot.position);
        assert_eq!(state1.robot.energy(), state2.robot.energy());
        for (a, b) in state1.ovos.iter().zip(&state2.ovos) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.kind, b.kind);
        }
    }
}
