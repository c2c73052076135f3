//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (creation order)
//! - No rendering or platform dependencies beyond the `Frontend` hooks

pub mod collision;
pub mod difficulty;
pub mod ovo;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{
    Collider, ColliderRegistry, CollisionEvent, MIN_COLLIDERS_FOR_SCAN, RayHit, ray_sphere,
    raycast, scan_collisions, silhouette_vertices,
};
pub use difficulty::{Hardness, apply_lighting};
pub use ovo::{Ovo, OvoKind};
pub use spawner::{SpawnClock, Spawner, choose_kind};
pub use state::{
    ActiveCamera, Court, EnergyBand, GamePhase, GameState, Robot, RobotCommand, SPOTLIGHT_COUNT,
};
pub use tick::{FrameReport, TickInput, tick};
