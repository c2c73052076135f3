//! Ray-cast collision detection between the robot and OVOs
//!
//! Rays leave the robot's body center toward each silhouette vertex and are
//! tested against every registered OVO collider. The nearest hit along a ray
//! counts as a collision when it lies within the body's reach and the OVO has
//! not resolved a collision before.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::ovo::{Ovo, OvoKind};
use super::state::Robot;

/// Fewest registered colliders before the scan runs at all
pub const MIN_COLLIDERS_FOR_SCAN: usize = 2;

/// A sphere collider bound to an OVO by index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub ovo_index: usize,
    pub radius: f32,
}

/// Append-only list of OVO colliders
///
/// Entries are never removed during a session, so a scan that works on a
/// snapshot stays valid while new colliders are registered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColliderRegistry {
    entries: Vec<Collider>,
}

impl ColliderRegistry {
    pub fn register(&mut self, ovo_index: usize, radius: f32) {
        debug_assert!(
            self.entries.iter().all(|c| c.ovo_index != ovo_index),
            "OVO {ovo_index} registered twice"
        );
        self.entries.push(Collider { ovo_index, radius });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Colliders registered so far
    pub fn snapshot(&self) -> &[Collider] {
        &self.entries
    }
}

/// Nearest hit of a ray against the collider set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub ovo_index: usize,
    pub distance: f32,
}

/// A collision resolved this frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    pub ovo_id: u32,
    pub kind: OvoKind,
    pub distance: f32,
    /// Silhouette vertex whose ray found the OVO
    pub vertex: usize,
}

/// Body-local silhouette of a cylindrical body.
///
/// Three rings (bottom, middle, top) of `segments` vertices plus the two cap
/// centers.
pub fn silhouette_vertices(width: f32, height: f32, segments: usize) -> Vec<Vec3> {
    let radius = width / 2.0;
    let half_height = height / 2.0;
    let mut vertices = Vec::with_capacity(segments * 3 + 2);

    for y in [0.0, -half_height, half_height] {
        for i in 0..segments {
            let theta = i as f32 / segments as f32 * std::f32::consts::TAU;
            vertices.push(Vec3::new(radius * theta.sin(), y, radius * theta.cos()));
        }
    }
    vertices.push(Vec3::new(0.0, half_height, 0.0));
    vertices.push(Vec3::new(0.0, -half_height, 0.0));
    vertices
}

/// Distance along a unit ray to the first point of a sphere.
///
/// A ray starting inside the sphere hits at distance 0.
pub fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    // Origin outside and pointing away
    if b > 0.0 {
        return None;
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    Some(-b - disc.sqrt())
}

/// Nearest collider hit along a ray
pub fn raycast(origin: Vec3, dir: Vec3, colliders: &[Collider], ovos: &[Ovo]) -> Option<RayHit> {
    let mut closest: Option<RayHit> = None;
    for collider in colliders {
        let Some(ovo) = ovos.get(collider.ovo_index) else {
            continue;
        };
        if let Some(distance) = ray_sphere(origin, dir, ovo.pos, collider.radius) {
            if closest.is_none_or(|c| distance < c.distance) {
                closest = Some(RayHit {
                    ovo_index: collider.ovo_index,
                    distance,
                });
            }
        }
    }
    closest
}

/// Scan the robot's silhouette for the first new collision this frame.
///
/// Marks the struck OVO as collided and stops at the first qualifying hit.
/// Resolution of the energy/point delta is left to the caller.
pub fn scan_collisions(
    robot: &Robot,
    silhouette: &[Vec3],
    registry: &ColliderRegistry,
    ovos: &mut [Ovo],
    threshold: f32,
) -> Option<CollisionEvent> {
    let colliders = registry.snapshot();
    if colliders.len() < MIN_COLLIDERS_FOR_SCAN {
        return None;
    }

    let origin = robot.body_origin();
    let rotation = robot.body_rotation();

    for (vertex, local) in silhouette.iter().enumerate() {
        let dir = (rotation * *local).normalize_or_zero();
        if dir == Vec3::ZERO {
            continue;
        }
        let Some(hit) = raycast(origin, dir, colliders, ovos) else {
            continue;
        };
        if hit.distance >= threshold {
            continue;
        }
        let ovo = &mut ovos[hit.ovo_index];
        if !ovo.mark_collided() {
            continue;
        }
        return Some(CollisionEvent {
            ovo_id: ovo.id,
            kind: ovo.kind,
            distance: hit.distance,
            vertex,
        });
    }
    None
}
