//! Collision detection for a card in flight
//!
//! Two paths, both checked every tick over the full displacement:
//! - boundary plane crossing (cheap fast path; the card's center passing the
//!   back wall plane is always a hit)
//! - swept box against tagged static colliders (precise point and normal)
//!
//! All normals returned here point INTO the struck surface, i.e. along the
//! direction of travel at contact.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// The back wall: an infinite plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    /// Any point on the plane
    pub point: Vec3,
    /// Unit normal pointing into the wall (away from the thrower)
    pub normal: Vec3,
}

impl Boundary {
    /// Vertical wall at `z`, facing the thrower at -Z
    pub fn back_wall(z: f32) -> Self {
        Self {
            point: Vec3::new(0.0, 0.0, z),
            normal: Vec3::Z,
        }
    }

    /// Positive once a point is past the wall
    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        (p - self.point).dot(self.normal)
    }

    /// Fraction of `displacement` at which `origin` reaches the plane.
    ///
    /// A center already on or past the plane counts as crossed at 0.
    pub fn crossing(&self, origin: Vec3, displacement: Vec3) -> Option<f32> {
        let d0 = self.signed_distance(origin);
        if d0 >= 0.0 {
            return Some(0.0);
        }
        let d1 = self.signed_distance(origin + displacement);
        if d1 < 0.0 {
            return None;
        }
        Some((d0 / (d0 - d1)).clamp(0.0, 1.0))
    }

    /// Closest point on the plane
    pub fn project(&self, p: Vec3) -> Vec3 {
        p - self.normal * self.signed_distance(p)
    }
}

/// Collider role on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColliderTag {
    BackWall,
    Obstacle,
}

/// Identity of a struck collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColliderRef {
    pub id: u32,
    pub tag: ColliderTag,
}

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Grow by `margin` on every side (Minkowski sum with a box)
    pub fn expanded(&self, margin: Vec3) -> Self {
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Static scene collider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub id: u32,
    pub tag: ColliderTag,
    pub bounds: Aabb,
}

/// Oriented box swept through the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepShape {
    pub half_extents: Vec3,
    pub rotation: Quat,
}

impl SweepShape {
    pub fn point() -> Self {
        Self {
            half_extents: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    /// Half-extents of the world-space AABB enclosing the rotated box
    pub fn world_half_extents(&self) -> Vec3 {
        let m = Mat3::from_quat(self.rotation);
        let h = self.half_extents;
        Vec3::new(
            m.row(0).abs().dot(h),
            m.row(1).abs().dot(h),
            m.row(2).abs().dot(h),
        )
    }
}

/// First hit along a sweep or segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Contact point on the struck surface
    pub point: Vec3,
    /// Into-surface normal
    pub normal: Vec3,
    /// Fraction of the displacement travelled before contact
    pub fraction: f32,
    /// Distance travelled before contact
    pub distance: f32,
    pub collider: Option<ColliderRef>,
}

/// Static geometry query surface (owned by the physics collaborator)
pub trait SceneQuery {
    /// Sweep `shape` from `origin` by `displacement`
    fn sweep(&self, shape: &SweepShape, origin: Vec3, displacement: Vec3) -> Option<SweepHit>;

    /// Line test from `p0` to `p1`
    fn segment_test(&self, p0: Vec3, p1: Vec3) -> Option<SweepHit> {
        self.sweep(&SweepShape::point(), p0, p1 - p0)
    }
}

/// Scene with no geometry at all
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyScene;

impl SceneQuery for EmptyScene {
    fn sweep(&self, _shape: &SweepShape, _origin: Vec3, _displacement: Vec3) -> Option<SweepHit> {
        None
    }
}

/// Built-in scene over tagged AABB colliders
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticScene {
    pub colliders: Vec<Collider>,
}

impl StaticScene {
    pub fn new(colliders: Vec<Collider>) -> Self {
        Self { colliders }
    }
}

impl SceneQuery for StaticScene {
    fn sweep(&self, shape: &SweepShape, origin: Vec3, displacement: Vec3) -> Option<SweepHit> {
        let margin = shape.world_half_extents();
        let length = displacement.length();
        let mut best: Option<SweepHit> = None;

        for collider in &self.colliders {
            let bounds = collider.bounds.expanded(margin);
            let Some((fraction, normal)) = sweep_point_aabb(origin, displacement, &bounds) else {
                continue;
            };
            // Strictly earlier wins: ties keep the first collider
            if best.is_some_and(|b| fraction >= b.fraction) {
                continue;
            }
            let center = origin + displacement * fraction;
            best = Some(SweepHit {
                point: center + normal * margin.dot(normal.abs()),
                normal,
                fraction,
                distance: fraction * length,
                collider: Some(ColliderRef {
                    id: collider.id,
                    tag: collider.tag,
                }),
            });
        }

        best
    }
}

/// Slab test of a moving point against a box over `t ∈ [0, 1]`.
///
/// Returns the entry fraction and the into-surface normal of the entry face.
/// A point starting inside reports fraction 0 and the nearest face.
fn sweep_point_aabb(origin: Vec3, displacement: Vec3, bounds: &Aabb) -> Option<(f32, Vec3)> {
    let mut t_min = 0.0_f32;
    let mut t_max = 1.0_f32;
    let mut normal = None;

    for axis in 0..3 {
        let o = origin[axis];
        let d = displacement[axis];
        let (lo, hi) = (bounds.min[axis], bounds.max[axis]);

        if d.abs() < 1e-8 {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let (t1, t2) = {
            let a = (lo - o) * inv;
            let b = (hi - o) * inv;
            if a <= b { (a, b) } else { (b, a) }
        };

        if t1 > t_min {
            t_min = t1;
            let mut n = Vec3::ZERO;
            n[axis] = d.signum();
            normal = Some(n);
        }
        t_max = t_max.min(t2);
        if t_min > t_max {
            return None;
        }
    }

    Some((t_min, normal.unwrap_or_else(|| inside_normal(origin, bounds))))
}

/// Into-surface normal of the face nearest to a point inside the box
fn inside_normal(p: Vec3, bounds: &Aabb) -> Vec3 {
    let mut best = (f32::MAX, Vec3::Z);
    for axis in 0..3 {
        let to_min = p[axis] - bounds.min[axis];
        let to_max = bounds.max[axis] - p[axis];
        // Entered through the min face means travelling toward +axis
        let (dist, sign) = if to_min <= to_max { (to_min, 1.0) } else { (to_max, -1.0) };
        if dist < best.0 {
            let mut n = Vec3::ZERO;
            n[axis] = sign;
            best = (dist, n);
        }
    }
    best.1
}

/// Where a tick's motion first touched something
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub point: Vec3,
    /// Into-surface normal
    pub normal: Vec3,
    pub fraction: f32,
    /// Card center at the moment of contact
    pub center: Vec3,
    /// `None` for the boundary plane
    pub collider: Option<ColliderRef>,
}

/// Test one tick's displacement against the boundary plane and the scene.
///
/// The earlier contact wins; the plane wins an exact tie.
pub fn sweep_tick(
    boundary: &Boundary,
    scene: &dyn SceneQuery,
    shape: &SweepShape,
    position: Vec3,
    displacement: Vec3,
) -> Option<Contact> {
    let plane = boundary.crossing(position, displacement).map(|fraction| {
        let center = position + displacement * fraction;
        Contact {
            point: boundary.project(center),
            normal: boundary.normal,
            fraction,
            center,
            collider: None,
        }
    });

    let swept = scene.sweep(shape, position, displacement).map(|hit| Contact {
        point: hit.point,
        normal: hit.normal,
        fraction: hit.fraction,
        center: position + displacement * hit.fraction,
        collider: hit.collider,
    });

    match (plane, swept) {
        (Some(p), Some(s)) => Some(if s.fraction < p.fraction { s } else { p }),
        (p, s) => p.or(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_scene() -> StaticScene {
        StaticScene::new(vec![
            Collider {
                id: 1,
                tag: ColliderTag::Obstacle,
                bounds: Aabb::from_center_half_extents(Vec3::new(0.0, 1.0, 3.0), Vec3::new(0.5, 0.5, 0.1)),
            },
            Collider {
                id: 2,
                tag: ColliderTag::BackWall,
                bounds: Aabb::from_center_half_extents(Vec3::new(0.0, 1.0, 5.5), Vec3::new(5.0, 5.0, 0.5)),
            },
        ])
    }

    #[test]
    fn test_boundary_crossing_fraction() {
        let wall = Boundary::back_wall(5.0);
        assert_eq!(wall.crossing(Vec3::new(0.0, 0.0, 3.0), Vec3::Z), None);
        let t = wall.crossing(Vec3::new(0.0, 0.0, 4.0), Vec3::Z * 2.0).unwrap();
        assert!((t - 0.5).abs() < 1e-6);
        // Landing exactly on the plane counts
        assert_eq!(wall.crossing(Vec3::new(0.0, 0.0, 4.0), Vec3::Z), Some(1.0));
        // Already past
        assert_eq!(wall.crossing(Vec3::new(0.0, 0.0, 6.0), Vec3::Z), Some(0.0));
    }

    #[test]
    fn test_sweep_hits_obstacle_face() {
        let scene = wall_scene();
        let shape = SweepShape {
            half_extents: Vec3::new(0.05, 0.01, 0.05),
            rotation: Quat::IDENTITY,
        };
        let hit = scene
            .sweep(&shape, Vec3::new(0.0, 1.0, 2.0), Vec3::new(0.0, 0.0, 2.0))
            .unwrap();

        assert_eq!(hit.collider.unwrap().id, 1);
        assert_eq!(hit.normal, Vec3::Z);
        // Front face at z = 2.9, card front reaches it when center is at 2.85
        assert!((hit.point.z - 2.9).abs() < 1e-5);
        assert!((hit.distance - 0.85).abs() < 1e-5);
    }

    #[test]
    fn test_sweep_misses_beside_obstacle() {
        let scene = StaticScene::new(vec![wall_scene().colliders[0]]);
        let hit = scene.sweep(&SweepShape::point(), Vec3::new(2.0, 1.0, 2.0), Vec3::Z * 2.0);
        assert!(hit.is_none());
    }

    #[test]
    fn test_rotated_shape_is_wider() {
        let shape = SweepShape {
            half_extents: Vec3::new(1.0, 0.0, 0.0),
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        };
        let h = shape.world_half_extents();
        assert!(h.x.abs() < 1e-5);
        assert!((h.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_start_inside_reports_immediate_hit() {
        let scene = wall_scene();
        let hit = scene.segment_test(Vec3::new(0.0, 1.0, 3.05), Vec3::new(0.0, 1.0, 4.0)).unwrap();
        assert_eq!(hit.fraction, 0.0);
        // Nearest face is the back face (z = 3.1)
        assert_eq!(hit.normal, Vec3::NEG_Z);
    }

    #[test]
    fn test_sweep_tick_plane_wins_when_no_geometry() {
        let wall = Boundary::back_wall(5.0);
        let contact = sweep_tick(
            &wall,
            &EmptyScene,
            &SweepShape::point(),
            Vec3::new(0.2, 1.0, 4.8),
            Vec3::new(0.0, 0.0, 0.4),
        )
        .unwrap();
        assert!(contact.collider.is_none());
        assert!((contact.point.z - 5.0).abs() < 1e-6);
        assert!((contact.fraction - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_sweep_tick_earlier_obstacle_wins() {
        let wall = Boundary::back_wall(5.0);
        let scene = wall_scene();
        // One long tick through the obstacle and across the plane
        let contact = sweep_tick(
            &wall,
            &scene,
            &SweepShape::point(),
            Vec3::new(0.0, 1.0, 2.0),
            Vec3::new(0.0, 0.0, 4.0),
        )
        .unwrap();
        assert_eq!(contact.collider.map(|c| c.tag), Some(ColliderTag::Obstacle));
        assert!(contact.center.z < 3.0);
    }
}
