//! Collaborator interfaces consumed by the tick
//!
//! Input, camera projection, scene geometry and the board's target slots are
//! owned elsewhere. The tick only reads them.

use glam::{Quat, Vec2, Vec3};

use super::collision::{Boundary, SceneQuery};
use super::impact::TargetSlot;

/// Pointer input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in screen space, if known this frame
    pub pointer: Option<Vec2>,
    /// Button went down this frame (drag start)
    pub pressed: bool,
    /// Button went up this frame (release)
    pub released: bool,
}

/// Maps screen positions onto a horizontal world plane
pub trait PlaneProjector {
    /// World point under `screen` on the plane `y = height`, if the view ray hits it
    fn project(&self, screen: Vec2, height: f32) -> Option<Vec3>;

    /// Camera pitch below the horizon (radians, positive looking down)
    fn pitch(&self) -> f32;
}

/// Top-down projector: screen x → world x, screen y → world z
#[derive(Debug, Clone, Copy)]
pub struct FlatProjector {
    pub scale: f32,
    pub pitch: f32,
}

impl Default for FlatProjector {
    fn default() -> Self {
        Self {
            scale: 1.0,
            pitch: std::f32::consts::FRAC_PI_2,
        }
    }
}

impl PlaneProjector for FlatProjector {
    fn project(&self, screen: Vec2, height: f32) -> Option<Vec3> {
        Some(Vec3::new(screen.x * self.scale, height, screen.y * self.scale))
    }

    fn pitch(&self) -> f32 {
        self.pitch
    }
}

/// Pinhole camera looking along +Z, pitched down
#[derive(Debug, Clone, Copy)]
pub struct CameraProjector {
    pub eye: Vec3,
    /// Pitch below the horizon (radians)
    pub pitch: f32,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    /// Viewport size in pixels, origin top-left
    pub viewport: Vec2,
}

impl CameraProjector {
    fn ray_direction(&self, screen: Vec2) -> Vec3 {
        let aspect = self.viewport.x / self.viewport.y.max(1.0);
        let ndc = Vec2::new(
            2.0 * screen.x / self.viewport.x.max(1.0) - 1.0,
            1.0 - 2.0 * screen.y / self.viewport.y.max(1.0),
        );
        let half_h = (self.fov_y * 0.5).tan();
        let local = Vec3::new(ndc.x * half_h * aspect, ndc.y * half_h, 1.0);
        // Positive pitch tips +Z down toward -Y
        (Quat::from_rotation_x(self.pitch) * local).normalize()
    }
}

impl PlaneProjector for CameraProjector {
    fn project(&self, screen: Vec2, height: f32) -> Option<Vec3> {
        let dir = self.ray_direction(screen);
        if dir.y.abs() < 1e-6 {
            return None;
        }
        let t = (height - self.eye.y) / dir.y;
        if t <= 0.0 {
            return None;
        }
        Some(self.eye + dir * t)
    }

    fn pitch(&self) -> f32 {
        self.pitch
    }
}

/// Board-owned target slots
pub trait SlotProvider {
    /// Current slots, or `None` while the board is not ready
    fn current_slots(&self) -> Option<Vec<TargetSlot>>;
}

impl SlotProvider for [TargetSlot] {
    fn current_slots(&self) -> Option<Vec<TargetSlot>> {
        Some(self.to_vec())
    }
}

impl SlotProvider for Vec<TargetSlot> {
    fn current_slots(&self) -> Option<Vec<TargetSlot>> {
        Some(self.clone())
    }
}

impl SlotProvider for Option<Vec<TargetSlot>> {
    fn current_slots(&self) -> Option<Vec<TargetSlot>> {
        self.clone()
    }
}

/// Everything the tick reads from collaborators
#[derive(Clone, Copy)]
pub struct ThrowContext<'a> {
    pub projector: &'a dyn PlaneProjector,
    pub scene: &'a dyn SceneQuery,
    /// `None` while the stage has not provided its back wall yet
    pub boundary: Option<Boundary>,
    pub slots: &'a dyn SlotProvider,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_center_ray_hits_plane_ahead() {
        let camera = CameraProjector {
            eye: Vec3::new(0.0, 2.0, 0.0),
            pitch: std::f32::consts::FRAC_PI_4,
            fov_y: 60f32.to_radians(),
            viewport: Vec2::new(800.0, 600.0),
        };
        let p = camera.project(Vec2::new(400.0, 300.0), 0.0).unwrap();
        // 45° down from height 2 lands 2 units ahead
        assert!(p.y.abs() < 1e-5);
        assert!((p.z - 2.0).abs() < 1e-4);
        assert!(p.x.abs() < 1e-5);
    }

    #[test]
    fn test_camera_ray_above_horizon_misses() {
        let camera = CameraProjector {
            eye: Vec3::new(0.0, 2.0, 0.0),
            pitch: 0.0,
            fov_y: 60f32.to_radians(),
            viewport: Vec2::new(800.0, 600.0),
        };
        // Top of screen looks up, never reaches the table
        assert!(camera.project(Vec2::new(400.0, 0.0), 0.0).is_none());
    }

    #[test]
    fn test_unavailable_slots() {
        let missing: Option<Vec<TargetSlot>> = None;
        assert!(missing.current_slots().is_none());
        assert_eq!(Vec::<TargetSlot>::new().current_slots(), Some(vec![]));
    }
}
