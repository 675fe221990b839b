//! Ballistic integration
//!
//! One stepper shared by live flight and the trajectory preview. Semi-implicit
//! (symplectic) Euler: velocity is advanced with the acceleration first, then
//! position with the new velocity.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// What forces the integrator applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegrationMode {
    /// Gravity plus spin-induced lateral force
    #[default]
    Ballistic,
    /// Straight-line stepping, no forces
    VelocityOnly,
}

/// Position/velocity pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KinematicState {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Spin inputs for the lateral force
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinParams {
    pub angular_velocity: Vec3,
    pub spin_strength: f32,
    pub mass: f32,
}

impl SpinParams {
    pub const NONE: Self = Self {
        angular_velocity: Vec3::ZERO,
        spin_strength: 0.0,
        mass: 1.0,
    };
}

/// Pure ballistic stepper
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallisticIntegrator {
    pub gravity: Vec3,
    pub mode: IntegrationMode,
}

impl BallisticIntegrator {
    pub fn new(gravity: Vec3, mode: IntegrationMode) -> Self {
        Self { gravity, mode }
    }

    /// Acceleration acting on a body moving at `velocity`
    pub fn acceleration(&self, velocity: Vec3, spin: &SpinParams) -> Vec3 {
        match self.mode {
            IntegrationMode::Ballistic => self.gravity + lateral_acceleration(velocity, spin),
            IntegrationMode::VelocityOnly => Vec3::ZERO,
        }
    }

    /// Advance one step of `dt`
    pub fn step(&self, state: KinematicState, spin: &SpinParams, dt: f32) -> KinematicState {
        let velocity = state.velocity + self.acceleration(state.velocity, spin) * dt;
        KinematicState {
            position: state.position + velocity * dt,
            velocity,
        }
    }
}

/// Magnus-like lateral acceleration: `(ω × v) * spin_strength / mass`.
///
/// Exactly zero when either vector is exactly zero; the cross product is not
/// evaluated in that case.
pub fn lateral_acceleration(velocity: Vec3, spin: &SpinParams) -> Vec3 {
    if velocity == Vec3::ZERO || spin.angular_velocity == Vec3::ZERO || spin.mass <= 0.0 {
        return Vec3::ZERO;
    }
    spin.angular_velocity.cross(velocity) * spin.spin_strength / spin.mass
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{GRAVITY, SIM_DT};

    fn run(integrator: &BallisticIntegrator, mut state: KinematicState, spin: &SpinParams, steps: usize, dt: f32) -> KinematicState {
        for _ in 0..steps {
            state = integrator.step(state, spin, dt);
        }
        state
    }

    #[test]
    fn test_zero_spin_matches_closed_form() {
        let integrator = BallisticIntegrator::new(GRAVITY, IntegrationMode::Ballistic);
        let p0 = Vec3::new(0.0, 1.0, 0.0);
        let v0 = Vec3::new(0.5, 4.0, 8.0);
        let spin = SpinParams {
            angular_velocity: Vec3::new(0.0, 10.0, 0.0),
            spin_strength: 0.0,
            mass: 1.0,
        };
        let steps = 60;
        let end = run(
            &integrator,
            KinematicState { position: p0, velocity: v0 },
            &spin,
            steps,
            SIM_DT,
        );

        let t = steps as f32 * SIM_DT;
        let expected = p0 + v0 * t + 0.5 * GRAVITY * t * t;
        // Semi-implicit Euler error is O(dt): 0.5 * |g| * t * dt
        let tolerance = 0.5 * GRAVITY.length() * t * SIM_DT + 1e-3;
        assert!((end.position - expected).length() <= tolerance);
        assert!((end.velocity - (v0 + GRAVITY * t)).length() < 1e-3);
    }

    #[test]
    fn test_velocity_updated_before_position() {
        let integrator = BallisticIntegrator::new(Vec3::new(0.0, -10.0, 0.0), IntegrationMode::Ballistic);
        let next = integrator.step(KinematicState::default(), &SpinParams::NONE, 0.1);
        // Explicit Euler would leave position at zero after the first step
        assert!((next.velocity.y - -1.0).abs() < 1e-6);
        assert!((next.position.y - -0.1).abs() < 1e-6);
    }

    #[test]
    fn test_spin_curves_path() {
        let integrator = BallisticIntegrator::new(GRAVITY, IntegrationMode::Ballistic);
        let start = KinematicState {
            position: Vec3::ZERO,
            velocity: Vec3::new(0.0, 2.0, 10.0),
        };
        let spun = SpinParams {
            angular_velocity: Vec3::new(0.0, 20.0, 0.0),
            spin_strength: 0.01,
            mass: 1.0,
        };
        let plain = SpinParams { spin_strength: 0.0, ..spun };

        let a = run(&integrator, start, &spun, 30, SIM_DT);
        let b = run(&integrator, start, &plain, 30, SIM_DT);
        // ω along +Y crossed with v along +Z pushes toward +X
        assert!(a.position.x > 1e-4);
        assert_eq!(b.position.x, 0.0);
    }

    #[test]
    fn test_degenerate_cross_is_exactly_zero() {
        let spin = SpinParams {
            angular_velocity: Vec3::ZERO,
            spin_strength: 5.0,
            mass: 1.0,
        };
        let a = lateral_acceleration(Vec3::new(1.0, 2.0, 3.0), &spin);
        assert_eq!(a, Vec3::ZERO);

        let spin = SpinParams {
            angular_velocity: Vec3::new(1.0, 2.0, 3.0),
            ..spin
        };
        let a = lateral_acceleration(Vec3::ZERO, &spin);
        assert_eq!(a, Vec3::ZERO);
        assert!(!a.is_nan());
    }

    #[test]
    fn test_velocity_only_mode_is_straight() {
        let integrator = BallisticIntegrator::new(GRAVITY, IntegrationMode::VelocityOnly);
        let spin = SpinParams {
            angular_velocity: Vec3::Y * 30.0,
            spin_strength: 1.0,
            mass: 1.0,
        };
        let end = run(
            &integrator,
            KinematicState {
                position: Vec3::ZERO,
                velocity: Vec3::Z * 3.0,
            },
            &spin,
            10,
            0.1,
        );
        assert!((end.position - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-5);
        assert_eq!(end.velocity, Vec3::Z * 3.0);
    }
}
