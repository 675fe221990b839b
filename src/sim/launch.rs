//! Launch velocity resolution
//!
//! Turns a drag history into a release velocity and spin. The flick direction
//! comes from the drag sampler while the magnitude comes from the raw drag
//! speed, so how far the player dragged and which way they flicked are
//! decoupled.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::drag::DragSampler;
use crate::horizontal_speed;
use crate::settings::ThrowTuning;

/// Source of the cosmetic randomness (spin, embed tilt)
pub trait RandomSource {
    /// Uniform point inside the unit sphere
    fn in_unit_sphere(&mut self) -> Vec3;

    /// Uniform value in `[min, max)`; `min` when the range is empty
    fn range(&mut self, min: f32, max: f32) -> f32;
}

impl RandomSource for Pcg32 {
    fn in_unit_sphere(&mut self) -> Vec3 {
        loop {
            let p = Vec3::new(
                self.random_range(-1.0..1.0),
                self.random_range(-1.0..1.0),
                self.random_range(-1.0..1.0),
            );
            if p.length_squared() <= 1.0 {
                return p;
            }
        }
    }

    fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.random_range(min..max)
    }
}

/// Release velocity and spin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchSolution {
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
}

/// Converts drag history into a launch
#[derive(Debug, Clone, Copy)]
pub struct LaunchVelocityResolver {
    pub lift_factor: f32,
    pub launch_blend: f32,
    pub power: f32,
    pub max_throw_speed: f32,
    pub spin_power: f32,
}

impl LaunchVelocityResolver {
    pub fn from_tuning(tuning: &ThrowTuning) -> Self {
        Self {
            lift_factor: tuning.lift_factor,
            launch_blend: tuning.launch_blend,
            power: tuning.power,
            max_throw_speed: tuning.max_throw_speed,
            spin_power: tuning.spin_power,
        }
    }

    /// Velocity the projectile would leave with if released now (no spin).
    ///
    /// `fallback` is used as the direction when the sampler holds fewer than
    /// two samples; a zero `raw_velocity` gives a valid limp throw.
    pub fn candidate(&self, sampler: &DragSampler, raw_velocity: Vec3, fallback: Vec3) -> Vec3 {
        let dir = sampler.direction_or(fallback);
        let mut velocity = dir * raw_velocity.length();

        // Lift grows with horizontal speed
        velocity.y += horizontal_speed(velocity) * self.lift_factor;

        velocity *= self.launch_blend;
        velocity *= self.power;
        velocity.clamp_length_max(self.max_throw_speed)
    }

    /// Full launch: candidate velocity plus randomly sampled spin
    pub fn resolve(
        &self,
        sampler: &DragSampler,
        raw_velocity: Vec3,
        fallback: Vec3,
        rng: &mut dyn RandomSource,
    ) -> LaunchSolution {
        let velocity = self.candidate(sampler, raw_velocity, fallback);
        let angular_velocity = rng.in_unit_sphere() * self.spin_power;
        LaunchSolution {
            velocity,
            angular_velocity,
        }
    }
}
