//! Impact resolution: slot hit or wall embed

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::Contact;
use super::launch::RandomSource;
use crate::look_rotation;
use crate::settings::ThrowTuning;

/// A hittable target on the wall (board-owned, read-only here)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSlot {
    pub id: u32,
    pub anchor: Vec3,
    /// Sprite identity of the card shown in the slot
    pub card: String,
}

/// Settle animation into the embed pose
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StickPose {
    pub from_position: Vec3,
    pub from_rotation: Quat,
    pub target_position: Vec3,
    pub target_rotation: Quat,
    /// 0 at impact, 1 once settled
    pub progress: f32,
    pub duration: f32,
}

impl StickPose {
    /// Advance the settle animation
    pub fn advance(&mut self, dt: f32) {
        if self.duration <= 0.0 {
            self.progress = 1.0;
            return;
        }
        self.progress = (self.progress + dt / self.duration).clamp(0.0, 1.0);
    }

    pub fn is_settled(&self) -> bool {
        self.progress >= 1.0
    }

    /// Visual pose for the current progress (smoothstep eased)
    pub fn current(&self) -> (Vec3, Quat) {
        let t = self.progress.clamp(0.0, 1.0);
        let t = t * t * (3.0 - 2.0 * t);
        (
            self.from_position.lerp(self.target_position, t),
            self.from_rotation.slerp(self.target_rotation, t),
        )
    }
}

/// Outcome of the first contact of a flight
#[derive(Debug, Clone, PartialEq)]
pub enum Impact {
    Hit {
        slot_id: u32,
        card: String,
        distance: f32,
    },
    Embed(StickPose),
}

/// Decides between slot hit and wall embed
#[derive(Debug, Clone, Copy)]
pub struct ImpactResolver {
    pub hit_radius: f32,
    pub embed_depth: f32,
    pub max_tilt_degrees: f32,
    pub stick_duration: f32,
}

impl ImpactResolver {
    pub fn from_tuning(tuning: &ThrowTuning) -> Self {
        Self {
            hit_radius: tuning.hit_radius,
            embed_depth: tuning.embed_depth,
            max_tilt_degrees: tuning.max_tilt_degrees,
            stick_duration: tuning.stick_duration,
        }
    }

    /// Resolve a contact against the launch-time slot snapshot.
    ///
    /// `rotation` is the card's orientation at contact; it is where the
    /// settle animation starts.
    pub fn resolve(
        &self,
        contact: &Contact,
        rotation: Quat,
        slots: &[TargetSlot],
        rng: &mut dyn RandomSource,
    ) -> Impact {
        if let Some((slot, distance)) = nearest_slot(slots, contact.center) {
            if distance <= self.hit_radius {
                return Impact::Hit {
                    slot_id: slot.id,
                    card: slot.card.clone(),
                    distance,
                };
            }
        }

        let max_tilt = self.max_tilt_degrees.to_radians();
        let roll = rng.range(-max_tilt, max_tilt);
        let pitch = rng.range(-max_tilt, max_tilt) * 0.5;
        let tilt = Quat::from_rotation_z(roll) * Quat::from_rotation_x(pitch);

        let mut pose = StickPose {
            from_position: contact.center,
            from_rotation: rotation,
            target_position: contact.point - contact.normal * self.embed_depth,
            target_rotation: (look_rotation(-contact.normal, Vec3::Y) * tilt).normalize(),
            progress: 0.0,
            duration: self.stick_duration,
        };
        if pose.duration <= 0.0 {
            pose.progress = 1.0;
        }
        Impact::Embed(pose)
    }
}

/// Distances closer than this count as a tie
pub const SLOT_TIE_EPSILON: f32 = 1e-6;

/// Nearest slot to `position`.
///
/// Slots within [`SLOT_TIE_EPSILON`] of each other resolve to the first in
/// iteration order. Which slot that is depends on the board's ordering and is
/// not part of the contract.
pub fn nearest_slot(slots: &[TargetSlot], position: Vec3) -> Option<(&TargetSlot, f32)> {
    let mut best: Option<(&TargetSlot, f32)> = None;
    for slot in slots {
        let d = slot.anchor.distance(position);
        if best.is_none_or(|(_, bd)| d < bd - SLOT_TIE_EPSILON) {
            best = Some((slot, d));
        }
    }
    best
}
