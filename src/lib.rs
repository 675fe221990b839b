//! Card Toss - throw, flight and impact core of a card-throwing game
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (drag sampling, launch, flight, impacts)
//! - `settings`: Data-driven throw tuning (JSON, presets)
//! - `error`: Configuration errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::TuningError;
pub use settings::{ThrowPreset, ThrowTuning};

use glam::{Mat3, Quat, Vec3};

/// Simulation constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep (one tick per rendered frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Gravity (world units/s², Y up)
    pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

    /// Card half-extents: width, thickness, length
    pub const CARD_HALF_EXTENTS: Vec3 = Vec3::new(0.063, 0.002, 0.088);

    /// Default back wall distance along +Z
    pub const WALL_Z: f32 = 5.0;

    /// Default slot hit tolerance
    pub const HIT_RADIUS: f32 = 0.35;
}

/// Rotation whose local +Z points along `forward` with local +Y as close to `up` as possible.
///
/// Falls back to an alternate up axis when `forward` is parallel to `up`, and
/// to identity when `forward` is zero.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let z = forward.normalize_or_zero();
    if z == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let mut x = up.cross(z);
    if x.length_squared() < 1e-8 {
        // Parallel to up: pick any perpendicular
        x = Vec3::X.cross(z);
        if x.length_squared() < 1e-8 {
            x = Vec3::Z.cross(z);
        }
    }
    let x = x.normalize();
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}

/// Speed in the horizontal (XZ) plane
#[inline]
pub fn horizontal_speed(v: Vec3) -> f32 {
    (v.x * v.x + v.z * v.z).sqrt()
}
