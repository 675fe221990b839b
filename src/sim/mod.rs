//! Deterministic throw simulation
//!
//! All throw logic lives here. This module must be pure and deterministic:
//! - Driven only by `tick` with an explicit timestep
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod context;
pub mod drag;
pub mod impact;
pub mod integrator;
pub mod launch;
pub mod preview;
pub mod state;
pub mod tick;

pub use collision::{
    Aabb, Boundary, Collider, ColliderRef, ColliderTag, Contact, EmptyScene, SceneQuery,
    StaticScene, SweepHit, SweepShape, sweep_tick,
};
pub use context::{CameraProjector, FlatProjector, PlaneProjector, SlotProvider, ThrowContext, TickInput};
pub use drag::{DRAG_WINDOW, DragSample, DragSampler};
pub use impact::{Impact, ImpactResolver, SLOT_TIE_EPSILON, StickPose, TargetSlot, nearest_slot};
pub use integrator::{BallisticIntegrator, IntegrationMode, KinematicState, SpinParams, lateral_acceleration};
pub use launch::{LaunchSolution, LaunchVelocityResolver, RandomSource};
pub use preview::{PreviewImpact, TrajectoryPreview, TrajectoryPreviewer};
pub use state::{DragState, FlightState, Projectile, ProjectileState, ThrowEvent, ThrowState};
pub use tick::{pitch_boost, tick};
