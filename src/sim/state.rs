//! Throw state and projectile lifecycle types
//!
//! All projectile state lives here and is mutated only by `tick`.

use glam::{Quat, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::drag::DragSampler;
use super::impact::{StickPose, TargetSlot};
use super::launch::RandomSource;
use super::preview::TrajectoryPreview;
use crate::settings::ThrowTuning;

/// Held-card bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DragState {
    pub sampler: DragSampler,
    /// Height of the horizontal plane the card follows
    pub plane_height: f32,
    /// Latest per-tick drag velocity
    pub raw_velocity: Vec3,
}

/// In-flight bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightState {
    /// Slots captured when the flight began; `None` until the board provides them
    pub snapshot: Option<Vec<TargetSlot>>,
    /// Seconds of simulated flight
    pub elapsed: f32,
    /// Held in place last tick for lack of a boundary or slots
    #[serde(default)]
    pub deferred: bool,
}

/// Projectile lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProjectileState {
    /// Spawned, not yet picked up
    Idle,
    /// Following the pointer
    Dragging(DragState),
    /// Integrated every tick
    Flying(FlightState),
    /// Embedded in a surface (terminal)
    Stuck(StickPose),
}

/// A thrown card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f32,
    /// Magnus-like lateral force coefficient
    pub spin_strength: f32,
    pub state: ProjectileState,
}

impl Projectile {
    pub fn new(id: u32, position: Vec3, tuning: &ThrowTuning) -> Self {
        Self {
            id,
            position,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: tuning.mass,
            spin_strength: tuning.spin_strength,
            state: ProjectileState::Idle,
        }
    }

    /// Card's local +Z in world space
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Idle, Dragging or Flying
    pub fn is_active(&self) -> bool {
        !matches!(self.state, ProjectileState::Stuck(_))
    }

    pub fn is_stuck(&self) -> bool {
        matches!(self.state, ProjectileState::Stuck(_))
    }

    /// Pose to draw: the settle animation while stuck, the physical pose otherwise
    pub fn visual_pose(&self) -> (Vec3, Quat) {
        match &self.state {
            ProjectileState::Stuck(pose) => pose.current(),
            _ => (self.position, self.rotation),
        }
    }
}

/// Events for collaborators (board, hand, audio, camera)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ThrowEvent {
    /// Dragging → Flying
    Launched { id: u32, velocity: Vec3, spin: Vec3 },
    /// A slot was hit; the projectile is gone
    Hit { id: u32, slot_id: u32, card: String },
    /// The card embedded into a surface
    Stuck { id: u32, position: Vec3, rotation: Quat },
    /// The card left the play volume without touching anything
    Lost { id: u32 },
}

/// Every projectile of the current stage plus shared simulation state
#[derive(Debug, Clone)]
pub struct ThrowState<R: RandomSource = Pcg32> {
    pub tuning: ThrowTuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated seconds
    pub time: f32,
    /// Projectiles sorted by id; stuck cards stay as decoration
    pub projectiles: Vec<Projectile>,
    /// Forecast for the card being dragged
    pub preview: Option<TrajectoryPreview>,
    pub(crate) events: Vec<ThrowEvent>,
    pub(crate) rng: R,
    next_id: u32,
}

impl ThrowState<Pcg32> {
    /// Create a throw state seeded from the tuning
    pub fn new(tuning: ThrowTuning) -> Self {
        let rng = Pcg32::seed_from_u64(tuning.seed);
        Self::with_rng(tuning, rng)
    }
}

impl<R: RandomSource> ThrowState<R> {
    /// Create a throw state with an injected random source
    pub fn with_rng(tuning: ThrowTuning, rng: R) -> Self {
        Self {
            tuning,
            time_ticks: 0,
            time: 0.0,
            projectiles: Vec::new(),
            preview: None,
            events: Vec::new(),
            rng,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn an idle card at `position`
    pub fn spawn(&mut self, position: Vec3) -> u32 {
        let id = self.next_entity_id();
        self.projectiles.push(Projectile::new(id, position, &self.tuning));
        log::debug!("Spawned card {} at {:?}", id, position);
        id
    }

    pub fn get(&self, id: u32) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id == id)
    }

    /// The card of the current throw, if any
    pub fn active(&self) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.is_active())
    }

    /// Remove a card outright (stage reset). The only way to abort a flight.
    pub fn destroy(&mut self, id: u32) -> bool {
        let before = self.projectiles.len();
        self.projectiles.retain(|p| p.id != id);
        let removed = self.projectiles.len() != before;
        if removed {
            log::debug!("Destroyed card {}", id);
            if self.active().is_none() {
                self.preview = None;
            }
        }
        removed
    }

    /// Events raised since the last drain
    pub fn events(&self) -> &[ThrowEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<ThrowEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure projectiles are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.projectiles.sort_by_key(|p| p.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_assigns_increasing_ids() {
        let mut state = ThrowState::new(ThrowTuning::default());
        let a = state.spawn(Vec3::ZERO);
        let b = state.spawn(Vec3::ONE);
        assert!(b > a);
        assert!(matches!(state.get(a).unwrap().state, ProjectileState::Idle));
        assert_eq!(state.active().unwrap().id, a);
    }

    #[test]
    fn test_destroy() {
        let mut state = ThrowState::new(ThrowTuning::default());
        let id = state.spawn(Vec3::ZERO);
        assert!(state.destroy(id));
        assert!(!state.destroy(id));
        assert!(state.active().is_none());
    }

    #[test]
    fn test_forward_follows_rotation() {
        let mut p = Projectile::new(1, Vec3::ZERO, &ThrowTuning::default());
        assert_eq!(p.forward(), Vec3::Z);
        p.rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        assert!((p.forward() - Vec3::X).length() < 1e-5);
    }
}
