//! Card Toss headless driver
//!
//! Scripts a single drag-and-release against a demo table and prints the
//! resulting throw events as JSON. Pass a tuning JSON path to override the
//! defaults.

fn main() {
    use card_toss::ThrowTuning;

    env_logger::init();
    log::info!("Card Toss (headless) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match ThrowTuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Failed to load tuning from {}: {}; using defaults", path, e);
                ThrowTuning::default()
            }
        },
        None => ThrowTuning::default(),
    };

    let events = demo::run(tuning);
    match serde_json::to_string_pretty(&events) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize events: {}", e),
    }
}

mod demo {
    use card_toss::ThrowTuning;
    use card_toss::consts::{SIM_DT, WALL_Z};
    use card_toss::sim::{
        Aabb, Boundary, Collider, ColliderTag, FlatProjector, StaticScene, TargetSlot, ThrowContext,
        ThrowEvent, ThrowState, TickInput, tick,
    };
    use glam::{Vec2, Vec3};

    /// Give up after ten simulated seconds
    const MAX_TICKS: u32 = 600;
    /// Pointer travel per tick while dragging (world units on the flat projector)
    const DRAG_STEP: f32 = 0.2;

    fn table_scene() -> StaticScene {
        StaticScene::new(vec![
            Collider {
                id: 1,
                tag: ColliderTag::BackWall,
                bounds: Aabb::from_center_half_extents(
                    Vec3::new(0.0, 1.0, WALL_Z + 0.05),
                    Vec3::new(3.0, 3.0, 0.05),
                ),
            },
            Collider {
                id: 2,
                tag: ColliderTag::Obstacle,
                bounds: Aabb::from_center_half_extents(Vec3::new(1.5, 0.5, 2.5), Vec3::new(0.2, 0.5, 0.2)),
            },
        ])
    }

    fn board_slots() -> Vec<TargetSlot> {
        [-0.4f32, 0.0, 0.4]
            .iter()
            .enumerate()
            .map(|(i, &x)| TargetSlot {
                id: i as u32 + 1,
                anchor: Vec3::new(x, 0.6, WALL_Z),
                card: format!("slot_{}", i + 1),
            })
            .collect()
    }

    /// Press, drag forward for a few ticks, release, then fly until the card resolves
    pub fn run(tuning: ThrowTuning) -> Vec<ThrowEvent> {
        let projector = FlatProjector::default();
        let scene = table_scene();
        let slots = board_slots();
        let ctx = ThrowContext {
            projector: &projector,
            scene: &scene,
            boundary: Some(Boundary::back_wall(WALL_Z)),
            slots: &slots,
        };

        let mut state = ThrowState::new(tuning);
        let mut events = Vec::new();

        let script = [
            TickInput {
                pointer: Some(Vec2::ZERO),
                pressed: true,
                released: false,
            },
            TickInput {
                pointer: Some(Vec2::new(0.0, DRAG_STEP)),
                ..Default::default()
            },
            TickInput {
                pointer: Some(Vec2::new(0.0, DRAG_STEP * 2.0)),
                ..Default::default()
            },
            TickInput {
                pointer: Some(Vec2::new(0.0, DRAG_STEP * 3.0)),
                pressed: false,
                released: true,
            },
        ];

        for input in &script {
            tick(&mut state, input, &ctx, SIM_DT);
            if let Some(preview) = &state.preview {
                log::debug!(
                    "Preview: {} points, impact {:?}",
                    preview.points.len(),
                    preview.impact.map(|i| i.point)
                );
            }
            events.extend(state.drain_events());
        }

        let idle = TickInput::default();
        for _ in 0..MAX_TICKS {
            if state.projectiles.iter().all(|p| p.is_stuck()) {
                break;
            }
            tick(&mut state, &idle, &ctx, SIM_DT);
            events.extend(state.drain_events());
        }

        for event in &events {
            log::info!("{:?}", event);
        }
        log::info!("Simulated {} ticks ({:.2}s)", state.time_ticks, state.time);
        events
    }
}
