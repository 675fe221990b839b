//! Per-tick projectile state machine
//!
//! One entry point, [`tick`], advances every projectile by one frame. Within a
//! tick, input sampling happens before integration and integration before
//! collision, so contacts are always tested against this tick's motion.

use glam::{Quat, Vec2, Vec3};

use super::collision::{SweepShape, sweep_tick};
use super::context::{TickInput, ThrowContext};
use super::impact::{Impact, ImpactResolver};
use super::integrator::{BallisticIntegrator, KinematicState, SpinParams};
use super::launch::{LaunchVelocityResolver, RandomSource};
use super::preview::TrajectoryPreviewer;
use super::state::{DragState, FlightState, ProjectileState, ThrowEvent, ThrowState};
use crate::settings::ThrowTuning;

/// Advance all projectiles by one fixed timestep
pub fn tick<R: RandomSource>(state: &mut ThrowState<R>, input: &TickInput, ctx: &ThrowContext, dt: f32) {
    if !(dt.is_finite() && dt > 0.0) {
        return;
    }

    state.time_ticks += 1;
    state.time += dt;

    // Input
    if input.pressed {
        begin_drag(state, input.pointer, ctx);
    }
    if let Some(pointer) = input.pointer {
        follow_pointer(state, pointer, ctx, dt);
    }
    if input.released {
        release(state, ctx);
    }

    // Flight: integrate, then sweep
    advance_flights(state, ctx, dt);

    // Settle animations (position and velocity stay frozen)
    for projectile in &mut state.projectiles {
        if let ProjectileState::Stuck(pose) = &mut projectile.state {
            pose.advance(dt);
        }
    }

    update_preview(state, ctx);

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Height boost for the drag plane at low camera pitch
pub fn pitch_boost(tuning: &ThrowTuning, pitch: f32) -> f32 {
    ((tuning.pitch_threshold - pitch).max(0.0) * tuning.pitch_boost).min(tuning.max_pitch_boost)
}

/// Idle → Dragging
fn begin_drag<R: RandomSource>(state: &mut ThrowState<R>, pointer: Option<Vec2>, ctx: &ThrowContext) {
    if state
        .projectiles
        .iter()
        .any(|p| matches!(p.state, ProjectileState::Dragging(_) | ProjectileState::Flying(_)))
    {
        // One throw at a time
        return;
    }

    let plane_height = state.tuning.drag_plane_height + pitch_boost(&state.tuning, ctx.projector.pitch());

    let id = match state
        .projectiles
        .iter()
        .find(|p| matches!(p.state, ProjectileState::Idle))
    {
        Some(p) => p.id,
        None => {
            let spawn_at = pointer
                .and_then(|screen| ctx.projector.project(screen, plane_height))
                .unwrap_or(Vec3::new(0.0, plane_height, 0.0));
            state.spawn(spawn_at)
        }
    };

    if let Some(projectile) = state.projectiles.iter_mut().find(|p| p.id == id) {
        projectile.velocity = Vec3::ZERO;
        projectile.angular_velocity = Vec3::ZERO;
        projectile.state = ProjectileState::Dragging(DragState {
            plane_height,
            ..Default::default()
        });
        log::debug!("Card {} picked up (plane height {:.2})", id, plane_height);
    }
}

/// Dragging → Dragging: direct follow, no integration
fn follow_pointer<R: RandomSource>(state: &mut ThrowState<R>, pointer: Vec2, ctx: &ThrowContext, dt: f32) {
    let time = state.time;
    for projectile in &mut state.projectiles {
        let ProjectileState::Dragging(drag) = &mut projectile.state else {
            continue;
        };
        let Some(world) = ctx.projector.project(pointer, drag.plane_height) else {
            continue;
        };

        drag.raw_velocity = match drag.sampler.newest() {
            Some(previous) => (world - previous.position) / dt,
            None => Vec3::ZERO,
        };
        drag.sampler.record(world, time);

        projectile.position = world;
        // Display/preview only
        projectile.velocity = drag.raw_velocity;
    }
}

/// Dragging → Flying
fn release<R: RandomSource>(state: &mut ThrowState<R>, ctx: &ThrowContext) {
    let resolver = LaunchVelocityResolver::from_tuning(&state.tuning);
    let ThrowState {
        projectiles,
        rng,
        events,
        ..
    } = state;

    for projectile in projectiles.iter_mut() {
        let ProjectileState::Dragging(drag) = &projectile.state else {
            continue;
        };

        let launch = resolver.resolve(&drag.sampler, drag.raw_velocity, projectile.forward(), &mut *rng);
        projectile.velocity = launch.velocity;
        projectile.angular_velocity = launch.angular_velocity;

        let snapshot = ctx.slots.current_slots();
        if snapshot.is_none() {
            log::debug!("Card {} launched before target slots were available", projectile.id);
        }
        projectile.state = ProjectileState::Flying(FlightState {
            snapshot,
            ..Default::default()
        });

        log::debug!(
            "Card {} launched: velocity {:?} spin {:?}",
            projectile.id,
            launch.velocity,
            launch.angular_velocity
        );
        events.push(ThrowEvent::Launched {
            id: projectile.id,
            velocity: launch.velocity,
            spin: launch.angular_velocity,
        });
    }
    state.preview = None;
}

/// Flying → Flying / Stuck / removed
fn advance_flights<R: RandomSource>(state: &mut ThrowState<R>, ctx: &ThrowContext, dt: f32) {
    let integrator = BallisticIntegrator::new(state.tuning.gravity, state.tuning.integration);
    let impacts = ImpactResolver::from_tuning(&state.tuning);
    let ThrowState {
        tuning,
        projectiles,
        rng,
        events,
        ..
    } = state;

    let mut removed: Vec<u32> = Vec::new();

    for projectile in projectiles.iter_mut() {
        let ProjectileState::Flying(flight) = &mut projectile.state else {
            continue;
        };

        // Missing references: wait for the next tick
        if flight.snapshot.is_none() {
            flight.snapshot = ctx.slots.current_slots();
        }
        let (Some(boundary), Some(slots)) = (ctx.boundary.as_ref(), flight.snapshot.as_ref()) else {
            if flight.deferred {
                log::debug!("Card {} still waiting for boundary/target slots", projectile.id);
            } else {
                log::warn!("Card {} waiting for boundary/target slots; retrying each tick", projectile.id);
                flight.deferred = true;
            }
            continue;
        };
        if flight.deferred {
            log::info!("Card {} resuming flight", projectile.id);
            flight.deferred = false;
        }

        flight.elapsed += dt;

        let current = KinematicState {
            position: projectile.position,
            velocity: projectile.velocity,
        };
        let spin = SpinParams {
            angular_velocity: projectile.angular_velocity,
            spin_strength: projectile.spin_strength,
            mass: projectile.mass,
        };
        let next = integrator.step(current, &spin, dt);
        let displacement = next.position - projectile.position;
        let shape = SweepShape {
            half_extents: tuning.half_extents,
            rotation: projectile.rotation,
        };

        if let Some(contact) = sweep_tick(boundary, ctx.scene, &shape, projectile.position, displacement) {
            match impacts.resolve(&contact, projectile.rotation, slots, &mut *rng) {
                Impact::Hit { slot_id, card, distance } => {
                    log::info!(
                        "Card {} hit slot {} ({}) at distance {:.3}",
                        projectile.id,
                        slot_id,
                        card,
                        distance
                    );
                    events.push(ThrowEvent::Hit {
                        id: projectile.id,
                        slot_id,
                        card,
                    });
                    removed.push(projectile.id);
                }
                Impact::Embed(pose) => {
                    log::info!(
                        "Card {} stuck at {:?} ({:?})",
                        projectile.id,
                        pose.target_position,
                        contact.collider.map(|c| c.tag)
                    );
                    projectile.position = pose.target_position;
                    projectile.rotation = pose.target_rotation;
                    projectile.velocity = Vec3::ZERO;
                    projectile.angular_velocity = Vec3::ZERO;
                    events.push(ThrowEvent::Stuck {
                        id: projectile.id,
                        position: pose.target_position,
                        rotation: pose.target_rotation,
                    });
                    projectile.state = ProjectileState::Stuck(pose);
                }
            }
            continue;
        }

        projectile.position = next.position;
        projectile.velocity = next.velocity;
        if projectile.angular_velocity != Vec3::ZERO {
            projectile.rotation =
                (Quat::from_scaled_axis(projectile.angular_velocity * dt) * projectile.rotation).normalize();
        }

        if projectile.position.y < tuning.kill_height || flight.elapsed > tuning.max_flight_time {
            log::info!("Card {} lost at {:?}", projectile.id, projectile.position);
            events.push(ThrowEvent::Lost { id: projectile.id });
            removed.push(projectile.id);
        }
    }

    if !removed.is_empty() {
        projectiles.retain(|p| !removed.contains(&p.id));
    }
}

/// Refresh the forecast for the card being dragged
fn update_preview<R: RandomSource>(state: &mut ThrowState<R>, ctx: &ThrowContext) {
    let Some((projectile, drag)) = state.projectiles.iter().find_map(|p| match &p.state {
        ProjectileState::Dragging(drag) => Some((p, drag)),
        _ => None,
    }) else {
        state.preview = None;
        return;
    };

    let resolver = LaunchVelocityResolver::from_tuning(&state.tuning);
    let velocity = resolver.candidate(&drag.sampler, drag.raw_velocity, projectile.forward());
    let previewer = TrajectoryPreviewer::from_tuning(&state.tuning);
    let preview = previewer.preview(projectile.position, velocity, ctx.boundary.as_ref(), ctx.scene);
    state.preview = Some(preview);
}
