//! Trajectory preview while dragging
//!
//! Forward-simulates the candidate launch with the flight integrator and cuts
//! the path at the first segment that touches geometry. Advisory only: the
//! real flight is recomputed at release.

use glam::Vec3;

use super::collision::{Boundary, SceneQuery};
use super::integrator::{BallisticIntegrator, KinematicState, SpinParams};
use crate::settings::{MAX_PREVIEW_STEPS, ThrowTuning};

/// Where the preview path ends on geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewImpact {
    pub point: Vec3,
    pub normal: Vec3,
    /// Index of the step whose segment hit
    pub step: usize,
}

/// Forecast path, starting at the launch point
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectoryPreview {
    pub points: Vec<Vec3>,
    pub impact: Option<PreviewImpact>,
}

#[derive(Debug, Clone, Copy)]
pub struct TrajectoryPreviewer {
    pub integrator: BallisticIntegrator,
    pub steps: usize,
    pub dt: f32,
}

impl TrajectoryPreviewer {
    pub fn from_tuning(tuning: &ThrowTuning) -> Self {
        Self {
            integrator: BallisticIntegrator::new(tuning.gravity, tuning.integration),
            steps: tuning.preview_steps.min(MAX_PREVIEW_STEPS),
            dt: tuning.preview_dt,
        }
    }

    /// Forecast a throw from `start` at `velocity`.
    ///
    /// Spin is not known until release, so the forecast has none.
    pub fn preview(
        &self,
        start: Vec3,
        velocity: Vec3,
        boundary: Option<&Boundary>,
        scene: &dyn SceneQuery,
    ) -> TrajectoryPreview {
        let mut points = Vec::with_capacity(self.steps + 1);
        points.push(start);

        let mut state = KinematicState {
            position: start,
            velocity,
        };

        for step in 0..self.steps {
            let next = self.integrator.step(state, &SpinParams::NONE, self.dt);
            let segment = next.position - state.position;

            let plane = boundary.and_then(|b| {
                b.crossing(state.position, segment).map(|t| {
                    let p = b.project(state.position + segment * t);
                    (t, p, b.normal)
                })
            });
            let geometry = scene
                .segment_test(state.position, next.position)
                .map(|hit| (hit.fraction, hit.point, hit.normal));

            let first = match (plane, geometry) {
                (Some(p), Some(g)) => Some(if g.0 < p.0 { g } else { p }),
                (p, g) => p.or(g),
            };

            if let Some((_, point, normal)) = first {
                points.push(point);
                return TrajectoryPreview {
                    points,
                    impact: Some(PreviewImpact { point, normal, step }),
                };
            }

            points.push(next.position);
            state = next;
        }

        TrajectoryPreview {
            points,
            impact: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::{Aabb, Collider, ColliderTag, EmptyScene, StaticScene};

    fn previewer() -> TrajectoryPreviewer {
        TrajectoryPreviewer::from_tuning(&ThrowTuning::default())
    }

    #[test]
    fn test_full_length_without_geometry() {
        let p = previewer();
        let preview = p.preview(Vec3::ZERO, Vec3::new(0.0, 3.0, 1.0), None, &EmptyScene);
        assert_eq!(preview.points.len(), p.steps + 1);
        assert!(preview.impact.is_none());
    }

    #[test]
    fn test_truncates_at_wall() {
        let p = previewer();
        let wall = Boundary::back_wall(5.0);
        let preview = p.preview(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 2.0, 10.0),
            Some(&wall),
            &EmptyScene,
        );

        let impact = preview.impact.unwrap();
        assert!((impact.point.z - 5.0).abs() < 1e-4);
        assert_eq!(*preview.points.last().unwrap(), impact.point);
        assert!(preview.points.len() < p.steps + 1);
        assert!(preview.points.iter().all(|pt| pt.z <= 5.0 + 1e-4));
    }

    #[test]
    fn test_truncates_at_obstacle_before_wall() {
        let p = previewer();
        let wall = Boundary::back_wall(5.0);
        let scene = StaticScene::new(vec![Collider {
            id: 9,
            tag: ColliderTag::Obstacle,
            bounds: Aabb::from_center_half_extents(Vec3::new(0.0, 1.0, 2.0), Vec3::new(1.0, 2.0, 0.1)),
        }]);
        let preview = p.preview(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 10.0),
            Some(&wall),
            &scene,
        );

        let impact = preview.impact.unwrap();
        assert!((impact.point.z - 1.9).abs() < 1e-4);
        assert_eq!(impact.normal, Vec3::Z);
    }

    #[test]
    fn test_steps_capped_for_unvalidated_tuning() {
        let tuning = ThrowTuning {
            preview_steps: usize::MAX,
            ..ThrowTuning::default()
        };
        let p = TrajectoryPreviewer::from_tuning(&tuning);
        assert_eq!(p.steps, MAX_PREVIEW_STEPS);
    }

    #[test]
    fn test_zero_velocity_falls_straight_down() {
        let p = previewer();
        let preview = p.preview(Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, None, &EmptyScene);
        assert!(preview.points.iter().all(|pt| pt.x == 0.0 && pt.z == 0.0));
        assert!(preview.points.last().unwrap().y < 1.0);
    }
}
