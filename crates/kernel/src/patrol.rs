//! Cyclic waypoint patrols for NPCs.

use campus_scene::SceneRegistry;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::PatrolConfig;
use crate::motion::{TIMER_EPSILON, sanitize_dt};

/// Where an NPC is along its loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PatrolRuntimeState {
    pub segment_index: usize,
    /// Fraction of the current segment covered, in `[0, 1)`.
    pub progress: f32,
}

#[derive(Debug, Clone, PartialEq)]
struct PatrolRoute {
    entity: usize,
    path: Vec<Vec3>,
    state: PatrolRuntimeState,
}

/// Linear interpolation from `path[segment]` toward the next waypoint, wrapping
/// from the last waypoint back to the first.
pub fn sample_path(path: &[Vec3], state: PatrolRuntimeState) -> Option<Vec3> {
    let len = path.len();
    let from = *path.get(state.segment_index % len.max(1))?;
    let to = path[(state.segment_index + 1) % len];
    Some(from.lerp(to, state.progress))
}

/// Advances every patrolling NPC along its closed loop of waypoints.
///
/// Routes are keyed by registry index so the animator can write straight into
/// the session's entity position table.
#[derive(Debug, Clone, PartialEq)]
pub struct PatrolAnimator {
    speed: f32,
    routes: Vec<PatrolRoute>,
}

impl PatrolAnimator {
    pub fn new(config: &PatrolConfig) -> Self {
        Self {
            speed: config.speed,
            routes: Vec::new(),
        }
    }

    pub fn from_registry(registry: &SceneRegistry, config: &PatrolConfig) -> Self {
        let mut animator = Self::new(config);
        for (index, entity) in registry.entities().iter().enumerate() {
            if let Some(path) = entity.patrol_path() {
                animator.add_route(index, path.to_vec());
            }
        }
        animator
    }

    /// Register a loop for the entity at `entity`. Paths shorter than two
    /// waypoints are refused.
    pub fn add_route(&mut self, entity: usize, path: Vec<Vec3>) -> bool {
        if path.len() < 2 {
            tracing::warn!(entity, len = path.len(), "patrol path too short, ignored");
            return false;
        }
        self.routes.push(PatrolRoute {
            entity,
            path,
            state: PatrolRuntimeState::default(),
        });
        true
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn state(&self, entity: usize) -> Option<PatrolRuntimeState> {
        self.routes
            .iter()
            .find(|r| r.entity == entity)
            .map(|r| r.state)
    }

    /// `(entity index, state)` for every route, in registration order.
    pub fn states(&self) -> impl Iterator<Item = (usize, PatrolRuntimeState)> + '_ {
        self.routes.iter().map(|r| (r.entity, r.state))
    }

    /// Advance all routes by `dt` seconds and write each NPC's new position
    /// into `positions[entity]`.
    pub fn advance(&mut self, dt: f32, positions: &mut [Vec3]) {
        let dt = sanitize_dt(dt);
        for route in &mut self.routes {
            let len = route.path.len();
            let state = &mut route.state;
            state.progress += dt * self.speed;
            // Float accumulation can land just short of a waypoint.
            if state.progress >= 1.0 - TIMER_EPSILON {
                let wraps = (state.progress + TIMER_EPSILON).floor();
                state.progress = (state.progress - wraps).max(0.0);
                state.segment_index = (state.segment_index + wraps as usize) % len;
                tracing::trace!(
                    entity = route.entity,
                    segment = state.segment_index,
                    "patrol reached waypoint"
                );
            }
            if let (Some(slot), Some(p)) = (
                positions.get_mut(route.entity),
                sample_path(&route.path, *state),
            ) {
                *slot = p;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_point() -> Vec<Vec3> {
        vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)]
    }

    #[test]
    fn progress_zero_is_segment_start() {
        let path = vec![Vec3::ZERO, Vec3::X, Vec3::Z];
        let state = PatrolRuntimeState {
            segment_index: 1,
            progress: 0.0,
        };
        assert_eq!(sample_path(&path, state), Some(Vec3::X));
    }

    #[test]
    fn progress_near_one_approaches_next_waypoint() {
        let path = vec![Vec3::ZERO, Vec3::X, Vec3::Z];
        let state = PatrolRuntimeState {
            segment_index: 2,
            progress: 0.9999,
        };
        let p = sample_path(&path, state).unwrap();
        assert!(p.distance(Vec3::ZERO) < 1e-3);
    }

    #[test]
    fn advance_moves_npc_and_writes_position() {
        let mut animator = PatrolAnimator::new(&PatrolConfig::default());
        assert!(animator.add_route(0, two_point()));
        let mut positions = vec![Vec3::ZERO];
        animator.advance(1.0, &mut positions);
        assert!((positions[0].x - 3.0).abs() < 1e-4);
        assert_eq!(animator.state(0).unwrap().segment_index, 0);
    }

    #[test]
    fn wraps_cyclically_through_all_waypoints() {
        let mut animator = PatrolAnimator::new(&PatrolConfig { speed: 1.0 });
        animator.add_route(0, vec![Vec3::ZERO, Vec3::X, Vec3::Z]);
        let mut positions = vec![Vec3::ZERO];
        let mut seen = Vec::new();
        for _ in 0..6 {
            animator.advance(1.0, &mut positions);
            seen.push(animator.state(0).unwrap().segment_index);
        }
        assert_eq!(seen, vec![1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn large_step_wraps_multiple_segments_and_stays_below_one() {
        let mut animator = PatrolAnimator::new(&PatrolConfig { speed: 4.5 });
        animator.add_route(0, vec![Vec3::ZERO, Vec3::X, Vec3::Z]);
        let mut positions = vec![Vec3::ZERO];
        animator.advance(1.0, &mut positions);
        let state = animator.state(0).unwrap();
        assert_eq!(state.segment_index, 1);
        assert!((state.progress - 0.5).abs() < 1e-6);
    }

    #[test]
    fn sixty_hertz_steps_reach_waypoint_on_time() {
        let mut animator = PatrolAnimator::new(&PatrolConfig::default());
        animator.add_route(0, two_point());
        let mut positions = vec![Vec3::ZERO];
        // 200 frames at 60 Hz is exactly one segment at 0.3 segments/s.
        for _ in 0..200 {
            animator.advance(1.0 / 60.0, &mut positions);
        }
        let state = animator.state(0).unwrap();
        assert_eq!(state.segment_index, 1);
        assert!(state.progress >= 0.0 && state.progress < 1e-3);
        assert!(positions[0].distance(Vec3::new(10.0, 0.0, 0.0)) < 1e-3);
    }

    #[test]
    fn short_paths_and_negative_dt_are_ignored() {
        let mut animator = PatrolAnimator::new(&PatrolConfig::default());
        assert!(!animator.add_route(0, vec![Vec3::X]));
        assert_eq!(animator.route_count(), 0);

        animator.add_route(0, two_point());
        let mut positions = vec![Vec3::ZERO];
        animator.advance(-5.0, &mut positions);
        assert_eq!(animator.state(0).unwrap().progress, 0.0);
    }
}
