//! Player motion: integrates the input sample and elapsed time into position,
//! velocity and a discrete movement state.
//!
//! # Invariants
//! - `jump_count` never exceeds [`MAX_JUMPS`] between landings.
//! - Outside a slide, horizontal speed never exceeds the walk/run cap.
//! - `x` and `z` stay within `[-bounds, bounds]`.
//! - While controls are locked nothing advances, gravity included.

use campus_common::{flatten, retention_factor};
use campus_input::InputSample;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::MotionConfig;
use crate::view::ViewHandle;

/// Jumps allowed before touching the ground again.
pub const MAX_JUMPS: u8 = 2;

/// Slack for countdown timers so accumulated float error cannot stretch a
/// timer by an extra tick.
pub(crate) const TIMER_EPSILON: f32 = 1e-4;

/// Longest frame the simulation integrates in one step, in seconds.
pub const MAX_FRAME_TIME: f32 = 1.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementState {
    #[default]
    Idle,
    Walking,
    Running,
    Jumping,
    Sliding,
}

impl MovementState {
    pub fn name(self) -> &'static str {
        match self {
            MovementState::Idle => "idle",
            MovementState::Walking => "walking",
            MovementState::Running => "running",
            MovementState::Jumping => "jumping",
            MovementState::Sliding => "sliding",
        }
    }
}

/// Simulated player body. Owned by [`PlayerMotionController`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub jump_count: u8,
    /// Jump debounce gate; reopens when `jump_cooldown` runs out.
    pub can_jump: bool,
    pub jump_cooldown: f32,
    pub is_sliding: bool,
    pub slide_time_remaining: f32,
    pub movement_state: MovementState,
}

impl PlayerState {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            jump_count: 0,
            can_jump: true,
            jump_cooldown: 0.0,
            is_sliding: false,
            slide_time_remaining: 0.0,
            movement_state: MovementState::Idle,
        }
    }

    /// At rest on the floor plane with no jump pending.
    pub fn is_grounded(&self, ground_height: f32) -> bool {
        self.can_jump && self.velocity.y == 0.0 && self.position.y <= ground_height
    }

    pub fn horizontal_speed(&self) -> f32 {
        Vec2::new(self.velocity.x, self.velocity.z).length()
    }
}

/// Horizontal forward/right unit vectors derived from the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl Default for MovementBasis {
    fn default() -> Self {
        Self {
            forward: Vec3::NEG_Z,
            right: Vec3::X,
        }
    }
}

impl MovementBasis {
    /// Basis for a camera looking along `camera_forward`, or `None` if the
    /// direction has no horizontal component.
    pub fn from_camera(camera_forward: Vec3) -> Option<Self> {
        let forward = flatten(camera_forward)?;
        Some(Self {
            forward,
            right: forward.cross(Vec3::Y),
        })
    }

    /// Unit world-space direction for the held directional actions, or zero.
    pub fn wish_direction(&self, sample: &InputSample) -> Vec3 {
        if !sample.has_direction() {
            return Vec3::ZERO;
        }
        let mut dir = Vec3::ZERO;
        if sample.forward {
            dir += self.forward;
        }
        if sample.backward {
            dir -= self.forward;
        }
        if sample.right {
            dir += self.right;
        }
        if sample.left {
            dir -= self.right;
        }
        dir.normalize_or_zero()
    }
}

/// Negative, NaN and infinite frame times are treated as no time passing;
/// longer frames are shortened to [`MAX_FRAME_TIME`].
pub(crate) fn sanitize_dt(dt: f32) -> f32 {
    if !dt.is_finite() || dt < 0.0 {
        tracing::warn!(dt, "invalid frame time clamped to zero");
        0.0
    } else if dt > MAX_FRAME_TIME {
        tracing::warn!(dt, max = MAX_FRAME_TIME, "long frame time clamped");
        MAX_FRAME_TIME
    } else {
        dt
    }
}

/// Per-frame physics integrator for the player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerMotionController {
    config: MotionConfig,
    state: PlayerState,
    basis: MovementBasis,
}

impl PlayerMotionController {
    pub fn new(config: MotionConfig, spawn: Vec3) -> Self {
        Self {
            config,
            state: PlayerState::at(spawn),
            basis: MovementBasis::default(),
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Direct access for scripted setups such as cutscenes and tests.
    pub fn state_mut(&mut self) -> &mut PlayerState {
        &mut self.state
    }

    pub fn basis(&self) -> MovementBasis {
        self.basis
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Advance the player by `dt` seconds and write the new position to `view`.
    ///
    /// With `controls_locked` the tick is skipped entirely: no input, no
    /// gravity, no timers, and the view is left untouched.
    pub fn update<V: ViewHandle + ?Sized>(
        &mut self,
        sample: &InputSample,
        dt: f32,
        controls_locked: bool,
        view: &mut V,
    ) -> &PlayerState {
        if controls_locked {
            return &self.state;
        }
        let dt = sanitize_dt(dt);
        let cfg = &self.config;

        match MovementBasis::from_camera(view.forward()) {
            Some(basis) => self.basis = basis,
            None => tracing::debug!("degenerate camera forward, keeping previous basis"),
        }
        let basis = self.basis;
        let s = &mut self.state;

        if !s.can_jump {
            s.jump_cooldown -= dt;
            if s.jump_cooldown <= TIMER_EPSILON {
                s.jump_cooldown = 0.0;
                s.can_jump = true;
            }
        }

        let grounded = s.is_grounded(cfg.ground_height);
        let mut accelerating = false;

        if sample.run && sample.backward && !s.is_sliding && grounded {
            s.is_sliding = true;
            s.slide_time_remaining = cfg.slide_duration;
            s.velocity -= basis.forward * cfg.slide_impulse;
            tracing::debug!(position = ?s.position, "slide started");
        } else if s.is_sliding {
            s.slide_time_remaining -= dt;
            if s.slide_time_remaining <= TIMER_EPSILON {
                s.is_sliding = false;
                s.slide_time_remaining = 0.0;
                tracing::debug!("slide ended");
            }
        } else {
            let wish = basis.wish_direction(sample);
            if wish != Vec3::ZERO {
                let accel = if sample.run {
                    cfg.run_acceleration
                } else {
                    cfg.walk_acceleration
                };
                s.velocity.x += wish.x * accel * dt;
                s.velocity.z += wish.z * accel * dt;
                accelerating = true;
            }
            let cap = if sample.run {
                cfg.max_run_speed
            } else {
                cfg.max_walk_speed
            };
            let horizontal = Vec2::new(s.velocity.x, s.velocity.z);
            if horizontal.length() > cap {
                let capped = horizontal.normalize() * cap;
                s.velocity.x = capped.x;
                s.velocity.z = capped.y;
            }
        }

        if sample.jump && s.jump_count < MAX_JUMPS && s.can_jump {
            s.velocity.y = cfg.jump_velocity;
            s.jump_count += 1;
            s.can_jump = false;
            s.jump_cooldown = cfg.jump_cooldown;
            tracing::debug!(jump_count = s.jump_count, "jump");
        }

        s.velocity.y -= cfg.gravity * dt;
        s.position += s.velocity * dt;

        if s.position.y < cfg.ground_height {
            s.position.y = cfg.ground_height;
            s.velocity.y = 0.0;
            s.jump_count = 0;
        }

        s.position.x = s.position.x.clamp(-cfg.bounds, cfg.bounds);
        s.position.z = s.position.z.clamp(-cfg.bounds, cfg.bounds);

        if !accelerating {
            let keep = retention_factor(cfg.deceleration, dt, cfg.reference_rate);
            s.velocity.x *= keep;
            s.velocity.z *= keep;
        }

        s.movement_state = if s.is_sliding {
            MovementState::Sliding
        } else if s.jump_count > 0 {
            MovementState::Jumping
        } else if accelerating && sample.run {
            MovementState::Running
        } else if accelerating {
            MovementState::Walking
        } else {
            MovementState::Idle
        };

        view.set_position(s.position);
        &self.state
    }
}
